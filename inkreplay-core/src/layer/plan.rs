//! Reconstruction strategies and how they're compared.

use crate::stroke::StrokeRef;
use crate::surface::Background;

/// A way to bring a layer's surface up to date.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Replay the strokes missing from what the surface currently shows.
    Continue,
    /// Load the snapshot of the cache entry at this index (oldest first), then replay what's missing from it.
    RestoreCache(usize),
    /// Clear (or load the background), then replay every stroke.
    RebuildFromScratch,
}

/// A strategy, with its estimated cost in stroke replays.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Plan {
    pub strategy: Strategy,
    pub cost: usize,
}

/// A recorded point in a layer's history: which strokes, over which background.
///
/// Used both for "what the surface currently shows" and for the history a cached snapshot shows.
#[derive(Clone, Debug, Default)]
pub struct HistoryPoint {
    strokes: Vec<StrokeRef>,
    background: Option<Background>,
}
impl HistoryPoint {
    #[must_use]
    pub fn new(strokes: Vec<StrokeRef>, background: Option<Background>) -> Self {
        Self {
            strokes,
            background,
        }
    }
    #[must_use]
    pub fn strokes(&self) -> &[StrokeRef] {
        &self.strokes
    }
    #[must_use]
    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }
    /// Number of strokes in this history.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
    /// The strokes that would need to be painted on top of this point to reach the given history.
    ///
    /// `None` if that's impossible: the backgrounds differ, or this point's strokes are not a prefix
    /// (by identity) of `strokes`.
    #[must_use]
    pub fn strokes_until<'a>(
        &self,
        strokes: &'a [StrokeRef],
        background: Option<&Background>,
    ) -> Option<&'a [StrokeRef]> {
        if self.background.as_ref() != background {
            return None;
        }
        let prefix = strokes.get(..self.strokes.len())?;
        crate::stroke::same_history(&self.strokes, prefix).then(|| &strokes[prefix.len()..])
    }
    pub(super) fn push(&mut self, stroke: StrokeRef) {
        self.strokes.push(stroke);
    }
}

/// Pick the cheapest plan. On a tie, the earliest wins.
pub(super) fn cheapest(candidates: impl IntoIterator<Item = Plan>) -> Option<Plan> {
    // `min_by_key` returns the first of equal minimums.
    candidates.into_iter().min_by_key(|plan| plan.cost)
}
