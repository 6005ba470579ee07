//! # Layers
//!
//! A layer is an ordered history of strokes painted onto one surface. The history is edited freely from
//! outside (appending a freshly recorded stroke, truncating for undo, swapping in another history for redo
//! or copy), after which [`Layer::reconcile`] brings the surface back in line with it.
//!
//! Reconciling considers several ways to get there and picks the cheapest:
//! * Continue from what the surface currently shows, replaying the missing strokes.
//! * Load a cached snapshot of an earlier point of the history, and continue from there.
//! * Start over from a blank surface or the background image.
//!
//! Snapshots are taken along the way as strokes are replayed, at most one every
//! [`strokes_to_cache`](CacheSettings::strokes_to_cache) strokes, and are kept in least-recently-used order.

pub mod plan;

pub use plan::{HistoryPoint, Plan, Strategy};

use crate::brush::StrokeRecorder;
use crate::settings::CacheSettings;
use crate::stroke::StrokeRef;
use crate::surface::{Background, Surface};

/// Replays beyond this many strokes get logged.
const LONG_REPLAY: usize = 20;

#[derive(Clone)]
struct CacheEntry<Snapshot> {
    point: HistoryPoint,
    snapshot: Snapshot,
}

pub struct Layer<S: Surface + StrokeRecorder> {
    /// The history this layer should show. Manipulated directly by the owner, and made visible
    /// by [`Layer::reconcile`].
    pub strokes: Vec<StrokeRef>,
    /// Image underneath all strokes. `None` for transparent.
    pub background: Option<Background>,
    surface: S,
    /// What `surface` actually shows right now.
    rendered: HistoryPoint,
    /// Least recently used first.
    caches: std::collections::VecDeque<CacheEntry<S::Snapshot>>,
    settings: CacheSettings,
}
impl<S: Surface + StrokeRecorder> Layer<S> {
    /// Create an empty layer painting onto `surface`, which is assumed to be blank.
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self::with_settings(surface, CacheSettings::default())
    }
    #[must_use]
    pub fn with_settings(surface: S, settings: CacheSettings) -> Self {
        Self {
            strokes: Vec::new(),
            background: None,
            surface,
            rendered: HistoryPoint::default(),
            caches: std::collections::VecDeque::with_capacity(settings.max_caches.get()),
            settings,
        }
    }
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }
    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }
    #[must_use]
    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }
    /// The history the surface currently shows. Only guaranteed to match [`Layer::strokes`] right after a
    /// [`Layer::reconcile`].
    #[must_use]
    pub fn rendered(&self) -> &HistoryPoint {
        &self.rendered
    }
    /// Histories of the cached snapshots, least recently used first.
    pub fn cached_points(&self) -> impl ExactSizeIterator<Item = &HistoryPoint> + '_ {
        self.caches.iter().map(|entry| &entry.point)
    }
    /// How many strokes must be replayed on top of `reference` to reach this layer's history.
    /// `None` if it cannot be reached at all.
    #[must_use]
    pub fn count_strokes_from(&self, reference: &HistoryPoint) -> Option<usize> {
        reference
            .strokes_until(&self.strokes, self.background.as_ref())
            .map(<[_]>::len)
    }
    /// Choose how to reconcile, without doing it.
    #[must_use]
    pub fn plan(&self) -> Plan {
        let penalty = self.settings.snapshot_penalty;

        let continue_cost = self.count_strokes_from(&self.rendered);
        // Zero or one new stroke (by far the most common case, a stroke was just finished)
        // can't be beaten, don't bother looking at the rest.
        if let Some(cost @ 0..=1) = continue_cost {
            return Plan {
                strategy: Strategy::Continue,
                cost,
            };
        }

        // Continue, every cache, rebuild.
        let mut candidates = smallvec::SmallVec::<[Plan; 5]>::new();
        if let Some(cost) = continue_cost {
            candidates.push(Plan {
                strategy: Strategy::Continue,
                cost,
            });
        }
        candidates.extend(self.caches.iter().enumerate().filter_map(|(idx, entry)| {
            let count = self.count_strokes_from(&entry.point)?;
            Some(Plan {
                strategy: Strategy::RestoreCache(idx),
                cost: count.saturating_add(penalty),
            })
        }));
        let background_cost = if self.background.is_some() { penalty } else { 0 };
        candidates.push(Plan {
            strategy: Strategy::RebuildFromScratch,
            cost: self.strokes.len().saturating_add(background_cost),
        });

        // Unwrap ok - rebuild is always a candidate.
        plan::cheapest(candidates).unwrap()
    }
    /// Estimated cost of [`Layer::reconcile`], without doing any work.
    #[must_use]
    pub fn estimate_cost(&self) -> usize {
        self.plan().cost
    }
    /// Bring the surface up to date with [`Layer::strokes`] and [`Layer::background`] as cheaply as possible.
    /// Returns the estimated cost, in stroke replays.
    ///
    /// If `estimate_only`, only the cost is calculated and nothing changes.
    ///
    /// # Panics
    /// If any stroke in the history is not finished.
    pub fn reconcile(&mut self, estimate_only: bool) -> usize {
        let start = std::time::Instant::now();
        let plan = self.plan();
        if estimate_only {
            return plan.cost;
        }
        let evaluated = start.elapsed();

        match plan.strategy {
            Strategy::Continue => {
                if plan.cost > 0 {
                    self.render_new_strokes();
                }
            }
            Strategy::RestoreCache(idx) => self.restore_cache(idx),
            Strategy::RebuildFromScratch => self.rebuild(),
        }

        log::trace!(
            "reconcile via {:?} (cost {}) took {:?}, {:?} of which was evaluation",
            plan.strategy,
            plan.cost,
            start.elapsed(),
            evaluated
        );
        plan.cost
    }
    /// Copy another layer's cached snapshots, so history shared with it can be restored here.
    ///
    /// The snapshots must be compatible with this layer's surface. Adopted entries are treated as less
    /// recently used than this layer's own, and the oldest are dropped if over the limit.
    pub fn adopt_caches_from(&mut self, other: &Self) {
        let mut merged: std::collections::VecDeque<_> = other
            .caches
            .iter()
            .filter(|theirs| {
                !self.caches.iter().any(|ours| {
                    ours.point.background() == theirs.point.background()
                        && crate::stroke::same_history(
                            ours.point.strokes(),
                            theirs.point.strokes(),
                        )
                })
            })
            .cloned()
            .collect();
        merged.append(&mut self.caches);
        while merged.len() > self.settings.max_caches.get() {
            drop(merged.pop_front());
        }
        self.caches = merged;
    }
    /// Record `stroke` live onto this layer's surface, with `draw` feeding it input.
    ///
    /// The layer is reconciled first, so the stroke lands on top of the current history. Afterwards the
    /// stroke is part of both the history and what's rendered, so it's never replayed needlessly.
    ///
    /// # Panics
    /// If `stroke` was already recorded, or `draw` leaves it unfinished.
    pub fn record_stroke(
        &mut self,
        mut stroke: crate::stroke::Stroke,
        draw: impl FnOnce(&mut S),
    ) -> StrokeRef {
        self.reconcile(false);
        stroke.start_recording(&mut self.surface);
        draw(&mut self.surface);
        stroke.stop_recording(&mut self.surface);

        let stroke = StrokeRef::new(stroke);
        self.strokes.push(stroke.clone());
        self.rendered.push(stroke.clone());
        self.populate_cache();
        stroke
    }

    /// Replay the difference between `rendered` and `strokes`.
    fn render_new_strokes(&mut self) {
        let Some(new_strokes) = self
            .rendered
            .strokes_until(&self.strokes, self.background.as_ref())
        else {
            panic!("rendered history is not a prefix of the layer history");
        };
        let count = new_strokes.len();
        let first = self.rendered.len();
        if count > LONG_REPLAY {
            log::debug!("rendering {count} strokes...");
        }

        // When replaying many, only start caching towards the end. Earlier caches would just be evicted.
        let window = self.settings.strokes_to_cache.get().saturating_mul(2);
        let cache_from = if count > window {
            first + count - window
        } else {
            first
        };

        for idx in first..self.strokes.len() {
            let stroke = self.strokes[idx].clone();
            stroke.render(&mut self.surface);
            self.rendered.push(stroke);
            if idx >= cache_from {
                self.populate_cache();
            }
        }

        assert!(
            crate::stroke::same_history(self.rendered.strokes(), &self.strokes),
            "rendered history diverged from layer history"
        );
        if count > LONG_REPLAY {
            log::debug!("done rendering.");
        }
    }
    fn restore_cache(&mut self, idx: usize) {
        // Unwrap ok - index came from a plan over the same caches.
        let entry = self.caches.remove(idx).unwrap();
        log::trace!("using a cache containing {} strokes", entry.point.len());
        self.surface.load_snapshot(&entry.snapshot);
        self.rendered = entry.point.clone();
        // Now most recently used.
        self.caches.push_back(entry);
        self.render_new_strokes();
    }
    fn rebuild(&mut self) {
        log::trace!("full rerender of {} strokes", self.strokes.len());
        match &self.background {
            Some(background) => self.surface.load_background(background),
            None => self.surface.clear(),
        }
        self.rendered = HistoryPoint::new(Vec::new(), self.background.clone());
        self.render_new_strokes();
    }
    /// Snapshot the surface, if it's far enough from every other snapshot.
    fn populate_cache(&mut self) {
        let strokes_to_cache = self.settings.strokes_to_cache.get();
        // Too few strokes to be worth caching?
        if self.rendered.len() < strokes_to_cache {
            return;
        }
        // Got a close-enough cache already?
        let has_close = self.caches.iter().any(|entry| {
            entry
                .point
                .strokes_until(self.rendered.strokes(), self.rendered.background())
                .is_some_and(|between| between.len() < strokes_to_cache)
        });
        if has_close {
            return;
        }

        while self.caches.len() >= self.settings.max_caches.get() {
            if let Some(evicted) = self.caches.pop_front() {
                log::trace!("dropping a cache with {} strokes", evicted.point.len());
            }
        }
        log::trace!("adding cache ({} strokes)", self.rendered.len());
        self.caches.push_back(CacheEntry {
            point: self.rendered.clone(),
            snapshot: self.surface.save_snapshot(),
        });
    }
}
impl<S: Surface + StrokeRecorder> std::fmt::Debug for Layer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layer")
            .field("strokes", &self.strokes.len())
            .field("background", &self.background.is_some())
            .field("rendered", &self.rendered.len())
            .field(
                "caches",
                &self.cached_points().map(HistoryPoint::len).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::{Layer, Strategy};
    use crate::brush::StrokeRecorder;
    use crate::settings::CacheSettings;
    use crate::stroke::{StrokeIdServer, StrokeRef};
    use crate::surface::Background;
    use crate::test_util::{MockSurface, Painted};

    /// Strokes are recorded on a separate "studio" surface, so the layer's surface only ever sees replays.
    fn studio(count: usize) -> (StrokeIdServer, Vec<StrokeRef>) {
        let ids = StrokeIdServer::new();
        let mut studio = MockSurface::default();
        let strokes = studio.record_many(&ids, count);
        (ids, strokes)
    }
    fn cached_lens(layer: &Layer<MockSurface>) -> Vec<usize> {
        layer.cached_points().map(super::HistoryPoint::len).collect()
    }
    /// What a surface should look like after painting these from scratch.
    fn expected(background: Option<&Background>, strokes: &[StrokeRef]) -> Vec<Painted> {
        let mut surface = MockSurface::default();
        if let Some(background) = background {
            crate::surface::Surface::load_background(&mut surface, background);
        }
        for stroke in strokes {
            stroke.render(&mut surface);
        }
        surface.painted
    }
    /// Append one at a time, reconciling after each.
    fn paint_one_by_one(layer: &mut Layer<MockSurface>, strokes: &[StrokeRef]) {
        for stroke in strokes {
            layer.strokes.push(stroke.clone());
            assert_eq!(layer.reconcile(false), 1);
        }
    }

    #[test]
    fn reconcile_matches_history() {
        let (_, strokes) = studio(9);
        let mut layer = Layer::new(MockSurface::default());
        layer.strokes.extend_from_slice(&strokes[..4]);
        assert_eq!(layer.reconcile(false), 4);
        assert!(crate::stroke::same_history(
            layer.rendered().strokes(),
            &layer.strokes
        ));
        assert_eq!(layer.surface().painted, expected(None, &strokes[..4]));

        layer.strokes.extend_from_slice(&strokes[4..]);
        layer.reconcile(false);
        assert!(crate::stroke::same_history(
            layer.rendered().strokes(),
            &layer.strokes
        ));
        assert_eq!(layer.surface().painted, expected(None, &strokes));
    }
    #[test]
    fn idempotent() {
        let (_, strokes) = studio(8);
        let mut layer = Layer::new(MockSurface::default());
        layer.strokes = strokes;
        layer.reconcile(false);
        let painted = layer.surface().painted.clone();
        let counters = layer.surface().counters;

        assert_eq!(layer.reconcile(false), 0);
        assert_eq!(layer.surface().counters, counters);
        assert_eq!(layer.surface().painted, painted);
    }
    #[test]
    fn estimate_has_no_side_effects() {
        let (_, strokes) = studio(10);
        let mut layer = Layer::new(MockSurface::default());
        paint_one_by_one(&mut layer, &strokes);
        layer.strokes.truncate(7);

        let painted = layer.surface().painted.clone();
        let counters = layer.surface().counters;
        let caches = cached_lens(&layer);
        let rendered = layer.rendered().len();

        let estimate = layer.reconcile(true);
        assert_eq!(estimate, layer.estimate_cost());
        assert_eq!(layer.surface().painted, painted);
        assert_eq!(layer.surface().counters, counters);
        assert_eq!(cached_lens(&layer), caches);
        assert_eq!(layer.rendered().len(), rendered);

        assert_eq!(layer.reconcile(false), estimate);
    }
    #[test]
    fn caches_appear_after_threshold() {
        let (_, strokes) = studio(30);
        let mut layer = Layer::new(MockSurface::default());

        for (i, stroke) in strokes.iter().enumerate() {
            layer.strokes.push(stroke.clone());
            assert_eq!(layer.reconcile(false), 1);
            let count = i + 1;
            let caches = cached_lens(&layer);
            match count {
                1..=5 => assert!(caches.is_empty()),
                6..=11 => assert_eq!(caches, [6]),
                12..=17 => assert_eq!(caches, [6, 12]),
                18..=23 => assert_eq!(caches, [6, 12, 18]),
                24..=29 => assert_eq!(caches, [12, 18, 24]),
                _ => assert_eq!(caches, [18, 24, 30]),
            }
            // Evicted snapshots are gone immediately.
            assert_eq!(layer.surface().live_snapshots(), caches.len());
        }
        assert_eq!(layer.surface().snapshot_saves(), 5);
        assert_eq!(layer.surface().counters.snapshot_loads, 0);
    }
    #[test]
    fn large_replay_defers_caching() {
        let (_, strokes) = studio(30);
        let mut layer = Layer::new(MockSurface::default());
        layer.strokes = strokes;
        assert_eq!(layer.reconcile(false), 30);
        // Caching started 12 strokes from the end.
        assert_eq!(cached_lens(&layer), [19, 25]);
        assert_eq!(layer.surface().snapshot_saves(), 2);
    }
    #[test]
    fn undo_rebuilds() {
        let (_, strokes) = studio(8);
        let mut layer = Layer::new(MockSurface::default());
        paint_one_by_one(&mut layer, &strokes);
        assert_eq!(layer.rendered().len(), 8);

        layer.strokes.truncate(3);
        // Can't go backwards from what's rendered, nor from the cache at 6.
        assert_eq!(layer.count_strokes_from(layer.rendered()), None);
        assert_eq!(
            layer.plan(),
            super::Plan {
                strategy: Strategy::RebuildFromScratch,
                cost: 3
            }
        );
        let clears = layer.surface().counters.clears;
        assert_eq!(layer.reconcile(false), 3);
        assert_eq!(layer.surface().counters.clears, clears + 1);
        assert_eq!(layer.surface().painted, expected(None, &strokes[..3]));
        // The old cache survives, it may be useful for redo.
        assert_eq!(cached_lens(&layer), [6]);
    }
    #[test]
    fn undo_restores_cache() {
        let (_, strokes) = studio(18);
        let mut layer = Layer::new(MockSurface::default());
        paint_one_by_one(&mut layer, &strokes);
        assert_eq!(cached_lens(&layer), [6, 12, 18]);

        // Undo back to 8: cache at 6 + 2 replays beats rebuilding 8.
        layer.strokes.truncate(8);
        assert_eq!(
            layer.plan(),
            super::Plan {
                strategy: Strategy::RestoreCache(0),
                cost: 5
            }
        );
        let replays = layer.surface().counters.replays;
        assert_eq!(layer.reconcile(false), 5);
        assert_eq!(layer.surface().counters.snapshot_loads, 1);
        assert_eq!(layer.surface().counters.replays, replays + 2);
        assert_eq!(layer.surface().painted, expected(None, &strokes[..8]));
        // Used cache moved to the back.
        assert_eq!(cached_lens(&layer), [12, 18, 6]);

        // Redo everything: the cache at 18 is exact.
        layer.strokes = strokes.clone();
        assert_eq!(
            layer.plan(),
            super::Plan {
                strategy: Strategy::RestoreCache(1),
                cost: 3
            }
        );
        let replays = layer.surface().counters.replays;
        assert_eq!(layer.reconcile(false), 3);
        assert_eq!(layer.surface().counters.replays, replays);
        assert_eq!(layer.surface().painted, expected(None, &strokes));
        assert_eq!(cached_lens(&layer), [12, 6, 18]);
    }
    #[test]
    fn background_change_invalidates() {
        let (_, strokes) = studio(4);
        let mut layer = Layer::new(MockSurface::default());
        paint_one_by_one(&mut layer, &strokes);

        let background = Background::solid([2, 2], [255, 255, 255, 255]);
        layer.background = Some(background.clone());
        // Same strokes, different background.
        assert_eq!(layer.count_strokes_from(layer.rendered()), None);
        assert_eq!(layer.reconcile(false), 4 + 3);
        assert_eq!(layer.surface().counters.background_loads, 1);
        assert_eq!(layer.surface().counters.clears, 0);
        assert_eq!(
            layer.surface().painted,
            expected(Some(&background), &strokes)
        );
        assert_eq!(layer.rendered().background(), Some(&background));

        // Back to transparent.
        layer.background = None;
        assert_eq!(layer.reconcile(false), 4);
        assert_eq!(layer.surface().counters.clears, 1);
        assert_eq!(layer.surface().painted, expected(None, &strokes));
    }
    #[test]
    fn single_stroke_skips_evaluation() {
        let (_, strokes) = studio(13);
        let mut layer = Layer::new(MockSurface::default());
        paint_one_by_one(&mut layer, &strokes[..12]);
        let counters = layer.surface().counters;

        layer.strokes.push(strokes[12].clone());
        assert_eq!(
            layer.plan(),
            super::Plan {
                strategy: Strategy::Continue,
                cost: 1
            }
        );
        assert_eq!(layer.reconcile(false), 1);
        let after = layer.surface().counters;
        assert_eq!(after.snapshot_loads, counters.snapshot_loads);
        assert_eq!(after.clears, counters.clears);
        assert_eq!(after.background_loads, counters.background_loads);
        assert_eq!(after.replays, counters.replays + 1);
    }
    #[test]
    fn shared_ancestor_cache() {
        let (_, strokes) = studio(9);
        let mut source = Layer::new(MockSurface::default());
        source.strokes = strokes[..6].to_vec();
        source.reconcile(false);
        assert_eq!(cached_lens(&source), [6]);

        let mut a = Layer::new(MockSurface::default());
        a.adopt_caches_from(&source);
        a.strokes = strokes[..7].to_vec();

        let mut b = Layer::new(MockSurface::default());
        b.adopt_caches_from(&source);
        b.strokes = strokes[..9].to_vec();

        // 1 + 3 vs. 7 from scratch.
        assert_eq!(
            a.plan(),
            super::Plan {
                strategy: Strategy::RestoreCache(0),
                cost: 4
            }
        );
        // 3 + 3 vs. 9 from scratch.
        assert_eq!(
            b.plan(),
            super::Plan {
                strategy: Strategy::RestoreCache(0),
                cost: 6
            }
        );
        a.reconcile(false);
        b.reconcile(false);
        assert_eq!(a.surface().counters.snapshot_loads, 1);
        assert_eq!(a.surface().counters.replays, 1);
        assert_eq!(b.surface().counters.replays, 3);
        assert_eq!(a.surface().painted, expected(None, &strokes[..7]));
        assert_eq!(b.surface().painted, expected(None, &strokes[..9]));
    }
    #[test]
    fn adopt_respects_limit() {
        let (_, strokes) = studio(24);
        let mut source = Layer::new(MockSurface::default());
        paint_one_by_one(&mut source, &strokes);
        assert_eq!(cached_lens(&source), [12, 18, 24]);

        let mut layer = Layer::new(MockSurface::default());
        layer.strokes = strokes[..6].to_vec();
        layer.reconcile(false);
        assert_eq!(cached_lens(&layer), [6]);

        layer.adopt_caches_from(&source);
        // Own entry is most recent, oldest adopted dropped.
        assert_eq!(cached_lens(&layer), [18, 24, 6]);
        // Adopting again doesn't duplicate.
        layer.adopt_caches_from(&source);
        assert_eq!(cached_lens(&layer), [18, 24, 6]);
    }
    #[test]
    fn ties_prefer_earlier_strategies() {
        let settings = CacheSettings {
            snapshot_penalty: 6,
            ..CacheSettings::default()
        };
        let (ids, strokes) = studio(8);
        let mut source = Layer::with_settings(MockSurface::default(), settings);
        source.strokes = strokes[..6].to_vec();
        source.reconcile(false);

        // Continue from blank: 8. Cache: 2 + 6. Rebuild: 8.
        let mut layer = Layer::with_settings(MockSurface::default(), settings);
        layer.adopt_caches_from(&source);
        layer.strokes = strokes.clone();
        assert_eq!(
            layer.plan(),
            super::Plan {
                strategy: Strategy::Continue,
                cost: 8
            }
        );

        // Render something unrelated, so continuing is impossible. Cache: 2 + 6. Rebuild: 8.
        let mut layer = Layer::with_settings(MockSurface::default(), settings);
        layer.adopt_caches_from(&source);
        let mut scratch = MockSurface::default();
        layer.strokes = vec![scratch.record(&ids), scratch.record(&ids)];
        layer.reconcile(false);
        layer.strokes = strokes;
        assert_eq!(
            layer.plan(),
            super::Plan {
                strategy: Strategy::RestoreCache(0),
                cost: 8
            }
        );
    }
    #[test]
    fn copied_stroke_replays_with_new_settings() {
        let (ids, strokes) = studio(2);
        let mut copy = strokes[1].copy(&ids);
        copy.change_brush_settings("copied brush");

        let mut layer = Layer::new(MockSurface::default());
        layer.strokes = vec![strokes[0].clone(), copy.into()];
        layer.reconcile(false);
        assert!(matches!(
            &layer.surface().painted[..],
            [Painted::Events { settings: first, .. }, Painted::Events { settings: second, .. }]
                if first == "mock brush" && second == "copied brush"
        ));
        // The layer's own brush is untouched by replays.
        assert_eq!(layer.surface().brush().settings, "mock brush");
    }
    #[test]
    fn same_number_from_another_server() {
        let mut studio = MockSurface::default();
        let ours = vec![studio.record(&StrokeIdServer::new())];
        let theirs = vec![studio.record(&StrokeIdServer::new())];
        assert_eq!(ours[0].id().id(), theirs[0].id().id());
        assert_ne!(ours[0].events(), theirs[0].events());

        let mut layer = Layer::new(MockSurface::default());
        layer.strokes = ours;
        assert_eq!(layer.reconcile(false), 1);

        layer.strokes.clone_from(&theirs);
        assert_eq!(layer.count_strokes_from(layer.rendered()), None);
        assert_eq!(layer.reconcile(false), 1);
        assert_eq!(layer.surface().counters.replays, 2);
        assert_eq!(layer.surface().painted, expected(None, &theirs));
    }
    #[test]
    fn settings_and_surface_handoff() {
        let settings = CacheSettings {
            snapshot_penalty: 1,
            ..CacheSettings::default()
        };
        let (_, strokes) = studio(3);
        let mut layer = Layer::with_settings(MockSurface::default(), settings);
        assert_eq!(layer.settings(), &settings);
        assert_eq!(Layer::new(MockSurface::default()).settings(), &CacheSettings::default());

        layer.strokes.clone_from(&strokes);
        layer.reconcile(false);
        let surface = layer.into_surface();
        assert_eq!(surface.painted, expected(None, &strokes));
        assert_eq!(surface.counters.replays, 3);
    }
    #[test]
    fn live_strokes_are_not_replayed() {
        let ids = StrokeIdServer::new();
        let mut layer = Layer::new(MockSurface::default());
        for _ in 0..7 {
            let stroke =
                layer.record_stroke(crate::stroke::Stroke::new(&ids), MockSurface::scribble);
            assert!(stroke.is_finished());
            assert_eq!(layer.reconcile(false), 0);
        }
        assert_eq!(layer.surface().counters.replays, 0);
        assert_eq!(layer.strokes.len(), 7);
        assert!(layer
            .surface()
            .painted
            .iter()
            .all(|painted| matches!(painted, Painted::Live(_))));
        // Caching still happens.
        assert_eq!(cached_lens(&layer), [6]);

        // Pending edits are reconciled before recording on top.
        layer.strokes.truncate(2);
        let stroke =
            layer.record_stroke(crate::stroke::Stroke::new(&ids), MockSurface::scribble);
        assert_eq!(layer.rendered().len(), 3);
        assert!(std::sync::Arc::ptr_eq(&layer.strokes[2], &stroke));
        assert_eq!(layer.surface().counters.replays, 2);
    }
    #[test]
    #[should_panic(expected = "is not finished")]
    fn unfinished_stroke_in_history() {
        let (ids, _) = studio(0);
        let mut layer = Layer::new(MockSurface::default());
        layer.strokes.push(crate::stroke::Stroke::new(&ids).into());
        layer.reconcile(false);
    }
}
