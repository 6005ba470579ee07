//! # Document
//!
//! The context strokes are created in. A document owns the stroke ID server, so stroke identities are
//! unique per-document rather than per-process, along with the layers those strokes are painted on.

use crate::brush::StrokeRecorder;
use crate::layer::Layer;
use crate::settings::CacheSettings;
use crate::stroke::{Stroke, StrokeIdServer};
use crate::surface::Surface;

pub struct Document<S: Surface + StrokeRecorder> {
    /// Name of the document, shown to the user.
    pub name: String,
    strokes: StrokeIdServer,
    layers: Vec<Layer<S>>,
    settings: CacheSettings,
}
impl<S: Surface + StrokeRecorder> Document<S> {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_settings(name, CacheSettings::default())
    }
    /// New document whose layers all use these cache settings.
    #[must_use]
    pub fn with_settings(name: impl Into<String>, settings: CacheSettings) -> Self {
        Self {
            name: name.into(),
            strokes: StrokeIdServer::new(),
            layers: Vec::new(),
            settings,
        }
    }
    /// A fresh stroke, ready to record.
    #[must_use]
    pub fn new_stroke(&self) -> Stroke {
        Stroke::new(&self.strokes)
    }
    /// See [`Stroke::copy`].
    ///
    /// # Panics
    /// If `stroke` is not finished.
    #[must_use]
    pub fn copy_stroke(&self, stroke: &Stroke) -> Stroke {
        stroke.copy(&self.strokes)
    }
    /// Add an empty layer on top, painting into `surface` (assumed blank). Returns its index.
    pub fn add_layer(&mut self, surface: S) -> usize {
        self.layers.push(Layer::with_settings(surface, self.settings));
        self.layers.len() - 1
    }
    /// Add a layer on top showing the same history as the layer at `index`, painting into `surface`
    /// (assumed blank and compatible with the source's snapshots). Cached snapshots are shared, so the
    /// new layer can usually be reconciled without replaying the whole history.
    ///
    /// Returns the new index, or `None` if `index` is out of bounds.
    pub fn duplicate_layer(&mut self, index: usize, surface: S) -> Option<usize> {
        let source = self.layers.get(index)?;
        let mut layer = Layer::with_settings(surface, self.settings);
        layer.strokes.clone_from(&source.strokes);
        layer.background.clone_from(&source.background);
        layer.adopt_caches_from(source);
        self.layers.push(layer);
        Some(self.layers.len() - 1)
    }
    #[must_use]
    pub fn layer(&self, index: usize) -> Option<&Layer<S>> {
        self.layers.get(index)
    }
    #[must_use]
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer<S>> {
        self.layers.get_mut(index)
    }
    /// Layers, bottom to top.
    #[must_use]
    pub fn layers(&self) -> &[Layer<S>] {
        &self.layers
    }
    /// [`Layer::reconcile`] every layer, returning the total cost.
    pub fn reconcile_all(&mut self, estimate_only: bool) -> usize {
        self.layers
            .iter_mut()
            .map(|layer| layer.reconcile(estimate_only))
            .fold(0, usize::saturating_add)
    }
}

#[cfg(test)]
mod test {
    use super::Document;
    use crate::layer::Strategy;
    use crate::test_util::MockSurface;

    #[test]
    fn strokes_unique_per_document() {
        let a = Document::<MockSurface>::new("a");
        let b = Document::<MockSurface>::new("b");
        let first = a.new_stroke();
        let second = a.new_stroke();
        assert!(first.id() < second.id());
        // Independent servers.
        assert_eq!(b.new_stroke().id(), first.id());
    }
    #[test]
    fn copy_gets_fresh_id() {
        let document = Document::<MockSurface>::new("doc");
        let mut studio = MockSurface::default();
        let mut stroke = document.new_stroke();
        stroke.start_recording(&mut studio);
        studio.scribble();
        stroke.stop_recording(&mut studio);

        let copy = document.copy_stroke(&stroke);
        assert!(copy.id() > stroke.id());
    }
    #[test]
    fn duplicate_shares_caches() {
        let mut document = Document::<MockSurface>::new("doc");
        let mut studio = MockSurface::default();
        let strokes: Vec<_> = (0..7)
            .map(|_| {
                let mut stroke = document.new_stroke();
                stroke.start_recording(&mut studio);
                studio.scribble();
                stroke.stop_recording(&mut studio);
                std::sync::Arc::new(stroke)
            })
            .collect();

        let base = document.add_layer(MockSurface::default());
        document.layer_mut(base).unwrap().strokes = strokes[..6].to_vec();
        assert_eq!(document.reconcile_all(false), 6);

        let copy = document.duplicate_layer(base, MockSurface::default()).unwrap();
        assert!(document.duplicate_layer(99, MockSurface::default()).is_none());
        document.layer_mut(copy).unwrap().strokes.push(strokes[6].clone());

        let layer = document.layer(copy).unwrap();
        // Cache at 6, + 1 stroke.
        assert_eq!(layer.plan().strategy, Strategy::RestoreCache(0));
        assert_eq!(document.reconcile_all(true), 4);
        assert_eq!(document.reconcile_all(false), 4);
        assert_eq!(document.reconcile_all(false), 0);
        assert_eq!(document.layers().len(), 2);
        assert_eq!(document.layer(copy).unwrap().surface().counters.replays, 1);
    }
}
