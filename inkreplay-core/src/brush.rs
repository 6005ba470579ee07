//! # Brush
//!
//! Interfaces to the brush engine and the event recorder that drives it. The engine itself is opaque to
//! this crate: strokes only need to save and restore its configuration and procedural state, seed its
//! randomness, and replay recorded events through it. See [`crate::software`] for a reference implementation.

use crate::util::Rect;

/// Snapshot of a brush's procedural state (smoothed inputs, last dab position, etc.)
///
/// Interpretation is entirely up to the brush. Cheap to clone.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct BrushState(pub std::sync::Arc<[f32]>);
impl BrushState {
    #[must_use]
    pub fn new(values: &[f32]) -> Self {
        Self(values.into())
    }
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.0
    }
}

/// An opaque recording of input events, as produced by [`StrokeRecorder::stop_recording`]. Cheap to clone.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct EventData(pub std::sync::Arc<[u8]>);
impl EventData {
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl From<Vec<u8>> for EventData {
    fn from(value: Vec<u8>) -> Self {
        Self(value.into())
    }
}

/// A brush engine instance.
///
/// `Default` must construct a blank "throwaway" brush, which is fully determined by a subsequent
/// [`Brush::load_configuration`], [`Brush::set_procedural_state`], and [`Brush::seed_random`].
pub trait Brush: Default {
    /// Serialize the brush's configuration.
    fn save_configuration(&self) -> String;
    /// Replace the brush's configuration. Strings not produced by [`Brush::save_configuration`] of
    /// the same brush type may be rejected, in which case the brush should fall back to defaults.
    fn load_configuration(&mut self, configuration: &str);
    fn procedural_state(&self) -> BrushState;
    fn set_procedural_state(&mut self, state: &BrushState);
    /// Re-seed the brush's pseudo-random generator. Identical seeds must produce identical sequences.
    fn seed_random(&mut self, seed: u32);
    /// Pixels touched since the stroke accumulators were last reset.
    fn stroke_bounding_box(&self) -> Rect;
    /// Time spent painting (pen down) since the stroke accumulators were last reset.
    fn stroke_total_painting_time(&self) -> std::time::Duration;
}

/// A raster target which owns an active brush, can record the input events fed through it,
/// and can replay such a recording.
pub trait StrokeRecorder {
    type Brush: Brush;
    fn brush(&self) -> &Self::Brush;
    fn brush_mut(&mut self) -> &mut Self::Brush;
    /// Swap the active brush, returning the previous one.
    fn set_brush(&mut self, brush: Self::Brush) -> Self::Brush;
    /// Begin capturing events. Events are still painted as they arrive.
    fn start_recording(&mut self);
    /// End capturing, returning everything captured since [`StrokeRecorder::start_recording`].
    fn stop_recording(&mut self) -> EventData;
    /// Feed recorded events through the active brush, painting them. Replayed events are not recorded.
    fn replay(&mut self, events: &EventData);
}
