//! # Strokes
//!
//! A stroke is one recorded paint gesture, plus everything needed to paint it again pixel-for-pixel:
//! the brush configuration, the brush's procedural state at the start, and the random seed.
//!
//! Strokes are immutable once finished, except that a freshly [copied](Stroke::copy) stroke may have its
//! brush settings swapped once before it is first rendered. Layers compare strokes by identity (the same
//! shared [`StrokeRef`]) only, which is what makes caching rendered prefixes of a stroke history sound.

use crate::brush::{Brush, BrushState, EventData, StrokeRecorder};
use crate::id::IdServer;
use crate::util::Rect;

pub type StrokeID = crate::id::SerialID<Stroke>;
pub type StrokeIdServer = IdServer<Stroke>;
/// Strokes are shared between layer histories and caches.
pub type StrokeRef = std::sync::Arc<Stroke>;

/// Upper bound (exclusive) of recorded seeds.
const SEED_RANGE: u32 = 0x10000;

/// Brush info captured when recording starts.
#[derive(Clone, Debug)]
struct Setup {
    brush_settings: std::sync::Arc<str>,
    brush_state: BrushState,
    seed: u32,
}
/// Results captured when recording stops.
#[derive(Clone, Debug)]
struct Take {
    events: EventData,
    bbox: Rect,
    total_painting_time: std::time::Duration,
}
#[derive(Clone, Debug)]
enum Phase {
    Fresh,
    Recording(Setup),
    Finished(Setup, Take),
}

#[derive(Debug)]
pub struct Stroke {
    id: StrokeID,
    phase: Phase,
    /// Has this stroke's data ever been painted? Only used for assertions.
    rendered: std::sync::atomic::AtomicBool,
}
impl Stroke {
    /// Create an empty stroke, ready to record.
    #[must_use]
    pub fn new(ids: &StrokeIdServer) -> Self {
        Self {
            id: ids.allocate(),
            phase: Phase::Fresh,
            rendered: false.into(),
        }
    }
    #[must_use]
    pub fn id(&self) -> StrokeID {
        self.id
    }
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(..))
    }
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.rendered.load(std::sync::atomic::Ordering::Relaxed)
    }
    /// Begin recording events from the recorder's active brush.
    ///
    /// The brush's stroke accumulators (bbox, painting time) are expected to have just been reset.
    /// Nothing bad happens if not, but the recorded bbox and time will include earlier work.
    ///
    /// # Panics
    /// If the stroke has already been recorded or is recording.
    pub fn start_recording<R: StrokeRecorder>(&mut self, recorder: &mut R) {
        assert!(
            matches!(self.phase, Phase::Fresh),
            "{} already recorded",
            self.id
        );
        let brush = recorder.brush_mut();
        let brush_settings = brush.save_configuration().into();
        let brush_state = brush.procedural_state();
        let seed = rand::Rng::gen_range(&mut rand::thread_rng(), 0..SEED_RANGE);
        brush.seed_random(seed);

        recorder.start_recording();
        self.phase = Phase::Recording(Setup {
            brush_settings,
            brush_state,
            seed,
        });
        // Painted live while recording.
        self.rendered
            .store(true, std::sync::atomic::Ordering::Relaxed);
    }
    /// Finish recording. Afterwards the stroke is immutable.
    ///
    /// # Panics
    /// If the stroke is not recording.
    pub fn stop_recording<R: StrokeRecorder>(&mut self, recorder: &mut R) {
        let Phase::Recording(setup) = std::mem::replace(&mut self.phase, Phase::Fresh) else {
            panic!("{} is not recording", self.id);
        };
        let events = recorder.stop_recording();
        let brush = recorder.brush();
        let take = Take {
            events,
            bbox: brush.stroke_bounding_box(),
            total_painting_time: brush.stroke_total_painting_time(),
        };
        log::trace!(
            "{} recorded {} bytes ({:.2}s painting)",
            self.id,
            take.events.len(),
            take.total_painting_time.as_secs_f32()
        );
        self.phase = Phase::Finished(setup, take);
    }
    /// Paint this stroke onto `target`, using a throwaway brush configured exactly as it was when
    /// recording started. The target's own brush is restored afterwards.
    ///
    /// Deterministic: painting onto identical pixels gives identical pixels.
    ///
    /// # Panics
    /// If the stroke is not finished.
    pub fn render<R: StrokeRecorder>(&self, target: &mut R) {
        let (setup, take) = self.finished();

        let mut brush = R::Brush::default();
        brush.load_configuration(&setup.brush_settings);
        brush.set_procedural_state(&setup.brush_state);
        brush.seed_random(setup.seed);

        let original = target.set_brush(brush);
        target.replay(&take.events);
        let _ = target.set_brush(original);

        self.rendered
            .store(true, std::sync::atomic::Ordering::Relaxed);
    }
    /// Make a new stroke with a fresh ID, sharing all recorded data.
    ///
    /// The copy has never been rendered, so it accepts one [`Stroke::change_brush_settings`].
    ///
    /// # Panics
    /// If the stroke is not finished.
    #[must_use]
    pub fn copy(&self, ids: &StrokeIdServer) -> Self {
        let (setup, take) = self.finished();
        Self {
            id: ids.allocate(),
            phase: Phase::Finished(setup.clone(), take.clone()),
            rendered: false.into(),
        }
    }
    /// Replace the brush configuration used to render this stroke.
    ///
    /// The recorded brush state is kept as-is. If the new brush interprets those states differently
    /// (another custom state, inputs filtered differently...) the replay may look a bit off.
    ///
    /// # Panics
    /// If the stroke is not finished, or has ever been rendered.
    pub fn change_brush_settings(&mut self, brush_settings: impl Into<std::sync::Arc<str>>) {
        assert!(
            !self.is_rendered(),
            "{} already rendered, settings are frozen",
            self.id
        );
        let Phase::Finished(setup, _) = &mut self.phase else {
            panic!("{} is not finished", self.id);
        };
        setup.brush_settings = brush_settings.into();
    }

    /// # Panics
    /// If the stroke is not finished.
    #[must_use]
    pub fn brush_settings(&self) -> &str {
        &self.finished().0.brush_settings
    }
    /// # Panics
    /// If the stroke is not finished.
    #[must_use]
    pub fn brush_state(&self) -> &BrushState {
        &self.finished().0.brush_state
    }
    /// # Panics
    /// If the stroke is not finished.
    #[must_use]
    pub fn seed(&self) -> u32 {
        self.finished().0.seed
    }
    /// # Panics
    /// If the stroke is not finished.
    #[must_use]
    pub fn events(&self) -> &EventData {
        &self.finished().1.events
    }
    /// # Panics
    /// If the stroke is not finished.
    #[must_use]
    pub fn bbox(&self) -> Rect {
        self.finished().1.bbox
    }
    /// True if the stroke touched no pixels.
    ///
    /// # Panics
    /// If the stroke is not finished.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bbox().is_empty()
    }
    /// # Panics
    /// If the stroke is not finished.
    #[must_use]
    pub fn total_painting_time(&self) -> std::time::Duration {
        self.finished().1.total_painting_time
    }

    fn finished(&self) -> (&Setup, &Take) {
        match &self.phase {
            Phase::Finished(setup, take) => (setup, take),
            _ => panic!("{} is not finished", self.id),
        }
    }
}

/// Compare two stroke histories by identity: the same stroke objects, in the same order.
///
/// IDs are not enough, as strokes from different servers may share a number.
#[must_use]
pub fn same_history(a: &[StrokeRef], b: &[StrokeRef]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| std::sync::Arc::ptr_eq(a, b))
}
