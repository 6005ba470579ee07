//! Bookkeeping collaborators for tests. Pixels are modeled as the list of things painted, so
//! the exact history a surface reflects (and how it got there) is observable.

use crate::brush::{Brush, BrushState, EventData, StrokeRecorder};
use crate::stroke::{Stroke, StrokeIdServer, StrokeRef};
use crate::surface::{Background, Surface};
use crate::util::Rect;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Painted {
    Background(Background),
    /// Painted live, while recording.
    Live(u64),
    /// Replayed events, with the brush that was active at the time.
    Events {
        events: EventData,
        settings: String,
        seed: u32,
    },
}

#[derive(Debug, PartialEq)]
pub(crate) struct MockBrush {
    pub settings: String,
    pub state: BrushState,
    pub seed: Option<u32>,
    pub bbox: Rect,
}
impl Default for MockBrush {
    fn default() -> Self {
        Self {
            settings: "mock brush".to_owned(),
            state: BrushState::default(),
            seed: None,
            bbox: Rect::EMPTY,
        }
    }
}
impl Brush for MockBrush {
    fn save_configuration(&self) -> String {
        self.settings.clone()
    }
    fn load_configuration(&mut self, configuration: &str) {
        configuration.clone_into(&mut self.settings);
    }
    fn procedural_state(&self) -> BrushState {
        self.state.clone()
    }
    fn set_procedural_state(&mut self, state: &BrushState) {
        self.state = state.clone();
    }
    fn seed_random(&mut self, seed: u32) {
        self.seed = Some(seed);
    }
    fn stroke_bounding_box(&self) -> Rect {
        self.bbox
    }
    fn stroke_total_painting_time(&self) -> std::time::Duration {
        std::time::Duration::from_millis(10)
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Counters {
    pub clears: usize,
    pub background_loads: usize,
    pub snapshot_loads: usize,
    pub replays: usize,
}

#[derive(Default, Debug)]
pub(crate) struct MockSurface {
    pub painted: Vec<Painted>,
    pub counters: Counters,
    brush: MockBrush,
    recording: Option<Vec<u8>>,
    next_token: u64,
    /// Every snapshot ever handed out.
    snapshots: std::cell::RefCell<Vec<std::sync::Weak<Vec<Painted>>>>,
}
impl MockSurface {
    pub fn snapshot_saves(&self) -> usize {
        self.snapshots.borrow().len()
    }
    /// Snapshots handed out which haven't been dropped yet.
    pub fn live_snapshots(&self) -> usize {
        self.snapshots
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
    /// Paint something unique with the active brush, recording it if a recording is active.
    pub fn scribble(&mut self) {
        self.next_token += 1;
        let token = self.next_token;
        if let Some(recording) = &mut self.recording {
            recording.extend_from_slice(&token.to_le_bytes());
        }
        self.painted.push(Painted::Live(token));
        self.brush.bbox = Rect::new(0, 0, 4, 4);
    }
    /// Record a finished stroke on this surface.
    pub fn record(&mut self, ids: &StrokeIdServer) -> StrokeRef {
        let mut stroke = Stroke::new(ids);
        stroke.start_recording(self);
        self.scribble();
        stroke.stop_recording(self);
        stroke.into()
    }
    /// Record many finished strokes.
    pub fn record_many(&mut self, ids: &StrokeIdServer, count: usize) -> Vec<StrokeRef> {
        (0..count).map(|_| self.record(ids)).collect()
    }
}
impl Surface for MockSurface {
    type Snapshot = std::sync::Arc<Vec<Painted>>;
    fn clear(&mut self) {
        self.counters.clears += 1;
        self.painted.clear();
    }
    fn load_background(&mut self, background: &Background) {
        self.counters.background_loads += 1;
        self.painted.clear();
        self.painted.push(Painted::Background(background.clone()));
    }
    fn save_snapshot(&self) -> Self::Snapshot {
        let snapshot = std::sync::Arc::new(self.painted.clone());
        self.snapshots
            .borrow_mut()
            .push(std::sync::Arc::downgrade(&snapshot));
        snapshot
    }
    fn load_snapshot(&mut self, snapshot: &Self::Snapshot) {
        self.counters.snapshot_loads += 1;
        self.painted.clone_from(&**snapshot);
    }
}
impl StrokeRecorder for MockSurface {
    type Brush = MockBrush;
    fn brush(&self) -> &Self::Brush {
        &self.brush
    }
    fn brush_mut(&mut self) -> &mut Self::Brush {
        &mut self.brush
    }
    fn set_brush(&mut self, brush: Self::Brush) -> Self::Brush {
        std::mem::replace(&mut self.brush, brush)
    }
    fn start_recording(&mut self) {
        self.recording = Some(Vec::new());
    }
    fn stop_recording(&mut self) -> EventData {
        self.recording.take().unwrap_or_default().into()
    }
    fn replay(&mut self, events: &EventData) {
        self.counters.replays += 1;
        self.painted.push(Painted::Events {
            events: events.clone(),
            settings: self.brush.settings.clone(),
            seed: self.brush.seed.unwrap_or_default(),
        });
    }
}
