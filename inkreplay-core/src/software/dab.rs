//! A minimal brush, which stamps round dabs at regular spacing along the pen's path.

use crate::brush::{Brush, BrushState, EventData};
use crate::util::Rect;
use rand::{Rng, SeedableRng};

/// Dabs closer than this (in pixels) are never placed, no matter the settings.
const MIN_SPACING: f32 = 0.5;
/// Segments needing more dabs than this are not filled in. The pen jumps, as if lifted.
const MAX_SEGMENT_DABS: usize = 1 << 16;

/// One input sample.
#[derive(Clone, Copy, Debug, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct MotionEvent {
    pub position: [f32; 2],
    /// Normalized pressure. Zero or less is pen-up.
    pub pressure: f32,
    /// Seconds since the previous event.
    pub dtime: f32,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDataError {
    #[error("event data of {0} bytes is not a whole number of events")]
    Truncated(usize),
}

/// Pack events into an opaque blob.
#[must_use]
pub fn encode_events(events: &[MotionEvent]) -> EventData {
    EventData(bytemuck::cast_slice::<_, u8>(events).into())
}
/// Unpack events from a blob made by [`encode_events`].
///
/// # Errors
/// If the data is not a whole number of events.
pub fn decode_events(data: &EventData) -> Result<Vec<MotionEvent>, EventDataError> {
    const SIZE: usize = std::mem::size_of::<MotionEvent>();
    let bytes = data.bytes();
    if bytes.len() % SIZE != 0 {
        return Err(EventDataError::Truncated(bytes.len()));
    }
    // The blob has no alignment guarantees.
    Ok(bytes
        .chunks_exact(SIZE)
        .map(bytemuck::pod_read_unaligned)
        .collect())
}

/// Configuration of a [`DabBrush`]. Saved as TOML.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DabSettings {
    /// Radius at full pressure, in pixels.
    pub radius: f32,
    /// Non-premultiplied sRGBA.
    pub color: [u8; 4],
    /// Distance between dabs, as a fraction of `radius`.
    pub spacing: f32,
    /// Maximum random offset of each dab, as a fraction of `radius`.
    pub jitter: f32,
}
impl Default for DabSettings {
    fn default() -> Self {
        Self {
            radius: 4.0,
            color: [0, 0, 0, 255],
            spacing: 0.5,
            jitter: 0.0,
        }
    }
}

/// A single stamp of the brush.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dab {
    pub center: [f32; 2],
    pub radius: f32,
    pub color: [u8; 4],
}

pub struct DabBrush {
    settings: DabSettings,
    rng: rand::rngs::StdRng,
    // Procedural state
    /// Last pen-down position, `None` if the pen is up.
    last: Option<[f32; 2]>,
    /// Distance travelled since the last dab.
    since_dab: f32,
    // Stroke accumulators
    bbox: Rect,
    painting_time: std::time::Duration,
}
impl Default for DabBrush {
    fn default() -> Self {
        Self::new(DabSettings::default())
    }
}
impl DabBrush {
    #[must_use]
    pub fn new(settings: DabSettings) -> Self {
        Self {
            settings,
            rng: rand::rngs::StdRng::seed_from_u64(0),
            last: None,
            since_dab: 0.0,
            bbox: Rect::EMPTY,
            painting_time: std::time::Duration::ZERO,
        }
    }
    #[must_use]
    pub fn settings(&self) -> &DabSettings {
        &self.settings
    }
    pub fn set_settings(&mut self, settings: DabSettings) {
        self.settings = settings;
    }
    /// Reset the stroke accumulators (bbox and painting time). Call before recording a new stroke.
    pub fn split_stroke(&mut self) {
        self.bbox = Rect::EMPTY;
        self.painting_time = std::time::Duration::ZERO;
    }
    /// Move the pen to `event`, returning the dabs to stamp along the way.
    pub fn advance(&mut self, event: MotionEvent) -> smallvec::SmallVec<[Dab; 8]> {
        let mut dabs = smallvec::SmallVec::new();
        // Written this way to treat NaN as pen-up too.
        if !(event.pressure > 0.0) || !event.position.iter().all(|v| v.is_finite()) {
            self.last = None;
            self.since_dab = 0.0;
            return dabs;
        }
        self.painting_time +=
            std::time::Duration::try_from_secs_f32(event.dtime).unwrap_or_default();

        let radius = self.settings.radius * event.pressure.min(1.0);
        let step = (self.settings.radius * self.settings.spacing).max(MIN_SPACING);
        let to = event.position;
        let Some(from) = self.last else {
            dabs.push(self.dab(to, radius));
            self.since_dab = 0.0;
            self.last = Some(to);
            return dabs;
        };
        let delta = [to[0] - from[0], to[1] - from[1]];
        // May be infinite, for finite but far apart points.
        let len = delta[0].hypot(delta[1]);
        // Distance along this segment of the first dab. Always > 0, as `since_dab < step`.
        let first = step - self.since_dab;
        if !(len >= first) {
            self.since_dab += len;
        } else {
            // Dabs after the first.
            let more = ((len - first) / step).floor();
            if more < MAX_SEGMENT_DABS as f32 {
                let dir = [delta[0] / len, delta[1] / len];
                // Whole steps from the first dab, so positions never accumulate error.
                for k in 0..=(more as usize) {
                    let along = first + step * k as f32;
                    let center = [from[0] + dir[0] * along, from[1] + dir[1] * along];
                    dabs.push(self.dab(center, radius));
                }
                self.since_dab = (len - (first + step * more)).clamp(0.0, step);
            } else {
                log::warn!("pen jumped {len}px, not filling the gap");
                dabs.push(self.dab(to, radius));
                self.since_dab = 0.0;
            }
        }
        self.last = Some(to);
        dabs
    }
    fn dab(&mut self, center: [f32; 2], radius: f32) -> Dab {
        // Always draw, so the random sequence doesn't depend on settings.
        let offset: [f32; 2] = [
            self.rng.gen_range(-1.0..=1.0),
            self.rng.gen_range(-1.0..=1.0),
        ];
        let jitter = self.settings.jitter * self.settings.radius;
        let center = [center[0] + offset[0] * jitter, center[1] + offset[1] * jitter];

        let touched = Rect::from_min_max(
            [
                (center[0] - radius).floor() as i32,
                (center[1] - radius).floor() as i32,
            ],
            [
                (center[0] + radius).ceil() as i32,
                (center[1] + radius).ceil() as i32,
            ],
        );
        self.bbox = self.bbox.union(touched);

        Dab {
            center,
            radius,
            color: self.settings.color,
        }
    }
}
impl Brush for DabBrush {
    fn save_configuration(&self) -> String {
        match toml::to_string(&self.settings) {
            Ok(string) => string,
            Err(e) => {
                log::warn!("failed to save brush settings: {e}");
                String::new()
            }
        }
    }
    fn load_configuration(&mut self, configuration: &str) {
        self.settings = toml::from_str(configuration).unwrap_or_else(|e| {
            log::warn!("bad brush settings, using defaults: {e}");
            DabSettings::default()
        });
    }
    fn procedural_state(&self) -> BrushState {
        let [has_last, x, y] = match self.last {
            Some([x, y]) => [1.0, x, y],
            None => [0.0; 3],
        };
        BrushState::new(&[has_last, x, y, self.since_dab])
    }
    fn set_procedural_state(&mut self, state: &BrushState) {
        match *state.values() {
            [has_last, x, y, since_dab] => {
                self.last = (has_last != 0.0).then_some([x, y]);
                self.since_dab = if since_dab.is_finite() { since_dab.max(0.0) } else { 0.0 };
            }
            [] => {
                self.last = None;
                self.since_dab = 0.0;
            }
            _ => {
                log::warn!("unrecognized brush state of {} values", state.values().len());
                self.last = None;
                self.since_dab = 0.0;
            }
        }
    }
    fn seed_random(&mut self, seed: u32) {
        self.rng = rand::rngs::StdRng::seed_from_u64(seed.into());
    }
    fn stroke_bounding_box(&self) -> Rect {
        self.bbox
    }
    fn stroke_total_painting_time(&self) -> std::time::Duration {
        self.painting_time
    }
}
