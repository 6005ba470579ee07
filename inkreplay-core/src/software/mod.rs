//! # Software
//!
//! A plain CPU raster implementing [`Surface`] and [`StrokeRecorder`], painted with a [`DabBrush`].
//! Slow, but simple and fully deterministic, which makes it useful for tests and offline rendering.

pub mod dab;

pub use dab::{DabBrush, DabSettings, EventDataError, MotionEvent};

use crate::brush::{EventData, StrokeRecorder};
use crate::surface::{Background, Surface};

/// Immutable copy of a [`SoftwareSurface`]'s pixels.
pub type SoftwareSnapshot = std::sync::Arc<[[u8; 4]]>;

/// Non-premultiplied sRGBA8 raster, row-major.
pub struct SoftwareSurface {
    size: [u32; 2],
    pixels: Vec<[u8; 4]>,
    brush: DabBrush,
    /// Events received since recording started, if recording.
    recording: Option<Vec<MotionEvent>>,
}
impl SoftwareSurface {
    /// A fully transparent surface.
    #[must_use]
    pub fn new(size: [u32; 2]) -> Self {
        Self {
            size,
            pixels: vec![[0; 4]; size[0] as usize * size[1] as usize],
            brush: DabBrush::default(),
            recording: None,
        }
    }
    #[must_use]
    pub fn size(&self) -> [u32; 2] {
        self.size
    }
    #[must_use]
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }
    /// Row-major RGBA8 bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size[0] || y >= self.size[1] {
            return None;
        }
        self.pixels
            .get(y as usize * self.size[0] as usize + x as usize)
            .copied()
    }
    /// Feed an input event through the active brush, painting it. Recorded, if a recording is active.
    pub fn motion(&mut self, event: MotionEvent) {
        if let Some(recording) = &mut self.recording {
            recording.push(event);
        }
        self.paint(event);
    }
    fn paint(&mut self, event: MotionEvent) {
        for dab in self.brush.advance(event) {
            self.stamp(&dab);
        }
    }
    fn stamp(&mut self, dab: &dab::Dab) {
        let [width, height] = self.size;
        let [cx, cy] = dab.center;
        let radius = dab.radius;
        if !(radius > 0.0) {
            return;
        }
        // Clamped to the surface. NaN clamps and casts to zero, an empty range.
        let min_x = (cx - radius).floor().clamp(0.0, width as f32) as u32;
        let max_x = (cx + radius).ceil().clamp(0.0, width as f32) as u32;
        let min_y = (cy - radius).floor().clamp(0.0, height as f32) as u32;
        let max_y = (cy + radius).ceil().clamp(0.0, height as f32) as u32;

        let radius_sq = radius * radius;
        for y in min_y..max_y {
            let dy = y as f32 + 0.5 - cy;
            let row = y as usize * width as usize;
            for x in min_x..max_x {
                let dx = x as f32 + 0.5 - cx;
                if dx * dx + dy * dy > radius_sq {
                    continue;
                }
                let pixel = &mut self.pixels[row + x as usize];
                *pixel = blend_over(*pixel, dab.color);
            }
        }
    }
}

/// Non-premultiplied source-over.
fn blend_over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let src_alpha = u32::from(src[3]);
    let dst_alpha = u32::from(dst[3]) * (255 - src_alpha) / 255;
    let alpha = src_alpha + dst_alpha;
    if alpha == 0 {
        return [0; 4];
    }
    let channel = |c: usize| {
        // Weighted mean of two u8s, fits in a u8.
        ((u32::from(src[c]) * src_alpha + u32::from(dst[c]) * dst_alpha) / alpha) as u8
    };
    [channel(0), channel(1), channel(2), alpha as u8]
}

impl Surface for SoftwareSurface {
    type Snapshot = SoftwareSnapshot;
    fn clear(&mut self) {
        self.pixels.fill([0; 4]);
    }
    /// Copies the overlapping region, anything outside the image is transparent.
    fn load_background(&mut self, background: &Background) {
        self.clear();
        let image = background.image();
        let [image_width, image_height] = image.size();
        let copy_width = image_width.min(self.size[0]) as usize;
        let copy_height = image_height.min(self.size[1]) as usize;
        if copy_width == 0 {
            return;
        }
        if image.size() != self.size {
            log::debug!(
                "background is {:?}, surface is {:?}. Copying the overlap.",
                image.size(),
                self.size
            );
        }
        for (dst_row, src_row) in self
            .pixels
            .chunks_exact_mut(self.size[0] as usize)
            .zip(image.pixels().chunks_exact(image_width as usize))
            .take(copy_height)
        {
            dst_row[..copy_width].copy_from_slice(&src_row[..copy_width]);
        }
    }
    fn save_snapshot(&self) -> Self::Snapshot {
        self.pixels.as_slice().into()
    }
    /// # Panics
    /// If the snapshot was taken from a surface of a different size.
    fn load_snapshot(&mut self, snapshot: &Self::Snapshot) {
        assert_eq!(
            snapshot.len(),
            self.pixels.len(),
            "snapshot from a surface of a different size"
        );
        self.pixels.copy_from_slice(snapshot);
    }
}
impl StrokeRecorder for SoftwareSurface {
    type Brush = DabBrush;
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
        if self.recording.is_some() {
            log::warn!("recording restarted, discarding previous events");
        }
        self.recording = Some(Vec::new());
    }
    fn stop_recording(&mut self) -> EventData {
        let events = self.recording.take().unwrap_or_default();
        dab::encode_events(&events)
    }
    fn replay(&mut self, events: &EventData) {
        match dab::decode_events(events) {
            Ok(events) => {
                for event in events {
                    self.paint(event);
                }
            }
            Err(e) => log::warn!("skipping replay: {e}"),
        }
    }
}
