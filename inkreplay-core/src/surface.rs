//! # Surface
//!
//! The pixel target a [`Layer`](crate::layer::Layer) renders into, and the background images it can be
//! initialized from.

/// A full-surface raster with snapshot support.
pub trait Surface {
    /// An immutable copy of the surface's pixels. Must be unaffected by later mutation of the surface,
    /// and restorable any number of times.
    ///
    /// Cloning should be cheap (shared ownership), as snapshots may be shared between layers.
    type Snapshot: Clone;
    /// Reset every pixel to transparent.
    fn clear(&mut self);
    /// Overwrite every pixel with the background image.
    fn load_background(&mut self, background: &Background);
    fn save_snapshot(&self) -> Self::Snapshot;
    /// Overwrite every pixel with the snapshot.
    fn load_snapshot(&mut self, snapshot: &Self::Snapshot);
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundError {
    #[error("expected {expected} pixels for the given size, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Non-premultiplied sRGBA8 image.
#[derive(Debug)]
pub struct BackgroundImage {
    size: [u32; 2],
    pixels: Box<[[u8; 4]]>,
}
impl BackgroundImage {
    #[must_use]
    pub fn size(&self) -> [u32; 2] {
        self.size
    }
    /// Row-major pixel data, `size[0] * size[1]` long.
    #[must_use]
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }
}

/// Shared handle to a background image.
///
/// Backgrounds compare by *identity*, never by content - two handles are equal only if one was cloned
/// from the other.
#[derive(Clone, Debug)]
pub struct Background(std::sync::Arc<BackgroundImage>);
impl Background {
    /// Wrap row-major pixel data of the given size.
    ///
    /// # Errors
    /// If the pixel count doesn't match the size.
    pub fn new(size: [u32; 2], pixels: Vec<[u8; 4]>) -> Result<Self, BackgroundError> {
        let expected = size[0] as usize * size[1] as usize;
        if pixels.len() != expected {
            return Err(BackgroundError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self(std::sync::Arc::new(BackgroundImage {
            size,
            pixels: pixels.into_boxed_slice(),
        })))
    }
    /// An image filled with one color.
    #[must_use]
    pub fn solid(size: [u32; 2], color: [u8; 4]) -> Self {
        let len = size[0] as usize * size[1] as usize;
        // Unwrap ok - length matches by construction.
        Self::new(size, vec![color; len]).unwrap()
    }
    #[must_use]
    pub fn image(&self) -> &BackgroundImage {
        &self.0
    }
}
impl PartialEq for Background {
    fn eq(&self, other: &Self) -> bool {
        std::sync::Arc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for Background {}
