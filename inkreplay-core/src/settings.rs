//! # Settings
//!
//! Tuning for the [`Layer`](crate::layer::Layer) snapshot cache. All costs are in "stroke replays".

use std::num::NonZeroUsize;

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Write(#[from] toml::ser::Error),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Minimum distance, in strokes, between two cached snapshots of the same history.
    /// Also the minimum length of history worth caching at all.
    pub strokes_to_cache: NonZeroUsize,
    /// Most snapshots held per layer at once.
    pub max_caches: NonZeroUsize,
    /// Cost of loading a full-surface snapshot or background image, relative to replaying one stroke.
    pub snapshot_penalty: usize,
}
impl CacheSettings {
    // Unwraps are const-evaluated.
    pub const DEFAULT_STROKES_TO_CACHE: NonZeroUsize = match NonZeroUsize::new(6) {
        Some(n) => n,
        None => unreachable!(),
    };
    pub const DEFAULT_MAX_CACHES: NonZeroUsize = match NonZeroUsize::new(3) {
        Some(n) => n,
        None => unreachable!(),
    };
    pub const DEFAULT_SNAPSHOT_PENALTY: usize = 3;

    /// Parse from a TOML document. Missing fields take their defaults.
    ///
    /// # Errors
    /// On malformed TOML, unknown types, or zero values for the non-zero fields.
    pub fn from_toml(string: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(string)?)
    }
    /// # Errors
    /// Not expected in practice, all fields are representable.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::ser::to_string_pretty(self)?)
    }
}
impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            strokes_to_cache: Self::DEFAULT_STROKES_TO_CACHE,
            max_caches: Self::DEFAULT_MAX_CACHES,
            snapshot_penalty: Self::DEFAULT_SNAPSHOT_PENALTY,
        }
    }
}
