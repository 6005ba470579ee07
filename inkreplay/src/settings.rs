use inkreplay_core::software::DabSettings;
use inkreplay_core::CacheSettings;

const DOCUMENTATION: &str = r#"# Inkreplay preferences. You may edit this file, but be aware that formatting and comments will not
# be preserved. Missing keys take their defaults.

# [cache] tunes layer snapshots, all costs are in stroke replays:
#   strokes_to_cache - minimum strokes between two snapshots. Must be at least 1.
#   max_caches       - snapshots kept per layer. Must be at least 1.
#   snapshot_penalty - cost of loading a snapshot or background.
# [brush] is the brush new strokes are recorded with.

"#;

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Surface size, in pixels.
    pub size: [u32; 2],
    pub cache: CacheSettings,
    pub brush: DabSettings,
    #[serde(skip)]
    failed_to_load: bool,
}
impl Default for Preferences {
    fn default() -> Self {
        Self {
            size: [256, 256],
            cache: CacheSettings::default(),
            brush: DabSettings::default(),
            failed_to_load: false,
        }
    }
}
impl Preferences {
    const FILENAME: &'static str = "inkreplay.toml";
    /// Load from the user's preferences, or defaults if unavailable for any reason.
    #[must_use]
    pub fn load() -> Self {
        let mut dir = preferences_dir();
        match dir.as_mut() {
            None => Self::no_path(),
            Some(dir) => {
                dir.push(Self::FILENAME);
                Self::load_or_default(dir)
            }
        }
    }
    #[must_use]
    fn no_path() -> Self {
        log::warn!("Preferences weren't available, defaulting.");
        Self {
            failed_to_load: true,
            ..Self::default()
        }
    }
    #[must_use]
    fn load_or_default(path: &std::path::Path) -> Self {
        let preferences: anyhow::Result<Self> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            let preferences : Self = toml::from_str(&string)?;

            Ok(preferences)
        };

        match preferences {
            Ok(preferences) => preferences,
            Err(e) => {
                log::debug!("reading {path:?}: {e:#}");
                Self::no_path()
            }
        }
    }
    /// Return true if loading user's settings failed, in which case saving writes the defaults
    /// out for the user to edit.
    #[must_use]
    pub fn did_fail_to_load(&self) -> bool {
        self.failed_to_load
    }
    pub fn save(&self) -> anyhow::Result<()> {
        let mut preferences =
            preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        // Explicity do *not* create recursively. If not found, the user probably has a good reason.
        // Ignore errors (could already exist). Any real errors will be emitted by file access below.
        let _ = std::fs::DirBuilder::new().create(&preferences);

        preferences.push(Self::FILENAME);
        let mut string = toml::ser::to_string_pretty(self)?;
        // Prefix some documentation.
        string = DOCUMENTATION.to_owned() + &string;
        std::fs::write(preferences, string)?;
        Ok(())
    }
}
