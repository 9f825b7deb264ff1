// Settings - User preferences persisted as RON

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),

    #[error("RON parse error: {0}")]
    RonSpanned(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cue tones are skipped entirely while muted
    pub muted: bool,
    pub high_contrast: bool,
    /// Master tone volume (0.0 - 1.0)
    pub volume: f32,
    /// Duration given to newly added warm-up and stretch exercises
    pub default_exercise_duration: u32,
    /// Preferred output device name; the host default when absent
    pub output_device: Option<String>,
    /// Routine library location; the platform data directory when absent
    pub library_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            high_contrast: false,
            volume: 0.8,
            default_exercise_duration: 30,
            output_device: None,
            library_path: None,
        }
    }
}

impl Settings {
    /// `<config dir>/hiit_timer/settings.ron`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hiit_timer").join("settings.ron"))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = ron::from_str(&contents)?;
        Ok(settings.sanitized())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load from `path`, falling back to defaults when the file is missing
    /// or unreadable
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn sanitized(mut self) -> Self {
        self.volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            Self::default().volume
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.ron");

        let settings = Settings {
            muted: true,
            volume: 0.4,
            output_device: Some("Speakers".to_string()),
            ..Settings::default()
        };
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = ron::from_str("(muted: true)").unwrap();
        assert!(settings.muted);
        assert_eq!(settings.default_exercise_duration, 30);
    }

    #[test]
    fn test_load_or_default_on_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ron");
        std::fs::write(&path, "not ron at all {").unwrap();

        assert_eq!(Settings::load_or_default(&path), Settings::default());
        assert_eq!(
            Settings::load_or_default(dir.path().join("missing.ron")),
            Settings::default()
        );
    }

    #[test]
    fn test_volume_is_clamped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ron");
        std::fs::write(&path, "(volume: 3.0)").unwrap();

        assert_eq!(Settings::load(&path).unwrap().volume, 1.0);
    }
}
