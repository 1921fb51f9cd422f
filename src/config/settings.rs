//! Configuration settings for breathe.
//!
//! Settings are loaded from `~/.breathe/config.yaml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::error::BreatheError;
use crate::technique::Catalog;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Session settings.
    pub session: SessionConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorSetting {
    /// Apply this setting to `colored` output.
    pub fn apply(self) {
        match self {
            Self::Auto => colored::control::unset_override(),
            Self::Always => colored::control::set_override(true),
            Self::Never => colored::control::set_override(false),
        }
    }
}

/// Breathing session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Technique selected on startup.
    #[serde(default)]
    pub default_technique: Option<String>,
    /// Play a cue at each phase change.
    #[serde(default = "default_true")]
    pub sound: bool,
    /// Countdown refresh cadence in milliseconds.
    #[serde(default = "default_countdown_interval_ms")]
    pub countdown_interval_ms: u64,
    /// Technique catalog to load instead of the built-in one.
    #[serde(default)]
    pub techniques_file: Option<PathBuf>,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

const fn default_true() -> bool {
    true
}

const fn default_countdown_interval_ms() -> u64 {
    100
}

/// Countdown refreshes faster than this only burn CPU.
const MIN_COUNTDOWN_INTERVAL_MS: u64 = 10;

/// Slowest countdown refresh, one minute.
const MAX_COUNTDOWN_INTERVAL_MS: u64 = 60_000;

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_technique: None,
            sound: default_true(),
            countdown_interval_ms: default_countdown_interval_ms(),
            techniques_file: None,
        }
    }
}

impl SessionConfig {
    /// Countdown refresh cadence, between 10ms and one minute.
    #[must_use]
    pub fn countdown_interval(&self) -> Duration {
        Duration::from_millis(
            self.countdown_interval_ms
                .clamp(MIN_COUNTDOWN_INTERVAL_MS, MAX_COUNTDOWN_INTERVAL_MS),
        )
    }
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &Path) -> Result<Self, BreatheError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            BreatheError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            BreatheError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Which technique file to load, if any.
    ///
    /// An explicit path wins, then `session.techniques_file`, then
    /// `techniques.json` in the breathe directory if it exists. `None` means
    /// use the built-in catalog.
    #[must_use]
    pub fn techniques_path(&self, explicit: Option<&Path>, paths: &Paths) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Some(path) = &self.session.techniques_file {
            return Some(path.clone());
        }
        paths
            .techniques_file
            .exists()
            .then(|| paths.techniques_file.clone())
    }

    /// Load the technique catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read or is invalid.
    pub fn load_catalog(
        &self,
        explicit: Option<&Path>,
        paths: &Paths,
    ) -> Result<Catalog, BreatheError> {
        match self.techniques_path(explicit, paths) {
            Some(path) => Catalog::load(&path),
            None => Catalog::builtin(),
        }
    }
}
