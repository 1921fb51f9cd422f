//! Path resolution for breathe configuration and data files.
//!
//! All breathe files live in `~/.breathe/`:
//! - `config.yaml` - Main configuration file
//! - `techniques.json` - Optional user technique catalog
//! - `breathe.log` - Log output while the TUI owns the terminal

use std::path::PathBuf;

use crate::error::BreatheError;

/// Paths to breathe configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.breathe/`
    pub root: PathBuf,
    /// Config file: `~/.breathe/config.yaml`
    pub config_file: PathBuf,
    /// User techniques: `~/.breathe/techniques.json`
    pub techniques_file: PathBuf,
    /// Log file: `~/.breathe/breathe.log`
    pub log_file: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, BreatheError> {
        let home = std::env::var("HOME").map_err(|_| {
            BreatheError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".breathe")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            techniques_file: root.join("techniques.json"),
            log_file: root.join("breathe.log"),
            root,
        }
    }

    /// Ensure the root directory exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), BreatheError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                BreatheError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }

        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| {
            // Fallback to current directory if home cannot be determined
            Self::with_root(PathBuf::from(".breathe"))
        })
    }
}
