//! Logging initialization for breathe.
//!
//! Log lines go to stderr, or to `~/.breathe/breathe.log` while the TUI owns
//! the terminal. `BREATHE_LOG` overrides the default `warn` filter.

use std::fs::{File, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::Paths;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "BREATHE_LOG";

/// Filter used when `BREATHE_LOG` is unset or invalid.
pub const DEFAULT_DIRECTIVE: &str = "warn";

/// Where log lines are written.
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    /// Standard error.
    Stderr,
    /// Append to the breathe log file.
    LogFile(&'a Paths),
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

fn open_log(paths: &Paths) -> Option<File> {
    paths.ensure_dirs().ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.log_file)
        .ok()
}

/// Initializes the global tracing subscriber.
///
/// A log file that cannot be opened disables logging rather than writing
/// over the TUI. Uses `try_init()` so calling this more than once is safe.
pub fn init_logging(target: LogTarget<'_>) {
    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogTarget::LogFile(paths) => {
            let Some(file) = open_log(paths) else {
                return;
            };
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
    }
}
