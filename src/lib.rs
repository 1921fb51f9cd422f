//! breathe - A guided-breathing coach for the terminal
//!
//! This crate sequences breathing techniques through timed phases and
//! presents them as an animated orb (TUI) or as line output (CLI).

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod sequencer;
pub mod technique;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::BreatheError;
pub use sequencer::Sequencer;
pub use technique::Catalog;
