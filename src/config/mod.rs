//! Configuration management for breathe.
//!
//! This module handles loading configuration and technique files from
//! `~/.breathe/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{ColorSetting, Config, GeneralConfig, SessionConfig};
