//! Lark CLI - headless playlist player
//!
//! Library half of the `lark` binary: configuration loading, playlist
//! construction from paths, and console rendering of playback events.

pub mod config;
pub mod display;
pub mod error;
pub mod playlist;

pub use config::CliConfig;
pub use error::{CliError, Result};
