//! Core types for playback control

use serde::{Deserialize, Serialize};

/// Coarse controller status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    /// Nothing loaded; waiting for tracks
    Idle,

    /// A transport is stepping
    Playing,

    /// A transport is held without stepping
    Paused,

    /// Terminal; the run loop has been told to exit
    Quit,
}

/// Playback configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// History entries kept when the playlist loops (default: 500)
    pub history_limit: usize,

    /// Minimum decoded-position advance between progress notifications
    /// (default: 500 ms)
    pub progress_interval_ms: u64,

    /// Bytes read from the decoder per checkpoint (default: 4096)
    pub buffer_size: usize,

    /// Start in the paused state (default: true)
    pub start_paused: bool,

    /// Shuffle the pending queue (default: false)
    pub shuffle: bool,

    /// Loop the playlist when it runs out (default: false)
    pub repeat: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            history_limit: 500,
            progress_interval_ms: 500,
            buffer_size: 4096,
            start_paused: true,
            shuffle: false,
            repeat: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_player_constants() {
        let config = PlaybackConfig::default();
        assert_eq!(config.history_limit, 500);
        assert_eq!(config.progress_interval_ms, 500);
        assert_eq!(config.buffer_size, 4096);
        assert!(config.start_paused);
        assert!(!config.shuffle);
        assert!(!config.repeat);
    }
}
