//! Playback history tracking
//!
//! Records every track the run loop has started, oldest first. Growth is
//! unbounded within one pass of the playlist; looping trims it back to the
//! most recent entries.

use lark_core::Track;
use std::collections::VecDeque;

/// Tracks already played (most recent = back)
#[derive(Debug, Clone, Default)]
pub struct History {
    tracks: VecDeque<Track>,
}

impl History {
    /// Create empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Add track to history
    pub fn push(&mut self, track: Track) {
        self.tracks.push_back(track);
    }

    /// Pop most recent track from history
    pub fn pop(&mut self) -> Option<Track> {
        self.tracks.pop_back()
    }

    /// Replace the contents, oldest first
    pub fn replace(&mut self, tracks: impl IntoIterator<Item = Track>) {
        self.tracks.clear();
        self.tracks.extend(tracks);
    }

    /// Discard the oldest entries until at most `limit` remain
    pub fn truncate_to_recent(&mut self, limit: usize) {
        while self.tracks.len() > limit {
            self.tracks.pop_front();
        }
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Iterate oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Snapshot, oldest first
    pub fn to_vec(&self) -> Vec<Track> {
        self.iter().cloned().collect()
    }

    /// Get number of tracks in history
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
