//! Progress notifications
//!
//! The run loop reports to a `ProgressSink`: once per started track, at a
//! throttled rate while a track plays, and whenever a track has to be
//! skipped because it could not be opened.

use crate::error::PlaybackError;
use crate::transport::Transport;
use crossbeam_channel::{unbounded, Receiver, Sender};
use lark_core::Track;

/// Receiver of run-loop notifications
///
/// Called from the playback thread, outside the controller lock. Slow
/// implementations delay playback.
pub trait ProgressSink {
    /// A new track started
    fn song_changed(&self, track: &Track, transport: &dyn Transport);

    /// Decoded position advanced by at least the progress interval
    fn time_advanced(&self, position_ms: u64, duration_ms: u64);

    /// A track was skipped because its transport could not be built
    fn track_failed(&self, _track: &Track, _error: &PlaybackError) {}
}

/// Events emitted by the playback loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Track changed
    SongChanged {
        /// The new current track
        track: Track,
        /// Its total length
        duration_ms: u64,
    },

    /// Position update (throttled)
    TimeAdvanced { position_ms: u64, duration_ms: u64 },

    /// Track skipped
    TrackFailed {
        /// Track that could not be played
        track: Track,
        /// Rendered error
        message: String,
    },
}

/// `ProgressSink` that forwards events over a channel
#[derive(Debug, Clone)]
pub struct ChannelProgressSink {
    sender: Sender<PlaybackEvent>,
}

impl ChannelProgressSink {
    /// Forward events to `sender`
    pub fn new(sender: Sender<PlaybackEvent>) -> Self {
        Self { sender }
    }

    /// Create a sink with its receiving end
    pub fn channel() -> (Self, Receiver<PlaybackEvent>) {
        let (tx, rx) = unbounded();
        (Self::new(tx), rx)
    }

    fn send(&self, event: PlaybackEvent) {
        // Nobody listening is not an error for the playback loop
        if self.sender.send(event).is_err() {
            tracing::trace!("Progress receiver dropped");
        }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn song_changed(&self, track: &Track, transport: &dyn Transport) {
        self.send(PlaybackEvent::SongChanged {
            track: track.clone(),
            duration_ms: transport.duration_ms(),
        });
    }

    fn time_advanced(&self, position_ms: u64, duration_ms: u64) {
        self.send(PlaybackEvent::TimeAdvanced {
            position_ms,
            duration_ms,
        });
    }

    fn track_failed(&self, track: &Track, error: &PlaybackError) {
        self.send(PlaybackEvent::TrackFailed {
            track: track.clone(),
            message: error.to_string(),
        });
    }
}
