//! Lark - Playback Control
//!
//! The playback-control core of Lark: a playlist, a background loop that
//! plays it one track at a time, and thread-safe commands that steer the loop
//! from anywhere else.
//!
//! This crate provides:
//! - `Transport`: one decoder driven into the output, as a lazy sequence of
//!   elapsed-time checkpoints that can be sought and stopped
//! - `PlaylistController`: current track, pending queue, history, shuffle,
//!   repeat, pause and the run loop that ties them together
//! - `ProgressSink`: song-changed and time-advanced notifications, with a
//!   channel-backed implementation for UI threads
//!
//! # Architecture
//!
//! `lark-playback` knows nothing about codecs or devices. Decoders come from
//! a `lark_core::DecoderProvider`, audio goes to a `lark_core::OutputSink`;
//! `lark-audio` ships implementations of both.
//!
//! # Example
//!
//! ```rust,no_run
//! use lark_audio::{OutputSettings, PacedOutput, SymphoniaProvider};
//! use lark_core::Track;
//! use lark_playback::{ChannelProgressSink, PlaybackEvent, PlaylistController};
//! use std::sync::Arc;
//!
//! let controller = PlaylistController::new(
//!     Arc::new(PacedOutput::new(OutputSettings::default())),
//!     Arc::new(SymphoniaProvider::new()),
//!     vec![Track::new("/music/a.mp3"), Track::new("/music/b.ogg")],
//! );
//!
//! let (sink, events) = ChannelProgressSink::channel();
//! let runner = controller.clone();
//! std::thread::spawn(move || runner.run(&sink));
//!
//! controller.set_paused(false);
//! if let Ok(PlaybackEvent::SongChanged { track, .. }) = events.recv() {
//!     println!("Now playing {}", track.title());
//! }
//! controller.next();
//! controller.quitting();
//! ```

mod clock;
mod controller;
mod error;
mod events;
mod history;
mod queue;
mod shuffle;
mod state;
mod transport;
pub mod types;

// Public exports
pub use controller::PlaylistController;
pub use error::{PlaybackError, Result};
pub use events::{ChannelProgressSink, PlaybackEvent, ProgressSink};
pub use transport::{Checkpoints, DecoderTransport, Transport};
pub use types::{PlaybackConfig, PlayerStatus};
