//! Lark Core
//!
//! Shared types, collaborator traits, and error handling for the Lark
//! playback core.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId`, `FileKind`, `PcmLayout`
//! - **Collaborator Traits**: `Decoder`, `DecoderProvider`, `OutputSink`
//! - **Error Handling**: Unified `LarkError` and `Result` types
//!
//! Nothing in this crate decodes audio or touches a device. Decoding lives in
//! `lark-audio`, playback coordination in `lark-playback`.
//!
//! # Example
//!
//! ```rust
//! use lark_core::{FileKind, Track};
//!
//! let track = Track::new("/music/intro.MP3").with_tag("artist", "Someone");
//!
//! assert_eq!(track.file_kind(), Some(FileKind::Mp3));
//! assert_eq!(track.tag("artist"), Some("Someone"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{LarkError, Result};
pub use traits::{Decoder, DecoderProvider, OutputSink};
pub use types::{FileKind, PcmLayout, Track, TrackId};
