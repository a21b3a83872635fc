//! Lark Audio
//!
//! Default collaborators for the playback core:
//! - `SymphoniaProvider` opens MP3 and Ogg Vorbis files as streaming
//!   decoders producing interleaved 16-bit little-endian PCM
//! - `PacedOutput` accepts PCM and discards it, sleeping for the buffer's
//!   real-time duration so a playback loop runs at listening speed
//!
//! No audio device is opened here. Platform output belongs to whoever embeds
//! the playback core.
//!
//! # Example
//!
//! ```no_run
//! use lark_audio::{OutputSettings, PacedOutput, SymphoniaProvider};
//! use lark_core::{DecoderProvider, FileKind, OutputSink};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = SymphoniaProvider::new();
//! let mut decoder = provider.open(FileKind::Mp3, Path::new("/music/song.mp3"))?;
//!
//! let output = PacedOutput::new(OutputSettings::default());
//! let mut buffer = vec![0u8; 4096];
//! let n = decoder.read(&mut buffer)?;
//! output.play(&buffer[..n])?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod error;
mod output;

pub use decoder::{SymphoniaDecoder, SymphoniaProvider};
pub use error::{AudioError, Result};
pub use output::{OutputSettings, PacedOutput};
