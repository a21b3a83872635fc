/// Collaborator traits for the playback core
use crate::error::Result;
use crate::types::{FileKind, PcmLayout};
use std::path::Path;
use std::time::Duration;

/// Streaming audio decoder for a single open file
///
/// One instance corresponds to one opened locator. Implementations are driven
/// from the playback thread and are not required to be reentrant; callers
/// serialize `read` against `seek`.
pub trait Decoder: Send {
    /// Total duration reported by the codec
    fn duration(&self) -> Duration;

    /// Fill `buffer` with decoded PCM bytes
    ///
    /// # Returns
    /// * `Ok(n)` - Number of bytes written (0 = end of stream)
    /// * `Err(_)` - Decoding error
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Elapsed position of the last decoded buffer
    fn position(&self) -> Duration;

    /// Seek to a position from the start of the stream
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Layout of the PCM produced by `read`, when the codec reports one
    fn layout(&self) -> Option<PcmLayout> {
        None
    }
}

/// Opens decoders for a recognized file kind
///
/// Suffix dispatch happens before this is called, so an implementation only
/// has to know how to open each `FileKind`.
pub trait DecoderProvider: Send + Sync {
    /// Open `locator` as a stream of the given kind
    ///
    /// # Errors
    /// Returns `LarkError::Open` if the locator cannot be opened or probed
    fn open(&self, kind: FileKind, locator: &Path) -> Result<Box<dyn Decoder>>;
}

/// Audio output sink
///
/// Shared between the controller and every transport it creates, so all
/// methods take `&self`.
pub trait OutputSink: Send + Sync {
    /// Play a buffer of PCM bytes
    ///
    /// The slice length is the byte length of the buffer.
    fn play(&self, buffer: &[u8]) -> Result<()>;

    /// Prepare for PCM in `layout`
    ///
    /// Called before the first buffer of each stream that reports a layout.
    fn configure(&self, _layout: PcmLayout) {}

    /// Current output volume (0-100)
    fn volume(&self) -> u8;

    /// Set output volume (0-100, larger values are clamped)
    fn set_volume(&self, level: u8);
}
