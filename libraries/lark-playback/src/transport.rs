//! Single-track transport
//!
//! A transport drives one decoder into the shared output and reports the
//! decoded position after every buffer. The sequence of checkpoints is lazy,
//! finite, and cannot be restarted: once it ends, it stays ended.

use crate::error::{PlaybackError, Result};
use lark_core::{Decoder, DecoderProvider, FileKind, OutputSink};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Playback of one track
///
/// Shared between the run loop, which steps it, and control commands, which
/// seek or stop it from other threads.
pub trait Transport: Send + Sync {
    /// Play one buffer and return the elapsed position in milliseconds
    ///
    /// Returns `None` once the decoder is exhausted or after `stop`.
    fn next_checkpoint(&self) -> Option<u64>;

    /// Best-effort seek to `position_ms` from the start of the track
    fn seek(&self, position_ms: u64);

    /// End the sequence at the next step; idempotent
    fn stop(&self);

    /// Whether `stop` has been called
    fn is_stopped(&self) -> bool;

    /// Total track length in milliseconds
    fn duration_ms(&self) -> u64;
}

impl<'t> dyn Transport + 't {
    /// Iterate the remaining checkpoints
    pub fn checkpoints(&self) -> Checkpoints<'_, 't> {
        Checkpoints { transport: self }
    }
}

/// Iterator over a transport's checkpoints
pub struct Checkpoints<'a, 't> {
    transport: &'a (dyn Transport + 't),
}

impl Iterator for Checkpoints<'_, '_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        self.transport.next_checkpoint()
    }
}

struct Stream {
    decoder: Box<dyn Decoder>,
    buffer: Vec<u8>,
}

/// Transport over a `Decoder` and an `OutputSink`
pub struct DecoderTransport {
    locator: PathBuf,
    /// Serializes `seek` against an in-flight read
    stream: Mutex<Stream>,
    output: Arc<dyn OutputSink>,
    stopped: AtomicBool,
    exhausted: AtomicBool,
    duration_ms: u64,
}

impl DecoderTransport {
    /// Open `locator` with the decoder matching its suffix
    ///
    /// # Errors
    /// * `UnsupportedFormat` - suffix is not `mp3` or `ogg`
    /// * `Open` - the decoder provider could not open the file
    pub fn open(
        output: Arc<dyn OutputSink>,
        decoders: &dyn DecoderProvider,
        locator: &Path,
        buffer_size: usize,
    ) -> Result<Self> {
        let kind = FileKind::from_path(locator)
            .ok_or_else(|| PlaybackError::UnsupportedFormat(locator.to_path_buf()))?;

        let decoder = decoders
            .open(kind, locator)
            .map_err(|source| PlaybackError::Open {
                path: locator.to_path_buf(),
                source,
            })?;

        Ok(Self::from_decoder(output, decoder, locator, buffer_size))
    }

    /// Wrap an already-open decoder
    pub fn from_decoder(
        output: Arc<dyn OutputSink>,
        decoder: Box<dyn Decoder>,
        locator: &Path,
        buffer_size: usize,
    ) -> Self {
        let duration_ms = decoder.duration().as_millis() as u64;
        if let Some(layout) = decoder.layout() {
            output.configure(layout);
        }

        Self {
            locator: locator.to_path_buf(),
            stream: Mutex::new(Stream {
                decoder,
                buffer: vec![0u8; buffer_size.max(1)],
            }),
            output,
            stopped: AtomicBool::new(false),
            exhausted: AtomicBool::new(false),
            duration_ms,
        }
    }

    /// File this transport is playing
    pub fn locator(&self) -> &Path {
        &self.locator
    }

    fn finish(&self) -> Option<u64> {
        self.exhausted.store(true, Ordering::Release);
        None
    }
}

impl Transport for DecoderTransport {
    fn next_checkpoint(&self) -> Option<u64> {
        if self.stopped.load(Ordering::Acquire) || self.exhausted.load(Ordering::Acquire) {
            return None;
        }

        let mut guard = self.stream.lock().unwrap_or_else(PoisonError::into_inner);
        let stream = &mut *guard;

        let read = match stream.decoder.read(&mut stream.buffer) {
            Ok(0) => return self.finish(),
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(locator = %self.locator.display(), "Decoder read failed: {}", e);
                return self.finish();
            }
        };

        if let Err(e) = self.output.play(&stream.buffer[..read]) {
            tracing::warn!(locator = %self.locator.display(), "Output rejected buffer: {}", e);
            return self.finish();
        }

        Some(stream.decoder.position().as_millis() as u64)
    }

    fn seek(&self, position_ms: u64) {
        let mut stream = self.stream.lock().unwrap_or_else(PoisonError::into_inner);

        match stream.decoder.seek(Duration::from_millis(position_ms)) {
            Ok(()) => tracing::debug!(position_ms, locator = %self.locator.display(), "Seeked"),
            Err(e) => tracing::warn!(position_ms, "Seek failed: {}", e),
        }
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

impl std::fmt::Debug for DecoderTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderTransport")
            .field("locator", &self.locator)
            .field("duration_ms", &self.duration_ms)
            .field("stopped", &self.is_stopped())
            .field("exhausted", &self.exhausted.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lark_core::{LarkError, PcmLayout, Result as CoreResult};
    use std::sync::atomic::AtomicU8;

    /// Produces `chunks` full buffers, 100 ms apart
    struct ScriptedDecoder {
        chunks: usize,
        produced: usize,
        position: Duration,
        fail_seek: bool,
        layout: Option<PcmLayout>,
    }

    impl ScriptedDecoder {
        fn new(chunks: usize) -> Self {
            Self {
                chunks,
                produced: 0,
                position: Duration::ZERO,
                fail_seek: false,
                layout: None,
            }
        }
    }

    impl Decoder for ScriptedDecoder {
        fn duration(&self) -> Duration {
            Duration::from_millis(self.chunks as u64 * 100)
        }

        fn read(&mut self, buffer: &mut [u8]) -> CoreResult<usize> {
            if self.produced >= self.chunks {
                return Ok(0);
            }
            self.produced += 1;
            self.position = Duration::from_millis(self.produced as u64 * 100);
            buffer.fill(1);
            Ok(buffer.len())
        }

        fn position(&self) -> Duration {
            self.position
        }

        fn seek(&mut self, position: Duration) -> CoreResult<()> {
            if self.fail_seek {
                return Err(LarkError::seek("not seekable"));
            }
            self.produced = (position.as_millis() / 100) as usize;
            self.position = position;
            Ok(())
        }

        fn layout(&self) -> Option<PcmLayout> {
            self.layout
        }
    }

    #[derive(Default)]
    struct RecordingOutput {
        buffers: Mutex<Vec<usize>>,
        layouts: Mutex<Vec<PcmLayout>>,
        volume: AtomicU8,
        reject: bool,
    }

    impl OutputSink for RecordingOutput {
        fn play(&self, buffer: &[u8]) -> CoreResult<()> {
            if self.reject {
                return Err(LarkError::output("device gone"));
            }
            self.buffers.lock().unwrap().push(buffer.len());
            Ok(())
        }

        fn volume(&self) -> u8 {
            self.volume.load(Ordering::Relaxed)
        }

        fn set_volume(&self, level: u8) {
            self.volume.store(level.min(100), Ordering::Relaxed);
        }

        fn configure(&self, layout: PcmLayout) {
            self.layouts.lock().unwrap().push(layout);
        }
    }

    struct FixedProvider;

    impl DecoderProvider for FixedProvider {
        fn open(&self, _kind: FileKind, locator: &Path) -> CoreResult<Box<dyn Decoder>> {
            if locator.to_string_lossy().contains("missing") {
                return Err(LarkError::open(locator, "no such file"));
            }
            Ok(Box::new(ScriptedDecoder::new(3)))
        }
    }

    fn transport(decoder: ScriptedDecoder, output: Arc<RecordingOutput>) -> DecoderTransport {
        DecoderTransport::from_decoder(output, Box::new(decoder), Path::new("/music/a.mp3"), 16)
    }

    #[test]
    fn checkpoints_follow_decoder_position() {
        let output = Arc::new(RecordingOutput::default());
        let transport = transport(ScriptedDecoder::new(3), Arc::clone(&output));

        assert_eq!(transport.duration_ms(), 300);

        let positions: Vec<u64> = (&transport as &dyn Transport).checkpoints().collect();
        assert_eq!(positions, vec![100, 200, 300]);
        assert_eq!(*output.buffers.lock().unwrap(), vec![16, 16, 16]);
    }

    #[test]
    fn output_is_configured_with_stream_layout() {
        let output = Arc::new(RecordingOutput::default());
        let mut decoder = ScriptedDecoder::new(1);
        decoder.layout = Some(PcmLayout::new(48_000, 1));
        let _transport = transport(decoder, Arc::clone(&output));

        assert_eq!(*output.layouts.lock().unwrap(), vec![PcmLayout::new(48_000, 1)]);

        // Streams without a layout leave the output as it was
        let _transport = transport(ScriptedDecoder::new(1), Arc::clone(&output));
        assert_eq!(output.layouts.lock().unwrap().len(), 1);
    }

    #[test]
    fn sequence_is_not_restartable() {
        let output = Arc::new(RecordingOutput::default());
        let transport = transport(ScriptedDecoder::new(1), output);

        assert_eq!(transport.next_checkpoint(), Some(100));
        assert_eq!(transport.next_checkpoint(), None);

        // A seek back does not revive an exhausted sequence
        transport.seek(0);
        assert_eq!(transport.next_checkpoint(), None);
    }

    #[test]
    fn stop_ends_sequence_immediately() {
        let output = Arc::new(RecordingOutput::default());
        let transport = transport(ScriptedDecoder::new(10), Arc::clone(&output));

        assert_eq!(transport.next_checkpoint(), Some(100));
        transport.stop();
        transport.stop();

        assert!(transport.is_stopped());
        assert_eq!(transport.next_checkpoint(), None);
        assert_eq!(output.buffers.lock().unwrap().len(), 1);
    }

    #[test]
    fn seek_moves_the_decoder() {
        let output = Arc::new(RecordingOutput::default());
        let transport = transport(ScriptedDecoder::new(10), output);

        transport.seek(500);
        assert_eq!(transport.next_checkpoint(), Some(600));
    }

    #[test]
    fn failed_seek_is_swallowed() {
        let output = Arc::new(RecordingOutput::default());
        let mut decoder = ScriptedDecoder::new(3);
        decoder.fail_seek = true;
        let transport = transport(decoder, output);

        transport.seek(1_000);
        assert_eq!(transport.next_checkpoint(), Some(100));
    }

    #[test]
    fn output_error_ends_sequence() {
        let output = Arc::new(RecordingOutput {
            reject: true,
            ..RecordingOutput::default()
        });
        let transport = transport(ScriptedDecoder::new(3), output);

        assert_eq!(transport.next_checkpoint(), None);
        assert_eq!(transport.next_checkpoint(), None);
    }

    #[test]
    fn open_dispatches_on_suffix() {
        let output: Arc<dyn OutputSink> = Arc::new(RecordingOutput::default());

        let ok = DecoderTransport::open(
            Arc::clone(&output),
            &FixedProvider,
            Path::new("/music/Loud.OGG"),
            64,
        );
        assert_eq!(ok.unwrap().duration_ms(), 300);

        let unsupported = DecoderTransport::open(
            Arc::clone(&output),
            &FixedProvider,
            Path::new("/music/a.flac"),
            64,
        );
        assert!(matches!(unsupported, Err(PlaybackError::UnsupportedFormat(_))));

        let missing = DecoderTransport::open(
            output,
            &FixedProvider,
            Path::new("/music/missing.mp3"),
            64,
        );
        assert!(matches!(missing, Err(PlaybackError::Open { .. })));
    }
}
