/// Streaming decoder implementation using Symphonia
use crate::error::{AudioError, Result};
use lark_core::{Decoder as DecoderTrait, DecoderProvider, FileKind, LarkError, PcmLayout};
use std::path::Path;
use std::time::Duration;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::{Time, TimeBase};

/// Opens `SymphoniaDecoder`s for every `FileKind`
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaProvider;

impl SymphoniaProvider {
    /// Create a new provider
    pub fn new() -> Self {
        Self
    }
}

impl DecoderProvider for SymphoniaProvider {
    fn open(&self, kind: FileKind, locator: &Path) -> lark_core::Result<Box<dyn DecoderTrait>> {
        match SymphoniaDecoder::open(kind, locator) {
            Ok(decoder) => Ok(Box::new(decoder)),
            Err(e) => Err(LarkError::open(locator, e.to_string())),
        }
    }
}

/// Streaming decoder using Symphonia
///
/// Decodes one packet at a time and hands out interleaved 16-bit
/// little-endian PCM in caller-sized chunks. Bytes left over from a packet
/// are kept for the next `read`.
pub struct SymphoniaDecoder {
    /// Format reader (container parser)
    format: Box<dyn FormatReader>,
    /// Audio decoder
    decoder: Box<dyn Decoder>,
    /// Track ID within the container
    track_id: u32,
    /// Sample rate
    sample_rate: u32,
    /// Interleaved channel count
    channels: u16,
    /// Time base for timestamp conversion
    time_base: Option<TimeBase>,
    /// Total duration (zero when the container does not report it)
    duration: Duration,
    /// Timestamp of the most recently decoded packet
    position: Duration,
    /// Decoded PCM bytes not yet handed out
    pending: Vec<u8>,
    /// Read offset into `pending`
    pending_offset: usize,
    /// Reusable conversion buffer
    sample_buf: Option<SampleBuffer<i16>>,
    /// End of stream reached
    finished: bool,
}

impl SymphoniaDecoder {
    /// Open a file for streaming decode
    pub fn open(kind: FileKind, path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AudioError::FileNotFound(path.to_path_buf()));
        }

        let file = std::fs::File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // The suffix already decided the kind; pass it on as the probe hint
        let mut hint = Hint::new();
        hint.with_extension(kind.extension());

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| AudioError::Probe(e.to_string()))?;

        let format = probed.format;

        let track = format.default_track().ok_or(AudioError::NoTrack)?;

        let sample_rate = track.codec_params.sample_rate.unwrap_or(44100);
        let channels = track
            .codec_params
            .channels
            .map_or(2, |channels| channels.count() as u16);
        let track_id = track.id;
        let time_base = track.codec_params.time_base;

        let duration = match track.codec_params.n_frames {
            Some(n_frames) => timestamp_to_duration(time_base, sample_rate, n_frames),
            None => Duration::ZERO,
        };

        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::Codec(e.to_string()))?;

        tracing::debug!(
            path = %path.display(),
            %kind,
            sample_rate,
            channels,
            duration_ms = duration.as_millis() as u64,
            "Opened stream"
        );

        Ok(Self {
            format,
            decoder,
            track_id,
            sample_rate,
            channels,
            time_base,
            duration,
            position: Duration::ZERO,
            pending: Vec::new(),
            pending_offset: 0,
            sample_buf: None,
            finished: false,
        })
    }

    /// Sample rate of the decoded stream
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Interleaved channel count of the decoded stream
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Decode the next packet of our track into `pending`
    ///
    /// Leaves `pending` empty when the packet belonged to another track or
    /// was skipped after a recoverable error.
    fn decode_next_packet(&mut self) -> Result<()> {
        let packet = match self.format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                self.finished = true;
                return Ok(());
            }
            Err(SymphoniaError::ResetRequired) => {
                self.decoder.reset();
                return Ok(());
            }
            Err(e) => return Err(AudioError::DecodeError(e.to_string())),
        };

        if packet.track_id() != self.track_id {
            return Ok(());
        }

        let position = timestamp_to_duration(self.time_base, self.sample_rate, packet.ts());

        let decoded = match self.decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                // Corrupt frames are skipped, not fatal
                tracing::debug!("Skipping undecodable packet: {}", e);
                return Ok(());
            }
            Err(e) => return Err(AudioError::DecodeError(e.to_string())),
        };

        let spec = *decoded.spec();
        let needed = decoded.frames() * spec.channels.count();
        let reuse = match &self.sample_buf {
            Some(buf) => buf.capacity() >= needed,
            None => false,
        };
        if !reuse {
            self.sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
        }

        self.pending.clear();
        self.pending_offset = 0;
        if let Some(buf) = self.sample_buf.as_mut() {
            buf.copy_interleaved_ref(decoded);
            self.pending.reserve(buf.samples().len() * 2);
            for sample in buf.samples() {
                self.pending.extend_from_slice(&sample.to_le_bytes());
            }
        }
        self.position = position;

        Ok(())
    }
}

impl DecoderTrait for SymphoniaDecoder {
    fn duration(&self) -> Duration {
        self.duration
    }

    fn read(&mut self, buffer: &mut [u8]) -> lark_core::Result<usize> {
        if buffer.is_empty() {
            return Ok(0);
        }

        while self.pending_offset >= self.pending.len() {
            if self.finished {
                return Ok(0);
            }
            self.decode_next_packet()?;
        }

        let available = &self.pending[self.pending_offset..];
        let n = available.len().min(buffer.len());
        buffer[..n].copy_from_slice(&available[..n]);
        self.pending_offset += n;

        Ok(n)
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn layout(&self) -> Option<PcmLayout> {
        Some(PcmLayout::new(self.sample_rate, self.channels))
    }

    fn seek(&mut self, position: Duration) -> lark_core::Result<()> {
        let target = if self.duration > Duration::ZERO {
            position.min(self.duration)
        } else {
            position
        };

        let time = Time::new(
            target.as_secs(),
            f64::from(target.subsec_nanos()) / 1_000_000_000.0,
        );

        let seeked_to = self
            .format
            .seek(
                SeekMode::Accurate,
                SeekTo::Time {
                    time,
                    track_id: Some(self.track_id),
                },
            )
            .map_err(|e| AudioError::SeekError(e.to_string()))?;

        // Decoder state is stale after a seek
        self.decoder.reset();
        self.pending.clear();
        self.pending_offset = 0;
        self.finished = false;
        self.position = timestamp_to_duration(self.time_base, self.sample_rate, seeked_to.actual_ts);

        Ok(())
    }
}

/// Convert a codec timestamp to wall-clock duration
fn timestamp_to_duration(time_base: Option<TimeBase>, sample_rate: u32, ts: u64) -> Duration {
    match time_base {
        Some(tb) => {
            let time = tb.calc_time(ts);
            Duration::from_secs(time.seconds) + Duration::from_secs_f64(time.frac)
        }
        // Fallback: assume sample-based timestamps
        None => Duration::from_secs_f64(ts as f64 / f64::from(sample_rate.max(1))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_use_time_base_when_present() {
        let tb = TimeBase::new(1, 1000);
        assert_eq!(
            timestamp_to_duration(Some(tb), 44100, 1500),
            Duration::from_millis(1500)
        );
    }

    #[test]
    fn timestamps_fall_back_to_sample_rate() {
        assert_eq!(
            timestamp_to_duration(None, 48000, 96000),
            Duration::from_secs(2)
        );
    }

    #[test]
    fn open_nonexistent_file_returns_error() {
        let result = SymphoniaDecoder::open(FileKind::Mp3, Path::new("/nonexistent/file.mp3"));
        assert!(matches!(result, Err(AudioError::FileNotFound(_))));
    }
}
