//! Paced null output
//!
//! Stands in for a device: PCM is counted and dropped, and `play` blocks for
//! as long as the buffer would take to hear.

use lark_core::{OutputSink, PcmLayout, Result};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::time::Duration;

/// PCM layout the output assumes until a stream reports its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Frames per second (default: 44100)
    pub sample_rate: u32,

    /// Interleaved channels (default: 2)
    pub channels: u16,

    /// Bytes per sample (default: 2, matching 16-bit PCM)
    pub bytes_per_sample: u16,

    /// Initial volume (0-100, default: 80)
    pub volume: u8,
}

impl OutputSettings {
    /// Bytes consumed per second of audio
    pub fn byte_rate(&self) -> u64 {
        u64::from(self.sample_rate) * u64::from(self.channels) * u64::from(self.bytes_per_sample)
    }

    /// Real-time duration of `len` bytes
    pub fn duration_of(&self, len: usize) -> Duration {
        bytes_to_duration(len as u64, self.byte_rate())
    }

    /// Layout part of these settings
    pub fn layout(&self) -> PcmLayout {
        PcmLayout::new(self.sample_rate, self.channels)
    }
}

fn bytes_to_duration(len: u64, byte_rate: u64) -> Duration {
    if byte_rate == 0 {
        return Duration::ZERO;
    }
    let nanos = u128::from(len) * 1_000_000_000 / u128::from(byte_rate);
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
            bytes_per_sample: 2,
            volume: 80,
        }
    }
}

/// Output sink that discards audio at playback speed
///
/// Pacing follows the layout of the current stream, set through
/// `OutputSink::configure`, and falls back to the configured settings.
#[derive(Debug)]
pub struct PacedOutput {
    settings: OutputSettings,
    sample_rate: AtomicU32,
    channels: AtomicU16,
    paced: AtomicBool,
    volume: AtomicU8,
    bytes_played: AtomicU64,
    nanos_played: AtomicU64,
}

impl PacedOutput {
    /// Create an output that sleeps for each buffer's duration
    pub fn new(settings: OutputSettings) -> Self {
        Self {
            volume: AtomicU8::new(settings.volume.min(100)),
            sample_rate: AtomicU32::new(settings.sample_rate),
            channels: AtomicU16::new(settings.channels),
            settings,
            paced: AtomicBool::new(true),
            bytes_played: AtomicU64::new(0),
            nanos_played: AtomicU64::new(0),
        }
    }

    /// Create an output that returns immediately
    pub fn unpaced(settings: OutputSettings) -> Self {
        let output = Self::new(settings);
        output.paced.store(false, Ordering::Relaxed);
        output
    }

    /// Configured settings
    pub fn settings(&self) -> &OutputSettings {
        &self.settings
    }

    /// Layout currently used for pacing
    pub fn layout(&self) -> PcmLayout {
        PcmLayout::new(
            self.sample_rate.load(Ordering::Relaxed),
            self.channels.load(Ordering::Relaxed),
        )
    }

    fn byte_rate(&self) -> u64 {
        let layout = self.layout();
        u64::from(layout.sample_rate)
            * u64::from(layout.channels)
            * u64::from(self.settings.bytes_per_sample)
    }

    /// Total bytes accepted so far
    pub fn bytes_played(&self) -> u64 {
        self.bytes_played.load(Ordering::Relaxed)
    }

    /// Total audio accepted so far, as playback time
    pub fn time_played(&self) -> Duration {
        Duration::from_nanos(self.nanos_played.load(Ordering::Relaxed))
    }
}

impl OutputSink for PacedOutput {
    fn play(&self, buffer: &[u8]) -> Result<()> {
        let duration = bytes_to_duration(buffer.len() as u64, self.byte_rate());
        self.bytes_played
            .fetch_add(buffer.len() as u64, Ordering::Relaxed);
        self.nanos_played
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);

        if self.paced.load(Ordering::Relaxed) {
            std::thread::sleep(duration);
        }
        Ok(())
    }

    fn configure(&self, layout: PcmLayout) {
        tracing::debug!(
            sample_rate = layout.sample_rate,
            channels = layout.channels,
            "Output layout changed"
        );
        self.sample_rate.store(layout.sample_rate, Ordering::Relaxed);
        self.channels.store(layout.channels, Ordering::Relaxed);
    }

    fn volume(&self) -> u8 {
        self.volume.load(Ordering::Relaxed)
    }

    fn set_volume(&self, level: u8) {
        self.volume.store(level.min(100), Ordering::Relaxed);
    }
}
