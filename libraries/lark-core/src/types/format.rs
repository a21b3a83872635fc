/// Recognized audio file kinds and PCM layout
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// File kinds the playback core knows how to hand to a decoder
///
/// Dispatch is on the locator's suffix only, compared case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// MPEG-1/2 Layer III
    Mp3,
    /// Ogg Vorbis
    Ogg,
}

impl FileKind {
    /// Detect the kind from a locator's suffix
    ///
    /// Returns `None` for unrecognized or missing suffixes.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::from_extension(ext)
    }

    /// Detect the kind from a bare suffix (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "ogg" => Some(Self::Ogg),
            _ => None,
        }
    }

    /// Canonical suffix for this kind
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Layout of the interleaved PCM a decoder produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PcmLayout {
    /// Frames per second
    pub sample_rate: u32,
    /// Interleaved channels per frame
    pub channels: u16,
}

impl PcmLayout {
    /// Create a layout
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }
}
