//! Error types for playback control

use lark_core::{LarkError, TrackId};
use std::path::PathBuf;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Locator suffix matches no known decoder
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Decoder could not open the locator
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: LarkError,
    },

    /// Track is not part of the current playlist
    #[error("Track not in playlist: {0}")]
    NotFound(TrackId),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn open_error_keeps_source() {
        let err = PlaybackError::Open {
            path: PathBuf::from("/music/a.ogg"),
            source: LarkError::decode("bad header"),
        };

        assert!(err.to_string().contains("/music/a.ogg"));
        assert!(err.source().is_some());
    }

    #[test]
    fn not_found_names_the_track() {
        let err = PlaybackError::NotFound(TrackId::new("abc"));
        assert_eq!(err.to_string(), "Track not in playlist: abc");
    }
}
