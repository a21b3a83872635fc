/// Audio-specific errors
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `AudioError`
pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio error types
#[derive(Error, Debug)]
pub enum AudioError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Container probing failed
    #[error("Failed to probe file: {0}")]
    Probe(String),

    /// No decodable audio track in the container
    #[error("No audio tracks found")]
    NoTrack,

    /// Codec could not be instantiated
    #[error("Failed to create decoder: {0}")]
    Codec(String),

    /// Decoding error
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Seek error
    #[error("Seek error: {0}")]
    SeekError(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<AudioError> for lark_core::LarkError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::SeekError(msg) => lark_core::LarkError::seek(msg),
            AudioError::Io(e) => lark_core::LarkError::Io(e),
            other => lark_core::LarkError::decode(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lark_core::LarkError;

    #[test]
    fn seek_errors_keep_their_kind() {
        let err: LarkError = AudioError::SeekError("past end".to_string()).into();
        assert!(matches!(err, LarkError::Seek(msg) if msg == "past end"));
    }

    #[test]
    fn decode_errors_map_to_decode() {
        let err: LarkError = AudioError::NoTrack.into();
        assert!(matches!(err, LarkError::Decode(_)));
    }
}
