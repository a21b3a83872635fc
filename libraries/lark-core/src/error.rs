/// Core error types for Lark
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using `LarkError`
pub type Result<T> = std::result::Result<T, LarkError>;

/// Error type shared by the collaborator traits
#[derive(Error, Debug)]
pub enum LarkError {
    /// A decoder could not open the given locator
    #[error("Cannot open {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    /// Decoding failed mid-stream
    #[error("Decode error: {0}")]
    Decode(String),

    /// Seeking failed
    #[error("Seek error: {0}")]
    Seek(String),

    /// The output sink rejected a buffer
    #[error("Output error: {0}")]
    Output(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LarkError {
    /// Create an open error for `path`
    pub fn open(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::Open {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a seek error
    pub fn seek(msg: impl Into<String>) -> Self {
        Self::Seek(msg.into())
    }

    /// Create an output error
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_error_names_the_path() {
        let err = LarkError::open("/music/missing.ogg", "no such file");
        assert_eq!(
            err.to_string(),
            "Cannot open /music/missing.ogg: no such file"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: LarkError = io.into();
        assert!(matches!(err, LarkError::Io(_)));
    }
}
