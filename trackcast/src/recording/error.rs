//! Recording load errors.

use std::io;

use thiserror::Error;

/// Result type for recording operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that can occur while loading a recording.
///
/// Any of these is fatal to service construction: either every track loads
/// and starts, or none do.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The recording source is missing or unreadable.
    #[error("failed to read recording: {0}")]
    Io(#[from] io::Error),

    /// The recording is truncated or structurally invalid.
    #[error("malformed recording: {0}")]
    Malformed(String),

    /// A track contains no samples.
    #[error("track {track} contains no samples")]
    EmptyTrack {
        /// Load-order index of the offending track.
        track: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_io_error_display_and_source() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let err = LoadError::from(io_err);
        assert!(err.to_string().contains("failed to read recording"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_empty_track_display() {
        let err = LoadError::EmptyTrack { track: 3 };
        assert_eq!(err.to_string(), "track 3 contains no samples");
    }

    #[test]
    fn test_malformed_display() {
        let err = LoadError::Malformed("unexpected end of input".to_string());
        assert!(err.to_string().contains("malformed recording"));
        assert!(err.to_string().contains("unexpected end of input"));
    }
}
