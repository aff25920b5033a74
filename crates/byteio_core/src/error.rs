//! Error types for buffered stream operations.

use crate::config::Mode;
use byteio_backend::BackendError;
use std::io;
use thiserror::Error;

/// Result type for stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Errors that can occur in buffered stream operations.
///
/// Reaching the end of the stream is not an error; it is reported by
/// [`crate::BufferedStream::eof`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StreamError {
    /// An argument was out of range (bad whence, negative target, zero size).
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the bad argument.
        message: String,
    },

    /// The stream buffer could not be allocated.
    #[error("out of memory allocating a {requested} byte buffer")]
    OutOfMemory {
        /// The requested buffer size.
        requested: usize,
    },

    /// A backend call failed; the backend's error is carried verbatim.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// A forward-only seek hit end of stream before reaching its target.
    #[error("broken stream: wanted offset {target}, stream ended at {reached}")]
    BrokenStream {
        /// The requested absolute offset.
        target: u64,
        /// The absolute offset where the stream ended.
        reached: u64,
    },

    /// The operation does not match the stream's direction.
    #[error("operation requires a stream opened for {expected}")]
    WrongMode {
        /// The direction the operation needs.
        expected: Mode,
    },
}

impl StreamError {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Returns true if the backend lacks the requested capability.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Backend(err) if err.is_unsupported())
    }
}

impl From<StreamError> for io::Error {
    fn from(err: StreamError) -> Self {
        let kind = match &err {
            StreamError::InvalidArgument { .. } => io::ErrorKind::InvalidInput,
            StreamError::OutOfMemory { .. } => io::ErrorKind::OutOfMemory,
            StreamError::Backend(BackendError::Io(inner)) => inner.kind(),
            StreamError::Backend(BackendError::Unsupported { .. }) => io::ErrorKind::Unsupported,
            StreamError::Backend(_) => io::ErrorKind::Other,
            StreamError::BrokenStream { .. } => io::ErrorKind::BrokenPipe,
            StreamError::WrongMode { .. } => io::ErrorKind::Unsupported,
        };
        io::Error::new(kind, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_backend_errors_are_queryable() {
        let err: StreamError = BackendError::unsupported("seek").into();
        assert!(err.is_unsupported());
        assert!(!StreamError::invalid_argument("whence").is_unsupported());
    }

    #[test]
    fn converts_to_io_error_kind() {
        let err: io::Error = StreamError::BrokenStream {
            target: 10,
            reached: 4,
        }
        .into();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

        let err: io::Error = StreamError::from(BackendError::unsupported("size")).into();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }
}
