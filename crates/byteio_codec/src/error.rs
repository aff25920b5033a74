//! Error types for the codec crate.

use byteio_core::StreamError;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    /// The underlying stream rejected the operation.
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// A varint still had its continuation bit set after the allowed bytes.
    #[error("varint longer than {max_len} bytes")]
    VarintTooLong {
        /// The byte bound that was exceeded.
        max_len: usize,
    },
}

impl CodecError {
    /// Returns true if the error came from the stream layer.
    #[must_use]
    pub const fn is_stream(&self) -> bool {
        matches!(self, Self::Stream(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteio_core::Mode;

    #[test]
    fn error_display() {
        let err = CodecError::VarintTooLong { max_len: 4 };
        assert_eq!(err.to_string(), "varint longer than 4 bytes");
    }

    #[test]
    fn stream_errors_convert() {
        let err: CodecError = StreamError::WrongMode {
            expected: Mode::Write,
        }
        .into();
        assert!(err.is_stream());
        assert!(!CodecError::VarintTooLong { max_len: 1 }.is_stream());
    }
}
