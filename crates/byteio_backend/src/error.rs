//! Error types for backend operations.

use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors that can occur during backend operations.
///
/// Backend errors are `Clone` because the buffered stream keeps the last
/// one as sticky state and hands copies back to callers.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[source] Arc<io::Error>),

    /// The backend does not provide the requested capability.
    #[error("operation not supported by backend: {operation}")]
    Unsupported {
        /// Name of the missing capability.
        operation: &'static str,
    },

    /// A write would grow the backend past its representable size.
    #[error("size overflow: requested {requested} bytes, limit is {limit}")]
    Overflow {
        /// The size the write would have produced.
        requested: u64,
        /// The largest size the backend accepts.
        limit: u64,
    },

    /// A seek resolved to a negative or out-of-range offset.
    #[error("invalid seek target: {offset}")]
    InvalidSeek {
        /// The resolved absolute offset.
        offset: i64,
    },

    /// Growing backend storage failed.
    #[error("out of memory growing backend storage to {requested} bytes")]
    OutOfMemory {
        /// The allocation size that failed.
        requested: usize,
    },

    /// A raw negative status code reported by a foreign backend.
    #[error("backend status code {0}")]
    Code(i32),
}

impl BackendError {
    /// Creates an unsupported-capability error.
    #[must_use]
    pub const fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }

    /// Returns true if this error reports a missing capability.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

impl From<io::Error> for BackendError {
    fn from(err: io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

impl PartialEq for BackendError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            (Self::Unsupported { operation: a }, Self::Unsupported { operation: b }) => a == b,
            (
                Self::Overflow {
                    requested: ra,
                    limit: la,
                },
                Self::Overflow {
                    requested: rb,
                    limit: lb,
                },
            ) => ra == rb && la == lb,
            (Self::InvalidSeek { offset: a }, Self::InvalidSeek { offset: b }) => a == b,
            (Self::OutOfMemory { requested: a }, Self::OutOfMemory { requested: b }) => a == b,
            (Self::Code(a), Self::Code(b)) => a == b,
            _ => false,
        }
    }
}
