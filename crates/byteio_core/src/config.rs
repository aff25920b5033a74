//! Stream configuration.

use std::fmt;

/// Buffer size used when neither the caller nor the backend picks one.
pub const DEFAULT_BUFFER_SIZE: usize = 32 * 1024;

/// How far past the buffered window a forward-only stream may seek by
/// reading and discarding.
pub const SEEK_LOOKAHEAD: u64 = 1 << 16;

/// Buffer size of a stream over a raw dynamic sink.
pub const DYN_BUF_DEFAULT_SIZE: usize = 1024;

/// Direction of a buffered stream, fixed for its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// The stream pulls bytes from its backend.
    #[default]
    Read,
    /// The stream pushes bytes to its backend.
    Write,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("reading"),
            Self::Write => f.write_str("writing"),
        }
    }
}

/// What a write-mode stream does after its backend reported a write error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WriteErrorPolicy {
    /// Every later write and flush returns the recorded error.
    #[default]
    FailFast,
    /// Later writes are accepted into the buffer and dropped at flush time.
    /// Callers must poll [`crate::BufferedStream::error`] to detect loss.
    DropSilently,
}

/// Configuration for opening a buffered stream.
#[derive(Debug, Clone, Default)]
pub struct StreamConfig {
    /// Direction of the stream.
    pub mode: Mode,

    /// Buffer capacity. `None` uses the backend's maximum packet size, or
    /// [`DEFAULT_BUFFER_SIZE`] if it reports none.
    pub buffer_size: Option<usize>,

    /// Whether the backend can only move forward. `None` asks the backend.
    pub forward_only: Option<bool>,

    /// Behavior after a backend write error.
    pub write_error_policy: WriteErrorPolicy,
}

impl StreamConfig {
    /// Creates a read-mode configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a write-mode configuration with default values.
    #[must_use]
    pub fn writing() -> Self {
        Self::new().mode(Mode::Write)
    }

    /// Sets the stream direction.
    #[must_use]
    pub const fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets an explicit buffer capacity.
    #[must_use]
    pub const fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = Some(size);
        self
    }

    /// Overrides the backend's forward-only report.
    #[must_use]
    pub const fn forward_only(mut self, value: bool) -> Self {
        self.forward_only = Some(value);
        self
    }

    /// Sets the behavior after a backend write error.
    #[must_use]
    pub const fn write_error_policy(mut self, policy: WriteErrorPolicy) -> Self {
        self.write_error_policy = policy;
        self
    }
}
