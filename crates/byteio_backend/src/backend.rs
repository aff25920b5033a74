//! Backend capability trait definition.

use crate::error::{BackendError, BackendResult};
use std::ops::BitOr;

/// Reference point for [`Backend::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Whence {
    /// Offset is absolute.
    Start,
    /// Offset is relative to the current position.
    Current,
    /// Offset is relative to the end of the backend's content.
    End,
}

/// Flags for timestamp-based seeking.
///
/// The meaning of each flag is up to the backend; the buffered stream only
/// forwards them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SeekFlags(u32);

impl SeekFlags {
    /// Seek to the nearest position at or before the timestamp.
    pub const BACKWARD: Self = Self(1);
    /// Interpret the timestamp as a byte position.
    pub const BYTE: Self = Self(2);
    /// Allow landing on any position, not only on key points.
    pub const ANY: Self = Self(4);

    /// Returns an empty flag set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns the raw bit representation.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true if all flags in `other` are set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SeekFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A pluggable byte transport driven by the buffered stream.
///
/// Backends are **opaque byte movers**. They know nothing about buffering,
/// checksums or the values encoded in the bytes they carry. Every method
/// except [`read`](Backend::read) has a default that reports the
/// capability as absent, so a backend only implements what its transport
/// actually supports.
///
/// # Contract
///
/// - `read` returns the number of bytes placed in `buf`; `Ok(0)` means
///   natural end of data (or no read capability)
/// - `write` returns the number of bytes accepted
/// - `seek` returns the new absolute offset
/// - `size` answers a direct size query without moving the position
/// - `pause` and `seek_timestamp` are optional streaming controls
///
/// # Implementors
///
/// - [`super::DynamicSink`] - Growable in-memory sink
/// - [`super::MemoryBackend`] - In-memory source/sink for tests and fixtures
/// - [`super::FileBackend`] - Adapter over an opened file
/// - [`super::NullBackend`] - No capabilities at all
pub trait Backend {
    /// Reads up to `buf.len()` bytes into `buf`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails.
    fn read(&mut self, buf: &mut [u8]) -> BackendResult<usize> {
        let _ = buf;
        Ok(0)
    }

    /// Writes `buf` to the transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails or cannot be written.
    fn write(&mut self, buf: &[u8]) -> BackendResult<usize> {
        let _ = buf;
        Err(BackendError::unsupported("write"))
    }

    /// Repositions the transport and returns the new absolute offset.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unsupported`] if the transport cannot seek,
    /// or an error if the target is invalid.
    fn seek(&mut self, offset: i64, whence: Whence) -> BackendResult<u64> {
        let _ = (offset, whence);
        Err(BackendError::unsupported("seek"))
    }

    /// Returns the total size of the transport's content.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unsupported`] if no direct size query exists.
    fn size(&mut self) -> BackendResult<u64> {
        Err(BackendError::unsupported("size"))
    }

    /// Pauses or resumes a streaming transport.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unsupported`] if the transport cannot pause.
    fn pause(&mut self, paused: bool) -> BackendResult<()> {
        let _ = paused;
        Err(BackendError::unsupported("pause"))
    }

    /// Seeks to a timestamp within one of the transport's streams.
    ///
    /// Returns the new absolute byte offset.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unsupported`] if the transport has no notion
    /// of timestamps.
    fn seek_timestamp(
        &mut self,
        stream_index: Option<usize>,
        timestamp: i64,
        flags: SeekFlags,
    ) -> BackendResult<u64> {
        let _ = (stream_index, timestamp, flags);
        Err(BackendError::unsupported("seek_timestamp"))
    }

    /// Returns true if the transport can only move forward.
    fn is_streamed(&self) -> bool {
        false
    }

    /// Returns the largest record the transport carries in one write, if
    /// it imposes one.
    fn max_packet_size(&self) -> Option<usize> {
        None
    }

    /// Releases the transport.
    ///
    /// # Errors
    ///
    /// Returns an error if closing the transport fails.
    fn close(&mut self) -> BackendResult<()> {
        Ok(())
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn read(&mut self, buf: &mut [u8]) -> BackendResult<usize> {
        (**self).read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> BackendResult<usize> {
        (**self).write(buf)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> BackendResult<u64> {
        (**self).seek(offset, whence)
    }

    fn size(&mut self) -> BackendResult<u64> {
        (**self).size()
    }

    fn pause(&mut self, paused: bool) -> BackendResult<()> {
        (**self).pause(paused)
    }

    fn seek_timestamp(
        &mut self,
        stream_index: Option<usize>,
        timestamp: i64,
        flags: SeekFlags,
    ) -> BackendResult<u64> {
        (**self).seek_timestamp(stream_index, timestamp, flags)
    }

    fn is_streamed(&self) -> bool {
        (**self).is_streamed()
    }

    fn max_packet_size(&self) -> Option<usize> {
        (**self).max_packet_size()
    }

    fn close(&mut self) -> BackendResult<()> {
        (**self).close()
    }
}

/// A backend with no capabilities.
///
/// Reads report end of data immediately; every other operation is
/// unsupported. Used by streams whose whole content lives in their buffer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackend;

impl Backend for NullBackend {}
