//! In-memory backend for tests and fixtures.

use crate::backend::{Backend, Whence};
use crate::error::{BackendError, BackendResult};

/// An in-memory backend that behaves like a small file.
///
/// Reads and writes happen at a cursor; writing past the end extends the
/// content. Two knobs make it useful for exercising the buffered stream
/// against awkward transports:
///
/// - [`forward_only`](MemoryBackend::forward_only) removes the seek
///   capability and reports the backend as streamed
/// - [`max_read`](MemoryBackend::max_read) caps how many bytes a single
///   read returns, producing partial reads
///
/// # Example
///
/// ```rust
/// use byteio_backend::{Backend, MemoryBackend};
///
/// let mut backend = MemoryBackend::with_data(b"test data".to_vec()).max_read(4);
/// let mut buf = [0u8; 16];
/// assert_eq!(backend.read(&mut buf).unwrap(), 4);
/// assert_eq!(&buf[..4], b"test");
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    data: Vec<u8>,
    pos: usize,
    forward_only: bool,
    max_read: Option<usize>,
    max_packet_size: Option<usize>,
}

impl MemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend with pre-existing data.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Makes the backend forward-only: no seek, reported as streamed.
    #[must_use]
    pub fn forward_only(mut self) -> Self {
        self.forward_only = true;
        self
    }

    /// Caps the number of bytes returned by a single read.
    #[must_use]
    pub fn max_read(mut self, limit: usize) -> Self {
        self.max_read = Some(limit.max(1));
        self
    }

    /// Reports a maximum packet size to the stream.
    #[must_use]
    pub fn max_packet(mut self, size: usize) -> Self {
        self.max_packet_size = Some(size);
        self
    }

    /// Returns all data in the backend.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the backend and returns its data.
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Returns the current cursor.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Clears all data and rewinds the cursor.
    pub fn clear(&mut self) {
        self.data.clear();
        self.pos = 0;
    }
}

impl Backend for MemoryBackend {
    fn read(&mut self, buf: &mut [u8]) -> BackendResult<usize> {
        let available = self.data.len().saturating_sub(self.pos);
        let mut len = available.min(buf.len());
        if let Some(limit) = self.max_read {
            len = len.min(limit);
        }
        if len == 0 {
            return Ok(0);
        }
        buf[..len].copy_from_slice(&self.data[self.pos..self.pos + len]);
        self.pos += len;
        Ok(len)
    }

    fn write(&mut self, buf: &[u8]) -> BackendResult<usize> {
        let end = self.pos + buf.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[self.pos..end].copy_from_slice(buf);
        self.pos = end;
        Ok(buf.len())
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> BackendResult<u64> {
        if self.forward_only {
            return Err(BackendError::unsupported("seek"));
        }

        let base = match whence {
            Whence::Start => 0,
            Whence::Current => self.pos as i64,
            Whence::End => self.data.len() as i64,
        };
        let target = base
            .checked_add(offset)
            .ok_or(BackendError::InvalidSeek { offset })?;
        if target < 0 {
            return Err(BackendError::InvalidSeek { offset: target });
        }

        self.pos = target as usize;
        Ok(target as u64)
    }

    fn size(&mut self) -> BackendResult<u64> {
        if self.forward_only {
            return Err(BackendError::unsupported("size"));
        }
        Ok(self.data.len() as u64)
    }

    fn is_streamed(&self) -> bool {
        self.forward_only
    }

    fn max_packet_size(&self) -> Option<usize> {
        self.max_packet_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_empty() {
        let backend = MemoryBackend::new();
        assert!(backend.data().is_empty());
        assert_eq!(backend.position(), 0);
    }

    #[test]
    fn memory_read_advances_cursor() {
        let mut backend = MemoryBackend::with_data(b"hello world".to_vec());
        let mut buf = [0u8; 5];
        assert_eq!(backend.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf, b"hello");
        assert_eq!(backend.position(), 5);
    }

    #[test]
    fn memory_read_at_end_returns_zero() {
        let mut backend = MemoryBackend::with_data(b"hi".to_vec());
        let mut buf = [0u8; 8];
        assert_eq!(backend.read(&mut buf).unwrap(), 2);
        assert_eq!(backend.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn memory_max_read_produces_partial_reads() {
        let mut backend = MemoryBackend::with_data(b"abcdefg".to_vec()).max_read(3);
        let mut buf = [0u8; 16];
        assert_eq!(backend.read(&mut buf).unwrap(), 3);
        assert_eq!(backend.read(&mut buf).unwrap(), 3);
        assert_eq!(backend.read(&mut buf).unwrap(), 1);
        assert_eq!(backend.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn memory_write_overwrites_and_extends() {
        let mut backend = MemoryBackend::with_data(b"hello".to_vec());
        backend.seek(3, Whence::Start).unwrap();
        backend.write(b"p me").unwrap();
        assert_eq!(backend.data(), b"help me");
    }

    #[test]
    fn memory_seek_from_end() {
        let mut backend = MemoryBackend::with_data(b"hello".to_vec());
        assert_eq!(backend.seek(-1, Whence::End).unwrap(), 4);
        assert_eq!(backend.size().unwrap(), 5);
    }

    #[test]
    fn memory_negative_seek_fails() {
        let mut backend = MemoryBackend::with_data(b"hello".to_vec());
        assert!(matches!(
            backend.seek(-1, Whence::Start),
            Err(BackendError::InvalidSeek { offset: -1 })
        ));
    }

    #[test]
    fn memory_forward_only_cannot_seek() {
        let mut backend = MemoryBackend::with_data(b"hello".to_vec()).forward_only();
        assert!(backend.is_streamed());
        assert!(backend.seek(0, Whence::Start).unwrap_err().is_unsupported());
        assert!(backend.size().unwrap_err().is_unsupported());
    }

    #[test]
    fn memory_clear() {
        let mut backend = MemoryBackend::with_data(b"some data".to_vec());
        backend.clear();
        assert!(backend.data().is_empty());
        assert_eq!(backend.position(), 0);
    }
}
