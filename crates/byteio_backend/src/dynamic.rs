//! Growable in-memory sink backend.

use crate::backend::{Backend, Whence};
use crate::error::{BackendError, BackendResult};
use tracing::trace;

/// Largest content a dynamic sink accepts.
pub const MAX_DYN_SIZE: usize = i32::MAX as usize / 2;

/// Largest absolute offset a dynamic sink can seek to.
pub const MAX_DYN_SEEK: i64 = i32::MAX as i64;

/// Size of the big-endian length prefix written before each packet.
pub const PACKET_HEADER_SIZE: usize = 4;

/// A backend that accumulates everything written to it in memory.
///
/// Storage grows geometrically (`cap + cap / 2 + 1`) and is only ever
/// released by [`into_bytes`](DynamicSink::into_bytes). The sink tracks a
/// logical cursor and a high-water content length: seeking backward and
/// writing overwrites in place without shrinking the content.
///
/// In packetized mode every write is framed as a 4-byte big-endian length
/// followed by the payload, and the sink cannot seek.
///
/// # Example
///
/// ```rust
/// use byteio_backend::{Backend, DynamicSink, Whence};
///
/// let mut sink = DynamicSink::new();
/// sink.write(b"hello world").unwrap();
/// sink.seek(0, Whence::Start).unwrap();
/// sink.write(b"J").unwrap();
/// assert_eq!(sink.into_bytes(), b"Jello world");
/// ```
#[derive(Debug, Default)]
pub struct DynamicSink {
    /// Allocated storage; `data.len()` is the allocated size.
    data: Vec<u8>,
    pos: usize,
    size: usize,
    packetized: bool,
}

impl DynamicSink {
    /// Creates an empty raw sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty sink that frames each write as a packet.
    #[must_use]
    pub fn packetized() -> Self {
        Self {
            packetized: true,
            ..Self::default()
        }
    }

    /// Returns true if writes are length-prefixed.
    #[must_use]
    pub const fn is_packetized(&self) -> bool {
        self.packetized
    }

    /// Returns the allocated storage size.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns the high-water content length.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the logical write cursor.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the accumulated content.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.size]
    }

    /// Consumes the sink and transfers the accumulated content.
    ///
    /// The returned vector's length is the high-water content length.
    #[must_use]
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.data.truncate(self.size);
        self.data
    }

    fn append(&mut self, buf: &[u8]) -> BackendResult<usize> {
        let new_size = self
            .pos
            .checked_add(buf.len())
            .filter(|size| *size <= MAX_DYN_SIZE)
            .ok_or(BackendError::Overflow {
                requested: self.pos as u64 + buf.len() as u64,
                limit: MAX_DYN_SIZE as u64,
            })?;

        let mut new_capacity = self.data.len();
        while new_size > new_capacity {
            new_capacity = if new_capacity == 0 {
                new_size
            } else {
                new_capacity + new_capacity / 2 + 1
            };
        }

        if new_capacity > self.data.len() {
            self.data
                .try_reserve_exact(new_capacity - self.data.len())
                .map_err(|_| BackendError::OutOfMemory {
                    requested: new_capacity,
                })?;
            self.data.resize(new_capacity, 0);
            trace!(capacity = new_capacity, "dynamic sink grown");
        }

        self.data[self.pos..new_size].copy_from_slice(buf);
        self.pos = new_size;
        if self.pos > self.size {
            self.size = self.pos;
        }
        Ok(buf.len())
    }
}

impl Backend for DynamicSink {
    fn write(&mut self, buf: &[u8]) -> BackendResult<usize> {
        if self.packetized {
            let len = u32::try_from(buf.len()).map_err(|_| BackendError::Overflow {
                requested: buf.len() as u64,
                limit: u64::from(u32::MAX),
            })?;
            self.append(&len.to_be_bytes())?;
        }
        self.append(buf)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> BackendResult<u64> {
        if self.packetized {
            return Err(BackendError::unsupported("seek"));
        }

        let base = match whence {
            Whence::Start => 0,
            Whence::Current => self.pos as i64,
            Whence::End => self.size as i64,
        };
        let target = base
            .checked_add(offset)
            .ok_or(BackendError::InvalidSeek { offset })?;
        if !(0..=MAX_DYN_SEEK).contains(&target) {
            return Err(BackendError::InvalidSeek { offset: target });
        }

        self.pos = target as usize;
        Ok(target as u64)
    }

    fn size(&mut self) -> BackendResult<u64> {
        Ok(self.size as u64)
    }
}
