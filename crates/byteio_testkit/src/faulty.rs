//! A backend wrapper that counts calls and injects failures.
//!
//! The wrapper hands out a [`FaultHandle`] sharing its state, so a test
//! can arm faults and inspect counters while the stream owns the backend.

use byteio_backend::{Backend, BackendError, BackendResult, SeekFlags, Whence};
use parking_lot::Mutex;
use std::sync::Arc;

/// Call counters recorded by a [`FaultyBackend`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallStats {
    /// Backend reads, including ones returning end of data.
    pub reads: usize,
    /// Backend writes.
    pub writes: usize,
    /// Backend seeks.
    pub seeks: usize,
    /// Bytes delivered by reads.
    pub bytes_read: u64,
    /// Bytes accepted by writes.
    pub bytes_written: u64,
}

#[derive(Debug, Default)]
struct FaultState {
    stats: CallStats,
    fail_writes_after: Option<u64>,
    fail_reads_after: Option<u64>,
    fail_seeks: bool,
    tripped: bool,
}

/// Shared control over a [`FaultyBackend`].
#[derive(Debug, Clone, Default)]
pub struct FaultHandle {
    state: Arc<Mutex<FaultState>>,
}

impl FaultHandle {
    /// Returns a snapshot of the call counters.
    #[must_use]
    pub fn stats(&self) -> CallStats {
        self.state.lock().stats
    }

    /// Fails every write once `bytes` have been accepted.
    pub fn fail_writes_after(&self, bytes: u64) {
        self.state.lock().fail_writes_after = Some(bytes);
    }

    /// Fails every read once `bytes` have been delivered.
    pub fn fail_reads_after(&self, bytes: u64) {
        self.state.lock().fail_reads_after = Some(bytes);
    }

    /// Makes every seek fail.
    pub fn set_fail_seeks(&self, fail: bool) {
        self.state.lock().fail_seeks = fail;
    }

    /// Returns true once any injected fault fired.
    #[must_use]
    pub fn has_tripped(&self) -> bool {
        self.state.lock().tripped
    }

    /// Disarms all faults and zeroes the counters.
    pub fn reset(&self) {
        *self.state.lock() = FaultState::default();
    }
}

fn injected(what: &str) -> BackendError {
    std::io::Error::new(std::io::ErrorKind::Other, format!("injected {what} failure")).into()
}

/// Wraps a backend, counting its calls and failing them on demand.
#[derive(Debug)]
pub struct FaultyBackend<B> {
    inner: B,
    handle: FaultHandle,
}

impl<B: Backend> FaultyBackend<B> {
    /// Wraps `inner` with no faults armed.
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            handle: FaultHandle::default(),
        }
    }

    /// Returns a handle sharing this backend's state.
    #[must_use]
    pub fn handle(&self) -> FaultHandle {
        self.handle.clone()
    }

    /// Returns the wrapped backend.
    pub fn into_inner(self) -> B {
        self.inner
    }

    /// Returns a reference to the wrapped backend.
    pub fn inner(&self) -> &B {
        &self.inner
    }
}

impl<B: Backend> Backend for FaultyBackend<B> {
    fn read(&mut self, buf: &mut [u8]) -> BackendResult<usize> {
        let mut state = self.handle.state.lock();
        state.stats.reads += 1;
        if let Some(limit) = state.fail_reads_after {
            if state.stats.bytes_read >= limit {
                state.tripped = true;
                return Err(injected("read"));
            }
            let room = (limit - state.stats.bytes_read) as usize;
            let len = buf.len().min(room);
            let read = self.inner.read(&mut buf[..len])?;
            state.stats.bytes_read += read as u64;
            return Ok(read);
        }
        let read = self.inner.read(buf)?;
        state.stats.bytes_read += read as u64;
        Ok(read)
    }

    fn write(&mut self, buf: &[u8]) -> BackendResult<usize> {
        let mut state = self.handle.state.lock();
        state.stats.writes += 1;
        if let Some(limit) = state.fail_writes_after {
            if state.stats.bytes_written + buf.len() as u64 > limit {
                state.tripped = true;
                return Err(injected("write"));
            }
        }
        let written = self.inner.write(buf)?;
        state.stats.bytes_written += written as u64;
        Ok(written)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> BackendResult<u64> {
        let mut state = self.handle.state.lock();
        state.stats.seeks += 1;
        if state.fail_seeks {
            state.tripped = true;
            return Err(injected("seek"));
        }
        self.inner.seek(offset, whence)
    }

    fn size(&mut self) -> BackendResult<u64> {
        self.inner.size()
    }

    fn pause(&mut self, paused: bool) -> BackendResult<()> {
        self.inner.pause(paused)
    }

    fn seek_timestamp(
        &mut self,
        stream_index: Option<usize>,
        timestamp: i64,
        flags: SeekFlags,
    ) -> BackendResult<u64> {
        self.inner.seek_timestamp(stream_index, timestamp, flags)
    }

    fn is_streamed(&self) -> bool {
        self.inner.is_streamed()
    }

    fn max_packet_size(&self) -> Option<usize> {
        self.inner.max_packet_size()
    }

    fn close(&mut self) -> BackendResult<()> {
        self.inner.close()
    }
}
