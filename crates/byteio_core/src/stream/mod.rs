//! The buffered stream context.
//!
//! A [`BufferedStream`] owns a fixed-capacity buffer between its caller and
//! a [`Backend`]. In read mode the buffer holds a window of bytes already
//! pulled from the backend; in write mode it holds bytes not yet pushed.
//!
//! ## Buffer window
//!
//! ```text
//! read mode:   [0 ........ ptr ........ end ........ capacity]
//!               ^ window base           ^ backend position (pos)
//!
//! write mode:  [0 ........ ptr ......................... end]
//!               ^ backend position (pos)                 ^ capacity
//! ```
//!
//! The absolute position of the cursor is `window_base + ptr`, where the
//! window base is `pos - end` in read mode and `pos` in write mode.
//!
//! ## Sticky state
//!
//! End of stream and the last backend error are recorded on the context
//! and persist until cleared: end of stream by a successful seek, the
//! error by [`BufferedStream::clear_error`].

mod io;
mod memory;
mod read;
mod seek;
mod write;

use crate::checksum::{ChecksumAccumulator, FoldFn};
use crate::config::{Mode, StreamConfig, WriteErrorPolicy, DEFAULT_BUFFER_SIZE};
use crate::error::{StreamError, StreamResult};
use byteio_backend::{Backend, BackendError};
use std::fmt;
use tracing::{debug, warn};

/// A buffered, seekable view over a byte-transport backend.
///
/// # Example
///
/// ```rust
/// use byteio_backend::MemoryBackend;
/// use byteio_core::BufferedStream;
///
/// let backend = MemoryBackend::with_data(b"hello world".to_vec());
/// let mut stream = BufferedStream::reader(backend).unwrap();
///
/// let mut word = [0u8; 5];
/// assert_eq!(stream.read_bytes(&mut word), 5);
/// assert_eq!(&word, b"hello");
/// assert_eq!(stream.tell(), 5);
/// ```
pub struct BufferedStream<B> {
    buffer: Vec<u8>,
    /// Cursor within `buffer`.
    ptr: usize,
    /// Read mode: end of valid data. Write mode: write limit (capacity).
    end: usize,
    /// Write mode: furthest offset written in the current window.
    dirty: usize,
    /// Absolute backend position (see module docs).
    pos: u64,
    mode: Mode,
    eof: bool,
    error: Option<BackendError>,
    forward_only: bool,
    must_flush: bool,
    max_packet_size: Option<usize>,
    write_error_policy: WriteErrorPolicy,
    checksum: Option<ChecksumAccumulator>,
    backend: B,
}

pub(crate) fn allocate_buffer(size: usize) -> StreamResult<Vec<u8>> {
    if size == 0 {
        return Err(StreamError::invalid_argument("buffer size must be non-zero"));
    }
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(size)
        .map_err(|_| StreamError::OutOfMemory { requested: size })?;
    buffer.resize(size, 0);
    Ok(buffer)
}

impl<B: Backend> BufferedStream<B> {
    /// Opens a stream over `backend`.
    ///
    /// The buffer is allocated once, sized by the configuration, else by
    /// the backend's maximum packet size, else [`DEFAULT_BUFFER_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer size is zero or cannot be allocated.
    pub fn new(backend: B, config: StreamConfig) -> StreamResult<Self> {
        let max_packet_size = backend.max_packet_size();
        let size = config
            .buffer_size
            .or(max_packet_size)
            .unwrap_or(DEFAULT_BUFFER_SIZE);
        let buffer = allocate_buffer(size)?;
        let forward_only = config
            .forward_only
            .unwrap_or_else(|| backend.is_streamed());
        let end = match config.mode {
            Mode::Read => 0,
            Mode::Write => size,
        };

        debug!(size, mode = %config.mode, forward_only, "opened buffered stream");

        Ok(Self {
            buffer,
            ptr: 0,
            end,
            dirty: 0,
            pos: 0,
            mode: config.mode,
            eof: false,
            error: None,
            forward_only,
            must_flush: false,
            max_packet_size,
            write_error_policy: config.write_error_policy,
            checksum: None,
            backend,
        })
    }

    /// Opens a read-mode stream with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot be allocated.
    pub fn reader(backend: B) -> StreamResult<Self> {
        Self::new(backend, StreamConfig::new())
    }

    /// Opens a write-mode stream with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot be allocated.
    pub fn writer(backend: B) -> StreamResult<Self> {
        Self::new(backend, StreamConfig::writing())
    }

    /// Flushes pending output, closes the backend and returns it.
    ///
    /// # Errors
    ///
    /// Returns the flush error (under [`WriteErrorPolicy::FailFast`]) or
    /// the backend's close error.
    pub fn close(mut self) -> StreamResult<B> {
        if self.mode == Mode::Write {
            self.flush()?;
        }
        self.backend.close()?;
        debug!(position = self.pos, "closed buffered stream");
        Ok(self.backend)
    }

    /// Returns the backend without flushing or closing it.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.backend
    }

    /// Attaches a checksum that folds every byte retired from the buffer
    /// from the current cursor onward.
    ///
    /// Replaces any checksum already attached.
    pub fn attach_checksum(&mut self, fold: FoldFn, seed: u64) {
        debug!(seed, cursor = self.ptr, "checksum attached");
        self.checksum = Some(ChecksumAccumulator::starting_at(fold, seed, self.ptr));
    }

    /// Folds the bytes up to the cursor, detaches the checksum and returns
    /// its final value.
    ///
    /// Returns `None` if no checksum is attached.
    pub fn detach_checksum(&mut self) -> Option<u64> {
        let mut checksum = self.checksum.take()?;
        checksum.fold_to(&self.buffer, self.ptr);
        debug!(value = checksum.value(), "checksum detached");
        Some(checksum.value())
    }

    /// Replaces the buffer with one of `size` bytes.
    ///
    /// Write mode flushes first. Read mode carries unread bytes over, so the
    /// logical position does not move.
    ///
    /// # Errors
    ///
    /// Returns an error if the size is zero, the new buffer cannot hold the
    /// unread bytes, allocation fails, or the flush fails.
    pub fn set_buffer_size(&mut self, size: usize) -> StreamResult<()> {
        match self.mode {
            Mode::Write => {
                self.flush_buffer()?;
                self.buffer = allocate_buffer(size)?;
                self.end = size;
            }
            Mode::Read => {
                let unread = self.end - self.ptr;
                if unread > size {
                    return Err(StreamError::invalid_argument(format!(
                        "buffer of {size} bytes cannot hold {unread} unread bytes"
                    )));
                }
                let mut buffer = allocate_buffer(size)?;
                if let Some(checksum) = &mut self.checksum {
                    checksum.fold_to(&self.buffer, self.ptr);
                    checksum.shift(self.ptr);
                }
                buffer[..unread].copy_from_slice(&self.buffer[self.ptr..self.end]);
                self.buffer = buffer;
                self.end = unread;
            }
        }
        self.ptr = 0;
        self.dirty = 0;
        debug!(size, "buffer resized");
        Ok(())
    }
}

impl<B> BufferedStream<B> {
    /// Returns the stream direction.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns true once a read hit the end of the stream.
    ///
    /// Sticky until a successful seek.
    #[must_use]
    pub const fn eof(&self) -> bool {
        self.eof
    }

    /// Returns the last backend error recorded on this stream.
    #[must_use]
    pub const fn error(&self) -> Option<&BackendError> {
        self.error.as_ref()
    }

    /// Clears the recorded backend error.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Returns the buffer capacity.
    #[must_use]
    pub fn buffer_capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the number of buffered bytes not yet read.
    #[must_use]
    pub const fn available(&self) -> usize {
        match self.mode {
            Mode::Read => self.end - self.ptr,
            Mode::Write => 0,
        }
    }

    /// Returns the backend's maximum packet size, if it reported one.
    #[must_use]
    pub const fn max_packet_size(&self) -> Option<usize> {
        self.max_packet_size
    }

    /// Returns true if seeks are served by reading forward where possible.
    #[must_use]
    pub const fn is_forward_only(&self) -> bool {
        self.forward_only
    }

    /// Returns true if a checksum is attached.
    #[must_use]
    pub const fn checksum_attached(&self) -> bool {
        self.checksum.is_some()
    }

    /// Returns the attached checksum state.
    #[must_use]
    pub const fn checksum(&self) -> Option<&ChecksumAccumulator> {
        self.checksum.as_ref()
    }

    /// Returns a reference to the backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns a mutable reference to the backend.
    ///
    /// Moving the backend behind the stream's back desynchronizes the
    /// buffer window.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Absolute position of `buffer[0]`.
    pub(crate) fn window_base(&self) -> u64 {
        match self.mode {
            Mode::Read => self.pos.saturating_sub(self.end as u64),
            Mode::Write => self.pos,
        }
    }

    /// Records a backend error as sticky state.
    pub(crate) fn record_error(&mut self, err: BackendError) {
        warn!(error = %err, "backend error recorded");
        self.error = Some(err);
    }
}

impl<B> fmt::Debug for BufferedStream<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferedStream")
            .field("mode", &self.mode)
            .field("capacity", &self.buffer.len())
            .field("ptr", &self.ptr)
            .field("end", &self.end)
            .field("pos", &self.pos)
            .field("eof", &self.eof)
            .field("error", &self.error)
            .field("forward_only", &self.forward_only)
            .field("must_flush", &self.must_flush)
            .field("checksum", &self.checksum)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::crc32_update;
    use crate::config::WriteErrorPolicy;
    use byteio_backend::{DynamicSink, MemoryBackend, Whence};

    #[test]
    fn new_uses_default_buffer_size() {
        let stream = BufferedStream::reader(MemoryBackend::new()).unwrap();
        assert_eq!(stream.buffer_capacity(), DEFAULT_BUFFER_SIZE);
        assert_eq!(stream.mode(), Mode::Read);
        assert!(!stream.eof());
        assert!(stream.error().is_none());
    }

    #[test]
    fn new_prefers_backend_packet_size() {
        let backend = MemoryBackend::new().max_packet(188);
        let stream = BufferedStream::reader(backend).unwrap();
        assert_eq!(stream.buffer_capacity(), 188);
        assert_eq!(stream.max_packet_size(), Some(188));
    }

    #[test]
    fn explicit_buffer_size_wins() {
        let backend = MemoryBackend::new().max_packet(188);
        let stream = BufferedStream::new(backend, StreamConfig::new().buffer_size(64)).unwrap();
        assert_eq!(stream.buffer_capacity(), 64);
    }

    #[test]
    fn zero_buffer_size_is_rejected() {
        let result = BufferedStream::new(MemoryBackend::new(), StreamConfig::new().buffer_size(0));
        assert!(matches!(result, Err(StreamError::InvalidArgument { .. })));
    }

    #[test]
    fn forward_only_follows_backend_unless_overridden() {
        let stream = BufferedStream::reader(MemoryBackend::new().forward_only()).unwrap();
        assert!(stream.is_forward_only());

        let stream =
            BufferedStream::new(MemoryBackend::new(), StreamConfig::new().forward_only(true))
                .unwrap();
        assert!(stream.is_forward_only());
    }

    #[test]
    fn close_flushes_and_returns_backend() {
        let mut stream = BufferedStream::writer(DynamicSink::new()).unwrap();
        stream.write_bytes(b"closing").unwrap();
        let sink = stream.close().unwrap();
        assert_eq!(sink.as_bytes(), b"closing");
    }

    #[test]
    fn into_inner_does_not_flush() {
        let mut stream = BufferedStream::writer(DynamicSink::new()).unwrap();
        stream.write_bytes(b"pending").unwrap();
        let sink = stream.into_inner();
        assert!(sink.is_empty());
    }

    #[test]
    fn detach_without_attach_is_none() {
        let mut stream = BufferedStream::reader(MemoryBackend::new()).unwrap();
        assert_eq!(stream.detach_checksum(), None);
    }

    #[test]
    fn checksum_over_read_window() {
        let data = b"0123456789".to_vec();
        let mut stream = BufferedStream::reader(MemoryBackend::with_data(data)).unwrap();
        stream.read_byte();
        stream.attach_checksum(crc32_update, 0);
        assert!(stream.checksum_attached());

        let mut buf = [0u8; 5];
        stream.read_bytes(&mut buf);
        assert_eq!(stream.detach_checksum(), Some(crc32_update(0, b"12345")));
        assert!(!stream.checksum_attached());
    }

    #[test]
    fn set_buffer_size_keeps_read_position() {
        let data: Vec<u8> = (0..100).collect();
        let mut stream =
            BufferedStream::new(MemoryBackend::with_data(data), StreamConfig::new().buffer_size(32))
                .unwrap();
        let mut buf = [0u8; 10];
        stream.read_bytes(&mut buf);

        stream.set_buffer_size(48).unwrap();
        assert_eq!(stream.buffer_capacity(), 48);
        assert_eq!(stream.tell(), 10);
        assert_eq!(stream.read_byte(), 10);

        let mut rest = Vec::new();
        while let Some(byte) = stream.read_char() {
            rest.push(byte);
        }
        assert_eq!(rest, (11..100).collect::<Vec<u8>>());
    }

    #[test]
    fn set_buffer_size_after_seek_back_folds_once() {
        let data: Vec<u8> = (0..32).collect();
        let mut stream = BufferedStream::new(
            MemoryBackend::with_data(data.clone()),
            StreamConfig::new().buffer_size(8),
        )
        .unwrap();
        let mut buf = [0u8; 6];
        stream.read_bytes(&mut buf);
        stream.attach_checksum(crc32_update, 0);
        stream.seek(2, Whence::Start).unwrap();

        stream.set_buffer_size(16).unwrap();
        let mut buf = [0u8; 10];
        assert_eq!(stream.read_bytes(&mut buf), 10);
        assert_eq!(buf.to_vec(), (2..12).collect::<Vec<u8>>());
        assert_eq!(stream.detach_checksum(), Some(crc32_update(0, &data[6..12])));
    }

    #[test]
    fn set_buffer_size_rejects_too_small_for_unread() {
        let mut stream = BufferedStream::new(
            MemoryBackend::with_data(vec![1; 64]),
            StreamConfig::new().buffer_size(32),
        )
        .unwrap();
        stream.read_byte();
        assert!(matches!(
            stream.set_buffer_size(8),
            Err(StreamError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn set_buffer_size_flushes_in_write_mode() {
        let mut stream = BufferedStream::new(
            DynamicSink::new(),
            StreamConfig::writing().write_error_policy(WriteErrorPolicy::FailFast),
        )
        .unwrap();
        stream.write_bytes(b"abc").unwrap();
        stream.set_buffer_size(2).unwrap();
        assert_eq!(stream.backend().as_bytes(), b"abc");
        stream.write_bytes(b"defg").unwrap();
        assert_eq!(stream.close_dyn_buf().unwrap(), b"abcdefg");
    }

    #[test]
    fn debug_output_omits_buffer_contents() {
        let stream = BufferedStream::reader(MemoryBackend::new()).unwrap();
        let rendered = format!("{stream:?}");
        assert!(rendered.contains("BufferedStream"));
        assert!(rendered.contains("capacity"));
    }
}
