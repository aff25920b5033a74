//! Seek engine and backend-level stream controls.
//!
//! A seek is served by the cheapest of three strategies:
//!
//! 1. **In-window**: the target lies inside the buffered window (in write
//!    mode, inside the part already written); only the cursor moves.
//! 2. **Forward replay**: the backend is forward-only, the stream reads,
//!    and the target lies within [`SEEK_LOOKAHEAD`] bytes past the window;
//!    the buffer is refilled until the target is reached.
//! 3. **Backend seek**: everything else; the window is discarded and the
//!    backend is repositioned.

use super::BufferedStream;
use crate::config::{Mode, SEEK_LOOKAHEAD};
use crate::error::{StreamError, StreamResult};
use byteio_backend::{Backend, SeekFlags, Whence};
use tracing::debug;

impl<B: Backend> BufferedStream<B> {
    /// Moves the cursor and returns the new absolute position.
    ///
    /// Only [`Whence::Start`] and [`Whence::Current`] are accepted. A
    /// successful seek clears end of stream.
    ///
    /// # Errors
    ///
    /// - [`StreamError::InvalidArgument`] for [`Whence::End`] or a negative
    ///   target
    /// - [`StreamError::BrokenStream`] if a forward replay ran out of data
    /// - [`StreamError::Backend`] with the backend's own error otherwise
    pub fn seek(&mut self, offset: i64, whence: Whence) -> StreamResult<u64> {
        let base = self.window_base();

        let target = match whence {
            Whence::Start => offset,
            Whence::Current => {
                let current = base + self.ptr as u64;
                if offset == 0 {
                    return Ok(current);
                }
                (current as i64)
                    .checked_add(offset)
                    .ok_or_else(|| StreamError::invalid_argument("seek offset overflows"))?
            }
            Whence::End => {
                return Err(StreamError::invalid_argument(
                    "seek relative to end is not supported by buffered streams",
                ))
            }
        };
        let target = u64::try_from(target)
            .map_err(|_| StreamError::invalid_argument(format!("negative seek target {target}")))?;

        let window = self.end as u64;
        let ahead = target.checked_sub(base);

        match ahead {
            Some(relative) if !self.must_flush && self.in_window(relative) => {
                debug!(target, "seek inside buffer window");
                if self.mode == Mode::Write {
                    self.dirty = self.dirty.max(self.ptr);
                }
                self.ptr = relative as usize;
            }
            Some(relative)
                if self.forward_only
                    && self.mode == Mode::Read
                    && relative < window + SEEK_LOOKAHEAD =>
            {
                debug!(target, from = self.pos, "seek by forward replay");
                while self.pos < target && !self.eof {
                    self.fill_buffer();
                }
                if self.pos < target {
                    return Err(StreamError::BrokenStream {
                        target,
                        reached: self.pos,
                    });
                }
                self.ptr = self.end - (self.pos - target) as usize;
            }
            _ => {
                debug!(target, mode = %self.mode, "seek through backend");
                if self.mode == Mode::Write {
                    self.flush_buffer()?;
                    self.must_flush = true;
                }
                self.backend.seek(target as i64, Whence::Start)?;
                if self.mode == Mode::Read {
                    self.discard_read_window();
                }
                self.ptr = 0;
                self.pos = target;
            }
        }

        self.eof = false;
        Ok(target)
    }

    /// Read mode: inside the valid data. Write mode: inside the bytes
    /// already written to this window, end included.
    fn in_window(&self, relative: u64) -> bool {
        match self.mode {
            Mode::Read => relative < self.end as u64,
            Mode::Write => relative <= self.dirty.max(self.ptr) as u64,
        }
    }

    /// Skips `delta` bytes relative to the cursor.
    ///
    /// # Errors
    ///
    /// Same as [`seek`](Self::seek).
    pub fn skip(&mut self, delta: i64) -> StreamResult<u64> {
        self.seek(delta, Whence::Current)
    }

    /// Returns the total size of the backend's content.
    ///
    /// Uses the backend's direct size query when it has one; otherwise
    /// probes by seeking to the last byte and restores the backend position.
    ///
    /// # Errors
    ///
    /// Returns the backend error if neither query nor probe is possible.
    pub fn size(&mut self) -> StreamResult<u64> {
        if let Ok(size) = self.backend.size() {
            return Ok(size);
        }
        let last = self.backend.seek(-1, Whence::End)?;
        self.backend.seek(self.pos as i64, Whence::Start)?;
        Ok(last + 1)
    }

    /// Pauses or resumes a streaming backend.
    ///
    /// # Errors
    ///
    /// Returns an unsupported error if the backend cannot pause.
    pub fn pause(&mut self, paused: bool) -> StreamResult<()> {
        self.backend.pause(paused)?;
        Ok(())
    }

    /// Seeks the backend to a timestamp and returns the new byte offset.
    ///
    /// The buffer window is discarded and end of stream is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::WrongMode`] on a write stream, or the
    /// backend error (unsupported if the backend has no timestamps).
    pub fn seek_timestamp(
        &mut self,
        stream_index: Option<usize>,
        timestamp: i64,
        flags: SeekFlags,
    ) -> StreamResult<u64> {
        if self.mode != Mode::Read {
            return Err(StreamError::WrongMode {
                expected: Mode::Read,
            });
        }
        let offset = self
            .backend
            .seek_timestamp(stream_index, timestamp, flags)?;
        debug!(timestamp, offset, "seek by timestamp");
        self.discard_read_window();
        self.ptr = 0;
        self.pos = offset;
        self.eof = false;
        Ok(offset)
    }

    /// Empties the read window, retiring it into the checksum the way a
    /// refill does.
    fn discard_read_window(&mut self) {
        if let Some(checksum) = &mut self.checksum {
            checksum.fold_to(&self.buffer, self.end);
            checksum.rewind();
        }
        self.end = 0;
    }
}

impl<B> BufferedStream<B> {
    /// Returns the absolute position of the cursor.
    #[must_use]
    pub fn tell(&self) -> u64 {
        self.window_base() + self.ptr as u64
    }
}
