//! Write-side buffering: byte writes and flushing.

use super::BufferedStream;
use crate::config::{Mode, WriteErrorPolicy};
use crate::error::{StreamError, StreamResult};
use byteio_backend::{Backend, BackendError, Whence};
use std::fmt;
use tracing::trace;

impl<B: Backend> BufferedStream<B> {
    fn check_writable(&self) -> StreamResult<()> {
        if self.mode != Mode::Write {
            return Err(StreamError::WrongMode {
                expected: Mode::Write,
            });
        }
        match (&self.error, self.write_error_policy) {
            (Some(err), WriteErrorPolicy::FailFast) => Err(err.clone().into()),
            _ => Ok(()),
        }
    }

    fn apply_policy(&self, err: BackendError) -> StreamResult<()> {
        match self.write_error_policy {
            WriteErrorPolicy::FailFast => Err(err.into()),
            WriteErrorPolicy::DropSilently => Ok(()),
        }
    }

    /// Pushes the buffered span to the backend and empties the buffer.
    ///
    /// The span is dropped from the window whether or not the backend
    /// accepted it; a failure is recorded as sticky state. If the cursor
    /// was moved back inside the window, the whole written extent goes out
    /// and the backend is repositioned to the cursor.
    pub(crate) fn flush_buffer(&mut self) -> StreamResult<()> {
        if self.mode != Mode::Write {
            return Ok(());
        }

        let len = self.ptr.max(self.dirty);
        let mut result = Ok(());

        if len > 0 {
            match self.error.clone() {
                None => {
                    trace!(len, position = self.pos, "flushing buffer");
                    if let Err(err) = self.backend.write(&self.buffer[..len]) {
                        self.record_error(err.clone());
                        result = self.apply_policy(err);
                    }
                }
                Some(err) => result = self.apply_policy(err),
            }

            if let Some(checksum) = &mut self.checksum {
                checksum.fold_to(&self.buffer, len);
                checksum.rewind();
            }
            self.pos += len as u64;

            if self.ptr < len {
                let target = self.pos - (len - self.ptr) as u64;
                if self.error.is_none() {
                    if let Err(err) = self.backend.seek(target as i64, Whence::Start) {
                        self.record_error(err.clone());
                        result = self.apply_policy(err);
                    }
                }
                // The logical position follows the cursor even when the
                // backend could not.
                self.pos = target;
            }
        }

        self.ptr = 0;
        self.dirty = 0;
        result
    }

    /// Writes one byte, flushing when the buffer fills.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::WrongMode`] on a read stream, or the backend
    /// error under [`WriteErrorPolicy::FailFast`].
    pub fn write_byte(&mut self, byte: u8) -> StreamResult<()> {
        self.check_writable()?;
        self.buffer[self.ptr] = byte;
        self.ptr += 1;
        if self.ptr >= self.end {
            self.flush_buffer()?;
        }
        Ok(())
    }

    /// Writes all of `buf`, flushing each time the buffer fills.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::WrongMode`] on a read stream, or the backend
    /// error under [`WriteErrorPolicy::FailFast`].
    pub fn write_bytes(&mut self, buf: &[u8]) -> StreamResult<()> {
        self.check_writable()?;
        let mut rest = buf;
        while !rest.is_empty() {
            let len = (self.end - self.ptr).min(rest.len());
            self.buffer[self.ptr..self.ptr + len].copy_from_slice(&rest[..len]);
            self.ptr += len;
            if self.ptr >= self.end {
                self.flush_buffer()?;
            }
            rest = &rest[len..];
        }
        Ok(())
    }

    /// Writes formatted text and returns its length in bytes.
    ///
    /// # Errors
    ///
    /// Same as [`write_bytes`](Self::write_bytes).
    pub fn write_formatted(&mut self, args: fmt::Arguments<'_>) -> StreamResult<usize> {
        let text = fmt::format(args);
        self.write_bytes(text.as_bytes())?;
        Ok(text.len())
    }

    /// Pushes buffered output to the backend.
    ///
    /// Also clears the forced-flush state left by a backend-level seek, so
    /// later in-window seeks are served from the buffer again. Does nothing
    /// on a read stream.
    ///
    /// # Errors
    ///
    /// Returns the backend error under [`WriteErrorPolicy::FailFast`],
    /// including one recorded by an earlier flush.
    pub fn flush(&mut self) -> StreamResult<()> {
        let result = self.flush_buffer();
        self.must_flush = false;
        result?;
        if self.mode == Mode::Write {
            if let Some(err) = self.error.clone() {
                return self.apply_policy(err);
            }
        }
        Ok(())
    }
}
