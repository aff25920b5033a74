//! Read-side buffering: fills, byte reads and bulk reads.

use super::BufferedStream;
use crate::config::Mode;
use byteio_backend::Backend;
use tracing::trace;

impl<B: Backend> BufferedStream<B> {
    /// Reloads the buffer from the backend.
    ///
    /// Does nothing once end of stream is set. On end of data or error the
    /// buffer is left untouched, so a seek back into the old window still
    /// works without a backend round trip.
    pub(crate) fn fill_buffer(&mut self) {
        if self.eof || self.mode != Mode::Read {
            return;
        }

        if let Some(checksum) = &mut self.checksum {
            checksum.fold_to(&self.buffer, self.end);
        }

        match self.backend.read(&mut self.buffer) {
            Ok(0) => {
                trace!(position = self.pos, "backend reached end of stream");
                self.eof = true;
            }
            Ok(len) => {
                let len = len.min(self.buffer.len());
                trace!(len, position = self.pos, "buffer filled");
                self.pos += len as u64;
                self.ptr = 0;
                self.end = len;
                if let Some(checksum) = &mut self.checksum {
                    checksum.rewind();
                }
            }
            Err(err) => {
                self.eof = true;
                self.record_error(err);
            }
        }
    }

    /// Reads the next byte, or `None` at end of stream.
    pub fn read_char(&mut self) -> Option<u8> {
        if self.available() == 0 {
            self.fill_buffer();
            if self.available() == 0 {
                return None;
            }
        }
        let byte = self.buffer[self.ptr];
        self.ptr += 1;
        Some(byte)
    }

    /// Reads the next byte, or `0` at end of stream.
    ///
    /// Use [`eof`](Self::eof) to tell a real zero from the end.
    pub fn read_byte(&mut self) -> u8 {
        self.read_char().unwrap_or(0)
    }

    /// Reads up to `dst.len()` bytes, returning how many were delivered.
    ///
    /// Fewer bytes than requested means end of stream. Requests larger
    /// than the buffer bypass it and read straight into `dst` when no
    /// checksum is attached.
    pub fn read_bytes(&mut self, dst: &mut [u8]) -> usize {
        let mut filled = 0;

        while filled < dst.len() {
            let available = self.available();
            if available > 0 {
                let len = available.min(dst.len() - filled);
                dst[filled..filled + len].copy_from_slice(&self.buffer[self.ptr..self.ptr + len]);
                self.ptr += len;
                filled += len;
                continue;
            }

            let remaining = dst.len() - filled;
            if remaining > self.buffer.len() && self.checksum.is_none() && self.mode == Mode::Read {
                if self.eof {
                    break;
                }
                match self.backend.read(&mut dst[filled..]) {
                    Ok(0) => {
                        self.eof = true;
                        break;
                    }
                    Ok(len) => {
                        let len = len.min(remaining);
                        trace!(len, position = self.pos, "direct read bypassed buffer");
                        self.pos += len as u64;
                        filled += len;
                        self.ptr = 0;
                        self.end = 0;
                    }
                    Err(err) => {
                        self.eof = true;
                        self.record_error(err);
                        break;
                    }
                }
            } else {
                self.fill_buffer();
                if self.available() == 0 {
                    break;
                }
            }
        }

        filled
    }

    /// Reads at most `dst.len()` bytes with at most one backend round trip.
    ///
    /// Refills only if the buffer is empty and never loops.
    pub fn read_partial(&mut self, dst: &mut [u8]) -> usize {
        if self.available() == 0 {
            self.fill_buffer();
        }
        let len = self.available().min(dst.len());
        dst[..len].copy_from_slice(&self.buffer[self.ptr..self.ptr + len]);
        self.ptr += len;
        len
    }

    /// Reads a zero-terminated field into `dst`.
    ///
    /// Consumes bytes up to and including the terminator (or end of
    /// stream). At most `dst.len() - 1` bytes are stored and a terminator
    /// is always written after them; the rest of a long field is consumed
    /// and discarded so later reads stay aligned. Returns the stored length.
    pub fn read_null_terminated(&mut self, dst: &mut [u8]) -> usize {
        let mut len = 0;
        loop {
            let byte = self.read_byte();
            if byte == 0 {
                break;
            }
            if len + 1 < dst.len() {
                dst[len] = byte;
                len += 1;
            }
        }
        if let Some(slot) = dst.get_mut(len) {
            *slot = 0;
        }
        len
    }

    /// Reads a line terminated by `\n` or end of stream.
    ///
    /// Returns `None` if the stream is already at its end. At most
    /// `max_len` bytes are kept; the rest of the line is consumed. The
    /// newline itself is consumed but not returned.
    pub fn read_line(&mut self, max_len: usize) -> Option<Vec<u8>> {
        let mut byte = self.read_char()?;
        let mut line = Vec::new();
        loop {
            if byte == b'\n' {
                break;
            }
            if line.len() < max_len {
                line.push(byte);
            }
            match self.read_char() {
                Some(next) => byte = next,
                None => break,
            }
        }
        Some(line)
    }
}
