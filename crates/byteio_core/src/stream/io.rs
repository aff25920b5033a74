//! `std::io` adapters so a stream plugs into the standard I/O ecosystem.

use super::BufferedStream;
use crate::error::StreamError;
use byteio_backend::{Backend, Whence};
use std::io::{self, SeekFrom};

impl<B: Backend> io::Read for BufferedStream<B> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = self.read_bytes(buf);
        if len == 0 && !buf.is_empty() {
            if let Some(err) = self.error() {
                return Err(StreamError::Backend(err.clone()).into());
            }
        }
        Ok(len)
    }
}

impl<B: Backend> io::Write for BufferedStream<B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        BufferedStream::flush(self)?;
        Ok(())
    }
}

impl<B: Backend> io::Seek for BufferedStream<B> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (offset, whence) = match pos {
            SeekFrom::Start(offset) => {
                let offset = i64::try_from(offset)
                    .map_err(|_| StreamError::invalid_argument("seek offset overflows"))?;
                (offset, Whence::Start)
            }
            SeekFrom::Current(offset) => (offset, Whence::Current),
            SeekFrom::End(offset) => {
                let size = self.size()?;
                let target = (size as i64)
                    .checked_add(offset)
                    .ok_or_else(|| StreamError::invalid_argument("seek offset overflows"))?;
                (target, Whence::Start)
            }
        };
        Ok(BufferedStream::seek(self, offset, whence)?)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.tell())
    }
}
