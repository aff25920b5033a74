//! Streams over in-memory storage: a fixed byte vector for reading and a
//! growable [`DynamicSink`] for writing.

use super::BufferedStream;
use crate::config::{Mode, StreamConfig, WriteErrorPolicy, DYN_BUF_DEFAULT_SIZE};
use crate::error::{StreamError, StreamResult};
use byteio_backend::{DynamicSink, NullBackend};
use tracing::debug;

impl BufferedStream<NullBackend> {
    /// Opens a read stream whose whole content is `bytes`.
    ///
    /// There is no backend behind the window: seeks inside the bytes work,
    /// anything else fails as unsupported.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let len = bytes.len();
        Self {
            buffer: bytes,
            ptr: 0,
            end: len,
            dirty: 0,
            pos: len as u64,
            mode: Mode::Read,
            eof: false,
            error: None,
            forward_only: false,
            must_flush: false,
            max_packet_size: None,
            write_error_policy: WriteErrorPolicy::default(),
            checksum: None,
            backend: NullBackend,
        }
    }
}

impl BufferedStream<DynamicSink> {
    /// Opens a write stream over a growable in-memory sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream buffer cannot be allocated.
    pub fn open_dyn_buf() -> StreamResult<Self> {
        Self::new(
            DynamicSink::new(),
            StreamConfig::writing().buffer_size(DYN_BUF_DEFAULT_SIZE),
        )
    }

    /// Opens a write stream over a packetized sink.
    ///
    /// Every flush becomes one length-prefixed packet of at most
    /// `max_packet_size` bytes. The sink cannot seek.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidArgument`] if `max_packet_size` is zero.
    pub fn open_dyn_packet_buf(max_packet_size: usize) -> StreamResult<Self> {
        if max_packet_size == 0 {
            return Err(StreamError::invalid_argument(
                "packet size must be non-zero",
            ));
        }
        let mut stream = Self::new(
            DynamicSink::packetized(),
            StreamConfig::writing().buffer_size(max_packet_size),
        )?;
        stream.max_packet_size = Some(max_packet_size);
        Ok(stream)
    }

    /// Flushes, closes the stream and hands over the accumulated bytes.
    ///
    /// # Errors
    ///
    /// Returns the flush error under [`WriteErrorPolicy::FailFast`].
    pub fn close_dyn_buf(mut self) -> StreamResult<Vec<u8>> {
        self.flush()?;
        let bytes = self.backend.into_bytes();
        debug!(len = bytes.len(), "dynamic buffer closed");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use crate::checksum::{adler32_update, crc32_update};
    use crate::config::{Mode, StreamConfig};
    use crate::error::StreamError;
    use crate::BufferedStream;
    use byteio_backend::{DynamicSink, MemoryBackend, Whence, PACKET_HEADER_SIZE};
    use proptest::prelude::*;

    #[test]
    fn from_bytes_reads_whole_vector() {
        let mut stream = BufferedStream::from_bytes(b"fixed".to_vec());
        assert_eq!(stream.mode(), Mode::Read);
        assert_eq!(stream.available(), 5);
        assert_eq!(stream.tell(), 0);

        let mut buf = [0u8; 16];
        assert_eq!(stream.read_bytes(&mut buf), 5);
        assert_eq!(&buf[..5], b"fixed");
        assert!(stream.eof());
    }

    #[test]
    fn from_bytes_seeks_inside_only() {
        let mut stream = BufferedStream::from_bytes(b"0123456789".to_vec());
        assert_eq!(stream.seek(7, Whence::Start).unwrap(), 7);
        assert_eq!(stream.read_byte(), b'7');
        assert_eq!(stream.seek(2, Whence::Start).unwrap(), 2);
        assert_eq!(stream.read_byte(), b'2');
        assert!(stream.seek(10, Whence::Start).unwrap_err().is_unsupported());
    }

    #[test]
    fn open_dyn_buf_uses_small_buffer() {
        let stream = BufferedStream::open_dyn_buf().unwrap();
        assert_eq!(stream.buffer_capacity(), crate::config::DYN_BUF_DEFAULT_SIZE);
        assert_eq!(stream.mode(), Mode::Write);
    }

    #[test]
    fn dyn_buf_collects_large_output() {
        let data: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        let mut stream = BufferedStream::open_dyn_buf().unwrap();
        stream.write_bytes(&data).unwrap();
        assert_eq!(stream.close_dyn_buf().unwrap(), data);
    }

    #[test]
    fn dyn_buf_write_seek_overwrite() {
        let mut stream = BufferedStream::open_dyn_buf().unwrap();
        stream.write_bytes(b"ABCDEFGH").unwrap();
        stream.seek(2, Whence::Start).unwrap();
        stream.write_bytes(b"xy").unwrap();
        assert_eq!(stream.close_dyn_buf().unwrap(), b"ABxyEFGH");
    }

    #[test]
    fn dyn_buf_empty_close() {
        let stream = BufferedStream::open_dyn_buf().unwrap();
        assert!(stream.close_dyn_buf().unwrap().is_empty());
    }

    #[test]
    fn packet_buf_frames_each_flush() {
        let mut stream = BufferedStream::open_dyn_packet_buf(4).unwrap();
        assert_eq!(stream.max_packet_size(), Some(4));
        stream.write_bytes(b"abcdef").unwrap();
        let bytes = stream.close_dyn_buf().unwrap();
        assert_eq!(
            bytes,
            [&[0, 0, 0, 4][..], b"abcd", &[0, 0, 0, 2][..], b"ef"].concat()
        );
        assert_eq!(bytes.len(), 6 + 2 * PACKET_HEADER_SIZE);
    }

    #[test]
    fn packet_buf_rejects_zero_size() {
        assert!(matches!(
            BufferedStream::open_dyn_packet_buf(0),
            Err(StreamError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn packet_buf_cannot_seek_backend() {
        let mut stream = BufferedStream::open_dyn_packet_buf(4).unwrap();
        stream.write_bytes(b"abcdef").unwrap();
        assert!(stream.seek(0, Whence::Start).unwrap_err().is_unsupported());
    }

    #[test]
    fn checksum_on_write_matches_direct() {
        let data = b"checksummed output spanning several flushes";
        let mut stream =
            BufferedStream::new(DynamicSink::new(), StreamConfig::writing().buffer_size(5))
                .unwrap();
        stream.attach_checksum(crc32_update, 0);
        stream.write_bytes(data).unwrap();
        assert_eq!(stream.detach_checksum(), Some(crc32_update(0, data)));
    }

    proptest! {
        #[test]
        fn read_checksum_independent_of_buffer_size(
            data in prop::collection::vec(any::<u8>(), 0..512),
            buffer_size in 1usize..64,
            split in 0usize..512,
        ) {
            let split = split.min(data.len());
            let mut stream = BufferedStream::new(
                MemoryBackend::with_data(data.clone()),
                StreamConfig::new().buffer_size(buffer_size),
            )
            .unwrap();
            let mut head = vec![0u8; split];
            prop_assert_eq!(stream.read_bytes(&mut head), split);

            stream.attach_checksum(adler32_update, 1);
            let mut rest = vec![0u8; data.len() - split];
            prop_assert_eq!(stream.read_bytes(&mut rest), rest.len());
            prop_assert_eq!(stream.detach_checksum(), Some(adler32_update(1, &data[split..])));
        }
    }
}
