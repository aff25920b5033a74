//! Byte sources and the decoding primitives built on them.
//!
//! Reads are permissive: past the end of the source every byte reads as
//! zero, so a truncated field decodes to a value padded with zeros. Check
//! [`ByteRead::at_end`] when truncation matters.

use crate::error::{CodecError, CodecResult};
use byteio_backend::Backend;
use byteio_core::BufferedStream;

/// A source of single bytes.
///
/// Only [`read_u8`](Self::read_u8) and [`at_end`](Self::at_end) are
/// required; the fixed-width readers are composed from them in a fixed
/// order (24 bits as 16 + 8, 32 as two 16-bit halves, 64 as two 32-bit
/// halves).
pub trait ByteRead {
    /// Reads one byte, or `0` once the source is exhausted.
    fn read_u8(&mut self) -> u8;

    /// Returns true once a read ran past the end of the source.
    fn at_end(&self) -> bool;

    /// Reads a little-endian 16-bit value.
    fn read_le16(&mut self) -> u16 {
        let low = u16::from(self.read_u8());
        low | (u16::from(self.read_u8()) << 8)
    }

    /// Reads a little-endian 24-bit value.
    fn read_le24(&mut self) -> u32 {
        let low = u32::from(self.read_le16());
        low | (u32::from(self.read_u8()) << 16)
    }

    /// Reads a little-endian 32-bit value.
    fn read_le32(&mut self) -> u32 {
        let low = u32::from(self.read_le16());
        low | (u32::from(self.read_le16()) << 16)
    }

    /// Reads a little-endian 64-bit value.
    fn read_le64(&mut self) -> u64 {
        let low = u64::from(self.read_le32());
        low | (u64::from(self.read_le32()) << 32)
    }

    /// Reads a big-endian 16-bit value.
    fn read_be16(&mut self) -> u16 {
        let high = u16::from(self.read_u8()) << 8;
        high | u16::from(self.read_u8())
    }

    /// Reads a big-endian 24-bit value.
    fn read_be24(&mut self) -> u32 {
        let high = u32::from(self.read_be16()) << 8;
        high | u32::from(self.read_u8())
    }

    /// Reads a big-endian 32-bit value.
    fn read_be32(&mut self) -> u32 {
        let high = u32::from(self.read_be16()) << 16;
        high | u32::from(self.read_be16())
    }

    /// Reads a big-endian 64-bit value.
    fn read_be64(&mut self) -> u64 {
        let high = u64::from(self.read_be32()) << 32;
        high | u64::from(self.read_be32())
    }

    /// Reads a variable-length quantity: 7 bits per byte, most significant
    /// group first, high bit set on every byte but the last.
    ///
    /// There is no length bound; bits shifted past 64 are lost. Use
    /// [`read_varint_limited`](Self::read_varint_limited) on untrusted
    /// input.
    fn read_varint(&mut self) -> u64 {
        let mut value = 0u64;
        loop {
            let byte = self.read_u8();
            value = (value << 7) | u64::from(byte & 0x7f);
            if byte & 0x80 == 0 {
                return value;
            }
        }
    }

    /// Reads a varint of at most `max_len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::VarintTooLong`] if the continuation bit is
    /// still set after `max_len` bytes.
    fn read_varint_limited(&mut self, max_len: usize) -> CodecResult<u64> {
        let mut value = 0u64;
        for _ in 0..max_len {
            let byte = self.read_u8();
            value = (value << 7) | u64::from(byte & 0x7f);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(CodecError::VarintTooLong { max_len })
    }

    /// Reads a zero-terminated string, keeping at most `max_len` bytes.
    ///
    /// The whole field is consumed, terminator included, whatever its
    /// length.
    fn read_strz(&mut self, max_len: usize) -> Vec<u8> {
        let mut out = Vec::new();
        loop {
            let byte = self.read_u8();
            if byte == 0 {
                return out;
            }
            if out.len() < max_len {
                out.push(byte);
            }
        }
    }

    /// Reads `N` raw bytes, such as a four-character tag.
    fn read_tag<const N: usize>(&mut self) -> [u8; N] {
        let mut tag = [0u8; N];
        for byte in &mut tag {
            *byte = self.read_u8();
        }
        tag
    }
}

impl<B: Backend> ByteRead for BufferedStream<B> {
    fn read_u8(&mut self) -> u8 {
        self.read_byte()
    }

    fn at_end(&self) -> bool {
        self.eof()
    }
}

impl ByteRead for &[u8] {
    fn read_u8(&mut self) -> u8 {
        match self.split_first() {
            Some((&byte, rest)) => {
                *self = rest;
                byte
            }
            None => 0,
        }
    }

    fn at_end(&self) -> bool {
        self.is_empty()
    }
}

impl<R: ByteRead + ?Sized> ByteRead for &mut R {
    fn read_u8(&mut self) -> u8 {
        (**self).read_u8()
    }

    fn at_end(&self) -> bool {
        (**self).at_end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteio_backend::MemoryBackend;
    use byteio_core::StreamConfig;

    /// Records every byte request so composition order is observable.
    struct Recorder<'a> {
        data: &'a [u8],
        calls: Vec<usize>,
    }

    impl ByteRead for Recorder<'_> {
        fn read_u8(&mut self) -> u8 {
            self.calls.push(self.data.len());
            self.data.read_u8()
        }

        fn at_end(&self) -> bool {
            self.data.is_empty()
        }
    }

    #[test]
    fn decode_fixed_widths() {
        let bytes = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

        assert_eq!((&bytes[..]).read_le16(), 0x0201);
        assert_eq!((&bytes[..]).read_le24(), 0x03_0201);
        assert_eq!((&bytes[..]).read_le32(), 0x0403_0201);
        assert_eq!((&bytes[..]).read_le64(), 0x0807_0605_0403_0201);

        assert_eq!((&bytes[..]).read_be16(), 0x0102);
        assert_eq!((&bytes[..]).read_be24(), 0x01_0203);
        assert_eq!((&bytes[..]).read_be32(), 0x0102_0304);
        assert_eq!((&bytes[..]).read_be64(), 0x0102_0304_0506_0708);
    }

    #[test]
    fn decode_advances_source() {
        let mut source: &[u8] = &[0xAA, 0xBB, 0xCC, 0x11];
        assert_eq!(source.read_be24(), 0xAA_BBCC);
        assert_eq!(source.read_u8(), 0x11);
        assert!(source.at_end());
    }

    #[test]
    fn decode_past_end_pads_with_zero() {
        let mut source: &[u8] = &[0x12];
        assert_eq!(source.read_be32(), 0x1200_0000);
        assert!(source.at_end());
    }

    #[test]
    fn decode_reads_bytes_in_order() {
        let mut recorder = Recorder {
            data: &[1, 2, 3, 4, 5, 6, 7, 8],
            calls: Vec::new(),
        };
        recorder.read_le64();
        assert_eq!(recorder.calls, [8, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn decode_from_buffered_stream() {
        let backend = MemoryBackend::with_data(vec![0xDE, 0xAD, 0xBE, 0xEF, 0x2A]);
        let mut stream = BufferedStream::new(backend, StreamConfig::new().buffer_size(3)).unwrap();
        assert_eq!(stream.read_be32(), 0xDEAD_BEEF);
        assert_eq!(stream.read_u8(), 0x2A);
        assert!(!stream.at_end());
        assert_eq!(stream.read_u8(), 0);
        assert!(stream.at_end());
    }

    #[test]
    fn varint_known_values() {
        assert_eq!((&[0x00][..]).read_varint(), 0);
        assert_eq!((&[0x7f][..]).read_varint(), 127);
        assert_eq!((&[0x81, 0x00][..]).read_varint(), 128);
        assert_eq!((&[0xff, 0x7f][..]).read_varint(), 0x3fff);
        assert_eq!((&[0x81, 0x80, 0x00][..]).read_varint(), 0x4000);
    }

    #[test]
    fn varint_stops_at_terminal_byte() {
        let mut source: &[u8] = &[0x82, 0x01, 0x05];
        assert_eq!(source.read_varint(), 0x101);
        assert_eq!(source.read_u8(), 0x05);
    }

    #[test]
    fn varint_limited_rejects_long_input() {
        let mut source: &[u8] = &[0x81, 0x80, 0x80, 0x00];
        assert_eq!(
            source.read_varint_limited(3),
            Err(CodecError::VarintTooLong { max_len: 3 })
        );

        let mut source: &[u8] = &[0x81, 0x80, 0x80, 0x00];
        assert_eq!(source.read_varint_limited(4), Ok(1 << 21));
    }

    #[test]
    fn strz_truncates_but_consumes_field() {
        let mut source: &[u8] = b"longname\0next\0";
        assert_eq!(source.read_strz(4), b"long");
        assert_eq!(source.read_strz(64), b"next");
        assert!(source.at_end());
    }

    #[test]
    fn strz_at_end_is_empty() {
        let mut source: &[u8] = b"";
        assert!(source.read_strz(8).is_empty());
    }

    #[test]
    fn tag_reads_raw_bytes() {
        let mut source: &[u8] = b"RIFF\x10";
        assert_eq!(source.read_tag::<4>(), *b"RIFF");
        assert_eq!(source.read_u8(), 0x10);
    }

    #[test]
    fn reads_through_mutable_reference() {
        let mut source: &[u8] = &[0x00, 0x2A];
        let by_ref = &mut source;
        assert_eq!(by_ref.read_be16(), 42);
    }
}
