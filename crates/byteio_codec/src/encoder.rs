//! Byte sinks and the encoding primitives built on them.

use crate::error::CodecResult;
use byteio_backend::Backend;
use byteio_core::BufferedStream;

/// A sink of bytes.
///
/// Fixed-width writers are composed from single bytes (24 bits as 16 + 8,
/// 64 as two 32-bit halves), so a sink observes exactly the byte sequence
/// a stream would.
pub trait ByteWrite {
    /// Writes one byte.
    ///
    /// # Errors
    ///
    /// Returns the sink's error.
    fn write_u8(&mut self, byte: u8) -> CodecResult<()>;

    /// Writes a run of bytes.
    ///
    /// # Errors
    ///
    /// Returns the sink's error.
    fn write_slice(&mut self, bytes: &[u8]) -> CodecResult<()>;

    /// Writes a little-endian 16-bit value.
    ///
    /// # Errors
    ///
    /// Returns the sink's error.
    fn write_le16(&mut self, value: u16) -> CodecResult<()> {
        self.write_u8(value as u8)?;
        self.write_u8((value >> 8) as u8)
    }

    /// Writes the low 24 bits of `value`, little-endian.
    ///
    /// # Errors
    ///
    /// Returns the sink's error.
    fn write_le24(&mut self, value: u32) -> CodecResult<()> {
        self.write_le16(value as u16)?;
        self.write_u8((value >> 16) as u8)
    }

    /// Writes a little-endian 32-bit value.
    ///
    /// # Errors
    ///
    /// Returns the sink's error.
    fn write_le32(&mut self, value: u32) -> CodecResult<()> {
        self.write_u8(value as u8)?;
        self.write_u8((value >> 8) as u8)?;
        self.write_u8((value >> 16) as u8)?;
        self.write_u8((value >> 24) as u8)
    }

    /// Writes a little-endian 64-bit value.
    ///
    /// # Errors
    ///
    /// Returns the sink's error.
    fn write_le64(&mut self, value: u64) -> CodecResult<()> {
        self.write_le32(value as u32)?;
        self.write_le32((value >> 32) as u32)
    }

    /// Writes a big-endian 16-bit value.
    ///
    /// # Errors
    ///
    /// Returns the sink's error.
    fn write_be16(&mut self, value: u16) -> CodecResult<()> {
        self.write_u8((value >> 8) as u8)?;
        self.write_u8(value as u8)
    }

    /// Writes the low 24 bits of `value`, big-endian.
    ///
    /// # Errors
    ///
    /// Returns the sink's error.
    fn write_be24(&mut self, value: u32) -> CodecResult<()> {
        self.write_be16((value >> 8) as u16)?;
        self.write_u8(value as u8)
    }

    /// Writes a big-endian 32-bit value.
    ///
    /// # Errors
    ///
    /// Returns the sink's error.
    fn write_be32(&mut self, value: u32) -> CodecResult<()> {
        self.write_u8((value >> 24) as u8)?;
        self.write_u8((value >> 16) as u8)?;
        self.write_u8((value >> 8) as u8)?;
        self.write_u8(value as u8)
    }

    /// Writes a big-endian 64-bit value.
    ///
    /// # Errors
    ///
    /// Returns the sink's error.
    fn write_be64(&mut self, value: u64) -> CodecResult<()> {
        self.write_be32((value >> 32) as u32)?;
        self.write_be32(value as u32)
    }

    /// Writes `value` as a minimal-length varint and returns its length.
    ///
    /// # Errors
    ///
    /// Returns the sink's error.
    fn write_varint(&mut self, value: u64) -> CodecResult<usize> {
        let len = varint_len(value);
        for group in (1..len).rev() {
            self.write_u8(0x80 | (value >> (7 * group)) as u8)?;
        }
        self.write_u8((value & 0x7f) as u8)?;
        Ok(len)
    }

    /// Writes a zero-terminated string and returns the bytes written.
    ///
    /// The string ends at its first zero byte, if any. `None` writes just
    /// the terminator.
    ///
    /// # Errors
    ///
    /// Returns the sink's error.
    fn write_strz(&mut self, text: Option<&[u8]>) -> CodecResult<usize> {
        let text = text.unwrap_or_default();
        let len = text.iter().position(|&b| b == 0).unwrap_or(text.len());
        self.write_slice(&text[..len])?;
        self.write_u8(0)?;
        Ok(len + 1)
    }

    /// Writes the bytes of an ASCII tag with no terminator.
    ///
    /// # Errors
    ///
    /// Returns the sink's error.
    fn write_tag(&mut self, tag: &str) -> CodecResult<()> {
        self.write_slice(tag.as_bytes())
    }
}

/// Returns the number of bytes [`ByteWrite::write_varint`] emits for `value`.
#[must_use]
pub const fn varint_len(value: u64) -> usize {
    let bits = (u64::BITS - value.leading_zeros()) as usize;
    if bits == 0 {
        1
    } else {
        bits.div_ceil(7)
    }
}

impl<B: Backend> ByteWrite for BufferedStream<B> {
    fn write_u8(&mut self, byte: u8) -> CodecResult<()> {
        Ok(self.write_byte(byte)?)
    }

    fn write_slice(&mut self, bytes: &[u8]) -> CodecResult<()> {
        Ok(self.write_bytes(bytes)?)
    }
}

impl ByteWrite for Vec<u8> {
    fn write_u8(&mut self, byte: u8) -> CodecResult<()> {
        self.push(byte);
        Ok(())
    }

    fn write_slice(&mut self, bytes: &[u8]) -> CodecResult<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl<W: ByteWrite + ?Sized> ByteWrite for &mut W {
    fn write_u8(&mut self, byte: u8) -> CodecResult<()> {
        (**self).write_u8(byte)
    }

    fn write_slice(&mut self, bytes: &[u8]) -> CodecResult<()> {
        (**self).write_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::ByteRead;
    use crate::error::CodecError;
    use byteio_core::{Mode, StreamError};
    use proptest::prelude::*;

    fn encoded(f: impl FnOnce(&mut Vec<u8>) -> CodecResult<()>) -> Vec<u8> {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        out
    }

    #[test]
    fn encode_fixed_widths() {
        assert_eq!(encoded(|w| w.write_le16(0x0102)), [0x02, 0x01]);
        assert_eq!(encoded(|w| w.write_le24(0x0102_0304)), [0x04, 0x03, 0x02]);
        assert_eq!(encoded(|w| w.write_le32(0x0102_0304)), [0x04, 0x03, 0x02, 0x01]);
        assert_eq!(
            encoded(|w| w.write_le64(0x0102_0304_0506_0708)),
            [0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]
        );

        assert_eq!(encoded(|w| w.write_be16(0x0102)), [0x01, 0x02]);
        assert_eq!(encoded(|w| w.write_be24(0x0102_0304)), [0x02, 0x03, 0x04]);
        assert_eq!(encoded(|w| w.write_be32(0x0102_0304)), [0x01, 0x02, 0x03, 0x04]);
        assert_eq!(
            encoded(|w| w.write_be64(0x0102_0304_0506_0708)),
            [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]
        );
    }

    #[test]
    fn varint_encoding_is_minimal() {
        let mut out = Vec::new();
        assert_eq!(out.write_varint(0).unwrap(), 1);
        assert_eq!(out, [0x00]);

        let mut out = Vec::new();
        out.write_varint(128).unwrap();
        assert_eq!(out, [0x81, 0x00]);

        let mut out = Vec::new();
        out.write_varint(0x3fff).unwrap();
        assert_eq!(out, [0xff, 0x7f]);

        assert_eq!(varint_len(127), 1);
        assert_eq!(varint_len(128), 2);
        assert_eq!(varint_len(u64::MAX), 10);
    }

    #[test]
    fn strz_writes_terminator() {
        let mut out = Vec::new();
        assert_eq!(out.write_strz(Some(b"name")).unwrap(), 5);
        assert_eq!(out.write_strz(None).unwrap(), 1);
        assert_eq!(out.write_strz(Some(b"cut\0off")).unwrap(), 4);
        assert_eq!(out, b"name\0\0cut\0");
    }

    #[test]
    fn tag_has_no_terminator() {
        let mut out = Vec::new();
        out.write_tag("ftyp").unwrap();
        out.write_be16(1).unwrap();
        assert_eq!(out, b"ftyp\x00\x01");
    }

    #[test]
    fn encode_into_stream() {
        let mut stream = BufferedStream::open_dyn_buf().unwrap();
        stream.write_tag("RIFF").unwrap();
        stream.write_le32(36).unwrap();
        stream.write_varint(300).unwrap();
        assert_eq!(
            stream.close_dyn_buf().unwrap(),
            [b'R', b'I', b'F', b'F', 36, 0, 0, 0, 0x82, 0x2c]
        );
    }

    #[test]
    fn encode_into_read_stream_fails() {
        let mut stream = BufferedStream::from_bytes(vec![0; 4]);
        assert_eq!(
            stream.write_be16(1),
            Err(CodecError::Stream(StreamError::WrongMode {
                expected: Mode::Write
            }))
        );
    }

    proptest! {
        #[test]
        fn fixed_width_roundtrip(a in any::<u16>(), b in any::<u32>(), c in any::<u64>()) {
            let mut out = Vec::new();
            out.write_le16(a).unwrap();
            out.write_be16(a).unwrap();
            out.write_le24(b).unwrap();
            out.write_be24(b).unwrap();
            out.write_le32(b).unwrap();
            out.write_be32(b).unwrap();
            out.write_le64(c).unwrap();
            out.write_be64(c).unwrap();

            let mut source = out.as_slice();
            prop_assert_eq!(source.read_le16(), a);
            prop_assert_eq!(source.read_be16(), a);
            prop_assert_eq!(source.read_le24(), b & 0x00ff_ffff);
            prop_assert_eq!(source.read_be24(), b & 0x00ff_ffff);
            prop_assert_eq!(source.read_le32(), b);
            prop_assert_eq!(source.read_be32(), b);
            prop_assert_eq!(source.read_le64(), c);
            prop_assert_eq!(source.read_be64(), c);
            prop_assert!(source.at_end());
        }

        #[test]
        fn varint_roundtrip_minimal(value in any::<u64>()) {
            let mut out = Vec::new();
            let len = out.write_varint(value).unwrap();
            prop_assert_eq!(len, out.len());
            prop_assert_eq!(len, varint_len(value));
            prop_assert_eq!(out.as_slice().read_varint(), value);
        }
    }
}
