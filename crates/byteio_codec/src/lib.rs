//! # byteio Codec
//!
//! Binary primitives on top of byteio streams.
//!
//! This crate provides:
//! - Fixed-width integers, 16/24/32/64 bits, little- and big-endian
//! - Variable-length quantities (7 bits per byte, most significant first)
//! - Zero-terminated strings and raw tags
//!
//! Everything is expressed through two small traits, [`ByteRead`] and
//! [`ByteWrite`], implemented for [`BufferedStream`](byteio_core::BufferedStream)
//! as well as for plain slices and vectors.
//!
//! ## Usage
//!
//! ```
//! use byteio_codec::{ByteRead, ByteWrite};
//!
//! let mut out = Vec::new();
//! out.write_be32(0xCAFE_F00D).unwrap();
//! out.write_varint(300).unwrap();
//!
//! let mut source = out.as_slice();
//! assert_eq!(source.read_be32(), 0xCAFE_F00D);
//! assert_eq!(source.read_varint(), 300);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;

pub use decoder::ByteRead;
pub use encoder::{varint_len, ByteWrite};
pub use error::{CodecError, CodecResult};

#[cfg(test)]
mod tests {
    use super::*;
    use byteio_backend::{MemoryBackend, Whence};
    use byteio_core::{BufferedStream, StreamConfig};

    #[test]
    fn roundtrip_through_streams() {
        let mut writer = BufferedStream::open_dyn_buf().unwrap();
        writer.write_tag("HDR0").unwrap();
        writer.write_le16(7).unwrap();
        writer.write_be64(u64::MAX - 1).unwrap();
        writer.write_strz(Some(b"title")).unwrap();
        writer.write_varint(1 << 40).unwrap();
        let bytes = writer.close_dyn_buf().unwrap();

        let backend = MemoryBackend::with_data(bytes);
        let mut reader = BufferedStream::new(backend, StreamConfig::new().buffer_size(5)).unwrap();
        assert_eq!(reader.read_tag::<4>(), *b"HDR0");
        assert_eq!(reader.read_le16(), 7);
        assert_eq!(reader.read_be64(), u64::MAX - 1);
        assert_eq!(reader.read_strz(64), b"title");
        assert_eq!(reader.read_varint(), 1 << 40);
        assert_eq!(reader.read_u8(), 0);
        assert!(reader.at_end());
    }

    #[test]
    fn patch_length_after_payload() {
        let mut writer = BufferedStream::open_dyn_buf().unwrap();
        writer.write_tag("LIST").unwrap();
        writer.write_be32(0).unwrap();
        writer.write_slice(b"payload").unwrap();
        let end = writer.tell();

        writer.seek(4, Whence::Start).unwrap();
        writer.write_be32((end - 8) as u32).unwrap();
        writer.seek(end as i64, Whence::Start).unwrap();
        writer.write_u8(b'!').unwrap();

        assert_eq!(writer.close_dyn_buf().unwrap(), b"LIST\0\0\0\x07payload!");
    }
}
