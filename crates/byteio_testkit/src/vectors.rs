//! Codec and checksum test vectors.
//!
//! The vectors pin the exact byte layout of every primitive and can be
//! exported as JSON for implementations outside this workspace.

use byteio_codec::{ByteRead, ByteWrite};
use byteio_core::{adler32_update, crc32_update};
use serde::{Deserialize, Serialize};

/// A primitive encoding covered by the vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// 16-bit little-endian.
    Le16,
    /// 24-bit little-endian.
    Le24,
    /// 32-bit little-endian.
    Le32,
    /// 64-bit little-endian.
    Le64,
    /// 16-bit big-endian.
    Be16,
    /// 24-bit big-endian.
    Be24,
    /// 32-bit big-endian.
    Be32,
    /// 64-bit big-endian.
    Be64,
    /// Variable-length quantity.
    Varint,
}

impl Encoding {
    /// Encodes `value` with this encoding.
    pub fn encode(self, value: u64) -> Vec<u8> {
        let mut out = Vec::new();
        let result = match self {
            Self::Le16 => out.write_le16(value as u16),
            Self::Le24 => out.write_le24(value as u32),
            Self::Le32 => out.write_le32(value as u32),
            Self::Le64 => out.write_le64(value),
            Self::Be16 => out.write_be16(value as u16),
            Self::Be24 => out.write_be24(value as u32),
            Self::Be32 => out.write_be32(value as u32),
            Self::Be64 => out.write_be64(value),
            Self::Varint => out.write_varint(value).map(|_| ()),
        };
        result.expect("Vec sink never fails");
        out
    }

    /// Decodes one value with this encoding from the front of `bytes`.
    pub fn decode(self, mut bytes: &[u8]) -> u64 {
        match self {
            Self::Le16 => u64::from(bytes.read_le16()),
            Self::Le24 => u64::from(bytes.read_le24()),
            Self::Le32 => u64::from(bytes.read_le32()),
            Self::Le64 => bytes.read_le64(),
            Self::Be16 => u64::from(bytes.read_be16()),
            Self::Be24 => u64::from(bytes.read_be24()),
            Self::Be32 => u64::from(bytes.read_be32()),
            Self::Be64 => bytes.read_be64(),
            Self::Varint => bytes.read_varint(),
        }
    }
}

/// One encoded value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Encoding under test.
    pub encoding: Encoding,
    /// Value to encode.
    pub value: u64,
    /// Expected bytes (hex-encoded).
    pub expected_hex: String,
}

/// A checksum over a fixed input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecksumVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Fold function name.
    pub algorithm: String,
    /// Seed value.
    pub seed: u64,
    /// Input data (hex-encoded).
    pub input_hex: String,
    /// Expected checksum.
    pub expected: u64,
}

fn codec(id: &str, encoding: Encoding, value: u64, expected_hex: &str) -> CodecVector {
    CodecVector {
        id: id.into(),
        encoding,
        value,
        expected_hex: expected_hex.into(),
    }
}

/// Fixed-width and varint vectors.
pub fn codec_vectors() -> Vec<CodecVector> {
    vec![
        codec("le16", Encoding::Le16, 0x0102, "0201"),
        codec("le24", Encoding::Le24, 0x01_0203, "030201"),
        codec("le32", Encoding::Le32, 0x0102_0304, "04030201"),
        codec("le64", Encoding::Le64, 0x0102_0304_0506_0708, "0807060504030201"),
        codec("be16", Encoding::Be16, 0x0102, "0102"),
        codec("be24", Encoding::Be24, 0x01_0203, "010203"),
        codec("be32", Encoding::Be32, 0x0102_0304, "01020304"),
        codec("be64", Encoding::Be64, 0x0102_0304_0506_0708, "0102030405060708"),
        codec("be32_max", Encoding::Be32, 0xffff_ffff, "ffffffff"),
        codec("varint_0", Encoding::Varint, 0, "00"),
        codec("varint_127", Encoding::Varint, 127, "7f"),
        codec("varint_128", Encoding::Varint, 128, "8100"),
        codec("varint_300", Encoding::Varint, 300, "822c"),
        codec("varint_16383", Encoding::Varint, 0x3fff, "ff7f"),
        codec("varint_16384", Encoding::Varint, 0x4000, "818000"),
        codec(
            "varint_max",
            Encoding::Varint,
            u64::MAX,
            "81ffffffffffffffff7f",
        ),
    ]
}

/// CRC-32 and Adler-32 vectors.
pub fn checksum_vectors() -> Vec<ChecksumVector> {
    let check = hex_encode(b"123456789");
    vec![
        ChecksumVector {
            id: "crc32_mpeg2".into(),
            algorithm: "crc32".into(),
            seed: 0xffff_ffff,
            input_hex: check.clone(),
            expected: 0x0376_e6e7,
        },
        ChecksumVector {
            id: "crc32_zero_seed".into(),
            algorithm: "crc32".into(),
            seed: 0,
            input_hex: check,
            expected: 0x89a1_897f,
        },
        ChecksumVector {
            id: "adler32_wikipedia".into(),
            algorithm: "adler32".into(),
            seed: 1,
            input_hex: hex_encode(b"Wikipedia"),
            expected: 0x11e6_0398,
        },
    ]
}

/// Folds a checksum vector with the named algorithm.
pub fn run_checksum(vector: &ChecksumVector) -> Option<u64> {
    let input = hex_decode(&vector.input_hex);
    match vector.algorithm.as_str() {
        "crc32" => Some(crc32_update(vector.seed, &input)),
        "adler32" => Some(adler32_update(vector.seed, &input)),
        _ => None,
    }
}

/// Generate all test vectors as JSON.
pub fn all_vectors_json() -> String {
    let vectors = AllTestVectors {
        codec: codec_vectors(),
        checksum: checksum_vectors(),
    };

    serde_json::to_string_pretty(&vectors).expect("Failed to serialize vectors")
}

#[derive(Debug, Serialize, Deserialize)]
struct AllTestVectors {
    codec: Vec<CodecVector>,
    checksum: Vec<ChecksumVector>,
}

/// Encodes bytes as hexadecimal string.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Decodes hexadecimal string to bytes.
pub fn hex_decode(hex: &str) -> Vec<u8> {
    let hex = hex.replace([' ', '\n', '\r'], "");
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("Invalid hex"))
        .collect()
}
