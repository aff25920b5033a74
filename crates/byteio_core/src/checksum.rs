//! Incremental checksum accumulation over retired buffer spans.
//!
//! A checksum is attached to a stream with a fold function and a seed.
//! Whenever the stream retires bytes from its buffer (a flush in write
//! mode, a refill in read mode, or the final detach) the span between the
//! last retirement point and the new one is folded in. The result only
//! depends on the byte sequence, never on where buffer boundaries fell.

/// A checksum update function: `fold(previous, bytes) -> next`.
pub type FoldFn = fn(u64, &[u8]) -> u64;

/// Running state of a checksum attached to a buffered stream.
#[derive(Debug, Clone, Copy)]
pub struct ChecksumAccumulator {
    fold: FoldFn,
    value: u64,
    /// Buffer offset up to which bytes have been folded.
    retired: usize,
}

impl ChecksumAccumulator {
    /// Creates an accumulator starting from `seed`.
    #[must_use]
    pub fn new(fold: FoldFn, seed: u64) -> Self {
        Self::starting_at(fold, seed, 0)
    }

    pub(crate) fn starting_at(fold: FoldFn, seed: u64, retired: usize) -> Self {
        Self {
            fold,
            value: seed,
            retired,
        }
    }

    /// Folds `data` into the running value.
    pub fn update(&mut self, data: &[u8]) {
        self.value = (self.fold)(self.value, data);
    }

    /// Returns the running value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Returns the buffer offset up to which bytes have been folded.
    #[must_use]
    pub const fn retired(&self) -> usize {
        self.retired
    }

    /// Folds `buffer[retired..upto]` and advances the retirement offset.
    pub(crate) fn fold_to(&mut self, buffer: &[u8], upto: usize) {
        if upto > self.retired {
            self.value = (self.fold)(self.value, &buffer[self.retired..upto]);
            self.retired = upto;
        }
    }

    /// Restarts retirement at the beginning of a reloaded buffer.
    pub(crate) fn rewind(&mut self) {
        self.retired = 0;
    }

    /// Moves the retirement offset back by `consumed` bytes dropped from
    /// the front of the buffer.
    pub(crate) fn shift(&mut self, consumed: usize) {
        self.retired = self.retired.saturating_sub(consumed);
    }
}

const CRC32_POLY: u32 = 0x04C1_1DB7;

const CRC32_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u32) << 24;
        let mut j = 0;
        while j < 8 {
            if crc & 0x8000_0000 != 0 {
                crc = (crc << 1) ^ CRC32_POLY;
            } else {
                crc <<= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

/// CRC-32 fold with polynomial 0x04C11DB7, MSB first, no reflection and no
/// final xor, as used by MPEG transport streams and Ogg pages.
///
/// Only the low 32 bits of `crc` are used. Seed with `0xFFFF_FFFF` for the
/// MPEG-2 variant or `0` for the Ogg variant.
#[allow(clippy::cast_possible_truncation)]
pub fn crc32_update(crc: u64, data: &[u8]) -> u64 {
    let mut crc = crc as u32;
    for &byte in data {
        let index = ((crc >> 24) ^ u32::from(byte)) & 0xFF;
        crc = (crc << 8) ^ CRC32_TABLE[index as usize];
    }
    u64::from(crc)
}

const ADLER_MOD: u64 = 65_521;

/// Adler-32 fold. Seed with `1`.
pub fn adler32_update(adler: u64, data: &[u8]) -> u64 {
    let mut a = adler & 0xFFFF;
    let mut b = (adler >> 16) & 0xFFFF;
    for &byte in data {
        a = (a + u64::from(byte)) % ADLER_MOD;
        b = (b + a) % ADLER_MOD;
    }
    (b << 16) | a
}
