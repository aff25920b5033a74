//! Property-based test generators using proptest.
//!
//! Provides strategies for payloads, call-size splits, buffer sizes and
//! stream operation sequences.

use proptest::prelude::*;

/// Strategy for arbitrary payloads of up to `max_len` bytes.
pub fn payload_strategy(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Strategy for a payload cut into chunks, as a caller issuing several
/// writes of varying size would produce.
pub fn chunked_payload_strategy(
    max_chunks: usize,
    max_chunk_len: usize,
) -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(payload_strategy(max_chunk_len), 0..=max_chunks)
}

/// Strategy for stream buffer capacities, biased toward tiny buffers so
/// boundaries are crossed often.
pub fn buffer_size_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![
        4 => 1usize..16,
        2 => 16usize..256,
        1 => 256usize..4096,
    ]
}

/// Strategy for varint values spread across every encoded length.
pub fn varint_value_strategy() -> impl Strategy<Value = u64> {
    (0u32..=64, any::<u64>()).prop_map(|(bits, raw)| {
        if bits == 0 {
            0
        } else {
            raw >> (64 - bits)
        }
    })
}

/// Strategy for zero-free strings, as written by `write_strz`.
pub fn strz_strategy(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(1u8..=255, 0..=max_len)
}

/// One step applied to a write stream.
#[derive(Debug, Clone)]
pub enum StreamOp {
    /// Write bytes at the cursor.
    Write(Vec<u8>),
    /// Seek to an absolute offset, clamped to the written length.
    Seek(u64),
    /// Flush the buffer.
    Flush,
}

/// Strategy for a single write-stream operation.
pub fn stream_op_strategy() -> impl Strategy<Value = StreamOp> {
    prop_oneof![
        4 => payload_strategy(48).prop_map(StreamOp::Write),
        2 => (0u64..256).prop_map(StreamOp::Seek),
        1 => Just(StreamOp::Flush),
    ]
}

/// Strategy for a sequence of write-stream operations.
pub fn stream_op_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<StreamOp>> {
    prop::collection::vec(stream_op_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn buffer_size_is_usable(size in buffer_size_strategy()) {
            prop_assert!(size > 0);
            prop_assert!(size < 4096);
        }

        #[test]
        fn strz_has_no_terminator(text in strz_strategy(32)) {
            prop_assert!(!text.contains(&0));
        }

        #[test]
        fn chunks_respect_bounds(chunks in chunked_payload_strategy(8, 16)) {
            prop_assert!(chunks.len() <= 8);
            prop_assert!(chunks.iter().all(|chunk| chunk.len() <= 16));
        }
    }
}
