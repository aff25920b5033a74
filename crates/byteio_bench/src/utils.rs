//! Benchmark utilities.

use rand::Rng;

/// Buffer capacities the stream benchmarks sweep.
pub const BUFFER_SIZES: [usize; 4] = [64, 1024, 32 * 1024, 256 * 1024];

/// Generate random data of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Generate random varint values, with bit widths spread evenly so every
/// encoded length shows up.
pub fn varint_values(count: usize) -> Vec<u64> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let bits = rng.gen_range(1..=64u32);
            rng.gen::<u64>() >> (64 - bits)
        })
        .collect()
}

/// Generate random absolute offsets below `len`.
pub fn random_offsets(count: usize, len: usize) -> Vec<u64> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| rng.gen_range(0..len as u64)).collect()
}
