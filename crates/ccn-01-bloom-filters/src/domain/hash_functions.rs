//! Hash functions for Bloom filters
//!
//! Uses MurmurHash3 with two index seeds and the filter seed folded in.

use std::io::Cursor;

/// Hash an element with MurmurHash3 using an index seed and the filter seed
pub fn murmur_hash(element: &[u8], index_seed: u32, filter_seed: u32) -> u64 {
    let combined_seed = index_seed.wrapping_add(filter_seed);
    let mut cursor = Cursor::new(element);

    // Lower 64 bits of the 128-bit hash
    let hash = murmur3::murmur3_x64_128(&mut cursor, combined_seed).unwrap_or(0);
    hash as u64
}

/// Compute k bit positions for an element
///
/// Double hashing: h(i) = h1 + i * h2
pub fn compute_hash_positions(element: &[u8], k: usize, m: usize, filter_seed: u32) -> Vec<usize> {
    let h1 = murmur_hash(element, 0, filter_seed);
    let h2 = murmur_hash(element, 1, filter_seed);

    (0..k)
        .map(|i| {
            let hash = h1.wrapping_add((i as u64).wrapping_mul(h2));
            (hash % m as u64) as usize
        })
        .collect()
}
