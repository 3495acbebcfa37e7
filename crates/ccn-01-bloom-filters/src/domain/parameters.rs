//! Bloom filter sizing
//!
//! The filter travels inside an Interest, so its size is capped at 1 KiB.
//!
//! Formulas:
//! - m = next_power_of_two(12 * n), clamped to [64, 8192] bits
//! - k = round((m/n) * ln(2)), clamped to [1, 32]
//! - FPR = (1 - e^(-kn/m))^k

use std::f64::consts::LN_2;

/// Bits allotted per expected element before rounding.
pub const BITS_PER_ELEMENT: usize = 12;

/// Smallest filter, in bits.
pub const MIN_SIZE_BITS: usize = 64;

/// Largest filter, in bits (1 KiB).
pub const MAX_SIZE_BITS: usize = 8192;

pub const MIN_HASH_COUNT: usize = 1;
pub const MAX_HASH_COUNT: usize = 32;

/// Bloom filter parameters
#[derive(Clone, Debug, PartialEq)]
pub struct BloomFilterParams {
    /// Number of bits in the filter
    pub size_bits: usize,
    /// Number of hash functions
    pub hash_count: usize,
    /// Expected false positive rate once all elements are inserted
    pub expected_fpr: f64,
}

/// Calculate filter parameters for an expected number of elements
///
/// An expected count of zero is sized as one element.
pub fn calculate_parameters(expected_elements: usize) -> BloomFilterParams {
    let n = expected_elements.max(1);

    let m = n
        .saturating_mul(BITS_PER_ELEMENT)
        .min(MAX_SIZE_BITS)
        .next_power_of_two()
        .clamp(MIN_SIZE_BITS, MAX_SIZE_BITS);
    let k = optimal_k(m, n).clamp(MIN_HASH_COUNT, MAX_HASH_COUNT);

    BloomFilterParams {
        size_bits: m,
        hash_count: k,
        expected_fpr: calculate_fpr(m, n, k),
    }
}

/// Calculate the false positive rate for given parameters
///
/// Formula: FPR = (1 - e^(-kn/m))^k
pub fn calculate_fpr(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}

/// Calculate optimal k for given m and n
pub fn optimal_k(m: usize, n: usize) -> usize {
    if n == 0 {
        return 1;
    }
    ((m as f64 / n as f64) * LN_2).round() as usize
}

/// True if `size_bits` is a size a filter may have.
pub fn is_valid_size(size_bits: usize) -> bool {
    size_bits.is_power_of_two() && (MIN_SIZE_BITS..=MAX_SIZE_BITS).contains(&size_bits)
}

/// True if `hash_count` is a hash count a filter may have.
pub fn is_valid_hash_count(hash_count: usize) -> bool {
    (MIN_HASH_COUNT..=MAX_HASH_COUNT).contains(&hash_count)
}
