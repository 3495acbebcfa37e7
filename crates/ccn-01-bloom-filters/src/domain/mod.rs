//! Domain layer for Bloom filters
//!
//! Pure data structures with no I/O.

pub mod bloom_filter;
pub mod hash_functions;
pub mod parameters;

pub use bloom_filter::{BloomFilter, SEED_LEN};
pub use parameters::{
    calculate_fpr, calculate_parameters, optimal_k, BloomFilterParams, BITS_PER_ELEMENT,
    MAX_HASH_COUNT, MAX_SIZE_BITS, MIN_HASH_COUNT, MIN_SIZE_BITS,
};
