//! Core Bloom filter implementation
//!
//! INVARIANTS:
//! - No false negatives: if inserted, `test()` MUST return true
//! - Size, hash count and seed are fixed at construction

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::hash_functions::compute_hash_positions;
use super::parameters::{calculate_fpr, calculate_parameters, is_valid_hash_count, is_valid_size};
use crate::error::FilterError;

/// Length of a filter seed in bytes.
pub const SEED_LEN: usize = 4;

/// Seeded Bloom filter over name components
///
/// False positives are possible, false negatives are not. The seed varies
/// the bit positions so that different Interests excluding the same
/// components do not produce identical filters.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BloomWire", into = "BloomWire")]
pub struct BloomFilter {
    /// Bit array storing the filter state
    bits: BitVec<u8, Lsb0>,
    /// Number of hash functions (k)
    k: usize,
    /// Seed folded into every hash
    seed: [u8; SEED_LEN],
}

/// Encoded form: seed, hash count, raw bit bytes.
#[derive(Serialize, Deserialize)]
struct BloomWire {
    seed: [u8; SEED_LEN],
    hash_count: u8,
    bits: Vec<u8>,
}

impl From<BloomFilter> for BloomWire {
    fn from(filter: BloomFilter) -> Self {
        Self {
            seed: filter.seed,
            hash_count: filter.k as u8,
            bits: filter.bits.as_raw_slice().to_vec(),
        }
    }
}

impl TryFrom<BloomWire> for BloomFilter {
    type Error = FilterError;

    fn try_from(wire: BloomWire) -> Result<Self, Self::Error> {
        let size_bits = wire.bits.len() * 8;
        if !is_valid_size(size_bits) {
            return Err(FilterError::Malformed(format!(
                "{} bit payload is not a power of two in range",
                size_bits
            )));
        }
        let k = wire.hash_count as usize;
        if !is_valid_hash_count(k) {
            return Err(FilterError::Malformed(format!("hash count {} out of range", k)));
        }
        Ok(Self {
            bits: BitVec::from_vec(wire.bits),
            k,
            seed: wire.seed,
        })
    }
}

impl BloomFilter {
    /// Create a filter sized for `expected_elements`
    pub fn new(expected_elements: usize, seed: [u8; SEED_LEN]) -> Self {
        let params = calculate_parameters(expected_elements);
        Self {
            bits: bitvec![u8, Lsb0; 0; params.size_bits],
            k: params.hash_count,
            seed,
        }
    }

    /// Create a filter with explicit parameters
    ///
    /// `size_bits` must be a power of two in [64, 8192] and `hash_count`
    /// in [1, 32].
    pub fn with_parameters(
        size_bits: usize,
        hash_count: usize,
        seed: [u8; SEED_LEN],
    ) -> Result<Self, FilterError> {
        if !is_valid_size(size_bits) {
            return Err(FilterError::InvalidParameters(format!(
                "size {} must be a power of two in [64, 8192]",
                size_bits
            )));
        }
        if !is_valid_hash_count(hash_count) {
            return Err(FilterError::InvalidParameters(format!(
                "hash count {} must be in [1, 32]",
                hash_count
            )));
        }
        Ok(Self {
            bits: bitvec![u8, Lsb0; 0; size_bits],
            k: hash_count,
            seed,
        })
    }

    /// Insert an element
    ///
    /// Idempotent. After insertion `test(element)` returns true.
    pub fn insert(&mut self, element: &[u8]) {
        for pos in self.positions(element) {
            self.bits.set(pos, true);
        }
    }

    /// Test if an element might be in the filter
    ///
    /// `false` means the element was definitely never inserted.
    pub fn test(&self, element: &[u8]) -> bool {
        self.positions(element).iter().all(|&pos| self.bits[pos])
    }

    fn positions(&self, element: &[u8]) -> Vec<usize> {
        compute_hash_positions(element, self.k, self.bits.len(), u32::from_le_bytes(self.seed))
    }

    /// False positive rate after `n` insertions
    pub fn false_positive_rate(&self, n: usize) -> f64 {
        calculate_fpr(self.bits.len(), n, self.k)
    }

    /// Get the number of bits set in the filter
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Get the filter size in bits
    pub fn size_bits(&self) -> usize {
        self.bits.len()
    }

    /// Get the number of hash functions
    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// Get the seed
    pub fn seed(&self) -> [u8; SEED_LEN] {
        self.seed
    }

    /// Serialize the filter to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).unwrap_or_default()
    }

    /// Deserialize and validate a filter
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FilterError> {
        let wire: BloomWire = bincode::deserialize(bytes)
            .map_err(|e| FilterError::SerializationError(e.to_string()))?;
        Self::try_from(wire)
    }
}

impl fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilter")
            .field("size_bits", &self.bits.len())
            .field("hash_count", &self.k)
            .field("seed", &self.seed)
            .field("bits_set", &self.bits_set())
            .finish()
    }
}
