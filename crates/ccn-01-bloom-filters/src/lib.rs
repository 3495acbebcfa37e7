//! # CCN-01 Bloom Filters
//!
//! Seeded Bloom filters used as exclusion elements in Interests.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure data structures, no I/O
//!   - `BloomFilter`: Fixed-size, seeded probabilistic set
//!   - `parameters`: Sizing from an expected element count
//!   - `hash_functions`: MurmurHash3 double hashing
//!
//! ## Invariants
//!
//! - No false negatives: once inserted, `test()` MUST return true.
//! - Seed, size and hash count never change after construction; bits only
//!   ever turn on.
//! - Identical seed, parameters and inputs serialize to identical bytes.
//!
//! ## Usage Example
//!
//! ```
//! use ccn_01_bloom_filters::BloomFilter;
//!
//! let mut filter = BloomFilter::new(13, *b"burp");
//! filter.insert(b"one");
//! assert!(filter.test(b"one"));
//!
//! let restored = BloomFilter::from_bytes(&filter.to_bytes()).unwrap();
//! assert_eq!(restored, filter);
//! ```

pub mod domain;
pub mod error;

pub use domain::*;
pub use error::FilterError;
