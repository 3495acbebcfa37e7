//! # CCN-02 Interest Matching
//!
//! Decides whether named content satisfies an Interest.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure matching logic, no I/O
//!   - `ExcludeFilter`: Ordered explicit exclusions interleaved with Bloom filters
//!   - `Interest`: Query descriptor and the `matches` predicate
//!
//! ## Matching
//!
//! `Interest::matches` runs four short-circuiting tests against the candidate
//! name (extended with the content digest when an object is supplied):
//!
//! 1. Prefix: the Interest name is a prefix of the candidate
//! 2. Suffix length: components beyond the prefix lie within the bounds
//! 3. Exclusion: the next component is not excluded
//! 4. Publisher: the object's publisher (or digest) equals the constraint
//!
//! Matching is total: absent selectors skip their test, and the predicate
//! never fails for well-formed inputs.
//!
//! ## Invariants
//!
//! - No false negatives: a name excluded explicitly or by a Bloom element in
//!   range never matches.
//! - Exclusion applies to exactly one component position.

pub mod domain;
pub mod error;

pub use domain::*;
pub use error::ExcludeError;
