//! # Integration Tests
//!
//! Cross-crate scenarios:
//! - `matching_flows`: Interests, exclusion and Bloom filters on the responder side
//! - `retrieval_flows`: windowed retrieval through the session registry

pub mod matching_flows;
pub mod retrieval_flows;
