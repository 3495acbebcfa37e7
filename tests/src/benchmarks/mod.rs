//! # CCN-Core Benchmarks
//!
//! Hot-path throughput per crate. Each module exposes `register_benchmarks`,
//! wired into `benches/ccn_benchmarks.rs`.

pub mod ccn_01_bloom_filters;
pub mod ccn_02_interest_matching;
pub mod ccn_03_segment_retrieval;
