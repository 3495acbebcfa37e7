//! # CCN-01 Bloom Filter Benchmarks
//!
//! Exclusion Bloom filters sit on every responder's matching path:
//! - Membership test per candidate component
//! - Construction from a batch of excluded components
//! - Wire encode/decode

use ccn_01_bloom_filters::BloomFilter;
use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use std::time::Duration;

fn random_components(count: usize) -> Vec<Vec<u8>> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let len = rng.gen_range(3..24);
            (0..len).map(|_| rng.gen()).collect()
        })
        .collect()
}

pub fn bench_membership(c: &mut Criterion) {
    let mut group = c.benchmark_group("ccn-01/bloom/membership");
    group.measurement_time(Duration::from_secs(5));

    for size in [13usize, 100, 600] {
        let members = random_components(size);
        let mut filter = BloomFilter::new(size, *b"burp");
        for member in &members {
            filter.insert(member);
        }
        let probes = random_components(256);

        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_with_input(BenchmarkId::new("test_absent", size), &probes, |b, probes| {
            b.iter(|| {
                let hits = probes.iter().filter(|p| filter.test(p)).count();
                black_box(hits)
            })
        });
        group.bench_with_input(BenchmarkId::new("test_present", size), &members, |b, members| {
            b.iter(|| {
                let hits = members.iter().filter(|m| filter.test(m)).count();
                black_box(hits)
            })
        });
    }

    group.finish();
}

pub fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("ccn-01/bloom/construction");

    for size in [13usize, 100, 600] {
        let members = random_components(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &members, |b, members| {
            b.iter(|| {
                let mut filter = BloomFilter::new(members.len(), *b"burp");
                for member in members {
                    filter.insert(member);
                }
                black_box(filter)
            })
        });
    }

    group.finish();
}

pub fn bench_wire(c: &mut Criterion) {
    let mut group = c.benchmark_group("ccn-01/bloom/wire");

    let mut filter = BloomFilter::new(100, *b"burp");
    for member in random_components(100) {
        filter.insert(&member);
    }
    let bytes = filter.to_bytes();

    group.bench_function("to_bytes", |b| b.iter(|| black_box(filter.to_bytes())));
    group.bench_function("from_bytes", |b| {
        b.iter(|| black_box(BloomFilter::from_bytes(&bytes).is_ok()))
    });

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_membership(c);
    bench_construction(c);
    bench_wire(c);
}
