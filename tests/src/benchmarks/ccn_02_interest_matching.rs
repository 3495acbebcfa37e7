//! # CCN-02 Interest Matching Benchmarks
//!
//! - Plain prefix match against names of growing depth
//! - Match with explicit and Bloom exclusions
//! - Digest-extended match (hashes the object on every call)
//! - Best-candidate selection over a content store

use ccn_01_bloom_filters::BloomFilter;
use ccn_02_interest_matching::{ChildSelector, ExcludeElement, ExcludeFilter, Interest};
use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use shared_types::{ContentObject, Name, NameComponent};
use std::time::Duration;

fn deep_name(depth: usize) -> Name {
    Name::new((0..depth).map(|i| format!("level{}", i).into_bytes()))
}

pub fn bench_prefix_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("ccn-02/matching/prefix");
    group.measurement_time(Duration::from_secs(5));

    for depth in [2usize, 8, 32] {
        let candidate = deep_name(depth);
        let interest = Interest::new(candidate.cut(depth / 2));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &candidate, |b, candidate| {
            b.iter(|| black_box(interest.matches(candidate, None)))
        });
    }

    group.finish();
}

pub fn bench_exclusion_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("ccn-02/matching/exclusion");

    let mut bloom = BloomFilter::new(64, *b"burp");
    for i in 0..64 {
        bloom.insert(format!("m{:03}", i).as_bytes());
    }
    let exclude = ExcludeFilter::new(vec![
        ExcludeElement::Component(NameComponent::from("a")),
        ExcludeElement::Bloom(bloom),
        ExcludeElement::Component(NameComponent::from("zz")),
    ])
    .unwrap();
    let interest = Interest::new(Name::from_uri("/store").unwrap()).with_exclude(exclude);

    let excluded = Name::from_uri("/store/m007").unwrap();
    let allowed = Name::from_uri("/store/car").unwrap();

    group.bench_function("excluded_by_bloom", |b| {
        b.iter(|| black_box(interest.matches(&excluded, None)))
    });
    group.bench_function("allowed", |b| b.iter(|| black_box(interest.matches(&allowed, None))));

    group.finish();
}

pub fn bench_digest_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("ccn-02/matching/digest");

    for size in [64usize, 1024, 8192] {
        let object = ContentObject::builder(Name::from_uri("/blob").unwrap())
            .content(vec![0x5Au8; size])
            .build();
        let interest = Interest::new(object.full_name());
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &object, |b, object| {
            b.iter(|| black_box(interest.matches_object(object)))
        });
    }

    group.finish();
}

pub fn bench_select_best(c: &mut Criterion) {
    let mut group = c.benchmark_group("ccn-02/matching/select_best");

    for count in [16usize, 256, 2048] {
        let store: Vec<ContentObject> = (0..count)
            .map(|i| {
                let name = Name::from_uri("/store")
                    .unwrap()
                    .append(format!("item{:05}", i).as_str());
                ContentObject::builder(name).build()
            })
            .collect();
        let interest = Interest::new(Name::from_uri("/store").unwrap())
            .with_child_selector(ChildSelector::Right);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &store, |b, store| {
            b.iter(|| black_box(interest.select_best(store).map(|o| o.name().len())))
        });
    }

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_prefix_match(c);
    bench_exclusion_match(c);
    bench_digest_match(c);
    bench_select_best(c);
}
