//! Benchmarks for scenario fingerprinting
//!
//! This benchmark measures:
//! - Normalization + fingerprint derivation for single and multi-source scenarios
//! - Combination-key encoding for the secondary store
//! - Primary-store hit latency on the in-memory backend

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use key_findings::store::{MemoryReportStore, ReportStore};
use key_findings::{
    CommonSections, Language, Report, ReportMeta, Scenario, SourceRef, SourceRegistry,
};
use std::sync::Arc;

fn multi_source_scenario() -> Scenario {
    Scenario::new(
        "Benchmarking",
        vec![
            SourceRef::from("Google Trends"),
            SourceRef::from("Google Books Ngrams"),
            SourceRef::from("Bain - Usabilidad"),
            SourceRef::Id(4),
        ],
        Language::Es,
    )
}

fn bench_fingerprint(c: &mut Criterion) {
    let registry = SourceRegistry::builtin();
    let single = Scenario::new("Outsourcing", vec![SourceRef::Id(1)], Language::En);
    let multi = multi_source_scenario();

    c.bench_function("normalize_and_fingerprint/single_source", |b| {
        b.iter(|| {
            let canonical = black_box(&single).normalize(registry).unwrap();
            black_box(canonical.fingerprint())
        })
    });

    c.bench_function("normalize_and_fingerprint/multi_source", |b| {
        b.iter(|| {
            let canonical = black_box(&multi).normalize(registry).unwrap();
            black_box(canonical.fingerprint())
        })
    });

    let canonical = multi.normalize(registry).unwrap();
    c.bench_function("combination_key_encode", |b| {
        b.iter(|| black_box(canonical.combination_key().encode()))
    });
}

fn bench_primary_hit(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let store = Arc::new(MemoryReportStore::new());
    let canonical = multi_source_scenario()
        .normalize(SourceRegistry::builtin())
        .unwrap();
    let fingerprint = canonical.fingerprint();
    let report = Report::multi_source(
        CommonSections::default(),
        Default::default(),
        ReportMeta::new("bench-model"),
    );
    rt.block_on(store.put(&fingerprint, &report)).unwrap();

    c.bench_function("memory_store_primary_hit", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(store.get(&fingerprint).await.unwrap()) })
    });
}

criterion_group!(benches, bench_fingerprint, bench_primary_hit);
criterion_main!(benches);
