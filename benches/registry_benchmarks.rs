//! Performance Benchmarks for the Ciphertext Registry
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use shroud::precompiles::resolve_binary_operands;
use shroud::prelude::*;

// =============================================================================
// REGISTRY BENCHMARKS
// =============================================================================

fn synthetic_ciphertext(seed: u64, size: usize) -> Ciphertext {
    let mut data = vec![0u8; size];
    data[..8].copy_from_slice(&seed.to_le_bytes());
    Ciphertext::new(data, CipherKind::Uint64)
}

fn bench_intern_fresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_intern_fresh");

    for size in [256usize, 4096, 65536] {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let registry = CiphertextRegistry::default();
            let mut seed = 0u64;
            b.iter(|| {
                seed += 1;
                registry.intern(synthetic_ciphertext(seed, size))
            })
        });
    }

    group.finish();
}

fn bench_intern_dedup(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_intern_dedup");

    for size in [256usize, 4096, 65536] {
        let registry = CiphertextRegistry::default();
        let ct = synthetic_ciphertext(1, size);
        registry.intern(ct.clone());

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &ct, |b, ct| {
            b.iter(|| registry.intern(ct.clone()))
        });
    }

    group.finish();
}

fn bench_get_verified(c: &mut Criterion) {
    let registry = CiphertextRegistry::default();
    for seed in 0..1024 {
        registry.import_at_depth(synthetic_ciphertext(seed, 256), 0);
    }
    let handle = registry.import_at_depth(synthetic_ciphertext(9999, 256), 0);

    c.bench_function("registry_get_verified", |b| {
        b.iter(|| registry.get_verified(&handle, 0).unwrap())
    });
}

// =============================================================================
// OPERAND RESOLUTION BENCHMARKS
// =============================================================================

fn bench_resolve_operands(c: &mut Criterion) {
    let registry = CiphertextRegistry::default();
    for seed in 0..1024 {
        registry.import_at_depth(synthetic_ciphertext(seed, 256), 0);
    }
    let lhs = registry.import_at_depth(synthetic_ciphertext(2000, 4096), 0);
    let rhs = registry.import_at_depth(synthetic_ciphertext(2001, 4096), 0);

    let mut input = Vec::with_capacity(65);
    input.extend_from_slice(lhs.as_bytes());
    input.extend_from_slice(rhs.as_bytes());
    input.push(0);

    c.bench_function("resolve_binary_operands", |b| {
        b.iter(|| resolve_binary_operands(&registry, &input, 0).unwrap())
    });
}

criterion_group!(
    benches,
    bench_intern_fresh,
    bench_intern_dedup,
    bench_get_verified,
    bench_resolve_operands
);
criterion_main!(benches);
