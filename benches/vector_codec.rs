use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use igwd_frame::vect::{Algorithm, CompressionRequest, Dimension, ElementType, FrVect};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

fn ramp_bytes(n: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(n * 4);
    for i in 0..n {
        out.extend_from_slice(&(i as i32).to_ne_bytes());
    }
    out
}

fn sparse_bytes(n: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(n * 4);
    for _ in 0..n {
        let v: u32 = if rng.random_ratio(1, 20) { rng.random() } else { 0 };
        out.extend_from_slice(&v.to_ne_bytes());
    }
    out
}

fn vect_for(bytes: Vec<u8>, element_type: ElementType, n: usize) -> FrVect {
    FrVect::from_raw("bench", "", element_type, n as u64, vec![Dimension::new(n as u64, 1.0, 0.0, "s")], bytes).unwrap()
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    let sizes = [1_000usize, 10_000, 100_000];

    for &size in &sizes {
        group.throughput(Throughput::Bytes((size * 4) as u64));
        let ramp = ramp_bytes(size);
        let sparse = sparse_bytes(size, 7);

        group.bench_with_input(BenchmarkId::new("gzip_ramp", size), &ramp, |b, bytes| {
            b.iter(|| {
                let mut v = vect_for(bytes.clone(), ElementType::Int4S, size);
                v.compress(CompressionRequest::Concrete(Algorithm::Gzip), 6).unwrap();
                black_box(v);
            });
        });

        group.bench_with_input(BenchmarkId::new("diff_gzip_ramp", size), &ramp, |b, bytes| {
            b.iter(|| {
                let mut v = vect_for(bytes.clone(), ElementType::Int4S, size);
                v.compress(CompressionRequest::Concrete(Algorithm::DiffGzip), 6).unwrap();
                black_box(v);
            });
        });

        group.bench_with_input(BenchmarkId::new("zero_suppress_sparse", size), &sparse, |b, bytes| {
            b.iter(|| {
                let mut v = vect_for(bytes.clone(), ElementType::Int4U, size);
                v.compress(CompressionRequest::Concrete(Algorithm::ZeroSuppressWord4), 0).unwrap();
                black_box(v);
            });
        });

        group.bench_with_input(BenchmarkId::new("best_ramp", size), &ramp, |b, bytes| {
            b.iter(|| {
                let mut v = vect_for(bytes.clone(), ElementType::Int4S, size);
                v.compress(CompressionRequest::Best, 6).unwrap();
                black_box(v);
            });
        });
    }
    group.finish();
}

fn bench_expand(c: &mut Criterion) {
    let mut group = c.benchmark_group("expand");
    let sizes = [1_000usize, 10_000, 100_000];

    for &size in &sizes {
        group.throughput(Throughput::Bytes((size * 4) as u64));
        let mut gzip_vect = vect_for(ramp_bytes(size), ElementType::Int4S, size);
        gzip_vect.compress(CompressionRequest::Concrete(Algorithm::Gzip), 6).unwrap();

        let mut diff_vect = vect_for(ramp_bytes(size), ElementType::Int4S, size);
        diff_vect.compress(CompressionRequest::Concrete(Algorithm::DiffGzip), 6).unwrap();

        group.bench_with_input(BenchmarkId::new("gzip", size), &gzip_vect, |b, v| {
            b.iter(|| black_box(v.expand().unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("diff_gzip", size), &diff_vect, |b, v| {
            b.iter(|| black_box(v.expand().unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compress, bench_expand);
criterion_main!(benches);
