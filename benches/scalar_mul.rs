//! Benchmarks for the three scalar-multiplication entry points.

use criterion::{criterion_group, criterion_main, Criterion};
use p384_mulcore::mul::{point_mul, point_mul_base, point_mul_public};
use p384_mulcore::{ProjectivePoint, Scalar};

fn scalar_from_bytes(bytes: [u8; 48]) -> Scalar {
    Scalar::from_bytes(bytes)
}

/// A fixed, arbitrary 384-bit scalar, used in place of a random one so
/// benchmark runs are reproducible.
fn bench_scalar() -> Scalar {
    let mut bytes = [0u8; 48];
    for (i, b) in bytes.iter_mut().enumerate() {
        *b = (i as u8).wrapping_mul(97).wrapping_add(13);
    }
    bytes[0] |= 1; // ensure odd, matching typical ECDH/ECDSA scalar usage
    scalar_from_bytes(bytes)
}

fn bench_point_mul(c: &mut Criterion) {
    let p = ProjectivePoint::GENERATOR.double();
    let k = bench_scalar();
    c.bench_function("point_mul", |b| b.iter(|| point_mul(&k, &p)));
}

fn bench_point_mul_base(c: &mut Criterion) {
    let k = bench_scalar();
    c.bench_function("point_mul_base", |b| b.iter(|| point_mul_base(&k)));
}

fn bench_point_mul_public(c: &mut Criterion) {
    let p = ProjectivePoint::GENERATOR.double();
    let k1 = bench_scalar();
    let k2 = bench_scalar();
    c.bench_function("point_mul_public", |b| {
        b.iter(|| point_mul_public(&k1, &k2, &p))
    });
}

criterion_group!(
    benches,
    bench_point_mul,
    bench_point_mul_base,
    bench_point_mul_public
);
criterion_main!(benches);
