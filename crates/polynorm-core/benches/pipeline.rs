use criterion::{black_box, criterion_group, criterion_main, Criterion};
use polynorm_core::{normalize, resample, smallest_enclosing_circle, NormalizeConfig, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn spiral(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let t = i as f64 * 0.05;
            Point::new(t * t.cos() * 40.0, t * t.sin() * 40.0)
        })
        .collect()
}

fn bench_resample(c: &mut Criterion) {
    let line = spiral(500);
    c.bench_function("resample_500_to_60", |b| {
        b.iter(|| resample(black_box(&line), 60))
    });
}

fn bench_circle(c: &mut Criterion) {
    let mut gen = StdRng::seed_from_u64(1);
    let cloud: Vec<Point> = (0..10_000)
        .map(|_| Point::new(gen.random_range(-1e3..1e3), gen.random_range(-1e3..1e3)))
        .collect();
    c.bench_function("enclosing_circle_10k", |b| {
        b.iter(|| smallest_enclosing_circle(black_box(&cloud), &mut StdRng::seed_from_u64(7)))
    });
}

fn bench_normalize(c: &mut Criterion) {
    let line = spiral(500);
    let config = NormalizeConfig::default().with_seed(7);
    c.bench_function("normalize_default", |b| {
        b.iter(|| normalize(black_box(&line), &config))
    });
}

criterion_group!(benches, bench_resample, bench_circle, bench_normalize);
criterion_main!(benches);
