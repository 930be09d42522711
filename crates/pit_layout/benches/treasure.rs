mod common;

use std::f64::consts::TAU;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec2;
use pit_layout::geometry::{Hole, Polygon};
use pit_layout::treasure::ArtefactCloud;
use rand::rngs::StdRng;
use rand::RngCore;

const SITE: f64 = 60.0;
const CLOUD_SIZES: [usize; 3] = [1_000, 10_000, 100_000];
const HOLE_SIZE: f64 = 0.5;

fn unit(rng: &mut StdRng) -> f64 {
    (rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64
}

fn holes(count: usize, rng: &mut StdRng) -> Vec<Hole> {
    (0..count)
        .map(|_| Hole::square(unit(rng) * SITE, unit(rng) * SITE, HOLE_SIZE))
        .collect()
}

fn point_cloud_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("treasure/point_cloud");
    let mut rng = common::bench_rng(1);
    let probes = holes(256, &mut rng);
    group.throughput(common::elements_throughput(probes.len()));

    for &size in &CLOUD_SIZES {
        let points: Vec<[f64; 2]> = (0..size)
            .map(|_| [unit(&mut rng) * SITE, unit(&mut rng) * SITE])
            .collect();
        let cloud = ArtefactCloud::from_points(points).expect("cloud is valid");

        group.bench_with_input(BenchmarkId::new("parcels", size), &size, |b, _| {
            b.iter(|| {
                let total: usize = probes
                    .iter()
                    .map(|h| cloud.count_in(DVec2::ZERO, h).expect("hole inside the cloud"))
                    .sum();
                black_box(total);
            });
        });

        group.bench_with_input(BenchmarkId::new("linear", size), &size, |b, _| {
            b.iter(|| {
                let total: usize = probes
                    .iter()
                    .map(|h| cloud.count_in_linear(DVec2::ZERO, h))
                    .sum();
                black_box(total);
            });
        });
    }

    group.finish();
}

fn polygon_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("treasure/polygon");
    let mut rng = common::bench_rng(2);
    let probes = holes(256, &mut rng);
    group.throughput(common::elements_throughput(probes.len()));

    for &vertices in &[8_usize, 64, 512] {
        // A star-shaped ring around the site centre.
        let ring: Vec<[f64; 2]> = (0..vertices)
            .map(|i| {
                let angle = TAU * i as f64 / vertices as f64;
                let radius = if i % 2 == 0 { 25.0 } else { 12.0 };
                [SITE / 2.0 + radius * angle.cos(), SITE / 2.0 + radius * angle.sin()]
            })
            .collect();
        let polygon = Polygon::from_points(ring).expect("polygon is valid");

        group.bench_with_input(
            BenchmarkId::from_parameter(vertices),
            &vertices,
            |b, _| {
                b.iter(|| {
                    let hits = probes
                        .iter()
                        .filter(|h| polygon.intersects_aabb(DVec2::ZERO, &h.bounds()))
                        .count();
                    black_box(hits);
                });
            },
        );
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = point_cloud_benches, polygon_benches
}
criterion_main!(benches);
