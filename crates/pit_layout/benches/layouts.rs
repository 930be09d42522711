mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pit_layout::experiment::{ExperimentConfig, ExperimentRunner, LayoutSpec, TreasureSpec};
use pit_layout::field::Field;
use pit_layout::layout::Jitter;
use pit_layout::treasure::TreasureShape;

const FIELD_SIZE: f64 = 100.0;
const HOLE_SIZE: f64 = 0.5;
const HOLE_COUNTS: [usize; 3] = [25, 100, 400];

fn layouts() -> Vec<LayoutSpec> {
    vec![
        LayoutSpec::HexLike {
            lr_border: true,
            stagger_y: true,
            jitter: None,
        },
        LayoutSpec::HexLike {
            lr_border: true,
            stagger_y: true,
            jitter: Some(Jitter::new(8.0)),
        },
        LayoutSpec::Hexagonal { stagger_y: false },
        LayoutSpec::Halton { border: true },
        LayoutSpec::Random {
            border: false,
            buckets: 50,
        },
        LayoutSpec::SquareGrid,
    ]
}

fn layout_play_benches(c: &mut Criterion) {
    let shape = TreasureShape::Circle { radius: 3.5 };

    for spec in layouts() {
        let mut group = c.benchmark_group(format!("layouts/play/{}", spec.name()));

        for &holes in &HOLE_COUNTS {
            let layout = spec.build(HOLE_SIZE, holes);
            group.throughput(common::elements_throughput(holes));
            let mut rng = common::bench_rng(holes as u64);

            group.bench_with_input(BenchmarkId::from_parameter(holes), &holes, |b, _| {
                b.iter(|| {
                    let mut field = Field::for_shape(&shape, FIELD_SIZE, FIELD_SIZE);
                    field
                        .place_treasure(&shape, &mut rng)
                        .expect("circle fits the field");
                    let outcome = layout
                        .play(&mut field, &mut rng, false)
                        .expect("layout plays");
                    black_box(outcome.actual_holes);
                });
            });
        }

        group.finish();
    }
}

fn experiment_run_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("layouts/experiment");

    for &repeats in &[10_usize, 100] {
        let config = ExperimentConfig::new(
            TreasureSpec::Circle { radius: 3.5 },
            LayoutSpec::default(),
        )
        .with_max_holes(50)
        .with_hole_increment(5)
        .with_repeats(repeats)
        .with_seed(Some(7));

        group.bench_with_input(BenchmarkId::from_parameter(repeats), &repeats, |b, _| {
            b.iter(|| {
                let mut runner = ExperimentRunner::try_new(config.clone()).expect("valid config");
                let summary = runner.run(&mut ()).expect("run succeeds");
                black_box(summary.rows);
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = layout_play_benches, experiment_run_benches
}
criterion_main!(benches);
