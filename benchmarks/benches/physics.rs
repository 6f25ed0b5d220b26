//! Physics benchmarks (criterion - wall-clock time).
//!
//! Run all:    cargo bench --manifest-path benchmarks/Cargo.toml --bench physics
//! Filter:     cargo bench --manifest-path benchmarks/Cargo.toml --bench physics -- gjk

use convex_toi::physics::broadphase::SweepAndPrune;
use convex_toi::physics::narrowphase::gjk_intersection;
use convex_toi::physics::toi::{translational_bisection, uncollide_objects};
use convex_toi::physics::transform::Transform;
use convex_toi_bench::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;

const DT: f32 = 1.0 / 60.0;

// ---------------------------------------------------------------------------
// Broadphase
// ---------------------------------------------------------------------------

fn bench_broadphase(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadphase/falling_cubes");
    for &n in &[100, 500, 1000] {
        let (world, _) = setup_scene(n);
        let broadphase = SweepAndPrune::new();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| broadphase.find_pairs(&world, DT));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Narrowphase
// ---------------------------------------------------------------------------

fn bench_narrowphase(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("narrowphase/gjk_cubes");

        let (a, b_hit) = cube_pair(Vec3::new(1.5, 0.5, 0.25));
        group.bench_function("intersecting", |b| {
            b.iter(|| gjk_intersection(&a, &b_hit));
        });

        let (a, b_miss) = cube_pair(Vec3::new(5.0, 0.0, 0.0));
        group.bench_function("separated", |b| {
            b.iter(|| gjk_intersection(&a, &b_miss));
        });

        let (a, mut b_rot) = cube_pair(Vec3::new(1.5, 0.3, 0.2));
        b_rot.transform.rotation = Vec3::new(0.3, 0.785, 0.1);
        group.bench_function("rotated", |b| {
            b.iter(|| gjk_intersection(&a, &b_rot));
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("narrowphase/gjk_vertex_count");
        for &segments in &[8, 32, 128] {
            let a = prism_body(segments, Transform::identity()).expect("prism mesh");
            let b_body = prism_body(
                segments,
                Transform::from_position(Vec3::new(1.2, 0.4, 0.3)),
            )
            .expect("prism mesh");
            group.bench_with_input(
                BenchmarkId::from_parameter(segments * 2),
                &segments,
                |b, _| {
                    b.iter(|| gjk_intersection(&a, &b_body));
                },
            );
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Time of impact
// ---------------------------------------------------------------------------

fn bench_toi(c: &mut Criterion) {
    let mut group = c.benchmark_group("toi");

    group.bench_function("translational_bisection", |b| {
        b.iter_batched(
            || approaching_pair(DT),
            |(mut a, mut body_b)| translational_bisection(&mut a, &mut body_b, DT, 0),
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function("uncollide_objects", |b| {
        b.iter_batched(
            || approaching_pair(DT),
            |(mut a, mut body_b)| uncollide_objects(&mut a, &mut body_b, DT),
            criterion::BatchSize::SmallInput,
        );
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

fn bench_pipeline(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("pipeline/step");
        group.sample_size(30);
        for &n in &[50, 100, 500] {
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
                b.iter_batched(
                    || setup_scene(n),
                    |(mut world, mut physics)| {
                        physics.step(&mut world, 1.0 / 60.0);
                    },
                    criterion::BatchSize::LargeInput,
                );
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("pipeline/sustained_60steps");
        group.sample_size(10);
        for &n in &[100, 500] {
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
                b.iter_batched(
                    || setup_scene(n),
                    |(mut world, mut physics)| {
                        for _ in 0..60 {
                            physics.step(&mut world, 1.0 / 60.0);
                        }
                    },
                    criterion::BatchSize::LargeInput,
                );
            });
        }
        group.finish();
    }
}

criterion_group!(
    benches,
    bench_broadphase,
    bench_narrowphase,
    bench_toi,
    bench_pipeline
);
criterion_main!(benches);
