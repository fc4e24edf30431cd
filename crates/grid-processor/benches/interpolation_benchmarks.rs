//! Benchmarks for scattered-sample interpolation.
//!
//! Run with: cargo bench --package grid-processor

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use grid_processor::{
    build_interpolated_grid_default, ClampRange, GridShape, InterpolationMethod, Triangulation,
};
use test_utils::{hot_spot_field, scattered_points, solver_lattice};

fn bench_triangulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("triangulation");

    for n in [500usize, 2_000, 5_751] {
        let (xs, ys) = scattered_points(n, (0.0, 0.0, 0.07, 0.08), 42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| Triangulation::new(black_box(&xs), black_box(&ys)).unwrap())
        });
    }

    group.finish();
}

fn bench_grid_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_100x100");

    // 70 x 80 cells, the solver's own output lattice
    let (xs, ys) = solver_lattice(71, 81, 0.001, 0.001);
    let values = hot_spot_field(&xs, &ys, (0.035, 0.02), 0.01, 900.0);

    for method in [
        InterpolationMethod::Nearest,
        InterpolationMethod::Linear,
        InterpolationMethod::Cubic,
    ] {
        group.bench_function(method.to_string(), |b| {
            b.iter(|| {
                build_interpolated_grid_default(
                    black_box(&xs),
                    black_box(&ys),
                    black_box(&values),
                    GridShape::square(100),
                    ClampRange::upper(2000.0),
                    method,
                )
                .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_triangulation, bench_grid_methods);
criterion_main!(benches);
