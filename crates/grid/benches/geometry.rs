//! Criterion benchmarks for grid geometry hot paths.
//!
//! Run with: `cargo bench -p grid`
//!
//! Cell frames are recomputed on every layout pass and divider drags fire
//! per pointer move, so both must stay comfortably sub-microsecond.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use grid::{Axis, BoxMetrics, GridGeometry, GridResizer};

fn bench_cell_frames(c: &mut Criterion) {
    let metrics = BoxMetrics::new(1920.0, 1080.0, 4.0);
    let mut group = c.benchmark_group("cell_frames");
    for (rows, cols) in [(1usize, 1usize), (2, 2), (2, 3), (3, 3)] {
        let geometry = GridGeometry::new(rows, cols);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{rows}x{cols}")),
            &geometry,
            |b, geometry| b.iter(|| geometry.cell_frames(black_box(&metrics))),
        );
    }
    group.finish();
}

fn bench_drag_sequence(c: &mut Criterion) {
    let metrics = BoxMetrics::new(1920.0, 1080.0, 4.0);
    c.bench_function("drag_sequence", |b| {
        b.iter(|| {
            let mut geometry = GridGeometry::new(3, 3);
            let mut resizer = GridResizer::new();
            resizer.begin_drag(&geometry, &metrics, Axis::Col, 0);
            for px in (200..800).step_by(16) {
                resizer.drag_to(&mut geometry, black_box(px as f64));
            }
            resizer.end_drag();
            geometry
        })
    });
}

criterion_group!(benches, bench_cell_frames, bench_drag_sequence);
criterion_main!(benches);
