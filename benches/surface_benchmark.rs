#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmark for the CSV-to-surface pipeline.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use bench_surface::prelude::*;

fn timings(rows: usize, cols: usize) -> Vec<Vec<f64>> {
    // Time grows with sprites x tweens, like a real sweep.
    (0..rows)
        .map(|t| (0..cols).map(|s| 1e-6 * ((t + 1) * (s + 1)) as f64 + 1e-4).collect())
        .collect()
}

fn csv_text(rows: &[Vec<f64>]) -> String {
    let cols = rows.first().map_or(0, Vec::len);
    let mut out = (0..cols).map(|c| (c * 100).to_string()).collect::<Vec<_>>().join(",");
    out.push('\n');
    for row in rows {
        out.push_str(&row.iter().map(f64::to_string).collect::<Vec<_>>().join(","));
        out.push('\n');
    }
    out
}

fn load_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    for size in [10, 50, 100] {
        let text = csv_text(&timings(size, size));
        group.bench_with_input(BenchmarkId::from_parameter(format!("{size}x{size}")), &text, |b, text| {
            b.iter(|| Grid::from_reader(black_box(text.as_bytes())).expect("csv should parse"));
        });
    }

    group.finish();
}

fn surface_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("surface");

    for size in [10, 50, 100] {
        let data = timings(size, size);

        group.bench_with_input(BenchmarkId::new("build", format!("{size}x{size}")), &data, |b, data| {
            b.iter(|| SurfacePlot::new().z_rows(black_box(data)).build().expect("build should succeed"));
        });

        let surface = SurfacePlot::new().z_rows(&data).build().expect("build should succeed");

        group.bench_with_input(
            BenchmarkId::new("framebuffer", format!("{size}x{size}")),
            &surface,
            |b, surface| {
                b.iter(|| surface.to_framebuffer().expect("framebuffer conversion should succeed"));
            },
        );

        group.bench_with_input(BenchmarkId::new("svg", format!("{size}x{size}")), &surface, |b, surface| {
            b.iter(|| surface.to_svg().render());
        });
    }

    group.finish();
}

criterion_group!(benches, load_benchmark, surface_benchmark);
criterion_main!(benches);
