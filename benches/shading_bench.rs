//! Benchmarks for the CPU distance model and rasteriser.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use snowflake::sdf::{branch_layout, fold_hexagonal, shade, snowflake_distance};
use snowflake::{render_image, Palette, SnowflakeParams};

fn bench_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("Distance Field");
    let params = SnowflakeParams::default().with_seed(42.0);
    let layout = branch_layout(&params);

    group.bench_function("branch_layout", |b| {
        b.iter(|| black_box(branch_layout(black_box(&params))));
    });

    group.bench_function("fold_and_distance", |b| {
        b.iter(|| {
            let p = fold_hexagonal(black_box([0.17, -0.23]));
            black_box(snowflake_distance(p, &layout))
        });
    });

    group.bench_function("shade_pixel", |b| {
        b.iter(|| {
            black_box(shade(
                black_box([640.0, 360.0]),
                [1280.0, 720.0],
                1.0,
                &params,
                &Palette::default(),
            ))
        });
    });

    group.finish();
}

fn bench_raster(c: &mut Criterion) {
    let mut group = c.benchmark_group("CPU Raster");
    group.sample_size(10);

    let params = SnowflakeParams::default().with_seed(42.0);
    let palette = Palette::default();

    for (width, height) in [(160, 90), (320, 180), (640, 360)] {
        group.bench_with_input(
            BenchmarkId::new("render_image", format!("{}x{}", width, height)),
            &(width, height),
            |b, &(w, h)| {
                b.iter(|| black_box(render_image(w, h, 0.0, &params, &palette)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_distance, bench_raster);
criterion_main!(benches);
