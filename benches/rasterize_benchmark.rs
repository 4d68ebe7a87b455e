#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmarks for rasterization and document encoding.

use brailleplot::prelude::*;
use brailleplot::render::UniformTextureBarChartRasterizer;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bar_chart(categories: usize) -> BarChart {
    let names: Vec<String> = (0..categories).map(|i| format!("c{i}")).collect();
    let values = names.iter().enumerate().map(|(i, n)| (n.as_str(), (i as f64 * 1.7).sin() * 10.0));
    BarChart::new(PointListContainer::from_categories(values)).expect("non-empty data")
}

fn bar_chart_benchmark(c: &mut Criterion) {
    let config = ConfigurationParser::with_defaults().expect("default configuration");
    let canvas = RasterCanvas::from_config(&config, "A4").expect("A4 canvas");
    let rasterizer = UniformTextureBarChartRasterizer::default();
    let mut group = c.benchmark_group("bar_chart");

    for categories in [1, 3, 6] {
        let chart = bar_chart(categories);

        group.bench_with_input(BenchmarkId::new("plan", categories), &chart, |b, chart| {
            b.iter(|| rasterizer.plan(black_box(chart), &canvas).expect("layout fits"));
        });

        group.bench_with_input(BenchmarkId::new("rasterize", categories), &chart, |b, chart| {
            b.iter(|| {
                let mut canvas = canvas.clone();
                rasterizer.rasterize(black_box(chart), &mut canvas).expect("layout fits");
                canvas
            });
        });
    }

    group.finish();
}

fn image_benchmark(c: &mut Criterion) {
    let config = ConfigurationParser::with_defaults().expect("default configuration");
    let renderer = MasterRenderer::from_config(&config, "A4").expect("A4 renderer");
    let mut group = c.benchmark_group("image");

    for size in [32, 128, 512] {
        let pixels = (0..size * size).map(|i| if (i / size + i % size) % 3 == 0 { [0, 0, 0] } else { [255; 3] });
        let image: Renderable = Image::from_rgb(size, size, pixels.collect()).expect("valid image").into();

        group.bench_with_input(BenchmarkId::from_parameter(size), &image, |b, image| {
            b.iter(|| renderer.rasterize(black_box(image)).expect("image rasterizes"));
        });
    }

    group.finish();
}

fn document_benchmark(c: &mut Criterion) {
    let config = ConfigurationParser::with_defaults().expect("default configuration");
    let renderer = MasterRenderer::from_config(&config, "A4").expect("A4 renderer");
    let canvas = renderer.rasterize(&bar_chart(3).into()).expect("chart rasterizes");

    c.bench_function("cell_document", |b| {
        b.iter(|| CellDocumentBuilder::new().build(black_box(&canvas)).expect("6-dot raster"));
    });

    c.bench_function("terminal_preview", |b| {
        b.iter(|| TerminalEncoder::new().render_canvas(black_box(&canvas)).expect("6-dot raster"));
    });
}

criterion_group!(benches, bar_chart_benchmark, image_benchmark, document_benchmark);
criterion_main!(benches);
