use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use force_plot_renderer::config::LayoutConfig;
use force_plot_renderer::ir::{Feature, FeatureValue, ForcePlot};
use force_plot_renderer::layout::compute_layout;
use force_plot_renderer::parser::parse_force_plot;
use force_plot_renderer::render::render_svg;
use force_plot_renderer::text_metrics::MonospaceMetrics;
use force_plot_renderer::theme::Theme;
use std::hint::black_box;

fn synthetic_plot(count: usize) -> ForcePlot {
    let features = (0..count)
        .map(|i| {
            // alternating signs with a slowly decaying magnitude
            let magnitude = 1.0 / (1.0 + (i as f64) * 0.05);
            let effect = if i % 3 == 0 { -magnitude } else { magnitude };
            Feature::new(i.to_string(), effect)
                .with_name(format!("feature {}", i))
                .with_value(FeatureValue::Number(i as f64 * 0.5))
        })
        .collect();
    ForcePlot::new(features)
}

fn synthetic_source(count: usize) -> String {
    let mut out = String::from("{\"features\": {");
    for i in 0..count {
        if i > 0 {
            out.push(',');
        }
        let effect = if i % 2 == 0 { 0.25 } else { -0.125 };
        out.push_str(&format!("\"{}\": {{\"value\": {}, \"effect\": {}}}", i, i, effect));
    }
    out.push_str("}}");
    out
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for count in [10usize, 100, 1000] {
        let input = synthetic_source(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| {
                let plot = parse_force_plot(black_box(input)).expect("parse failed");
                black_box(plot.features.len());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let theme = Theme::classic();
    let config = LayoutConfig::default();
    let measurer = MonospaceMetrics::default();
    for count in [10usize, 100, 1000] {
        let plot = synthetic_plot(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &plot, |b, plot| {
            b.iter(|| {
                let layout = compute_layout(black_box(plot), &theme, &config, 800.0, &measurer);
                black_box(layout.labels.len());
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let theme = Theme::classic();
    let config = LayoutConfig::default();
    let measurer = MonospaceMetrics::default();
    for count in [10usize, 100, 1000] {
        let layout = compute_layout(&synthetic_plot(count), &theme, &config, 800.0, &measurer);
        group.bench_with_input(BenchmarkId::from_parameter(count), &layout, |b, layout| {
            b.iter(|| {
                let svg = render_svg(black_box(layout), &theme);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

fn bench_widths(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_widths");
    let theme = Theme::modern();
    let config = LayoutConfig::default();
    let measurer = MonospaceMetrics::default();
    let plot = synthetic_plot(100);
    for width in [200.0f64, 800.0, 2400.0] {
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            b.iter(|| {
                let layout = compute_layout(&plot, &theme, &config, black_box(width), &measurer);
                black_box(layout.viewport.width);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_layout, bench_render, bench_widths);
criterion_main!(benches);
