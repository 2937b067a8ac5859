use std::path::Path;

use force_plot_renderer::text_metrics::MonospaceMetrics;
use force_plot_renderer::{ForcePlotLayout, LayoutConfig, Theme, compute_layout, parse_force_plot, render_svg};

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.starts_with("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.ends_with("</svg>"), "{fixture}: missing </svg tag");
    assert!(!svg.contains("NaN"), "{fixture}: NaN leaked into output");
}

fn fixture_path(rel: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel)
}

fn layout_fixture(rel: &str) -> ForcePlotLayout {
    let input = std::fs::read_to_string(fixture_path(rel)).expect("fixture read failed");
    let plot = parse_force_plot(&input).expect("parse failed");
    compute_layout(
        &plot,
        &Theme::classic(),
        &LayoutConfig::default(),
        800.0,
        &MonospaceMetrics::default(),
    )
}

fn render_fixture(rel: &str) -> String {
    render_svg(&layout_fixture(rel), &Theme::classic())
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let fixtures = [
        "basic.json",
        "logit.json5",
        "all_zero.json",
        "unknown_palette.json",
        "explicit_colors.json",
        "string_values.json",
        "many_features.json",
    ];

    for rel in fixtures {
        assert!(fixture_path(rel).exists(), "fixture missing: {}", rel);
        let svg = render_fixture(rel);
        assert_valid_svg(&svg, rel);
    }
}

#[test]
fn basic_fixture_labels_every_feature() {
    let svg = render_fixture("basic.json");
    for text in ["Blue = 1", "Red = 0", "Green = 2", "Orange = 2"] {
        assert!(svg.contains(text), "missing label {text}");
    }
    assert!(svg.contains("color rating"));
    assert!(svg.contains("-1.50"));
    assert!(!svg.contains("force-bar-hover\""));
}

#[test]
fn logit_fixture_reports_probability() {
    let layout = layout_fixture("logit.json5");
    let expected = 1.0 / (1.0 + (-0.35f64).exp());
    assert!((layout.join_marker.output_value - expected).abs() < 1e-9);
    assert_eq!(layout.join_marker.value_label.text, "0.59");
    for tick in &layout.axis.ticks {
        let value: f64 = tick.label.parse().expect("axis label should be numeric");
        assert!((0.0..=1.0).contains(&value));
    }

    let svg = render_svg(&layout, &Theme::classic());
    assert!(svg.contains("P(default)"));
    assert!(svg.contains("Age = 37"));
    // tenure is too thin for an inline label
    assert!(svg.contains("Tenure = 3 years"));
    assert_eq!(svg.matches("class=\"force-bar-hover\"").count(), 1);
}

#[test]
fn all_zero_fixture_is_flat() {
    let layout = layout_fixture("all_zero.json");
    assert!(layout.labels.is_empty());
    assert_eq!(layout.hover_labels.len(), 2);
    assert_eq!(layout.join.index, 2);
    assert_eq!(layout.join_marker.value_label.text, "3.50");
    for bar in &layout.bars {
        assert_eq!(bar.width, 0.0);
        assert_eq!(bar.x, 400.0);
    }
    assert!(!layout.viewport.expanded);
}

#[test]
fn unknown_palette_falls_back_to_default() {
    let layout = layout_fixture("unknown_palette.json");
    assert_eq!(layout.colors.positive, "rgb(255, 13, 87)");
    assert_eq!(layout.colors.negative, "rgb(30, 136, 229)");
}

#[test]
fn explicit_colors_are_used() {
    let layout = layout_fixture("explicit_colors.json");
    assert_eq!(layout.colors.positive, "rgb(170, 170, 17)");
    assert_eq!(layout.colors.negative, "rgb(102, 51, 204)");
    let svg = render_svg(&layout, &Theme::classic());
    assert!(svg.contains("a = 7"));
    assert!(svg.contains(">b<"));
    assert!(svg.contains("expected value"));
}

#[test]
fn string_values_are_shown_raw_unless_numeric() {
    let svg = render_fixture("string_values.json");
    assert!(svg.contains("Sex = female"));
    assert!(svg.contains("Embarked = C"));
    assert!(svg.contains("Fare = 71.28"));
}

#[test]
fn many_features_keep_labels_apart() {
    let layout = layout_fixture("many_features.json");
    assert_eq!(layout.features.len(), 40);
    assert_eq!(layout.bars.len(), 40);
    assert!(layout.labels.len() + layout.hover_labels.len() <= 40);
    for pair in layout.labels.windows(2) {
        assert!(
            pair[1].left - pair[0].right >= 10.0 - 1e-6,
            "labels {} and {} overlap",
            pair[0].text,
            pair[1].text
        );
    }
    let json = serde_json::to_string(&layout).expect("layout serializes");
    assert!(json.contains("\"viewport\""));
}
