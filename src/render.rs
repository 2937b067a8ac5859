use crate::layout::{ForcePlotLayout, TextItem};
use crate::theme::Theme;
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

const HOVER_STYLE: &str = ".force-bar-hover .force-bar-hover-label{opacity:0}.force-bar-hover:hover .force-bar-hover-label{opacity:1}";

pub fn render_svg(layout: &ForcePlotLayout, theme: &Theme) -> String {
    let mut svg = String::new();
    let vp = &layout.viewport;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"force-plot\" width=\"{:.2}\" height=\"{:.2}\" viewBox=\"{:.2} 0 {:.2} {:.2}\" font-family=\"{}\">",
        vp.width,
        vp.height,
        vp.min_x,
        vp.width,
        vp.height,
        escape_xml(&theme.font_family)
    ));
    svg.push_str(&format!("<style>{HOVER_STYLE}</style>"));
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>",
        vp.min_x,
        vp.width,
        vp.height,
        escape_xml(&theme.background)
    ));

    svg.push_str("<defs>");
    for gradient in &layout.gradients {
        svg.push_str(&format!(
            "<linearGradient id=\"{}\" x1=\"0%\" y1=\"0%\" x2=\"0%\" y2=\"100%\"><stop offset=\"0%\" stop-color=\"{}\" stop-opacity=\"{}\"/><stop offset=\"100%\" stop-color=\"{}\" stop-opacity=\"{}\"/></linearGradient>",
            gradient.id, gradient.color, gradient.start_opacity, gradient.color, gradient.end_opacity
        ));
    }
    svg.push_str("</defs>");

    render_axis(&mut svg, layout, theme);

    let hover: HashMap<usize, _> = layout
        .hover_labels
        .iter()
        .map(|label| (label.feature, label))
        .collect();
    for bar in &layout.bars {
        let path = format!(
            "<path class=\"force-bar-blocks\" d=\"{} Z\" fill=\"{}\"/>",
            points_to_path(&bar.points),
            bar.fill
        );
        match hover.get(&bar.feature) {
            Some(label) => {
                let text = escape_xml(&label.text);
                svg.push_str(&format!(
                    "<g class=\"force-bar-hover\">{path}<g class=\"force-bar-hover-label\"><text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"{}\" stroke=\"{}\" stroke-width=\"4\" fill=\"{}\">{text}</text><text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"{}\" fill=\"{}\">{text}</text></g></g>",
                    label.x,
                    label.y,
                    theme.label_font_size,
                    theme.outline_color,
                    theme.outline_color,
                    label.x,
                    label.y,
                    theme.label_font_size,
                    label.fill
                ));
            }
            None => svg.push_str(&path),
        }
    }

    for backing in &layout.backings {
        svg.push_str(&format!(
            "<path class=\"force-bar-labelBacking\" d=\"{} Z\" stroke=\"none\" opacity=\"{}\" fill=\"{}\"/>",
            points_to_path(&backing.points),
            backing.opacity,
            backing.fill
        ));
    }

    for divider in &layout.label_dividers {
        svg.push_str(&format!(
            "<rect class=\"force-bar-labelDividers\" x=\"{:.2}\" y=\"{:.2}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
            divider.x, divider.y, divider.width, divider.height, divider.fill
        ));
    }

    for divider in &layout.block_dividers {
        let Some(stroke) = divider.stroke.as_deref() else {
            continue;
        };
        svg.push_str(&format!(
            "<path class=\"force-bar-blockDividers\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>",
            points_to_path(&divider.points),
            stroke
        ));
    }

    for label in &layout.labels {
        svg.push_str(&format!(
            "<text class=\"force-bar-labels\" x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"{}\" fill=\"{}\">{}</text>",
            label.x,
            label.y,
            theme.label_font_size,
            label.fill,
            escape_xml(&label.text)
        ));
    }

    let marker = &layout.join_marker;
    svg.push_str(&format!(
        "<line x1=\"{:.2}\" x2=\"{:.2}\" y1=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
        marker.x, marker.x, marker.line_y1, marker.line_y2, marker.line_color
    ));
    let value = &marker.value_label;
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-weight=\"bold\" font-size=\"{}\" stroke=\"{}\" stroke-width=\"6\" fill=\"{}\">{}</text>",
        value.x,
        value.y,
        value.font_size,
        theme.outline_color,
        theme.outline_color,
        escape_xml(&value.text)
    ));
    svg.push_str(&text_svg(value, " font-weight=\"bold\""));
    for item in [
        &marker.title,
        &marker.higher,
        &marker.lower,
        &marker.higher_arrow,
        &marker.lower_arrow,
    ] {
        svg.push_str(&text_svg(item, ""));
    }
    svg.push_str(&text_svg(&layout.base_title, ""));

    svg.push_str("</svg>");
    svg
}

fn render_axis(svg: &mut String, layout: &ForcePlotLayout, theme: &Theme) {
    let axis = &layout.axis;
    svg.push_str(&format!(
        "<g class=\"force-axis\" transform=\"translate(0,{:.2})\" font-size=\"{}\" text-anchor=\"middle\">",
        axis.y, theme.axis_font_size
    ));
    svg.push_str(&format!(
        "<path d=\"M {:.2} 0 H {:.2}\" stroke=\"{}\" stroke-opacity=\"{}\" fill=\"none\"/>",
        axis.x1, axis.x2, theme.axis_color, theme.axis_opacity
    ));
    let label_y = axis.tick_size + axis.tick_padding;
    for tick in &axis.ticks {
        svg.push_str(&format!(
            "<g class=\"tick\" transform=\"translate({:.2},0)\"><line y2=\"{}\" stroke=\"{}\" stroke-opacity=\"{}\"/><text y=\"{}\" dy=\"0.71em\" fill=\"{}\" opacity=\"{}\">{}</text></g>",
            tick.x,
            axis.tick_size,
            theme.axis_color,
            theme.axis_opacity,
            label_y,
            theme.text_color,
            theme.tick_label_opacity,
            escape_xml(&tick.label)
        ));
    }
    svg.push_str("</g>");
}

fn text_svg(item: &TextItem, extra: &str) -> String {
    format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"{}\" font-size=\"{}\" fill=\"{}\" opacity=\"{}\"{extra}>{}</text>",
        item.x,
        item.y,
        item.anchor.as_str(),
        item.font_size,
        item.fill,
        item.opacity,
        escape_xml(&item.text)
    )
}

fn points_to_path(points: &[(f64, f64)]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].0, points[0].1));
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &crate::config::RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width as f32, render_cfg.height as f32)
        .or_else(|| usvg::Size::from_wh(800.0, 150.0))
        .ok_or_else(|| anyhow::anyhow!("invalid output size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{Feature, FeatureValue, ForcePlot};
    use crate::layout::compute_layout;
    use crate::text_metrics::MonospaceMetrics;

    fn render(plot: &ForcePlot) -> String {
        let theme = Theme::classic();
        let layout = compute_layout(
            plot,
            &theme,
            &LayoutConfig::default(),
            400.0,
            &MonospaceMetrics::default(),
        );
        render_svg(&layout, &theme)
    }

    #[test]
    fn render_svg_basic() {
        let svg = render(&ForcePlot::new(vec![
            Feature::new("0", 1.0)
                .with_name("Blue")
                .with_value(FeatureValue::Number(1.0)),
            Feature::new("1", -2.0).with_name("Green"),
        ]));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Blue = 1"));
        assert!(svg.contains("linear-backgrad-1"));
        assert!(svg.contains("base value"));
        assert!(svg.contains("higher"));
    }

    #[test]
    fn thin_segments_render_hover_groups() {
        let svg = render(&ForcePlot::new(vec![
            Feature::new("0", 5.0),
            Feature::new("1", 0.001).with_name("Tiny"),
        ]));
        assert_eq!(svg.matches("class=\"force-bar-hover\"").count(), 1);
        assert!(svg.contains(".force-bar-hover:hover"));
    }

    #[test]
    fn text_is_escaped() {
        let svg = render(&ForcePlot::new(vec![Feature::new("0", 1.0).with_name("a<b & c")]));
        assert!(svg.contains("a&lt;b &amp; c"));
        assert!(!svg.contains("a<b"));
    }

    #[test]
    fn background_is_escaped() {
        let mut theme = Theme::classic();
        theme.background = "#fff\" onload=\"x".to_string();
        let layout = compute_layout(
            &ForcePlot::new(vec![Feature::new("0", 1.0)]),
            &theme,
            &LayoutConfig::default(),
            400.0,
            &MonospaceMetrics::default(),
        );
        let svg = render_svg(&layout, &theme);
        assert!(svg.contains("fill=\"#fff&quot; onload=&quot;x\""));
        assert!(!svg.contains("onload=\"x"));
    }

    #[test]
    fn empty_plot_still_renders() {
        let svg = render(&ForcePlot::default());
        assert!(svg.contains("force-axis"));
        assert!(!svg.contains("force-bar-blocks"));
    }
}
