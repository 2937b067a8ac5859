mod cumulative;
mod geometry;
mod label_placement;
mod overflow;
mod scale;
mod text;
pub(crate) mod types;
pub use cumulative::{accumulate, effect_totals, sort_features};
pub use scale::{ForceScales, LinearScale, ticks};
pub use text::{format_fixed, format_significant, label_text};
pub use types::*;
use geometry::*;
use label_placement::*;
use overflow::*;

use crate::config::LayoutConfig;
use crate::ir::ForcePlot;
use crate::palette::{PlotColors, resolve_plot_colors};
use crate::text_metrics::TextMeasure;
use crate::theme::Theme;
use tracing::debug;

// Join-point furniture offsets, relative to `top_offset`.
const VALUE_LABEL_DY: f64 = -5.0;
const TITLE_DY: f64 = -22.0;
const CAPTION_DY: f64 = -38.0;
const CAPTION_DX: f64 = 16.0;
const HIGHER_ARROW_DY: f64 = -42.0;
const LOWER_ARROW_DY: f64 = -36.0;
const ARROW_DX: f64 = 7.0;

/// First phase: everything that does not depend on measured text.
pub fn compute_provisional_layout(
    plot: &ForcePlot,
    theme: &Theme,
    config: &LayoutConfig,
    width: f64,
) -> ProvisionalLayout {
    let totals = effect_totals(&plot.features);
    let (features, join) = accumulate(sort_features(&plot.features));
    let scales = ForceScales::new(&totals, width, config.domain_headroom);
    let colors = resolve_plot_colors(&plot.color_source);

    let bars = bar_segments(&features, &join, &scales, &colors, config);
    let hover_labels = hover_labels(&features, &scales, &totals, &colors, config);
    let block_dividers = block_dividers(&features, &join, &scales, &colors, config);
    let candidates = label_candidates(&features, &scales, &totals, config);
    let axis = axis_layout(plot, &scales, width, config);
    let join_marker = join_point_marker(plot, &join, &totals, &scales, &colors, theme, config);
    let base_title = TextItem {
        text: plot.base_value_title.clone(),
        x: scales.centered.map(0.0),
        y: config.top_offset + TITLE_DY,
        anchor: TextAnchor::Middle,
        font_size: theme.title_font_size,
        fill: theme.text_color.clone(),
        opacity: theme.title_opacity,
    };

    ProvisionalLayout {
        width,
        label_margin: plot.label_margin,
        features,
        join,
        totals,
        scales,
        gradients: gradients(&colors),
        colors,
        bars,
        hover_labels,
        block_dividers,
        axis,
        candidates,
        join_marker,
        base_title,
    }
}

/// Second phase: asks the host for the width of every piece of text the final
/// placement depends on.
pub fn measure_labels(
    provisional: &ProvisionalLayout,
    theme: &Theme,
    measurer: &dyn TextMeasure,
) -> LabelMetrics {
    let candidate_widths = provisional
        .candidates
        .iter()
        .map(|candidate| {
            measurer.text_width(&candidate.text, theme.label_font_size, &theme.font_family)
        })
        .collect();
    let title = &provisional.join_marker.title;
    let base = &provisional.base_title;
    LabelMetrics {
        candidate_widths,
        out_name_width: measurer.text_width(&title.text, title.font_size, &theme.font_family),
        base_title_width: measurer.text_width(&base.text, base.font_size, &theme.font_family),
    }
}

/// Third phase: places labels with the measured widths and derives everything that
/// hangs off them.
pub fn finalize_layout(
    provisional: ProvisionalLayout,
    metrics: &LabelMetrics,
    theme: &Theme,
    config: &LayoutConfig,
) -> ForcePlotLayout {
    let ProvisionalLayout {
        width,
        label_margin,
        features,
        join,
        totals,
        scales,
        colors,
        bars,
        hover_labels,
        block_dividers,
        gradients,
        axis,
        candidates,
        join_marker,
        mut base_title,
    } = provisional;

    let placed = place_labels(
        &candidates,
        &metrics.candidate_widths,
        &join,
        &scales,
        &colors,
        config,
    );
    let labels = within_margins(placed, width, label_margin);
    let backings = backing_boxes(&labels, &features, &scales, theme.backing_opacity, config);
    let label_dividers = label_dividers(&labels, config);
    let viewport = viewport_for_labels(
        &labels,
        width,
        config.chart_height,
        config.overflow_tolerance,
    );

    let base_title_visible = !titles_overlap(
        &base_title,
        metrics.base_title_width,
        &join_marker.title,
        metrics.out_name_width,
    );
    if !base_title_visible {
        base_title.opacity = 0.0;
    }

    debug!(
        features = features.len(),
        candidates = candidates.len(),
        drawn = labels.len(),
        join_index = join.index,
        expanded = viewport.expanded,
        "force plot layout"
    );

    ForcePlotLayout {
        width,
        features,
        join,
        totals,
        scales,
        colors,
        bars,
        hover_labels,
        labels,
        backings,
        label_dividers,
        block_dividers,
        gradients,
        axis,
        join_marker,
        base_title,
        base_title_visible,
        viewport,
    }
}

/// All three phases in one call.
pub fn compute_layout(
    plot: &ForcePlot,
    theme: &Theme,
    config: &LayoutConfig,
    width: f64,
    measurer: &dyn TextMeasure,
) -> ForcePlotLayout {
    let provisional = compute_provisional_layout(plot, theme, config, width);
    let metrics = measure_labels(&provisional, theme, measurer);
    finalize_layout(provisional, &metrics, theme, config)
}

fn axis_layout(
    plot: &ForcePlot,
    scales: &ForceScales,
    width: f64,
    config: &LayoutConfig,
) -> AxisLayout {
    let (start, stop) = scales.centered.domain;
    let ticks = ticks(start, stop, config.axis_tick_count)
        .into_iter()
        .map(|value| AxisTick {
            value,
            x: scales.centered.map(value),
            label: format_significant(plot.invert_link(value), 4),
        })
        .collect();
    AxisLayout {
        y: config.top_offset,
        x1: 0.0,
        x2: width,
        tick_size: config.axis_tick_size,
        tick_padding: config.axis_tick_padding,
        ticks,
    }
}

fn join_point_marker(
    plot: &ForcePlot,
    join: &JoinPoint,
    totals: &EffectTotals,
    scales: &ForceScales,
    colors: &PlotColors,
    theme: &Theme,
    config: &LayoutConfig,
) -> JoinPointMarker {
    let x = scales.px(join.position);
    let top = config.top_offset;
    let output_value = plot.invert_link(join.position - totals.negative);
    let item = |content: &str, dx: f64, dy: f64, anchor, font_size, fill: &str, opacity| TextItem {
        text: content.to_string(),
        x: x + dx,
        y: top + dy,
        anchor,
        font_size,
        fill: fill.to_string(),
        opacity,
    };

    JoinPointMarker {
        x,
        line_y1: top,
        line_y2: top + config.bar_top,
        line_color: theme.join_line_color.clone(),
        output_value,
        value_label: item(
            &format_fixed(output_value, 2),
            0.0,
            VALUE_LABEL_DY,
            TextAnchor::Middle,
            theme.value_font_size,
            &theme.text_color,
            1.0,
        ),
        title: item(
            plot.out_name(),
            0.0,
            TITLE_DY,
            TextAnchor::Middle,
            theme.title_font_size,
            &theme.text_color,
            theme.title_opacity,
        ),
        higher: item(
            "higher",
            -CAPTION_DX,
            CAPTION_DY,
            TextAnchor::End,
            theme.caption_font_size,
            &colors.positive,
            1.0,
        ),
        lower: item(
            "lower",
            CAPTION_DX,
            CAPTION_DY,
            TextAnchor::Start,
            theme.caption_font_size,
            &colors.negative,
            1.0,
        ),
        higher_arrow: item(
            "\u{2192}",
            ARROW_DX,
            HIGHER_ARROW_DY,
            TextAnchor::End,
            theme.caption_font_size,
            &colors.positive,
            1.0,
        ),
        lower_arrow: item(
            "\u{2190}",
            -ARROW_DX,
            LOWER_ARROW_DY,
            TextAnchor::Start,
            theme.caption_font_size,
            &colors.negative,
            1.0,
        ),
    }
}
