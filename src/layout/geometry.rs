use crate::config::LayoutConfig;
use crate::palette::PlotColors;

use super::label_placement::is_label_candidate;
use super::scale::ForceScales;
use super::text::label_text;
use super::types::{
    BackingBox, BarSegment, BlockDivider, EffectTotals, Gradient, HoverLabel, JoinPoint,
    LabelDivider, LabelPlacement, PlacedFeature,
};

const LABEL_DIVIDER_WIDTH: f64 = 1.0;

fn gradient_index(effect: f64) -> usize {
    if effect > 0.0 { 0 } else { 1 }
}

/// Six-point arrow chevrons. The edge touching the join point stays flat.
pub fn bar_segments(
    features: &[PlacedFeature],
    join: &JoinPoint,
    scales: &ForceScales,
    colors: &PlotColors,
    config: &LayoutConfig,
) -> Vec<BarSegment> {
    let top = config.top_offset + config.bar_top;
    let middle = config.top_offset + config.bar_middle;
    let bottom = config.top_offset + config.bar_bottom;
    features
        .iter()
        .enumerate()
        .map(|(idx, feature)| {
            let x = scales.px(feature.x);
            let width = scales.extent(feature.effect.abs());
            let shift = if feature.effect < 0.0 {
                -config.chevron_width
            } else {
                config.chevron_width
            };
            let shift_start = if idx == join.index { 0.0 } else { shift };
            let shift_end = if idx + 1 == join.index { 0.0 } else { shift };
            BarSegment {
                feature: idx,
                x,
                width,
                points: vec![
                    (x, top),
                    (x + width, top),
                    (x + width + shift_end, middle),
                    (x + width, bottom),
                    (x, bottom),
                    (x + shift_start, middle),
                ],
                fill: colors.for_effect(feature.effect).to_string(),
            }
        })
        .collect()
}

pub fn hover_labels(
    features: &[PlacedFeature],
    scales: &ForceScales,
    totals: &EffectTotals,
    colors: &PlotColors,
    config: &LayoutConfig,
) -> Vec<HoverLabel> {
    features
        .iter()
        .enumerate()
        .filter(|(_, feature)| !is_label_candidate(feature.effect, scales, totals, config))
        .map(|(idx, feature)| HoverLabel {
            feature: idx,
            text: label_text(feature),
            x: scales.px(feature.x) + scales.extent(feature.effect.abs()) / 2.0,
            y: config.top_offset + config.hover_label_y,
            fill: colors.for_effect(feature.effect).to_string(),
        })
        .collect()
}

/// Trapezoid from a segment's bottom edge down to its label box.
pub fn backing_boxes(
    labels: &[LabelPlacement],
    features: &[PlacedFeature],
    scales: &ForceScales,
    opacity: f64,
    config: &LayoutConfig,
) -> Vec<BackingBox> {
    let bar_bottom = config.top_offset + config.bar_bottom;
    let box_top = config.top_offset + config.backing_top;
    let box_bottom = config.top_offset + config.backing_bottom;
    let pad = config.backing_padding;
    labels
        .iter()
        .filter_map(|label| {
            let feature = features.get(label.feature)?;
            let start = scales.px(feature.x);
            let end = start + scales.extent(feature.effect.abs());
            Some(BackingBox {
                feature: label.feature,
                points: vec![
                    (end, bar_bottom),
                    (label.right + pad, box_top),
                    (label.right + pad, box_bottom),
                    (label.left - pad, box_bottom),
                    (label.left - pad, box_top),
                    (start, bar_bottom),
                ],
                fill: format!("url(#linear-backgrad-{})", gradient_index(label.effect)),
                opacity,
            })
        })
        .collect()
}

/// A thin gradient rule right of every label but the last.
pub fn label_dividers(labels: &[LabelPlacement], config: &LayoutConfig) -> Vec<LabelDivider> {
    let Some((_, rest)) = labels.split_last() else {
        return Vec::new();
    };
    rest.iter()
        .map(|label| LabelDivider {
            x: label.right + config.divider_inset,
            y: config.top_offset + config.backing_top,
            width: LABEL_DIVIDER_WIDTH,
            height: config.backing_bottom - config.backing_top,
            fill: format!("url(#linear-grad-{})", gradient_index(label.effect)),
        })
        .collect()
}

/// Accent chevrons between adjacent segments.
pub fn block_dividers(
    features: &[PlacedFeature],
    join: &JoinPoint,
    scales: &ForceScales,
    colors: &PlotColors,
    config: &LayoutConfig,
) -> Vec<BlockDivider> {
    let Some((_, rest)) = features.split_last() else {
        return Vec::new();
    };
    rest.iter()
        .enumerate()
        .map(|(idx, feature)| {
            let pos = scales.px(feature.x) + scales.extent(feature.effect.abs());
            let shift = if feature.effect < 0.0 {
                -config.chevron_width
            } else {
                config.chevron_width
            };
            let hidden = join.index == idx + 1
                || feature.effect.abs() < config.zero_effect_threshold;
            BlockDivider {
                points: vec![
                    (pos, config.top_offset + config.bar_top),
                    (pos + shift, config.top_offset + config.bar_middle),
                    (pos, config.top_offset + config.bar_bottom),
                ],
                stroke: (!hidden).then(|| colors.accent_for_effect(feature.effect).to_string()),
            }
        })
        .collect()
}

/// Vertical fades used by label dividers (`linear-grad-*`) and backings
/// (`linear-backgrad-*`); index 0 is the positive color.
pub fn gradients(colors: &PlotColors) -> Vec<Gradient> {
    let pair = [&colors.positive, &colors.negative];
    let mut out = Vec::with_capacity(4);
    for (idx, color) in pair.iter().enumerate() {
        out.push(Gradient {
            id: format!("linear-grad-{idx}"),
            color: (*color).clone(),
            start_opacity: 0.6,
            end_opacity: 0.0,
        });
        out.push(Gradient {
            id: format!("linear-backgrad-{idx}"),
            color: (*color).clone(),
            start_opacity: 0.5,
            end_opacity: 0.0,
        });
    }
    out
}
