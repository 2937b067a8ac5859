use crate::config::LayoutConfig;
use crate::palette::PlotColors;

use super::scale::ForceScales;
use super::text::label_text;
use super::types::{EffectTotals, JoinPoint, LabelCandidate, LabelPlacement, PlacedFeature};

/// Wide enough for a permanent inline label. Segments failing this get a hover label.
pub fn is_label_candidate(
    effect: f64,
    scales: &ForceScales,
    totals: &EffectTotals,
    config: &LayoutConfig,
) -> bool {
    let width = scales.extent(effect.abs());
    width > scales.extent(totals.total) / config.thin_segment_ratio && width > config.min_label_px
}

pub fn label_candidates(
    features: &[PlacedFeature],
    scales: &ForceScales,
    totals: &EffectTotals,
    config: &LayoutConfig,
) -> Vec<LabelCandidate> {
    features
        .iter()
        .enumerate()
        .filter(|(_, feature)| is_label_candidate(feature.effect, scales, totals, config))
        .map(|(idx, feature)| LabelCandidate {
            feature: idx,
            text: label_text(feature),
            effect: feature.effect,
            segment_width: scales.extent(feature.effect.abs()),
        })
        .collect()
}

/// Places every candidate by walking outward from the join point, nearest first, each
/// label pushing the next one `width + gutter` further out. Returns placements in
/// candidate (left to right) order. `widths` holds one measured width per candidate.
pub fn place_labels(
    candidates: &[LabelCandidate],
    widths: &[f64],
    join: &JoinPoint,
    scales: &ForceScales,
    colors: &PlotColors,
    config: &LayoutConfig,
) -> Vec<LabelPlacement> {
    debug_assert_eq!(widths.len(), candidates.len(), "one measured width per candidate");
    let text_widths: Vec<f64> = candidates
        .iter()
        .enumerate()
        .map(|(idx, candidate)| {
            let inner = widths.get(idx).copied().unwrap_or(0.0);
            inner.max(candidate.segment_width - config.label_gutter)
        })
        .collect();

    let mut text_x = vec![join.position; candidates.len()];
    let split = candidates
        .iter()
        .position(|candidate| candidate.feature >= join.index)
        .unwrap_or(candidates.len());

    let mut pos = join.position + scales.invert_extent(config.label_start_padding);
    for idx in split..candidates.len() {
        text_x[idx] = pos;
        pos += scales.invert_extent(text_widths[idx] + config.label_gutter);
    }
    let mut pos = join.position - scales.invert_extent(config.label_start_padding);
    for idx in (0..split).rev() {
        text_x[idx] = pos;
        pos -= scales.invert_extent(text_widths[idx] + config.label_gutter);
    }

    let y = config.top_offset + config.label_y;
    candidates
        .iter()
        .enumerate()
        .map(|(idx, candidate)| {
            let width = text_widths[idx];
            let anchor_x = scales.px(text_x[idx]);
            let (left, right) = if candidate.effect > 0.0 {
                (anchor_x - width, anchor_x)
            } else {
                (anchor_x, anchor_x + width)
            };
            LabelPlacement {
                feature: candidate.feature,
                text: candidate.text.clone(),
                effect: candidate.effect,
                text_x: text_x[idx],
                anchor_x,
                x: (left + right) / 2.0,
                y,
                left,
                right,
                width,
                inner_width: widths.get(idx).copied().unwrap_or(0.0),
                fill: colors.for_effect(candidate.effect).to_string(),
            }
        })
        .collect()
}

/// Keeps labels whose anchor lies strictly inside the label margins.
pub fn within_margins(
    placements: Vec<LabelPlacement>,
    width: f64,
    label_margin: f64,
) -> Vec<LabelPlacement> {
    placements
        .into_iter()
        .filter(|label| label.anchor_x > label_margin && label.anchor_x < width - label_margin)
        .collect()
}
