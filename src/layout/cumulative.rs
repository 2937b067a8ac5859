use std::cmp::Ordering;

use crate::ir::Feature;

use super::types::{EffectTotals, JoinPoint, PlacedFeature};

/// Non-negative effects first, then negative ones; ascending effect within each group.
/// Stable, so equal effects keep input order.
pub fn sort_features(features: &[Feature]) -> Vec<Feature> {
    let mut sorted = features.to_vec();
    sorted.sort_by(|a, b| compare_effects(a.effect, b.effect));
    sorted
}

fn compare_effects(a: f64, b: f64) -> Ordering {
    let class = |effect: f64| u8::from(effect < 0.0);
    class(a)
        .cmp(&class(b))
        .then_with(|| a.partial_cmp(&b).unwrap_or(Ordering::Equal))
}

pub fn effect_totals(features: &[Feature]) -> EffectTotals {
    features
        .iter()
        .fold(EffectTotals::default(), |mut totals, feature| {
            totals.total += feature.effect.abs();
            if feature.effect > 0.0 {
                totals.positive += feature.effect;
            } else if feature.effect < 0.0 {
                totals.negative -= feature.effect;
            }
            totals
        })
}

/// Walks sorted features, assigning each its starting cumulative position, and finds
/// where the positive prefix meets the negative suffix.
pub fn accumulate(sorted: Vec<Feature>) -> (Vec<PlacedFeature>, JoinPoint) {
    let mut pos = 0.0;
    let mut join = None;
    let mut placed = Vec::with_capacity(sorted.len());
    for (idx, feature) in sorted.into_iter().enumerate() {
        if feature.effect < 0.0 && join.is_none() {
            join = Some(JoinPoint {
                position: pos,
                index: idx,
            });
        }
        let x = pos;
        pos += feature.effect.abs();
        placed.push(PlacedFeature {
            key: feature.key,
            name: feature.name,
            value: feature.value,
            effect: feature.effect,
            x,
        });
    }
    let join = join.unwrap_or(JoinPoint {
        position: pos,
        index: placed.len(),
    });
    (placed, join)
}
