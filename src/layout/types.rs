use serde::Serialize;

use crate::ir::FeatureValue;
use crate::palette::PlotColors;

use super::scale::ForceScales;

pub type Point = (f64, f64);

/// A feature after sorting, with its starting cumulative position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedFeature {
    pub key: String,
    pub name: String,
    pub value: Option<FeatureValue>,
    pub effect: f64,
    /// Cumulative contribution before this feature.
    pub x: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JoinPoint {
    pub position: f64,
    /// Index of the first negative-effect feature, or the feature count when there is none.
    pub index: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EffectTotals {
    /// Sum of absolute effects.
    pub total: f64,
    pub positive: f64,
    /// Absolute sum of the negative effects.
    pub negative: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextItem {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub anchor: TextAnchor,
    pub font_size: f64,
    pub fill: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSegment {
    /// Index into [`ForcePlotLayout::features`].
    pub feature: usize,
    pub x: f64,
    pub width: f64,
    pub points: Vec<Point>,
    pub fill: String,
}

/// Floating label for a segment too thin to carry an inline one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverLabel {
    pub feature: usize,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub fill: String,
}

/// An inline label that passed the thinness test and still needs a measured width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelCandidate {
    pub feature: usize,
    pub text: String,
    pub effect: f64,
    /// Pixel width of the feature's segment.
    pub segment_width: f64,
}

/// Measured widths for everything in the provisional layout that carries text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabelMetrics {
    /// One width per [`LabelCandidate`], in candidate order.
    pub candidate_widths: Vec<f64>,
    pub out_name_width: f64,
    pub base_title_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelPlacement {
    pub feature: usize,
    pub text: String,
    pub effect: f64,
    /// Placement position in contribution space.
    pub text_x: f64,
    /// `text_x` in pixels; the label box touches this edge.
    pub anchor_x: f64,
    /// Center of the drawn text.
    pub x: f64,
    pub y: f64,
    pub left: f64,
    pub right: f64,
    pub width: f64,
    pub inner_width: f64,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackingBox {
    pub feature: usize,
    pub points: Vec<Point>,
    pub fill: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelDivider {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockDivider {
    pub points: Vec<Point>,
    /// `None` draws nothing visible.
    pub stroke: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gradient {
    pub id: String,
    pub color: String,
    pub start_opacity: f64,
    pub end_opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub value: f64,
    pub x: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLayout {
    pub y: f64,
    pub x1: f64,
    pub x2: f64,
    pub tick_size: f64,
    pub tick_padding: f64,
    pub ticks: Vec<AxisTick>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinPointMarker {
    pub x: f64,
    pub line_y1: f64,
    pub line_y2: f64,
    pub line_color: String,
    pub output_value: f64,
    pub value_label: TextItem,
    pub title: TextItem,
    pub higher: TextItem,
    pub lower: TextItem,
    pub higher_arrow: TextItem,
    pub lower_arrow: TextItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub min_x: f64,
    pub width: f64,
    pub height: f64,
    pub expanded: bool,
}

/// Everything computable before text is measured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisionalLayout {
    pub width: f64,
    pub label_margin: f64,
    pub features: Vec<PlacedFeature>,
    pub join: JoinPoint,
    pub totals: EffectTotals,
    pub scales: ForceScales,
    pub colors: PlotColors,
    pub bars: Vec<BarSegment>,
    pub hover_labels: Vec<HoverLabel>,
    pub block_dividers: Vec<BlockDivider>,
    pub gradients: Vec<Gradient>,
    pub axis: AxisLayout,
    pub candidates: Vec<LabelCandidate>,
    pub join_marker: JoinPointMarker,
    pub base_title: TextItem,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForcePlotLayout {
    pub width: f64,
    pub features: Vec<PlacedFeature>,
    pub join: JoinPoint,
    pub totals: EffectTotals,
    pub scales: ForceScales,
    pub colors: PlotColors,
    pub bars: Vec<BarSegment>,
    pub hover_labels: Vec<HoverLabel>,
    /// Inline labels inside the label margins, ordered left to right.
    pub labels: Vec<LabelPlacement>,
    pub backings: Vec<BackingBox>,
    pub label_dividers: Vec<LabelDivider>,
    pub block_dividers: Vec<BlockDivider>,
    pub gradients: Vec<Gradient>,
    pub axis: AxisLayout,
    pub join_marker: JoinPointMarker,
    pub base_title: TextItem,
    pub base_title_visible: bool,
    pub viewport: Viewport,
}

impl ForcePlotLayout {
    /// Final cumulative position; equals `totals.total`.
    pub fn cumulative_end(&self) -> f64 {
        self.features
            .last()
            .map(|feature| feature.x + feature.effect.abs())
            .unwrap_or(0.0)
    }
}
