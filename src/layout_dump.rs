use crate::ir::ForcePlot;
use crate::layout::{ForcePlotLayout, Viewport};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub link: String,
    pub base_value: f64,
    pub width: f64,
    pub viewport: Viewport,
    pub domain_size: f64,
    pub offset: f64,
    pub join_position: f64,
    pub join_index: usize,
    pub output_value: f64,
    pub total_effect: f64,
    pub base_title_visible: bool,
    pub features: Vec<FeatureDump>,
    pub labels: Vec<LabelDump>,
}

#[derive(Debug, Serialize)]
pub struct FeatureDump {
    pub key: String,
    pub name: String,
    pub effect: f64,
    pub x: f64,
    pub px: f64,
    pub width: f64,
    pub hover: bool,
}

#[derive(Debug, Serialize)]
pub struct LabelDump {
    pub key: String,
    pub text: String,
    pub text_x: f64,
    pub left: f64,
    pub right: f64,
    pub width: f64,
    pub inner_width: f64,
}

impl LayoutDump {
    pub fn from_layout(layout: &ForcePlotLayout, plot: &ForcePlot) -> Self {
        let features = layout
            .bars
            .iter()
            .filter_map(|bar| {
                let feature = layout.features.get(bar.feature)?;
                Some(FeatureDump {
                    key: feature.key.clone(),
                    name: feature.name.clone(),
                    effect: feature.effect,
                    x: feature.x,
                    px: bar.x,
                    width: bar.width,
                    hover: layout
                        .hover_labels
                        .iter()
                        .any(|label| label.feature == bar.feature),
                })
            })
            .collect();

        let labels = layout
            .labels
            .iter()
            .map(|label| LabelDump {
                key: layout
                    .features
                    .get(label.feature)
                    .map(|feature| feature.key.clone())
                    .unwrap_or_default(),
                text: label.text.clone(),
                text_x: label.text_x,
                left: label.left,
                right: label.right,
                width: label.width,
                inner_width: label.inner_width,
            })
            .collect();

        LayoutDump {
            link: format!("{:?}", plot.link),
            base_value: plot.base_value,
            width: layout.width,
            viewport: layout.viewport,
            domain_size: layout.scales.domain_size,
            offset: layout.scales.offset,
            join_position: layout.join.position,
            join_index: layout.join.index,
            output_value: layout.join_marker.output_value,
            total_effect: layout.totals.total,
            base_title_visible: layout.base_title_visible,
            features,
            labels,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &ForcePlotLayout, plot: &ForcePlot) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, plot);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
