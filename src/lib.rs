#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod palette;
pub mod parser;
pub mod render;
#[cfg(test)]
mod test_log;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig};
pub use controller::{ForcePlotChart, PollOutcome, RenderContext};
pub use error::{ForcePlotError, ForcePlotResult};
pub use layout::{ForcePlotLayout, compute_layout};
pub use parser::parse_force_plot;
pub use render::render_svg;
pub use text_metrics::{ApproximateMetrics, FontMetrics, MonospaceMetrics, TextMeasure};
pub use theme::Theme;

/// Everything `render_with_options` needs besides the document itself.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    /// Container width in pixels.
    pub width: f64,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self {
            theme: Theme::classic(),
            layout: LayoutConfig::default(),
            width: 800.0,
        }
    }

    pub fn modern() -> Self {
        Self {
            theme: Theme::modern(),
            ..Self::classic()
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::classic()
    }
}

/// Parses a JSON/JSON5 force plot document and renders it to SVG.
pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let plot = parse_force_plot(input)?;
    let measurer = FontMetrics {
        fast: options.layout.fast_text_metrics,
    };
    let layout = compute_layout(&plot, &options.theme, &options.layout, options.width, &measurer);
    Ok(render_svg(&layout, &options.theme))
}
