use force_plot_renderer::config::Config;
use force_plot_renderer::{
    ApproximateMetrics, ForcePlotChart, PollOutcome, RenderOptions, compute_layout, parse_force_plot,
    render_svg,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForcePlotRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    label_font_size: Option<f64>,
    width: Option<f64>,
}

fn build_render_options(options: ForcePlotRenderOptions) -> RenderOptions {
    let mut render_options = match options.theme.as_deref() {
        Some("modern") => RenderOptions::modern(),
        _ => RenderOptions::classic(),
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(size) = options.label_font_size {
        render_options.theme.label_font_size = size;
    }
    if let Some(width) = options.width.filter(|w| *w > 0.0) {
        render_options.width = width;
    }

    render_options
}

fn parse_options(options_json: Option<String>) -> Result<ForcePlotRenderOptions, JsValue> {
    match options_json {
        Some(raw) => serde_json::from_str(&raw).map_err(|error| JsValue::from_str(&error.to_string())),
        None => Ok(ForcePlotRenderOptions::default()),
    }
}

fn to_js_error(error: impl ToString) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn render(data: &str, options: RenderOptions) -> Result<String, String> {
    // system fonts are not reachable from wasm, so text is measured from the width table
    let plot = parse_force_plot(data).map_err(|error| error.to_string())?;
    let layout = compute_layout(
        &plot,
        &options.theme,
        &options.layout,
        options.width,
        &ApproximateMetrics,
    );
    Ok(render_svg(&layout, &options.theme))
}

#[wasm_bindgen(js_name = renderForcePlotSvg)]
pub fn render_force_plot_svg(data: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = build_render_options(parse_options(options_json)?);
    render(data, options).map_err(to_js_error)
}

/// A chart bound to a host element. The host forwards lifecycle events with
/// `performance.now()` timestamps and calls `poll` from its animation loop.
#[wasm_bindgen]
pub struct ForcePlotWidget {
    chart: ForcePlotChart<ApproximateMetrics>,
}

#[wasm_bindgen]
impl ForcePlotWidget {
    #[wasm_bindgen(constructor)]
    pub fn new(data: &str, options_json: Option<String>) -> Result<ForcePlotWidget, JsValue> {
        let options = build_render_options(parse_options(options_json)?);
        let plot = parse_force_plot(data).map_err(to_js_error)?;
        let config = Config {
            theme: options.theme,
            layout: options.layout,
            ..Config::default()
        };
        Ok(Self {
            chart: ForcePlotChart::new(plot, &config, ApproximateMetrics),
        })
    }

    pub fn mount(&mut self, now: f64) -> bool {
        self.chart.mount(timestamp(now))
    }

    pub fn resize(&mut self, now: f64) -> bool {
        self.chart.resize(timestamp(now))
    }

    #[wasm_bindgen(js_name = setData)]
    pub fn set_data(&mut self, data: &str, now: f64) -> Result<bool, JsValue> {
        let plot = parse_force_plot(data).map_err(to_js_error)?;
        Ok(self.chart.set_data(plot, timestamp(now)))
    }

    pub fn unmount(&mut self) {
        self.chart.unmount();
    }

    /// Returns the new SVG when a redraw happened, otherwise `undefined`.
    pub fn poll(&mut self, now: f64, width: f64) -> Option<String> {
        match self.chart.poll(timestamp(now), width) {
            PollOutcome::Drawn => self.chart.svg().map(str::to_string),
            PollOutcome::Idle | PollOutcome::Deferred { .. } => None,
        }
    }

    /// Next time `poll` can do work, if anything is pending.
    #[wasm_bindgen(js_name = pendingDeadline)]
    pub fn pending_deadline(&self) -> Option<f64> {
        self.chart.pending_deadline().map(|deadline| deadline as f64)
    }

    pub fn svg(&self) -> Option<String> {
        self.chart.svg().map(str::to_string)
    }
}

fn timestamp(now: f64) -> u64 {
    if now.is_finite() && now > 0.0 { now as u64 } else { 0 }
}
