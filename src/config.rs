use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geometry constants of the force plot. Vertical positions are relative to `top_offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub top_offset: f64,
    pub chart_height: f64,
    pub bar_top: f64,
    pub bar_middle: f64,
    pub bar_bottom: f64,
    pub chevron_width: f64,
    pub label_y: f64,
    pub backing_top: f64,
    pub backing_bottom: f64,
    pub backing_padding: f64,
    pub divider_inset: f64,
    pub label_gutter: f64,
    pub label_start_padding: f64,
    pub min_label_px: f64,
    pub thin_segment_ratio: f64,
    pub domain_headroom: f64,
    pub overflow_tolerance: f64,
    pub zero_effect_threshold: f64,
    pub axis_tick_count: usize,
    pub axis_tick_size: f64,
    pub axis_tick_padding: f64,
    pub hover_label_y: f64,
    pub fast_text_metrics: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            top_offset: 50.0,
            chart_height: 150.0,
            bar_top: 6.0,
            bar_middle: 14.5,
            bar_bottom: 23.0,
            chevron_width: 4.0,
            label_y: 48.0,
            backing_top: 33.0,
            backing_bottom: 54.0,
            backing_padding: 5.0,
            divider_inset: 4.5,
            label_gutter: 10.0,
            label_start_padding: 5.0,
            min_label_px: 10.0,
            thin_segment_ratio: 50.0,
            domain_headroom: 3.0,
            overflow_tolerance: 1.0,
            zero_effect_threshold: 1e-8,
            axis_tick_count: 10,
            axis_tick_size: 4.0,
            axis_tick_padding: -18.0,
            hover_label_y: 0.5,
            fast_text_metrics: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Container width handed to the layout.
    pub width: f64,
    pub height: f64,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 150.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

/// Redraw timing, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub mount_delay_ms: u64,
    pub resize_debounce_ms: u64,
    pub zero_width_retry_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            mount_delay_ms: 50,
            resize_debounce_ms: 200,
            zero_width_retry_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    label_font_size: Option<NumberOrString>,
    title_font_size: Option<NumberOrString>,
    text_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

impl NumberOrString {
    fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().trim_end_matches("px").parse::<f64>().ok(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    top_offset: Option<f64>,
    chart_height: Option<f64>,
    bar_top: Option<f64>,
    bar_middle: Option<f64>,
    bar_bottom: Option<f64>,
    chevron_width: Option<f64>,
    label_y: Option<f64>,
    backing_top: Option<f64>,
    backing_bottom: Option<f64>,
    backing_padding: Option<f64>,
    divider_inset: Option<f64>,
    label_gutter: Option<f64>,
    label_start_padding: Option<f64>,
    min_label_px: Option<f64>,
    thin_segment_ratio: Option<f64>,
    domain_headroom: Option<f64>,
    overflow_tolerance: Option<f64>,
    zero_effect_threshold: Option<f64>,
    axis_tick_count: Option<usize>,
    axis_tick_size: Option<f64>,
    axis_tick_padding: Option<f64>,
    hover_label_y: Option<f64>,
    fast_text_metrics: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f64>,
    height: Option<f64>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct SchedulerConfigFile {
    mount_delay_ms: Option<u64>,
    resize_debounce_ms: Option<u64>,
    zero_width_retry_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
    scheduler: Option<SchedulerConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Applies a JSON config document on top of the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match Theme::from_name(theme_name) {
            Some(theme) => config.theme = theme,
            None => tracing::warn!(theme = theme_name, "unknown theme, keeping classic"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.label_font_size.as_ref().and_then(NumberOrString::as_f64) {
            config.theme.label_font_size = v;
        }
        if let Some(v) = vars.title_font_size.as_ref().and_then(NumberOrString::as_f64) {
            config.theme.title_font_size = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }
    config.render.background = config.theme.background.clone();

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        macro_rules! apply {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = layout.$field {
                    target.$field = v;
                })*
            };
        }
        apply!(
            top_offset,
            chart_height,
            bar_top,
            bar_middle,
            bar_bottom,
            chevron_width,
            label_y,
            backing_top,
            backing_bottom,
            backing_padding,
            divider_inset,
            label_gutter,
            label_start_padding,
            min_label_px,
            thin_segment_ratio,
            domain_headroom,
            overflow_tolerance,
            zero_effect_threshold,
            axis_tick_count,
            axis_tick_size,
            axis_tick_padding,
            hover_label_y,
            fast_text_metrics,
        );
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.background {
            config.theme.background = v.clone();
            config.render.background = v;
        }
    }

    if let Some(scheduler) = parsed.scheduler {
        if let Some(v) = scheduler.mount_delay_ms {
            config.scheduler.mount_delay_ms = v;
        }
        if let Some(v) = scheduler.resize_debounce_ms {
            config.scheduler.resize_debounce_ms = v;
        }
        if let Some(v) = scheduler.zero_width_retry_ms {
            config.scheduler.zero_width_retry_ms = v;
        }
    }

    Ok(config)
}
