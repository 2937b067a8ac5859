//! Named two-color palettes and resolution of a plot's color source.

use crate::ir::ColorSource;
use crate::theme::{Rgb, parse_color};
use serde::Serialize;
use tracing::warn;

pub const DEFAULT_PALETTE: &str = "RdBu";

/// Lightening factors for the positive and negative accent colors.
const ACCENT_FACTORS: [f64; 2] = [1.45, 1.6];

const DEFAULT_POSITIVE: Rgb = Rgb {
    r: 255.0,
    g: 13.0,
    b: 87.0,
};
const DEFAULT_NEGATIVE: Rgb = Rgb {
    r: 30.0,
    g: 136.0,
    b: 229.0,
};

/// `(name, [increases value, decreases value])`
const PALETTES: &[(&str, [&str; 2])] = &[
    ("RdBu", ["rgb(255, 13, 87)", "rgb(30, 136, 229)"]),
    ("GnPR", ["rgb(24, 196, 93)", "rgb(124, 82, 255)"]),
    ("CyPU", ["#0099C6", "#990099"]),
    ("PkYg", ["#DD4477", "#66AA00"]),
    ("DrDb", ["#B82E2E", "#316395"]),
    ("LpLb", ["#994499", "#22AA99"]),
    ("YlDp", ["#AAAA11", "#6633CC"]),
    ("OrId", ["#E67300", "#3E0099"]),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotColors {
    pub positive: String,
    pub negative: String,
    pub positive_accent: String,
    pub negative_accent: String,
}

impl PlotColors {
    fn from_pair(positive: Rgb, negative: Rgb) -> Self {
        Self {
            positive: positive.to_css(),
            negative: negative.to_css(),
            positive_accent: positive.to_hsl().brighter(ACCENT_FACTORS[0]).to_rgb().to_css(),
            negative_accent: negative.to_hsl().brighter(ACCENT_FACTORS[1]).to_rgb().to_css(),
        }
    }

    pub fn for_effect(&self, effect: f64) -> &str {
        if effect > 0.0 {
            &self.positive
        } else {
            &self.negative
        }
    }

    pub fn accent_for_effect(&self, effect: f64) -> &str {
        if effect > 0.0 {
            &self.positive_accent
        } else {
            &self.negative_accent
        }
    }
}

impl Default for PlotColors {
    fn default() -> Self {
        default_colors()
    }
}

pub fn palette_names() -> impl Iterator<Item = &'static str> {
    PALETTES.iter().map(|(name, _)| *name)
}

fn lookup_palette(name: &str) -> Option<(Rgb, Rgb)> {
    let (_, [positive, negative]) = PALETTES.iter().find(|(candidate, _)| *candidate == name)?;
    Some((parse_color(positive)?, parse_color(negative)?))
}

fn default_colors() -> PlotColors {
    lookup_palette(DEFAULT_PALETTE)
        .map(|(positive, negative)| PlotColors::from_pair(positive, negative))
        .unwrap_or_else(|| PlotColors::from_pair(DEFAULT_POSITIVE, DEFAULT_NEGATIVE))
}

/// Resolves a color source to exactly two colors (plus accents). Never fails: anything
/// unusable falls back to the default palette with a warning.
pub fn resolve_plot_colors(source: &ColorSource) -> PlotColors {
    match source {
        ColorSource::Palette(name) => match lookup_palette(name) {
            Some((positive, negative)) => PlotColors::from_pair(positive, negative),
            None => {
                warn!(palette = %name, "invalid color map name, reverting to default");
                default_colors()
            }
        },
        ColorSource::Colors(colors) => {
            if colors.len() < 2 {
                warn!(count = colors.len(), "color list needs at least two entries, reverting to default");
                return default_colors();
            }
            match (parse_color(&colors[0]), parse_color(&colors[1])) {
                (Some(positive), Some(negative)) => PlotColors::from_pair(positive, negative),
                _ => {
                    warn!(
                        positive = %colors[0],
                        negative = %colors[1],
                        "unparseable plot colors, reverting to default"
                    );
                    default_colors()
                }
            }
        }
        ColorSource::Invalid(raw) => {
            warn!(plot_cmap = %raw, "plot_cmap must be a palette name or a color list, reverting to default");
            default_colors()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_log::capture_warnings;

    #[test]
    fn default_palette_is_red_blue() {
        let colors = resolve_plot_colors(&ColorSource::default());
        assert_eq!(colors.positive, "rgb(255, 13, 87)");
        assert_eq!(colors.negative, "rgb(30, 136, 229)");
    }

    #[test]
    fn named_palette_lookup() {
        let colors = resolve_plot_colors(&ColorSource::Palette("CyPU".into()));
        assert_eq!(colors.positive, "rgb(0, 153, 198)");
        assert_eq!(colors.negative, "rgb(153, 0, 153)");
    }

    #[test]
    fn unknown_palette_falls_back() {
        let colors = resolve_plot_colors(&ColorSource::Palette("unknown".into()));
        assert_eq!(colors, PlotColors::default());
    }

    #[test]
    fn fallbacks_log_a_warning() {
        let (colors, log) =
            capture_warnings(|| resolve_plot_colors(&ColorSource::Palette("unknown".into())));
        assert_eq!(colors, PlotColors::default());
        assert!(log.contains("WARN"), "{log}");
        assert!(log.contains("invalid color map name"), "{log}");
        assert!(log.contains("palette=unknown"), "{log}");

        let (colors, log) =
            capture_warnings(|| resolve_plot_colors(&ColorSource::Invalid("{\"a\":1}".into())));
        assert_eq!(colors, PlotColors::default());
        assert!(log.contains("WARN"), "{log}");
        assert!(log.contains("plot_cmap must be a palette name"), "{log}");
    }

    #[test]
    fn named_palette_logs_nothing() {
        let (_, log) = capture_warnings(|| resolve_plot_colors(&ColorSource::Palette("GnPR".into())));
        assert!(log.is_empty(), "{log}");
    }

    #[test]
    fn non_ascii_hex_falls_back_without_panicking() {
        let fallback = PlotColors::default();
        assert_eq!(
            resolve_plot_colors(&ColorSource::Colors(vec!["#é1".into(), "#fff".into()])),
            fallback
        );
        assert_eq!(
            resolve_plot_colors(&ColorSource::Colors(vec!["#aééb".into(), "#fff".into()])),
            fallback
        );
    }

    #[test]
    fn explicit_colors_are_used_in_order() {
        let colors = resolve_plot_colors(&ColorSource::Colors(vec![
            "#00ff00".into(),
            "#ff00ff".into(),
            "#000000".into(),
        ]));
        assert_eq!(colors.positive, "rgb(0, 255, 0)");
        assert_eq!(colors.negative, "rgb(255, 0, 255)");
    }

    #[test]
    fn short_malformed_or_unparseable_sources_fall_back() {
        let fallback = PlotColors::default();
        assert_eq!(
            resolve_plot_colors(&ColorSource::Colors(vec!["#00ff00".into()])),
            fallback
        );
        assert_eq!(
            resolve_plot_colors(&ColorSource::Colors(vec!["nope".into(), "#fff".into()])),
            fallback
        );
        assert_eq!(resolve_plot_colors(&ColorSource::Invalid("42".into())), fallback);
    }

    #[test]
    fn accents_are_lighter_than_base_colors() {
        let colors = PlotColors::default();
        let base = parse_color(&colors.negative).unwrap().to_hsl();
        let accent = parse_color(&colors.negative_accent).unwrap().to_hsl();
        assert!(accent.l > base.l);
        assert_ne!(colors.positive_accent, colors.positive);
    }

    #[test]
    fn every_palette_entry_parses() {
        for name in palette_names() {
            assert!(lookup_palette(name).is_some(), "{name}");
        }
    }

    #[test]
    fn zero_effect_uses_negative_color() {
        let colors = PlotColors::default();
        assert_eq!(colors.for_effect(0.0), colors.negative);
        assert_eq!(colors.for_effect(0.1), colors.positive);
    }
}
