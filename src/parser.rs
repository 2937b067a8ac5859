use crate::error::{ForcePlotError, ForcePlotResult};
use crate::ir::{ColorSource, Feature, FeatureValue, ForcePlot, Link};
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForcePlotInput {
    #[serde(default)]
    feature_names: IndexMap<String, String>,
    #[serde(default)]
    features: IndexMap<String, FeatureInput>,
    base_value: Option<f64>,
    link: Option<String>,
    #[serde(rename = "plot_cmap", alias = "plotCmap")]
    plot_cmap: Option<serde_json::Value>,
    label_margin: Option<f64>,
    out_names: Option<Vec<String>>,
    base_value_title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FeatureInput {
    #[serde(default)]
    value: Option<FeatureValue>,
    effect: f64,
}

/// Parses a force plot document. Accepts JSON and JSON5 (unquoted keys, trailing commas),
/// so object literals copied from a component call site work unchanged.
pub fn parse_force_plot(input: &str) -> ForcePlotResult<ForcePlot> {
    let parsed: ForcePlotInput = json5::from_str(input)?;
    build_force_plot(parsed)
}

fn build_force_plot(parsed: ForcePlotInput) -> ForcePlotResult<ForcePlot> {
    let defaults = ForcePlot::default();

    let base_value = parsed.base_value.unwrap_or(defaults.base_value);
    if !base_value.is_finite() {
        return Err(ForcePlotError::NonFiniteBaseValue(base_value));
    }

    let label_margin = parsed.label_margin.unwrap_or(defaults.label_margin);
    if !label_margin.is_finite() || label_margin < 0.0 {
        return Err(ForcePlotError::InvalidLabelMargin(label_margin));
    }

    let link = match parsed.link.as_deref() {
        None => Link::Identity,
        Some(name) => Link::from_name(name).unwrap_or_else(|| {
            warn!(link = name, "unknown link function, using identity");
            Link::Identity
        }),
    };

    let mut features = Vec::with_capacity(parsed.features.len());
    let mut entries: Vec<(String, FeatureInput)> = parsed.features.into_iter().collect();
    sort_js_property_order(&mut entries);
    for (key, input) in entries {
        if !input.effect.is_finite() {
            return Err(ForcePlotError::NonFiniteEffect {
                key,
                effect: input.effect,
            });
        }
        // Names without a matching feature are simply never looked up.
        let name = parsed
            .feature_names
            .get(&key)
            .cloned()
            .unwrap_or_else(|| key.clone());
        features.push(Feature {
            key,
            name,
            value: normalize_value(input.value),
            effect: input.effect,
        });
    }

    let color_source = parsed
        .plot_cmap
        .map(color_source_from_json)
        .unwrap_or(defaults.color_source);
    let out_names = match parsed.out_names {
        Some(names) if !names.is_empty() => names,
        _ => defaults.out_names,
    };

    debug!(features = features.len(), ?link, "parsed force plot");

    Ok(ForcePlot {
        features,
        base_value,
        link,
        color_source,
        label_margin,
        out_names,
        base_value_title: parsed
            .base_value_title
            .unwrap_or(defaults.base_value_title),
    })
}

fn normalize_value(value: Option<FeatureValue>) -> Option<FeatureValue> {
    match value {
        Some(FeatureValue::Text(text)) if text.is_empty() => None,
        other => other,
    }
}

fn color_source_from_json(value: serde_json::Value) -> ColorSource {
    match value {
        serde_json::Value::String(name) => ColorSource::Palette(name),
        serde_json::Value::Array(items) if items.iter().all(serde_json::Value::is_string) => {
            ColorSource::Colors(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            )
        }
        other => ColorSource::Invalid(other.to_string()),
    }
}

/// Orders object keys the way a JavaScript engine enumerates them: canonical array-index
/// keys ascending by numeric value, then every other key in insertion order.
fn sort_js_property_order<T>(entries: &mut [(String, T)]) {
    entries.sort_by_key(|(key, _)| match array_index(key) {
        Some(idx) => (0u8, idx),
        None => (1u8, 0),
    });
}

fn array_index(key: &str) -> Option<u64> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let idx: u64 = key.parse().ok()?;
    (idx < u64::from(u32::MAX)).then_some(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_log::capture_warnings;

    const EXAMPLE: &str = r#"{
      baseValue: 0.0,
      link: "identity",
      featureNames: {
        "0": "Blue",
        "1": "Red",
        "2": "Green",
        "3": "Orange",
      },
      outNames: ["color rating"],
      features: {
        "0": { value: 1.0, effect: 1.0 },
        "1": { value: 0.0, effect: 0.5 },
        "2": { value: 2.0, effect: -2.5 },
        "3": { value: 2.0, effect: -0.5 },
      },
    }"#;

    #[test]
    fn parses_component_literal() {
        let plot = parse_force_plot(EXAMPLE).unwrap();
        assert_eq!(plot.features.len(), 4);
        let names: Vec<&str> = plot.features.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Blue", "Red", "Green", "Orange"]);
        assert_eq!(plot.features[2].effect, -2.5);
        assert_eq!(plot.features[1].value, Some(FeatureValue::Number(0.0)));
        assert_eq!(plot.out_name(), "color rating");
        assert_eq!(plot.link, Link::Identity);
        assert_eq!(plot.label_margin, 20.0);
        assert_eq!(plot.color_source, ColorSource::Palette("RdBu".to_string()));
    }

    #[test]
    fn unmatched_names_are_ignored_and_missing_names_fall_back_to_key() {
        let plot = parse_force_plot(
            r#"{"featureNames": {"7": "Ghost", "a": "Age"},
                "features": {"a": {"effect": 1}, "b": {"effect": -1}}}"#,
        )
        .unwrap();
        assert_eq!(plot.features.len(), 2);
        assert_eq!(plot.features[0].name, "Age");
        assert_eq!(plot.features[1].name, "b");
    }

    #[test]
    fn features_follow_js_property_order() {
        let plot = parse_force_plot(
            r#"{"features": {"z": {"effect": 1}, "10": {"effect": 1}, "2": {"effect": 1},
                "01": {"effect": 1}, "a": {"effect": 1}}}"#,
        )
        .unwrap();
        let keys: Vec<&str> = plot.features.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["2", "10", "z", "01", "a"]);
    }

    #[test]
    fn absent_and_empty_values_mean_name_only() {
        let plot = parse_force_plot(
            r#"{"features": {"0": {"effect": 1, "value": null}, "1": {"effect": 1, "value": ""},
                "2": {"effect": 1}, "3": {"effect": 1, "value": "Male"}}}"#,
        )
        .unwrap();
        assert_eq!(plot.features[0].value, None);
        assert_eq!(plot.features[1].value, None);
        assert_eq!(plot.features[2].value, None);
        assert_eq!(
            plot.features[3].value,
            Some(FeatureValue::Text("Male".to_string()))
        );
    }

    #[test]
    fn rejects_non_finite_effect() {
        let err = parse_force_plot(r#"{features: {"0": {effect: Infinity}}}"#).unwrap_err();
        assert!(matches!(err, ForcePlotError::NonFiniteEffect { ref key, .. } if key == "0"));
    }

    #[test]
    fn rejects_negative_label_margin() {
        let err = parse_force_plot(r#"{labelMargin: -4}"#).unwrap_err();
        assert!(matches!(err, ForcePlotError::InvalidLabelMargin(_)));
    }

    #[test]
    fn unknown_link_falls_back_to_identity() {
        let (plot, log) = capture_warnings(|| parse_force_plot(r#"{link: "probit"}"#));
        assert_eq!(plot.unwrap().link, Link::Identity);
        assert!(log.contains("WARN"), "{log}");
        assert!(log.contains("unknown link function"), "{log}");
        assert!(log.contains("probit"), "{log}");
        let plot = parse_force_plot(r#"{link: "logit", baseValue: -1.2}"#).unwrap();
        assert_eq!(plot.link, Link::Logit);
        assert_eq!(plot.base_value, -1.2);
    }

    #[test]
    fn color_sources() {
        let plot = parse_force_plot(r##"{plot_cmap: ["#ff0000", "#0000ff"]}"##).unwrap();
        assert_eq!(
            plot.color_source,
            ColorSource::Colors(vec!["#ff0000".to_string(), "#0000ff".to_string()])
        );
        let plot = parse_force_plot(r#"{plotCmap: "GnPR"}"#).unwrap();
        assert_eq!(plot.color_source, ColorSource::Palette("GnPR".to_string()));
        let plot = parse_force_plot(r#"{plot_cmap: 42}"#).unwrap();
        assert!(matches!(plot.color_source, ColorSource::Invalid(_)));
        let plot = parse_force_plot(r##"{plot_cmap: ["#fff", 3]}"##).unwrap();
        assert!(matches!(plot.color_source, ColorSource::Invalid(_)));
    }

    #[test]
    fn empty_document_uses_defaults() {
        let plot = parse_force_plot("{}").unwrap();
        assert!(plot.features.is_empty());
        assert_eq!(plot.base_value_title, "base value");
        assert_eq!(plot.out_names, vec!["f(x)".to_string()]);
    }

    #[test]
    fn malformed_input_is_a_parse_error() {
        let err = parse_force_plot("{features: [").unwrap_err();
        assert!(matches!(err, ForcePlotError::Parse(_)));
    }
}
