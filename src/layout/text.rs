//! Label strings and the two number formats the plot uses: four significant digits
//! with trailing zeros trimmed (ticks, feature values) and two fixed decimals (the
//! output value). Both group thousands with commas.

use crate::ir::FeatureValue;

use super::types::PlacedFeature;

/// `"name = value"`, or just the name when the feature has no value. Numeric values,
/// including numeric strings, are formatted; other strings are shown as given.
pub fn label_text(feature: &PlacedFeature) -> String {
    match &feature.value {
        None => feature.name.clone(),
        Some(FeatureValue::Number(value)) => {
            format!("{} = {}", feature.name, format_significant(*value, 4))
        }
        Some(FeatureValue::Text(text)) => match numeric_text(text) {
            Some(value) => format!("{} = {}", feature.name, format_significant(value, 4)),
            None => format!("{} = {}", feature.name, text),
        },
    }
}

fn numeric_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    match trimmed {
        "" => Some(0.0),
        "Infinity" | "+Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ if trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E')) =>
        {
            trimmed.parse().ok()
        }
        _ => None,
    }
}

/// `precision` significant digits, trailing zeros trimmed, exponent form outside
/// `1e-6 ..= 10^precision`.
pub fn format_significant(value: f64, precision: usize) -> String {
    if let Some(special) = non_finite(value) {
        return special;
    }
    let precision = precision.max(1);
    let magnitude = value.abs();
    let body = if magnitude == 0.0 {
        "0".to_string()
    } else {
        let scientific = format!("{:.*e}", precision - 1, magnitude);
        let (mantissa, exponent) = scientific
            .split_once('e')
            .map(|(m, e)| (m.to_string(), e.parse::<i32>().unwrap_or(0)))
            .unwrap_or((scientific.clone(), 0));
        if exponent < -6 || exponent >= precision as i32 {
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{sign}{}", trim_fraction(&mantissa), exponent.abs())
        } else {
            let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
            trim_fraction(&format!("{magnitude:.decimals$}"))
        }
    };
    with_sign(value, group_thousands(&body))
}

/// Fixed decimals with thousands grouping.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    if let Some(special) = non_finite(value) {
        return special;
    }
    let body = format!("{:.decimals$}", value.abs());
    with_sign(value, group_thousands(&body))
}

fn non_finite(value: f64) -> Option<String> {
    if value.is_nan() {
        Some("NaN".to_string())
    } else if value.is_infinite() {
        Some(if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string())
    } else {
        None
    }
}

fn with_sign(value: f64, body: String) -> String {
    let is_zero = body.bytes().all(|b| matches!(b, b'0' | b'.' | b','));
    if value < 0.0 && !is_zero {
        format!("-{body}")
    } else {
        body
    }
}

fn trim_fraction(text: &str) -> String {
    if !text.contains('.') {
        return text.to_string();
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn group_thousands(body: &str) -> String {
    let split = body
        .find(|c: char| c == '.' || c == 'e')
        .unwrap_or(body.len());
    let (integer, rest) = body.split_at(split);
    if integer.len() <= 3 {
        return body.to_string();
    }
    let mut grouped = String::with_capacity(body.len() + integer.len() / 3);
    for (idx, ch) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push_str(rest);
    grouped
}
