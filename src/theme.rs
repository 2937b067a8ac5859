use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static RGB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgba?\(\s*([\d.]+)\s*,\s*([\d.]+)\s*,\s*([\d.]+)\s*(?:,\s*[\d.]+\s*)?\)$").unwrap()
});
static HSL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^hsla?\(\s*(-?[\d.]+)\s*,\s*([\d.]+)%\s*,\s*([\d.]+)%\s*(?:,\s*[\d.]+\s*)?\)$")
        .unwrap()
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub label_font_size: f64,
    pub title_font_size: f64,
    pub caption_font_size: f64,
    pub value_font_size: f64,
    pub axis_font_size: f64,
    pub text_color: String,
    pub background: String,
    pub join_line_color: String,
    pub outline_color: String,
    pub axis_color: String,
    pub axis_opacity: f64,
    pub tick_label_opacity: f64,
    pub title_opacity: f64,
    pub backing_opacity: f64,
}

impl Theme {
    /// Matches the classic browser force plot.
    pub fn classic() -> Self {
        Self {
            font_family: "\"Helvetica Neue\", Helvetica, Arial, sans-serif".to_string(),
            label_font_size: 12.0,
            title_font_size: 12.0,
            caption_font_size: 13.0,
            value_font_size: 16.0,
            axis_font_size: 12.0,
            text_color: "#000000".to_string(),
            background: "#FFFFFF".to_string(),
            join_line_color: "#F2F2F2".to_string(),
            outline_color: "#FFFFFF".to_string(),
            axis_color: "#000000".to_string(),
            axis_opacity: 0.4,
            tick_label_opacity: 0.5,
            title_opacity: 0.5,
            backing_opacity: 0.2,
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            text_color: "#1C2430".to_string(),
            axis_color: "#7A8AA6".to_string(),
            join_line_color: "#E3E8F0".to_string(),
            axis_opacity: 0.6,
            ..Self::classic()
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "classic" | "default" => Some(Self::classic()),
            "modern" => Some(Self::modern()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

/// An sRGB color with channels in `0..=255` (unclamped until formatted).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// HSL with hue in degrees and saturation/lightness as fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

const BRIGHTER: f64 = 1.0 / 0.7;

impl Rgb {
    pub fn to_hsl(self) -> Hsl {
        let r = self.r / 255.0;
        let g = self.g / 255.0;
        let b = self.b / 255.0;
        let min = r.min(g).min(b);
        let max = r.max(g).max(b);
        let l = (max + min) / 2.0;
        let d = max - min;
        if d == 0.0 {
            return Hsl { h: 0.0, s: 0.0, l };
        }
        let mut h = if r == max {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if g == max {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        h *= 60.0;
        let s = if l < 0.5 { d / (max + min) } else { d / (2.0 - max - min) };
        Hsl { h, s, l }
    }

    pub fn to_css(self) -> String {
        let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        format!(
            "rgb({}, {}, {})",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

impl Hsl {
    /// Scales lightness by `(1/0.7)^k`.
    pub fn brighter(self, k: f64) -> Self {
        Self {
            l: self.l * BRIGHTER.powf(k),
            ..self
        }
    }

    pub fn to_rgb(self) -> Rgb {
        let h = self.h.rem_euclid(360.0);
        let s = self.s;
        let l = self.l;
        let m2 = l + if l < 0.5 { l } else { 1.0 - l } * s;
        let m1 = 2.0 * l - m2;
        Rgb {
            r: hue_channel(if h >= 240.0 { h - 240.0 } else { h + 120.0 }, m1, m2),
            g: hue_channel(h, m1, m2),
            b: hue_channel(if h < 120.0 { h + 240.0 } else { h - 120.0 }, m1, m2),
        }
    }
}

fn hue_channel(h: f64, m1: f64, m2: f64) -> f64 {
    let v = if h < 60.0 {
        m1 + (m2 - m1) * h / 60.0
    } else if h < 180.0 {
        m2
    } else if h < 240.0 {
        m1 + (m2 - m1) * (240.0 - h) / 60.0
    } else {
        m1
    };
    v * 255.0
}

/// Parses `#rgb`, `#rrggbb`, `rgb(...)` and `hsl(...)` color strings.
pub fn parse_color(input: &str) -> Option<Rgb> {
    let s = input.trim();
    if let Some(hex) = s.strip_prefix('#') {
        // byte slicing below needs ASCII
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let (r, g, b) = match hex.len() {
            3 => (
                u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?,
                u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?,
                u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?,
            ),
            6 => (
                u8::from_str_radix(&hex[0..2], 16).ok()?,
                u8::from_str_radix(&hex[2..4], 16).ok()?,
                u8::from_str_radix(&hex[4..6], 16).ok()?,
            ),
            _ => return None,
        };
        return Some(Rgb {
            r: f64::from(r),
            g: f64::from(g),
            b: f64::from(b),
        });
    }
    let lower = s.to_ascii_lowercase();
    if let Some(caps) = RGB_RE.captures(&lower) {
        return Some(Rgb {
            r: caps[1].parse().ok()?,
            g: caps[2].parse().ok()?,
            b: caps[3].parse().ok()?,
        });
    }
    if let Some(caps) = HSL_RE.captures(&lower) {
        let h: f64 = caps[1].parse().ok()?;
        let s: f64 = caps[2].parse().ok()?;
        let l: f64 = caps[3].parse().ok()?;
        return Some(
            Hsl {
                h,
                s: s / 100.0,
                l: l / 100.0,
            }
            .to_rgb(),
        );
    }
    None
}
