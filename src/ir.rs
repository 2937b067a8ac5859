use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Link {
    #[default]
    Identity,
    Logit,
}

impl Link {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "identity" => Some(Self::Identity),
            "logit" => Some(Self::Logit),
            _ => None,
        }
    }

    /// Maps a cumulative contribution back into output space.
    pub fn invert(self, base_value: f64, x: f64) -> f64 {
        match self {
            Self::Identity => base_value + x,
            // logistic is the inverse of logit
            Self::Logit => 1.0 / (1.0 + (-(base_value + x)).exp()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    pub key: String,
    pub name: String,
    pub value: Option<FeatureValue>,
    pub effect: f64,
}

impl Feature {
    pub fn new(key: impl Into<String>, effect: f64) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            key,
            value: None,
            effect,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_value(mut self, value: FeatureValue) -> Self {
        self.value = Some(value);
        self
    }
}

/// Where the two plot colors come from before resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSource {
    Palette(String),
    Colors(Vec<String>),
    /// Anything that is neither a palette name nor a color list.
    Invalid(String),
}

impl Default for ColorSource {
    fn default() -> Self {
        Self::Palette(crate::palette::DEFAULT_PALETTE.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct ForcePlot {
    /// Features in input order.
    pub features: Vec<Feature>,
    pub base_value: f64,
    pub link: Link,
    pub color_source: ColorSource,
    pub label_margin: f64,
    pub out_names: Vec<String>,
    pub base_value_title: String,
}

impl Default for ForcePlot {
    fn default() -> Self {
        Self {
            features: Vec::new(),
            base_value: 0.0,
            link: Link::Identity,
            color_source: ColorSource::default(),
            label_margin: 20.0,
            out_names: vec!["f(x)".to_string()],
            base_value_title: "base value".to_string(),
        }
    }
}

impl ForcePlot {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            ..Default::default()
        }
    }

    pub fn out_name(&self) -> &str {
        self.out_names.first().map(String::as_str).unwrap_or("")
    }

    pub fn invert_link(&self, x: f64) -> f64 {
        self.link.invert(self.base_value, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_link_adds_base_value() {
        assert_eq!(Link::Identity.invert(0.25, 1.5), 1.75);
    }

    #[test]
    fn logit_link_is_logistic() {
        assert_eq!(Link::Logit.invert(0.0, 0.0), 0.5);
        let high = Link::Logit.invert(1.0, 3.0);
        assert!((high - 1.0 / (1.0 + (-4.0f64).exp())).abs() < 1e-12);
        assert!(Link::Logit.invert(0.0, -50.0) < 1e-20);
    }

    #[test]
    fn link_names() {
        assert_eq!(Link::from_name("logit"), Some(Link::Logit));
        assert_eq!(Link::from_name(" identity "), Some(Link::Identity));
        assert_eq!(Link::from_name("probit"), None);
    }

    #[test]
    fn out_name_defaults() {
        let plot = ForcePlot::default();
        assert_eq!(plot.out_name(), "f(x)");
        let empty = ForcePlot {
            out_names: Vec::new(),
            ..Default::default()
        };
        assert_eq!(empty.out_name(), "");
    }
}
