//! Threshold and color configuration for marker styling.
//!
//! A [`ThresholdConfig`] pairs an ascending list of numeric breakpoints with
//! a palette holding one more color than there are breakpoints. Colors are
//! kept as the CSS strings the panel stores and handed to the map surface
//! verbatim; [`Color::to_rgba`] is available for surfaces that rasterize.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::{MapError, MapResult};

/// A CSS color as configured on the panel ("#ff0000", "rgba(245, 54, 54, 0.9)", "red").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub String);

impl Color {
    pub fn new(css: impl Into<String>) -> Self {
        Self(css.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to an RGBA tuple. Unparsable colors map to opaque black.
    pub fn to_rgba(&self) -> (u8, u8, u8, u8) {
        let s = self.0.trim();
        if s.starts_with('#') {
            parse_hex_color(s)
        } else if let Some(args) = functional_args(s) {
            parse_rgb_function(args)
        } else {
            named_color(s)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Color {
    fn from(s: &str) -> Self {
        Color(s.to_string())
    }
}

fn parse_hex_color(s: &str) -> (u8, u8, u8, u8) {
    let s = s.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            .unwrap_or(0)
    };

    match s.len() {
        3 => {
            let expand = |i: usize| {
                s.get(i..i + 1)
                    .and_then(|hex| u8::from_str_radix(&hex.repeat(2), 16).ok())
                    .unwrap_or(0)
            };
            (expand(0), expand(1), expand(2), 255)
        }
        6 => (channel(0..2), channel(2..4), channel(4..6), 255),
        8 => (channel(0..2), channel(2..4), channel(4..6), channel(6..8)),
        _ => (0, 0, 0, 255),
    }
}

/// Returns the argument list of `rgb(...)` / `rgba(...)`.
fn functional_args(s: &str) -> Option<&str> {
    let lower = s.to_ascii_lowercase();
    let open = if lower.starts_with("rgba(") {
        5
    } else if lower.starts_with("rgb(") {
        4
    } else {
        return None;
    };
    s.get(open..)?.strip_suffix(')')
}

fn parse_rgb_function(args: &str) -> (u8, u8, u8, u8) {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let channel = |i: usize| {
        parts
            .get(i)
            .and_then(|p| p.parse::<f64>().ok())
            .map(|v| v.clamp(0.0, 255.0).round() as u8)
            .unwrap_or(0)
    };
    let alpha = parts
        .get(3)
        .and_then(|p| p.parse::<f64>().ok())
        .map(|a| (a.clamp(0.0, 1.0) * 255.0).round() as u8)
        .unwrap_or(255);
    (channel(0), channel(1), channel(2), alpha)
}

fn named_color(name: &str) -> (u8, u8, u8, u8) {
    match name.to_lowercase().as_str() {
        "transparent" => (0, 0, 0, 0),
        "black" => (0, 0, 0, 255),
        "white" => (255, 255, 255, 255),
        "red" => (255, 0, 0, 255),
        "green" => (0, 128, 0, 255),
        "lime" => (0, 255, 0, 255),
        "blue" => (0, 0, 255, 255),
        "yellow" => (255, 255, 0, 255),
        "cyan" => (0, 255, 255, 255),
        "magenta" => (255, 0, 255, 255),
        "orange" => (255, 165, 0, 255),
        "purple" => (128, 0, 128, 255),
        "gray" | "grey" => (128, 128, 128, 255),
        _ => (0, 0, 0, 255),
    }
}

/// Ordered breakpoints and the palette they select from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Ascending breakpoints `t_0 < t_1 < ... < t_{n-1}`
    #[serde(default = "default_thresholds", deserialize_with = "deserialize_thresholds")]
    pub thresholds: Vec<f64>,

    /// Colors `c_0..c_n`; `c_i` covers `[t_{i-1}, t_i)`
    #[serde(default = "default_colors")]
    pub colors: Vec<Color>,
}

fn default_thresholds() -> Vec<f64> {
    vec![0.0, 10.0]
}

/// Default traffic-light palette for the default `0,10` thresholds.
pub fn default_colors() -> Vec<Color> {
    vec![
        Color::new("rgba(245, 54, 54, 0.9)"),
        Color::new("rgba(237, 129, 40, 0.89)"),
        Color::new("rgba(50, 172, 45, 0.97)"),
    ]
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            thresholds: default_thresholds(),
            colors: default_colors(),
        }
    }
}

impl ThresholdConfig {
    pub fn new(thresholds: Vec<f64>, colors: Vec<Color>) -> Self {
        Self { thresholds, colors }
    }

    /// Check ordering and that the palette covers every bucket.
    pub fn validate(&self) -> MapResult<()> {
        if let Some(bad) = self.thresholds.iter().find(|t| !t.is_finite()) {
            return Err(MapError::invalid_input(format!(
                "threshold {} is not a finite number",
                bad
            )));
        }
        for pair in self.thresholds.windows(2) {
            if pair[1] <= pair[0] {
                return Err(MapError::UnorderedThresholds(format!(
                    "{} is not greater than {}",
                    format_number(pair[1]),
                    format_number(pair[0])
                )));
            }
        }

        let required = self.thresholds.len() + 1;
        if self.colors.len() < required {
            return Err(MapError::PaletteTooShort {
                thresholds: self.thresholds.len(),
                colors: self.colors.len(),
                required,
            });
        }
        Ok(())
    }

    /// Parse the panel's comma-separated threshold string ("50,80").
    pub fn parse_thresholds(text: &str) -> MapResult<Vec<f64>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        text.split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<f64>()
                    .map_err(|_| MapError::ParseError(format!("invalid threshold '{}'", part)))
            })
            .collect()
    }
}

/// Accept either `[2, 4]` or the panel string form `"2,4"`.
fn deserialize_thresholds<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<f64>),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::List(values) => Ok(values),
        Raw::Text(text) => {
            ThresholdConfig::parse_thresholds(&text).map_err(serde::de::Error::custom)
        }
    }
}

/// Render a number the way the panel prints values: integral values without
/// a fractional part, everything else in shortest round-trip form.
///
/// Magnitudes of at least 1e21 or below 1e-6 switch to exponent form with
/// an explicit sign (`1e+21`, `1.5e-7`), and infinities print as `Infinity`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // also folds -0
        return "0".to_string();
    }
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let text = format!("{:e}", value);
        return match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => text,
        };
    }
    format!("{}", value)
}
