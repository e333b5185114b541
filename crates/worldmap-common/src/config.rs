//! Panel configuration snapshot.
//!
//! The host panel's options are loaded into a [`PanelConfig`] once per
//! refresh. Every option is enumerated here with its default, and the
//! snapshot is validated before any marker is touched.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::error::{MapError, MapResult};
use crate::style::ThresholdConfig;

/// Full, read-only configuration handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Thresholds and palette
    #[serde(flatten)]
    pub style: ThresholdConfig,

    /// Radius of the marker for the lowest value
    #[serde(default = "default_circle_min_size")]
    pub circle_min_size: f64,

    /// Radius of the marker for the highest value
    #[serde(default = "default_circle_max_size")]
    pub circle_max_size: f64,

    /// Apply a natural log to values before sizing
    #[serde(default, alias = "is_log_scale")]
    pub log_scale: bool,

    #[serde(default)]
    pub hide_empty: bool,

    #[serde(default)]
    pub hide_zero: bool,

    /// Values below this bound are hidden
    #[serde(default, deserialize_with = "deserialize_bound")]
    pub min_value: Option<f64>,

    /// Values above this bound are hidden
    #[serde(default, deserialize_with = "deserialize_bound")]
    pub max_value: Option<f64>,

    #[serde(default)]
    pub unit_singular: Option<String>,

    #[serde(default)]
    pub unit_plural: Option<String>,

    #[serde(default)]
    pub hide_location_name: bool,

    /// Label of the secondary (color) metric in popups
    #[serde(default)]
    pub color_label: Option<String>,

    #[serde(default)]
    pub color_unit: Option<String>,

    /// Keep popups open until closed instead of following the pointer
    #[serde(default)]
    pub sticky_labels: bool,

    /// Decimals used when rounding values for display
    #[serde(default)]
    pub decimals: u32,

    #[serde(default)]
    pub color_decimals: u32,

    #[serde(default = "default_true")]
    pub show_legend: bool,

    #[serde(default)]
    pub map_center_latitude: f64,

    #[serde(default)]
    pub map_center_longitude: f64,

    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: u8,

    #[serde(default)]
    pub mouse_wheel_zoom: bool,

    #[serde(default)]
    pub tile_server: TileServer,
}

fn default_circle_min_size() -> f64 {
    2.0
}
fn default_circle_max_size() -> f64 {
    30.0
}
fn default_initial_zoom() -> u8 {
    1
}
fn default_true() -> bool {
    true
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            style: ThresholdConfig::default(),
            circle_min_size: default_circle_min_size(),
            circle_max_size: default_circle_max_size(),
            log_scale: false,
            hide_empty: false,
            hide_zero: false,
            min_value: None,
            max_value: None,
            unit_singular: None,
            unit_plural: None,
            hide_location_name: false,
            color_label: None,
            color_unit: None,
            sticky_labels: false,
            decimals: 0,
            color_decimals: 0,
            show_legend: true,
            map_center_latitude: 0.0,
            map_center_longitude: 0.0,
            initial_zoom: default_initial_zoom(),
            mouse_wheel_zoom: false,
            tile_server: TileServer::default(),
        }
    }
}

impl PanelConfig {
    /// Load a configuration file; `.yaml`/`.yml` are read as YAML, anything
    /// else as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> MapResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    pub fn from_json(json: &str) -> MapResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> MapResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Validate marker and view settings.
    pub fn validate(&self) -> MapResult<()> {
        self.validate_markers()?;
        self.validate_view()
    }

    /// Validate thresholds, palette and size bounds.
    ///
    /// Only these settings affect marker refreshes.
    pub fn validate_markers(&self) -> MapResult<()> {
        self.style.validate()?;

        let (min, max) = (self.circle_min_size, self.circle_max_size);
        if !min.is_finite() || !max.is_finite() || min < 0.0 || max < 0.0 {
            return Err(MapError::invalid_input(format!(
                "circle sizes must be finite and non-negative (min {}, max {})",
                min, max
            )));
        }
        if min > max {
            return Err(MapError::invalid_input(format!(
                "circle min size {} exceeds max size {}",
                min, max
            )));
        }
        Ok(())
    }

    /// Validate the initial map view.
    pub fn validate_view(&self) -> MapResult<()> {
        if !(-90.0..=90.0).contains(&self.map_center_latitude) {
            return Err(MapError::invalid_input(format!(
                "map center latitude {} is outside [-90, 90]",
                self.map_center_latitude
            )));
        }
        Ok(())
    }

    pub fn display_filter(&self) -> DisplayFilter {
        DisplayFilter {
            hide_empty: self.hide_empty,
            hide_zero: self.hide_zero,
            min_value: self.min_value.filter(|v| !v.is_nan()),
            max_value: self.max_value.filter(|v| !v.is_nan()),
        }
    }

    pub fn label_options(&self) -> LabelOptions {
        LabelOptions {
            unit_singular: self.unit_singular.clone(),
            unit_plural: self.unit_plural.clone(),
            hide_location_name: self.hide_location_name,
            color_label: self.color_label.clone(),
            color_unit: self.color_unit.clone(),
        }
    }

    pub fn map_view(&self) -> MapView {
        MapView {
            center_latitude: self.map_center_latitude,
            center_longitude: self.map_center_longitude,
            zoom: self.initial_zoom,
            mouse_wheel_zoom: self.mouse_wheel_zoom,
            tile_server: self.tile_server,
        }
    }
}

/// Which observations survive before sizing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DisplayFilter {
    pub hide_empty: bool,
    pub hide_zero: bool,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

/// Options feeding the popup label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelOptions {
    pub unit_singular: Option<String>,
    pub unit_plural: Option<String>,
    pub hide_location_name: bool,
    pub color_label: Option<String>,
    pub color_unit: Option<String>,
}

/// Initial view of the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub zoom: u8,
    pub mouse_wheel_zoom: bool,
    pub tile_server: TileServer,
}

impl MapView {
    /// Highest zoom level the tile servers provide.
    pub const MAX_ZOOM: u8 = 18;
}

/// Built-in basemap catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileServer {
    #[default]
    #[serde(rename = "CartoDB Positron")]
    CartoDbPositron,

    #[serde(rename = "CartoDB Dark")]
    CartoDbDark,
}

const CARTO_ATTRIBUTION: &str = "&copy; <a href=\"http://www.openstreetmap.org/copyright\">OpenStreetMap</a> \
&copy; <a href=\"http://cartodb.com/attributions\">CartoDB</a>";

impl TileServer {
    pub fn name(&self) -> &'static str {
        match self {
            TileServer::CartoDbPositron => "CartoDB Positron",
            TileServer::CartoDbDark => "CartoDB Dark",
        }
    }

    pub fn url_template(&self) -> &'static str {
        match self {
            TileServer::CartoDbPositron => {
                "https://cartodb-basemaps-{s}.global.ssl.fastly.net/light_all/{z}/{x}/{y}.png"
            }
            TileServer::CartoDbDark => {
                "https://cartodb-basemaps-{s}.global.ssl.fastly.net/dark_all/{z}/{x}/{y}.png"
            }
        }
    }

    pub fn attribution(&self) -> &'static str {
        CARTO_ATTRIBUTION
    }

    pub fn subdomains(&self) -> &'static str {
        "abcd"
    }
}

/// Parse a display bound as typed into the panel or a dashboard variable.
///
/// Empty, `NaN` and unparsable text mean "no bound". A number may be
/// followed by any run of `k` (thousand) and `m` (million) multipliers,
/// case-insensitive: `"1k"` is 1000, `"1Km"` is 1e9.
pub fn parse_display_bound(text: &str) -> Option<f64> {
    let text = text.trim();
    let digits_end = text
        .trim_end_matches(|c: char| matches!(c, 'k' | 'K' | 'm' | 'M'))
        .len();
    let (number, suffix) = text.split_at(digits_end);

    let base: f64 = number.trim().parse().ok()?;
    if base.is_nan() {
        return None;
    }

    let factor = suffix.chars().fold(1.0, |acc, c| match c {
        'k' | 'K' => acc * 1_000.0,
        _ => acc * 1_000_000.0,
    });
    Some(base * factor)
}

/// Accept a number, a shorthand string, an empty string or null.
fn deserialize_bound<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) if !n.is_nan() => Some(n),
        Some(Raw::Number(_)) | None => None,
        Some(Raw::Text(text)) => parse_display_bound(&text),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PanelConfig::default();
        config.validate().unwrap();
        assert_eq!(config.circle_min_size, 2.0);
        assert_eq!(config.circle_max_size, 30.0);
        assert_eq!(config.style.thresholds, vec![0.0, 10.0]);
        assert_eq!(config.style.colors.len(), 3);
    }

    #[test]
    fn test_parse_display_bound() {
        assert_eq!(parse_display_bound("1000"), Some(1000.0));
        assert_eq!(parse_display_bound("1k"), Some(1000.0));
        assert_eq!(parse_display_bound("1K"), Some(1000.0));
        assert_eq!(parse_display_bound("1m"), Some(1_000_000.0));
        assert_eq!(parse_display_bound("1Km"), Some(1_000_000_000.0));
        assert_eq!(parse_display_bound(" 2.5k "), Some(2500.0));
        assert_eq!(parse_display_bound(""), None);
        assert_eq!(parse_display_bound("NaN"), None);
        assert_eq!(parse_display_bound("Something"), None);
    }

    #[test]
    fn test_min_size_above_max_is_invalid() {
        let config = PanelConfig {
            circle_min_size: 20.0,
            circle_max_size: 10.0,
            ..PanelConfig::default()
        };
        assert!(config.validate().unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_bad_center_only_fails_view_validation() {
        let config = PanelConfig {
            map_center_latitude: 95.0,
            ..PanelConfig::default()
        };
        config.validate_markers().unwrap();
        assert!(config.validate_view().unwrap_err().is_invalid_input());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tile_server_catalog() {
        let dark = TileServer::CartoDbDark;
        assert!(dark.url_template().contains("dark_all"));
        assert_eq!(dark.subdomains(), "abcd");
        assert_eq!(serde_json::to_string(&dark).unwrap(), "\"CartoDB Dark\"");
    }
}
