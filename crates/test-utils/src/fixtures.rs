//! Common test fixtures for worldmap marker tests.
//!
//! Three countries with fixed coordinates and a red/blue/green palette are
//! enough to exercise sizing, coloring and reconciliation.

use worldmap_common::{Color, Observation, PanelConfig, ThresholdConfig};

/// Country fixtures: key, display name, latitude, longitude.
pub mod countries {
    pub const SE: (&str, &str, f64, f64) = ("SE", "Sweden", 60.0, 18.0);
    pub const IE: (&str, &str, f64, f64) = ("IE", "Ireland", 53.0, 8.0);
    pub const US: (&str, &str, f64, f64) = ("US", "United States", 37.0, -95.0);

    /// Look up a fixture by country code.
    pub fn by_code(code: &str) -> Option<(&'static str, &'static str, f64, f64)> {
        match code {
            "SE" => Some(SE),
            "IE" => Some(IE),
            "US" => Some(US),
            _ => None,
        }
    }
}

/// Palette used across the tests: one color per bucket of `[2, 4]`.
pub fn red_blue_green() -> Vec<Color> {
    vec![Color::new("red"), Color::new("blue"), Color::new("green")]
}

/// A panel with the test palette, the given thresholds and otherwise
/// default options.
pub fn test_panel(thresholds: &[f64]) -> PanelConfig {
    PanelConfig {
        style: ThresholdConfig::new(thresholds.to_vec(), red_blue_green()),
        ..PanelConfig::default()
    }
}

/// Builds observation lists from country fixtures.
///
/// ```ignore
/// let data = DataBuilder::new()
///     .with_country_and_value("SE", Some(1.0))
///     .with_country_and_value("IE", Some(2.0))
///     .build();
/// ```
#[derive(Debug, Default, Clone)]
pub struct DataBuilder {
    data: Vec<Observation>,
}

impl DataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a country with the given primary value.
    ///
    /// Unknown codes become observations without a location.
    pub fn with_country_and_value(self, code: &str, value: Option<f64>) -> Self {
        self.with_country_and_values(code, value, None)
    }

    /// Add a country with a primary value and a secondary (color) metric.
    pub fn with_country_and_values(
        mut self,
        code: &str,
        value: Option<f64>,
        color_value: Option<f64>,
    ) -> Self {
        let observation = match countries::by_code(code) {
            Some((key, name, lat, lon)) => Observation::new(key).with_location(name, lat, lon),
            None => Observation::new(code),
        };
        self.data.push(
            observation
                .with_value(value)
                .with_color_value(color_value),
        );
        self
    }

    /// Add an arbitrary observation.
    pub fn with_observation(mut self, observation: Observation) -> Self {
        self.data.push(observation);
        self
    }

    pub fn build(self) -> Vec<Observation> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_uses_fixture_coordinates() {
        let data = DataBuilder::new()
            .with_country_and_value("SE", Some(1.0))
            .with_country_and_values("US", Some(3.0), Some(7.0))
            .build();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].coordinates(), Some((60.0, 18.0)));
        assert_eq!(data[0].value_rounded, Some(1.0));
        assert_eq!(data[1].display_name(), Some("United States"));
        assert_eq!(data[1].color_value, Some(7.0));
    }

    #[test]
    fn test_unknown_code_has_no_location() {
        let data = DataBuilder::new()
            .with_country_and_value("XX", Some(1.0))
            .build();
        assert!(data[0].display_name().is_none());
    }

    #[test]
    fn test_panel_palette_matches_thresholds() {
        let panel = test_panel(&[2.0, 4.0]);
        panel.validate().unwrap();
    }
}
