//! Observations: the uniform point list the marker engine consumes.

use serde::{Deserialize, Serialize};

/// Stable identity of an observation across refreshes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservationKey(pub String);

impl ObservationKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObservationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ObservationKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ObservationKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One geolocated metric value.
///
/// Built fresh by a formatter on every refresh. Keys must be unique within
/// one list; they are the only thing used to match an observation to an
/// already rendered marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub key: ObservationKey,

    /// Display label; observations without one are not drawn
    #[serde(default)]
    pub location_name: Option<String>,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    /// Primary metric, drives size and (by default) color
    #[serde(default)]
    pub value: Option<f64>,

    /// Primary metric rounded for display
    #[serde(default)]
    pub value_rounded: Option<f64>,

    /// Secondary metric that drives color instead of `value`
    #[serde(default)]
    pub color_value: Option<f64>,
}

impl Observation {
    /// An observation with only its key set.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: ObservationKey::new(key),
            location_name: None,
            latitude: None,
            longitude: None,
            value: None,
            value_rounded: None,
            color_value: None,
        }
    }

    pub fn with_location(mut self, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        self.location_name = Some(name.into());
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Sets both the raw and the display value.
    pub fn with_value(mut self, value: Option<f64>) -> Self {
        self.value = value;
        self.value_rounded = value;
        self
    }

    pub fn with_value_rounded(mut self, value_rounded: Option<f64>) -> Self {
        self.value_rounded = value_rounded;
        self
    }

    pub fn with_color_value(mut self, color_value: Option<f64>) -> Self {
        self.color_value = color_value;
        self
    }

    /// The location label, if present and non-empty.
    pub fn display_name(&self) -> Option<&str> {
        self.location_name.as_deref().filter(|name| !name.is_empty())
    }

    /// Latitude/longitude pair when both are present and finite.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }

    /// The metric that selects the color bucket: the secondary metric when
    /// present, the primary value otherwise.
    pub fn color_metric(&self) -> Option<f64> {
        self.color_value.or(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_metric_prefers_secondary_value() {
        let obs = Observation::new("SE")
            .with_value(Some(1.0))
            .with_color_value(Some(99.0));
        assert_eq!(obs.color_metric(), Some(99.0));

        let obs = Observation::new("SE").with_value(Some(1.0));
        assert_eq!(obs.color_metric(), Some(1.0));

        // zero is a present secondary value
        let obs = Observation::new("SE")
            .with_value(Some(5.0))
            .with_color_value(Some(0.0));
        assert_eq!(obs.color_metric(), Some(0.0));
    }

    #[test]
    fn test_display_name_and_coordinates() {
        let obs = Observation::new("SE").with_location("Sweden", 60.0, 18.0);
        assert_eq!(obs.display_name(), Some("Sweden"));
        assert_eq!(obs.coordinates(), Some((60.0, 18.0)));

        let mut unnamed = obs.clone();
        unnamed.location_name = Some(String::new());
        assert_eq!(unnamed.display_name(), None);

        let mut no_lat = obs;
        no_lat.latitude = None;
        assert_eq!(no_lat.coordinates(), None);
    }

    #[test]
    fn test_deserialize_sparse_observation() {
        let obs: Observation = serde_json::from_str(r#"{"key": "US", "value": null}"#).unwrap();
        assert_eq!(obs.key.as_str(), "US");
        assert!(obs.value.is_none());
        assert!(obs.location_name.is_none());
    }
}
