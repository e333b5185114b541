//! Adapters from raw point shapes to [`Observation`]s.
//!
//! These sit outside the marker engine: they turn the JSON point lists and
//! table rows a datasource returns into the uniform observation list.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{MapError, MapResult};
use crate::observation::Observation;
use crate::style::format_number;

/// Round to `decimals` places, halves rounding towards positive infinity.
pub fn round_value(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor + 0.5).floor() / factor
}

/// Center of a decoded geohash cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

const GEOHASH_ALPHABET: &[u8] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Decode a base-32 geohash to the center of its cell.
pub fn decode_geohash(hash: &str) -> MapResult<GeoPoint> {
    if hash.is_empty() {
        return Err(MapError::invalid_input("empty geohash"));
    }

    let mut lat = (-90.0_f64, 90.0_f64);
    let mut lon = (-180.0_f64, 180.0_f64);
    let mut even_bit = true;

    for c in hash.chars() {
        let c = c.to_ascii_lowercase();
        let idx = GEOHASH_ALPHABET
            .iter()
            .position(|&b| b as char == c)
            .ok_or_else(|| {
                MapError::invalid_input(format!("invalid geohash character '{}' in '{}'", c, hash))
            })?;

        for shift in (0..5).rev() {
            let bit = (idx >> shift) & 1 == 1;
            let range = if even_bit { &mut lon } else { &mut lat };
            let mid = (range.0 + range.1) / 2.0;
            if bit {
                range.0 = mid;
            } else {
                range.1 = mid;
            }
            even_bit = !even_bit;
        }
    }

    Ok(GeoPoint {
        latitude: (lat.0 + lat.1) / 2.0,
        longitude: (lon.0 + lon.1) / 2.0,
    })
}

/// A point from a JSON location/value endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonPoint {
    pub key: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    /// Points without a value count once
    #[serde(default)]
    pub value: Option<f64>,
}

impl JsonPoint {
    pub fn into_observation(self) -> Observation {
        let value = self.value.unwrap_or(1.0);
        Observation {
            key: self.key.into(),
            location_name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            value: Some(value),
            value_rounded: Some(round_value(value, 0)),
            color_value: None,
        }
    }
}

/// How table rows carry their location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    #[default]
    Coordinates,
    Geohash,
}

/// Column mapping for table-shaped query results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQueryOptions {
    #[serde(default)]
    pub query_type: QueryType,

    #[serde(default = "default_geohash_field")]
    pub geohash_field: String,

    #[serde(default = "default_latitude_field")]
    pub latitude_field: String,

    #[serde(default = "default_longitude_field")]
    pub longitude_field: String,

    #[serde(default = "default_metric_field")]
    pub metric_field: String,

    #[serde(default)]
    pub label_field: Option<String>,

    /// Optional secondary metric driving marker color
    #[serde(default)]
    pub color_metric_field: Option<String>,
}

fn default_geohash_field() -> String {
    "geohash".to_string()
}
fn default_latitude_field() -> String {
    "latitude".to_string()
}
fn default_longitude_field() -> String {
    "longitude".to_string()
}
fn default_metric_field() -> String {
    "metric".to_string()
}

impl Default for TableQueryOptions {
    fn default() -> Self {
        Self {
            query_type: QueryType::default(),
            geohash_field: default_geohash_field(),
            latitude_field: default_latitude_field(),
            longitude_field: default_longitude_field(),
            metric_field: default_metric_field(),
            label_field: None,
            color_metric_field: None,
        }
    }
}

impl TableQueryOptions {
    /// Convert one table row into an observation.
    ///
    /// Rows without a label get `"n/a"`; coordinate rows are keyed by
    /// `"<lat>_<lon>"`, geohash rows by the hash itself.
    pub fn to_observation(
        &self,
        row: &Map<String, Value>,
        decimals: u32,
        color_decimals: u32,
    ) -> MapResult<Observation> {
        let (key, latitude, longitude) = match self.query_type {
            QueryType::Geohash => {
                let hash = row
                    .get(&self.geohash_field)
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        MapError::invalid_input(format!("row has no '{}' geohash", self.geohash_field))
                    })?;
                let point = decode_geohash(hash)?;
                (hash.to_string(), point.latitude, point.longitude)
            }
            QueryType::Coordinates => {
                let latitude = number_field(row, &self.latitude_field).ok_or_else(|| {
                    MapError::invalid_input(format!("row has no '{}' latitude", self.latitude_field))
                })?;
                let longitude = number_field(row, &self.longitude_field).ok_or_else(|| {
                    MapError::invalid_input(format!("row has no '{}' longitude", self.longitude_field))
                })?;
                let key = format!("{}_{}", format_number(latitude), format_number(longitude));
                (key, latitude, longitude)
            }
        };

        let location_name = self
            .label_field
            .as_ref()
            .and_then(|field| row.get(field))
            .and_then(label_text)
            .unwrap_or_else(|| "n/a".to_string());

        let value = number_field(row, &self.metric_field);
        let color_value = self
            .color_metric_field
            .as_ref()
            .and_then(|field| number_field(row, field))
            .map(|v| round_value(v, color_decimals));

        Ok(Observation {
            key: key.into(),
            location_name: Some(location_name),
            latitude: Some(latitude),
            longitude: Some(longitude),
            value,
            value_rounded: value.map(|v| round_value(v, decimals)),
            color_value,
        })
    }
}

/// Numeric cell, accepting numbers and numeric strings.
fn number_field(row: &Map<String, Value>, field: &str) -> Option<f64> {
    match row.get(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn label_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
