//! Loading observation lists from data files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use worldmap_common::{JsonPoint, Observation, PanelConfig, QueryType, TableQueryOptions};

/// Shape of the data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// `[{key, name, latitude, longitude, value}]`
    Points,
    /// Observations as the engine consumes them
    Observations,
    /// Table rows with latitude/longitude columns
    Table,
    /// Table rows with a geohash column
    GeohashTable,
}

/// Read one data file into an observation list.
pub fn load_observations(
    path: &Path,
    format: InputFormat,
    config: &PanelConfig,
) -> Result<Vec<Observation>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file {}", path.display()))?;

    let observations = match format {
        InputFormat::Points => {
            let points: Vec<JsonPoint> = serde_json::from_str(&text)
                .with_context(|| format!("Invalid point list in {}", path.display()))?;
            points.into_iter().map(JsonPoint::into_observation).collect()
        }
        InputFormat::Observations => serde_json::from_str(&text)
            .with_context(|| format!("Invalid observation list in {}", path.display()))?,
        InputFormat::Table | InputFormat::GeohashTable => {
            let rows: Vec<Map<String, Value>> = serde_json::from_str(&text)
                .with_context(|| format!("Invalid table rows in {}", path.display()))?;
            let options = TableQueryOptions {
                query_type: if format == InputFormat::GeohashTable {
                    QueryType::Geohash
                } else {
                    QueryType::Coordinates
                },
                label_field: Some("name".to_string()),
                ..TableQueryOptions::default()
            };
            table_observations(&rows, &options, config)
        }
    };

    debug!(file = %path.display(), count = observations.len(), "Loaded observations");
    Ok(observations)
}

/// Convert table rows, skipping rows that cannot be located.
fn table_observations(
    rows: &[Map<String, Value>],
    options: &TableQueryOptions,
    config: &PanelConfig,
) -> Vec<Observation> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| {
            match options.to_observation(row, config.decimals, config.color_decimals) {
                Ok(observation) => Some(observation),
                Err(e) => {
                    warn!(row = index, error = %e, "Skipping table row");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_json(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_points_default_value_to_one() {
        let file = temp_json(r#"[{"key": "SE", "name": "Sweden", "latitude": 60, "longitude": 18}]"#);
        let data =
            load_observations(file.path(), InputFormat::Points, &PanelConfig::default()).unwrap();
        assert_eq!(data[0].value, Some(1.0));
        assert_eq!(data[0].display_name(), Some("Sweden"));
    }

    #[test]
    fn test_table_skips_rows_without_coordinates() {
        let file = temp_json(
            r#"[
                {"latitude": 60, "longitude": 18, "metric": 3.4, "name": "Stockholm"},
                {"metric": 1}
            ]"#,
        );
        let data =
            load_observations(file.path(), InputFormat::Table, &PanelConfig::default()).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].key.as_str(), "60_18");
        assert_eq!(data[0].value_rounded, Some(3.0));
    }

    #[test]
    fn test_geohash_table() {
        let file = temp_json(r#"[{"geohash": "u6sc", "metric": 2}]"#);
        let data = load_observations(
            file.path(),
            InputFormat::GeohashTable,
            &PanelConfig::default(),
        )
        .unwrap();
        assert_eq!(data[0].key.as_str(), "u6sc");
        assert_eq!(data[0].display_name(), Some("n/a"));
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let file = temp_json("not json");
        assert!(load_observations(file.path(), InputFormat::Points, &PanelConfig::default())
            .is_err());
    }
}
