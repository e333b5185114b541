//! Common types shared by the worldmap marker engine and its services.

pub mod config;
pub mod error;
pub mod observation;
pub mod points;
pub mod style;

pub use config::{parse_display_bound, DisplayFilter, LabelOptions, MapView, PanelConfig, TileServer};
pub use error::{MapError, MapResult};
pub use observation::{Observation, ObservationKey};
pub use points::{decode_geohash, round_value, GeoPoint, JsonPoint, QueryType, TableQueryOptions};
pub use style::{Color, ThresholdConfig};
