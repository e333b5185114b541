//! The rendering contract between the engine and a map surface.

use serde::Serialize;
use worldmap_common::{Color, MapResult, MapView, ObservationKey};

use crate::legend::LegendRow;
use crate::popup::PopupSpec;

/// Fill opacity applied to every marker.
pub const MARKER_FILL_OPACITY: f64 = 0.5;

/// Visual style of one circle marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub radius: f64,
    pub color: Color,
    pub fill_color: Color,
    pub fill_opacity: f64,
}

impl MarkerStyle {
    /// Stroke and fill share the bucket color.
    pub fn new(radius: f64, color: Color) -> Self {
        Self {
            radius,
            fill_color: color.clone(),
            color,
            fill_opacity: MARKER_FILL_OPACITY,
        }
    }
}

/// A marker to be placed on the surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub key: ObservationKey,
    pub latitude: f64,
    pub longitude: f64,
    pub style: MarkerStyle,
    pub popup: PopupSpec,
}

/// New radius, color and popup for an already placed marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerUpdate {
    pub style: MarkerStyle,
    pub popup: PopupSpec,
}

/// Map surface the engine draws on.
///
/// The surface owns projection, tiles and the actual marker objects; the
/// engine only holds the opaque handles it hands back. Implementations
/// are injected into [`crate::WorldMap`].
pub trait MapSurface {
    /// Handle to a placed marker.
    type MarkerHandle;
    /// Handle to a legend control.
    type LegendHandle;

    /// Place a circle marker with its popup bound.
    fn place_marker(&mut self, marker: &MarkerSpec) -> MapResult<Self::MarkerHandle>;

    /// Mutate an existing marker in place.
    fn update_marker(&mut self, handle: &Self::MarkerHandle, update: &MarkerUpdate)
        -> MapResult<()>;

    /// Remove every marker the engine has placed.
    fn remove_all_markers(&mut self);

    /// Add a legend control showing `rows`.
    fn create_legend_control(&mut self, rows: &[LegendRow]) -> Self::LegendHandle;

    fn remove_legend_control(&mut self, handle: Self::LegendHandle);

    /// Apply the initial view (center, zoom, basemap).
    fn configure_view(&mut self, _view: &MapView) {}

    fn pan_to(&mut self, _latitude: f64, _longitude: f64) {}

    fn set_zoom(&mut self, _zoom: u8) {}

    /// The container was resized; recompute the viewport.
    fn invalidate_size(&mut self) {}

    /// Release the surface. No calls follow.
    fn teardown(&mut self) {}
}
