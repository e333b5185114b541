//! The world map: one surface, its markers and its legend.

use tracing::{debug, info};
use worldmap_common::{MapResult, MapView, Observation, PanelConfig};

use crate::legend::{build_legend, LegendRow};
use crate::markers::{MarkerSet, RefreshSummary};
use crate::surface::MapSurface;

/// Worldmap engine bound to a map surface.
///
/// All state (the marker collection and the legend singleton) is owned
/// here; the host serializes calls.
pub struct WorldMap<S: MapSurface> {
    surface: S,
    markers: MarkerSet<S::MarkerHandle>,
    legend: Option<S::LegendHandle>,
    legend_rows: Vec<LegendRow>,
}

impl<S: MapSurface> WorldMap<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            markers: MarkerSet::new(),
            legend: None,
            legend_rows: Vec::new(),
        }
    }

    /// Apply the configured initial view to the surface.
    pub fn create_map(&mut self, config: &PanelConfig) -> MapResult<()> {
        config.validate_view()?;
        let view = config.map_view();
        debug!(
            lat = view.center_latitude,
            lon = view.center_longitude,
            zoom = view.zoom,
            tiles = view.tile_server.name(),
            "Configuring map view"
        );
        self.surface.configure_view(&view);
        Ok(())
    }

    /// Redraw the markers for a new observation list.
    pub fn refresh(
        &mut self,
        observations: &[Observation],
        config: &PanelConfig,
    ) -> MapResult<RefreshSummary> {
        self.markers.reconcile(&mut self.surface, observations, config)
    }

    /// Create the legend, replacing any existing one.
    ///
    /// An empty threshold list produces no rows and no legend.
    pub fn create_legend(&mut self, config: &PanelConfig) {
        self.remove_legend();

        let rows = build_legend(&config.style.thresholds, &config.style.colors);
        if rows.is_empty() {
            debug!("No thresholds configured, legend not created");
            return;
        }
        self.legend = Some(self.surface.create_legend_control(&rows));
        self.legend_rows = rows;
    }

    /// Show or hide the legend to match `show_legend`, rebuilding it when
    /// the thresholds or colors changed.
    pub fn sync_legend(&mut self, config: &PanelConfig) {
        if !config.show_legend {
            self.remove_legend();
            return;
        }
        let rows = build_legend(&config.style.thresholds, &config.style.colors);
        if self.legend.is_none() || rows != self.legend_rows {
            self.create_legend(config);
        }
    }

    pub fn remove_legend(&mut self) {
        if let Some(handle) = self.legend.take() {
            self.surface.remove_legend_control(handle);
        }
        self.legend_rows.clear();
    }

    pub fn clear_markers(&mut self) {
        self.markers.clear(&mut self.surface);
    }

    pub fn pan_to_map_center(&mut self, config: &PanelConfig) -> MapResult<()> {
        config.validate_view()?;
        self.surface
            .pan_to(config.map_center_latitude, config.map_center_longitude);
        Ok(())
    }

    /// Zoom the surface, capped at the highest available tile zoom.
    pub fn set_zoom(&mut self, zoom: u8) {
        self.surface.set_zoom(zoom.min(MapView::MAX_ZOOM));
    }

    pub fn resize(&mut self) {
        self.surface.invalidate_size();
    }

    /// Tear down markers, legend and the surface.
    pub fn remove(mut self) -> S {
        self.clear_markers();
        self.remove_legend();
        self.surface.teardown();
        info!("World map removed");
        self.surface
    }

    pub fn markers(&self) -> &MarkerSet<S::MarkerHandle> {
        &self.markers
    }

    pub fn legend(&self) -> Option<&S::LegendHandle> {
        self.legend.as_ref()
    }

    pub fn legend_rows(&self) -> &[LegendRow] {
        &self.legend_rows
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access for surface-specific operations. Markers and the
    /// legend must still be changed through the engine.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
