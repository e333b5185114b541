//! A map surface that records draw commands instead of drawing.
//!
//! Used by the render CLI to emit a declarative plan and by tests to
//! observe exactly which calls the engine made.

use std::collections::BTreeMap;

use serde::Serialize;
use worldmap_common::{MapError, MapResult, MapView};

use crate::legend::LegendRow;
use crate::surface::{MapSurface, MarkerSpec, MarkerUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MarkerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LegendId(pub u64);

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    ConfigureView { view: MapView },
    PlaceMarker { id: MarkerId, marker: MarkerSpec },
    UpdateMarker { id: MarkerId, update: MarkerUpdate },
    RemoveAllMarkers { count: usize },
    CreateLegend { id: LegendId, rows: Vec<LegendRow> },
    RemoveLegend { id: LegendId },
    PanTo { latitude: f64, longitude: f64 },
    SetZoom { zoom: u8 },
    InvalidateSize,
    Teardown,
}

/// Recording surface.
#[derive(Debug, Default)]
pub struct RenderPlan {
    commands: Vec<DrawCommand>,
    live: BTreeMap<MarkerId, MarkerSpec>,
    legend: Option<LegendId>,
    next_id: u64,
}

impl RenderPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving live state intact.
    pub fn drain_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Markers currently on the surface, in placement order.
    pub fn live_markers(&self) -> impl Iterator<Item = (&MarkerId, &MarkerSpec)> {
        self.live.iter()
    }

    pub fn live_marker(&self, id: MarkerId) -> Option<&MarkerSpec> {
        self.live.get(&id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn legend(&self) -> Option<LegendId> {
        self.legend
    }

    pub fn placed_count(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::PlaceMarker { .. }))
    }

    pub fn updated_count(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::UpdateMarker { .. }))
    }

    pub fn clear_count(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::RemoveAllMarkers { .. }))
    }

    fn count(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| predicate(*c)).count()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MapSurface for RenderPlan {
    type MarkerHandle = MarkerId;
    type LegendHandle = LegendId;

    fn place_marker(&mut self, marker: &MarkerSpec) -> MapResult<MarkerId> {
        if !marker.latitude.is_finite() || !marker.longitude.is_finite() {
            return Err(MapError::invalid_input(format!(
                "marker {} has non-finite coordinates",
                marker.key
            )));
        }
        let id = MarkerId(self.next_id());
        self.live.insert(id, marker.clone());
        self.commands.push(DrawCommand::PlaceMarker {
            id,
            marker: marker.clone(),
        });
        Ok(id)
    }

    fn update_marker(&mut self, handle: &MarkerId, update: &MarkerUpdate) -> MapResult<()> {
        let Some(live) = self.live.get_mut(handle) else {
            return Err(MapError::invalid_input(format!(
                "marker {} is not on the surface",
                handle.0
            )));
        };
        live.style = update.style.clone();
        live.popup = update.popup.clone();
        self.commands.push(DrawCommand::UpdateMarker {
            id: *handle,
            update: update.clone(),
        });
        Ok(())
    }

    fn remove_all_markers(&mut self) {
        let count = self.live.len();
        self.live.clear();
        self.commands.push(DrawCommand::RemoveAllMarkers { count });
    }

    fn create_legend_control(&mut self, rows: &[LegendRow]) -> LegendId {
        let id = LegendId(self.next_id());
        self.legend = Some(id);
        self.commands.push(DrawCommand::CreateLegend {
            id,
            rows: rows.to_vec(),
        });
        id
    }

    fn remove_legend_control(&mut self, handle: LegendId) {
        if self.legend == Some(handle) {
            self.legend = None;
        }
        self.commands.push(DrawCommand::RemoveLegend { id: handle });
    }

    fn configure_view(&mut self, view: &MapView) {
        self.commands.push(DrawCommand::ConfigureView { view: *view });
    }

    fn pan_to(&mut self, latitude: f64, longitude: f64) {
        self.commands.push(DrawCommand::PanTo {
            latitude,
            longitude,
        });
    }

    fn set_zoom(&mut self, zoom: u8) {
        self.commands.push(DrawCommand::SetZoom { zoom });
    }

    fn invalidate_size(&mut self) {
        self.commands.push(DrawCommand::InvalidateSize);
    }

    fn teardown(&mut self) {
        self.commands.push(DrawCommand::Teardown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::popup::{PopupBehavior, PopupSpec};
    use crate::surface::MarkerStyle;
    use worldmap_common::Color;

    fn spec(key: &str) -> MarkerSpec {
        MarkerSpec {
            key: key.into(),
            latitude: 1.0,
            longitude: 2.0,
            style: MarkerStyle::new(5.0, Color::new("red")),
            popup: PopupSpec::new("x".to_string(), PopupBehavior::Hover),
        }
    }

    #[test]
    fn test_place_and_update_track_live_state() {
        let mut plan = RenderPlan::new();
        let id = plan.place_marker(&spec("a")).unwrap();

        let update = MarkerUpdate {
            style: MarkerStyle::new(9.0, Color::new("blue")),
            popup: PopupSpec::new("y".to_string(), PopupBehavior::Sticky),
        };
        plan.update_marker(&id, &update).unwrap();

        let live = plan.live_marker(id).unwrap();
        assert_eq!(live.style.radius, 9.0);
        assert_eq!(live.popup.label, "y");
        assert_eq!(plan.placed_count(), 1);
        assert_eq!(plan.updated_count(), 1);
    }

    #[test]
    fn test_update_unknown_handle_fails() {
        let mut plan = RenderPlan::new();
        let update = MarkerUpdate {
            style: MarkerStyle::new(1.0, Color::new("red")),
            popup: PopupSpec::new(String::new(), PopupBehavior::Hover),
        };
        assert!(plan.update_marker(&MarkerId(42), &update).is_err());
    }

    #[test]
    fn test_commands_serialize_with_op_tag() {
        let mut plan = RenderPlan::new();
        plan.set_zoom(3);
        plan.remove_all_markers();
        let json = serde_json::to_value(plan.commands()).unwrap();
        assert_eq!(json[0]["op"], "set_zoom");
        assert_eq!(json[0]["zoom"], 3);
        assert_eq!(json[1]["op"], "remove_all_markers");
        assert_eq!(json[1]["count"], 0);
    }
}
