//! Marker reconciliation.
//!
//! Each refresh either updates the rendered markers in place or throws them
//! all away and creates new ones. The decision is made on the multiset of
//! observation keys only: if the filtered observations carry exactly the
//! keys of the rendered markers (in any order) the markers are updated,
//! otherwise the whole set is rebuilt. There is deliberately no per-key
//! diff; any change in topology means a rebuild.

use serde::Serialize;
use tracing::{debug, warn};
use worldmap_common::{Color, LabelOptions, MapResult, Observation, ObservationKey, PanelConfig};

use crate::colorize::ThresholdColorizer;
use crate::filter::filter_observations;
use crate::popup::{format_label, PopupBehavior, PopupSpec};
use crate::scale::{compute_domain, map_to_size, SizeDomain};
use crate::surface::{MapSurface, MarkerSpec, MarkerStyle, MarkerUpdate};

/// A marker currently on the surface.
#[derive(Debug, Clone)]
pub struct RenderedMarker<H> {
    pub key: ObservationKey,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub color: Color,
    pub popup_label: String,
    pub handle: H,
}

/// Which pass a refresh took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPath {
    /// No markers existed; all were created.
    Created,
    /// The key set changed; all markers were removed and recreated.
    Rebuilt,
    /// Same keys as before; markers were mutated in place.
    Updated,
}

/// Outcome of one refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshSummary {
    pub path: RefreshPath,
    /// Markers created or updated by this refresh.
    pub rendered: usize,
    /// Filtered observations that produced no marker.
    pub skipped: usize,
    pub domain: SizeDomain,
}

/// Per-refresh inputs shared by every marker of the pass.
struct MarkerStyler<'a> {
    colorizer: ThresholdColorizer<'a>,
    domain: SizeDomain,
    min_size: f64,
    max_size: f64,
    use_log: bool,
    labels: LabelOptions,
    behavior: PopupBehavior,
}

impl MarkerStyler<'_> {
    fn style(&self, observation: &Observation, name: &str) -> MapResult<(MarkerStyle, PopupSpec)> {
        let radius = match observation.value {
            Some(value) => {
                map_to_size(value, &self.domain, self.min_size, self.max_size, self.use_log)?
            }
            None => self.min_size,
        };
        let color = self
            .colorizer
            .color_for_metric(observation.color_metric())
            .clone();
        let label = format_label(
            name,
            observation.value_rounded,
            observation.color_value,
            &self.labels,
        );
        Ok((
            MarkerStyle::new(radius, color),
            PopupSpec::new(label, self.behavior),
        ))
    }
}

/// The markers of one map, keyed by observation identity.
#[derive(Debug)]
pub struct MarkerSet<H> {
    markers: Vec<RenderedMarker<H>>,
}

impl<H> Default for MarkerSet<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> MarkerSet<H> {
    pub fn new() -> Self {
        Self {
            markers: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, key: &ObservationKey) -> Option<&RenderedMarker<H>> {
        self.markers.iter().find(|marker| &marker.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderedMarker<H>> {
        self.markers.iter()
    }

    /// Whether `candidates` require a full rebuild rather than an update.
    ///
    /// Compares sorted key lists, so duplicated keys and count changes are
    /// both detected.
    pub fn needs_rebuild(&self, candidates: &[&Observation]) -> bool {
        if self.markers.is_empty() && !candidates.is_empty() {
            return true;
        }
        if self.markers.len() != candidates.len() {
            return true;
        }

        let mut rendered: Vec<&ObservationKey> = self.markers.iter().map(|m| &m.key).collect();
        let mut incoming: Vec<&ObservationKey> = candidates.iter().map(|o| &o.key).collect();
        rendered.sort();
        incoming.sort();
        rendered != incoming
    }

    /// Bring the surface in line with `observations` under `config`.
    ///
    /// Configuration errors (bad palette, log scale over non-positive
    /// values) are returned before the surface is touched. Observations
    /// without a name or coordinates, values that are NaN or infinite, and
    /// markers the surface rejects are skipped without failing the refresh.
    pub fn reconcile<S>(
        &mut self,
        surface: &mut S,
        observations: &[Observation],
        config: &PanelConfig,
    ) -> MapResult<RefreshSummary>
    where
        S: MapSurface<MarkerHandle = H>,
    {
        config.validate_markers()?;
        let colorizer = ThresholdColorizer::new(&config.style)?;

        let candidates = filter_observations(observations, &config.display_filter());
        // non-finite values cannot be sized; their markers are skipped below
        let values: Vec<f64> = candidates
            .iter()
            .filter_map(|o| o.value)
            .filter(|v| v.is_finite())
            .collect();
        let domain = compute_domain(&values, config.log_scale)?;

        let styler = MarkerStyler {
            colorizer,
            domain,
            min_size: config.circle_min_size,
            max_size: config.circle_max_size,
            use_log: config.log_scale,
            labels: config.label_options(),
            behavior: PopupBehavior::from_sticky(config.sticky_labels),
        };

        let (path, rendered) = if self.needs_rebuild(&candidates) {
            let path = if self.markers.is_empty() {
                RefreshPath::Created
            } else {
                RefreshPath::Rebuilt
            };
            self.clear(surface);
            (path, self.create_pass(surface, &candidates, &styler))
        } else {
            (RefreshPath::Updated, self.update_pass(surface, &candidates, &styler))
        };

        let summary = RefreshSummary {
            path,
            rendered,
            skipped: candidates.len() - rendered,
            domain,
        };
        debug!(
            path = ?summary.path,
            candidates = candidates.len(),
            rendered = summary.rendered,
            skipped = summary.skipped,
            "Reconciled markers"
        );
        Ok(summary)
    }

    /// Remove every marker from the surface. A no-op when empty.
    pub fn clear<S>(&mut self, surface: &mut S)
    where
        S: MapSurface<MarkerHandle = H>,
    {
        if self.markers.is_empty() {
            return;
        }
        surface.remove_all_markers();
        self.markers.clear();
    }

    fn create_pass<S>(
        &mut self,
        surface: &mut S,
        candidates: &[&Observation],
        styler: &MarkerStyler<'_>,
    ) -> usize
    where
        S: MapSurface<MarkerHandle = H>,
    {
        for observation in candidates {
            let (Some(name), Some((latitude, longitude))) =
                (observation.display_name(), observation.coordinates())
            else {
                debug!(key = %observation.key, "Skipping observation without name or coordinates");
                continue;
            };

            let placed = styler.style(observation, name).and_then(|(style, popup)| {
                let spec = MarkerSpec {
                    key: observation.key.clone(),
                    latitude,
                    longitude,
                    style,
                    popup,
                };
                let handle = surface.place_marker(&spec)?;
                Ok((spec, handle))
            });

            match placed {
                Ok((spec, handle)) => self.markers.push(RenderedMarker {
                    key: spec.key,
                    latitude,
                    longitude,
                    radius: spec.style.radius,
                    color: spec.style.color,
                    popup_label: spec.popup.label,
                    handle,
                }),
                Err(e) => warn!(key = %observation.key, error = %e, "Failed to place marker"),
            }
        }
        self.markers.len()
    }

    fn update_pass<S>(
        &mut self,
        surface: &mut S,
        candidates: &[&Observation],
        styler: &MarkerStyler<'_>,
    ) -> usize
    where
        S: MapSurface<MarkerHandle = H>,
    {
        let mut updated = 0;
        for observation in candidates {
            let Some(name) = observation.display_name() else {
                continue;
            };
            let Some(marker) = self.markers.iter_mut().find(|m| m.key == observation.key) else {
                continue;
            };

            let result = styler.style(observation, name).and_then(|(style, popup)| {
                let update = MarkerUpdate { style, popup };
                surface.update_marker(&marker.handle, &update)?;
                Ok(update)
            });

            match result {
                Ok(update) => {
                    marker.radius = update.style.radius;
                    marker.color = update.style.color;
                    marker.popup_label = update.popup.label;
                    updated += 1;
                }
                Err(e) => warn!(key = %observation.key, error = %e, "Failed to update marker"),
            }
        }
        updated
    }
}
