//! Marker engine for worldmap panels.
//!
//! Turns a list of geolocated observations into sized, threshold-colored
//! circle markers on a [`MapSurface`], and keeps them in sync across
//! refreshes.
//!
//! # Refresh flow
//!
//! 1. Observations are filtered (empty, zero, min/max display bounds).
//! 2. A [`SizeDomain`] is computed over the surviving values.
//! 3. [`MarkerSet`] decides between an in-place update and a full rebuild,
//!    then styles each marker with [`ThresholdColorizer`] and the popup
//!    formatter.
//!
//! The legend is derived independently from the same thresholds.

pub mod colorize;
pub mod engine;
pub mod filter;
pub mod legend;
pub mod markers;
pub mod plan;
pub mod popup;
pub mod scale;
pub mod surface;

pub use colorize::{bucket_index, color_for, ThresholdColorizer};
pub use engine::WorldMap;
pub use filter::{admits, filter_observations};
pub use legend::{build_legend, render_legend_html, LegendRow};
pub use markers::{MarkerSet, RefreshPath, RefreshSummary, RenderedMarker};
pub use plan::{DrawCommand, LegendId, MarkerId, RenderPlan};
pub use popup::{format_label, PopupBehavior, PopupSpec};
pub use scale::{compute_domain, map_to_size, SizeDomain};
pub use surface::{MapSurface, MarkerSpec, MarkerStyle, MarkerUpdate};
