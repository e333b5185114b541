//! Display filtering ahead of sizing.

use worldmap_common::{DisplayFilter, Observation};

/// Whether `observation` survives the display filter.
///
/// Bounds only apply to present values; a missing value is dropped by
/// `hide_empty` alone.
pub fn admits(filter: &DisplayFilter, observation: &Observation) -> bool {
    let Some(value) = observation.value else {
        return !filter.hide_empty;
    };

    if filter.hide_zero && value == 0.0 {
        return false;
    }
    if let Some(min) = filter.min_value.filter(|m| !m.is_nan()) {
        if value < min {
            return false;
        }
    }
    if let Some(max) = filter.max_value.filter(|m| !m.is_nan()) {
        if value > max {
            return false;
        }
    }
    true
}

/// Observations that survive the filter, in input order.
pub fn filter_observations<'a>(
    observations: &'a [Observation],
    filter: &DisplayFilter,
) -> Vec<&'a Observation> {
    observations
        .iter()
        .filter(|observation| admits(filter, observation))
        .collect()
}
