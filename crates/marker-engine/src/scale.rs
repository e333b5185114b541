//! Value-to-radius scaling.
//!
//! Marker sizes are relative to the data of the current refresh: the
//! lowest value gets the minimum radius, the highest the maximum, and
//! everything in between is placed linearly (optionally after a natural
//! log, which compresses a large spread so small values stay visible).

use serde::Serialize;
use worldmap_common::{MapError, MapResult};

/// Spread of the (possibly log-transformed) values of one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeDomain {
    pub lowest: f64,
    pub highest: f64,
    pub range: f64,
}

impl SizeDomain {
    /// Domain of an empty or single-valued set.
    pub fn degenerate(value: f64) -> Self {
        Self {
            lowest: value,
            highest: value,
            range: 0.0,
        }
    }

    /// All values are equal; every marker gets the maximum size.
    pub fn is_degenerate(&self) -> bool {
        self.range == 0.0
    }
}

/// Apply the optional log transform.
///
/// The log of a non-positive or non-finite value is rejected rather than
/// turned into `-inf`/NaN.
pub fn transform(value: f64, use_log: bool) -> MapResult<f64> {
    if !value.is_finite() {
        return Err(MapError::invalid_input(format!(
            "cannot size non-finite value {}",
            value
        )));
    }
    if !use_log {
        return Ok(value);
    }
    if value <= 0.0 {
        return Err(MapError::invalid_input(format!(
            "log scale requires positive values, got {}",
            value
        )));
    }
    Ok(value.ln())
}

/// Compute the size domain over all values of the current refresh.
///
/// An empty input yields a degenerate domain at zero.
pub fn compute_domain(values: &[f64], use_log: bool) -> MapResult<SizeDomain> {
    let mut lowest = f64::INFINITY;
    let mut highest = f64::NEG_INFINITY;

    for &value in values {
        let v = transform(value, use_log)?;
        lowest = lowest.min(v);
        highest = highest.max(v);
    }

    if values.is_empty() {
        return Ok(SizeDomain::degenerate(0.0));
    }

    Ok(SizeDomain {
        lowest,
        highest,
        range: highest - lowest,
    })
}

/// Map a value into `[min_size, max_size]` relative to `domain`.
///
/// A zero-range domain always yields `max_size`.
pub fn map_to_size(
    value: f64,
    domain: &SizeDomain,
    min_size: f64,
    max_size: f64,
    use_log: bool,
) -> MapResult<f64> {
    let v = transform(value, use_log)?;

    if domain.is_degenerate() {
        return Ok(max_size);
    }

    let factor = (v - domain.lowest) / domain.range;
    Ok(min_size + factor * (max_size - min_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_domain() {
        let domain = compute_domain(&[3.0, 1.0, 2.0], false).unwrap();
        assert_eq!(domain.lowest, 1.0);
        assert_eq!(domain.highest, 3.0);
        assert_eq!(domain.range, 2.0);
    }

    #[test]
    fn test_empty_domain_is_degenerate() {
        let domain = compute_domain(&[], true).unwrap();
        assert!(domain.is_degenerate());
    }

    #[test]
    fn test_degenerate_domain_maps_to_max() {
        let domain = compute_domain(&[5.0], false).unwrap();
        assert_eq!(map_to_size(5.0, &domain, 2.0, 10.0, false).unwrap(), 10.0);
        assert_eq!(map_to_size(-40.0, &domain, 2.0, 10.0, false).unwrap(), 10.0);
    }

    #[test]
    fn test_log_rejects_non_positive() {
        assert!(compute_domain(&[1.0, 0.0], true)
            .unwrap_err()
            .is_invalid_input());
        assert!(compute_domain(&[-3.0], true).is_err());

        let domain = compute_domain(&[1.0, 10.0], true).unwrap();
        assert!(map_to_size(0.0, &domain, 1.0, 5.0, true).is_err());
    }

    #[test]
    fn test_linear_accepts_zero_and_negatives() {
        let domain = compute_domain(&[-2.0, 0.0, 2.0], false).unwrap();
        assert_eq!(map_to_size(0.0, &domain, 0.0, 10.0, false).unwrap(), 5.0);
    }
}
