//! Generators for synthetic observation sets.
//!
//! These create predictable, verifiable observation lists that can be used
//! for larger reconciliation tests and benchmarks.

use worldmap_common::Observation;

/// Creates `count` observations laid out on a lat/lon grid.
///
/// Keys are `"P<index>"`, names `"Point <index>"`, and each value is
/// `index + 1` so every value is positive and distinct.
///
/// # Example
///
/// ```
/// use test_utils::create_observation_grid;
///
/// let data = create_observation_grid(4);
/// assert_eq!(data.len(), 4);
/// assert_eq!(data[0].key.as_str(), "P0");
/// assert_eq!(data[3].value, Some(4.0));
/// ```
pub fn create_observation_grid(count: usize) -> Vec<Observation> {
    create_observation_grid_with(count, |index| (index + 1) as f64)
}

/// Like [`create_observation_grid`] but with values from `value_fn(index)`.
pub fn create_observation_grid_with(
    count: usize,
    value_fn: impl Fn(usize) -> f64,
) -> Vec<Observation> {
    let columns = (count as f64).sqrt().ceil().max(1.0) as usize;
    (0..count)
        .map(|index| {
            let row = index / columns;
            let col = index % columns;
            // spread over [-80, 80] x [-170, 170]
            let lat = -80.0 + 160.0 * row as f64 / columns as f64;
            let lon = -170.0 + 340.0 * col as f64 / columns as f64;
            Observation::new(format!("P{}", index))
                .with_location(format!("Point {}", index), lat, lon)
                .with_value(Some(value_fn(index)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_keys_are_unique() {
        let data = create_observation_grid(100);
        let mut keys: Vec<&str> = data.iter().map(|o| o.key.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 100);
    }

    #[test]
    fn test_grid_coordinates_are_valid() {
        for obs in create_observation_grid(50) {
            let (lat, lon) = obs.coordinates().unwrap();
            assert!((-90.0..=90.0).contains(&lat));
            assert!((-180.0..=180.0).contains(&lon));
        }
    }

    #[test]
    fn test_custom_values() {
        let data = create_observation_grid_with(3, |i| (i * 10) as f64);
        assert_eq!(data[2].value, Some(20.0));
    }
}
