//! Size scaling and color bucket properties.

use marker_engine::{bucket_index, color_for, compute_domain, map_to_size};
use test_utils::{assert_radius_eq, red_blue_green};

// ============================================================================
// Linear scaling
// ============================================================================

#[test]
fn test_linear_size_is_monotonic() {
    let values: Vec<f64> = (0..50).map(|i| i as f64 * 1.5 - 10.0).collect();
    let domain = compute_domain(&values, false).unwrap();

    let sizes: Vec<f64> = values
        .iter()
        .map(|v| map_to_size(*v, &domain, 2.0, 30.0, false).unwrap())
        .collect();

    assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
    assert_radius_eq!(sizes[0], 2.0);
    assert_radius_eq!(sizes[49], 30.0);
}

#[test]
fn test_equal_values_all_get_max_size() {
    let domain = compute_domain(&[7.0, 7.0, 7.0], false).unwrap();
    assert!(domain.is_degenerate());
    assert_eq!(map_to_size(7.0, &domain, 2.0, 30.0, false).unwrap(), 30.0);
}

// ============================================================================
// Log scaling
// ============================================================================

#[test]
fn test_log_domain_range() {
    let domain = compute_domain(&[1.0, 100.0, 300000.0], true).unwrap();
    assert_radius_eq!(domain.lowest, 0.0);
    assert_radius_eq!(domain.range, 300000f64.ln() - 1f64.ln());
}

#[test]
fn test_log_sizes() {
    let values = [1.0, 100.0, 300000.0];
    let domain = compute_domain(&values, true).unwrap();
    let sizes: Vec<f64> = values
        .iter()
        .map(|v| map_to_size(*v, &domain, 1.0, 11.0, true).unwrap())
        .collect();

    assert_radius_eq!(sizes[0], 1.0);
    assert_radius_eq!(sizes[1], 4.651553264913736);
    assert_radius_eq!(sizes[2], 11.0);
}

#[test]
fn test_log_negative_is_invalid_input() {
    let err = compute_domain(&[5.0, -1.0], true).unwrap_err();
    assert!(err.is_invalid_input());
}

// ============================================================================
// Color buckets
// ============================================================================

#[test]
fn test_values_inside_bucket_get_its_color() {
    let palette = red_blue_green();
    let thresholds = [10.0, 20.0];
    for (value, expected) in [(-5.0, "red"), (9.99, "red"), (15.0, "blue"), (25.0, "green")] {
        assert_eq!(
            color_for(value, &thresholds, &palette).unwrap().as_str(),
            expected,
            "value {}",
            value
        );
    }
}

#[test]
fn test_boundary_goes_to_upper_bucket() {
    let thresholds = [10.0, 20.0];
    assert_eq!(bucket_index(10.0, &thresholds), 1);
    assert_eq!(bucket_index(20.0, &thresholds), 2);
}
