//! Threshold color classification.

use worldmap_common::{Color, MapResult, ThresholdConfig};

/// Index of the palette bucket for `value`.
///
/// Thresholds are scanned from the highest down; the first one the value
/// reaches (`>=`) selects the bucket above it. Values below every
/// threshold, NaN, or an empty threshold list select bucket 0.
pub fn bucket_index(value: f64, thresholds: &[f64]) -> usize {
    (1..=thresholds.len())
        .rev()
        .find(|&index| value >= thresholds[index - 1])
        .unwrap_or(0)
}

/// Color for `value`, or `None` when the palette has no entry for its bucket.
pub fn color_for<'a>(value: f64, thresholds: &[f64], palette: &'a [Color]) -> Option<&'a Color> {
    palette.get(bucket_index(value, thresholds))
}

/// Colorizer over a validated threshold configuration.
///
/// Construction checks that the palette covers every bucket, so lookups
/// cannot miss.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdColorizer<'a> {
    thresholds: &'a [f64],
    palette: &'a [Color],
}

impl<'a> ThresholdColorizer<'a> {
    pub fn new(config: &'a ThresholdConfig) -> MapResult<Self> {
        config.validate()?;
        Ok(Self {
            thresholds: &config.thresholds,
            palette: &config.colors,
        })
    }

    pub fn color_for(&self, value: f64) -> &'a Color {
        &self.palette[bucket_index(value, self.thresholds)]
    }

    /// Color for an optional metric; a missing metric takes the lowest bucket.
    pub fn color_for_metric(&self, metric: Option<f64>) -> &'a Color {
        match metric {
            Some(value) => self.color_for(value),
            None => &self.palette[0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Vec<Color> {
        vec![Color::new("red"), Color::new("blue"), Color::new("green")]
    }

    #[test]
    fn test_bucket_index_boundaries() {
        let thresholds = [2.0, 4.0];
        assert_eq!(bucket_index(1.9, &thresholds), 0);
        assert_eq!(bucket_index(2.0, &thresholds), 1);
        assert_eq!(bucket_index(3.9, &thresholds), 1);
        assert_eq!(bucket_index(4.0, &thresholds), 2);
        assert_eq!(bucket_index(1e9, &thresholds), 2);
        assert_eq!(bucket_index(f64::NAN, &thresholds), 0);
    }

    #[test]
    fn test_empty_thresholds_use_first_color() {
        let colors = palette();
        assert_eq!(color_for(100.0, &[], &colors), Some(&colors[0]));
    }

    #[test]
    fn test_short_palette_returns_none() {
        let colors = vec![Color::new("red")];
        assert_eq!(color_for(5.0, &[2.0], &colors), None);
    }

    #[test]
    fn test_colorizer_rejects_short_palette() {
        let config = ThresholdConfig::new(vec![2.0, 4.0, 6.0], palette());
        assert!(ThresholdColorizer::new(&config).is_err());
    }

    #[test]
    fn test_missing_metric_is_lowest_bucket() {
        let config = ThresholdConfig::new(vec![2.0], palette());
        let colorizer = ThresholdColorizer::new(&config).unwrap();
        assert_eq!(colorizer.color_for_metric(None).as_str(), "red");
        assert_eq!(colorizer.color_for_metric(Some(2.0)).as_str(), "blue");
    }
}
