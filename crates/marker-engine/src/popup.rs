//! Popup labels and popup behavior.

use serde::Serialize;
use worldmap_common::style::format_number;
use worldmap_common::LabelOptions;

/// CSS class the popups are rendered with.
pub const POPUP_CLASS: &str = "worldmap-popup";

/// Popup anchor offset (x, y) in pixels from the marker center.
pub const POPUP_OFFSET: (i32, i32) = (0, -2);

/// How a marker's popup reacts to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupBehavior {
    /// Open and raise the marker on pointer entry, close on exit.
    Hover,
    /// Open on pointer entry and stay open until closed by the user.
    Sticky,
}

impl PopupBehavior {
    pub fn from_sticky(sticky: bool) -> Self {
        if sticky {
            PopupBehavior::Sticky
        } else {
            PopupBehavior::Hover
        }
    }

    /// Sticky popups carry a close control.
    pub fn close_button(&self) -> bool {
        matches!(self, PopupBehavior::Sticky)
    }

    pub fn closes_on_pointer_leave(&self) -> bool {
        matches!(self, PopupBehavior::Hover)
    }
}

/// Everything the surface needs to bind a popup to a marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupSpec {
    pub label: String,
    pub behavior: PopupBehavior,
    pub class_name: &'static str,
    pub offset: (i32, i32),
}

impl PopupSpec {
    pub fn new(label: String, behavior: PopupBehavior) -> Self {
        Self {
            label,
            behavior,
            class_name: POPUP_CLASS,
            offset: POPUP_OFFSET,
        }
    }
}

/// Build the popup label for one marker.
///
/// The first line is `"<name>: <value> <unit>"`; the unit is singular only
/// for a value of exactly 1. A second line with the color metric is
/// appended after `<br>` when `color_value` is present.
pub fn format_label(
    location_name: &str,
    value: Option<f64>,
    color_value: Option<f64>,
    options: &LabelOptions,
) -> String {
    let unit = if value == Some(1.0) {
        options.unit_singular.as_deref()
    } else {
        options.unit_plural.as_deref()
    }
    .unwrap_or("");

    let value_text = value.map(format_number).unwrap_or_else(|| "n/a".to_string());
    let prefix = if options.hide_location_name {
        String::new()
    } else {
        format!("{}: ", location_name)
    };
    let first_line = format!("{}{}", prefix, format!("{} {}", value_text, unit).trim());

    let second_line = match color_value {
        Some(metric) => {
            let label = match options.color_label.as_deref() {
                Some(label) if !label.is_empty() => format!("{}: ", label),
                _ => String::new(),
            };
            let metric_text = if metric == 0.0 || metric.is_nan() {
                "0".to_string()
            } else {
                format_number(metric)
            };
            let unit = options.color_unit.as_deref().unwrap_or("");
            format!("{}{}{}", label, metric_text, unit).trim().to_string()
        }
        None => String::new(),
    };

    if second_line.is_empty() {
        first_line
    } else {
        format!("{}<br>{}", first_line, second_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units() -> LabelOptions {
        LabelOptions {
            unit_singular: Some("error".to_string()),
            unit_plural: Some("errors".to_string()),
            ..LabelOptions::default()
        }
    }

    #[test]
    fn test_singular_and_plural_units() {
        assert_eq!(format_label("Sweden", Some(1.0), None, &units()), "Sweden: 1 error");
        assert_eq!(format_label("Ireland", Some(2.0), None, &units()), "Ireland: 2 errors");
        assert_eq!(format_label("Ireland", Some(0.0), None, &units()), "Ireland: 0 errors");
        assert_eq!(format_label("Ireland", None, None, &units()), "Ireland: n/a errors");
    }

    #[test]
    fn test_missing_unit_is_trimmed() {
        assert_eq!(
            format_label("Sweden", Some(1.0), None, &LabelOptions::default()),
            "Sweden: 1"
        );
    }

    #[test]
    fn test_hidden_location_name() {
        let options = LabelOptions {
            hide_location_name: true,
            ..units()
        };
        assert_eq!(format_label("Sweden", Some(3.0), None, &options), "3 errors");
    }

    #[test]
    fn test_second_line_with_label_and_unit() {
        let options = LabelOptions {
            color_label: Some("Metric".to_string()),
            color_unit: Some("%".to_string()),
            ..LabelOptions::default()
        };
        assert_eq!(
            format_label("Ireland", Some(2.0), Some(50.0), &options),
            "Ireland: 2<br>Metric: 50%"
        );
    }

    #[test]
    fn test_second_line_zero_and_unlabelled() {
        let options = LabelOptions::default();
        assert_eq!(format_label("Sweden", Some(1.0), Some(99.0), &options), "Sweden: 1<br>99");
        assert_eq!(format_label("Sweden", Some(1.0), Some(0.0), &options), "Sweden: 1<br>0");
    }

    #[test]
    fn test_popup_behavior() {
        let hover = PopupBehavior::from_sticky(false);
        assert!(hover.closes_on_pointer_leave());
        assert!(!hover.close_button());

        let sticky = PopupBehavior::from_sticky(true);
        assert!(sticky.close_button());
        assert!(!sticky.closes_on_pointer_leave());
    }
}
