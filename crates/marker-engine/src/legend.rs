//! Legend rows derived from the threshold configuration.

use serde::Serialize;
use worldmap_common::style::format_number;
use worldmap_common::Color;

/// One legend entry: a swatch color and the value range it covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendRow {
    /// `None` when the palette has no color for this bucket.
    pub color: Option<Color>,
    pub label: String,
}

/// Build the legend rows for `thresholds` and `palette`.
///
/// Produces `thresholds.len() + 1` rows, or none at all for an empty
/// threshold list. The palette is not validated here: a bucket without a
/// color yields a row with `color: None`.
pub fn build_legend(thresholds: &[f64], palette: &[Color]) -> Vec<LegendRow> {
    let Some(first) = thresholds.first() else {
        return Vec::new();
    };

    let mut rows = Vec::with_capacity(thresholds.len() + 1);
    rows.push(LegendRow {
        color: palette.first().cloned(),
        label: format!("< {}", format_number(*first)),
    });

    for (index, threshold) in thresholds.iter().enumerate() {
        let label = match thresholds.get(index + 1) {
            Some(next) => format!("{}–{}", format_number(*threshold), format_number(*next)),
            None => format!("{}+", format_number(*threshold)),
        };
        rows.push(LegendRow {
            color: palette.get(index + 1).cloned(),
            label,
        });
    }

    rows
}

/// Render legend rows as the panel's HTML markup.
pub fn render_legend_html(rows: &[LegendRow]) -> String {
    rows.iter()
        .map(|row| {
            let background = row.color.as_ref().map(Color::as_str).unwrap_or("none");
            format!(
                "<div class=\"legend-item\"><i style=\"background:{}\"></i> {}</div>",
                background,
                row.label.replace('<', "&lt;")
            )
        })
        .collect()
}
