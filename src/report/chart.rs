use serde_json::{Value, json};

use crate::series::present;
use crate::series::reconcile::CanonicalSeries;

const PANEL_WIDTH: u32 = 350;
const PANEL_HEIGHT: u32 = 200;

#[derive(Debug, Clone)]
pub struct ChartSpec {
    /// DOM element id the embedding script targets.
    pub element_id: String,
    pub spec: Value,
}

/// Y-axis title for a counter column. The four traffic counters keep their
/// established wording; anything else falls back to a generic label.
fn axis_title(column: &str) -> String {
    match column {
        "views_unique" => "unique views per day".to_string(),
        "views_total" => "total views per day".to_string(),
        "clones_unique" => "unique clones per day".to_string(),
        "clones_total" => "total clones per day".to_string(),
        other => format!("{} per day", other.replace('_', " ")),
    }
}

/// Build the Vega-Lite line-chart spec for one counter column.
///
/// One panel per column: points on a solid line, temporal x without a title,
/// data inlined as `{time, count}` records. `None` when the column is not
/// part of the series.
pub fn line_chart(series: &CanonicalSeries, column: &str) -> Option<ChartSpec> {
    let points = present::column_points(series, column)?;

    let values: Vec<Value> = points
        .map(|(timestamp, value)| {
            json!({
                "time": timestamp.to_rfc3339(),
                "count": value,
            })
        })
        .collect();

    let spec = json!({
        "$schema": "https://vega.github.io/schema/vega-lite/v4.json",
        "width": PANEL_WIDTH,
        "height": PANEL_HEIGHT,
        "data": { "values": values },
        "mark": { "type": "line", "point": true },
        "encoding": {
            "x": { "field": "time", "type": "temporal", "title": null },
            "y": { "field": "count", "type": "quantitative", "title": axis_title(column) },
        },
    });

    Some(ChartSpec {
        element_id: format!("chart_{column}"),
        spec,
    })
}
