// The bar chart of the ranking, as a Vega-Lite document.

use serde_json::json;
use serde_json::Value as JSValue;

use crate::survey::*;

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";
const BAR_COLOR: &str = "#1f77b4";
// Pixels per course
const ROW_HEIGHT: usize = 22;
const MIN_HEIGHT: usize = 200;

pub fn chart_title(year: Option<&str>) -> String {
    match year {
        Some(y) => format!("Course Rank Order by Net Approval Score ({})", y),
        None => "Course Rank Order by Net Approval Score".to_string(),
    }
}

/// Horizontal bars of the NAS of each course, with a dashed line at zero.
///
/// The values are listed by increasing NAS; the best course is drawn at the top.
pub fn build_chart_js(summary: &[CourseSummary], year: Option<&str>) -> JSValue {
    let mut ordered: Vec<&CourseSummary> = summary.iter().collect();
    ordered.sort_by(|a, b| a.nas.total_cmp(&b.nas));
    let values: Vec<JSValue> = ordered
        .iter()
        .map(|row| {
            json!({
                "rank": row.rank,
                "course": row.course,
                "n_total": row.n_total,
                "pct_most": row.pct_most,
                "pct_least": row.pct_least,
                "nas": row.nas,
            })
        })
        .collect();
    let height = std::cmp::max(MIN_HEIGHT, summary.len() * ROW_HEIGHT);

    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": chart_title(year),
        "width": 600,
        "height": height,
        "data": { "values": values },
        "layer": [
            {
                "mark": { "type": "bar", "color": BAR_COLOR },
                "encoding": {
                    "y": {
                        "field": "course",
                        "type": "nominal",
                        "sort": { "field": "nas", "order": "descending" },
                        "title": "Course / Program"
                    },
                    "x": {
                        "field": "nas",
                        "type": "quantitative",
                        "title": "Net Approval Score (pct_most - pct_least)"
                    },
                    "tooltip": [
                        { "field": "rank", "type": "ordinal" },
                        { "field": "course", "type": "nominal" },
                        { "field": "n_total", "type": "quantitative" },
                        { "field": "pct_most", "type": "quantitative", "format": ".1f" },
                        { "field": "pct_least", "type": "quantitative", "format": ".1f" },
                        { "field": "nas", "type": "quantitative", "format": ".1f" }
                    ]
                }
            },
            {
                "mark": { "type": "rule", "color": "black", "strokeDash": [4, 4], "strokeWidth": 1 },
                "encoding": { "x": { "datum": 0 } }
            }
        ]
    })
}

pub fn write_chart(path: &Path, summary: &[CourseSummary], year: Option<&str>) -> SurveyResult<()> {
    let chart_js = build_chart_js(summary, year);
    let pretty = serde_json::to_string_pretty(&chart_js).context(ParsingJsonSnafu {
        path: path_str(path),
    })?;
    fs::write(path, pretty).context(WritingFileSnafu {
        path: path_str(path),
    })?;
    Ok(())
}
