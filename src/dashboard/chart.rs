//! Retained time-series charts.
//!
//! A [`Chart`] is created once per dashboard and updated in place with
//! [`Chart::update_series`]; it never gets rebuilt on refresh. Each update
//! bumps [`Chart::revision`] so a browser-side chart library can tell
//! whether it has anything new to draw. The chart renders itself as inline
//! SVG and exposes its configuration as JSON.

use chrono::FixedOffset;
use serde::Serialize;
use serde_json::json;

use super::metrics::LogField;
use crate::api::types::PerformanceLogEntry;
use crate::utils::time;

const SVG_WIDTH: f64 = 600.0;
const PAD_LEFT: f64 = 48.0;
const PAD_RIGHT: f64 = 12.0;
const PAD_TOP: f64 = 28.0;
const PAD_BOTTOM: f64 = 24.0;

/// One sample: x is a Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: i64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    /// DOM id of the chart container.
    pub element_id: &'static str,
    pub title: &'static str,
    pub series_name: &'static str,
    pub y_axis_title: &'static str,
    /// Fixed upper bound; `None` scales to the data. The lower bound is 0.
    pub y_max: Option<f64>,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct Chart {
    options: ChartOptions,
    points: Vec<ChartPoint>,
    revision: u64,
}

impl Chart {
    pub fn new(options: ChartOptions) -> Self {
        Self {
            options,
            points: Vec::new(),
            revision: 0,
        }
    }

    /// Confidence scores, bounded to 0–100.
    pub fn confidence() -> Self {
        Self::new(ChartOptions {
            element_id: "confidenceChart",
            title: "Confidence Scores Over Time",
            series_name: "Confidence Score",
            y_axis_title: "Confidence Score (%)",
            y_max: Some(100.0),
            height: 300,
        })
    }

    /// Processing times, from 0 up to the largest sample.
    pub fn processing_time() -> Self {
        Self::new(ChartOptions {
            element_id: "processingTimeChart",
            title: "Processing Times Over Time",
            series_name: "Processing Time",
            y_axis_title: "Processing Time (seconds)",
            y_max: None,
            height: 300,
        })
    }

    /// Replace the series in place, ordered by timestamp.
    pub fn update_series(&mut self, mut points: Vec<ChartPoint>) {
        points.sort_by_key(|p| p.x);
        self.points = points;
        self.revision += 1;
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// `(min, max)` of the y axis.
    pub fn y_bounds(&self) -> (f64, f64) {
        let max = match self.options.y_max {
            Some(max) => max,
            None => self
                .points
                .iter()
                .map(|p| p.y)
                .fold(0.0_f64, f64::max),
        };
        (0.0, if max > 0.0 { max } else { 1.0 })
    }

    /// Chart configuration for a browser-side charting library.
    pub fn to_config(&self) -> serde_json::Value {
        let (y_min, _) = self.y_bounds();
        let mut yaxis = json!({
            "title": { "text": self.options.y_axis_title },
            "min": y_min,
        });
        if let Some(max) = self.options.y_max {
            yaxis["max"] = json!(max);
        }

        json!({
            "element_id": self.options.element_id,
            "revision": self.revision,
            "series": [{ "name": self.options.series_name, "data": self.points }],
            "chart": { "type": "line", "height": self.options.height },
            "stroke": { "curve": "smooth", "width": 2 },
            "title": { "text": self.options.title, "align": "left" },
            "xaxis": { "type": "datetime" },
            "yaxis": yaxis,
            "tooltip": { "x": { "format": "dd MMM yyyy HH:mm:ss" } },
        })
    }

    /// Render the chart as a standalone inline SVG line chart.
    pub fn to_svg(&self) -> String {
        let height = f64::from(self.options.height);
        let plot_w = SVG_WIDTH - PAD_LEFT - PAD_RIGHT;
        let plot_h = height - PAD_TOP - PAD_BOTTOM;
        let (y_min, y_max) = self.y_bounds();
        let title = super::render::escape_html(self.options.title);

        let mut svg = format!(
            r#"<svg id="{id}" class="chart" viewBox="0 0 {w} {h}" role="img" aria-label="{title}">"#,
            id = self.options.element_id,
            w = SVG_WIDTH,
            h = height,
        );
        svg.push_str(&format!(
            r#"<text class="chart-title" x="{PAD_LEFT}" y="18">{title}</text>"#
        ));
        svg.push_str(&format!(
            r#"<line class="axis" x1="{PAD_LEFT}" y1="{PAD_TOP}" x2="{PAD_LEFT}" y2="{bottom}"/><line class="axis" x1="{PAD_LEFT}" y1="{bottom}" x2="{right}" y2="{bottom}"/>"#,
            bottom = PAD_TOP + plot_h,
            right = PAD_LEFT + plot_w,
        ));
        svg.push_str(&format!(
            r#"<text class="tick" x="4" y="{top}">{max}</text><text class="tick" x="4" y="{bottom}">{min}</text>"#,
            top = PAD_TOP + 4.0,
            bottom = PAD_TOP + plot_h,
            max = format_tick(y_max),
            min = format_tick(y_min),
        ));

        if self.points.is_empty() {
            svg.push_str(&format!(
                r#"<text class="empty" x="{x}" y="{y}" text-anchor="middle">No data</text>"#,
                x = PAD_LEFT + plot_w / 2.0,
                y = PAD_TOP + plot_h / 2.0,
            ));
        } else {
            let x_min = self.points.first().map(|p| p.x).unwrap_or_default();
            let x_max = self.points.last().map(|p| p.x).unwrap_or_default();
            let coords: Vec<String> = self
                .points
                .iter()
                .map(|p| {
                    let fx = if x_max > x_min {
                        (p.x - x_min) as f64 / (x_max - x_min) as f64
                    } else {
                        0.5
                    };
                    let fy = ((p.y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
                    format!(
                        "{:.1},{:.1}",
                        PAD_LEFT + fx * plot_w,
                        PAD_TOP + (1.0 - fy) * plot_h
                    )
                })
                .collect();
            svg.push_str(&format!(
                r#"<polyline class="series" fill="none" stroke-width="2" points="{}"/>"#,
                coords.join(" ")
            ));
        }

        svg.push_str("</svg>");
        svg
    }
}

/// Chart points for one field, keyed by timestamp. Entries whose timestamp
/// cannot be parsed are left out.
pub fn series_from_logs(
    logs: &[PerformanceLogEntry],
    field: LogField,
    offset: &FixedOffset,
) -> Vec<ChartPoint> {
    logs.iter()
        .filter_map(|entry| {
            let at = time::parse_timestamp(&entry.timestamp, offset)?;
            Some(ChartPoint {
                x: at.timestamp_millis(),
                y: field.value(entry),
            })
        })
        .collect()
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
