//! Pure HTML renderers for the five dashboard regions.
//!
//! Every function maps a view model to a markup fragment that replaces the
//! region's previous content wholesale. Backend-provided text is escaped.

use chrono::FixedOffset;

use super::chart::Chart;
use super::consent::ConsentTable;
use super::metrics::PerformanceSummary;
use crate::api::types::{HealthSnapshot, ModelCard, SystemSettings, display_value};
use crate::utils::time;

/// Escape text for use in HTML element content and attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn fixed_or_na(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "N/A".to_string(),
    }
}

/// Charts plus the latest/average summary block.
pub fn performance(summary: &PerformanceSummary, confidence: &Chart, processing: &Chart) -> String {
    let drift = match &summary.drift_status {
        Some(status) => escape_html(status),
        None => "None detected".to_string(),
    };
    let calibration = if summary.calibration_needed {
        "Needed"
    } else {
        "Up to date"
    };

    format!(
        r#"<div class="metrics-grid">
<div class="chart-card">{confidence_svg}</div>
<div class="chart-card">{processing_svg}</div>
</div>
<div class="metrics-summary">
<div class="metric-box">
<h4>Latest Results</h4>
<p>Confidence: {latest_conf}%</p>
<p>Processing Time: {latest_proc}s</p>
</div>
<div class="metric-box">
<h4>Averages</h4>
<p>Avg Confidence: {avg_conf:.2}%</p>
<p>Avg Processing: {avg_proc:.3}s</p>
</div>
<div class="metric-box">
<h4>Model Drift</h4>
<p>Drift: {drift}</p>
<p>Calibration: {calibration}</p>
<p>Samples: {samples}</p>
</div>
</div>"#,
        confidence_svg = confidence.to_svg(),
        processing_svg = processing.to_svg(),
        latest_conf = fixed_or_na(summary.latest_confidence, 2),
        latest_proc = fixed_or_na(summary.latest_processing_time, 3),
        avg_conf = summary.average_confidence,
        avg_proc = summary.average_processing_time,
        samples = summary.samples,
    )
}

pub fn model_card(card: &ModelCard) -> String {
    let details = &card.model_details;
    let thresholds = &card.metrics.quality_threshold;
    let text = |v: &serde_json::Value| escape_html(&display_value(v));

    format!(
        r#"<div class="model-info">
<h3>{name} v{version}</h3>
<p>{description}</p>
<h4>Technical Details</h4>
<ul>
<li>Architecture: {architecture}</li>
<li>Backend: {backend}</li>
</ul>
<h4>Performance Thresholds</h4>
<ul>
<li>Brightness: {brightness}</li>
<li>Contrast: {contrast}</li>
<li>Resolution: {resolution}</li>
</ul>
</div>"#,
        name = text(&details.name),
        version = text(&details.version),
        description = text(&details.description),
        architecture = text(&details.model_architecture),
        backend = text(&details.backend),
        brightness = text(&thresholds.brightness),
        contrast = text(&thresholds.contrast),
        resolution = text(&thresholds.resolution),
    )
}

/// Summary counts and the full consent table, newest first.
pub fn consent_logs(table: &ConsentTable, offset: &FixedOffset) -> String {
    let rows: String = table
        .rows
        .iter()
        .map(|row| {
            let date = match row.consent_date {
                Some(at) => time::format_date(at, offset),
                None => escape_html(&row.raw_consent_date),
            };
            let expiry = row
                .expiry
                .map(|at| time::format_date(at, offset))
                .unwrap_or_else(|| "Unknown".to_string());
            format!(
                r#"<tr class="{classes}"><td>{user}</td><td>{date}</td><td>{purpose}</td><td>{retention}</td><td>{status}</td><td>{expiry}</td></tr>
"#,
                classes = row.css_classes(),
                user = escape_html(&row.user_id),
                purpose = escape_html(&row.purpose),
                retention = row.retention_period,
                status = row.status,
            )
        })
        .collect();

    format!(
        r#"<div class="consent-summary">
<p>Total Records: {total}</p>
<p>Active Consents: {active}</p>
</div>
<table class="consent-table">
<thead>
<tr><th>User ID</th><th>Date</th><th>Purpose</th><th>Retention (days)</th><th>Status</th><th>Expiry Date</th></tr>
</thead>
<tbody>
{rows}</tbody>
</table>"#,
        total = table.total,
        active = table.active,
    )
}

/// One card per category, one line per key, values as-is.
pub fn settings(settings: &SystemSettings) -> String {
    let cards: String = settings
        .0
        .iter()
        .map(|(category, entries)| {
            let items: String = match entries.as_object() {
                Some(map) => map
                    .iter()
                    .map(|(key, value)| {
                        format!(
                            "<li><strong>{}:</strong> {}</li>\n",
                            escape_html(key),
                            escape_html(&display_value(value))
                        )
                    })
                    .collect(),
                None => format!("<li>{}</li>\n", escape_html(&display_value(entries))),
            };
            format!(
                "<div class=\"settings-card\">\n<h3>{}</h3>\n<ul>\n{}</ul>\n</div>\n",
                escape_html(category),
                items
            )
        })
        .collect();

    format!("<div class=\"settings-grid\">\n{cards}</div>")
}

pub fn health(snapshot: &HealthSnapshot, offset: &FixedOffset) -> String {
    let class = if snapshot.status == "healthy" {
        "healthy"
    } else {
        "unhealthy"
    };
    let model = &snapshot.model_status;
    let storage = &snapshot.storage;

    format!(
        r#"<div class="health-status {class}">
<h3>System Health</h3>
<p>Status: {status}</p>
<div class="health-details">
<h4>Model Status</h4>
<ul>
<li>Drift Detected: {drift}</li>
<li>Last Calibration: {calibration}</li>
<li>Performance Samples: {samples}</li>
</ul>
<h4>Storage Status</h4>
<ul>
<li>Consent Records: {consents}</li>
<li>Monitoring Data: {monitoring}</li>
</ul>
</div>
</div>"#,
        status = escape_html(&snapshot.status),
        drift = if model.drift_detected { "Yes" } else { "No" },
        calibration = escape_html(&time::display_datetime(&model.last_calibration, offset)),
        samples = model.performance_samples,
        consents = storage.consent_records,
        monitoring = if storage.monitoring_data {
            "Available"
        } else {
            "Missing"
        },
    )
}
