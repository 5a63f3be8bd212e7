//! Profile view model and its text rendering.

use chrono::FixedOffset;

use crate::api::types::{ActivityRecord, UserStats};
use crate::utils::time;

/// What the profile section shows: the raw token plus the last stats that
/// loaded successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub token: String,
    pub stats: Option<StatsSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    pub total_comparisons: u64,
    pub successful: u64,
    pub unsuccessful: u64,
    /// One decimal place, no `%` sign.
    pub success_rate: String,
    /// Backend order, unsorted.
    pub activity: Vec<ActivityRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRow {
    pub timestamp: String,
    pub matched: bool,
    /// One decimal place, no `%` sign.
    pub confidence: String,
}

impl ActivityRow {
    fn from_record(record: &ActivityRecord, offset: &FixedOffset) -> Self {
        Self {
            timestamp: time::display_datetime(&record.timestamp, offset),
            matched: record.match_result,
            confidence: format!("{:.1}", record.confidence.unwrap_or(0.0)),
        }
    }

    pub fn label(&self) -> &'static str {
        if self.matched { "Match" } else { "No Match" }
    }
}

impl StatsSummary {
    pub fn from_stats(stats: &UserStats, offset: &FixedOffset) -> Self {
        Self {
            total_comparisons: stats.total_comparisons,
            successful: stats.successful,
            unsuccessful: stats.unsuccessful,
            success_rate: success_rate(stats.successful, stats.total_comparisons),
            activity: stats
                .recent_activity
                .iter()
                .map(|record| ActivityRow::from_record(record, offset))
                .collect(),
        }
    }
}

/// `successful / total × 100` to one decimal; `"0.0"` when total is zero.
pub fn success_rate(successful: u64, total: u64) -> String {
    if total == 0 {
        return "0.0".to_string();
    }
    format!("{:.1}", successful as f64 / total as f64 * 100.0)
}

/// Render the profile section as plain text.
pub fn render_profile(view: &ProfileView) -> String {
    let mut out = String::new();
    out.push_str(&format!("Token: {}\n\n", view.token));

    out.push_str("Statistics\n");
    match &view.stats {
        Some(stats) => {
            out.push_str(&format!("  Total comparisons: {}\n", stats.total_comparisons));
            out.push_str(&format!("  Successful:        {}\n", stats.successful));
            out.push_str(&format!("  Unsuccessful:      {}\n", stats.unsuccessful));
            out.push_str(&format!("  Success rate:      {}%\n", stats.success_rate));
            out.push('\n');
            out.push_str(&render_activity(&stats.activity));
        }
        None => out.push_str("  Not loaded\n"),
    }

    out
}

fn render_activity(rows: &[ActivityRow]) -> String {
    let mut out = String::from("Recent activity\n");
    if rows.is_empty() {
        out.push_str("  No recent activity\n");
        return out;
    }
    for row in rows {
        out.push_str(&format!(
            "  {}  {} ({}%)\n",
            row.timestamp,
            row.label(),
            row.confidence
        ));
    }
    out
}
