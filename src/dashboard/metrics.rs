//! Performance summary: latest sample and series averages.

use crate::api::types::{PerformanceLogEntry, PerformanceReport};

/// Numeric field of a performance log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogField {
    Confidence,
    ProcessingTime,
}

impl LogField {
    pub fn value(self, entry: &PerformanceLogEntry) -> f64 {
        match self {
            Self::Confidence => entry.confidence,
            Self::ProcessingTime => entry.processing_time,
        }
    }
}

/// Arithmetic mean of `field` over `logs`; `0.0` for an empty slice.
pub fn calculate_average(logs: &[PerformanceLogEntry], field: LogField) -> f64 {
    if logs.is_empty() {
        return 0.0;
    }
    let sum: f64 = logs.iter().map(|entry| field.value(entry)).sum();
    sum / logs.len() as f64
}

/// Summary block shown above the performance charts.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSummary {
    pub latest_confidence: Option<f64>,
    pub latest_processing_time: Option<f64>,
    pub average_confidence: f64,
    pub average_processing_time: f64,
    pub samples: usize,
    pub drift_status: Option<String>,
    pub calibration_needed: bool,
}

impl PerformanceSummary {
    pub fn from_report(report: &PerformanceReport) -> Self {
        let latest = report.logs.last();
        Self {
            latest_confidence: latest.map(|e| e.confidence),
            latest_processing_time: latest.map(|e| e.processing_time),
            average_confidence: calculate_average(&report.logs, LogField::Confidence),
            average_processing_time: calculate_average(&report.logs, LogField::ProcessingTime),
            samples: report.logs.len(),
            drift_status: report.drift_status.clone(),
            calibration_needed: report.calibration_needed,
        }
    }
}
