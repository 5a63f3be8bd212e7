//! Request and response bodies of the backend endpoints.
//!
//! Only the fields this client reads are modelled; unknown fields are
//! ignored. Values the dashboard shows verbatim are kept as
//! [`serde_json::Value`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Read an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Body of `POST /auth/register`. No client-side validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone: String,
    pub purpose: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Success body of `POST /auth/register`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body shared by every endpoint: `{"error": "..."}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// User stats
// ---------------------------------------------------------------------------

/// `GET /user/stats`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserStats {
    #[serde(deserialize_with = "null_as_default")]
    pub total_comparisons: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub successful: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub unsuccessful: u64,
    /// Newest-first as the backend orders it.
    #[serde(deserialize_with = "null_as_default")]
    pub recent_activity: Vec<ActivityRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityRecord {
    pub timestamp: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub match_result: bool,
    /// 0–100.
    #[serde(default)]
    pub confidence: Option<f64>,
}

// ---------------------------------------------------------------------------
// Monitoring
// ---------------------------------------------------------------------------

/// `GET /monitoring/performance`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PerformanceReport {
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: Vec<PerformanceLogEntry>,
    #[serde(default)]
    pub drift_status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub calibration_needed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceLogEntry {
    pub timestamp: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
    /// Seconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub processing_time: f64,
}

/// `GET /model/card`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelCard {
    pub model_details: ModelDetails,
    pub metrics: ModelMetrics,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModelDetails {
    pub name: Value,
    pub version: Value,
    pub description: Value,
    pub model_architecture: Value,
    pub backend: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelMetrics {
    pub quality_threshold: QualityThreshold,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QualityThreshold {
    pub brightness: Value,
    pub contrast: Value,
    pub resolution: Value,
}

/// `GET /consent/logs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsentLog {
    #[serde(default, deserialize_with = "null_as_default")]
    pub records: Vec<ConsentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub user_id: String,
    pub consent_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub purpose: String,
    /// Days.
    #[serde(default, deserialize_with = "null_as_default")]
    pub retention_period: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub revoked: bool,
}

/// `GET /system/settings`: category → key → value, in backend order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SystemSettings(pub Map<String, Value>);

/// `GET /system/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthSnapshot {
    pub status: String,
    pub model_status: ModelStatus,
    pub storage: StorageStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModelStatus {
    #[serde(deserialize_with = "null_as_default")]
    pub drift_detected: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub last_calibration: String,
    #[serde(deserialize_with = "null_as_default")]
    pub performance_samples: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageStatus {
    #[serde(deserialize_with = "null_as_default")]
    pub consent_records: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub monitoring_data: bool,
}

/// Render a JSON value the way string interpolation would: strings without
/// quotes, `null` as empty, everything else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
