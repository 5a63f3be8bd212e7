//! Typed client for the face-comparison backend.
//!
//! [`BackendClient`] maps each endpoint to a method returning the decoded
//! body or an [`ApiError`]. Non-2xx answers become
//! [`ApiError::Application`] carrying the body's `error` field; a non-2xx
//! answer whose body is not JSON is a [`ApiError::Decode`].
//!
//! | Endpoint | Method |
//! |---|---|
//! | `POST /auth/login` | [`BackendClient::login`] |
//! | `POST /auth/register` | [`BackendClient::register`] |
//! | `GET /user/stats` | [`BackendClient::user_stats`] |
//! | `GET /monitoring/performance` | [`BackendClient::performance`] |
//! | `GET /model/card` | [`BackendClient::model_card`] |
//! | `GET /consent/logs` | [`BackendClient::consent_logs`] |
//! | `GET /system/settings` | [`BackendClient::settings`] |
//! | `GET /system/health` | [`BackendClient::health`] |

pub mod error;
pub mod transport;
pub mod types;

use std::sync::Arc;

use serde::de::DeserializeOwned;

pub use error::ApiError;
pub use transport::{HttpRequest, HttpResponse, Method, Transport, UreqTransport};
use types::{
    ConsentLog, Credentials, ErrorBody, HealthSnapshot, LoginResponse, ModelCard,
    PerformanceReport, RegisterResponse, Registration, SystemSettings, UserStats,
};

use crate::config::schema::BackendConfig;

/// Cheaply cloneable backend client; clones share one transport.
#[derive(Clone)]
pub struct BackendClient {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient").finish_non_exhaustive()
    }
}

impl BackendClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Build a client over a `ureq` transport from the resolved config.
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(Arc::new(UreqTransport::from_config(config)))
    }

    pub fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let body = serde_json::to_string(credentials)?;
        self.send_json(&HttpRequest::post_json("/auth/login", body))
    }

    pub fn register(&self, registration: &Registration) -> Result<RegisterResponse, ApiError> {
        let body = serde_json::to_string(registration)?;
        self.send_json(&HttpRequest::post_json("/auth/register", body))
    }

    /// `GET /user/stats`. The token goes in `Authorization` as-is, without a
    /// `Bearer` scheme.
    pub fn user_stats(&self, token: &str) -> Result<UserStats, ApiError> {
        self.send_json(&HttpRequest::get("/user/stats").with_header("Authorization", token))
    }

    pub fn performance(&self) -> Result<PerformanceReport, ApiError> {
        self.send_json(&HttpRequest::get("/monitoring/performance"))
    }

    pub fn model_card(&self) -> Result<ModelCard, ApiError> {
        self.send_json(&HttpRequest::get("/model/card"))
    }

    pub fn consent_logs(&self) -> Result<ConsentLog, ApiError> {
        self.send_json(&HttpRequest::get("/consent/logs"))
    }

    pub fn settings(&self) -> Result<SystemSettings, ApiError> {
        self.send_json(&HttpRequest::get("/system/settings"))
    }

    pub fn health(&self) -> Result<HealthSnapshot, ApiError> {
        self.send_json(&HttpRequest::get("/system/health"))
    }

    fn send_json<T: DeserializeOwned>(&self, request: &HttpRequest) -> Result<T, ApiError> {
        let response = self.transport.send(request)?;
        decode_response(&response)
    }
}

/// Decode a success body, or turn a failure body into an application error.
fn decode_response<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    if response.is_success() {
        return Ok(serde_json::from_str(&response.body)?);
    }

    let error: ErrorBody = serde_json::from_str(&response.body)?;
    Err(ApiError::Application {
        status: response.status,
        message: error.error,
    })
}
