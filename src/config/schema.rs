//! Configuration schema and defaults for facewatch.
//!
//! Defines the TOML-serializable configuration structure with all sections:
//! `[backend]`, `[session]`, `[polling]`, `[web]`, and `[logging]`.
//!
//! Every field has a sensible built-in default. Users only need to set the
//! values they want to override.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level facewatch configuration.
///
/// Maps directly to the `~/.facewatch/config.toml` and `.facewatch.toml` file
/// schemas. All sections and fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacewatchConfig {
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub polling: PollingConfig,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [backend]
// ---------------------------------------------------------------------------

/// Where the face-comparison backend lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
    /// Per-request timeout (milliseconds).
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

// ---------------------------------------------------------------------------
// [session]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Token file path. Empty means `~/.facewatch/session.json`.
    pub token_file: String,
}

impl SessionConfig {
    /// Resolve the token file path, falling back to the home directory.
    pub fn token_path(&self) -> Option<PathBuf> {
        if self.token_file.is_empty() {
            dirs::home_dir().map(|home| home.join(".facewatch").join("session.json"))
        } else {
            Some(PathBuf::from(&self.token_file))
        }
    }
}

// ---------------------------------------------------------------------------
// [polling]
// ---------------------------------------------------------------------------

/// Timer periods for the two surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Dashboard refresh period for performance and health (milliseconds).
    pub dashboard_interval_ms: u64,
    /// Profile refresh period in `profile --watch` (seconds).
    pub profile_interval_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            dashboard_interval_ms: 1000,
            profile_interval_secs: 30,
        }
    }
}

impl PollingConfig {
    pub fn dashboard_interval(&self) -> Duration {
        Duration::from_millis(self.dashboard_interval_ms.max(1))
    }

    pub fn profile_interval(&self) -> Duration {
        Duration::from_secs(self.profile_interval_secs.max(1))
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Bind address for the embedded dashboard server.
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9747".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Client diagnostics log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// Log file path. Empty means `~/.facewatch/client.log`.
    pub file: String,
    /// Mirror every log line to stderr.
    pub echo_stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: String::new(),
            echo_stderr: false,
        }
    }
}

impl LoggingConfig {
    pub fn log_path(&self) -> Option<PathBuf> {
        if self.file.is_empty() {
            dirs::home_dir().map(|home| home.join(".facewatch").join("client.log"))
        } else {
            Some(PathBuf::from(&self.file))
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl FacewatchConfig {
    /// The annotated config written by `facewatch config init`.
    pub fn default_toml() -> String {
        r#"# facewatch Configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (FACEWATCH_*)
#   2. Project config (.facewatch.toml in current directory)
#   3. User global config (~/.facewatch/config.toml)
#   4. Built-in defaults

[backend]
base_url = "http://localhost:5000"
timeout_ms = 10000

[session]
token_file = ""                # empty = ~/.facewatch/session.json

[polling]
dashboard_interval_ms = 1000   # performance + health refresh
profile_interval_secs = 30     # profile --watch refresh

[web]
addr = "127.0.0.1:9747"
open_browser = true

[logging]
enabled = true
file = ""                      # empty = ~/.facewatch/client.log
echo_stderr = false            # or FACEWATCH_DEBUG=1
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
