//! Configuration system for facewatch.
//!
//! Provides a layered configuration hierarchy:
//!
//! 1. **Built-in defaults**: hardcoded in [`schema::FacewatchConfig::default()`]
//! 2. **User global config**: `~/.facewatch/config.toml`
//! 3. **Project local config**: `.facewatch.toml` in the current working directory
//! 4. **Environment variables**: `FACEWATCH_*` overrides (highest precedence)
//!
//! Later layers override earlier ones. Missing sections in a TOML file fall
//! back to the built-in defaults.
//!
//! # Usage
//!
//! ```rust,ignore
//! use facewatch::config;
//!
//! let cfg = config::load();
//! let client = BackendClient::from_config(&cfg.backend);
//! ```
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::FacewatchConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved facewatch configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars.
pub fn load() -> FacewatchConfig {
    let mut config = FacewatchConfig::default();

    if let Some(global) = load_toml_file(global_config_path()) {
        config = global;
    }

    if let Some(project) = load_toml_file(project_config_path()) {
        config = project;
    }

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed.
fn load_toml_file(path: Option<PathBuf>) -> Option<FacewatchConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.facewatch/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".facewatch").join("config.toml"))
}

/// Path to the project local config: `.facewatch.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".facewatch.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// `lookup` resolves a variable name to its value; [`load`] passes
/// `std::env::var`. Supported variables:
/// - `FACEWATCH_BACKEND_URL`: backend base URL
/// - `FACEWATCH_TIMEOUT_MS`: per-request timeout
/// - `FACEWATCH_TOKEN_FILE`: session token file
/// - `FACEWATCH_DASHBOARD_INTERVAL_MS`: dashboard refresh period
/// - `FACEWATCH_PROFILE_INTERVAL_SECS`: profile refresh period
/// - `FACEWATCH_WEB_ADDR`: dashboard bind address
/// - `FACEWATCH_OPEN_BROWSER`: open the dashboard in a browser
/// - `FACEWATCH_LOG`: file logging on/off
/// - `FACEWATCH_DEBUG`: echo log lines to stderr
pub fn apply_env_overrides(config: &mut FacewatchConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("FACEWATCH_BACKEND_URL")
        && !val.is_empty()
    {
        config.backend.base_url = val;
    }
    if let Some(val) = lookup("FACEWATCH_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.backend.timeout_ms = ms;
    }
    if let Some(val) = lookup("FACEWATCH_TOKEN_FILE")
        && !val.is_empty()
    {
        config.session.token_file = val;
    }
    if let Some(val) = lookup("FACEWATCH_DASHBOARD_INTERVAL_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.polling.dashboard_interval_ms = ms;
    }
    if let Some(val) = lookup("FACEWATCH_PROFILE_INTERVAL_SECS")
        && let Ok(secs) = val.parse::<u64>()
    {
        config.polling.profile_interval_secs = secs;
    }
    if let Some(val) = lookup("FACEWATCH_WEB_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
    if let Some(val) = lookup("FACEWATCH_OPEN_BROWSER") {
        config.web.open_browser = is_truthy(&val);
    }
    if let Some(val) = lookup("FACEWATCH_LOG") {
        config.logging.enabled = is_truthy(&val);
    }
    if let Some(val) = lookup("FACEWATCH_DEBUG") {
        config.logging.echo_stderr = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
pub fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.facewatch/config.toml`.
///
/// Returns an error if the file already exists (use `force = true` to
/// overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.facewatch/ directory")?;
    }

    fs::write(&path, FacewatchConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Supports dotted keys like `backend.base_url`. When the file does not exist
/// yet, the defaults are written out first and then updated.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&FacewatchConfig::default())
            .context("failed to serialize default config")?
    };

    let updated = update_toml_text(&content, key, value)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, updated).context("failed to write config file")?;

    Ok(())
}

/// Apply one dotted-key update to TOML text and return the re-serialized text.
fn update_toml_text(content: &str, key: &str, value: &str) -> Result<String> {
    let mut root: toml::Value =
        toml::from_str(content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;
    toml::to_string_pretty(&root).context("failed to serialize config")
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// The new value takes the type of the value it replaces.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let Some((sections, leaf)) = key.rsplit_once('.') else {
        anyhow::bail!("config key must be dotted, e.g. backend.base_url: '{key}'");
    };

    let mut current = root;
    for part in sections.split('.') {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table at '{sections}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("unknown config key: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("YES"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn env_overrides_replace_backend_and_polling() {
        let mut config = FacewatchConfig::default();
        apply_env_overrides(
            &mut config,
            env_of(&[
                ("FACEWATCH_BACKEND_URL", "http://backend:5000"),
                ("FACEWATCH_TIMEOUT_MS", "2500"),
                ("FACEWATCH_DASHBOARD_INTERVAL_MS", "250"),
                ("FACEWATCH_DEBUG", "1"),
            ]),
        );

        assert_eq!(config.backend.base_url, "http://backend:5000");
        assert_eq!(config.backend.timeout_ms, 2500);
        assert_eq!(config.polling.dashboard_interval_ms, 250);
        assert!(config.logging.echo_stderr);
    }

    #[test]
    fn env_overrides_ignore_invalid_numbers_and_empty_strings() {
        let mut config = FacewatchConfig::default();
        apply_env_overrides(
            &mut config,
            env_of(&[
                ("FACEWATCH_TIMEOUT_MS", "soon"),
                ("FACEWATCH_BACKEND_URL", ""),
            ]),
        );

        assert_eq!(config.backend.timeout_ms, 10_000);
        assert_eq!(config.backend.base_url, "http://localhost:5000");
    }

    #[test]
    fn set_toml_value_updates_string() {
        let mut root: toml::Value = toml::from_str(
            r#"
[backend]
base_url = "http://localhost:5000"
"#,
        )
        .unwrap();
        set_toml_value(&mut root, "backend.base_url", "http://10.1.1.1:5000").unwrap();
        assert_eq!(
            root["backend"]["base_url"].as_str(),
            Some("http://10.1.1.1:5000")
        );
    }

    #[test]
    fn set_toml_value_keeps_integer_and_bool_types() {
        let mut root: toml::Value = toml::from_str(
            r#"
[polling]
dashboard_interval_ms = 1000

[web]
open_browser = true
"#,
        )
        .unwrap();
        set_toml_value(&mut root, "polling.dashboard_interval_ms", "500").unwrap();
        set_toml_value(&mut root, "web.open_browser", "off").unwrap();

        assert_eq!(root["polling"]["dashboard_interval_ms"].as_integer(), Some(500));
        assert_eq!(root["web"]["open_browser"].as_bool(), Some(false));
    }

    #[test]
    fn set_toml_value_rejects_bad_input() {
        let mut root: toml::Value = toml::from_str(
            r#"
[polling]
dashboard_interval_ms = 1000
"#,
        )
        .unwrap();
        assert!(set_toml_value(&mut root, "polling.dashboard_interval_ms", "fast").is_err());
        assert!(set_toml_value(&mut root, "nonexistent.key", "value").is_err());
        assert!(set_toml_value(&mut root, "polling.unknown", "1").is_err());
        assert!(set_toml_value(&mut root, "polling", "1").is_err());
    }

    #[test]
    fn update_toml_text_round_trips_through_schema() {
        let defaults = toml::to_string_pretty(&FacewatchConfig::default()).unwrap();
        let updated = update_toml_text(&defaults, "web.addr", "0.0.0.0:8080").unwrap();
        let config: FacewatchConfig = toml::from_str(&updated).unwrap();
        assert_eq!(config.web.addr, "0.0.0.0:8080");
        assert_eq!(config.backend.timeout_ms, 10_000);
    }
}
