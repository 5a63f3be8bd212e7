//! Client diagnostics log.
//!
//! Appends one line per event to `~/.facewatch/client.log`:
//! `<rfc3339 timestamp> <LEVEL> <message>`. Best-effort; failures are
//! silently ignored. Until [`init`] runs, every call is a no-op.

use std::fmt;
use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};

use crate::config::schema::LoggingConfig;

static SINK: OnceLock<LogSink> = OnceLock::new();

#[derive(Debug)]
struct LogSink {
    path: Option<PathBuf>,
    echo_stderr: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Configure the log sink. Only the first call takes effect.
pub fn init(config: &LoggingConfig) {
    let path = if config.enabled {
        config.log_path()
    } else {
        None
    };
    let _ = SINK.set(LogSink {
        path,
        echo_stderr: config.echo_stderr,
    });
}

pub fn debug(message: &str) {
    write_event(Level::Debug, message);
}

pub fn info(message: &str) {
    write_event(Level::Info, message);
}

pub fn warn(message: &str) {
    write_event(Level::Warn, message);
}

pub fn error(message: &str) {
    write_event(Level::Error, message);
}

/// Format a single log line (no trailing newline).
pub fn format_line(at: DateTime<Utc>, level: Level, message: &str) -> String {
    let flat = message.replace(['\r', '\n'], " ");
    format!("{} {} {}", at.to_rfc3339(), level, flat)
}

fn write_event(level: Level, message: &str) {
    let Some(sink) = SINK.get() else {
        return;
    };

    let line = format_line(Utc::now(), level, message);

    if sink.echo_stderr {
        eprintln!("{line}");
    }

    let Some(path) = &sink.path else {
        return;
    };

    if let Some(parent) = path.parent()
        && create_dir_all(parent).is_err()
    {
        return;
    }

    let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };

    let _ = writeln!(file, "{line}");
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn format_line_has_timestamp_level_message() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let line = format_line(at, Level::Warn, "health fetch failed");
        assert_eq!(line, "2024-03-01T12:00:00+00:00 WARN health fetch failed");
    }

    #[test]
    fn format_line_flattens_newlines() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let line = format_line(at, Level::Error, "first\nsecond\r\nthird");
        assert!(line.ends_with("ERROR first second  third"));
    }

    #[test]
    fn logging_before_init_is_a_noop() {
        // Must not panic or create files when no sink is configured.
        info("nothing configured");
    }
}
