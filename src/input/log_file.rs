//! Batch loader for the JSON authentication log.
//!
//! The input is a single JSON document with a top-level `logs` array.
//! Each entry must carry `event_type`, `source_ip`, and a `timestamp`
//! in the fixed `YYYY-MM-DDTHH:MM:SSZ` format; extra fields are ignored.
//! Any unreadable file, malformed document, or unparseable timestamp
//! aborts the load before detection starts.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::models::LogEvent;

/// Fixed timestamp format for log entries.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Errors raised while loading the authentication log. All are fatal
/// for the run; there is no per-entry skip.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read log file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed log document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

#[derive(Debug, Deserialize)]
struct LogDocument {
    #[serde(default)]
    logs: Vec<RawLogEntry>,
}

#[derive(Debug, Deserialize)]
struct RawLogEntry {
    event_type: String,
    source_ip: String,
    timestamp: String,
}

/// Parse a timestamp in the fixed log format into UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, InputError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| InputError::Timestamp {
            value: value.to_string(),
            source,
        })
}

/// Load and parse all events from a JSON log file.
pub fn load_events<P: AsRef<Path>>(path: P) -> Result<Vec<LogEvent>, InputError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let document: LogDocument = serde_json::from_str(&raw)?;

    let mut events = Vec::with_capacity(document.logs.len());
    for entry in document.logs {
        let timestamp = parse_timestamp(&entry.timestamp)?;
        events.push(LogEvent {
            event_type: entry.event_type,
            source_ip: entry.source_ip,
            timestamp,
        });
    }

    log::info!("Loaded {} event(s) from {}", events.len(), path.display());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_log(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("2024-03-01T12:30:45Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-01T12:30:45+00:00");
    }

    #[test]
    fn test_parse_timestamp_rejects_other_formats() {
        assert!(parse_timestamp("2024-03-01 12:30:45").is_err());
        assert!(parse_timestamp("not a timestamp").is_err());
    }

    #[test]
    fn test_load_events() {
        let file = write_log(
            r#"{"logs": [
                {"event_type": "failed_login", "source_ip": "1.2.3.4", "timestamp": "2024-03-01T12:00:00Z", "user": "alice"},
                {"event_type": "login", "source_ip": "5.6.7.8", "timestamp": "2024-03-01T12:00:05Z"}
            ]}"#,
        );

        let events = load_events(file.path()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].source_ip, "1.2.3.4");
        assert!(events[0].is_failed_login());
        assert!(!events[1].is_failed_login());
    }

    #[test]
    fn test_missing_logs_key_is_empty() {
        let file = write_log(r#"{"metadata": {}}"#);
        let events = load_events(file.path()).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_bad_timestamp_is_fatal() {
        let file = write_log(
            r#"{"logs": [
                {"event_type": "failed_login", "source_ip": "1.2.3.4", "timestamp": "garbage"}
            ]}"#,
        );

        let result = load_events(file.path());
        assert!(matches!(result, Err(InputError::Timestamp { .. })));
    }

    #[test]
    fn test_malformed_document_is_fatal() {
        let file = write_log(r#"{"logs": [{"event_type": 42}]}"#);
        assert!(matches!(
            load_events(file.path()),
            Err(InputError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let result = load_events("no-such-log-file.json");
        assert!(matches!(result, Err(InputError::Read { .. })));
    }
}
