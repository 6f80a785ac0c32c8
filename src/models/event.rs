use chrono::{DateTime, Utc};

/// A single authentication event parsed from the input log.
///
/// Only events with `event_type == "failed_login"` participate in
/// brute-force aggregation; everything else is carried through parsing
/// and dropped by the pipeline filter.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub event_type: String,
    pub source_ip: String,
    pub timestamp: DateTime<Utc>,
}

impl LogEvent {
    /// Event type that counts toward a brute-force window.
    pub const FAILED_LOGIN: &'static str = "failed_login";

    pub fn is_failed_login(&self) -> bool {
        self.event_type == Self::FAILED_LOGIN
    }
}
