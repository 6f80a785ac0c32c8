use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A brute-force alert for one source IP.
///
/// Field names are the stable output contract; downstream tooling
/// consumes the serialized form directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub source_ip: String,
    pub failed_attempts: usize,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Enrichment outcome; attached by the pipeline after detection.
    pub location: Option<Location>,
}

/// Outcome of a geolocation enrichment attempt.
///
/// Serialized untagged so the output carries exactly one of the three
/// shapes: `{country, city, latitude, longitude}`, `{error}`, or `{note}`.
/// Variant order matters for deserialization: the keyed failure shapes
/// must be tried before the all-optional resolved shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Location {
    Failed {
        error: String,
    },
    RateLimited {
        note: String,
    },
    Resolved {
        country: Option<String>,
        city: Option<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    },
}

impl Location {
    /// Note attached when the lookup rate limiter denies a call.
    pub fn rate_limited() -> Self {
        Location::RateLimited {
            note: "Rate limit exceeded".to_string(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Location::Failed {
            error: message.into(),
        }
    }
}
