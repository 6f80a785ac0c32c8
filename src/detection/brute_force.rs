//! Sliding-window brute-force detection.
//!
//! Scans one source IP's chronologically sorted failed-login instants
//! with a deque-backed sliding window and raises an alert the first
//! time the window holds at least `threshold` attempts.

use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;

use crate::models::Alert;

/// Detects brute-force login patterns in a sorted timeline.
#[derive(Debug, Clone)]
pub struct BruteForceDetector {
    /// Minimum failed attempts inside the window to raise an alert.
    threshold: usize,
    /// Maximum span between the oldest and newest attempt in a window.
    window: Duration,
}

impl BruteForceDetector {
    pub fn new(threshold: usize, window: Duration) -> Self {
        BruteForceDetector { threshold, window }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Scan a source IP's failed-login timeline for a brute-force burst.
    ///
    /// `timestamps` must be sorted in non-decreasing order; the caller
    /// sorts after grouping. Returns at most one alert: scanning stops
    /// at the first window that reaches the threshold, so later disjoint
    /// bursts from the same IP within one run are not reported.
    /// The returned alert carries no location; enrichment attaches it.
    pub fn scan(&self, source_ip: &str, timestamps: &[DateTime<Utc>]) -> Option<Alert> {
        let mut window: VecDeque<DateTime<Utc>> = VecDeque::new();

        for &ts in timestamps {
            window.push_back(ts);

            // Evict everything that can no longer share a window with `ts`.
            while let Some(&oldest) = window.front() {
                if ts - oldest > self.window {
                    window.pop_front();
                } else {
                    break;
                }
            }

            if window.len() >= self.threshold {
                return Some(Alert {
                    source_ip: source_ip.to_string(),
                    failed_attempts: window.len(),
                    start_time: *window.front().expect("window is non-empty"),
                    end_time: ts,
                    location: None,
                });
            }
        }

        None
    }
}
