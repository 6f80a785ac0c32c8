//! Batch orchestration: filter, group, scan, enrich, collect.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::geolocation::GeoEnricher;
use crate::models::{Alert, LogEvent};

use super::BruteForceDetector;

/// Group failed-login timestamps by source IP.
///
/// Keeps every timestamp, in arrival order; the pipeline sorts each
/// group before window evaluation so unordered input is handled
/// deterministically.
pub fn group_failed_logins(events: &[LogEvent]) -> HashMap<String, Vec<DateTime<Utc>>> {
    let mut by_ip: HashMap<String, Vec<DateTime<Utc>>> = HashMap::new();

    for event in events.iter().filter(|e| e.is_failed_login()) {
        by_ip
            .entry(event.source_ip.clone())
            .or_default()
            .push(event.timestamp);
    }

    by_ip
}

/// One batch detection run over a fully loaded event collection.
///
/// Alert order follows map iteration over source IPs and is not
/// specified. Enrichment failures are embedded in the alert, never
/// retried or escalated.
pub struct DetectionPipeline {
    detector: BruteForceDetector,
    enricher: GeoEnricher,
}

impl DetectionPipeline {
    pub fn new(detector: BruteForceDetector, enricher: GeoEnricher) -> Self {
        DetectionPipeline { detector, enricher }
    }

    pub fn run(&mut self, events: &[LogEvent]) -> Vec<Alert> {
        let by_ip = group_failed_logins(events);
        log::info!(
            "Scanning {} source IP(s) across {} event(s)",
            by_ip.len(),
            events.len()
        );

        let mut alerts = Vec::new();
        for (source_ip, mut timestamps) in by_ip {
            timestamps.sort();

            if let Some(mut alert) = self.detector.scan(&source_ip, &timestamps) {
                log::warn!(
                    "Brute-force pattern from {}: {} failed attempt(s) between {} and {}",
                    alert.source_ip,
                    alert.failed_attempts,
                    alert.start_time,
                    alert.end_time
                );
                alert.location = Some(self.enricher.enrich(&alert.source_ip));
                alerts.push(alert);
            }
        }

        alerts
    }
}
