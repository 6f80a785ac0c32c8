//! Attaches a location to each alert, gated by the lookup rate limiter.

use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;

use crate::models::Location;
use crate::ratelimit::LookupRateLimiter;

use super::GeoResolver;

/// Wraps a [`GeoResolver`] behind the rate limiter and converts every
/// outcome into a [`Location`] variant. Lookup failures are recoverable
/// per alert and never abort the run.
pub struct GeoEnricher {
    resolver: Arc<dyn GeoResolver>,
    limiter: LookupRateLimiter,
}

impl GeoEnricher {
    pub fn new(resolver: Arc<dyn GeoResolver>, limiter: LookupRateLimiter) -> Self {
        GeoEnricher { resolver, limiter }
    }

    /// Resolve the location for one source IP.
    ///
    /// The limiter is consulted before the address is even parsed: a
    /// denied call performs no external work and yields the `note`
    /// variant. Malformed addresses and database misses come back as
    /// the `error` variant.
    pub fn enrich(&mut self, source_ip: &str) -> Location {
        if !self.limiter.allow() {
            return Location::rate_limited();
        }

        let ip = match IpAddr::from_str(source_ip) {
            Ok(ip) => ip,
            Err(_) => {
                log::debug!("Cannot geolocate malformed address {:?}", source_ip);
                return Location::failed(format!("invalid IP address: {}", source_ip));
            }
        };

        match self.resolver.resolve(ip) {
            Ok(record) => Location::Resolved {
                country: record.country,
                city: record.city,
                latitude: record.latitude,
                longitude: record.longitude,
            },
            Err(e) => {
                log::debug!("GeoIP lookup failed for {}: {}", source_ip, e);
                Location::failed(e.to_string())
            }
        }
    }
}
