//! IP geolocation using the MaxMind GeoLite2-City database.
//!
//! The database file must be downloaded separately from MaxMind (free
//! with registration). The reader is opened once at startup and closed
//! when the service is dropped, so its lifetime brackets the whole run.

pub mod enricher;

use maxminddb::{geoip2, Reader};
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

pub use enricher::GeoEnricher;

/// Errors from opening the database or resolving an address.
///
/// Only the open-time errors are fatal to a run; per-address failures
/// are folded into the alert by the enricher.
#[derive(Error, Debug)]
pub enum GeoError {
    #[error("failed to open GeoIP database: {0}")]
    Database(#[from] maxminddb::MaxMindDBError),

    #[error("GeoIP database file not found: {0}")]
    FileNotFound(String),

    #[error("address not found in GeoIP database")]
    NotFound,

    #[error("invalid IP address: {0}")]
    InvalidAddress(String),
}

/// City-level record extracted from a successful lookup.
///
/// Every field is optional; GeoLite2 frequently knows the country but
/// not the city, or coordinates without either name.
#[derive(Debug, Clone, PartialEq)]
pub struct CityRecord {
    pub country: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Seam for the enricher: anything that can turn an IP into a city
/// record. Lets tests substitute a canned resolver for the real
/// database file.
pub trait GeoResolver: Send + Sync {
    fn resolve(&self, ip: IpAddr) -> Result<CityRecord, GeoError>;
}

/// GeoIP lookup service backed by a GeoLite2-City database file.
pub struct GeoIpService {
    reader: Arc<Reader<Vec<u8>>>,
}

impl GeoIpService {
    /// Open a MaxMind database file. Fails fast if the file is missing
    /// or not a valid database; this aborts the run before any alert
    /// output is written.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, GeoError> {
        let path = db_path.as_ref();
        if !path.exists() {
            return Err(GeoError::FileNotFound(path.display().to_string()));
        }

        let reader = Reader::open_readfile(path)?;
        Ok(GeoIpService {
            reader: Arc::new(reader),
        })
    }
}

impl GeoResolver for GeoIpService {
    fn resolve(&self, ip: IpAddr) -> Result<CityRecord, GeoError> {
        let record: geoip2::City = self.reader.lookup(ip).map_err(|e| match e {
            maxminddb::MaxMindDBError::AddressNotFoundError(_) => GeoError::NotFound,
            other => GeoError::Database(other),
        })?;

        let (latitude, longitude) = record
            .location
            .map(|l| (l.latitude, l.longitude))
            .unwrap_or((None, None));

        Ok(CityRecord {
            country: record
                .country
                .and_then(|c| c.names)
                .and_then(|n| n.get("en").copied())
                .map(String::from),
            city: record
                .city
                .and_then(|c| c.names)
                .and_then(|n| n.get("en").copied())
                .map(String::from),
            latitude,
            longitude,
        })
    }
}

impl Clone for GeoIpService {
    fn clone(&self) -> Self {
        GeoIpService {
            reader: Arc::clone(&self.reader),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    // Lookups against a real database run only when a GeoLite2-City.mmdb
    // file is present; the file cannot be redistributed with the repo.

    fn get_test_service() -> Option<GeoIpService> {
        let paths = [
            "GeoLite2-City.mmdb",
            "../GeoLite2-City.mmdb",
            "assets/GeoLite2-City.mmdb",
        ];

        paths.iter().find_map(|p| GeoIpService::new(p).ok())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = GeoIpService::new("nonexistent.mmdb");
        assert!(matches!(result, Err(GeoError::FileNotFound(_))));
    }

    #[test]
    fn test_private_address_not_found() {
        if let Some(service) = get_test_service() {
            let private = IpAddr::from_str("192.168.1.1").unwrap();
            assert!(matches!(service.resolve(private), Err(GeoError::NotFound)));
        }
    }

    #[test]
    fn test_public_address_has_plausible_coordinates() {
        if let Some(service) = get_test_service() {
            let dns = IpAddr::from_str("8.8.8.8").unwrap();
            if let Ok(record) = service.resolve(dns) {
                if let (Some(lat), Some(lon)) = (record.latitude, record.longitude) {
                    assert!((-90.0..=90.0).contains(&lat));
                    assert!((-180.0..=180.0).contains(&lon));
                }
            }
        }
    }

    #[test]
    fn test_clone_shares_reader() {
        if let Some(service) = get_test_service() {
            let cloned = service.clone();
            let ip = IpAddr::from_str("8.8.8.8").unwrap();
            let _ = service.resolve(ip);
            let _ = cloned.resolve(ip);
        }
    }
}
