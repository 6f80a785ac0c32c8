pub mod config;
pub mod detection;
pub mod geolocation;
pub mod input;
pub mod models;
pub mod output;
pub mod ratelimit;

// Re-export commonly used types
pub use config::Config;
pub use detection::{BruteForceDetector, DetectionPipeline};
pub use geolocation::{GeoEnricher, GeoIpService, GeoResolver};
pub use models::{Alert, Location, LogEvent};
pub use output::{AlertWriter, OutputFormat};
pub use ratelimit::LookupRateLimiter;
