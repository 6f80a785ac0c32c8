pub mod brute_force;
pub mod pipeline;

pub use brute_force::BruteForceDetector;
pub use pipeline::{group_failed_logins, DetectionPipeline};
