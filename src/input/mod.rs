pub mod log_file;

pub use log_file::{load_events, parse_timestamp, InputError, TIMESTAMP_FORMAT};
