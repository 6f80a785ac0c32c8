pub mod alert;
pub mod event;

pub use alert::{Alert, Location};
pub use event::LogEvent;
