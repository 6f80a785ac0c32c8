//! Sliding-window rate limiting for the GeoIP lookups.
//!
//! The window trails the current instant continuously; it is not a
//! per-minute bucket. Only granted calls are recorded, so a burst of
//! denials never pushes the window further out.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Trailing interval over which grants are counted.
const WINDOW: Duration = Duration::from_secs(60);

/// Bounds how many external lookups may be granted per trailing minute.
///
/// Owns its own grant history so independent instances can coexist;
/// single-threaded use only. A concurrent caller would need the
/// evict/check/record sequence below held under one lock.
#[derive(Debug)]
pub struct LookupRateLimiter {
    /// Instants of previously granted calls, oldest first.
    granted: VecDeque<Instant>,
    max_per_minute: usize,
}

impl LookupRateLimiter {
    pub fn new(max_per_minute: usize) -> Self {
        LookupRateLimiter {
            granted: VecDeque::new(),
            max_per_minute,
        }
    }

    /// Ask for a permit now. Returns true and records the grant if the
    /// trailing minute still has capacity; a denial is not recorded.
    pub fn allow(&mut self) -> bool {
        self.allow_at(Instant::now())
    }

    /// Clock-injected variant of [`allow`](Self::allow); `now` must not
    /// move backwards across calls.
    pub fn allow_at(&mut self, now: Instant) -> bool {
        while let Some(&oldest) = self.granted.front() {
            if now.duration_since(oldest) > WINDOW {
                self.granted.pop_front();
            } else {
                break;
            }
        }

        if self.granted.len() < self.max_per_minute {
            self.granted.push_back(now);
            true
        } else {
            false
        }
    }

    /// Grants currently inside the trailing window (as of the last call).
    pub fn granted_in_window(&self) -> usize {
        self.granted.len()
    }
}
