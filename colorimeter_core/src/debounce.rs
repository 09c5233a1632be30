//! Minimum-interval filter for button presses.

use std::time::{Duration, Instant};

/// Accepts a press only when at least `interval` has passed since the last
/// accepted one. Rejected presses do not move the timestamp.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    interval: Duration,
    last_accepted: Instant,
}

impl Debouncer {
    /// `start` counts as an accepted press, so nothing gets through during
    /// the first `interval` after power-up.
    pub fn new(interval: Duration, start: Instant) -> Self {
        Self {
            interval,
            last_accepted: start,
        }
    }

    pub fn accept(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_accepted) >= self.interval {
            self.last_accepted = now;
            true
        } else {
            false
        }
    }
}
