// SPDX-License-Identifier: GPL-3.0-only

//! Restartable single-shot countdown driven by explicit timestamps.

use std::time::{Duration, Instant};

/// A single-shot timer that fires once its deadline has passed.
///
/// Starting an already running countdown pushes its deadline out again.
#[derive(Debug, Clone)]
pub struct Countdown {
    duration: Duration,
    deadline: Option<Instant>,
}

impl Countdown {
    /// Creates a stopped countdown with the given duration.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            deadline: None,
        }
    }

    /// Starts (or restarts) the countdown from `now`.
    pub fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.duration);
    }

    /// Stops the countdown without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` while the countdown is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.deadline.is_some()
    }

    /// The instant at which the countdown fires, if running.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fires the countdown if its deadline has passed.
    ///
    /// Returns `true` exactly once per start.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
