// SPDX-License-Identifier: GPL-3.0-only

//! Bounded wait for a modifier press ("alt mode").
//!
//! When gating rejects a word, alt mode keeps polling the modifiers for a
//! limited time so the user can press them shortly after hovering. The wait
//! has two parts scheduled together:
//!
//! - an expiration deadline, firing once after the configured window
//! - a poll, firing every 50ms until stopped
//!
//! Expiration only stops the polling. What happens on a poll (commit, stop,
//! keep going) is up to the caller.

use std::time::{Duration, Instant};

use crate::app_settings::ALT_MODE_POLL_INTERVAL_MS;

/// What a due alt-mode timer asks the caller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltModeFire {
    /// Re-check the modifiers.
    Poll,
    /// The window is over; polling has been stopped.
    Expired,
}

/// Cancellable wait with a deadline and a poll interval.
#[derive(Debug, Clone)]
pub struct AltModeTimer {
    poll_interval: Duration,
    expires_at: Option<Instant>,
    next_poll: Option<Instant>,
}

impl Default for AltModeTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl AltModeTimer {
    /// Creates an idle timer polling every 50ms once started.
    #[must_use]
    pub fn new() -> Self {
        Self {
            poll_interval: Duration::from_millis(ALT_MODE_POLL_INTERVAL_MS),
            expires_at: None,
            next_poll: None,
        }
    }

    /// Starts (or restarts) both the expiration and the polling.
    pub fn start(&mut self, now: Instant, window: Duration) {
        self.expires_at = Some(now + window);
        self.next_poll = Some(now + self.poll_interval);
        tracing::debug!("Alt mode armed for {}ms", window.as_millis());
    }

    /// Stops both timers.
    pub fn cancel(&mut self) {
        if self.is_armed() || self.is_polling() {
            tracing::debug!("Alt mode cancelled");
        }
        self.expires_at = None;
        self.next_poll = None;
    }

    /// Returns `true` while modifiers are being polled.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.next_poll.is_some()
    }

    /// Returns `true` while the expiration deadline has not fired.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.expires_at.is_some()
    }

    /// The earliest instant at which [`fire_due`](Self::fire_due) has work.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.expires_at, self.next_poll) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fires the earliest due timer, if any.
    ///
    /// Call repeatedly until it returns `None`. A poll and an expiration due
    /// at the same instant fire poll first. A late poll is rescheduled one
    /// interval after `now` rather than replaying missed ticks. Once `now` is
    /// past the expiration no poll fires, so modifiers pressed after the
    /// window closed never count.
    pub fn fire_due(&mut self, now: Instant) -> Option<AltModeFire> {
        let poll_due = self.next_poll.filter(|at| *at <= now);
        let expiry_due = self.expires_at.filter(|at| *at <= now);

        match (poll_due, expiry_due) {
            (_, Some(expiry)) if expiry < now => self.expire(),
            (Some(poll), _) => {
                let mut next = poll + self.poll_interval;
                if next <= now {
                    next = now + self.poll_interval;
                }
                self.next_poll = Some(next);
                Some(AltModeFire::Poll)
            }
            (None, Some(_)) => self.expire(),
            (None, None) => None,
        }
    }

    fn expire(&mut self) -> Option<AltModeFire> {
        tracing::debug!("Alt mode window expired");
        self.expires_at = None;
        self.next_poll = None;
        Some(AltModeFire::Expired)
    }
}
