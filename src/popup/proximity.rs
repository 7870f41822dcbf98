// SPDX-License-Identifier: GPL-3.0-only

//! Pointer proximity tracking for the unpinned popup.
//!
//! While the popup is transient it grabs all pointer motion on the desktop to
//! decide when the user's attention has left it:
//!
//! - Pointer inside the popup: it has been "entered", the grab is released
//!   and the window's own enter/leave events take over.
//! - Pointer outside a 60px slack around a never-entered popup: hide at once.
//! - Pointer outside the bare frame of an entered popup: start the 400ms hide
//!   countdown so brief excursions (e.g. into a dropdown) survive.
//!
//! The grab is an explicit resource ([`PointerGrab`]) that is acquired and
//! released through the window; it must be released before anything else may
//! grab the pointer.

use std::time::{Duration, Instant};

use crate::app_settings::{HIDE_DELAY_MS, PROXIMITY_RADIUS};
use crate::host::PopupWindow;
use crate::popup::countdown::Countdown;
use crate::popup::geometry::{Point, Rect};

/// Snapshot of the tracker state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProximityState {
    /// The pointer has been inside the popup since it was shown.
    pub entered_once: bool,
    /// Desktop-wide pointer motion is being intercepted.
    pub intercepting: bool,
    /// The hide countdown is running.
    pub hide_countdown_active: bool,
}

/// What a pointer motion event meant for the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityVerdict {
    /// Nothing changed.
    Ignored,
    /// The pointer reached the popup; the grab has been released.
    Entered,
    /// The pointer left a never-entered popup: hide now.
    HideNow,
    /// The pointer strayed from an entered popup: the countdown started.
    CountdownStarted,
}

/// Desktop-wide pointer grab with explicit acquire/release.
#[derive(Debug, Default)]
pub struct PointerGrab {
    held: bool,
}

impl PointerGrab {
    /// Grabs the pointer if not already held.
    pub fn acquire(&mut self, window: &mut impl PopupWindow) {
        if !self.held {
            window.grab_pointer();
            self.held = true;
            tracing::debug!("Pointer grabbed");
        }
    }

    /// Releases the pointer if held.
    pub fn release(&mut self, window: &mut impl PopupWindow) {
        if self.held {
            window.release_pointer();
            self.held = false;
            tracing::debug!("Pointer released");
        }
    }

    /// Returns `true` while the grab is held.
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held
    }
}

/// Decides when the pointer has left the transient popup.
#[derive(Debug)]
pub struct MouseProximityTracker {
    entered_once: bool,
    grab: PointerGrab,
    hide_countdown: Countdown,
}

impl Default for MouseProximityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseProximityTracker {
    /// Creates an idle tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entered_once: false,
            grab: PointerGrab::default(),
            hide_countdown: Countdown::new(Duration::from_millis(HIDE_DELAY_MS)),
        }
    }

    /// Starts tracking a freshly shown popup.
    pub fn begin(&mut self, window: &mut impl PopupWindow) {
        self.entered_once = false;
        self.hide_countdown.cancel();
        self.grab.acquire(window);
    }

    /// Resumes tracking a popup the user has already engaged with.
    pub fn resume(&mut self, window: &mut impl PopupWindow) {
        self.entered_once = true;
        self.grab.acquire(window);
    }

    /// Stops tracking: releases the grab and cancels the countdown.
    pub fn end(&mut self, window: &mut impl PopupWindow) {
        self.grab.release(window);
        self.hide_countdown.cancel();
    }

    /// Handles desktop-wide pointer motion while intercepting.
    ///
    /// # Arguments
    ///
    /// * `position` - Pointer position in desktop coordinates
    /// * `target_is_popup` - No child surface absorbed the event, i.e. nothing
    ///   of ours other than the popup itself is under the cursor
    /// * `geometry` - The popup's client area
    /// * `frame` - The popup's frame including decorations
    pub fn on_motion(
        &mut self,
        window: &mut impl PopupWindow,
        position: Point,
        target_is_popup: bool,
        geometry: Rect,
        frame: Rect,
        now: Instant,
    ) -> ProximityVerdict {
        if !self.grab.is_held() {
            return ProximityVerdict::Ignored;
        }

        if geometry.contains(position) {
            self.hide_countdown.cancel();
            self.entered_once = true;
            self.grab.release(window);
            return ProximityVerdict::Entered;
        }

        let radius = if self.entered_once { 0 } else { PROXIMITY_RADIUS };
        if !target_is_popup || frame.expanded(radius).contains(position) {
            return ProximityVerdict::Ignored;
        }

        if self.entered_once {
            self.hide_countdown.start(now);
            ProximityVerdict::CountdownStarted
        } else {
            ProximityVerdict::HideNow
        }
    }

    /// The popup's own leave event.
    ///
    /// Starts the countdown unless the pointer is still inside (e.g. over an
    /// unfolded combo box) or a button is held (the popup is being dragged).
    pub fn on_leave(&mut self, cursor_inside: bool, buttons_pressed: bool, now: Instant) {
        if !cursor_inside && !buttons_pressed {
            self.hide_countdown.start(now);
        }
    }

    /// The popup's own enter event.
    pub fn on_enter(&mut self) {
        // The first entry is detected through the grab
        if self.entered_once {
            self.hide_countdown.cancel();
        }
    }

    /// Stops the hide countdown.
    pub fn cancel_countdown(&mut self) {
        self.hide_countdown.cancel();
    }

    /// Fires the hide countdown if due.
    pub fn countdown_elapsed(&mut self, now: Instant) -> bool {
        self.hide_countdown.fire_due(now)
    }

    /// When the hide countdown fires, if running.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.hide_countdown.deadline()
    }

    /// Returns `true` while pointer motion is intercepted.
    #[must_use]
    pub fn is_intercepting(&self) -> bool {
        self.grab.is_held()
    }

    /// Current tracker state.
    #[must_use]
    pub fn state(&self) -> ProximityState {
        ProximityState {
            entered_once: self.entered_once,
            intercepting: self.grab.is_held(),
            hide_countdown_active: self.hide_countdown.is_active(),
        }
    }
}
