// SPDX-License-Identifier: GPL-3.0-only

//! Show/hide/pin state machine of the popup window.
//!
//! ```text
//!            engage (unpinned)             pin on
//!  Hidden ───────────────────▶ Transient ─────────▶ Pinned
//!    ▲   ╲                       │   ▲     pin off    │
//!    │    ╲ engage (pinned)      │   └────────────────┘
//!    │     ╲─────────────────────┼──────────────────▶ │
//!    └───── hide ◀───────────────┴────────────────────┘
//! ```
//!
//! Hide happens on an elapsed hide countdown, on escape (when the content view
//! has no search to close) and on a press outside the frame. Pinning never
//! passes through `Hidden`.

use std::time::Instant;

use crate::host::{CursorShape, Decoration, Desktop, PopupWindow};
use crate::popup::geometry::Point;
use crate::popup::placement::compute_position;
use crate::popup::proximity::{MouseProximityTracker, ProximityState, ProximityVerdict};

/// Visibility state of the popup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PopupState {
    /// Not shown.
    #[default]
    Hidden,
    /// Shown, dismissed automatically when the pointer leaves.
    ShowingTransient,
    /// Shown as a normal framed window until the user closes it.
    ShowingPinned,
}

/// Drives the popup window through its states.
#[derive(Debug)]
pub struct PopupLifecycle {
    state: PopupState,
    /// State of the pin toggle; may be set while hidden.
    pinned: bool,
    transient_decoration: Decoration,
    proximity: MouseProximityTracker,
    /// Last pointer position of a manual drag.
    drag_origin: Option<Point>,
    cursor: CursorShape,
}

impl PopupLifecycle {
    /// Creates a hidden popup using `transient_decoration` while unpinned.
    #[must_use]
    pub fn new(transient_decoration: Decoration) -> Self {
        Self {
            state: PopupState::Hidden,
            pinned: false,
            transient_decoration,
            proximity: MouseProximityTracker::new(),
            drag_origin: None,
            cursor: CursorShape::Arrow,
        }
    }

    /// Applies the initial decoration to a new window.
    pub fn attach(&self, window: &mut impl PopupWindow) {
        window.set_decoration(self.decoration());
    }

    /// Shows the popup, or refreshes it if it is already visible.
    ///
    /// A hidden, unpinned popup is placed next to the cursor and starts
    /// tracking the pointer. An already visible popup stays where it is; a
    /// pinned one is raised since it isn't kept on top.
    pub fn engage<H>(&mut self, host: &mut H, give_focus: bool)
    where
        H: PopupWindow + Desktop,
    {
        match self.state {
            PopupState::Hidden => {
                if !self.pinned {
                    let position = compute_position(
                        host.cursor_position(),
                        host.geometry().size(),
                        host.screen_geometry(),
                    );
                    host.move_to(position);
                }

                host.show();
                if give_focus {
                    host.raise_and_activate();
                }

                if self.pinned {
                    self.state = PopupState::ShowingPinned;
                } else {
                    self.proximity.begin(host);
                    self.state = PopupState::ShowingTransient;
                }
                tracing::debug!("Popup shown ({:?})", self.state);
            }
            PopupState::ShowingPinned => {
                host.show();
                host.raise_and_activate();
            }
            PopupState::ShowingTransient => {}
        }
        self.debug_check();
    }

    /// Handles the pin toggle.
    ///
    /// `title` is used as the framed window's title when pinning.
    pub fn set_pinned(&mut self, window: &mut impl PopupWindow, pinned: bool, title: &str) {
        if self.pinned == pinned {
            return;
        }
        self.pinned = pinned;
        window.set_decoration(self.decoration());

        match (self.state, pinned) {
            (PopupState::ShowingTransient, true) => {
                self.proximity.end(window);
                window.set_title(title);
                window.show();
                self.state = PopupState::ShowingPinned;
                tracing::debug!("Popup pinned");
            }
            (PopupState::ShowingPinned, false) => {
                // The user is clearly engaged, so skip the never-entered slack
                self.proximity.resume(window);
                window.show();
                self.state = PopupState::ShowingTransient;
                tracing::debug!("Popup unpinned");
            }
            (PopupState::Hidden, true) => window.set_title(title),
            _ => {}
        }
        self.debug_check();
    }

    /// Hides the popup and releases everything tied to it being shown.
    pub fn hide(&mut self, window: &mut impl PopupWindow) {
        self.proximity.end(window);
        self.drag_origin = None;
        self.set_cursor(window, CursorShape::Arrow);

        if self.state != PopupState::Hidden {
            window.hide();
            self.state = PopupState::Hidden;
            tracing::debug!("Popup hidden");
        }
        self.debug_check();
    }

    /// Handles pointer motion, both desktop-wide (while intercepting) and
    /// over the popup.
    pub fn pointer_moved<H>(
        &mut self,
        host: &mut H,
        position: Point,
        target_is_popup: bool,
        now: Instant,
    ) where
        H: PopupWindow + Desktop,
    {
        if self.state == PopupState::Hidden {
            return;
        }

        if let Some(origin) = self.drag_origin {
            if self.cursor == CursorShape::ClosedHand && host.buttons_pressed() {
                let delta = position - origin;
                self.drag_origin = Some(position);
                let frame = host.frame_geometry();
                host.move_to(frame.origin() + delta);
                return;
            }
        }

        let geometry = host.geometry();
        let frame = host.frame_geometry();
        let verdict =
            self.proximity
                .on_motion(host, position, target_is_popup, geometry, frame, now);
        if verdict == ProximityVerdict::HideNow {
            tracing::debug!("Pointer moved away from untouched popup");
            self.hide(host);
        }
    }

    /// Handles a pointer press anywhere on the desktop.
    ///
    /// A press outside the frame dismisses the popup; one inside starts a
    /// manual drag.
    pub fn pointer_pressed(&mut self, window: &mut impl PopupWindow, position: Point) {
        if self.state == PopupState::Hidden {
            return;
        }

        if !window.frame_geometry().contains(position) {
            tracing::debug!("Press outside popup");
            self.hide(window);
            return;
        }

        self.drag_origin = Some(position);
        self.set_cursor(window, CursorShape::ClosedHand);
    }

    /// Handles a pointer release.
    pub fn pointer_released(&mut self, window: &mut impl PopupWindow) {
        self.drag_origin = None;
        self.set_cursor(window, CursorShape::Arrow);
    }

    /// Handles the popup's own leave event.
    pub fn pointer_left<H>(&mut self, host: &H, now: Instant)
    where
        H: PopupWindow + Desktop,
    {
        if self.state != PopupState::ShowingTransient {
            return;
        }
        let cursor_inside = host.geometry().contains(host.cursor_position());
        self.proximity
            .on_leave(cursor_inside, host.buttons_pressed(), now);
    }

    /// Handles the popup's own enter event.
    pub fn pointer_entered(&mut self) {
        self.proximity.on_enter();
    }

    /// Hides the popup if the hide countdown has elapsed.
    ///
    /// Returns `true` if the popup was hidden.
    pub fn tick(&mut self, window: &mut impl PopupWindow, now: Instant) -> bool {
        if self.proximity.countdown_elapsed(now) && self.is_visible() {
            tracing::debug!("Hide countdown elapsed");
            self.hide(window);
            return true;
        }
        false
    }

    /// When [`tick`](Self::tick) next has work.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.proximity.next_deadline()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> PopupState {
        self.state
    }

    /// Returns `true` in either showing state.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state != PopupState::Hidden
    }

    /// State of the pin toggle.
    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Pointer tracking state.
    #[must_use]
    pub fn proximity(&self) -> ProximityState {
        self.proximity.state()
    }

    /// Current pointer cursor over the popup.
    #[must_use]
    pub fn cursor(&self) -> CursorShape {
        self.cursor
    }

    fn decoration(&self) -> Decoration {
        if self.pinned {
            Decoration::Framed
        } else {
            self.transient_decoration
        }
    }

    fn set_cursor(&mut self, window: &mut impl PopupWindow, cursor: CursorShape) {
        if self.cursor != cursor {
            self.cursor = cursor;
            window.set_cursor(cursor);
        }
    }

    fn debug_check(&self) {
        debug_assert!(
            !self.proximity.is_intercepting() || self.state == PopupState::ShowingTransient,
            "Pointer grab held outside the transient state"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::popup::geometry::{Rect, Size};
    use crate::testing::FakeHost;
    use std::time::Duration;

    fn shown(host: &mut FakeHost) -> PopupLifecycle {
        let mut lifecycle = PopupLifecycle::new(Decoration::Popup);
        lifecycle.engage(host, false);
        lifecycle
    }

    #[test]
    fn test_engage_from_hidden_places_and_intercepts() {
        let mut host = FakeHost::new();
        host.cursor = Point::new(100, 100);
        let lifecycle = shown(&mut host);

        assert_eq!(lifecycle.state(), PopupState::ShowingTransient);
        assert_eq!(host.window_origin(), Point::new(104, 115));
        assert!(host.visible);
        assert!(host.pointer_grabbed);
        assert_eq!(host.raise_count, 0);
        assert_eq!(
            lifecycle.proximity(),
            ProximityState {
                entered_once: false,
                intercepting: true,
                hide_countdown_active: false
            }
        );
    }

    #[test]
    fn test_engage_with_focus_raises() {
        let mut host = FakeHost::new();
        let mut lifecycle = PopupLifecycle::new(Decoration::Popup);
        lifecycle.engage(&mut host, true);
        assert_eq!(host.raise_count, 1);
    }

    #[test]
    fn test_reengage_does_not_move() {
        let mut host = FakeHost::new();
        host.cursor = Point::new(100, 100);
        let mut lifecycle = shown(&mut host);

        host.cursor = Point::new(900, 700);
        lifecycle.engage(&mut host, false);
        assert_eq!(host.window_origin(), Point::new(104, 115));
        assert_eq!(host.move_count, 1);
    }

    #[test]
    fn test_engage_pinned_from_hidden_skips_placement_and_grab() {
        let mut host = FakeHost::new();
        let mut lifecycle = PopupLifecycle::new(Decoration::Popup);
        lifecycle.set_pinned(&mut host, true, "word");
        lifecycle.engage(&mut host, false);

        assert_eq!(lifecycle.state(), PopupState::ShowingPinned);
        assert_eq!(host.move_count, 0);
        assert!(!host.pointer_grabbed);
        assert_eq!(host.decoration, Some(Decoration::Framed));
    }

    #[test]
    fn test_reengage_pinned_raises() {
        let mut host = FakeHost::new();
        let mut lifecycle = PopupLifecycle::new(Decoration::Popup);
        lifecycle.set_pinned(&mut host, true, "word");
        lifecycle.engage(&mut host, false);
        lifecycle.engage(&mut host, false);

        assert_eq!(host.raise_count, 1);
        assert_eq!(host.move_count, 0);
    }

    #[test]
    fn test_pin_stops_interception_without_hiding() {
        let mut host = FakeHost::new();
        let mut lifecycle = shown(&mut host);
        let hides_before = host.hide_count;

        lifecycle.set_pinned(&mut host, true, "ephemeral");

        assert_eq!(lifecycle.state(), PopupState::ShowingPinned);
        assert!(!host.pointer_grabbed);
        assert!(host.visible);
        assert_eq!(host.hide_count, hides_before);
        assert_eq!(host.title, "ephemeral");
        assert_eq!(host.decoration, Some(Decoration::Framed));
        assert!(!lifecycle.proximity().hide_countdown_active);
    }

    #[test]
    fn test_unpin_restores_decoration_and_marks_entered() {
        let t0 = Instant::now();
        let mut host = FakeHost::new();
        let mut lifecycle = PopupLifecycle::new(Decoration::ToolOnTop);
        lifecycle.engage(&mut host, false);
        lifecycle.set_pinned(&mut host, true, "word");
        lifecycle.set_pinned(&mut host, false, "word");

        assert_eq!(lifecycle.state(), PopupState::ShowingTransient);
        assert_eq!(host.decoration, Some(Decoration::ToolOnTop));
        assert!(lifecycle.proximity().entered_once);
        assert!(lifecycle.proximity().intercepting);

        // Just past the frame: grace period rather than an instant hide
        let frame = host.frame_geometry();
        let outside = Point::new(frame.right() + 1, frame.y + 10);
        lifecycle.pointer_moved(&mut host, outside, true, t0);
        assert_eq!(lifecycle.state(), PopupState::ShowingTransient);
        assert!(lifecycle.proximity().hide_countdown_active);

        assert!(!lifecycle.tick(&mut host, t0 + Duration::from_millis(399)));
        assert!(lifecycle.tick(&mut host, t0 + Duration::from_millis(400)));
        assert_eq!(lifecycle.state(), PopupState::Hidden);
    }

    #[test]
    fn test_moving_far_away_before_entry_hides() {
        let t0 = Instant::now();
        let mut host = FakeHost::new();
        let mut lifecycle = shown(&mut host);

        let frame = host.frame_geometry();
        let far = Point::new(frame.right() + 61, frame.y);
        lifecycle.pointer_moved(&mut host, far, true, t0);

        assert_eq!(lifecycle.state(), PopupState::Hidden);
        assert!(!host.pointer_grabbed);
        assert!(!host.visible);
    }

    #[test]
    fn test_leave_and_reenter() {
        let t0 = Instant::now();
        let mut host = FakeHost::new();
        let mut lifecycle = shown(&mut host);

        let inside = host.geometry().origin() + Point::new(5, 5);
        lifecycle.pointer_moved(&mut host, inside, true, t0);
        assert!(lifecycle.proximity().entered_once);
        assert!(!host.pointer_grabbed);

        host.cursor = Point::new(0, 0);
        lifecycle.pointer_left(&host, t0);
        assert!(lifecycle.proximity().hide_countdown_active);

        lifecycle.pointer_entered();
        assert!(!lifecycle.proximity().hide_countdown_active);
        assert!(!lifecycle.tick(&mut host, t0 + Duration::from_secs(1)));
        assert!(lifecycle.is_visible());
    }

    #[test]
    fn test_leave_while_pinned_is_ignored() {
        let t0 = Instant::now();
        let mut host = FakeHost::new();
        let mut lifecycle = shown(&mut host);
        lifecycle.set_pinned(&mut host, true, "word");

        host.cursor = Point::new(0, 0);
        lifecycle.pointer_left(&host, t0);
        assert!(!lifecycle.proximity().hide_countdown_active);
    }

    #[test]
    fn test_press_outside_hides() {
        let mut host = FakeHost::new();
        let mut lifecycle = shown(&mut host);
        lifecycle.set_pinned(&mut host, true, "word");

        lifecycle.pointer_pressed(&mut host, Point::new(-50, -50));
        assert_eq!(lifecycle.state(), PopupState::Hidden);
    }

    #[test]
    fn test_drag_moves_window_by_delta() {
        let t0 = Instant::now();
        let mut host = FakeHost::new();
        host.window = Rect::new(0, 0, 300, 200);
        host.cursor = Point::new(10, 10);
        let mut lifecycle = shown(&mut host);
        let start = host.window_origin();

        let grip = start + Point::new(20, 20);
        lifecycle.pointer_moved(&mut host, grip, true, t0);
        lifecycle.pointer_pressed(&mut host, grip);
        assert_eq!(host.cursor_shape, CursorShape::ClosedHand);

        host.buttons = true;
        lifecycle.pointer_moved(&mut host, grip + Point::new(30, -5), true, t0);
        lifecycle.pointer_moved(&mut host, grip + Point::new(40, 5), true, t0);
        assert_eq!(host.window_origin(), start + Point::new(40, 5));

        host.buttons = false;
        lifecycle.pointer_released(&mut host);
        assert_eq!(host.cursor_shape, CursorShape::Arrow);
        assert_eq!(lifecycle.state(), PopupState::ShowingTransient);
    }

    #[test]
    fn test_hide_is_idempotent_and_releases_grab() {
        let mut host = FakeHost::new();
        let mut lifecycle = shown(&mut host);

        lifecycle.hide(&mut host);
        lifecycle.hide(&mut host);

        assert_eq!(host.hide_count, 1);
        assert_eq!(host.release_count, 1);
        assert!(!host.pointer_grabbed);
    }

    #[test]
    fn test_countdown_after_hide_does_nothing() {
        let t0 = Instant::now();
        let mut host = FakeHost::new();
        host.window = Rect::from_parts(Point::new(0, 0), Size::new(300, 200));
        let mut lifecycle = shown(&mut host);
        host.cursor = Point::new(-100, -100);
        lifecycle.pointer_left(&host, t0);
        lifecycle.hide(&mut host);

        assert_eq!(lifecycle.next_deadline(), None);
        assert!(!lifecycle.tick(&mut host, t0 + Duration::from_secs(1)));
    }
}
