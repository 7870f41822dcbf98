// SPDX-License-Identifier: GPL-3.0-only

//! The popup window's behaviour.
//!
//! - `geometry`: points, sizes and rectangles in desktop pixels
//! - `placement`: where a freshly shown popup lands, and title elision
//! - `countdown`: restartable one-shot deadline
//! - `proximity`: pointer grab and departure detection for the transient popup
//! - `lifecycle`: the Hidden / Transient / Pinned state machine

pub mod countdown;
pub mod geometry;
pub mod lifecycle;
pub mod placement;
pub mod proximity;

pub use lifecycle::{PopupLifecycle, PopupState};
pub use placement::{compute_position, elide};
pub use proximity::{MouseProximityTracker, PointerGrab, ProximityState, ProximityVerdict};
