// SPDX-License-Identifier: GPL-3.0-only

//! Popup placement next to the cursor and display elision of looked-up words.
//!
//! Each axis is decided on its own and the results are combined:
//!
//! - Horizontal: right of the cursor, else left of it, else centered on screen.
//! - Vertical: below the cursor, else above it, else centered on screen.

use crate::app_settings::{CURSOR_GAP_X, CURSOR_GAP_Y, ELIDE_LENGTH, ELLIPSIS};
use crate::popup::geometry::{Point, Rect, Size};

/// Computes where a freshly shown popup should land.
///
/// # Arguments
///
/// * `cursor` - Current pointer position
/// * `popup` - Size of the popup window
/// * `screen` - Geometry of the screen the cursor is on
#[must_use]
pub fn compute_position(cursor: Point, popup: Size, screen: Rect) -> Point {
    let x = if cursor.x + CURSOR_GAP_X + popup.width <= screen.right() {
        cursor.x + CURSOR_GAP_X
    } else if cursor.x - CURSOR_GAP_X - popup.width >= screen.x {
        cursor.x - CURSOR_GAP_X - popup.width
    } else {
        screen.x + (screen.width - popup.width) / 2
    };

    let y = if cursor.y + CURSOR_GAP_Y + popup.height <= screen.bottom() {
        cursor.y + CURSOR_GAP_Y
    } else if cursor.y - CURSOR_GAP_Y - popup.height >= screen.y {
        cursor.y - CURSOR_GAP_Y - popup.height
    } else {
        screen.y + (screen.height - popup.height) / 2
    };

    Point::new(x, y)
}

/// Shortens overly long words so labels and titles don't stretch the window.
///
/// Words of up to 32 characters are returned unchanged; longer ones keep their
/// first 32 characters followed by `...`.
#[must_use]
pub fn elide(word: &str) -> String {
    match word.char_indices().nth(ELIDE_LENGTH) {
        Some((cut, _)) => format!("{}{}", &word[..cut], ELLIPSIS),
        None => word.to_string(),
    }
}
