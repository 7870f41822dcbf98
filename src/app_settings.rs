// SPDX-License-Identifier: GPL-3.0-only

//! Centralized application settings and constants.

/// Application ID in RDNN (reverse domain name notation) format.
pub const APP_ID: &str = "io.github.cosdict.Cosdict";

/// D-Bus well-known name and interface of the popup service.
pub const DBUS_INTERFACE: &str = "io.github.cosdict.ScanPopup";

/// D-Bus object path of the popup service.
pub const DBUS_PATH: &str = "/io/github/cosdict/ScanPopup";

/// Default popup width in pixels.
pub const DEFAULT_WIDTH: i32 = 480;

/// Default popup height in pixels.
pub const DEFAULT_HEIGHT: i32 = 360;

// ============================================================================
// Timing
// ============================================================================

/// Grace period before a departed pointer hides the popup, in milliseconds.
pub const HIDE_DELAY_MS: u64 = 400;

/// Interval between modifier polls while alt mode waits, in milliseconds.
pub const ALT_MODE_POLL_INTERVAL_MS: u64 = 50;

/// Default alt-mode window, in milliseconds.
pub const DEFAULT_ALT_MODE_WINDOW_MS: u64 = 3000;

// ============================================================================
// Placement
// ============================================================================

/// Horizontal gap between the cursor and the popup.
pub const CURSOR_GAP_X: i32 = 4;

/// Vertical gap between the cursor and the popup.
pub const CURSOR_GAP_Y: i32 = 15;

/// Slack around the popup frame tolerated before the pointer first enters it.
pub const PROXIMITY_RADIUS: i32 = 60;

// ============================================================================
// Display limits
// ============================================================================

/// Words longer than this are elided in labels and titles.
pub const ELIDE_LENGTH: usize = 32;

/// Marker appended to elided words.
pub const ELLIPSIS: &str = "...";

/// Maximum number of entries in the "more results" menu.
pub const WORD_MENU_CAP: usize = 40;

/// Results longer than this are left out of the "more results" menu.
pub const WORD_MENU_MAX_ENTRY_LENGTH: usize = 64;

/// Maximum number of history entries kept on disk.
pub const HISTORY_CAPACITY: usize = 256;

/// History file name inside the user state directory.
pub const HISTORY_FILE_NAME: &str = "history.json";
