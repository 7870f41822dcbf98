// SPDX-License-Identifier: GPL-3.0-only

//! Collaborator interfaces the popup core drives.
//!
//! The core never talks to a windowing toolkit, a dictionary engine or a
//! history database directly. Everything it needs from the outside world goes
//! through the traits in this module, bundled together by [`Host`]:
//!
//! - [`Desktop`]: live pointer, screen and modifier state
//! - [`PopupWindow`]: the popup surface itself
//! - [`ContentView`]: the embedded definition viewer
//! - [`WordMatcher`]: the asynchronous prefix matcher
//! - [`HistoryStore`]: the lookup history

use serde::{Deserialize, Serialize};

use crate::history::{HistoryItem, HistoryResult};
use crate::input::ModifierGate;
use crate::lookup::{GroupId, MatchRequest};
use crate::popup::geometry::{Point, Rect, Size};

/// Window decoration applied to the popup surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decoration {
    /// Auto-dismissing popup surface.
    Popup,
    /// Borderless always-on-top tool window.
    ToolOnTop,
    /// Normal framed window with a title bar (used while pinned).
    Framed,
}

/// Pointer cursor shown over the popup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CursorShape {
    /// Regular pointer.
    #[default]
    Arrow,
    /// Closed hand, shown while the popup is being dragged.
    ClosedHand,
}

/// State of the small controls around the definition view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupControls {
    /// Compact label holding the (elided) looked-up word.
    pub word_label: String,
    /// Whether the pronounce button is shown.
    pub pronounce_visible: bool,
    /// Whether the "more results" button is shown.
    pub word_list_visible: bool,
    /// Tooltip of the "more results" button.
    pub word_list_tooltip: String,
    /// Error reported by the matcher, shown as an indicator with tooltip.
    pub query_error: Option<String>,
    /// Whether the dictionary group selector is shown.
    pub group_selector_visible: bool,
}

/// Live desktop state the core queries when making decisions.
pub trait Desktop: ModifierGate {
    /// Current pointer position in desktop coordinates.
    fn cursor_position(&self) -> Point;

    /// Geometry of the screen the pointer is on.
    fn screen_geometry(&self) -> Rect;

    /// Returns `true` if any pointer button is held down.
    fn buttons_pressed(&self) -> bool;
}

/// The popup surface.
pub trait PopupWindow {
    /// Client-area geometry.
    fn geometry(&self) -> Rect;

    /// Geometry including decorations.
    fn frame_geometry(&self) -> Rect;

    /// Maps the window.
    fn show(&mut self);

    /// Unmaps the window.
    fn hide(&mut self);

    /// Moves the window's top-left corner.
    fn move_to(&mut self, position: Point);

    /// Resizes the window.
    fn resize(&mut self, size: Size);

    /// Raises the window and gives it keyboard focus.
    fn raise_and_activate(&mut self);

    /// Switches the window decoration.
    fn set_decoration(&mut self, decoration: Decoration);

    /// Sets the title shown by framed windows.
    fn set_title(&mut self, title: &str);

    /// Changes the pointer cursor over the window.
    fn set_cursor(&mut self, cursor: CursorShape);

    /// Starts receiving all pointer motion on the desktop.
    fn grab_pointer(&mut self);

    /// Stops receiving pointer motion outside the window.
    fn release_pointer(&mut self);

    /// Refreshes the controls around the definition view.
    fn update_controls(&mut self, controls: &PopupControls);

    /// Opens the "more results" menu below its button.
    ///
    /// The choice comes back later as a separate event.
    fn show_word_menu(&mut self, entries: &[String]);
}

/// The embedded definition viewer.
pub trait ContentView {
    /// Renders the definition of `word` using dictionaries of `group`.
    fn show_definition(&mut self, word: &str, group: GroupId);

    /// Plays the pronunciation of the current article.
    fn play_sound(&mut self);

    /// Returns `true` if the current article has a pronunciation.
    fn has_sound(&self) -> bool;

    /// Closes the in-article search bar.
    ///
    /// Returns `true` if there was a search to close.
    fn close_search(&mut self) -> bool;

    /// Applies a zoom factor to the rendered article.
    fn set_zoom_factor(&mut self, zoom: f64);
}

/// The asynchronous prefix matcher.
pub trait WordMatcher {
    /// Starts a prefix match. The outcome is delivered later as a message.
    fn prefix_match(&mut self, request: MatchRequest);
}

/// The lookup history.
pub trait HistoryStore {
    /// Records a lookup.
    fn add_item(&mut self, item: HistoryItem);

    /// Persists the history.
    fn save(&mut self) -> HistoryResult<()>;
}

/// Everything the popup core needs from its environment.
pub trait Host: Desktop + PopupWindow + ContentView + WordMatcher + HistoryStore {}

impl<T> Host for T where T: Desktop + PopupWindow + ContentView + WordMatcher + HistoryStore {}
