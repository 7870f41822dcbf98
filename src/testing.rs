// SPDX-License-Identifier: GPL-3.0-only

//! Recording host used by unit tests.

use std::collections::BTreeSet;

use crate::history::{HistoryError, HistoryItem, HistoryResult};
use crate::host::{
    ContentView, CursorShape, Decoration, Desktop, HistoryStore, PopupControls, PopupWindow,
    WordMatcher,
};
use crate::input::{Modifier, ModifierGate, ModifierState};
use crate::lookup::{GroupId, MatchRequest};
use crate::popup::geometry::{Point, Rect, Size};

/// A host that records every call made into it.
///
/// The frame has no decorations, so `frame_geometry()` equals `geometry()`.
#[derive(Debug)]
pub struct FakeHost {
    // Desktop
    pub cursor: Point,
    pub screen: Rect,
    pub buttons: bool,
    pub modifiers: ModifierState,

    // Window
    pub window: Rect,
    pub visible: bool,
    pub show_count: usize,
    pub hide_count: usize,
    pub move_count: usize,
    pub raise_count: usize,
    pub resizes: Vec<Size>,
    pub decoration: Option<Decoration>,
    pub title: String,
    pub cursor_shape: CursorShape,
    pub pointer_grabbed: bool,
    pub grab_count: usize,
    pub release_count: usize,
    pub controls: PopupControls,
    pub control_updates: usize,
    pub menus: Vec<Vec<String>>,

    // Content
    pub definitions: Vec<(String, GroupId)>,
    pub sounds_played: usize,
    pub has_sound: bool,
    pub search_open: bool,
    pub zoom: Option<f64>,

    // Matcher and history
    pub match_requests: Vec<MatchRequest>,
    pub history: Vec<HistoryItem>,
    pub history_saves: usize,
    pub fail_history_save: bool,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            cursor: Point::new(500, 400),
            screen: Rect::new(0, 0, 1920, 1080),
            buttons: false,
            modifiers: ModifierState::new(),
            window: Rect::new(0, 0, 300, 200),
            visible: false,
            show_count: 0,
            hide_count: 0,
            move_count: 0,
            raise_count: 0,
            resizes: Vec::new(),
            decoration: None,
            title: String::new(),
            cursor_shape: CursorShape::Arrow,
            pointer_grabbed: false,
            grab_count: 0,
            release_count: 0,
            controls: PopupControls::default(),
            control_updates: 0,
            menus: Vec::new(),
            definitions: Vec::new(),
            sounds_played: 0,
            has_sound: false,
            search_open: false,
            zoom: None,
            match_requests: Vec::new(),
            history: Vec::new(),
            history_saves: 0,
            fail_history_save: false,
        }
    }

    pub fn window_origin(&self) -> Point {
        self.window.origin()
    }

    pub fn hold(&mut self, modifiers: &[Modifier]) {
        self.modifiers.set_held(modifiers.iter().copied());
    }

    /// Words whose definitions were shown, in order.
    pub fn shown_words(&self) -> Vec<&str> {
        self.definitions.iter().map(|(w, _)| w.as_str()).collect()
    }
}

impl ModifierGate for FakeHost {
    fn is_satisfied(&self, required: &BTreeSet<Modifier>) -> bool {
        self.modifiers.is_satisfied(required)
    }
}

impl Desktop for FakeHost {
    fn cursor_position(&self) -> Point {
        self.cursor
    }

    fn screen_geometry(&self) -> Rect {
        self.screen
    }

    fn buttons_pressed(&self) -> bool {
        self.buttons
    }
}

impl PopupWindow for FakeHost {
    fn geometry(&self) -> Rect {
        self.window
    }

    fn frame_geometry(&self) -> Rect {
        self.window
    }

    fn show(&mut self) {
        self.visible = true;
        self.show_count += 1;
    }

    fn hide(&mut self) {
        self.visible = false;
        self.hide_count += 1;
    }

    fn move_to(&mut self, position: Point) {
        self.window = self.window.moved_to(position);
        self.move_count += 1;
    }

    fn resize(&mut self, size: Size) {
        self.window = Rect::from_parts(self.window.origin(), size);
        self.resizes.push(size);
    }

    fn raise_and_activate(&mut self) {
        self.raise_count += 1;
    }

    fn set_decoration(&mut self, decoration: Decoration) {
        self.decoration = Some(decoration);
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_cursor(&mut self, cursor: CursorShape) {
        self.cursor_shape = cursor;
    }

    fn grab_pointer(&mut self) {
        self.pointer_grabbed = true;
        self.grab_count += 1;
    }

    fn release_pointer(&mut self) {
        self.pointer_grabbed = false;
        self.release_count += 1;
    }

    fn update_controls(&mut self, controls: &PopupControls) {
        self.controls = controls.clone();
        self.control_updates += 1;
    }

    fn show_word_menu(&mut self, entries: &[String]) {
        self.menus.push(entries.to_vec());
    }
}

impl ContentView for FakeHost {
    fn show_definition(&mut self, word: &str, group: GroupId) {
        self.definitions.push((word.to_string(), group));
    }

    fn play_sound(&mut self) {
        self.sounds_played += 1;
    }

    fn has_sound(&self) -> bool {
        self.has_sound
    }

    fn close_search(&mut self) -> bool {
        std::mem::take(&mut self.search_open)
    }

    fn set_zoom_factor(&mut self, zoom: f64) {
        self.zoom = Some(zoom);
    }
}

impl WordMatcher for FakeHost {
    fn prefix_match(&mut self, request: MatchRequest) {
        self.match_requests.push(request);
    }
}

impl HistoryStore for FakeHost {
    fn add_item(&mut self, item: HistoryItem) {
        self.history.push(item);
    }

    fn save(&mut self) -> HistoryResult<()> {
        if self.fail_history_save {
            return Err(HistoryError::Io("disk full".to_string()));
        }
        self.history_saves += 1;
        Ok(())
    }
}
