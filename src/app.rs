// SPDX-License-Identifier: GPL-3.0-only

use std::time::Instant;

use crate::config::Config;
use crate::fl;
use crate::host::{Host, PopupControls};
use crate::input::{Arbitration, ClipboardBuffer, CommittedWord, InputArbiter, InputSource};
use crate::lookup::{
    ActiveDictionarySelection, DictionaryGroup, DictionaryId, LookupDispatcher, MatchOutcome,
};
use crate::popup::geometry::{Point, Size};
use crate::popup::{PopupLifecycle, PopupState};
use crate::state::PopupWindowState;

/// The scan popup model: owns the host and all interaction state.
pub struct ScanPopup<H: Host> {
    /// Window, content view, matcher and history.
    host: H,
    /// Configuration data that persists between application runs.
    config: Config,
    /// Popup state (size, group) that persists between runs.
    window_state: PopupWindowState,
    /// Whether `window_state` changed since it was last taken.
    state_dirty: bool,
    /// Hover and clipboard notifications are only handled while scanning.
    scanning: bool,
    arbiter: InputArbiter,
    lifecycle: PopupLifecycle,
    dispatcher: LookupDispatcher,
    controls: PopupControls,
    /// The word currently shown, re-looked-up on group change.
    committed: Option<CommittedWord>,
}

/// Events the popup reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Start handling hover and clipboard notifications.
    EnableScanning,
    /// Stop handling hover and clipboard notifications.
    DisableScanning,
    /// Text under the mouse pointer.
    Hovered(String),
    /// A clipboard or selection buffer changed.
    ClipboardChanged { text: String, buffer: ClipboardBuffer },
    /// Explicit request to translate the clipboard or selection.
    TranslateClipboard { text: String, buffer: ClipboardBuffer },
    /// Pointer motion in desktop coordinates.
    PointerMoved {
        position: Point,
        /// Nothing but the popup itself is under the pointer.
        target_is_popup: bool,
    },
    /// A pointer button was pressed at the given desktop position.
    PointerPressed(Point),
    /// All pointer buttons were released.
    PointerReleased,
    /// The pointer left the popup window.
    PointerLeft,
    /// The pointer entered the popup window.
    PointerEntered,
    /// Escape was pressed in the popup.
    EscapePressed,
    /// The pin toggle changed.
    PinToggled(bool),
    /// A dictionary group was selected by index.
    GroupSelected(usize),
    /// The "more results" button was clicked.
    WordListRequested,
    /// A word was picked from the "more results" menu.
    WordListChosen(String),
    /// The pronounce button was clicked.
    PronounceClicked,
    /// The content view finished loading an article.
    PageLoaded,
    /// A prefix match completed.
    MatchFinished(MatchOutcome),
    /// The popup was resized.
    WindowResized(Size),
    /// Configuration has been updated.
    UpdateConfig(Config),
}

impl<H: Host> ScanPopup<H> {
    /// Creates a hidden popup with scanning disabled.
    ///
    /// The window decoration is resolved from `config` here, once.
    pub fn new(
        mut host: H,
        config: Config,
        window_state: PopupWindowState,
        groups: Vec<DictionaryGroup>,
        all_dictionaries: Vec<DictionaryId>,
    ) -> Self {
        let selection =
            ActiveDictionarySelection::new(groups, all_dictionaries, window_state.last_group());

        let lifecycle = PopupLifecycle::new(config.decoration_policy.transient_decoration());
        lifecycle.attach(&mut host);
        host.set_title(&fl!("untitled-popup"));

        let size = window_state.size();
        if size.is_valid() {
            host.resize(size);
        }
        host.set_zoom_factor(config.zoom_factor);

        let controls = PopupControls {
            group_selector_visible: selection.group_count() > 1,
            ..PopupControls::default()
        };
        host.update_controls(&controls);

        tracing::debug!(
            "Scan popup created with {} groups, decoration {:?}",
            selection.group_count(),
            config.decoration_policy
        );

        Self {
            host,
            config,
            window_state,
            state_dirty: false,
            scanning: false,
            arbiter: InputArbiter::new(),
            lifecycle,
            dispatcher: LookupDispatcher::new(selection),
            controls,
            committed: None,
        }
    }

    /// Handles one event.
    pub fn update(&mut self, message: Message, now: Instant) {
        match message {
            Message::EnableScanning => {
                if !self.scanning {
                    self.scanning = true;
                    tracing::info!("Scanning enabled");
                }
            }
            Message::DisableScanning => {
                if self.scanning {
                    self.scanning = false;
                    tracing::info!("Scanning disabled");
                }
            }
            Message::Hovered(text) => {
                if self.scanning {
                    self.submit(&text, InputSource::Hover, now);
                }
            }
            Message::ClipboardChanged { text, buffer } => {
                if self.scanning {
                    self.submit(&text, InputSource::Clipboard(buffer), now);
                }
            }
            Message::TranslateClipboard { text, buffer } => {
                tracing::debug!("Translating from {:?}", buffer);
                self.submit(&text, InputSource::Hotkey, now);
            }
            Message::PointerMoved {
                position,
                target_is_popup,
            } => {
                self.lifecycle
                    .pointer_moved(&mut self.host, position, target_is_popup, now);
            }
            Message::PointerPressed(position) => {
                self.lifecycle.pointer_pressed(&mut self.host, position);
            }
            Message::PointerReleased => {
                self.lifecycle.pointer_released(&mut self.host);
            }
            Message::PointerLeft => {
                self.lifecycle.pointer_left(&self.host, now);
            }
            Message::PointerEntered => {
                self.lifecycle.pointer_entered();
            }
            Message::EscapePressed => {
                if self.lifecycle.is_visible() && !self.host.close_search() {
                    self.lifecycle.hide(&mut self.host);
                }
            }
            Message::PinToggled(pinned) => {
                let title = self
                    .committed
                    .as_ref()
                    .map(CommittedWord::elided)
                    .unwrap_or_else(|| fl!("untitled-popup"));
                self.lifecycle.set_pinned(&mut self.host, pinned, &title);
            }
            Message::GroupSelected(index) => {
                self.dispatcher.selection_mut().select(index);
                if self.lifecycle.is_visible() {
                    if let Some(word) = self.committed.clone() {
                        self.lookup(&word);
                    }
                }
                self.window_state.last_group_id = self.dispatcher.selection().current_group_id().0;
                self.state_dirty = true;
            }
            Message::WordListRequested => {
                if !self.lifecycle.is_visible() {
                    return;
                }
                let entries = self.dispatcher.menu_entries();
                if !entries.is_empty() {
                    self.host.show_word_menu(&entries);
                }
            }
            Message::WordListChosen(word) => {
                self.dispatcher.show_result(&mut self.host, &word);
            }
            Message::PronounceClicked => {
                self.host.play_sound();
            }
            Message::PageLoaded => {
                self.controls.pronounce_visible = self.host.has_sound();
                self.host.update_controls(&self.controls);
                if self.config.pronounce_on_load {
                    self.host.play_sound();
                }
            }
            Message::MatchFinished(outcome) => {
                let visible = self.lifecycle.is_visible();
                if let Some(report) = self.dispatcher.complete(outcome, visible) {
                    self.controls.query_error = report.error;
                    self.controls.word_list_visible = report.result_count > 0;
                    self.controls.word_list_tooltip =
                        fl!("more-results", count = report.result_count);
                    self.host.update_controls(&self.controls);
                }
            }
            Message::WindowResized(size) => {
                tracing::debug!("Popup resized to {}x{}", size.width, size.height);
                self.window_state.width = size.width;
                self.window_state.height = size.height;
                self.state_dirty = true;
            }
            Message::UpdateConfig(config) => {
                if config.decoration_policy != self.config.decoration_policy {
                    tracing::info!("Decoration policy change takes effect after restart");
                }
                self.host.set_zoom_factor(config.zoom_factor);
                self.config = config;
            }
        }
    }

    /// Runs due timers.
    ///
    /// The hide countdown runs first so that a word committed by alt mode at
    /// the same instant shows the popup again.
    pub fn tick(&mut self, now: Instant) {
        self.lifecycle.tick(&mut self.host, now);

        let gate = self.config.gate();
        if let Some(word) = self.arbiter.tick(&gate, &self.host, now) {
            tracing::debug!("Modifiers held, committing '{}'", word);
            self.engage(word, false);
        }
    }

    /// The earliest instant at which [`tick`](Self::tick) has work.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.arbiter.next_deadline(), self.lifecycle.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Hides the popup, releasing the pointer grab if held.
    pub fn hide(&mut self) {
        self.lifecycle.hide(&mut self.host);
    }

    /// Returns the popup state to persist if it changed since the last call.
    pub fn take_dirty_state(&mut self) -> Option<PopupWindowState> {
        if std::mem::take(&mut self.state_dirty) {
            Some(self.window_state.clone())
        } else {
            None
        }
    }

    /// Current popup state.
    #[must_use]
    pub fn state(&self) -> PopupState {
        self.lifecycle.state()
    }

    /// Returns `true` while hover and clipboard notifications are handled.
    #[must_use]
    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    /// The word currently shown.
    #[must_use]
    pub fn committed_word(&self) -> Option<&CommittedWord> {
        self.committed.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn window_state(&self) -> &PopupWindowState {
        &self.window_state
    }

    #[must_use]
    pub fn controls(&self) -> &PopupControls {
        &self.controls
    }

    #[must_use]
    pub fn lifecycle(&self) -> &PopupLifecycle {
        &self.lifecycle
    }

    #[must_use]
    pub fn arbiter(&self) -> &InputArbiter {
        &self.arbiter
    }

    #[must_use]
    pub fn dispatcher(&self) -> &LookupDispatcher {
        &self.dispatcher
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn submit(&mut self, raw: &str, source: InputSource, now: Instant) {
        let gate = self.config.gate();
        match self.arbiter.submit(raw, source, &gate, &self.host, now) {
            Arbitration::Commit(word) => self.engage(word, source == InputSource::Hotkey),
            Arbitration::Deferred => tracing::debug!("Waiting for modifiers"),
            Arbitration::Dropped | Arbitration::Empty => {}
        }
    }

    /// Shows (or refreshes) the popup with `word` and looks it up.
    fn engage(&mut self, word: CommittedWord, give_focus: bool) {
        self.controls.word_label = word.elided();
        self.lifecycle.engage(&mut self.host, give_focus);
        self.lookup(&word);
        self.committed = Some(word);
    }

    fn lookup(&mut self, word: &CommittedWord) {
        self.controls.word_list_visible = false;
        self.controls.pronounce_visible = false;
        self.host.update_controls(&self.controls);

        self.dispatcher.dispatch(&mut self.host, word);
    }
}
