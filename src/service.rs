// SPDX-License-Identifier: GPL-3.0-only

//! The session service around [`ScanPopup`].
//!
//! An external shell owns the actual popup surface and the definition view.
//! It reports what happens on the desktop as [`ServiceEvent`]s (through the
//! D-Bus interface) and receives everything the popup wants done as
//! [`HostCommand`]s. [`SignalHost`] is the [`Host`](crate::host::Host) on the
//! service side: it answers queries from the last reported desktop state and
//! turns every action into a command.

use futures::channel::mpsc;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Instant;

use cosmic::cosmic_config::{self, CosmicConfigEntry};

use crate::app::{Message, ScanPopup};
use crate::dbus::DbusServer;
use crate::history::{HistoryFile, HistoryItem, HistoryResult};
use crate::host::{
    ContentView, CursorShape, Decoration, Desktop, HistoryStore, PopupControls, PopupWindow,
    WordMatcher,
};
use crate::input::{Modifier, ModifierGate, ModifierState};
use crate::lookup::{GroupId, MatchRequest};
use crate::popup::geometry::{Point, Rect, Size};
use crate::state::PopupWindowState;

/// Something the shell has to do on the popup's behalf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum HostCommand {
    Show,
    Hide,
    MoveTo { x: i32, y: i32 },
    Resize { width: i32, height: i32 },
    RaiseAndActivate,
    SetDecoration { decoration: Decoration },
    SetTitle { title: String },
    SetCursor { cursor: CursorShape },
    GrabPointer,
    ReleasePointer,
    UpdateControls { controls: PopupControls },
    ShowWordMenu { entries: Vec<String> },
    ShowDefinition { word: String, group: GroupId },
    PlaySound,
    CloseSearch,
    SetZoomFactor { zoom: f64 },
    PrefixMatch { request: MatchRequest },
}

/// Desktop state reported by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesktopUpdate {
    /// Pointer position in desktop coordinates.
    Cursor(Point),
    /// Geometry of the screen the pointer is on.
    Screen(Rect),
    /// Whether any pointer button is held.
    Buttons(bool),
    /// Modifiers currently held.
    Modifiers(Vec<Modifier>),
    /// Client area and frame of the popup.
    WindowGeometry { geometry: Rect, frame: Rect },
    /// State of the definition view.
    Content { has_sound: bool, search_open: bool },
}

/// Input to the service loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceEvent {
    /// An event for the popup itself.
    Popup(Message),
    /// New desktop state.
    Desktop(DesktopUpdate),
    /// Stop the service.
    Quit,
}

/// Service-side host: mirrors desktop state and emits commands.
#[derive(Debug)]
pub struct SignalHost {
    commands: mpsc::UnboundedSender<HostCommand>,
    history: HistoryFile,
    modifiers: ModifierState,
    cursor: Point,
    screen: Rect,
    buttons: bool,
    geometry: Rect,
    frame: Rect,
    has_sound: bool,
    search_open: bool,
}

impl SignalHost {
    /// Creates a host sending its commands to `commands`.
    #[must_use]
    pub fn new(commands: mpsc::UnboundedSender<HostCommand>, history: HistoryFile) -> Self {
        Self {
            commands,
            history,
            modifiers: ModifierState::new(),
            cursor: Point::default(),
            screen: Rect::default(),
            buttons: false,
            geometry: Rect::default(),
            frame: Rect::default(),
            has_sound: false,
            search_open: false,
        }
    }

    /// Applies desktop state reported by the shell.
    pub fn apply(&mut self, update: DesktopUpdate) {
        match update {
            DesktopUpdate::Cursor(position) => self.cursor = position,
            DesktopUpdate::Screen(screen) => self.screen = screen,
            DesktopUpdate::Buttons(pressed) => self.buttons = pressed,
            DesktopUpdate::Modifiers(held) => self.modifiers.set_held(held),
            DesktopUpdate::WindowGeometry { geometry, frame } => {
                self.geometry = geometry;
                self.frame = frame;
            }
            DesktopUpdate::Content {
                has_sound,
                search_open,
            } => {
                self.has_sound = has_sound;
                self.search_open = search_open;
            }
        }
    }

    /// The lookup history.
    #[must_use]
    pub fn history(&self) -> &HistoryFile {
        &self.history
    }

    fn send(&self, command: HostCommand) {
        if let Err(err) = self.commands.unbounded_send(command) {
            tracing::warn!("Dropping host command, shell channel closed: {:?}", err.into_inner());
        }
    }
}

impl ModifierGate for SignalHost {
    fn is_satisfied(&self, required: &BTreeSet<Modifier>) -> bool {
        self.modifiers.is_satisfied(required)
    }
}

impl Desktop for SignalHost {
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

impl PopupWindow for SignalHost {
    fn geometry(&self) -> Rect {
        self.geometry
    }

    fn frame_geometry(&self) -> Rect {
        self.frame
    }

    fn show(&mut self) {
        self.send(HostCommand::Show);
    }

    fn hide(&mut self) {
        self.send(HostCommand::Hide);
    }

    fn move_to(&mut self, position: Point) {
        // Keep the frame offset until the shell reports the real geometry
        let delta = position - self.frame.origin();
        self.frame = self.frame.moved_to(position);
        self.geometry = self.geometry.moved_to(self.geometry.origin() + delta);
        self.send(HostCommand::MoveTo {
            x: position.x,
            y: position.y,
        });
    }

    fn resize(&mut self, size: Size) {
        // Until the shell reports a frame, assume an undecorated window
        let frame = if self.frame.is_empty() {
            self.geometry
        } else {
            self.frame
        };
        let border = Size::new(
            frame.width - self.geometry.width,
            frame.height - self.geometry.height,
        );
        self.geometry = Rect::from_parts(self.geometry.origin(), size);
        self.frame = Rect::from_parts(
            frame.origin(),
            Size::new(size.width + border.width, size.height + border.height),
        );
        self.send(HostCommand::Resize {
            width: size.width,
            height: size.height,
        });
    }

    fn raise_and_activate(&mut self) {
        self.send(HostCommand::RaiseAndActivate);
    }

    fn set_decoration(&mut self, decoration: Decoration) {
        self.send(HostCommand::SetDecoration { decoration });
    }

    fn set_title(&mut self, title: &str) {
        self.send(HostCommand::SetTitle {
            title: title.to_string(),
        });
    }

    fn set_cursor(&mut self, cursor: CursorShape) {
        self.send(HostCommand::SetCursor { cursor });
    }

    fn grab_pointer(&mut self) {
        self.send(HostCommand::GrabPointer);
    }

    fn release_pointer(&mut self) {
        self.send(HostCommand::ReleasePointer);
    }

    fn update_controls(&mut self, controls: &PopupControls) {
        self.send(HostCommand::UpdateControls {
            controls: controls.clone(),
        });
    }

    fn show_word_menu(&mut self, entries: &[String]) {
        self.send(HostCommand::ShowWordMenu {
            entries: entries.to_vec(),
        });
    }
}

impl ContentView for SignalHost {
    fn show_definition(&mut self, word: &str, group: GroupId) {
        self.send(HostCommand::ShowDefinition {
            word: word.to_string(),
            group,
        });
    }

    fn play_sound(&mut self) {
        self.send(HostCommand::PlaySound);
    }

    fn has_sound(&self) -> bool {
        self.has_sound
    }

    fn close_search(&mut self) -> bool {
        if std::mem::take(&mut self.search_open) {
            self.send(HostCommand::CloseSearch);
            true
        } else {
            false
        }
    }

    fn set_zoom_factor(&mut self, zoom: f64) {
        self.send(HostCommand::SetZoomFactor { zoom });
    }
}

impl WordMatcher for SignalHost {
    fn prefix_match(&mut self, request: MatchRequest) {
        self.send(HostCommand::PrefixMatch { request });
    }
}

impl HistoryStore for SignalHost {
    fn add_item(&mut self, item: HistoryItem) {
        self.history.add_item(item);
    }

    fn save(&mut self) -> HistoryResult<()> {
        self.history.save()
    }
}

/// Runs the popup until [`ServiceEvent::Quit`] arrives or the event channel
/// closes.
///
/// Popup state changes are written to `state_config` as they happen. The
/// popup is dropped on return, which closes its command channel once the
/// final hide has been queued.
pub async fn run(
    mut popup: ScanPopup<SignalHost>,
    mut events: mpsc::Receiver<ServiceEvent>,
    state_config: Option<cosmic_config::Config>,
) {
    tracing::info!("Scan popup service running");

    loop {
        let deadline = popup.next_deadline();
        tokio::select! {
            event = events.next() => match event {
                Some(ServiceEvent::Popup(message)) => {
                    if let Message::PointerMoved { position, .. } = message {
                        popup.host_mut().apply(DesktopUpdate::Cursor(position));
                    }
                    popup.update(message, Instant::now());
                }
                Some(ServiceEvent::Desktop(update)) => popup.host_mut().apply(update),
                Some(ServiceEvent::Quit) => {
                    tracing::info!("Quit requested");
                    break;
                }
                None => {
                    tracing::warn!("Service event channel closed");
                    break;
                }
            },
            () = sleep_until(deadline) => popup.tick(Instant::now()),
        }

        if let Some(state) = popup.take_dirty_state() {
            save_state(state_config.as_ref(), &state);
        }
    }

    // Never leave a dangling pointer grab behind
    popup.hide();
    drop(popup);
    tracing::debug!("Scan popup service stopped");
}

/// Emits every host command as a D-Bus signal until the channel closes.
pub async fn forward_commands(
    server: DbusServer,
    mut commands: mpsc::UnboundedReceiver<HostCommand>,
) {
    while let Some(command) = commands.next().await {
        if let Err(err) = server.emit_host_command(&command).await {
            tracing::error!("Failed to emit host command: {}", err);
        }
    }
    tracing::debug!("Host command channel closed");
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

fn save_state(state_config: Option<&cosmic_config::Config>, state: &PopupWindowState) {
    if let Some(state_config) = state_config {
        if let Err(err) = state.write_entry(state_config) {
            tracing::error!("Failed to save popup state: {:?}", err);
        } else {
            tracing::debug!(
                "Popup state saved: {}x{}, group {}",
                state.width,
                state.height,
                state.last_group_id
            );
        }
    }
}
