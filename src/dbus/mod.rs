// SPDX-License-Identifier: GPL-3.0-only

//! D-Bus interface between the scan popup service and the desktop shell.
//!
//! # Architecture
//!
//! The D-Bus interface consists of two parts:
//! - **Server**: The service registers on the session bus. The shell calls its
//!   methods to report hover text, clipboard changes, pointer and key events
//!   and desktop state; the service answers with `HostCommand` signals.
//! - **Client**: The `cosdict` command line connects to a running service to
//!   translate text, pause or resume scanning, or quit.
//!
//! # Interface
//!
//! - Object path: `/io/github/cosdict/ScanPopup`
//! - Interface name: `io.github.cosdict.ScanPopup`
//! - Signals: `HostCommand(command: s)` carrying a JSON-encoded command

use crate::app::Message;
use crate::app_settings::{DBUS_INTERFACE, DBUS_PATH};
use crate::input::{parse_modifiers, ClipboardBuffer};
use crate::lookup::{MatchOutcome, MatchResult};
use crate::popup::geometry::{Point, Rect, Size};
use crate::service::{DesktopUpdate, HostCommand, ServiceEvent};
use futures::channel::mpsc;
use futures::SinkExt;
use zbus::interface;
use zbus::object_server::SignalEmitter;

fn buffer(selection: bool) -> ClipboardBuffer {
    if selection {
        ClipboardBuffer::Selection
    } else {
        ClipboardBuffer::Clipboard
    }
}

/// The D-Bus interface implementation for the scan popup.
///
/// This struct is registered as a D-Bus object and handles incoming method calls.
/// It forwards them over a channel to the service loop.
pub struct ScanPopupInterface {
    /// Channel sender to forward events to the service loop.
    event_tx: mpsc::Sender<ServiceEvent>,
}

impl ScanPopupInterface {
    /// Create a new interface instance with an event sender.
    pub fn new(event_tx: mpsc::Sender<ServiceEvent>) -> Self {
        Self { event_tx }
    }

    async fn forward(&mut self, event: ServiceEvent) {
        if let Err(e) = self.event_tx.send(event).await {
            tracing::error!("Failed to forward D-Bus call: {}", e);
        }
    }

    async fn popup(&mut self, message: Message) {
        self.forward(ServiceEvent::Popup(message)).await;
    }

    async fn desktop(&mut self, update: DesktopUpdate) {
        self.forward(ServiceEvent::Desktop(update)).await;
    }
}

#[interface(name = "io.github.cosdict.ScanPopup")]
impl ScanPopupInterface {
    /// Start reacting to hover and clipboard notifications.
    async fn enable_scanning(&mut self) {
        self.popup(Message::EnableScanning).await;
    }

    /// Stop reacting to hover and clipboard notifications.
    async fn disable_scanning(&mut self) {
        self.popup(Message::DisableScanning).await;
    }

    /// Text under the mouse pointer.
    async fn hovered(&mut self, text: String) {
        self.popup(Message::Hovered(text)).await;
    }

    /// The clipboard (or primary selection) changed.
    async fn clipboard_changed(&mut self, text: String, selection: bool) {
        let buffer = buffer(selection);
        self.popup(Message::ClipboardChanged { text, buffer }).await;
    }

    /// Translate the given clipboard (or primary selection) text right away.
    async fn translate_clipboard(&mut self, text: String, selection: bool) {
        tracing::debug!("D-Bus: TranslateClipboard() called");
        let buffer = buffer(selection);
        self.popup(Message::TranslateClipboard { text, buffer }).await;
    }

    /// Pointer motion in desktop coordinates.
    async fn pointer_moved(&mut self, x: i32, y: i32, target_is_popup: bool) {
        self.popup(Message::PointerMoved {
            position: Point::new(x, y),
            target_is_popup,
        })
        .await;
    }

    /// A pointer button was pressed.
    async fn pointer_pressed(&mut self, x: i32, y: i32) {
        self.desktop(DesktopUpdate::Buttons(true)).await;
        self.popup(Message::PointerPressed(Point::new(x, y))).await;
    }

    /// All pointer buttons were released.
    async fn pointer_released(&mut self) {
        self.desktop(DesktopUpdate::Buttons(false)).await;
        self.popup(Message::PointerReleased).await;
    }

    /// The pointer left the popup.
    async fn pointer_left(&mut self, x: i32, y: i32) {
        self.desktop(DesktopUpdate::Cursor(Point::new(x, y))).await;
        self.popup(Message::PointerLeft).await;
    }

    /// The pointer entered the popup.
    async fn pointer_entered(&mut self) {
        self.popup(Message::PointerEntered).await;
    }

    /// Escape was pressed in the popup.
    async fn escape_pressed(&mut self) {
        self.popup(Message::EscapePressed).await;
    }

    /// The pin toggle changed.
    async fn set_pinned(&mut self, pinned: bool) {
        self.popup(Message::PinToggled(pinned)).await;
    }

    /// A dictionary group was selected.
    async fn select_group(&mut self, index: u32) {
        self.popup(Message::GroupSelected(index as usize)).await;
    }

    /// The "more results" button was clicked.
    async fn request_word_list(&mut self) {
        self.popup(Message::WordListRequested).await;
    }

    /// A word was picked from the "more results" menu.
    async fn choose_word(&mut self, word: String) {
        self.popup(Message::WordListChosen(word)).await;
    }

    /// The pronounce button was clicked.
    async fn pronounce(&mut self) {
        self.popup(Message::PronounceClicked).await;
    }

    /// The definition view finished loading.
    async fn page_loaded(&mut self, has_sound: bool, search_open: bool) {
        self.desktop(DesktopUpdate::Content {
            has_sound,
            search_open,
        })
        .await;
        self.popup(Message::PageLoaded).await;
    }

    /// The in-article search bar opened or closed.
    async fn search_changed(&mut self, has_sound: bool, search_open: bool) {
        self.desktop(DesktopUpdate::Content {
            has_sound,
            search_open,
        })
        .await;
    }

    /// A prefix match completed. An empty `error` means success.
    async fn match_finished(
        &mut self,
        request_id: u64,
        results: Vec<(String, String)>,
        error: String,
    ) {
        let results = results
            .into_iter()
            .map(|(word, metadata)| MatchResult { word, metadata })
            .collect();
        let error = (!error.is_empty()).then_some(error);
        self.popup(Message::MatchFinished(MatchOutcome {
            request_id,
            results,
            error,
        }))
        .await;
    }

    /// The popup was resized.
    async fn resized(&mut self, width: i32, height: i32) {
        self.popup(Message::WindowResized(Size::new(width, height))).await;
    }

    /// Modifier keys currently held, by name (e.g. `Control_L`, `Alt`).
    async fn update_modifiers(&mut self, names: Vec<String>) {
        let modifiers = parse_modifiers(names.iter().map(String::as_str));
        self.desktop(DesktopUpdate::Modifiers(modifiers)).await;
    }

    /// Geometry of the screen the pointer is on.
    async fn update_screen(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.desktop(DesktopUpdate::Screen(Rect::new(x, y, width, height)))
            .await;
    }

    /// Popup client area and frame, each as (x, y, width, height).
    async fn update_window_geometry(
        &mut self,
        geometry: (i32, i32, i32, i32),
        frame: (i32, i32, i32, i32),
    ) {
        let (x, y, w, h) = geometry;
        let (fx, fy, fw, fh) = frame;
        self.desktop(DesktopUpdate::WindowGeometry {
            geometry: Rect::new(x, y, w, h),
            frame: Rect::new(fx, fy, fw, fh),
        })
        .await;
    }

    /// Quit the service.
    async fn quit(&mut self) {
        tracing::debug!("D-Bus: Quit() called");
        self.forward(ServiceEvent::Quit).await;
    }

    /// Signal carrying a JSON-encoded host command.
    #[zbus(signal)]
    async fn host_command(emitter: &SignalEmitter<'_>, command: &str) -> zbus::Result<()>;
}

/// Result type for D-Bus operations.
pub type DbusResult<T> = Result<T, DbusError>;

/// Errors that can occur during D-Bus operations.
#[derive(Debug, Clone)]
pub enum DbusError {
    /// Failed to connect to the session bus.
    ConnectionFailed(String),
    /// Failed to register the service.
    RegistrationFailed(String),
    /// Failed to call a method or emit a signal.
    MethodCallFailed(String),
    /// Failed to encode a host command.
    EncodingFailed(String),
}

impl std::fmt::Display for DbusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbusError::ConnectionFailed(msg) => write!(f, "D-Bus connection failed: {}", msg),
            DbusError::RegistrationFailed(msg) => {
                write!(f, "D-Bus service registration failed: {}", msg)
            }
            DbusError::MethodCallFailed(msg) => write!(f, "D-Bus method call failed: {}", msg),
            DbusError::EncodingFailed(msg) => write!(f, "host command encoding failed: {}", msg),
        }
    }
}

impl std::error::Error for DbusError {}

/// D-Bus server handle for the service.
pub struct DbusServer {
    /// The D-Bus connection.
    connection: zbus::Connection,
}

impl std::fmt::Debug for DbusServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbusServer").finish_non_exhaustive()
    }
}

impl DbusServer {
    /// Start the D-Bus server and register the scan popup interface.
    ///
    /// # Arguments
    /// * `event_tx` - Channel sender to forward events to the service loop.
    pub async fn start(event_tx: mpsc::Sender<ServiceEvent>) -> DbusResult<Self> {
        let interface = ScanPopupInterface::new(event_tx);

        // Connect to the session bus
        let connection = zbus::connection::Builder::session()
            .map_err(|e| DbusError::ConnectionFailed(e.to_string()))?
            .name(DBUS_INTERFACE)
            .map_err(|e| DbusError::RegistrationFailed(e.to_string()))?
            .serve_at(DBUS_PATH, interface)
            .map_err(|e| DbusError::RegistrationFailed(e.to_string()))?
            .build()
            .await
            .map_err(|e| DbusError::ConnectionFailed(e.to_string()))?;

        tracing::info!(
            "D-Bus service registered: {} at {}",
            DBUS_INTERFACE,
            DBUS_PATH
        );

        Ok(Self { connection })
    }

    /// Emit a host command signal.
    pub async fn emit_host_command(&self, command: &HostCommand) -> DbusResult<()> {
        let json = serde_json::to_string(command)
            .map_err(|e| DbusError::EncodingFailed(e.to_string()))?;

        let iface_ref = self
            .connection
            .object_server()
            .interface::<_, ScanPopupInterface>(DBUS_PATH)
            .await
            .map_err(|e| DbusError::MethodCallFailed(e.to_string()))?;

        ScanPopupInterface::host_command(iface_ref.signal_emitter(), &json)
            .await
            .map_err(|e| DbusError::MethodCallFailed(e.to_string()))?;

        tracing::trace!("D-Bus: HostCommand({}) signal emitted", json);
        Ok(())
    }
}

// ============================================================================
// D-Bus Client for the command line
// ============================================================================

/// D-Bus proxy for connecting to the scan popup service.
#[zbus::proxy(
    interface = "io.github.cosdict.ScanPopup",
    default_service = "io.github.cosdict.ScanPopup",
    default_path = "/io/github/cosdict/ScanPopup"
)]
trait ScanPopupProxy {
    /// Start reacting to hover and clipboard notifications.
    async fn enable_scanning(&self) -> zbus::Result<()>;

    /// Stop reacting to hover and clipboard notifications.
    async fn disable_scanning(&self) -> zbus::Result<()>;

    /// Translate text right away.
    async fn translate_clipboard(&self, text: &str, selection: bool) -> zbus::Result<()>;

    /// Quit the service.
    async fn quit(&self) -> zbus::Result<()>;
}

/// D-Bus client for controlling a running service.
pub struct DbusClient {
    /// The proxy to the scan popup service.
    proxy: ScanPopupProxyProxy<'static>,
}

impl DbusClient {
    /// Connect to the scan popup D-Bus service.
    pub async fn connect() -> DbusResult<Self> {
        let connection = zbus::Connection::session()
            .await
            .map_err(|e| DbusError::ConnectionFailed(e.to_string()))?;

        let proxy = ScanPopupProxyProxy::new(&connection)
            .await
            .map_err(|e| DbusError::ConnectionFailed(e.to_string()))?;

        Ok(Self { proxy })
    }

    /// Resume scanning.
    pub async fn enable_scanning(&self) -> DbusResult<()> {
        self.proxy
            .enable_scanning()
            .await
            .map_err(|e| DbusError::MethodCallFailed(e.to_string()))
    }

    /// Pause scanning.
    pub async fn disable_scanning(&self) -> DbusResult<()> {
        self.proxy
            .disable_scanning()
            .await
            .map_err(|e| DbusError::MethodCallFailed(e.to_string()))
    }

    /// Look `text` up as if it came from the clipboard hotkey.
    pub async fn translate(&self, text: &str) -> DbusResult<()> {
        self.proxy
            .translate_clipboard(text, false)
            .await
            .map_err(|e| DbusError::MethodCallFailed(e.to_string()))
    }

    /// Quit the service.
    pub async fn quit(&self) -> DbusResult<()> {
        self.proxy
            .quit()
            .await
            .map_err(|e| DbusError::MethodCallFailed(e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifier;
    use futures::StreamExt;

    /// Test: D-Bus error types can be created and displayed.
    #[test]
    fn test_dbus_error_display() {
        let conn_err = DbusError::ConnectionFailed("test".to_string());
        let reg_err = DbusError::RegistrationFailed("test".to_string());
        let method_err = DbusError::MethodCallFailed("test".to_string());
        let enc_err = DbusError::EncodingFailed("test".to_string());

        assert!(conn_err.to_string().contains("connection failed"));
        assert!(reg_err.to_string().contains("registration failed"));
        assert!(method_err.to_string().contains("method call failed"));
        assert!(enc_err.to_string().contains("encoding failed"));
    }

    /// Test: input methods forward popup messages through the channel.
    #[tokio::test]
    async fn test_dbus_methods_forward_messages() {
        let (tx, mut rx) = mpsc::channel::<ServiceEvent>(10);
        let mut interface = ScanPopupInterface::new(tx);

        interface.hovered("word".to_string()).await;
        assert_eq!(
            rx.next().await,
            Some(ServiceEvent::Popup(Message::Hovered("word".to_string())))
        );

        interface.clipboard_changed("text".to_string(), true).await;
        assert_eq!(
            rx.next().await,
            Some(ServiceEvent::Popup(Message::ClipboardChanged {
                text: "text".to_string(),
                buffer: ClipboardBuffer::Selection
            }))
        );

        interface.select_group(2).await;
        assert_eq!(
            rx.next().await,
            Some(ServiceEvent::Popup(Message::GroupSelected(2)))
        );

        interface.quit().await;
        assert_eq!(rx.next().await, Some(ServiceEvent::Quit));
    }

    /// Test: pointer presses report the button state before the press.
    #[tokio::test]
    async fn test_pointer_press_updates_buttons_first() {
        let (tx, mut rx) = mpsc::channel::<ServiceEvent>(10);
        let mut interface = ScanPopupInterface::new(tx);

        interface.pointer_pressed(10, 20).await;
        assert_eq!(
            rx.next().await,
            Some(ServiceEvent::Desktop(DesktopUpdate::Buttons(true)))
        );
        assert_eq!(
            rx.next().await,
            Some(ServiceEvent::Popup(Message::PointerPressed(Point::new(10, 20))))
        );
    }

    /// Test: match completions carry metadata and map empty errors to none.
    #[tokio::test]
    async fn test_match_finished_conversion() {
        let (tx, mut rx) = mpsc::channel::<ServiceEvent>(10);
        let mut interface = ScanPopupInterface::new(tx);

        interface
            .match_finished(7, vec![("word".to_string(), "meta".to_string())], String::new())
            .await;
        let expected = MatchOutcome {
            request_id: 7,
            results: vec![MatchResult {
                word: "word".to_string(),
                metadata: "meta".to_string(),
            }],
            error: None,
        };
        assert_eq!(
            rx.next().await,
            Some(ServiceEvent::Popup(Message::MatchFinished(expected)))
        );

        interface.match_finished(8, Vec::new(), "timeout".to_string()).await;
        match rx.next().await {
            Some(ServiceEvent::Popup(Message::MatchFinished(outcome))) => {
                assert_eq!(outcome.error.as_deref(), Some("timeout"));
            }
            other => panic!("Expected MatchFinished, got {:?}", other),
        }
    }

    /// Test: modifier names are parsed, unknown ones skipped.
    #[tokio::test]
    async fn test_update_modifiers_parses_names() {
        let (tx, mut rx) = mpsc::channel::<ServiceEvent>(10);
        let mut interface = ScanPopupInterface::new(tx);

        interface
            .update_modifiers(vec!["Control_L".to_string(), "Hyper".to_string()])
            .await;
        assert_eq!(
            rx.next().await,
            Some(ServiceEvent::Desktop(DesktopUpdate::Modifiers(vec![
                Modifier::Ctrl
            ])))
        );
    }

    /// Test: D-Bus service registers successfully (requires D-Bus session).
    #[tokio::test]
    async fn test_dbus_service_registration() {
        let (tx, _rx) = mpsc::channel::<ServiceEvent>(10);

        match DbusServer::start(tx).await {
            Ok(server) => {
                server
                    .emit_host_command(&HostCommand::Hide)
                    .await
                    .expect("Signal emission should work on a registered service");
            }
            Err(DbusError::ConnectionFailed(msg)) => {
                // D-Bus session not available (common in CI environments)
                tracing::warn!("D-Bus session not available: {}", msg);
            }
            Err(DbusError::RegistrationFailed(msg)) => {
                // Service name might already be taken
                tracing::warn!("D-Bus registration issue: {}", msg);
            }
            Err(e) => {
                panic!("Unexpected error during D-Bus registration: {}", e);
            }
        }
    }

    /// Test: Interface constants match app_settings.
    #[test]
    fn test_dbus_constants() {
        use crate::app_settings;

        assert_eq!(app_settings::DBUS_PATH, "/io/github/cosdict/ScanPopup");
        assert_eq!(app_settings::DBUS_INTERFACE, "io.github.cosdict.ScanPopup");
    }
}
