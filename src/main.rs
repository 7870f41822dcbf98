// SPDX-License-Identifier: GPL-3.0-only

//! Cosdict scan popup service
//!
//! Without a subcommand this runs the service: it registers on the session
//! bus, receives hover, clipboard and pointer events from the desktop shell
//! and tells the shell where and when to show the dictionary popup.
//!
//! With a subcommand it controls a running service instead:
//!
//! ```text
//! cosdict translate WORDS...   look WORDS up right away
//! cosdict pause                stop reacting to hover and clipboard changes
//! cosdict resume               react to hover and clipboard changes again
//! cosdict quit                 stop the service
//! ```

use std::time::Instant;

use clap::{Parser, Subcommand};
use cosdict::app::{Message, ScanPopup};
use cosdict::config::Config;
use cosdict::dbus::{DbusClient, DbusResult, DbusServer};
use cosdict::history::HistoryFile;
use cosdict::lookup::DictionaryCatalog;
use cosdict::service::{self, ServiceEvent, SignalHost};
use cosdict::state::PopupWindowState;
use cosdict::{app_settings, i18n};
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use futures::channel::mpsc;

#[derive(Parser, Debug)]
#[command(version, about = "Lookup-on-hover dictionary popup service")]
struct Cli {
    /// Start the service with scanning paused.
    #[arg(long, env = "COSDICT_PAUSED")]
    paused: bool,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum CliCommand {
    /// Look words up right away, bypassing modifier gating.
    Translate {
        /// Text to look up.
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Stop reacting to hover and clipboard changes.
    Pause,
    /// React to hover and clipboard changes again.
    Resume,
    /// Stop the running service.
    Quit,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cosdict=info")),
        )
        .init();

    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    let result = match cli.command {
        None => {
            run_service(cli.paused).await;
            return;
        }
        Some(CliCommand::Translate { words }) => {
            let text = words.join(" ");
            control(move |client| async move { client.translate(&text).await }).await
        }
        Some(CliCommand::Pause) => {
            control(|client| async move { client.disable_scanning().await }).await
        }
        Some(CliCommand::Resume) => {
            control(|client| async move { client.enable_scanning().await }).await
        }
        Some(CliCommand::Quit) => control(|client| async move { client.quit().await }).await,
    };

    if let Err(err) = result {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

async fn control<F, Fut>(action: F) -> DbusResult<()>
where
    F: FnOnce(DbusClient) -> Fut,
    Fut: std::future::Future<Output = DbusResult<()>>,
{
    let client = DbusClient::connect().await?;
    action(client).await
}

async fn run_service(paused: bool) {
    // Load configuration
    let config_context = cosmic_config::Config::new(app_settings::APP_ID, Config::VERSION).ok();
    let config = config_context
        .as_ref()
        .map(|context| match Config::get_entry(context) {
            Ok(config) => config,
            Err((_errors, config)) => config,
        })
        .unwrap_or_default();

    // Load popup state
    let state_config =
        cosmic_config::Config::new_state(app_settings::APP_ID, PopupWindowState::VERSION).ok();
    let window_state = state_config
        .as_ref()
        .map(|context| match PopupWindowState::get_entry(context) {
            Ok(state) => state,
            Err((_errors, state)) => state,
        })
        .unwrap_or_default();

    let history_path = HistoryFile::default_path().unwrap_or_else(|| {
        let path = std::env::temp_dir()
            .join(env!("CARGO_PKG_NAME"))
            .join(app_settings::HISTORY_FILE_NAME);
        tracing::warn!("No state directory, keeping history in {}", path.display());
        path
    });
    let history = match HistoryFile::load(&history_path, app_settings::HISTORY_CAPACITY) {
        Ok(history) => history,
        Err(err) => {
            tracing::warn!("Starting with empty history: {}", err);
            HistoryFile::empty(history_path, app_settings::HISTORY_CAPACITY)
        }
    };

    let catalog = match DictionaryCatalog::default_path().map(|p| DictionaryCatalog::load(&p)) {
        Some(Ok(catalog)) => catalog,
        Some(Err(err)) => {
            tracing::warn!("Failed to read dictionary groups: {}", err);
            DictionaryCatalog::default()
        }
        None => DictionaryCatalog::default(),
    };

    let (event_tx, event_rx) = mpsc::channel::<ServiceEvent>(64);
    let (command_tx, command_rx) = mpsc::unbounded();

    let server = match DbusServer::start(event_tx.clone()).await {
        Ok(server) => server,
        Err(err) => {
            tracing::error!("Failed to start D-Bus server: {}", err);
            return;
        }
    };
    let forwarder = tokio::spawn(service::forward_commands(server, command_rx));

    // Watch for configuration changes
    let _config_watcher = config_context.as_ref().and_then(|context| {
        let mut config_tx = event_tx.clone();
        context
            .watch(move |helper, _keys| {
                let config = match Config::get_entry(helper) {
                    Ok(config) => config,
                    Err((_errors, config)) => config,
                };
                let event = ServiceEvent::Popup(Message::UpdateConfig(config));
                if let Err(err) = config_tx.try_send(event) {
                    tracing::warn!("Dropping configuration update: {}", err);
                }
            })
            .map_err(|err| tracing::warn!("Configuration changes will not be seen: {:?}", err))
            .ok()
    });

    let host = SignalHost::new(command_tx, history);
    let mut popup = ScanPopup::new(
        host,
        config,
        window_state,
        catalog.groups,
        catalog.all_dictionaries,
    );

    if paused {
        tracing::info!("Starting with scanning paused");
    } else {
        popup.update(Message::EnableScanning, Instant::now());
    }

    service::run(popup, event_rx, state_config).await;

    // Let the final hide and grab release reach the shell
    if let Err(err) = forwarder.await {
        tracing::error!("Host command forwarder failed: {}", err);
    }
}
