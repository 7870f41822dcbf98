// SPDX-License-Identifier: GPL-3.0-only

//! Cosdict - A lookup-on-hover dictionary popup for COSMIC desktop
//!
//! This crate decides *when* and *where* a dictionary popup appears: it
//! watches hovered text, clipboard changes and an explicit hotkey, applies
//! modifier-key gating, places the popup next to the cursor and hides it again
//! once the user's attention has moved elsewhere.
//!
//! # Architecture
//!
//! The interaction core ([`app::ScanPopup`]) is independent of any toolkit.
//! Everything it needs from the outside world goes through the collaborator
//! traits in [`host`]. Time is passed in explicitly, so the whole state
//! machine can be driven (and tested) without a clock.
//!
//! The `cosdict` binary runs the core as a session service: a desktop shell
//! reports events over D-Bus and renders whatever the core asks for.
//!
//! # Modules
//!
//! - `app`: The popup model and its `Message` enum
//! - `app_settings`: Centralized application constants
//! - `config`: User configuration with cosmic_config persistence
//! - `dbus`: D-Bus interface between the service and the desktop shell
//! - `history`: Lookup history persisted as JSON
//! - `host`: Collaborator traits the core drives
//! - `i18n`: Localization support using fluent translations
//! - `input`: Word folding, modifier gating and alt mode
//! - `lookup`: Dictionary groups, lookups and match results
//! - `popup`: Placement, proximity tracking and the popup lifecycle
//! - `service`: The session service loop and its host
//! - `state`: Popup state persistence (size, last group)

pub mod app;
pub mod app_settings;
pub mod config;
pub mod dbus;
pub mod history;
pub mod host;
pub mod i18n;
pub mod input;
pub mod lookup;
pub mod popup;
pub mod service;
pub mod state;

#[cfg(test)]
mod testing;

// Re-export the fl! macro for localization
pub use crate::i18n::LANGUAGE_LOADER;

// ============================================================================
// Integration Tests
// ============================================================================
