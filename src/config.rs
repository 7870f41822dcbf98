// SPDX-License-Identifier: GPL-3.0-only

use crate::app_settings;
use crate::host::Decoration;
use crate::input::Modifier;
use cosmic::cosmic_config;
use cosmic::cosmic_config::{cosmic_config_derive::CosmicConfigEntry, CosmicConfigEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

/// How the unpinned popup is decorated, chosen once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecorationPolicy {
    /// Auto-dismissing popup surface.
    #[default]
    Popup,
    /// Borderless always-on-top tool window.
    ToolOnTop,
}

impl DecorationPolicy {
    /// The decoration used while the popup is not pinned.
    #[must_use]
    pub fn transient_decoration(&self) -> Decoration {
        match self {
            DecorationPolicy::Popup => Decoration::Popup,
            DecorationPolicy::ToolOnTop => Decoration::ToolOnTop,
        }
    }
}

/// User configuration that persists between application runs.
#[derive(Debug, Clone, CosmicConfigEntry, PartialEq)]
#[version = 1]
pub struct Config {
    /// Only look words up while `required_modifiers` are held.
    pub modifier_gating_enabled: bool,
    /// Modifiers that must be held when gating is enabled.
    pub required_modifiers: Vec<Modifier>,
    /// Keep polling for the modifiers for a while after a rejected word.
    pub alt_mode_enabled: bool,
    /// How long alt mode keeps polling, in milliseconds.
    pub alt_mode_window_ms: u64,
    /// Zoom factor applied to rendered articles.
    pub zoom_factor: f64,
    /// Play the pronunciation as soon as an article loads.
    pub pronounce_on_load: bool,
    /// Decoration of the unpinned popup.
    pub decoration_policy: DecorationPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            modifier_gating_enabled: false,
            required_modifiers: vec![Modifier::Ctrl],
            alt_mode_enabled: false,
            alt_mode_window_ms: app_settings::DEFAULT_ALT_MODE_WINDOW_MS,
            zoom_factor: 1.0,
            pronounce_on_load: false,
            decoration_policy: DecorationPolicy::default(),
        }
    }
}

impl Config {
    /// Snapshot of the gating settings for one lookup decision.
    #[must_use]
    pub fn gate(&self) -> GateConfig {
        GateConfig {
            modifier_gating_enabled: self.modifier_gating_enabled,
            required_modifiers: self.required_modifiers.iter().copied().collect(),
            alt_mode_enabled: self.alt_mode_enabled,
            alt_mode_window_ms: self.alt_mode_window_ms,
        }
    }
}

/// Gating settings, read-only for the duration of one decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateConfig {
    /// Only look words up while `required_modifiers` are held.
    pub modifier_gating_enabled: bool,
    /// Modifiers that must be held.
    pub required_modifiers: BTreeSet<Modifier>,
    /// Keep polling for the modifiers after a rejected word.
    pub alt_mode_enabled: bool,
    /// How long alt mode keeps polling, in milliseconds.
    pub alt_mode_window_ms: u64,
}

impl GateConfig {
    /// The alt-mode window as a duration.
    #[must_use]
    pub fn alt_mode_window(&self) -> Duration {
        Duration::from_millis(self.alt_mode_window_ms)
    }
}
