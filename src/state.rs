// SPDX-License-Identifier: GPL-3.0-only

use crate::app_settings;
use crate::lookup::GroupId;
use crate::popup::geometry::Size;
use cosmic::cosmic_config;
use cosmic::cosmic_config::{cosmic_config_derive::CosmicConfigEntry, CosmicConfigEntry};

/// Popup state that persists between application runs.
#[derive(Debug, Clone, CosmicConfigEntry, PartialEq, Eq)]
#[version = 1]
pub struct PopupWindowState {
    /// Last popup width.
    pub width: i32,
    /// Last popup height.
    pub height: i32,
    /// Identifier of the last selected dictionary group.
    pub last_group_id: u32,
}

impl Default for PopupWindowState {
    fn default() -> Self {
        Self {
            width: app_settings::DEFAULT_WIDTH,
            height: app_settings::DEFAULT_HEIGHT,
            last_group_id: GroupId::ALL.0,
        }
    }
}

impl PopupWindowState {
    /// The last popup size.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The last selected group.
    #[must_use]
    pub fn last_group(&self) -> GroupId {
        GroupId(self.last_group_id)
    }
}
