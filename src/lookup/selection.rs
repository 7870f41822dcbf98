// SPDX-License-Identifier: GPL-3.0-only

//! The dictionary group selected in the popup.

use serde::{Deserialize, Serialize};

use crate::lookup::{DictionaryId, GroupId};

/// A named set of dictionaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryGroup {
    /// Stable identifier, persisted as the last popup group.
    pub id: GroupId,
    /// Display name.
    pub name: String,
    /// Dictionaries in the group.
    pub dictionaries: Vec<DictionaryId>,
}

/// Index into the group list, falling back to all dictionaries when the index
/// is out of range.
#[derive(Debug, Clone, Default)]
pub struct ActiveDictionarySelection {
    groups: Vec<DictionaryGroup>,
    all_dictionaries: Vec<DictionaryId>,
    current: usize,
}

impl ActiveDictionarySelection {
    /// Creates a selection pointing at the group with `last_group`, or at all
    /// dictionaries if no such group exists.
    #[must_use]
    pub fn new(
        groups: Vec<DictionaryGroup>,
        all_dictionaries: Vec<DictionaryId>,
        last_group: GroupId,
    ) -> Self {
        let current = groups
            .iter()
            .position(|group| group.id == last_group)
            .unwrap_or(groups.len());
        Self {
            groups,
            all_dictionaries,
            current,
        }
    }

    /// Selects a group by index. Out-of-range indices select all dictionaries.
    pub fn select(&mut self, index: usize) {
        self.current = index;
    }

    /// The selected group, if the index is in range.
    #[must_use]
    pub fn current_group(&self) -> Option<&DictionaryGroup> {
        self.groups.get(self.current)
    }

    /// Identifier of the selected group, or [`GroupId::ALL`].
    #[must_use]
    pub fn current_group_id(&self) -> GroupId {
        self.current_group().map_or(GroupId::ALL, |group| group.id)
    }

    /// Dictionaries to search with the current selection.
    #[must_use]
    pub fn active_dictionaries(&self) -> &[DictionaryId] {
        match self.current_group() {
            Some(group) => &group.dictionaries,
            None => &self.all_dictionaries,
        }
    }

    /// Number of groups available.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}
