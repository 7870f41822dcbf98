// SPDX-License-Identifier: GPL-3.0-only

//! Lookup history persisted as JSON in the user state directory.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::app_settings;
use crate::host::HistoryStore;
use crate::lookup::GroupId;

/// One looked-up word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// Group the word was looked up in.
    pub group: GroupId,
    /// The word.
    pub word: String,
}

impl HistoryItem {
    /// Creates a history item.
    pub fn new(group: GroupId, word: impl Into<String>) -> Self {
        Self {
            group,
            word: word.into(),
        }
    }
}

/// Result type for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Errors that can occur while loading or saving history.
#[derive(Debug, Clone)]
pub enum HistoryError {
    /// Reading or writing the history file failed.
    Io(String),
    /// The history file could not be encoded or decoded.
    Serialization(String),
}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryError::Io(msg) => write!(f, "history I/O failed: {}", msg),
            HistoryError::Serialization(msg) => write!(f, "history encoding failed: {}", msg),
        }
    }
}

impl std::error::Error for HistoryError {}

impl From<io::Error> for HistoryError {
    fn from(err: io::Error) -> Self {
        HistoryError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HistoryError {
    fn from(err: serde_json::Error) -> Self {
        HistoryError::Serialization(err.to_string())
    }
}

/// Bounded, newest-first history backed by a JSON file.
#[derive(Debug)]
pub struct HistoryFile {
    path: PathBuf,
    capacity: usize,
    items: VecDeque<HistoryItem>,
}

impl HistoryFile {
    /// Loads the history at `path`. A missing file yields an empty history.
    pub fn load(path: impl Into<PathBuf>, capacity: usize) -> HistoryResult<Self> {
        let path = path.into();
        let items = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<VecDeque<HistoryItem>>(&bytes)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => VecDeque::new(),
            Err(err) => return Err(err.into()),
        };

        let mut history = Self {
            path,
            capacity,
            items,
        };
        history.items.truncate(capacity);
        tracing::debug!(
            "Loaded {} history items from {}",
            history.items.len(),
            history.path.display()
        );
        Ok(history)
    }

    /// Creates an empty history that will be saved to `path`.
    #[must_use]
    pub fn empty(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
            items: VecDeque::new(),
        }
    }

    /// Default history location: `cosdict/history.json` in the user state
    /// directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::state_dir().map(|dir| {
            dir.join(env!("CARGO_PKG_NAME"))
                .join(app_settings::HISTORY_FILE_NAME)
        })
    }

    /// Items, newest first.
    pub fn items(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter()
    }

    /// Number of stored items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing has been looked up yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl HistoryStore for HistoryFile {
    fn add_item(&mut self, item: HistoryItem) {
        // Repeated lookups of the same word collapse into one entry
        if self.items.front() == Some(&item) {
            return;
        }
        self.items.push_front(item);
        self.items.truncate(self.capacity);
    }

    fn save(&mut self) -> HistoryResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_vec_pretty(&self.items)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
