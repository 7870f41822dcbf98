// SPDX-License-Identifier: GPL-3.0-only

//! Runs lookups for committed words.
//!
//! A lookup renders the definition, starts an asynchronous prefix match and
//! records a history entry. The match outcome arrives later; it is only
//! reflected in the UI if the popup is still visible and the outcome belongs
//! to the latest request.

use crate::history::HistoryItem;
use crate::host::{ContentView, HistoryStore, WordMatcher};
use crate::input::CommittedWord;
use crate::lookup::results::word_menu_entries;
use crate::lookup::selection::ActiveDictionarySelection;
use crate::lookup::{MatchOutcome, MatchRequest, MatchResult};

/// What a completed match means for the popup controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchReport {
    /// Error reported by the matcher.
    pub error: Option<String>,
    /// Number of matched words.
    pub result_count: usize,
}

/// Triggers lookups and keeps the latest match results.
#[derive(Debug, Default)]
pub struct LookupDispatcher {
    selection: ActiveDictionarySelection,
    last_request_id: u64,
    results: Vec<MatchResult>,
}

impl LookupDispatcher {
    /// Creates a dispatcher over the given group selection.
    #[must_use]
    pub fn new(selection: ActiveDictionarySelection) -> Self {
        Self {
            selection,
            last_request_id: 0,
            results: Vec::new(),
        }
    }

    /// Looks `word` up in the current group.
    pub fn dispatch<H>(&mut self, host: &mut H, word: &CommittedWord)
    where
        H: ContentView + WordMatcher + HistoryStore,
    {
        let group = self.selection.current_group_id();
        tracing::debug!("Looking up '{}' in group {:?}", word, group);

        host.show_definition(word.as_str(), group);

        self.last_request_id += 1;
        self.results.clear();
        host.prefix_match(MatchRequest {
            request_id: self.last_request_id,
            word: word.as_str().to_string(),
            dictionaries: self.selection.active_dictionaries().to_vec(),
        });

        host.add_item(HistoryItem::new(group, word.as_str().trim()));
        if let Err(err) = host.save() {
            tracing::warn!("Failed to save history: {}", err);
        }
    }

    /// Shows a word picked from the "more results" menu.
    ///
    /// This only renders the definition; it is not a new lookup.
    pub fn show_result(&self, content: &mut impl ContentView, word: &str) {
        content.show_definition(word, self.selection.current_group_id());
    }

    /// Accepts a match outcome.
    ///
    /// Returns `None` when the outcome must not touch the UI: the popup is
    /// hidden or a newer request superseded this one.
    pub fn complete(&mut self, outcome: MatchOutcome, visible: bool) -> Option<MatchReport> {
        if outcome.request_id != self.last_request_id {
            tracing::debug!(
                "Discarding stale match outcome {} (latest is {})",
                outcome.request_id,
                self.last_request_id
            );
            return None;
        }

        self.results = outcome.results;
        if !visible {
            tracing::debug!("Popup hidden, match outcome not shown");
            return None;
        }

        let error = outcome.error.filter(|e| !e.is_empty());
        if let Some(ref error) = error {
            tracing::warn!("Prefix match failed: {}", error);
        }

        Some(MatchReport {
            error,
            result_count: self.results.len(),
        })
    }

    /// Words for the "more results" menu.
    #[must_use]
    pub fn menu_entries(&self) -> Vec<String> {
        word_menu_entries(&self.results)
    }

    /// Latest match results.
    #[must_use]
    pub fn results(&self) -> &[MatchResult] {
        &self.results
    }

    /// The group selection.
    #[must_use]
    pub fn selection(&self) -> &ActiveDictionarySelection {
        &self.selection
    }

    /// Mutable access to the group selection.
    pub fn selection_mut(&mut self) -> &mut ActiveDictionarySelection {
        &mut self.selection
    }

    /// Identifier of the most recent match request.
    #[must_use]
    pub fn last_request_id(&self) -> u64 {
        self.last_request_id
    }
}
