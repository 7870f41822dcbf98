// SPDX-License-Identifier: GPL-3.0-only

//! Dictionary lookups triggered by committed words.
//!
//! - `catalog`: the dictionary groups known to the service
//! - `selection`: which dictionary group is active
//! - `dispatcher`: runs a lookup and collects the asynchronous match outcome
//! - `results`: builds the "more results" menu from match results

pub mod catalog;
pub mod dispatcher;
pub mod results;
pub mod selection;

pub use catalog::DictionaryCatalog;
pub use dispatcher::{LookupDispatcher, MatchReport};
pub use results::word_menu_entries;
pub use selection::{ActiveDictionarySelection, DictionaryGroup};

use serde::{Deserialize, Serialize};

/// Identifier of a dictionary group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub u32);

impl GroupId {
    /// Sentinel meaning "all dictionaries".
    pub const ALL: GroupId = GroupId(u32::MAX);
}

/// Identifier of a single dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DictionaryId(pub String);

/// A prefix-match request handed to the matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    /// Sequence number; the outcome must carry it back.
    pub request_id: u64,
    /// Word to match.
    pub word: String,
    /// Dictionaries to search.
    pub dictionaries: Vec<DictionaryId>,
}

/// One word found by the matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The matched headword.
    pub word: String,
    /// Matcher-specific extra data.
    pub metadata: String,
}

impl MatchResult {
    /// Creates a result without metadata.
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            metadata: String::new(),
        }
    }
}

/// Completion of a prefix match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// The request this completes.
    pub request_id: u64,
    /// Matched words, best first.
    pub results: Vec<MatchResult>,
    /// Error reported by the matcher, if any.
    pub error: Option<String>,
}
