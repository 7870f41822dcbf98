// SPDX-License-Identifier: GPL-3.0-only

//! Word normalization and the two stages a word goes through.
//!
//! Raw text from any source is folded into a [`CandidateWord`]. Once gating
//! lets it through it becomes the [`CommittedWord`] that is actually looked up.

use std::fmt;

use crate::popup::placement::elide;

/// Returns `true` for characters treated as punctuation when folding.
fn is_punct(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '\u{00A1}'
                | '\u{00A7}'
                | '\u{00AB}'
                | '\u{00B6}'
                | '\u{00B7}'
                | '\u{00BB}'
                | '\u{00BF}'
                | '\u{2010}'..='\u{2027}'
                | '\u{2030}'..='\u{205E}'
                | '\u{3001}'..='\u{3003}'
                | '\u{3008}'..='\u{3011}'
                | '\u{FF01}'..='\u{FF0F}'
        )
}

/// Strips leading and trailing whitespace and punctuation.
///
/// Inner characters are left alone, so `"  (don't!) "` folds to `"don't"`.
#[must_use]
pub fn trim_whitespace_or_punct(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || is_punct(c))
}

/// A normalized word waiting for gating.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateWord(String);

impl CandidateWord {
    /// Folds raw input. Returns `None` when nothing is left.
    #[must_use]
    pub fn fold(raw: &str) -> Option<Self> {
        let folded = trim_whitespace_or_punct(raw);
        if folded.is_empty() {
            None
        } else {
            Some(Self(folded.to_string()))
        }
    }

    /// The folded text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Promotes the candidate to the word being looked up.
    #[must_use]
    pub fn commit(self) -> CommittedWord {
        CommittedWord(self.0)
    }
}

/// The word currently being looked up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommittedWord(String);

impl CommittedWord {
    /// The word text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The word shortened for labels and window titles.
    #[must_use]
    pub fn elided(&self) -> String {
        elide(&self.0)
    }
}

impl fmt::Display for CommittedWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_whitespace_and_punctuation() {
        assert_eq!(trim_whitespace_or_punct("  hello, "), "hello");
        assert_eq!(trim_whitespace_or_punct("\"(don't!)\"\n"), "don't");
        assert_eq!(trim_whitespace_or_punct("«mot»"), "mot");
        assert_eq!(trim_whitespace_or_punct("—dash—"), "dash");
    }

    #[test]
    fn test_keeps_inner_punctuation_and_spaces() {
        assert_eq!(trim_whitespace_or_punct(" state-of-the-art. "), "state-of-the-art");
        assert_eq!(trim_whitespace_or_punct("ad hoc"), "ad hoc");
    }

    #[test]
    fn test_fold_empty_results() {
        assert_eq!(CandidateWord::fold(""), None);
        assert_eq!(CandidateWord::fold(" \t\n"), None);
        assert_eq!(CandidateWord::fold("...!?"), None);
    }

    #[test]
    fn test_commit_keeps_text() {
        let word = CandidateWord::fold(" ephemeral. ").unwrap().commit();
        assert_eq!(word.as_str(), "ephemeral");
        assert_eq!(word.elided(), "ephemeral");
        assert_eq!(word.to_string(), "ephemeral");
    }
}
