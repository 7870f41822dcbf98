// SPDX-License-Identifier: GPL-3.0-only

//! Entries of the "more results" menu.

use crate::app_settings::{WORD_MENU_CAP, WORD_MENU_MAX_ENTRY_LENGTH};
use crate::lookup::MatchResult;

/// Picks the words offered in the "more results" menu.
///
/// At most 40 entries are offered. Words longer than 64 characters are
/// skipped, and each skipped word lets one more result in, as long as there
/// are results left.
#[must_use]
pub fn word_menu_entries(results: &[MatchResult]) -> Vec<String> {
    let mut total = results.len().min(WORD_MENU_CAP);
    let mut entries = Vec::with_capacity(total);

    let mut index = 0;
    while index < total {
        let word = &results[index].word;
        if word.chars().count() > WORD_MENU_MAX_ENTRY_LENGTH {
            if total < results.len() {
                total += 1;
            }
        } else {
            entries.push(word.clone());
        }
        index += 1;
    }

    entries
}
