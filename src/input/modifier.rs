// SPDX-License-Identifier: GPL-3.0-only

//! Modifier keys and the gate deciding whether a lookup may proceed.
//!
//! The desktop reports which modifiers are physically held; [`ModifierState`]
//! mirrors that set and implements [`ModifierGate`], the query the input
//! arbiter runs before committing a word.
//!
//! # Example
//!
//! ```rust,ignore
//! use cosdict::input::{Modifier, ModifierGate, ModifierState};
//! use std::collections::BTreeSet;
//!
//! let mut state = ModifierState::new();
//! state.press(Modifier::Ctrl);
//!
//! let required = BTreeSet::from([Modifier::Ctrl]);
//! assert!(state.is_satisfied(&required));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

/// Keyboard modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Modifier {
    /// Control modifier
    Ctrl,
    /// Alt modifier
    Alt,
    /// Shift modifier
    Shift,
    /// Super/Windows/Meta modifier
    Meta,
}

impl Modifier {
    /// Returns the canonical name of the modifier.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Ctrl => "Ctrl",
            Modifier::Alt => "Alt",
            Modifier::Shift => "Shift",
            Modifier::Meta => "Meta",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a modifier name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownModifier(pub String);

impl fmt::Display for UnknownModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown modifier: {}", self.0)
    }
}

impl std::error::Error for UnknownModifier {}

impl FromStr for Modifier {
    type Err = UnknownModifier;

    /// Parses modifier names as reported by X11/XKB and most toolkits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ctrl" | "control" | "control_l" | "control_r" => Ok(Modifier::Ctrl),
            "alt" | "alt_l" | "alt_r" | "mod1" => Ok(Modifier::Alt),
            "shift" | "shift_l" | "shift_r" => Ok(Modifier::Shift),
            "meta" | "super" | "super_l" | "super_r" | "logo" | "mod4" | "win" => {
                Ok(Modifier::Meta)
            }
            _ => Err(UnknownModifier(s.to_string())),
        }
    }
}

/// Answers whether a modifier combination is currently held.
pub trait ModifierGate {
    /// Returns `true` if every modifier in `required` is held.
    ///
    /// An empty set is always satisfied.
    fn is_satisfied(&self, required: &BTreeSet<Modifier>) -> bool;
}

/// Tracks which modifier keys are currently held down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierState {
    /// Set of currently held modifiers
    held: HashSet<Modifier>,
}

impl ModifierState {
    /// Creates a new `ModifierState` with no held modifiers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
        }
    }

    /// Marks a modifier as held.
    pub fn press(&mut self, modifier: Modifier) {
        self.held.insert(modifier);
    }

    /// Marks a modifier as released.
    pub fn release(&mut self, modifier: Modifier) {
        self.held.remove(&modifier);
    }

    /// Replaces the held set with the given modifiers.
    pub fn set_held(&mut self, modifiers: impl IntoIterator<Item = Modifier>) {
        self.held = modifiers.into_iter().collect();
    }

    /// Checks if a modifier is currently held.
    #[must_use]
    pub fn is_active(&self, modifier: Modifier) -> bool {
        self.held.contains(&modifier)
    }

    /// Returns all held modifiers in canonical order.
    #[must_use]
    pub fn active_modifiers(&self) -> Vec<Modifier> {
        let mut modifiers: Vec<Modifier> = self.held.iter().copied().collect();
        modifiers.sort();
        modifiers
    }

    /// Releases every modifier.
    pub fn clear(&mut self) {
        self.held.clear();
    }
}

impl ModifierGate for ModifierState {
    fn is_satisfied(&self, required: &BTreeSet<Modifier>) -> bool {
        required.iter().all(|modifier| self.held.contains(modifier))
    }
}

/// Parses a list of modifier names, skipping (and logging) unknown ones.
pub fn parse_modifiers<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<Modifier> {
    names
        .into_iter()
        .filter_map(|name| match name.parse::<Modifier>() {
            Ok(modifier) => Some(modifier),
            Err(err) => {
                tracing::warn!("Ignoring {}", err);
                None
            }
        })
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test basic press and release
    #[test]
    fn test_press_release() {
        let mut state = ModifierState::new();

        state.press(Modifier::Shift);
        assert!(state.is_active(Modifier::Shift));

        state.release(Modifier::Shift);
        assert!(!state.is_active(Modifier::Shift));
    }

    /// Empty requirement is trivially satisfied
    #[test]
    fn test_empty_requirement_is_satisfied() {
        let state = ModifierState::new();
        assert!(state.is_satisfied(&BTreeSet::new()));
    }

    /// Every required modifier must be held
    #[test]
    fn test_combination_requires_all() {
        let mut state = ModifierState::new();
        let required = BTreeSet::from([Modifier::Ctrl, Modifier::Alt]);

        state.press(Modifier::Ctrl);
        assert!(!state.is_satisfied(&required));

        state.press(Modifier::Alt);
        assert!(state.is_satisfied(&required));

        // Extra modifiers don't break the combination
        state.press(Modifier::Shift);
        assert!(state.is_satisfied(&required));
    }

    /// set_held replaces rather than merges
    #[test]
    fn test_set_held_replaces() {
        let mut state = ModifierState::new();
        state.press(Modifier::Meta);
        state.set_held([Modifier::Alt, Modifier::Ctrl]);

        assert_eq!(state.active_modifiers(), vec![Modifier::Ctrl, Modifier::Alt]);

        state.clear();
        assert!(state.active_modifiers().is_empty());
    }

    /// Names from different toolkits map onto the same modifier
    #[test]
    fn test_parse_names() {
        assert_eq!("Control_L".parse::<Modifier>(), Ok(Modifier::Ctrl));
        assert_eq!("super".parse::<Modifier>(), Ok(Modifier::Meta));
        assert_eq!("Mod1".parse::<Modifier>(), Ok(Modifier::Alt));
        assert!("Hyper".parse::<Modifier>().is_err());

        let parsed = parse_modifiers(["shift", "bogus", "win"]);
        assert_eq!(parsed, vec![Modifier::Shift, Modifier::Meta]);
    }
}
