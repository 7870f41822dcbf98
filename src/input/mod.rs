// SPDX-License-Identifier: GPL-3.0-only

//! Input handling for the scan popup.
//!
//! This module turns raw text from the hover, clipboard and hotkey sources
//! into at most one word to look up, honouring the configured modifier gating.
//!
//! # Features
//!
//! - **Word folding**: Trim whitespace and punctuation from raw input
//! - **Modifier gating**: Only commit words while the required modifiers are held
//! - **Alt mode**: Keep polling for the modifiers for a while after a rejected word
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use cosdict::config::Config;
//! use cosdict::input::{Arbitration, InputArbiter, InputSource, ModifierState};
//! use std::time::Instant;
//!
//! let gate = Config::default().gate();
//! let modifiers = ModifierState::new();
//! let mut arbiter = InputArbiter::new();
//!
//! match arbiter.submit(" word, ", InputSource::Hover, &gate, &modifiers, Instant::now()) {
//!     Arbitration::Commit(word) => println!("Look up {}", word),
//!     Arbitration::Deferred => println!("Waiting for modifiers"),
//!     Arbitration::Dropped | Arbitration::Empty => {}
//! }
//! ```
//!
//! # Alt Mode
//!
//! When gating rejects a word and alt mode is enabled, the word stays pending
//! and [`InputArbiter::tick`] polls the modifiers every 50ms until the
//! alt-mode window runs out. A poll that finds them held commits whatever word
//! is pending at that moment, which is always the newest input.

pub mod alt_mode;
pub mod arbiter;
pub mod modifier;
pub mod word;

pub use alt_mode::{AltModeFire, AltModeTimer};
pub use arbiter::{Arbitration, ClipboardBuffer, InputArbiter, InputSource};
pub use modifier::{parse_modifiers, Modifier, ModifierGate, ModifierState};
pub use word::{trim_whitespace_or_punct, CandidateWord, CommittedWord};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::time::{Duration, Instant};

    fn gated(alt_mode: bool) -> crate::config::GateConfig {
        Config {
            modifier_gating_enabled: true,
            required_modifiers: parse_modifiers(["Control_L", "Alt"]),
            alt_mode_enabled: alt_mode,
            alt_mode_window_ms: 200,
            ..Config::default()
        }
        .gate()
    }

    #[test]
    fn test_configured_modifier_names_gate_input() {
        let gate = gated(false);
        let mut modifiers = ModifierState::new();
        let mut arbiter = InputArbiter::new();
        let now = Instant::now();

        modifiers.press(Modifier::Ctrl);
        let outcome = arbiter.submit("word", InputSource::Hover, &gate, &modifiers, now);
        assert_eq!(outcome, Arbitration::Dropped);

        modifiers.press(Modifier::Alt);
        let outcome = arbiter.submit("word", InputSource::Hover, &gate, &modifiers, now);
        assert!(matches!(outcome, Arbitration::Commit(ref w) if w.as_str() == "word"));
    }

    #[test]
    fn test_alt_mode_commits_after_modifiers_pressed() {
        let gate = gated(true);
        let mut modifiers = ModifierState::new();
        let mut arbiter = InputArbiter::new();
        let t0 = Instant::now();

        let outcome = arbiter.submit("«quoted»", InputSource::Hover, &gate, &modifiers, t0);
        assert_eq!(outcome, Arbitration::Deferred);
        assert_eq!(arbiter.tick(&gate, &modifiers, t0 + Duration::from_millis(50)), None);

        modifiers.set_held([Modifier::Ctrl, Modifier::Alt]);
        let word = arbiter.tick(&gate, &modifiers, t0 + Duration::from_millis(100));
        assert_eq!(word.map(|w| w.as_str().to_string()), Some("quoted".to_string()));
        assert_eq!(arbiter.next_deadline(), None);
    }

    #[test]
    fn test_clipboard_source_is_gated_like_hover() {
        let gate = gated(false);
        let modifiers = ModifierState::new();
        let mut arbiter = InputArbiter::new();

        let source = InputSource::Clipboard(ClipboardBuffer::Selection);
        let outcome = arbiter.submit("word", source, &gate, &modifiers, Instant::now());
        assert_eq!(outcome, Arbitration::Dropped);
    }
}
