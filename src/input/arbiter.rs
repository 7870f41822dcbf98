// SPDX-License-Identifier: GPL-3.0-only

//! Input arbitration: turns raw text from any source into at most one word to
//! look up.
//!
//! There is no queue. The arbiter keeps a single pending slot and every new
//! input overwrites it, so an unconsummated older word is implicitly dropped.

use std::time::Instant;

use crate::config::GateConfig;
use crate::input::alt_mode::{AltModeFire, AltModeTimer};
use crate::input::modifier::ModifierGate;
use crate::input::word::{CandidateWord, CommittedWord};

/// Which selection buffer a clipboard notification refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipboardBuffer {
    /// The regular clipboard.
    Clipboard,
    /// The X11/Wayland primary selection.
    Selection,
}

/// Where a piece of raw text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    /// Text under the mouse pointer.
    Hover,
    /// A clipboard or selection change.
    Clipboard(ClipboardBuffer),
    /// An explicit translate request (hotkey); bypasses gating.
    Hotkey,
}

/// Outcome of submitting raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arbitration {
    /// Look this word up now.
    Commit(CommittedWord),
    /// Gating failed; alt mode is waiting for the modifiers.
    Deferred,
    /// Gating failed and alt mode is off; the input is ignored.
    Dropped,
    /// Nothing was left after folding.
    Empty,
}

/// Normalizes raw input and applies modifier gating.
#[derive(Debug, Clone, Default)]
pub struct InputArbiter {
    /// The single pending candidate slot.
    pending: Option<CandidateWord>,
    /// Deferred-commit wait used by alt mode.
    alt_mode: AltModeTimer,
}

impl InputArbiter {
    /// Creates an arbiter with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Submits raw text from `source`.
    ///
    /// The folded text always replaces the pending slot, even when empty.
    pub fn submit(
        &mut self,
        raw: &str,
        source: InputSource,
        gate: &GateConfig,
        modifiers: &impl ModifierGate,
        now: Instant,
    ) -> Arbitration {
        self.pending = CandidateWord::fold(raw);

        let Some(candidate) = self.pending.as_ref() else {
            if gate.alt_mode_enabled || source == InputSource::Hotkey {
                self.alt_mode.cancel();
            }
            return Arbitration::Empty;
        };

        let gated = source != InputSource::Hotkey && gate.modifier_gating_enabled;
        if gated && !modifiers.is_satisfied(&gate.required_modifiers) {
            if gate.alt_mode_enabled {
                tracing::debug!("Deferring '{}' until modifiers are held", candidate.as_str());
                self.alt_mode.start(now, gate.alt_mode_window());
                return Arbitration::Deferred;
            }
            tracing::trace!("Dropping '{}': modifiers not held", candidate.as_str());
            return Arbitration::Dropped;
        }

        self.alt_mode.cancel();
        self.take_pending()
            .map(Arbitration::Commit)
            .unwrap_or(Arbitration::Empty)
    }

    /// Runs due alt-mode timers.
    ///
    /// Returns the pending word once a poll finds the modifiers held.
    pub fn tick(
        &mut self,
        gate: &GateConfig,
        modifiers: &impl ModifierGate,
        now: Instant,
    ) -> Option<CommittedWord> {
        while let Some(fire) = self.alt_mode.fire_due(now) {
            if fire == AltModeFire::Expired {
                continue;
            }

            if self.pending.is_none() {
                self.alt_mode.cancel();
                return None;
            }

            if modifiers.is_satisfied(&gate.required_modifiers) {
                self.alt_mode.cancel();
                return self.take_pending();
            }
        }
        None
    }

    /// The earliest instant at which [`tick`](Self::tick) has work.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.alt_mode.next_deadline()
    }

    /// The word waiting for gating, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&CandidateWord> {
        self.pending.as_ref()
    }

    /// The alt-mode wait.
    #[must_use]
    pub fn alt_mode(&self) -> &AltModeTimer {
        &self.alt_mode
    }

    fn take_pending(&mut self) -> Option<CommittedWord> {
        self.pending.take().map(CandidateWord::commit)
    }
}
