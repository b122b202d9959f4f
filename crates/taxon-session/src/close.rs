// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Close-decision state machine, entered only on a cancel/close attempt.
//!
//! `CheckDirty` → `Resolved(Cancel)` when the state is clean, otherwise
//! `PromptUser` → `Resolved(Save|Discard)` or `StayOpen`, which loops back
//! into the live session so the user may re-attempt closing later.
//!
//! Dirty bias is fail-safe: a known snapshot plus a failing current
//! serialization counts as dirty, so potential changes are never silently
//! discarded. The one carve-out: when the snapshot was already unknown and
//! the current state also fails to serialize, there is nothing to compare
//! and the close resolves as a plain cancel.

use crate::surface::CloseChoice;

/// States of the close-decision machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseState {
    /// Compare current serialization against the initial snapshot.
    CheckDirty,
    /// State differs; ask the user what to do.
    PromptUser,
    /// Terminal: resolve the session.
    Resolved(CloseResolution),
    /// Return control to the live session without closing.
    StayOpen,
}

/// Terminal resolutions of a close attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseResolution {
    /// Serialize and resolve saved, same path as an explicit save action.
    Save,
    /// Resolve unsaved with reason "discarded".
    Discard,
    /// Resolve unsaved with reason "canceled".
    Cancel,
}

/// Dirty comparison over canonical serialized strings. `None` means the
/// respective serialization failed or was never available.
pub fn is_dirty(snapshot: Option<&str>, current: Option<&str>) -> bool {
    match (snapshot, current) {
        // Nothing was ever comparable; treat the close as clean.
        (None, None) => false,
        // Unknown snapshot with a live serializable state: assume dirty.
        (None, Some(_)) => true,
        // Snapshot known but the current state won't serialize: fail safe.
        (Some(_), None) => true,
        (Some(before), Some(now)) => before != now,
    }
}

/// Transition out of `CheckDirty`.
pub fn after_dirty_check(dirty: bool) -> CloseState {
    if dirty {
        CloseState::PromptUser
    } else {
        CloseState::Resolved(CloseResolution::Cancel)
    }
}

/// Transition out of `PromptUser`.
pub fn after_prompt(choice: CloseChoice) -> CloseState {
    match choice {
        CloseChoice::Save => CloseState::Resolved(CloseResolution::Save),
        CloseChoice::Discard => CloseState::Resolved(CloseResolution::Discard),
        CloseChoice::StayOpen => CloseState::StayOpen,
    }
}
