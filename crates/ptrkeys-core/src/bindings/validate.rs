//! Startup validation of the binding table.
//!
//! Three independent checks run once before the event loop starts. Any
//! violation is fatal: a table that passes is unambiguous (every key event
//! resolves to at most one binding per grab namespace) and safe (no release
//! command can be orphaned by chord-release ordering, no modified hotkey
//! depends on grabbed-mode interception it will never get).

use thiserror::Error;

use super::BindingTable;

/// A single binding-table violation.
///
/// Each variant carries the human-readable key description of the offending
/// binding so the report identifies it without index arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    /// Two bindings share keysym, modifiers, and grab namespace.
    #[error("duplicate binding for {key} ({namespace})")]
    Duplicate {
        key: String,
        namespace: &'static str,
    },

    /// A binding with modifiers carries a release command. Modifier keys of
    /// a chord can be released in any order, so the release event may not
    /// carry the modifiers the binding expects.
    #[error("modified binding {key} has a release command")]
    ModifiedRelease { key: String },

    /// A binding with modifiers is active outside the grab. Modified keys
    /// are only reliably interceptable as grabbed global hotkeys.
    #[error("modified binding {key} does not require the grab")]
    ModifiedWithoutGrab { key: String },
}

/// Runs all three checks over the whole table.
///
/// # Errors
///
/// Returns every violation found, not just the first, so a misconfigured
/// table is fixable in one pass. Duplicate pairs are reported once per pair.
pub fn validate(table: &BindingTable) -> Result<(), Vec<BindingError>> {
    let bindings = table.bindings();
    let mut violations = Vec::new();

    for (i, b) in bindings.iter().enumerate() {
        for other in &bindings[i + 1..] {
            if b.keysym == other.keysym
                && b.mods == other.mods
                && b.options.requires_grab == other.options.requires_grab
            {
                violations.push(BindingError::Duplicate {
                    key: b.describe(),
                    namespace: if b.options.requires_grab {
                        "grabbed"
                    } else {
                        "ungrabbed"
                    },
                });
            }
        }
        if !b.mods.is_empty() {
            if b.on_release.is_some() {
                violations.push(BindingError::ModifiedRelease { key: b.describe() });
            }
            if !b.options.requires_grab {
                violations.push(BindingError::ModifiedWithoutGrab { key: b.describe() });
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
