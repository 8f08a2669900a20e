//! Key bindings and dispatch.
//!
//! A binding table is an ordered list of [`KeyBinding`] entries; dispatch is
//! a linear scan where the first matching entry wins, so insertion order is
//! the tie-break. Commands are a closed enum rather than callbacks, which
//! keeps the table inspectable by the validator and trivially testable.

use crate::domain::movement::DirectionSet;
use crate::keymap::{describe_key, Keysym, ModMask};

pub mod validate;

/// A physical mouse button for click commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// The X11 core button number.
    pub fn button_number(self) -> u8 {
        match self {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 3,
        }
    }
}

/// Everything a key can be bound to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    MoveStart(DirectionSet),
    MoveStop(DirectionSet),
    ScrollStart(DirectionSet),
    ScrollStop(DirectionSet),
    /// Multiplies the speed multiplier of both channels by the factor.
    MultiplySpeed(f64),
    /// Divides the speed multiplier of both channels by the factor.
    DivideSpeed(f64),
    ClickPress(MouseButton),
    ClickRelease(MouseButton),
    /// Grabs the keyboard. If a keysym is given, dispatch of further events
    /// is deferred until that key is released, so the key that triggered the
    /// grab cannot leak a press into grabbed mode.
    Grab { wait_release: Option<Keysym> },
    Ungrab,
    ToggleGrab,
    /// Grab and immediately enter move-to-scroll mode.
    GrabAndScroll,
    MoveToScroll(bool),
    ToggleMoveToScroll,
    /// Restores both channels to rest and disables move-to-scroll.
    ResetMovement,
    Quit,
}

/// Per-binding flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BindingOptions {
    /// The key is grabbed individually at the server, so the binding stays
    /// active as a global hotkey while the keyboard is ungrabbed. Without
    /// it the binding only ever sees events during a keyboard grab. Also
    /// the namespace key for duplicate detection: a hotkey and a
    /// grabbed-only binding of the same key never conflict.
    pub requires_grab: bool,
    /// Disable X auto-repeat for this key while grabbed, so holding a
    /// movement key delivers one press and one release.
    pub no_autorepeat: bool,
}

/// One row of the binding table.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBinding {
    pub mods: ModMask,
    pub keysym: Keysym,
    pub options: BindingOptions,
    pub on_press: Option<Command>,
    pub on_release: Option<Command>,
}

impl KeyBinding {
    /// The human-readable description used in validator reports and logs.
    pub fn describe(&self) -> String {
        describe_key(self.mods, self.keysym)
    }
}

/// Ordered binding table with first-match-wins dispatch.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    bindings: Vec<KeyBinding>,
}

impl BindingTable {
    pub fn new(bindings: Vec<KeyBinding>) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }

    /// Keys that request auto-repeat suppression while grabbed.
    pub fn no_autorepeat_keys(&self) -> Vec<Keysym> {
        self.bindings
            .iter()
            .filter(|b| b.options.no_autorepeat)
            .map(|b| b.keysym)
            .collect()
    }

    /// Bindings to register as global hotkeys at startup.
    pub fn global_hotkeys(&self) -> impl Iterator<Item = &KeyBinding> {
        self.bindings.iter().filter(|b| b.options.requires_grab)
    }

    /// Resolves a key press to its bound command.
    ///
    /// Scans in table order. A binding is skipped when:
    /// - its keysym differs from the event's;
    /// - the keyboard is grabbed and the binding carries modifiers (grabbed
    ///   dispatch matches the keysym alone, so chords work like game
    ///   controls regardless of which modifiers happen to be down);
    /// - the keyboard is not grabbed and the binding's modifiers do not
    ///   exactly equal the event state once caps lock and the numlock bit
    ///   are masked out of both sides;
    /// - it has no press command.
    ///
    /// The first surviving binding wins. `None` means the event is ignored.
    /// Whether an ungrabbed key generates an event at all is the backend's
    /// concern: only globally grabbed hotkeys are delivered outside the
    /// keyboard grab.
    pub fn find_press(
        &self,
        grabbed: bool,
        keysym: Keysym,
        state: ModMask,
        numlock: ModMask,
    ) -> Option<&KeyBinding> {
        self.bindings.iter().find(|b| {
            if b.keysym != keysym || b.on_press.is_none() {
                return false;
            }
            if grabbed {
                b.mods.is_empty()
            } else {
                b.mods.without_locks(numlock) == state.without_locks(numlock)
            }
        })
    }

    /// Resolves a key release to its bound command.
    ///
    /// Only unmodified bindings can carry release commands (the validator
    /// enforces this), so release matching is by keysym alone and ignores
    /// both modifier state and grab state: a key pressed before a grab
    /// change must still deliver its release.
    pub fn find_release(&self, keysym: Keysym) -> Option<&KeyBinding> {
        self.bindings
            .iter()
            .find(|b| b.keysym == keysym && b.mods.is_empty() && b.on_release.is_some())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::keysyms::*;

    fn binding(
        mods: ModMask,
        keysym: Keysym,
        requires_grab: bool,
        on_press: Option<Command>,
        on_release: Option<Command>,
    ) -> KeyBinding {
        KeyBinding {
            mods,
            keysym,
            options: BindingOptions {
                requires_grab,
                no_autorepeat: false,
            },
            on_press,
            on_release,
        }
    }

    fn move_right_press() -> Option<Command> {
        Some(Command::MoveStart(DirectionSet::RIGHT))
    }

    #[test]
    fn test_find_press_matches_keysym_in_grabbed_mode() {
        let table = BindingTable::new(vec![binding(
            ModMask::NONE,
            XK_L,
            true,
            move_right_press(),
            Some(Command::MoveStop(DirectionSet::RIGHT)),
        )]);
        let hit = table.find_press(true, XK_L, ModMask::NONE, ModMask::MOD2);
        assert_eq!(hit.unwrap().on_press, move_right_press());
    }

    #[test]
    fn test_find_press_grabbed_ignores_modifier_state_on_unmodified_bindings() {
        // Holding Shift while pressing a movement key must still move.
        let table = BindingTable::new(vec![binding(
            ModMask::NONE,
            XK_L,
            true,
            move_right_press(),
            None,
        )]);
        let hit = table.find_press(true, XK_L, ModMask::SHIFT | ModMask::CONTROL, ModMask::MOD2);
        assert!(hit.is_some());
    }

    #[test]
    fn test_find_press_grabbed_skips_modified_bindings() {
        let table = BindingTable::new(vec![binding(
            ModMask::MOD4,
            XK_W,
            true,
            Some(Command::ToggleGrab),
            None,
        )]);
        assert!(table
            .find_press(true, XK_W, ModMask::MOD4, ModMask::MOD2)
            .is_none());
    }

    #[test]
    fn test_find_press_ungrabbed_requires_exact_modifier_match() {
        let table = BindingTable::new(vec![binding(
            ModMask::MOD4,
            XK_W,
            true,
            Some(Command::ToggleGrab),
            None,
        )]);
        assert!(table
            .find_press(false, XK_W, ModMask::MOD4, ModMask::MOD2)
            .is_some());
        assert!(table
            .find_press(false, XK_W, ModMask::MOD4 | ModMask::SHIFT, ModMask::MOD2)
            .is_none());
        assert!(table
            .find_press(false, XK_W, ModMask::NONE, ModMask::MOD2)
            .is_none());
    }

    #[test]
    fn test_find_press_ungrabbed_masks_lock_modifiers_from_both_sides() {
        let table = BindingTable::new(vec![binding(
            ModMask::MOD4,
            XK_W,
            true,
            Some(Command::ToggleGrab),
            None,
        )]);
        // Caps lock and numlock active must not break the hotkey.
        let state = ModMask::MOD4 | ModMask::LOCK | ModMask::MOD2;
        assert!(table.find_press(false, XK_W, state, ModMask::MOD2).is_some());
    }

    #[test]
    fn test_global_hotkeys_selects_grab_flagged_bindings() {
        let table = BindingTable::new(vec![
            binding(ModMask::MOD4, XK_W, true, Some(Command::ToggleGrab), None),
            binding(ModMask::NONE, XK_L, false, move_right_press(), None),
        ]);
        let hotkeys: Vec<_> = table.global_hotkeys().map(|b| b.keysym).collect();
        assert_eq!(hotkeys, vec![XK_W]);
    }

    #[test]
    fn test_find_press_first_match_wins() {
        let table = BindingTable::new(vec![
            binding(ModMask::NONE, XK_Q, true, Some(Command::Ungrab), None),
            binding(ModMask::NONE, XK_Q, true, Some(Command::Quit), None),
        ]);
        let hit = table.find_press(true, XK_Q, ModMask::NONE, ModMask::MOD2);
        assert_eq!(hit.unwrap().on_press, Some(Command::Ungrab));
    }

    #[test]
    fn test_find_press_skips_release_only_bindings() {
        let table = BindingTable::new(vec![binding(
            ModMask::NONE,
            XK_L,
            true,
            None,
            Some(Command::MoveStop(DirectionSet::RIGHT)),
        )]);
        assert!(table
            .find_press(true, XK_L, ModMask::NONE, ModMask::MOD2)
            .is_none());
    }

    #[test]
    fn test_find_release_matches_by_keysym_alone() {
        let table = BindingTable::new(vec![binding(
            ModMask::NONE,
            XK_L,
            true,
            move_right_press(),
            Some(Command::MoveStop(DirectionSet::RIGHT)),
        )]);
        let hit = table.find_release(XK_L);
        assert_eq!(
            hit.unwrap().on_release,
            Some(Command::MoveStop(DirectionSet::RIGHT))
        );
    }

    #[test]
    fn test_find_release_skips_bindings_without_release_command() {
        let table = BindingTable::new(vec![binding(
            ModMask::NONE,
            XK_Q,
            true,
            Some(Command::Quit),
            None,
        )]);
        assert!(table.find_release(XK_Q).is_none());
    }

    #[test]
    fn test_find_release_skips_modified_bindings() {
        // A modified binding never matches a release even if one slipped in.
        let table = BindingTable::new(vec![binding(
            ModMask::SHIFT,
            XK_L,
            true,
            move_right_press(),
            Some(Command::MoveStop(DirectionSet::RIGHT)),
        )]);
        assert!(table.find_release(XK_L).is_none());
    }

    #[test]
    fn test_no_autorepeat_keys_collects_flagged_keysyms() {
        let mut flagged = binding(ModMask::NONE, XK_L, true, move_right_press(), None);
        flagged.options.no_autorepeat = true;
        let plain = binding(ModMask::NONE, XK_Q, true, Some(Command::Quit), None);
        let table = BindingTable::new(vec![flagged, plain]);
        assert_eq!(table.no_autorepeat_keys(), vec![XK_L]);
    }
}
