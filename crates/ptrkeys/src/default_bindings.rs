//! The compiled-in binding table.
//!
//! Use unshifted keysyms regardless of whether shift will be pressed:
//! `a` or `5` rather than `A` or `%`.
//!
//! Keys with modifiers cannot have release commands, since the order of key
//! release in a chord is significant. While the keyboard is grabbed,
//! modifier bits are ignored when matching, similar to how keybindings work
//! for video games, so modified bindings are hotkey-only and must set
//! `requires_grab`.
//!
//! The Select bindings assume the caps lock key has been rebound in xmodmap
//! (`keycode 66 = Select`) to avoid toggling the Lock modifier. If the
//! keyboard will be grabbed while a key is held down, auto-repeat must be
//! disabled for that key via `no_autorepeat`.

use ptrkeys_core::keymap::keysyms::*;
use ptrkeys_core::{
    BindingOptions, BindingTable, Command, DirectionSet, KeyBinding, Keysym, ModMask, MouseButton,
};

const PLAIN: BindingOptions = BindingOptions {
    requires_grab: false,
    no_autorepeat: false,
};
const HOTKEY: BindingOptions = BindingOptions {
    requires_grab: true,
    no_autorepeat: false,
};
const HOTKEY_NOREPEAT: BindingOptions = BindingOptions {
    requires_grab: true,
    no_autorepeat: true,
};

fn bind(
    mods: ModMask,
    keysym: Keysym,
    options: BindingOptions,
    on_press: Option<Command>,
    on_release: Option<Command>,
) -> KeyBinding {
    KeyBinding {
        mods,
        keysym,
        options,
        on_press,
        on_release,
    }
}

/// Builds the default table. Insertion order is the dispatch tie-break.
pub fn default_bindings() -> BindingTable {
    use Command::*;
    use DirectionSet as Dir;

    BindingTable::new(vec![
        // Enable/disable.
        bind(
            ModMask::MOD4,
            XK_W,
            HOTKEY,
            Some(Grab {
                wait_release: Some(XK_W),
            }),
            None,
        ),
        bind(ModMask::NONE, XK_Q, PLAIN, Some(Ungrab), None),
        bind(
            ModMask::NONE,
            XK_SELECT,
            HOTKEY_NOREPEAT,
            Some(Grab { wait_release: None }),
            Some(Ungrab),
        ),
        bind(
            ModMask::SHIFT,
            XK_SELECT,
            HOTKEY_NOREPEAT,
            Some(GrabAndScroll),
            None,
        ),
        bind(ModMask::MOD4, XK_V, HOTKEY, Some(ToggleGrab), None),
        bind(ModMask::NONE, XK_X, PLAIN, Some(Quit), None),
        // Directional control with WASD.
        bind(
            ModMask::NONE,
            XK_W,
            PLAIN,
            Some(MoveStart(Dir::UP)),
            Some(MoveStop(Dir::UP)),
        ),
        bind(
            ModMask::NONE,
            XK_A,
            PLAIN,
            Some(MoveStart(Dir::LEFT)),
            Some(MoveStop(Dir::LEFT)),
        ),
        bind(
            ModMask::NONE,
            XK_S,
            PLAIN,
            Some(MoveStart(Dir::DOWN)),
            Some(MoveStop(Dir::DOWN)),
        ),
        bind(
            ModMask::NONE,
            XK_D,
            PLAIN,
            Some(MoveStart(Dir::RIGHT)),
            Some(MoveStop(Dir::RIGHT)),
        ),
        // Scrolling: hold shift, or toggle with f.
        bind(
            ModMask::NONE,
            XK_SHIFT_L,
            PLAIN,
            Some(MoveToScroll(true)),
            Some(MoveToScroll(false)),
        ),
        bind(ModMask::NONE, XK_F, PLAIN, Some(ToggleMoveToScroll), None),
        // Speed multiply/divide.
        bind(
            ModMask::NONE,
            XK_ALT_L,
            PLAIN,
            Some(DivideSpeed(8.0)),
            Some(MultiplySpeed(8.0)),
        ),
        bind(
            ModMask::NONE,
            XK_CONTROL_L,
            PLAIN,
            Some(MultiplySpeed(32.0)),
            Some(DivideSpeed(32.0)),
        ),
        bind(
            ModMask::NONE,
            XK_J,
            PLAIN,
            Some(DivideSpeed(8.0)),
            Some(MultiplySpeed(8.0)),
        ),
        bind(
            ModMask::NONE,
            XK_K,
            PLAIN,
            Some(DivideSpeed(2.0)),
            Some(MultiplySpeed(2.0)),
        ),
        bind(
            ModMask::NONE,
            XK_L,
            PLAIN,
            Some(MultiplySpeed(4.0)),
            Some(DivideSpeed(4.0)),
        ),
        bind(
            ModMask::NONE,
            XK_SEMICOLON,
            PLAIN,
            Some(MultiplySpeed(8.0)),
            Some(DivideSpeed(8.0)),
        ),
        // Left-handed clicking.
        bind(
            ModMask::NONE,
            XK_SPACE,
            PLAIN,
            Some(ClickPress(MouseButton::Left)),
            Some(ClickRelease(MouseButton::Left)),
        ),
        bind(
            ModMask::NONE,
            XK_E,
            PLAIN,
            Some(ClickPress(MouseButton::Right)),
            Some(ClickRelease(MouseButton::Right)),
        ),
        bind(
            ModMask::NONE,
            XK_R,
            PLAIN,
            Some(ClickPress(MouseButton::Middle)),
            Some(ClickRelease(MouseButton::Middle)),
        ),
        // Right-handed clicking, for dragging etc.
        bind(
            ModMask::NONE,
            XK_N,
            PLAIN,
            Some(ClickPress(MouseButton::Right)),
            Some(ClickRelease(MouseButton::Right)),
        ),
        bind(
            ModMask::NONE,
            XK_M,
            PLAIN,
            Some(ClickPress(MouseButton::Middle)),
            Some(ClickRelease(MouseButton::Middle)),
        ),
        // Debugging.
        bind(ModMask::MOD4, XK_G, HOTKEY, Some(ResetMovement), None),
    ])
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ptrkeys_core::validate;

    #[test]
    fn test_default_bindings_pass_validation() {
        assert_eq!(validate(&default_bindings()), Ok(()));
    }

    #[test]
    fn test_default_table_distinguishes_hotkey_w_from_movement_w() {
        let table = default_bindings();
        // Ungrabbed: Mod4+w is the grab hotkey.
        let hit = table
            .find_press(false, XK_W, ModMask::MOD4, ModMask::MOD2)
            .expect("hotkey must match");
        assert!(matches!(hit.on_press, Some(Command::Grab { .. })));
        // Grabbed: bare w moves up.
        let hit = table
            .find_press(true, XK_W, ModMask::NONE, ModMask::MOD2)
            .expect("movement must match");
        assert_eq!(hit.on_press, Some(Command::MoveStart(DirectionSet::UP)));
    }

    #[test]
    fn test_default_table_flags_select_keys_for_autorepeat_suppression() {
        let keys = default_bindings().no_autorepeat_keys();
        assert_eq!(keys, vec![XK_SELECT, XK_SELECT]);
    }

    #[test]
    fn test_default_table_registers_expected_hotkeys() {
        let hotkeys: Vec<_> = default_bindings()
            .global_hotkeys()
            .map(|b| (b.mods, b.keysym))
            .collect();
        assert_eq!(
            hotkeys,
            vec![
                (ModMask::MOD4, XK_W),
                (ModMask::NONE, XK_SELECT),
                (ModMask::SHIFT, XK_SELECT),
                (ModMask::MOD4, XK_V),
                (ModMask::MOD4, XK_G),
            ]
        );
    }
}
