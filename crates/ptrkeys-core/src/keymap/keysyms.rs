//! Keysym constants and the name table.
//!
//! Values are the standard X11 keysym assignments: Latin-1 keys are their
//! ASCII codes, function and modifier keys live in the 0xff00 page. Only the
//! keysyms the default binding table and the tests touch are named here;
//! anything else still works as a raw [`Keysym`] value and prints as hex.

use super::Keysym;

// Latin-1 (ASCII) keys.
pub const XK_SPACE: Keysym = Keysym(0x20);
pub const XK_SEMICOLON: Keysym = Keysym(0x3b);
pub const XK_A: Keysym = Keysym(0x61);
pub const XK_B: Keysym = Keysym(0x62);
pub const XK_C: Keysym = Keysym(0x63);
pub const XK_D: Keysym = Keysym(0x64);
pub const XK_E: Keysym = Keysym(0x65);
pub const XK_F: Keysym = Keysym(0x66);
pub const XK_G: Keysym = Keysym(0x67);
pub const XK_H: Keysym = Keysym(0x68);
pub const XK_I: Keysym = Keysym(0x69);
pub const XK_J: Keysym = Keysym(0x6a);
pub const XK_K: Keysym = Keysym(0x6b);
pub const XK_L: Keysym = Keysym(0x6c);
pub const XK_M: Keysym = Keysym(0x6d);
pub const XK_N: Keysym = Keysym(0x6e);
pub const XK_Q: Keysym = Keysym(0x71);
pub const XK_R: Keysym = Keysym(0x72);
pub const XK_S: Keysym = Keysym(0x73);
pub const XK_V: Keysym = Keysym(0x76);
pub const XK_W: Keysym = Keysym(0x77);
pub const XK_X: Keysym = Keysym(0x78);

// Function and editing keys.
pub const XK_HOME: Keysym = Keysym(0xff50);
pub const XK_SELECT: Keysym = Keysym(0xff60);
pub const XK_NUM_LOCK: Keysym = Keysym(0xff7f);

// Modifier keys.
pub const XK_SHIFT_L: Keysym = Keysym(0xffe1);
pub const XK_CONTROL_L: Keysym = Keysym(0xffe3);
pub const XK_CAPS_LOCK: Keysym = Keysym(0xffe5);
pub const XK_ALT_L: Keysym = Keysym(0xffe9);
pub const XK_SUPER_L: Keysym = Keysym(0xffeb);
pub const XK_HYPER_R: Keysym = Keysym(0xffee);

/// Looks up the X-style name for a keysym.
///
/// Printable Latin-1 letters and digits render as their character; a small
/// table covers the function and modifier keys ptrkeys binds by default.
pub fn keysym_name(keysym: Keysym) -> Option<&'static str> {
    // Special names for printable keys whose X name is not the character.
    let special = match keysym {
        XK_SPACE => Some("space"),
        XK_SEMICOLON => Some("semicolon"),
        XK_HOME => Some("Home"),
        XK_SELECT => Some("Select"),
        XK_NUM_LOCK => Some("Num_Lock"),
        XK_SHIFT_L => Some("Shift_L"),
        XK_CONTROL_L => Some("Control_L"),
        XK_CAPS_LOCK => Some("Caps_Lock"),
        XK_ALT_L => Some("Alt_L"),
        XK_SUPER_L => Some("Super_L"),
        XK_HYPER_R => Some("Hyper_R"),
        _ => None,
    };
    if special.is_some() {
        return special;
    }
    match keysym.0 {
        // Lowercase letters and digits map to static single-char strings.
        0x30..=0x39 => Some(DIGITS[(keysym.0 - 0x30) as usize]),
        0x61..=0x7a => Some(LETTERS[(keysym.0 - 0x61) as usize]),
        _ => None,
    }
}

const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

const LETTERS: [&str; 26] = [
    "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s",
    "t", "u", "v", "w", "x", "y", "z",
];
