//! Keysym and modifier-mask types.
//!
//! ptrkeys identifies keys by X11 keysym value and modifier state by the
//! X11 modifier bitmask (Shift, Lock, Control, Mod1–Mod5). Both are plain
//! newtypes here so the core stays free of any windowing-system dependency;
//! the backend translates them at the boundary.
//!
//! The module also renders human-readable key descriptions
//! (`"Shift+Mod4+w"`) used by the binding validator and trace logging.

use std::fmt;

pub mod keysyms;

/// An X11 keysym value (e.g. `0x61` for `a`, `0xffe1` for `Shift_L`).
///
/// Bindings use unshifted keysyms: `a` rather than `A`, `5` rather than `%`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Keysym(pub u32);

impl Keysym {
    /// Returns the X-style name of this keysym, or `None` for keysyms the
    /// table does not know about.
    pub fn name(self) -> Option<&'static str> {
        keysyms::keysym_name(self)
    }
}

impl fmt::Display for Keysym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            // Unknown keysyms print as bare hex, mirroring how the X
            // utilities fall back when no name is mapped.
            None => write!(f, "{:x}", self.0),
        }
    }
}

/// A set of X11 modifier bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ModMask(pub u32);

impl ModMask {
    pub const NONE: ModMask = ModMask(0);
    pub const SHIFT: ModMask = ModMask(1 << 0);
    /// Caps lock. A lock-type modifier: excluded from binding comparisons.
    pub const LOCK: ModMask = ModMask(1 << 1);
    pub const CONTROL: ModMask = ModMask(1 << 2);
    pub const MOD1: ModMask = ModMask(1 << 3);
    pub const MOD2: ModMask = ModMask(1 << 4);
    pub const MOD3: ModMask = ModMask(1 << 5);
    pub const MOD4: ModMask = ModMask(1 << 6);
    pub const MOD5: ModMask = ModMask(1 << 7);

    /// All modifier bits that represent held keys (everything but Lock).
    const HELD: u32 = Self::SHIFT.0
        | Self::CONTROL.0
        | Self::MOD1.0
        | Self::MOD2.0
        | Self::MOD3.0
        | Self::MOD4.0
        | Self::MOD5.0;

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: ModMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Strips lock-type modifiers (caps lock and the given numlock bit) so
    /// that toggle state never affects binding comparisons.
    ///
    /// The numlock bit is not fixed by the protocol; it is whichever of
    /// Mod1–Mod5 the server's modifier map assigns `Num_Lock` to, and is
    /// discovered at runtime by the backend.
    pub fn without_locks(self, numlock: ModMask) -> ModMask {
        ModMask(self.0 & !(numlock.0 | Self::LOCK.0) & Self::HELD)
    }

    /// Names of the set bits in mask order, e.g. `["Shift", "Mod4"]`.
    fn bit_names(self) -> impl Iterator<Item = &'static str> {
        const NAMES: [(u32, &str); 8] = [
            (1 << 0, "Shift"),
            (1 << 1, "Lock"),
            (1 << 2, "Control"),
            (1 << 3, "Mod1"),
            (1 << 4, "Mod2"),
            (1 << 5, "Mod3"),
            (1 << 6, "Mod4"),
            (1 << 7, "Mod5"),
        ];
        let mask = self.0;
        NAMES
            .into_iter()
            .filter(move |(bit, _)| mask & bit != 0)
            .map(|(_, name)| name)
    }
}

impl std::ops::BitOr for ModMask {
    type Output = ModMask;

    fn bitor(self, rhs: ModMask) -> ModMask {
        ModMask(self.0 | rhs.0)
    }
}

/// Renders a (modifiers, keysym) pair as the ordered modifier names joined
/// by `+`, followed by the key name: `"Shift+Control+Home"`, or just `"a"`
/// when no modifiers are set.
///
/// This is the description format used in every validator report and trace
/// line, so a misconfigured binding is identifiable at a glance.
pub fn describe_key(mods: ModMask, keysym: Keysym) -> String {
    let mut out = String::new();
    for name in mods.bit_names() {
        out.push_str(name);
        out.push('+');
    }
    out.push_str(&keysym.to_string());
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
