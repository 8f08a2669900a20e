//! Mock backend for unit and integration testing.
//!
//! The real backend talks to the X server, grabs the keyboard, and injects
//! events the test runner cannot observe. The `MockBackend` replaces all of
//! that with in-memory recording: every call is pushed into a
//! `Mutex<Vec<...>>` field so assertions can inspect exactly what was
//! emitted and in what order.
//!
//! One struct implements all three backend traits, mirroring how a single
//! display connection serves injection, grabbing, and event delivery.
//!
//! Knobs:
//! - `acquire_results` scripts the outcome of successive grab attempts
//!   (empty list means every attempt is granted).
//! - `queued_events` feeds `poll_event`.
//! - `numlock` sets the reported numlock modifier bit.
//! - `set_should_fail(true)` makes every fallible call return a platform
//!   error, for exercising error paths.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use ptrkeys_core::{Keysym, ModMask, ScrollButton};

use crate::application::engine::{
    BackendError, EventSource, GrabAttempt, InputEvent, InputSink, KeyboardGrab,
};

/// A backend that records all calls without touching a display server.
#[derive(Default)]
pub struct MockBackend {
    /// Records each (dx, dy) delta passed to `move_pointer`.
    pub pointer_moves: Mutex<Vec<(i32, i32)>>,
    /// Records (button, pressed) pairs from `press_button`.
    pub button_events: Mutex<Vec<(u8, bool)>>,
    /// Records (button, pulses) pairs from `scroll`.
    pub scrolls: Mutex<Vec<(ScrollButton, u32)>>,
    /// Counts `flush` calls.
    pub flushes: Mutex<u32>,
    /// Counts `acquire` calls.
    pub acquires: Mutex<u32>,
    /// Scripted outcomes for successive `acquire` calls, consumed front to
    /// back. When exhausted (or empty) every attempt is granted.
    pub acquire_results: Mutex<Vec<GrabAttempt>>,
    /// Counts grab `release` calls.
    pub grab_releases: Mutex<u32>,
    /// Records (keys, enabled) pairs from `set_autorepeat`.
    pub autorepeat_calls: Mutex<Vec<(Vec<Keysym>, bool)>>,
    /// Records (mods, suppressed) pairs from `set_modifier_suppression`.
    pub suppression_calls: Mutex<Vec<(ModMask, bool)>>,
    /// Records each keysym passed to `wait_for_release`.
    pub release_waits: Mutex<Vec<Keysym>>,
    /// Events returned by `poll_event`, consumed front to back.
    pub queued_events: Mutex<VecDeque<InputEvent>>,
    /// Counts `wait_for_event` calls.
    pub event_waits: Mutex<u32>,
    /// The numlock modifier bit reported by `numlock_mask`.
    pub numlock: Mutex<ModMask>,
    should_fail: AtomicBool,
}

impl MockBackend {
    /// Creates a backend with empty records, numlock on Mod2, and
    /// `should_fail` off.
    pub fn new() -> Self {
        let backend = Self::default();
        *backend.numlock.lock().unwrap() = ModMask::MOD2;
        backend
    }

    /// Makes every subsequent fallible call return a platform error.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::Relaxed);
    }

    /// Queues a key event for `poll_event`.
    pub fn push_event(&self, event: InputEvent) {
        self.queued_events.lock().unwrap().push_back(event);
    }

    fn check(&self) -> Result<(), BackendError> {
        if self.should_fail.load(Ordering::Relaxed) {
            return Err(BackendError::Platform("mock failure".into()));
        }
        Ok(())
    }
}

impl InputSink for MockBackend {
    fn move_pointer(&self, dx: i32, dy: i32) -> Result<(), BackendError> {
        self.check()?;
        self.pointer_moves.lock().unwrap().push((dx, dy));
        Ok(())
    }

    fn press_button(&self, button: u8, pressed: bool) -> Result<(), BackendError> {
        self.check()?;
        self.button_events.lock().unwrap().push((button, pressed));
        Ok(())
    }

    fn scroll(&self, button: ScrollButton, pulses: u32) -> Result<(), BackendError> {
        self.check()?;
        self.scrolls.lock().unwrap().push((button, pulses));
        Ok(())
    }

    fn flush(&self) -> Result<(), BackendError> {
        self.check()?;
        *self.flushes.lock().unwrap() += 1;
        Ok(())
    }
}

impl KeyboardGrab for MockBackend {
    fn acquire(&self) -> GrabAttempt {
        *self.acquires.lock().unwrap() += 1;
        let mut results = self.acquire_results.lock().unwrap();
        if results.is_empty() {
            GrabAttempt::Granted
        } else {
            results.remove(0)
        }
    }

    fn release(&self) -> Result<(), BackendError> {
        self.check()?;
        *self.grab_releases.lock().unwrap() += 1;
        Ok(())
    }

    fn set_autorepeat(&self, keys: &[Keysym], enabled: bool) -> Result<(), BackendError> {
        self.check()?;
        self.autorepeat_calls
            .lock()
            .unwrap()
            .push((keys.to_vec(), enabled));
        Ok(())
    }

    fn set_modifier_suppression(
        &self,
        mods: ModMask,
        suppressed: bool,
    ) -> Result<(), BackendError> {
        self.check()?;
        self.suppression_calls
            .lock()
            .unwrap()
            .push((mods, suppressed));
        Ok(())
    }
}

impl EventSource for MockBackend {
    fn poll_event(&self) -> Option<InputEvent> {
        self.queued_events.lock().unwrap().pop_front()
    }

    /// Returns immediately. Tests queue events up front, so blocking here
    /// would only deadlock the control loop.
    fn wait_for_event(&self) {
        *self.event_waits.lock().unwrap() += 1;
    }

    fn wait_for_release(&self, keysym: Keysym) {
        self.release_waits.lock().unwrap().push(keysym);
    }

    fn numlock_mask(&self) -> ModMask {
        *self.numlock.lock().unwrap()
    }
}
