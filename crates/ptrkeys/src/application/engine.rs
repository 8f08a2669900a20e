//! The engine: binding dispatch, command execution, and grab state.
//!
//! The engine owns the two movement channels, the grab flag, and the
//! move-to-scroll mode, and delegates to three backend trait objects for
//! everything that touches the display server. The control loop drives it:
//! key events go through [`Engine::handle_event`], elapsed time through
//! [`Engine::tick`].

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, trace, warn};

use ptrkeys_core::{
    describe_key, BindingTable, Command, Keysym, ModMask, Movement, MovementError, ScrollButton,
    ScrollUpdate,
};

/// Error type for backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("platform error: {0}")]
    Platform(String),
}

/// Outcome of one keyboard-grab acquisition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrabAttempt {
    /// The grab is held.
    Granted,
    /// Another client holds the grab right now; worth retrying.
    Busy,
    /// Unrecoverable refusal (bad window, frozen pointer, ...).
    Failed(String),
}

/// A raw key event as reported by the event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Press { keysym: Keysym, state: ModMask },
    Release { keysym: Keysym, state: ModMask },
    /// The server's modifier mapping changed; lock masks must be
    /// rediscovered.
    MappingChanged,
}

/// Synthetic input injection.
pub trait InputSink {
    /// Moves the pointer by a relative pixel delta.
    fn move_pointer(&self, dx: i32, dy: i32) -> Result<(), BackendError>;

    /// Presses or releases a pointer button (X11 core button number).
    fn press_button(&self, button: u8, pressed: bool) -> Result<(), BackendError>;

    /// Emits `pulses` press+release pairs of the given scroll button.
    fn scroll(&self, button: ScrollButton, pulses: u32) -> Result<(), BackendError>;

    /// Pushes buffered events to the server.
    fn flush(&self) -> Result<(), BackendError>;
}

/// Keyboard grab syscalls and their side channels.
pub trait KeyboardGrab {
    /// One grab attempt; the engine owns the retry policy.
    fn acquire(&self) -> GrabAttempt;

    /// Releases the keyboard grab.
    fn release(&self) -> Result<(), BackendError>;

    /// Enables or disables X auto-repeat for the given keys.
    fn set_autorepeat(&self, keys: &[Keysym], enabled: bool) -> Result<(), BackendError>;

    /// Suppresses (or restores) forwarding of the given modifier bits to
    /// other applications while the grab is held.
    fn set_modifier_suppression(&self, mods: ModMask, suppressed: bool)
        -> Result<(), BackendError>;
}

/// Key event delivery and keyboard-map queries.
pub trait EventSource {
    /// Returns the next pending event without blocking, or `None`.
    fn poll_event(&self) -> Option<InputEvent>;

    /// Blocks until at least one event is pending.
    fn wait_for_event(&self);

    /// Blocks until the given key is observed released, discarding other
    /// key events in the meantime.
    fn wait_for_release(&self, keysym: Keysym);

    /// Which of Mod1-Mod5 the server's modifier map assigns to `Num_Lock`.
    fn numlock_mask(&self) -> ModMask;
}

/// Error type for engine operations. All variants are fatal.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Movement(#[from] MovementError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("keyboard grab refused: {0}")]
    GrabRefused(String),

    #[error("keyboard still busy after {attempts} grab attempts")]
    GrabTimeout { attempts: u32 },
}

/// Rates and grab policy, loaded from the settings file.
#[derive(Debug, Clone)]
pub struct EngineTuning {
    /// Pointer channel rate in pixels per second.
    pub base_speed: f64,
    /// Scroll channel rate in events per second.
    pub base_scroll: f64,
    /// Modifier bits withheld from other applications while grabbed, so
    /// that e.g. holding Shift to scroll does not send Shift-scroll events.
    pub internal_mods: ModMask,
    pub grab_retry_interval: Duration,
    pub grab_retry_timeout: Duration,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            base_speed: 1000.0,
            base_scroll: 14.0,
            internal_mods: ModMask::SHIFT | ModMask::CONTROL | ModMask::MOD1,
            grab_retry_interval: Duration::from_millis(10),
            grab_retry_timeout: Duration::from_millis(200),
        }
    }
}

/// All mutable state of a running ptrkeys instance.
pub struct Engine {
    pointer: Movement,
    scroll: Movement,
    move_to_scroll: bool,
    grabbed: bool,
    quitting: bool,
    numlock: ModMask,
    table: BindingTable,
    tuning: EngineTuning,
    sink: Arc<dyn InputSink>,
    keyboard: Arc<dyn KeyboardGrab>,
    events: Arc<dyn EventSource>,
}

impl Engine {
    pub fn new(
        table: BindingTable,
        tuning: EngineTuning,
        sink: Arc<dyn InputSink>,
        keyboard: Arc<dyn KeyboardGrab>,
        events: Arc<dyn EventSource>,
    ) -> Self {
        let numlock = events.numlock_mask();
        Self {
            pointer: Movement::new(tuning.base_speed),
            scroll: Movement::new(tuning.base_scroll),
            move_to_scroll: false,
            grabbed: false,
            quitting: false,
            numlock,
            table,
            tuning,
            sink,
            keyboard,
            events,
        }
    }

    pub fn quitting(&self) -> bool {
        self.quitting
    }

    pub fn grabbed(&self) -> bool {
        self.grabbed
    }

    /// Whether any direction is held on either channel. The control loop
    /// uses this to decide between ticking at the frame rate and blocking
    /// on the next event.
    pub fn moving(&self) -> bool {
        !self.pointer.dir.is_empty() || !self.scroll.dir.is_empty()
    }

    pub fn events(&self) -> Arc<dyn EventSource> {
        Arc::clone(&self.events)
    }

    /// Dispatches one raw event through the binding table.
    ///
    /// Events that match no binding are silently ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the bound command fails; every such
    /// failure is fatal.
    pub fn handle_event(&mut self, event: InputEvent) -> Result<(), EngineError> {
        match event {
            InputEvent::Press { keysym, state } => {
                trace!("press {}", describe_key(state, keysym));
                let command = self
                    .table
                    .find_press(self.grabbed, keysym, state, self.numlock)
                    .and_then(|b| b.on_press);
                match command {
                    Some(cmd) => self.apply(cmd),
                    None => Ok(()),
                }
            }
            InputEvent::Release { keysym, state } => {
                trace!("release {}", describe_key(state, keysym));
                let command = self.table.find_release(keysym).and_then(|b| b.on_release);
                match command {
                    Some(cmd) => self.apply(cmd),
                    None => Ok(()),
                }
            }
            InputEvent::MappingChanged => {
                self.numlock = self.events.numlock_mask();
                info!("modifier mapping changed, numlock mask is now {:?}", self.numlock);
                Ok(())
            }
        }
    }

    /// Executes one bound command.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] on invalid direction arguments, backend
    /// failures, or grab acquisition failure.
    pub fn apply(&mut self, command: Command) -> Result<(), EngineError> {
        match command {
            Command::MoveStart(dirs) => self.pointer.start(dirs)?,
            Command::MoveStop(dirs) => self.pointer.stop(dirs),
            Command::ScrollStart(dirs) => self.scroll.start(dirs)?,
            Command::ScrollStop(dirs) => self.scroll.stop(dirs),
            Command::MultiplySpeed(factor) => {
                self.pointer.mul *= factor;
                self.scroll.mul *= factor;
            }
            Command::DivideSpeed(factor) => {
                self.pointer.mul /= factor;
                self.scroll.mul /= factor;
            }
            Command::ClickPress(button) => {
                self.sink.press_button(button.button_number(), true)?;
                self.sink.flush()?;
            }
            Command::ClickRelease(button) => {
                self.sink.press_button(button.button_number(), false)?;
                self.sink.flush()?;
            }
            Command::Grab { wait_release } => self.grab(wait_release)?,
            Command::Ungrab => self.ungrab()?,
            Command::ToggleGrab => {
                if self.grabbed {
                    self.ungrab()?;
                } else {
                    self.grab(None)?;
                }
            }
            Command::GrabAndScroll => {
                self.grab(None)?;
                self.set_move_to_scroll(true);
            }
            Command::MoveToScroll(enable) => self.set_move_to_scroll(enable),
            Command::ToggleMoveToScroll => self.set_move_to_scroll(!self.move_to_scroll),
            Command::ResetMovement => self.reset_movement(),
            Command::Quit => self.quitting = true,
        }
        Ok(())
    }

    /// Integrates one tick of elapsed time and injects the resulting
    /// movement.
    ///
    /// The scroll channel always uses scroll semantics; the pointer channel
    /// uses them only while move-to-scroll is active. The sink is flushed
    /// once at the end when anything was emitted.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Backend`] when injection fails.
    pub fn tick(&mut self, elapsed_micros: i64) -> Result<(), EngineError> {
        let mut emitted = false;

        let update = self.scroll.scroll_update(elapsed_micros);
        emitted |= self.emit_scroll(update)?;

        if self.move_to_scroll {
            let update = self.pointer.scroll_update(elapsed_micros);
            emitted |= self.emit_scroll(update)?;
        } else {
            let delta = self.pointer.pointer_update(elapsed_micros);
            if delta.dx != 0 || delta.dy != 0 {
                self.sink.move_pointer(delta.dx, delta.dy)?;
                emitted = true;
            }
        }

        if emitted {
            self.sink.flush()?;
        }
        Ok(())
    }

    fn emit_scroll(&self, update: ScrollUpdate) -> Result<bool, EngineError> {
        let mut emitted = false;
        if update.x_events > 0 {
            self.sink.scroll(update.x_button, update.x_events)?;
            emitted = true;
        }
        if update.y_events > 0 {
            self.sink.scroll(update.y_button, update.y_events)?;
            emitted = true;
        }
        Ok(emitted)
    }

    /// Switches the pointer channel between pixel and scroll semantics.
    ///
    /// On an actual toggle the channel's base speed swaps to the other
    /// rate and its remainders and continuation flags clear, so the first
    /// scroll pulse after enabling is immediate. A call that matches the
    /// current mode is a no-op, which lets a hold-style binding deliver
    /// repeated presses harmlessly.
    fn set_move_to_scroll(&mut self, enable: bool) {
        if enable == self.move_to_scroll {
            return;
        }
        self.move_to_scroll = enable;
        self.pointer.base_speed = if enable {
            self.tuning.base_scroll
        } else {
            self.tuning.base_speed
        };
        self.pointer.x_rem = 0.0;
        self.pointer.y_rem = 0.0;
        self.pointer.x_cont = false;
        self.pointer.y_cont = false;
        trace!("move-to-scroll {}", if enable { "on" } else { "off" });
    }

    fn reset_movement(&mut self) {
        self.move_to_scroll = false;
        self.pointer.reset();
        self.pointer.base_speed = self.tuning.base_speed;
        self.scroll.reset();
    }

    /// Acquires the keyboard grab with bounded retry.
    ///
    /// A busy keyboard is retried at a fixed interval until the configured
    /// timeout is spent; anything else ends the loop immediately. After
    /// acquisition the internal modifiers are suppressed, auto-repeat is
    /// disabled for the flagged keys, and if `wait_release` names a key the
    /// engine blocks until that key is seen released so the hotkey that
    /// triggered the grab cannot feed its own release into grabbed dispatch.
    fn grab(&mut self, wait_release: Option<Keysym>) -> Result<(), EngineError> {
        if self.grabbed {
            return Ok(());
        }
        let max_attempts = (self.tuning.grab_retry_timeout.as_millis()
            / self.tuning.grab_retry_interval.as_millis().max(1))
        .max(1) as u32;
        let mut attempt = 1;
        loop {
            match self.keyboard.acquire() {
                GrabAttempt::Granted => break,
                GrabAttempt::Failed(reason) => return Err(EngineError::GrabRefused(reason)),
                GrabAttempt::Busy if attempt >= max_attempts => {
                    return Err(EngineError::GrabTimeout {
                        attempts: max_attempts,
                    });
                }
                GrabAttempt::Busy => {
                    attempt += 1;
                    std::thread::sleep(self.tuning.grab_retry_interval);
                }
            }
        }
        if attempt > 1 {
            warn!("keyboard grab took {attempt} attempts");
        }
        self.grabbed = true;
        self.keyboard
            .set_modifier_suppression(self.tuning.internal_mods, true)?;
        self.keyboard
            .set_autorepeat(&self.table.no_autorepeat_keys(), false)?;
        if let Some(keysym) = wait_release {
            trace!("waiting for release of {keysym}");
            self.events.wait_for_release(keysym);
        }
        info!("keyboard grabbed");
        Ok(())
    }

    /// Releases the grab and forces both channels back to rest.
    ///
    /// Grabbed-only movement must never continue after the grab ends, so
    /// direction, multiplier, remainders, and move-to-scroll are all reset
    /// here rather than trusting matching release events to arrive.
    fn ungrab(&mut self) -> Result<(), EngineError> {
        if !self.grabbed {
            return Ok(());
        }
        self.keyboard
            .set_autorepeat(&self.table.no_autorepeat_keys(), true)?;
        self.keyboard
            .set_modifier_suppression(self.tuning.internal_mods, false)?;
        self.keyboard.release()?;
        self.grabbed = false;
        self.reset_movement();
        info!("keyboard ungrabbed");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
