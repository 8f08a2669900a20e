//! The single-threaded control loop.
//!
//! One iteration: check the termination flags, drain and dispatch every
//! pending key event in arrival order, integrate once with the elapsed time
//! since the previous tick, then either sleep one frame (movement active)
//! or block on the next event (idle). Draining before integrating means a
//! burst of key events never causes multiple partial integrations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::debug;

use crate::application::engine::{Engine, EngineError};

/// Elapsed-time source for integration.
///
/// Separated from the engine so tests can drive ticks with exact synthetic
/// durations instead of real sleeps.
pub trait Clock {
    /// Microseconds elapsed since the previous call (or since creation or
    /// the last resync).
    fn elapsed_micros(&mut self) -> i64;

    /// Forgets time passed so far: the next `elapsed_micros` counts from
    /// now. Called after an idle block so waiting time is not integrated
    /// as movement time.
    fn resync(&mut self);
}

/// Wall-clock implementation over [`Instant`].
pub struct MonotonicClock {
    last: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn elapsed_micros(&mut self) -> i64 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last).as_micros() as i64;
        self.last = now;
        elapsed
    }

    fn resync(&mut self) {
        self.last = Instant::now();
    }
}

/// Why the control loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A bound quit command ran.
    Quit,
    /// The interrupt flag was raised (SIGINT).
    Interrupted,
}

/// Runs the loop until a quit command, an interrupt, or a fatal error.
///
/// `fps` sets the integration rate while movement is active; when idle the
/// loop blocks on the event source instead of polling, resyncing the clock
/// on wake.
///
/// # Errors
///
/// Propagates the first [`EngineError`]; every engine error is fatal.
pub fn run(
    engine: &mut Engine,
    clock: &mut dyn Clock,
    fps: u32,
    interrupted: &AtomicBool,
) -> Result<Outcome, EngineError> {
    let frame = std::time::Duration::from_millis(1000 / u64::from(fps.max(1)));
    let events = engine.events();
    debug!("control loop started at {fps} fps");

    loop {
        if interrupted.load(Ordering::Relaxed) {
            return Ok(Outcome::Interrupted);
        }
        if engine.quitting() {
            return Ok(Outcome::Quit);
        }

        while let Some(event) = events.poll_event() {
            engine.handle_event(event)?;
        }

        let elapsed = clock.elapsed_micros();
        engine.tick(elapsed)?;

        // A quit dispatched above still gets its final integration, but
        // never a blocking wait.
        if engine.quitting() || interrupted.load(Ordering::Relaxed) {
            continue;
        }

        if engine.moving() {
            std::thread::sleep(frame);
        } else {
            events.wait_for_event();
            clock.resync();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
