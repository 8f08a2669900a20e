//! Movement channel domain entity.
//!
//! A [`Movement`] turns "which directions are held, and for how long" into
//! discrete output: integer pixel deltas for the pointer channel, or
//! scroll-wheel pulse counts for the scroll channel. Fractional progress is
//! carried between ticks in per-axis remainders, so repeated small time
//! slices sum exactly to the configured long-run rate: the cumulative
//! integer output over any partition of an interval stays within one unit
//! of the true analog value.
//!
//! The same struct serves both channels; only the base speed differs
//! (pixels per second vs. scroll events per second). When move-to-scroll
//! mode is active the application drives the pointer channel through
//! [`Movement::scroll_update`] as well.

use thiserror::Error;

/// Error type for direction-state transitions.
///
/// Both variants indicate a misconfigured binding argument, not a runtime
/// condition; callers treat them as fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MovementError {
    /// UP and DOWN requested in a single `start` call.
    #[error("start direction: both UP and DOWN given")]
    OpposedVertical,

    /// LEFT and RIGHT requested in a single `start` call.
    #[error("start direction: both LEFT and RIGHT given")]
    OpposedHorizontal,
}

/// A set of held movement directions.
///
/// Invariant (maintained by [`Movement::start`]): UP and DOWN are never both
/// set, and neither are LEFT and RIGHT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub const NONE: DirectionSet = DirectionSet(0);
    pub const UP: DirectionSet = DirectionSet(1 << 0);
    pub const DOWN: DirectionSet = DirectionSet(1 << 1);
    pub const LEFT: DirectionSet = DirectionSet(1 << 2);
    pub const RIGHT: DirectionSet = DirectionSet(1 << 3);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn intersects(self, other: DirectionSet) -> bool {
        self.0 & other.0 != 0
    }

    fn insert(&mut self, other: DirectionSet) {
        self.0 |= other.0;
    }

    fn remove(&mut self, other: DirectionSet) {
        self.0 &= !other.0;
    }
}

impl std::ops::BitOr for DirectionSet {
    type Output = DirectionSet;

    fn bitor(self, rhs: DirectionSet) -> DirectionSet {
        DirectionSet(self.0 | rhs.0)
    }
}

/// Which scroll-wheel button a pulse belongs to.
///
/// X11 represents scrolling as button press/release pairs on buttons 4–7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollButton {
    Up,
    Down,
    Left,
    Right,
}

impl ScrollButton {
    /// The X11 core button number for this scroll direction.
    pub fn button_number(self) -> u8 {
        match self {
            ScrollButton::Up => 4,
            ScrollButton::Down => 5,
            ScrollButton::Left => 6,
            ScrollButton::Right => 7,
        }
    }
}

/// Integer pointer delta produced by one integration tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerDelta {
    pub dx: i32,
    pub dy: i32,
}

/// Scroll pulses produced by one integration tick.
///
/// Counts are non-negative; the button fields identify which wheel
/// direction the pulses belong to and are only meaningful when the
/// corresponding count is nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollUpdate {
    pub x_events: u32,
    pub x_button: ScrollButton,
    pub y_events: u32,
    pub y_button: ScrollButton,
}

impl Default for ScrollUpdate {
    fn default() -> Self {
        Self {
            x_events: 0,
            x_button: ScrollButton::Right,
            y_events: 0,
            y_button: ScrollButton::Down,
        }
    }
}

/// One movement channel: direction state, speed, and fractional carry.
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    /// Channel-specific rate: pixels/sec for the pointer channel, scroll
    /// events/sec for the scroll channel.
    pub base_speed: f64,
    /// Speed multiplier adjusted by the speed commands. 1.0 at rest.
    pub mul: f64,
    /// Currently held directions.
    pub dir: DirectionSet,
    /// Sub-unit remainders carried between ticks.
    pub x_rem: f64,
    pub y_rem: f64,
    /// Whether the axis has already produced output since its direction
    /// last changed. Gates the immediate-first-pulse rule in
    /// [`Movement::scroll_update`].
    pub x_cont: bool,
    pub y_cont: bool,
}

impl Movement {
    /// Creates a channel at rest with multiplier 1.
    pub fn new(base_speed: f64) -> Self {
        Self {
            base_speed,
            mul: 1.0,
            dir: DirectionSet::NONE,
            x_rem: 0.0,
            y_rem: 0.0,
            x_cont: false,
            y_cont: false,
        }
    }

    /// Returns the channel to its initial state, keeping `base_speed`.
    ///
    /// Called when the keyboard is ungrabbed or on an explicit reset
    /// command: grabbed-only movement must never continue after the grab
    /// ends.
    pub fn reset(&mut self) {
        *self = Movement::new(self.base_speed);
    }

    /// Starts moving in the given directions.
    ///
    /// For each touched axis the remainder and continuation flag are
    /// cleared, then the requested bit is set and its opposite cleared, so
    /// pressing RIGHT while LEFT is held cancels LEFT rather than stacking.
    ///
    /// # Errors
    ///
    /// Returns [`MovementError`] if opposing bits of one axis are requested
    /// in the same call. This is a binding-configuration bug and callers
    /// treat it as fatal.
    pub fn start(&mut self, dirs: DirectionSet) -> Result<(), MovementError> {
        if dirs.intersects(DirectionSet::UP) && dirs.intersects(DirectionSet::DOWN) {
            return Err(MovementError::OpposedVertical);
        }
        if dirs.intersects(DirectionSet::LEFT) && dirs.intersects(DirectionSet::RIGHT) {
            return Err(MovementError::OpposedHorizontal);
        }
        if dirs.intersects(DirectionSet::UP | DirectionSet::DOWN) {
            self.y_rem = 0.0;
            self.y_cont = false;
        }
        if dirs.intersects(DirectionSet::UP) {
            self.dir.remove(DirectionSet::DOWN);
            self.dir.insert(DirectionSet::UP);
        }
        if dirs.intersects(DirectionSet::DOWN) {
            self.dir.remove(DirectionSet::UP);
            self.dir.insert(DirectionSet::DOWN);
        }
        if dirs.intersects(DirectionSet::LEFT | DirectionSet::RIGHT) {
            self.x_rem = 0.0;
            self.x_cont = false;
        }
        if dirs.intersects(DirectionSet::LEFT) {
            self.dir.remove(DirectionSet::RIGHT);
            self.dir.insert(DirectionSet::LEFT);
        }
        if dirs.intersects(DirectionSet::RIGHT) {
            self.dir.remove(DirectionSet::LEFT);
            self.dir.insert(DirectionSet::RIGHT);
        }
        Ok(())
    }

    /// Stops moving in the given directions.
    ///
    /// Clears exactly the given bits. Remainders are deliberately left
    /// alone: releasing one key must not discard fractional progress when
    /// the opposite key is still held.
    pub fn stop(&mut self, dirs: DirectionSet) {
        self.dir.remove(dirs);
    }

    /// Integrates elapsed time into an integer pointer delta.
    ///
    /// `raw = base_speed * sign * mul * elapsed_micros / 1e6 + remainder`;
    /// the output is `raw` truncated toward zero and the new remainder is
    /// the signed fractional part. UP maps to negative `dy` because screen
    /// y grows downward.
    ///
    /// Never fails: a zero multiplier yields no movement and a negative
    /// one reverses direction, both accepted behaviour.
    pub fn pointer_update(&mut self, elapsed_micros: i64) -> PointerDelta {
        if self.dir.is_empty() {
            return PointerDelta::default();
        }
        let x_sign = sign_of(self.dir, DirectionSet::RIGHT, DirectionSet::LEFT);
        let y_sign = sign_of(self.dir, DirectionSet::UP, DirectionSet::DOWN);
        let seconds = elapsed_micros as f64 / 1e6;
        let dx = self.base_speed * x_sign * self.mul * seconds + self.x_rem;
        let dy = -self.base_speed * y_sign * self.mul * seconds + self.y_rem;
        self.x_rem = dx.fract();
        self.y_rem = dy.fract();
        PointerDelta {
            dx: dx.trunc() as i32,
            dy: dy.trunc() as i32,
        }
    }

    /// Integrates elapsed time into scroll pulses.
    ///
    /// Accumulation works like [`Movement::pointer_update`] but unsigned
    /// per axis: LEFT/RIGHT share the x axis and UP/DOWN the y axis, with
    /// the direction expressed through the returned button instead of a
    /// sign.
    ///
    /// When an axis's direction has just become active (`cont` flag clear)
    /// and this tick's computed count is zero, exactly one pulse is forced
    /// and the remainder debited by 1, so scrolling responds instantly to
    /// the key press while the configured steady-state rate still holds
    /// over the first second.
    pub fn scroll_update(&mut self, elapsed_micros: i64) -> ScrollUpdate {
        let mut update = ScrollUpdate::default();
        if self.dir.is_empty() {
            return update;
        }
        let horizontal = self.dir.intersects(DirectionSet::LEFT | DirectionSet::RIGHT);
        let vertical = self.dir.intersects(DirectionSet::UP | DirectionSet::DOWN);
        let x_sign = if horizontal { 1.0 } else { 0.0 };
        let y_sign = if vertical { 1.0 } else { 0.0 };
        let seconds = elapsed_micros as f64 / 1e6;
        let dx = self.base_speed * x_sign * self.mul * seconds + self.x_rem;
        let dy = self.base_speed * y_sign * self.mul * seconds + self.y_rem;
        self.x_rem = dx.fract();
        self.y_rem = dy.fract();

        update.x_button = if self.dir.intersects(DirectionSet::LEFT) {
            ScrollButton::Left
        } else {
            ScrollButton::Right
        };
        update.y_button = if self.dir.intersects(DirectionSet::UP) {
            ScrollButton::Up
        } else {
            ScrollButton::Down
        };

        update.x_events = dx.trunc().abs() as u32;
        update.y_events = dy.trunc().abs() as u32;
        if update.x_events == 0 && horizontal && !self.x_cont {
            update.x_events = 1;
            self.x_rem -= 1.0;
        }
        if update.y_events == 0 && vertical && !self.y_cont {
            update.y_events = 1;
            self.y_rem -= 1.0;
        }
        self.x_cont = true;
        self.y_cont = true;
        update
    }
}

/// -1, 0, or 1 depending on which of the two opposing bits is held.
fn sign_of(dir: DirectionSet, positive: DirectionSet, negative: DirectionSet) -> f64 {
    let p = if dir.intersects(positive) { 1.0 } else { 0.0 };
    let n = if dir.intersects(negative) { 1.0 } else { 0.0 };
    p - n
}

// ── Tests ─────────────────────────────────────────────────────────────────────
