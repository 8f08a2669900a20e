//! # ptrkeys-core
//!
//! Shared library for ptrkeys containing the movement-integration engine,
//! key-binding dispatch, binding-table validation, and keysym/modifier
//! types.
//!
//! This crate is used by the ptrkeys application and its benchmarks.
//! It has zero dependencies on OS APIs, display servers, or clocks.
//!
//! # Architecture overview
//!
//! ptrkeys drives the pointer from the keyboard.  Keys are bound to
//! commands (move, scroll, click, change speed, grab/ungrab); while a
//! movement key is held, elapsed wall-clock time is integrated into pixel
//! deltas or scroll pulses at a configured rate.
//!
//! This crate is the pure foundation.  It defines:
//!
//! - **`domain`** – The integration engine.  A `Movement` carries the held
//!   directions, a speed multiplier, and per-axis fractional remainders so
//!   that output never drifts from the configured rate no matter how the
//!   time slices fall.
//!
//! - **`keymap`** – `Keysym` and `ModMask` newtypes over the X11 value
//!   spaces, plus the `"Shift+Mod4+w"` key descriptions used in reports.
//!
//! - **`bindings`** – The ordered binding table, first-match-wins dispatch
//!   for presses and releases, and the startup validator.

pub mod bindings;
pub mod domain;
pub mod keymap;

// Re-export the most-used types at the crate root so callers can write
// `ptrkeys_core::Movement` instead of `ptrkeys_core::domain::movement::Movement`.
pub use bindings::validate::{validate, BindingError};
pub use bindings::{BindingOptions, BindingTable, Command, KeyBinding, MouseButton};
pub use domain::movement::{
    DirectionSet, Movement, MovementError, PointerDelta, ScrollButton, ScrollUpdate,
};
pub use keymap::{describe_key, Keysym, ModMask};
