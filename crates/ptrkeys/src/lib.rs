//! ptrkeys library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does ptrkeys do?
//!
//! ptrkeys drives the pointer entirely from the keyboard. A global hotkey
//! grabs the keyboard; while grabbed, held keys move the pointer or scroll
//! at a configured rate, other keys click, adjust speed, or release the
//! grab. The application:
//!
//! 1. Loads settings and validates the binding table (any violation is
//!    fatal before the event loop starts).
//! 2. Connects to the display backend and registers global hotkeys.
//! 3. Runs the single-threaded control loop: drain key events, integrate
//!    elapsed time into pointer deltas and scroll pulses, inject them.

/// Application layer: the engine and the control loop.
pub mod application;

/// The compiled-in key binding table.
pub mod default_bindings;

/// Infrastructure layer: display backends and settings storage.
pub mod infrastructure;
