//! Display-server backend implementations.
//!
//! The X11 backend is only compiled on Linux targets; the mock backend is
//! always available for tests and headless runs.

pub mod mock;

#[cfg(target_os = "linux")]
pub mod x11;
