//! Application layer: the engine and the control loop.

pub mod control_loop;
pub mod engine;
