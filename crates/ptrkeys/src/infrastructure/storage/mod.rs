//! Settings persistence.

pub mod config;
