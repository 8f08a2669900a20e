//! Pure movement-integration logic with no OS dependencies.

pub mod movement;
