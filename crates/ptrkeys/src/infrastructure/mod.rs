//! Infrastructure layer: display-server backends and settings storage.

pub mod backend;
pub mod storage;
