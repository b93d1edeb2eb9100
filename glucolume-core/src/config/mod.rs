//! Configuration types
//!
//! Compile-time defaults plus the device configuration tree. The host
//! simulator loads it from TOML; firmware builds use the defaults.

pub mod types;

pub use types::*;
