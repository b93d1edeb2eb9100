//! Board-agnostic core logic for the glucose display
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Reading and trend model
//! - Share session client (authenticate, login, fetch with bounded retry)
//! - Cooperative scheduler (button poll, periodic fetch, display refresh)
//! - Hardware and network abstraction traits
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to later modules
mod fmt;

pub mod config;
pub mod reading;
pub mod scheduler;
pub mod session;
pub mod traits;

pub use reading::{Brightness, Reading, Trend};
