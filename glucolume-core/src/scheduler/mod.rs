//! Cooperative scheduler
//!
//! Three fixed-period tasks share one thread of control:
//!
//! - button poll (50 ms): rising-edge brightness steps
//! - periodic fetch (30 s): pulls the latest reading from the session client
//! - display refresh (100 ms): redraws on change or on the 1 s animation tick
//!
//! Tasks coordinate only through [`SharedState`]. Each task body runs to
//! completion before the next one starts, so no locks are needed.

pub mod executor;
pub mod periodic;
pub mod shared;
pub mod tasks;

pub use executor::{RunReport, Scheduler};
pub use periodic::Periodic;
pub use shared::SharedState;
pub use tasks::{ButtonTask, DisplayOutcome, DisplayTask, FetchOutcome, FetchTask};
