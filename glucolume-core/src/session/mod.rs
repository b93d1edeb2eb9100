//! Share session client
//!
//! Owns the three-step remote protocol (authenticate, login, fetch) and its
//! bounded retry policy. Has no knowledge of the display or the scheduler.

pub mod client;
pub mod error;
pub mod protocol;
pub mod state;

pub use client::SessionClient;
pub use error::{SessionError, Step};
pub use state::{Session, SessionState};

use crate::reading::Reading;

/// Pull-based source of readings, as seen by the fetch task
#[allow(async_fn_in_trait)]
pub trait ReadingSource {
    /// Fetch the latest reading, logging in first if needed
    async fn fetch_latest(&mut self) -> Result<Reading, SessionError>;

    /// Whether a fetch could reach the network right now
    fn is_link_up(&self) -> bool {
        true
    }
}
