//! Hardware and network abstraction traits
//!
//! These traits define the interface between the application logic
//! and board- or host-specific implementations.

pub mod clock;
pub mod display;
pub mod input;
pub mod network;

pub use clock::Clock;
pub use display::{DisplayError, DisplayView, ReadingDisplay};
pub use input::{ButtonInput, ButtonLine};
pub use network::{HttpResponse, HttpTransport, TransportError};
