//! Reading renderer for the 53x11 LED matrix
//!
//! This crate provides:
//! - `PixelSurface` trait for the panel driver (`set_pixel` + `present`)
//! - `Frame` buffer and the `Renderer` that fills it from a `DisplayView`
//! - `FrameDisplay`, which implements the core `ReadingDisplay` trait by
//!   rendering a full frame and presenting it once
//! - The start-up digit sweep
//!
//! # Layout
//!
//! ```text
//!  x=6                   x=29
//!  |[d][d][d]|  gap 2  |[arrow]|
//!  rows 0-9: digits and arrow, row 10: staleness bar
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod backend;
pub mod frame;
pub mod palette;
pub mod renderer;
pub mod selftest;

pub use backend::{FrameDisplay, PixelSurface, Rgb};
pub use frame::{Frame, PixelOp, PANEL_HEIGHT, PANEL_WIDTH};
pub use renderer::{render_reading, Renderer};
pub use selftest::{run_self_test, DigitSweep};
