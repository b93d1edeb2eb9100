//! Reading display trait

use crate::reading::{Brightness, Trend};

/// Errors from the display backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Pixel surface rejected a write or present
    Surface,
    /// Pixel outside the panel
    InvalidCoordinates,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayView {
    pub value: Option<u16>,
    pub trend: Option<Trend>,
    pub seconds_since_update: u32,
    pub brightness: Brightness,
}

/// Frame sink owned by the display task
///
/// `show` renders and presents a complete frame, never a partial one.
pub trait ReadingDisplay {
    fn show(&mut self, view: &DisplayView) -> Result<(), DisplayError>;
}
