//! State shared between the scheduler tasks
//!
//! Field ownership:
//!
//! | Field        | Written by            | Read by |
//! |--------------|-----------------------|---------|
//! | last reading | fetch task            | display |
//! | brightness   | button task           | display |
//! | dirty        | fetch, button (set)   | display (clear) |

use crate::reading::{Brightness, Reading};
use crate::traits::DisplayView;

/// The one record shared across tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SharedState {
    last_reading: Reading,
    brightness: Brightness,
    dirty: bool,
}

impl SharedState {
    /// Initial state; dirty so the first display tick draws
    pub const fn new(reading: Reading, brightness: Brightness) -> Self {
        Self {
            last_reading: reading,
            brightness,
            dirty: true,
        }
    }

    pub fn reading(&self) -> &Reading {
        &self.last_reading
    }

    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Store a reading if it differs by value or trend
    ///
    /// Returns whether it was stored.
    pub fn offer_reading(&mut self, reading: Reading) -> bool {
        if reading.same_as(&self.last_reading) {
            return false;
        }
        self.last_reading = reading;
        self.dirty = true;
        true
    }

    /// Store a brightness level if it changed
    pub fn set_brightness(&mut self, brightness: Brightness) -> bool {
        if brightness == self.brightness {
            return false;
        }
        self.brightness = brightness;
        self.dirty = true;
        true
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Snapshot for the renderer
    pub fn view(&self, now_ms: u64) -> DisplayView {
        let age_s = self.last_reading.age_ms(now_ms) / 1000;
        DisplayView {
            value: self.last_reading.value,
            trend: self.last_reading.trend,
            seconds_since_update: u32::try_from(age_s).unwrap_or(u32::MAX),
            brightness: self.brightness,
        }
    }
}
