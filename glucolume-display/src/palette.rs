//! Reading colours

use crate::backend::Rgb;

/// Below this the reading is shown as low
pub const GLUCOSE_LOW: u16 = 70;

/// Above this the reading is shown as high
pub const GLUCOSE_HIGH: u16 = 180;

pub const WHITE: Rgb = Rgb::new(255, 255, 255);
pub const RED: Rgb = Rgb::new(255, 0, 0);
pub const YELLOW: Rgb = Rgb::new(255, 200, 0);
pub const GREEN: Rgb = Rgb::new(0, 255, 0);

/// Colour for a reading; white when there is none
pub const fn color_for(value: Option<u16>) -> Rgb {
    match value {
        None => WHITE,
        Some(v) if v < GLUCOSE_LOW => RED,
        Some(v) if v > GLUCOSE_HIGH => YELLOW,
        Some(_) => GREEN,
    }
}
