//! Button input trait

/// The two brightness buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonLine {
    BrightnessUp,
    BrightnessDown,
}

impl ButtonLine {
    pub const ALL: [ButtonLine; 2] = [ButtonLine::BrightnessUp, ButtonLine::BrightnessDown];
}

/// Polled button lines
///
/// Sampled by the button task every poll period; implementations should
/// return the raw level without debouncing or edge detection.
pub trait ButtonInput {
    fn is_pressed(&mut self, line: ButtonLine) -> bool;
}
