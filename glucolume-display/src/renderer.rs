//! Reading renderer
//!
//! Deterministic: the same view always produces the same frame.

use glucolume_core::config::DIGIT_SPACING;
use glucolume_core::traits::DisplayView;
use glucolume_core::{Brightness, Trend};
use glucolume_font::{glyph, GlyphKey};

use crate::backend::Rgb;
use crate::frame::{Frame, PANEL_WIDTH};
use crate::palette;

/// Left edge of the first digit cell
pub const DIGITS_X: usize = 6;

/// Top edge of the digits and arrow
pub const DIGITS_Y: usize = 0;

/// Width of one digit cell
pub const DIGIT_CELL: usize = 6;

/// Number of digit cells (values are right-aligned)
pub const DIGIT_CELLS: usize = 3;

/// Gap between the last digit cell and the arrow
pub const ARROW_GAP: usize = 2;

/// Row holding the staleness bar
pub const STALENESS_ROW: usize = 10;

/// Seconds per staleness bar pixel
pub const STALENESS_SECONDS_PER_PIXEL: u32 = 6;

/// Renders a [`DisplayView`] into a [`Frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    digit_spacing: u8,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DIGIT_SPACING)
    }
}

impl Renderer {
    pub const fn new(digit_spacing: u8) -> Self {
        Self { digit_spacing }
    }

    fn advance(&self) -> usize {
        DIGIT_CELL + self.digit_spacing as usize
    }

    /// X position of the arrow
    pub fn arrow_x(&self) -> usize {
        DIGITS_X + DIGIT_CELLS * self.advance() + ARROW_GAP
    }

    /// Clear `frame` and draw the view
    pub fn render(&self, view: &DisplayView, frame: &mut Frame) {
        frame.clear();
        let color = palette::color_for(view.value).scaled(view.brightness);

        let cells = match view.value {
            Some(value) => digit_keys(value),
            None => [GlyphKey::Dash; DIGIT_CELLS],
        };
        let mut x = DIGITS_X;
        for key in cells {
            if let Some(g) = glyph(key) {
                frame.draw_glyph(g, x, DIGITS_Y, color);
            }
            x += self.advance();
        }

        if view.value.is_some() {
            if let Some(g) = glyph(arrow_key(view.trend)) {
                frame.draw_glyph(g, self.arrow_x(), DIGITS_Y, color);
            }
        }

        let bar = staleness_width(view.seconds_since_update);
        frame.fill_rect(0, STALENESS_ROW, bar, 1, color);
    }
}

/// Render a reading into a fresh frame
///
/// Iterate [`Frame::ops`] for the pixel operations.
pub fn render_reading(
    value: Option<u16>,
    trend: Option<Trend>,
    seconds_since_update: u32,
    brightness: Brightness,
) -> Frame {
    let mut frame = Frame::new();
    Renderer::default().render(
        &DisplayView {
            value,
            trend,
            seconds_since_update,
            brightness,
        },
        &mut frame,
    );
    frame
}

/// Right-aligned digit cells, leading cells blank; clamps at 999
pub fn digit_keys(value: u16) -> [GlyphKey; DIGIT_CELLS] {
    let value = value.min(999);
    let digit = |d: u16| GlyphKey::digit(d as u8).unwrap_or(GlyphKey::Space);
    let hundreds = if value >= 100 {
        digit(value / 100)
    } else {
        GlyphKey::Space
    };
    let tens = if value >= 10 {
        digit(value / 10 % 10)
    } else {
        GlyphKey::Space
    };
    [hundreds, tens, digit(value % 10)]
}

/// Arrow glyph for a trend; non-directional and absent trends draw flat
pub fn arrow_key(trend: Option<Trend>) -> GlyphKey {
    match trend {
        Some(Trend::DoubleUp) => GlyphKey::DoubleUp,
        Some(Trend::SingleUp) => GlyphKey::SingleUp,
        Some(Trend::FortyFiveUp) => GlyphKey::FortyFiveUp,
        Some(Trend::FortyFiveDown) => GlyphKey::FortyFiveDown,
        Some(Trend::SingleDown) => GlyphKey::SingleDown,
        Some(Trend::DoubleDown) => GlyphKey::DoubleDown,
        Some(Trend::Flat | Trend::NotComputable | Trend::RateOutOfRange) | None => GlyphKey::Flat,
    }
}

/// Staleness bar length in pixels
pub fn staleness_width(seconds: u32) -> usize {
    ((seconds / STALENESS_SECONDS_PER_PIXEL) as usize).min(PANEL_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PANEL_HEIGHT;
    use crate::palette::{GREEN, RED, WHITE, YELLOW};

    fn view(value: Option<u16>, trend: Option<Trend>, seconds: u32) -> DisplayView {
        DisplayView {
            value,
            trend,
            seconds_since_update: seconds,
            brightness: Brightness::MAX,
        }
    }

    fn render(v: DisplayView) -> Frame {
        let mut frame = Frame::new();
        Renderer::default().render(&v, &mut frame);
        frame
    }

    fn first_lit(frame: &Frame) -> Rgb {
        frame.lit().next().map(|op| op.color).unwrap_or(Rgb::BLACK)
    }

    #[test]
    fn test_digit_keys() {
        use GlyphKey::*;
        assert_eq!(digit_keys(5), [Space, Space, Digit5]);
        assert_eq!(digit_keys(42), [Space, Digit4, Digit2]);
        assert_eq!(digit_keys(100), [Digit1, Digit0, Digit0]);
        assert_eq!(digit_keys(400), [Digit4, Digit0, Digit0]);
        assert_eq!(digit_keys(1234), [Digit9, Digit9, Digit9]);
    }

    #[test]
    fn test_arrow_mapping() {
        assert_eq!(arrow_key(Some(Trend::DoubleUp)), GlyphKey::DoubleUp);
        assert_eq!(arrow_key(Some(Trend::FortyFiveDown)), GlyphKey::FortyFiveDown);
        assert_eq!(arrow_key(Some(Trend::NotComputable)), GlyphKey::Flat);
        assert_eq!(arrow_key(Some(Trend::RateOutOfRange)), GlyphKey::Flat);
        assert_eq!(arrow_key(None), GlyphKey::Flat);
    }

    #[test]
    fn test_layout_positions() {
        let r = Renderer::default();
        assert_eq!(r.arrow_x(), 29);
        assert_eq!(Renderer::new(0).arrow_x(), 26);
        // Widest arrow still fits
        let widest = glyph(GlyphKey::DoubleUp).unwrap().width as usize;
        assert!(r.arrow_x() + widest <= PANEL_WIDTH);
    }

    #[test]
    fn test_in_range_reading() {
        let frame = render(view(Some(120), Some(Trend::SingleUp), 0));

        let mut expected = Frame::new();
        for (i, key) in digit_keys(120).into_iter().enumerate() {
            expected.draw_glyph(glyph(key).unwrap(), DIGITS_X + i * 7, DIGITS_Y, GREEN);
        }
        expected.draw_glyph(glyph(GlyphKey::SingleUp).unwrap(), 29, DIGITS_Y, GREEN);
        assert_eq!(frame, expected);
    }

    #[test]
    fn test_two_digit_value_leaves_first_cell_blank() {
        let frame = render(view(Some(65), Some(Trend::Flat), 0));
        assert_eq!(frame.lit_columns(0, 10).map(|(lo, _)| lo), Some(DIGITS_X + 7));
        assert_eq!(frame.get(DIGITS_X + 7, 0), RED);
    }

    #[test]
    fn test_colours_by_range() {
        assert_eq!(first_lit(&render(view(Some(250), None, 0))), YELLOW);
        assert_eq!(first_lit(&render(view(Some(55), None, 0))), RED);
        assert_eq!(first_lit(&render(view(Some(180), None, 0))), GREEN);
    }

    #[test]
    fn test_no_value_shows_placeholder_without_arrow() {
        let frame = render(view(None, Some(Trend::DoubleUp), 0));

        let mut expected = Frame::new();
        for i in 0..DIGIT_CELLS {
            expected.draw_glyph(glyph(GlyphKey::Dash).unwrap(), DIGITS_X + i * 7, DIGITS_Y, WHITE);
        }
        assert_eq!(frame, expected);
    }

    #[test]
    fn test_staleness_bar() {
        assert_eq!(staleness_width(0), 0);
        assert_eq!(staleness_width(5), 0);
        assert_eq!(staleness_width(6), 1);
        assert_eq!(staleness_width(60), 10);
        assert_eq!(staleness_width(u32::MAX), PANEL_WIDTH);

        let frame = render(view(Some(100), None, 61));
        let bar: Vec<_> = (0..PANEL_WIDTH)
            .map(|x| frame.get(x, PANEL_HEIGHT - 1) == GREEN)
            .collect();
        assert_eq!(bar.iter().filter(|lit| **lit).count(), 10);
        assert!(bar[..10].iter().all(|lit| *lit));
    }

    #[test]
    fn test_only_bar_changes_with_time() {
        let a = render(view(Some(100), Some(Trend::Flat), 0));
        let b = render(view(Some(100), Some(Trend::Flat), 600));
        for y in 0..10 {
            for x in 0..PANEL_WIDTH {
                assert_eq!(a.get(x, y), b.get(x, y));
            }
        }
        assert_eq!(b.lit_count() - a.lit_count(), 53);
    }

    #[test]
    fn test_brightness_scales_output() {
        let mut v = view(Some(100), Some(Trend::Flat), 0);
        v.brightness = Brightness::MIN;
        assert_eq!(first_lit(&render(v)), GREEN.scaled(Brightness::MIN));
    }

    #[test]
    fn test_render_reading_matches_renderer() {
        let frame = render_reading(Some(88), Some(Trend::DoubleDown), 30, Brightness::MAX);
        assert_eq!(frame, render(view(Some(88), Some(Trend::DoubleDown), 30)));
        assert_eq!(frame.lit().count(), frame.lit_count());
    }
}
