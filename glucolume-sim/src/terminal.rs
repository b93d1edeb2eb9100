//! ANSI terminal panel
//!
//! Draws the 53x11 matrix with 24-bit colour escapes, redrawing in place
//! from the top-left corner. Logs go to stderr; redirect them to keep the
//! panel readable.

use std::io::{self, Write};

use glucolume_core::traits::DisplayError;
use glucolume_display::{PixelSurface, Rgb, PANEL_HEIGHT, PANEL_WIDTH};

const LIT: &str = "\u{25cf} ";
const UNLIT: &str = "\u{00b7} ";

pub struct TerminalSurface<W> {
    out: W,
    pixels: [[Rgb; PANEL_WIDTH]; PANEL_HEIGHT],
    frames: u32,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pixels: [[Rgb::BLACK; PANEL_WIDTH]; PANEL_HEIGHT],
            frames: 0,
        }
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        self.pixels.get(y).and_then(|row| row.get(x)).copied()
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn draw(&mut self) -> io::Result<()> {
        let mut text = String::with_capacity(PANEL_WIDTH * PANEL_HEIGHT * 24);
        if self.frames == 0 {
            text.push_str("\x1b[2J");
        }
        text.push_str("\x1b[H");
        for row in &self.pixels {
            for px in row {
                if px.is_black() {
                    text.push_str("\x1b[90m");
                    text.push_str(UNLIT);
                } else {
                    text.push_str(&format!("\x1b[38;2;{};{};{}m", px.r, px.g, px.b));
                    text.push_str(LIT);
                }
            }
            text.push_str("\x1b[0m\n");
        }
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}

impl<W: Write> PixelSurface for TerminalSurface<W> {
    fn set_pixel(&mut self, x: u8, y: u8, color: Rgb) -> Result<(), DisplayError> {
        let slot = self
            .pixels
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
            .ok_or(DisplayError::InvalidCoordinates)?;
        *slot = color;
        Ok(())
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        self.draw().map_err(|_| DisplayError::Surface)?;
        self.frames += 1;
        Ok(())
    }
}
