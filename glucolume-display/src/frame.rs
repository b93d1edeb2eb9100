//! Frame buffer

use glucolume_font::{Block, Glyph};

use crate::backend::Rgb;

/// Panel width in pixels
pub const PANEL_WIDTH: usize = 53;

/// Panel height in pixels
pub const PANEL_HEIGHT: usize = 11;

/// One pixel-set operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PixelOp {
    pub x: u8,
    pub y: u8,
    pub color: Rgb,
}

/// Full-panel RGB buffer
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    pixels: [[Rgb; PANEL_WIDTH]; PANEL_HEIGHT],
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    pub const fn new() -> Self {
        Self {
            pixels: [[Rgb::BLACK; PANEL_WIDTH]; PANEL_HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [[Rgb::BLACK; PANEL_WIDTH]; PANEL_HEIGHT];
    }

    /// Pixel colour; black outside the panel
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.pixels
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(Rgb::BLACK)
    }

    /// Set one pixel, clipped to the panel
    pub fn set(&mut self, x: usize, y: usize, color: Rgb) {
        if let Some(px) = self.pixels.get_mut(y).and_then(|row| row.get_mut(x)) {
            *px = color;
        }
    }

    /// Fill a rectangle, clipped to the panel
    pub fn fill_rect(&mut self, x: usize, y: usize, width: usize, height: usize, color: Rgb) {
        let x_end = (x + width).min(PANEL_WIDTH);
        let y_end = (y + height).min(PANEL_HEIGHT);
        for row in self.pixels.iter_mut().take(y_end).skip(y) {
            for px in row.iter_mut().take(x_end).skip(x) {
                *px = color;
            }
        }
    }

    /// Fill one glyph block at a glyph origin
    pub fn fill_block(&mut self, origin_x: usize, origin_y: usize, block: &Block, color: Rgb) {
        self.fill_rect(
            origin_x + block.x as usize,
            origin_y + block.y as usize,
            block.width as usize,
            block.height as usize,
            color,
        );
    }

    /// Draw a glyph with its top-left corner at `(x, y)`
    pub fn draw_glyph(&mut self, glyph: &Glyph, x: usize, y: usize, color: Rgb) {
        for block in glyph.blocks {
            self.fill_block(x, y, block, color);
        }
    }

    /// Every pixel of the panel, row-major
    pub fn ops(&self) -> impl Iterator<Item = PixelOp> + '_ {
        self.pixels.iter().enumerate().flat_map(|(y, row)| {
            row.iter().enumerate().map(move |(x, &color)| PixelOp {
                x: x as u8,
                y: y as u8,
                color,
            })
        })
    }

    /// Non-black pixels only
    pub fn lit(&self) -> impl Iterator<Item = PixelOp> + '_ {
        self.ops().filter(|op| !op.color.is_black())
    }

    pub fn lit_count(&self) -> usize {
        self.lit().count()
    }

    /// Leftmost and rightmost lit columns within rows `y0..y1`
    pub fn lit_columns(&self, y0: usize, y1: usize) -> Option<(usize, usize)> {
        let mut span: Option<(usize, usize)> = None;
        for row in self.pixels.iter().take(y1).skip(y0) {
            for (x, px) in row.iter().enumerate() {
                if !px.is_black() {
                    span = Some(match span {
                        Some((lo, hi)) => (lo.min(x), hi.max(x)),
                        None => (x, x),
                    });
                }
            }
        }
        span
    }
}

impl core::fmt::Debug for Frame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for row in &self.pixels {
            for px in row {
                f.write_str(if px.is_black() { "." } else { "#" })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
