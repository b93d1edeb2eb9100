//! Blocks, glyph keys and the compiled-in glyph table

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle of lit pixels, relative to the glyph origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Block {
    pub x: u8,
    pub y: u8,
    pub width: u8,
    pub height: u8,
}

impl Block {
    pub const fn new(x: u8, y: u8, width: u8, height: u8) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of pixels covered
    pub const fn area(&self) -> u16 {
        self.width as u16 * self.height as u16
    }

    /// Check whether a pixel lies inside the block
    pub const fn contains(&self, x: u8, y: u8) -> bool {
        x >= self.x
            && y >= self.y
            && (x as u16) < self.x as u16 + self.width as u16
            && (y as u16) < self.y as u16 + self.height as u16
    }

    /// Covered pixels, row-major
    pub fn cells(&self) -> impl Iterator<Item = (u8, u8)> {
        let Block {
            x,
            y,
            width,
            height,
        } = *self;
        (y..y + height).flat_map(move |py| (x..x + width).map(move |px| (px, py)))
    }
}

/// Closed set of glyphs known to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GlyphKey {
    Space,
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    /// Placeholder bar used for "no reading"
    Dash,
    DoubleUp,
    SingleUp,
    FortyFiveUp,
    Flat,
    FortyFiveDown,
    SingleDown,
    DoubleDown,
}

impl GlyphKey {
    /// Every key, in table order
    pub const ALL: [GlyphKey; 19] = [
        GlyphKey::Space,
        GlyphKey::Digit0,
        GlyphKey::Digit1,
        GlyphKey::Digit2,
        GlyphKey::Digit3,
        GlyphKey::Digit4,
        GlyphKey::Digit5,
        GlyphKey::Digit6,
        GlyphKey::Digit7,
        GlyphKey::Digit8,
        GlyphKey::Digit9,
        GlyphKey::Dash,
        GlyphKey::DoubleUp,
        GlyphKey::SingleUp,
        GlyphKey::FortyFiveUp,
        GlyphKey::Flat,
        GlyphKey::FortyFiveDown,
        GlyphKey::SingleDown,
        GlyphKey::DoubleDown,
    ];

    /// Key for a decimal digit
    pub const fn digit(d: u8) -> Option<GlyphKey> {
        match d {
            0 => Some(GlyphKey::Digit0),
            1 => Some(GlyphKey::Digit1),
            2 => Some(GlyphKey::Digit2),
            3 => Some(GlyphKey::Digit3),
            4 => Some(GlyphKey::Digit4),
            5 => Some(GlyphKey::Digit5),
            6 => Some(GlyphKey::Digit6),
            7 => Some(GlyphKey::Digit7),
            8 => Some(GlyphKey::Digit8),
            9 => Some(GlyphKey::Digit9),
            _ => None,
        }
    }

    /// Key for a character of a rendered number (`' '`, `'-'`, `'0'..='9'`)
    pub fn for_char(c: char) -> Option<GlyphKey> {
        match c {
            ' ' => Some(GlyphKey::Space),
            '-' => Some(GlyphKey::Dash),
            _ => c.to_digit(10).and_then(|d| GlyphKey::digit(d as u8)),
        }
    }

    /// Artifact name of the key
    pub const fn name(self) -> &'static str {
        match self {
            GlyphKey::Space => "space",
            GlyphKey::Digit0 => "0",
            GlyphKey::Digit1 => "1",
            GlyphKey::Digit2 => "2",
            GlyphKey::Digit3 => "3",
            GlyphKey::Digit4 => "4",
            GlyphKey::Digit5 => "5",
            GlyphKey::Digit6 => "6",
            GlyphKey::Digit7 => "7",
            GlyphKey::Digit8 => "8",
            GlyphKey::Digit9 => "9",
            GlyphKey::Dash => "dash",
            GlyphKey::DoubleUp => "double_up",
            GlyphKey::SingleUp => "single_up",
            GlyphKey::FortyFiveUp => "forty_five_up",
            GlyphKey::Flat => "flat",
            GlyphKey::FortyFiveDown => "forty_five_down",
            GlyphKey::SingleDown => "single_down",
            GlyphKey::DoubleDown => "double_down",
        }
    }

    /// Parse an artifact name
    pub fn from_name(name: &str) -> Option<GlyphKey> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// A compiled glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub key: GlyphKey,
    /// Advance width in pixels
    pub width: u8,
    pub height: u8,
    pub blocks: &'static [Block],
}

impl Glyph {
    /// Check whether a pixel of the glyph is lit
    pub fn is_lit(&self, x: u8, y: u8) -> bool {
        self.blocks.iter().any(|b| b.contains(x, y))
    }
}

include!(concat!(env!("OUT_DIR"), "/glyph_table.rs"));

/// Look up a glyph in the compiled-in table
pub fn glyph(key: GlyphKey) -> Option<&'static Glyph> {
    lookup(key)
}
