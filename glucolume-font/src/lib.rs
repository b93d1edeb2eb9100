//! Block font compiler and glyph table for the Glucolume LED matrix
//!
//! Glyphs are stored as ordered lists of axis-aligned rectangles
//! ("blocks") instead of individual pixels:
//!
//! - [`grid::Grid`] - editable boolean pixel grid (max 32x32)
//! - [`compiler::compile`] - deterministic greedy grid-to-blocks compiler
//! - [`glyph`] - closed glyph key set and the compiled-in glyph table
//! - [`artifact`] - text and postcard interchange formats shared by the
//!   design tools and the build script
//!
//! The runtime glyph table is generated at build time from `glyphs.font`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod artifact;
pub mod compiler;
pub mod glyph;
pub mod grid;

pub use artifact::{ArtifactError, GlyphRecord};
pub use compiler::{compile, compile_with, Blocks, MAX_BLOCKS};
pub use glyph::{glyph, Block, Glyph, GlyphKey};
pub use grid::{Grid, GridError, MAX_GRID_DIM};
