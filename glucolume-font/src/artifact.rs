//! Font interchange formats
//!
//! Two representations of a compiled glyph are shared between the design
//! tool (`glucolume-fontc`), the build script and the tests:
//!
//! - a text line per glyph: `<key> <w>x<h>: (x,y,w,h) (x,y,w,h) ...`
//! - a postcard-encoded [`GlyphRecord`] for compact binary storage
//!
//! Pixel art sources are split into sections, each introduced by a
//! `== <key>` header line followed by `#`/`.` rows. Art comments start
//! with `//` since `#` is a lit pixel.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::compiler::{compile, Blocks};
use crate::glyph::{Block, GlyphKey};
use crate::grid::{Grid, GridError};

/// Errors raised while reading or writing font artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArtifactError {
    /// Key not in the fixed glyph set
    UnknownKey,
    /// Missing `:` or malformed `<w>x<h>`
    BadHeader,
    /// Malformed `(x,y,w,h)` tuple
    BadBlock,
    /// Block is empty or extends past the glyph bounds
    BlockOutOfBounds,
    /// More blocks than a glyph can hold
    TooManyBlocks,
    /// Pixel rows found before any `== key` header
    MissingSection { line: usize },
    /// Invalid pixel row
    Grid { line: usize, error: GridError },
    /// Postcard encoding failed (buffer too small)
    Encode,
    /// Postcard decoding failed
    Decode,
}

impl fmt::Display for ArtifactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactError::UnknownKey => write!(f, "unknown glyph key"),
            ArtifactError::BadHeader => write!(f, "malformed glyph header"),
            ArtifactError::BadBlock => write!(f, "malformed block"),
            ArtifactError::BlockOutOfBounds => write!(f, "block outside glyph bounds"),
            ArtifactError::TooManyBlocks => write!(f, "too many blocks"),
            ArtifactError::MissingSection { line } => {
                write!(f, "line {}: pixel row before any `== key` header", line)
            }
            ArtifactError::Grid { line, error } => write!(f, "line {}: {:?}", line, error),
            ArtifactError::Encode => write!(f, "postcard encode failed"),
            ArtifactError::Decode => write!(f, "postcard decode failed"),
        }
    }
}

/// One compiled glyph as stored in an artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphRecord {
    pub key: GlyphKey,
    pub width: u8,
    pub height: u8,
    pub blocks: Blocks,
}

impl GlyphRecord {
    /// Compile a pixel grid into a record
    pub fn compile(key: GlyphKey, grid: &Grid) -> Self {
        Self {
            key,
            width: grid.width() as u8,
            height: grid.height() as u8,
            blocks: compile(grid),
        }
    }

    /// Write the record as one artifact text line (no trailing newline)
    pub fn write_line<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        write!(out, "{} {}x{}:", self.key.name(), self.width, self.height)?;
        for b in &self.blocks {
            write!(out, " ({},{},{},{})", b.x, b.y, b.width, b.height)?;
        }
        Ok(())
    }

    /// Parse one artifact text line
    ///
    /// Returns `Ok(None)` for blank lines and `#` comments.
    pub fn parse_line(line: &str) -> Result<Option<Self>, ArtifactError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (head, body) = line.split_once(':').ok_or(ArtifactError::BadHeader)?;
        let mut head = head.split_whitespace();
        let key = head.next().ok_or(ArtifactError::BadHeader)?;
        let key = GlyphKey::from_name(key).ok_or(ArtifactError::UnknownKey)?;
        let (w, h) = head
            .next()
            .and_then(|dims| dims.split_once('x'))
            .ok_or(ArtifactError::BadHeader)?;
        let width: u8 = w.parse().map_err(|_| ArtifactError::BadHeader)?;
        let height: u8 = h.parse().map_err(|_| ArtifactError::BadHeader)?;
        if head.next().is_some() {
            return Err(ArtifactError::BadHeader);
        }

        let mut blocks = Blocks::new();
        for tuple in body.split(')') {
            let tuple = tuple.trim();
            if tuple.is_empty() {
                continue;
            }
            let block = parse_block(tuple)?;
            if block.width == 0
                || block.height == 0
                || block.x as u16 + block.width as u16 > width as u16
                || block.y as u16 + block.height as u16 > height as u16
            {
                return Err(ArtifactError::BlockOutOfBounds);
            }
            blocks
                .push(block)
                .map_err(|_| ArtifactError::TooManyBlocks)?;
        }

        Ok(Some(Self {
            key,
            width,
            height,
            blocks,
        }))
    }

    /// Encode as postcard into `buf`, returning the used prefix
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ArtifactError> {
        postcard::to_slice(self, buf).map_err(|_| ArtifactError::Encode)
    }

    /// Decode a postcard-encoded record
    pub fn decode(bytes: &[u8]) -> Result<Self, ArtifactError> {
        postcard::from_bytes(bytes).map_err(|_| ArtifactError::Decode)
    }
}

/// Parse `(x,y,w,h` (closing paren already stripped)
fn parse_block(tuple: &str) -> Result<Block, ArtifactError> {
    let inner = tuple.strip_prefix('(').ok_or(ArtifactError::BadBlock)?;
    let mut nums = [0u8; 4];
    let mut parts = inner.split(',');
    for slot in nums.iter_mut() {
        let part = parts.next().ok_or(ArtifactError::BadBlock)?;
        *slot = part.trim().parse().map_err(|_| ArtifactError::BadBlock)?;
    }
    if parts.next().is_some() {
        return Err(ArtifactError::BadBlock);
    }
    let [x, y, w, h] = nums;
    Ok(Block::new(x, y, w, h))
}

fn is_art_filler(line: &str) -> bool {
    line.is_empty() || line.starts_with("//")
}

/// Iterator over the `== key` sections of a pixel art source
pub struct ArtSections<'a> {
    lines: core::iter::Peekable<core::iter::Enumerate<core::str::Lines<'a>>>,
}

/// Split a pixel art source into `(key, grid)` sections
pub fn art_sections(source: &str) -> ArtSections<'_> {
    ArtSections {
        lines: source.lines().enumerate().peekable(),
    }
}

impl<'a> Iterator for ArtSections<'a> {
    type Item = Result<(GlyphKey, Grid), ArtifactError>;

    fn next(&mut self) -> Option<Self::Item> {
        // Find the next header
        let key = loop {
            let (index, line) = self.lines.next()?;
            let line = line.trim();
            if is_art_filler(line) {
                continue;
            }
            match line.strip_prefix("==") {
                Some(name) => match GlyphKey::from_name(name.trim()) {
                    Some(key) => break key,
                    None => return Some(Err(ArtifactError::UnknownKey)),
                },
                None => return Some(Err(ArtifactError::MissingSection { line: index + 1 })),
            }
        };

        let mut grid = Grid::default();
        while let Some((index, line)) = self.lines.peek().copied() {
            let line = line.trim();
            if line.starts_with("==") {
                break;
            }
            self.lines.next();
            if is_art_filler(line) {
                continue;
            }
            if let Err(error) = grid.push_row(line) {
                return Some(Err(ArtifactError::Grid {
                    line: index + 1,
                    error,
                }));
            }
        }

        Some(Ok((key, grid)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ART: &str = "\
// comment
== 1
..##
.###
..##

== dash
....
####
";

    #[test]
    fn test_art_sections() {
        let sections: Vec<_> = art_sections(ART).collect::<Result<_, _>>().unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].0, GlyphKey::Digit1);
        assert_eq!(sections[0].1.width(), 4);
        assert_eq!(sections[0].1.height(), 3);
        assert_eq!(sections[1].0, GlyphKey::Dash);
        assert_eq!(sections[1].1.lit_count(), 4);
    }

    #[test]
    fn test_art_rows_before_header() {
        let mut it = art_sections("##\n== 0\n##\n");
        assert_eq!(
            it.next(),
            Some(Err(ArtifactError::MissingSection { line: 1 }))
        );
    }

    #[test]
    fn test_art_unknown_key_and_bad_row() {
        assert_eq!(
            art_sections("== sideways\n#\n").next(),
            Some(Err(ArtifactError::UnknownKey))
        );
        assert!(matches!(
            art_sections("== 0\n##\n#\n").next(),
            Some(Err(ArtifactError::Grid {
                line: 3,
                error: GridError::RaggedRows
            }))
        ));
    }

    #[test]
    fn test_text_line_roundtrip() {
        let grid = Grid::from_rows(["##", "#."]).unwrap();
        let record = GlyphRecord::compile(GlyphKey::Flat, &grid);

        let mut line = String::new();
        record.write_line(&mut line).unwrap();
        assert_eq!(line, "flat 2x2: (0,0,2,1) (0,1,1,1)");

        let parsed = GlyphRecord::parse_line(&line).unwrap().unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_parse_line_rejects_bad_input() {
        assert_eq!(GlyphRecord::parse_line("  "), Ok(None));
        assert_eq!(GlyphRecord::parse_line("# x"), Ok(None));
        assert_eq!(
            GlyphRecord::parse_line("nope 2x2:"),
            Err(ArtifactError::UnknownKey)
        );
        assert_eq!(
            GlyphRecord::parse_line("0 2y2:"),
            Err(ArtifactError::BadHeader)
        );
        assert_eq!(
            GlyphRecord::parse_line("0 2x2: (0,0,1)"),
            Err(ArtifactError::BadBlock)
        );
        assert_eq!(
            GlyphRecord::parse_line("0 2x2: (1,1,2,1)"),
            Err(ArtifactError::BlockOutOfBounds)
        );
        assert_eq!(
            GlyphRecord::parse_line("0 2x2: (0,0,0,1)"),
            Err(ArtifactError::BlockOutOfBounds)
        );
    }

    #[test]
    fn test_space_has_no_blocks() {
        let record = GlyphRecord::parse_line("space 6x10:").unwrap().unwrap();
        assert_eq!(record.key, GlyphKey::Space);
        assert!(record.blocks.is_empty());
    }

    #[test]
    fn test_postcard_record() {
        let grid = Grid::from_rows(["###", "#.#"]).unwrap();
        let record = GlyphRecord::compile(GlyphKey::Digit0, &grid);

        let mut buf = [0u8; 64];
        let used = record.encode(&mut buf).unwrap().len();
        assert_eq!(GlyphRecord::decode(&buf[..used]), Ok(record.clone()));

        let mut tiny = [0u8; 2];
        assert_eq!(record.encode(&mut tiny), Err(ArtifactError::Encode));
        assert_eq!(GlyphRecord::decode(&[0xff]), Err(ArtifactError::Decode));
    }
}
