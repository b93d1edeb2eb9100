//! Editable pixel grid
//!
//! Rows are stored as bitmasks, bit `x` of row `y` is the cell at `(x, y)`.

use core::fmt;

/// Largest supported grid edge, in cells
pub const MAX_GRID_DIM: usize = 32;

/// Grid construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GridError {
    /// Width or height exceeds [`MAX_GRID_DIM`]
    TooLarge,
    /// A row has a different length from the first row
    RaggedRows,
    /// A row contains a character that is not a cell marker
    InvalidCell,
}

/// Rectangular boolean pixel grid
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    rows: [u32; MAX_GRID_DIM],
    width: u8,
    height: u8,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            rows: [0; MAX_GRID_DIM],
            width: 0,
            height: 0,
        }
    }
}

impl Grid {
    /// Create an all-off grid
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width > MAX_GRID_DIM || height > MAX_GRID_DIM {
            return Err(GridError::TooLarge);
        }
        Ok(Self {
            rows: [0; MAX_GRID_DIM],
            width: width as u8,
            height: height as u8,
        })
    }

    /// Build a grid from pixel-art rows (`#`/`1` on, `.`/`0` off)
    pub fn from_rows<'a, I>(rows: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut grid = Self::default();
        for row in rows {
            grid.push_row(row)?;
        }
        Ok(grid)
    }

    /// Append one pixel-art row
    ///
    /// The first row fixes the grid width.
    pub fn push_row(&mut self, row: &str) -> Result<(), GridError> {
        let row = row.trim_end();
        let len = row.chars().count();

        if self.height == 0 {
            if len > MAX_GRID_DIM {
                return Err(GridError::TooLarge);
            }
            self.width = len as u8;
        } else if len != self.width as usize {
            return Err(GridError::RaggedRows);
        }
        if self.height as usize >= MAX_GRID_DIM {
            return Err(GridError::TooLarge);
        }

        let mut bits = 0u32;
        for (x, c) in row.chars().enumerate() {
            match c {
                '#' | '1' => bits |= 1 << x,
                '.' | '0' => {}
                _ => return Err(GridError::InvalidCell),
            }
        }

        self.rows[self.height as usize] = bits;
        self.height += 1;
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    /// True when either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Cell state; out-of-range cells read as off
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.height() && self.rows[y] & (1 << x) != 0
    }

    /// Set a cell; out-of-range writes are ignored
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        if x < self.width() && y < self.height() {
            if on {
                self.rows[y] |= 1 << x;
            } else {
                self.rows[y] &= !(1 << x);
            }
        }
    }

    /// Row bitmask (bit `x` = cell `x`)
    pub fn row_bits(&self, y: usize) -> u32 {
        if y < self.height() {
            self.rows[y]
        } else {
            0
        }
    }

    /// Number of "on" cells
    pub fn lit_count(&self) -> usize {
        self.rows[..self.height()]
            .iter()
            .map(|r| r.count_ones() as usize)
            .sum()
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{}", self.width, self.height)?;
        for y in 0..self.height() {
            for x in 0..self.width() {
                f.write_str(if self.get(x, y) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
