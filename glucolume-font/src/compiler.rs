//! Grid-to-blocks font compiler
//!
//! Greedy maximal-rectangle decomposition:
//!
//! 1. Scan cells row-major (top-to-bottom, left-to-right).
//! 2. At each lit, uncovered cell grow the block rightward while cells stay
//!    lit and uncovered.
//! 3. With the width fixed, grow downward one full row at a time. A row is
//!    taken only if every cell under the block is lit and uncovered.
//! 4. Mark the block covered, emit it, and continue the scan.
//!
//! The output is deterministic for a given grid and covers exactly the lit
//! cells, without overlap. It is not a minimum cover.

use heapless::Vec;

use crate::glyph::Block;
use crate::grid::{Grid, MAX_GRID_DIM};

/// Upper bound on blocks per glyph (every block covers at least one cell)
pub const MAX_BLOCKS: usize = MAX_GRID_DIM * MAX_GRID_DIM;

/// Compiled block list
pub type Blocks = Vec<Block, MAX_BLOCKS>;

/// Compile a grid into an ordered block list
///
/// A grid with a zero dimension yields an empty list.
pub fn compile(grid: &Grid) -> Blocks {
    let mut blocks = Blocks::new();
    compile_with(grid, |block| {
        // Cannot overflow: blocks never share cells
        let _ = blocks.push(block);
    });
    blocks
}

/// Compile a grid, handing each block to `emit` in output order
pub fn compile_with<F: FnMut(Block)>(grid: &Grid, mut emit: F) {
    if grid.is_empty() {
        return;
    }

    let width = grid.width();
    let height = grid.height();
    let mut covered = [0u32; MAX_GRID_DIM];

    for y in 0..height {
        for x in 0..width {
            if !is_open(grid, &covered, x, y) {
                continue;
            }

            let mut w = 1;
            while x + w < width && is_open(grid, &covered, x + w, y) {
                w += 1;
            }

            // Height grows all-or-nothing per row
            let mask = span_mask(x, w);
            let mut h = 1;
            while y + h < height && row_open(grid, &covered, y + h, mask) {
                h += 1;
            }

            for row in &mut covered[y..y + h] {
                *row |= mask;
            }

            emit(Block::new(x as u8, y as u8, w as u8, h as u8));
        }
    }
}

fn is_open(grid: &Grid, covered: &[u32; MAX_GRID_DIM], x: usize, y: usize) -> bool {
    grid.get(x, y) && covered[y] & (1 << x) == 0
}

fn row_open(grid: &Grid, covered: &[u32; MAX_GRID_DIM], y: usize, mask: u32) -> bool {
    grid.row_bits(y) & !covered[y] & mask == mask
}

/// Bitmask of `width` cells starting at `x`
fn span_mask(x: usize, width: usize) -> u32 {
    (((1u64 << width) - 1) << x) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid(rows: &[&str]) -> Grid {
        Grid::from_rows(rows.iter().copied()).unwrap()
    }

    fn blocks(list: &[(u8, u8, u8, u8)]) -> std::vec::Vec<Block> {
        list.iter()
            .map(|&(x, y, w, h)| Block::new(x, y, w, h))
            .collect()
    }

    /// Coverage count per cell
    fn coverage(grid: &Grid, out: &[Block]) -> std::vec::Vec<std::vec::Vec<u32>> {
        let mut cov = vec![vec![0u32; grid.width()]; grid.height()];
        for b in out {
            for (x, y) in b.cells() {
                cov[y as usize][x as usize] += 1;
            }
        }
        cov
    }

    #[test]
    fn test_two_by_two_corner() {
        let out = compile(&grid(&["##", "#."]));
        assert_eq!(out.as_slice(), blocks(&[(0, 0, 2, 1), (0, 1, 1, 1)]).as_slice());
    }

    #[test]
    fn test_height_growth_is_all_or_nothing() {
        // Row 1 is missing one cell inside the candidate width
        let out = compile(&grid(&["####", "##.#", "####"]));
        assert_eq!(out[0], Block::new(0, 0, 4, 1));
        assert_eq!(out[0].height, 1);
        assert_eq!(
            out.as_slice(),
            blocks(&[(0, 0, 4, 1), (0, 1, 2, 2), (3, 1, 1, 2), (2, 2, 1, 1)]).as_slice()
        );
    }

    #[test]
    fn test_full_block() {
        let out = compile(&grid(&["###", "###", "###"]));
        assert_eq!(out.as_slice(), &[Block::new(0, 0, 3, 3)]);
    }

    #[test]
    fn test_width_stops_at_covered_cell() {
        // The first column block covers (0, 1), so row 1 starts at x = 1
        let out = compile(&grid(&["#..", "###"]));
        assert_eq!(out.as_slice(), blocks(&[(0, 0, 1, 2), (1, 1, 2, 1)]).as_slice());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(compile(&Grid::default()).is_empty());
        assert!(compile(&Grid::new(0, 8).unwrap()).is_empty());
        assert!(compile(&Grid::new(8, 0).unwrap()).is_empty());
        assert!(compile(&grid(&["...", "..."])).is_empty());
    }

    #[test]
    fn test_max_size_full_grid() {
        let row = "#".repeat(MAX_GRID_DIM);
        let rows = vec![row.as_str(); MAX_GRID_DIM];
        let out = compile(&Grid::from_rows(rows).unwrap());
        assert_eq!(out.as_slice(), &[Block::new(0, 0, 32, 32)]);
    }

    #[test]
    fn test_checkerboard_is_all_single_cells() {
        let mut g = Grid::new(MAX_GRID_DIM, MAX_GRID_DIM).unwrap();
        for y in 0..MAX_GRID_DIM {
            for x in 0..MAX_GRID_DIM {
                g.set(x, y, (x + y) % 2 == 0);
            }
        }
        let out = compile(&g);
        assert_eq!(out.len(), MAX_GRID_DIM * MAX_GRID_DIM / 2);
        assert!(out.iter().all(|b| b.width == 1 && b.height == 1));
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        (0usize..=MAX_GRID_DIM, 0usize..=MAX_GRID_DIM)
            .prop_flat_map(|(w, h)| (Just(w), Just(h), prop::collection::vec(any::<bool>(), w * h)))
            .prop_map(|(w, h, cells)| {
                let mut g = Grid::new(w, h).unwrap();
                for y in 0..h {
                    for x in 0..w {
                        g.set(x, y, cells[y * w + x]);
                    }
                }
                g
            })
    }

    proptest! {
        #[test]
        fn prop_covers_exactly_lit_cells(g in arb_grid()) {
            let out = compile(&g);
            let cov = coverage(&g, &out);
            for y in 0..g.height() {
                for x in 0..g.width() {
                    let expected = if g.get(x, y) { 1 } else { 0 };
                    prop_assert_eq!(cov[y][x], expected, "cell ({}, {})", x, y);
                }
            }
        }

        #[test]
        fn prop_compile_is_deterministic(g in arb_grid()) {
            let a = compile(&g);
            let b = compile(&g.clone());
            prop_assert_eq!(a.as_slice(), b.as_slice());
        }

        #[test]
        fn prop_blocks_are_non_empty_and_in_scan_order(g in arb_grid()) {
            let out = compile(&g);
            for b in out.iter() {
                prop_assert!(b.width > 0 && b.height > 0);
                prop_assert!(b.x as usize + b.width as usize <= g.width());
                prop_assert!(b.y as usize + b.height as usize <= g.height());
            }
            for pair in out.windows(2) {
                prop_assert!((pair[0].y, pair[0].x) < (pair[1].y, pair[1].x));
            }
        }
    }
}
