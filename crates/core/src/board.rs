//! Board module - the N x N tile grid
//!
//! The board is a square grid where each cell is either empty (`0`) or holds a
//! power of two >= 2. It is a small `Copy` value: engine operations take a
//! board by reference and return a new one, callers never edit cells in place.
//! Coordinates are `(row, col)`, row 0 at the top, col 0 at the left.

use std::fmt;

use crate::types::{is_valid_tile, Tile, BOARD_SIZE};

/// The game board - `N` rows x `N` columns, row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board<const N: usize = BOARD_SIZE> {
    cells: [[Tile; N]; N],
}

impl<const N: usize> Board<N> {
    /// Create a new empty board
    pub fn new() -> Self {
        Self { cells: [[0; N]; N] }
    }

    /// Build a board from rows.
    ///
    /// # Panics
    ///
    /// Panics if a non-zero cell is not a power of two >= 2.
    pub fn from_rows(rows: [[Tile; N]; N]) -> Self {
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                assert!(
                    v == 0 || is_valid_tile(v),
                    "invalid tile {} at ({}, {})",
                    v,
                    r,
                    c
                );
            }
        }
        Self { cells: rows }
    }

    /// Side length
    pub fn size(&self) -> usize {
        N
    }

    /// Get cell at (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Set cell at (row, col)
    /// Returns false if out of bounds
    pub(crate) fn set(&mut self, row: usize, col: usize, value: Tile) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Copy of this board with one cell replaced.
    ///
    /// # Panics
    ///
    /// Panics if the cell is out of bounds or `value` is not a legal tile.
    pub fn with_tile(&self, row: usize, col: usize, value: Tile) -> Self {
        assert!(value == 0 || is_valid_tile(value), "invalid tile {}", value);
        let mut next = *self;
        assert!(
            next.set(row, col, value),
            "cell ({}, {}) is outside a {}x{} board",
            row,
            col,
            N,
            N
        );
        next
    }

    /// All rows
    pub fn rows(&self) -> &[[Tile; N]; N] {
        &self.cells
    }

    pub fn row(&self, row: usize) -> [Tile; N] {
        self.cells[row]
    }

    pub fn column(&self, col: usize) -> [Tile; N] {
        let mut out = [0; N];
        for (r, slot) in out.iter_mut().enumerate() {
            *slot = self.cells[r][col];
        }
        out
    }

    pub(crate) fn set_row(&mut self, row: usize, line: [Tile; N]) {
        self.cells[row] = line;
    }

    pub(crate) fn set_column(&mut self, col: usize, line: [Tile; N]) {
        for (r, v) in line.into_iter().enumerate() {
            self.cells[r][col] = v;
        }
    }

    /// Positions of empty cells in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, &v)| v == 0)
                .map(move |(c, _)| (r, c))
        })
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&v| v == 0).count()
    }

    /// Number of non-empty cells
    pub fn tile_count(&self) -> usize {
        N * N - self.empty_count()
    }

    /// Sum of all tile values
    pub fn tile_sum(&self) -> u64 {
        self.cells.iter().flatten().map(|&v| v as u64).sum()
    }

    pub fn max_tile(&self) -> Tile {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|&v| v != 0)
    }

    /// Write the grid into a caller-owned buffer (no allocation)
    pub fn write_grid(&self, out: &mut [[Tile; N]; N]) {
        *out = self.cells;
    }
}

impl<const N: usize> Default for Board<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Display for Board<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for (c, &v) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, " ")?;
                }
                if v == 0 {
                    write!(f, "{:>5}", ".")?;
                } else {
                    write!(f, "{:>5}", v)?;
                }
            }
        }
        Ok(())
    }
}
