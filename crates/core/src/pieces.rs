//! Pieces module - tetromino shape templates and the rotation transform
//!
//! A shape is an orientation-specific binary matrix (at most 4x4) kept
//! inline so shapes are `Copy` and transforming one allocates nothing.
//! Rotation is a matrix transpose followed by a per-row reversal, which
//! yields a clockwise quarter turn for these square templates.

use crate::types::{GRID_WIDTH, PieceKind};

/// Shape matrices are at most 4x4 (the I template)
pub const MAX_SHAPE: usize = 4;

/// Cells in a tetromino
pub const SHAPE_CELLS: usize = 4;

/// Spawn anchor for new pieces: horizontal center of the ceiling row
pub const SPAWN_POSITION: (i8, i8) = ((GRID_WIDTH / 2) as i8 - 1, 0);

/// Orientation-specific cell matrix of the active tetromino.
///
/// Indexed `[row][col]`; only the leading `rows` x `cols` window is
/// meaningful. Every template (and therefore every rotation of one)
/// contains exactly [`SHAPE_CELLS`] occupied cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    cells: [[u8; MAX_SHAPE]; MAX_SHAPE],
    rows: u8,
    cols: u8,
}

impl Shape {
    fn from_matrix<const R: usize, const C: usize>(matrix: [[u8; C]; R]) -> Self {
        let mut cells = [[0u8; MAX_SHAPE]; MAX_SHAPE];
        for (r, row) in matrix.iter().enumerate() {
            cells[r][..C].copy_from_slice(row);
        }
        Self {
            cells,
            rows: R as u8,
            cols: C as u8,
        }
    }

    /// The fixed template for a piece kind, in spawn orientation
    pub fn template(kind: PieceKind) -> Self {
        match kind {
            PieceKind::I => Self::from_matrix([
                [0, 0, 0, 0],
                [1, 1, 1, 1],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
            ]),
            PieceKind::J => Self::from_matrix([
                [1, 0, 0],
                [1, 1, 1],
                [0, 0, 0],
            ]),
            PieceKind::L => Self::from_matrix([
                [0, 0, 1],
                [1, 1, 1],
                [0, 0, 0],
            ]),
            PieceKind::O => Self::from_matrix([
                [1, 1],
                [1, 1],
            ]),
            PieceKind::S => Self::from_matrix([
                [0, 1, 1],
                [1, 1, 0],
                [0, 0, 0],
            ]),
            PieceKind::Z => Self::from_matrix([
                [1, 1, 0],
                [0, 1, 1],
                [0, 0, 0],
            ]),
            PieceKind::T => Self::from_matrix([
                [0, 1, 0],
                [1, 1, 1],
                [0, 0, 0],
            ]),
        }
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Check whether the matrix cell at (row, col) is occupied
    pub fn filled(&self, row: u8, col: u8) -> bool {
        row < self.rows && col < self.cols && self.cells[row as usize][col as usize] != 0
    }

    /// Occupied cell offsets as (dx, dy) from the anchor, in matrix order
    /// (top row first, left to right).
    pub fn offsets(&self) -> [(i8, i8); SHAPE_CELLS] {
        let mut out = [(0i8, 0i8); SHAPE_CELLS];
        let mut n = 0;
        for r in 0..self.rows as usize {
            for c in 0..self.cols as usize {
                if self.cells[r][c] != 0 {
                    debug_assert!(n < SHAPE_CELLS);
                    out[n] = (c as i8, r as i8);
                    n += 1;
                }
            }
        }
        debug_assert_eq!(n, SHAPE_CELLS);
        out
    }

    /// Clockwise quarter turn: transpose the matrix, then reverse each
    /// resulting row. Produces a new shape; `self` is unchanged.
    pub fn rotated_cw(&self) -> Self {
        let rows = self.rows as usize;
        let cols = self.cols as usize;
        let mut cells = [[0u8; MAX_SHAPE]; MAX_SHAPE];
        for r in 0..cols {
            for c in 0..rows {
                cells[r][c] = self.cells[rows - 1 - c][r];
            }
        }
        Self {
            cells,
            rows: self.cols,
            cols: self.rows,
        }
    }
}
