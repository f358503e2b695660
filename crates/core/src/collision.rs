//! Collision detection for candidate piece placements.

use crate::grid::Grid;
use crate::pieces::Shape;
use crate::types::{GRID_HEIGHT, GRID_WIDTH};

/// Why a candidate placement is illegal.
///
/// `AboveCeiling` is kept distinct from ordinary blockage: a shape cell
/// resolving above row 0 means the stack has overflowed the playfield and
/// the game must end, while `Blocked` is a routine steady-state event
/// (a piece resting on the floor, against a wall, or on the stack).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    AboveCeiling,
    Blocked,
}

/// Test a candidate placement of `shape` anchored at `(x, y)`.
///
/// Every occupied shape cell is resolved to absolute grid coordinates and
/// checked in matrix order. The ceiling test runs first for each cell, so
/// an overflowing placement always reports `AboveCeiling` rather than a
/// generic blockage. Returns `None` when every cell lands on an open cell.
pub fn check_placement(grid: &Grid, shape: &Shape, x: i8, y: i8) -> Option<Conflict> {
    for &(dx, dy) in shape.offsets().iter() {
        let cx = x + dx;
        let cy = y + dy;

        if cy < 0 {
            return Some(Conflict::AboveCeiling);
        }

        if cx < 0 || cx >= GRID_WIDTH as i8 || cy >= GRID_HEIGHT as i8 || grid.is_occupied(cx, cy)
        {
            return Some(Conflict::Blocked);
        }
    }
    None
}
