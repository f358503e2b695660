//! Core types module - shared constants and plain enums
//!
//! Pure data with no external dependencies, usable from the engine, the
//! input layer, and the terminal renderer alike.
//!
//! # Grid Dimensions
//!
//! Standard Tetris playfield dimensions:
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the ceiling)
//!
//! # Timing
//!
//! The runner advances the engine on a fixed timestep (`TICK_MS`). Gravity
//! drops the active piece once per `BASE_DROP_MS / level` milliseconds, so
//! the interval shrinks as the level rises.
//!
//! # Scoring & Leveling
//!
//! Clearing `n` rows in one lock awards `n * LINE_CLEAR_SCORE * level`
//! points at the level in effect before the clear. The level starts at
//! `START_LEVEL` and rises by one whenever the cumulative cleared-line
//! count crosses `level * LINES_PER_LEVEL`.

/// Grid width in cells (10 columns)
pub const GRID_WIDTH: u8 = 10;

/// Grid height in cells (20 rows)
pub const GRID_HEIGHT: u8 = 20;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval at level 1 (1000ms = 1 second per row)
pub const BASE_DROP_MS: u32 = 1000;

/// Floor for the gravity interval so the schedule always drains in
/// non-zero steps, whatever the level.
pub const MIN_DROP_MS: u32 = 16;

/// Level at the start of a fresh game
pub const START_LEVEL: u32 = 1;

/// Cumulative cleared lines needed per level step
pub const LINES_PER_LEVEL: u32 = 10;

/// Points per cleared row, multiplied by the current level
pub const LINE_CLEAR_SCORE: u32 = 100;

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    Z,
    T,
}

impl PieceKind {
    /// All seven kinds, in template declaration order.
    ///
    /// The piece factory draws uniformly from this array.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::T,
    ];
}

/// Translation direction for the active piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    /// One-cell offset in grid coordinates (x grows right, y grows down).
    pub fn offset(&self) -> (i8, i8) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }
}

/// Game actions the presentation layer can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    MoveDown,
    Rotate,
    HardDrop,
    Pause,
    Start,
}
