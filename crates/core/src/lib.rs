//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the complete game engine: grid storage, piece
//! shapes and rotation, collision detection, line clearing and scoring,
//! and the gravity schedule. It has **zero dependencies** on UI or I/O:
//!
//! - **Deterministic**: the seed (or an injected [`RandomSource`]) fully
//!   determines a game
//! - **Synchronous**: every operation runs to completion on the caller's
//!   thread; there is no locking because there is one logical actor
//! - **Fast**: shapes and the grid live inline, transitions allocate
//!   nothing
//!
//! # Module Structure
//!
//! - [`grid`]: 10x20 binary playfield with full-row compaction
//! - [`pieces`]: the seven shape templates and the clockwise rotation
//!   transform (transpose, then reverse rows)
//! - [`collision`]: placement legality, with the above-ceiling overflow
//!   condition kept distinct from ordinary blockage
//! - [`gravity`]: the engine-owned repeating drop schedule
//! - [`rng`]: seedable LCG behind the [`RandomSource`] seam
//! - [`game_state`]: the state machine tying it all together
//! - [`snapshot`]: the state record handed to the presentation layer
//!
//! # Example
//!
//! ```
//! use termtris_core::GameState;
//! use termtris_types::GameAction;
//!
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! // Gravity advances via elapsed wall time from the host loop.
//! game.tick(16);
//! assert!(!game.snapshot().game_over);
//! ```

pub mod collision;
pub mod game_state;
pub mod gravity;
pub mod grid;
pub mod pieces;
pub mod rng;
pub mod snapshot;

pub use termtris_types as types;

// Re-export commonly used types for convenience
pub use collision::{check_placement, Conflict};
pub use game_state::{GameState, Piece};
pub use gravity::{drop_interval_ms, GravityTimer};
pub use grid::Grid;
pub use pieces::Shape;
pub use rng::{RandomSource, SimpleRng};
pub use snapshot::{ActivePiece, GameSnapshot};
