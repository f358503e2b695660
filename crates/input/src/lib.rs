//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`termtris_types::GameAction`]. This
//! crate is intentionally independent of any rendering concern; the runner
//! binary owns the event loop and feeds key events through here.

pub mod map;

pub use termtris_types as types;

pub use map::{handle_key_event, should_quit};
