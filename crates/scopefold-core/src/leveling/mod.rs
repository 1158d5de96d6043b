//! Indentation-aware token leveling
//!
//! Each token gets a nesting `level` computed from the `indentation`,
//! `dedentation` and `punctuation.continuation` classifiers, after adjacent
//! split-assignment tokens on a line are merged.

pub mod engine;
pub mod state;

pub use engine::LevelingEngine;
pub use state::{LevelState, Step, TokenClass};
