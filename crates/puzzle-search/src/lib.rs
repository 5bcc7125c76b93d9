//! Breadth-first search over implicit puzzle state spaces.
//!
//! This crate provides a generic engine that finds the minimum number of
//! transitions from a start state to any state accepted by a final-state
//! predicate, generating the state graph lazily. A handful of reference
//! puzzles show how client state types plug into it.

pub mod error;
pub mod puzzle;
pub mod puzzles;
pub mod search;

// Re-export main types
pub use error::PuzzleError;
pub use puzzle::{Direction, Position, PuzzleConfig, PuzzleKind, SolveReport, Tile};
pub use search::{search, NextSteps, SearchState, SearchStats, SearchStatus, StateSearchEngine};
