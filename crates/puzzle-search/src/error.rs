//! Errors raised while loading and validating puzzle descriptions.
//!
//! The search engine itself has no error type: an unreachable final state is
//! reported as `None`.

use thiserror::Error;

/// Errors that can occur when turning a puzzle description into a start state.
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("invalid puzzle JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("maze grid is empty")]
    EmptyMaze,

    #[error("maze row {row} has width {found}, expected {expected}")]
    RaggedMaze {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown maze character {found:?} at row {row}, column {column}")]
    UnknownCell {
        row: usize,
        column: usize,
        found: char,
    },

    #[error("maze has no start cell '@'")]
    MissingStart,

    #[error("maze has more than one start cell '@'")]
    MultipleStarts,

    #[error("maze has no goal cell 'G'")]
    MissingGoal,

    #[error("building has no floors")]
    NoFloors,

    #[error("malformed item {0:?}, expected an element name followed by G or M")]
    MalformedItem(String),

    #[error("item {0:?} appears more than once")]
    DuplicateItem(String),

    #[error("element {0:?} needs both a generator and a microchip")]
    UnpairedItem(String),

    #[error("a microchip on floor {0} is fried in the starting configuration")]
    UnsafeStart(usize),

    #[error("robot starts off the grid at ({x}, {y})")]
    StartOffGrid { x: i32, y: i32 },

    #[error("grid has no stars to collect")]
    NoStars,

    #[error("grid has {0} stars, at most 64 are supported")]
    TooManyStars(usize),
}
