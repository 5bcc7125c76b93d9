//! Puzzle description format and the grid types shared by the puzzles.
//!
//! A puzzle file is a JSON object tagged by `kind`:
//!
//! ```json
//! { "kind": "maze", "title": "Corridor", "grid": ["@.G"] }
//! ```

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PuzzleError;
use crate::puzzles::{Building, ElevatorConfig, Maze, MazeConfig, RobotConfig, RobotPuzzle};
use crate::search::{SearchState, StateSearchEngine};

/// Heading on a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn turn_left(self) -> Direction {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    pub fn turn_right(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self {
            Direction::Up => '^',
            Direction::Down => 'v',
            Direction::Left => '<',
            Direction::Right => '>',
        };
        write!(f, "{arrow}")
    }
}

/// A tile on a robot grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    #[serde(rename = "hasStar", default)]
    pub has_star: bool,
}

impl Tile {
    pub fn new(has_star: bool) -> Self {
        Self { has_star }
    }
}

/// Position on a grid, `y` grows downwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring position one step towards `direction`
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The puzzle-specific part of a puzzle file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PuzzleKind {
    Maze(MazeConfig),
    Elevator(ElevatorConfig),
    Robot(RobotConfig),
}

impl PuzzleKind {
    pub fn name(&self) -> &'static str {
        match self {
            PuzzleKind::Maze(_) => "maze",
            PuzzleKind::Elevator(_) => "elevator",
            PuzzleKind::Robot(_) => "robot",
        }
    }
}

/// A complete puzzle file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub puzzle: PuzzleKind,
}

/// Outcome of solving one puzzle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveReport {
    pub solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<usize>,
    pub states_discovered: usize,
    pub states_expanded: usize,
    pub time_elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<String>>,
}

impl PuzzleConfig {
    /// Parse a puzzle file
    pub fn from_json(json: &str) -> Result<Self, PuzzleError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the puzzle and search for the minimum number of moves.
    ///
    /// With `show_path` the report lists every state on the way to the
    /// final one.
    pub fn solve(&self, show_path: bool) -> Result<SolveReport, PuzzleError> {
        debug!(
            kind = self.puzzle.name(),
            id = self.id.as_deref().unwrap_or(""),
            "solving puzzle"
        );

        let report = match &self.puzzle {
            PuzzleKind::Maze(config) => {
                let maze = Maze::from_config(config)?;
                solve_from(maze.start_state(), show_path)
            }
            PuzzleKind::Elevator(config) => {
                let building = Building::from_config(config)?;
                solve_from(building.start_state(), show_path)
            }
            PuzzleKind::Robot(config) => {
                let robot = RobotPuzzle::from_config(config)?;
                solve_from(robot.start_state(), show_path)
            }
        };
        Ok(report)
    }
}

fn solve_from<S>(start: S, show_path: bool) -> SolveReport
where
    S: SearchState + fmt::Display,
{
    let start_time = Instant::now();

    let mut engine = StateSearchEngine::new(start);
    let steps = engine.run();
    let stats = engine.stats();

    let path = if show_path {
        engine
            .path()
            .map(|states| states.iter().map(|state| state.to_string()).collect())
    } else {
        None
    };

    SolveReport {
        solved: steps.is_some(),
        steps,
        states_discovered: stats.discovered,
        states_expanded: stats.expanded,
        time_elapsed_ms: start_time.elapsed().as_millis() as u64,
        path,
    }
}
