//! Reference puzzles solved with the search engine.

pub mod elevator;
pub mod maze;
pub mod robot;

pub use elevator::{Building, ElevatorConfig, ElevatorState};
pub use maze::{Maze, MazeConfig, MazeState};
pub use robot::{RobotConfig, RobotPuzzle, RobotStart, RobotState};
