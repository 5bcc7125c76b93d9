//! Grid maze with keys and doors.
//!
//! Cells: `#` wall, `.` open, `@` start, `G` goal, `a`-`z` key, `A`-`Z` door.
//! A door is passable once its lowercase key has been picked up, and a key
//! is picked up by stepping on it. `G` always marks the goal, so there is no
//! door `G` and key `g` is rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;
use crate::puzzle::{Direction, Position};
use crate::search::{NextSteps, SearchState};

/// Maze section of a puzzle file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeConfig {
    pub grid: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Wall,
    Open,
    Goal,
    Key(u8),
    Door(u8),
}

impl Cell {
    fn parse(c: char) -> Option<Cell> {
        match c {
            '#' => Some(Cell::Wall),
            '.' | '@' => Some(Cell::Open),
            'G' => Some(Cell::Goal),
            'g' => None,
            'a'..='z' => Some(Cell::Key(c as u8 - b'a')),
            'A'..='Z' => Some(Cell::Door(c as u8 - b'A')),
            _ => None,
        }
    }
}

/// Validated maze layout
#[derive(Debug, Clone)]
pub struct Maze {
    width: usize,
    cells: Vec<Cell>,
    start: Position,
}

impl Maze {
    pub fn from_config(config: &MazeConfig) -> Result<Self, PuzzleError> {
        Self::parse(&config.grid)
    }

    pub fn parse<R: AsRef<str>>(rows: &[R]) -> Result<Self, PuzzleError> {
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
        if width == 0 {
            return Err(PuzzleError::EmptyMaze);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        let mut start = None;
        let mut has_goal = false;

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(PuzzleError::RaggedMaze {
                    row: y,
                    expected: width,
                    found,
                });
            }

            for (x, c) in row.chars().enumerate() {
                let cell = Cell::parse(c).ok_or(PuzzleError::UnknownCell {
                    row: y,
                    column: x,
                    found: c,
                })?;
                if c == '@' {
                    if start.is_some() {
                        return Err(PuzzleError::MultipleStarts);
                    }
                    start = Some(Position::new(x as i32, y as i32));
                }
                has_goal |= cell == Cell::Goal;
                cells.push(cell);
            }
        }

        let start = start.ok_or(PuzzleError::MissingStart)?;
        if !has_goal {
            return Err(PuzzleError::MissingGoal);
        }

        Ok(Self {
            width,
            cells,
            start,
        })
    }

    pub fn start_state(&self) -> MazeState<'_> {
        MazeState {
            maze: self,
            position: self.start,
            keys: 0,
        }
    }

    fn cell(&self, position: Position) -> Option<Cell> {
        if position.x < 0 || position.y < 0 || position.x as usize >= self.width {
            return None;
        }
        self.cells
            .get(position.y as usize * self.width + position.x as usize)
            .copied()
    }
}

/// Cursor position plus the keys held so far
#[derive(Debug, Clone, Copy)]
pub struct MazeState<'m> {
    maze: &'m Maze,
    position: Position,
    keys: u32,
}

impl MazeState<'_> {
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn holds_key(&self, key: char) -> bool {
        key.is_ascii_lowercase() && self.keys & (1 << (key as u8 - b'a')) != 0
    }
}

impl SearchState for MazeState<'_> {
    type Key = (Position, u32);

    fn key(&self) -> Self::Key {
        (self.position, self.keys)
    }

    fn add_next_steps(&self, steps: &mut NextSteps<'_, Self>) {
        for direction in Direction::ALL {
            let next = self.position.step(direction);
            let keys = match self.maze.cell(next) {
                None | Some(Cell::Wall) => continue,
                Some(Cell::Door(door)) if self.keys & (1 << door) == 0 => continue,
                Some(Cell::Key(key)) => self.keys | (1 << key),
                Some(_) => self.keys,
            };
            steps.push(MazeState {
                maze: self.maze,
                position: next,
                keys,
            });
        }
    }

    fn is_final(&self) -> bool {
        self.maze.cell(self.position) == Some(Cell::Goal)
    }
}

impl fmt::Display for MazeState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.position)?;
        if self.keys != 0 {
            let held: String = (0..26u8)
                .filter(|k| self.keys & (1 << k) != 0)
                .map(|k| (b'a' + k) as char)
                .collect();
            write!(f, " keys={held}")?;
        }
        Ok(())
    }
}
