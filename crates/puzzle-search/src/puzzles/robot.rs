//! Star-collecting robot on a tile grid.
//!
//! The robot moves forward onto a tile, or turns left or right in place.
//! Stepping onto a star collects it. Holes (`null` tiles) and the area
//! outside the grid are never entered.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;
use crate::puzzle::{Direction, Position, Tile};
use crate::search::{NextSteps, SearchState};

const MAX_STARS: usize = 64;

/// Robot starting state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotStart {
    pub position: Position,
    pub direction: Direction,
}

/// Robot section of a puzzle file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotConfig {
    pub grid: Vec<Vec<Option<Tile>>>,
    pub robot_start: RobotStart,
}

/// Validated robot puzzle with stars numbered in row-major order
#[derive(Debug, Clone)]
pub struct RobotPuzzle {
    grid: Vec<Vec<Option<Tile>>>,
    stars: Vec<Position>,
    start: RobotStart,
}

impl RobotPuzzle {
    pub fn from_config(config: &RobotConfig) -> Result<Self, PuzzleError> {
        let mut puzzle = RobotPuzzle {
            grid: config.grid.clone(),
            stars: Vec::new(),
            start: config.robot_start.clone(),
        };

        let start = puzzle.start.position;
        if puzzle.get_tile(start).is_none() {
            return Err(PuzzleError::StartOffGrid {
                x: start.x,
                y: start.y,
            });
        }

        for (y, row) in puzzle.grid.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                if tile.map_or(false, |t| t.has_star) {
                    puzzle.stars.push(Position::new(x as i32, y as i32));
                }
            }
        }

        match puzzle.stars.len() {
            0 => Err(PuzzleError::NoStars),
            n if n > MAX_STARS => Err(PuzzleError::TooManyStars(n)),
            _ => Ok(puzzle),
        }
    }

    pub fn start_state(&self) -> RobotState<'_> {
        // A star under the start tile counts as collected
        let collected = self.star_mask(self.start.position);
        RobotState {
            puzzle: self,
            position: self.start.position,
            direction: self.start.direction,
            collected,
        }
    }

    /// Get the tile at a position (bounds-checked)
    fn get_tile(&self, position: Position) -> Option<&Tile> {
        if position.x < 0 || position.y < 0 {
            return None;
        }
        self.grid
            .get(position.y as usize)
            .and_then(|row| row.get(position.x as usize))
            .and_then(|opt| opt.as_ref())
    }

    fn star_mask(&self, position: Position) -> u64 {
        self.stars
            .iter()
            .position(|&star| star == position)
            .map_or(0, |index| 1 << index)
    }

    fn all_stars(&self) -> u64 {
        if self.stars.len() == MAX_STARS {
            u64::MAX
        } else {
            (1 << self.stars.len()) - 1
        }
    }
}

/// Robot position, heading and the stars collected so far
#[derive(Debug, Clone, Copy)]
pub struct RobotState<'p> {
    puzzle: &'p RobotPuzzle,
    position: Position,
    direction: Direction,
    collected: u64,
}

impl RobotState<'_> {
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn stars_collected(&self) -> u32 {
        self.collected.count_ones()
    }
}

impl SearchState for RobotState<'_> {
    type Key = (Position, Direction, u64);

    fn key(&self) -> Self::Key {
        (self.position, self.direction, self.collected)
    }

    fn add_next_steps(&self, steps: &mut NextSteps<'_, Self>) {
        let ahead = self.position.step(self.direction);
        if self.puzzle.get_tile(ahead).is_some() {
            steps.push(RobotState {
                position: ahead,
                collected: self.collected | self.puzzle.star_mask(ahead),
                ..*self
            });
        }

        steps.push(RobotState {
            direction: self.direction.turn_left(),
            ..*self
        });
        steps.push(RobotState {
            direction: self.direction.turn_right(),
            ..*self
        });
    }

    fn is_final(&self) -> bool {
        self.collected == self.puzzle.all_stars()
    }
}

impl fmt::Display for RobotState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} stars={}/{}",
            self.position,
            self.direction,
            self.stars_collected(),
            self.puzzle.stars.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{search, StateSearchEngine};

    fn tile(has_star: bool) -> Option<Tile> {
        Some(Tile::new(has_star))
    }

    fn config(grid: Vec<Vec<Option<Tile>>>, x: i32, y: i32, direction: Direction) -> RobotConfig {
        RobotConfig {
            grid,
            robot_start: RobotStart {
                position: Position::new(x, y),
                direction,
            },
        }
    }

    #[test]
    fn test_star_straight_ahead() {
        let config = config(vec![vec![tile(false), tile(true)]], 0, 0, Direction::Right);
        let puzzle = RobotPuzzle::from_config(&config).unwrap();
        assert_eq!(search(puzzle.start_state()), Some(1));
    }

    #[test]
    fn test_stars_on_both_sides() {
        let config = config(
            vec![vec![tile(true), tile(false), tile(true)]],
            1,
            0,
            Direction::Right,
        );
        let puzzle = RobotPuzzle::from_config(&config).unwrap();
        let mut engine = StateSearchEngine::new(puzzle.start_state());

        // forward, turn twice, forward twice
        assert_eq!(engine.run(), Some(5));
        let last = engine.final_state().unwrap();
        assert_eq!(last.position(), Position::new(0, 0));
        assert_eq!(last.direction(), Direction::Left);
        assert_eq!(last.to_string(), "(0, 0) < stars=2/2");
    }

    #[test]
    fn test_hole_blocks_the_only_route() {
        let config = config(vec![vec![tile(false), None, tile(true)]], 0, 0, Direction::Right);
        let puzzle = RobotPuzzle::from_config(&config).unwrap();
        let mut engine = StateSearchEngine::new(puzzle.start_state());

        assert_eq!(engine.run(), None);
        // Only the four headings on the start tile are reachable
        assert_eq!(engine.stats().discovered, 4);
    }

    #[test]
    fn test_turn_before_moving() {
        let config = config(
            vec![vec![tile(false)], vec![tile(false)], vec![tile(true)]],
            0,
            0,
            Direction::Right,
        );
        let puzzle = RobotPuzzle::from_config(&config).unwrap();
        // turn right to face down, then two steps
        assert_eq!(search(puzzle.start_state()), Some(3));
    }

    #[test]
    fn test_invalid_configs() {
        let off_grid = config(vec![vec![tile(true)]], 3, 0, Direction::Up);
        assert!(matches!(
            RobotPuzzle::from_config(&off_grid),
            Err(PuzzleError::StartOffGrid { x: 3, y: 0 })
        ));

        let on_hole = config(vec![vec![None, tile(true)]], 0, 0, Direction::Up);
        assert!(matches!(
            RobotPuzzle::from_config(&on_hole),
            Err(PuzzleError::StartOffGrid { .. })
        ));

        let starless = config(vec![vec![tile(false), tile(false)]], 0, 0, Direction::Up);
        assert!(matches!(
            RobotPuzzle::from_config(&starless),
            Err(PuzzleError::NoStars)
        ));

        let crowded = config(vec![vec![tile(true); 65]], 0, 0, Direction::Up);
        assert!(matches!(
            RobotPuzzle::from_config(&crowded),
            Err(PuzzleError::TooManyStars(65))
        ));
    }

    #[test]
    fn test_full_star_mask() {
        let full = config(vec![vec![tile(true); 64]], 0, 0, Direction::Right);
        let puzzle = RobotPuzzle::from_config(&full).unwrap();
        assert_eq!(puzzle.all_stars(), u64::MAX);
        // The start tile star is collected up front, 63 forward moves remain
        assert_eq!(search(puzzle.start_state()), Some(63));
    }
}
