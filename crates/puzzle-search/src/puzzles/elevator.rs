//! Floors-and-elevator puzzle with paired generators and microchips.
//!
//! Every element has one generator (`<element>G`) and one microchip
//! (`<element>M`). The elevator starts on the bottom floor and carries one or
//! two items up or down one floor per move. A microchip sharing a floor with
//! a foreign generator is fried unless its own generator is there too. The
//! puzzle is solved once every item is on the top floor.
//!
//! Pairs are interchangeable, so the search identity only records the sorted
//! `(chip floor, generator floor)` pairs. This collapses states that differ
//! by a permutation of elements into a single node.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::PuzzleError;
use crate::search::{NextSteps, SearchState};

/// Elevator section of a puzzle file: the items on each floor, bottom first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevatorConfig {
    pub floors: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item {
    Chip(usize),
    Generator(usize),
}

/// Validated building: floor count, element names and starting layout
#[derive(Debug, Clone)]
pub struct Building {
    floors: usize,
    elements: Vec<String>,
    chips: SmallVec<[usize; 8]>,
    generators: SmallVec<[usize; 8]>,
}

impl Building {
    pub fn from_config(config: &ElevatorConfig) -> Result<Self, PuzzleError> {
        if config.floors.is_empty() {
            return Err(PuzzleError::NoFloors);
        }

        let mut elements: Vec<String> = Vec::new();
        let mut chips: Vec<Option<usize>> = Vec::new();
        let mut generators: Vec<Option<usize>> = Vec::new();

        for (floor, items) in config.floors.iter().enumerate() {
            for name in items {
                let (element, is_generator) = parse_item(name)?;
                let index = match elements.iter().position(|e| e == element) {
                    Some(index) => index,
                    None => {
                        elements.push(element.to_string());
                        chips.push(None);
                        generators.push(None);
                        elements.len() - 1
                    }
                };

                let slot = if is_generator {
                    &mut generators[index]
                } else {
                    &mut chips[index]
                };
                if slot.replace(floor).is_some() {
                    return Err(PuzzleError::DuplicateItem(name.clone()));
                }
            }
        }

        let mut building = Building {
            floors: config.floors.len(),
            elements,
            chips: SmallVec::new(),
            generators: SmallVec::new(),
        };
        for (index, (chip, generator)) in chips.into_iter().zip(generators).enumerate() {
            match (chip, generator) {
                (Some(chip), Some(generator)) => {
                    building.chips.push(chip);
                    building.generators.push(generator);
                }
                _ => {
                    return Err(PuzzleError::UnpairedItem(
                        building.elements[index].clone(),
                    ))
                }
            }
        }

        if let Some(floor) = fried_floor(&building.chips, &building.generators) {
            return Err(PuzzleError::UnsafeStart(floor));
        }

        Ok(building)
    }

    pub fn start_state(&self) -> ElevatorState<'_> {
        ElevatorState {
            building: self,
            elevator: 0,
            chips: self.chips.clone(),
            generators: self.generators.clone(),
        }
    }

    fn top(&self) -> usize {
        self.floors - 1
    }
}

/// Split `"LiM"` into `("Li", false)` and `"HG"` into `("H", true)`
fn parse_item(name: &str) -> Result<(&str, bool), PuzzleError> {
    let malformed = || PuzzleError::MalformedItem(name.to_string());

    let (element, kind) = match name.char_indices().last() {
        Some((at, kind)) => (&name[..at], kind),
        None => return Err(malformed()),
    };
    if element.is_empty() || !element.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(malformed());
    }

    match kind {
        'G' => Ok((element, true)),
        'M' => Ok((element, false)),
        _ => Err(malformed()),
    }
}

/// First floor holding a chip next to a foreign generator without its own
fn fried_floor(chips: &[usize], generators: &[usize]) -> Option<usize> {
    chips
        .iter()
        .zip(generators)
        .find(|(chip, generator)| chip != generator && generators.contains(chip))
        .map(|(&chip, _)| chip)
}

/// Elevator floor plus the floor of every chip and generator
#[derive(Debug, Clone)]
pub struct ElevatorState<'b> {
    building: &'b Building,
    elevator: usize,
    chips: SmallVec<[usize; 8]>,
    generators: SmallVec<[usize; 8]>,
}

impl ElevatorState<'_> {
    pub fn elevator(&self) -> usize {
        self.elevator
    }

    fn items_on(&self, floor: usize) -> SmallVec<[Item; 16]> {
        let chips = self
            .chips
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f == floor)
            .map(|(i, _)| Item::Chip(i));
        let generators = self
            .generators
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f == floor)
            .map(|(i, _)| Item::Generator(i));
        chips.chain(generators).collect()
    }

    /// Every safe state one elevator ride away, up moves first
    fn legal_moves(&self) -> Vec<Self> {
        let here = self.items_on(self.elevator);
        let up = (self.elevator < self.building.top()).then(|| self.elevator + 1);
        let down = self.elevator.checked_sub(1);

        let mut moves = Vec::new();
        for target in [up, down].into_iter().flatten() {
            for (i, &first) in here.iter().enumerate() {
                moves.extend(self.carry(target, &[first]));
                for &second in &here[i + 1..] {
                    moves.extend(self.carry(target, &[first, second]));
                }
            }
        }
        moves
    }

    fn carry(&self, target: usize, items: &[Item]) -> Option<Self> {
        let mut next = self.clone();
        next.elevator = target;
        for item in items {
            match *item {
                Item::Chip(i) => next.chips[i] = target,
                Item::Generator(i) => next.generators[i] = target,
            }
        }
        fried_floor(&next.chips, &next.generators)
            .is_none()
            .then_some(next)
    }
}

impl SearchState for ElevatorState<'_> {
    type Key = (usize, SmallVec<[(usize, usize); 8]>);

    fn key(&self) -> Self::Key {
        let mut pairs: SmallVec<[(usize, usize); 8]> = self
            .chips
            .iter()
            .copied()
            .zip(self.generators.iter().copied())
            .collect();
        pairs.sort_unstable();
        (self.elevator, pairs)
    }

    fn add_next_steps(&self, steps: &mut NextSteps<'_, Self>) {
        steps.extend(self.legal_moves());
    }

    fn is_final(&self) -> bool {
        let top = self.building.top();
        self.chips.iter().chain(&self.generators).all(|&f| f == top)
    }
}

impl fmt::Display for ElevatorState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.elevator)?;
        for (i, element) in self.building.elements.iter().enumerate() {
            write!(
                f,
                " {element}G{} {element}M{}",
                self.generators[i], self.chips[i]
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{search, StateSearchEngine};

    fn building(floors: &[&[&str]]) -> Result<Building, PuzzleError> {
        let config = ElevatorConfig {
            floors: floors
                .iter()
                .map(|items| items.iter().map(|s| s.to_string()).collect())
                .collect(),
        };
        Building::from_config(&config)
    }

    #[test]
    fn test_two_pair_example() {
        let building = building(&[&["HM", "LM"], &["HG"], &["LG"], &[]]).unwrap();
        assert_eq!(search(building.start_state()), Some(11));
    }

    #[test]
    fn test_single_pair_rides_together() {
        let building = building(&[&["HG", "HM"], &[], &[]]).unwrap();
        let mut engine = StateSearchEngine::new(building.start_state());

        assert_eq!(engine.run(), Some(2));
        let path: Vec<String> = engine
            .path()
            .unwrap()
            .iter()
            .map(|state| state.to_string())
            .collect();
        assert_eq!(path, vec!["E0 HG0 HM0", "E1 HG1 HM1", "E2 HG2 HM2"]);
    }

    #[test]
    fn test_single_floor_is_already_solved() {
        let building = building(&[&["HG", "HM"]]).unwrap();
        let mut engine = StateSearchEngine::new(building.start_state());

        assert_eq!(engine.run(), Some(0));
        assert_eq!(engine.stats().expanded, 0);
    }

    #[test]
    fn test_identity_ignores_element_order() {
        let first = building(&[&["HG", "HM"], &["LG", "LM"]]).unwrap();
        let second = building(&[&["LG", "LM"], &["HG", "HM"]]).unwrap();

        assert_eq!(first.start_state().key(), second.start_state().key());
    }

    #[test]
    fn test_unsafe_moves_are_skipped() {
        let building = building(&[&["HG", "HM"], &["LG", "LM"], &[]]).unwrap();
        let start = building.start_state();

        // HM alone would sit next to LG on floor 1 without its generator
        let moves: Vec<String> = start.legal_moves().iter().map(|s| s.to_string()).collect();
        assert_eq!(moves, vec!["E1 HG1 HM1 LG1 LM1", "E1 HG1 HM0 LG1 LM1"]);
        assert!(moves.iter().all(|m| m != "E1 HG0 HM1 LG1 LM1"));

        let mut engine = StateSearchEngine::new(start);
        let steps = engine.run().unwrap();
        for state in engine.path().unwrap() {
            assert!(fried_floor(&state.chips, &state.generators).is_none());
        }
        assert_eq!(engine.path().unwrap().len(), steps + 1);
    }

    #[test]
    fn test_parse_item() {
        assert_eq!(parse_item("HG").unwrap(), ("H", true));
        assert_eq!(parse_item("LiM").unwrap(), ("Li", false));
        assert!(matches!(parse_item("G"), Err(PuzzleError::MalformedItem(_))));
        assert!(matches!(parse_item("Hx"), Err(PuzzleError::MalformedItem(_))));
        assert!(matches!(parse_item("H-M"), Err(PuzzleError::MalformedItem(_))));
        assert!(matches!(parse_item(""), Err(PuzzleError::MalformedItem(_))));
    }

    #[test]
    fn test_invalid_buildings() {
        assert!(matches!(building(&[]), Err(PuzzleError::NoFloors)));
        assert!(matches!(
            building(&[&["HG", "HG", "HM"]]),
            Err(PuzzleError::DuplicateItem(item)) if item == "HG"
        ));
        assert!(matches!(
            building(&[&["HG"], &["LG", "LM"]]),
            Err(PuzzleError::UnpairedItem(element)) if element == "H"
        ));
        assert!(matches!(
            building(&[&["HM", "LG"], &["HG", "LM"]]),
            Err(PuzzleError::UnsafeStart(0))
        ));
    }
}
