//! Breadth-first search over implicitly defined state spaces.
//!
//! A client describes its problem by implementing [`SearchState`]: an
//! identity used for deduplication, a successor generator, and a final-state
//! predicate. [`StateSearchEngine`] explores the space layer by layer and
//! reports the minimum number of transitions from the start state to any
//! final state.
//!
//! Accepted states live in an arena in discovery order. The visited set maps
//! each identity to its arena index and the frontier is a queue of indices,
//! so a large state is stored once and deduplicated by its (usually much
//! smaller) key.
//!
//! Successors are tested against the final-state predicate when they are
//! pushed, not when they are dequeued. The search therefore stops one layer
//! earlier than a dequeue-time check would. When several final states exist
//! at the minimal depth, the one reported is the first final successor pushed:
//! parents are visited in frontier order and successors in generator order.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use tracing::{debug, trace};

/// A configuration of a puzzle that the engine can search over.
pub trait SearchState: Sized {
    /// Identity used to detect previously visited configurations.
    type Key: Hash + Eq;

    /// Project this state to its identity.
    fn key(&self) -> Self::Key;

    /// Push every state reachable from this one in a single transition.
    fn add_next_steps(&self, steps: &mut NextSteps<'_, Self>);

    /// Whether the search may stop at this state.
    fn is_final(&self) -> bool;
}

/// Lifecycle of a [`StateSearchEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Constructed, `run` not yet called
    Initialized,
    /// Expansion in progress
    Running,
    /// A final state was reached
    Found,
    /// The frontier emptied without reaching a final state
    Exhausted,
}

/// Counters collected while searching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Distinct states accepted, including the start and the final state
    pub discovered: usize,
    /// States whose successors were enumerated
    pub expanded: usize,
    /// Successors discarded because their identity was already visited
    pub duplicates: usize,
    /// Largest frontier length observed
    pub max_frontier: usize,
}

#[derive(Debug)]
struct Node<S> {
    state: S,
    steps: usize,
    parent: Option<usize>,
}

/// Sink handed to [`SearchState::add_next_steps`].
///
/// Each pushed successor is checked against the final-state predicate first,
/// then against the visited set. Once a final state has been pushed every
/// further push is ignored.
pub struct NextSteps<'a, S: SearchState> {
    parent: usize,
    depth: usize,
    base: usize,
    accepted: &'a mut Vec<Node<S>>,
    visited: &'a mut HashMap<S::Key, usize>,
    frontier: &'a mut VecDeque<usize>,
    stats: &'a mut SearchStats,
    found: &'a mut Option<usize>,
}

impl<S: SearchState> NextSteps<'_, S> {
    /// Offer a successor of the state being expanded.
    pub fn push(&mut self, state: S) {
        if self.found.is_some() {
            return;
        }

        let index = self.base + self.accepted.len();

        if state.is_final() {
            self.accepted.push(Node {
                state,
                steps: self.depth,
                parent: Some(self.parent),
            });
            self.stats.discovered += 1;
            *self.found = Some(index);
            return;
        }

        match self.visited.entry(state.key()) {
            Entry::Occupied(_) => {
                self.stats.duplicates += 1;
            }
            Entry::Vacant(slot) => {
                slot.insert(index);
                self.accepted.push(Node {
                    state,
                    steps: self.depth,
                    parent: Some(self.parent),
                });
                self.frontier.push_back(index);
                self.stats.discovered += 1;
                self.stats.max_frontier = self.stats.max_frontier.max(self.frontier.len());
            }
        }
    }

    /// Step count that successors pushed now will receive.
    ///
    /// Clients enforcing an external depth budget can stop producing
    /// successors once this exceeds it.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether a final state has already been pushed.
    pub fn is_done(&self) -> bool {
        self.found.is_some()
    }
}

impl<S: SearchState> Extend<S> for NextSteps<'_, S> {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for state in iter {
            if self.is_done() {
                break;
            }
            self.push(state);
        }
    }
}

/// Breadth-first search engine for a single search.
///
/// The engine owns its frontier and visited set; both are dropped with it.
/// Build a fresh engine for every search.
pub struct StateSearchEngine<S: SearchState> {
    nodes: Vec<Node<S>>,
    visited: HashMap<S::Key, usize>,
    frontier: VecDeque<usize>,
    scratch: Vec<Node<S>>,
    status: SearchStatus,
    found: Option<usize>,
    stats: SearchStats,
}

impl<S: SearchState> StateSearchEngine<S> {
    /// Seed the frontier and the visited set with `start` at step count 0.
    pub fn new(start: S) -> Self {
        let mut visited = HashMap::new();
        visited.insert(start.key(), 0);

        let mut frontier = VecDeque::new();
        frontier.push_back(0);

        Self {
            nodes: vec![Node {
                state: start,
                steps: 0,
                parent: None,
            }],
            visited,
            frontier,
            scratch: Vec::new(),
            status: SearchStatus::Initialized,
            found: None,
            stats: SearchStats {
                discovered: 1,
                max_frontier: 1,
                ..SearchStats::default()
            },
        }
    }

    /// Run the search to completion.
    ///
    /// Returns the minimum step count to a final state, or `None` when no
    /// final state is reachable. A start state that is already final yields
    /// `Some(0)` without any expansion.
    ///
    /// Terminal outcomes are absorbing: calling `run` again returns the same
    /// answer without doing any work. A search interrupted by a panic in
    /// client code cannot be resumed and reports `None`.
    pub fn run(&mut self) -> Option<usize> {
        match self.status {
            SearchStatus::Found => return self.steps(),
            SearchStatus::Exhausted | SearchStatus::Running => return None,
            SearchStatus::Initialized => {}
        }
        self.status = SearchStatus::Running;

        if self.nodes[0].state.is_final() {
            self.found = Some(0);
            self.status = SearchStatus::Found;
            debug!("start state is final");
            return Some(0);
        }

        let mut layer = 0;
        while let Some(&current) = self.frontier.front() {
            let depth = self.nodes[current].steps + 1;
            if depth > layer {
                trace!(
                    layer = depth - 1,
                    frontier = self.frontier.len(),
                    discovered = self.stats.discovered,
                    "expanding layer"
                );
                layer = depth;
            }

            let mut accepted = std::mem::take(&mut self.scratch);
            {
                let mut steps = NextSteps {
                    parent: current,
                    depth,
                    base: self.nodes.len(),
                    accepted: &mut accepted,
                    visited: &mut self.visited,
                    frontier: &mut self.frontier,
                    stats: &mut self.stats,
                    found: &mut self.found,
                };
                self.nodes[current].state.add_next_steps(&mut steps);
            }
            self.nodes.append(&mut accepted);
            self.scratch = accepted;

            self.frontier.pop_front();
            self.stats.expanded += 1;

            if self.found.is_some() {
                self.status = SearchStatus::Found;
                debug!(
                    steps = depth,
                    discovered = self.stats.discovered,
                    expanded = self.stats.expanded,
                    "final state found"
                );
                return Some(depth);
            }
        }

        self.status = SearchStatus::Exhausted;
        debug!(
            discovered = self.stats.discovered,
            expanded = self.stats.expanded,
            "frontier exhausted"
        );
        None
    }

    /// Current lifecycle status.
    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Counters collected so far.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Step count of the final state, once found.
    pub fn steps(&self) -> Option<usize> {
        self.found.map(|index| self.nodes[index].steps)
    }

    /// The start state.
    pub fn start(&self) -> &S {
        &self.nodes[0].state
    }

    /// The final state reached, once found.
    pub fn final_state(&self) -> Option<&S> {
        self.found.map(|index| &self.nodes[index].state)
    }

    /// States from the start to the final state, both inclusive.
    pub fn path(&self) -> Option<Vec<&S>> {
        let mut index = self.found?;
        let mut path = vec![&self.nodes[index].state];
        while let Some(parent) = self.nodes[index].parent {
            path.push(&self.nodes[parent].state);
            index = parent;
        }
        path.reverse();
        Some(path)
    }

    /// Identities currently in the visited set.
    pub fn visited_keys(&self) -> impl Iterator<Item = &S::Key> + '_ {
        self.visited.keys()
    }
}

/// Run a fresh search from `start`.
pub fn search<S: SearchState>(start: S) -> Option<usize> {
    StateSearchEngine::new(start).run()
}
