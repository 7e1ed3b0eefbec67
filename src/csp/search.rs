#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The backtracking search engine.
//!
//! This module provides the [`Backtracker`] struct, a depth-first search with
//! chronological backtracking over a [`PuzzleState`]. The solver is generic
//! over a [`SolverConfig`], so the variable selection heuristic and the
//! propagation strategy can be swapped out; the defaults are first-unbound
//! selection and forward checking.
//!
//! The core loop is:
//! 1.  **Selection:** pick the next cell to branch on. When no cell remains,
//!     the state is a full assignment and is accepted once every group passes
//!     the consistency check.
//! 2.  **Assignment:** try the cell's candidates in ascending order. Each trial
//!     snapshots the cell's domain, fixes the value, and checks the cell's
//!     three groups for a duplicate among fixed cells.
//! 3.  **Propagation:** the configured propagator narrows peer domains and logs
//!     every removal. A wiped-out domain abandons the trial on the spot.
//! 4.  **Backtracking:** when a trial fails, the removals are replayed in
//!     reverse and the snapshot restored before the next candidate; when all
//!     candidates fail, the frame reports exhaustion to its caller.
//!
//! The search halts on the first full consistent assignment. It keeps no
//! memory of failed subtrees and never looks for further solutions, so under
//! the default configuration the answer for a given puzzle is always the same,
//! even when the puzzle admits several completions.

use crate::csp::constraints::ConstraintSet;
use crate::csp::propagation::{Propagator, undo};
use crate::csp::selection::VariableSelection;
use crate::csp::solver::{DefaultConfig, SearchStats, Solution, Solver, SolverConfig};
use crate::csp::state::PuzzleState;
use std::marker::PhantomData;

/// A depth-first backtracking solver over one puzzle state.
#[derive(Debug, Clone)]
pub struct Backtracker<Config: SolverConfig = DefaultConfig> {
    state: PuzzleState,
    constraints: ConstraintSet,
    stats: SearchStats,
    config: PhantomData<Config>,
}

impl<Config: SolverConfig> Backtracker<Config> {
    /// Reuses a prebuilt constraint set instead of deriving one from the
    /// state's geometry.
    ///
    /// # Panics
    ///
    /// If the constraint set was built for a different puzzle side.
    #[must_use]
    pub fn with_constraints(state: PuzzleState, constraints: ConstraintSet) -> Self {
        assert_eq!(
            constraints.side(),
            state.side(),
            "constraint set does not match the puzzle geometry"
        );
        Self {
            state,
            constraints,
            stats: SearchStats::default(),
            config: PhantomData,
        }
    }

    /// Propagates every given cell once before the search proper.
    ///
    /// Returns false when a given wipes out a peer's domain, which includes
    /// two givens sharing a value in one group.
    fn seed(&mut self) -> bool {
        for cell in 0..self.state.cell_count() {
            let Some(value) = self.state.domain(cell).value() else {
                continue;
            };
            match Config::Propagator::propagate(&mut self.state, &self.constraints, cell, value) {
                Ok(revisions) => self.stats.propagations += revisions.len(),
                Err(_) => return false,
            }
        }
        true
    }

    fn search(&mut self) -> bool {
        let Some(cell) = Config::Selector::pick(&self.state) else {
            // propagation can fix cells without assigning them, so a full
            // grid still has to pass the group check
            return self.constraints.state_consistent(&self.state);
        };

        let candidates = self.state.domain(cell);
        for value in candidates.iter() {
            self.stats.decisions += 1;
            let prior = self.state.assign(cell, value);

            if self.constraints.cell_consistent(&self.state, cell) {
                match Config::Propagator::propagate(&mut self.state, &self.constraints, cell, value)
                {
                    Ok(revisions) => {
                        self.stats.propagations += revisions.len();
                        if self.search() {
                            return true;
                        }
                        undo(&mut self.state, &revisions);
                    }
                    Err(_) => {}
                }
            }

            self.state.restore(cell, prior);
        }

        self.stats.backtracks += 1;
        false
    }
}

impl<Config: SolverConfig> Solver<Config> for Backtracker<Config> {
    fn new(state: PuzzleState) -> Self {
        let constraints = ConstraintSet::new(state.block());
        Self::with_constraints(state, constraints)
    }

    /// Runs the search to the first full consistent assignment.
    ///
    /// `None` means the whole tree was exhausted: the puzzle has no completion
    /// under its givens. That is an ordinary outcome, not an error.
    fn solve(&mut self) -> Option<Solution> {
        if !self.constraints.state_consistent(&self.state) {
            return None;
        }
        if !self.seed() {
            return None;
        }
        if self.search() {
            self.state.read_values()
        } else {
            None
        }
    }

    fn stats(&self) -> SearchStats {
        self.stats
    }
}
