#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

use crate::csp::propagation::{ForwardChecking, Propagator};
use crate::csp::selection::{FirstUnbound, VariableSelection};
use crate::csp::state::PuzzleState;

/// A fully resolved assignment: one digit per cell, row-major.
pub type Solution = Vec<u8>;

/// Ties together the strategies a solver instance runs with.
pub trait SolverConfig {
    type Selector: VariableSelection;
    type Propagator: Propagator;
}

/// First-unbound selection with forward checking.
///
/// The default configuration carries the reproducibility contract: given the
/// same puzzle it always reaches the same solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultConfig;

impl SolverConfig for DefaultConfig {
    type Selector = FirstUnbound;
    type Propagator = ForwardChecking;
}

/// Counters describing one solve run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Candidate assignments tried.
    pub decisions: usize,
    /// Candidate values removed by propagation.
    pub propagations: usize,
    /// Search frames abandoned with every candidate exhausted.
    pub backtracks: usize,
}

pub trait Solver<Config: SolverConfig = DefaultConfig> {
    fn new(state: PuzzleState) -> Self;
    fn solve(&mut self) -> Option<Solution>;
    fn stats(&self) -> SearchStats;
}
