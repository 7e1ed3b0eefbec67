#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

use crate::csp::state::PuzzleState;

pub trait VariableSelection {
    /// The next cell to branch on, or `None` when every cell is fixed.
    fn pick(state: &PuzzleState) -> Option<usize>;
}

/// Scans cells in index order and returns the first that is not fixed.
///
/// The deterministic default; the engine's reproducible output depends on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstUnbound;

impl VariableSelection for FirstUnbound {
    fn pick(state: &PuzzleState) -> Option<usize> {
        (0..state.cell_count()).find(|&cell| !state.is_fixed(cell))
    }
}

/// Returns the unfixed cell with the fewest remaining candidates, lowest index
/// on ties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinimumRemaining;

impl VariableSelection for MinimumRemaining {
    fn pick(state: &PuzzleState) -> Option<usize> {
        (0..state.cell_count())
            .filter(|&cell| !state.is_fixed(cell))
            .min_by_key(|&cell| (state.domain(cell).len(), cell))
    }
}
