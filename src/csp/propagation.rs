#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Constraint propagation strategies.
//!
//! Propagation narrows peer domains after an assignment and logs every removal
//! so backtracking can undo it exactly. It is advisory pruning: the search
//! stays correct with [`NoPropagation`], it just explores more of the tree.

use crate::csp::constraints::ConstraintSet;
use crate::csp::state::{DomainExhausted, PuzzleState};
use smallvec::SmallVec;

/// One domain narrowing performed as a propagation side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revision {
    pub cell: usize,
    pub value: u8,
}

/// The narrowings performed for one assignment, in application order.
pub type Revisions = SmallVec<[Revision; 32]>;

/// Replays a revision log in reverse, re-adding every removed candidate.
pub fn undo(state: &mut PuzzleState, revisions: &[Revision]) {
    for revision in revisions.iter().rev() {
        state.insert(revision.cell, revision.value);
    }
}

pub trait Propagator {
    /// Propagates the assignment of `value` to `cell` through the groups that
    /// contain it.
    ///
    /// # Errors
    ///
    /// [`DomainExhausted`] if a peer cell is left without candidates. Any
    /// removals already performed are rolled back first, so the state is
    /// exactly as it was before the call.
    fn propagate(
        state: &mut PuzzleState,
        constraints: &ConstraintSet,
        cell: usize,
        value: u8,
    ) -> Result<Revisions, DomainExhausted>;
}

/// Forward checking: remove the assigned value from every other cell of every
/// group containing the assigned cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwardChecking;

impl Propagator for ForwardChecking {
    fn propagate(
        state: &mut PuzzleState,
        constraints: &ConstraintSet,
        cell: usize,
        value: u8,
    ) -> Result<Revisions, DomainExhausted> {
        let mut revisions = Revisions::new();

        for group in constraints.groups_of(cell) {
            for &peer in constraints.groups()[group].cells() {
                let peer = peer as usize;
                if peer == cell {
                    continue;
                }
                match state.remove(peer, value) {
                    Ok(true) => revisions.push(Revision { cell: peer, value }),
                    Ok(false) => {}
                    Err(exhausted) => {
                        undo(state, &revisions);
                        return Err(exhausted);
                    }
                }
            }
        }

        Ok(revisions)
    }
}

/// The identity propagator; the search then leans on the consistency check alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPropagation;

impl Propagator for NoPropagation {
    fn propagate(
        _state: &mut PuzzleState,
        _constraints: &ConstraintSet,
        _cell: usize,
        _value: u8,
    ) -> Result<Revisions, DomainExhausted> {
        Ok(Revisions::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csp::domain::Domain;

    #[test]
    fn test_forward_checking_narrows_peers() {
        let mut state = PuzzleState::from_digits(3, &[0; 81]).unwrap();
        let constraints = ConstraintSet::new(3);

        state.assign(0, 5);
        let revisions = ForwardChecking::propagate(&mut state, &constraints, 0, 5).unwrap();

        // 8 row peers, 8 column peers, and 4 block peers not already covered
        assert_eq!(revisions.len(), 20);
        assert!(!state.domain(1).contains(5));
        assert!(!state.domain(9).contains(5));
        assert!(!state.domain(10).contains(5));
        assert!(state.domain(80).contains(5));
    }

    #[test]
    fn test_undo_restores_exactly() {
        let mut state = PuzzleState::from_digits(3, &[0; 81]).unwrap();
        let constraints = ConstraintSet::new(3);

        let prior = state.assign(40, 3);
        let revisions = ForwardChecking::propagate(&mut state, &constraints, 40, 3).unwrap();

        undo(&mut state, &revisions);
        state.restore(40, prior);

        let fresh = PuzzleState::from_digits(3, &[0; 81]).unwrap();
        assert_eq!(state, fresh);
    }

    #[test]
    fn test_exhaustion_rolls_back() {
        let mut digits = [0_u8; 81];
        digits[8] = 5;
        let mut state = PuzzleState::from_digits(3, &digits).unwrap();
        let constraints = ConstraintSet::new(3);

        let before = state.clone();
        let prior = state.assign(0, 5);
        let err = ForwardChecking::propagate(&mut state, &constraints, 0, 5).unwrap_err();
        assert_eq!(err.cell, 8);

        state.restore(0, prior);
        assert_eq!(state, before);
    }

    #[test]
    fn test_no_propagation_is_identity() {
        let mut state = PuzzleState::from_digits(3, &[0; 81]).unwrap();
        let constraints = ConstraintSet::new(3);

        state.assign(0, 5);
        let revisions = NoPropagation::propagate(&mut state, &constraints, 0, 5).unwrap();
        assert!(revisions.is_empty());
        assert_eq!(state.domain(1), Domain::full(9));
    }
}
