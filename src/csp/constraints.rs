#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Enumeration of the all-different groups and their consistency checks.
//!
//! A puzzle of block size `B` has side `B * B` and `3 * side` groups: one per
//! row, one per column, and one per block. Groups are computed once from the
//! geometry and never change, so a `ConstraintSet` may be shared by any number
//! of independent solves.

use crate::csp::state::PuzzleState;
use smallvec::SmallVec;

/// Which slice of the grid a group covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKind {
    Row,
    Column,
    Block,
}

/// An immutable set of `side` cell indices whose values must be pairwise distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    kind: GroupKind,
    cells: SmallVec<[u16; 32]>,
}

impl Group {
    #[must_use]
    pub const fn kind(&self) -> GroupKind {
        self.kind
    }

    #[must_use]
    pub fn cells(&self) -> &[u16] {
        &self.cells
    }
}

/// The full constraint collection for one puzzle geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSet {
    block: usize,
    side: usize,
    groups: Vec<Group>,
}

impl ConstraintSet {
    /// Enumerates the groups for block size `block`, rows first, then columns,
    /// then blocks row-major by block coordinate. The order is part of the
    /// engine's reproducibility contract.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(block: usize) -> Self {
        let side = block * block;
        let mut groups = Vec::with_capacity(3 * side);

        for row in 0..side {
            let cells = (0..side).map(|col| (row * side + col) as u16).collect();
            groups.push(Group {
                kind: GroupKind::Row,
                cells,
            });
        }

        for col in 0..side {
            let cells = (0..side).map(|row| (row * side + col) as u16).collect();
            groups.push(Group {
                kind: GroupKind::Column,
                cells,
            });
        }

        for block_row in 0..block {
            for block_col in 0..block {
                let mut cells = SmallVec::new();
                for row in block_row * block..(block_row + 1) * block {
                    for col in block_col * block..(block_col + 1) * block {
                        cells.push((row * side + col) as u16);
                    }
                }
                groups.push(Group {
                    kind: GroupKind::Block,
                    cells,
                });
            }
        }

        Self {
            block,
            side,
            groups,
        }
    }

    #[must_use]
    pub const fn side(&self) -> usize {
        self.side
    }

    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Indices of the three groups containing `cell`: its row, its column, and
    /// its block.
    #[must_use]
    pub const fn groups_of(&self, cell: usize) -> [usize; 3] {
        let row = cell / self.side;
        let col = cell % self.side;
        [
            row,
            self.side + col,
            2 * self.side + (row / self.block) * self.block + col / self.block,
        ]
    }

    /// True iff no two fixed cells in the group share a value.
    ///
    /// This is the sole hard constraint; domain narrowing is advisory pruning
    /// on top of it.
    #[must_use]
    pub fn is_consistent(&self, state: &PuzzleState, group: &Group) -> bool {
        let mut seen = 0_u32;
        for &cell in group.cells() {
            if let Some(value) = state.domain(cell as usize).value() {
                let bit = 1_u32 << (value - 1);
                if seen & bit != 0 {
                    return false;
                }
                seen |= bit;
            }
        }
        true
    }

    /// Consistency of just the three groups containing `cell`.
    #[must_use]
    pub fn cell_consistent(&self, state: &PuzzleState, cell: usize) -> bool {
        self.groups_of(cell)
            .iter()
            .all(|&group| self.is_consistent(state, &self.groups[group]))
    }

    /// Consistency of every group at once.
    #[must_use]
    pub fn state_consistent(&self, state: &PuzzleState) -> bool {
        self.groups
            .iter()
            .all(|group| self.is_consistent(state, group))
    }
}
