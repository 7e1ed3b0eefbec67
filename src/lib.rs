//! This crate provides a constraint-satisfaction engine for solving Sudoku puzzles.

/// The `csp` module implements the constraint-satisfaction engine: cell domains,
/// all-different groups, propagation, and the backtracking search.
pub mod csp;

/// The `sudoku` module implements the puzzle surface, which maps digit grids onto the
/// CSP engine and back.
pub mod sudoku;
