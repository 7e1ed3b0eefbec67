#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! This module provides functionality for solving Sudoku puzzles.

/// The `solver` module contains the Sudoku-facing types and the solve entry points.
pub mod solver;
