#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
pub mod constraints;
pub mod domain;
pub mod propagation;
pub mod search;
pub mod selection;
pub mod solver;
pub mod state;
