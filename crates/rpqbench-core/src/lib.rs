//! # rpqbench-core
//!
//! Core layer for the RPQ benchmark: sparse label matrices, the lazily
//! populated label cache, and the path-query solver interface.
//!
//! This crate depends only on `rpqbench-common`.
//!
//! ## Modules
//!
//! - [`matrix`] - Boolean CSR matrices and the Matrix Market reader
//! - [`graph`] - Per-label graphs and the [`LabelStore`] cache
//! - [`solver`] - The [`PathQuerySolver`] seam and a reference evaluator

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod graph;
pub mod matrix;
pub mod solver;

// Re-export commonly used types
pub use graph::{LabelStore, LabeledGraph, LoadOutcome, PreloadSummary};
pub use matrix::{BoolMatrix, read_matrix_market};
pub use solver::{
    Automaton, Direction, PathQuery, PathQuerySolver, ProductSolver, ReachableSet,
    TransitionInput,
};
