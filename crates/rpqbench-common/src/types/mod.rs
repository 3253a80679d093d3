//! Core type definitions for the benchmark.
//!
//! - [`Label`] - one edge-type partition of the graph, always 1-based
//! - [`SignedLabel`] - a label as written in a query, sign marks inversion
//! - [`VertexId`], [`StateId`] - 0-based matrix row/column indices
//! - [`QueryNumber`] - 1-based query slot number

mod id;

pub use id::{Label, QueryNumber, SignedLabel, StateId, VertexId};
