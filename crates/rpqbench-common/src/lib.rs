//! # rpqbench-common
//!
//! Foundation layer for the RPQ benchmark: identifier types and errors.
//!
//! This crate has no internal dependencies and should be kept minimal.
//!
//! ## Modules
//!
//! - [`types`] - Identifier types (Label, VertexId, StateId, QueryNumber)
//! - [`utils`] - Error definitions shared by every crate

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use types::{Label, QueryNumber, SignedLabel, StateId, VertexId};
pub use utils::error::{Error, MatrixError, QueryParseError, Result};
