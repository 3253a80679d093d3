//! Sparse boolean matrices.
//!
//! Every label partition of the dataset, and every automaton transition
//! relation of a query, is one [`BoolMatrix`]. Matrices are read from
//! Matrix Market coordinate files by [`read_matrix_market`].

mod csr;
mod market;

pub use csr::BoolMatrix;
pub use market::read_matrix_market;
