//! Per-label graphs and the label cache.
//!
//! A [`LabeledGraph`] is one adjacency matrix plus, optionally, its cached
//! transpose. The dataset graphs live in the [`LabelStore`]; each query
//! additionally owns the transition relations of its automaton, which are
//! the same kind of structure loaded from the query's own directory.

mod store;

pub use store::{LabelStore, LoadOutcome, PreloadSummary};

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use rpqbench_common::{Error, Result, VertexId};

use crate::matrix::{BoolMatrix, read_matrix_market};

/// A directed graph stored as an adjacency matrix with optional transpose.
#[derive(Debug, Clone)]
pub struct LabeledGraph {
    adjacency: BoolMatrix,
    transpose: Option<BoolMatrix>,
}

impl LabeledGraph {
    /// Wraps an adjacency matrix, computing the transpose if requested.
    #[must_use]
    pub fn new(adjacency: BoolMatrix, cache_transposed: bool) -> Self {
        let transpose = cache_transposed.then(|| adjacency.transpose());
        Self {
            adjacency,
            transpose,
        }
    }

    /// Loads a graph from a Matrix Market file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path, cache_transposed: bool) -> Result<Option<Self>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io("load_matrix", path, e)),
        };

        let adjacency =
            read_matrix_market(BufReader::new(file)).map_err(|source| Error::Matrix {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Some(Self::new(adjacency, cache_transposed)))
    }

    /// The adjacency matrix.
    #[must_use]
    pub fn adjacency(&self) -> &BoolMatrix {
        &self.adjacency
    }

    /// The cached transpose, if any.
    #[must_use]
    pub fn transpose(&self) -> Option<&BoolMatrix> {
        self.transpose.as_ref()
    }

    /// Number of vertices (rows of the adjacency matrix).
    #[must_use]
    pub fn vertex_count(&self) -> u64 {
        self.adjacency.nrows()
    }

    /// Targets of edges leaving `v`.
    pub fn successors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.adjacency.row(v).iter().copied()
    }

    /// Sources of edges entering `v`.
    ///
    /// Uses the cached transpose when present, otherwise scans every row.
    pub fn predecessors(&self, v: VertexId) -> Box<dyn Iterator<Item = VertexId> + '_> {
        match &self.transpose {
            Some(t) => Box::new(t.row(v).iter().copied()),
            None => Box::new(self.adjacency.column(v)),
        }
    }

    /// Bytes held by the adjacency matrix and the cached transpose.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.adjacency.memory_usage() + self.transpose.as_ref().map_or(0, BoolMatrix::memory_usage)
    }
}
