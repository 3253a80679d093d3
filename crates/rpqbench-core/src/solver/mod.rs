//! The path-query solver seam.
//!
//! The benchmark measures an external primitive that, given the labeled
//! transition relations of an automaton, the dataset graph of each label,
//! and a set of anchor vertices, returns the vertices reachable along a
//! path whose label word the automaton accepts. [`PathQuerySolver`] is that
//! primitive; [`ProductSolver`] is the reference implementation the binary
//! ships with, and tests substitute their own.
//!
//! A single-destination query reuses the same contract: the caller swaps
//! the start and final state sets and asks for [`Direction::Backward`],
//! which makes the solver traverse automaton and graph edges reversed.

mod product;

pub use product::ProductSolver;

use hashbrown::HashSet;
use rpqbench_common::{Result, StateId, VertexId};

use crate::graph::LabeledGraph;

/// Which way edges are followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Follow edges from source to target.
    Forward,
    /// Follow edges from target to source.
    Backward,
}

/// Start and final state sets of the automaton, as seen by the solver.
#[derive(Debug, Clone, Copy)]
pub struct Automaton<'a> {
    /// States the traversal begins in.
    pub start_states: &'a [StateId],
    /// States in which a vertex is reported.
    pub final_states: &'a [StateId],
}

/// One automaton label: its transition relation and the dataset graph.
#[derive(Debug, Clone, Copy)]
pub struct TransitionInput<'a> {
    /// Automaton transitions on this label. `None` contributes no moves.
    pub automaton: Option<&'a LabeledGraph>,
    /// Whether graph edges of this label are traversed inverted.
    pub inverse: bool,
    /// Dataset graph of this label.
    pub graph: &'a LabeledGraph,
}

/// Everything one solver call needs.
#[derive(Debug, Clone)]
pub struct PathQuery<'a> {
    /// Transition labels, in declaration order.
    pub transitions: Vec<TransitionInput<'a>>,
    /// Start/final states, already oriented for `direction`.
    pub automaton: Automaton<'a>,
    /// Vertices the traversal is anchored at.
    pub anchors: &'a [VertexId],
    /// Traversal direction.
    pub direction: Direction,
}

/// Set of vertices returned by a solver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReachableSet {
    vertices: HashSet<VertexId>,
}

impl ReachableSet {
    /// Number of vertices in the set.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.vertices.len()
    }

    /// Whether `v` is in the set.
    #[must_use]
    pub fn contains(&self, v: VertexId) -> bool {
        self.vertices.contains(&v)
    }

    /// Iterates over the vertices in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.iter().copied()
    }
}

impl FromIterator<VertexId> for ReachableSet {
    fn from_iter<I: IntoIterator<Item = VertexId>>(iter: I) -> Self {
        Self {
            vertices: iter.into_iter().collect(),
        }
    }
}

/// Evaluates regular path queries.
pub trait PathQuerySolver {
    /// Returns the vertices reachable under the query's automaton.
    ///
    /// # Errors
    ///
    /// Returns [`rpqbench_common::Error::Solver`] if the input violates the
    /// solver's contract, such as an anchor outside the graph.
    fn solve(&self, query: &PathQuery<'_>) -> Result<ReachableSet>;
}

impl<S: PathQuerySolver + ?Sized> PathQuerySolver for &S {
    fn solve(&self, query: &PathQuery<'_>) -> Result<ReachableSet> {
        (**self).solve(query)
    }
}
