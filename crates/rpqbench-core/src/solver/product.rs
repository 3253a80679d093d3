//! Reference evaluator: breadth-first search over the product graph.
//!
//! A product vertex is a pair `(state, vertex)`. Label `i` moves
//! `(q, v) -> (q', v')` when the automaton has `q -> q'` on `i` and the
//! graph of `i` has `v -> v'` (or `v' -> v` for an inverse label). With
//! [`Direction::Backward`] both relations are followed reversed. The
//! result is every vertex visited together with a final state.

use hashbrown::HashSet;
use rpqbench_common::{Error, Result, StateId, VertexId};
use tracing::info;

use super::{Direction, PathQuery, PathQuerySolver, ReachableSet};
use crate::graph::LabeledGraph;

/// Product-graph BFS implementation of [`PathQuerySolver`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductSolver {
    trace: bool,
}

impl ProductSolver {
    /// Creates a solver with diagnostic tracing off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solver that logs per-step frontier sizes.
    #[must_use]
    pub fn with_tracing(trace: bool) -> Self {
        Self { trace }
    }
}

fn neighbors(
    graph: &LabeledGraph,
    v: VertexId,
    reverse: bool,
) -> Box<dyn Iterator<Item = VertexId> + '_> {
    if reverse {
        graph.predecessors(v)
    } else {
        Box::new(graph.successors(v))
    }
}

impl PathQuerySolver for ProductSolver {
    fn solve(&self, query: &PathQuery<'_>) -> Result<ReachableSet> {
        for transition in &query.transitions {
            let n = transition.graph.vertex_count();
            if let Some(&anchor) = query.anchors.iter().find(|&&a| a >= n) {
                return Err(Error::Solver(format!(
                    "anchor vertex {anchor} outside graph of {n} vertices"
                )));
            }
        }

        let backward = query.direction == Direction::Backward;
        let finals: HashSet<StateId> = query.automaton.final_states.iter().copied().collect();

        let mut visited: HashSet<(StateId, VertexId)> = HashSet::new();
        let mut frontier: Vec<(StateId, VertexId)> = Vec::new();
        for &q in query.automaton.start_states {
            for &v in query.anchors {
                if visited.insert((q, v)) {
                    frontier.push((q, v));
                }
            }
        }

        let mut step = 0usize;
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for &(q, v) in &frontier {
                for transition in &query.transitions {
                    let Some(automaton) = transition.automaton else {
                        continue;
                    };
                    let states: Vec<StateId> = neighbors(automaton, q, backward).collect();
                    if states.is_empty() {
                        continue;
                    }
                    let reverse = transition.inverse != backward;
                    for w in neighbors(transition.graph, v, reverse) {
                        for &p in &states {
                            if visited.insert((p, w)) {
                                next.push((p, w));
                            }
                        }
                    }
                }
            }

            step += 1;
            if self.trace {
                info!(
                    target: "rpqbench::solver",
                    step,
                    frontier = next.len(),
                    visited = visited.len(),
                    "product traversal step"
                );
            }
            frontier = next;
        }

        Ok(visited
            .into_iter()
            .filter(|(q, _)| finals.contains(q))
            .map(|(_, v)| v)
            .collect())
    }
}
