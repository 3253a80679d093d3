//! The timed trial loop.
//!
//! Each trial visits the catalog in ascending query number. Present,
//! dispatchable queries have their labels resolved through the
//! [`LabelStore`], are handed to the solver, and the solver call plus the
//! cardinality read are timed. Trial `0`, when enabled, is the warm-up: it
//! is printed and written to the aggregate file like any other trial but
//! kept out of the per-query files.

use std::io::Write;
use std::ops::RangeInclusive;
use std::time::Instant;

use rpqbench_common::{Error, Result, VertexId};
use rpqbench_core::{
    Automaton, Direction, LabelStore, LoadOutcome, PathQuery, PathQuerySolver, ReachableSet,
    TransitionInput,
};
use tracing::{debug, warn};

use crate::query::{Query, QueryCatalog, QueryKind};
use crate::sink::ResultSink;

/// Outcome of one (query, trial) execution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchRecord {
    /// Wall time of the solver call and cardinality read, in microseconds.
    pub elapsed_us: f64,
    /// Size of the returned vertex set.
    pub cardinality: usize,
}

/// Counters for one benchmark run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Trials executed, warm-up included.
    pub trials: usize,
    /// Solver calls made.
    pub dispatched: usize,
    /// Query visits skipped because the description was missing.
    pub skipped_absent: usize,
    /// Query visits skipped because the kind is not run.
    pub skipped_unsupported: usize,
}

/// Trial indices for a run; index `0` is the warm-up.
#[must_use]
pub fn trial_range(warmup: bool, runs: usize) -> RangeInclusive<usize> {
    if warmup { 0..=runs } else { 1..=runs }
}

/// Drives a solver over a catalog and writes every record to a sink.
pub struct BenchmarkEngine<'a, S, W: Write> {
    labels: &'a LabelStore,
    solver: S,
    sink: &'a mut ResultSink<W>,
}

impl<'a, S: PathQuerySolver, W: Write> BenchmarkEngine<'a, S, W> {
    /// Creates an engine.
    pub fn new(labels: &'a LabelStore, solver: S, sink: &'a mut ResultSink<W>) -> Self {
        Self {
            labels,
            solver,
            sink,
        }
    }

    /// Runs every trial in `trials` over `catalog`.
    ///
    /// # Errors
    ///
    /// Stops at the first error: a label that cannot be resolved, a solver
    /// failure, or a write to the console or aggregate file.
    pub fn run(
        &mut self,
        catalog: &QueryCatalog,
        trials: RangeInclusive<usize>,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for trial in trials {
            debug!(trial, "starting trial");
            for (number, slot) in catalog.iter() {
                let Some(query) = slot else {
                    debug!(query = number, "skipping absent query");
                    summary.skipped_absent += 1;
                    continue;
                };

                match query.kind() {
                    QueryKind::SingleSource | QueryKind::SingleDestination => {}
                    QueryKind::AllPaths => {
                        warn!(query = number, "all-paths queries are not supported, skipping");
                        summary.skipped_unsupported += 1;
                        continue;
                    }
                    QueryKind::FixedSourceDestination => {
                        warn!(
                            query = number,
                            "fixed source and destination queries are not run, skipping"
                        );
                        summary.skipped_unsupported += 1;
                        continue;
                    }
                }

                let record = self.dispatch(query)?;
                self.sink.record(number, &record, trial > 0)?;
                summary.dispatched += 1;
            }
            summary.trials += 1;
        }

        Ok(summary)
    }

    /// Resolves the labels of `query`, runs the solver, and times it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingLabel`] when a label has no dataset file,
    /// [`Error::InvalidArgument`] for a kind that is not dispatched, and
    /// any solver error.
    pub fn dispatch(&self, query: &Query) -> Result<BenchRecord> {
        let mut transitions = Vec::with_capacity(query.labels().len());
        for transition in query.labels() {
            let label = transition.label();
            if self.labels.ensure_loaded(label)? == LoadOutcome::NotFound {
                return Err(Error::MissingLabel {
                    label,
                    query: query.number(),
                });
            }
            let graph = self.labels.get(label).ok_or(Error::MissingLabel {
                label,
                query: query.number(),
            })?;
            transitions.push(TransitionInput {
                automaton: transition.graph(),
                inverse: transition.is_inverse(),
                graph,
            });
        }

        let anchor: [VertexId; 1];
        let (automaton, direction) = match (query.kind(), query.source(), query.dest()) {
            (QueryKind::SingleSource, Some(source), _) => {
                anchor = [source];
                (
                    Automaton {
                        start_states: query.start_states(),
                        final_states: query.final_states(),
                    },
                    Direction::Forward,
                )
            }
            (QueryKind::SingleDestination, _, Some(dest)) => {
                anchor = [dest];
                (
                    Automaton {
                        start_states: query.final_states(),
                        final_states: query.start_states(),
                    },
                    Direction::Backward,
                )
            }
            (kind, ..) => {
                return Err(Error::InvalidArgument(format!(
                    "query {} of kind {kind:?} cannot be dispatched",
                    query.number()
                )));
            }
        };

        let path_query = PathQuery {
            transitions,
            automaton,
            anchors: &anchor,
            direction,
        };

        let (record, reachable) =
            measure(|| self.solver.solve(&path_query), ReachableSet::cardinality)?;
        drop(reachable);
        Ok(record)
    }
}

/// Times `call` and `read` on its result. The result is handed back so that
/// releasing it stays outside the measured span.
fn measure<R>(
    call: impl FnOnce() -> Result<R>,
    read: impl FnOnce(&R) -> usize,
) -> Result<(BenchRecord, R)> {
    let start = Instant::now();
    let result = call()?;
    let cardinality = read(&result);
    let elapsed = start.elapsed();

    let record = BenchRecord {
        elapsed_us: elapsed.as_secs_f64() * 1e6,
        cardinality,
    };
    Ok((record, result))
}
