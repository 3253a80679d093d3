//! Benchmarks for the reference product solver.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rpqbench_core::matrix::BoolMatrix;
use rpqbench_core::{
    Automaton, Direction, LabeledGraph, PathQuery, PathQuerySolver, ProductSolver, TransitionInput,
};

/// A ring with chords every 7 vertices.
fn ring(n: u64) -> LabeledGraph {
    let mut edges: Vec<(u64, u64)> = (0..n).map(|v| (v, (v + 1) % n)).collect();
    edges.extend((0..n).step_by(7).map(|v| (v, (v * 3 + 1) % n)));
    LabeledGraph::new(BoolMatrix::from_entries(n, n, edges), true)
}

const START: &[u64] = &[0];
const FINAL: &[u64] = &[1];

/// Automaton accepting `a+`.
fn plus() -> LabeledGraph {
    LabeledGraph::new(BoolMatrix::from_entries(2, 2, vec![(0, 1), (1, 1)]), true)
}

fn bench_single_source(c: &mut Criterion) {
    let mut group = c.benchmark_group("product_solver");
    let automaton = plus();
    let solver = ProductSolver::new();

    for size in [1_000u64, 10_000, 50_000] {
        let graph = ring(size);
        for direction in [Direction::Forward, Direction::Backward] {
            let (starts, finals) = match direction {
                Direction::Forward => (START, FINAL),
                Direction::Backward => (FINAL, START),
            };
            let query = PathQuery {
                transitions: vec![TransitionInput {
                    automaton: Some(&automaton),
                    inverse: false,
                    graph: &graph,
                }],
                automaton: Automaton {
                    start_states: starts,
                    final_states: finals,
                },
                anchors: &[0],
                direction,
            };
            group.bench_with_input(
                BenchmarkId::new(format!("{direction:?}"), size),
                &query,
                |b, query| b.iter(|| black_box(solver.solve(query).map(|r| r.cardinality()))),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_single_source);
criterion_main!(benches);
