//! Query model.
//!
//! A query is an automaton (start states, final states, one transition
//! relation per declared label) anchored at an optional source and an
//! optional destination vertex. Which endpoints are fixed decides the
//! [`QueryKind`], and with it how the benchmark dispatches the query.

mod catalog;
mod parser;

pub use catalog::QueryCatalog;
pub use parser::{QueryDescription, parse_description};

use rpqbench_common::{Label, QueryNumber, SignedLabel, StateId, VertexId};
use rpqbench_core::LabeledGraph;
use smallvec::SmallVec;

/// Maximum number of transition labels per query.
pub const MAX_TRANSITION_LABELS: usize = 16;
/// Maximum number of automaton start states per query.
pub const MAX_START_STATES: usize = 16;
/// Maximum number of automaton final states per query.
pub const MAX_FINAL_STATES: usize = 16;

/// Inline storage for the bounded per-query lists.
pub type StateList = SmallVec<[StateId; 4]>;

/// Shape of a query, decided by which endpoints are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// Neither endpoint fixed. Not supported by the benchmark.
    AllPaths,
    /// Only the destination fixed.
    SingleDestination,
    /// Only the source fixed.
    SingleSource,
    /// Both endpoints fixed. Recognized, but not run by the benchmark.
    FixedSourceDestination,
}

impl QueryKind {
    /// Classifies a query by its (0-based) endpoints.
    #[must_use]
    pub fn classify(source: Option<VertexId>, dest: Option<VertexId>) -> Self {
        match (source, dest) {
            (None, None) => Self::AllPaths,
            (None, Some(_)) => Self::SingleDestination,
            (Some(_), None) => Self::SingleSource,
            (Some(_), Some(_)) => Self::FixedSourceDestination,
        }
    }

    /// Whether the benchmark loop runs queries of this kind.
    #[must_use]
    pub fn is_dispatchable(self) -> bool {
        matches!(self, Self::SingleSource | Self::SingleDestination)
    }
}

/// One automaton label of a query.
#[derive(Debug, Clone)]
pub struct TransitionLabel {
    label: SignedLabel,
    graph: Option<LabeledGraph>,
}

impl TransitionLabel {
    /// Creates a transition label with its (possibly absent) transitions.
    #[must_use]
    pub fn new(label: SignedLabel, graph: Option<LabeledGraph>) -> Self {
        Self { label, graph }
    }

    /// The label as declared, sign included.
    #[must_use]
    pub fn signed(&self) -> SignedLabel {
        self.label
    }

    /// The dataset label whose graph this transition walks.
    #[must_use]
    pub fn label(&self) -> Label {
        self.label.label()
    }

    /// Whether dataset edges are traversed inverted.
    #[must_use]
    pub fn is_inverse(&self) -> bool {
        self.label.is_inverse()
    }

    /// The automaton transitions on this label, if the query provides them.
    #[must_use]
    pub fn graph(&self) -> Option<&LabeledGraph> {
        self.graph.as_ref()
    }
}

/// A loaded query.
#[derive(Debug, Clone)]
pub struct Query {
    number: QueryNumber,
    kind: QueryKind,
    source: Option<VertexId>,
    dest: Option<VertexId>,
    labels: SmallVec<[TransitionLabel; 4]>,
    start_states: StateList,
    final_states: StateList,
}

impl Query {
    /// Builds a query from a parsed description and its transition graphs.
    ///
    /// `graphs` runs parallel to `description.labels`.
    #[must_use]
    pub fn new(
        number: QueryNumber,
        description: QueryDescription,
        graphs: impl IntoIterator<Item = Option<LabeledGraph>>,
    ) -> Self {
        let labels = description
            .labels
            .iter()
            .zip(graphs)
            .map(|(&label, graph)| TransitionLabel::new(label, graph))
            .collect();

        Self {
            number,
            kind: QueryKind::classify(description.source, description.dest),
            source: description.source,
            dest: description.dest,
            labels,
            start_states: description.start_states,
            final_states: description.final_states,
        }
    }

    /// 1-based query number.
    #[must_use]
    pub fn number(&self) -> QueryNumber {
        self.number
    }

    /// Query shape.
    #[must_use]
    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    /// Fixed source vertex (0-based), if any.
    #[must_use]
    pub fn source(&self) -> Option<VertexId> {
        self.source
    }

    /// Fixed destination vertex (0-based), if any.
    #[must_use]
    pub fn dest(&self) -> Option<VertexId> {
        self.dest
    }

    /// Transition labels in declaration order.
    #[must_use]
    pub fn labels(&self) -> &[TransitionLabel] {
        &self.labels
    }

    /// Automaton start states (0-based).
    #[must_use]
    pub fn start_states(&self) -> &[StateId] {
        &self.start_states
    }

    /// Automaton final states (0-based).
    #[must_use]
    pub fn final_states(&self) -> &[StateId] {
        &self.final_states
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_classify_table() {
        assert_eq!(QueryKind::classify(None, None), QueryKind::AllPaths);
        assert_eq!(QueryKind::classify(None, Some(0)), QueryKind::SingleDestination);
        assert_eq!(QueryKind::classify(Some(0), None), QueryKind::SingleSource);
        assert_eq!(
            QueryKind::classify(Some(0), Some(0)),
            QueryKind::FixedSourceDestination
        );
    }

    #[test]
    fn test_dispatchable_kinds() {
        assert!(QueryKind::SingleSource.is_dispatchable());
        assert!(QueryKind::SingleDestination.is_dispatchable());
        assert!(!QueryKind::AllPaths.is_dispatchable());
        assert!(!QueryKind::FixedSourceDestination.is_dispatchable());
    }

    #[test]
    fn test_query_from_description() {
        let description = parse_description("1 0 1 1 1 2 2 1 -2").unwrap();
        let query = Query::new(4, description, [None, None]);

        assert_eq!(query.number(), 4);
        assert_eq!(query.kind(), QueryKind::SingleSource);
        assert_eq!(query.source(), Some(0));
        assert_eq!(query.dest(), None);
        assert_eq!(query.start_states(), &[0]);
        assert_eq!(query.final_states(), &[1]);
        assert_eq!(query.labels().len(), 2);
        assert!(!query.labels()[0].is_inverse());
        assert!(query.labels()[1].is_inverse());
        assert_eq!(query.labels()[1].label(), Label::new(2).unwrap());
        assert!(query.labels()[1].graph().is_none());
    }

    fn endpoint() -> impl Strategy<Value = Option<VertexId>> {
        proptest::option::of(0u64..1_000_000)
    }

    proptest! {
        #[test]
        fn prop_classification_is_total(source in endpoint(), dest in endpoint()) {
            let kind = QueryKind::classify(source, dest);
            prop_assert_eq!(kind, QueryKind::classify(source, dest));

            let expected = match (source.is_some(), dest.is_some()) {
                (false, false) => QueryKind::AllPaths,
                (false, true) => QueryKind::SingleDestination,
                (true, false) => QueryKind::SingleSource,
                (true, true) => QueryKind::FixedSourceDestination,
            };
            prop_assert_eq!(kind, expected);
        }

        #[test]
        fn prop_file_endpoints_classify(source in 0i64..1000, dest in 0i64..1000) {
            let text = format!("{source} {dest} 0 0 0");
            let description = parse_description(&text).unwrap();
            let kind = QueryKind::classify(description.source, description.dest);
            prop_assert_eq!(kind == QueryKind::AllPaths, source == 0 && dest == 0);
            prop_assert_eq!(description.source.is_none(), source == 0);
            prop_assert_eq!(description.dest.is_none(), dest == 0);
        }
    }
}
