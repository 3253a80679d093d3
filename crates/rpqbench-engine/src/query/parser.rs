//! Query description parser.
//!
//! A description is a whitespace-separated list of integers:
//!
//! ```text
//! source dest nqs qs[0..nqs) nqf qf[0..nqf) nlabels labels[0..nlabels)
//! ```
//!
//! Source, destination and states are 1-based in the file; `0` for an
//! endpoint means "not fixed". Labels are signed: a negative label is
//! traversed inverted.

use std::str::SplitWhitespace;

use rpqbench_common::{QueryParseError, SignedLabel, StateId, VertexId};
use smallvec::SmallVec;
use tracing::warn;

use super::{MAX_FINAL_STATES, MAX_START_STATES, MAX_TRANSITION_LABELS, StateList};

/// A parsed description, before any transition graph is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescription {
    /// Fixed source vertex (0-based).
    pub source: Option<VertexId>,
    /// Fixed destination vertex (0-based).
    pub dest: Option<VertexId>,
    /// Automaton start states (0-based).
    pub start_states: StateList,
    /// Automaton final states (0-based).
    pub final_states: StateList,
    /// Declared labels, sign included.
    pub labels: SmallVec<[SignedLabel; 4]>,
}

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
        }
    }

    fn next_i64(&mut self, field: &'static str) -> Result<i64, QueryParseError> {
        let token = self
            .inner
            .next()
            .ok_or(QueryParseError::MissingField { field })?;
        token.parse().map_err(|_| QueryParseError::InvalidInteger {
            field,
            token: token.to_string(),
        })
    }

    /// 1-based endpoint; `0` means "not fixed".
    fn endpoint(&mut self, field: &'static str) -> Result<Option<VertexId>, QueryParseError> {
        match self.next_i64(field)? {
            0 => Ok(None),
            value if value > 0 => Ok(Some(value as u64 - 1)),
            value => Err(QueryParseError::OutOfRange { field, value }),
        }
    }

    fn count(&mut self, field: &'static str, max: usize) -> Result<usize, QueryParseError> {
        let count = self.next_i64(field)?;
        if count < 0 {
            return Err(QueryParseError::OutOfRange {
                field,
                value: count,
            });
        }
        if count as u64 > max as u64 {
            return Err(QueryParseError::TooMany { field, count, max });
        }
        Ok(count as usize)
    }

    /// Counted list of distinct 1-based states, returned 0-based.
    fn states(&mut self, field: &'static str, max: usize) -> Result<StateList, QueryParseError> {
        let count = self.count(field, max)?;
        let mut states = StateList::with_capacity(count);
        for _ in 0..count {
            let value = self.next_i64(field)?;
            if value <= 0 {
                return Err(QueryParseError::OutOfRange { field, value });
            }
            let state = value as StateId - 1;
            if states.contains(&state) {
                return Err(QueryParseError::Duplicate { field, value });
            }
            states.push(state);
        }
        Ok(states)
    }

    fn labels(&mut self) -> Result<SmallVec<[SignedLabel; 4]>, QueryParseError> {
        const FIELD: &str = "labels";
        let count = self.count(FIELD, MAX_TRANSITION_LABELS)?;
        let mut labels = SmallVec::with_capacity(count);
        for _ in 0..count {
            let value = self.next_i64(FIELD)?;
            let label = SignedLabel::new(value).ok_or(QueryParseError::OutOfRange {
                field: FIELD,
                value,
            })?;
            if labels.contains(&label) {
                return Err(QueryParseError::Duplicate {
                    field: FIELD,
                    value,
                });
            }
            labels.push(label);
        }
        Ok(labels)
    }

    fn remaining(self) -> usize {
        self.inner.count()
    }
}

/// Parses a query description.
///
/// # Errors
///
/// Returns a [`QueryParseError`] for a missing or non-integer field, a
/// value out of range, a count above its maximum, or a repeated state or
/// label.
pub fn parse_description(text: &str) -> Result<QueryDescription, QueryParseError> {
    let mut tokens = Tokens::new(text);

    let source = tokens.endpoint("source")?;
    let dest = tokens.endpoint("dest")?;
    let start_states = tokens.states("start_states", MAX_START_STATES)?;
    let final_states = tokens.states("final_states", MAX_FINAL_STATES)?;
    let labels = tokens.labels()?;

    let trailing = tokens.remaining();
    if trailing > 0 {
        warn!(trailing, "ignoring trailing tokens in query description");
    }

    Ok(QueryDescription {
        source,
        dest,
        start_states,
        final_states,
        labels,
    })
}
