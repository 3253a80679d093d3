//! Error types for the benchmark.
//!
//! Loading functions report expected absences (a missing label file, a
//! missing query description) through their return values, not through
//! [`Error`]. Everything that reaches [`Error`] terminates the run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::{Label, QueryNumber};

/// Result type alias using the benchmark error.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error for every benchmark operation.
#[derive(Error, Debug)]
pub enum Error {
    /// A file could not be opened, read, or written.
    #[error("{}: {source}", path.display())]
    Io {
        /// Operation that performed the I/O.
        operation: &'static str,
        /// File involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A sparse matrix file is malformed.
    #[error("{}: {source}", path.display())]
    Matrix {
        /// Matrix file.
        path: PathBuf,
        /// Reader diagnostic.
        #[source]
        source: MatrixError,
    },

    /// A query description is malformed or violates a bound.
    #[error("query {query}: {source}")]
    Query {
        /// Query number.
        query: QueryNumber,
        /// Parser diagnostic.
        #[source]
        source: QueryParseError,
    },

    /// A label required by a dispatchable query has no dataset file.
    #[error("couldn't find adjacency matrix for label {label} in query {query}")]
    MissingLabel {
        /// Label that failed to resolve.
        label: Label,
        /// Query that required it.
        query: QueryNumber,
    },

    /// The path-query solver rejected its input.
    #[error("solver error: {0}")]
    Solver(String),

    /// Invalid configuration.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Creates an I/O error for the given operation and path.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Name of the operation that failed, for the top-level diagnostic.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Io { operation, .. } => *operation,
            Self::Matrix { .. } => "load_matrix",
            Self::Query { .. } => "load_query",
            Self::MissingLabel { .. } => "resolve_label",
            Self::Solver(_) => "solve",
            Self::InvalidArgument(_) => "configure",
        }
    }
}

/// Errors produced while reading a Matrix Market file.
#[derive(Error, Debug)]
pub enum MatrixError {
    /// The `%%MatrixMarket` banner is missing.
    #[error("missing %%MatrixMarket banner")]
    MissingBanner,

    /// The banner names a layout or field this reader does not support.
    #[error("unsupported matrix format: {0}")]
    Unsupported(String),

    /// A size or entry line could not be parsed.
    #[error("line {line}: {reason}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        reason: String,
    },

    /// An entry lies outside the declared dimensions.
    #[error("line {line}: entry ({row}, {col}) outside {nrows}x{ncols}")]
    OutOfBounds {
        /// 1-based line number.
        line: usize,
        /// 1-based row as written.
        row: u64,
        /// 1-based column as written.
        col: u64,
        /// Declared row count.
        nrows: u64,
        /// Declared column count.
        ncols: u64,
    },

    /// Fewer or more entries than the size line declares.
    #[error("expected {expected} entries, found {found}")]
    EntryCount {
        /// Declared entry count.
        expected: u64,
        /// Entries actually read.
        found: u64,
    },

    /// Reading the underlying stream failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors produced while parsing a query description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryParseError {
    /// The description ended before this field.
    #[error("missing field `{field}`")]
    MissingField {
        /// Field name.
        field: &'static str,
    },

    /// A token is not an integer.
    #[error("field `{field}`: `{token}` is not an integer")]
    InvalidInteger {
        /// Field name.
        field: &'static str,
        /// Offending token.
        token: String,
    },

    /// A value is outside its allowed range.
    #[error("field `{field}`: value {value} is out of range")]
    OutOfRange {
        /// Field name.
        field: &'static str,
        /// Offending value as written.
        value: i64,
    },

    /// A declared count exceeds its fixed maximum.
    #[error("field `{field}`: {count} entries exceed the maximum of {max}")]
    TooMany {
        /// Field name.
        field: &'static str,
        /// Declared count.
        count: i64,
        /// Maximum allowed.
        max: usize,
    },

    /// A set-valued field lists the same value twice.
    #[error("field `{field}`: duplicate value {value}")]
    Duplicate {
        /// Field name.
        field: &'static str,
        /// Repeated value as written.
        value: i64,
    },
}
