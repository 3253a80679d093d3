//! # rpqbench-engine
//!
//! The benchmark itself: configuration, query descriptions, the timed trial
//! loop, and result persistence.
//!
//! ## Modules
//!
//! - [`config`] - Run configuration
//! - [`context`] - [`BenchmarkContext`], owner of the label cache
//! - [`query`] - Query model, description parser, and [`QueryCatalog`]
//! - [`sink`] - [`ResultSink`], the aggregate and per-query result files
//! - [`bench`] - [`BenchmarkEngine`], the trial loop

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bench;
pub mod config;
pub mod context;
pub mod query;
pub mod sink;

pub use bench::{BenchRecord, BenchmarkEngine, RunSummary, trial_range};
pub use config::BenchConfig;
pub use context::{BenchmarkContext, RunReport, run_benchmark};
pub use query::{Query, QueryCatalog, QueryKind, TransitionLabel};
pub use sink::ResultSink;
