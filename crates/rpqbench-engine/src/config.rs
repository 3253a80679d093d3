//! Run configuration.

use std::path::PathBuf;

/// Configuration of one benchmark run.
///
/// # Examples
///
/// ```
/// use rpqbench_engine::BenchConfig;
///
/// let config = BenchConfig::new("dataset", 12, "queries", 40)
///     .with_runs(10)
///     .with_warmup(false);
/// assert_eq!(config.runs, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Directory holding `<label>.txt` adjacency files.
    pub dataset_dir: PathBuf,
    /// Number of labels; label ids range over `1..=label_count`.
    pub label_count: usize,
    /// Directory holding `<n>/meta.txt` query descriptions.
    pub query_dir: PathBuf,
    /// Number of queries; query numbers range over `1..=query_count`.
    pub query_count: usize,
    /// Number of measured trials.
    pub runs: usize,
    /// Whether trial 0 runs as an unpersisted warm-up.
    pub warmup: bool,
    /// Whether every label is loaded before the first trial.
    pub preload: bool,
    /// Whether each dataset graph also keeps its transpose.
    pub cache_transposed: bool,
    /// Whether the solver logs its internal progress.
    pub trace_solver: bool,
    /// Directory receiving `all.txt` and `<query>.txt`.
    pub results_dir: PathBuf,
}

impl BenchConfig {
    /// Measured trials when not overridden.
    pub const DEFAULT_RUNS: usize = 5;

    /// Results directory when not overridden.
    pub const DEFAULT_RESULTS_DIR: &'static str = "Results";

    /// Creates a configuration with default run settings.
    pub fn new(
        dataset_dir: impl Into<PathBuf>,
        label_count: usize,
        query_dir: impl Into<PathBuf>,
        query_count: usize,
    ) -> Self {
        Self {
            dataset_dir: dataset_dir.into(),
            label_count,
            query_dir: query_dir.into(),
            query_count,
            runs: Self::DEFAULT_RUNS,
            warmup: true,
            preload: true,
            cache_transposed: true,
            trace_solver: false,
            results_dir: PathBuf::from(Self::DEFAULT_RESULTS_DIR),
        }
    }

    /// Sets the number of measured trials.
    #[must_use]
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    /// Enables or disables the warm-up trial.
    #[must_use]
    pub fn with_warmup(mut self, warmup: bool) -> Self {
        self.warmup = warmup;
        self
    }

    /// Enables or disables bulk preloading of labels.
    #[must_use]
    pub fn with_preload(mut self, preload: bool) -> Self {
        self.preload = preload;
        self
    }

    /// Enables or disables transpose caching for dataset graphs.
    #[must_use]
    pub fn with_transpose_cache(mut self, cache_transposed: bool) -> Self {
        self.cache_transposed = cache_transposed;
        self
    }

    /// Enables or disables solver diagnostic tracing.
    #[must_use]
    pub fn with_solver_tracing(mut self, trace_solver: bool) -> Self {
        self.trace_solver = trace_solver;
        self
    }

    /// Sets the results directory.
    #[must_use]
    pub fn with_results_dir(mut self, results_dir: impl Into<PathBuf>) -> Self {
        self.results_dir = results_dir.into();
        self
    }
}
