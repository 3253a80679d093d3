//! Run state and the top-level run sequence.

use std::io::Write;

use rpqbench_common::Result;
use rpqbench_core::{LabelStore, PathQuerySolver, PreloadSummary};
use tracing::debug;

use crate::bench::{BenchmarkEngine, RunSummary, trial_range};
use crate::config::BenchConfig;
use crate::query::QueryCatalog;
use crate::sink::ResultSink;

/// Owns the configuration and the label cache for one run.
pub struct BenchmarkContext {
    config: BenchConfig,
    labels: LabelStore,
}

impl BenchmarkContext {
    /// Creates a context with an empty label cache.
    #[must_use]
    pub fn new(config: BenchConfig) -> Self {
        let labels = LabelStore::new(
            config.dataset_dir.clone(),
            config.label_count,
            config.cache_transposed,
        );
        Self { config, labels }
    }

    /// Run configuration.
    #[must_use]
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Label cache.
    #[must_use]
    pub fn labels(&self) -> &LabelStore {
        &self.labels
    }

    /// Loads every label if preloading is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if a label file exists but cannot be loaded.
    pub fn preload(&self) -> Result<Option<PreloadSummary>> {
        if !self.config.preload {
            debug!("preloading disabled, labels load on demand");
            return Ok(None);
        }
        self.labels.bulk_preload().map(Some)
    }

    /// Loads the configured queries.
    ///
    /// # Errors
    ///
    /// See [`QueryCatalog::load_all`].
    pub fn load_catalog(&self) -> Result<QueryCatalog> {
        QueryCatalog::load_all(&self.config.query_dir, self.config.query_count)
    }

    /// Runs all trials over `catalog`, writing records to `sink`.
    ///
    /// # Errors
    ///
    /// See [`BenchmarkEngine::run`].
    pub fn run<S: PathQuerySolver, W: Write>(
        &self,
        catalog: &QueryCatalog,
        solver: S,
        sink: &mut ResultSink<W>,
    ) -> Result<RunSummary> {
        let trials = trial_range(self.config.warmup, self.config.runs);
        BenchmarkEngine::new(&self.labels, solver, sink).run(catalog, trials)
    }
}

/// What a completed run reports besides its result files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Preload totals, when preloading ran.
    pub preload: Option<PreloadSummary>,
    /// Queries present in the catalog.
    pub queries_loaded: usize,
    /// Labels present at the end of the run.
    pub labels_loaded: usize,
    /// Bytes held by the label cache at the end of the run.
    pub memory_bytes: usize,
    /// Trial loop counters.
    pub summary: RunSummary,
}

/// Runs a complete benchmark: preload, catalog, trials.
///
/// The results directory is opened before anything is loaded, so that an
/// unwritable destination fails fast.
///
/// # Errors
///
/// Returns the first fatal error of any stage.
pub fn run_benchmark<S: PathQuerySolver, W: Write>(
    config: BenchConfig,
    solver: S,
    console: W,
) -> Result<(RunReport, W)> {
    let mut sink = ResultSink::with_console(config.results_dir.clone(), console)?;
    let context = BenchmarkContext::new(config);

    let preload = context.preload()?;
    let catalog = context.load_catalog()?;
    let summary = context.run(&catalog, solver, &mut sink)?;
    let console = sink.finish()?;

    let report = RunReport {
        preload,
        queries_loaded: catalog.loaded_count(),
        labels_loaded: context.labels().loaded_count(),
        memory_bytes: context.labels().memory_usage(),
        summary,
    };
    Ok((report, console))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io;

    use rpqbench_core::ProductSolver;
    use tempfile::TempDir;

    use super::*;

    const CHAIN: &str = "%%MatrixMarket matrix coordinate pattern general\n3 3 2\n1 2\n2 3\n";

    fn config(dir: &TempDir) -> BenchConfig {
        let data = dir.path().join("data");
        fs::create_dir(&data).unwrap();
        fs::write(data.join("1.txt"), CHAIN).unwrap();
        BenchConfig::new(data, 3, dir.path().join("queries"), 0)
            .with_results_dir(dir.path().join("Results"))
    }

    #[test]
    fn test_preload_reports_memory() {
        let dir = TempDir::new().unwrap();
        let context = BenchmarkContext::new(config(&dir));

        let summary = context.preload().unwrap().unwrap();
        assert_eq!(summary.loaded, 1);
        assert!(summary.memory_bytes > 0);
        assert!(context.labels().get(rpqbench_common::Label::new(2).unwrap()).is_none());
    }

    #[test]
    fn test_preload_disabled() {
        let dir = TempDir::new().unwrap();
        let context = BenchmarkContext::new(config(&dir).with_preload(false));

        assert!(context.preload().unwrap().is_none());
        assert_eq!(context.labels().loaded_count(), 0);
    }

    #[test]
    fn test_transpose_flag_reaches_store() {
        let dir = TempDir::new().unwrap();
        let context = BenchmarkContext::new(config(&dir).with_transpose_cache(false));
        context.preload().unwrap();

        let graph = context.labels().get(rpqbench_common::Label::new(1).unwrap()).unwrap();
        assert!(graph.transpose().is_none());
    }

    #[test]
    fn test_run_with_reference_solver() {
        let dir = TempDir::new().unwrap();
        let qdir = dir.path().join("queries").join("1");
        fs::create_dir_all(&qdir).unwrap();
        // a+ from vertex 0.
        fs::write(qdir.join("meta.txt"), "1 0 1 1 1 2 1 1").unwrap();
        fs::write(
            qdir.join("1.txt"),
            "%%MatrixMarket matrix coordinate pattern general\n2 2 2\n1 2\n2 2\n",
        )
        .unwrap();

        let mut config = config(&dir).with_runs(2);
        config.query_count = 1;
        let (report, _) = run_benchmark(config, ProductSolver::new(), io::sink()).unwrap();

        assert_eq!(report.queries_loaded, 1);
        assert_eq!(report.summary.trials, 3);
        assert_eq!(report.summary.dispatched, 3);

        let all = fs::read_to_string(dir.path().join("Results").join("all.txt")).unwrap();
        assert_eq!(all.lines().count(), 3);
        assert!(all.lines().all(|l| l.starts_with("1,") && l.ends_with(",2")));
    }
}
