//! Result persistence.
//!
//! Every record goes to the console and to `all.txt` as
//! `query,elapsed_us,cardinality`. Measured records are also appended to
//! `<query>.txt` as `elapsed_us cardinality`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use rpqbench_common::{Error, QueryNumber, Result};
use tracing::warn;

use crate::bench::BenchRecord;

/// Name of the aggregate results file.
pub const AGGREGATE_FILE: &str = "all.txt";

/// Writes benchmark records to the console and the results directory.
pub struct ResultSink<W: Write = io::Stdout> {
    dir: PathBuf,
    aggregate: BufWriter<File>,
    console: W,
}

impl ResultSink<io::Stdout> {
    /// Opens a sink that prints records to stdout.
    ///
    /// # Errors
    ///
    /// See [`with_console`](Self::with_console).
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_console(dir, io::stdout())
    }
}

impl<W: Write> ResultSink<W> {
    /// Opens a sink printing records to `console`.
    ///
    /// Creates `dir` if needed and truncates its aggregate file.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or aggregate file cannot be
    /// created.
    pub fn with_console(dir: impl Into<PathBuf>, console: W) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| Error::io("open_results", &dir, e))?;

        let path = dir.join(AGGREGATE_FILE);
        let file = File::create(&path).map_err(|e| Error::io("open_results", &path, e))?;

        Ok(Self {
            dir,
            aggregate: BufWriter::new(file),
            console,
        })
    }

    /// Results directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the per-query file for `query`.
    #[must_use]
    pub fn query_path(&self, query: QueryNumber) -> PathBuf {
        self.dir.join(format!("{query}.txt"))
    }

    /// Writes one record.
    ///
    /// The aggregate file is flushed before returning. When `measured` is
    /// set the record is also appended to the query's own file; failing to
    /// open that file skips the append with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the console or aggregate file cannot be written.
    pub fn record(&mut self, query: QueryNumber, record: &BenchRecord, measured: bool) -> Result<()> {
        let line = format!(
            "{query},{:.0},{}",
            record.elapsed_us, record.cardinality
        );

        writeln!(self.console, "{line}").map_err(|e| Error::io("write_results", "<console>", e))?;

        let aggregate = self.dir.join(AGGREGATE_FILE);
        writeln!(self.aggregate, "{line}")
            .and_then(|()| self.aggregate.flush())
            .map_err(|e| Error::io("write_results", aggregate, e))?;

        if measured {
            self.append_measured(query, record);
        }
        Ok(())
    }

    fn append_measured(&self, query: QueryNumber, record: &BenchRecord) {
        let path = self.query_path(query);
        let mut file = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "couldn't open query results file");
                return;
            }
        };
        if let Err(e) = writeln!(file, "{:.0} {}", record.elapsed_us, record.cardinality) {
            warn!(path = %path.display(), error = %e, "couldn't append query result");
        }
    }

    /// Consumes the sink, returning the console writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the aggregate file cannot be flushed.
    pub fn finish(mut self) -> Result<W> {
        let path = self.dir.join(AGGREGATE_FILE);
        self.aggregate
            .flush()
            .map_err(|e| Error::io("write_results", path, e))?;
        Ok(self.console)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rec(elapsed_us: f64, cardinality: usize) -> BenchRecord {
        BenchRecord {
            elapsed_us,
            cardinality,
        }
    }

    #[test]
    fn test_record_lines() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("Results");
        let mut sink = ResultSink::with_console(&out, Vec::new()).unwrap();

        sink.record(1, &rec(12.4, 2), false).unwrap();
        sink.record(1, &rec(7.6, 2), true).unwrap();
        sink.record(3, &rec(0.2, 0), true).unwrap();
        let console = sink.finish().unwrap();

        assert_eq!(
            String::from_utf8(console).unwrap(),
            "1,12,2\n1,8,2\n3,0,0\n"
        );
        assert_eq!(
            fs::read_to_string(out.join("all.txt")).unwrap(),
            "1,12,2\n1,8,2\n3,0,0\n"
        );
        assert_eq!(fs::read_to_string(out.join("1.txt")).unwrap(), "8 2\n");
        assert_eq!(fs::read_to_string(out.join("3.txt")).unwrap(), "0 0\n");
    }

    #[test]
    fn test_aggregate_flushed_per_record() {
        let dir = TempDir::new().unwrap();
        let mut sink = ResultSink::with_console(dir.path(), io::sink()).unwrap();
        sink.record(5, &rec(3.0, 4), false).unwrap();

        // Still open: the line must already be on disk.
        assert_eq!(
            fs::read_to_string(dir.path().join("all.txt")).unwrap(),
            "5,3,4\n"
        );
    }

    #[test]
    fn test_aggregate_truncated_per_file_appended() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("all.txt"), "stale\n").unwrap();
        fs::write(dir.path().join("2.txt"), "10 1\n").unwrap();

        let mut sink = ResultSink::with_console(dir.path(), io::sink()).unwrap();
        sink.record(2, &rec(20.0, 1), true).unwrap();
        sink.finish().unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("all.txt")).unwrap(),
            "2,20,1\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("2.txt")).unwrap(),
            "10 1\n20 1\n"
        );
    }

    #[test]
    fn test_unopenable_query_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        // A directory where the per-query file should be.
        fs::create_dir(dir.path().join("4.txt")).unwrap();

        let mut sink = ResultSink::with_console(dir.path(), io::sink()).unwrap();
        sink.record(4, &rec(1.0, 1), true).unwrap();
        sink.finish().unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("all.txt")).unwrap(),
            "4,1,1\n"
        );
    }

    #[test]
    fn test_unopenable_aggregate_is_fatal() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();

        let err = ResultSink::with_console(blocker.join("Results"), io::sink()).err().unwrap();
        assert_eq!(err.operation(), "open_results");
    }
}
