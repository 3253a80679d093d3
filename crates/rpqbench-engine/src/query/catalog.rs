//! Loading query descriptions and their transition graphs from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rpqbench_common::{Error, QueryNumber, QueryParseError, Result, SignedLabel};
use rpqbench_core::LabeledGraph;
use tracing::{debug, warn};

use super::{Query, parse_description};

/// Every query of a run, indexed by 1-based query number.
///
/// A slot is `None` when its description file does not exist or does not
/// parse.
#[derive(Debug, Clone, Default)]
pub struct QueryCatalog {
    queries: Vec<Option<Query>>,
}

impl QueryCatalog {
    /// Loads queries `1..=query_count` from `query_dir`.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`load_query`](Self::load_query).
    pub fn load_all(query_dir: &Path, query_count: usize) -> Result<Self> {
        debug!("loading the queries");

        let queries = (1..=query_count)
            .map(|number| Self::load_query(query_dir, number))
            .collect::<Result<Vec<_>>>()?;

        let catalog = Self { queries };
        debug!(
            loaded = catalog.loaded_count(),
            total = query_count,
            "query load has been completed"
        );
        Ok(catalog)
    }

    /// Loads query `number`, or `None` if its description is missing or
    /// malformed.
    ///
    /// Transition graphs are loaded with their transpose cached. A missing
    /// transition file leaves that label without a graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the description is unreadable, if it declares
    /// more states or labels than allowed, or if a transition file exists
    /// but cannot be parsed.
    pub fn load_query(query_dir: &Path, number: QueryNumber) -> Result<Option<Query>> {
        let meta = Self::meta_path(query_dir, number);
        let text = match fs::read_to_string(&meta) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(query = number, path = %meta.display(), "skipped loading query");
                return Ok(None);
            }
            Err(e) => return Err(Error::io("load_query", meta, e)),
        };

        let description = match parse_description(&text) {
            Ok(description) => description,
            Err(source @ QueryParseError::TooMany { .. }) => {
                return Err(Error::Query {
                    query: number,
                    source,
                });
            }
            Err(e) => {
                warn!(query = number, error = %e, "skipping malformed query");
                return Ok(None);
            }
        };

        let mut graphs = Vec::with_capacity(description.labels.len());
        for &label in &description.labels {
            let path = Self::transition_path(query_dir, number, label);
            let graph = LabeledGraph::load(&path, true)?;
            if graph.is_none() {
                debug!(query = number, %label, "no transition matrix for label");
            }
            graphs.push(graph);
        }

        debug!(query = number, "successfully loaded query");
        Ok(Some(Query::new(number, description, graphs)))
    }

    /// Path of the description file of query `number`.
    #[must_use]
    pub fn meta_path(query_dir: &Path, number: QueryNumber) -> PathBuf {
        query_dir.join(number.to_string()).join("meta.txt")
    }

    /// Path of the transition file of `label` in query `number`.
    ///
    /// The file is named by the label as declared, so an inverse label
    /// `-3` reads `-3.txt`.
    #[must_use]
    pub fn transition_path(query_dir: &Path, number: QueryNumber, label: SignedLabel) -> PathBuf {
        query_dir
            .join(number.to_string())
            .join(format!("{label}.txt"))
    }

    /// Returns query `number`, if present.
    #[must_use]
    pub fn get(&self, number: QueryNumber) -> Option<&Query> {
        self.queries.get(number.checked_sub(1)?)?.as_ref()
    }

    /// Number of query slots, present or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Whether the catalog has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Number of present queries.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.queries.iter().filter(|q| q.is_some()).count()
    }

    /// Iterates over `(number, slot)` in ascending query number.
    pub fn iter(&self) -> impl Iterator<Item = (QueryNumber, Option<&Query>)> + '_ {
        self.queries
            .iter()
            .enumerate()
            .map(|(i, q)| (i + 1, q.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryKind;
    use tempfile::TempDir;

    const CHAIN: &str = "%%MatrixMarket matrix coordinate pattern general\n3 3 2\n1 2\n2 3\n";

    fn write_query(dir: &Path, number: QueryNumber, meta: &str) -> PathBuf {
        let qdir = dir.join(number.to_string());
        fs::create_dir_all(&qdir).unwrap();
        fs::write(qdir.join("meta.txt"), meta).unwrap();
        qdir
    }

    #[test]
    fn test_missing_queries_are_absent() {
        let dir = TempDir::new().unwrap();
        write_query(dir.path(), 2, "1 0 1 1 1 1 0");

        let catalog = QueryCatalog::load_all(dir.path(), 3).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.loaded_count(), 1);
        assert!(catalog.get(1).is_none());
        assert!(catalog.get(2).is_some());
        assert!(catalog.get(3).is_none());
        assert!(catalog.get(0).is_none());
        assert!(catalog.get(4).is_none());

        let present: Vec<QueryNumber> = catalog
            .iter()
            .filter_map(|(n, q)| q.map(|_| n))
            .collect();
        assert_eq!(present, vec![2]);
    }

    #[test]
    fn test_transition_graphs_loaded() {
        let dir = TempDir::new().unwrap();
        let qdir = write_query(dir.path(), 1, "1 0 1 1 1 1 2 1 2");
        fs::write(qdir.join("1.txt"), CHAIN).unwrap();

        let query = QueryCatalog::load_query(dir.path(), 1).unwrap().unwrap();
        assert_eq!(query.kind(), QueryKind::SingleSource);
        let graph = query.labels()[0].graph().unwrap();
        assert_eq!(graph.adjacency().nvals(), 2);
        assert!(graph.transpose().is_some());
        assert!(query.labels()[1].graph().is_none());
    }

    #[test]
    fn test_inverse_transition_file_keeps_sign() {
        let dir = TempDir::new().unwrap();
        let qdir = write_query(dir.path(), 7, "0 2 1 1 1 2 1 -3");
        fs::write(qdir.join("3.txt"), CHAIN).unwrap();

        let label = SignedLabel::new(-3).unwrap();
        let path = QueryCatalog::transition_path(dir.path(), 7, label);
        assert_eq!(path, dir.path().join("7").join("-3.txt"));

        // Only the absolute-valued file exists: not picked up.
        let query = QueryCatalog::load_query(dir.path(), 7).unwrap().unwrap();
        assert!(query.labels()[0].is_inverse());
        assert!(query.labels()[0].graph().is_none());

        fs::write(qdir.join("-3.txt"), CHAIN).unwrap();
        let query = QueryCatalog::load_query(dir.path(), 7).unwrap().unwrap();
        assert!(query.labels()[0].graph().is_some());
    }

    #[test]
    fn test_bound_violation_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_query(dir.path(), 1, "1 0 1 1 1 1 0");
        write_query(dir.path(), 2, "1 0 20");

        let err = QueryCatalog::load_all(dir.path(), 2).unwrap_err();
        assert_eq!(err.operation(), "load_query");
        assert!(matches!(
            err,
            Error::Query {
                query: 2,
                source: QueryParseError::TooMany { .. }
            }
        ));
    }

    #[test]
    fn test_malformed_description_is_skipped() {
        let dir = TempDir::new().unwrap();
        write_query(dir.path(), 1, "1 0 1 1 1 1 0");
        write_query(dir.path(), 2, "1 0 1 one 1 1 0");
        write_query(dir.path(), 3, "1 0 1 0 1 1 0");
        write_query(dir.path(), 4, "1 0 1 1 1 1 2 -3 -3");

        let catalog = QueryCatalog::load_all(dir.path(), 4).unwrap();
        assert_eq!(catalog.loaded_count(), 1);
        assert!(catalog.get(1).is_some());
        for number in 2..=4 {
            assert!(catalog.get(number).is_none());
        }
    }

    #[test]
    fn test_malformed_transition_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let qdir = write_query(dir.path(), 1, "1 0 1 1 1 1 1 1");
        fs::write(qdir.join("1.txt"), "not a matrix\n").unwrap();

        let err = QueryCatalog::load_query(dir.path(), 1).unwrap_err();
        assert_eq!(err.operation(), "load_matrix");
    }

    #[test]
    fn test_meta_path() {
        let path = QueryCatalog::meta_path(Path::new("queries"), 12);
        assert_eq!(path, Path::new("queries").join("12").join("meta.txt"));
    }
}
