//! Lazily populated cache of dataset graphs, one slot per label.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use parking_lot::Mutex;
use rpqbench_common::{Label, Result};
use tracing::debug;

use super::LabeledGraph;

/// Outcome of [`LabelStore::ensure_loaded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The label was read from disk by this call.
    Loaded,
    /// The label was already present; nothing was read.
    AlreadyLoaded,
    /// The label has no dataset file (or lies outside the label range).
    NotFound,
}

/// Totals reported by [`LabelStore::bulk_preload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreloadSummary {
    /// Labels present after the preload.
    pub loaded: usize,
    /// Bytes held by all present adjacency and transpose matrices.
    pub memory_bytes: usize,
}

#[derive(Default)]
struct Slot {
    entry: OnceLock<LabeledGraph>,
    load_guard: Mutex<()>,
}

/// Cache of per-label dataset graphs.
///
/// Slots are filled at most once, on first successful load, and live for
/// the lifetime of the store. A label whose file is missing simply stays
/// empty. First loads of a label are serialized by a per-slot lock; reads of
/// an already loaded slot take no lock.
pub struct LabelStore {
    dataset_dir: PathBuf,
    cache_transposed: bool,
    slots: Vec<Slot>,
}

impl LabelStore {
    /// Creates an empty store for labels `1..=label_count`.
    pub fn new(dataset_dir: impl Into<PathBuf>, label_count: usize, cache_transposed: bool) -> Self {
        Self {
            dataset_dir: dataset_dir.into(),
            cache_transposed,
            slots: (0..label_count).map(|_| Slot::default()).collect(),
        }
    }

    /// Number of label slots.
    #[must_use]
    pub fn label_count(&self) -> usize {
        self.slots.len()
    }

    /// Directory holding `<label>.txt` files.
    #[must_use]
    pub fn dataset_dir(&self) -> &Path {
        &self.dataset_dir
    }

    /// Path of the dataset file for `label`.
    #[must_use]
    pub fn label_path(&self, label: Label) -> PathBuf {
        self.dataset_dir.join(format!("{label}.txt"))
    }

    /// Loads `label` unless it is already present.
    ///
    /// # Errors
    ///
    /// Returns an error if the label file exists but is unreadable or
    /// malformed. A missing file is reported as [`LoadOutcome::NotFound`].
    pub fn ensure_loaded(&self, label: Label) -> Result<LoadOutcome> {
        let Some(slot) = self.slots.get(label.slot()) else {
            debug!(%label, "label outside 1..={}", self.slots.len());
            return Ok(LoadOutcome::NotFound);
        };

        if slot.entry.get().is_some() {
            return Ok(LoadOutcome::AlreadyLoaded);
        }

        let _guard = slot.load_guard.lock();
        if slot.entry.get().is_some() {
            return Ok(LoadOutcome::AlreadyLoaded);
        }

        debug!(%label, "loading adjacency matrix");
        let path = self.label_path(label);
        let Some(graph) = LabeledGraph::load(&path, self.cache_transposed)? else {
            debug!(%label, path = %path.display(), "skipped loading adjacency matrix");
            return Ok(LoadOutcome::NotFound);
        };

        // The guard is held, so no other thread can have filled the slot.
        let _ = slot.entry.set(graph);
        debug!(%label, "successfully loaded adjacency matrix");
        Ok(LoadOutcome::Loaded)
    }

    /// Attempts to load every label in order.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`ensure_loaded`](Self::ensure_loaded).
    pub fn bulk_preload(&self) -> Result<PreloadSummary> {
        debug!("loading the matrices");

        for id in 1..=self.slots.len() as u64 {
            if let Some(label) = Label::new(id) {
                self.ensure_loaded(label)?;
            }
        }

        let summary = PreloadSummary {
            loaded: self.loaded_count(),
            memory_bytes: self.memory_usage(),
        };
        debug!(
            loaded = summary.loaded,
            memory_bytes = summary.memory_bytes,
            "matrix load has been completed"
        );
        Ok(summary)
    }

    /// Returns the graph for `label` if it has been loaded.
    #[must_use]
    pub fn get(&self, label: Label) -> Option<&LabeledGraph> {
        self.slots.get(label.slot())?.entry.get()
    }

    /// Number of labels currently present.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.slots.iter().filter(|s| s.entry.get().is_some()).count()
    }

    /// Bytes held by all present graphs.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.slots
            .iter()
            .filter_map(|s| s.entry.get())
            .map(LabeledGraph::memory_usage)
            .sum()
    }
}
