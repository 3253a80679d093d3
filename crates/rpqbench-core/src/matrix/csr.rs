//! Boolean matrix in Compressed Sparse Row form.

use std::mem::size_of;

use rpqbench_common::VertexId;

/// Immutable boolean sparse matrix in CSR layout.
///
/// Row `i` spans `col_idx[row_ptr[i]..row_ptr[i + 1]]`. Columns within a row
/// are sorted and unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolMatrix {
    nrows: u64,
    ncols: u64,
    row_ptr: Vec<usize>,
    col_idx: Vec<VertexId>,
}

impl BoolMatrix {
    /// Largest row or column count whose row pointer array can be allocated.
    pub const MAX_DIMENSION: u64 = (isize::MAX as usize / size_of::<usize>() - 1) as u64;

    /// Creates an empty `nrows x ncols` matrix.
    ///
    /// # Panics
    ///
    /// Panics if `nrows` exceeds [`MAX_DIMENSION`](Self::MAX_DIMENSION).
    #[must_use]
    pub fn empty(nrows: u64, ncols: u64) -> Self {
        Self {
            nrows,
            ncols,
            row_ptr: vec![0; nrows as usize + 1],
            col_idx: Vec::new(),
        }
    }

    /// Builds a matrix from 0-based `(row, col)` entries.
    ///
    /// Duplicate entries collapse into one. Entries outside the declared
    /// dimensions are dropped; callers validate bounds before building.
    ///
    /// # Panics
    ///
    /// Panics if `nrows` exceeds [`MAX_DIMENSION`](Self::MAX_DIMENSION).
    #[must_use]
    pub fn from_entries(nrows: u64, ncols: u64, mut entries: Vec<(VertexId, VertexId)>) -> Self {
        entries.retain(|&(r, c)| r < nrows && c < ncols);
        entries.sort_unstable();
        entries.dedup();

        let mut row_ptr = vec![0usize; nrows as usize + 1];
        for &(r, _) in &entries {
            row_ptr[r as usize + 1] += 1;
        }
        for i in 0..nrows as usize {
            row_ptr[i + 1] += row_ptr[i];
        }

        let col_idx = entries.into_iter().map(|(_, c)| c).collect();

        Self {
            nrows,
            ncols,
            row_ptr,
            col_idx,
        }
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn nrows(&self) -> u64 {
        self.nrows
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub fn ncols(&self) -> u64 {
        self.ncols
    }

    /// Number of stored entries.
    #[inline]
    #[must_use]
    pub fn nvals(&self) -> usize {
        self.col_idx.len()
    }

    /// Returns the columns set in row `i`. Out-of-range rows are empty.
    #[inline]
    #[must_use]
    pub fn row(&self, i: VertexId) -> &[VertexId] {
        if i >= self.nrows {
            return &[];
        }
        let i = i as usize;
        &self.col_idx[self.row_ptr[i]..self.row_ptr[i + 1]]
    }

    /// Whether entry `(i, j)` is set.
    #[must_use]
    pub fn contains(&self, i: VertexId, j: VertexId) -> bool {
        self.row(i).binary_search(&j).is_ok()
    }

    /// Returns the rows with entry `j` set, by scanning every row.
    ///
    /// This is the fallback when no transpose is cached.
    pub fn column(&self, j: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.nrows).filter(move |&i| self.contains(i, j))
    }

    /// Iterates over all `(row, col)` entries in row-major order.
    pub fn entries(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        (0..self.nrows).flat_map(move |i| self.row(i).iter().map(move |&j| (i, j)))
    }

    /// Returns the transpose.
    #[must_use]
    pub fn transpose(&self) -> Self {
        // Counting sort by column keeps rows of the result sorted.
        let mut row_ptr = vec![0usize; self.ncols as usize + 1];
        for &c in &self.col_idx {
            row_ptr[c as usize + 1] += 1;
        }
        for i in 0..self.ncols as usize {
            row_ptr[i + 1] += row_ptr[i];
        }

        let mut next = row_ptr.clone();
        let mut col_idx = vec![0; self.col_idx.len()];
        for (r, c) in self.entries() {
            let slot = &mut next[c as usize];
            col_idx[*slot] = r;
            *slot += 1;
        }

        Self {
            nrows: self.ncols,
            ncols: self.nrows,
            row_ptr,
            col_idx,
        }
    }

    /// Approximate number of bytes owned by this matrix.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        size_of::<Self>()
            + self.row_ptr.capacity() * size_of::<usize>()
            + self.col_idx.capacity() * size_of::<VertexId>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chain() -> BoolMatrix {
        BoolMatrix::from_entries(3, 3, vec![(0, 1), (1, 2)])
    }

    #[test]
    fn test_rows() {
        let m = chain();
        assert_eq!(m.nvals(), 2);
        assert_eq!(m.row(0), &[1]);
        assert_eq!(m.row(1), &[2]);
        assert!(m.row(2).is_empty());
        assert!(m.row(99).is_empty());
    }

    #[test]
    fn test_duplicates_collapse() {
        let m = BoolMatrix::from_entries(2, 2, vec![(0, 1), (0, 1), (1, 0), (0, 0)]);
        assert_eq!(m.nvals(), 3);
        assert_eq!(m.row(0), &[0, 1]);
    }

    #[test]
    fn test_transpose() {
        let m = chain();
        let t = m.transpose();
        assert_eq!(t.row(1), &[0]);
        assert_eq!(t.row(2), &[1]);
        assert!(t.row(0).is_empty());
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn test_transpose_rectangular() {
        let m = BoolMatrix::from_entries(2, 4, vec![(0, 3), (1, 3), (1, 0)]);
        let t = m.transpose();
        assert_eq!(t.nrows(), 4);
        assert_eq!(t.ncols(), 2);
        assert_eq!(t.row(3), &[0, 1]);
        assert_eq!(t.row(0), &[1]);
    }

    #[test]
    fn test_column_scan_matches_transpose() {
        let m = BoolMatrix::from_entries(4, 4, vec![(0, 2), (1, 2), (3, 2), (2, 0)]);
        let scanned: Vec<_> = m.column(2).collect();
        assert_eq!(scanned, m.transpose().row(2));
    }

    fn entries() -> impl Strategy<Value = Vec<(u64, u64)>> {
        proptest::collection::vec((0u64..20, 0u64..30), 0..200)
    }

    proptest! {
        #[test]
        fn prop_transpose_involution(edges in entries()) {
            let m = BoolMatrix::from_entries(20, 30, edges);
            let t = m.transpose();
            prop_assert_eq!(t.nrows(), 30);
            prop_assert_eq!(t.nvals(), m.nvals());
            prop_assert_eq!(t.transpose(), m);
        }

        #[test]
        fn prop_rows_sorted_unique(edges in entries()) {
            let m = BoolMatrix::from_entries(20, 30, edges.clone());
            for i in 0..20 {
                prop_assert!(m.row(i).windows(2).all(|w| w[0] < w[1]));
            }
            for (i, j) in edges {
                prop_assert!(m.contains(i, j));
            }
        }
    }

    #[test]
    fn test_max_dimension_row_pointer_fits() {
        let len = usize::try_from(BoolMatrix::MAX_DIMENSION).unwrap() + 1;
        assert!(len.checked_mul(size_of::<usize>()).unwrap() <= isize::MAX as usize);
    }

    #[test]
    fn test_empty() {
        let m = BoolMatrix::empty(5, 5);
        assert_eq!(m.nvals(), 0);
        assert!(m.row(4).is_empty());
        assert!(m.memory_usage() >= 6 * size_of::<usize>());
    }
}
