//! Compressed sparse row storage for edge scores.

/// A square sparse matrix in CSR layout.
///
/// Row `i` holds the outgoing edges of node `i`. Column indices within a
/// row are strictly increasing.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Csr {
    pub(crate) row_ptr: Vec<usize>,
    pub(crate) col_idx: Vec<usize>,
    pub(crate) values: Vec<f64>,
}

impl Csr {
    /// An empty matrix with `rows` rows.
    pub(crate) fn empty(rows: usize) -> Self {
        Self {
            row_ptr: vec![0; rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Merge pending `(row, col, value)` writes into this matrix.
    ///
    /// Later writes to the same cell overwrite earlier ones, and pending
    /// writes overwrite existing cells. The result has `rows` rows, which
    /// must cover every row already present.
    pub(crate) fn merged(&self, rows: usize, pending: &[(usize, usize, f64)]) -> Self {
        let existing = self.view().triplets();
        let mut entries: Vec<(usize, usize, f64)> = existing.chain(pending.iter().copied()).collect();

        // Stable sort keeps write order within a cell
        entries.sort_by_key(|&(r, c, _)| (r, c));

        let mut row_ptr = vec![0usize; rows + 1];
        let mut col_idx = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());

        let mut i = 0;
        while i < entries.len() {
            let (r, c, _) = entries[i];
            let mut last = i;
            while last + 1 < entries.len() && entries[last + 1].0 == r && entries[last + 1].1 == c {
                last += 1;
            }
            col_idx.push(c);
            values.push(entries[last].2);
            row_ptr[r + 1] += 1;
            i = last + 1;
        }

        for r in 0..rows {
            row_ptr[r + 1] += row_ptr[r];
        }

        Self {
            row_ptr,
            col_idx,
            values,
        }
    }

    pub(crate) fn view(&self) -> CsrView<'_> {
        CsrView {
            row_ptr: &self.row_ptr,
            col_idx: &self.col_idx,
            values: &self.values,
        }
    }
}

/// Borrowed CSR view of one cost type.
///
/// `values[row_ptr[i]..row_ptr[i + 1]]` are the scores of node `i`'s
/// outgoing edges, and `col_idx` over the same range holds their children.
///
/// # Example
///
/// ```
/// use walk_graph::{Graph, Point3};
///
/// let mut graph = Graph::new();
/// let a = graph.intern(Point3::new(0.0, 0.0, 0.0)).unwrap();
/// let b = graph.intern(Point3::new(1.0, 0.0, 0.0)).unwrap();
/// graph.add_edge(a, b, 1.0, "").unwrap();
/// graph.compress();
///
/// let csr = graph.csr_view("").unwrap();
/// assert_eq!(csr.rows(), 2);
/// assert_eq!(csr.nnz(), 1);
/// assert_eq!(csr.row_ptr(), &[0, 1, 1]);
/// assert_eq!(csr.get(a, b), Some(1.0));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CsrView<'a> {
    row_ptr: &'a [usize],
    col_idx: &'a [usize],
    values: &'a [f64],
}

impl<'a> CsrView<'a> {
    pub(crate) const fn new(row_ptr: &'a [usize], col_idx: &'a [usize], values: &'a [f64]) -> Self {
        Self {
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Number of rows (equal to the number of nodes).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.row_ptr.len().saturating_sub(1)
    }

    /// Number of columns. The matrix is square.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.rows()
    }

    /// Number of stored edges.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Row pointers (`rows + 1` entries).
    #[must_use]
    pub const fn row_ptr(&self) -> &'a [usize] {
        self.row_ptr
    }

    /// Column (child) index of every stored edge.
    #[must_use]
    pub const fn col_idx(&self) -> &'a [usize] {
        self.col_idx
    }

    /// Score of every stored edge.
    #[must_use]
    pub const fn values(&self) -> &'a [f64] {
        self.values
    }

    /// Range of `row`'s entries in [`col_idx`](Self::col_idx) and
    /// [`values`](Self::values). Empty for rows outside the matrix.
    #[must_use]
    pub fn row_range(&self, row: usize) -> std::ops::Range<usize> {
        if row + 1 < self.row_ptr.len() {
            self.row_ptr[row]..self.row_ptr[row + 1]
        } else {
            0..0
        }
    }

    /// Outgoing `(child, score)` pairs of `row` in column order.
    pub fn row(self, row: usize) -> impl Iterator<Item = (usize, f64)> + 'a {
        let range = self.row_range(row);
        self.col_idx[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Position of cell `(row, col)` in the value array, if stored.
    #[must_use]
    pub fn find(&self, row: usize, col: usize) -> Option<usize> {
        let range = self.row_range(row);
        let start = range.start;
        self.col_idx[range].binary_search(&col).ok().map(|i| start + i)
    }

    /// Score of edge `row -> col`, if stored.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.find(row, col).map(|i| self.values[i])
    }

    /// Every stored edge as `(row, col, value)`, row-major.
    pub fn triplets(self) -> impl Iterator<Item = (usize, usize, f64)> + 'a {
        let (row_ptr, col_idx, values) = (self.row_ptr, self.col_idx, self.values);
        (0..self.rows()).flat_map(move |r| {
            (row_ptr[r]..row_ptr[r + 1]).map(move |i| (r, col_idx[i], values[i]))
        })
    }
}
