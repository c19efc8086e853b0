//! Dense input-output use matrix.
//!
//! Cell `(i, j)` holds sector `i`'s use of sector `j`'s output. The matrix is
//! not required to be square; the graph builder only turns the leading
//! `min(rows, cols)` square block into edges, while row and column totals
//! always span the full matrix.

use nalgebra::DMatrix;

use crate::error::{AnalysisError, Result};

/// A dense, finite R×C matrix of economic flows.
#[derive(Debug, Clone, PartialEq)]
pub struct UseMatrix {
    cells: DMatrix<f64>,
}

impl UseMatrix {
    /// Build a matrix from row vectors.
    ///
    /// An empty slice produces a 0×0 matrix.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidMatrix`] if rows differ in length or
    /// any cell is NaN or infinite.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);

        for (i, row) in rows.iter().enumerate() {
            if row.len() != ncols {
                return Err(AnalysisError::InvalidMatrix(format!(
                    "row {i} has {} columns, expected {ncols}",
                    row.len()
                )));
            }
            if let Some(j) = row.iter().position(|v| !v.is_finite()) {
                return Err(AnalysisError::InvalidMatrix(format!(
                    "cell ({i}, {j}) is not a finite number"
                )));
            }
        }

        let cells = DMatrix::from_fn(nrows, ncols, |i, j| rows[i][j]);
        Ok(Self { cells })
    }

    /// Wrap an existing nalgebra matrix.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidMatrix`] if any cell is non-finite.
    pub fn from_dmatrix(cells: DMatrix<f64>) -> Result<Self> {
        if let Some(idx) = cells.iter().position(|v| !v.is_finite()) {
            // nalgebra storage is column-major.
            let (i, j) = (idx % cells.nrows(), idx / cells.nrows());
            return Err(AnalysisError::InvalidMatrix(format!(
                "cell ({i}, {j}) is not a finite number"
            )));
        }
        Ok(Self { cells })
    }

    #[must_use]
    pub fn nrows(&self) -> usize {
        self.cells.nrows()
    }

    #[must_use]
    pub fn ncols(&self) -> usize {
        self.cells.ncols()
    }

    /// Number of sectors represented in the graph: `min(rows, cols)`.
    #[must_use]
    pub fn sector_count(&self) -> usize {
        self.nrows().min(self.ncols())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Value at row `i`, column `j`.
    ///
    /// # Panics
    ///
    /// Panics if the indices are out of bounds.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[(i, j)]
    }

    /// Sum of row `i` over every column.
    #[must_use]
    pub fn row_sum(&self, i: usize) -> f64 {
        self.cells.row(i).sum()
    }

    /// Sum of column `j` over every row.
    #[must_use]
    pub fn column_sum(&self, j: usize) -> f64 {
        self.cells.column(j).sum()
    }

    /// Largest cell in the whole matrix, `None` when empty.
    #[must_use]
    pub fn max_value(&self) -> Option<f64> {
        if self.cells.is_empty() {
            None
        } else {
            Some(self.cells.max())
        }
    }

    /// Sum of all cells.
    #[must_use]
    pub fn total_flow(&self) -> f64 {
        self.cells.sum()
    }

    #[must_use]
    pub const fn as_dmatrix(&self) -> &DMatrix<f64> {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rows_make_empty_matrix() {
        let m = UseMatrix::from_rows(&[]).expect("empty is valid");
        assert!(m.is_empty());
        assert_eq!(m.sector_count(), 0);
        assert_eq!(m.max_value(), None);
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = UseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).expect_err("ragged");
        assert!(matches!(err, AnalysisError::InvalidMatrix(_)));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn non_finite_cell_rejected() {
        let err = UseMatrix::from_rows(&[vec![1.0, f64::NAN]]).expect_err("nan");
        assert!(err.to_string().contains("(0, 1)"));
    }

    #[test]
    fn dmatrix_reports_row_major_position() {
        let mut cells = DMatrix::<f64>::zeros(2, 3);
        cells[(1, 2)] = f64::INFINITY;
        let err = UseMatrix::from_dmatrix(cells).expect_err("inf");
        assert!(err.to_string().contains("(1, 2)"), "got {err}");
    }

    #[test]
    fn sums_span_full_rectangular_matrix() {
        // 2 rows × 3 cols: sector count is 2 but sums use all 3 columns.
        let m = UseMatrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]])
            .expect("valid");
        assert_eq!(m.sector_count(), 2);
        assert!((m.row_sum(0) - 6.0).abs() < 1e-12);
        assert!((m.row_sum(1) - 15.0).abs() < 1e-12);
        assert!((m.column_sum(0) - 5.0).abs() < 1e-12);
        assert!((m.column_sum(2) - 9.0).abs() < 1e-12);
        assert_eq!(m.max_value(), Some(6.0));
        assert!((m.total_flow() - 21.0).abs() < 1e-12);
        assert!((m.get(1, 2) - 6.0).abs() < f64::EPSILON);
    }
}
