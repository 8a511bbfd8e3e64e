//! Dense matrix support type for constant matrix parameters.

use std::fmt;

use nalgebra::{DMatrix, DVectorView, DVectorViewMut};

use crate::error::{MmpError, Result};

/// Dense matrix, built from row-major data.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix(DMatrix<f64>);

impl Matrix {
    /// Create a matrix from row-major data.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(MmpError::InvalidGraph(format!(
                "matrix must not be empty (got {}x{})",
                rows, cols
            )));
        }
        if data.len() != rows * cols {
            return Err(MmpError::DimensionMismatch {
                op: "matrix",
                expected: format!("{} values for {}x{}", rows * cols, rows, cols),
                got: data.len().to_string(),
            });
        }
        Ok(Matrix(DMatrix::from_row_slice(rows, cols, &data)))
    }

    /// Create a matrix from a list of equally long rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(MmpError::DimensionMismatch {
                op: "matrix",
                expected: format!("rows of length {}", cols),
                got: bad.len().to_string(),
            });
        }
        Self::from_row_major(rows.len(), cols, rows.concat())
    }

    pub fn rows(&self) -> usize {
        self.0.nrows()
    }

    pub fn cols(&self) -> usize {
        self.0.ncols()
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0[(row, col)]
    }

    /// Iterate over the entries of one row.
    pub fn row(&self, row: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.cols()).map(move |col| self.0[(row, col)])
    }

    /// Iterate over all rows.
    pub fn row_iter(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        (0..self.rows()).map(move |r| self.row(r).collect())
    }

    /// All entries in row-major order.
    pub fn values(&self) -> Vec<f64> {
        self.row_iter().flatten().collect()
    }

    /// Componentwise split into a nonnegative and a nonpositive part.
    ///
    /// Entries of the opposite sign become zero in each half, so the two
    /// halves add up to the original matrix.
    pub fn split(&self) -> (Matrix, Matrix) {
        (
            Matrix(self.0.map(|v| v.max(0.0))),
            Matrix(self.0.map(|v| v.min(0.0))),
        )
    }

    /// Plain matrix-vector product.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.rows()];
        self.mul_vec_into(v, &mut out, 0.0);
        out
    }

    /// `out = self * v + beta * out`, without allocating.
    ///
    /// `v` must have `cols()` entries and `out` must have `rows()` entries.
    pub fn mul_vec_into(&self, v: &[f64], out: &mut [f64], beta: f64) {
        let v = DVectorView::from_slice(v, v.len());
        let rows = out.len();
        let mut out = DVectorViewMut::from_slice(out, rows);
        out.gemv(1.0, &self.0, &v, beta);
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for r in 0..self.rows() {
            if r > 0 {
                write!(f, "; ")?;
            }
            let row: Vec<String> = self.row(r).map(|v| format!("{:.3}", v)).collect();
            write!(f, "{}", row.join(", "))?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let m = Matrix::from_row_major(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.get(0, 2), 3.0);
        assert_eq!(m.get(1, 0), 4.0);
        assert_eq!(m.row(1).collect::<Vec<_>>(), vec![4.0, 5.0, 6.0]);
        assert_eq!(m.values(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_from_rows() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.row_iter().collect::<Vec<_>>(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert!(Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
    }

    #[test]
    fn test_wrong_length() {
        assert!(matches!(
            Matrix::from_row_major(2, 2, vec![1.0, 2.0, 3.0]),
            Err(MmpError::DimensionMismatch { .. })
        ));
        assert!(Matrix::from_row_major(0, 2, vec![]).is_err());
    }

    #[test]
    fn test_split() {
        let m = Matrix::from_row_major(2, 2, vec![1.0, -2.0, 0.0, -4.0]).unwrap();
        let (pos, neg) = m.split();
        assert_eq!(pos.values(), vec![1.0, 0.0, 0.0, 0.0]);
        assert_eq!(neg.values(), vec![0.0, -2.0, 0.0, -4.0]);
    }

    #[test]
    fn test_mul_vec() {
        let m = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m.mul_vec(&[1.0, 1.0]), vec![3.0, 7.0]);
    }

    #[test]
    fn test_mul_vec_into_accumulates() {
        let m = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let mut out = [10.0, 20.0];
        m.mul_vec_into(&[1.0, 0.0], &mut out, 1.0);
        assert_eq!(out, [11.0, 23.0]);
        m.mul_vec_into(&[0.0, 1.0], &mut out, 0.0);
        assert_eq!(out, [2.0, 4.0]);
    }
}
