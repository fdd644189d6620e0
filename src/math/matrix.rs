use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::activation::sigmoid;
use crate::error::{NetworkError, Result};

/// Dense row-major grid of `f64`, addressed `data[row][col]`.
///
/// Serializes as a bare nested array of rows (`[[1.0, 2.0], [3.0, 4.0]]`),
/// which keeps saved models readable and compatible with plain JSON tooling.
/// Ragged rows are rejected on the way in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Builds a matrix from rows. The column count is taken from the first
    /// row and every other row must match it; an empty `data` gives a 0×0
    /// matrix.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let matrix = Matrix {
            rows: data.len(),
            cols: data.first().map_or(0, Vec::len),
            data,
        };
        matrix.ensure_rectangular()?;
        Ok(matrix)
    }

    /// Column vector (`values.len()` rows, one column).
    pub fn column(values: &[f64]) -> Matrix {
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.iter().map(|&v| vec![v]).collect(),
        }
    }

    /// Fills every cell with `f(row, col)`.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Matrix
    where
        F: FnMut(usize, usize) -> f64,
    {
        let data = (0..rows)
            .map(|i| (0..cols).map(|j| f(i, j)).collect())
            .collect();
        Matrix { rows, cols, data }
    }

    /// Standard-normal samples multiplied by `scale`.
    pub fn normal<R: Rng + ?Sized>(rows: usize, cols: usize, scale: f64, rng: &mut R) -> Matrix {
        Matrix::from_fn(rows, cols, |_, _| rng.sample::<f64, _>(StandardNormal) * scale)
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get(row).and_then(|r| r.get(col)).copied()
    }

    /// First column as a flat vector; the natural read-out of a column matrix.
    pub fn column_values(&self) -> Vec<f64> {
        self.data.iter().filter_map(|row| row.first().copied()).collect()
    }

    /// Row index of the largest value in the first column.
    pub fn argmax(&self) -> Option<usize> {
        self.column_values()
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
    }

    pub fn transpose(&self) -> Matrix {
        Matrix::from_fn(self.cols, self.rows, |i, j| self.data[j][i])
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Matrix product `self · rhs`; needs `self.cols == rhs.rows`.
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        self.ensure_rectangular()?;
        rhs.ensure_rectangular()?;
        if self.cols != rhs.rows {
            return Err(self.mismatch("multiply", rhs));
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);
        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }
                res.data[i][j] = sum;
            }
        }
        Ok(res)
    }

    pub fn add(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("add", rhs, |a, b| a + b)
    }

    /// Element-wise (Hadamard) product.
    pub fn elementwise_multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("elementwise_multiply", rhs, |a, b| a * b)
    }

    pub fn scalar_multiply(&self, scalar: f64) -> Matrix {
        self.map(|x| x * scalar)
    }

    /// In-place `self += rhs * scalar`, the one mutation training needs.
    pub fn add_scaled(&mut self, rhs: &Matrix, scalar: f64) -> Result<()> {
        self.ensure_rectangular()?;
        rhs.ensure_rectangular()?;
        if self.shape() != rhs.shape() {
            return Err(self.mismatch("add_scaled", rhs));
        }
        for (row, rhs_row) in self.data.iter_mut().zip(&rhs.data) {
            for (cell, &r) in row.iter_mut().zip(rhs_row) {
                *cell += r * scalar;
            }
        }
        Ok(())
    }

    /// Logistic sigmoid of every cell.
    pub fn activate(&self) -> Matrix {
        self.map(sigmoid::function)
    }

    /// Sigmoid derivative of every cell, where the cells are pre-activation sums.
    pub fn activate_derivative(&self) -> Matrix {
        self.map(sigmoid::derivative)
    }

    fn zip_with<F>(&self, op: &'static str, rhs: &Matrix, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.ensure_rectangular()?;
        rhs.ensure_rectangular()?;
        if self.shape() != rhs.shape() {
            return Err(self.mismatch(op, rhs));
        }
        Ok(Matrix::from_fn(self.rows, self.cols, |i, j| {
            f(self.data[i][j], rhs.data[i][j])
        }))
    }

    /// `data` must hold exactly `rows` rows of `cols` cells each.
    fn ensure_rectangular(&self) -> Result<()> {
        if self.data.len() != self.rows {
            return Err(NetworkError::RaggedRows {
                row: self.data.len().min(self.rows),
                expected: self.cols,
                found: 0,
            });
        }
        match self.data.iter().position(|row| row.len() != self.cols) {
            Some(row) => Err(NetworkError::RaggedRows {
                row,
                expected: self.cols,
                found: self.data[row].len(),
            }),
            None => Ok(()),
        }
    }

    fn mismatch(&self, op: &'static str, rhs: &Matrix) -> NetworkError {
        NetworkError::ShapeMismatch {
            op,
            left: self.shape(),
            right: rhs.shape(),
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = NetworkError;

    fn try_from(data: Vec<Vec<f64>>) -> Result<Self> {
        Matrix::from_data(data)
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(matrix: Matrix) -> Self {
        matrix.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn m(data: &[&[f64]]) -> Matrix {
        Matrix::from_data(data.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn arb_matrix() -> impl Strategy<Value = Matrix> {
        (1usize..6, 1usize..6).prop_flat_map(|(rows, cols)| {
            prop::collection::vec(prop::collection::vec(-100.0f64..100.0, cols), rows)
                .prop_map(|data| Matrix::from_data(data).unwrap())
        })
    }

    fn arb_same_shape_pair() -> impl Strategy<Value = (Matrix, Matrix)> {
        (1usize..6, 1usize..6).prop_flat_map(|(rows, cols)| {
            let cells = || prop::collection::vec(prop::collection::vec(-100.0f64..100.0, cols), rows);
            (cells(), cells())
                .prop_map(|(a, b)| (Matrix::from_data(a).unwrap(), Matrix::from_data(b).unwrap()))
        })
    }

    #[test]
    fn multiply_computes_row_by_column_sums() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let b = m(&[&[7.0, 8.0], &[9.0, 10.0], &[11.0, 12.0]]);
        let c = a.multiply(&b).unwrap();
        assert_eq!(c, m(&[&[58.0, 64.0], &[139.0, 154.0]]));
    }

    #[test]
    fn multiply_rejects_mismatched_inner_dimensions() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        match a.multiply(&b) {
            Err(NetworkError::ShapeMismatch { op, left, right }) => {
                assert_eq!(op, "multiply");
                assert_eq!(left, (2, 3));
                assert_eq!(right, (2, 3));
            }
            other => panic!("expected ShapeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn add_and_hadamard_reject_different_shapes() {
        let a = Matrix::zeros(2, 2);
        let b = Matrix::zeros(2, 1);
        assert!(matches!(a.add(&b), Err(NetworkError::ShapeMismatch { op: "add", .. })));
        assert!(matches!(
            a.elementwise_multiply(&b),
            Err(NetworkError::ShapeMismatch { op: "elementwise_multiply", .. })
        ));
    }

    #[test]
    fn elementwise_and_scalar_products() {
        let a = m(&[&[1.0, -2.0], &[3.0, 4.0]]);
        let b = m(&[&[2.0, 2.0], &[0.5, -1.0]]);
        assert_eq!(a.elementwise_multiply(&b).unwrap(), m(&[&[2.0, -4.0], &[1.5, -4.0]]));
        assert_eq!(a.scalar_multiply(-1.0), m(&[&[-1.0, 2.0], &[-3.0, -4.0]]));
    }

    #[test]
    fn transpose_reverses_shape() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let t = a.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.get(2, 1), Some(6.0));
        assert_eq!(t.get(0, 1), Some(4.0));
    }

    #[test]
    fn add_scaled_updates_in_place() {
        let mut a = m(&[&[1.0], &[1.0]]);
        a.add_scaled(&m(&[&[2.0], &[-4.0]]), 0.5).unwrap();
        assert_eq!(a, m(&[&[2.0], &[-1.0]]));
        assert!(a.add_scaled(&Matrix::zeros(1, 2), 1.0).is_err());
    }

    #[test]
    fn activation_maps_into_unit_interval() {
        let z = m(&[&[0.0], &[-800.0], &[800.0]]);
        let a = z.activate();
        assert_relative_eq!(a.data[0][0], 0.5);
        assert!(a.data[1][0] >= 0.0 && a.data[1][0] < 1e-300);
        assert_relative_eq!(a.data[2][0], 1.0);

        let d = z.activate_derivative();
        assert_relative_eq!(d.data[0][0], 0.25);
        assert_relative_eq!(d.data[2][0], 0.0);
    }

    #[test]
    fn argmax_of_column() {
        assert_eq!(Matrix::column(&[0.1, 0.7, 0.2]).argmax(), Some(1));
        assert_eq!(Matrix::default().argmax(), None);
    }

    #[test]
    fn serializes_as_nested_rows() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "[[1.0,2.0],[3.0,4.0]]");
        let back: Matrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
        let empty: Matrix = serde_json::from_str("[]").unwrap();
        assert_eq!(empty.shape(), (0, 0));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, NetworkError::RaggedRows { row: 1, expected: 2, found: 1 }));
        assert!(Matrix::from_data(vec![vec![0.1], vec![]]).is_err());
        assert!(serde_json::from_str::<Matrix>("[[1.0,2.0],[3.0]]").is_err());
    }

    #[test]
    fn ops_on_hand_edited_ragged_matrix_fail_instead_of_panicking() {
        let mut ragged = Matrix::zeros(2, 2);
        ragged.data[1].pop();
        let square = Matrix::zeros(2, 2);
        assert!(matches!(ragged.add(&square), Err(NetworkError::RaggedRows { row: 1, .. })));
        assert!(matches!(square.elementwise_multiply(&ragged), Err(NetworkError::RaggedRows { .. })));
        assert!(matches!(ragged.multiply(&square), Err(NetworkError::RaggedRows { .. })));
        assert!(matches!(square.multiply(&ragged), Err(NetworkError::RaggedRows { .. })));
        let mut target = Matrix::zeros(2, 2);
        assert!(target.add_scaled(&ragged, 1.0).is_err());
        assert_eq!(target, square);

        let mut short = Matrix::zeros(2, 1);
        short.data.pop();
        assert!(matches!(short.add(&Matrix::zeros(2, 1)), Err(NetworkError::RaggedRows { .. })));
    }

    #[test]
    fn normal_samples_are_scaled_and_centered() {
        let mut rng = StdRng::seed_from_u64(7);
        let w = Matrix::normal(100, 100, 0.1, &mut rng);
        let cells: Vec<f64> = w.data.iter().flatten().copied().collect();
        let mean = cells.iter().sum::<f64>() / cells.len() as f64;
        let var = cells.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / cells.len() as f64;
        assert!(mean.abs() < 0.01, "mean {}", mean);
        assert!((var.sqrt() - 0.1).abs() < 0.01, "std {}", var.sqrt());
    }

    proptest! {
        #[test]
        fn transpose_is_an_involution(a in arb_matrix()) {
            prop_assert_eq!(a.transpose().transpose(), a);
        }

        #[test]
        fn add_is_commutative((a, b) in arb_same_shape_pair()) {
            prop_assert_eq!(a.add(&b).unwrap(), b.add(&a).unwrap());
        }

        #[test]
        fn product_shape_follows_outer_dimensions(a in arb_matrix(), cols in 1usize..6) {
            let b = Matrix::zeros(a.cols, cols);
            let c = a.multiply(&b).unwrap();
            prop_assert_eq!(c.shape(), (a.rows, cols));
        }
    }
}
