use crate::math::matrix::Matrix;

/// Mean-squared error of an error column: `sum(cell²) / rows`.
///
/// Used both as the reported training loss and as the per-example weight
/// applied to that example's gradient. An empty error matrix has zero loss.
pub fn mean_squared_error(error: &Matrix) -> f64 {
    if error.rows == 0 {
        return 0.0;
    }
    let sum: f64 = error.data.iter().flatten().map(|e| e * e).sum();
    sum / error.rows as f64
}
