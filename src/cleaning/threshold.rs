//! Count threshold filtering

use ndarray::ArrayView1;

use super::parallel::{par_filter_rows, RowBounds};
use crate::data::ExpressionMatrix;
use crate::error::Result;

/// True if every value of `row` satisfies each supplied bound (inclusive)
///
/// Missing values never satisfy a bound.
pub fn row_within_bounds(row: ArrayView1<f64>, bounds: &RowBounds) -> bool {
    row.iter().all(|&v| {
        bounds.minimum.map_or(true, |min| v >= min) && bounds.maximum.map_or(true, |max| v <= max)
    })
}

/// Keep genes whose values all lie within `[minimum, maximum]`
///
/// Either bound may be omitted; with neither, the matrix is returned as is.
/// The bounds are applied independently, so `minimum > maximum` keeps no gene.
/// Rows are evaluated on the rayon pool with one partition per thread.
pub fn threshold(
    matrix: &ExpressionMatrix,
    minimum: Option<f64>,
    maximum: Option<f64>,
) -> Result<ExpressionMatrix> {
    threshold_with_partitions(matrix, minimum, maximum, rayon::current_num_threads())
}

/// Threshold filtering with an explicit partition count
pub fn threshold_with_partitions(
    matrix: &ExpressionMatrix,
    minimum: Option<f64>,
    maximum: Option<f64>,
    n_partitions: usize,
) -> Result<ExpressionMatrix> {
    if minimum.is_none() && maximum.is_none() {
        return Ok(matrix.clone());
    }

    let bounds = RowBounds { minimum, maximum };
    let result = par_filter_rows(matrix, row_within_bounds, bounds, n_partitions)?;

    log::info!(
        "Threshold filter kept {} of {} genes",
        result.n_genes(),
        matrix.n_genes()
    );

    Ok(result)
}
