//! Fan-out/fan-in row filtering
//!
//! Row indices are split into contiguous partitions, each partition is
//! evaluated independently on the rayon pool, and the surviving indices are
//! concatenated in partition order, so the result keeps the original row
//! order whatever the partition count.

use ndarray::ArrayView1;
use rayon::prelude::*;

use crate::data::ExpressionMatrix;
use crate::error::{Result, XpressError};

/// Optional inclusive bounds applied to every value of a row
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RowBounds {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

/// Keep the rows for which `predicate` returns true
///
/// Partitions share nothing but the read-only matrix; `n_partitions` only
/// affects scheduling, never the result.
pub fn par_filter_rows<F>(
    matrix: &ExpressionMatrix,
    predicate: F,
    bounds: RowBounds,
    n_partitions: usize,
) -> Result<ExpressionMatrix>
where
    F: Fn(ArrayView1<f64>, &RowBounds) -> bool + Sync,
{
    if n_partitions == 0 {
        return Err(XpressError::InvalidArgument {
            reason: "Number of partitions must be at least 1".to_string(),
        });
    }

    let n_genes = matrix.n_genes();
    let chunk_size = n_genes.div_ceil(n_partitions).max(1);
    let values = matrix.values();

    let partitions: Vec<Vec<usize>> = (0..n_genes)
        .step_by(chunk_size)
        .collect::<Vec<usize>>()
        .into_par_iter()
        .map(|start| {
            let end = (start + chunk_size).min(n_genes);
            (start..end)
                .filter(|&i| predicate(values.row(i), &bounds))
                .collect()
        })
        .collect();

    let keep: Vec<usize> = partitions.into_iter().flatten().collect();

    log::debug!(
        "Row filter: {} of {} genes kept across {} partitions",
        keep.len(),
        n_genes,
        n_genes.div_ceil(chunk_size)
    );

    matrix.subset_genes(&keep)
}
