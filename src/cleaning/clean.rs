//! Removal of incomplete and duplicated entries

use std::collections::HashMap;

use ndarray::Axis;

use crate::data::ExpressionMatrix;
use crate::error::Result;

/// Axis along which incomplete entries are dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanAxis {
    /// Drop genes with any missing value
    #[default]
    Rows,
    /// Drop samples with any missing value
    Columns,
}

/// Drop incomplete rows or columns, then drop every duplicated gene
///
/// A gene ID that occurs more than once is removed entirely: no copy is kept.
pub fn clean(matrix: &ExpressionMatrix, axis: CleanAxis) -> Result<ExpressionMatrix> {
    let values = matrix.values();

    let complete = match axis {
        CleanAxis::Rows => {
            let keep: Vec<usize> = values
                .axis_iter(Axis(0))
                .enumerate()
                .filter(|(_, row)| !row.iter().any(|x| x.is_nan()))
                .map(|(i, _)| i)
                .collect();
            matrix.subset_genes(&keep)?
        }
        CleanAxis::Columns => {
            let keep: Vec<usize> = values
                .axis_iter(Axis(1))
                .enumerate()
                .filter(|(_, col)| !col.iter().any(|x| x.is_nan()))
                .map(|(j, _)| j)
                .collect();
            matrix.subset_samples(&keep)?
        }
    };

    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for id in complete.gene_ids() {
        *occurrences.entry(id.as_str()).or_insert(0) += 1;
    }

    let unique: Vec<usize> = complete
        .gene_ids()
        .iter()
        .enumerate()
        .filter(|(_, id)| occurrences[id.as_str()] == 1)
        .map(|(i, _)| i)
        .collect();

    let n_duplicated = complete.n_genes() - unique.len();
    if n_duplicated > 0 {
        log::warn!("Removed {} rows with duplicated gene IDs", n_duplicated);
    }

    complete.subset_genes(&unique)
}
