//! Translation efficiency (TE) from paired sample columns
//!
//! Columns are consumed positionally two at a time: the first column of each
//! pair is the numerator (e.g. ribosome footprints) and the second the
//! denominator (e.g. mRNA). A pseudocount of 1 is added to every value before
//! the ratio is taken.

use ndarray::Array2;

use crate::data::ExpressionMatrix;
use crate::error::{Result, XpressError};

/// Suffix appended to the numerator column name when pairs are auto-named
pub const TE_SUFFIX: &str = "_te";

/// Pseudocount added before the ratio
const PSEUDOCOUNT: f64 = 1.0;

/// Calculate translation efficiency for consecutive column pairs
///
/// Without `sample_pair_names`, pairs (0,1), (2,3), ... are each reduced to
/// one column named `<first column>_te`, and a trailing unpaired column is
/// dropped. With `sample_pair_names`, pairing still walks the original
/// columns two at a time and the n-th ratio column takes the n-th name.
///
/// When `apply_log2` is false the raw ratios are returned.
pub fn te(
    matrix: &ExpressionMatrix,
    sample_pair_names: Option<&[String]>,
    apply_log2: bool,
) -> Result<ExpressionMatrix> {
    let n_pairs = matrix.n_samples() / 2;

    if n_pairs == 0 {
        return Err(XpressError::InvalidArgument {
            reason: format!(
                "Translation efficiency needs at least two samples, got {}",
                matrix.n_samples()
            ),
        });
    }

    if matrix.n_samples() % 2 == 1 && sample_pair_names.is_none() {
        log::warn!(
            "Odd number of samples ({}); trailing sample '{}' is not scored",
            matrix.n_samples(),
            matrix.sample_ids()[matrix.n_samples() - 1]
        );
    }

    let names: Vec<String> = match sample_pair_names {
        Some(names) => {
            if names.len() > n_pairs {
                return Err(XpressError::InvalidArgument {
                    reason: format!(
                        "{} pair names given but only {} sample pairs are available",
                        names.len(),
                        n_pairs
                    ),
                });
            }
            names.to_vec()
        }
        None => (0..n_pairs)
            .map(|p| format!("{}{}", matrix.sample_ids()[2 * p], TE_SUFFIX))
            .collect(),
    };

    let values = matrix.values();
    let mut result = Array2::zeros((matrix.n_genes(), names.len()));

    for p in 0..names.len() {
        let numerator = values.column(2 * p);
        let denominator = values.column(2 * p + 1);
        for i in 0..matrix.n_genes() {
            let ratio = (numerator[i] + PSEUDOCOUNT) / (denominator[i] + PSEUDOCOUNT);
            result[[i, p]] = if apply_log2 { ratio.log2() } else { ratio };
        }
    }

    ExpressionMatrix::new(result, matrix.gene_ids().to_vec(), names)
}
