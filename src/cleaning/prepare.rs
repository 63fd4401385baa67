//! Preparation of matrices for plotting and statistics

use crate::data::{ExpressionMatrix, LabelMap};
use crate::error::Result;
use crate::stats::{row_means, zscore_rows};

use super::clean::{clean, CleanAxis};

/// Row name under which sample labels are reported
pub const LABEL_ROW: &str = "label";

/// Expression matrix decorated with a leading per-sample label row
#[derive(Debug, Clone)]
pub struct LabeledMatrix {
    /// One label per sample column; `None` where the sample is unlabelled
    labels: Vec<Option<String>>,
    matrix: ExpressionMatrix,
}

impl LabeledMatrix {
    pub fn labels(&self) -> &[Option<String>] {
        &self.labels
    }

    pub fn matrix(&self) -> &ExpressionMatrix {
        &self.matrix
    }

    /// Row names in display order: the label row first, then genes
    pub fn row_names(&self) -> Vec<&str> {
        std::iter::once(LABEL_ROW)
            .chain(self.matrix.gene_ids().iter().map(|s| s.as_str()))
            .collect()
    }

    /// Label of a sample, if it has one
    pub fn label_of(&self, sample_id: &str) -> Option<&str> {
        self.matrix
            .sample_index(sample_id)
            .and_then(|j| self.labels[j].as_deref())
    }
}

/// Prepare an expression matrix for downstream plotting
///
/// Returns `(scaled, labeled)`. Both are cleaned of incomplete and
/// duplicated genes. `scaled` is z-scored per gene when `gene_scale` is set
/// and otherwise equals the cleaned matrix. `labeled` keeps the original
/// scale and carries the sample labels from `labels`.
///
/// With `print_means`, the per-gene means of `scaled` are printed to stdout.
///
/// A gene whose ID is `label` stays a gene row, so `labeled` then has two
/// rows named `label`, the label row first.
pub fn prepare(
    matrix: &ExpressionMatrix,
    labels: &LabelMap,
    gene_scale: bool,
    print_means: bool,
) -> Result<(ExpressionMatrix, LabeledMatrix)> {
    let cleaned = clean(matrix, CleanAxis::Rows)?;

    let scaled = if gene_scale {
        cleaned.with_values(zscore_rows(cleaned.values()))?
    } else {
        cleaned.clone()
    };

    if print_means {
        for (gene_id, mean) in scaled.gene_ids().iter().zip(row_means(scaled.values())) {
            println!("{}\t{}", gene_id, mean);
        }
    }

    if cleaned.gene_index(LABEL_ROW).is_some() {
        log::warn!(
            "Gene ID '{}' collides with the label row; both rows are kept",
            LABEL_ROW
        );
    }

    let sample_labels = labels.labels_for(cleaned.sample_ids());
    let n_unlabelled = sample_labels.iter().filter(|l| l.is_none()).count();
    if n_unlabelled > 0 {
        log::warn!("{} samples have no label", n_unlabelled);
    }

    let labeled = LabeledMatrix {
        labels: sample_labels,
        matrix: cleaned,
    };

    Ok((scaled, labeled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn test_matrix() -> ExpressionMatrix {
        ExpressionMatrix::new(
            array![
                [1.0, 2.0, 3.0],
                [10.0, f64::NAN, 30.0],
                [4.0, 4.0, 4.0],
                [7.0, 8.0, 9.0],
                [7.0, 8.0, 9.0],
            ],
            ids(&["g1", "g2", "g3", "dup", "dup"]),
            ids(&["s1", "s2", "s3"]),
        )
        .unwrap()
    }

    #[test]
    fn test_prepare_scaled_and_labeled() {
        let labels = LabelMap::from_pairs(vec![("s1", "ctrl"), ("s2", "ctrl"), ("s3", "drug")]);
        let (scaled, labeled) = prepare(&test_matrix(), &labels, true, false).unwrap();

        assert_eq!(scaled.gene_ids(), &ids(&["g1", "g3"])[..]);
        for mean in row_means(scaled.values()) {
            assert!(mean.abs() < 1e-12);
        }
        assert!((scaled.values()[[0, 2]] - 1.5f64.sqrt()).abs() < 1e-12);

        assert_eq!(labeled.row_names(), vec![LABEL_ROW, "g1", "g3"]);
        assert_eq!(labeled.matrix().values()[[0, 2]], 3.0);
        assert_eq!(labeled.label_of("s3"), Some("drug"));
        assert_eq!(labeled.labels()[0].as_deref(), Some("ctrl"));
    }

    #[test]
    fn test_prepare_without_scaling() {
        let (scaled, labeled) = prepare(&test_matrix(), &LabelMap::new(), false, false).unwrap();
        assert_eq!(scaled.values(), labeled.matrix().values());
    }

    #[test]
    fn test_unmapped_samples_have_no_label() {
        let labels = LabelMap::from_pairs(vec![("s2", "drug"), ("other", "x")]);
        let (_, labeled) = prepare(&test_matrix(), &labels, true, false).unwrap();
        assert_eq!(labeled.labels(), &[None, Some("drug".to_string()), None][..]);
    }

    #[test]
    fn test_gene_named_label_is_kept() {
        let matrix = ExpressionMatrix::new(
            array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
            ids(&["g1", LABEL_ROW]),
            ids(&["s1", "s2", "s3"]),
        )
        .unwrap();
        let labels = LabelMap::from_pairs(vec![("s1", "ctrl")]);
        let (_, labeled) = prepare(&matrix, &labels, false, false).unwrap();

        assert_eq!(labeled.row_names(), vec![LABEL_ROW, "g1", LABEL_ROW]);
        assert_eq!(labeled.matrix().values().row(1).to_vec(), vec![4.0, 5.0, 6.0]);
        assert_eq!(labeled.label_of("s1"), Some("ctrl"));
    }

    #[test]
    fn test_input_not_mutated() {
        let matrix = test_matrix();
        let _ = prepare(&matrix, &LabelMap::new(), true, true).unwrap();
        assert_eq!(matrix.n_genes(), 5);
        assert_eq!(matrix.values()[[0, 0]], 1.0);
    }
}
