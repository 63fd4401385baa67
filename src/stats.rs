//! Statistical utility functions shared across modules
//!
//! Row standardization used by `prepare`, and the per-sample distribution
//! summary behind sample QC box plots.

use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median, OrderStatistics, Statistics};

use crate::data::ExpressionMatrix;

/// Standardize each row to mean 0 and unit variance
///
/// Uses the population standard deviation (divisor n). Rows with zero
/// variance are centered only, so they become all zeros.
pub fn zscore_rows(values: ArrayView2<f64>) -> Array2<f64> {
    let mut result = values.to_owned();
    let n = values.ncols() as f64;

    for mut row in result.axis_iter_mut(Axis(0)) {
        let mean = row.sum() / n;
        let var = row.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n;
        let sd = var.sqrt();
        let scale = if sd > 0.0 { sd } else { 1.0 };
        row.mapv_inplace(|x| (x - mean) / scale);
    }

    result
}

/// Mean of each row
pub fn row_means(values: ArrayView2<f64>) -> Vec<f64> {
    values
        .axis_iter(Axis(0))
        .map(|row| row.iter().mean())
        .collect()
}

/// Distribution summary of one sample column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub sample_id: String,
    pub min: f64,
    pub lower_quartile: f64,
    pub median: f64,
    pub upper_quartile: f64,
    pub max: f64,
    pub mean: f64,
    /// Number of non-missing values
    pub n: usize,
}

/// Per-sample summary statistics, ignoring missing values
///
/// A sample with no observed values gets NaN for every statistic.
pub fn sample_summary(matrix: &ExpressionMatrix) -> Vec<SampleSummary> {
    matrix
        .sample_ids()
        .iter()
        .enumerate()
        .map(|(j, sample_id)| {
            let observed: Vec<f64> = matrix
                .sample_values(j)
                .iter()
                .copied()
                .filter(|x| !x.is_nan())
                .collect();
            let n = observed.len();

            if n == 0 {
                return SampleSummary {
                    sample_id: sample_id.clone(),
                    min: f64::NAN,
                    lower_quartile: f64::NAN,
                    median: f64::NAN,
                    upper_quartile: f64::NAN,
                    max: f64::NAN,
                    mean: f64::NAN,
                    n,
                };
            }

            let mean = observed.iter().mean();
            let min = observed.iter().copied().fold(f64::INFINITY, f64::min);
            let max = observed.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mut data = Data::new(observed);

            SampleSummary {
                sample_id: sample_id.clone(),
                min,
                lower_quartile: data.lower_quartile(),
                median: data.median(),
                upper_quartile: data.upper_quartile(),
                max,
                mean,
                n,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_zscore_rows() {
        let values = array![[1.0, 2.0, 3.0], [5.0, 5.0, 5.0]];
        let scaled = zscore_rows(values.view());

        let sd = (2.0f64 / 3.0).sqrt();
        assert!((scaled[[0, 0]] + 1.0 / sd).abs() < 1e-12);
        assert!(scaled[[0, 1]].abs() < 1e-12);
        assert!((scaled[[0, 2]] - 1.0 / sd).abs() < 1e-12);

        // Constant row is centered, not divided by zero
        assert_eq!(scaled.row(1).to_vec(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_row_means() {
        let values = array![[1.0, 2.0, 3.0], [0.0, 0.0, 6.0]];
        assert_eq!(row_means(values.view()), vec![2.0, 2.0]);
    }

    #[test]
    fn test_sample_summary() {
        let matrix = ExpressionMatrix::new(
            array![[1.0, f64::NAN], [2.0, f64::NAN], [3.0, f64::NAN], [10.0, f64::NAN]],
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            vec!["s1".into(), "s2".into()],
        )
        .unwrap();

        let summary = sample_summary(&matrix);
        assert_eq!(summary.len(), 2);

        let s1 = &summary[0];
        assert_eq!(s1.sample_id, "s1");
        assert_eq!(s1.n, 4);
        assert_eq!(s1.min, 1.0);
        assert_eq!(s1.max, 10.0);
        assert!((s1.median - 2.5).abs() < 1e-12);
        assert!((s1.mean - 4.0).abs() < 1e-12);
        assert!(s1.lower_quartile <= s1.median && s1.median <= s1.upper_quartile);

        let s2 = &summary[1];
        assert_eq!(s2.n, 0);
        assert!(s2.median.is_nan());
    }
}
