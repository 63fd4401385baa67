//! Normalized count transformations
//!
//! RPK divides each gene by its length in kilobases, RPM divides each sample
//! by its library size in millions. TPM and FPKM compose the two in opposite
//! orders:
//!
//! * TPM  = RPM(RPK(counts))  (length first, then library size)
//! * FPKM = RPK(RPM(counts))  (library size first, then length)

use std::path::Path;

use ndarray::{Array2, Axis};

use crate::data::{AnnotationOptions, ExpressionMatrix, FeatureLengthIndex};
use crate::error::{Result, XpressError};

/// How `rpm` treats a sample whose library size is zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroLibraryPolicy {
    /// Fail with `IndeterminateNormalization`
    #[default]
    Error,
    /// Divide anyway and let NaN/Inf propagate into the output
    Propagate,
}

/// Calculate Reads Per Kilobase (RPK)
///
/// Keeps only genes present in both the matrix and the length index, divides
/// each row by the gene length in kilobases and drops rows that contain a
/// missing or non-finite value afterwards (zero-length genes end up here).
/// Row order of the input is preserved.
pub fn rpk(matrix: &ExpressionMatrix, lengths: &FeatureLengthIndex) -> Result<ExpressionMatrix> {
    let values = matrix.values();
    let mut keep_rows = Vec::with_capacity(matrix.n_genes());
    let mut row_lengths = Vec::with_capacity(matrix.n_genes());

    for (i, gene_id) in matrix.gene_ids().iter().enumerate() {
        let Some(length_kb) = lengths.get(gene_id) else {
            continue;
        };
        if values.row(i).iter().all(|&x| (x / length_kb).is_finite()) {
            keep_rows.push(i);
            row_lengths.push(length_kb);
        }
    }

    let n_dropped = matrix.n_genes() - keep_rows.len();
    if n_dropped > 0 {
        log::debug!(
            "RPK: dropped {} of {} genes (no length or missing values)",
            n_dropped,
            matrix.n_genes()
        );
    }

    let mut result = values.select(Axis(0), &keep_rows);
    for (mut row, &length_kb) in result.axis_iter_mut(Axis(0)).zip(row_lengths.iter()) {
        row.mapv_inplace(|x| x / length_kb);
    }

    let gene_ids: Vec<String> = keep_rows
        .iter()
        .map(|&i| matrix.gene_ids()[i].clone())
        .collect();

    ExpressionMatrix::new(result, gene_ids, matrix.sample_ids().to_vec())
}

/// Calculate Reads Per Million (RPM)
///
/// Each sample column is divided by `column_sum / 1e6`, so every column of
/// the output sums to one million. A zero-sum column is an error.
pub fn rpm(matrix: &ExpressionMatrix) -> Result<ExpressionMatrix> {
    rpm_with(matrix, ZeroLibraryPolicy::Error)
}

/// Calculate Reads Per Million with an explicit zero-library policy
pub fn rpm_with(matrix: &ExpressionMatrix, policy: ZeroLibraryPolicy) -> Result<ExpressionMatrix> {
    let library_sizes = matrix.library_sizes();

    if policy == ZeroLibraryPolicy::Error {
        if let Some(j) = library_sizes.iter().position(|&s| s == 0.0) {
            return Err(XpressError::IndeterminateNormalization {
                sample_id: matrix.sample_ids()[j].clone(),
            });
        }
    }

    let mut result: Array2<f64> = matrix.values().to_owned();
    for (mut col, &lib_size) in result.axis_iter_mut(Axis(1)).zip(library_sizes.iter()) {
        let per_million = lib_size / 1e6;
        col.mapv_inplace(|x| x / per_million);
    }

    matrix.with_values(result)
}

/// Calculate Transcripts Per Million (TPM) from an annotation file
pub fn tpm<P: AsRef<Path>>(
    matrix: &ExpressionMatrix,
    annotation: P,
    options: &AnnotationOptions,
) -> Result<ExpressionMatrix> {
    let lengths = FeatureLengthIndex::from_path(annotation, options)?;
    tpm_with_index(matrix, &lengths)
}

/// Calculate TPM with a prebuilt length index: RPK first, then RPM
pub fn tpm_with_index(
    matrix: &ExpressionMatrix,
    lengths: &FeatureLengthIndex,
) -> Result<ExpressionMatrix> {
    let data_rpk = rpk(matrix, lengths)?;
    rpm(&data_rpk)
}

/// Calculate Reads/Fragments Per Kilobase per Million (RPKM/FPKM) from an annotation file
pub fn r_fpkm<P: AsRef<Path>>(
    matrix: &ExpressionMatrix,
    annotation: P,
    options: &AnnotationOptions,
) -> Result<ExpressionMatrix> {
    let lengths = FeatureLengthIndex::from_path(annotation, options)?;
    r_fpkm_with_index(matrix, &lengths)
}

/// Calculate RPKM/FPKM with a prebuilt length index: RPM first, then RPK
///
/// Library sizes are taken over every gene in the matrix, including genes
/// the length index does not cover.
pub fn r_fpkm_with_index(
    matrix: &ExpressionMatrix,
    lengths: &FeatureLengthIndex,
) -> Result<ExpressionMatrix> {
    let data_rpm = rpm(matrix)?;
    rpk(&data_rpm, lengths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn test_matrix() -> ExpressionMatrix {
        ExpressionMatrix::new(
            array![
                [10.0, 20.0],
                [300.0, 400.0],
                [50.0, 60.0],
                [5.0, 5.0],
            ],
            ids(&["G1", "G2", "G3", "G4"]),
            ids(&["s1", "s2"]),
        )
        .unwrap()
    }

    fn test_lengths() -> FeatureLengthIndex {
        // G4 is absent from the index, G5 is absent from the matrix
        FeatureLengthIndex::from_lengths(vec![("G1", 1.0), ("G2", 2.0), ("G3", 0.5), ("G5", 4.0)])
    }

    #[test]
    fn test_rpk_divides_by_length() {
        let result = rpk(&test_matrix(), &test_lengths()).unwrap();
        assert_eq!(result.gene_ids(), &ids(&["G1", "G2", "G3"])[..]);
        assert_eq!(result.values().row(0).to_vec(), vec![10.0, 20.0]);
        assert_eq!(result.values().row(1).to_vec(), vec![150.0, 200.0]);
        assert_eq!(result.values().row(2).to_vec(), vec![100.0, 120.0]);
    }

    #[test]
    fn test_rpk_drops_missing_and_zero_length() {
        let matrix = ExpressionMatrix::new(
            array![[10.0, f64::NAN], [10.0, 20.0], [0.0, 0.0]],
            ids(&["G1", "G2", "G3"]),
            ids(&["s1", "s2"]),
        )
        .unwrap();
        let lengths = FeatureLengthIndex::from_lengths(vec![("G1", 1.0), ("G2", 0.0), ("G3", 2.0)]);

        let result = rpk(&matrix, &lengths).unwrap();
        assert_eq!(result.gene_ids(), &ids(&["G3"])[..]);
        assert!(!result.has_missing());
    }

    #[test]
    fn test_rpm_columns_sum_to_million() {
        let result = rpm(&test_matrix()).unwrap();
        for sum in result.library_sizes() {
            assert!((sum - 1e6).abs() < 1e-6);
        }
        // s1 library size is 365
        assert!((result.values()[[0, 0]] - 10.0 * 1e6 / 365.0).abs() < 1e-9);
    }

    #[test]
    fn test_rpm_zero_library_is_error() {
        let matrix = ExpressionMatrix::new(
            array![[0.0, 1.0], [0.0, 2.0]],
            ids(&["G1", "G2"]),
            ids(&["empty", "s2"]),
        )
        .unwrap();

        match rpm(&matrix) {
            Err(XpressError::IndeterminateNormalization { sample_id }) => {
                assert_eq!(sample_id, "empty")
            }
            other => panic!("expected IndeterminateNormalization, got {:?}", other),
        }

        let propagated = rpm_with(&matrix, ZeroLibraryPolicy::Propagate).unwrap();
        assert!(propagated.values()[[0, 0]].is_nan());
        assert!((propagated.values()[[1, 1]] - 2e6 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_tpm_is_rpm_of_rpk() {
        let matrix = test_matrix();
        let lengths = test_lengths();

        let result = tpm_with_index(&matrix, &lengths).unwrap();
        let expected = rpm(&rpk(&matrix, &lengths).unwrap()).unwrap();
        assert_eq!(result.gene_ids(), expected.gene_ids());
        for (a, b) in result.values().iter().zip(expected.values().iter()) {
            assert!((a - b).abs() < 1e-9);
        }
        for sum in result.library_sizes() {
            assert!((sum - 1e6).abs() < 1e-6);
        }
    }

    #[test]
    fn test_fpkm_is_rpk_of_rpm_and_differs_from_tpm() {
        let matrix = test_matrix();
        let lengths = test_lengths();

        let fpkm = r_fpkm_with_index(&matrix, &lengths).unwrap();
        let expected = rpk(&rpm(&matrix).unwrap(), &lengths).unwrap();
        for (a, b) in fpkm.values().iter().zip(expected.values().iter()) {
            assert!((a - b).abs() < 1e-9);
        }

        let tpm = tpm_with_index(&matrix, &lengths).unwrap();
        assert_eq!(fpkm.gene_ids(), tpm.gene_ids());
        let max_diff = fpkm
            .values()
            .iter()
            .zip(tpm.values().iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        assert!(max_diff > 1.0);
    }

    #[test]
    fn test_tpm_from_annotation_file() {
        let mut gtf = NamedTempFile::new().unwrap();
        writeln!(gtf, "# test annotation").unwrap();
        writeln!(gtf, "chr1\tsrc\tgene\t100\t1100\t.\t+\t.\tgene_id \"G1\";").unwrap();
        writeln!(gtf, "chr1\tsrc\tgene\t0\t2000\t.\t+\t.\tgene_id \"G2\";").unwrap();
        gtf.flush().unwrap();

        let matrix = ExpressionMatrix::new(
            array![[10.0, 20.0], [20.0, 40.0]],
            ids(&["G1", "G2"]),
            ids(&["s1", "s2"]),
        )
        .unwrap();

        let options = AnnotationOptions::default();
        let result = tpm(&matrix, gtf.path(), &options).unwrap();
        // Both genes have 10 reads per kb in s1, so TPM splits evenly
        assert!((result.values()[[0, 0]] - 5e5).abs() < 1e-6);
        assert!((result.values()[[1, 0]] - 5e5).abs() < 1e-6);

        let fpkm = r_fpkm(&matrix, gtf.path(), &options).unwrap();
        // s1 library = 30 reads; G1 = 10/30 * 1e6 / 1 kb
        assert!((fpkm.values()[[0, 0]] - 1e6 / 3.0).abs() < 1e-6);
        assert!((fpkm.values()[[1, 0]] - 1e6 / 3.0).abs() < 1e-6);
    }
}
