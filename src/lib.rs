//! rust_xpress: RNA-seq expression normalization in Rust
//!
//! Converts raw gene-by-sample count matrices into comparable quantities
//! (RPK, RPM, TPM, FPKM, translation efficiency, log-scaled values) and
//! prepares them for downstream plotting and statistics.
//!
//! # Example
//!
//! ```ignore
//! use rust_xpress::prelude::*;
//!
//! let counts = read_expression_matrix("counts.tsv")?;
//! let normalized = tpm(&counts, "genes.gtf", &AnnotationOptions::default())?;
//! let logged = log_scale(&normalized, 2)?;
//! let filtered = threshold(&logged, Some(1.0), None)?;
//! ```

pub mod batch;
pub mod cleaning;
pub mod cli;
pub mod data;
pub mod error;
pub mod io;
pub mod normalization;
pub mod stats;
pub mod transform;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::batch::{batch_normalize, batched_output_path, BatchConfig};
    pub use crate::cleaning::{
        clean, prepare, threshold, threshold_with_partitions, CleanAxis, LabeledMatrix,
    };
    pub use crate::data::{AnnotationOptions, ExpressionMatrix, FeatureLengthIndex, LabelMap};
    pub use crate::error::{Result, XpressError};
    pub use crate::io::{
        read_expression_matrix, read_label_map, write_expression_matrix, write_labeled_matrix,
    };
    pub use crate::normalization::{
        r_fpkm, r_fpkm_with_index, rpk, rpm, rpm_with, tpm, tpm_with_index, ZeroLibraryPolicy,
    };
    pub use crate::stats::{sample_summary, SampleSummary};
    pub use crate::transform::{log_scale, log_scale_with, te, LogBase};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use ndarray::array;

    #[test]
    fn test_full_pipeline() {
        let gtf = "\
#!genome-build test
chr1\tsrc\tgene\t100\t1100\t.\t+\t.\tgene_id \"G1\"; gene_name \"A\";
chr1\tsrc\texon\t100\t400\t.\t+\t.\tgene_id \"G1\"; gene_name \"A\";
chr1\tsrc\tgene\t2000\t4000\t.\t+\t.\tgene_id \"G2\"; gene_name \"B\";
chr2\tsrc\tgene\t0\t500\t.\t-\t.\tgene_id \"G3\"; gene_name \"C\";
chr2\tsrc\tgene\t0\t4000\t.\t-\t.\tgene_id \"G4\"; gene_name \"D\";
";
        let lengths =
            FeatureLengthIndex::build(gtf.as_bytes(), &AnnotationOptions::default()).unwrap();
        assert!((lengths.get("G1").unwrap() - 1.0).abs() < 1e-12);

        // ribo/rna pairs for two conditions; G5 has no annotation
        let counts = ExpressionMatrix::new(
            array![
                [10.0, 20.0, 30.0, 15.0],
                [400.0, 380.0, 100.0, 410.0],
                [50.0, 45.0, 60.0, 52.0],
                [800.0, 900.0, 750.0, 820.0],
                [5.0, 5.0, 5.0, 5.0],
            ],
            vec!["G1".into(), "G2".into(), "G3".into(), "G4".into(), "G5".into()],
            vec!["ribo_wt".into(), "rna_wt".into(), "ribo_ko".into(), "rna_ko".into()],
        )
        .unwrap();

        let tpm = tpm_with_index(&counts, &lengths).unwrap();
        assert_eq!(tpm.n_genes(), 4);
        for sum in tpm.library_sizes() {
            assert!((sum - 1e6).abs() < 1e-6);
        }

        let fpkm = r_fpkm_with_index(&counts, &lengths).unwrap();
        assert_eq!(fpkm.gene_ids(), tpm.gene_ids());

        let scores = te(&tpm, None, true).unwrap();
        assert_eq!(scores.sample_ids(), &["ribo_wt_te".to_string(), "ribo_ko_te".to_string()][..]);

        let logged = log_scale(&tpm, 10).unwrap();
        let filtered = threshold(&logged, Some(4.0), None).unwrap();
        assert!(filtered.n_genes() <= logged.n_genes());
        assert!(filtered.values().iter().all(|&v| v >= 4.0));

        let labels = LabelMap::from_pairs(vec![
            ("ribo_wt", "wt"),
            ("rna_wt", "wt"),
            ("ribo_ko", "ko"),
            ("rna_ko", "ko"),
        ]);
        let (scaled, labeled) = prepare(&logged, &labels, true, false).unwrap();
        assert_eq!(scaled.n_genes(), labeled.matrix().n_genes());
        assert_eq!(labeled.label_of("rna_ko"), Some("ko"));

        let summary = sample_summary(&tpm);
        assert_eq!(summary.len(), 4);
        assert!(summary.iter().all(|s| s.n == 4));
    }
}
