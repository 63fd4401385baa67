//! Length and library-size normalization for RNA-seq count data

mod counts;

pub use counts::{
    r_fpkm, r_fpkm_with_index, rpk, rpm, rpm_with, tpm, tpm_with_index, ZeroLibraryPolicy,
};
