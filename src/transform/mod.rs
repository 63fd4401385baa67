//! Transformation functions for normalized expression data
//!
//! Provides the translation-efficiency ratio score and pseudocounted log
//! scaling for visualization and downstream analysis.

mod log_scale;
mod te;

pub use log_scale::{log_scale, log_scale_with, LogBase};
pub use te::{te, TE_SUFFIX};
