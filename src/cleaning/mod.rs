//! Matrix cleaning and preparation for downstream analysis

mod clean;
mod parallel;
mod prepare;
mod threshold;

pub use clean::{clean, CleanAxis};
pub use parallel::{par_filter_rows, RowBounds};
pub use prepare::{prepare, LabeledMatrix, LABEL_ROW};
pub use threshold::{row_within_bounds, threshold, threshold_with_partitions};
