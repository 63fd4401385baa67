//! Data structures for expression normalization

mod annotation;
mod expression_matrix;
mod labels;

pub use annotation::{AnnotationOptions, FeatureLengthIndex};
pub use expression_matrix::ExpressionMatrix;
pub use labels::LabelMap;
