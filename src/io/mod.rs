//! Input/Output operations for expression matrices and sample labels

mod csv;

pub use self::csv::{
    read_expression_matrix, read_label_map, write_expression_matrix, write_labeled_matrix,
};
