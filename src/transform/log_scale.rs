//! Pseudocounted log scaling

use crate::data::ExpressionMatrix;
use crate::error::{Result, XpressError};

/// Supported logarithm bases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogBase {
    Two,
    #[default]
    Ten,
}

impl TryFrom<u32> for LogBase {
    type Error = XpressError;

    fn try_from(base: u32) -> Result<Self> {
        match base {
            2 => Ok(LogBase::Two),
            10 => Ok(LogBase::Ten),
            _ => Err(XpressError::InvalidArgument {
                reason: format!("Invalid log base {}; use 2 or 10", base),
            }),
        }
    }
}

impl LogBase {
    fn apply(self, x: f64) -> f64 {
        match self {
            LogBase::Two => x.log2(),
            LogBase::Ten => x.log10(),
        }
    }
}

/// Return `log_base(value + 1)` for every cell; `log_base` must be 2 or 10
pub fn log_scale(matrix: &ExpressionMatrix, log_base: u32) -> Result<ExpressionMatrix> {
    let base = LogBase::try_from(log_base)?;
    Ok(log_scale_with(matrix, base))
}

/// Return `log(value + 1)` in the given base for every cell
pub fn log_scale_with(matrix: &ExpressionMatrix, base: LogBase) -> ExpressionMatrix {
    matrix.map_values(|x| base.apply(x + 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn matrix() -> ExpressionMatrix {
        ExpressionMatrix::new(
            array![[0.0, 9.0], [99.0, 3.0]],
            vec!["g1".to_string(), "g2".to_string()],
            vec!["s1".to_string(), "s2".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn test_log10() {
        let result = log_scale(&matrix(), 10).unwrap();
        assert_eq!(result.values()[[0, 0]], 0.0);
        assert!((result.values()[[0, 1]] - 1.0).abs() < 1e-12);
        assert!((result.values()[[1, 0]] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_log2() {
        let result = log_scale(&matrix(), 2).unwrap();
        assert!((result.values()[[1, 1]] - 2.0).abs() < 1e-12);
        assert!((result.values()[[0, 1]] - 10f64.log2()).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_base() {
        for base in [0, 1, 3, 8, 16] {
            assert!(matches!(
                log_scale(&matrix(), base),
                Err(XpressError::InvalidArgument { .. })
            ));
        }
    }

    #[test]
    fn test_missing_stays_missing() {
        let m = ExpressionMatrix::new(
            array![[f64::NAN]],
            vec!["g".to_string()],
            vec!["s".to_string()],
        )
        .unwrap();
        assert!(log_scale_with(&m, LogBase::Two).values()[[0, 0]].is_nan());
    }
}
