//! Resource construction errors.

use thiserror::Error;
use wf_core::WfError;

/// Result type for resource construction.
pub type ResourceResult<T> = Result<T, ConfigurationError>;

/// Invalid inputs while building a wind-resource grid.
///
/// Every variant is fatal for the analysis run: nothing downstream can
/// produce a meaningful number without a valid grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A coordinate axis has no values.
    #[error("Empty {axis} axis")]
    EmptyAxis { axis: &'static str },

    /// A coordinate axis breaks its ordering/range rules.
    #[error("Invalid {axis} axis: {reason}")]
    InvalidAxis {
        axis: &'static str,
        reason: &'static str,
    },

    /// A per-cell table does not match the grid shape.
    #[error("Shape mismatch for {what}: expected {expected:?}, got {got:?}")]
    Shape {
        what: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    },

    /// The sector frequencies cannot be turned into a probability distribution.
    #[error("Sector frequencies cannot be normalized (sum = {sum})")]
    Frequency { sum: f64 },

    #[error(transparent)]
    Value(#[from] WfError),
}
