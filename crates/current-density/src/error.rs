//! Error types for grid construction, parameters and extrusion

use thiserror::Error;

/// Errors raised by the sampling pipeline.
///
/// Evaluation itself is total; only construction-time validation and
/// shape checks can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("invalid axis spec: {reason}")]
    InvalidAxisSpec { reason: String },

    #[error("invalid field parameters: {reason}")]
    InvalidParameters { reason: String },

    #[error("shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("axis {axis} does not exist on a {ndim}-axis grid")]
    UnknownAxis { axis: usize, ndim: usize },
}

pub type Result<T> = std::result::Result<T, FieldError>;
