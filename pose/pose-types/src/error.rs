//! Error types for pose data.

use thiserror::Error;

/// Result type alias for pose data operations.
pub type Result<T> = std::result::Result<T, PoseTypesError>;

/// Errors that can occur when constructing pose data.
#[derive(Debug, Error)]
pub enum PoseTypesError {
    /// Joint id outside the supported topology.
    #[error("invalid joint id {0}: expected 0..=32")]
    InvalidJointId(i64),

    /// Angle value is `NaN` or infinite.
    #[error("invalid angle at index {index}: {value}")]
    InvalidAngle {
        /// Position in the angle vector.
        index: usize,
        /// The rejected value.
        value: f64,
    },

    /// Two vectors that must be index-aligned differ in length.
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
}

impl PoseTypesError {
    /// Creates a length mismatch error.
    #[must_use]
    pub const fn length_mismatch(expected: usize, actual: usize) -> Self {
        Self::LengthMismatch { expected, actual }
    }
}
