//! Error types for scoring.

use pose_angles::AngleError;
use pose_types::{Phase, PoseTypesError};
use thiserror::Error;

/// Result type alias for scoring operations.
pub type Result<T> = std::result::Result<T, ScoringError>;

/// Errors that can occur while building or querying scoring models.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// An exercise/phase has no exemplars, so no model can be built.
    #[error("no reference exemplars for exercise {exercise:?} ({phase})")]
    EmptyReferenceSet {
        /// Lower-cased exercise name.
        exercise: String,
        /// Requested phase.
        phase: Phase,
    },

    /// An exemplar belongs to a different exercise or phase than its model.
    #[error("exemplar {index} belongs to {found}, expected {expected}")]
    MixedReferenceSet {
        /// Position of the offending exemplar.
        index: usize,
        /// The model's `exercise/phase`.
        expected: String,
        /// The exemplar's `exercise/phase`.
        found: String,
    },

    /// A model would be built over an angle layout with no angles.
    #[error("angle layout {layout:?} for exercise {exercise:?} is empty")]
    EmptyLayout {
        /// Lower-cased exercise name.
        exercise: String,
        /// Layout name.
        layout: String,
    },

    /// A vector's length disagrees with the model's fixed layout.
    #[error("angle vector length mismatch: model expects {expected}, got {actual}")]
    AngleVectorLengthMismatch {
        /// Layout length of the model.
        expected: usize,
        /// Length of the presented vector.
        actual: usize,
    },

    /// No model was built for the requested exercise and phase.
    #[error("the specified exercise {exercise:?} is not supported ({phase})")]
    UnsupportedExerciseOrPhase {
        /// Lower-cased exercise name.
        exercise: String,
        /// Requested phase.
        phase: Phase,
    },

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A reference file is malformed.
    #[error("invalid reference data in {source_name}: {reason}")]
    InvalidReference {
        /// File or collection the data came from.
        source_name: String,
        /// What was wrong.
        reason: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Angle extraction failed.
    #[error(transparent)]
    Angle(#[from] AngleError),
}

impl ScoringError {
    /// Creates an empty reference set error.
    #[must_use]
    pub fn empty_reference_set(exercise: impl Into<String>, phase: Phase) -> Self {
        Self::EmptyReferenceSet {
            exercise: exercise.into(),
            phase,
        }
    }

    /// Creates an unsupported exercise error.
    #[must_use]
    pub fn unsupported(exercise: impl Into<String>, phase: Phase) -> Self {
        Self::UnsupportedExerciseOrPhase {
            exercise: exercise.into(),
            phase,
        }
    }

    /// Creates a length mismatch error.
    #[must_use]
    pub const fn length_mismatch(expected: usize, actual: usize) -> Self {
        Self::AngleVectorLengthMismatch { expected, actual }
    }

    /// Creates an invalid config error.
    #[must_use]
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig(details.into())
    }

    /// Creates an invalid reference error.
    #[must_use]
    pub fn invalid_reference(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

impl From<PoseTypesError> for ScoringError {
    fn from(err: PoseTypesError) -> Self {
        match err {
            PoseTypesError::LengthMismatch { expected, actual } => {
                Self::length_mismatch(expected, actual)
            }
            other => Self::Angle(AngleError::Landmarks(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_types::JointId;

    #[test]
    fn error_display() {
        let err = ScoringError::empty_reference_set("squat", Phase::SecondHalf);
        let msg = format!("{err}");
        assert!(msg.contains("squat"));
        assert!(msg.contains("second_half"));

        let err = ScoringError::unsupported("unknown_exercise", Phase::FirstHalf);
        assert!(format!("{err}").contains("unknown_exercise"));

        let err = ScoringError::length_mismatch(6, 10);
        let msg = format!("{err}");
        assert!(msg.contains('6'));
        assert!(msg.contains("10"));

        let err = ScoringError::invalid_reference("squat.json", "bad frame");
        let msg = format!("{err}");
        assert!(msg.contains("squat.json"));
        assert!(msg.contains("bad frame"));
    }

    #[test]
    fn angle_errors_pass_through() {
        let err = ScoringError::from(AngleError::missing(1, JointId::LEFT_ANKLE));
        assert!(format!("{err}").contains("left_ankle"));
        assert!(matches!(
            err,
            ScoringError::Angle(AngleError::MissingLandmark { .. })
        ));
    }

    #[test]
    fn pose_length_mismatch_maps_to_scoring_variant() {
        let err = ScoringError::from(PoseTypesError::length_mismatch(4, 3));
        assert!(matches!(
            err,
            ScoringError::AngleVectorLengthMismatch {
                expected: 4,
                actual: 3
            }
        ));
    }
}
