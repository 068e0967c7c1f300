//! Error types for angle extraction.

use pose_types::{JointId, PoseTypesError};
use thiserror::Error;

/// Result type alias for angle extraction.
pub type Result<T> = std::result::Result<T, AngleError>;

/// Errors that can occur while turning landmarks into an angle vector.
///
/// Any of these aborts the whole vector; partial vectors are never
/// produced.
#[derive(Debug, Error)]
pub enum AngleError {
    /// No landmarks were supplied at all.
    #[error("no landmarks were specified or were not in the correct format")]
    NoLandmarks,

    /// A joint referenced by the layout is absent from the input.
    #[error("missing landmark {joint} required by angle {angle_index}")]
    MissingLandmark {
        /// Position of the angle in the layout.
        angle_index: usize,
        /// The absent joint.
        joint: JointId,
    },

    /// One of the two rays has zero length.
    #[error("degenerate geometry at {vertex} for angle {angle_index}: zero-length ray")]
    DegenerateGeometry {
        /// Position of the angle in the layout.
        angle_index: usize,
        /// Vertex joint of the angle.
        vertex: JointId,
    },

    /// Landmark ingestion failed.
    #[error(transparent)]
    Landmarks(#[from] PoseTypesError),
}

impl AngleError {
    /// Creates a missing landmark error.
    #[must_use]
    pub const fn missing(angle_index: usize, joint: JointId) -> Self {
        Self::MissingLandmark { angle_index, joint }
    }

    /// Creates a degenerate geometry error.
    #[must_use]
    pub const fn degenerate(angle_index: usize, vertex: JointId) -> Self {
        Self::DegenerateGeometry {
            angle_index,
            vertex,
        }
    }
}
