//! Reference exemplars and score results.

use serde::{Deserialize, Serialize};

use crate::angle::AngleVector;
use crate::phase::Phase;

/// A recorded, known-correct angle vector for one exercise and phase.
///
/// The exercise name is stored lower-cased and `progress` is clamped into
/// `[0, 1]`; both happen at construction.
///
/// # Example
///
/// ```
/// use pose_types::{AngleVector, Phase, ReferenceExemplar};
///
/// let angles = AngleVector::new(vec![170.0, 95.0]).unwrap();
/// let exemplar = ReferenceExemplar::new("Squat", Phase::FirstHalf, angles, 1.4);
///
/// assert_eq!(exemplar.exercise(), "squat");
/// assert!((exemplar.progress() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceExemplar {
    exercise: String,
    phase: Phase,
    angles: AngleVector,
    progress: f64,
}

impl ReferenceExemplar {
    /// Creates an exemplar.
    ///
    /// A non-finite progress label is treated as `0.0`.
    #[must_use]
    pub fn new(exercise: &str, phase: Phase, angles: AngleVector, progress: f64) -> Self {
        Self {
            exercise: exercise.to_lowercase(),
            phase,
            angles,
            progress: clamp_unit(progress),
        }
    }

    /// Returns the lower-cased exercise name.
    #[must_use]
    pub fn exercise(&self) -> &str {
        &self.exercise
    }

    /// Returns the phase this exemplar was recorded in.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the recorded angles.
    #[must_use]
    pub const fn angles(&self) -> &AngleVector {
        &self.angles
    }

    /// Returns how far through the phase this exemplar was recorded.
    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.progress
    }
}

/// Output of scoring one angle vector against a model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Similarity to the nearest exemplar, in `[0, 1]`.
    pub correctness: f64,
    /// Index of the angle that deviates most from the matched exemplar.
    pub most_divergent_index: usize,
    /// The matched exemplar's value at `most_divergent_index`.
    pub most_divergent_ideal: f64,
    /// Estimated progress through the current phase, in `[0, 1]`.
    pub progress: f64,
}

/// Clamps `value` into `[0, 1]`, mapping `NaN` to `0.0`.
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
