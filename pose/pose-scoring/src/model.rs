//! The scoring model interface.

use std::fmt;

use pose_types::{AngleLayout, AngleVector, Phase, ScoreResult};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};

/// Registry key: lower-cased exercise name plus phase.
///
/// # Example
///
/// ```
/// use pose_scoring::ModelKey;
/// use pose_types::Phase;
///
/// let key = ModelKey::new("Squat", Phase::FirstHalf);
/// assert_eq!(key.exercise(), "squat");
/// assert_eq!(key.to_string(), "squat/first_half");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelKey {
    exercise: String,
    phase: Phase,
}

impl ModelKey {
    /// Creates a key, lower-casing the exercise name.
    #[must_use]
    pub fn new(exercise: &str, phase: Phase) -> Self {
        Self {
            exercise: exercise.to_lowercase(),
            phase,
        }
    }

    /// Returns the lower-cased exercise name.
    #[must_use]
    pub fn exercise(&self) -> &str {
        &self.exercise
    }

    /// Returns the phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.exercise, self.phase)
    }
}

/// Correctness of a live vector against its best-matching exemplar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correctness {
    /// Score in `[0, 1]`; 1 means the vector equals an exemplar.
    pub score: f64,
    /// Index of the angle with the largest absolute deviation.
    pub most_divergent_index: usize,
    /// The matched exemplar's value at `most_divergent_index`.
    pub most_divergent_ideal: f64,
    /// Euclidean distance to the matched exemplar.
    pub distance: f64,
}

/// A model that scores angle vectors for one exercise and phase.
///
/// Implementations are immutable after construction and safe to share
/// across threads; every method is a pure function of its input.
pub trait ScoringModel: Send + Sync + fmt::Debug {
    /// Returns the exercise and phase this model scores.
    fn key(&self) -> &ModelKey;

    /// Returns the angle layout fixed at construction.
    fn layout(&self) -> &AngleLayout;

    /// Scores how close `live` is to the reference set.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::AngleVectorLengthMismatch`] if `live` does
    /// not match the layout length.
    fn correctness(&self, live: &AngleVector) -> Result<Correctness>;

    /// Estimates how far through the phase `live` lies, in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::AngleVectorLengthMismatch`] if `live` does
    /// not match the layout length.
    fn progress(&self, live: &AngleVector) -> Result<f64>;

    /// Returns the number of angles each scored vector must have.
    fn layout_len(&self) -> usize {
        self.layout().len()
    }

    /// Fails unless `live` has the layout length.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::AngleVectorLengthMismatch`] on mismatch.
    fn check_len(&self, live: &AngleVector) -> Result<()> {
        let expected = self.layout_len();
        if live.len() == expected {
            Ok(())
        } else {
            Err(ScoringError::length_mismatch(expected, live.len()))
        }
    }

    /// Computes correctness and progress together.
    ///
    /// # Errors
    ///
    /// See [`ScoringModel::correctness`].
    fn score(&self, live: &AngleVector) -> Result<ScoreResult> {
        let correctness = self.correctness(live)?;
        let progress = self.progress(live)?;
        Ok(ScoreResult {
            correctness: correctness.score,
            most_divergent_index: correctness.most_divergent_index,
            most_divergent_ideal: correctness.most_divergent_ideal,
            progress,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_normalizes_case() {
        assert_eq!(
            ModelKey::new("PUSH_UP", Phase::SecondHalf),
            ModelKey::new("push_up", Phase::SecondHalf)
        );
        assert_ne!(
            ModelKey::new("push_up", Phase::FirstHalf),
            ModelKey::new("push_up", Phase::SecondHalf)
        );
    }

    #[test]
    fn key_display() {
        let key = ModelKey::new("lunge", Phase::SecondHalf);
        assert_eq!(format!("{key}"), "lunge/second_half");
        assert_eq!(key.phase(), Phase::SecondHalf);
    }
}
