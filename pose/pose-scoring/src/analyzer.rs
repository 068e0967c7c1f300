//! Per-frame analysis: landmarks in, annotated score out.
//!
//! The pipeline for one request is
//!
//! 1. ingest the wire landmarks (out-of-range, duplicate and non-finite
//!    entries dropped)
//! 2. select the model for the exercise and the caller's phase
//! 3. compute the angle vector with that model's layout
//! 4. score correctness and progress
//! 5. apply the phase transition rule
//! 6. annotate the most divergent angle with its joint triple
//!
//! The analyzer holds no per-caller state. Phase is threaded through the
//! request and response by the caller.

use pose_angles::{AngleComputer, AngleError};
use pose_types::{AngleVector, LandmarkEntry, Landmarks, Phase, ScoreResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ScoringConfig;
use crate::error::{Result, ScoringError};
use crate::phase::transition_with_threshold;
use crate::registry::ModelRegistry;

/// One frame to analyse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Exercise name, matched case-insensitively.
    pub exercise_category: String,
    /// Current phase; `false` (the default) means the second half.
    #[serde(default)]
    pub first_half: bool,
    /// Detected landmarks for the frame.
    #[serde(default)]
    pub landmarks: Vec<LandmarkEntry>,
}

impl AnalysisRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(exercise: impl Into<String>, phase: Phase, landmarks: Vec<LandmarkEntry>) -> Self {
        Self {
            exercise_category: exercise.into(),
            first_half: phase.is_first_half(),
            landmarks,
        }
    }

    /// Returns the phase carried by the request.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        Phase::from_first_half(self.first_half)
    }

    /// Parses a request from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::Serialization`] for malformed JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ScoringError::Serialization(e.to_string()))
    }
}

/// Result of analysing one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// Similarity to the nearest exemplar, in `[0, 1]`.
    pub correctness: f64,
    /// Progress through the current phase, in `[0, 1]`.
    pub progress: f64,
    /// `true` when this frame completed a rising + falling cycle.
    pub finished_repetition: bool,
    /// Phase to send with the next frame.
    pub first_half: bool,
    /// First joint of the most divergent angle.
    pub most_divergent_angle_landmark_first: u8,
    /// Vertex joint of the most divergent angle.
    pub most_divergent_angle_landmark_middle: u8,
    /// Last joint of the most divergent angle.
    pub most_divergent_angle_landmark_last: u8,
    /// Live value of the most divergent angle, in degrees.
    pub most_divergent_angle_value: f64,
    /// Matched exemplar's value of the most divergent angle, in degrees.
    pub most_divergent_angle_ideal: f64,
}

impl AnalysisResponse {
    /// Returns the phase to send with the next frame.
    #[must_use]
    pub const fn next_phase(&self) -> Phase {
        Phase::from_first_half(self.first_half)
    }
}

/// Client-facing error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable explanation.
    pub error_msg: String,
}

impl From<&ScoringError> for ErrorResponse {
    fn from(err: &ScoringError) -> Self {
        Self {
            error_msg: err.to_string(),
        }
    }
}

/// Stateless frame analyser over a prebuilt [`ModelRegistry`].
///
/// Cheap to share: wrap it in an `Arc` or borrow it across threads.
#[derive(Debug, Clone)]
pub struct Analyzer {
    registry: ModelRegistry,
    computer: AngleComputer,
    repetition_threshold: f64,
}

impl Analyzer {
    /// Creates an analyser using the angle mode and threshold from `config`.
    #[must_use]
    pub fn new(registry: ModelRegistry, config: &ScoringConfig) -> Self {
        Self {
            registry,
            computer: AngleComputer::new(config.use_2d),
            repetition_threshold: config.repetition_threshold,
        }
    }

    /// Returns the model registry.
    #[must_use]
    pub const fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Analyses one frame.
    ///
    /// # Errors
    ///
    /// - [`AngleError::NoLandmarks`] if no usable landmarks were sent
    /// - [`ScoringError::UnsupportedExerciseOrPhase`] if no model exists
    /// - [`AngleError::MissingLandmark`] / [`AngleError::DegenerateGeometry`]
    ///   if the layout cannot be measured
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse> {
        let exercise = request.exercise_category.to_lowercase();
        let phase = request.phase();

        let report = Landmarks::ingest(&request.landmarks);
        if report.out_of_range > 0 || report.duplicates > 0 || report.non_finite > 0 {
            warn!(
                exercise = %exercise,
                out_of_range = report.out_of_range,
                duplicates = report.duplicates,
                non_finite = report.non_finite,
                "Dropped landmark entries"
            );
        }
        if report.landmarks.is_empty() {
            return Err(AngleError::NoLandmarks.into());
        }

        let model = self.registry.get(&exercise, phase)?;
        let layout = model.layout();
        let angles = self.computer.compute(&report.landmarks, layout.specs())?;
        let score = model.score(&angles)?;

        let next = transition_with_threshold(phase, score.progress, self.repetition_threshold);
        let spec = layout
            .get(score.most_divergent_index)
            .ok_or_else(|| ScoringError::length_mismatch(layout.len(), score.most_divergent_index))?;
        let [first, middle, last] = spec.joints();
        let value = angles
            .get(score.most_divergent_index)
            .ok_or_else(|| ScoringError::length_mismatch(layout.len(), angles.len()))?;

        debug!(
            model = %model.key(),
            correctness = score.correctness,
            progress = score.progress,
            next_phase = %next.phase,
            finished_repetition = next.finished_repetition,
            "Analysed frame"
        );

        Ok(AnalysisResponse {
            correctness: score.correctness,
            progress: score.progress,
            finished_repetition: next.finished_repetition,
            first_half: next.phase.is_first_half(),
            most_divergent_angle_landmark_first: first.get(),
            most_divergent_angle_landmark_middle: middle.get(),
            most_divergent_angle_landmark_last: last.get(),
            most_divergent_angle_value: value,
            most_divergent_angle_ideal: score.most_divergent_ideal,
        })
    }

    /// Scores a precomputed angle vector.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::UnsupportedExerciseOrPhase`] or
    /// [`ScoringError::AngleVectorLengthMismatch`].
    pub fn score_angles(
        &self,
        exercise: &str,
        phase: Phase,
        angles: &AngleVector,
    ) -> Result<ScoreResult> {
        self.registry.get(exercise, phase)?.score(angles)
    }

    /// Analyses independent frames in parallel.
    ///
    /// Results are in request order.
    #[must_use]
    pub fn analyze_batch(&self, requests: &[AnalysisRequest]) -> Vec<Result<AnalysisResponse>> {
        requests.par_iter().map(|request| self.analyze(request)).collect()
    }
}
