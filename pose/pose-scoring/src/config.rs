//! Scoring configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};
use crate::knn::KnnParams;
use crate::phase::REPETITION_THRESHOLD;

/// Configuration for building models and analysing frames.
///
/// Missing TOML keys fall back to the defaults.
///
/// # Example
///
/// ```
/// use pose_scoring::ScoringConfig;
///
/// let config = ScoringConfig::from_toml_str("k = 3\nuse_2d = false\n").unwrap();
/// assert_eq!(config.k, 3);
/// assert!(!config.use_2d);
/// assert!((config.repetition_threshold - 0.85).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Neighbours used for progress regression.
    ///
    /// Values of 2 or more give a progress estimate that varies smoothly
    /// with the pose; 1 degenerates to nearest-neighbour lookup.
    pub k: usize,

    /// RMS per-angle deviation (degrees) at which correctness reaches 0.
    pub correctness_tolerance_deg: f64,

    /// Progress above which the phase flips.
    pub repetition_threshold: f64,

    /// Measure angles in the image plane, ignoring depth.
    pub use_2d: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            k: 5,
            correctness_tolerance_deg: 30.0,
            repetition_threshold: REPETITION_THRESHOLD,
            use_2d: true,
        }
    }
}

impl ScoringConfig {
    /// Sets the neighbour count.
    #[must_use]
    pub const fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Sets the correctness tolerance.
    #[must_use]
    pub const fn with_tolerance(mut self, degrees: f64) -> Self {
        self.correctness_tolerance_deg = degrees;
        self
    }

    /// Sets the repetition threshold.
    #[must_use]
    pub const fn with_repetition_threshold(mut self, threshold: f64) -> Self {
        self.repetition_threshold = threshold;
        self
    }

    /// Sets planar (`true`) or spatial (`false`) angle measurement.
    #[must_use]
    pub const fn with_2d(mut self, use_2d: bool) -> Self {
        self.use_2d = use_2d;
        self
    }

    /// Returns the k-NN parameters derived from this config.
    #[must_use]
    pub const fn knn_params(&self) -> KnnParams {
        KnnParams {
            k: self.k,
            tolerance_deg: self.correctness_tolerance_deg,
        }
    }

    /// Checks every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::InvalidConfig`] naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        self.knn_params().validate()?;
        if !(0.0..1.0).contains(&self.repetition_threshold) {
            return Err(ScoringError::invalid_config(format!(
                "repetition_threshold must be in [0, 1), got {}",
                self.repetition_threshold
            )));
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::Serialization`] for malformed TOML and
    /// [`ScoringError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml).map_err(|e| ScoringError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::Io`] if the file cannot be read, otherwise
    /// see [`ScoringConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ScoringError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&contents)
    }

    /// Serialises the config to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::Serialization`] if encoding fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ScoringError::Serialization(e.to_string()))
    }
}
