//! Nearest-exemplar scoring over Euclidean distance in angle space.
//!
//! Correctness comes from the single nearest exemplar. Progress is a
//! k-nearest-neighbour regression over the exemplars' progress labels with
//! an adaptive linear kernel: neighbour `i` is weighted by `d_k - d_i`,
//! where `d_k` is the distance to the first exemplar outside the
//! neighbourhood. A neighbour entering or leaving the neighbourhood does so
//! with zero weight, so the estimate varies continuously with the pose.
//!
//! The one exception is an exact tie, where the `k` nearest exemplars and
//! the first one outside are all equidistant. Every weight is then zero
//! and the estimate falls back to the mean label of all `k + 1` tied
//! exemplars, independent of insertion order. Approaching such a point
//! from different directions can give different limits, so progress is
//! discontinuous there. It stays within `[0, 1]`.

// Exemplar counts and layout lengths are small; casts are exact.
#![allow(clippy::cast_precision_loss)]

use pose_types::{AngleLayout, AngleVector, Phase, ReferenceExemplar, clamp_unit};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ScoringError};
use crate::model::{Correctness, ModelKey, ScoringModel};

/// Parameters for [`KnnModel`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnnParams {
    /// Neighbours used for progress regression.
    pub k: usize,
    /// RMS per-angle deviation (degrees) at which correctness reaches 0.
    pub tolerance_deg: f64,
}

impl Default for KnnParams {
    fn default() -> Self {
        Self {
            k: 5,
            tolerance_deg: 30.0,
        }
    }
}

impl KnnParams {
    /// Checks the parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::InvalidConfig`] if `k` is zero or the
    /// tolerance is not a positive finite number.
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(ScoringError::invalid_config("k must be at least 1"));
        }
        if !(self.tolerance_deg.is_finite() && self.tolerance_deg > 0.0) {
            return Err(ScoringError::invalid_config(format!(
                "correctness tolerance must be positive, got {}",
                self.tolerance_deg
            )));
        }
        Ok(())
    }
}

/// Exemplar-matching model for one exercise and phase.
///
/// # Example
///
/// ```
/// use pose_angles::LayoutCatalog;
/// use pose_scoring::{KnnModel, KnnParams, ModelKey, ScoringModel};
/// use pose_types::{AngleVector, Phase, ReferenceExemplar};
///
/// let layout = LayoutCatalog::standard().resolve("bicep_curl").clone();
/// let key = ModelKey::new("bicep_curl", Phase::FirstHalf);
/// let exemplar = |angles: [f64; 4], progress| {
///     ReferenceExemplar::new(
///         "bicep_curl",
///         Phase::FirstHalf,
///         AngleVector::new(angles.to_vec()).unwrap(),
///         progress,
///     )
/// };
///
/// let model = KnnModel::build(
///     key,
///     layout,
///     vec![
///         exemplar([170.0, 170.0, 10.0, 10.0], 0.0),
///         exemplar([90.0, 90.0, 12.0, 12.0], 0.5),
///         exemplar([40.0, 40.0, 15.0, 15.0], 1.0),
///     ],
///     KnnParams::default(),
/// )
/// .unwrap();
///
/// let live = AngleVector::new(vec![90.0, 90.0, 12.0, 12.0]).unwrap();
/// let correctness = model.correctness(&live).unwrap();
/// assert!((correctness.score - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct KnnModel {
    key: ModelKey,
    layout: AngleLayout,
    exemplars: Vec<ReferenceExemplar>,
    params: KnnParams,
}

impl KnnModel {
    /// Builds a model over `exemplars`.
    ///
    /// # Errors
    ///
    /// - [`ScoringError::InvalidConfig`] if `params` are invalid
    /// - [`ScoringError::EmptyLayout`] if `layout` has no angles
    /// - [`ScoringError::EmptyReferenceSet`] if `exemplars` is empty
    /// - [`ScoringError::MixedReferenceSet`] if an exemplar has another
    ///   exercise or phase than `key`
    /// - [`ScoringError::AngleVectorLengthMismatch`] if an exemplar does
    ///   not match the layout length
    pub fn build(
        key: ModelKey,
        layout: AngleLayout,
        exemplars: Vec<ReferenceExemplar>,
        params: KnnParams,
    ) -> Result<Self> {
        params.validate()?;

        if layout.is_empty() {
            return Err(ScoringError::EmptyLayout {
                exercise: key.exercise().to_string(),
                layout: layout.name().to_string(),
            });
        }
        if exemplars.is_empty() {
            return Err(ScoringError::empty_reference_set(key.exercise(), key.phase()));
        }

        for (index, exemplar) in exemplars.iter().enumerate() {
            if exemplar.exercise() != key.exercise() || exemplar.phase() != key.phase() {
                return Err(ScoringError::MixedReferenceSet {
                    index,
                    expected: key.to_string(),
                    found: ModelKey::new(exemplar.exercise(), exemplar.phase()).to_string(),
                });
            }
            if exemplar.angles().len() != layout.len() {
                return Err(ScoringError::length_mismatch(
                    layout.len(),
                    exemplar.angles().len(),
                ));
            }
        }

        info!(
            model = %key,
            layout = layout.name(),
            angles = layout.len(),
            exemplars = exemplars.len(),
            k = params.k,
            "Built exemplar model"
        );

        Ok(Self {
            key,
            layout,
            exemplars,
            params,
        })
    }

    /// Returns the exemplars in insertion order.
    #[must_use]
    pub fn exemplars(&self) -> &[ReferenceExemplar] {
        &self.exemplars
    }

    /// Returns the model parameters.
    #[must_use]
    pub const fn params(&self) -> &KnnParams {
        &self.params
    }

    /// Returns the phase this model scores.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.key.phase()
    }

    /// Returns the `n` nearest exemplars as `(index, distance)` pairs.
    ///
    /// Sorted by distance; ties keep insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::AngleVectorLengthMismatch`] if `live` does
    /// not match the layout length.
    pub fn nearest(&self, live: &AngleVector, n: usize) -> Result<Vec<(usize, f64)>> {
        self.check_len(live)?;
        let mut ranked = self
            .exemplars
            .iter()
            .enumerate()
            .map(|(index, exemplar)| -> Result<(usize, f64)> {
                Ok((index, live.distance(exemplar.angles())?))
            })
            .collect::<Result<Vec<_>>>()?;
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked.truncate(n);
        Ok(ranked)
    }

    /// Distance at which correctness reaches zero.
    fn distance_scale(&self) -> f64 {
        self.params.tolerance_deg * (self.layout.len() as f64).sqrt()
    }
}

impl ScoringModel for KnnModel {
    fn key(&self) -> &ModelKey {
        &self.key
    }

    fn layout(&self) -> &AngleLayout {
        &self.layout
    }

    fn correctness(&self, live: &AngleVector) -> Result<Correctness> {
        let (index, distance) = self
            .nearest(live, 1)?
            .first()
            .copied()
            .ok_or_else(|| ScoringError::empty_reference_set(self.key.exercise(), self.phase()))?;
        let matched = self.exemplars[index].angles();

        let (most_divergent_index, _) = live
            .max_abs_difference(matched)?
            .ok_or_else(|| ScoringError::length_mismatch(self.layout.len(), 0))?;
        let most_divergent_ideal = matched
            .get(most_divergent_index)
            .ok_or_else(|| ScoringError::length_mismatch(self.layout.len(), matched.len()))?;

        let score = clamp_unit(1.0 - distance / self.distance_scale());

        debug!(
            model = %self.key,
            exemplar = index,
            distance,
            score,
            most_divergent_index,
            "Scored correctness"
        );

        Ok(Correctness {
            score,
            most_divergent_index,
            most_divergent_ideal,
            distance,
        })
    }

    fn progress(&self, live: &AngleVector) -> Result<f64> {
        let k = self.params.k;
        let ranked = self.nearest(live, k + 1)?;

        let (neighbours, bandwidth) = if ranked.len() > k {
            (&ranked[..k], ranked[k].1)
        } else {
            // Fewer exemplars than k + 1: every exemplar is a neighbour and
            // the kernel is widened by one tolerance radius.
            let farthest = ranked.last().map_or(0.0, |&(_, d)| d);
            (&ranked[..], farthest + self.distance_scale())
        };

        let mut weighted = 0.0;
        let mut total = 0.0;
        for &(index, distance) in neighbours {
            let weight = (bandwidth - distance).max(0.0);
            weighted += weight * self.exemplars[index].progress();
            total += weight;
        }

        let progress = if total > f64::EPSILON {
            weighted / total
        } else {
            // Neighbours tie with the bandwidth exemplar: mean over all of them.
            let sum: f64 = ranked
                .iter()
                .map(|&(index, _)| self.exemplars[index].progress())
                .sum();
            sum / ranked.len().max(1) as f64
        };
        let progress = clamp_unit(progress);

        debug!(model = %self.key, neighbours = neighbours.len(), progress, "Estimated progress");

        Ok(progress)
    }
}
