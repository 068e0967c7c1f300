//! Joint-angle specifications, layouts and per-frame angle vectors.

use serde::{Deserialize, Serialize};

use crate::error::{PoseTypesError, Result};
use crate::joint::JointId;

/// The angle at `vertex` between the rays to `first` and `last`.
///
/// # Example
///
/// ```
/// use pose_types::{AngleSpec, JointId};
///
/// let left_knee = AngleSpec::new(JointId::LEFT_HIP, JointId::LEFT_KNEE, JointId::LEFT_ANKLE);
/// assert_eq!(left_knee.vertex, JointId::LEFT_KNEE);
/// assert_eq!(left_knee.joints(), [JointId::LEFT_HIP, JointId::LEFT_KNEE, JointId::LEFT_ANKLE]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AngleSpec {
    /// End of the first ray.
    pub first: JointId,
    /// Joint at which the angle is measured.
    pub vertex: JointId,
    /// End of the second ray.
    pub last: JointId,
}

impl AngleSpec {
    /// Creates an angle specification.
    #[must_use]
    pub const fn new(first: JointId, vertex: JointId, last: JointId) -> Self {
        Self {
            first,
            vertex,
            last,
        }
    }

    /// Returns the three joints as `[first, vertex, last]`.
    #[must_use]
    pub const fn joints(&self) -> [JointId; 3] {
        [self.first, self.vertex, self.last]
    }
}

/// A named, ordered sequence of [`AngleSpec`]s.
///
/// The order fixes what each index of an [`AngleVector`] means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AngleLayout {
    name: String,
    specs: Vec<AngleSpec>,
}

impl AngleLayout {
    /// Creates a layout.
    #[must_use]
    pub fn new(name: impl Into<String>, specs: Vec<AngleSpec>) -> Self {
        Self {
            name: name.into(),
            specs,
        }
    }

    /// Returns the layout name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the angle specifications in index order.
    #[must_use]
    pub fn specs(&self) -> &[AngleSpec] {
        &self.specs
    }

    /// Returns the specification at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&AngleSpec> {
        self.specs.get(index)
    }

    /// Returns the number of angles in the layout.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns `true` if the layout has no angles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// One frame's joint angles in degrees, index-aligned with an [`AngleLayout`].
///
/// # Example
///
/// ```
/// use pose_types::AngleVector;
///
/// let a = AngleVector::new(vec![90.0, 180.0]).unwrap();
/// let b = AngleVector::new(vec![93.0, 176.0]).unwrap();
/// assert!((a.distance(&b).unwrap() - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AngleVector(Vec<f64>);

impl AngleVector {
    /// Creates an angle vector, rejecting non-finite values.
    ///
    /// # Errors
    ///
    /// Returns [`PoseTypesError::InvalidAngle`] for the first `NaN` or
    /// infinite entry.
    pub fn new(angles: Vec<f64>) -> Result<Self> {
        if let Some((index, &value)) = angles.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(PoseTypesError::InvalidAngle { index, value });
        }
        Ok(Self(angles))
    }

    /// Returns the angles as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Returns the angle at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Returns the number of angles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the vector is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the vector, returning the raw angles.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Squared Euclidean distance in angle space.
    ///
    /// # Errors
    ///
    /// Returns [`PoseTypesError::LengthMismatch`] if the lengths differ.
    pub fn distance_squared(&self, other: &Self) -> Result<f64> {
        self.check_len(other)?;
        Ok(self
            .0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| (a - b) * (a - b))
            .sum())
    }

    /// Euclidean distance in angle space.
    ///
    /// # Errors
    ///
    /// Returns [`PoseTypesError::LengthMismatch`] if the lengths differ.
    pub fn distance(&self, other: &Self) -> Result<f64> {
        self.distance_squared(other).map(f64::sqrt)
    }

    /// Index and magnitude of the largest per-angle absolute difference.
    ///
    /// Ties resolve to the lowest index. Returns `None` for empty vectors.
    ///
    /// # Errors
    ///
    /// Returns [`PoseTypesError::LengthMismatch`] if the lengths differ.
    pub fn max_abs_difference(&self, other: &Self) -> Result<Option<(usize, f64)>> {
        self.check_len(other)?;
        let mut best: Option<(usize, f64)> = None;
        for (index, (a, b)) in self.0.iter().zip(&other.0).enumerate() {
            let diff = (a - b).abs();
            if best.is_none_or(|(_, d)| diff > d) {
                best = Some((index, diff));
            }
        }
        Ok(best)
    }

    fn check_len(&self, other: &Self) -> Result<()> {
        if self.len() == other.len() {
            Ok(())
        } else {
            Err(PoseTypesError::length_mismatch(self.len(), other.len()))
        }
    }
}

impl TryFrom<Vec<f64>> for AngleVector {
    type Error = PoseTypesError;

    fn try_from(angles: Vec<f64>) -> Result<Self> {
        Self::new(angles)
    }
}

impl AsRef<[f64]> for AngleVector {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn vector(values: &[f64]) -> AngleVector {
        AngleVector::new(values.to_vec()).unwrap()
    }

    #[test]
    fn angle_vector_rejects_nan() {
        let err = AngleVector::new(vec![1.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, PoseTypesError::InvalidAngle { index: 1, .. }));
    }

    #[test]
    fn distance_between_vectors() {
        let a = vector(&[0.0, 0.0, 0.0]);
        let b = vector(&[1.0, 2.0, 2.0]);
        assert_relative_eq!(a.distance(&b).unwrap(), 3.0);
        assert_relative_eq!(a.distance_squared(&b).unwrap(), 9.0);
        assert_relative_eq!(a.distance(&a).unwrap(), 0.0);
    }

    #[test]
    fn distance_length_mismatch() {
        let a = vector(&[0.0, 0.0]);
        let b = vector(&[0.0, 0.0, 0.0]);
        assert!(matches!(
            a.distance(&b),
            Err(PoseTypesError::LengthMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn max_abs_difference_picks_largest() {
        let a = vector(&[10.0, 20.0, 30.0]);
        let b = vector(&[12.0, 5.0, 31.0]);
        let (index, diff) = a.max_abs_difference(&b).unwrap().unwrap();
        assert_eq!(index, 1);
        assert_relative_eq!(diff, 15.0);
    }

    #[test]
    fn max_abs_difference_ties_go_to_lowest_index() {
        let a = vector(&[0.0, 0.0, 0.0]);
        let b = vector(&[4.0, -4.0, 4.0]);
        let (index, _) = a.max_abs_difference(&b).unwrap().unwrap();
        assert_eq!(index, 0);
    }

    #[test]
    fn max_abs_difference_empty() {
        let a = vector(&[]);
        assert!(a.max_abs_difference(&a).unwrap().is_none());
    }

    #[test]
    fn layout_accessors() {
        let spec = AngleSpec::new(JointId::LEFT_HIP, JointId::LEFT_KNEE, JointId::LEFT_ANKLE);
        let layout = AngleLayout::new("legs", vec![spec]);
        assert_eq!(layout.name(), "legs");
        assert_eq!(layout.len(), 1);
        assert!(!layout.is_empty());
        assert_eq!(layout.get(0), Some(&spec));
        assert!(layout.get(1).is_none());
    }

    #[test]
    fn angle_vector_serializes_as_array() {
        let v = vector(&[90.0, 45.5]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "[90.0,45.5]");
        let parsed: AngleVector = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, v);
    }
}
