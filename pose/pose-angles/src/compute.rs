//! Angle extraction from landmarks.

use nalgebra::Vector3;
use pose_types::{AngleSpec, AngleVector, JointId, LandmarkPoint, Landmarks};

use crate::error::{AngleError, Result};

/// Computes the angle between two rays in degrees, in `[0, 180]`.
///
/// Returns `None` if either ray has zero length.
///
/// # Example
///
/// ```
/// use pose_angles::angle_between;
/// use nalgebra::Vector3;
///
/// let angle = angle_between(&Vector3::x(), &Vector3::y()).unwrap();
/// assert!((angle - 90.0).abs() < 1e-10);
/// assert!(angle_between(&Vector3::zeros(), &Vector3::y()).is_none());
/// ```
#[must_use]
pub fn angle_between(u: &Vector3<f64>, v: &Vector3<f64>) -> Option<f64> {
    let (nu, nv) = (u.norm(), v.norm());
    if nu < f64::EPSILON || nv < f64::EPSILON {
        return None;
    }
    // Near-parallel rays can push the cosine just outside [-1, 1].
    let cos = (u.dot(v) / (nu * nv)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Computes the angle at `vertex` between the rays to `first` and `last`.
///
/// Returns `None` if either ray has zero length.
#[must_use]
pub fn joint_angle(
    first: &LandmarkPoint,
    vertex: &LandmarkPoint,
    last: &LandmarkPoint,
    use_2d: bool,
) -> Option<f64> {
    let u = vertex.vector_to(first, use_2d);
    let v = vertex.vector_to(last, use_2d);
    angle_between(&u, &v)
}

/// Turns a frame's landmarks into an [`AngleVector`].
///
/// In planar mode only the `x`/`y` components are used, so angles are
/// measured in the image plane.
///
/// # Example
///
/// ```
/// use pose_angles::AngleComputer;
/// use pose_types::{AngleSpec, JointId, LandmarkPoint, Landmarks};
///
/// let landmarks: Landmarks = [
///     (JointId::LEFT_HIP, LandmarkPoint::new(0.0, 0.0, 0.0)),
///     (JointId::LEFT_KNEE, LandmarkPoint::new(0.0, 1.0, 0.0)),
///     (JointId::LEFT_ANKLE, LandmarkPoint::new(1.0, 1.0, 0.0)),
/// ]
/// .into_iter()
/// .collect();
///
/// let knee = AngleSpec::new(JointId::LEFT_HIP, JointId::LEFT_KNEE, JointId::LEFT_ANKLE);
/// let angles = AngleComputer::planar().compute(&landmarks, &[knee]).unwrap();
/// assert!((angles.as_slice()[0] - 90.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AngleComputer {
    use_2d: bool,
}

impl AngleComputer {
    /// Creates a computer; `use_2d` drops the depth component.
    #[must_use]
    pub const fn new(use_2d: bool) -> Self {
        Self { use_2d }
    }

    /// Creates a computer measuring angles in the image plane.
    #[must_use]
    pub const fn planar() -> Self {
        Self::new(true)
    }

    /// Creates a computer measuring angles in 3D.
    #[must_use]
    pub const fn spatial() -> Self {
        Self::new(false)
    }

    /// Returns `true` if depth is ignored.
    #[must_use]
    pub const fn is_planar(&self) -> bool {
        self.use_2d
    }

    /// Computes one angle per spec, in spec order.
    ///
    /// # Errors
    ///
    /// - [`AngleError::NoLandmarks`] if `landmarks` is empty
    /// - [`AngleError::MissingLandmark`] if a referenced joint is absent
    /// - [`AngleError::DegenerateGeometry`] if a ray has zero length
    pub fn compute(&self, landmarks: &Landmarks, specs: &[AngleSpec]) -> Result<AngleVector> {
        if landmarks.is_empty() {
            return Err(AngleError::NoLandmarks);
        }

        let lookup = |angle_index: usize, joint: JointId| {
            landmarks
                .get(joint)
                .ok_or(AngleError::missing(angle_index, joint))
        };

        let angles = specs
            .iter()
            .enumerate()
            .map(|(angle_index, spec)| {
                let first = lookup(angle_index, spec.first)?;
                let vertex = lookup(angle_index, spec.vertex)?;
                let last = lookup(angle_index, spec.last)?;
                joint_angle(first, vertex, last, self.use_2d)
                    .ok_or(AngleError::degenerate(angle_index, spec.vertex))
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(AngleVector::new(angles)?)
    }
}

impl Default for AngleComputer {
    fn default() -> Self {
        Self::planar()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn arm(elbow_z: f64) -> Landmarks {
        [
            (JointId::LEFT_SHOULDER, LandmarkPoint::new(0.0, 0.0, 0.0)),
            (JointId::LEFT_ELBOW, LandmarkPoint::new(0.0, 1.0, elbow_z)),
            (JointId::LEFT_WRIST, LandmarkPoint::new(1.0, 1.0, 0.0)),
        ]
        .into_iter()
        .collect()
    }

    const ELBOW: AngleSpec = AngleSpec::new(
        JointId::LEFT_SHOULDER,
        JointId::LEFT_ELBOW,
        JointId::LEFT_WRIST,
    );

    #[test]
    fn right_angle() {
        let angles = AngleComputer::planar().compute(&arm(0.0), &[ELBOW]).unwrap();
        assert_eq!(angles.len(), 1);
        assert_relative_eq!(angles.as_slice()[0], 90.0, epsilon = 1e-10);
    }

    #[test]
    fn straight_and_folded() {
        let straight = LandmarkPoint::new(0.0, 2.0, 0.0);
        let folded = LandmarkPoint::new(0.0, 0.5, 0.0);
        let a = LandmarkPoint::new(0.0, 0.0, 0.0);
        let v = LandmarkPoint::new(0.0, 1.0, 0.0);
        assert_relative_eq!(joint_angle(&a, &v, &straight, false).unwrap(), 180.0);
        assert_relative_eq!(joint_angle(&a, &v, &folded, false).unwrap(), 0.0);
    }

    #[test]
    fn planar_ignores_depth() {
        let planar = AngleComputer::planar().compute(&arm(5.0), &[ELBOW]).unwrap();
        let spatial = AngleComputer::spatial().compute(&arm(5.0), &[ELBOW]).unwrap();
        assert_relative_eq!(planar.as_slice()[0], 90.0, epsilon = 1e-10);
        assert!(spatial.as_slice()[0] < 90.0);
    }

    #[test]
    fn missing_joint_fails_whole_vector() {
        let mut landmarks = arm(0.0);
        landmarks.insert(JointId::LEFT_HIP, LandmarkPoint::new(0.0, 2.0, 0.0));
        let shoulder = AngleSpec::new(
            JointId::LEFT_ELBOW,
            JointId::LEFT_SHOULDER,
            JointId::LEFT_HIP,
        );
        let knee = AngleSpec::new(JointId::LEFT_HIP, JointId::LEFT_KNEE, JointId::LEFT_ANKLE);

        let err = AngleComputer::planar()
            .compute(&landmarks, &[ELBOW, shoulder, knee])
            .unwrap_err();
        assert!(matches!(
            err,
            AngleError::MissingLandmark {
                angle_index: 2,
                joint: JointId::LEFT_KNEE
            }
        ));
    }

    #[test]
    fn zero_length_ray_is_degenerate() {
        let landmarks: Landmarks = [
            (JointId::LEFT_SHOULDER, LandmarkPoint::new(0.0, 1.0, 0.0)),
            (JointId::LEFT_ELBOW, LandmarkPoint::new(0.0, 1.0, 0.0)),
            (JointId::LEFT_WRIST, LandmarkPoint::new(1.0, 1.0, 0.0)),
        ]
        .into_iter()
        .collect();
        let err = AngleComputer::planar().compute(&landmarks, &[ELBOW]).unwrap_err();
        assert!(matches!(
            err,
            AngleError::DegenerateGeometry {
                angle_index: 0,
                vertex: JointId::LEFT_ELBOW
            }
        ));
    }

    #[test]
    fn depth_only_ray_is_degenerate_in_2d() {
        let landmarks: Landmarks = [
            (JointId::LEFT_SHOULDER, LandmarkPoint::new(0.0, 1.0, 3.0)),
            (JointId::LEFT_ELBOW, LandmarkPoint::new(0.0, 1.0, 0.0)),
            (JointId::LEFT_WRIST, LandmarkPoint::new(1.0, 1.0, 0.0)),
        ]
        .into_iter()
        .collect();
        assert!(AngleComputer::planar().compute(&landmarks, &[ELBOW]).is_err());
        assert!(AngleComputer::spatial().compute(&landmarks, &[ELBOW]).is_ok());
    }

    #[test]
    fn empty_landmarks() {
        let err = AngleComputer::default()
            .compute(&Landmarks::new(), &[ELBOW])
            .unwrap_err();
        assert!(matches!(err, AngleError::NoLandmarks));
    }

    #[test]
    fn default_is_planar() {
        assert!(AngleComputer::default().is_planar());
        assert!(!AngleComputer::spatial().is_planar());
    }
}
