//! Landmark coordinates and per-frame landmark maps.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::joint::JointId;

/// A single detected body landmark.
///
/// Coordinates live in the normalized image/world space produced by the
/// upstream pose detector. `visibility` is the detector confidence when
/// available.
///
/// # Example
///
/// ```
/// use pose_types::LandmarkPoint;
///
/// let hip = LandmarkPoint::new(0.5, 0.6, -0.1);
/// let knee = LandmarkPoint::new(0.5, 0.8, 0.2);
///
/// // In 2D the depth component is ignored.
/// let ray = hip.vector_to(&knee, true);
/// assert!((ray.z).abs() < 1e-12);
/// assert!((ray.y - 0.2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Depth coordinate.
    pub z: f64,
    /// Detector confidence, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl LandmarkPoint {
    /// Creates a landmark without visibility information.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            visibility: None,
        }
    }

    /// Sets the visibility value.
    #[must_use]
    pub const fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Returns the landmark position as a point.
    #[must_use]
    pub fn position(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    /// Returns the vector from this landmark to `other`.
    ///
    /// When `use_2d` is set the depth component is dropped, so the vector
    /// lies in the image plane.
    #[must_use]
    pub fn vector_to(&self, other: &Self, use_2d: bool) -> Vector3<f64> {
        let mut v = other.position() - self.position();
        if use_2d {
            v.z = 0.0;
        }
        v
    }

    /// Returns `true` if every coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A landmark as it arrives on the wire: a flat `{id, x, y, z}` record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkEntry {
    /// Raw joint id. Values outside `0..=32` are dropped during ingestion.
    pub id: i64,
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Depth coordinate.
    pub z: f64,
    /// Detector confidence, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl LandmarkEntry {
    /// Creates an entry without visibility information.
    #[must_use]
    pub const fn new(id: i64, x: f64, y: f64, z: f64) -> Self {
        Self {
            id,
            x,
            y,
            z,
            visibility: None,
        }
    }

    const fn point(&self) -> LandmarkPoint {
        LandmarkPoint {
            x: self.x,
            y: self.y,
            z: self.z,
            visibility: self.visibility,
        }
    }
}

/// Outcome of collecting wire entries into a [`Landmarks`] map.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    /// The collected landmarks.
    pub landmarks: Landmarks,
    /// Entries dropped because their id was outside the topology.
    pub out_of_range: usize,
    /// Entries dropped because an earlier entry had the same id.
    pub duplicates: usize,
    /// Entries dropped because a coordinate was `NaN` or infinite.
    pub non_finite: usize,
}

/// Mapping from joint id to landmark for one captured frame.
///
/// Holds one slot per joint of the topology. Built only through
/// [`Landmarks::new`], [`Landmarks::ingest`] or `collect`; it has no wire
/// form of its own.
///
/// # Example
///
/// ```
/// use pose_types::{JointId, LandmarkEntry, Landmarks};
///
/// let entries = [
///     LandmarkEntry::new(11, 0.4, 0.3, 0.0),
///     LandmarkEntry::new(11, 0.9, 0.9, 0.0), // duplicate, ignored
///     LandmarkEntry::new(99, 0.0, 0.0, 0.0), // out of range, ignored
///     LandmarkEntry::new(12, f64::NAN, 0.3, 0.0), // non-finite, ignored
/// ];
///
/// let landmarks = Landmarks::from_entries(&entries);
/// assert_eq!(landmarks.len(), 1);
/// let shoulder = landmarks.get(JointId::LEFT_SHOULDER).unwrap();
/// assert!((shoulder.x - 0.4).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Landmarks {
    points: Vec<Option<LandmarkPoint>>,
}

impl Landmarks {
    /// Creates an empty landmark map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            points: vec![None; JointId::COUNT],
        }
    }

    /// Collects wire entries into a landmark map.
    ///
    /// Entries with ids outside the topology or with a non-finite
    /// coordinate are dropped. Duplicate ids keep their first occurrence.
    /// A dropped entry never poisons the frame: angles that need the joint
    /// report it as missing.
    #[must_use]
    pub fn ingest(entries: &[LandmarkEntry]) -> IngestReport {
        let mut landmarks = Self::new();
        let mut out_of_range = 0;
        let mut duplicates = 0;
        let mut non_finite = 0;

        for entry in entries {
            let Ok(joint) = JointId::new(entry.id) else {
                out_of_range += 1;
                continue;
            };
            if landmarks.contains(joint) {
                duplicates += 1;
                continue;
            }
            let point = entry.point();
            if !point.is_finite() {
                non_finite += 1;
                continue;
            }
            landmarks.insert(joint, point);
        }

        IngestReport {
            landmarks,
            out_of_range,
            duplicates,
            non_finite,
        }
    }

    /// Collects wire entries into a landmark map, discarding the report.
    #[must_use]
    pub fn from_entries(entries: &[LandmarkEntry]) -> Self {
        Self::ingest(entries).landmarks
    }

    /// Inserts or replaces the landmark for `joint`.
    pub fn insert(&mut self, joint: JointId, point: LandmarkPoint) {
        self.points[joint.index()] = Some(point);
    }

    /// Returns the landmark for `joint`, if present.
    #[must_use]
    pub fn get(&self, joint: JointId) -> Option<&LandmarkPoint> {
        self.points.get(joint.index()).and_then(Option::as_ref)
    }

    /// Returns `true` if a landmark is present for `joint`.
    #[must_use]
    pub fn contains(&self, joint: JointId) -> bool {
        self.get(joint).is_some()
    }

    /// Returns the number of present landmarks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.iter().filter(|p| p.is_some()).count()
    }

    /// Returns `true` if no landmark is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over present landmarks in joint id order.
    pub fn iter(&self) -> impl Iterator<Item = (JointId, &LandmarkPoint)> {
        JointId::all().filter_map(|joint| self.get(joint).map(|point| (joint, point)))
    }
}

impl Default for Landmarks {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(JointId, LandmarkPoint)> for Landmarks {
    fn from_iter<I: IntoIterator<Item = (JointId, LandmarkPoint)>>(iter: I) -> Self {
        let mut landmarks = Self::new();
        for (joint, point) in iter {
            landmarks.insert(joint, point);
        }
        landmarks
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn point_vector_3d() {
        let a = LandmarkPoint::new(0.0, 0.0, 0.0);
        let b = LandmarkPoint::new(1.0, 2.0, 3.0);
        let v = a.vector_to(&b, false);
        assert_relative_eq!(v.x, 1.0);
        assert_relative_eq!(v.y, 2.0);
        assert_relative_eq!(v.z, 3.0);
    }

    #[test]
    fn point_vector_2d_drops_depth() {
        let a = LandmarkPoint::new(0.0, 0.0, 5.0);
        let b = LandmarkPoint::new(1.0, 2.0, -3.0);
        let v = a.vector_to(&b, true);
        assert_relative_eq!(v.z, 0.0);
        assert_relative_eq!(v.norm(), 5.0_f64.sqrt());
    }

    #[test]
    fn point_visibility() {
        let p = LandmarkPoint::new(0.1, 0.2, 0.3).with_visibility(0.9);
        assert_eq!(p.visibility, Some(0.9));
        assert!(p.is_finite());
        assert!(!LandmarkPoint::new(f64::NAN, 0.0, 0.0).is_finite());
    }

    #[test]
    fn ingest_counts_dropped_entries() {
        let entries = [
            LandmarkEntry::new(0, 0.1, 0.1, 0.0),
            LandmarkEntry::new(0, 0.2, 0.2, 0.0),
            LandmarkEntry::new(33, 0.3, 0.3, 0.0),
            LandmarkEntry::new(-4, 0.3, 0.3, 0.0),
            LandmarkEntry::new(32, 0.4, 0.4, 0.0),
        ];
        let report = Landmarks::ingest(&entries);
        assert_eq!(report.landmarks.len(), 2);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.out_of_range, 2);
        assert_eq!(report.non_finite, 0);
        assert_relative_eq!(report.landmarks.get(JointId::NOSE).unwrap().x, 0.1);
    }

    #[test]
    fn ingest_drops_non_finite_entries() {
        let mut entries: Vec<_> = (0..33)
            .map(|id| LandmarkEntry::new(id, 0.5, 0.5, 0.0))
            .collect();
        entries[0].x = f64::NAN;
        entries[5].y = f64::INFINITY;

        let report = Landmarks::ingest(&entries);
        assert_eq!(report.non_finite, 2);
        assert_eq!(report.out_of_range, 0);
        assert_eq!(report.landmarks.len(), 31);
        assert!(!report.landmarks.contains(JointId::NOSE));
        assert!(report.landmarks.contains(JointId::LEFT_SHOULDER));
        assert!(report.landmarks.iter().all(|(_, point)| point.is_finite()));
    }

    #[test]
    fn ingest_keeps_first_finite_over_later_non_finite() {
        let entries = [
            LandmarkEntry::new(5, 0.1, 0.1, 0.0),
            LandmarkEntry::new(5, f64::NAN, 0.1, 0.0),
        ];
        let report = Landmarks::ingest(&entries);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.non_finite, 0);
        assert_relative_eq!(report.landmarks.get(JointId::new(5).unwrap()).unwrap().x, 0.1);
    }

    #[test]
    fn empty_landmarks() {
        let landmarks = Landmarks::from_entries(&[]);
        assert!(landmarks.is_empty());
        assert!(Landmarks::default().is_empty());
        assert!(Landmarks::default().get(JointId::NOSE).is_none());
    }

    #[test]
    fn insert_into_default() {
        let mut landmarks = Landmarks::default();
        landmarks.insert(JointId::LEFT_HIP, LandmarkPoint::new(1.0, 1.0, 1.0));
        assert!(landmarks.contains(JointId::LEFT_HIP));
        assert_eq!(landmarks.len(), 1);
    }

    #[test]
    fn every_joint_has_a_slot() {
        let landmarks: Landmarks = JointId::all()
            .map(|joint| (joint, LandmarkPoint::new(0.0, 0.0, 0.0)))
            .collect();
        assert_eq!(landmarks.len(), JointId::COUNT);
        assert!(JointId::all().all(|joint| landmarks.contains(joint)));
    }

    #[test]
    fn collect_and_iterate() {
        let landmarks: Landmarks = [
            (JointId::RIGHT_KNEE, LandmarkPoint::new(0.0, 1.0, 0.0)),
            (JointId::LEFT_KNEE, LandmarkPoint::new(1.0, 0.0, 0.0)),
        ]
        .into_iter()
        .collect();

        let ids: Vec<_> = landmarks.iter().map(|(joint, _)| joint).collect();
        assert_eq!(ids, vec![JointId::LEFT_KNEE, JointId::RIGHT_KNEE]);
    }
}
