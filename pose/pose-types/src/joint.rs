//! Joint identifiers for the 33-point full-body topology.

use serde::{Deserialize, Serialize};

use crate::error::{PoseTypesError, Result};

/// Identifier of a body joint in the standard 33-point full-body topology.
///
/// Valid ids are `0..=32`. The associated constants name the joints that
/// the built-in angle layouts refer to.
///
/// # Example
///
/// ```
/// use pose_types::JointId;
///
/// let knee = JointId::new(25).unwrap();
/// assert_eq!(knee, JointId::LEFT_KNEE);
/// assert_eq!(knee.name(), "left_knee");
/// assert!(JointId::new(33).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct JointId(u8);

impl JointId {
    /// Number of joints in the topology.
    pub const COUNT: usize = 33;

    /// Nose.
    pub const NOSE: Self = Self(0);
    /// Left eye (inner).
    pub const LEFT_EYE_INNER: Self = Self(1);
    /// Left eye.
    pub const LEFT_EYE: Self = Self(2);
    /// Left eye (outer).
    pub const LEFT_EYE_OUTER: Self = Self(3);
    /// Right eye (inner).
    pub const RIGHT_EYE_INNER: Self = Self(4);
    /// Right eye.
    pub const RIGHT_EYE: Self = Self(5);
    /// Right eye (outer).
    pub const RIGHT_EYE_OUTER: Self = Self(6);
    /// Left ear.
    pub const LEFT_EAR: Self = Self(7);
    /// Right ear.
    pub const RIGHT_EAR: Self = Self(8);
    /// Left corner of the mouth.
    pub const MOUTH_LEFT: Self = Self(9);
    /// Right corner of the mouth.
    pub const MOUTH_RIGHT: Self = Self(10);
    /// Left shoulder.
    pub const LEFT_SHOULDER: Self = Self(11);
    /// Right shoulder.
    pub const RIGHT_SHOULDER: Self = Self(12);
    /// Left elbow.
    pub const LEFT_ELBOW: Self = Self(13);
    /// Right elbow.
    pub const RIGHT_ELBOW: Self = Self(14);
    /// Left wrist.
    pub const LEFT_WRIST: Self = Self(15);
    /// Right wrist.
    pub const RIGHT_WRIST: Self = Self(16);
    /// Left pinky knuckle.
    pub const LEFT_PINKY: Self = Self(17);
    /// Right pinky knuckle.
    pub const RIGHT_PINKY: Self = Self(18);
    /// Left index knuckle.
    pub const LEFT_INDEX: Self = Self(19);
    /// Right index knuckle.
    pub const RIGHT_INDEX: Self = Self(20);
    /// Left thumb.
    pub const LEFT_THUMB: Self = Self(21);
    /// Right thumb.
    pub const RIGHT_THUMB: Self = Self(22);
    /// Left hip.
    pub const LEFT_HIP: Self = Self(23);
    /// Right hip.
    pub const RIGHT_HIP: Self = Self(24);
    /// Left knee.
    pub const LEFT_KNEE: Self = Self(25);
    /// Right knee.
    pub const RIGHT_KNEE: Self = Self(26);
    /// Left ankle.
    pub const LEFT_ANKLE: Self = Self(27);
    /// Right ankle.
    pub const RIGHT_ANKLE: Self = Self(28);
    /// Left heel.
    pub const LEFT_HEEL: Self = Self(29);
    /// Right heel.
    pub const RIGHT_HEEL: Self = Self(30);
    /// Left foot index (toe).
    pub const LEFT_FOOT_INDEX: Self = Self(31);
    /// Right foot index (toe).
    pub const RIGHT_FOOT_INDEX: Self = Self(32);

    const NAMES: [&'static str; Self::COUNT] = [
        "nose",
        "left_eye_inner",
        "left_eye",
        "left_eye_outer",
        "right_eye_inner",
        "right_eye",
        "right_eye_outer",
        "left_ear",
        "right_ear",
        "mouth_left",
        "mouth_right",
        "left_shoulder",
        "right_shoulder",
        "left_elbow",
        "right_elbow",
        "left_wrist",
        "right_wrist",
        "left_pinky",
        "right_pinky",
        "left_index",
        "right_index",
        "left_thumb",
        "right_thumb",
        "left_hip",
        "right_hip",
        "left_knee",
        "right_knee",
        "left_ankle",
        "right_ankle",
        "left_heel",
        "right_heel",
        "left_foot_index",
        "right_foot_index",
    ];

    /// Creates a joint id, rejecting values outside `0..=32`.
    ///
    /// # Errors
    ///
    /// Returns [`PoseTypesError::InvalidJointId`] if `id` is out of range.
    pub fn new(id: i64) -> Result<Self> {
        u8::try_from(id)
            .ok()
            .filter(|&v| usize::from(v) < Self::COUNT)
            .map(Self)
            .ok_or(PoseTypesError::InvalidJointId(id))
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the id as an index into a per-joint table.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the snake-case joint name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        Self::NAMES[self.0 as usize]
    }

    /// Iterates over every joint in id order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).filter_map(|i| u8::try_from(i).ok()).map(Self)
    }
}

impl TryFrom<i64> for JointId {
    type Error = PoseTypesError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<JointId> for u8 {
    fn from(joint: JointId) -> Self {
        joint.0
    }
}

impl std::fmt::Display for JointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn joint_range() {
        assert!(JointId::new(0).is_ok());
        assert!(JointId::new(32).is_ok());
        assert!(JointId::new(33).is_err());
        assert!(JointId::new(-1).is_err());
        assert!(JointId::new(i64::from(u8::MAX) + 1).is_err());
    }

    #[test]
    fn joint_names_match_constants() {
        assert_eq!(JointId::NOSE.name(), "nose");
        assert_eq!(JointId::LEFT_SHOULDER.name(), "left_shoulder");
        assert_eq!(JointId::RIGHT_HIP.name(), "right_hip");
        assert_eq!(JointId::RIGHT_FOOT_INDEX.name(), "right_foot_index");
    }

    #[test]
    fn joint_all_is_ordered() {
        let all: Vec<_> = JointId::all().collect();
        assert_eq!(all.len(), JointId::COUNT);
        assert_eq!(all[0], JointId::NOSE);
        assert_eq!(all[32], JointId::RIGHT_FOOT_INDEX);
    }

    #[test]
    fn joint_display() {
        assert_eq!(format!("{}", JointId::LEFT_KNEE), "left_knee (25)");
    }

    #[test]
    fn joint_serde_uses_plain_integer() {
        let json = serde_json::to_string(&JointId::LEFT_ELBOW).unwrap();
        assert_eq!(json, "13");

        let parsed: JointId = serde_json::from_str("26").unwrap();
        assert_eq!(parsed, JointId::RIGHT_KNEE);

        let bad: std::result::Result<JointId, _> = serde_json::from_str("40");
        assert!(bad.is_err());
    }
}
