//! Angle layouts per exercise.
//!
//! Every exercise is scored over a fixed, ordered set of joint angles.
//! Most exercises use the generic full-body layout; a few have a
//! specialised layout that focuses on the joints the movement loads.

use hashbrown::HashMap;
use pose_types::{AngleLayout, AngleSpec, JointId};
use tracing::debug;

/// Elbow flexion, left side.
pub const LEFT_ELBOW: AngleSpec = AngleSpec::new(
    JointId::LEFT_SHOULDER,
    JointId::LEFT_ELBOW,
    JointId::LEFT_WRIST,
);
/// Elbow flexion, right side.
pub const RIGHT_ELBOW: AngleSpec = AngleSpec::new(
    JointId::RIGHT_SHOULDER,
    JointId::RIGHT_ELBOW,
    JointId::RIGHT_WRIST,
);
/// Arm-to-torso angle, left side.
pub const LEFT_SHOULDER: AngleSpec = AngleSpec::new(
    JointId::LEFT_ELBOW,
    JointId::LEFT_SHOULDER,
    JointId::LEFT_HIP,
);
/// Arm-to-torso angle, right side.
pub const RIGHT_SHOULDER: AngleSpec = AngleSpec::new(
    JointId::RIGHT_ELBOW,
    JointId::RIGHT_SHOULDER,
    JointId::RIGHT_HIP,
);
/// Torso-to-thigh angle, left side.
pub const LEFT_HIP: AngleSpec = AngleSpec::new(
    JointId::LEFT_SHOULDER,
    JointId::LEFT_HIP,
    JointId::LEFT_KNEE,
);
/// Torso-to-thigh angle, right side.
pub const RIGHT_HIP: AngleSpec = AngleSpec::new(
    JointId::RIGHT_SHOULDER,
    JointId::RIGHT_HIP,
    JointId::RIGHT_KNEE,
);
/// Knee flexion, left side.
pub const LEFT_KNEE: AngleSpec =
    AngleSpec::new(JointId::LEFT_HIP, JointId::LEFT_KNEE, JointId::LEFT_ANKLE);
/// Knee flexion, right side.
pub const RIGHT_KNEE: AngleSpec = AngleSpec::new(
    JointId::RIGHT_HIP,
    JointId::RIGHT_KNEE,
    JointId::RIGHT_ANKLE,
);
/// Shin-to-foot angle, left side.
pub const LEFT_ANKLE: AngleSpec = AngleSpec::new(
    JointId::LEFT_KNEE,
    JointId::LEFT_ANKLE,
    JointId::LEFT_FOOT_INDEX,
);
/// Shin-to-foot angle, right side.
pub const RIGHT_ANKLE: AngleSpec = AngleSpec::new(
    JointId::RIGHT_KNEE,
    JointId::RIGHT_ANKLE,
    JointId::RIGHT_FOOT_INDEX,
);

/// Name of the generic layout.
pub const DEFAULT_LAYOUT_NAME: &str = "all_exercises";

/// Result of looking up an exercise's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutChoice<'a> {
    /// The exercise has its own layout.
    Specialized(&'a AngleLayout),
    /// The exercise uses the generic layout.
    Default,
}

impl LayoutChoice<'_> {
    /// Returns `true` for [`LayoutChoice::Specialized`].
    #[must_use]
    pub const fn is_specialized(&self) -> bool {
        matches!(self, Self::Specialized(_))
    }
}

/// Lookup table from exercise name to angle layout.
///
/// Names are matched case-insensitively.
///
/// # Example
///
/// ```
/// use pose_angles::{LayoutCatalog, LayoutChoice};
///
/// let catalog = LayoutCatalog::standard();
///
/// assert!(catalog.lookup("SQUAT").is_specialized());
/// assert_eq!(catalog.lookup("jumping_jack"), LayoutChoice::Default);
/// assert_eq!(catalog.resolve("jumping_jack").len(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutCatalog {
    default: AngleLayout,
    specialized: HashMap<String, AngleLayout>,
}

impl LayoutCatalog {
    /// Creates a catalog with only a default layout.
    #[must_use]
    pub fn new(default: AngleLayout) -> Self {
        Self {
            default,
            specialized: HashMap::new(),
        }
    }

    /// Creates the built-in catalog.
    ///
    /// The default layout measures elbows, shoulders, hips, knees and
    /// ankles on both sides. `squat`, `lunge`, `push_up`, `bicep_curl` and
    /// `shoulder_press` have specialised layouts.
    #[must_use]
    pub fn standard() -> Self {
        let default = AngleLayout::new(
            DEFAULT_LAYOUT_NAME,
            vec![
                LEFT_ELBOW,
                RIGHT_ELBOW,
                LEFT_SHOULDER,
                RIGHT_SHOULDER,
                LEFT_HIP,
                RIGHT_HIP,
                LEFT_KNEE,
                RIGHT_KNEE,
                LEFT_ANKLE,
                RIGHT_ANKLE,
            ],
        );

        let legs = vec![
            LEFT_HIP,
            RIGHT_HIP,
            LEFT_KNEE,
            RIGHT_KNEE,
            LEFT_ANKLE,
            RIGHT_ANKLE,
        ];

        Self::new(default)
            .with_layout("squat", legs.clone())
            .with_layout("lunge", legs)
            .with_layout(
                "push_up",
                vec![
                    LEFT_ELBOW,
                    RIGHT_ELBOW,
                    LEFT_SHOULDER,
                    RIGHT_SHOULDER,
                    LEFT_HIP,
                    RIGHT_HIP,
                    LEFT_KNEE,
                    RIGHT_KNEE,
                ],
            )
            .with_layout(
                "bicep_curl",
                vec![LEFT_ELBOW, RIGHT_ELBOW, LEFT_SHOULDER, RIGHT_SHOULDER],
            )
            .with_layout(
                "shoulder_press",
                vec![
                    LEFT_ELBOW,
                    RIGHT_ELBOW,
                    LEFT_SHOULDER,
                    RIGHT_SHOULDER,
                    LEFT_HIP,
                    RIGHT_HIP,
                ],
            )
    }

    /// Adds or replaces the specialised layout for `exercise`.
    #[must_use]
    pub fn with_layout(mut self, exercise: &str, specs: Vec<AngleSpec>) -> Self {
        let key = exercise.to_lowercase();
        let layout = AngleLayout::new(key.clone(), specs);
        if self.specialized.insert(key, layout).is_some() {
            debug!(exercise, "Replaced specialised angle layout");
        }
        self
    }

    /// Returns the generic layout.
    #[must_use]
    pub const fn default_layout(&self) -> &AngleLayout {
        &self.default
    }

    /// Looks up the layout choice for `exercise`.
    #[must_use]
    pub fn lookup(&self, exercise: &str) -> LayoutChoice<'_> {
        self.specialized
            .get(exercise.to_lowercase().as_str())
            .map_or(LayoutChoice::Default, LayoutChoice::Specialized)
    }

    /// Returns the layout `exercise` is scored with.
    #[must_use]
    pub fn resolve(&self, exercise: &str) -> &AngleLayout {
        match self.lookup(exercise) {
            LayoutChoice::Specialized(layout) => layout,
            LayoutChoice::Default => &self.default,
        }
    }

    /// Returns the joint triple behind angle `index` of `exercise`'s layout.
    #[must_use]
    pub fn landmarks_for_angle(&self, index: usize, exercise: &str) -> Option<AngleSpec> {
        self.resolve(exercise).get(index).copied()
    }

    /// Returns the exercises with a specialised layout, sorted by name.
    #[must_use]
    pub fn specialized_exercises(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.specialized.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for LayoutCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn standard_default_layout() {
        let catalog = LayoutCatalog::standard();
        let layout = catalog.default_layout();
        assert_eq!(layout.name(), DEFAULT_LAYOUT_NAME);
        assert_eq!(layout.len(), 10);
        assert_eq!(layout.get(0), Some(&LEFT_ELBOW));
        assert_eq!(layout.get(9), Some(&RIGHT_ANKLE));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let catalog = LayoutCatalog::standard();
        let lower = catalog.resolve("squat");
        let upper = catalog.resolve("Squat");
        assert_eq!(lower, upper);
        assert_eq!(lower.len(), 6);
        assert_eq!(lower.name(), "squat");
    }

    #[test]
    fn unknown_exercise_uses_default() {
        let catalog = LayoutCatalog::standard();
        assert_eq!(catalog.lookup("burpee"), LayoutChoice::Default);
        assert!(!catalog.lookup("burpee").is_specialized());
        assert_eq!(catalog.resolve("burpee"), catalog.default_layout());
    }

    #[test]
    fn landmarks_for_angle_follow_layout() {
        let catalog = LayoutCatalog::standard();

        // squat index 2 is the left knee
        let spec = catalog.landmarks_for_angle(2, "squat").unwrap();
        assert_eq!(
            spec.joints(),
            [JointId::LEFT_HIP, JointId::LEFT_KNEE, JointId::LEFT_ANKLE]
        );

        // default index 2 is the left shoulder
        let spec = catalog.landmarks_for_angle(2, "burpee").unwrap();
        assert_eq!(spec.vertex, JointId::LEFT_SHOULDER);

        assert!(catalog.landmarks_for_angle(6, "squat").is_none());
    }

    #[test]
    fn custom_layouts() {
        let catalog = LayoutCatalog::new(AngleLayout::new("base", vec![LEFT_KNEE]))
            .with_layout("Plank", vec![LEFT_HIP, RIGHT_HIP])
            .with_layout("plank", vec![LEFT_HIP]);

        assert_eq!(catalog.resolve("PLANK").len(), 1);
        assert_eq!(catalog.resolve("other").name(), "base");
        assert_eq!(catalog.specialized_exercises(), vec!["plank"]);
    }

    #[test]
    fn specialized_exercises_sorted() {
        let catalog = LayoutCatalog::default();
        assert_eq!(
            catalog.specialized_exercises(),
            vec!["bicep_curl", "lunge", "push_up", "shoulder_press", "squat"]
        );
    }
}
