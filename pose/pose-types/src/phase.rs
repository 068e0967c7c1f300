//! Repetition phases.

use serde::{Deserialize, Serialize};

/// One half of a repetition cycle.
///
/// Reference data is split by phase, and the caller threads the current
/// phase through successive scoring calls.
///
/// # Example
///
/// ```
/// use pose_types::Phase;
///
/// let phase = Phase::from_first_half(true);
/// assert_eq!(phase, Phase::FirstHalf);
/// assert_eq!(phase.flipped(), Phase::SecondHalf);
/// assert!(!phase.flipped().is_first_half());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Rising half of the movement.
    FirstHalf,
    /// Falling half of the movement.
    SecondHalf,
}

impl Phase {
    /// Both phases, in cycle order.
    pub const ALL: [Self; 2] = [Self::FirstHalf, Self::SecondHalf];

    /// Maps the wire-level `first_half` flag to a phase.
    #[must_use]
    pub const fn from_first_half(first_half: bool) -> Self {
        if first_half {
            Self::FirstHalf
        } else {
            Self::SecondHalf
        }
    }

    /// Returns `true` for [`Phase::FirstHalf`].
    #[must_use]
    pub const fn is_first_half(self) -> bool {
        matches!(self, Self::FirstHalf)
    }

    /// Returns the other phase.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::FirstHalf => Self::SecondHalf,
            Self::SecondHalf => Self::FirstHalf,
        }
    }

    /// Returns the snake-case phase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FirstHalf => "first_half",
            Self::SecondHalf => "second_half",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
