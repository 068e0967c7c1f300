//! Repetition phase transitions.
//!
//! The caller owns the phase between frames; these functions only compute
//! the next phase from the current one and a progress estimate.

use pose_types::Phase;
use serde::{Deserialize, Serialize};

/// Progress above which the current phase is considered complete.
pub const REPETITION_THRESHOLD: f64 = 0.85;

/// Next phase plus whether a full repetition just finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTransition {
    /// Phase the caller should send with the next frame.
    pub phase: Phase,
    /// `true` when the flip closed a rising + falling cycle.
    pub finished_repetition: bool,
}

/// Applies the transition rule with [`REPETITION_THRESHOLD`].
///
/// # Example
///
/// ```
/// use pose_scoring::transition;
/// use pose_types::Phase;
///
/// let half = transition(Phase::FirstHalf, 0.9);
/// assert_eq!(half.phase, Phase::SecondHalf);
/// assert!(!half.finished_repetition);
///
/// let full = transition(Phase::SecondHalf, 0.9);
/// assert_eq!(full.phase, Phase::FirstHalf);
/// assert!(full.finished_repetition);
/// ```
#[must_use]
pub fn transition(phase: Phase, progress: f64) -> PhaseTransition {
    transition_with_threshold(phase, progress, REPETITION_THRESHOLD)
}

/// Applies the transition rule with a custom threshold.
///
/// The phase flips only when `progress > threshold`; landing on
/// [`Phase::FirstHalf`] marks a finished repetition.
#[must_use]
pub fn transition_with_threshold(phase: Phase, progress: f64, threshold: f64) -> PhaseTransition {
    if progress > threshold {
        let phase = phase.flipped();
        PhaseTransition {
            phase,
            finished_repetition: phase.is_first_half(),
        }
    } else {
        PhaseTransition {
            phase,
            finished_repetition: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_threshold_keeps_phase() {
        for phase in Phase::ALL {
            for progress in [0.0, 0.5, 0.85] {
                let t = transition(phase, progress);
                assert_eq!(t.phase, phase);
                assert!(!t.finished_repetition);
            }
        }
    }

    #[test]
    fn first_half_flip_is_half_cycle() {
        let t = transition(Phase::FirstHalf, 0.9);
        assert_eq!(t.phase, Phase::SecondHalf);
        assert!(!t.finished_repetition);
    }

    #[test]
    fn second_half_flip_finishes_repetition() {
        let t = transition(Phase::SecondHalf, 0.9);
        assert_eq!(t.phase, Phase::FirstHalf);
        assert!(t.finished_repetition);
    }

    #[test]
    fn nan_progress_never_flips() {
        let t = transition(Phase::SecondHalf, f64::NAN);
        assert_eq!(t.phase, Phase::SecondHalf);
        assert!(!t.finished_repetition);
    }

    #[test]
    fn custom_threshold() {
        assert_eq!(
            transition_with_threshold(Phase::FirstHalf, 0.6, 0.5).phase,
            Phase::SecondHalf
        );
        assert_eq!(
            transition_with_threshold(Phase::FirstHalf, 0.6, 0.7).phase,
            Phase::FirstHalf
        );
    }

    #[test]
    fn full_cycle_counts_one_repetition() {
        let mut phase = Phase::FirstHalf;
        let mut repetitions = 0;
        for progress in [0.1, 0.5, 0.9, 0.2, 0.6, 0.95, 0.1] {
            let t = transition(phase, progress);
            phase = t.phase;
            repetitions += usize::from(t.finished_repetition);
        }
        assert_eq!(phase, Phase::FirstHalf);
        assert_eq!(repetitions, 1);
    }
}
