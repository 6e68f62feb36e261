// src/engine/difficulty.rs

use crate::models::{exam_result::Verdict, question::Difficulty};

/// Relative weights of the three difficulty levels for one attempt.
///
/// Weights are used as-is by the quota planner; they are not rescaled to
/// sum to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyWeights {
    pub easy: f64,
    pub medium: f64,
    pub hard: f64,
}

impl DifficultyWeights {
    /// First attempt.
    pub const DEFAULT: Self = Self {
        easy: 0.40,
        medium: 0.40,
        hard: 0.20,
    };

    /// After a passed attempt.
    pub const CHALLENGE: Self = Self {
        easy: 0.20,
        medium: 0.40,
        hard: 0.40,
    };

    /// After a failed attempt.
    pub const REMEDIAL: Self = Self {
        easy: 0.60,
        medium: 0.30,
        hard: 0.10,
    };

    /// Picks the mix for the next attempt from the verdict of the previous one.
    pub fn for_previous(previous: Option<Verdict>) -> Self {
        match previous {
            None => Self::DEFAULT,
            Some(Verdict::Pass) => Self::CHALLENGE,
            Some(Verdict::Fail) => Self::REMEDIAL,
        }
    }

    pub fn weight(&self, difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    /// Weights in [`Difficulty::ALL`] order.
    pub fn entries(&self) -> [(Difficulty, f64); 3] {
        Difficulty::ALL.map(|d| (d, self.weight(d)))
    }
}

impl Default for DifficultyWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_attempt_gets_default_mix() {
        assert_eq!(DifficultyWeights::for_previous(None), DifficultyWeights::DEFAULT);
    }

    #[test]
    fn test_pass_shifts_toward_hard() {
        let w = DifficultyWeights::for_previous(Some(Verdict::Pass));
        assert_eq!((w.easy, w.medium, w.hard), (0.20, 0.40, 0.40));
    }

    #[test]
    fn test_fail_shifts_toward_easy() {
        let w = DifficultyWeights::for_previous(Some(Verdict::Fail));
        assert_eq!((w.easy, w.medium, w.hard), (0.60, 0.30, 0.10));
    }

    #[test]
    fn test_entries_follow_fixed_order() {
        let entries = DifficultyWeights::DEFAULT.entries();
        assert_eq!(entries[0], (Difficulty::Easy, 0.40));
        assert_eq!(entries[2], (Difficulty::Hard, 0.20));
    }
}
