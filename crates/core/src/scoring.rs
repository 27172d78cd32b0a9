//! Scoring module - match size and combo weighting
//!
//! A turn's score is `100 × weight(matched) × weight(combo)`, where both
//! counts accumulate across the cascade steps of one swap. The weight curve:
//!
//! | n | weight |
//! |---|--------|
//! | ≤3 | 1.0 |
//! | 4 | 1.2 |
//! | 5 | 1.5 |
//! | 6 | 2.0 |
//! | 7 | 3.0 |
//! | >7 | 3 + (n - 7)² |
//!
//! Weights are kept in hundredths so that scores stay exact integers.

use serde::Serialize;

use crate::types::BASE_SCORE;

/// `weight(n)` scaled by 100
pub fn weight_hundredths(n: u32) -> u64 {
    match n {
        0..=3 => 100,
        4 => 120,
        5 => 150,
        6 => 200,
        7 => 300,
        _ => {
            let over = u64::from(n - 7);
            over.saturating_mul(over).saturating_mul(100).saturating_add(300)
        }
    }
}

pub fn weight(n: u32) -> f64 {
    weight_hundredths(n) as f64 / 100.0
}

/// Score for the given turn totals
pub fn turn_score(matched: u32, combo: u32) -> u64 {
    // Each weight is a multiple of 10 hundredths, so the product divides evenly.
    BASE_SCORE
        .saturating_mul(weight_hundredths(matched))
        .saturating_mul(weight_hundredths(combo))
        / 10_000
}

/// Running score statistics for one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScoreState {
    pub total_score: u64,
    pub turn_score: u64,
    pub turn_combo: u32,
    pub turn_matched_count: u32,
    pub max_combo: u32,
    pub max_matched_count: u32,
}

impl ScoreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one cleared batch.
    ///
    /// A new turn restarts the turn counters at this batch; otherwise the batch
    /// adds to them. The recomputed turn score is added to the total.
    pub fn add_score(&mut self, matched_count: u32, combo: u32, is_new_turn: bool) -> u64 {
        if is_new_turn {
            self.turn_combo = combo;
            self.turn_matched_count = matched_count;
        } else {
            self.turn_combo = self.turn_combo.saturating_add(combo);
            self.turn_matched_count = self.turn_matched_count.saturating_add(matched_count);
        }

        self.max_combo = self.max_combo.max(self.turn_combo);
        self.max_matched_count = self.max_matched_count.max(self.turn_matched_count);

        self.turn_score = turn_score(self.turn_matched_count, self.turn_combo);
        self.total_score = self.total_score.saturating_add(self.turn_score);
        self.turn_score
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_table() {
        assert_eq!(weight(0), 1.0);
        assert_eq!(weight(3), 1.0);
        assert_eq!(weight(4), 1.2);
        assert_eq!(weight(5), 1.5);
        assert_eq!(weight(6), 2.0);
        assert_eq!(weight(7), 3.0);
        assert_eq!(weight(8), 4.0);
        assert_eq!(weight(10), 12.0);
    }

    #[test]
    fn test_weight_non_decreasing() {
        for n in 0..50 {
            assert!(weight_hundredths(n) <= weight_hundredths(n + 1), "n={}", n);
        }
    }

    #[test]
    fn test_turn_score_exact() {
        assert_eq!(turn_score(3, 1), 100);
        assert_eq!(turn_score(4, 4), 144);
        assert_eq!(turn_score(5, 4), 180);
        assert_eq!(turn_score(8, 2), 400);
        assert_eq!(turn_score(8, 4), 480);
    }

    #[test]
    fn test_new_turn_resets_turn_counters() {
        let mut score = ScoreState::new();
        score.add_score(5, 2, true);
        score.add_score(3, 1, true);
        assert_eq!(score.turn_matched_count, 3);
        assert_eq!(score.turn_combo, 1);
        assert_eq!(score.max_matched_count, 5);
        assert_eq!(score.max_combo, 2);
    }

    #[test]
    fn test_cascade_accumulates() {
        let mut score = ScoreState::new();
        assert_eq!(score.add_score(5, 1, true), 150);
        // weight(8) = 4.0, weight(2) = 1.0
        assert_eq!(score.add_score(3, 1, false), 400);
        assert_eq!(score.turn_matched_count, 8);
        assert_eq!(score.turn_combo, 2);
        assert_eq!(score.total_score, 550);
    }

    #[test]
    fn test_reset() {
        let mut score = ScoreState::new();
        score.add_score(4, 1, true);
        score.reset();
        assert_eq!(score, ScoreState::default());
    }
}
