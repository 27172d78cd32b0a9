//! Scoring tests - weight curve and turn accumulation

use match3_board::core::scoring::weight_hundredths;
use match3_board::core::{turn_score, weight, ScoreState};

#[test]
fn test_weight_curve() {
    let expected = [
        (1, 1.0),
        (3, 1.0),
        (4, 1.2),
        (5, 1.5),
        (6, 2.0),
        (7, 3.0),
        (8, 4.0),
        (9, 7.0),
        (12, 28.0),
    ];
    for (n, w) in expected {
        assert_eq!(weight(n), w, "weight({})", n);
    }
}

#[test]
fn test_weight_is_non_decreasing() {
    let mut last = 0;
    for n in 0..200 {
        let w = weight_hundredths(n);
        assert!(w >= last, "weight dropped at {}", n);
        last = w;
    }
}

#[test]
fn test_cascade_turn_accumulates() {
    let mut score = ScoreState::new();
    score.add_score(5, 1, true);
    let turn = score.add_score(3, 1, false);

    assert_eq!(score.turn_matched_count, 8);
    assert_eq!(score.turn_combo, 2);
    // 100 x weight(8) x weight(2) = 100 x 4.0 x 1.0
    assert_eq!(turn, 400);
    assert_eq!(score.turn_score, turn_score(8, 2));
}

#[test]
fn test_total_never_decreases() {
    let mut score = ScoreState::new();
    let mut last = 0;
    let batches = [(3, 1, true), (4, 1, false), (3, 2, true), (9, 1, false), (3, 1, true)];
    for (matched, combo, new_turn) in batches {
        score.add_score(matched, combo, new_turn);
        assert!(score.total_score >= last);
        last = score.total_score;
    }
}

#[test]
fn test_maxima_survive_new_turns() {
    let mut score = ScoreState::new();
    score.add_score(6, 1, true);
    score.add_score(3, 1, false);
    score.add_score(3, 1, false);
    score.add_score(3, 1, true);

    assert_eq!(score.max_matched_count, 12);
    assert_eq!(score.max_combo, 3);
    assert_eq!(score.turn_matched_count, 3);
    assert_eq!(score.turn_combo, 1);
}

#[test]
fn test_huge_counts_saturate() {
    assert_eq!(turn_score(u32::MAX, u32::MAX), u64::MAX / 10_000);
    let mut score = ScoreState::new();
    score.add_score(u32::MAX, 1, true);
    score.add_score(u32::MAX, 1, false);
    assert_eq!(score.turn_matched_count, u32::MAX);
}

#[test]
fn test_score_state_serializes() {
    let mut score = ScoreState::new();
    score.add_score(4, 1, true);
    let json = serde_json::to_value(score).unwrap();
    assert_eq!(json["total_score"], 120);
    assert_eq!(json["turn_matched_count"], 4);
}
