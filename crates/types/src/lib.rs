//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the match-3 engine.
//! All types are plain data with no game logic attached, making them usable in
//! any context (board simulation, renderers, headless drivers, JSON reports).
//!
//! # Board Dimensions
//!
//! The default playfield is a fixed 8x8 grid:
//!
//! - **Width**: 8 columns (x indexed 0-7, left to right)
//! - **Height**: 8 rows (y indexed 0-7, top to bottom)
//!
//! # Frame Pacing
//!
//! The engine advances once per external frame. Cosmetic delays are counted in
//! frames, never in wall-clock time:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `HIGHLIGHT_FRAMES` | 28 | Matched cells fade out before clearing |
//! | `CLEAR_DELAY_FRAMES` | 28 | Pause between clearing and refilling |
//! | `TURN_SCORE_FRAMES` | 28 | Turn score overlay before returning to idle |
//! | `ANIMATION_SPEED` | 0.125 | Grid cells travelled per frame |
//!
//! # Examples
//!
//! ```
//! use match3_types::{Color, Coord, StateTag, BOARD_WIDTH};
//!
//! let c = Coord::new(3, 4);
//! assert_eq!(c.offset(1, -1), Coord::new(4, 3));
//!
//! assert_eq!(Color::from_str("RED"), Some(Color::Red));
//! assert_eq!(Color::Yellow.rgb(), (255, 255, 0));
//!
//! assert!(StateTag::Idle.accepts_input());
//! assert!(!StateTag::SwappingForward.accepts_input());
//! assert_eq!(BOARD_WIDTH, 8);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Board width in cells (8 columns)
pub const BOARD_WIDTH: i32 = 8;

/// Board height in cells (8 rows)
pub const BOARD_HEIGHT: i32 = 8;

/// Length of a scoring run
pub const MATCH_RUN: usize = 3;

/// Frames the matched cells stay highlighted (and fade) before clearing
pub const HIGHLIGHT_FRAMES: u32 = 28;

/// Frames between marking cells cleared and spawning replacements
pub const CLEAR_DELAY_FRAMES: u32 = 28;

/// Frames the turn score is shown before the board accepts input again
pub const TURN_SCORE_FRAMES: u32 = 28;

/// Display distance (in cells) a moving cell covers per frame
pub const ANIMATION_SPEED: f32 = 0.125;

/// Base points for a scored batch, scaled by the count and combo weights
pub const BASE_SCORE: u64 = 100;

/// Fully opaque alpha
pub const ALPHA_OPAQUE: u8 = 255;

/// Integer grid coordinate. `x` is the column, `y` the row (0 = top).
///
/// Signed so that offset windows may step off the board before being filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Coordinate shifted by `(dx, dy)`; may land off the board.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Token colors
///
/// The default palette holds all six; a configured game may use a subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Pink,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Purple,
        Color::Pink,
    ];

    /// Parse color from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(Color::Red),
            "green" => Some(Color::Green),
            "blue" => Some(Color::Blue),
            "yellow" => Some(Color::Yellow),
            "purple" => Some(Color::Purple),
            "pink" => Some(Color::Pink),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Purple => "purple",
            Color::Pink => "pink",
        }
    }

    /// RGB triple for renderers
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Color::Red => (255, 0, 0),
            Color::Green => (0, 255, 0),
            Color::Blue => (0, 0, 255),
            Color::Yellow => (255, 255, 0),
            Color::Purple => (255, 0, 255),
            Color::Pink => (128, 255, 255),
        }
    }
}

/// Swap adjacency rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjacency {
    /// Exactly one axis differs, by one.
    #[default]
    Orthogonal,
    /// Both axes may differ by at most one, so diagonal neighbors count too.
    EightWay,
}

impl Adjacency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Adjacency::Orthogonal => "orthogonal",
            Adjacency::EightWay => "eight_way",
        }
    }
}

/// Turn state machine phases
///
/// A player turn walks `Idle -> SwappingForward -> ... -> ShowingTurnScore -> Idle`.
/// Only `Idle` accepts selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateTag {
    #[default]
    Idle,
    SwappingForward,
    SwappingBack,
    ShowingMatch,
    Clearing,
    AnimatingClear,
    SpawningNewTokens,
    Realigning,
    AnimatingRealign,
    CheckingCascadeMatch,
    ShowingCascadeMatch,
    ClearingCascade,
    AnimatingCascadeClear,
    ShowingTurnScore,
}

impl StateTag {
    pub fn accepts_input(&self) -> bool {
        matches!(self, StateTag::Idle)
    }

    /// True while some cell is expected to be sliding.
    pub fn is_animating(&self) -> bool {
        matches!(
            self,
            StateTag::SwappingForward | StateTag::SwappingBack | StateTag::AnimatingRealign
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StateTag::Idle => "idle",
            StateTag::SwappingForward => "swapping_forward",
            StateTag::SwappingBack => "swapping_back",
            StateTag::ShowingMatch => "showing_match",
            StateTag::Clearing => "clearing",
            StateTag::AnimatingClear => "animating_clear",
            StateTag::SpawningNewTokens => "spawning_new_tokens",
            StateTag::Realigning => "realigning",
            StateTag::AnimatingRealign => "animating_realign",
            StateTag::CheckingCascadeMatch => "checking_cascade_match",
            StateTag::ShowingCascadeMatch => "showing_cascade_match",
            StateTag::ClearingCascade => "clearing_cascade",
            StateTag::AnimatingCascadeClear => "animating_cascade_clear",
            StateTag::ShowingTurnScore => "showing_turn_score",
        }
    }
}

impl fmt::Display for StateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pacing_constants() {
        assert_eq!(BOARD_WIDTH, 8);
        assert_eq!(BOARD_HEIGHT, 8);
        assert_eq!(HIGHLIGHT_FRAMES, 28);
        assert_eq!(CLEAR_DELAY_FRAMES, 28);
        assert_eq!(MATCH_RUN, 3);
    }

    #[test]
    fn color_string_roundtrip() {
        for color in Color::ALL {
            assert_eq!(Color::from_str(color.as_str()), Some(color));
        }
        assert_eq!(Color::from_str("orange"), None);
    }

    #[test]
    fn only_idle_accepts_input() {
        assert!(StateTag::Idle.accepts_input());
        assert!(!StateTag::ShowingTurnScore.accepts_input());
        assert!(!StateTag::AnimatingRealign.accepts_input());
    }

    #[test]
    fn coord_ordering_is_column_first() {
        assert!(Coord::new(0, 7) < Coord::new(1, 0));
        assert!(Coord::new(2, 1) < Coord::new(2, 3));
    }

    #[test]
    fn display_formats() {
        assert_eq!(Coord::new(3, -1).to_string(), "(3, -1)");
        assert_eq!(StateTag::AnimatingRealign.to_string(), "animating_realign");
    }
}
