//! Engine configuration
//!
//! Every field has a default so a partial JSON document is enough to override
//! a single knob.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::types::{
    Adjacency, Color, ANIMATION_SPEED, BOARD_HEIGHT, BOARD_WIDTH, CLEAR_DELAY_FRAMES,
    HIGHLIGHT_FRAMES, TURN_SCORE_FRAMES,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub width: i32,
    pub height: i32,
    pub palette: Vec<Color>,
    pub highlight_frames: u32,
    pub clear_delay_frames: u32,
    pub turn_score_frames: u32,
    /// Cells per frame; 1.0 or more makes every slide a single frame.
    pub animation_speed: f32,
    pub adjacency: Adjacency,
    pub seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            palette: Color::ALL.to_vec(),
            highlight_frames: HIGHLIGHT_FRAMES,
            clear_delay_frames: CLEAR_DELAY_FRAMES,
            turn_score_frames: TURN_SCORE_FRAMES,
            animation_speed: ANIMATION_SPEED,
            adjacency: Adjacency::default(),
            seed: 1,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_palette(mut self, palette: &[Color]) -> Self {
        self.palette = palette.to_vec();
        self
    }

    pub fn with_adjacency(mut self, adjacency: Adjacency) -> Self {
        self.adjacency = adjacency;
        self
    }

    /// Collapse every cosmetic delay to a single frame (tests, headless runs).
    pub fn instant(mut self) -> Self {
        self.highlight_frames = 1;
        self.clear_delay_frames = 1;
        self.turn_score_frames = 0;
        self.animation_speed = 1.0;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(EngineError::InvalidConfig(format!(
                "board must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if self.palette.is_empty() {
            return Err(EngineError::InvalidConfig("palette is empty".into()));
        }
        for (i, color) in self.palette.iter().enumerate() {
            if self.palette[..i].contains(color) {
                return Err(EngineError::InvalidConfig(format!(
                    "palette lists {} twice",
                    color.as_str()
                )));
            }
        }
        if !self.animation_speed.is_finite() || self.animation_speed <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "animation_speed must be positive, got {}",
                self.animation_speed
            )));
        }
        Ok(())
    }
}
