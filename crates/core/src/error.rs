use thiserror::Error;

use crate::types::StateTag;

/// Faults raised by the board engine.
///
/// Coordinate misses at the board layer are silent (`bool`/`Option` returns);
/// `OutOfBounds` only comes back from checked lookups offered to drivers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("coordinate ({x}, {y}) is outside the board")]
    OutOfBounds { x: i32, y: i32 },

    #[error("state machine fault in {state}: {reason}")]
    InvalidState {
        state: StateTag,
        reason: &'static str,
    },

    #[error("no palette color fits cell ({x}, {y}) without creating a match")]
    ExhaustedPalette { x: i32, y: i32 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::OutOfBounds { .. } => "out_of_bounds",
            EngineError::InvalidState { .. } => "invalid_state",
            EngineError::ExhaustedPalette { .. } => "exhausted_palette",
            EngineError::InvalidConfig(_) => "invalid_config",
        }
    }
}
