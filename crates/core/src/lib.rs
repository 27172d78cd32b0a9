//! Match-3 board core - pure, deterministic, and testable
//!
//! This crate holds the board simulation: geometry, the cell grid, match
//! detection, the no-match initial fill, scoring, and the per-frame turn state
//! machine. It has **no dependencies** on rendering, input polling or a frame
//! loop; a driver calls into it once per frame and reads state back.
//!
//! - **Deterministic**: same seed produces identical boards and refills
//! - **Tick-driven**: one [`GameState::advance`] call per frame, never blocks
//! - **Headless**: everything a renderer needs comes out of [`BoardSnapshot`]
//!
//! # Module Structure
//!
//! - [`geometry`]: bounds, adjacency, match windows and column bottoms
//! - [`board`]: cells, swap, gravity destinations and compaction
//! - [`matcher`]: straight-run detection and valid-move search
//! - [`generator`]: constrained random fill with no latent matches
//! - [`scoring`]: nonlinear match/combo weights and running statistics
//! - [`game_state`]: the turn state machine and driver API
//!
//! # Example
//!
//! ```
//! use match3_core::{EngineConfig, GameState};
//! use match3_core::types::StateTag;
//!
//! let mut game = GameState::new(EngineConfig::default().with_seed(7).instant()).unwrap();
//! if let Some((a, b)) = game.valid_swap() {
//!     game.try_select(a.x, a.y);
//!     game.try_select(b.x, b.y);
//!     while game.advance().unwrap() != StateTag::Idle {}
//!     assert!(game.score_snapshot().total_score >= 100);
//! }
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod game_state;
pub mod generator;
pub mod geometry;
pub mod matcher;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use match3_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Cell, DisplayPos};
pub use config::EngineConfig;
pub use error::EngineError;
pub use game_state::{GameState, SelectOutcome, Selection, TurnEvent};
pub use generator::fill_board;
pub use geometry::Geometry;
pub use matcher::{find_valid_swap, has_match, matched_coordinates};
pub use rng::SimpleRng;
pub use scoring::{turn_score, weight, ScoreState};
pub use snapshot::{BoardSnapshot, CellSnapshot};
