//! Game state module - the turn state machine
//!
//! [`GameState`] owns the board, the RNG, the current selection and the score,
//! and exposes the driver contract: call [`GameState::advance`] once per frame,
//! forward player picks to [`GameState::try_select`], and read state back through
//! the snapshot accessors.
//!
//! One turn runs:
//!
//! ```text
//! Idle -(2nd adjacent pick)-> SwappingForward -> ShowingMatch -> Clearing
//!      -> AnimatingClear -> SpawningNewTokens -> Realigning -> AnimatingRealign
//!      -> CheckingCascadeMatch -> ShowingCascadeMatch -> ClearingCascade
//!      -> AnimatingCascadeClear -> SpawningNewTokens ...
//!      -> ShowingTurnScore -> Idle
//! ```
//!
//! A forward swap with no match slides back (`SwappingBack`) and restores the
//! board before returning to `Idle`.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::board::{Board, Cell};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::generator::fill_board;
use crate::geometry::Geometry;
use crate::matcher::{find_valid_swap, matched_union};
use crate::rng::SimpleRng;
use crate::scoring::ScoreState;
use crate::snapshot::{write_board, BoardSnapshot};
use crate::types::{Coord, StateTag, ALPHA_OPAQUE};

/// Up to two picked cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Selection {
    pub first: Option<Coord>,
    pub second: Option<Coord>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.second.is_none()
    }

    /// Both picks, once a swap has been requested
    pub fn pair(&self) -> Option<(Coord, Coord)> {
        Some((self.first?, self.second?))
    }
}

/// What a call to [`GameState::try_select`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Not idle, or the coordinate is off the board
    Ignored,
    /// Stored as the first pick
    First,
    /// Second pick was not adjacent; selection cleared
    Reset,
    /// Second pick was adjacent; the swap animation has started
    SwapStarted,
}

/// Most recent notable thing the state machine did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    SwapStarted {
        first: Coord,
        second: Coord,
    },
    SwapRejected {
        first: Coord,
        second: Coord,
    },
    Cleared {
        matched: u32,
        /// Turn combo after this batch
        combo: u32,
        turn_score: u64,
        /// 0 for the swap's own clear, then 1, 2, ... per cascade pass
        cascade: u32,
    },
    TurnFinished {
        turn_score: u64,
        combo: u32,
        matched: u32,
    },
}

#[derive(Debug, Clone)]
pub struct GameState {
    config: EngineConfig,
    geometry: Geometry,
    board: Board,
    rng: SimpleRng,
    state: StateTag,
    selection: Selection,
    /// Cells matched in the current clear pass
    seeds: Vec<Coord>,
    /// Coordinates of the most recent cleared batch
    last_cleared: BTreeSet<Coord>,
    frames_left: u32,
    cascade_depth: u32,
    score: ScoreState,
    /// Monotonic episode id (increments on new game).
    episode_id: u32,
    /// Monotonic id for swap attempts.
    turn_id: u32,
    last_event: Option<TurnEvent>,
}

impl GameState {
    /// Validate `config` and deal a fresh match-free board
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let geometry = Geometry::new(config.width, config.height);
        let mut rng = SimpleRng::new(config.seed);
        let board = fill_board(geometry, &config.palette, &mut rng, config.animation_speed)?;
        Ok(Self::assemble(config, geometry, board, rng))
    }

    /// Start from a prepared board. Its dimensions must match `config`.
    pub fn with_board(config: EngineConfig, board: Board) -> Result<Self, EngineError> {
        config.validate()?;
        let geometry = Geometry::new(config.width, config.height);
        if board.geometry() != geometry {
            return Err(EngineError::InvalidConfig(format!(
                "board is {}x{}, config expects {}x{}",
                board.width(),
                board.height(),
                config.width,
                config.height
            )));
        }
        let board = board.with_animation_speed(config.animation_speed);
        let rng = SimpleRng::new(config.seed);
        Ok(Self::assemble(config, geometry, board, rng))
    }

    fn assemble(config: EngineConfig, geometry: Geometry, board: Board, rng: SimpleRng) -> Self {
        Self {
            config,
            geometry,
            board,
            rng,
            state: StateTag::Idle,
            selection: Selection::default(),
            seeds: Vec::new(),
            last_cleared: BTreeSet::new(),
            frames_left: 0,
            cascade_depth: 0,
            score: ScoreState::new(),
            episode_id: 0,
            turn_id: 0,
            last_event: None,
        }
    }

    /// Deal a new board and zero the score.
    ///
    /// The RNG carries on from the previous game, so consecutive games differ.
    /// On failure the current game is left untouched.
    pub fn new_game(&mut self) -> Result<(), EngineError> {
        let board = fill_board(
            self.geometry,
            &self.config.palette,
            &mut self.rng,
            self.config.animation_speed,
        )?;
        self.board = board;
        self.state = StateTag::Idle;
        self.selection = Selection::default();
        self.seeds.clear();
        self.last_cleared.clear();
        self.frames_left = 0;
        self.cascade_depth = 0;
        self.score.reset();
        self.last_event = None;
        self.episode_id = self.episode_id.wrapping_add(1);
        debug!(episode = self.episode_id, "new game");
        Ok(())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn current_state(&self) -> StateTag {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn turn_id(&self) -> u32 {
        self.turn_id
    }

    pub fn score_snapshot(&self) -> ScoreState {
        self.score
    }

    /// Checked cell lookup for drivers
    pub fn cell(&self, x: i32, y: i32) -> Result<&Cell, EngineError> {
        self.board
            .get(Coord::new(x, y))
            .ok_or(EngineError::OutOfBounds { x, y })
    }

    pub fn snapshot_board_into(&self, out: &mut BoardSnapshot) {
        write_board(&self.board, self.state, out);
    }

    pub fn snapshot_board(&self) -> BoardSnapshot {
        let mut s = BoardSnapshot::default();
        self.snapshot_board_into(&mut s);
        s
    }

    /// First swap that would produce a match, if any
    pub fn valid_swap(&self) -> Option<(Coord, Coord)> {
        find_valid_swap(&self.board, self.config.adjacency)
    }

    pub fn has_valid_move(&self) -> bool {
        self.valid_swap().is_some()
    }

    /// Take and clear the last turn event.
    pub fn take_last_event(&mut self) -> Option<TurnEvent> {
        self.last_event.take()
    }

    /// Player pick. Only `Idle` accepts input; anything else is dropped.
    pub fn try_select(&mut self, x: i32, y: i32) -> SelectOutcome {
        if !self.state.accepts_input() {
            warn!(x, y, state = %self.state, "selection ignored while busy");
            return SelectOutcome::Ignored;
        }
        let Some(picked) = self.geometry.coord(x, y) else {
            debug!(x, y, "selection off the board");
            return SelectOutcome::Ignored;
        };

        let Some(first) = self.selection.first else {
            self.selection.first = Some(picked);
            debug!(%picked, "first pick");
            return SelectOutcome::First;
        };

        if !self.geometry.is_adjacent(first, picked, self.config.adjacency) {
            self.selection = Selection::default();
            debug!(%first, %picked, "picks not adjacent, selection reset");
            return SelectOutcome::Reset;
        }

        self.selection.second = Some(picked);
        self.turn_id = self.turn_id.wrapping_add(1);
        self.board.clear_highlights();
        self.board.animate_swap(first, picked);
        self.last_event = Some(TurnEvent::SwapStarted {
            first,
            second: picked,
        });
        self.transition(StateTag::SwappingForward);
        SelectOutcome::SwapStarted
    }

    /// Run one frame of the state machine and return the resulting state.
    pub fn advance(&mut self) -> Result<StateTag, EngineError> {
        let next = match self.state {
            StateTag::Idle => StateTag::Idle,
            StateTag::SwappingForward => self.swapping_forward()?,
            StateTag::SwappingBack => self.swapping_back()?,
            StateTag::ShowingMatch => self.showing_match(StateTag::Clearing),
            StateTag::Clearing => self.clearing(true)?,
            StateTag::AnimatingClear => self.count_down(StateTag::SpawningNewTokens),
            StateTag::SpawningNewTokens => self.spawning_new_tokens(),
            StateTag::Realigning => self.realigning(),
            StateTag::AnimatingRealign => self.animating_realign()?,
            StateTag::CheckingCascadeMatch => self.checking_cascade_match(),
            StateTag::ShowingCascadeMatch => self.showing_match(StateTag::ClearingCascade),
            StateTag::ClearingCascade => self.clearing(false)?,
            StateTag::AnimatingCascadeClear => self.count_down(StateTag::SpawningNewTokens),
            StateTag::ShowingTurnScore => self.showing_turn_score(),
        };
        self.transition(next);
        Ok(self.state)
    }

    fn transition(&mut self, next: StateTag) {
        if next != self.state {
            debug!(from = %self.state, to = %next, turn = self.turn_id, "state transition");
            self.state = next;
        }
    }

    fn fault(&self, reason: &'static str) -> EngineError {
        EngineError::InvalidState {
            state: self.state,
            reason,
        }
    }

    fn swap_pair(&self) -> Result<(Coord, Coord), EngineError> {
        self.selection
            .pair()
            .ok_or_else(|| self.fault("swap phase without a selected pair"))
    }

    /// Step slides; true once nothing is moving.
    fn step_slides(&mut self) -> bool {
        let moving = self.board.step_animations();
        trace!(moving, state = %self.state, "animation step");
        moving == 0
    }

    /// Tick the phase timer; true once it has run out.
    fn tick_timer(&mut self) -> bool {
        self.frames_left = self.frames_left.saturating_sub(1);
        self.frames_left == 0
    }

    fn swapping_forward(&mut self) -> Result<StateTag, EngineError> {
        let (a, b) = self.swap_pair()?;
        if !self.step_slides() {
            return Ok(StateTag::SwappingForward);
        }

        self.board.swap(a, b);
        let (matched, _) = matched_union(&self.board, [a, b]);
        if matched.is_empty() {
            self.board.animate_swap(a, b);
            return Ok(StateTag::SwappingBack);
        }

        self.board.highlight(matched);
        self.seeds.clear();
        self.seeds.extend([a, b]);
        self.cascade_depth = 0;
        self.frames_left = self.config.highlight_frames;
        Ok(StateTag::ShowingMatch)
    }

    fn swapping_back(&mut self) -> Result<StateTag, EngineError> {
        let (a, b) = self.swap_pair()?;
        if !self.step_slides() {
            return Ok(StateTag::SwappingBack);
        }

        self.board.swap(a, b);
        self.selection = Selection::default();
        self.last_event = Some(TurnEvent::SwapRejected {
            first: a,
            second: b,
        });
        debug!(%a, %b, "no match, swap reverted");
        Ok(StateTag::Idle)
    }

    /// Fade highlighted cells over the highlight window, then move on.
    fn showing_match(&mut self, next: StateTag) -> StateTag {
        let done = self.tick_timer();
        let total = self.config.highlight_frames;
        let alpha = if total == 0 {
            0
        } else {
            (u32::from(ALPHA_OPAQUE) * self.frames_left / total) as u8
        };
        self.board.set_highlight_alpha(alpha);
        if done {
            next
        } else {
            self.state
        }
    }

    fn clearing(&mut self, is_new_turn: bool) -> Result<StateTag, EngineError> {
        let (matched, groups) = matched_union(&self.board, self.seeds.iter().copied());
        if matched.is_empty() {
            return Err(self.fault("clear phase with an empty match batch"));
        }

        self.board.clear_highlights();
        let count = self.board.mark_cleared(matched.iter().copied()) as u32;
        let (combo, next) = if is_new_turn {
            (groups as u32, StateTag::AnimatingClear)
        } else {
            self.cascade_depth += 1;
            (1, StateTag::AnimatingCascadeClear)
        };
        let turn_score = self.score.add_score(count, combo, is_new_turn);

        debug!(
            matched = count,
            combo = self.score.turn_combo,
            turn_score,
            cascade = self.cascade_depth,
            "batch cleared"
        );
        self.last_event = Some(TurnEvent::Cleared {
            matched: count,
            combo: self.score.turn_combo,
            turn_score,
            cascade: self.cascade_depth,
        });

        self.last_cleared = matched;
        self.seeds.clear();
        self.selection = Selection::default();
        self.frames_left = self.config.clear_delay_frames;
        Ok(next)
    }

    fn count_down(&mut self, next: StateTag) -> StateTag {
        if self.tick_timer() {
            next
        } else {
            self.state
        }
    }

    fn spawning_new_tokens(&mut self) -> StateTag {
        let spawned = self
            .board
            .spawn_replacements(&mut self.rng, &self.config.palette);
        trace!(spawned, "replacements spawned");
        StateTag::Realigning
    }

    fn realigning(&mut self) -> StateTag {
        self.board.drop_destinations();
        StateTag::AnimatingRealign
    }

    fn animating_realign(&mut self) -> Result<StateTag, EngineError> {
        if !self.step_slides() {
            return Ok(StateTag::AnimatingRealign);
        }
        self.board.remove_cleared();
        if !self.board.is_complete() {
            return Err(self.fault("column height differs from the board height after gravity"));
        }
        Ok(StateTag::CheckingCascadeMatch)
    }

    fn checking_cascade_match(&mut self) -> StateTag {
        // Every cell at or above the lowest cleared row of a column has moved.
        self.seeds.clear();
        for bottom in self.geometry.column_bottoms(self.last_cleared.iter().copied()) {
            self.seeds
                .extend((0..=bottom.y).map(|y| Coord::new(bottom.x, y)));
        }

        let (matched, _) = matched_union(&self.board, self.seeds.iter().copied());
        if !matched.is_empty() {
            self.board.highlight(matched);
            self.frames_left = self.config.highlight_frames;
            return StateTag::ShowingCascadeMatch;
        }

        self.seeds.clear();
        self.last_event = Some(TurnEvent::TurnFinished {
            turn_score: self.score.turn_score,
            combo: self.score.turn_combo,
            matched: self.score.turn_matched_count,
        });
        debug!(
            turn = self.turn_id,
            turn_score = self.score.turn_score,
            total = self.score.total_score,
            "turn settled"
        );
        self.frames_left = self.config.turn_score_frames;
        StateTag::ShowingTurnScore
    }

    fn showing_turn_score(&mut self) -> StateTag {
        if self.frames_left > 0 && !self.tick_timer() {
            return StateTag::ShowingTurnScore;
        }
        self.board.clear_highlights();
        self.last_cleared.clear();
        StateTag::Idle
    }
}
