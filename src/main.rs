//! Headless match-3 simulator (default binary).
//!
//! Plays turns by always taking the first valid swap, drives each turn to
//! completion one frame at a time, and reports what happened. A board with no
//! valid swap is replaced with a fresh one.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use match3_board::core::{BoardSnapshot, EngineConfig, GameState, SelectOutcome, TurnEvent};
use match3_board::types::{Coord, StateTag};

#[derive(Debug, Parser)]
#[command(name = "match3-sim", about = "Headless match-3 board simulator")]
struct Args {
    /// RNG seed (overrides the config file)
    #[arg(long)]
    seed: Option<u32>,

    /// Number of swaps to play
    #[arg(long, default_value_t = 20)]
    turns: u32,

    /// Frames one turn may take before the run is aborted
    #[arg(
        long,
        default_value_t = 100_000,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    max_ticks: u32,

    /// Engine config as JSON; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print one JSON object per turn instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct TurnReport {
    episode: u32,
    turn: u32,
    first: Coord,
    second: Coord,
    ticks: u32,
    cascades: u32,
    matched: u32,
    combo: u32,
    turn_score: u64,
    total_score: u64,
    board_hash: u64,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    turns: u32,
    games: u32,
    ticks: u64,
    /// Summed over every game played
    score: u64,
    best_turn_score: u64,
    max_combo: u32,
    max_matched: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut game = GameState::new(config).context("failed to deal the first board")?;
    let mut snapshot = BoardSnapshot::default();
    let mut summary = Summary {
        games: 1,
        ..Summary::default()
    };

    for _ in 0..args.turns {
        let (first, second) = match game.valid_swap() {
            Some(pair) => pair,
            None => {
                info!(episode = game.episode_id(), "no valid swap left, dealing a new board");
                summary.score += game.score_snapshot().total_score;
                game.new_game()?;
                summary.games += 1;
                match game.valid_swap() {
                    Some(pair) => pair,
                    None => bail!("freshly dealt board has no valid swap"),
                }
            }
        };

        let report = play_turn(&mut game, first, second, args.max_ticks, &mut snapshot)?;
        summary.turns += 1;
        summary.ticks += u64::from(report.ticks);
        summary.best_turn_score = summary.best_turn_score.max(report.turn_score);
        let score = game.score_snapshot();
        summary.max_combo = summary.max_combo.max(score.max_combo);
        summary.max_matched = summary.max_matched.max(score.max_matched_count);

        if args.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            println!(
                "turn {:>3}  {} <-> {}  ticks {:>4}  cascades {}  matched {:>2}  combo {}  turn score {:>5}  total {:>7}",
                report.turn,
                report.first,
                report.second,
                report.ticks,
                report.cascades,
                report.matched,
                report.combo,
                report.turn_score,
                report.total_score
            );
        }
    }
    summary.score += game.score_snapshot().total_score;

    if args.json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!(
            "played {} turns over {} game(s) in {} ticks: score {}, best turn {}, max combo {}, max matched {}",
            summary.turns,
            summary.games,
            summary.ticks,
            summary.score,
            summary.best_turn_score,
            summary.max_combo,
            summary.max_matched
        );
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<EngineConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(config)
}

/// Select the pair, then advance until the machine is back in `Idle`.
fn play_turn(
    game: &mut GameState,
    first: Coord,
    second: Coord,
    max_ticks: u32,
    snapshot: &mut BoardSnapshot,
) -> Result<TurnReport> {
    if game.try_select(first.x, first.y) != SelectOutcome::First
        || game.try_select(second.x, second.y) != SelectOutcome::SwapStarted
    {
        bail!("engine refused swap {} <-> {}", first, second);
    }

    let mut ticks = 0;
    let mut cascades = 0;
    loop {
        let state = game.advance()?;
        ticks += 1;
        if let Some(TurnEvent::Cleared { cascade, .. }) = game.take_last_event() {
            cascades = cascade;
        }
        if state == StateTag::Idle {
            break;
        }
        if ticks >= max_ticks {
            bail!(
                "turn {} still in {} after {} ticks",
                game.turn_id(),
                state,
                ticks
            );
        }
    }

    game.snapshot_board_into(snapshot);
    let score = game.score_snapshot();
    Ok(TurnReport {
        episode: game.episode_id(),
        turn: game.turn_id(),
        first,
        second,
        ticks,
        cascades,
        matched: score.turn_matched_count,
        combo: score.turn_combo,
        turn_score: score.turn_score,
        total_score: score.total_score,
        board_hash: snapshot.board_hash,
    })
}
