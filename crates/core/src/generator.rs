//! Initial board generation
//!
//! Cells are filled column by column, top to bottom. Each cell draws from the
//! palette minus any color that would complete a run with two already-filled
//! cells in one of its match windows, so a fresh board never contains a match.
//! Refills after a clear skip this constraint (see [`Board::spawn_replacements`]).

use arrayvec::ArrayVec;
use tracing::debug;

use crate::board::Board;
use crate::error::EngineError;
use crate::geometry::Geometry;
use crate::rng::SimpleRng;
use crate::types::{Color, Coord};

/// Colors that blocked `c` in at least one window
fn blocked_colors(board: &Board, c: Coord) -> ArrayVec<Color, 6> {
    let mut blocked = ArrayVec::new();
    for window in board.geometry().match_windows(c) {
        let mut others = window.iter().filter(|&&w| w != c).map(|&w| board.color(w));
        if let (Some(Some(a)), Some(Some(b))) = (others.next(), others.next()) {
            if a == b && !blocked.contains(&a) {
                blocked.push(a);
            }
        }
    }
    blocked
}

/// Palette colors that can sit at `c` without completing a run
pub fn available_colors(board: &Board, c: Coord, palette: &[Color]) -> Vec<Color> {
    let blocked = blocked_colors(board, c);
    palette
        .iter()
        .copied()
        .filter(|color| !blocked.contains(color))
        .collect()
}

/// Fill a fresh board with no pre-existing matches.
///
/// Fails with `ExhaustedPalette` rather than placing a token that would match.
pub fn fill_board(
    geometry: Geometry,
    palette: &[Color],
    rng: &mut SimpleRng,
    animation_speed: f32,
) -> Result<Board, EngineError> {
    let mut board = Board::new(geometry).with_animation_speed(animation_speed);
    for c in geometry.coords() {
        let choices = available_colors(&board, c, palette);
        let color = rng
            .choose(&choices)
            .ok_or(EngineError::ExhaustedPalette { x: c.x, y: c.y })?;
        board.set_color(c, Some(color));
    }
    debug!(
        width = geometry.width(),
        height = geometry.height(),
        colors = palette.len(),
        "board filled"
    );
    Ok(board)
}
