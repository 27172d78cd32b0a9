use serde::Serialize;

use crate::board::{Board, Cell};
use crate::types::{Color, Coord, StateTag};

/// Read-only render data for one cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellSnapshot {
    pub color: Option<Color>,
    pub display_x: f32,
    pub display_y: f32,
    pub highlighted: bool,
    pub cleared: bool,
    pub alpha: u8,
}

impl From<&Cell> for CellSnapshot {
    fn from(cell: &Cell) -> Self {
        Self {
            color: cell.color,
            display_x: cell.display.x,
            display_y: cell.display.y,
            highlighted: cell.highlighted,
            cleared: cell.cleared,
            alpha: cell.alpha,
        }
    }
}

/// Board render data.
///
/// `columns[x]` runs top to bottom and may be longer than `height` while
/// replacements are still sliding in from above (negative `display_y`).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BoardSnapshot {
    pub width: i32,
    pub height: i32,
    pub state: StateTag,
    pub columns: Vec<Vec<CellSnapshot>>,
    /// FNV-1a over the logical color grid
    pub board_hash: u64,
}

impl BoardSnapshot {
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.state = StateTag::Idle;
        self.columns.clear();
        self.board_hash = 0;
    }

    /// Cell at a logical grid coordinate
    pub fn cell(&self, c: Coord) -> Option<&CellSnapshot> {
        if c.x < 0 || c.y < 0 || c.y >= self.height {
            return None;
        }
        let column = self.columns.get(c.x as usize)?;
        let overflow = column.len().saturating_sub(self.height as usize);
        column.get(c.y as usize + overflow)
    }
}

/// Refresh `out` from `board`, reusing its allocations.
pub fn write_board(board: &Board, state: StateTag, out: &mut BoardSnapshot) {
    out.width = board.width();
    out.height = board.height();
    out.state = state;
    out.columns.resize_with(board.columns().len(), Vec::new);
    for (dst, src) in out.columns.iter_mut().zip(board.columns()) {
        dst.clear();
        dst.extend(src.iter().map(CellSnapshot::from));
    }
    out.board_hash = board_hash(board);
}

fn color_code(color: Option<Color>) -> u8 {
    match color {
        None => 0,
        Some(c) => Color::ALL.iter().position(|&k| k == c).map_or(0, |i| i as u8 + 1),
    }
}

/// FNV-1a 64-bit hash of the logical colors, row by row
pub fn board_hash(board: &Board) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for y in 0..board.height() {
        for x in 0..board.width() {
            h ^= u64::from(color_code(board.color(Coord::new(x, y))));
            h = h.wrapping_mul(0x00000100000001B3);
        }
    }
    h
}
