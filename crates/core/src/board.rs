//! Board module - the authoritative grid of cells
//!
//! Storage is column-major: `columns[x]` is the column at `x`, ordered from the
//! top row to the bottom row. Every column holds exactly `height` cells except
//! while replacements are waiting above the board (between
//! [`Board::spawn_replacements`] and [`Board::remove_cleared`]). During that
//! window the logical grid is the bottom `height` cells of each column.
//!
//! Cells never move between grid slots when swapped; only the color payload is
//! exchanged. Sliding is expressed through each cell's display position and
//! destination, which the turn state machine steps once per frame.

use serde::Serialize;

use crate::error::EngineError;
use crate::geometry::Geometry;
use crate::rng::SimpleRng;
use crate::types::{Color, Coord, ALPHA_OPAQUE, ANIMATION_SPEED};

/// Continuous render position, in grid units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DisplayPos {
    pub x: f32,
    pub y: f32,
}

impl DisplayPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn at(c: Coord) -> Self {
        Self::new(c.x as f32, c.y as f32)
    }
}

/// One token slot
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub color: Option<Color>,
    /// Matched and waiting for compaction
    pub cleared: bool,
    pub highlighted: bool,
    pub alpha: u8,
    pub display: DisplayPos,
    pub destination: Option<DisplayPos>,
    /// Display distance covered per frame
    pub speed: f32,
}

impl Cell {
    pub fn new(color: Option<Color>, display: DisplayPos, speed: f32) -> Self {
        Self {
            color,
            cleared: false,
            highlighted: false,
            alpha: ALPHA_OPAQUE,
            display,
            destination: None,
            speed,
        }
    }

    /// Target a position; a target equal to the current position is no motion.
    pub fn set_destination(&mut self, dest: DisplayPos) {
        self.destination = (dest != self.display).then_some(dest);
    }

    pub fn is_moving(&self) -> bool {
        self.destination.is_some()
    }

    /// Advance one frame toward the destination. Returns true while still moving.
    pub fn step(&mut self) -> bool {
        let Some(dest) = self.destination else {
            return false;
        };
        self.display.x = approach(self.display.x, dest.x, self.speed);
        self.display.y = approach(self.display.y, dest.y, self.speed);
        if self.display == dest {
            self.destination = None;
        }
        self.destination.is_some()
    }

    fn snap_to(&mut self, c: Coord) {
        self.display = DisplayPos::at(c);
        self.destination = None;
    }
}

fn approach(from: f32, to: f32, speed: f32) -> f32 {
    if (to - from).abs() <= speed {
        to
    } else if to > from {
        from + speed
    } else {
        from - speed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    geometry: Geometry,
    columns: Vec<Vec<Cell>>,
    animation_speed: f32,
}

impl Board {
    /// Create a board of empty cells
    pub fn new(geometry: Geometry) -> Self {
        let columns = (0..geometry.width())
            .map(|x| {
                (0..geometry.height())
                    .map(|y| Cell::new(None, DisplayPos::at(Coord::new(x, y)), ANIMATION_SPEED))
                    .collect()
            })
            .collect();
        Self {
            geometry,
            columns,
            animation_speed: ANIMATION_SPEED,
        }
    }

    /// Build from row-major colors (`rows[y][x]`)
    pub fn from_rows(rows: &[Vec<Color>]) -> Result<Self, EngineError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(EngineError::InvalidConfig("board rows are empty".into()));
        }
        if rows.iter().any(|row| row.len() != width) {
            return Err(EngineError::InvalidConfig(
                "board rows differ in length".into(),
            ));
        }

        let mut board = Self::new(Geometry::new(width as i32, height as i32));
        for (y, row) in rows.iter().enumerate() {
            for (x, &color) in row.iter().enumerate() {
                board.set_color(Coord::new(x as i32, y as i32), Some(color));
            }
        }
        Ok(board)
    }

    /// Apply an animation speed to every current and future cell
    pub fn with_animation_speed(mut self, speed: f32) -> Self {
        self.animation_speed = speed;
        for cell in self.columns.iter_mut().flatten() {
            cell.speed = speed;
        }
        self
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn width(&self) -> i32 {
        self.geometry.width()
    }

    pub fn height(&self) -> i32 {
        self.geometry.height()
    }

    /// Columns top to bottom, including replacements still above the board
    pub fn columns(&self) -> &[Vec<Cell>] {
        &self.columns
    }

    /// Number of cells stacked above the logical grid in column `x`
    fn overflow(&self, x: usize) -> usize {
        self.columns[x]
            .len()
            .saturating_sub(self.geometry.height() as usize)
    }

    fn slot(&self, c: Coord) -> Option<(usize, usize)> {
        if !self.geometry.is_valid(c) {
            return None;
        }
        let x = c.x as usize;
        Some((x, c.y as usize + self.overflow(x)))
    }

    pub fn get(&self, c: Coord) -> Option<&Cell> {
        let (x, idx) = self.slot(c)?;
        self.columns[x].get(idx)
    }

    pub fn get_mut(&mut self, c: Coord) -> Option<&mut Cell> {
        let (x, idx) = self.slot(c)?;
        self.columns[x].get_mut(idx)
    }

    /// Color at `c`; cleared and empty cells have none
    pub fn color(&self, c: Coord) -> Option<Color> {
        self.get(c).filter(|cell| !cell.cleared)?.color
    }

    /// Set the color at `c`. Returns false if out of bounds.
    pub fn set_color(&mut self, c: Coord, color: Option<Color>) -> bool {
        match self.get_mut(c) {
            Some(cell) => {
                cell.color = color;
                true
            }
            None => false,
        }
    }

    /// Exchange the colors of two cells and park both at their own grid slots.
    /// Returns false (no-op) if either is out of bounds.
    pub fn swap(&mut self, a: Coord, b: Coord) -> bool {
        let (Some(ca), Some(cb)) = (self.color_slot(a), self.color_slot(b)) else {
            return false;
        };
        if let Some(cell) = self.get_mut(a) {
            cell.color = cb;
            cell.snap_to(a);
        }
        if let Some(cell) = self.get_mut(b) {
            cell.color = ca;
            cell.snap_to(b);
        }
        true
    }

    fn color_slot(&self, c: Coord) -> Option<Option<Color>> {
        self.get(c).map(|cell| cell.color)
    }

    /// Point two cells at each other's slot. Returns false if either is out of bounds.
    pub fn animate_swap(&mut self, a: Coord, b: Coord) -> bool {
        if !self.geometry.is_valid(a) || !self.geometry.is_valid(b) {
            return false;
        }
        if let Some(cell) = self.get_mut(a) {
            cell.set_destination(DisplayPos::at(b));
        }
        if let Some(cell) = self.get_mut(b) {
            cell.set_destination(DisplayPos::at(a));
        }
        true
    }

    /// Flag cells as matched. Out-of-bounds entries are skipped.
    /// Returns how many cells were newly cleared.
    pub fn mark_cleared<I>(&mut self, coords: I) -> usize
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut marked = 0;
        for c in coords {
            if let Some(cell) = self.get_mut(c) {
                if !cell.cleared {
                    cell.cleared = true;
                    marked += 1;
                }
            }
        }
        marked
    }

    pub fn highlight<I>(&mut self, coords: I)
    where
        I: IntoIterator<Item = Coord>,
    {
        for c in coords {
            if let Some(cell) = self.get_mut(c) {
                cell.highlighted = true;
            }
        }
    }

    /// Fade every highlighted cell to `alpha`
    pub fn set_highlight_alpha(&mut self, alpha: u8) {
        for cell in self.columns.iter_mut().flatten() {
            if cell.highlighted {
                cell.alpha = alpha;
            }
        }
    }

    pub fn clear_highlights(&mut self) {
        for cell in self.columns.iter_mut().flatten() {
            cell.highlighted = false;
            cell.alpha = ALPHA_OPAQUE;
        }
    }

    pub fn cleared_count(&self) -> usize {
        self.columns
            .iter()
            .flatten()
            .filter(|cell| cell.cleared)
            .count()
    }

    /// Stack one fresh cell above each column per cleared cell in it.
    ///
    /// Colors are drawn uniformly from `palette` with no adjacency constraint.
    /// New cells start above the visible area (display y = -1, -2, ...).
    /// Returns the number of cells spawned.
    pub fn spawn_replacements(&mut self, rng: &mut SimpleRng, palette: &[Color]) -> usize {
        let speed = self.animation_speed;
        let mut spawned = 0;
        for (x, column) in self.columns.iter_mut().enumerate() {
            let missing = column.iter().filter(|cell| cell.cleared).count();
            let fresh: Vec<Cell> = (1..=missing)
                .rev()
                .map(|above| {
                    let at = DisplayPos::new(x as f32, -(above as f32));
                    Cell::new(rng.choose(palette), at, speed)
                })
                .collect();
            column.splice(0..0, fresh);
            spawned += missing;
        }
        spawned
    }

    /// Give every surviving cell a fall target: its slot row plus the number of
    /// cleared cells below it in the same column.
    pub fn drop_destinations(&mut self) {
        let height = self.geometry.height() as usize;
        for (x, column) in self.columns.iter_mut().enumerate() {
            let overflow = column.len().saturating_sub(height) as i32;
            let mut cleared_below = 0;
            for (idx, cell) in column.iter_mut().enumerate().rev() {
                if cell.cleared {
                    cleared_below += 1;
                    continue;
                }
                let slot_y = idx as i32 - overflow;
                cell.set_destination(DisplayPos::new(x as f32, (slot_y + cleared_below) as f32));
            }
        }
    }

    /// Step every moving cell by one frame. Returns how many are still moving.
    pub fn step_animations(&mut self) -> usize {
        self.columns
            .iter_mut()
            .flatten()
            .filter(|cell| cell.is_moving())
            .map(|cell| cell.step())
            .filter(|&moving| moving)
            .count()
    }

    /// True when no cell has a pending destination
    pub fn is_settled(&self) -> bool {
        !self.columns.iter().flatten().any(Cell::is_moving)
    }

    /// True when every column holds exactly `height` cells
    pub fn is_complete(&self) -> bool {
        let height = self.geometry.height() as usize;
        self.columns.iter().all(|column| column.len() == height)
    }

    /// Drop cleared cells from every column, preserving the order of the rest,
    /// and park survivors at their new slots. Returns the number removed.
    pub fn remove_cleared(&mut self) -> usize {
        let mut removed = 0;
        let height = self.geometry.height();
        for (x, column) in self.columns.iter_mut().enumerate() {
            let before = column.len();
            column.retain(|cell| !cell.cleared);
            removed += before - column.len();

            let overflow = column.len() as i32 - height;
            for (idx, cell) in column.iter_mut().enumerate() {
                cell.snap_to(Coord::new(x as i32, idx as i32 - overflow));
            }
        }
        removed
    }

    /// Gravity in one step: refill above, remove cleared cells, settle.
    /// Returns the number of cells replaced.
    pub fn compact(&mut self, rng: &mut SimpleRng, palette: &[Color]) -> usize {
        self.spawn_replacements(rng, palette);
        self.remove_cleared()
    }

    /// Logical colors as rows (`rows[y][x]`)
    pub fn to_color_rows(&self) -> Vec<Vec<Option<Color>>> {
        (0..self.height())
            .map(|y| {
                (0..self.width())
                    .map(|x| self.color(Coord::new(x, y)))
                    .collect()
            })
            .collect()
    }
}
