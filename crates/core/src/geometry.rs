//! Grid geometry - bounds, adjacency and the fixed offset patterns
//!
//! Everything that walks the grid goes through the patterns defined here:
//!
//! - **Match windows**: six 3-cell windows through a cell, three horizontal
//!   (ending at, centered on, starting at the cell) and three vertical.
//!   Windows that leave the board are dropped whole, never clipped.
//! - **Clear neighborhood**: the cross of cells at distance 1-2 along each axis
//!   plus the cell itself. Any run through a cell lies inside it.
//! - **Column bottoms**: the lowest entry per column of a coordinate set, used
//!   to seed cascade checks after gravity.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::types::{Adjacency, Coord, MATCH_RUN};

/// Three collinear coordinates
pub type MatchWindow = [Coord; MATCH_RUN];

const WINDOW_OFFSETS: [[(i32, i32); MATCH_RUN]; 6] = [
    [(-2, 0), (-1, 0), (0, 0)],
    [(-1, 0), (0, 0), (1, 0)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, -2), (0, -1), (0, 0)],
    [(0, -1), (0, 0), (0, 1)],
    [(0, 0), (0, 1), (0, 2)],
];

const CLEAR_OFFSETS: [(i32, i32); 9] = [
    (-2, 0),
    (-1, 0),
    (1, 0),
    (2, 0),
    (0, -2),
    (0, -1),
    (0, 1),
    (0, 2),
    (0, 0),
];

/// Board bounds plus the pattern helpers that depend on them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Geometry {
    width: i32,
    height: i32,
}

impl Geometry {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// True iff both coordinates are within `[0, dimension)`
    #[inline]
    pub fn is_valid(&self, c: Coord) -> bool {
        c.x >= 0 && c.x < self.width && c.y >= 0 && c.y < self.height
    }

    /// Checked constructor for raw input coordinates
    pub fn coord(&self, x: i32, y: i32) -> Option<Coord> {
        let c = Coord::new(x, y);
        self.is_valid(c).then_some(c)
    }

    /// Whether `a` and `b` may be swapped under `rule`. A cell is never
    /// adjacent to itself.
    pub fn is_adjacent(&self, a: Coord, b: Coord, rule: Adjacency) -> bool {
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();
        match rule {
            Adjacency::Orthogonal => dx + dy == 1,
            Adjacency::EightWay => dx <= 1 && dy <= 1 && (dx, dy) != (0, 0),
        }
    }

    /// In-bounds 3-cell windows through `c`
    pub fn match_windows(&self, c: Coord) -> ArrayVec<MatchWindow, 6> {
        let mut windows = ArrayVec::new();
        for offsets in WINDOW_OFFSETS {
            let window = offsets.map(|(dx, dy)| c.offset(dx, dy));
            if window.iter().all(|&w| self.is_valid(w)) {
                windows.push(window);
            }
        }
        windows
    }

    /// In-bounds cross of radius 2 around `c`, including `c` itself
    pub fn clear_neighborhood(&self, c: Coord) -> ArrayVec<Coord, 9> {
        CLEAR_OFFSETS
            .iter()
            .map(|&(dx, dy)| c.offset(dx, dy))
            .filter(|&n| self.is_valid(n))
            .collect()
    }

    /// For each distinct column in `coords`, the entry with the largest y.
    /// Sorted by x.
    pub fn column_bottoms<I>(&self, coords: I) -> Vec<Coord>
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut bottoms: BTreeMap<i32, i32> = BTreeMap::new();
        for c in coords {
            bottoms
                .entry(c.x)
                .and_modify(|y| *y = (*y).max(c.y))
                .or_insert(c.y);
        }
        bottoms.into_iter().map(|(x, y)| Coord::new(x, y)).collect()
    }

    /// Every coordinate, column by column, top to bottom
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let (width, height) = (self.width, self.height);
        (0..width).flat_map(move |x| (0..height).map(move |y| Coord::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo() -> Geometry {
        Geometry::new(8, 8)
    }

    #[test]
    fn test_is_valid_bounds() {
        let g = geo();
        assert!(g.is_valid(Coord::new(0, 0)));
        assert!(g.is_valid(Coord::new(7, 7)));
        assert!(!g.is_valid(Coord::new(-1, 0)));
        assert!(!g.is_valid(Coord::new(0, 8)));
        assert_eq!(g.coord(8, 0), None);
        assert_eq!(g.coord(3, 2), Some(Coord::new(3, 2)));
    }

    #[test]
    fn test_orthogonal_adjacency() {
        let g = geo();
        let c = Coord::new(3, 3);
        assert!(g.is_adjacent(c, Coord::new(4, 3), Adjacency::Orthogonal));
        assert!(g.is_adjacent(c, Coord::new(3, 2), Adjacency::Orthogonal));
        assert!(!g.is_adjacent(c, Coord::new(4, 4), Adjacency::Orthogonal));
        assert!(!g.is_adjacent(c, Coord::new(5, 3), Adjacency::Orthogonal));
        assert!(!g.is_adjacent(c, c, Adjacency::Orthogonal));
    }

    #[test]
    fn test_eight_way_adjacency_allows_diagonals() {
        let g = geo();
        let c = Coord::new(3, 3);
        assert!(g.is_adjacent(c, Coord::new(4, 4), Adjacency::EightWay));
        assert!(g.is_adjacent(c, Coord::new(2, 4), Adjacency::EightWay));
        assert!(!g.is_adjacent(c, Coord::new(3, 5), Adjacency::EightWay));
        assert!(!g.is_adjacent(c, c, Adjacency::EightWay));
    }

    #[test]
    fn test_match_windows_interior() {
        let windows = geo().match_windows(Coord::new(4, 4));
        assert_eq!(windows.len(), 6);
        for w in &windows {
            assert!(w.contains(&Coord::new(4, 4)));
        }
    }

    #[test]
    fn test_match_windows_corner_and_edge() {
        let g = geo();
        // Corner: only the windows starting at the cell survive
        let corner = g.match_windows(Coord::new(0, 0));
        assert_eq!(corner.len(), 2);
        assert!(corner.contains(&[Coord::new(0, 0), Coord::new(1, 0), Coord::new(2, 0)]));
        assert!(corner.contains(&[Coord::new(0, 0), Coord::new(0, 1), Coord::new(0, 2)]));

        // One away from the left edge: centered and starting horizontals
        let near = g.match_windows(Coord::new(1, 4));
        let horizontal = near.iter().filter(|w| w[0].y == w[2].y).count();
        assert_eq!(horizontal, 2);
        assert_eq!(near.len(), 5);
    }

    #[test]
    fn test_match_windows_tiny_board() {
        let g = Geometry::new(2, 2);
        assert!(g.match_windows(Coord::new(0, 0)).is_empty());
    }

    #[test]
    fn test_clear_neighborhood() {
        let g = geo();
        let inner = g.clear_neighborhood(Coord::new(4, 4));
        assert_eq!(inner.len(), 9);
        assert!(inner.contains(&Coord::new(4, 4)));
        assert!(inner.contains(&Coord::new(2, 4)));
        assert!(inner.contains(&Coord::new(4, 6)));

        let corner = g.clear_neighborhood(Coord::new(0, 0));
        assert_eq!(corner.len(), 5);
    }

    #[test]
    fn test_column_bottoms() {
        let g = geo();
        let bottoms = g.column_bottoms([
            Coord::new(3, 2),
            Coord::new(1, 5),
            Coord::new(3, 6),
            Coord::new(3, 4),
            Coord::new(1, 1),
        ]);
        assert_eq!(bottoms, vec![Coord::new(1, 5), Coord::new(3, 6)]);
        assert!(g.column_bottoms(Vec::new()).is_empty());
    }

    #[test]
    fn test_coords_column_major() {
        let g = Geometry::new(2, 3);
        let all: Vec<_> = g.coords().collect();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0], Coord::new(0, 0));
        assert_eq!(all[2], Coord::new(0, 2));
        assert_eq!(all[3], Coord::new(1, 0));
    }
}
