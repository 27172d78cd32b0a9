//! Match detection
//!
//! A cell matches when one of its in-bounds 3-cell windows holds three cells
//! of its color. Shapes such as an L or a T are the union of several windows;
//! results are sets so overlapping windows do not double count.

use std::collections::BTreeSet;

use crate::board::Board;
use crate::types::{Adjacency, Coord, MATCH_RUN};

/// Every coordinate sharing a straight run of three or more with `c`.
/// Empty when `c` has no color, is cleared, or is out of bounds.
pub fn matched_coordinates(board: &Board, c: Coord) -> BTreeSet<Coord> {
    let mut matched = BTreeSet::new();
    let Some(color) = board.color(c) else {
        return matched;
    };
    for window in board.geometry().match_windows(c) {
        if window.iter().all(|&w| board.color(w) == Some(color)) {
            matched.extend(window);
        }
    }
    matched
}

pub fn has_match(board: &Board, c: Coord) -> bool {
    let Some(color) = board.color(c) else {
        return false;
    };
    // Any run through `c` lies inside its cross neighborhood.
    let same = board
        .geometry()
        .clear_neighborhood(c)
        .iter()
        .filter(|&&n| board.color(n) == Some(color))
        .count();
    if same < MATCH_RUN {
        return false;
    }
    !matched_coordinates(board, c).is_empty()
}

/// Union of the match sets of `seeds`, plus how many seeds matched on their own.
pub fn matched_union<I>(board: &Board, seeds: I) -> (BTreeSet<Coord>, usize)
where
    I: IntoIterator<Item = Coord>,
{
    let mut union = BTreeSet::new();
    let mut groups = 0;
    for seed in seeds {
        let matched = matched_coordinates(board, seed);
        if !matched.is_empty() {
            groups += 1;
            union.extend(matched);
        }
    }
    (union, groups)
}

/// True if any cell on the board is part of a run
pub fn board_has_match(board: &Board) -> bool {
    board.geometry().coords().any(|c| has_match(board, c))
}

/// First swap (scan order: column, then row) that would create a match.
pub fn find_valid_swap(board: &Board, adjacency: Adjacency) -> Option<(Coord, Coord)> {
    const ORTHOGONAL: [(i32, i32); 2] = [(1, 0), (0, 1)];
    const EIGHT_WAY: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (-1, 1)];

    let geometry = board.geometry();
    let offsets: &[(i32, i32)] = match adjacency {
        Adjacency::Orthogonal => &ORTHOGONAL,
        Adjacency::EightWay => &EIGHT_WAY,
    };

    let mut probe = board.clone();
    for a in geometry.coords() {
        for &(dx, dy) in offsets {
            let b = a.offset(dx, dy);
            if !geometry.is_valid(b) || probe.color(a) == probe.color(b) {
                continue;
            }
            probe.swap(a, b);
            let found = has_match(&probe, a) || has_match(&probe, b);
            probe.swap(a, b);
            if found {
                return Some((a, b));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color::{self, Blue as B, Green as G, Red as R, Yellow as Y};

    fn board(rows: &[&[Color]]) -> Board {
        let rows: Vec<Vec<Color>> = rows.iter().map(|r| r.to_vec()).collect();
        Board::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_horizontal_run() {
        let b = board(&[
            &[R, R, R, G],
            &[G, B, Y, B],
            &[B, Y, G, Y],
        ]);
        let m = matched_coordinates(&b, Coord::new(1, 0));
        assert_eq!(
            m,
            BTreeSet::from([Coord::new(0, 0), Coord::new(1, 0), Coord::new(2, 0)])
        );
        assert!(has_match(&b, Coord::new(0, 0)));
        assert!(!has_match(&b, Coord::new(3, 0)));
    }

    #[test]
    fn test_run_of_four_from_every_member() {
        let b = board(&[&[G, G, G, G, B]]);
        let full: BTreeSet<Coord> = (0..4).map(|x| Coord::new(x, 0)).collect();
        for x in 0..4 {
            assert_eq!(matched_coordinates(&b, Coord::new(x, 0)), full, "x={}", x);
        }
    }

    #[test]
    fn test_l_shape_deduplicates() {
        let b = board(&[
            &[R, G, B],
            &[R, B, G],
            &[R, R, R],
        ]);
        let m = matched_coordinates(&b, Coord::new(0, 2));
        assert_eq!(m.len(), 5);
        assert!(m.contains(&Coord::new(0, 0)));
        assert!(m.contains(&Coord::new(2, 2)));
    }

    #[test]
    fn test_non_collinear_three_is_not_a_match() {
        let b = board(&[
            &[R, R, G],
            &[R, B, Y],
            &[G, Y, B],
        ]);
        for c in [Coord::new(0, 0), Coord::new(1, 0), Coord::new(0, 1)] {
            assert!(matched_coordinates(&b, c).is_empty());
            assert!(!has_match(&b, c));
        }
    }

    #[test]
    fn test_cleared_cells_do_not_match() {
        let mut b = board(&[&[Y, Y, Y]]);
        b.mark_cleared([Coord::new(1, 0)]);
        assert!(!has_match(&b, Coord::new(0, 0)));
        assert!(matched_coordinates(&b, Coord::new(1, 0)).is_empty());
    }

    #[test]
    fn test_matched_union_counts_groups() {
        let b = board(&[
            &[R, R, R],
            &[G, B, Y],
            &[B, B, B],
        ]);
        let (union, groups) =
            matched_union(&b, [Coord::new(0, 0), Coord::new(1, 1), Coord::new(2, 2)]);
        assert_eq!(groups, 2);
        assert_eq!(union.len(), 6);
    }

    #[test]
    fn test_find_valid_swap() {
        let b = board(&[
            &[R, G, R, R],
            &[G, B, Y, B],
            &[B, Y, G, Y],
        ]);
        assert!(!board_has_match(&b));
        let (a, c) = find_valid_swap(&b, Adjacency::Orthogonal).unwrap();
        let mut after = b.clone();
        after.swap(a, c);
        assert!(has_match(&after, a) || has_match(&after, c));
    }

    #[test]
    fn test_no_valid_swap() {
        let b = board(&[
            &[R, G],
            &[B, Y],
        ]);
        assert_eq!(find_valid_swap(&b, Adjacency::EightWay), None);
    }
}
