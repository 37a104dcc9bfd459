//! Deadlock detection and hint finding.
//!
//! Both questions reduce to the same scan: group the live tiles by kind
//! and probe pairs with the path finder until one connects. The hint UI
//! wants the winning pair and its path; the deadlock check only wants to
//! know whether such a pair exists.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;

use crate::path::find_path;
use crate::types::{Board, Point, Tile, TileKind};

/// A playable pair and the path that joins it.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableMatch {
    pub a: Tile,
    pub b: Tile,
    pub path: Vec<Point>,
}

/// First connectable same-kind pair on the board, or `None` when the
/// board is deadlocked.
///
/// The scan order is stable: kinds ascending, tiles row-major within a
/// kind, pairs `(i, j)` with `i < j`. The first hit wins; nothing about
/// it is optimal, which is all the hint feature needs.
pub fn find_available_match(board: &Board) -> Option<AvailableMatch> {
    let mut by_kind: BTreeMap<TileKind, Vec<Tile>> = BTreeMap::new();
    for tile in board.live_tiles() {
        by_kind.entry(tile.kind).or_default().push(tile);
    }

    for group in by_kind.values() {
        let hit = group.iter().tuple_combinations::<(_, _)>().find_map(|(a, b)| {
            find_path(board, a.position, b.position).map(|path| AvailableMatch {
                a: *a,
                b: *b,
                path,
            })
        });
        if hit.is_some() {
            return hit;
        }
    }
    None
}

/// True iff at least one legal match remains.
pub fn has_possible_moves(board: &Board) -> bool {
    find_available_match(board).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::generate;
    use crate::path::turn_count;
    use crate::rng::GameRng;

    fn place(board: &mut Board, point: Point, kind: TileKind) {
        let id = board.index(point) as u32;
        board.set(
            point,
            Some(Tile {
                id,
                kind,
                position: point,
                matched: false,
                generation: 0,
            }),
        );
    }

    /// Exhaustive pair scan with no early exit, as an oracle.
    fn any_pair_connects(board: &Board) -> bool {
        let live: Vec<Tile> = board.live_tiles().collect();
        let mut connectable = false;
        for (i, a) in live.iter().enumerate() {
            for b in &live[i + 1..] {
                if a.kind == b.kind && find_path(board, a.position, b.position).is_some() {
                    connectable = true;
                }
            }
        }
        connectable
    }

    #[test]
    fn test_empty_board_has_no_match() {
        let board = Board::new(6, 6);
        assert!(find_available_match(&board).is_none());
        assert!(!has_possible_moves(&board));
    }

    #[test]
    fn test_adjacent_pair_is_found() {
        let mut board = Board::new(4, 5);
        place(&mut board, Point::new(1, 1), 3);
        place(&mut board, Point::new(1, 2), 3);

        let hit = find_available_match(&board).expect("adjacent pair must match");
        assert_eq!(hit.a.kind, 3);
        assert_eq!(hit.b.kind, 3);
        assert_eq!(hit.path, vec![Point::new(1, 1), Point::new(1, 2)]);
    }

    #[test]
    fn test_same_kind_required() {
        let mut board = Board::new(4, 5);
        place(&mut board, Point::new(1, 1), 1);
        place(&mut board, Point::new(1, 3), 2);
        assert!(find_available_match(&board).is_none());
    }

    #[test]
    fn test_blocked_pair_reported_deadlocked_until_blocker_clears() {
        // Walled 3x5 corridor: the only pair is split by a third kind.
        // Wall kinds are pairwise distinct so the walls themselves offer
        // no matches.
        let mut board = Board::new(3, 5);
        for col in 0..5 {
            place(&mut board, Point::new(0, col), 10 + col as TileKind);
            place(&mut board, Point::new(2, col), 20 + col as TileKind);
        }
        place(&mut board, Point::new(1, 1), 1);
        place(&mut board, Point::new(1, 3), 1);
        place(&mut board, Point::new(1, 2), 2);

        assert!(!has_possible_moves(&board));

        board.mark_matched(Point::new(1, 2));
        let hit = find_available_match(&board).expect("clearing the blocker frees the pair");
        assert_eq!((hit.a.position, hit.b.position), (Point::new(1, 1), Point::new(1, 3)));
        assert_eq!(hit.path, vec![Point::new(1, 1), Point::new(1, 2), Point::new(1, 3)]);
    }

    #[test]
    fn test_returned_path_is_well_formed() {
        let mut rng = GameRng::from_seed(21);
        let board = generate(6, 7, 5, &mut rng).unwrap();

        let hit = find_available_match(&board).expect("fresh boards are rarely dead");
        assert_eq!(hit.path.first(), Some(&hit.a.position));
        assert_eq!(hit.path.last(), Some(&hit.b.position));
        assert!(turn_count(&hit.path) <= crate::path::MAX_TURNS);
        assert_eq!(hit.a.kind, hit.b.kind);
        assert_ne!(hit.a.id, hit.b.id);
    }

    #[test]
    fn test_agrees_with_exhaustive_scan() {
        for seed in 0..25 {
            let mut rng = GameRng::from_seed(seed);
            let mut board = generate(6, 6, 6, &mut rng).unwrap();

            // Randomly retire tiles to sample sparse and dense states.
            let positions: Vec<Point> = board.live_tiles().map(|t| t.position).collect();
            for p in positions {
                if rng.index(100) < 40 {
                    board.mark_matched(p);
                }
            }

            assert_eq!(
                has_possible_moves(&board),
                any_pair_connects(&board),
                "seed {seed}: early-exit scan disagrees with oracle"
            );
        }
    }
}
