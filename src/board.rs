//! Board generation and the deadlock-resolving shuffle.
//!
//! Generation lays out paired tile kinds inside the one-cell border and
//! guarantees only the pairing invariant, not end-to-end solvability.
//! The shuffle engine restores solvability after a deadlock by retrying
//! random scatters against an injected solvability check, with a bounded
//! attempt budget and a best-effort fallback.

use log::{debug, warn};
use thiserror::Error;

use crate::rng::GameRng;
use crate::types::{Board, Point, Tile, TileKind};

/// Random scatters tried by [`shuffle`] before giving up on solvability.
pub const MAX_SHUFFLE_ATTEMPTS: u32 = 20;

/// Re-picks per offending position in the de-clumping pass.
const DECLUMP_ATTEMPTS: u32 = 10;

/// Fatal level-configuration errors. These abort level start and are not
/// retried; every other engine outcome is an ordinary value.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum GenerateError {
    #[error("board of {rows}x{cols} leaves no playable cells inside the border")]
    EmptyPlayableArea { rows: usize, cols: usize },
    #[error("playable area of {cells} cells cannot be tiled in pairs")]
    OddPlayableArea { cells: usize },
}

/// Validate dimensions and return the playable cell count.
///
/// Dimensions include the border, so the playable sub-grid is
/// `(rows-2) x (cols-2)`; it must be non-empty and even.
pub fn playable_cells(rows: usize, cols: usize) -> Result<usize, GenerateError> {
    if rows < 3 || cols < 3 {
        return Err(GenerateError::EmptyPlayableArea { rows, cols });
    }
    let cells = (rows - 2) * (cols - 2);
    if cells % 2 != 0 {
        return Err(GenerateError::OddPlayableArea { cells });
    }
    Ok(cells)
}

/// Generate a fresh board: paired kinds cycled from `1..=kinds`, shuffled,
/// de-clumped, and placed row-major inside the border.
///
/// `kinds` must be at least 1 (the level table guarantees this). The
/// result satisfies the pairing and border invariants but is not checked
/// for solvability; deadlocks are handled operationally via [`shuffle`].
pub fn generate(
    rows: usize,
    cols: usize,
    kinds: TileKind,
    rng: &mut GameRng,
) -> Result<Board, GenerateError> {
    debug_assert!(kinds > 0, "caller validates the kind count");
    let cells = playable_cells(rows, cols)?;
    let pairs = cells / 2;

    let mut layout: Vec<TileKind> = Vec::with_capacity(cells);
    for i in 0..pairs {
        let kind = (i % kinds as usize) as TileKind + 1;
        layout.push(kind);
        layout.push(kind);
    }

    rng.shuffle(&mut layout);
    declump(&mut layout, rng);

    let mut board = Board::new(rows, cols);
    for (id, (position, kind)) in board
        .playable_positions()
        .into_iter()
        .zip(layout)
        .enumerate()
    {
        board.set(
            position,
            Some(Tile {
                id: id as u32,
                kind,
                position,
                matched: false,
                generation: 0,
            }),
        );
    }

    debug!(
        "generated {rows}x{cols} board: {} tiles over {kinds} kinds",
        cells
    );
    Ok(board)
}

/// Best-effort pass breaking up runs of equal kinds in the flat layout.
///
/// For each entry equal to its left neighbor, re-pick a random swap
/// candidate up to [`DECLUMP_ATTEMPTS`] times looking for a different
/// kind, then swap whatever was last picked. Only the order changes,
/// never the kind multiset, and adjacent duplicates may survive.
fn declump(layout: &mut [TileKind], rng: &mut GameRng) {
    for i in 1..layout.len() {
        if layout[i] != layout[i - 1] {
            continue;
        }
        let mut swap_idx = rng.index(layout.len());
        let mut attempts = 0;
        while layout[swap_idx] == layout[i] && attempts < DECLUMP_ATTEMPTS {
            swap_idx = rng.index(layout.len());
            attempts += 1;
        }
        layout.swap(i, swap_idx);
    }
}

/// What a shuffle did: how many scatters it tried and whether the layout
/// it adopted passed the solvability check.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShuffleOutcome {
    pub attempts: u32,
    pub solvable: bool,
}

/// Scatter the remaining live tiles over the whole playable sub-grid
/// until `is_solvable` accepts a layout, up to [`MAX_SHUFFLE_ATTEMPTS`].
///
/// Cells vacated by earlier matches are fair targets, and matched tiles
/// are dropped from the grid. Tile ids survive the shuffle; the board's
/// generation counter is bumped and relocated tiles carry the new stamp.
/// On exhaustion one final scatter is adopted unchecked, accepting a
/// possible residual deadlock instead of looping forever.
///
/// The solvability check is injected so this module stays decoupled from
/// the match scanner; callers pass [`crate::solver::has_possible_moves`].
pub fn shuffle<F>(board: &mut Board, rng: &mut GameRng, is_solvable: F) -> ShuffleOutcome
where
    F: Fn(&Board) -> bool,
{
    let live: Vec<Tile> = board.live_tiles().collect();
    if live.is_empty() {
        return ShuffleOutcome {
            attempts: 0,
            solvable: true,
        };
    }
    let positions = board.playable_positions();
    let next_generation = board.generation + 1;

    for attempt in 1..=MAX_SHUFFLE_ATTEMPTS {
        let candidate = scatter(board, next_generation, &live, &positions, rng);
        if is_solvable(&candidate) {
            debug!("shuffle produced a solvable layout on attempt {attempt}");
            *board = candidate;
            return ShuffleOutcome {
                attempts: attempt,
                solvable: true,
            };
        }
    }

    warn!("no solvable layout within {MAX_SHUFFLE_ATTEMPTS} scatters, keeping the last roll");
    *board = scatter(board, next_generation, &live, &positions, rng);
    ShuffleOutcome {
        attempts: MAX_SHUFFLE_ATTEMPTS,
        solvable: false,
    }
}

/// One independent random assignment: shuffle the kind multiset and the
/// position list, zip them back together under the surviving ids.
fn scatter(
    board: &Board,
    generation: u32,
    live: &[Tile],
    positions: &[Point],
    rng: &mut GameRng,
) -> Board {
    let mut kinds: Vec<TileKind> = live.iter().map(|t| t.kind).collect();
    let mut slots = positions.to_vec();
    rng.shuffle(&mut kinds);
    rng.shuffle(&mut slots);

    let mut scattered = Board::new(board.rows, board.cols);
    scattered.generation = generation;
    for ((tile, kind), position) in live.iter().zip(kinds).zip(slots) {
        scattered.set(
            position,
            Some(Tile {
                id: tile.id,
                kind,
                position,
                matched: false,
                generation,
            }),
        );
    }
    scattered
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn kind_counts(board: &Board) -> BTreeMap<TileKind, usize> {
        let mut counts = BTreeMap::new();
        for tile in board.live_tiles() {
            *counts.entry(tile.kind).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_generate_rejects_empty_playable_area() {
        let mut rng = GameRng::from_seed(1);
        assert_eq!(
            generate(2, 9, 4, &mut rng),
            Err(GenerateError::EmptyPlayableArea { rows: 2, cols: 9 })
        );
        assert_eq!(
            generate(12, 1, 4, &mut rng),
            Err(GenerateError::EmptyPlayableArea { rows: 12, cols: 1 })
        );
    }

    #[test]
    fn test_generate_rejects_odd_playable_area() {
        let mut rng = GameRng::from_seed(1);
        // 3x5 playable interior is 1x3 = 3 cells.
        assert_eq!(
            generate(3, 5, 4, &mut rng),
            Err(GenerateError::OddPlayableArea { cells: 3 })
        );
    }

    #[test]
    fn test_generate_fills_interior_and_keeps_border_empty() {
        let mut rng = GameRng::from_seed(7);
        let board = generate(12, 9, 8, &mut rng).unwrap();

        assert_eq!(board.live_count(), 10 * 7);
        for row in 0..board.rows {
            assert_eq!(board.get(Point::new(row, 0)), None);
            assert_eq!(board.get(Point::new(row, board.cols - 1)), None);
        }
        for col in 0..board.cols {
            assert_eq!(board.get(Point::new(0, col)), None);
            assert_eq!(board.get(Point::new(board.rows - 1, col)), None);
        }
        for tile in board.live_tiles() {
            assert_eq!(board.get(tile.position).unwrap().id, tile.id);
        }
    }

    #[test]
    fn test_generate_pairing_invariant() {
        for seed in 0..10 {
            let mut rng = GameRng::from_seed(seed);
            let board = generate(12, 9, 15, &mut rng).unwrap();
            for (kind, count) in kind_counts(&board) {
                assert!(count % 2 == 0, "kind {kind} appears {count} times");
                assert!(count >= 2);
                assert!((1..=15).contains(&kind));
            }
        }
    }

    #[test]
    fn test_generate_cycles_kinds_when_pairs_exceed_kind_count() {
        let mut rng = GameRng::from_seed(3);
        // 2x2 interior, 2 pairs, but only one kind available.
        let board = generate(4, 4, 1, &mut rng).unwrap();
        let counts = kind_counts(&board);
        assert_eq!(counts.get(&1), Some(&4));
    }

    #[test]
    fn test_declump_keeps_multiset() {
        for seed in 0..10 {
            let mut rng = GameRng::from_seed(seed);
            let mut layout: Vec<TileKind> = (0..40).map(|i| (i % 5) as TileKind + 1).collect();
            let mut expected = layout.clone();
            expected.sort_unstable();

            declump(&mut layout, &mut rng);
            layout.sort_unstable();
            assert_eq!(layout, expected);
        }
    }

    #[test]
    fn test_shuffle_preserves_kinds_and_ids() {
        let mut rng = GameRng::from_seed(11);
        let mut board = generate(6, 6, 4, &mut rng).unwrap();
        // Knock out one pair so vacated cells are in play.
        let pair: Vec<Point> = {
            let first = board.live_tiles().next().unwrap();
            board
                .live_tiles()
                .filter(|t| t.kind == first.kind)
                .take(2)
                .map(|t| t.position)
                .collect()
        };
        for p in &pair {
            board.mark_matched(*p);
        }

        let before_kinds = kind_counts(&board);
        let mut before_ids: Vec<u32> = board.live_tiles().map(|t| t.id).collect();
        before_ids.sort_unstable();

        let outcome = shuffle(&mut board, &mut rng, |_| true);
        assert_eq!(outcome.attempts, 1);
        assert!(outcome.solvable);

        assert_eq!(kind_counts(&board), before_kinds);
        let mut after_ids: Vec<u32> = board.live_tiles().map(|t| t.id).collect();
        after_ids.sort_unstable();
        assert_eq!(after_ids, before_ids, "ids are stable across shuffles");
        // Matched tiles are dropped by the scatter.
        assert!(board.cells.iter().flatten().all(|t| !t.matched));
    }

    #[test]
    fn test_shuffle_bumps_generation_stamp() {
        let mut rng = GameRng::from_seed(5);
        let mut board = generate(6, 6, 3, &mut rng).unwrap();
        assert!(board.live_tiles().all(|t| t.generation == 0));

        shuffle(&mut board, &mut rng, |_| true);
        assert_eq!(board.generation, 1);
        assert!(board.live_tiles().all(|t| t.generation == 1));

        shuffle(&mut board, &mut rng, |_| true);
        assert_eq!(board.generation, 2);
    }

    #[test]
    fn test_shuffle_exhaustion_falls_back_unchecked() {
        let mut rng = GameRng::from_seed(9);
        let mut board = generate(6, 6, 4, &mut rng).unwrap();
        let before_kinds = kind_counts(&board);

        let outcome = shuffle(&mut board, &mut rng, |_| false);
        assert_eq!(outcome.attempts, MAX_SHUFFLE_ATTEMPTS);
        assert!(!outcome.solvable);
        // The fallback board is still adopted with the kinds intact.
        assert_eq!(kind_counts(&board), before_kinds);
    }

    #[test]
    fn test_shuffle_on_cleared_board_is_a_no_op() {
        let mut rng = GameRng::from_seed(2);
        let mut board = generate(4, 4, 2, &mut rng).unwrap();
        for p in board.playable_positions() {
            board.mark_matched(p);
        }

        let outcome = shuffle(&mut board, &mut rng, |_| false);
        assert_eq!(outcome.attempts, 0);
        assert!(outcome.solvable);
    }

    #[test]
    fn test_shuffle_uses_vacated_cells() {
        // With every position eligible, repeated scatters of a half-empty
        // board eventually land a tile on a vacated cell.
        let mut rng = GameRng::from_seed(4);
        let mut board = generate(6, 6, 2, &mut rng).unwrap();
        let vacated: Vec<Point> = board
            .playable_positions()
            .into_iter()
            .filter(|p| p.row == 1)
            .collect();
        for p in &vacated {
            board.mark_matched(*p);
        }

        let mut hit_vacated = false;
        for _ in 0..10 {
            shuffle(&mut board, &mut rng, |_| true);
            if vacated.iter().any(|p| board.is_occupied(*p)) {
                hit_vacated = true;
                break;
            }
        }
        assert!(hit_vacated, "scatter never reused a vacated cell");
    }
}
