//! Bounded-turn pathfinding between two tiles.
//!
//! A match is legal when its tiles can be joined by an orthogonal path
//! that bends at most twice and crosses no live tile. The search is a BFS
//! over `(point, direction, turns)` states; the destination cell is the
//! one cell a path may enter while occupied.

use std::collections::VecDeque;

use crate::types::{Board, Direction, Point};

/// Paths may change direction at most this many times.
pub const MAX_TURNS: u32 = 2;

/// One expanded search state. `parent` indexes into the node arena and
/// is walked backwards to reconstruct the winning path.
struct Node {
    point: Point,
    dir: Option<Direction>,
    turns: u32,
    parent: Option<usize>,
}

/// Find a connecting path from `start` to `end`, both endpoints included.
///
/// Returns `None` when no path exists within the turn budget; that is an
/// ordinary outcome, not an error. `start == end` is a caller contract
/// violation. Expansion order is fixed (up, down, left, right), so the
/// result is deterministic for identical boards.
pub fn find_path(board: &Board, start: Point, end: Point) -> Option<Vec<Point>> {
    debug_assert_ne!(start, end, "caller must pass two distinct tiles");
    if start == end || !board.in_bounds(start) || !board.in_bounds(end) {
        return None;
    }

    // Lowest turn count seen per (cell, entry direction). A state is only
    // re-expanded when it improves on that record, which bounds the search
    // while keeping every distinct approach direction reachable.
    let mut best = vec![[u32::MAX; 4]; board.rows * board.cols];

    let mut nodes = vec![Node {
        point: start,
        dir: None,
        turns: 0,
        parent: None,
    }];
    let mut queue = VecDeque::from([0usize]);

    while let Some(current) = queue.pop_front() {
        let (point, dir, turns) = {
            let n = &nodes[current];
            (n.point, n.dir, n.turns)
        };

        if point == end {
            return Some(reconstruct(&nodes, current));
        }

        for d in Direction::ALL {
            let Some(next) = d.step(point) else { continue };
            if !board.in_bounds(next) {
                continue;
            }

            let turns_here = match dir {
                Some(prev) if prev != d => turns + 1,
                _ => turns,
            };
            if turns_here > MAX_TURNS {
                continue;
            }

            // Only the destination may be entered while occupied.
            if next != end && board.is_occupied(next) {
                continue;
            }

            let record = &mut best[board.index(next)][d as usize];
            if turns_here >= *record {
                continue;
            }
            *record = turns_here;

            nodes.push(Node {
                point: next,
                dir: Some(d),
                turns: turns_here,
                parent: Some(current),
            });
            queue.push_back(nodes.len() - 1);
        }
    }

    None
}

fn reconstruct(nodes: &[Node], mut index: usize) -> Vec<Point> {
    let mut points = Vec::new();
    loop {
        points.push(nodes[index].point);
        match nodes[index].parent {
            Some(parent) => index = parent,
            None => break,
        }
    }
    points.reverse();
    points
}

/// Number of direction changes along a path.
pub fn turn_count(path: &[Point]) -> u32 {
    let mut turns = 0;
    let mut last_delta: Option<(i64, i64)> = None;
    for pair in path.windows(2) {
        let delta = (
            pair[1].row as i64 - pair[0].row as i64,
            pair[1].col as i64 - pair[0].col as i64,
        );
        if let Some(prev) = last_delta {
            if prev != delta {
                turns += 1;
            }
        }
        last_delta = Some(delta);
    }
    turns
}
