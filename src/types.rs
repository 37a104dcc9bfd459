//! Core data types for the board engine.
//!
//! The board is a flat `Vec<Option<Tile>>` in row-major layout:
//! `cells[row * cols + col]`. The outer one-cell border is always empty;
//! tiles live only in the `(rows-2) x (cols-2)` playable sub-grid.

use serde::{Deserialize, Serialize};

/// Matchable tile kind, `1..=kinds`. The visual face is the front end's
/// concern; the engine only compares kinds for equality.
pub type TileKind = u8;

/// A grid coordinate.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// The four axis-aligned travel directions, in the engine's fixed
/// visitation order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Step one cell from `point`, or `None` if the step would leave the
    /// non-negative coordinate space. Upper bounds are the board's to check.
    #[inline(always)]
    pub fn step(self, point: Point) -> Option<Point> {
        match self {
            Direction::Up => point.row.checked_sub(1).map(|row| Point::new(row, point.col)),
            Direction::Down => Some(Point::new(point.row + 1, point.col)),
            Direction::Left => point.col.checked_sub(1).map(|col| Point::new(point.row, col)),
            Direction::Right => Some(Point::new(point.row, point.col + 1)),
        }
    }
}

/// One playable piece.
///
/// `id` is a stable logical identity assigned at generation time and never
/// reissued; `generation` is a version stamp that changes when a shuffle
/// relocates the tile, so embedders can key animations off it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: TileKind,
    pub position: Point,
    pub matched: bool,
    pub generation: u32,
}

/// The full grid, border included.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub rows: usize,
    pub cols: usize,
    /// Bumped by each shuffle; tiles placed by that shuffle carry the stamp.
    pub generation: u32,
    pub cells: Vec<Option<Tile>>,
}

impl Board {
    /// Create an empty board of the given dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            generation: 0,
            cells: vec![None; rows * cols],
        }
    }

    #[inline(always)]
    pub fn index(&self, point: Point) -> usize {
        point.row * self.cols + point.col
    }

    #[inline(always)]
    pub fn in_bounds(&self, point: Point) -> bool {
        point.row < self.rows && point.col < self.cols
    }

    /// Copy of the tile at `point`, matched or not.
    #[inline(always)]
    pub fn get(&self, point: Point) -> Option<Tile> {
        if !self.in_bounds(point) {
            return None;
        }
        self.cells[self.index(point)]
    }

    /// Store `tile` at `point`, replacing whatever was there.
    pub fn set(&mut self, point: Point, tile: Option<Tile>) {
        debug_assert!(self.in_bounds(point));
        if let Some(t) = &tile {
            debug_assert_eq!(t.position, point, "tile position must match its cell");
        }
        let idx = self.index(point);
        self.cells[idx] = tile;
    }

    /// True iff the cell holds a non-matched tile.
    #[inline(always)]
    pub fn is_occupied(&self, point: Point) -> bool {
        matches!(self.get(point), Some(tile) if !tile.matched)
    }

    /// True iff a path may pass through the cell: in bounds and either
    /// empty or holding an already-matched tile.
    #[inline(always)]
    pub fn is_open(&self, point: Point) -> bool {
        self.in_bounds(point) && !self.is_occupied(point)
    }

    /// Flag the tile at `point` as matched. No-op on empty cells.
    pub fn mark_matched(&mut self, point: Point) {
        let idx = self.index(point);
        if let Some(tile) = self.cells[idx].as_mut() {
            tile.matched = true;
        }
    }

    /// All non-matched tiles, row-major.
    pub fn live_tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.cells.iter().flatten().filter(|t| !t.matched).copied()
    }

    pub fn live_count(&self) -> usize {
        self.live_tiles().count()
    }

    /// Every cell inside the border, row-major, occupied or not.
    pub fn playable_positions(&self) -> Vec<Point> {
        let mut positions = Vec::with_capacity((self.rows - 2) * (self.cols - 2));
        for row in 1..self.rows - 1 {
            for col in 1..self.cols - 1 {
                positions.push(Point::new(row, col));
            }
        }
        positions
    }
}
