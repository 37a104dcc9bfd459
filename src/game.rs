//! Per-level game session.
//!
//! Wires generation, match validation, deadlock checks, and shuffles into
//! the state machine the UI drives: `Playing` until either the last pair
//! is cleared (`Complete`) or the external timer fires (`Expired`). A
//! deadlock after a successful match triggers a transient shuffle and the
//! session stays in `Playing`.

use log::debug;
use serde::Serialize;

use crate::board::{self, GenerateError, ShuffleOutcome};
use crate::config::LevelConfig;
use crate::path::find_path;
use crate::rng::GameRng;
use crate::solver::{self, AvailableMatch};
use crate::types::{Board, Point, Tile};

/// Where a level currently stands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Playing,
    Complete,
    Expired,
}

/// Why a two-tile selection did not produce a match. Ordinary feedback
/// for the UI, not an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatchRejection {
    NotPlaying,
    EmptyCell(Point),
    SameTile,
    KindMismatch,
    NoPath,
}

/// A successful removal: the pair as it stood before the match, the
/// connecting path for the UI to draw, and whether a deadlock shuffle
/// had to run afterwards.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub a: Tile,
    pub b: Tile,
    pub path: Vec<Point>,
    pub remaining: usize,
    pub shuffle: Option<ShuffleOutcome>,
}

/// One level's board, rng, and phase.
pub struct Game {
    config: LevelConfig,
    board: Board,
    rng: GameRng,
    phase: Phase,
}

impl Game {
    /// Start a level. A bad board size is a fatal configuration error
    /// that aborts the start; it is not retried.
    pub fn new(config: LevelConfig, seed: Option<u64>) -> Result<Self, GenerateError> {
        let mut rng = match seed {
            Some(seed) => GameRng::from_seed(seed),
            None => GameRng::new(),
        };
        let board = board::generate(config.rows, config.cols, config.kinds, &mut rng)?;
        debug!("level {} started", config.level);
        Ok(Self {
            config,
            board,
            rng,
            phase: Phase::Playing,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining(&self) -> usize {
        self.board.live_count()
    }

    /// Attempt to match the tiles at `a` and `b`.
    ///
    /// On success both tiles are marked matched; clearing the last pair
    /// completes the level, and a post-match deadlock runs the shuffle
    /// engine before returning.
    pub fn try_match(&mut self, a: Point, b: Point) -> Result<MatchResult, MatchRejection> {
        if self.phase != Phase::Playing {
            return Err(MatchRejection::NotPlaying);
        }
        let tile_a = self
            .board
            .get(a)
            .filter(|t| !t.matched)
            .ok_or(MatchRejection::EmptyCell(a))?;
        let tile_b = self
            .board
            .get(b)
            .filter(|t| !t.matched)
            .ok_or(MatchRejection::EmptyCell(b))?;
        if tile_a.id == tile_b.id {
            return Err(MatchRejection::SameTile);
        }
        if tile_a.kind != tile_b.kind {
            return Err(MatchRejection::KindMismatch);
        }
        let path = find_path(&self.board, a, b).ok_or(MatchRejection::NoPath)?;

        self.board.mark_matched(a);
        self.board.mark_matched(b);

        let remaining = self.board.live_count();
        let shuffle = if remaining == 0 {
            debug!("level {} cleared", self.config.level);
            self.phase = Phase::Complete;
            None
        } else if !solver::has_possible_moves(&self.board) {
            debug!("deadlock with {remaining} tiles left, shuffling");
            Some(board::shuffle(
                &mut self.board,
                &mut self.rng,
                solver::has_possible_moves,
            ))
        } else {
            None
        };

        Ok(MatchResult {
            a: tile_a,
            b: tile_b,
            path,
            remaining,
            shuffle,
        })
    }

    /// A playable pair with its path, for the hint feature. Reward
    /// gating happens in the embedding app.
    pub fn hint(&self) -> Option<AvailableMatch> {
        if self.phase != Phase::Playing {
            return None;
        }
        solver::find_available_match(&self.board)
    }

    /// Player-triggered shuffle (the product gates it behind an ad).
    pub fn reshuffle(&mut self) -> Option<ShuffleOutcome> {
        if self.phase != Phase::Playing {
            return None;
        }
        Some(board::shuffle(
            &mut self.board,
            &mut self.rng,
            solver::has_possible_moves,
        ))
    }

    /// External timer signal: the level is over, the board stays as-is.
    pub fn expire(&mut self) {
        if self.phase == Phase::Playing {
            debug!("level {} expired", self.config.level);
            self.phase = Phase::Expired;
        }
    }
}
