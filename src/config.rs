//! Level configuration.
//!
//! Board dimensions include the invisible one-cell border used by the
//! path finder, so the 12x9 boards below play as a 10x7 grid. Difficulty
//! ramps by adding kinds (matches scatter further apart) and cutting the
//! clock; the countdown itself runs in the embedding app, the engine just
//! carries the limit.

use serde::{Deserialize, Serialize};

use crate::board::{playable_cells, GenerateError};
use crate::types::TileKind;

pub const BOARD_ROWS: usize = 12;
pub const BOARD_COLS: usize = 9;
pub const MAX_LEVEL: u32 = 5;

/// Parameters for one level.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    pub level: u32,
    pub rows: usize,
    pub cols: usize,
    pub kinds: TileKind,
    pub time_limit_secs: u32,
}

const LEVELS: [LevelConfig; MAX_LEVEL as usize] = [
    LevelConfig { level: 1, rows: BOARD_ROWS, cols: BOARD_COLS, kinds: 8, time_limit_secs: 90 },
    LevelConfig { level: 2, rows: BOARD_ROWS, cols: BOARD_COLS, kinds: 10, time_limit_secs: 85 },
    LevelConfig { level: 3, rows: BOARD_ROWS, cols: BOARD_COLS, kinds: 12, time_limit_secs: 80 },
    LevelConfig { level: 4, rows: BOARD_ROWS, cols: BOARD_COLS, kinds: 14, time_limit_secs: 75 },
    LevelConfig { level: 5, rows: BOARD_ROWS, cols: BOARD_COLS, kinds: 15, time_limit_secs: 60 },
];

/// Config for `level`, clamping to the table's hardest entry past the end.
pub fn level_config(level: u32) -> LevelConfig {
    let index = level.clamp(1, MAX_LEVEL) as usize - 1;
    LEVELS[index]
}

impl LevelConfig {
    /// Re-state the generator's preconditions so a broken table entry
    /// fails at level start rather than mid-generation.
    pub fn validate(&self) -> Result<(), GenerateError> {
        playable_cells(self.rows, self.cols)?;
        Ok(())
    }
}
