//! Board engine for Dangdangpang, a Shisen-Sho style tile-matching game.
//!
//! The engine owns the algorithmic core of the game: board generation,
//! the two-turn path finder used to validate matches and back hints,
//! deadlock detection, and the shuffle that restores solvability. Timers,
//! scoring, rendering, and persistence live in the embedding app.
//!
//! Everything is synchronous and single-threaded; one board belongs to
//! one session at a time. Compiled to WebAssembly the crate exposes
//! stateless functions that take and return structured values via
//! `serde-wasm-bindgen`.

pub mod board;
pub mod config;
pub mod game;
pub mod path;
pub mod rng;
pub mod solver;
pub mod types;

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use serde::Serialize;
    use wasm_bindgen::prelude::*;

    use crate::rng::GameRng;
    use crate::types::{Board, Point};
    use crate::{board, path, solver};

    fn to_js_err(err: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    fn parse_board(value: JsValue) -> Result<Board, JsValue> {
        serde_wasm_bindgen::from_value(value).map_err(to_js_err)
    }

    fn rng_from(seed: Option<u64>) -> GameRng {
        match seed {
            Some(seed) => GameRng::from_seed(seed),
            None => GameRng::new(),
        }
    }

    /// Generate a fresh level board. Throws on a bad board size.
    #[wasm_bindgen(js_name = "generateBoard")]
    pub fn wasm_generate_board(
        rows: usize,
        cols: usize,
        kinds: u8,
        seed: Option<u64>,
    ) -> Result<JsValue, JsValue> {
        let mut rng = rng_from(seed);
        let board = board::generate(rows, cols, kinds, &mut rng).map_err(to_js_err)?;
        serde_wasm_bindgen::to_value(&board).map_err(to_js_err)
    }

    /// Connecting path between two cells, or `null` when none exists.
    #[wasm_bindgen(js_name = "findPath")]
    pub fn wasm_find_path(
        board: JsValue,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    ) -> Result<JsValue, JsValue> {
        let board = parse_board(board)?;
        let start = Point::new(start_row, start_col);
        let end = Point::new(end_row, end_col);
        match path::find_path(&board, start, end) {
            Some(points) => serde_wasm_bindgen::to_value(&points).map_err(to_js_err),
            None => Ok(JsValue::NULL),
        }
    }

    /// First playable pair with its path, or `null` when deadlocked.
    #[wasm_bindgen(js_name = "findAvailableMatch")]
    pub fn wasm_find_available_match(board: JsValue) -> Result<JsValue, JsValue> {
        let board = parse_board(board)?;
        match solver::find_available_match(&board) {
            Some(hit) => serde_wasm_bindgen::to_value(&hit).map_err(to_js_err),
            None => Ok(JsValue::NULL),
        }
    }

    /// True iff at least one legal match remains.
    #[wasm_bindgen(js_name = "hasPossibleMoves")]
    pub fn wasm_has_possible_moves(board: JsValue) -> Result<bool, JsValue> {
        let board = parse_board(board)?;
        Ok(solver::has_possible_moves(&board))
    }

    /// Shuffle reply: the adopted board plus what the attempt loop did.
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct ShuffleReply {
        board: Board,
        attempts: u32,
        solvable: bool,
    }

    /// Scatter the remaining tiles into a solvable layout if possible.
    #[wasm_bindgen(js_name = "shuffleBoard")]
    pub fn wasm_shuffle_board(board: JsValue, seed: Option<u64>) -> Result<JsValue, JsValue> {
        let mut board = parse_board(board)?;
        let mut rng = rng_from(seed);
        let outcome = board::shuffle(&mut board, &mut rng, solver::has_possible_moves);
        let reply = ShuffleReply {
            board,
            attempts: outcome.attempts,
            solvable: outcome.solvable,
        };
        serde_wasm_bindgen::to_value(&reply).map_err(to_js_err)
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM engine ready".to_string()
    }
}
