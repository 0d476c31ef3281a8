//! WebAssembly path solver for the link-match tile puzzle.
//!
//! Exports high-level functions callable from JavaScript via wasm-bindgen.
//! All board data is passed as flat arrays in row-major layout:
//! `tiles[row * cols + col]`, with a negative value marking an empty cell.

pub mod board;
pub mod pathfinder;
pub mod rng;
pub mod scanner;
pub mod types;

pub use pathfinder::PathFinder;
pub use types::{BoardConfig, OccupancyGrid, PathResult, PathSegment, Position};

// A macro to provide `println!(..)`-style syntax for `console.log` logging.
#[cfg(target_arch = "wasm32")]
macro_rules! console_log {
    ( $( $t:tt )* ) => {
        web_sys::console::log_1(&format!( $( $t )* ).into())
    }
}

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use wasm_bindgen::prelude::*;
    use crate::board::{self, TileBoard};
    use crate::rng::WasmRng;
    use crate::scanner;
    use crate::types::{BoardConfig, PathResult};
    use crate::PathFinder;

    fn set_field(obj: &js_sys::Object, key: &str, value: &JsValue) {
        js_sys::Reflect::set(obj, &key.into(), value).unwrap();
    }

    fn tiles_array(board: &TileBoard) -> Option<js_sys::Int32Array> {
        let flat = board.to_flat()?;
        let arr = js_sys::Int32Array::new_with_length(flat.len() as u32);
        arr.copy_from(&flat);
        Some(arr)
    }

    /// Install the panic hook so Rust panics show up in the browser console.
    #[wasm_bindgen(js_name = "init")]
    pub fn wasm_init() {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();
    }

    /// Find a link path between two cells.
    /// Returns `{ found, path: [{row, col, index}], segments: [{from, to}] }`.
    #[wasm_bindgen(js_name = "findPath")]
    pub fn wasm_find_path(
        rows: usize,
        cols: usize,
        occupied: &[u32],
        start: usize,
        end: usize,
    ) -> JsValue {
        let mut finder = PathFinder::new(rows, cols);
        finder.update_board(occupied.iter().map(|&i| i as usize));
        let result = finder.find_path(start, end);

        serde_wasm_bindgen::to_value(&result).unwrap_or_else(|err| {
            console_log!("findPath: failed to encode result: {}", err);
            serde_wasm_bindgen::to_value(&PathResult::not_found()).unwrap_or(JsValue::NULL)
        })
    }

    /// Check whether any pair of equal live tiles can be linked.
    #[wasm_bindgen(js_name = "hasAvailableMatches")]
    pub fn wasm_has_available_matches(rows: usize, cols: usize, tiles: &[i32]) -> bool {
        TileBoard::from_flat(rows, cols, tiles).is_some_and(|b| b.has_available_matches())
    }

    /// Get a hint pair. Returns `[a, b]` or `null`.
    #[wasm_bindgen(js_name = "findMatchablePair")]
    pub fn wasm_find_matchable_pair(rows: usize, cols: usize, tiles: &[i32]) -> JsValue {
        match TileBoard::from_flat(rows, cols, tiles).and_then(|b| b.find_matchable_pair()) {
            Some((a, b)) => js_sys::Array::of2(&(a as u32).into(), &(b as u32).into()).into(),
            None => JsValue::NULL,
        }
    }

    /// Deal a board that has at least one move.
    /// Takes `{ rows, cols, species, maxAttempts }` (missing fields use defaults).
    /// Returns `{ success, attempts, tiles: Int32Array }` or `null` if the
    /// board size cannot hold pairs.
    #[wasm_bindgen(js_name = "dealBoard")]
    pub fn wasm_deal_board(config: JsValue) -> JsValue {
        let config: BoardConfig = serde_wasm_bindgen::from_value(config).unwrap_or_else(|err| {
            console_log!("dealBoard: invalid config ({}), using defaults", err);
            BoardConfig::default()
        });

        let mut rng = WasmRng::new();
        let Some(result) =
            board::generate_playable_board(&config, &mut rng, scanner::has_available_matches::<u32>)
        else {
            console_log!("dealBoard: cannot deal a {}x{} board", config.rows, config.cols);
            return JsValue::NULL;
        };
        if !result.success {
            console_log!("dealBoard: no playable layout after {} attempts", result.attempts);
        }

        let Some(tiles) = tiles_array(&result.board) else {
            console_log!("dealBoard: tile ids do not fit Int32Array");
            return JsValue::NULL;
        };

        let obj = js_sys::Object::new();
        set_field(&obj, "success", &result.success.into());
        set_field(&obj, "attempts", &result.attempts.into());
        set_field(&obj, "tiles", &tiles.into());
        obj.into()
    }

    /// Reshuffle the live tiles until a move exists.
    /// Returns `{ success, attempts, tiles: Int32Array }` or `null` for a
    /// malformed tile array.
    #[wasm_bindgen(js_name = "shuffleLive")]
    pub fn wasm_shuffle_live(rows: usize, cols: usize, tiles: &[i32], max_attempts: u32) -> JsValue {
        let Some(mut board) = TileBoard::from_flat(rows, cols, tiles) else {
            return JsValue::NULL;
        };

        let mut rng = WasmRng::new();
        let result =
            board.shuffle_until_playable(&mut rng, max_attempts, scanner::has_available_matches::<u32>);
        if !result.success {
            console_log!("shuffleLive: no playable layout after {} attempts", result.attempts);
        }

        let Some(tiles) = tiles_array(&board) else {
            console_log!("shuffleLive: tile ids do not fit Int32Array");
            return JsValue::NULL;
        };

        let obj = js_sys::Object::new();
        set_field(&obj, "success", &result.success.into());
        set_field(&obj, "attempts", &result.attempts.into());
        set_field(&obj, "tiles", &tiles.into());
        obj.into()
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM link solver ready".to_string()
    }
}
