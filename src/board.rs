//! Tile board: dealing, matching and reshuffling.
//!
//! The board owns the tile layout; the solver is rebuilt from it on demand,
//! so every query sees the snapshot after the latest removal or shuffle.
//! `generate_playable_board()` and `TileBoard::shuffle_until_playable()` run
//! the whole retry loop in one call to avoid per-attempt boundary crossings.

use crate::pathfinder::PathFinder;
use crate::rng::WasmRng;
use crate::scanner;
use crate::types::{BoardConfig, PathResult, MAX_TILE_ID};
use std::collections::BTreeMap;

/// Row-major tile layout. `None` is an empty cell, `Some(id)` a live tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileBoard {
    pub rows: usize,
    pub cols: usize,
    pub tiles: Vec<Option<u32>>,
}

impl TileBoard {
    /// Wrap a layout, rejecting one whose length is not `rows * cols`.
    pub fn new(rows: usize, cols: usize, tiles: Vec<Option<u32>>) -> Option<Self> {
        (rows.checked_mul(cols)? == tiles.len()).then_some(Self { rows, cols, tiles })
    }

    /// Decode the JS layout: negative values are empty cells.
    pub fn from_flat(rows: usize, cols: usize, cells: &[i32]) -> Option<Self> {
        let tiles = cells
            .iter()
            .map(|&v| u32::try_from(v).ok())
            .collect();
        Self::new(rows, cols, tiles)
    }

    /// Encode for JS, with `-1` for empty cells. Returns `None` if a live
    /// id is above `MAX_TILE_ID` and cannot be represented.
    pub fn to_flat(&self) -> Option<Vec<i32>> {
        self.tiles
            .iter()
            .map(|t| match t {
                Some(id) => i32::try_from(*id).ok(),
                None => Some(-1),
            })
            .collect()
    }

    pub fn occupied_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter_map(|(idx, t)| t.map(|_| idx))
    }

    /// Live tiles keyed by index, in ascending index order.
    pub fn tile_values(&self) -> BTreeMap<usize, u32> {
        self.tiles
            .iter()
            .enumerate()
            .filter_map(|(idx, t)| t.map(|id| (idx, id)))
            .collect()
    }

    pub fn live_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_some()).count()
    }

    pub fn is_cleared(&self) -> bool {
        self.tiles.iter().all(Option::is_none)
    }

    /// Solver over the current live tiles.
    pub fn path_finder(&self) -> PathFinder {
        let mut finder = PathFinder::new(self.rows, self.cols);
        finder.update_board(self.occupied_indices());
        finder
    }

    pub fn has_available_matches(&self) -> bool {
        scanner::has_available_matches(&self.path_finder(), &self.tile_values())
    }

    /// Hint pair: the first connectable pair in index order.
    pub fn find_matchable_pair(&self) -> Option<(usize, usize)> {
        scanner::find_matchable_pair(&self.path_finder(), &self.tile_values())
    }

    /// Attempt to link tiles `a` and `b`. On success both cells are emptied
    /// and the path is returned for drawing. Stale or illegal requests leave
    /// the board untouched and return not-found.
    pub fn try_match(&mut self, a: usize, b: usize) -> PathResult {
        if a == b {
            return PathResult::not_found();
        }
        let (Some(Some(first)), Some(Some(second))) =
            (self.tiles.get(a).copied(), self.tiles.get(b).copied())
        else {
            return PathResult::not_found();
        };
        if first != second {
            return PathResult::not_found();
        }

        let result = self.path_finder().find_path(a, b);
        if result.found {
            self.tiles[a] = None;
            self.tiles[b] = None;
        }
        result
    }

    /// Remove the hint pair, if any.
    pub fn auto_match(&mut self) -> Option<(usize, usize)> {
        let (a, b) = self.find_matchable_pair()?;
        self.tiles[a] = None;
        self.tiles[b] = None;
        Some((a, b))
    }

    /// Permute the live tiles among the live cells. Empty cells stay empty.
    pub fn shuffle_live(&mut self, rng: &mut WasmRng) {
        let live: Vec<usize> = self.occupied_indices().collect();
        let mut ids: Vec<Option<u32>> = live.iter().map(|&idx| self.tiles[idx]).collect();
        rng.shuffle(&mut ids);
        for (idx, id) in live.into_iter().zip(ids) {
            self.tiles[idx] = id;
        }
    }

    /// Reshuffle until `is_playable` accepts the layout or `max_attempts`
    /// shuffles have been made. The board keeps the last shuffle either way.
    pub fn shuffle_until_playable<F>(
        &mut self,
        rng: &mut WasmRng,
        max_attempts: u32,
        is_playable: F,
    ) -> ShuffleResult
    where
        F: Fn(&PathFinder, &BTreeMap<usize, u32>) -> bool,
    {
        let max_attempts = max_attempts.max(1);
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            self.shuffle_live(rng);

            if is_playable(&self.path_finder(), &self.tile_values()) {
                return ShuffleResult {
                    attempts,
                    success: true,
                };
            }

            if attempts >= max_attempts {
                return ShuffleResult {
                    attempts,
                    success: false,
                };
            }
        }
    }
}

/// Outcome of a reshuffle loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShuffleResult {
    pub attempts: u32,
    /// True if the final layout was accepted within max_attempts.
    pub success: bool,
}

/// Deal a full board of `rows * cols / 2` pairs.
///
/// Pairing ids are a uniform sample of `1..=species`; when the board needs
/// more pairs than there are species, ids repeat in sample order. `species`
/// is capped at `MAX_TILE_ID`. Returns `None` for an empty or odd-sized
/// board, or zero species.
pub fn deal_board(config: &BoardConfig, rng: &mut WasmRng) -> Option<TileBoard> {
    let total = config.rows.checked_mul(config.cols)?;
    if total == 0 || total % 2 != 0 || config.species == 0 {
        return None;
    }
    let pairs = total / 2;

    let species = usize::try_from(config.species.min(MAX_TILE_ID)).ok()?;
    let ids: Vec<u32> = rng
        .sample_indices(species, pairs)
        .into_iter()
        .map(|i| i as u32 + 1)
        .collect();

    let mut tiles: Vec<Option<u32>> = ids
        .iter()
        .cycle()
        .take(pairs)
        .flat_map(|&id| [Some(id), Some(id)])
        .collect();
    rng.shuffle(&mut tiles);

    TileBoard::new(config.rows, config.cols, tiles)
}

/// Result of a board generation attempt.
#[derive(Clone, Debug)]
pub struct BoardResult {
    pub board: TileBoard,
    /// How many layouts were dealt before one was accepted.
    pub attempts: u32,
    /// True if a playable board was found within max_attempts.
    pub success: bool,
}

/// Deal boards until `is_playable` accepts one.
///
/// The predicate is injected so callers can swap the acceptance rule; the
/// usual choice is `scanner::has_available_matches`. Returns `None` only if
/// the config cannot be dealt at all. When every attempt is rejected the
/// last dealt board is returned with `success: false`.
pub fn generate_playable_board<F>(
    config: &BoardConfig,
    rng: &mut WasmRng,
    is_playable: F,
) -> Option<BoardResult>
where
    F: Fn(&PathFinder, &BTreeMap<usize, u32>) -> bool,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;

        let board = deal_board(config, rng)?;
        if is_playable(&board.path_finder(), &board.tile_values()) {
            return Some(BoardResult {
                board,
                attempts,
                success: true,
            });
        }

        if attempts >= max_attempts {
            return Some(BoardResult {
                board,
                attempts,
                success: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(rows: usize, cols: usize, species: u32) -> BoardConfig {
        BoardConfig {
            rows,
            cols,
            species,
            ..BoardConfig::default()
        }
    }

    fn id_counts(board: &TileBoard) -> BTreeMap<u32, usize> {
        let mut counts = BTreeMap::new();
        for id in board.tiles.iter().flatten() {
            *counts.entry(*id).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_deal_board_pairs() {
        let mut rng = WasmRng::from_seed(42);
        let board = deal_board(&config(6, 8, 150), &mut rng).unwrap();
        assert_eq!(board.tiles.len(), 48);
        assert_eq!(board.live_count(), 48);

        let counts = id_counts(&board);
        assert_eq!(counts.len(), 24);
        assert!(counts.values().all(|&c| c == 2));
        assert!(counts.keys().all(|&id| (1..=150).contains(&id)));
    }

    #[test]
    fn test_deal_board_few_species_repeat() {
        let mut rng = WasmRng::from_seed(1);
        let board = deal_board(&config(4, 4, 3), &mut rng).unwrap();
        let counts = id_counts(&board);
        assert_eq!(counts.len(), 3);
        assert!(counts.values().all(|&c| c % 2 == 0));
        assert_eq!(counts.values().sum::<usize>(), 16);
    }

    #[test]
    fn test_deal_board_huge_species_survives_encoding() {
        let mut rng = WasmRng::from_seed(13);
        let board = deal_board(&config(4, 4, u32::MAX), &mut rng).unwrap();
        assert!(board.tiles.iter().flatten().all(|&id| id <= MAX_TILE_ID));

        let flat = board.to_flat().unwrap();
        let decoded = TileBoard::from_flat(4, 4, &flat).unwrap();
        assert_eq!(decoded.live_count(), 16);
        assert_eq!(decoded, board);
    }

    #[test]
    fn test_deal_board_rejects_bad_config() {
        let mut rng = WasmRng::from_seed(1);
        assert!(deal_board(&config(3, 3, 150), &mut rng).is_none());
        assert!(deal_board(&config(0, 4, 150), &mut rng).is_none());
        assert!(deal_board(&config(2, 2, 0), &mut rng).is_none());
    }

    #[test]
    fn test_deal_board_seeded_deterministic() {
        let a = deal_board(&config(4, 6, 150), &mut WasmRng::from_seed(77));
        let b = deal_board(&config(4, 6, 150), &mut WasmRng::from_seed(77));
        assert_eq!(a, b);
    }

    #[test]
    fn test_flat_roundtrip_marks_empty() {
        let board = TileBoard::from_flat(2, 2, &[3, -1, 3, -5]).unwrap();
        assert_eq!(board.tiles, vec![Some(3), None, Some(3), None]);
        assert_eq!(board.to_flat(), Some(vec![3, -1, 3, -1]));

        let wide = TileBoard::new(1, 2, vec![Some(u32::MAX), Some(u32::MAX)]).unwrap();
        assert_eq!(wide.to_flat(), None);
        assert!(TileBoard::from_flat(2, 2, &[1, 1, 1]).is_none());
    }

    #[test]
    fn test_try_match_removes_linked_pair() {
        let mut board = TileBoard::new(1, 4, vec![Some(1), Some(1), Some(2), Some(2)]).unwrap();
        let result = board.try_match(0, 1);
        assert!(result.found);
        assert_eq!(result.bends(), 0);
        assert_eq!(board.tiles[..2], [None, None]);

        assert!(board.try_match(3, 2).found);
        assert!(board.is_cleared());
    }

    #[test]
    fn test_try_match_rejects_illegal_requests() {
        let layout = vec![Some(1), Some(2), Some(1), None];
        let mut board = TileBoard::new(1, 4, layout.clone()).unwrap();

        assert!(!board.try_match(0, 1).found); // different ids
        assert!(!board.try_match(0, 0).found); // same cell
        assert!(!board.try_match(0, 3).found); // empty cell
        assert!(!board.try_match(0, 9).found); // out of range
        assert!(!board.try_match(0, 2).found); // blocked by tile 1
        assert_eq!(board.tiles, layout);
    }

    #[test]
    fn test_auto_match_follows_hint_order() {
        let mut board = TileBoard::new(2, 2, vec![Some(1), Some(1), Some(2), Some(2)]).unwrap();
        assert_eq!(board.find_matchable_pair(), Some((0, 1)));
        assert_eq!(board.auto_match(), Some((0, 1)));
        assert_eq!(board.auto_match(), Some((2, 3)));
        assert!(board.is_cleared());
        assert_eq!(board.auto_match(), None);
    }

    #[test]
    fn test_deadlocked_board_has_no_moves() {
        // Diagonal pairs on a packed 2x2 board cannot be linked.
        let board = TileBoard::new(2, 2, vec![Some(1), Some(2), Some(2), Some(1)]).unwrap();
        assert!(!board.has_available_matches());
        assert_eq!(board.find_matchable_pair(), None);
    }

    #[test]
    fn test_shuffle_live_keeps_empty_cells() {
        let mut rng = WasmRng::from_seed(3);
        let mut board = deal_board(&config(4, 4, 150), &mut rng).unwrap();
        board.tiles[0] = None;
        board.tiles[5] = None;
        let before = id_counts(&board);

        board.shuffle_live(&mut rng);
        assert_eq!(board.tiles[0], None);
        assert_eq!(board.tiles[5], None);
        assert_eq!(board.live_count(), 14);
        assert_eq!(id_counts(&board), before);
    }

    #[test]
    fn test_shuffle_until_playable_always() {
        let mut rng = WasmRng::from_seed(4);
        let mut board = deal_board(&config(4, 4, 150), &mut rng).unwrap();
        let result = board.shuffle_until_playable(&mut rng, 10, |_, _| true);
        assert_eq!(result, ShuffleResult { attempts: 1, success: true });
    }

    #[test]
    fn test_shuffle_until_playable_never() {
        let mut rng = WasmRng::from_seed(4);
        let mut board = deal_board(&config(4, 4, 150), &mut rng).unwrap();
        let result = board.shuffle_until_playable(&mut rng, 10, |_, _| false);
        assert_eq!(result, ShuffleResult { attempts: 10, success: false });
        assert_eq!(board.live_count(), 16);
    }

    #[test]
    fn test_shuffle_until_playable_unlocks_deadlock() {
        // Packed 2x4 board with no equal neighbours. With every cell full
        // only adjacent tiles can link, so some shuffle must pair them up.
        let mut rng = WasmRng::from_seed(11);
        let mut board = TileBoard::new(
            2,
            4,
            vec![Some(1), Some(2), Some(3), Some(4), Some(2), Some(1), Some(4), Some(3)],
        )
        .unwrap();
        assert!(!board.has_available_matches());

        let result = board.shuffle_until_playable(&mut rng, 50, scanner::has_available_matches::<u32>);
        assert!(result.success);
        assert!(board.has_available_matches());
    }

    #[test]
    fn test_generate_playable_board_always() {
        let mut rng = WasmRng::from_seed(5);
        let result = generate_playable_board(&config(4, 4, 150), &mut rng, |_, _| true).unwrap();
        assert!(result.success);
        assert_eq!(result.attempts, 1);
        assert_eq!(result.board.live_count(), 16);
    }

    #[test]
    fn test_generate_playable_board_never() {
        let mut rng = WasmRng::from_seed(5);
        let cfg = BoardConfig {
            max_attempts: 7,
            ..config(4, 4, 150)
        };
        let result = generate_playable_board(&cfg, &mut rng, |_, _| false).unwrap();
        assert!(!result.success);
        assert_eq!(result.attempts, 7);
    }

    #[test]
    fn test_generate_playable_board_with_scanner() {
        let mut rng = WasmRng::from_seed(6);
        let result =
            generate_playable_board(&config(6, 6, 150), &mut rng, scanner::has_available_matches::<u32>)
                .unwrap();
        assert!(result.success);
        assert!(result.board.has_available_matches());
        assert!(generate_playable_board(&config(3, 3, 150), &mut rng, |_, _| true).is_none());
    }

    #[test]
    fn test_play_out_with_auto_match() {
        let mut rng = WasmRng::from_seed(8);
        let mut board = deal_board(&config(4, 6, 150), &mut rng).unwrap();

        for _ in 0..200 {
            if board.is_cleared() {
                break;
            }
            let live = board.live_count();
            match board.auto_match() {
                Some((a, b)) => {
                    assert!(a < b);
                    assert_eq!(board.live_count(), live - 2);
                }
                None => {
                    let result =
                        board.shuffle_until_playable(&mut rng, 100, scanner::has_available_matches::<u32>);
                    assert_eq!(board.live_count(), live);
                    if !result.success {
                        break;
                    }
                }
            }
        }
        assert_eq!(board.live_count() % 2, 0);
    }
}
