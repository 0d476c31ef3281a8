//! Match scanner: board-wide move detection on top of the path solver.
//!
//! Pairs are enumerated in ascending index order (outer then inner), so the
//! first connectable pair is stable for a given snapshot. That pair is what
//! the hint and auto-match features reveal.

use crate::pathfinder::PathFinder;
use std::collections::BTreeMap;

/// True if any two live tiles with equal values can be linked.
///
/// `tiles` maps board index to pairing value. Empty and single-tile maps
/// have no moves.
pub fn has_available_matches<V: PartialEq>(finder: &PathFinder, tiles: &BTreeMap<usize, V>) -> bool {
    find_matchable_pair(finder, tiles).is_some()
}

/// First connectable pair `(lower, higher)` in index order, or `None`.
pub fn find_matchable_pair<V: PartialEq>(
    finder: &PathFinder,
    tiles: &BTreeMap<usize, V>,
) -> Option<(usize, usize)> {
    let entries: Vec<(usize, &V)> = tiles.iter().map(|(&idx, value)| (idx, value)).collect();

    for (i, &(idx1, value1)) in entries.iter().enumerate() {
        for &(idx2, value2) in &entries[i + 1..] {
            if value1 != value2 {
                continue;
            }
            if finder.find_path(idx1, idx2).found {
                return Some((idx1, idx2));
            }
        }
    }
    None
}
