//! Link path solver.
//!
//! Connects two cells with an orthogonal path of at most three straight
//! segments. Tiers are tried cheapest first and the first success wins:
//! - Tier 0: straight line
//! - Tier 1: one corner, `(start.row, end.col)` before `(end.row, start.col)`
//! - Tier 2: two corners, horizontal sweep (ascending columns) before
//!   vertical sweep (ascending rows)
//!
//! Endpoints may be occupied; every other cell on the path must be empty.

use crate::types::{OccupancyGrid, PathResult, Position};

/// Path solver over one occupancy snapshot.
#[derive(Clone, Debug)]
pub struct PathFinder {
    grid: OccupancyGrid,
}

impl PathFinder {
    /// Create a solver for an empty `rows × cols` board.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            grid: OccupancyGrid::new(rows, cols),
        }
    }

    pub fn from_grid(grid: OccupancyGrid) -> Self {
        Self { grid }
    }

    /// Rebuild the snapshot from the live tile indices. Results returned
    /// before the update describe the previous board.
    pub fn update_board<I>(&mut self, occupied: I)
    where
        I: IntoIterator<Item = usize>,
    {
        self.grid.update(occupied);
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// Find a path of at most two bends between two cells.
    ///
    /// Out-of-range indices and `start == end` answer not-found.
    pub fn find_path(&self, start_index: usize, end_index: usize) -> PathResult {
        let (Some(start), Some(end)) = (
            self.grid.position(start_index),
            self.grid.position(end_index),
        ) else {
            return PathResult::not_found();
        };
        if start.index == end.index {
            return PathResult::not_found();
        }

        self.try_direct(start, end)
            .or_else(|| self.try_one_corner(start, end))
            .or_else(|| self.try_two_corners(start, end))
            .map(PathResult::through)
            .unwrap_or_default()
    }

    // ─── Tier 0: straight line ──────────────────────────────────────────────

    fn try_direct(&self, start: Position, end: Position) -> Option<Vec<Position>> {
        if start.row != end.row && start.col != end.col {
            return None;
        }
        self.is_line_clear(start, end).then(|| vec![start, end])
    }

    // ─── Tier 1: one corner ─────────────────────────────────────────────────

    fn try_one_corner(&self, start: Position, end: Position) -> Option<Vec<Position>> {
        // Colinear pairs whose line is blocked cannot be joined by one bend.
        if start.row == end.row || start.col == end.col {
            return None;
        }

        let cols = self.grid.cols();
        [(start.row, end.col), (end.row, start.col)]
            .into_iter()
            .map(|(row, col)| Position::new(row, col, cols))
            .find(|&corner| self.is_corner_valid(start, corner, end))
            .map(|corner| vec![start, corner, end])
    }

    fn is_corner_valid(&self, start: Position, corner: Position, end: Position) -> bool {
        !self.grid.is_occupied(corner.row, corner.col)
            && self.is_line_clear(start, corner)
            && self.is_line_clear(corner, end)
    }

    // ─── Tier 2: two corners ────────────────────────────────────────────────

    fn try_two_corners(&self, start: Position, end: Position) -> Option<Vec<Position>> {
        let cols = self.grid.cols();

        // Horizontal sweep: leave along the start row, cross on column `col`.
        // On a shared row both corners coincide, so the sweep is skipped.
        if start.row != end.row {
            for col in 0..cols {
                if col == start.col || col == end.col {
                    continue;
                }
                let corner1 = Position::new(start.row, col, cols);
                let corner2 = Position::new(end.row, col, cols);
                if self.is_two_corner_valid(start, corner1, corner2, end) {
                    return Some(vec![start, corner1, corner2, end]);
                }
            }
        }

        // Vertical sweep: leave along the start column, cross on row `row`.
        if start.col != end.col {
            for row in 0..self.grid.rows() {
                if row == start.row || row == end.row {
                    continue;
                }
                let corner1 = Position::new(row, start.col, cols);
                let corner2 = Position::new(row, end.col, cols);
                if self.is_two_corner_valid(start, corner1, corner2, end) {
                    return Some(vec![start, corner1, corner2, end]);
                }
            }
        }

        None
    }

    fn is_two_corner_valid(
        &self,
        start: Position,
        corner1: Position,
        corner2: Position,
        end: Position,
    ) -> bool {
        if self.grid.is_occupied(corner1.row, corner1.col)
            || self.grid.is_occupied(corner2.row, corner2.col)
        {
            return false;
        }

        self.is_line_clear(start, corner1)
            && self.is_line_clear(corner1, corner2)
            && self.is_line_clear(corner2, end)
    }

    // ─── Helper: line scan ──────────────────────────────────────────────────

    /// True when every cell strictly between `from` and `to` is empty.
    /// The two run endpoints themselves are not inspected. Runs that are
    /// neither horizontal nor vertical are never clear.
    fn is_line_clear(&self, from: Position, to: Position) -> bool {
        if from.row == to.row {
            let (lo, hi) = min_max(from.col, to.col);
            ((lo + 1)..hi).all(|col| !self.grid.is_occupied(from.row, col))
        } else if from.col == to.col {
            let (lo, hi) = min_max(from.row, to.row);
            ((lo + 1)..hi).all(|row| !self.grid.is_occupied(row, from.col))
        } else {
            false
        }
    }
}

#[inline(always)]
fn min_max(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}
