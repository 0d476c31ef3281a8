//! Core data types for the link-match solver.
//!
//! All grid types use flat `Vec` storage with row-major layout:
//! `cells[row * cols + col]` maps to the JS tile array index.

use serde::{Deserialize, Serialize};

/// Number of distinct pairing ids a dealt board draws from.
pub const DEFAULT_SPECIES: u32 = 150;

/// Largest pairing id that survives the `Int32Array` tile encoding.
pub const MAX_TILE_ID: u32 = i32::MAX as u32;

/// Retry limit for dealing or reshuffling until a move is available.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Pack (row, col) into a linear row-major index.
#[inline(always)]
pub fn cell_index(row: usize, col: usize, cols: usize) -> usize {
    row * cols + col
}

/// A cell on the board. `index` always equals `row * cols + col` for the
/// grid the position was produced by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
    pub index: usize,
}

impl Position {
    #[inline(always)]
    pub fn new(row: usize, col: usize, cols: usize) -> Self {
        Self {
            row,
            col,
            index: cell_index(row, col, cols),
        }
    }
}

/// One straight run of a path, between two consecutive path points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    pub from: Position,
    pub to: Position,
}

impl PathSegment {
    /// True when the run is horizontal or vertical and not a single point.
    pub fn is_axis_aligned(&self) -> bool {
        (self.from.row == self.to.row) != (self.from.col == self.to.col)
    }
}

/// Outcome of a path query. `path` holds 2 to 4 points when found, and
/// `segments` joins consecutive points. Both are empty when not found.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    pub found: bool,
    pub path: Vec<Position>,
    pub segments: Vec<PathSegment>,
}

impl PathResult {
    pub fn not_found() -> Self {
        Self::default()
    }

    /// Build a found result from the ordered corner/endpoint list.
    pub fn through(points: Vec<Position>) -> Self {
        let segments = points
            .windows(2)
            .map(|w| PathSegment { from: w[0], to: w[1] })
            .collect();
        Self {
            found: true,
            path: points,
            segments,
        }
    }

    /// Number of direction changes: 0, 1 or 2 for a found path.
    pub fn bends(&self) -> usize {
        self.path.len().saturating_sub(2)
    }
}

/// Occupancy snapshot: 1 = cell holds a live tile, 0 = empty.
/// Uses `Vec<u8>` (0/1) instead of `Vec<bool>` for simpler WASM interop.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl OccupancyGrid {
    /// Create a fully unoccupied grid. A zero dimension (or one whose area
    /// overflows) yields an empty grid on which every index is invalid.
    pub fn new(rows: usize, cols: usize) -> Self {
        match rows.checked_mul(cols) {
            Some(total) if total > 0 => Self {
                rows,
                cols,
                cells: vec![0; total],
            },
            _ => Self {
                rows: 0,
                cols: 0,
                cells: Vec::new(),
            },
        }
    }

    /// Replace the whole snapshot. Indices outside the grid are ignored.
    pub fn update<I>(&mut self, occupied: I)
    where
        I: IntoIterator<Item = usize>,
    {
        self.cells.fill(0);
        for index in occupied {
            if let Some(cell) = self.cells.get_mut(index) {
                *cell = 1;
            }
        }
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Out-of-bounds coordinates read as unoccupied.
    #[inline(always)]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.in_bounds(row, col) && self.cells[cell_index(row, col, self.cols)] != 0
    }

    #[inline(always)]
    pub fn is_occupied_index(&self, index: usize) -> bool {
        self.cells.get(index).is_some_and(|&c| c != 0)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Resolve a linear index, or `None` if it lies outside the grid.
    pub fn position(&self, index: usize) -> Option<Position> {
        if index >= self.len() {
            return None;
        }
        Some(Position::new(index / self.cols, index % self.cols, self.cols))
    }

    pub fn position_at(&self, row: usize, col: usize) -> Option<Position> {
        self.in_bounds(row, col)
            .then(|| Position::new(row, col, self.cols))
    }

    /// Count occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }
}

/// Board parameters supplied by the game layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
    /// Pairing ids are drawn from `1..=species`.
    pub species: u32,
    pub max_attempts: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: 8,
            cols: 8,
            species: DEFAULT_SPECIES,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}
