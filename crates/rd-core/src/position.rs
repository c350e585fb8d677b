//! Grid positions and shape validation

use serde::{Deserialize, Serialize};

/// A single cell on the symbol grid, indexed `[column][row]`.
///
/// Used everywhere a win line, highlight, or scan refers to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Reel (column) index, 0-based
    pub column: u8,
    /// Visible row index, 0 = top
    pub row: u8,
}

impl Position {
    pub fn new(column: u8, row: u8) -> Self {
        Self { column, row }
    }
}

/// Symbol grid, indexed `[column][row]`. Columns = reel count, rows =
/// visible symbols per reel. Produced fresh each spin and never mutated.
pub type Grid = Vec<Vec<String>>;

/// Check that a grid is non-empty and rectangular (every column has the
/// same non-zero row count).
pub fn grid_is_rectangular(grid: &Grid) -> bool {
    let Some(first) = grid.first() else {
        return false;
    };
    let rows = first.len();
    rows > 0 && grid.iter().all(|column| column.len() == rows)
}
