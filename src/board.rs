//! Board value type and win/draw evaluation.
//!
//! The board is pure data: no identifiers are validated here, no state
//! machine lives here, and nothing can fail. Cells hold the id of the
//! occupying player so evaluation works directly against match participants.

use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::players::PlayerId;

/// Side length of the board.
pub const BOARD_SIZE: usize = 3;

/// A cell coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Coord {
    /// Row index (0-2).
    pub row: usize,
    /// Column index (0-2).
    pub col: usize,
}

/// The kind of line a win was scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// A horizontal line.
    Row,
    /// A vertical line.
    Column,
    /// One of the two diagonals.
    Diagonal,
}

/// A fully-owned winning line.
///
/// Rows and columns are indexed 0-2; diagonals use 0 for the main diagonal
/// and 1 for the anti-diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLine {
    /// Whether the line is a row, column, or diagonal.
    pub kind: LineKind,
    /// Index of the line within its kind.
    pub index: usize,
}

/// 3x3 grid of cells, each empty or holding the occupying player's id.
///
/// Invariant (enforced by [`crate::Game`]): a non-empty cell never reverts
/// to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<PlayerId>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id occupying the cell, or `None` if the cell is empty
    /// or the coordinates are out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&PlayerId> {
        self.cells.get(row)?.get(col)?.as_ref()
    }

    /// Marks a cell with the given player id. Callers check occupancy and
    /// bounds first; this never un-marks a cell.
    pub(crate) fn place(&mut self, row: usize, col: usize, player_id: PlayerId) {
        self.cells[row][col] = Some(player_id);
    }

    /// Returns true if no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| cell.is_some())
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Coordinates of all empty cells, in row-major order.
    pub fn open_cells(&self) -> Vec<Coord> {
        let mut open = Vec::new();
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if cell.is_none() {
                    open.push(Coord::new(row, col));
                }
            }
        }
        open
    }

    /// Checks whether `player_id` owns all three cells of any line.
    ///
    /// Rows are checked first, then columns, then the two diagonals,
    /// short-circuiting at the first match, so if a single move ever
    /// completed two lines at once, the row or column is the one reported.
    pub fn winning_line(&self, player_id: &str) -> Option<WinLine> {
        let owns = |row: usize, col: usize| self.cells[row][col].as_deref() == Some(player_id);

        for row in 0..BOARD_SIZE {
            if owns(row, 0) && owns(row, 1) && owns(row, 2) {
                return Some(WinLine {
                    kind: LineKind::Row,
                    index: row,
                });
            }
        }
        for col in 0..BOARD_SIZE {
            if owns(0, col) && owns(1, col) && owns(2, col) {
                return Some(WinLine {
                    kind: LineKind::Column,
                    index: col,
                });
            }
        }
        if owns(0, 0) && owns(1, 1) && owns(2, 2) {
            return Some(WinLine {
                kind: LineKind::Diagonal,
                index: 0,
            });
        }
        if owns(0, 2) && owns(1, 1) && owns(2, 0) {
            return Some(WinLine {
                kind: LineKind::Diagonal,
                index: 1,
            });
        }
        None
    }
}
