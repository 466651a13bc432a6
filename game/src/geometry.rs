use serde::{Deserialize, Serialize};

/// One grid position. Column grows rightward, row grows downward; row 0 is
/// the top of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

/// A tetromino: exactly four cells.
///
/// Pieces are value types; `translate` and `rotate` return candidates and
/// never validate — placement validity is the board's concern, checked by the
/// caller before committing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    cells: [Cell; 4],
}

impl Piece {
    pub const fn new(cells: [Cell; 4]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell; 4] {
        &self.cells
    }

    pub fn translate(&self, d_col: i32, d_row: i32) -> Piece {
        Piece {
            cells: self
                .cells
                .map(|c| Cell::new(c.col + d_col, c.row + d_row)),
        }
    }

    /// Arithmetic mean of the cell coordinates, each axis rounded to the
    /// nearest integer with halves away from zero (`f64::round`). For the
    /// non-negative coordinates that occur in play this is round-half-up.
    ///
    /// Only ever used as a rotation pivot, never for placement.
    pub fn center_of_mass(&self) -> Cell {
        let sum_col: i32 = self.cells.iter().map(|c| c.col).sum();
        let sum_row: i32 = self.cells.iter().map(|c| c.row).sum();
        let n = self.cells.len() as f64;
        Cell::new(
            (sum_col as f64 / n).round() as i32,
            (sum_row as f64 / n).round() as i32,
        )
    }

    /// Rotates 90 degrees clockwise (in row-down coordinates) about the
    /// piece's own center of mass.
    pub fn rotate(&self) -> Piece {
        let pivot = self.center_of_mass();
        Piece {
            cells: self.cells.map(|c| {
                Cell::new(
                    pivot.col + (c.row - pivot.row),
                    pivot.row - (c.col - pivot.col),
                )
            }),
        }
    }

    /// Cell set shifted so the minimum column and row are zero. Rotation's
    /// rounded pivot can translate the whole piece; comparing normalized
    /// sets compares shape only.
    pub fn normalized_cells(&self) -> [Cell; 4] {
        let min_col = self.cells.iter().map(|c| c.col).min().unwrap_or(0);
        let min_row = self.cells.iter().map(|c| c.row).min().unwrap_or(0);
        let mut cells = self.cells.map(|c| Cell::new(c.col - min_col, c.row - min_row));
        cells.sort_unstable();
        cells
    }
}
