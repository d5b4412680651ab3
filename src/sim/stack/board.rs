//! Fixed-size playfield grid

use serde::Serialize;

use super::piece::{Piece, PieceColor};

/// One board cell: empty or a settled block's color
pub type Cell = Option<PieceColor>;

/// Grid of `height` rows by `width` columns; row 0 is the top
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    width: usize,
    height: usize,
    rows: Vec<Vec<Cell>>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![None; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Cell at `(col, row)`; out of range reads as empty
    pub fn cell(&self, col: usize, row: usize) -> Cell {
        self.rows.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    pub fn set(&mut self, col: usize, row: usize, cell: Cell) {
        if let Some(slot) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = cell;
        }
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_some_and(|r| r.iter().all(|c| c.is_some()))
    }

    /// Whether `piece` can sit with its origin at `(x, y)`.
    ///
    /// Every filled cell must be inside the column range and above the floor;
    /// cells on the board must be empty. Cells above the top row always pass.
    pub fn is_valid_move(&self, x: i32, y: i32, piece: &Piece) -> bool {
        piece.shape.cells().all(|(dx, dy)| {
            let col = x + dx;
            let row = y + dy;
            if col < 0 || col >= self.width as i32 || row >= self.height as i32 {
                return false;
            }
            row < 0 || self.cell(col as usize, row as usize).is_none()
        })
    }

    /// Write the piece's cells into the grid (rows above the top are dropped)
    pub fn place(&mut self, x: i32, y: i32, piece: &Piece) {
        for (dx, dy) in piece.shape.cells() {
            let col = x + dx;
            let row = y + dy;
            if row >= 0 && col >= 0 {
                self.set(col as usize, row as usize, Some(piece.color));
            }
        }
    }

    /// Remove full rows bottom-up, inserting empty rows at the top.
    /// Returns the number of rows removed.
    pub fn clear_lines(&mut self) -> u32 {
        let mut cleared = 0;
        let mut row = self.height;
        while row > 0 {
            let y = row - 1;
            if self.is_row_full(y) {
                self.rows.remove(y);
                self.rows.insert(0, vec![None; self.width]);
                cleared += 1;
                // Rows above shifted down into `y`; look at it again
            } else {
                row -= 1;
            }
        }
        cleared
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.rows = vec![vec![None; self.width]; self.height];
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|c| c.is_none())
    }

    pub fn filled_count(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_some()).count()
    }
}
