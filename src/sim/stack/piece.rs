//! Tetromino shapes, colors and rotation

use serde::{Deserialize, Serialize};

/// Cell color tag; each kind has a fixed color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceColor {
    Cyan,
    Blue,
    Orange,
    Yellow,
    Green,
    Purple,
    Red,
}

/// The seven fixed tetrominoes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    T,
    L,
    J,
    O,
    S,
    Z,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::T => "T",
            PieceKind::L => "L",
            PieceKind::J => "J",
            PieceKind::O => "O",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
        }
    }

    pub fn color(&self) -> PieceColor {
        match self {
            PieceKind::I => PieceColor::Cyan,
            PieceKind::T => PieceColor::Blue,
            PieceKind::L => PieceColor::Orange,
            PieceKind::J => PieceColor::Yellow,
            PieceKind::O => PieceColor::Green,
            PieceKind::S => PieceColor::Purple,
            PieceKind::Z => PieceColor::Red,
        }
    }

    /// Spawn orientation
    pub fn shape(&self) -> Shape {
        const I: &[&[u8]] = &[&[1, 1, 1, 1]];
        const T: &[&[u8]] = &[&[1, 1, 1], &[0, 1, 0]];
        const L: &[&[u8]] = &[&[1, 1, 1], &[1, 0, 0]];
        const J: &[&[u8]] = &[&[1, 1, 1], &[0, 0, 1]];
        const O: &[&[u8]] = &[&[1, 1], &[1, 1]];
        const S: &[&[u8]] = &[&[1, 1, 0], &[0, 1, 1]];
        const Z: &[&[u8]] = &[&[0, 1, 1], &[1, 1, 0]];

        Shape::from_rows(match self {
            PieceKind::I => I,
            PieceKind::T => T,
            PieceKind::L => L,
            PieceKind::J => J,
            PieceKind::O => O,
            PieceKind::S => S,
            PieceKind::Z => Z,
        })
    }
}

/// Rectangular boolean matrix, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shape {
    rows: Vec<Vec<bool>>,
}

impl Shape {
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|r| r.iter().map(|&c| c != 0).collect())
                .collect(),
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |r| r.len())
    }

    pub fn is_filled(&self, col: usize, row: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Offsets `(col, row)` of every filled cell
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &filled)| filled)
                .map(move |(x, _)| (x as i32, y as i32))
        })
    }

    /// Quarter turn: row `i` of the result is column `width - 1 - i` of self
    pub fn rotated(&self) -> Shape {
        let w = self.width();
        let rows = (0..w)
            .map(|i| self.rows.iter().map(|row| row[w - 1 - i]).collect())
            .collect();
        Shape { rows }
    }
}

/// An immutable piece: shape plus color
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: PieceColor,
    pub shape: Shape,
}

impl Piece {
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            color: kind.color(),
            shape: kind.shape(),
        }
    }

    /// Rotated copy; `self` is untouched
    pub fn rotated(&self) -> Piece {
        Piece {
            kind: self.kind,
            color: self.color,
            shape: self.shape.rotated(),
        }
    }
}
