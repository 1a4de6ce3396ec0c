use serde::{Deserialize, Serialize};

/// Side of the board. White moves first and starts on the bottom rows
/// (`y = 5..=7`), Black starts on the top rows (`y = 0..=2`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Sign of this color's pieces in the cell encoding.
    pub fn sign(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row direction a man of this color advances in.
    pub fn forward(self) -> i32 {
        self.sign() as i32
    }

    /// Row on which a man of this color is crowned.
    pub fn crown_row(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Man,
    King,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Piece { kind, color }
    }

    /// Decode a board cell. `0` and out-of-range values are not pieces.
    pub fn from_cell(cell: i8) -> Option<Piece> {
        let (kind, color) = match cell {
            1 => (PieceKind::Man, Color::Black),
            2 => (PieceKind::King, Color::Black),
            -1 => (PieceKind::Man, Color::White),
            -2 => (PieceKind::King, Color::White),
            _ => return None,
        };
        Some(Piece { kind, color })
    }

    /// Encode as a board cell: `±1` for a man, `±2` for a king.
    pub fn cell(self) -> i8 {
        let magnitude = match self.kind {
            PieceKind::Man => 1,
            PieceKind::King => 2,
        };
        magnitude * self.color.sign()
    }

    pub fn crowned(self) -> Piece {
        Piece::new(PieceKind::King, self.color)
    }
}
