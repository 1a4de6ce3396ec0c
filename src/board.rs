use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coord::{coord_to_tile, tile_to_coord};
use crate::error::GameError;
use crate::piece::{Color, Piece, PieceKind};

/// The 8×8 grid as columns of rows: `cells[x][y]`, `y = 0` being the top edge.
///
/// Cells use the signed encoding shared with the vision layer: `0` empty,
/// `1`/`2` Black man/king, `-1`/`-2` White man/king.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    pub cells: [[i8; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<[[i8; 8]; 8]> for Board {
    type Error = GameError;

    /// Accept a raw matrix (e.g. a camera snapshot) after checking every cell
    /// holds a valid piece code.
    fn try_from(cells: [[i8; 8]; 8]) -> Result<Self, Self::Error> {
        for (x, column) in cells.iter().enumerate() {
            for (y, &value) in column.iter().enumerate() {
                if !(-2..=2).contains(&value) {
                    return Err(GameError::InvalidCell { x, y, value });
                }
            }
        }
        Ok(Board { cells })
    }
}

impl Board {
    /// Create an empty board with no pieces. Useful for setting up test positions.
    pub fn empty() -> Self {
        Board { cells: [[0; 8]; 8] }
    }

    /// Standard starting layout: twelve Black men on the top three rows,
    /// twelve White men on the bottom three.
    pub fn new() -> Self {
        let mut board = Board::empty();
        for x in 0..8 {
            for y in 0..8 {
                if coord_to_tile(x, y).is_none() {
                    continue;
                }
                if y < 3 {
                    board.cells[x][y] = Color::Black.sign();
                } else if y > 4 {
                    board.cells[x][y] = Color::White.sign();
                }
            }
        }
        board
    }

    pub fn get(&self, x: usize, y: usize) -> i8 {
        self.cells[x][y]
    }

    pub fn set(&mut self, x: usize, y: usize, cell: i8) {
        self.cells[x][y] = cell;
    }

    pub fn at(&self, tile: u8) -> i8 {
        let (x, y) = tile_to_coord(tile, None);
        self.cells[x][y]
    }

    pub fn set_at(&mut self, tile: u8, cell: i8) {
        let (x, y) = tile_to_coord(tile, None);
        self.cells[x][y] = cell;
    }

    pub fn piece_at(&self, tile: u8) -> Option<Piece> {
        Piece::from_cell(self.at(tile))
    }

    /// Builder-style placement for test and setup code.
    pub fn with(mut self, tile: u8, piece: Piece) -> Self {
        self.set_at(tile, piece.cell());
        self
    }

    /// Every piece on the board with its tile, in tile order.
    pub fn pieces(&self) -> impl Iterator<Item = (u8, Piece)> + '_ {
        (1..=32u8).filter_map(move |tile| self.piece_at(tile).map(|p| (tile, p)))
    }

    pub fn count(&self, color: Color) -> usize {
        self.pieces().filter(|(_, p)| p.color == color).count()
    }

    /// The same position with kings shown as men. The camera cannot tell them apart.
    pub fn collapse_kings(&self) -> Board {
        let mut board = *self;
        for column in board.cells.iter_mut() {
            for cell in column.iter_mut() {
                *cell = cell.signum();
            }
        }
        board
    }

    /// The board as read from the other end of the table.
    pub fn rotated_180(&self) -> Board {
        let mut board = Board::empty();
        for x in 0..8 {
            for y in 0..8 {
                board.cells[7 - x][7 - y] = self.cells[x][y];
            }
        }
        board
    }

    /// Equal as-is or after turning the board around.
    pub fn same_up_to_rotation(&self, other: &Board) -> bool {
        self == other || self.rotated_180() == *other
    }

    /// Material from Black's side: men count 1, kings 2.
    pub fn material(&self) -> i32 {
        self.cells
            .iter()
            .flat_map(|column| column.iter())
            .map(|&cell| cell as i32)
            .sum()
    }

    /// Reject positions no sequence of legal moves can produce: pieces on light
    /// squares and men left uncrowned on their crowning row.
    pub fn validate(&self) -> Result<(), GameError> {
        for x in 0..8 {
            for y in 0..8 {
                let value = self.cells[x][y];
                if !(-2..=2).contains(&value) {
                    return Err(GameError::InvalidCell { x, y, value });
                }
                if value == 0 {
                    continue;
                }
                let Some(tile) = coord_to_tile(x, y) else {
                    return Err(GameError::InvalidCell { x, y, value });
                };
                if let Some(piece) = Piece::from_cell(value) {
                    if piece.kind == PieceKind::Man && y == piece.color.crown_row() {
                        return Err(GameError::UncrownedMan { tile });
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Board {
    /// Text diagram: `b`/`B` Black man/king, `w`/`W` White man/king, `.` empty dark square.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..8 {
            for x in 0..8 {
                let symbol = match Piece::from_cell(self.cells[x][y]) {
                    Some(Piece { kind: PieceKind::Man, color: Color::Black }) => 'b',
                    Some(Piece { kind: PieceKind::King, color: Color::Black }) => 'B',
                    Some(Piece { kind: PieceKind::Man, color: Color::White }) => 'w',
                    Some(Piece { kind: PieceKind::King, color: Color::White }) => 'W',
                    None if coord_to_tile(x, y).is_some() => '.',
                    None => ' ',
                };
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
