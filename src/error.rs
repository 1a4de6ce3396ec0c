// =============================================================================
// Errors for the rules engine, the search and the board controller
// =============================================================================

use thiserror::Error;

use crate::moves::Move;
use crate::piece::Color;

/// Rule and state violations reported by the game engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The move is not one of the options generated for this turn
    #[error("move {0} is not permitted")]
    NotPermittedMove(Move),

    /// A move was attempted after the game was won or drawn
    #[error("game already ended")]
    GameAlreadyEnded,

    /// A board cell outside the piece encoding
    #[error("invalid cell value {value} at ({x}, {y})")]
    InvalidCell { x: usize, y: usize, value: i8 },

    /// A man standing on its crowning row was never crowned
    #[error("uncrowned man on tile {tile}")]
    UncrownedMan { tile: u8 },
}

/// Precondition failures of the move search.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("{color:?} asked for a move but it is not its turn")]
    NotMyTurn { color: Color },

    #[error("no legal moves to choose from")]
    NoLegalMoves,
}

/// Contract violations surfaced by the board controller. Boards that do not
/// match the game are not errors; they are reported as reconciliation results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Game(#[from] GameError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("cannot read move notation {0:?}")]
    Malformed(String),

    #[error("{0:?} is not a legal move")]
    NoMatch(String),

    #[error("{0:?} matches {1} legal moves, name every landing")]
    Ambiguous(String, usize),
}

pub type GameResult<T> = Result<T, GameError>;
