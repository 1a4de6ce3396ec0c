// =============================================================================
// Move generation
//
// Pure functions over a Board. Men step forward and capture in all four
// directions; kings slide and capture at any distance. Capturing is forced and
// only the longest chains (across every piece of the side to move) are legal.
//
// While a chain is explored the board is left untouched: jumped pieces stay
// where they are (so they block the rest of the chain and cannot be jumped
// twice) and the moving piece's origin counts as an empty square.
// =============================================================================

use log::warn;

use crate::board::Board;
use crate::coord::{coord_to_tile, offset, tile_to_coord};
use crate::moves::Move;
use crate::piece::{Color, Piece, PieceKind};

/// Diagonal directions in generation order.
const DIRECTIONS: [(i32, i32); 4] = [(1, 1), (-1, 1), (-1, -1), (1, -1)];

/// A capture chain under construction. Each extension produces a new value;
/// sibling branches never share a path.
#[derive(Clone, Debug)]
struct Chain {
    origin: (usize, usize),
    at: (usize, usize),
    steps: Vec<i8>,
    /// Bit `tile - 1` is set for every tile already jumped.
    captured: u32,
}

impl Chain {
    fn start(x: usize, y: usize) -> Option<Chain> {
        let tile = coord_to_tile(x, y)?;
        Some(Chain {
            origin: (x, y),
            at: (x, y),
            steps: vec![tile as i8],
            captured: 0,
        })
    }

    fn has_captured(&self, tile: u8) -> bool {
        self.captured & (1 << (tile - 1)) != 0
    }

    fn jump(&self, over: u8, landing: u8) -> Chain {
        let mut steps = self.steps.clone();
        steps.push(-(over as i8));
        steps.push(landing as i8);
        Chain {
            origin: self.origin,
            at: tile_to_coord(landing, None),
            steps,
            captured: self.captured | (1 << (over - 1)),
        }
    }

    fn position(&self) -> (usize, usize) {
        self.at
    }
}

/// Empty, or the square the moving piece started from.
fn is_free(board: &Board, chain: &Chain, (x, y): (usize, usize)) -> bool {
    board.get(x, y) == 0 || (x, y) == chain.origin
}

/// Holds a piece of the other color that this chain has not jumped yet.
fn is_capturable(board: &Board, chain: &Chain, color: Color, (x, y): (usize, usize)) -> bool {
    let cell = board.get(x, y);
    if cell == 0 || cell.signum() == color.sign() {
        return false;
    }
    match coord_to_tile(x, y) {
        Some(tile) => !chain.has_captured(tile),
        None => false,
    }
}

fn keep_longest(mut moves: Vec<Move>) -> Vec<Move> {
    let longest = moves.iter().map(Move::len).max().unwrap_or(0);
    moves.retain(|m| m.len() == longest);
    moves
}

// =============================================================================
// Simple moves
// =============================================================================

/// One diagonal step forward onto an empty square.
pub fn man_moves(board: &Board, x: usize, y: usize) -> Vec<Move> {
    let mut moves = Vec::new();
    let Some(piece) = Piece::from_cell(board.get(x, y)) else {
        return moves;
    };
    if piece.kind != PieceKind::Man {
        return moves;
    }
    let Some(from) = coord_to_tile(x, y) else {
        return moves;
    };
    if y == piece.color.crown_row() {
        warn!("man on tile {from} should have been crowned, ignoring it");
        return moves;
    }

    let dy = piece.color.forward();
    for dx in [-1, 1] {
        if let Some((tx, ty)) = offset(x, y, dx, dy) {
            if board.get(tx, ty) == 0 {
                if let Some(to) = coord_to_tile(tx, ty) {
                    moves.push(Move(vec![from as i8, to as i8]));
                }
            }
        }
    }
    moves
}

/// Every empty square along each diagonal up to the first obstacle.
pub fn king_moves(board: &Board, x: usize, y: usize) -> Vec<Move> {
    let mut moves = Vec::new();
    let Some(from) = coord_to_tile(x, y) else {
        return moves;
    };
    for &(dx, dy) in &DIRECTIONS {
        let mut square = offset(x, y, dx, dy);
        while let Some((tx, ty)) = square {
            if board.get(tx, ty) != 0 {
                break;
            }
            if let Some(to) = coord_to_tile(tx, ty) {
                moves.push(Move(vec![from as i8, to as i8]));
            }
            square = offset(tx, ty, dx, dy);
        }
    }
    moves
}

// =============================================================================
// Captures
// =============================================================================

/// Longest capture chains of the man on (x, y). Empty when it cannot capture.
pub fn man_captures(board: &Board, x: usize, y: usize) -> Vec<Move> {
    let Some(piece) = Piece::from_cell(board.get(x, y)) else {
        return Vec::new();
    };
    let Some(chain) = Chain::start(x, y) else {
        return Vec::new();
    };
    let mut found = Vec::new();
    extend_man(board, piece.color, &chain, &mut found);
    keep_longest(found)
}

fn extend_man(board: &Board, color: Color, chain: &Chain, found: &mut Vec<Move>) {
    let (cx, cy) = chain.position();
    let mut extended = false;

    for &(dx, dy) in &DIRECTIONS {
        let (Some(over), Some(land)) = (offset(cx, cy, dx, dy), offset(cx, cy, 2 * dx, 2 * dy))
        else {
            continue;
        };
        if !is_capturable(board, chain, color, over) || !is_free(board, chain, land) {
            continue;
        }
        let (Some(over_tile), Some(land_tile)) =
            (coord_to_tile(over.0, over.1), coord_to_tile(land.0, land.1))
        else {
            continue;
        };
        extended = true;
        extend_man(board, color, &chain.jump(over_tile, land_tile), found);
    }

    if !extended && chain.steps.len() > 1 {
        found.push(Move(chain.steps.clone()));
    }
}

/// Longest capture chains of the king on (x, y). Empty when it cannot capture.
pub fn king_captures(board: &Board, x: usize, y: usize) -> Vec<Move> {
    let Some(piece) = Piece::from_cell(board.get(x, y)) else {
        return Vec::new();
    };
    let Some(chain) = Chain::start(x, y) else {
        return Vec::new();
    };
    let found = king_continuations(board, piece.color, &chain);
    keep_longest(found)
}

/// Complete chains reachable from the chain's current square. Returns nothing
/// when no further jump exists.
fn king_continuations(board: &Board, color: Color, chain: &Chain) -> Vec<Move> {
    let (cx, cy) = chain.position();
    let mut found = Vec::new();

    for &(dx, dy) in &DIRECTIONS {
        // Walk the free part of the ray looking for a piece to jump.
        let mut square = Some((cx, cy));
        while let Some(from) = square {
            if !is_free(board, chain, from) {
                break;
            }
            let over = offset(from.0, from.1, dx, dy);
            let first_landing = offset(from.0, from.1, 2 * dx, 2 * dy);
            if let (Some(over), Some(first_landing)) = (over, first_landing) {
                if is_capturable(board, chain, color, over) && is_free(board, chain, first_landing)
                {
                    collect_king_landings(board, color, chain, over, (dx, dy), &mut found);
                }
            }
            square = offset(from.0, from.1, dx, dy);
        }
    }

    found
}

/// Every free square behind a jumped piece is a landing with its own continuation.
fn collect_king_landings(
    board: &Board,
    color: Color,
    chain: &Chain,
    over: (usize, usize),
    (dx, dy): (i32, i32),
    found: &mut Vec<Move>,
) {
    let Some(over_tile) = coord_to_tile(over.0, over.1) else {
        return;
    };
    let mut landing = offset(over.0, over.1, dx, dy);
    while let Some((lx, ly)) = landing {
        if !is_free(board, chain, (lx, ly)) {
            break;
        }
        let Some(land_tile) = coord_to_tile(lx, ly) else {
            break;
        };
        let next = chain.jump(over_tile, land_tile);
        let continuations = king_continuations(board, color, &next);

        if continuations.is_empty() {
            found.push(Move(next.steps.clone()));
        } else {
            for continuation in continuations {
                if is_canonical_landing(&next, &continuation, (lx, ly), (dx, dy)) {
                    found.push(continuation);
                }
            }
        }
        landing = offset(lx, ly, dx, dy);
    }
}

/// Several landings in a row can lead to the same further capture straight
/// ahead. Only the landing directly in front of that next piece is kept, so
/// each distinct chain is listed once.
fn is_canonical_landing(
    prefix: &Chain,
    continuation: &Move,
    (lx, ly): (usize, usize),
    (dx, dy): (i32, i32),
) -> bool {
    let Some(&next_over) = continuation.steps().get(prefix.steps.len()) else {
        return true;
    };
    let (nx, ny) = tile_to_coord(next_over.unsigned_abs(), None);
    let (ddx, ddy) = (nx as i32 - lx as i32, ny as i32 - ly as i32);
    let straight_ahead = ddx.signum() == dx && ddy.signum() == dy;
    !straight_ahead || (ddx == dx && ddy == dy)
}

// =============================================================================
// Aggregation and outcomes
// =============================================================================

/// Captures first, then simple moves, for the piece on (x, y).
pub fn piece_options(board: &Board, x: usize, y: usize) -> Vec<Move> {
    let Some(piece) = Piece::from_cell(board.get(x, y)) else {
        return Vec::new();
    };
    let mut options = match piece.kind {
        PieceKind::Man => man_captures(board, x, y),
        PieceKind::King => king_captures(board, x, y),
    };
    options.extend(match piece.kind {
        PieceKind::Man => man_moves(board, x, y),
        PieceKind::King => king_moves(board, x, y),
    });
    options
}

/// Every legal move for `color`, with the forced maximal capture rule applied.
/// Pieces are visited column by column (x, then y).
pub fn legal_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut options = Vec::new();
    for x in 0..8 {
        for y in 0..8 {
            let cell = board.get(x, y);
            if cell != 0 && cell.signum() == color.sign() {
                options.extend(piece_options(board, x, y));
            }
        }
    }
    keep_longest(options)
}

/// The board after `mv`: the piece leaves its origin, every jumped piece is
/// removed, and the piece lands on the final tile, crowned if it is a man
/// finishing on its crowning row. Passing the crowning row mid-chain does not crown.
///
/// `mv` is expected to come from [`legal_moves`] for this board. An empty move
/// leaves the board as it is; a tile outside `1..=32` panics.
pub fn outcome(board: &Board, mv: &Move) -> Board {
    if mv.is_empty() {
        return *board;
    }
    let mut next = *board;
    let from = mv.from();
    let moving = next.at(from);
    next.set_at(from, 0);
    for captured in mv.captured() {
        next.set_at(captured, 0);
    }

    let to = mv.to();
    let (_, y) = tile_to_coord(to, None);
    let landed = match Piece::from_cell(moving) {
        Some(p) if p.kind == PieceKind::Man && y == p.color.crown_row() => p.crowned().cell(),
        _ => moving,
    };
    next.set_at(to, landed);
    next
}
