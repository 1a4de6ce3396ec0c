use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{GameError, GameResult};
use crate::movegen::{legal_moves, outcome};
use crate::moves::Move;
use crate::piece::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    InProgress,
    Won,
    Draw,
}

/// Pieces captured by each side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Points {
    pub white: u32,
    pub black: u32,
}

impl Points {
    pub fn of(&self, color: Color) -> u32 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    fn add(&mut self, color: Color, n: u32) {
        match color {
            Color::White => self.white += n,
            Color::Black => self.black += n,
        }
    }
}

/// A repetition record: the side to move and the position it faces.
pub type DrawEntry = (Color, Board);

/// Number of times the same (mover, board) pair must occur for a draw.
pub const REPETITIONS_FOR_DRAW: usize = 3;

/// How many times `entry` appears in a repetition log.
pub fn repetitions(draw_log: &[DrawEntry], entry: &DrawEntry) -> usize {
    draw_log.iter().filter(|e| *e == entry).count()
}

/// One game of draughts. The board and logs are owned here and only change
/// through [`Game::apply`]; every accessor hands out a copy.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    turn: Color,
    points: Points,
    status: Status,
    winner: Option<Color>,
    log: Vec<Move>,
    draw_log: Vec<DrawEntry>,
    options: Vec<Move>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Standard starting position, White to move.
    pub fn new() -> Self {
        Self::start(Board::new(), Color::White)
    }

    /// Start from a custom position. The board must be reachable in play: valid
    /// cells on dark squares only and no uncrowned man on its crowning row.
    /// A side to move without options has already lost.
    pub fn from_position(board: Board, turn: Color) -> GameResult<Self> {
        board.validate()?;
        Ok(Self::start(board, turn))
    }

    fn start(board: Board, turn: Color) -> Self {
        let options = legal_moves(&board, turn);
        let (status, winner) = if options.is_empty() {
            (Status::Won, Some(turn.opposite()))
        } else {
            (Status::InProgress, None)
        };
        Game {
            board,
            turn,
            points: Points::default(),
            status,
            winner,
            log: Vec::new(),
            draw_log: vec![(turn, board)],
            options,
        }
    }

    pub fn board(&self) -> Board {
        self.board
    }

    /// Side to move, `None` once the game is over.
    pub fn turn(&self) -> Option<Color> {
        match self.status {
            Status::InProgress => Some(self.turn),
            _ => None,
        }
    }

    pub fn points(&self) -> Points {
        self.points
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn log(&self) -> Vec<Move> {
        self.log.clone()
    }

    pub fn draw_log(&self) -> Vec<DrawEntry> {
        self.draw_log.clone()
    }

    /// Legal moves of the side to move. Empty once the game is over.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.options.clone()
    }

    /// Every legal move paired with the board it produces.
    pub fn outcomes(&self) -> Vec<(Move, Board)> {
        self.options
            .iter()
            .map(|m| (m.clone(), outcome(&self.board, m)))
            .collect()
    }

    /// Play `mv` for the side to move and return the resulting status.
    ///
    /// The move must be one of [`Game::legal_moves`] exactly as listed. On
    /// error the game is left as it was.
    pub fn apply(&mut self, mv: &Move) -> GameResult<Status> {
        if self.status != Status::InProgress {
            return Err(GameError::GameAlreadyEnded);
        }
        if !self.options.contains(mv) {
            return Err(GameError::NotPermittedMove(mv.clone()));
        }

        let mover = self.turn;
        let opponent = mover.opposite();
        self.board = outcome(&self.board, mv);
        self.log.push(mv.clone());

        let captured = mv.captured().count() as u32;
        self.points.add(mover, captured);
        // A capture can never be undone, so earlier positions cannot recur.
        if captured > 0 {
            self.draw_log.clear();
        }

        let entry = (opponent, self.board);
        self.draw_log.push(entry);
        if repetitions(&self.draw_log, &entry) >= REPETITIONS_FOR_DRAW {
            self.status = Status::Draw;
            self.options.clear();
        }

        if self.status == Status::InProgress {
            self.options = legal_moves(&self.board, opponent);
            if self.options.is_empty() {
                self.status = Status::Won;
                self.winner = Some(mover);
            }
        }

        self.turn = opponent;
        Ok(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Piece, PieceKind};

    fn mv(steps: &[i8]) -> Move {
        Move(steps.to_vec())
    }

    fn man(color: Color) -> Piece {
        Piece::new(PieceKind::Man, color)
    }

    fn king(color: Color) -> Piece {
        Piece::new(PieceKind::King, color)
    }

    #[test]
    fn simple_opening_move() {
        let mut game = Game::new();
        assert_eq!(game.turn(), Some(Color::White));
        let status = game.apply(&mv(&[21, 17])).expect("opening move is legal");

        assert_eq!(status, Status::InProgress);
        let board = game.board();
        assert_eq!(board.get(0, 5), 0, "piece left its square");
        assert_eq!(board.get(1, 4), -1, "piece arrived on 17");
        assert_eq!(game.turn(), Some(Color::Black));
        assert_eq!(game.points(), Points::default());
        assert_eq!(game.log(), vec![mv(&[21, 17])]);
        assert_eq!(game.draw_log().len(), 2);
    }

    #[test]
    fn single_capture_scores_and_clears_draw_log() {
        let board = Board::empty()
            .with(18, man(Color::White))
            .with(14, man(Color::Black))
            .with(4, man(Color::Black));
        let mut game = Game::from_position(board, Color::White).unwrap();
        assert_eq!(game.legal_moves(), vec![mv(&[18, -14, 9])]);

        game.apply(&mv(&[18, -14, 9])).unwrap();
        assert_eq!(game.points().white, 1);
        assert_eq!(game.points().black, 0);
        assert_eq!(game.draw_log(), vec![(Color::Black, game.board())]);
        assert_eq!(game.status(), Status::InProgress);
    }

    #[test]
    fn rejects_moves_not_listed_verbatim() {
        let board = Board::empty()
            .with(29, man(Color::White))
            .with(25, man(Color::Black))
            .with(18, man(Color::Black))
            .with(11, man(Color::Black))
            .with(2, man(Color::Black));
        let mut game = Game::from_position(board, Color::White).unwrap();
        let full = mv(&[29, -25, 22, -18, 15, -11, 8]);
        assert_eq!(game.legal_moves(), vec![full.clone()]);

        let before_board = game.board();
        for attempt in [
            mv(&[29, -25, 22, -18, 15]),
            mv(&[29, -11, 22, -18, 15, -25, 8]),
            mv(&[29, 8]),
            mv(&[29, 22, 15, 8]),
        ] {
            assert_eq!(
                game.apply(&attempt),
                Err(GameError::NotPermittedMove(attempt.clone()))
            );
        }
        assert_eq!(game.board(), before_board);
        assert!(game.log().is_empty());
        assert_eq!(game.turn(), Some(Color::White));

        game.apply(&full).unwrap();
        assert_eq!(game.points().white, 3);
    }

    #[test]
    fn capturing_the_last_piece_wins() {
        let board = Board::empty()
            .with(11, man(Color::White))
            .with(7, man(Color::Black))
            .with(6, man(Color::Black));
        let mut game = Game::from_position(board, Color::White).unwrap();
        let status = game.apply(&mv(&[11, -7, 2, -6, 9])).unwrap();
        assert_eq!(status, Status::Won);
        assert_eq!(game.winner(), Some(Color::White));
        assert_eq!(game.turn(), None);
        assert!(game.legal_moves().is_empty());
        assert_eq!(game.board().at(9), -1, "no crowning mid-chain");

        assert_eq!(game.apply(&mv(&[9, 5])), Err(GameError::GameAlreadyEnded));
    }

    #[test]
    fn blocked_side_loses() {
        // Black's only man is on 1. White men fill 5 and 6 and cannot be
        // jumped: the square behind 5 is off the board and 10 is taken.
        let board = Board::empty()
            .with(1, man(Color::Black))
            .with(5, man(Color::White))
            .with(6, man(Color::White))
            .with(9, man(Color::White))
            .with(10, man(Color::White))
            .with(30, man(Color::White));
        let mut game = Game::from_position(board, Color::White).unwrap();
        game.apply(&mv(&[30, 26])).unwrap();
        assert_eq!(game.status(), Status::Won);
        assert_eq!(game.winner(), Some(Color::White));
    }

    #[test]
    fn mover_without_options_starts_lost() {
        let board = Board::empty().with(14, man(Color::White));
        let game = Game::from_position(board, Color::Black).unwrap();
        assert_eq!(game.status(), Status::Won);
        assert_eq!(game.winner(), Some(Color::White));
        assert_eq!(game.turn(), None);
    }

    #[test]
    fn from_position_rejects_inconsistent_boards() {
        let board = Board::empty().with(30, man(Color::Black));
        assert_eq!(
            Game::from_position(board, Color::White).err(),
            Some(GameError::UncrownedMan { tile: 30 })
        );
    }

    /// The same (mover, board) pair has to occur three times. Shuffle two kings
    /// back and forth: after one round trip the position has occurred twice and
    /// the game goes on; the second round trip makes it three.
    #[test]
    fn threefold_repetition_requires_three_occurrences() {
        let board = Board::empty()
            .with(32, king(Color::White))
            .with(1, king(Color::Black));
        let mut game = Game::from_position(board, Color::White).unwrap();
        let round_trip = [mv(&[32, 27]), mv(&[1, 6]), mv(&[27, 32]), mv(&[6, 1])];

        for m in &round_trip {
            assert_eq!(game.apply(m).unwrap(), Status::InProgress);
        }
        for m in &round_trip[..3] {
            assert_eq!(game.apply(m).unwrap(), Status::InProgress);
        }
        assert_eq!(game.apply(&round_trip[3]).unwrap(), Status::Draw);
        assert_eq!(game.winner(), None);
        assert_eq!(game.turn(), None);
        assert_eq!(game.apply(&round_trip[0]), Err(GameError::GameAlreadyEnded));
    }

    #[test]
    fn capture_resets_repetition_count() {
        // White's forced capture empties the log; the repetition count of the
        // king shuffle that follows starts from the post-capture position.
        let board = Board::empty()
            .with(32, king(Color::White))
            .with(1, king(Color::Black))
            .with(21, man(Color::White))
            .with(17, man(Color::Black));
        let mut game = Game::from_position(board, Color::White).unwrap();
        assert_eq!(game.legal_moves(), vec![mv(&[21, -17, 14])]);
        game.apply(&mv(&[21, -17, 14])).unwrap();
        assert_eq!(game.draw_log(), vec![(Color::Black, game.board())]);

        let round_trip = [mv(&[1, 6]), mv(&[32, 27]), mv(&[6, 1]), mv(&[27, 32])];
        for m in &round_trip {
            assert_eq!(game.apply(m).unwrap(), Status::InProgress);
        }
        assert_eq!(game.draw_log().len(), 5);
        for m in &round_trip[..3] {
            assert_eq!(game.apply(m).unwrap(), Status::InProgress);
        }
        assert_eq!(game.apply(&round_trip[3]).unwrap(), Status::Draw);
    }

    #[test]
    fn accessors_hand_out_copies() {
        let mut game = Game::new();
        game.apply(&mv(&[22, 18])).unwrap();

        let mut board = game.board();
        board.set_at(18, 0);
        let mut log = game.log();
        log.clear();
        let mut draw_log = game.draw_log();
        draw_log.clear();
        let mut options = game.legal_moves();
        options.clear();
        let mut points = game.points();
        points.white = 10;

        assert_eq!(game.board().at(18), -1);
        assert_eq!(game.log().len(), 1);
        assert_eq!(game.draw_log().len(), 2);
        assert!(!game.legal_moves().is_empty());
        assert_eq!(game.points().white, 0);
    }

    #[test]
    fn outcomes_pair_each_move_with_its_board() {
        let game = Game::new();
        let outcomes = game.outcomes();
        assert_eq!(outcomes.len(), game.legal_moves().len());
        for (m, board) in outcomes {
            assert_eq!(board.at(m.from()), 0);
            assert_eq!(board.at(m.to()), -1);
        }
    }
}
