// =============================================================================
// Board reconciliation
//
// A camera reports what is on the table once per cycle. The controller
// decides whether that snapshot is the board it already knows, a legal
// continuation of it, or neither, and keeps the computer's next move ready
// for the arm that has to play it.
// =============================================================================

use log::{debug, info, warn};
use serde::Serialize;

use crate::board::Board;
use crate::coord::tile_to_coord;
use crate::engine::{decide_move, AiConfig};
use crate::error::ControllerError;
use crate::game::{Game, Points, Status};
use crate::moves::Move;
use crate::piece::{Color, PieceKind};

/// What an observed snapshot meant for the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Reconciliation {
    /// Computer's turn, and the board matches no legal continuation.
    InvalidRobotMove,
    /// Computer's turn, and a legal move was played that is not the planned one.
    ValidWrongRobotMove,
    /// Computer's turn, and the planned move was played.
    ValidRightRobotMove,
    /// Computer's turn, and nothing has moved yet.
    NoRobotMove,
    /// Opponent's turn, and the board matches no legal continuation.
    InvalidOpponentMove,
    /// Opponent's turn, and a legal move was recognised and played.
    ValidOpponentMove,
    /// Opponent's turn (or game over), and nothing has moved.
    NoOpponentMove,
}

/// Snapshot handed to the motion layer and any UI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Report {
    pub board: Board,
    pub points: Points,
    pub status: Status,
    pub winner: Option<Color>,
    pub options: Vec<Move>,
    pub turn: Option<Color>,
    pub computer_color: Color,
    pub computer_move: Option<Move>,
    pub crowning: Option<bool>,
}

pub struct RobotController {
    game: Game,
    computer_color: Color,
    config: AiConfig,
    pending_move: Option<Move>,
    crowning: Option<bool>,
}

impl RobotController {
    pub fn new(computer_color: Color, config: AiConfig) -> Self {
        Self::with_game(Game::new(), computer_color, config)
    }

    /// Take over a game already in progress.
    pub fn with_game(game: Game, computer_color: Color, config: AiConfig) -> Self {
        RobotController {
            game,
            computer_color,
            config,
            pending_move: None,
            crowning: None,
        }
    }

    pub fn computer_color(&self) -> Color {
        self.computer_color
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    fn computers_turn(&self) -> bool {
        self.game.turn() == Some(self.computer_color)
    }

    /// Reconcile one camera snapshot with the game.
    ///
    /// Kings are compared as men, and the snapshot may be taken from either
    /// end of the table. With `allow_deviation`, a legal computer move other
    /// than the planned one is accepted into the game.
    pub fn update(
        &mut self,
        observed: &Board,
        allow_deviation: bool,
    ) -> Result<Reconciliation, ControllerError> {
        let observed = observed.collapse_kings();
        let computers_turn = self.computers_turn();

        if observed.same_up_to_rotation(&self.game.board().collapse_kings()) {
            if !computers_turn {
                return Ok(Reconciliation::NoOpponentMove);
            }
            if self.pending_move.is_none() || self.crowning.is_none() {
                self.plan_move()?;
            }
            return Ok(Reconciliation::NoRobotMove);
        }

        // Different chains can leave the same board; the planned one wins.
        let matching: Vec<Move> = self
            .game
            .outcomes()
            .into_iter()
            .filter(|(_, board)| observed.same_up_to_rotation(&board.collapse_kings()))
            .map(|(mv, _)| mv)
            .collect();
        let played = match &self.pending_move {
            Some(pending) if computers_turn && matching.contains(pending) => Some(pending.clone()),
            _ => matching.into_iter().next(),
        };

        let Some(mv) = played else {
            warn!("observed board matches no legal continuation");
            return Ok(if computers_turn {
                Reconciliation::InvalidRobotMove
            } else {
                Reconciliation::InvalidOpponentMove
            });
        };

        if !computers_turn {
            info!("opponent played {mv}");
            let status = self.game.apply(&mv)?;
            self.clear_pending();
            if status == Status::InProgress {
                self.plan_move()?;
            }
            return Ok(Reconciliation::ValidOpponentMove);
        }

        if self.pending_move.as_ref() == Some(&mv) {
            info!("computer move {mv} executed");
            self.game.apply(&mv)?;
            self.clear_pending();
            return Ok(Reconciliation::ValidRightRobotMove);
        }

        warn!(
            "computer played {mv} instead of {}",
            self.pending_move
                .as_ref()
                .map_or_else(|| "nothing".to_string(), Move::to_string)
        );
        if allow_deviation {
            self.game.apply(&mv)?;
            self.clear_pending();
        }
        Ok(Reconciliation::ValidWrongRobotMove)
    }

    /// Search for the computer's next move and note whether it crowns.
    fn plan_move(&mut self) -> Result<(), ControllerError> {
        let decision = decide_move(&self.game, self.computer_color, &self.config)?;
        let board = self.game.board();
        let moving_man = board
            .piece_at(decision.mv.from())
            .is_some_and(|piece| piece.kind == PieceKind::Man);
        let (_, last_row) = tile_to_coord(decision.mv.to(), None);
        let crowning = moving_man && last_row == self.computer_color.crown_row();
        debug!(
            "planned {} (value {}, crowning {crowning})",
            decision.mv, decision.value
        );
        self.pending_move = Some(decision.mv);
        self.crowning = Some(crowning);
        Ok(())
    }

    fn clear_pending(&mut self) {
        self.pending_move = None;
        self.crowning = None;
    }

    pub fn report(&self) -> Report {
        Report {
            board: self.game.board(),
            points: self.game.points(),
            status: self.game.status(),
            winner: self.game.winner(),
            options: self.game.legal_moves(),
            turn: self.game.turn(),
            computer_color: self.computer_color,
            computer_move: self.pending_move.clone(),
            crowning: self.crowning,
        }
    }

    /// Start a fresh game with the same colors and search settings.
    pub fn restart(&mut self) {
        self.game = Game::new();
        self.clear_pending();
    }

    pub fn log(&self) -> Vec<Move> {
        self.game.log()
    }
}
