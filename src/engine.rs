// =============================================================================
// Draughts AI Engine
//
// Negamax search with alpha-beta pruning over plain boards. Values are always
// from the point of view of the side to move and live in [-AMPLITUDE,
// AMPLITUDE]: a side without moves scores -AMPLITUDE, a threefold repetition
// scores 0, and positions at the search horizon are scored by material.
//
// Moves are searched in generation order and only a strict improvement
// replaces the best move, so equal-valued moves resolve to the first one
// generated and repeated searches of the same position agree.
// =============================================================================

use std::time::{Duration, Instant};

use log::{debug, info};
use rand::Rng;

use crate::board::Board;
use crate::error::SearchError;
use crate::game::{repetitions, DrawEntry, Game, REPETITIONS_FOR_DRAW};
use crate::movegen::{legal_moves, outcome};
use crate::moves::Move;
use crate::piece::Color;

// =============================================================================
// Configuration
// =============================================================================

/// Bound on every search value. Twelve kings on one side against an empty
/// board is the largest material gap, and losing outright is worth the same.
pub const AMPLITUDE: i32 = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Alpha-beta search to `AiConfig::depth` plies.
    Negamax,
    /// Uniformly random legal move. Useful as a sparring partner.
    Random,
}

#[derive(Clone, Debug)]
pub struct AiConfig {
    /// Search depth in plies.
    pub depth: u32,
    pub strategy: Strategy,
    /// Once this much time has passed, nodes not yet expanded are scored
    /// statically instead of searched further.
    pub time_limit: Option<Duration>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AiConfig {
    pub fn new() -> Self {
        AiConfig {
            depth: 6,
            strategy: Strategy::Negamax,
            time_limit: None,
        }
    }

    pub fn with_depth(depth: u32) -> Self {
        AiConfig {
            depth,
            ..Self::new()
        }
    }
}

/// The chosen move, its negamax value for the mover and the deepest ply
/// reached (diagnostic only).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub mv: Move,
    pub value: i32,
    pub max_depth: u32,
}

// =============================================================================
// Evaluation
// =============================================================================

/// Material balance for `color`: men count 1, kings 2.
pub fn evaluate(board: &Board, color: Color) -> i32 {
    (board.material() * color.sign() as i32).clamp(-AMPLITUDE, AMPLITUDE)
}

// =============================================================================
// Search: negamax with alpha-beta pruning
// =============================================================================

/// One node of the search: the position, its repetition history since the
/// last capture and the remaining budget.
struct SearchFrame {
    board: Board,
    draw_log: Vec<DrawEntry>,
    depth: u32,
    alpha: i32,
    beta: i32,
    color: Color,
}

struct SearchStats {
    nodes: u64,
    deadline: Option<Instant>,
}

impl SearchStats {
    fn out_of_time(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Repetition history of the child reached by `mv`, kept the same way the
/// game keeps it: wiped by a capture, then extended by the new position.
fn child_draw_log(draw_log: &[DrawEntry], mv: &Move, next: Color, board: Board) -> Vec<DrawEntry> {
    let mut log = if mv.is_capture() {
        Vec::new()
    } else {
        draw_log.to_vec()
    };
    log.push((next, board));
    log
}

/// Negamax search with alpha-beta pruning.
///
/// Returns the best move at this node (if any was searched), its value for
/// `frame.color`, and the number of plies explored below it.
fn negamax(frame: SearchFrame, stats: &mut SearchStats) -> (Option<Move>, i32, u32) {
    stats.nodes += 1;
    let SearchFrame {
        board,
        draw_log,
        depth,
        mut alpha,
        beta,
        color,
    } = frame;

    if repetitions(&draw_log, &(color, board)) >= REPETITIONS_FOR_DRAW {
        return (None, 0, 0);
    }

    let moves = legal_moves(&board, color);
    if moves.is_empty() {
        return (None, -AMPLITUDE, 0);
    }

    if depth == 0 || stats.out_of_time() {
        return (None, evaluate(&board, color), 0);
    }

    let mut best: Option<(Move, i32)> = None;
    let mut max_depth = 1;
    for mv in moves {
        let next = outcome(&board, &mv);
        let child = SearchFrame {
            board: next,
            draw_log: child_draw_log(&draw_log, &mv, color.opposite(), next),
            depth: depth - 1,
            alpha: -beta,
            beta: -alpha,
            color: color.opposite(),
        };
        let (_, child_value, child_depth) = negamax(child, stats);
        let value = -child_value;
        max_depth = max_depth.max(child_depth + 1);

        let improves = match &best {
            Some((_, best_value)) => value > *best_value,
            None => true,
        };
        if improves {
            best = Some((mv, value));
        }
        alpha = alpha.max(value);
        if alpha >= beta {
            break;
        }
    }

    match best {
        Some((mv, value)) => (Some(mv), value, max_depth),
        None => (None, -AMPLITUDE, max_depth),
    }
}

// =============================================================================
// Move selection
// =============================================================================

/// Pick a move for `color` in `game`.
///
/// A forced move (a single option) is returned straight away. Otherwise the
/// configured strategy decides.
pub fn decide_move(game: &Game, color: Color, config: &AiConfig) -> Result<Decision, SearchError> {
    if game.turn() != Some(color) {
        return Err(SearchError::NotMyTurn { color });
    }
    let mut options = game.legal_moves();
    if options.is_empty() {
        return Err(SearchError::NoLegalMoves);
    }

    if options.len() == 1 {
        let mv = options.remove(0);
        debug!("only one option for {color:?}: {mv}");
        return Ok(Decision {
            mv,
            value: evaluate(&game.board(), color),
            max_depth: 0,
        });
    }

    match config.strategy {
        Strategy::Random => {
            let index = rand::thread_rng().gen_range(0..options.len());
            let mv = options.swap_remove(index);
            Ok(Decision {
                mv,
                value: evaluate(&game.board(), color),
                max_depth: 0,
            })
        }
        Strategy::Negamax => search(game, color, config, options),
    }
}

fn search(
    game: &Game,
    color: Color,
    config: &AiConfig,
    options: Vec<Move>,
) -> Result<Decision, SearchError> {
    info!(
        "negamax for {color:?}: depth {}, {} options",
        config.depth,
        options.len()
    );
    let started = Instant::now();
    let mut stats = SearchStats {
        nodes: 0,
        deadline: config.time_limit.map(|limit| started + limit),
    };

    let root = SearchFrame {
        board: game.board(),
        draw_log: game.draw_log(),
        depth: config.depth.max(1),
        alpha: -AMPLITUDE,
        beta: AMPLITUDE,
        color,
    };
    let (best, value, max_depth) = negamax(root, &mut stats);

    // Only a deadline that passed before the root was expanded leaves no move.
    let mv = best.unwrap_or_else(|| options[0].clone());
    info!(
        "negamax chose {mv} (value {value}, depth {max_depth}, {} nodes) in {:.3}s",
        stats.nodes,
        started.elapsed().as_secs_f64()
    );
    Ok(Decision {
        mv,
        value,
        max_depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Status;
    use crate::piece::{Piece, PieceKind};

    fn mv(steps: &[i8]) -> Move {
        Move(steps.to_vec())
    }

    fn man(color: Color) -> Piece {
        Piece::new(PieceKind::Man, color)
    }

    #[test]
    fn material_eval_counts_kings_double() {
        let board = Board::empty()
            .with(10, Piece::new(PieceKind::King, Color::Black))
            .with(20, man(Color::White))
            .with(21, man(Color::White));
        assert_eq!(evaluate(&board, Color::Black), 0);
        let board = board.with(11, man(Color::Black));
        assert_eq!(evaluate(&board, Color::Black), 1);
        assert_eq!(evaluate(&board, Color::White), -1);
    }

    #[test]
    fn eval_is_bounded() {
        let mut board = Board::empty();
        for tile in 5..=28 {
            board.set_at(tile, 2);
        }
        assert_eq!(evaluate(&board, Color::Black), AMPLITUDE);
        assert_eq!(evaluate(&board, Color::White), -AMPLITUDE);
    }

    #[test]
    fn single_option_skips_search() {
        let board = Board::empty()
            .with(18, man(Color::White))
            .with(14, man(Color::Black))
            .with(4, man(Color::Black));
        let game = Game::from_position(board, Color::White).unwrap();
        // A depth this large would never finish if it were searched.
        let config = AiConfig::with_depth(60);
        let decision = decide_move(&game, Color::White, &config).unwrap();
        assert_eq!(decision.mv, mv(&[18, -14, 9]));
        assert_eq!(decision.max_depth, 0);
    }

    #[test]
    fn wrong_color_is_rejected() {
        let game = Game::new();
        assert_eq!(
            decide_move(&game, Color::Black, &AiConfig::new()),
            Err(SearchError::NotMyTurn { color: Color::Black })
        );
    }

    #[test]
    fn finished_game_has_no_mover() {
        let board = Board::empty().with(14, man(Color::White));
        let game = Game::from_position(board, Color::Black).unwrap();
        assert!(matches!(
            decide_move(&game, Color::Black, &AiConfig::new()),
            Err(SearchError::NotMyTurn { .. })
        ));
    }

    #[test]
    fn ties_go_to_the_first_generated_move() {
        // One ply from the start every move keeps material level.
        let game = Game::new();
        let decision = decide_move(&game, Color::White, &AiConfig::with_depth(1)).unwrap();
        assert_eq!(decision.mv, mv(&[21, 17]));
        assert_eq!(decision.value, 0);
        assert_eq!(decision.max_depth, 1);
    }

    #[test]
    fn avoids_walking_into_a_capture() {
        // White 23 can step to 18 (taken by Black 14 next ply) or to 19 (safe).
        let board = Board::empty()
            .with(23, man(Color::White))
            .with(14, man(Color::Black));
        let game = Game::from_position(board, Color::White).unwrap();
        let decision = decide_move(&game, Color::White, &AiConfig::with_depth(2)).unwrap();
        assert_eq!(decision.mv, mv(&[23, 19]));
        assert_eq!(decision.value, 0);
    }

    #[test]
    fn prefers_the_capture_that_keeps_material() {
        // White 22 can take 18 landing on 15, where Black 11 retakes, or take
        // 17 landing on 13, which is safe. Black 8 stops 15 from jumping on.
        let board = Board::empty()
            .with(22, man(Color::White))
            .with(17, man(Color::Black))
            .with(18, man(Color::Black))
            .with(11, man(Color::Black))
            .with(8, man(Color::Black));
        let game = Game::from_position(board, Color::White).unwrap();
        assert_eq!(game.legal_moves().len(), 2);
        let decision = decide_move(&game, Color::White, &AiConfig::with_depth(2)).unwrap();
        assert_eq!(decision.mv, mv(&[22, -17, 13]));
        assert_eq!(decision.value, -2);
    }

    #[test]
    fn blocking_the_last_man_wins() {
        // Black's man on 4 can only step to 8. Filling 8 from 12 leaves it
        // stuck (11 covers the landing); the other quiet moves keep the same
        // material and score far lower.
        let board = Board::empty()
            .with(11, man(Color::White))
            .with(12, man(Color::White))
            .with(4, man(Color::Black));
        let game = Game::from_position(board, Color::White).unwrap();
        assert_eq!(game.legal_moves().len(), 3);
        let decision = decide_move(&game, Color::White, &AiConfig::with_depth(1)).unwrap();
        assert_eq!(decision.mv, mv(&[12, 8]));
        assert_eq!(decision.value, AMPLITUDE);
    }

    #[test]
    fn side_without_moves_loses_at_any_depth() {
        let board = Board::empty()
            .with(11, man(Color::White))
            .with(8, man(Color::White))
            .with(4, man(Color::Black));
        for depth in [0, 1, 6] {
            let frame = SearchFrame {
                board,
                draw_log: vec![(Color::Black, board)],
                depth,
                alpha: -AMPLITUDE,
                beta: AMPLITUDE,
                color: Color::Black,
            };
            let mut stats = SearchStats {
                nodes: 0,
                deadline: None,
            };
            assert_eq!(negamax(frame, &mut stats), (None, -AMPLITUDE, 0), "depth {depth}");
        }
    }

    #[test]
    fn side_behind_heads_for_the_third_repetition() {
        // Kings shuffle 32-27 / 1-6 while White is a man up. Black's 6-1 brings
        // back the starting position a third time, which beats any material
        // count for the side that is behind.
        let board = Board::empty()
            .with(32, Piece::new(PieceKind::King, Color::White))
            .with(1, Piece::new(PieceKind::King, Color::Black))
            .with(21, man(Color::White));
        let mut game = Game::from_position(board, Color::White).unwrap();
        for steps in [[32, 27], [1, 6], [27, 32], [6, 1], [32, 27], [1, 6], [27, 32]] {
            assert_eq!(game.apply(&mv(&steps)).unwrap(), Status::InProgress);
        }

        let decision = decide_move(&game, Color::Black, &AiConfig::with_depth(1)).unwrap();
        assert_eq!(decision.mv, mv(&[6, 1]));
        assert_eq!(decision.value, 0);
        assert_eq!(game.apply(&decision.mv), Ok(Status::Draw));
    }

    #[test]
    fn search_is_deterministic() {
        let mut game = Game::new();
        game.apply(&mv(&[22, 18])).unwrap();
        game.apply(&mv(&[11, 16])).unwrap();
        let config = AiConfig::with_depth(4);
        let first = decide_move(&game, Color::White, &config).unwrap();
        let second = decide_move(&game, Color::White, &config).unwrap();
        assert_eq!(first, second);
        assert!(game.legal_moves().contains(&first.mv));
    }

    #[test]
    fn random_strategy_plays_legal_moves() {
        let game = Game::new();
        let config = AiConfig {
            strategy: Strategy::Random,
            ..AiConfig::new()
        };
        for _ in 0..20 {
            let decision = decide_move(&game, Color::White, &config).unwrap();
            assert!(game.legal_moves().contains(&decision.mv));
        }
    }

    #[test]
    fn expired_time_limit_still_returns_a_move() {
        let game = Game::new();
        let config = AiConfig {
            depth: 30,
            time_limit: Some(Duration::ZERO),
            ..AiConfig::new()
        };
        let decision = decide_move(&game, Color::White, &config).unwrap();
        assert_eq!(decision.mv, mv(&[21, 17]));
    }

    #[test]
    fn search_treats_threefold_repetition_as_draw() {
        let board = Board::empty().with(14, man(Color::Black));
        let log = vec![(Color::Black, board); 3];
        let frame = SearchFrame {
            board,
            draw_log: log,
            depth: 3,
            alpha: -AMPLITUDE,
            beta: AMPLITUDE,
            color: Color::Black,
        };
        let mut stats = SearchStats {
            nodes: 0,
            deadline: None,
        };
        assert_eq!(negamax(frame, &mut stats), (None, 0, 0));
    }
}
