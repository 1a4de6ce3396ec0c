use std::io::Write;

use draughts::engine::{decide_move, AiConfig, Strategy};
use draughts::game::{Game, Status};
use draughts::piece::Color;

const MAX_MOVES: u32 = 200;
const GAMES_PER_MATCHUP: usize = 10;

#[derive(Debug, Default)]
struct MatchResult {
    a_wins: u32,
    b_wins: u32,
    draws: u32,
}

/// Play one game; `None` is a draw (repetition or move limit).
fn play_game(white_config: &AiConfig, black_config: &AiConfig) -> Option<Color> {
    let mut game = Game::new();
    for _ in 0..MAX_MOVES {
        let Some(color) = game.turn() else {
            break;
        };
        let config = match color {
            Color::White => white_config,
            Color::Black => black_config,
        };
        match decide_move(&game, color, config) {
            Ok(decision) => {
                if let Err(e) = game.apply(&decision.mv) {
                    eprintln!("engine proposed an illegal move: {e}");
                    return None;
                }
            }
            Err(e) => {
                eprintln!("search failed: {e}");
                return None;
            }
        }
    }

    match game.status() {
        Status::Won => game.winner(),
        Status::Draw | Status::InProgress => None,
    }
}

/// Play `num_games`, half with each side as White.
fn run_matchup(
    label_a: &str,
    config_a: &AiConfig,
    label_b: &str,
    config_b: &AiConfig,
    num_games: usize,
) -> MatchResult {
    let mut result = MatchResult::default();
    let half = num_games / 2;

    // A as white, B as black
    for _ in 0..half {
        match play_game(config_a, config_b) {
            Some(Color::White) => result.a_wins += 1,
            Some(Color::Black) => result.b_wins += 1,
            None => result.draws += 1,
        }
    }
    // B as white, A as black
    for _ in 0..half {
        match play_game(config_b, config_a) {
            Some(Color::White) => result.b_wins += 1,
            Some(Color::Black) => result.a_wins += 1,
            None => result.draws += 1,
        }
    }

    println!(
        "  {label_a} vs {label_b}: {label_a} wins {}, {label_b} wins {}, draws {} (out of {})",
        result.a_wins,
        result.b_wins,
        result.draws,
        half * 2
    );
    std::io::stdout().flush().ok();
    result
}

fn negamax(depth: u32) -> AiConfig {
    AiConfig::with_depth(depth)
}

fn random() -> AiConfig {
    AiConfig {
        strategy: Strategy::Random,
        ..AiConfig::new()
    }
}

fn main() {
    env_logger::init();

    let max_depth: u32 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(4);

    println!("=== Draughts AI matchups (negamax depth 1..={max_depth}) ===");
    println!("Games per matchup: {GAMES_PER_MATCHUP}, max moves per game: {MAX_MOVES}\n");

    // Phase 1: every depth against the random player
    println!("--- Phase 1: negamax vs random ---\n");
    let opponent = random();
    for depth in 1..=max_depth {
        let label = format!("depth{depth}");
        run_matchup(&label, &negamax(depth), "random", &opponent, GAMES_PER_MATCHUP);
    }

    // Phase 2: each depth against the next one up. Negamax is deterministic,
    // so both games of a colour pairing repeat; two games suffice.
    println!("\n--- Phase 2: deeper vs shallower ---\n");
    let mut scores: Vec<(String, i32)> = Vec::new();
    for depth in 1..max_depth {
        let deeper = format!("depth{}", depth + 1);
        let shallower = format!("depth{depth}");
        let result = run_matchup(&deeper, &negamax(depth + 1), &shallower, &negamax(depth), 2);
        scores.push((deeper, result.a_wins as i32 - result.b_wins as i32));
    }

    println!("\n--- Net wins of the deeper search ---\n");
    for (label, net) in &scores {
        println!("  {net:>+3}  {label}");
    }
}
