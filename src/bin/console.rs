use std::io::{self, BufRead, Write};

use draughts::engine::{decide_move, AiConfig};
use draughts::game::{Game, Status};
use draughts::moves::Move;
use draughts::piece::Color;

fn print_options(game: &Game) {
    let options: Vec<String> = game.legal_moves().iter().map(Move::to_string).collect();
    println!("Legal moves: {}", options.join(" "));
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let human = match args.next().as_deref() {
        Some("black") => Color::Black,
        _ => Color::White,
    };
    let depth: u32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(6);
    let config = AiConfig::with_depth(depth);

    println!("You play {human:?}. Enter moves like 21-17 or 29x22x15, 'quit' to stop.");
    let mut game = Game::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while let Some(turn) = game.turn() {
        println!("\n{}", game.board());
        let points = game.points();
        println!("Points: White {}, Black {}", points.white, points.black);

        if turn != human {
            match decide_move(&game, turn, &config) {
                Ok(decision) => {
                    println!("Computer plays {} (value {})", decision.mv, decision.value);
                    if let Err(e) = game.apply(&decision.mv) {
                        eprintln!("{e}");
                        return;
                    }
                }
                Err(e) => {
                    eprintln!("{e}");
                    return;
                }
            }
            continue;
        }

        print_options(&game);
        print!("{turn:?} to move> ");
        io::stdout().flush().ok();
        let Some(Ok(line)) = lines.next() else {
            return;
        };
        let line = line.trim();
        if line == "quit" {
            return;
        }
        match Move::from_notation(line, &game.legal_moves()) {
            Ok(mv) => {
                if let Err(e) = game.apply(&mv) {
                    println!("{e}");
                }
            }
            Err(e) => println!("{e}"),
        }
    }

    println!("\n{}", game.board());
    match (game.status(), game.winner()) {
        (Status::Won, Some(winner)) if winner == human => println!("You win!"),
        (Status::Won, Some(_)) => println!("The computer wins."),
        _ => println!("Draw by repetition."),
    }
}
