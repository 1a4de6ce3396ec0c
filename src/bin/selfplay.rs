use draughts::controller::RobotController;
use draughts::engine::{decide_move, AiConfig, Strategy};
use draughts::movegen::outcome;
use draughts::piece::Color;

/// Drives a controller with boards a perfect camera would report: the opponent
/// side is played by a second engine, the computer's moves are executed as
/// planned. Each cycle's report is printed as a JSON line.
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let depth: u32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(4);
    let opponent = match args.next().as_deref() {
        Some("random") => AiConfig {
            strategy: Strategy::Random,
            ..AiConfig::new()
        },
        _ => AiConfig::with_depth(depth.saturating_sub(1).max(1)),
    };

    let mut controller = RobotController::new(Color::Black, AiConfig::with_depth(depth));
    let mut move_count = 0;

    while move_count < 200 {
        let game = controller.game().clone();
        let Some(turn) = game.turn() else {
            break;
        };

        let observed = if turn == controller.computer_color() {
            // Let the controller plan, then "execute" its move.
            let board = game.board();
            if let Err(e) = controller.update(&board, false) {
                eprintln!("controller failed: {e}");
                return;
            }
            match controller.report().computer_move {
                Some(mv) => outcome(&board, &mv),
                None => break,
            }
        } else {
            match decide_move(&game, turn, &opponent) {
                Ok(decision) => outcome(&game.board(), &decision.mv),
                Err(e) => {
                    eprintln!("opponent search failed: {e}");
                    return;
                }
            }
        };

        match controller.update(&observed, false) {
            Ok(result) => eprintln!("{turn:?}: {result:?}"),
            Err(e) => {
                eprintln!("controller failed: {e}");
                return;
            }
        }
        move_count += 1;

        match serde_json::to_string(&controller.report()) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("cannot encode report: {e}"),
        }
    }

    let report = controller.report();
    eprintln!(
        "Game over after {move_count} moves: {:?}, winner {:?}",
        report.status, report.winner
    );
}
