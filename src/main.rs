mod board;
mod minimax;
mod stats;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use log::info;
use rand::Rng;

use crate::board::{Board, Player, TerminalStatus};
use crate::minimax::Minimax;
use crate::stats::{GameStats, Outcome};

const AI: Player = Player::X;
const HUMAN: Player = Player::O;

// What the human's turn resolved to, beyond an applied move.
enum TurnAction {
    Moved,
    Restarted,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();
    print_welcome();

    let engine = Minimax::new(AI);
    let mut stats = GameStats::default();
    let mut board = Board::new();

    'session: loop {
        let ai_starts = match prompt_first_player()? {
            Some(choice) => choice,
            None => break,
        };
        board.reset();
        let mut ai_to_move = ai_starts;

        loop {
            println!("\n{}", board);

            match board.terminal_status() {
                TerminalStatus::Won(side) if side == AI => {
                    println!("\nAI wins with {}! Better luck next time.", AI.symbol());
                    stats.record(Outcome::AiWin);
                }
                TerminalStatus::Won(_) => {
                    println!(
                        "\nYou won with {}?! The search should make that impossible.",
                        HUMAN.symbol()
                    );
                    stats.record(Outcome::HumanWin);
                }
                TerminalStatus::Draw => {
                    println!("\nIt's a draw. Well played.");
                    stats.record(Outcome::Draw);
                }
                TerminalStatus::InProgress => {
                    if ai_to_move {
                        if !ai_turn(&engine, &mut board)? {
                            break 'session;
                        }
                    } else {
                        match human_turn(&mut board, &stats)? {
                            TurnAction::Moved => {}
                            TurnAction::Restarted => {
                                ai_to_move = ai_starts;
                                continue;
                            }
                            TurnAction::Quit => break 'session,
                        }
                    }
                    ai_to_move = !ai_to_move;
                    continue;
                }
            }

            // Game over: show the tally and offer a rematch.
            println!("\n{}", stats);
            if prompt_rematch()? {
                continue 'session;
            }
            break 'session;
        }
    }

    println!("\nFINAL {}", stats);
    println!("Thanks for playing!");
    Ok(())
}

fn print_welcome() {
    println!("==============================================");
    println!("  TIC-TAC-TOE vs. an exhaustive minimax AI");
    println!("==============================================");
    println!("AI plays {}, you play {}.", AI.symbol(), HUMAN.symbol());
    println!();
    println!("Enter moves as 'row col', both 0-2, e.g. '0 1' or '1,2'.");
    println!("Commands: 'quit'/'q'/'exit', 'stats', 'reset', 'help'.");
    println!("==============================================");
}

// Reads one trimmed, lowercased line; None on end of input.
fn read_line() -> Result<Option<String>> {
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_lowercase()))
}

fn prompt(message: &str) -> Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;
    read_line()
}

/// First-player menu. `Some(true)` means the AI opens, `None` means the
/// user wants to leave.
fn prompt_first_player() -> Result<Option<bool>> {
    println!("\nWho goes first?");
    println!("  1. You");
    println!("  2. AI");
    println!("  3. Random");

    let choice = match prompt("Choose (1/2/3) or 'quit': ")? {
        Some(choice) => choice,
        None => return Ok(None),
    };
    match choice.as_str() {
        "quit" | "q" | "exit" => Ok(None),
        "1" => {
            println!("You go first!");
            Ok(Some(false))
        }
        "2" => {
            println!("AI goes first!");
            Ok(Some(true))
        }
        "3" => {
            let ai_starts = rand::thread_rng().gen_bool(0.5);
            println!(
                "Random choice: {} first!",
                if ai_starts { "AI goes" } else { "you go" }
            );
            Ok(Some(ai_starts))
        }
        _ => {
            println!("Unrecognized choice, AI goes first.");
            Ok(Some(true))
        }
    }
}

/// Runs the search and applies its move. Returns `false` only on the
/// cannot-happen full-board case, ending the session instead of looping
/// forever.
fn ai_turn(engine: &Minimax, board: &mut Board) -> Result<bool> {
    println!("\nAI is thinking...");
    let result = engine.select_move(board);
    match result.cell {
        Some((row, col)) => {
            board.place(row, col, engine.side())?;
            info!("ai played ({}, {})", row, col);
            println!("AI chooses ({}, {})", row, col);
            println!(
                "  calculated in {:.3} s, {} positions examined",
                result.elapsed.as_secs_f64(),
                result.nodes_visited
            );
            Ok(true)
        }
        None => {
            println!("AI has no move available.");
            Ok(false)
        }
    }
}

/// Prompts until the human's input results in a placed mark, a board
/// restart, or a request to quit. All free-text parsing lives here; the
/// board only ever sees validated integers.
fn human_turn(board: &mut Board, stats: &GameStats) -> Result<TurnAction> {
    println!("\nYour turn ({})!", HUMAN.symbol());
    loop {
        let input = match prompt("Enter row and column (0-2): ")? {
            Some(input) => input,
            None => return Ok(TurnAction::Quit),
        };
        match input.as_str() {
            "quit" | "q" | "exit" => return Ok(TurnAction::Quit),
            "stats" => {
                println!("{}", stats);
                continue;
            }
            "reset" => {
                board.reset();
                println!("Board cleared, starting over.");
                return Ok(TurnAction::Restarted);
            }
            "help" => {
                println!("Enter coordinates like '0 1' or '1,2' or '2 0'.");
                continue;
            }
            _ => {}
        }

        let (row, col) = match parse_coordinates(&input) {
            Some(pair) => pair,
            None => {
                println!("Please enter exactly two numbers 0-2, e.g. '0 1' or '1,2'.");
                continue;
            }
        };
        match board.place(row, col, HUMAN) {
            Ok(()) => {
                println!("You placed {} at ({}, {})", HUMAN.symbol(), row, col);
                return Ok(TurnAction::Moved);
            }
            Err(err) => {
                println!("{}. Try again.", err);
            }
        }
    }
}

// Accepts 'row col' or 'row,col'. Range checking is the board's job.
fn parse_coordinates(input: &str) -> Option<(usize, usize)> {
    let fields: Vec<&str> = if input.contains(',') {
        input.split(',').map(str::trim).collect()
    } else {
        input.split_whitespace().collect()
    };
    if fields.len() != 2 {
        return None;
    }
    let row = fields[0].parse().ok()?;
    let col = fields[1].parse().ok()?;
    Some((row, col))
}

fn prompt_rematch() -> Result<bool> {
    match prompt("\nPlay again? Press Enter, or 'q' to quit: ")? {
        Some(answer) => Ok(!matches!(answer.as_str(), "q" | "quit" | "exit" | "n" | "no")),
        None => Ok(false),
    }
}
