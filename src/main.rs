//! # Interactive Chess Board
//!
//! Entry point for the terminal chess board. Two humans share the mouse:
//! click a piece to see its legal moves, click a destination to commit it
//! with a short animated transition and a sound cue. The rules engine
//! (legal moves, check and endgame detection, FEN/SAN) is the `shakmaty`
//! library behind the controller's rules seam.
//!
//! ## Usage
//! Run with `cargo run --release`. Pass `--fen` to start from a custom
//! position and `--muted` to disable sound cues.

use std::io;

use clap::Parser;
use colored::*;

use chessboard::app::App;
use chessboard::engine::ChessEngine;
use chessboard::rules::Rules;
use chessboard::tui;

#[derive(Parser)]
#[command(name = "play", version, about = "An interactive terminal chess board")]
struct Args {
    /// Start from this position instead of the standard starting layout
    #[arg(long)]
    fen: Option<String>,

    /// Disable move and check sound cues
    #[arg(long)]
    muted: bool,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let rules: Box<dyn Rules> = match &args.fen {
        Some(fen) => match ChessEngine::from_fen(fen) {
            Ok(engine) => Box::new(engine),
            Err(err) => {
                eprintln!("{} {}", "error:".red().bold(), err);
                std::process::exit(1);
            }
        },
        None => Box::new(ChessEngine::new()),
    };

    let mut app = App::new(
        rules,
        Box::new(|| Box::new(ChessEngine::new()) as Box<dyn Rules>),
        args.muted,
    );
    tui::run(&mut app)
}
