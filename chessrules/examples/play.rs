/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::io::{self, BufRead};

use clap::Parser;
use colored::Colorize;

use chessrules::{Game, Move};

/// Play moves through the rules engine, printing the board after each one.
///
/// Illegal moves are reported and skipped, and the same side stays to move.
#[derive(Debug, Parser)]
struct Cli {
    /// The FEN placements (and optional side to move) to start from.
    #[arg(short, long)]
    fen: Option<String>,

    /// Moves in UCI notation, such as `e2e3`. If none are given, they are read from stdin, one per line.
    moves: Vec<String>,

    /// Only print the final position.
    #[arg(short, long, default_value = "false")]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let mut game = if let Some(fen) = &args.fen {
        Game::from_fen(fen)?
    } else {
        Game::default()
    };

    let moves: Vec<String> = if args.moves.is_empty() {
        io::stdin().lock().lines().collect::<Result<_, _>>()?
    } else {
        args.moves
    };

    for mv_str in moves.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let side = game.side_to_move();
        let mv = match Move::from_uci(mv_str) {
            Ok(mv) => mv,
            Err(err) => {
                println!("{} {err}", "error:".red().bold());
                continue;
            }
        };

        match game.make_move_checked(mv) {
            Ok(()) => println!("{:#} plays {}", side, mv.to_string().green()),
            Err(reason) => println!("{:#} tried {}: {reason}", side, mv.to_string().red()),
        }

        if !args.quiet {
            println!("{}\n", game.board());
        }
    }

    println!("{}\n{}", game.board(), game.to_fen().bold());

    Ok(())
}
