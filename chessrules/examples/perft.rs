/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use chessrules::{perft, splitperft, Game, Move};

/// Count the move sequences the rules accept from a position, one depth at a time.
#[derive(Debug, Parser)]
struct Cli {
    /// Deepest level to count. Every level from 1 up to this one is reported.
    depth: usize,

    /// The FEN placements (and optional side to move) to count from.
    #[arg(short, long)]
    fen: Option<String>,

    /// Moves in UCI notation to play before counting. Each must be legal.
    #[arg(short, long, num_args = 1..)]
    moves: Vec<String>,

    /// At the deepest level, also print the count below each root move.
    #[arg(short, long, default_value = "false")]
    split: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let mut game = match &args.fen {
        Some(fen) => Game::from_fen(fen)?,
        None => Game::new(),
    };

    for (ply, uci) in args.moves.iter().enumerate() {
        let mv = Move::from_uci(uci)?;
        game.make_move_checked(mv)
            .with_context(|| format!("setup move #{} ({uci}) was refused in {game}", ply + 1))?;
    }

    println!("{game:?}\n");
    println!("{}", "depth\tnodes\ttime".bold());

    for depth in 1..=args.depth {
        let now = Instant::now();
        let nodes = if args.split && depth == args.depth {
            splitperft(&game, depth)
        } else {
            perft(&game, depth)
        };

        println!("{depth}\t{}\t{:.1?}", nodes.to_string().green(), now.elapsed());
    }

    Ok(())
}
