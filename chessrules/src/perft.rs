/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::Game;

/// Counts every sequence of `depth` legal moves playable from `game`.
///
/// There is no notion of check here, so sequences that capture a King keep going.
///
/// # Example
/// ```
/// # use chessrules::{perft, Game};
/// let game = Game::new();
/// assert_eq!(perft(&game, 1), 12);
/// assert_eq!(perft(&game, 2), 144);
/// ```
pub fn perft(game: &Game, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    // Recursively accumulate the nodes from the remaining depths
    game.legal_moves().into_iter().fold(0, |nodes, mv| {
        nodes + perft(&game.with_move_made(mv), depth - 1)
    })
}

/// Like [`perft`], but prints the node count reachable after each root move.
///
/// Returns the total.
pub fn splitperft(game: &Game, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut total = 0;
    for mv in game.legal_moves() {
        let nodes = perft(&game.with_move_made(mv), depth - 1);
        println!("{mv}\t{nodes}");
        total += nodes;
    }

    total
}
