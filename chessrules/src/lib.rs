/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

#![doc = include_str!("../README.md")]

pub use chessrules_types::*;

/// Piece placements on an `8x8` board, and the transformation that applies a move to them.
mod board;
/// A game in progress: board, side to move, selection, and the click-driven move flow.
mod game;
/// Structs for modeling the movement of a piece on a chessboard.
mod moves;
/// Utility functions for counting move sequences.
mod perft;
/// Whether a move is legal under each piece's movement rule.
mod rules;

pub use board::*;
pub use game::*;
pub use moves::*;
pub use perft::*;
pub use rules::*;

/// Re-exports all the things you'll need.
pub mod prelude {
    pub use crate::board::*;
    pub use crate::game::*;
    pub use crate::moves::*;
    pub use crate::perft::*;
    pub use crate::rules::*;
    pub use chessrules_types::*;
}
