/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Result};

use super::Square;

/// Maximum number of moves any side can have on any board, reachable or not.
///
/// At most 16 pieces can move to a given square: the nearest piece along each of the 8 lines through it, and 8
/// Knights. Over 64 squares, that is 1024.
pub const MAX_NUM_MOVES: usize = 1024;

/// Maximum number of destinations a single piece can reach (a Queen in the center of an empty board).
pub const MAX_NUM_DESTINATIONS: usize = 27;

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_MOVES`] moves.
pub type MoveList = arrayvec::ArrayVec<Move, MAX_NUM_MOVES>;

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_DESTINATIONS`] squares.
pub type SquareList = arrayvec::ArrayVec<Square, MAX_NUM_DESTINATIONS>;

/// A proposed movement of whatever piece stands on `from` to `to`.
///
/// A [`Move`] carries no legality information of its own. See [`crate::check_legality_of`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    from: Square,
    to: Square,
}

impl Move {
    /// Creates a new [`Move`] from `from` to `to`.
    #[inline(always)]
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// Parses a [`Move`] from UCI notation, such as `"e2e3"`.
    ///
    /// # Example
    /// ```
    /// # use chessrules::{Move, Square};
    /// let mv = Move::from_uci("g1f3").unwrap();
    /// assert_eq!(mv, Move::new(Square::G1, Square::F3));
    /// assert!(Move::from_uci("g1").is_err());
    /// ```
    pub fn from_uci(uci: &str) -> Result<Self> {
        let uci = uci.trim();
        if uci.len() != 4 || !uci.is_ascii() {
            bail!("Move must be two squares, such as \"e2e3\". Found {uci:?}");
        }

        let from = Square::from_uci(&uci[0..2])?;
        let to = Square::from_uci(&uci[2..4])?;

        Ok(Self::new(from, to))
    }

    /// Fetches the source [`Square`] of this [`Move`].
    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// Fetches the destination [`Square`] of this [`Move`].
    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// Fetches the source and destination of this [`Move`].
    #[inline(always)]
    pub const fn parts(&self) -> (Square, Square) {
        (self.from, self.to)
    }

    /// Returns `true` if this move goes nowhere.
    #[inline(always)]
    pub fn is_null(&self) -> bool {
        self.from == self.to
    }

    /// Formats this [`Move`] in UCI notation.
    pub fn to_uci(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?} -> {:?})", self, self.from, self.to)
    }
}
