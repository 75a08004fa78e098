/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Result};

/// Represents a single square on an `8x8` chess board, addressed by `(row, col)`.
///
/// Row `0` is Black's back rank and row `7` is White's. Column `0` is the a-file.
/// Internally this is stored as `row * 8 + col`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Square(u8);

impl Square {
    /// Number of squares on the board.
    pub const COUNT: usize = 64;

    /// Width (and height) of the board.
    pub const SIDE: u8 = 8;

    pub const A8: Self = Self::new_unchecked(0, 0);
    pub const B8: Self = Self::new_unchecked(0, 1);
    pub const C8: Self = Self::new_unchecked(0, 2);
    pub const D8: Self = Self::new_unchecked(0, 3);
    pub const E8: Self = Self::new_unchecked(0, 4);
    pub const F8: Self = Self::new_unchecked(0, 5);
    pub const G8: Self = Self::new_unchecked(0, 6);
    pub const H8: Self = Self::new_unchecked(0, 7);
    pub const A7: Self = Self::new_unchecked(1, 0);
    pub const B7: Self = Self::new_unchecked(1, 1);
    pub const C7: Self = Self::new_unchecked(1, 2);
    pub const D7: Self = Self::new_unchecked(1, 3);
    pub const E7: Self = Self::new_unchecked(1, 4);
    pub const F7: Self = Self::new_unchecked(1, 5);
    pub const G7: Self = Self::new_unchecked(1, 6);
    pub const H7: Self = Self::new_unchecked(1, 7);
    pub const A6: Self = Self::new_unchecked(2, 0);
    pub const B6: Self = Self::new_unchecked(2, 1);
    pub const C6: Self = Self::new_unchecked(2, 2);
    pub const D6: Self = Self::new_unchecked(2, 3);
    pub const E6: Self = Self::new_unchecked(2, 4);
    pub const F6: Self = Self::new_unchecked(2, 5);
    pub const G6: Self = Self::new_unchecked(2, 6);
    pub const H6: Self = Self::new_unchecked(2, 7);
    pub const A5: Self = Self::new_unchecked(3, 0);
    pub const B5: Self = Self::new_unchecked(3, 1);
    pub const C5: Self = Self::new_unchecked(3, 2);
    pub const D5: Self = Self::new_unchecked(3, 3);
    pub const E5: Self = Self::new_unchecked(3, 4);
    pub const F5: Self = Self::new_unchecked(3, 5);
    pub const G5: Self = Self::new_unchecked(3, 6);
    pub const H5: Self = Self::new_unchecked(3, 7);
    pub const A4: Self = Self::new_unchecked(4, 0);
    pub const B4: Self = Self::new_unchecked(4, 1);
    pub const C4: Self = Self::new_unchecked(4, 2);
    pub const D4: Self = Self::new_unchecked(4, 3);
    pub const E4: Self = Self::new_unchecked(4, 4);
    pub const F4: Self = Self::new_unchecked(4, 5);
    pub const G4: Self = Self::new_unchecked(4, 6);
    pub const H4: Self = Self::new_unchecked(4, 7);
    pub const A3: Self = Self::new_unchecked(5, 0);
    pub const B3: Self = Self::new_unchecked(5, 1);
    pub const C3: Self = Self::new_unchecked(5, 2);
    pub const D3: Self = Self::new_unchecked(5, 3);
    pub const E3: Self = Self::new_unchecked(5, 4);
    pub const F3: Self = Self::new_unchecked(5, 5);
    pub const G3: Self = Self::new_unchecked(5, 6);
    pub const H3: Self = Self::new_unchecked(5, 7);
    pub const A2: Self = Self::new_unchecked(6, 0);
    pub const B2: Self = Self::new_unchecked(6, 1);
    pub const C2: Self = Self::new_unchecked(6, 2);
    pub const D2: Self = Self::new_unchecked(6, 3);
    pub const E2: Self = Self::new_unchecked(6, 4);
    pub const F2: Self = Self::new_unchecked(6, 5);
    pub const G2: Self = Self::new_unchecked(6, 6);
    pub const H2: Self = Self::new_unchecked(6, 7);
    pub const A1: Self = Self::new_unchecked(7, 0);
    pub const B1: Self = Self::new_unchecked(7, 1);
    pub const C1: Self = Self::new_unchecked(7, 2);
    pub const D1: Self = Self::new_unchecked(7, 3);
    pub const E1: Self = Self::new_unchecked(7, 4);
    pub const F1: Self = Self::new_unchecked(7, 5);
    pub const G1: Self = Self::new_unchecked(7, 6);
    pub const H1: Self = Self::new_unchecked(7, 7);

    /// Creates a new [`Square`] from a row and column, failing if either lies outside `[0, 7]`.
    ///
    /// # Example
    /// ```
    /// # use chessrules_types::Square;
    /// assert_eq!(Square::new(6, 4).unwrap(), Square::E2);
    /// assert!(Square::new(8, 0).is_err());
    /// ```
    pub fn new(row: u8, col: u8) -> Result<Self> {
        if row >= Self::SIDE || col >= Self::SIDE {
            bail!("Square ({row}, {col}) is off the board: rows and columns must be in [0, 7]");
        }
        Ok(Self::new_unchecked(row, col))
    }

    /// Creates a new [`Square`] without checking bounds.
    ///
    /// Only use this when `row` and `col` are known to be in `[0, 7]`.
    #[inline(always)]
    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        Self(row * Self::SIDE + col)
    }

    /// Fetches the row of this [`Square`].
    #[inline(always)]
    pub const fn row(&self) -> u8 {
        self.0 / Self::SIDE
    }

    /// Fetches the column of this [`Square`].
    #[inline(always)]
    pub const fn col(&self) -> u8 {
        self.0 % Self::SIDE
    }

    /// Fetches the `(row, col)` pair of this [`Square`].
    #[inline(always)]
    pub const fn coords(&self) -> (u8, u8) {
        (self.row(), self.col())
    }

    /// Converts this [`Square`] to a `usize` for indexing into 64-element arrays.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns the square `row_step` rows and `col_step` columns away, if it is on the board.
    ///
    /// # Example
    /// ```
    /// # use chessrules_types::Square;
    /// assert_eq!(Square::E2.offset(-1, 0), Some(Square::E3));
    /// assert_eq!(Square::A1.offset(0, -1), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, row_step: i8, col_step: i8) -> Option<Self> {
        let row = self.row() as i8 + row_step;
        let col = self.col() as i8 + col_step;
        if row < 0 || row >= Self::SIDE as i8 || col < 0 || col >= Self::SIDE as i8 {
            None
        } else {
            Some(Self::new_unchecked(row as u8, col as u8))
        }
    }

    /// Computes the signed `(row, col)` displacement from `self` to `to`.
    ///
    /// # Example
    /// ```
    /// # use chessrules_types::Square;
    /// assert_eq!(Square::G1.delta(Square::F3), (-2, -1));
    /// ```
    #[inline(always)]
    pub const fn delta(&self, to: Self) -> (i8, i8) {
        (
            to.row() as i8 - self.row() as i8,
            to.col() as i8 - self.col() as i8,
        )
    }

    /// An iterator over all squares, row by row, starting at [`Square::A8`].
    #[inline(always)]
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..Self::COUNT as u8).map(Self)
    }

    /// Parses a [`Square`] from algebraic notation, such as `"e2"`.
    ///
    /// # Example
    /// ```
    /// # use chessrules_types::Square;
    /// assert_eq!(Square::from_uci("e2").unwrap(), Square::E2);
    /// assert_eq!(Square::from_uci("a8").unwrap(), Square::new(0, 0).unwrap());
    /// assert!(Square::from_uci("i9").is_err());
    /// ```
    pub fn from_uci(square: &str) -> Result<Self> {
        let mut chars = square.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("Square must be a file and a rank, such as \"e2\". Found {square:?}");
        };

        let col = match file {
            'a'..='h' => file as u8 - b'a',
            _ => bail!("Invalid file {file:?} in square {square:?}: must be in 'a'..='h'"),
        };

        let rank = rank
            .to_digit(10)
            .filter(|r| (1..=8).contains(r))
            .ok_or(anyhow!("Invalid rank {rank:?} in square {square:?}: must be in 1..=8"))?;

        Self::new(Self::SIDE - rank as u8, col)
    }

    /// Formats this [`Square`] in algebraic notation, such as `"e2"`.
    pub fn to_uci(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col()) as char;
        let rank = Self::SIDE - self.row();
        write!(f, "{file}{rank}")
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({}, {})", self.row(), self.col())
    }
}
