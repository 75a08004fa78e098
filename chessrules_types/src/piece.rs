/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Result};

/// Represents the color of a player, piece, square, etc. within a chess board.
///
/// Also used to denote whose turn it is to move.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Color {
    /// White pieces start on rows 6 and 7, and move toward row 0.
    #[default]
    White,

    /// Black pieces start on rows 0 and 1, and move toward row 7.
    Black,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::White, Self::Black]
    }

    /// Returns this color's opposite / inverse / enemy.
    ///
    /// # Example
    /// ```
    /// # use chessrules_types::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// The row step a Pawn of this color takes when advancing.
    ///
    /// # Example
    /// ```
    /// # use chessrules_types::Color;
    /// assert_eq!(Color::White.pawn_direction(), -1);
    /// assert_eq!(Color::Black.pawn_direction(), 1);
    /// ```
    #[inline(always)]
    pub const fn pawn_direction(&self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// Fetches a human-readable name for this color.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    /// Converts this color to a `usize` for indexing into arrays.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Self::White),
            "b" | "black" => Ok(Self::Black),
            _ => bail!("Color must be one of \"w\", \"b\", \"white\" or \"black\". Found {s:?}"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{}", self.name())
        } else {
            let c = match self {
                Self::White => 'w',
                Self::Black => 'b',
            };
            write!(f, "{c}")
        }
    }
}

/// Represents the kind (or "role") that a chess piece can be.
///
/// These have no [`Color`] associated with them. See [`Piece`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Number of piece kinds.
    pub const COUNT: usize = 6;

    /// An array of all six [`PieceKind`]s, starting with Pawn.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [
            Self::Pawn,
            Self::Knight,
            Self::Bishop,
            Self::Rook,
            Self::Queen,
            Self::King,
        ]
    }

    /// Creates a new [`PieceKind`] from its discriminant.
    ///
    /// An unknown discriminant means the data it was read from is corrupt, and is reported as an error.
    ///
    /// # Example
    /// ```
    /// # use chessrules_types::PieceKind;
    /// assert_eq!(PieceKind::from_index(3).unwrap(), PieceKind::Rook);
    /// assert!(PieceKind::from_index(6).is_err());
    /// ```
    pub fn from_index(index: u8) -> Result<Self> {
        match index {
            0 => Ok(Self::Pawn),
            1 => Ok(Self::Knight),
            2 => Ok(Self::Bishop),
            3 => Ok(Self::Rook),
            4 => Ok(Self::Queen),
            5 => Ok(Self::King),
            _ => bail!("Unrecognized piece kind tag {index}: valid tags are 0..{}", Self::COUNT),
        }
    }

    /// Creates a new [`PieceKind`] from a character, ignoring case.
    ///
    /// # Example
    /// ```
    /// # use chessrules_types::PieceKind;
    /// assert_eq!(PieceKind::from_char('n').unwrap(), PieceKind::Knight);
    /// assert_eq!(PieceKind::from_char('Q').unwrap(), PieceKind::Queen);
    /// assert!(PieceKind::from_char('x').is_err());
    /// ```
    pub fn from_char(kind: char) -> Result<Self> {
        match kind.to_ascii_lowercase() {
            'p' => Ok(Self::Pawn),
            'n' => Ok(Self::Knight),
            'b' => Ok(Self::Bishop),
            'r' => Ok(Self::Rook),
            'q' => Ok(Self::Queen),
            'k' => Ok(Self::King),
            _ => bail!("Unrecognized piece kind {kind:?}: expected one of \"pnbrqk\""),
        }
    }

    /// Converts this [`PieceKind`] to a `usize` for indexing into arrays.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Fetches the lowercase character for this [`PieceKind`].
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }

    /// Fetches a human-readable name for this [`PieceKind`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    /// Returns `true` if this kind moves along lines that other pieces can block (Rook, Bishop, Queen).
    #[inline(always)]
    pub const fn is_slider(&self) -> bool {
        matches!(self, Self::Rook | Self::Bishop | Self::Queen)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Represents a chess piece on the game board.
///
/// A [`Piece`] is a [`Color`] paired with a [`PieceKind`]. An empty square is modeled as
/// `Option::<Piece>::None`, never as a special piece.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    color: Color,
    kind: PieceKind,
}

impl Piece {
    /// Creates a new [`Piece`] from the given [`Color`] and [`PieceKind`].
    #[inline(always)]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Creates a new [`Piece`] from a character, as used in FEN placements.
    ///
    /// Uppercase is White, lowercase is Black.
    ///
    /// # Example
    /// ```
    /// # use chessrules_types::{Color, Piece, PieceKind};
    /// let white_rook = Piece::from_uci('R').unwrap();
    /// assert_eq!(white_rook, Piece::new(Color::White, PieceKind::Rook));
    ///
    /// let black_pawn = Piece::from_uci('p').unwrap();
    /// assert_eq!(black_pawn, Piece::new(Color::Black, PieceKind::Pawn));
    /// ```
    pub fn from_uci(piece: char) -> Result<Self> {
        let kind = PieceKind::from_char(piece)?;
        let color = if piece.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        Ok(Self::new(color, kind))
    }

    /// Fetches the [`Color`] of this [`Piece`].
    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Fetches the [`PieceKind`] of this [`Piece`].
    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Fetches the [`Color`] and [`PieceKind`] of this [`Piece`].
    #[inline(always)]
    pub const fn parts(&self) -> (Color, PieceKind) {
        (self.color, self.kind)
    }

    /// Returns `true` if this piece belongs to `color`.
    #[inline(always)]
    pub const fn is_owned_by(&self, color: Color) -> bool {
        self.color as u8 == color as u8
    }

    /// Fetches the character for this [`Piece`]: uppercase if White, lowercase if Black.
    ///
    /// # Example
    /// ```
    /// # use chessrules_types::{Color, Piece, PieceKind};
    /// assert_eq!(Piece::new(Color::White, PieceKind::Queen).char(), 'Q');
    /// assert_eq!(Piece::new(Color::Black, PieceKind::Queen).char(), 'q');
    /// ```
    #[inline(always)]
    pub const fn char(&self) -> char {
        let c = self.kind.char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

impl FromStr for Piece {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_uci(c),
            _ => bail!("Piece must be a single character. Found {s:?}"),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{:#} {}", self.color, self.kind)
        } else {
            write!(f, "{}", self.char())
        }
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:#}")
    }
}
