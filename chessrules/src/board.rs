/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use anyhow::{bail, Result};

use super::{Color, Move, Piece, PieceKind, Square};

/// FEN piece placements for the standard starting position.
pub const FEN_STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Represents all pieces and their locations on a chess board.
///
/// Has no knowledge of whose turn it is. If you need that, see [`crate::Game`].
///
/// Internally an `8x8` grid of `Option<Piece>`, indexed by [`Square`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    mailbox: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// Creates a new, empty [`Board`] containing no pieces.
    ///
    /// # Example
    /// ```
    /// # use chessrules::Board;
    /// let board = Board::new();
    /// assert_eq!(board.to_fen(), "8/8/8/8/8/8/8/8");
    /// ```
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            mailbox: [[None; 8]; 8],
        }
    }

    /// Constructs a [`Board`] from the piece placements of a FEN string.
    ///
    /// Anything after the first space (side to move, castling, etc.) is ignored.
    /// The first rank in the string is row `0`.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut board = Self::new();

        let placements = fen.split_whitespace().next().unwrap_or_default();

        if placements.matches('/').count() != 7 {
            bail!("Missing placements for all 8 ranks. Found {placements:?}");
        }

        for (row, rank) in placements.split('/').enumerate() {
            let mut col = 0;

            for piece_char in rank.chars() {
                if col > Square::SIDE {
                    break;
                }

                if let Some(empty) = piece_char.to_digit(10) {
                    if !(1..=8).contains(&empty) {
                        bail!("Empty-square count must be in 1..=8. Found {empty} in rank {rank:?}");
                    }
                    col += empty as u8;
                } else {
                    let piece = Piece::from_uci(piece_char)?;
                    let square = Square::new(row as u8, col)?;
                    board.place(piece, square);
                    col += 1;
                }
            }

            if col != Square::SIDE {
                bail!("Rank {rank:?} describes {col} squares; every rank must describe exactly 8");
            }
        }

        Ok(board)
    }

    /// Generates the FEN piece placements of this [`Board`].
    pub fn to_fen(&self) -> String {
        let ranks = self.mailbox.iter().map(|rank| {
            let mut placements = String::with_capacity(8);
            let mut empty_spaces = 0;

            for cell in rank {
                if let Some(piece) = cell {
                    if empty_spaces != 0 {
                        placements += &empty_spaces.to_string();
                        empty_spaces = 0;
                    }
                    placements.push(piece.char());
                } else {
                    empty_spaces += 1;
                }
            }

            if empty_spaces != 0 {
                placements += &empty_spaces.to_string();
            }
            placements
        });

        ranks.collect::<Vec<_>>().join("/")
    }

    /// Returns `true` if there is a piece at the given [`Square`], else `false`.
    ///
    /// # Example
    /// ```
    /// # use chessrules::{Board, Square};
    /// let board = Board::default();
    /// assert!(board.has(Square::B1));
    /// assert!(!board.has(Square::E4));
    /// ```
    #[inline(always)]
    pub const fn has(&self, square: Square) -> bool {
        self.piece_at(square).is_some()
    }

    /// Fetches the [`Piece`] at the provided [`Square`], if there is one.
    ///
    /// # Example
    /// ```
    /// # use chessrules::{Board, Color, PieceKind, Square};
    /// let board = Board::default();
    /// let piece = board.piece_at(Square::A2).unwrap();
    /// assert_eq!(piece.parts(), (Color::White, PieceKind::Pawn));
    /// assert!(board.piece_at(Square::E4).is_none());
    /// ```
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.mailbox[square.row() as usize][square.col() as usize]
    }

    /// Fetches the [`Color`] of the piece at the provided [`Square`], if there is one.
    #[inline(always)]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.piece_at(square).map(|piece| piece.color())
    }

    /// Fetches the [`PieceKind`] of the piece at the provided [`Square`], if there is one.
    #[inline(always)]
    pub fn kind_at(&self, square: Square) -> Option<PieceKind> {
        self.piece_at(square).map(|piece| piece.kind())
    }

    /// Places the provided [`Piece`] on the supplied [`Square`], replacing whatever was there.
    ///
    /// # Example
    /// ```
    /// # use chessrules::{Board, Piece, PieceKind, Color, Square};
    /// let white_knight = Piece::new(Color::White, PieceKind::Knight);
    /// let mut board = Board::new();
    /// board.place(white_knight, Square::C4);
    /// assert_eq!(board.to_fen(), "8/8/8/8/2N5/8/8/8");
    /// ```
    #[inline(always)]
    pub fn place(&mut self, piece: Piece, square: Square) {
        self[square] = Some(piece);
    }

    /// Takes the [`Piece`] from a given [`Square`], if there is one present.
    ///
    /// # Example
    /// ```
    /// # use chessrules::{Board, Piece, PieceKind, Color, Square};
    /// let mut board = Board::from_fen("k7/8/8/8/2N5/8/8/7K").unwrap();
    /// let taken = board.take(Square::C4);
    /// assert_eq!(board.to_fen(), "k7/8/8/8/8/8/8/7K");
    /// assert_eq!(taken, Some(Piece::new(Color::White, PieceKind::Knight)));
    /// ```
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self[square].take()
    }

    /// Clears the supplied [`Square`] of any pieces.
    #[inline(always)]
    pub fn clear(&mut self, square: Square) {
        self.take(square);
    }

    /// Number of pieces belonging to `color`.
    ///
    /// # Example
    /// ```
    /// # use chessrules::{Board, Color};
    /// let board = Board::default();
    /// assert_eq!(board.count(Color::White), 16);
    /// assert_eq!(board.count(Color::Black), 16);
    /// ```
    pub fn count(&self, color: Color) -> usize {
        self.iter()
            .filter(|(_, piece)| piece.is_owned_by(color))
            .count()
    }

    /// An iterator over every occupied [`Square`] and the [`Piece`] on it, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.piece_at(square).map(|piece| (square, piece)))
    }

    /// Moves the piece on `mv.from()` to `mv.to()`, capturing anything already there. No enforcement of legality.
    ///
    /// Returns the captured piece, if any. If there is no piece on `mv.from()`, the board is left unchanged.
    ///
    /// # Example
    /// ```
    /// # use chessrules::{Board, Move, Square};
    /// let mut board = Board::default();
    /// board.make_move(Move::new(Square::E2, Square::E3));
    /// assert!(!board.has(Square::E2));
    /// assert!(board.has(Square::E3));
    /// ```
    pub fn make_move(&mut self, mv: Move) -> Option<Piece> {
        let piece = self.take(mv.from())?;
        let captured = self.take(mv.to());
        self.place(piece, mv.to());
        captured
    }

    /// Copies `self` and returns a [`Board`] after having applied the provided [`Move`].
    #[inline(always)]
    pub fn with_move_made(&self, mv: Move) -> Self {
        let mut copied = *self;
        copied.make_move(mv);
        copied
    }
}

impl Default for Board {
    /// The standard starting layout.
    fn default() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Self::new();
        for (col, kind) in BACK_RANK.into_iter().enumerate() {
            let col = col as u8;
            board.place(Piece::new(Color::Black, kind), Square::new_unchecked(0, col));
            board.place(Piece::new(Color::Black, PieceKind::Pawn), Square::new_unchecked(1, col));
            board.place(Piece::new(Color::White, PieceKind::Pawn), Square::new_unchecked(6, col));
            board.place(Piece::new(Color::White, kind), Square::new_unchecked(7, col));
        }
        board
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self.mailbox[index.row() as usize][index.col() as usize]
    }
}

impl IndexMut<Square> for Board {
    #[inline(always)]
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self.mailbox[index.row() as usize][index.col() as usize]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, rank) in self.mailbox.iter().enumerate() {
            write!(f, "{}|", Square::SIDE as usize - row)?;
            for cell in rank {
                let occupant = cell.map(|piece| piece.char()).unwrap_or('.');
                write!(f, " {occupant}")?;
            }
            writeln!(f)?;
        }

        write!(f, " +")?;
        for _ in 0..Square::SIDE {
            write!(f, "--")?;
        }
        write!(f, "\n   ")?;
        for file in 'a'..='h' {
            write!(f, "{file} ")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{self}", self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_board_is_the_standard_layout() {
        let board = Board::default();
        assert_eq!(board.to_fen(), FEN_STARTPOS);
        assert_eq!(board, Board::from_fen(FEN_STARTPOS).unwrap());
        assert_eq!(board.iter().count(), 32);

        for col in 0..8 {
            let black_pawn = board.piece_at(Square::new(1, col).unwrap()).unwrap();
            let white_pawn = board.piece_at(Square::new(6, col).unwrap()).unwrap();
            assert_eq!(black_pawn.parts(), (Color::Black, PieceKind::Pawn));
            assert_eq!(white_pawn.parts(), (Color::White, PieceKind::Pawn));
        }

        assert_eq!(board.kind_at(Square::D1), Some(PieceKind::Queen));
        assert_eq!(board.kind_at(Square::E8), Some(PieceKind::King));
    }

    #[test]
    fn fen_roundtrip() {
        let fen = "r3k2r/pppp1ppp/8/4p3/8/8/PPPPPPPP/R3K2R";
        assert_eq!(Board::from_fen(fen).unwrap().to_fen(), fen);

        let with_extras = "8/8/8/3q4/8/8/8/8 b - - 0 1";
        assert_eq!(Board::from_fen(with_extras).unwrap().to_fen(), "8/8/8/3q4/8/8/8/8");
    }

    #[test]
    fn malformed_fen_is_rejected() {
        assert!(Board::from_fen("").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("9/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("7/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("8/8/8/8/8/8/8/7x").is_err());
    }

    #[test]
    fn zero_length_empty_runs_are_rejected() {
        assert!(Board::from_fen("08/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("4004/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("r06r/8/8/8/8/8/8/8").is_err());
        assert!(Board::from_fen("r6r/8/8/8/8/8/8/8").is_ok());
    }

    #[test]
    fn making_a_move_clears_the_origin_and_captures() {
        let mut board = Board::from_fen("8/8/8/3q4/8/8/3R4/8").unwrap();
        let captured = board.make_move(Move::new(Square::D2, Square::D5));

        assert_eq!(captured, Some(Piece::new(Color::Black, PieceKind::Queen)));
        assert!(!board.has(Square::D2));
        assert_eq!(board.color_at(Square::D5), Some(Color::White));
        assert_eq!(board.count(Color::Black), 0);
    }

    #[test]
    fn making_a_move_from_an_empty_square_does_nothing() {
        let board = Board::default();
        assert_eq!(board.with_move_made(Move::new(Square::E4, Square::E5)), board);
    }

    #[test]
    fn display_draws_row_zero_first() {
        let board = Board::default();
        let drawn = board.to_string();
        let mut lines = drawn.lines();
        assert_eq!(lines.next(), Some("8| r n b q k b n r"));
        assert_eq!(lines.nth(6), Some("1| R N B Q K B N R"));
    }
}
