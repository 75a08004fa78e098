/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Deref, str::FromStr};

use anyhow::Result;
use log::{debug, trace};

use super::{check_legality_of, legal_moves, Board, Color, IllegalMove, Move, MoveList, Square};

/// What happened as a result of a [`Game::click`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Click {
    /// Nothing was selected, and the clicked square did not hold a piece of the side to move.
    Ignored,

    /// A piece belonging to the side to move is now selected.
    Selected(Square),

    /// The selected piece moved, and the turn passed to the other side.
    Moved(Move),

    /// The selected piece could not move to the clicked square. The selection has been cleared.
    Rejected(Move, IllegalMove),
}

/// A game in progress: the [`Board`], whose turn it is, and which piece (if any) is selected.
///
/// This is the only place board state changes. Every change goes through [`check_legality_of`] first,
/// and the side to move flips exactly once per accepted move.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Game {
    /// The current piece placements.
    board: Board,

    /// The [`Color`] of the current player.
    side_to_move: Color,

    /// The square of the piece picked up by the last click, if any.
    selected: Option<Square>,

    /// Once set, no further moves are accepted.
    over: bool,
}

impl Game {
    /// Creates a new [`Game`] at the standard starting position, with White to move.
    pub fn new() -> Self {
        Self::from_board(Board::default(), Color::White)
    }

    /// Creates a new [`Game`] from the provided [`Board`] and side to move.
    pub const fn from_board(board: Board, side_to_move: Color) -> Self {
        Self {
            board,
            side_to_move,
            selected: None,
            over: false,
        }
    }

    /// Creates a new [`Game`] from a FEN string.
    ///
    /// Only the piece placements and the (optional) side to move are read. The side to move defaults to White.
    ///
    /// # Example
    /// ```
    /// # use chessrules::{Color, Game};
    /// let game = Game::from_fen("4k3/8/8/8/8/8/8/4K3 b").unwrap();
    /// assert_eq!(game.side_to_move(), Color::Black);
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut split = fen.split_whitespace();
        let board = Board::from_fen(split.next().unwrap_or_default())?;
        let side_to_move = split.next().unwrap_or("w").parse()?;

        Ok(Self::from_board(board, side_to_move))
    }

    /// Generates a FEN string of the placements and side to move.
    pub fn to_fen(&self) -> String {
        format!("{} {}", self.board.to_fen(), self.side_to_move)
    }

    /// Fetches this game's [`Board`].
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the current player as a [`Color`].
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the square of the currently selected piece, if any.
    #[inline(always)]
    pub const fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// Returns `true` if the game has been ended with [`Game::end`].
    #[inline(always)]
    pub const fn is_over(&self) -> bool {
        self.over
    }

    /// Ends the game. All further clicks are ignored and all further moves are refused.
    pub fn end(&mut self) {
        debug!("Game ended with {:#} to move", self.side_to_move);
        self.over = true;
        self.selected = None;
    }

    /// Checks that the piece on `square` may be picked up by the side to move.
    ///
    /// This is separate from the capture-time check in [`check_legality_of`]: that one asks about the destination,
    /// this one asks about the source.
    pub fn check_ownership_of(&self, square: Square) -> Result<(), IllegalMove> {
        if self.over {
            return Err(IllegalMove::GameOver);
        }

        let Some(piece) = self.board.piece_at(square) else {
            return Err(IllegalMove::NoPiece(square));
        };

        if !piece.is_owned_by(self.side_to_move) {
            return Err(IllegalMove::NotYourPiece {
                square,
                owner: piece.color(),
            });
        }

        Ok(())
    }

    /// Selects the piece on `square`, if it belongs to the side to move.
    ///
    /// On failure, the current selection is left as it was.
    ///
    /// # Example
    /// ```
    /// # use chessrules::{Game, Square};
    /// let mut game = Game::new();
    /// assert!(game.select(Square::E7).is_err());
    /// assert!(game.select(Square::E2).is_ok());
    /// assert_eq!(game.selected(), Some(Square::E2));
    /// ```
    pub fn select(&mut self, square: Square) -> Result<(), IllegalMove> {
        self.check_ownership_of(square)?;
        debug!("{:#} selected {square}", self.side_to_move);
        self.selected = Some(square);
        Ok(())
    }

    /// Clears the current selection.
    #[inline(always)]
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Handles a click on `square`.
    ///
    /// With nothing selected, a click on a piece of the side to move selects it, and any other click is ignored.
    /// With a piece selected, a click attempts to move it to `square`. The selection is cleared whether or not the
    /// move is accepted.
    ///
    /// # Example
    /// ```
    /// # use chessrules::{Click, Color, Game, Move, Square};
    /// let mut game = Game::new();
    /// assert_eq!(game.click(Square::E2), Click::Selected(Square::E2));
    /// assert_eq!(game.click(Square::E3), Click::Moved(Move::new(Square::E2, Square::E3)));
    /// assert_eq!(game.side_to_move(), Color::Black);
    /// ```
    pub fn click(&mut self, square: Square) -> Click {
        if self.over {
            return Click::Ignored;
        }

        let Some(from) = self.selected.take() else {
            return match self.select(square) {
                Ok(()) => Click::Selected(square),
                Err(_) => Click::Ignored,
            };
        };

        let mv = Move::new(from, square);
        match self.make_move_checked(mv) {
            Ok(()) => Click::Moved(mv),
            Err(reason) => Click::Rejected(mv, reason),
        }
    }

    /// Applies `mv` if the side to move owns the moving piece and the move is legal.
    ///
    /// On success the board is updated and the turn passes to the opponent. On failure nothing changes.
    pub fn make_move_checked(&mut self, mv: Move) -> Result<(), IllegalMove> {
        let verdict = self
            .check_ownership_of(mv.from())
            .and_then(|()| check_legality_of(&self.board, self.side_to_move, mv));

        if let Err(reason) = verdict {
            debug!("Rejected {mv} for {:#}: {reason}", self.side_to_move);
            return Err(reason);
        }

        self.make_move(mv);
        Ok(())
    }

    /// Applies the move and passes the turn. No enforcement of legality.
    pub fn make_move(&mut self, mv: Move) {
        if let Some(captured) = self.board.make_move(mv) {
            trace!("{mv} captured {captured:#}");
        }
        trace!("{:#} played {mv}", self.side_to_move);

        self.selected = None;
        self.toggle_side_to_move();
    }

    /// Copies `self` and returns a [`Game`] after having applied the provided [`Move`].
    #[inline(always)]
    pub fn with_move_made(&self, mv: Move) -> Self {
        let mut copied = *self;
        copied.make_move(mv);
        copied
    }

    /// Toggles the current player from White to Black (or vice versa).
    #[inline(always)]
    pub fn toggle_side_to_move(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
    }

    /// Every legal move for the side to move. Empty once the game is over.
    pub fn legal_moves(&self) -> MoveList {
        if self.over {
            return MoveList::new();
        }
        legal_moves(&self.board, self.side_to_move)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Game {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl Deref for Game {
    type Target = Board;
    fn deref(&self) -> &Self::Target {
        &self.board
    }
}

impl fmt::Display for Game {
    /// Display this game's FEN string
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        writeln!(f, "     Side: {:#}", self.side_to_move)?;
        let selected = self
            .selected
            .map(|square| square.to_uci())
            .unwrap_or(String::from("-"));
        write!(f, " Selected: {selected}")?;
        if self.over {
            write!(f, "\n Game over")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PieceKind, FEN_STARTPOS};

    fn mv(uci: &str) -> Move {
        Move::from_uci(uci).unwrap()
    }

    #[test]
    fn new_game_starts_with_white() {
        let game = Game::new();
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.to_fen(), format!("{FEN_STARTPOS} w"));
        assert_eq!(game.selected(), None);
        assert!(!game.is_over());
    }

    #[test]
    fn rejected_moves_change_nothing() {
        let mut game = Game::new();
        let before = game;

        assert!(matches!(
            game.make_move_checked(mv("e2e4")),
            Err(IllegalMove::Unreachable {
                kind: PieceKind::Pawn,
                ..
            })
        ));
        assert_eq!(game, before);
    }

    #[test]
    fn accepted_moves_flip_the_side_once() {
        let mut game = Game::new();
        game.make_move_checked(mv("g1f3")).unwrap();
        assert_eq!(game.side_to_move(), Color::Black);
        assert_eq!(game.kind_at(Square::F3), Some(PieceKind::Knight));
        assert!(!game.has(Square::G1));

        game.make_move_checked(mv("g8f6")).unwrap();
        assert_eq!(game.side_to_move(), Color::White);
    }

    #[test]
    fn cannot_move_the_opponents_pieces() {
        let mut game = Game::new();
        assert_eq!(
            game.make_move_checked(mv("e7e6")),
            Err(IllegalMove::NotYourPiece {
                square: Square::E7,
                owner: Color::Black,
            })
        );
        assert_eq!(game.side_to_move(), Color::White);
    }

    #[test]
    fn clicking_an_empty_or_enemy_square_first_is_ignored() {
        let mut game = Game::new();
        assert_eq!(game.click(Square::E4), Click::Ignored);
        assert_eq!(game.click(Square::E7), Click::Ignored);
        assert_eq!(game.selected(), None);
    }

    #[test]
    fn a_rejected_click_clears_the_selection() {
        let mut game = Game::new();
        assert_eq!(game.click(Square::A1), Click::Selected(Square::A1));
        assert_eq!(
            game.click(Square::A3),
            Click::Rejected(
                mv("a1a3"),
                IllegalMove::Blocked {
                    from: Square::A1,
                    to: Square::A3,
                    blocker: Square::A2,
                }
            )
        );
        assert_eq!(game.selected(), None);
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(*game.board(), Board::default());
    }

    #[test]
    fn clicking_an_own_piece_while_selected_is_a_rejected_move() {
        let mut game = Game::new();
        game.click(Square::B1);
        assert_eq!(
            game.click(Square::D2),
            Click::Rejected(mv("b1d2"), IllegalMove::CapturesOwnPiece(Square::D2))
        );
        assert_eq!(game.selected(), None);
    }

    #[test]
    fn deselecting_lets_the_next_click_select_again() {
        let mut game = Game::new();
        game.select(Square::B1).unwrap();
        game.deselect();
        assert_eq!(game.selected(), None);

        // Without the selection, a click on another own piece picks it up instead of moving b1 there.
        assert_eq!(game.click(Square::G1), Click::Selected(Square::G1));
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(*game.board(), Board::default());
    }

    #[test]
    fn ended_games_refuse_everything() {
        let mut game = Game::new();
        game.click(Square::E2);
        game.end();

        assert!(game.is_over());
        assert_eq!(game.selected(), None);
        assert_eq!(game.click(Square::E2), Click::Ignored);
        assert_eq!(game.make_move_checked(mv("e2e3")), Err(IllegalMove::GameOver));
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn fen_side_to_move() {
        let game = Game::from_fen("4k3/8/8/8/8/8/8/4K3").unwrap();
        assert_eq!(game.side_to_move(), Color::White);

        let game: Game = "4k3/8/8/8/8/8/8/4K3 b".parse().unwrap();
        assert_eq!(game.side_to_move(), Color::Black);
        assert_eq!(game.to_string(), "4k3/8/8/8/8/8/8/4K3 b");

        assert!(Game::from_fen("4k3/8/8/8/8/8/8/4K3 x").is_err());
    }

    #[test]
    fn legal_moves_follow_the_side_to_move() {
        let mut game = Game::new();
        game.make_move(mv("e2e3"));

        let moves = game.legal_moves();
        assert!(moves.iter().all(|m| game.color_at(m.from()) == Some(Color::Black)));
        assert!(moves.contains(&mv("e7e6")));
        assert!(!moves.contains(&mv("f1e2")));
    }
}
