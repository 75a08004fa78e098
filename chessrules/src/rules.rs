/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use thiserror::Error;

use super::{Board, Color, Move, MoveList, PieceKind, Square, SquareList};

/// Reasons a [`Move`] can be refused.
///
/// None of these are fatal: a refused move leaves every board and turn exactly as it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("there is no piece on {0} to move")]
    NoPiece(Square),

    #[error("a piece cannot move from {0} to itself")]
    NullMove(Square),

    #[error("the piece on {square} belongs to {owner:#}, not to the side to move")]
    NotYourPiece { square: Square, owner: Color },

    #[error("cannot capture your own piece on {0}")]
    CapturesOwnPiece(Square),

    #[error("a {kind} cannot move from {from} to {to}")]
    Unreachable {
        kind: PieceKind,
        from: Square,
        to: Square,
    },

    #[error("the path from {from} to {to} is blocked by the piece on {blocker}")]
    Blocked {
        from: Square,
        to: Square,
        blocker: Square,
    },

    #[error("a pawn may only move diagonally to capture, but {0} is empty")]
    PawnCaptureWithoutTarget(Square),

    #[error("the game is over")]
    GameOver,
}

/// Returns `true` if the piece on `from` may move to `to` with `side` to move.
///
/// This is [`check_legality_of`] without the reason.
///
/// # Example
/// ```
/// # use chessrules::{is_legal_move, Board, Color, Square};
/// let board = Board::default();
/// assert!(is_legal_move(&board, Color::White, Square::E2, Square::E3));
/// assert!(!is_legal_move(&board, Color::White, Square::E2, Square::E4));
/// assert!(is_legal_move(&board, Color::White, Square::G1, Square::F3));
/// assert!(!is_legal_move(&board, Color::White, Square::F1, Square::C4));
/// ```
#[inline(always)]
pub fn is_legal_move(board: &Board, side: Color, from: Square, to: Square) -> bool {
    check_legality_of(board, side, Move::new(from, to)).is_ok()
}

/// Checks if `mv` is legal for `side` on `board`.
///
/// If `Ok(())`, the move is legal.
/// If `Err(reason)`, then `reason` explains why it's not.
///
/// The destination is checked first: `side` may never capture its own piece, whatever is moving.
/// Only then is the move held against the movement rule of the piece on `mv.from()`.
///
/// Check, castling, en passant, two-square pawn pushes and promotion are not part of this rule set.
/// Whether the piece on `mv.from()` belongs to `side` is the caller's concern; see [`crate::Game::select`].
pub fn check_legality_of(board: &Board, side: Color, mv: Move) -> Result<(), IllegalMove> {
    let (from, to) = mv.parts();

    if mv.is_null() {
        return Err(IllegalMove::NullMove(from));
    }

    let Some(piece) = board.piece_at(from) else {
        return Err(IllegalMove::NoPiece(from));
    };

    if board.color_at(to) == Some(side) {
        return Err(IllegalMove::CapturesOwnPiece(to));
    }

    match piece.kind() {
        PieceKind::Pawn => check_pawn_move(board, side, from, to),
        PieceKind::Knight => check_knight_move(from, to),
        PieceKind::Bishop => check_bishop_move(board, from, to),
        PieceKind::Rook => check_rook_move(board, from, to),
        PieceKind::Queen => check_queen_move(board, from, to),
        PieceKind::King => check_king_move(from, to),
    }
}

/// Pawns step one row toward the enemy onto an empty square, or one row and one column onto an occupied one.
fn check_pawn_move(board: &Board, side: Color, from: Square, to: Square) -> Result<(), IllegalMove> {
    let (rows, cols) = from.delta(to);

    if rows != side.pawn_direction() {
        return Err(out_of_reach(PieceKind::Pawn, from, to));
    }

    match cols.abs() {
        0 if board.has(to) => Err(IllegalMove::Blocked {
            from,
            to,
            blocker: to,
        }),
        0 => Ok(()),
        1 if board.has(to) => Ok(()),
        1 => Err(IllegalMove::PawnCaptureWithoutTarget(to)),
        _ => Err(out_of_reach(PieceKind::Pawn, from, to)),
    }
}

fn check_knight_move(from: Square, to: Square) -> Result<(), IllegalMove> {
    let (rows, cols) = from.delta(to);

    match (rows.abs(), cols.abs()) {
        (1, 2) | (2, 1) => Ok(()),
        _ => Err(out_of_reach(PieceKind::Knight, from, to)),
    }
}

fn check_bishop_move(board: &Board, from: Square, to: Square) -> Result<(), IllegalMove> {
    let (rows, cols) = from.delta(to);

    if rows.abs() != cols.abs() || rows == 0 {
        return Err(out_of_reach(PieceKind::Bishop, from, to));
    }

    check_path(board, from, to)
}

fn check_rook_move(board: &Board, from: Square, to: Square) -> Result<(), IllegalMove> {
    let (rows, cols) = from.delta(to);

    if rows != 0 && cols != 0 {
        return Err(out_of_reach(PieceKind::Rook, from, to));
    }

    check_path(board, from, to)
}

/// A Queen move is legal if it is legal for a Rook or for a Bishop.
fn check_queen_move(board: &Board, from: Square, to: Square) -> Result<(), IllegalMove> {
    match check_rook_move(board, from, to) {
        Err(IllegalMove::Unreachable { .. }) => {
            check_bishop_move(board, from, to).map_err(|err| match err {
                IllegalMove::Unreachable { .. } => out_of_reach(PieceKind::Queen, from, to),
                blocked => blocked,
            })
        }
        verdict => verdict,
    }
}

fn check_king_move(from: Square, to: Square) -> Result<(), IllegalMove> {
    let (rows, cols) = from.delta(to);

    if rows.abs() <= 1 && cols.abs() <= 1 && (rows, cols) != (0, 0) {
        Ok(())
    } else {
        Err(out_of_reach(PieceKind::King, from, to))
    }
}

/// Walks from `from` toward `to` one step at a time, failing on the first occupied square strictly between them.
///
/// `from` and `to` must share a row, a column, or a diagonal.
fn check_path(board: &Board, from: Square, to: Square) -> Result<(), IllegalMove> {
    let (rows, cols) = from.delta(to);
    let (row_step, col_step) = (rows.signum(), cols.signum());

    let mut square = from;
    while let Some(next) = square.offset(row_step, col_step) {
        if next == to {
            break;
        }

        if board.has(next) {
            return Err(IllegalMove::Blocked {
                from,
                to,
                blocker: next,
            });
        }

        square = next;
    }

    Ok(())
}

/// Returns `true` if every square strictly between `from` and `to` is empty.
///
/// `from` and `to` must share a row, a column, or a diagonal; for any other pair the answer is meaningless.
///
/// # Example
/// ```
/// # use chessrules::{is_path_clear, Board, Square};
/// let board = Board::default();
/// assert!(!is_path_clear(&board, Square::A1, Square::A3));
/// assert!(is_path_clear(&board, Square::A2, Square::A7));
/// assert!(is_path_clear(&board, Square::A1, Square::A2));
/// ```
#[inline(always)]
pub fn is_path_clear(board: &Board, from: Square, to: Square) -> bool {
    check_path(board, from, to).is_ok()
}

/// Every square the piece on `from` may legally move to, with `side` to move.
///
/// Empty if there is no piece on `from`.
///
/// # Example
/// ```
/// # use chessrules::{legal_destinations, Board, Color, Square};
/// let board = Board::default();
/// let knight = legal_destinations(&board, Color::White, Square::B1);
/// assert_eq!(knight.as_slice(), &[Square::A3, Square::C3]);
/// ```
pub fn legal_destinations(board: &Board, side: Color, from: Square) -> SquareList {
    let mut destinations = SquareList::new();

    if !board.has(from) {
        return destinations;
    }

    for to in Square::iter() {
        if is_legal_move(board, side, from, to) {
            destinations.push(to);
        }
    }

    destinations
}

/// Every legal [`Move`] for the pieces belonging to `side`.
///
/// # Example
/// ```
/// # use chessrules::{legal_moves, Board, Color};
/// let board = Board::default();
/// assert_eq!(legal_moves(&board, Color::White).len(), 12);
/// assert_eq!(legal_moves(&board, Color::Black).len(), 12);
/// ```
pub fn legal_moves(board: &Board, side: Color) -> MoveList {
    let mut moves = MoveList::new();

    for (from, _) in board.iter().filter(|(_, piece)| piece.is_owned_by(side)) {
        for to in legal_destinations(board, side, from) {
            moves.push(Move::new(from, to));
        }
    }

    moves
}

#[inline(always)]
fn out_of_reach(kind: PieceKind, from: Square, to: Square) -> IllegalMove {
    IllegalMove::Unreachable { kind, from, to }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FEN_STARTPOS;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    fn check(fen: &str, side: Color, uci: &str) -> Result<(), IllegalMove> {
        check_legality_of(&board(fen), side, Move::from_uci(uci).unwrap())
    }

    /// Checks if `destinations` and `expected` contain all the same elements, ignoring order
    fn lists_match(destinations: &[Square], expected: &[Square]) {
        assert_eq!(
            destinations.len(),
            expected.len(),
            "\nFound:    {destinations:?}\nExpected: {expected:?}"
        );

        for to in destinations {
            assert!(expected.contains(to), "{to} not found in {expected:?}");
        }
    }

    #[test]
    fn own_pieces_cannot_be_captured_by_any_kind() {
        // Every white piece has another white piece within its reach.
        let fen = "8/8/8/3PP3/3PKQ2/2BPR3/1N6/8";
        let side = Color::White;

        assert_eq!(
            check(fen, side, "e4e5"),
            Err(IllegalMove::CapturesOwnPiece(Square::E5))
        );
        assert_eq!(
            check(fen, side, "f4e5"),
            Err(IllegalMove::CapturesOwnPiece(Square::E5))
        );
        assert_eq!(
            check(fen, side, "e3e4"),
            Err(IllegalMove::CapturesOwnPiece(Square::E4))
        );
        assert_eq!(
            check(fen, side, "c3d4"),
            Err(IllegalMove::CapturesOwnPiece(Square::D4))
        );
        assert_eq!(
            check(fen, side, "b2d3"),
            Err(IllegalMove::CapturesOwnPiece(Square::D3))
        );
        assert_eq!(
            check(fen, side, "b2c4"),
            Ok(()),
            "c4 is empty, so the knight may go there"
        );
        assert_eq!(
            check(fen, side, "d4d5"),
            Err(IllegalMove::CapturesOwnPiece(Square::D5))
        );
    }

    #[test]
    fn ownership_is_judged_against_the_side_to_move() {
        // With Black to move, a white rook on a8 is an enemy, and a black one is not.
        let fen = "R7/8/8/8/8/8/8/r7";
        assert_eq!(check(fen, Color::Black, "a1a8"), Ok(()));

        let fen = "r7/8/8/8/8/8/8/r7";
        assert_eq!(
            check(fen, Color::Black, "a1a8"),
            Err(IllegalMove::CapturesOwnPiece(Square::A8))
        );
    }

    #[test]
    fn preconditions_are_illegal_rather_than_fatal() {
        let start = FEN_STARTPOS;
        assert_eq!(
            check(start, Color::White, "e4e5"),
            Err(IllegalMove::NoPiece(Square::E4))
        );
        assert_eq!(
            check(start, Color::White, "e2e2"),
            Err(IllegalMove::NullMove(Square::E2))
        );
    }

    #[test]
    fn white_pawns_advance_toward_row_zero() {
        let start = FEN_STARTPOS;
        assert_eq!(check(start, Color::White, "e2e3"), Ok(()));
        assert!(matches!(
            check(start, Color::White, "e2e4"),
            Err(IllegalMove::Unreachable {
                kind: PieceKind::Pawn,
                ..
            })
        ));

        let fen = "8/8/8/8/8/4P3/8/8";
        assert!(check(fen, Color::White, "e3e2").is_err(), "pawns never retreat");
        assert!(check(fen, Color::White, "e3f3").is_err(), "pawns never move sideways");
    }

    #[test]
    fn black_pawns_advance_toward_row_seven() {
        let start = FEN_STARTPOS;
        assert_eq!(check(start, Color::Black, "e7e6"), Ok(()));
        assert!(check(start, Color::Black, "e7e5").is_err());
        assert!(check(start, Color::Black, "e7e8").is_err());
    }

    #[test]
    fn pawn_pushes_need_an_empty_square() {
        let fen = "8/8/8/8/4p3/4P3/8/8";
        assert_eq!(
            check(fen, Color::White, "e3e4"),
            Err(IllegalMove::Blocked {
                from: Square::E3,
                to: Square::E4,
                blocker: Square::E4,
            })
        );
        assert!(check(fen, Color::Black, "e4e3").is_err());
    }

    #[test]
    fn pawns_move_diagonally_only_to_capture() {
        let fen = "8/8/8/8/3p4/4P3/8/8";
        assert_eq!(check(fen, Color::White, "e3d4"), Ok(()));
        assert_eq!(
            check(fen, Color::White, "e3f4"),
            Err(IllegalMove::PawnCaptureWithoutTarget(Square::F4))
        );
        assert_eq!(check(fen, Color::Black, "d4e3"), Ok(()));
        assert!(check(fen, Color::White, "e3c5").is_err());
    }

    #[test]
    fn rooks_move_along_rows_and_columns() {
        let fen = "8/8/8/8/3R4/8/8/8";
        let expected = [
            Square::D8,
            Square::D7,
            Square::D6,
            Square::D5,
            Square::D3,
            Square::D2,
            Square::D1,
            Square::A4,
            Square::B4,
            Square::C4,
            Square::E4,
            Square::F4,
            Square::G4,
            Square::H4,
        ];
        let found = legal_destinations(&board(fen), Color::White, Square::D4);
        lists_match(&found, &expected);
    }

    #[test]
    fn rook_blockers() {
        // . . . x . . . x
        // . . . . . . . .
        // . . . x . . . .
        // . . . . . . . .
        // . . . R . . . x
        // . . x . . . . .
        // . . . P . p . .
        // . . . . . . . .
        let fen = "3p3p/8/3p4/8/3R3p/2p5/3P1p2/8";
        let expected = [
            Square::D3,
            Square::D5,
            Square::D6,
            Square::A4,
            Square::B4,
            Square::C4,
            Square::E4,
            Square::F4,
            Square::G4,
            Square::H4,
        ];
        let found = legal_destinations(&board(fen), Color::White, Square::D4);
        lists_match(&found, &expected);

        assert_eq!(
            check(fen, Color::White, "d4d8"),
            Err(IllegalMove::Blocked {
                from: Square::D4,
                to: Square::D8,
                blocker: Square::D6,
            })
        );
    }

    #[test]
    fn bishops_move_along_diagonals_only() {
        let fen = "8/8/8/8/2B5/8/8/8";
        assert_eq!(check(fen, Color::White, "c4f7"), Ok(()));
        assert_eq!(check(fen, Color::White, "c4a2"), Ok(()));
        assert!(matches!(
            check(fen, Color::White, "c4c7"),
            Err(IllegalMove::Unreachable {
                kind: PieceKind::Bishop,
                ..
            })
        ));
        assert!(check(fen, Color::White, "c4d6").is_err());
    }

    #[test]
    fn bishops_are_blocked_by_either_color() {
        for fen in ["8/8/4p3/8/2B5/8/8/8", "8/8/4P3/8/2B5/8/8/8"] {
            assert_eq!(
                check(fen, Color::White, "c4f7"),
                Err(IllegalMove::Blocked {
                    from: Square::C4,
                    to: Square::F7,
                    blocker: Square::E6,
                })
            );
        }
    }

    #[test]
    fn knights_jump_over_everything() {
        let start = FEN_STARTPOS;
        assert_eq!(check(start, Color::White, "g1f3"), Ok(()));
        assert_eq!(check(start, Color::White, "g1h3"), Ok(()));
        assert_eq!(check(start, Color::Black, "b8c6"), Ok(()));
        assert!(check(start, Color::White, "g1g3").is_err());

        let found = legal_destinations(&board("8/8/8/8/3N4/8/8/8"), Color::White, Square::D4);
        let expected = [
            Square::C6,
            Square::E6,
            Square::B5,
            Square::F5,
            Square::B3,
            Square::F3,
            Square::C2,
            Square::E2,
        ];
        lists_match(&found, &expected);
    }

    #[test]
    fn queens_combine_rook_and_bishop() {
        let fen = "8/8/8/8/3Q4/8/8/8";
        let found = legal_destinations(&board(fen), Color::White, Square::D4);
        assert_eq!(found.len(), 27);

        assert!(matches!(
            check(fen, Color::White, "d4e6"),
            Err(IllegalMove::Unreachable {
                kind: PieceKind::Queen,
                ..
            })
        ));
    }

    #[test]
    fn queens_are_blocked_along_both_kinds_of_line() {
        let fen = "8/8/5p2/3p4/3Q4/8/8/8";
        assert_eq!(
            check(fen, Color::White, "d4d7"),
            Err(IllegalMove::Blocked {
                from: Square::D4,
                to: Square::D7,
                blocker: Square::D5,
            })
        );
        assert_eq!(
            check(fen, Color::White, "d4g7"),
            Err(IllegalMove::Blocked {
                from: Square::D4,
                to: Square::G7,
                blocker: Square::F6,
            })
        );
        assert_eq!(check(fen, Color::White, "d4d5"), Ok(()));
        assert_eq!(check(fen, Color::White, "d4f6"), Ok(()));
    }

    #[test]
    fn kings_step_one_square() {
        let fen = "8/8/8/8/3K4/8/8/8";
        let found = legal_destinations(&board(fen), Color::White, Square::D4);
        let expected = [
            Square::C5,
            Square::D5,
            Square::E5,
            Square::C4,
            Square::E4,
            Square::C3,
            Square::D3,
            Square::E3,
        ];
        lists_match(&found, &expected);

        assert!(check("8/8/8/8/8/8/8/4K2R", Color::White, "e1g1").is_err(), "no castling");
    }

    #[test]
    fn start_position_move_counts() {
        let start = Board::default();
        let moves = legal_moves(&start, Color::White);
        assert_eq!(moves.len(), 12);
        assert!(moves.iter().all(|mv| start.color_at(mv.from()) == Some(Color::White)));

        // Eight single pawn steps and four Knight jumps; no pawn may step two squares.
        let mut found: Vec<String> = moves.iter().map(Move::to_uci).collect();
        found.sort();
        let expected = [
            "a2a3", "b1a3", "b1c3", "b2b3", "c2c3", "d2d3", "e2e3", "f2f3", "g1f3", "g1h3", "g2g3", "h2h3",
        ];
        assert_eq!(found, expected);
        assert!(!moves.contains(&Move::new(Square::E2, Square::E4)));

        assert_eq!(legal_moves(&start, Color::Black).len(), 12);
    }

    #[test]
    fn reasons_are_readable() {
        let err = check("8/8/8/8/8/8/8/R1r5", Color::White, "a1d1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "the path from a1 to d1 is blocked by the piece on c1"
        );

        let err = IllegalMove::NotYourPiece {
            square: Square::E7,
            owner: Color::Black,
        };
        assert_eq!(
            err.to_string(),
            "the piece on e7 belongs to black, not to the side to move"
        );
    }
}
