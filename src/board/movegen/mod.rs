//! Per-kind piece geometry.
//!
//! Two views of every piece kind:
//! - `attacks` - squares the piece threatens on a given board, own pieces
//!   included (used for check and castling-path tests)
//! - `reachability` - pseudo-legal destinations in a position (pushes,
//!   captures and en passant for pawns; castling and drops are added by
//!   the analysis)

mod hoppers;
mod leapers;
mod pawns;
mod sliders;

use super::{Bitboard, Color, Mailbox, Piece, PieceKind, Position, Square};

pub(crate) use sliders::{first_piece, line_to, DIAGONAL, STRAIGHT};

/// Squares `piece` standing on `from` attacks on `board`.
pub(crate) fn attacks(board: &Mailbox, from: Square, piece: Piece) -> Bitboard {
    match piece.kind {
        PieceKind::Pawn => pawns::pawn_attacks(from, piece.color),
        PieceKind::Knight => leapers::knight_attacks(from),
        PieceKind::King => leapers::king_attacks(from),
        PieceKind::Bishop => sliders::slide(board, from, &DIAGONAL),
        PieceKind::Rook => sliders::slide(board, from, &STRAIGHT),
        PieceKind::Queen => {
            sliders::slide(board, from, &STRAIGHT) | sliders::slide(board, from, &DIAGONAL)
        }
        PieceKind::Archbishop => {
            sliders::slide(board, from, &DIAGONAL) | leapers::knight_attacks(from)
        }
        PieceKind::Chancellor => {
            sliders::slide(board, from, &STRAIGHT) | leapers::knight_attacks(from)
        }
        PieceKind::Grasshopper => hoppers::grasshopper_attacks(board, from),
        PieceKind::DropAny => Bitboard::EMPTY,
    }
}

/// Pseudo-legal destinations of the piece on `from` (empty or enemy squares).
pub(crate) fn reachability(position: &Position, from: Square, piece: Piece) -> Bitboard {
    if piece.is(PieceKind::Pawn) {
        return pawns::pawn_reach(position, from, piece.color);
    }
    let own: Bitboard = position.pieces(piece.color).map(|(sq, _)| sq).collect();
    attacks(&position.squares, from, piece) & !own
}

/// Squares holding a piece of `by` that attacks `target`.
pub(crate) fn attackers(board: &Mailbox, target: Square, by: Color) -> Vec<Square> {
    Square::all()
        .filter(|&sq| {
            board[sq.as_index()]
                .is_some_and(|piece| piece.color == by && attacks(board, sq, piece).contains(target))
        })
        .collect()
}

pub(crate) fn is_attacked(board: &Mailbox, target: Square, by: Color) -> bool {
    Square::all().any(|sq| {
        board[sq.as_index()]
            .is_some_and(|piece| piece.color == by && attacks(board, sq, piece).contains(target))
    })
}

impl Position {
    /// Pseudo-legal destinations of the piece on `from`; empty for an empty square.
    ///
    /// King safety is not considered; see `PositionAnalysis::reachable_from`
    /// for the legal subset.
    #[must_use]
    pub fn reachable_squares(&self, from: Square) -> Bitboard {
        self.piece_at(from)
            .map_or(Bitboard::EMPTY, |piece| reachability(self, from, piece))
    }

    /// True if any piece of `by` attacks `sq`
    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        is_attacked(&self.squares, sq, by)
    }
}
