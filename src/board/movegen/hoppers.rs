use super::super::{Bitboard, Mailbox, Square};
use super::sliders::{first_piece, DIAGONAL, STRAIGHT};

/// Grasshopper: along any queen line, jump the first piece met (the hurdle)
/// and land on the square right behind it.
pub(crate) fn grasshopper_attacks(board: &Mailbox, from: Square) -> Bitboard {
    let mut seen = Bitboard::EMPTY;
    for &(dr, df) in STRAIGHT.iter().chain(DIAGONAL.iter()) {
        if let Some(landing) = first_piece(board, from, dr, df).and_then(|h| h.offset(dr, df)) {
            seen.insert(landing);
        }
    }
    seen
}
