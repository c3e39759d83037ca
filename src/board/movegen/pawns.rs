use super::super::{Bitboard, Color, Position, Square};

/// The two forward diagonals of a pawn of `color`
pub(crate) fn pawn_attacks(from: Square, color: Color) -> Bitboard {
    let dir = color.pawn_direction();
    [-1, 1]
        .into_iter()
        .filter_map(|df| from.offset(dir, df))
        .collect()
}

/// Pushes, captures and the en-passant capture of a pawn of `color`.
pub(crate) fn pawn_reach(position: &Position, from: Square, color: Color) -> Bitboard {
    let mut reach = Bitboard::EMPTY;
    let dir = color.pawn_direction();

    if let Some(one) = from.offset(dir, 0).filter(|sq| position.is_empty(*sq)) {
        reach.insert(one);
        if from.rank() == position.variant.pawn_start_rank(color) {
            if let Some(two) = one.offset(dir, 0).filter(|sq| position.is_empty(*sq)) {
                reach.insert(two);
            }
        }
    }

    let en_passant = if color == position.side_to_move {
        position.en_passant_target()
    } else {
        None
    };
    for target in pawn_attacks(from, color).iter() {
        match position.piece_at(target) {
            Some(piece) if piece.color != color => reach.insert(target),
            None if en_passant == Some(target) => reach.insert(target),
            _ => {}
        }
    }
    reach
}
