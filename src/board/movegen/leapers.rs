//! Precomputed attack tables for leaper pieces (knights, kings).

use once_cell::sync::Lazy;

use super::super::{Bitboard, Square};

const KNIGHT_DELTAS: [(isize, isize); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const KING_DELTAS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

fn leaper_table(deltas: &[(isize, isize)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    for (idx, slot) in table.iter_mut().enumerate() {
        let from = Square::from_index(idx);
        *slot = deltas
            .iter()
            .filter_map(|&(dr, df)| from.offset(dr, df))
            .collect();
    }
    table
}

pub(crate) static KNIGHT_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| leaper_table(&KNIGHT_DELTAS));

pub(crate) static KING_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| leaper_table(&KING_DELTAS));

#[inline]
pub(crate) fn knight_attacks(from: Square) -> Bitboard {
    KNIGHT_ATTACKS[from.as_index()]
}

#[inline]
pub(crate) fn king_attacks(from: Square) -> Bitboard {
    KING_ATTACKS[from.as_index()]
}
