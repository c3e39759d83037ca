use super::super::{Bitboard, Mailbox, Square};

pub(crate) const STRAIGHT: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub(crate) const DIAGONAL: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Squares seen along each direction, up to and including the first occupied square.
pub(crate) fn slide(board: &Mailbox, from: Square, directions: &[(isize, isize)]) -> Bitboard {
    let mut seen = Bitboard::EMPTY;
    for &(dr, df) in directions {
        let mut cur = from;
        while let Some(next) = cur.offset(dr, df) {
            seen.insert(next);
            if board[next.as_index()].is_some() {
                break;
            }
            cur = next;
        }
    }
    seen
}

/// First occupied square met walking from `from` along `(dr, df)`.
pub(crate) fn first_piece(board: &Mailbox, from: Square, dr: isize, df: isize) -> Option<Square> {
    let mut cur = from;
    while let Some(next) = cur.offset(dr, df) {
        if board[next.as_index()].is_some() {
            return Some(next);
        }
        cur = next;
    }
    None
}

/// Unit step from `a` toward `b` when both share a rank, file or diagonal
pub(crate) fn direction(a: Square, b: Square) -> Option<(isize, isize)> {
    let dr = b.rank() as isize - a.rank() as isize;
    let df = b.file() as isize - a.file() as isize;
    if (dr, df) == (0, 0) {
        return None;
    }
    if dr == 0 || df == 0 || dr.abs() == df.abs() {
        Some((dr.signum(), df.signum()))
    } else {
        None
    }
}

/// Squares from `a` (exclusive) to `b` (inclusive) along their common line
pub(crate) fn line_to(a: Square, b: Square) -> Bitboard {
    let Some((dr, df)) = direction(a, b) else {
        return Bitboard::EMPTY;
    };
    let mut line = Bitboard::EMPTY;
    let mut cur = a;
    while let Some(next) = cur.offset(dr, df) {
        line.insert(next);
        if next == b {
            break;
        }
        cur = next;
    }
    line
}
