use super::{
    CastleSide, CastlingFiles, CastlingRights, Color, Mailbox, Move, Piece, PieceKind, Position,
    Square, Variant,
};

/// Everything `Position::unapply` needs to restore the position before a move.
#[derive(Clone, Debug)]
pub struct UnmakeInfo {
    pub(crate) previous_squares: Mailbox,
    pub(crate) previous_castling: CastlingRights,
    pub(crate) previous_en_passant: Option<Square>,
    pub(crate) previous_halfmove_clock: u32,
    pub(crate) previous_fullmove_number: u32,
    pub(crate) pool_change: PoolChange,
}

/// How the move changed the local piece pools
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PoolChange {
    None,
    /// A drop took the piece at `index` of the mover's pool and, in
    /// crazyhouse, the matching entry of the opponent's captured pool
    Dropped {
        piece: Piece,
        index: Option<usize>,
        captured: Option<(Piece, usize)>,
    },
    /// A crazyhouse capture added the victim and a drop copy for the capturer
    Captured { victim: Piece },
}

impl UnmakeInfo {
    /// Piece removed from the board by the move, if any
    #[must_use]
    pub fn captured_piece(&self, mv: &Move) -> Option<Piece> {
        captured_square(mv).and_then(|sq| self.previous_squares[sq.as_index()])
    }
}

fn captured_square(mv: &Move) -> Option<Square> {
    if mv.castle.is_some() || mv.is_drop() {
        None
    } else if mv.en_passant {
        Some(Square(mv.from.rank(), mv.to.file()))
    } else {
        Some(mv.to)
    }
}

/// Play `mv` on a bare board: remove the victim, move the piece (and the
/// castling rook), promote or place a dropped piece.
///
/// Returns the removed victim with its square.
pub(crate) fn relocate(board: &mut Mailbox, mv: &Move, files: CastlingFiles) -> Option<(Square, Piece)> {
    if mv.is_drop() {
        let kind = mv.extra.unwrap_or(mv.piece.kind);
        board[mv.to.as_index()] = Some(Piece::new(kind, mv.color));
        return None;
    }

    let mut piece = mv.piece;
    piece.moved = true;

    if let Some(side) = mv.castle {
        let rank = mv.from.rank();
        let rook_from = Square(rank, files.rook_file(side));
        board[mv.from.as_index()] = None;
        let rook = board[rook_from.as_index()].take();
        board[Square(rank, side.king_target_file()).as_index()] = Some(piece);
        if let Some(mut rook) = rook {
            rook.moved = true;
            board[Square(rank, side.rook_target_file()).as_index()] = Some(rook);
        }
        return None;
    }

    let victim = captured_square(mv)
        .and_then(|sq| board[sq.as_index()].take().map(|victim| (sq, victim)));
    board[mv.from.as_index()] = None;
    if let Some(kind) = mv.promotion() {
        piece.kind = kind;
        piece.promoted = true;
    }
    board[mv.to.as_index()] = Some(piece);
    victim
}

impl Position {
    /// Make a move on the board, returning the information needed to take it back.
    ///
    /// The move must come from this position's legal moves (or be a
    /// concrete drop resolved against the current pool).
    pub fn apply(&mut self, mv: &Move) -> UnmakeInfo {
        let us = self.side_to_move;
        let mut info = UnmakeInfo {
            previous_squares: self.squares,
            previous_castling: self.castling,
            previous_en_passant: self.en_passant,
            previous_halfmove_clock: self.halfmove_clock,
            previous_fullmove_number: self.fullmove_number,
            pool_change: PoolChange::None,
        };

        if mv.is_drop() {
            let kind = mv.extra.unwrap_or(mv.piece.kind);
            let pool = &mut self.droppable[us.index()];
            let index = pool.iter().position(|p| p.kind == kind);
            let piece = match index {
                Some(idx) => pool.remove(idx),
                None => {
                    log::warn!("drop of {kind} on {} without a pool piece", mv.to);
                    Piece::new(kind, us)
                }
            };
            let captured = if self.variant == Variant::Crazyhouse {
                let pool = &mut self.captured[us.opponent().index()];
                pool.iter()
                    .position(|p| p.kind_when_dropping() == kind)
                    .map(|idx| (pool.remove(idx), idx))
            } else {
                None
            };
            info.pool_change = PoolChange::Dropped {
                piece,
                index,
                captured,
            };
        }

        let victim = relocate(&mut self.squares, mv, self.castling_files);

        if let Some((_, victim)) = victim {
            if self.variant == Variant::Crazyhouse {
                self.captured[victim.color.index()].push(victim);
                self.droppable[us.index()].push(victim.as_drop_for(us));
                info.pool_change = PoolChange::Captured { victim };
            }
        }

        self.update_castling_rights(mv);

        self.en_passant = if mv.piece.is(PieceKind::Pawn)
            && !mv.is_drop()
            && mv.from.rank().abs_diff(mv.to.rank()) == 2
        {
            Some(mv.to)
        } else {
            None
        };

        if victim.is_some() || (mv.piece.is(PieceKind::Pawn) && !mv.is_drop()) {
            self.halfmove_clock = 0;
        } else if mv.is_drop() && self.rules().drop_resets_halfmove_clock() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = us.opponent();
        info
    }

    /// Take back `mv`, which must be the last move applied.
    pub fn unapply(&mut self, mv: &Move, info: UnmakeInfo) {
        let us = mv.color;
        self.squares = info.previous_squares;
        self.castling = info.previous_castling;
        self.en_passant = info.previous_en_passant;
        self.halfmove_clock = info.previous_halfmove_clock;
        self.fullmove_number = info.previous_fullmove_number;
        self.side_to_move = us;

        match info.pool_change {
            PoolChange::None => {}
            PoolChange::Dropped {
                piece,
                index,
                captured,
            } => {
                if let Some(idx) = index {
                    let pool = &mut self.droppable[us.index()];
                    pool.insert(idx.min(pool.len()), piece);
                }
                if let Some((victim, idx)) = captured {
                    let pool = &mut self.captured[us.opponent().index()];
                    pool.insert(idx.min(pool.len()), victim);
                }
            }
            PoolChange::Captured { victim } => {
                let captured = &mut self.captured[victim.color.index()];
                if let Some(idx) = captured.iter().rposition(|p| *p == victim) {
                    captured.remove(idx);
                }
                let gained = victim.as_drop_for(us);
                let droppable = &mut self.droppable[us.index()];
                if let Some(idx) = droppable.iter().rposition(|p| *p == gained) {
                    droppable.remove(idx);
                }
            }
        }
    }

    fn update_castling_rights(&mut self, mv: &Move) {
        if mv.is_drop() || self.castling.is_empty() {
            return;
        }
        if mv.piece.is(PieceKind::King) {
            self.castling.clear(mv.color);
        }
        for color in Color::BOTH {
            for side in CastleSide::BOTH {
                let rook_sq = Square(color.back_rank(), self.castling_files.rook_file(side));
                if mv.from == rook_sq || mv.to == rook_sq {
                    self.castling.remove(color, side);
                }
            }
        }
    }
}
