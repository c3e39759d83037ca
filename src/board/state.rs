use super::{CastleSide, CastlingFiles, CastlingRights, Color, Piece, PieceKind, Rules, Square, Variant};

/// Board contents indexed by `Square::as_index`.
pub type Mailbox = [Option<Piece>; 64];

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

const CAPABLANCA_BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Archbishop,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Chancellor,
    PieceKind::Rook,
];

/// A position: board, side to move, clocks, castling state, en-passant
/// pawn and the piece pools of the drop variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub(crate) squares: Mailbox,
    pub(crate) side_to_move: Color,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) castling: CastlingRights,
    pub(crate) castling_files: CastlingFiles,
    /// Pawn that just advanced two squares
    pub(crate) en_passant: Option<Square>,
    pub(crate) variant: Variant,
    /// Pieces of each color taken off the board (crazyhouse bookkeeping)
    pub(crate) captured: [Vec<Piece>; 2],
    /// Pieces each color may drop, already recolored and demoted
    pub(crate) droppable: [Vec<Piece>; 2],
}

impl Position {
    /// Standard starting position
    #[must_use]
    pub fn new() -> Self {
        Position::for_variant(Variant::Standard)
    }

    /// Default starting position of `variant`
    #[must_use]
    pub fn for_variant(variant: Variant) -> Self {
        let mut position = Position::empty(variant);
        let back_rank = if variant == Variant::MiniCapablanca {
            CAPABLANCA_BACK_RANK
        } else {
            BACK_RANK
        };
        let (white_pawns, black_pawns) = if variant == Variant::Grasshopper {
            (2, 5)
        } else {
            (1, 6)
        };
        for (file, kind) in back_rank.into_iter().enumerate() {
            position.put(Square(0, file), Piece::new(kind, Color::White));
            position.put(Square(7, file), Piece::new(kind, Color::Black));
            position.put(Square(white_pawns, file), Piece::new(PieceKind::Pawn, Color::White));
            position.put(Square(black_pawns, file), Piece::new(PieceKind::Pawn, Color::Black));
            if variant == Variant::Grasshopper {
                position.put(Square(1, file), Piece::new(PieceKind::Grasshopper, Color::White));
                position.put(Square(6, file), Piece::new(PieceKind::Grasshopper, Color::Black));
            }
        }
        position.castling = CastlingRights::all();
        position
    }

    /// Empty board, White to move, no castling rights
    #[must_use]
    pub fn empty(variant: Variant) -> Self {
        Position {
            squares: [None; 64],
            side_to_move: Color::White,
            halfmove_clock: 0,
            fullmove_number: 1,
            castling: CastlingRights::none(),
            castling_files: CastlingFiles::STANDARD,
            en_passant: None,
            variant,
            captured: [Vec::new(), Vec::new()],
            droppable: [Vec::new(), Vec::new()],
        }
    }

    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.as_index()]
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.squares[sq.as_index()].is_none()
    }

    pub(crate) fn put(&mut self, sq: Square, piece: Piece) {
        self.squares[sq.as_index()] = Some(piece);
    }

    pub(crate) fn take(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.as_index()].take()
    }

    #[must_use]
    pub fn mailbox(&self) -> &Mailbox {
        &self.squares
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    #[inline]
    #[must_use]
    pub fn rules(&self) -> Rules {
        self.variant.rules()
    }

    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    #[must_use]
    pub fn castling_files(&self) -> CastlingFiles {
        self.castling_files
    }

    /// King and castling rook of `color` stand on their recorded files
    pub(crate) fn castling_pieces_home(&self, color: Color, side: CastleSide) -> bool {
        let rank = color.back_rank();
        let is_own = |file: usize, kind: PieceKind| {
            self.piece_at(Square(rank, file))
                .is_some_and(|p| p.is(kind) && p.color == color)
        };
        is_own(self.castling_files.king, PieceKind::King)
            && is_own(self.castling_files.rook_file(side), PieceKind::Rook)
    }

    /// The pawn that advanced two squares on the last move, if any
    #[must_use]
    pub fn en_passant_pawn(&self) -> Option<Square> {
        self.en_passant
    }

    /// Square a pawn of the side to move would capture on en passant.
    ///
    /// Only reported when such a pawn actually stands next to the
    /// double-stepped pawn.
    #[must_use]
    pub fn en_passant_target(&self) -> Option<Square> {
        let pawn_sq = self.en_passant?;
        let pawn = self.piece_at(pawn_sq)?;
        if !pawn.is(PieceKind::Pawn) || pawn.color == self.side_to_move {
            return None;
        }
        let capturer = Piece::new(PieceKind::Pawn, self.side_to_move);
        let adjacent = [-1, 1]
            .into_iter()
            .filter_map(|df| pawn_sq.offset(0, df))
            .any(|sq| self.piece_at(sq) == Some(capturer));
        if !adjacent {
            return None;
        }
        pawn_sq.offset(-pawn.color.pawn_direction(), 0)
    }

    /// Pieces of `color` with their squares, a1 first
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| {
            self.piece_at(sq)
                .filter(|piece| piece.color == color)
                .map(|piece| (sq, piece))
        })
    }

    #[must_use]
    pub fn king_squares(&self, color: Color) -> Vec<Square> {
        self.pieces(color)
            .filter(|(_, piece)| piece.is(PieceKind::King))
            .map(|(sq, _)| sq)
            .collect()
    }

    /// The king of `color` when it has exactly one
    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        match self.king_squares(color).as_slice() {
            [sq] => Some(*sq),
            _ => None,
        }
    }

    #[must_use]
    pub fn king_count(&self, color: Color) -> usize {
        self.king_squares(color).len()
    }

    /// Pieces of `color` that have been captured
    #[must_use]
    pub fn captured(&self, color: Color) -> &[Piece] {
        &self.captured[color.index()]
    }

    /// Pieces `color` may drop
    #[must_use]
    pub fn droppable(&self, color: Color) -> &[Piece] {
        &self.droppable[color.index()]
    }

    #[must_use]
    pub fn has_captured_pieces(&self) -> bool {
        self.captured.iter().any(|pool| !pool.is_empty())
    }

    /// Add a piece to the drop pool of its color (bughouse transfer)
    pub fn add_droppable(&mut self, piece: Piece) {
        self.droppable[piece.color.index()].push(Piece::new(piece.kind, piece.color));
    }

    /// Remove one matching piece from the drop pool of its color.
    ///
    /// Returns `false` when the pool holds no such piece.
    pub fn remove_droppable(&mut self, piece: Piece) -> bool {
        let pool = &mut self.droppable[piece.color.index()];
        match pool.iter().rposition(|p| p.kind == piece.kind) {
            Some(idx) => {
                pool.remove(idx);
                true
            }
            None => false,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}
