//! Fluent builder for constructing positions.
//!
//! Allows creating positions piece by piece rather than parsing FEN strings.
//!
//! # Example
//! ```
//! use chess_rules::board::{Color, PieceKind, PositionBuilder, Square, Variant};
//!
//! let position = PositionBuilder::new(Variant::Crazyhouse)
//!     .piece(Square(0, 4), Color::White, PieceKind::King)
//!     .piece(Square(7, 4), Color::Black, PieceKind::King)
//!     .droppable(Color::White, PieceKind::Knight)
//!     .side_to_move(Color::Black)
//!     .build()
//!     .unwrap();
//! assert_eq!(position.to_fen(), "4k3/8/8/8/8/8/8/4K3[N] b - - 0 1");
//! ```

use super::error::FenError;
use super::{CastleSide, CastlingFiles, CastlingRights, Color, Piece, PieceKind, Position, Square, Variant};

/// A fluent builder for constructing `Position` values.
#[derive(Clone, Debug)]
pub struct PositionBuilder {
    variant: Variant,
    pieces: Vec<(Square, Piece)>,
    side_to_move: Color,
    castling: CastlingRights,
    castling_files: CastlingFiles,
    droppable: Vec<Piece>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Default for PositionBuilder {
    fn default() -> Self {
        Self::new(Variant::Standard)
    }
}

impl PositionBuilder {
    /// Create a builder for an empty board.
    #[must_use]
    pub fn new(variant: Variant) -> Self {
        PositionBuilder {
            variant,
            pieces: Vec::new(),
            side_to_move: Color::White,
            castling: CastlingRights::none(),
            castling_files: CastlingFiles::STANDARD,
            droppable: Vec::new(),
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Create a builder starting from the variant's initial position.
    #[must_use]
    pub fn starting_position(variant: Variant) -> Self {
        let start = Position::for_variant(variant);
        let mut builder = Self::new(variant);
        builder.pieces = Color::BOTH
            .into_iter()
            .flat_map(|color| start.pieces(color).collect::<Vec<_>>())
            .collect();
        builder.castling = start.castling_rights();
        builder
    }

    /// Place a piece on the board, replacing whatever stood there.
    #[must_use]
    pub fn piece(mut self, square: Square, color: Color, kind: PieceKind) -> Self {
        self.pieces.retain(|(sq, _)| *sq != square);
        self.pieces.push((square, Piece::new(kind, color)));
        self
    }

    /// Place a piece that reached its kind by promotion (drops back as a pawn).
    #[must_use]
    pub fn promoted_piece(mut self, square: Square, color: Color, kind: PieceKind) -> Self {
        self.pieces.retain(|(sq, _)| *sq != square);
        self.pieces
            .push((square, Piece::new(kind, color).with_promoted(true)));
        self
    }

    /// Remove a piece from a square.
    #[must_use]
    pub fn clear(mut self, square: Square) -> Self {
        self.pieces.retain(|(sq, _)| *sq != square);
        self
    }

    #[must_use]
    pub const fn side_to_move(mut self, color: Color) -> Self {
        self.side_to_move = color;
        self
    }

    /// Grant a castling right; kept only if king and rook stand on their files.
    #[must_use]
    pub fn castle(mut self, color: Color, side: CastleSide) -> Self {
        self.castling.set(color, side);
        self
    }

    #[must_use]
    pub const fn no_castling_rights(mut self) -> Self {
        self.castling = CastlingRights::none();
        self
    }

    /// King and rook files for Fischer castling.
    #[must_use]
    pub const fn castling_files(mut self, files: CastlingFiles) -> Self {
        self.castling_files = files;
        self
    }

    /// Add a piece `color` may drop.
    #[must_use]
    pub fn droppable(mut self, color: Color, kind: PieceKind) -> Self {
        self.droppable.push(Piece::new(kind, color));
        self
    }

    /// Set the halfmove clock (for 50-move rule).
    #[must_use]
    pub const fn halfmove_clock(mut self, clock: u32) -> Self {
        self.halfmove_clock = clock;
        self
    }

    #[must_use]
    pub const fn fullmove_number(mut self, number: u32) -> Self {
        self.fullmove_number = number;
        self
    }

    /// Build the position, checking what its variant requires: king counts,
    /// no pawns on the first or last rank, no drop placeholders on the board.
    pub fn build(self) -> Result<Position, FenError> {
        let mut position = Position::empty(self.variant);
        for (square, piece) in self.pieces {
            let pawn_on_edge = piece.is(PieceKind::Pawn) && (square.rank() == 0 || square.rank() == 7);
            if pawn_on_edge || piece.is(PieceKind::DropAny) {
                return Err(FenError::InvalidPlacement {
                    kind: piece.kind,
                    rank: square.rank(),
                });
            }
            position.put(square, piece);
        }

        if self.variant.rules().requires_single_king() {
            for color in Color::BOTH {
                let found = position.king_count(color);
                if found != 1 {
                    return Err(FenError::KingCount { color, found });
                }
            }
        }

        if !self.droppable.is_empty() && !self.variant.has_drops() {
            return Err(FenError::UnexpectedHoldings {
                variant: self.variant,
            });
        }
        for piece in self.droppable {
            position.add_droppable(piece);
            if self.variant == Variant::Crazyhouse {
                let opponent = piece.color.opponent();
                position.captured[opponent.index()].push(Piece::new(piece.kind, opponent));
            }
        }

        position.side_to_move = self.side_to_move;
        position.castling_files = self.castling_files;
        for color in Color::BOTH {
            for side in CastleSide::BOTH {
                if self.castling.has(color, side) && position.castling_pieces_home(color, side) {
                    position.castling.set(color, side);
                }
            }
        }
        position.halfmove_clock = self.halfmove_clock;
        position.fullmove_number = self.fullmove_number.max(1);
        Ok(position)
    }
}
