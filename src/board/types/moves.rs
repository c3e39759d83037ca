//! Move type and move list.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::castling::CastleSide;
use super::piece::{Color, Piece, PieceKind};
use super::square::Square;

/// One ply: a board move, a castling, an en-passant capture or a drop.
///
/// A drop has its source equal to its destination and carries the dropped
/// kind as its additional kind. Equality only looks at source,
/// destination and additional kind, so two promotions to different pieces
/// are different moves while the check flag never matters.
///
/// Castling in standard chess moves the king two files. Under Fischer
/// rules the destination is the castling rook's square.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    pub(crate) color: Color,
    pub(crate) from: Square,
    pub(crate) to: Square,
    pub(crate) piece: Piece,
    pub(crate) captured: Option<Piece>,
    pub(crate) extra: Option<PieceKind>,
    pub(crate) en_passant: bool,
    pub(crate) castle: Option<CastleSide>,
    pub(crate) check: bool,
}

impl Move {
    pub(crate) const fn normal(piece: Piece, from: Square, to: Square, captured: Option<Piece>) -> Self {
        Move {
            color: piece.color,
            from,
            to,
            piece,
            captured,
            extra: None,
            en_passant: false,
            castle: None,
            check: false,
        }
    }

    pub(crate) const fn en_passant(pawn: Piece, from: Square, to: Square, captured: Piece) -> Self {
        let mut mv = Move::normal(pawn, from, to, Some(captured));
        mv.en_passant = true;
        mv
    }

    pub(crate) const fn castling(king: Piece, from: Square, to: Square, side: CastleSide) -> Self {
        let mut mv = Move::normal(king, from, to, None);
        mv.castle = Some(side);
        mv
    }

    /// A drop of `piece` (already colored for the mover) onto `to`.
    pub(crate) const fn drop(piece: Piece, to: Square) -> Self {
        let mut mv = Move::normal(piece, to, to, None);
        mv.extra = Some(piece.kind);
        mv
    }

    #[must_use]
    pub(crate) const fn with_extra(mut self, kind: PieceKind) -> Self {
        self.extra = Some(kind);
        self
    }

    #[inline]
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Source square; equals the destination for a drop.
    #[inline]
    #[must_use]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// Source square, or `None` for a drop.
    #[inline]
    #[must_use]
    pub const fn source(&self) -> Option<Square> {
        if self.is_drop() {
            None
        } else {
            Some(self.from)
        }
    }

    #[inline]
    #[must_use]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// The moving (or dropped) piece as it stood before the move
    #[inline]
    #[must_use]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    #[inline]
    #[must_use]
    pub const fn captured(&self) -> Option<Piece> {
        self.captured
    }

    /// Promotion target or dropped kind
    #[inline]
    #[must_use]
    pub const fn additional_kind(&self) -> Option<PieceKind> {
        self.extra
    }

    /// Promotion target, if the pawn changes kind
    #[must_use]
    pub fn promotion(&self) -> Option<PieceKind> {
        if self.is_drop() || !self.piece.is(PieceKind::Pawn) {
            return None;
        }
        self.extra.filter(|kind| *kind != PieceKind::Pawn)
    }

    #[inline]
    #[must_use]
    pub const fn is_drop(&self) -> bool {
        self.from.0 == self.to.0 && self.from.1 == self.to.1
    }

    #[inline]
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    #[must_use]
    pub const fn is_en_passant(&self) -> bool {
        self.en_passant
    }

    #[inline]
    #[must_use]
    pub const fn castle_side(&self) -> Option<CastleSide> {
        self.castle
    }

    /// The move puts the opposing king in check
    #[inline]
    #[must_use]
    pub const fn gives_check(&self) -> bool {
        self.check
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to && self.extra == other.extra
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
        self.extra.hash(state);
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self}")?;
        if self.is_capture() {
            write!(f, " cap")?;
        }
        if let Some(side) = self.castle {
            write!(f, " {}", side.notation())?;
        }
        if self.en_passant {
            write!(f, " ep")?;
        }
        if self.check {
            write!(f, " check")?;
        }
        write!(f, ")")
    }
}

/// Numeric (long coordinate) form, e.g. `e2e4`, `e7e8q`, `e4e4p`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.extra {
            write!(f, "{}", kind.to_char())?;
        }
        Ok(())
    }
}

/// List of moves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveList {
    moves: Vec<Move>,
}

impl MoveList {
    #[must_use]
    pub fn new() -> Self {
        MoveList { moves: Vec::new() }
    }

    pub(crate) fn push(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    pub(crate) fn retain(&mut self, f: impl FnMut(&Move) -> bool) {
        self.moves.retain(f);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<Move> {
        self.moves.get(idx).copied()
    }

    #[must_use]
    pub fn first(&self) -> Option<Move> {
        self.get(0)
    }

    #[must_use]
    pub fn contains(&self, mv: &Move) -> bool {
        self.moves.contains(mv)
    }

    /// Find the move with the given coordinates and additional kind
    #[must_use]
    pub fn find(&self, from: Square, to: Square, extra: Option<PieceKind>) -> Option<Move> {
        self.moves
            .iter()
            .find(|m| m.from == from && m.to == to && m.extra == extra)
            .copied()
    }

    /// True if some move goes from `from` to `to` (any additional kind)
    #[must_use]
    pub fn has_move(&self, from: Square, to: Square) -> bool {
        self.moves.iter().any(|m| m.from == from && m.to == to)
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

impl FromIterator<Move> for MoveList {
    fn from_iter<T: IntoIterator<Item = Move>>(iter: T) -> Self {
        MoveList {
            moves: iter.into_iter().collect(),
        }
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, index: usize) -> &Self::Output {
        &self.moves[index]
    }
}
