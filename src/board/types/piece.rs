//! Piece kinds, colors and on-board pieces.

use std::fmt;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Piece kinds across every supported variant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    /// Moves along queen lines, hopping over the first piece met and
    /// landing on the square right behind it.
    Grasshopper,
    /// Bishop and knight combined.
    Archbishop,
    /// Rook and knight combined.
    Chancellor,
    /// Bughouse drop placeholder; never stands on the board.
    DropAny,
}

impl PieceKind {
    /// All kinds in index order
    pub const ALL: [PieceKind; 10] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Grasshopper,
        PieceKind::Archbishop,
        PieceKind::Chancellor,
        PieceKind::DropAny,
    ];

    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
            PieceKind::Grasshopper => 6,
            PieceKind::Archbishop => 7,
            PieceKind::Chancellor => 8,
            PieceKind::DropAny => 9,
        }
    }

    /// Parse a kind from its letter, ignoring case (p, n, b, r, q, k, g, a, c, x)
    #[must_use]
    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            'g' => Some(PieceKind::Grasshopper),
            'a' => Some(PieceKind::Archbishop),
            'c' => Some(PieceKind::Chancellor),
            'x' => Some(PieceKind::DropAny),
            _ => None,
        }
    }

    /// Lowercase letter of this kind
    #[inline]
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
            PieceKind::Grasshopper => 'g',
            PieceKind::Archbishop => 'a',
            PieceKind::Chancellor => 'c',
            PieceKind::DropAny => 'x',
        }
    }

    /// Letter with case based on color (uppercase for White)
    #[inline]
    #[must_use]
    pub fn to_fen_char(self, color: Color) -> char {
        let c = self.to_char();
        if color == Color::White {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }

    /// Slides along ranks and files (Rook, Queen, Chancellor)
    #[inline]
    #[must_use]
    pub const fn slides_straight(self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Queen | PieceKind::Chancellor)
    }

    /// Slides along diagonals (Bishop, Queen, Archbishop)
    #[inline]
    #[must_use]
    pub const fn slides_diagonally(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Queen | PieceKind::Archbishop)
    }

    #[inline]
    #[must_use]
    pub const fn is_slider(self) -> bool {
        self.slides_straight() || self.slides_diagonally()
    }

    /// Counts as a minor piece for material sufficiency
    #[inline]
    #[must_use]
    pub(crate) const fn is_minor(self) -> bool {
        matches!(self, PieceKind::Knight | PieceKind::Bishop)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
            PieceKind::Grasshopper => "grasshopper",
            PieceKind::Archbishop => "archbishop",
            PieceKind::Chancellor => "chancellor",
            PieceKind::DropAny => "any piece",
        };
        f.write_str(name)
    }
}

/// Chess colors.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Both colors in index order (White=0, Black=1)
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Returns the opposite color
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Back rank for this color (0 for White, 7 for Black)
    #[inline]
    #[must_use]
    pub const fn back_rank(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Pawn forward direction (+1 for White, -1 for Black)
    #[inline]
    #[must_use]
    pub(crate) const fn pawn_direction(self) -> isize {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Pawn starting rank (1 for White, 6 for Black)
    #[inline]
    #[must_use]
    pub(crate) const fn pawn_start_rank(self) -> usize {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Side-to-move letter used in position notation
    #[inline]
    #[must_use]
    pub const fn fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// A piece as it stands on the board or waits in a pool.
///
/// Two pieces are equal when kind, color and the promoted flag match;
/// the `moved` flag is bookkeeping for castling and does not take part.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    /// Reached its kind through promotion; drops back as a pawn.
    pub promoted: bool,
    pub moved: bool,
}

impl Piece {
    #[must_use]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Piece {
            kind,
            color,
            promoted: false,
            moved: false,
        }
    }

    #[must_use]
    pub const fn with_promoted(mut self, promoted: bool) -> Self {
        self.promoted = promoted;
        self
    }

    #[inline]
    #[must_use]
    pub const fn is(self, kind: PieceKind) -> bool {
        self.kind as u8 == kind as u8
    }

    /// Kind this piece turns into when it re-enters play as a drop.
    #[inline]
    #[must_use]
    pub const fn kind_when_dropping(self) -> PieceKind {
        if self.promoted {
            PieceKind::Pawn
        } else {
            self.kind
        }
    }

    /// Fresh piece of `color` that a capture of `self` hands out for dropping.
    #[must_use]
    pub const fn as_drop_for(self, color: Color) -> Piece {
        Piece::new(self.kind_when_dropping(), color)
    }

    #[inline]
    #[must_use]
    pub fn to_fen_char(self) -> char {
        self.kind.to_fen_char(self.color)
    }
}

impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.color == other.color && self.promoted == other.promoted
    }
}

impl Eq for Piece {}

impl Hash for Piece {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.color.hash(state);
        self.promoted.hash(state);
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen_char())?;
        if self.promoted {
            write!(f, "~")?;
        }
        Ok(())
    }
}
