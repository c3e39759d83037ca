//! Error types for position and move parsing.

use std::fmt;

use super::types::{Color, PieceKind, Variant};

/// Error type for position-notation (FEN) parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// Input has no board field
    Empty,
    /// Board field has fewer than 8 rows
    TooFewRows { found: usize },
    /// Board field has rows past the holdings row
    TooManyRows { found: usize },
    /// A row does not describe exactly 8 files
    BadRowLength { rank: usize, files: usize },
    /// Unknown piece letter in a board row or holdings list
    InvalidPiece { char: char },
    /// `~` with no piece before it
    StrayPromotionMarker { rank: usize },
    /// A color has a king count its rules do not allow
    KingCount { color: Color, found: usize },
    /// Invalid side to move (must be 'w' or 'b')
    InvalidSideToMove { found: String },
    /// Invalid castling character
    InvalidCastling { char: char },
    /// Castling letters of the wrong style for the variant (file letters outside Fischer rules)
    CastlingVariantMismatch { token: String, variant: Variant },
    /// A holdings row or bracket in a variant without drops
    UnexpectedHoldings { variant: Variant },
    /// A pawn placed on the first or last rank (or in the holdings as a non-droppable kind)
    InvalidPlacement { kind: PieceKind, rank: usize },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::Empty => write!(f, "Empty position string"),
            FenError::TooFewRows { found } => {
                write!(f, "Board must have 8 rows, found {found}")
            }
            FenError::TooManyRows { found } => {
                write!(f, "Board has {found} rows, at most 8 plus a holdings row")
            }
            FenError::BadRowLength { rank, files } => {
                write!(f, "Rank {} describes {files} files instead of 8", rank + 1)
            }
            FenError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in FEN")
            }
            FenError::StrayPromotionMarker { rank } => {
                write!(f, "Promotion marker '~' without a piece on rank {}", rank + 1)
            }
            FenError::KingCount { color, found } => {
                write!(f, "{color} has {found} kings, exactly one is required")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidCastling { char } => {
                write!(f, "Invalid castling character '{char}' in FEN")
            }
            FenError::CastlingVariantMismatch { token, variant } => {
                write!(f, "Castling token '{token}' does not fit {variant} rules")
            }
            FenError::UnexpectedHoldings { variant } => {
                write!(f, "Holdings given for {variant}, which has no drops")
            }
            FenError::InvalidPlacement { kind, rank } => {
                write!(f, "A {kind} cannot stand on rank {}", rank + 1)
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Error type for move parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Nothing left after stripping annotations
    Empty,
    /// Text has no recognizable move shape
    Malformed { text: String },
    /// Invalid square notation in move
    InvalidSquare { text: String },
    /// Unknown piece or promotion letter
    InvalidPiece { char: char },
    /// Well-formed text that matches no legal move
    NoMatchingMove { text: String },
    /// Well-formed text that matches several legal moves
    AmbiguousMove { text: String },
}

impl MoveParseError {
    /// Text parsed but named no legal move (as opposed to unreadable text)
    #[must_use]
    pub fn is_illegal(&self) -> bool {
        matches!(
            self,
            MoveParseError::NoMatchingMove { .. } | MoveParseError::AmbiguousMove { .. }
        )
    }
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::Empty => write!(f, "Empty move text"),
            MoveParseError::Malformed { text } => write!(f, "Unreadable move '{text}'"),
            MoveParseError::InvalidSquare { text } => {
                write!(f, "Invalid square notation in '{text}'")
            }
            MoveParseError::InvalidPiece { char } => {
                write!(f, "Invalid piece letter '{char}'")
            }
            MoveParseError::NoMatchingMove { text } => {
                write!(f, "No legal move matches '{text}'")
            }
            MoveParseError::AmbiguousMove { text } => write!(f, "Ambiguous move '{text}'"),
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Rank out of bounds (must be 0-7)
    RankOutOfBounds { rank: usize },
    /// File out of bounds (must be 0-7)
    FileOutOfBounds { file: usize },
    /// Invalid algebraic notation
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::RankOutOfBounds { rank } => {
                write!(f, "Rank {rank} out of bounds (must be 0-7)")
            }
            SquareError::FileOutOfBounds { file } => {
                write!(f, "File {file} out of bounds (must be 0-7)")
            }
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}
