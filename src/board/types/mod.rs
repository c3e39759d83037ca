//! Core chess types.
//!
//! This module contains the value types used throughout the rules engine:
//! - `PieceKind`, `Color` and `Piece` - piece kinds (variant pieces included) and pieces
//! - `Square` - board square as (rank, file)
//! - `Bitboard` - 64-bit square set
//! - `Move` and `MoveList` - move representation
//! - `CastlingRights`, `CastleSide`, `CastlingFiles` - castling state
//! - `Variant` and `Rules` - variant identification

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;
mod variant;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::{CastleSide, CastlingFiles, CastlingRights};
pub use moves::{Move, MoveList};
pub use piece::{Color, Piece, PieceKind};
pub use square::Square;
pub use variant::{Rules, Variant};

pub(crate) use square::{file_char, file_from_char, rank_from_char};
pub(crate) use variant::STANDARD_FEN;
