//! Chess rules for standard chess and eight variants: legal moves, check
//! and mate detection, position and game-record notation, and bughouse
//! pairing of two games.

pub mod board;
pub mod game;

pub use board::{Color, Move, Piece, PieceKind, Position, Square, Variant};
pub use game::{Game, GameArena, GameResult, Outcome};
