//! Board representation and the rules of every supported variant.
//!
//! A `Position` is a mailbox board plus side to move, clocks, castling
//! state, en-passant pawn and the piece pools of the drop variants.
//! `Position::analyze` computes a `PositionAnalysis` with the legal moves
//! and status of the position; `Position::apply` and `Position::unapply`
//! play and take back a move.
//!
//! # Example
//! ```
//! use chess_rules::board::{Notation, Position};
//!
//! let mut position = Position::new();
//! let mv = position.parse_move("e4").unwrap();
//! position.apply(&mv);
//! assert_eq!(
//!     position.to_fen(),
//!     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
//! );
//! assert_eq!(Notation::default(), Notation::Algebraic);
//! ```

mod analysis;
mod builder;
mod error;
mod fen;
pub mod fischer;
mod make_unmake;
mod movegen;
pub mod notation;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use analysis::{MaterialSufficiency, Pin, PositionAnalysis};
pub use builder::PositionBuilder;
pub use error::{FenError, MoveParseError, SquareError};
pub use fen::HoldingsEncoding;
pub use make_unmake::UnmakeInfo;
pub use notation::{MoveNames, Notation};
pub use state::{Mailbox, Position};
pub use types::{
    Bitboard, BitboardIter, CastleSide, CastlingFiles, CastlingRights, Color, Move, MoveList,
    Piece, PieceKind, Rules, Square, Variant,
};
