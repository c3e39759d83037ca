//! Error types for game records and game play.

use std::fmt;

use super::Outcome;
use crate::board::{FenError, MoveParseError};

/// Error type for game-record (PGN) reading failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PgnError {
    /// The `FEN` tag does not describe a valid position
    InvalidFen(FenError),
    /// A move token could not be read at all
    InvalidMove(MoveParseError),
    /// A comment bracket closed by the wrong bracket, or never closed
    UnbalancedBracket { expected: Option<char>, found: Option<char> },
    /// A move token that is not legal in the position reached so far
    IllegalMove { ply: usize, token: String },
    /// The two boards of a bughouse record could not be set up
    Boards(GameError),
}

impl fmt::Display for PgnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PgnError::InvalidFen(err) => write!(f, "Invalid setup position: {err}"),
            PgnError::InvalidMove(err) => write!(f, "Invalid move text: {err}"),
            PgnError::UnbalancedBracket { expected, found } => match (expected, found) {
                (Some(expected), Some(found)) => {
                    write!(f, "Comment bracket '{found}' found where '{expected}' was expected")
                }
                (Some(expected), None) => write!(f, "Comment not closed, expected '{expected}'"),
                (None, Some(found)) => write!(f, "Closing bracket '{found}' outside a comment"),
                (None, None) => write!(f, "Unbalanced comment brackets"),
            },
            PgnError::IllegalMove { ply, token } => {
                write!(f, "Move '{token}' at ply {ply} is not legal")
            }
            PgnError::Boards(err) => write!(f, "Bughouse boards: {err}"),
        }
    }
}

impl std::error::Error for PgnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PgnError::InvalidFen(err) => Some(err),
            PgnError::InvalidMove(err) => Some(err),
            PgnError::Boards(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FenError> for PgnError {
    fn from(err: FenError) -> Self {
        PgnError::InvalidFen(err)
    }
}

impl From<MoveParseError> for PgnError {
    fn from(err: MoveParseError) -> Self {
        PgnError::InvalidMove(err)
    }
}

/// Error type for moves and takebacks on a [`Game`](super::Game)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The game already ended
    GameOver { outcome: Outcome },
    /// The move is unreadable or not legal in the current position
    InvalidMove(MoveParseError),
    /// No move left to take back
    NothingToTakeBack,
    /// The arena has no game under this id
    UnknownGame { id: usize },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::GameOver { outcome } => write!(f, "Game is over: {outcome}"),
            GameError::InvalidMove(err) => write!(f, "{err}"),
            GameError::NothingToTakeBack => write!(f, "No move to take back"),
            GameError::UnknownGame { id } => write!(f, "No game with id {id}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::InvalidMove(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MoveParseError> for GameError {
    fn from(err: MoveParseError) -> Self {
        GameError::InvalidMove(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_messages() {
        let err = PgnError::UnbalancedBracket {
            expected: Some('}'),
            found: Some(')'),
        };
        assert_eq!(err.to_string(), "Comment bracket ')' found where '}' was expected");
        let open = PgnError::UnbalancedBracket {
            expected: Some(']'),
            found: None,
        };
        assert!(open.to_string().contains("not closed"));
    }

    #[test]
    fn test_wrapped_errors_keep_their_source() {
        use std::error::Error;

        let err: PgnError = FenError::Empty.into();
        assert!(err.source().is_some());
        let err: GameError = MoveParseError::Empty.into();
        assert_eq!(err.to_string(), "Empty move text");
    }
}
