//! Games: a position together with its move history, per-ply analyses,
//! tags, options and outcome.
//!
//! # Example
//! ```
//! use chess_rules::board::{Notation, Variant};
//! use chess_rules::game::Game;
//!
//! let mut game = Game::new(Variant::Standard);
//! game.play_move_list("1. e4 e5 2. Nf3 {the main line} Nc6").unwrap();
//! assert_eq!(game.ply_count(), 4);
//! assert_eq!(game.move_list(Notation::Algebraic), "e4 e5 Nf3 Nc6");
//! ```

mod arena;
mod error;
mod history;
mod options;
pub mod pgn;
pub mod tags;

use std::fmt;
use std::mem;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::{
    notation, Color, FenError, Move, MoveList, Notation, PieceKind, Position, PositionAnalysis,
    Rules, Variant,
};

pub use arena::{GameArena, GameId};
pub use error::{GameError, PgnError};
pub use history::{MoveHistory, MoveRecord};
use history::{repetition_key, RepetitionTable};
pub use options::GameOptions;
pub use tags::Tags;

/// Final result of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
}

impl GameResult {
    #[must_use]
    pub const fn win_for(color: Color) -> Self {
        match color {
            Color::White => GameResult::WhiteWins,
            Color::Black => GameResult::BlackWins,
        }
    }

    #[must_use]
    pub const fn winner(self) -> Option<Color> {
        match self {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            GameResult::Draw => None,
        }
    }

    /// Result of the partner board in bughouse: the winning team plays the
    /// other color there.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        match self {
            GameResult::WhiteWins => GameResult::BlackWins,
            GameResult::BlackWins => GameResult::WhiteWins,
            GameResult::Draw => GameResult::Draw,
        }
    }

    #[must_use]
    pub const fn pgn_token(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
        }
    }

    /// Result named by a result token; `*` and anything else is `None`
    #[must_use]
    pub fn from_pgn_token(token: &str) -> Option<Self> {
        match token {
            "1-0" => Some(GameResult::WhiteWins),
            "0-1" => Some(GameResult::BlackWins),
            "1/2-1/2" | "½-½" => Some(GameResult::Draw),
            _ => None,
        }
    }
}

/// Why a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EndCause {
    Checkmate,
    /// No legal move without check (a win for the stuck side in suicide)
    Stalemate,
    Resignation,
    MutualDraw,
    ThreefoldRepetition,
    FiftyMoves,
    InsufficientMaterial,
    /// The paired bughouse board ended
    PartnerBoard,
}

impl fmt::Display for EndCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EndCause::Checkmate => "checkmate",
            EndCause::Stalemate => "stalemate",
            EndCause::Resignation => "resignation",
            EndCause::MutualDraw => "draw agreed",
            EndCause::ThreefoldRepetition => "threefold repetition",
            EndCause::FiftyMoves => "fifty-move rule",
            EndCause::InsufficientMaterial => "insufficient material",
            EndCause::PartnerBoard => "partner board ended",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Outcome {
    pub result: GameResult,
    pub cause: EndCause,
}

impl Outcome {
    #[must_use]
    pub const fn new(result: GameResult, cause: EndCause) -> Self {
        Outcome { result, cause }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.result.pgn_token(), self.cause)
    }
}

/// A game in progress or finished.
#[derive(Clone, Debug)]
pub struct Game {
    position: Position,
    start_fen: String,
    /// Move number and side to move of the start position
    start_move: (u32, Color),
    analysis: PositionAnalysis,
    /// Analyses of the positions before each played move
    earlier: Vec<PositionAnalysis>,
    history: MoveHistory,
    repetitions: RepetitionTable,
    tags: Tags,
    options: GameOptions,
    outcome: Option<Outcome>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Variant::Standard)
    }
}

impl Game {
    /// A game from the default starting position of `variant`.
    #[must_use]
    pub fn new(variant: Variant) -> Self {
        Self::from_position(Position::for_variant(variant))
    }

    /// A game from a set-up position. Without `variant` the rules are
    /// inferred from the position.
    pub fn from_fen(fen: &str, variant: Option<Variant>) -> Result<Self, FenError> {
        Position::try_from_fen_for(fen, variant).map(Self::from_position)
    }

    #[must_use]
    pub fn from_position(position: Position) -> Self {
        let analysis = position.analyze();
        let mut repetitions = RepetitionTable::new();
        repetitions.increment(repetition_key(analysis.fen()));
        let mut game = Game {
            start_fen: position.to_fen(),
            start_move: (position.fullmove_number(), position.side_to_move()),
            position,
            analysis,
            earlier: Vec::new(),
            history: MoveHistory::new(),
            repetitions,
            tags: Tags::new(),
            options: GameOptions::default(),
            outcome: None,
        };
        game.update_outcome();
        game
    }

    #[must_use]
    pub fn with_options(mut self, options: GameOptions) -> Self {
        self.options = options;
        self
    }

    pub fn set_options(&mut self, options: GameOptions) {
        self.options = options;
    }

    #[must_use]
    pub fn options(&self) -> GameOptions {
        self.options
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Analysis of the current position
    #[must_use]
    pub fn analysis(&self) -> &PositionAnalysis {
        &self.analysis
    }

    /// Analysis of the position before 0-based `ply`; `ply_count()` gives the current one
    #[must_use]
    pub fn analysis_at(&self, ply: usize) -> Option<&PositionAnalysis> {
        if ply == self.earlier.len() {
            Some(&self.analysis)
        } else {
            self.earlier.get(ply)
        }
    }

    #[must_use]
    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    #[must_use]
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut Tags {
        &mut self.tags
    }

    #[must_use]
    pub fn variant(&self) -> Variant {
        self.position.variant()
    }

    #[must_use]
    pub fn start_fen(&self) -> &str {
        &self.start_fen
    }

    /// Move number and side to move where the game started
    #[must_use]
    pub fn start_move(&self) -> (u32, Color) {
        self.start_move
    }

    /// Number of moves played by both sides
    #[must_use]
    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move()
    }

    #[must_use]
    pub fn legal_moves(&self) -> &MoveList {
        self.analysis.legal_moves()
    }

    #[must_use]
    pub fn is_check(&self) -> bool {
        self.analysis.is_check()
    }

    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.analysis.is_checkmate()
    }

    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        self.analysis.is_stalemate()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Position notation of the current position, pools written per the options
    #[must_use]
    pub fn fen(&self) -> String {
        self.position.to_fen_with(self.options.holdings_encoding)
    }

    #[must_use]
    pub fn move_list(&self, notation: Notation) -> &str {
        self.history.move_list(notation)
    }

    #[must_use]
    pub fn move_list_from(&self, notation: Notation, ply: usize) -> &str {
        self.history.move_list_from(notation, ply)
    }

    #[must_use]
    pub fn comment(&self, ply: usize) -> Option<&str> {
        self.history.get(ply).and_then(MoveRecord::comment)
    }

    /// Attach a comment to the move at 0-based `ply`. Returns false when no
    /// such move was played.
    pub fn set_comment(&mut self, ply: usize, comment: Option<String>) -> bool {
        self.history.set_comment(ply, comment)
    }

    pub(crate) fn set_nag(&mut self, ply: usize, nag: u8) -> bool {
        self.history.set_nag(ply, nag)
    }

    /// Play a move from the current legal moves.
    ///
    /// A concrete bughouse drop is checked against the current pool, which
    /// may have grown since the position was analyzed.
    pub fn apply_move(&mut self, mv: Move) -> Result<&MoveRecord, GameError> {
        if let Some(outcome) = self.outcome {
            return Err(GameError::GameOver { outcome });
        }
        // only the coordinates of a caller's move are trusted
        let own = match mv.additional_kind() {
            Some(PieceKind::DropAny) => None,
            extra => self.analysis.find(mv.from(), mv.to(), extra),
        };
        let mv = match own {
            Some(own) => own,
            None => notation::parse_move(&self.position, &self.analysis, &mv.to_string())?,
        };

        let mut next = self.position.clone();
        let undo = next.apply(&mv);
        let after = next.analyze();
        let names = notation::move_names(&self.position, &self.analysis, &mv, Some(&after));
        let captured = undo.captured_piece(&mv);

        self.position = next;
        self.repetitions.increment(repetition_key(after.fen()));
        self.earlier.push(mem::replace(&mut self.analysis, after));
        self.update_outcome();
        Ok(self.history.push(mv, captured, names, undo))
    }

    /// Play one move given as text in any accepted form.
    pub fn play(&mut self, text: &str) -> Result<&MoveRecord, GameError> {
        if let Some(outcome) = self.outcome {
            return Err(GameError::GameOver { outcome });
        }
        let mv = notation::parse_move(&self.position, &self.analysis, text)?;
        self.apply_move(mv)
    }

    /// Play a list of moves such as `1. e4 e5 2. Nf3`. Comments in braces,
    /// move numbers, glyphs and result tokens are skipped, and the list
    /// stops quietly once the game has ended.
    ///
    /// Returns the number of moves played.
    pub fn play_move_list(&mut self, text: &str) -> Result<usize, GameError> {
        let mut played = 0;
        for token in pgn::plain_move_tokens(text) {
            if self.is_over() {
                break;
            }
            self.play(token)?;
            played += 1;
        }
        Ok(played)
    }

    /// Take back the last move. Any outcome is cleared.
    pub fn takeback(&mut self) -> Result<MoveRecord, GameError> {
        let record = self.history.pop().ok_or(GameError::NothingToTakeBack)?;
        if let Some(previous) = self.earlier.pop() {
            let undone = mem::replace(&mut self.analysis, previous);
            self.repetitions.decrement(repetition_key(undone.fen()));
        }
        self.position.unapply(&record.mv(), record.undo.clone());
        self.outcome = None;
        Ok(record)
    }

    /// Take back every move; returns how many were taken back.
    pub fn takeback_all(&mut self) -> usize {
        let mut count = 0;
        while self.takeback().is_ok() {
            count += 1;
        }
        count
    }

    pub fn resign(&mut self, color: Color) -> Result<Outcome, GameError> {
        self.finish(Outcome::new(
            GameResult::win_for(color.opponent()),
            EndCause::Resignation,
        ))
    }

    pub fn agree_draw(&mut self) -> Result<Outcome, GameError> {
        self.finish(Outcome::new(GameResult::Draw, EndCause::MutualDraw))
    }

    fn finish(&mut self, outcome: Outcome) -> Result<Outcome, GameError> {
        if let Some(outcome) = self.outcome {
            return Err(GameError::GameOver { outcome });
        }
        log::debug!("game ended: {outcome}");
        self.outcome = Some(outcome);
        Ok(outcome)
    }

    pub(crate) fn set_outcome(&mut self, outcome: Option<Outcome>) {
        self.outcome = outcome;
    }

    /// Add a piece handed over from the partner board to its color's pool.
    pub(crate) fn receive_droppable(&mut self, piece: crate::board::Piece) {
        self.position.add_droppable(piece);
    }

    pub(crate) fn return_droppable(&mut self, piece: crate::board::Piece) -> bool {
        self.position.remove_droppable(piece)
    }

    fn update_outcome(&mut self) {
        let analysis = &self.analysis;
        let to_move = analysis.side_to_move();
        let outcome = if analysis.is_checkmate() {
            Some(Outcome::new(
                GameResult::win_for(to_move.opponent()),
                EndCause::Checkmate,
            ))
        } else if !analysis.has_legal_moves() {
            let result = if self.position.rules() == Rules::Suicide {
                GameResult::win_for(to_move)
            } else {
                GameResult::Draw
            };
            Some(Outcome::new(result, EndCause::Stalemate))
        } else if self.options.detect_repetition
            && self.repetitions.get(repetition_key(analysis.fen())) >= 3
        {
            Some(Outcome::new(GameResult::Draw, EndCause::ThreefoldRepetition))
        } else if self.options.detect_fifty_moves && analysis.halfmove_clock() >= 100 {
            Some(Outcome::new(GameResult::Draw, EndCause::FiftyMoves))
        } else if self.options.detect_insufficient_material
            && analysis.material().is_insufficient()
        {
            Some(Outcome::new(GameResult::Draw, EndCause::InsufficientMaterial))
        } else {
            None
        };
        if let Some(outcome) = outcome {
            log::debug!("game ended: {outcome}");
            self.outcome = Some(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_and_take_back() {
        let mut game = Game::new(Variant::Standard);
        game.play("e2e4").unwrap();
        game.play("e7e5").unwrap();
        assert_eq!(game.ply_count(), 2);
        assert_eq!(game.move_list(Notation::Algebraic), "e4 e5");

        let record = game.takeback().unwrap();
        assert_eq!(record.name(Notation::Numeric), "e7e5");
        assert_eq!(game.move_list(Notation::Algebraic), "e4");
        assert_eq!(game.takeback_all(), 1);
        assert_eq!(game.fen(), Variant::Standard.start_fen());
        assert_eq!(game.takeback().unwrap_err(), GameError::NothingToTakeBack);
    }

    #[test]
    fn test_move_from_another_position_uses_own_piece() {
        use crate::board::Square;

        let donor = Game::new(Variant::Standard);
        let pawn_push = donor.analysis().find(Square(1, 4), Square(3, 4), None).unwrap();

        let mut game = Game::from_fen("4k3/8/8/8/8/8/4Q3/4K3 w - - 0 1", None).unwrap();
        let record = game.apply_move(pawn_push).unwrap();
        assert!(record.mv().piece().is(PieceKind::Queen));
        assert_eq!(record.name(Notation::Algebraic), "Qe4+");

        let moved = game.position().piece_at(Square(3, 4)).unwrap();
        assert!(moved.is(PieceKind::Queen));
        assert_eq!(game.fen(), "4k3/8/8/8/4Q3/8/8/4K3 b - - 1 1");

        let stale = donor.analysis().find(Square(0, 6), Square(2, 5), None).unwrap();
        assert!(game.apply_move(stale).is_err());
    }

    #[test]
    fn test_checkmate_ends_the_game() {
        let mut game = Game::default();
        game.play_move_list("1. f3 e5 2. g4 Qh4#").unwrap();
        let outcome = game.outcome().unwrap();
        assert_eq!(outcome, Outcome::new(GameResult::BlackWins, EndCause::Checkmate));
        assert_eq!(game.move_list(Notation::Algebraic), "f3 e5 g4 Qh4#");
        assert!(matches!(game.play("a3"), Err(GameError::GameOver { .. })));

        game.takeback().unwrap();
        assert!(!game.is_over());
    }

    #[test]
    fn test_move_list_stops_after_the_end() {
        let mut game = Game::default();
        let played = game.play_move_list("f3 e5 g4 Qh4# a3 a6").unwrap();
        assert_eq!(played, 4);
    }

    #[test]
    fn test_invalid_move_is_reported() {
        let mut game = Game::default();
        assert!(matches!(game.play("e5"), Err(GameError::InvalidMove(_))));
        assert_eq!(game.ply_count(), 0);
    }

    #[test]
    fn test_resign_and_draw() {
        let mut game = Game::default();
        let outcome = game.resign(Color::White).unwrap();
        assert_eq!(outcome.result, GameResult::BlackWins);
        assert!(game.agree_draw().is_err());

        let mut game = Game::default();
        assert_eq!(game.agree_draw().unwrap().cause, EndCause::MutualDraw);
    }

    #[test]
    fn test_suicide_stuck_side_wins() {
        let mut game = Game::from_fen("8/8/8/8/8/p7/P7/8 w - - 0 1", Some(Variant::Suicide)).unwrap();
        assert_eq!(
            game.outcome(),
            Some(Outcome::new(GameResult::WhiteWins, EndCause::Stalemate))
        );
        assert!(game.play("a3").is_err());
    }

    #[test]
    fn test_insufficient_material_draw() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1", None).unwrap();
        game.play("Kxd2").unwrap();
        assert_eq!(
            game.outcome().map(|o| o.cause),
            Some(EndCause::InsufficientMaterial)
        );

        let mut relaxed = Game::from_fen("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1", None)
            .unwrap()
            .with_options(GameOptions::without_automatic_draws());
        relaxed.play("Kxd2").unwrap();
        assert!(!relaxed.is_over());
    }

    #[test]
    fn test_fifty_move_rule() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 80", None).unwrap();
        game.play("Ra2").unwrap();
        assert_eq!(game.outcome().map(|o| o.cause), Some(EndCause::FiftyMoves));
    }

    #[test]
    fn test_comments() {
        let mut game = Game::default();
        game.play("d4").unwrap();
        assert!(game.set_comment(0, Some("queen's pawn".to_string())));
        assert!(!game.set_comment(1, None));
        assert_eq!(game.comment(0), Some("queen's pawn"));
    }

    #[test]
    fn test_result_tokens() {
        assert_eq!(GameResult::from_pgn_token("1/2-1/2"), Some(GameResult::Draw));
        assert_eq!(GameResult::from_pgn_token("*"), None);
        assert_eq!(GameResult::WhiteWins.mirrored().pgn_token(), "0-1");
        assert_eq!(
            Outcome::new(GameResult::Draw, EndCause::FiftyMoves).to_string(),
            "1/2-1/2 (fifty-move rule)"
        );
    }
}
