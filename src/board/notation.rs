//! Move names and move text parsing.
//!
//! Every move has a name in five scripts: numeric (`g1f3`), algebraic
//! (`Nf3`), algebraic with Hebrew letters, and figurine forms of both.
//! Parsing goes the other way and always resolves against the legal moves
//! of the current position, so a text that matches nothing (or more than
//! one move) is rejected instead of guessed.
//!
//! # Example
//! ```
//! use chess_rules::board::{Notation, Position};
//!
//! let position = Position::new();
//! let analysis = position.analyze();
//! let mv = position.parse_move("Nf3").unwrap();
//! let names = chess_rules::board::notation::move_names(&position, &analysis, &mv, None);
//! assert_eq!(names.get(Notation::Numeric), "g1f3");
//! assert_eq!(names.get(Notation::FigurineHebrew), "\u{2658}ו3");
//! ```

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::analysis::PositionAnalysis;
use super::error::MoveParseError;
use super::{CastleSide, Color, Move, Piece, PieceKind, Position, Square};

/// Script used to name moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Notation {
    /// Source and destination squares: `e2e4`, `e7e8q`, `d4d4n` for a drop
    Numeric,
    #[default]
    Algebraic,
    AlgebraicHebrew,
    Figurine,
    FigurineHebrew,
}

impl Notation {
    pub const ALL: [Notation; 5] = [
        Notation::Numeric,
        Notation::Algebraic,
        Notation::AlgebraicHebrew,
        Notation::Figurine,
        Notation::FigurineHebrew,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Notation::Numeric => "numeric",
            Notation::Algebraic => "algebraic",
            Notation::AlgebraicHebrew => "algebraic-hebrew",
            Notation::Figurine => "figurine",
            Notation::FigurineHebrew => "figurine-hebrew",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Notation> {
        Notation::ALL
            .into_iter()
            .find(|notation| notation.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

struct Glyphs {
    english: &'static str,
    hebrew: &'static str,
    white: &'static str,
    black: &'static str,
}

/// Per-kind letters and figurines, indexed by `PieceKind::index`.
static GLYPHS: Lazy<[Glyphs; 10]> = Lazy::new(|| {
    PieceKind::ALL.map(|kind| match kind {
        PieceKind::Pawn => Glyphs { english: "P", hebrew: "", white: "\u{2659}", black: "\u{265F}" },
        PieceKind::Knight => Glyphs { english: "N", hebrew: "פ", white: "\u{2658}", black: "\u{265E}" },
        PieceKind::Bishop => Glyphs { english: "B", hebrew: "ר", white: "\u{2657}", black: "\u{265D}" },
        PieceKind::Rook => Glyphs { english: "R", hebrew: "צ", white: "\u{2656}", black: "\u{265C}" },
        PieceKind::Queen => Glyphs { english: "Q", hebrew: "מה", white: "\u{2655}", black: "\u{265B}" },
        PieceKind::King => Glyphs { english: "K", hebrew: "מ", white: "\u{2654}", black: "\u{265A}" },
        PieceKind::Grasshopper => Glyphs { english: "G", hebrew: "ח", white: "\u{2645}", black: "\u{2648}" },
        PieceKind::Archbishop => Glyphs { english: "A", hebrew: "א", white: "\u{2647}", black: "\u{2650}" },
        PieceKind::Chancellor => Glyphs { english: "C", hebrew: "ק", white: "\u{2646}", black: "\u{2649}" },
        PieceKind::DropAny => Glyphs { english: "X", hebrew: "X", white: "X", black: " " },
    })
});

const HEBREW_FILES: [&str; 8] = ["א", "ב", "ג", "ד", "ה", "ו", "ז", "ח"];

/// English piece letters accepted in move text; the empty letter is a pawn.
static ENGLISH_LETTERS: Lazy<HashMap<&'static str, PieceKind>> = Lazy::new(|| {
    PieceKind::ALL
        .into_iter()
        .map(|kind| (GLYPHS[kind.index()].english, kind))
        .chain(std::iter::once(("", PieceKind::Pawn)))
        .collect()
});

static LONG_FORM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-h][1-8])([a-h][1-8])([A-Za-z])?$").expect("valid regex"));
static ANNOTATIONS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[?!+#.$]+").expect("valid regex"));
static DROP_FORM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Za-z]?)@(.*)$").expect("valid regex"));
static SAN_FORM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z])?([a-h])?([1-8])?[x:]?([a-h][1-8])(?:=([A-Za-z])|([A-Z]))?$").expect("valid regex")
});

/// English letter of `kind` as written in algebraic notation (`P` for a pawn)
#[must_use]
pub fn piece_letter(kind: PieceKind) -> &'static str {
    GLYPHS[kind.index()].english
}

/// Hebrew letter of `kind`; empty for a pawn
#[must_use]
pub fn hebrew_piece_letter(kind: PieceKind) -> &'static str {
    GLYPHS[kind.index()].hebrew
}

#[must_use]
pub fn figurine(kind: PieceKind, color: Color) -> &'static str {
    let glyphs = &GLYPHS[kind.index()];
    match color {
        Color::White => glyphs.white,
        Color::Black => glyphs.black,
    }
}

/// Hebrew letter of a file (0 = a)
#[must_use]
pub fn hebrew_file(file: usize) -> &'static str {
    HEBREW_FILES[file]
}

/// The names of one move in every script.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveNames {
    numeric: String,
    algebraic: String,
    algebraic_hebrew: String,
    figurine: String,
    figurine_hebrew: String,
}

impl MoveNames {
    #[must_use]
    pub fn get(&self, notation: Notation) -> &str {
        match notation {
            Notation::Numeric => &self.numeric,
            Notation::Algebraic => &self.algebraic,
            Notation::AlgebraicHebrew => &self.algebraic_hebrew,
            Notation::Figurine => &self.figurine,
            Notation::FigurineHebrew => &self.figurine_hebrew,
        }
    }
}

/// Accumulates the four algebraic scripts side by side.
#[derive(Default)]
struct Scripts {
    algebraic: String,
    algebraic_hebrew: String,
    figurine: String,
    figurine_hebrew: String,
}

impl Scripts {
    fn push_all(&mut self, text: &str) {
        self.algebraic.push_str(text);
        self.algebraic_hebrew.push_str(text);
        self.figurine.push_str(text);
        self.figurine_hebrew.push_str(text);
    }

    fn push_letter(&mut self, kind: PieceKind) {
        self.algebraic.push_str(piece_letter(kind));
        self.algebraic_hebrew.push_str(hebrew_piece_letter(kind));
    }

    fn push_figurine(&mut self, kind: PieceKind, color: Color) {
        self.figurine.push_str(figurine(kind, color));
        self.figurine_hebrew.push_str(figurine(kind, color));
    }

    fn push_file(&mut self, file: usize) {
        let english = super::types::file_char(file);
        self.algebraic.push(english);
        self.figurine.push(english);
        self.algebraic_hebrew.push_str(hebrew_file(file));
        self.figurine_hebrew.push_str(hebrew_file(file));
    }

    fn push_rank(&mut self, rank: usize) {
        self.push_all(&(rank + 1).to_string());
    }

    fn push_square(&mut self, sq: Square) {
        self.push_file(sq.file());
        self.push_rank(sq.rank());
    }

    fn push_capture(&mut self) {
        self.algebraic.push('x');
        self.figurine.push('x');
        self.algebraic_hebrew.push(':');
        self.figurine_hebrew.push(':');
    }

    fn finish(self, numeric: String, suffix: &str) -> MoveNames {
        MoveNames {
            numeric,
            algebraic: self.algebraic + suffix,
            algebraic_hebrew: self.algebraic_hebrew + suffix,
            figurine: self.figurine + suffix,
            figurine_hebrew: self.figurine_hebrew + suffix,
        }
    }
}

/// Check suffix for a move leading to `after`: `#` mate, `++` double check, `+` check.
#[must_use]
pub fn check_suffix(after: &PositionAnalysis) -> &'static str {
    if after.is_checkmate() {
        "#"
    } else if after.is_double_check() {
        "++"
    } else if after.is_check() {
        "+"
    } else {
        ""
    }
}

/// Name `mv`, played in `before` (analyzed as `analysis`), in every script.
///
/// `after` is the analysis of the resulting position and supplies the
/// check suffix; without it no suffix is written.
#[must_use]
pub fn move_names(
    before: &Position,
    analysis: &PositionAnalysis,
    mv: &Move,
    after: Option<&PositionAnalysis>,
) -> MoveNames {
    let numeric = mv.to_string();
    let suffix = after.map_or("", check_suffix);
    let mut scripts = Scripts::default();
    let piece = mv.piece;

    if mv.is_drop() {
        let kind = mv.extra.unwrap_or(piece.kind);
        scripts.push_letter(kind);
        scripts.push_figurine(kind, mv.color);
        scripts.push_all("@");
        scripts.push_square(mv.to);
        return scripts.finish(numeric, suffix);
    }

    if let Some(side) = mv.castle {
        scripts.push_all(side.notation());
        return scripts.finish(numeric, suffix);
    }

    if piece.is(PieceKind::Pawn) {
        scripts.push_figurine(PieceKind::Pawn, mv.color);
        scripts.push_file(mv.from.file());
        if mv.is_capture() {
            scripts.push_capture();
            scripts.push_square(mv.to);
        } else {
            scripts.push_rank(mv.to.rank());
        }
        if let Some(kind) = mv.promotion() {
            scripts.push_all("=");
            scripts.push_letter(kind);
            scripts.push_figurine(kind, mv.color);
        }
        return scripts.finish(numeric, suffix);
    }

    scripts.push_letter(piece.kind);
    scripts.push_figurine(piece.kind, mv.color);

    let mut file_helper = false;
    let mut rank_helper = false;
    for other in analysis.legal_moves() {
        if other.is_drop() || other.from == mv.from || other.to != mv.to {
            continue;
        }
        let same_kind = before
            .piece_at(other.from)
            .is_some_and(|p| p.kind == piece.kind && p.color == piece.color);
        if !same_kind {
            continue;
        }
        if other.from.file() != mv.from.file() {
            file_helper = true;
        } else {
            rank_helper = true;
        }
    }
    if file_helper {
        scripts.push_file(mv.from.file());
    }
    if rank_helper {
        scripts.push_rank(mv.from.rank());
    }

    if mv.is_capture() {
        scripts.push_capture();
    }
    scripts.push_square(mv.to);
    scripts.finish(numeric, suffix)
}

impl Position {
    /// Resolve move text (long coordinate, short algebraic or drop form)
    /// to one of this position's legal moves.
    ///
    /// # Example
    /// ```
    /// use chess_rules::board::Position;
    ///
    /// let position = Position::new();
    /// assert_eq!(position.parse_move("e4").unwrap(), position.parse_move("e2e4").unwrap());
    /// assert!(position.parse_move("e5").is_err());
    /// ```
    pub fn parse_move(&self, text: &str) -> Result<Move, MoveParseError> {
        parse_move(self, &self.analyze(), text)
    }
}

/// Resolve `text` against the legal moves in `analysis` of `position`.
pub fn parse_move(position: &Position, analysis: &PositionAnalysis, text: &str) -> Result<Move, MoveParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(MoveParseError::Empty);
    }

    if let Some(caps) = LONG_FORM.captures(text) {
        let from: Square = caps[1].parse().map_err(|_| invalid_square(&caps[1]))?;
        let to: Square = caps[2].parse().map_err(|_| invalid_square(&caps[2]))?;
        let extra = caps
            .get(3)
            .map(|m| letter_to_kind(m.as_str()))
            .transpose()?;
        if from == to {
            let kind = extra.ok_or_else(|| MoveParseError::Malformed {
                text: text.to_string(),
            })?;
            return resolve_drop(position, analysis, kind, to, text);
        }
        return unique(
            text,
            analysis.legal_moves().iter().filter(|mv| {
                mv.from == from && mv.to == to && promotion_matches(mv, extra)
            }),
        );
    }

    let stripped = ANNOTATIONS.replace_all(text, "");
    let cleaned: &str = stripped.strip_suffix("ep").unwrap_or(&stripped);

    let castle = match cleaned.to_ascii_uppercase().as_str() {
        "O-O" | "0-0" => Some(CastleSide::King),
        "O-O-O" | "0-0-0" => Some(CastleSide::Queen),
        _ => None,
    };
    if let Some(side) = castle {
        return unique(
            text,
            analysis
                .legal_moves()
                .iter()
                .filter(|mv| mv.castle == Some(side)),
        );
    }

    if let Some(caps) = DROP_FORM.captures(cleaned) {
        let kind = letter_to_kind(&caps[1])?;
        let to: Square = caps[2].parse().map_err(|_| invalid_square(&caps[2]))?;
        return resolve_drop(position, analysis, kind, to, text);
    }

    let caps = SAN_FORM.captures(cleaned).ok_or_else(|| MoveParseError::Malformed {
        text: text.to_string(),
    })?;
    let kind = letter_to_kind(caps.get(1).map_or("", |m| m.as_str()))?;
    let from_file = caps
        .get(2)
        .and_then(|m| m.as_str().chars().next())
        .and_then(super::types::file_from_char);
    let from_rank = caps
        .get(3)
        .and_then(|m| m.as_str().chars().next())
        .and_then(super::types::rank_from_char);
    let to: Square = caps[4].parse().map_err(|_| invalid_square(&caps[4]))?;
    let promotion = caps
        .get(5)
        .or_else(|| caps.get(6))
        .map(|m| letter_to_kind(m.as_str()))
        .transpose()?;

    // a pawn named without a source file pushes along the destination file
    let from_file = match (kind, from_file) {
        (PieceKind::Pawn, None) => Some(to.file()),
        (_, file) => file,
    };

    unique(
        text,
        analysis.legal_moves().iter().filter(|mv| {
            !mv.is_drop()
                && mv.piece.kind == kind
                && mv.to == to
                && from_file.map_or(true, |file| mv.from.file() == file)
                && from_rank.map_or(true, |rank| mv.from.rank() == rank)
                && promotion_matches(mv, promotion)
        }),
    )
}

fn invalid_square(text: &str) -> MoveParseError {
    MoveParseError::InvalidSquare {
        text: text.to_string(),
    }
}

fn letter_to_kind(letter: &str) -> Result<PieceKind, MoveParseError> {
    ENGLISH_LETTERS
        .get(letter.to_ascii_uppercase().as_str())
        .copied()
        .filter(|kind| *kind != PieceKind::DropAny)
        .ok_or_else(|| MoveParseError::InvalidPiece {
            char: letter.chars().next().unwrap_or('?'),
        })
}

/// Without a promotion letter only non-promoting moves match (a seven-boom
/// pawn that stays a pawn included).
fn promotion_matches(mv: &Move, wanted: Option<PieceKind>) -> bool {
    match wanted {
        Some(kind) => mv.extra == Some(kind),
        None => mv.promotion().is_none(),
    }
}

fn unique<'a>(text: &str, mut candidates: impl Iterator<Item = &'a Move>) -> Result<Move, MoveParseError> {
    let first = candidates.next().copied().ok_or_else(|| MoveParseError::NoMatchingMove {
        text: text.to_string(),
    })?;
    if candidates.any(|other| *other != first) {
        return Err(MoveParseError::AmbiguousMove {
            text: text.to_string(),
        });
    }
    Ok(first)
}

/// Crazyhouse lists concrete drops; bughouse lists placeholders that are
/// resolved against the current pool here.
fn resolve_drop(
    position: &Position,
    analysis: &PositionAnalysis,
    kind: PieceKind,
    to: Square,
    text: &str,
) -> Result<Move, MoveParseError> {
    let no_match = || MoveParseError::NoMatchingMove {
        text: text.to_string(),
    };
    if !position.variant().has_drops() {
        return Err(no_match());
    }
    if let Some(mv) = analysis.find(to, to, Some(kind)) {
        return Ok(mv);
    }
    analysis
        .find(to, to, Some(PieceKind::DropAny))
        .ok_or_else(no_match)?;
    if kind == PieceKind::Pawn && (to.rank() == 0 || to.rank() == 7) {
        return Err(no_match());
    }
    let us = analysis.side_to_move();
    if !position.droppable(us).iter().any(|p| p.kind == kind) {
        return Err(no_match());
    }
    let mv = position
        .vet_candidate(Move::drop(Piece::new(kind, us), to))
        .ok_or_else(no_match)?;
    log::debug!("drop {text} resolved against the {us} pool");
    Ok(mv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names_of(fen: &str, text: &str) -> MoveNames {
        let before = Position::from_fen(fen);
        let analysis = before.analyze();
        let mv = parse_move(&before, &analysis, text).unwrap();
        let mut after = before.clone();
        after.apply(&mv);
        move_names(&before, &analysis, &mv, Some(&after.analyze()))
    }

    #[test]
    fn test_knight_move_in_every_script() {
        let names = names_of(crate::board::types::STANDARD_FEN, "g1f3");
        assert_eq!(names.get(Notation::Numeric), "g1f3");
        assert_eq!(names.get(Notation::Algebraic), "Nf3");
        assert_eq!(names.get(Notation::AlgebraicHebrew), "פו3");
        assert_eq!(names.get(Notation::Figurine), "\u{2658}f3");
        assert_eq!(names.get(Notation::FigurineHebrew), "\u{2658}ו3");
    }

    #[test]
    fn test_pawn_capture_and_promotion_names() {
        let names = names_of("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1", "axb8=N");
        assert_eq!(names.get(Notation::Algebraic), "axb8=N");
        assert_eq!(names.get(Notation::AlgebraicHebrew), "א:ב8=פ");
        assert_eq!(names.get(Notation::Numeric), "a7b8n");
        assert_eq!(names.get(Notation::Figurine), "\u{2659}axb8=\u{2658}");
    }

    #[test]
    fn test_disambiguation_helpers() {
        let by_file = names_of("4k3/8/8/8/8/8/8/R4RK1 w - - 0 1", "Rad1");
        assert_eq!(by_file.get(Notation::Algebraic), "Rad1");
        let by_rank = names_of("4k3/8/8/R7/8/8/8/R3K3 w - - 0 1", "R1a3");
        assert_eq!(by_rank.get(Notation::Algebraic), "R1a3");
    }

    #[test]
    fn test_check_suffixes() {
        let check = names_of("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", "Ra8");
        assert_eq!(check.get(Notation::Algebraic), "Ra8+");
        let mate = names_of("6k1/5ppp/8/8/8/8/8/R3K3 w - - 0 1", "Ra8");
        assert_eq!(mate.get(Notation::Algebraic), "Ra8#");
        assert_eq!(mate.get(Notation::Numeric), "a1a8");
        let double = names_of("4k3/8/8/8/4B3/8/8/4RK2 w - - 0 1", "Bb5");
        assert_eq!(double.get(Notation::Algebraic), "Bb5++");
    }

    #[test]
    fn test_castling_names_and_parsing() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        assert_eq!(names_of(fen, "O-O").get(Notation::Algebraic), "O-O");
        assert_eq!(names_of(fen, "0-0-0").get(Notation::FigurineHebrew), "O-O-O");
        let position = Position::from_fen(fen);
        assert_eq!(position.parse_move("e1g1").unwrap(), position.parse_move("O-O").unwrap());
    }

    #[test]
    fn test_drop_names() {
        let names = names_of("4k3/8/8/8/8/8/8/4K3[P] w - - 0 1", "P@e4");
        assert_eq!(names.get(Notation::Algebraic), "P@e4");
        assert_eq!(names.get(Notation::AlgebraicHebrew), "@ה4");
        assert_eq!(names.get(Notation::Numeric), "e4e4p");
    }

    #[test]
    fn test_parse_forms_agree() {
        let position = Position::new();
        let expected = position.parse_move("g1f3").unwrap();
        for text in ["Nf3", "Ngf3", "Ng1f3", "Nf3!?", "Nf3+"] {
            assert_eq!(position.parse_move(text).unwrap(), expected, "{text}");
        }
    }

    #[test]
    fn test_parse_errors_are_distinguished() {
        let position = Position::new();
        assert_eq!(position.parse_move("  "), Err(MoveParseError::Empty));
        assert!(matches!(position.parse_move("Nf4"), Err(MoveParseError::NoMatchingMove { .. })));
        assert!(matches!(position.parse_move("hello"), Err(MoveParseError::Malformed { .. })));
        assert!(matches!(position.parse_move("e2e4z"), Err(MoveParseError::InvalidPiece { char: 'z' })));
        assert!(matches!(position.parse_move("N@e4"), Err(MoveParseError::NoMatchingMove { .. })));

        let twin_knights = Position::from_fen("4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1");
        assert!(matches!(twin_knights.parse_move("Nd2"), Err(MoveParseError::AmbiguousMove { .. })));
        assert!(twin_knights.parse_move("Nbd2").is_ok());
    }

    #[test]
    fn test_promotion_requires_letter() {
        let position = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        assert!(position.parse_move("a8").is_err());
        assert_eq!(position.parse_move("a8=Q").unwrap().promotion(), Some(PieceKind::Queen));
        assert_eq!(position.parse_move("a7a8r").unwrap().promotion(), Some(PieceKind::Rook));
    }

    #[test]
    fn test_lowercase_piece_letters() {
        let promotion = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(promotion.parse_move("a8=q").unwrap(), promotion.parse_move("a8=Q").unwrap());

        let drop = Position::from_fen("4k3/8/8/8/8/8/8/4K3[P] w - - 0 1");
        assert_eq!(drop.parse_move("p@e4").unwrap(), drop.parse_move("P@e4").unwrap());
        assert!(matches!(drop.parse_move("z@e4"), Err(MoveParseError::InvalidPiece { char: 'z' })));
    }

    #[test]
    fn test_notation_names() {
        for notation in Notation::ALL {
            assert_eq!(Notation::from_name(notation.name()), Some(notation));
        }
        assert_eq!(Notation::from_name("FIGURINE"), Some(Notation::Figurine));
        assert_eq!(Notation::from_name("braille"), None);
    }
}
