use std::fmt::Write as _;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::FenError;
use super::types::{file_char, file_from_char, rank_from_char};
use super::{CastleSide, CastlingFiles, Color, Piece, PieceKind, Position, Square, Variant};

/// How the drop pools of crazyhouse and bughouse are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HoldingsEncoding {
    /// Droppable pieces in brackets after the board: `RNBQKBNR[Pn]`
    #[default]
    Bracket,
    /// Captured pieces as a ninth row: `RNBQKBNR/pN` (crazyhouse only)
    Xfen,
}

#[derive(Default)]
struct Census {
    kings: [usize; 2],
    grasshoppers: bool,
    capablanca_pieces: bool,
}

impl Position {
    /// Parse a position from FEN notation, inferring the variant from its contents.
    ///
    /// Returns an error if the FEN string is invalid.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        Self::try_from_fen_for(fen, None)
    }

    /// Parse a position from FEN notation.
    ///
    /// With `variant` set, the position must satisfy that variant's rules;
    /// otherwise the variant is inferred from the pieces, the holdings and
    /// the castling letters.
    pub fn try_from_fen_for(fen: &str, variant: Option<Variant>) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        let Some(&board_field) = parts.first() else {
            return Err(FenError::Empty);
        };

        let mut rows: Vec<&str> = board_field.split(['/', '[', ']']).collect();
        while rows.len() > 8 && rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }
        if rows.len() < 8 {
            return Err(FenError::TooFewRows { found: rows.len() });
        }
        if rows.len() > 9 {
            return Err(FenError::TooManyRows { found: rows.len() });
        }
        let bracket = board_field.contains('[');
        let holdings = rows.get(8).copied().or(bracket.then_some(""));

        let mut position = Position::empty(variant.unwrap_or_default());
        let mut census = Census::default();
        for (row_idx, row) in rows.iter().take(8).enumerate() {
            parse_row(&mut position, &mut census, 7 - row_idx, row)?;
        }

        let castling = parts.get(2).copied().unwrap_or("KQkq");
        let file_letters = castling.chars().any(|c| file_from_char(c.to_ascii_lowercase()).is_some());

        let variant = match variant {
            Some(variant) => variant,
            None => {
                let inferred = infer_variant(&census, holdings.is_some(), file_letters);
                log::debug!("position '{fen}' read as {inferred}");
                inferred
            }
        };
        position.variant = variant;

        if variant.rules().requires_single_king() {
            for color in Color::BOTH {
                let found = census.kings[color.index()];
                if found != 1 {
                    return Err(FenError::KingCount { color, found });
                }
            }
        }
        if let Some(holdings) = holdings {
            if !variant.has_drops() {
                return Err(FenError::UnexpectedHoldings { variant });
            }
            parse_holdings(&mut position, holdings, bracket)?;
        }
        if file_letters && !variant.rules().is_fischer() {
            return Err(FenError::CastlingVariantMismatch {
                token: castling.to_string(),
                variant,
            });
        }

        position.side_to_move = match parts.get(1).copied().unwrap_or("w") {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        parse_castling(&mut position, castling, file_letters)?;

        if let Some(&token) = parts.get(3) {
            if token != "-" {
                position.en_passant = parse_en_passant(&position, token);
                if position.en_passant.is_none() {
                    log::warn!("ignoring en-passant field '{token}' in '{fen}'");
                }
            }
        }

        if let Some(&token) = parts.get(4) {
            position.halfmove_clock = token.parse().unwrap_or_else(|_| {
                log::warn!("bad half-move clock '{token}', using 0");
                0
            });
        }

        if let Some(&token) = parts.get(5) {
            let number: i64 = token.parse().unwrap_or_else(|_| {
                log::warn!("bad move number '{token}', using 1");
                1
            });
            if number < 1 {
                log::warn!("move number {number} below 1, using 1");
            }
            position.fullmove_number = u32::try_from(number.max(1)).unwrap_or(u32::MAX);
        }

        Ok(position)
    }

    /// Parse a position from FEN notation.
    ///
    /// # Panics
    /// Panics if the FEN string is invalid. Use `try_from_fen` for fallible parsing.
    #[must_use]
    pub fn from_fen(fen: &str) -> Self {
        Self::try_from_fen(fen).expect("Invalid FEN string")
    }

    /// Convert the position to FEN notation, holdings in brackets.
    #[must_use]
    pub fn to_fen(&self) -> String {
        self.to_fen_with(HoldingsEncoding::Bracket)
    }

    /// Convert the position to FEN notation with the given holdings encoding.
    #[must_use]
    pub fn to_fen_with(&self, encoding: HoldingsEncoding) -> String {
        let drops = self.variant.has_drops();
        let mut fen = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_at(Square(rank, file)) {
                    Some(piece) => {
                        if empty > 0 {
                            let _ = write!(fen, "{empty}");
                            empty = 0;
                        }
                        fen.push(piece.to_fen_char());
                        if drops && piece.promoted {
                            fen.push('~');
                        }
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                let _ = write!(fen, "{empty}");
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        if drops {
            if encoding == HoldingsEncoding::Xfen && self.variant == Variant::Crazyhouse {
                if self.has_captured_pieces() {
                    fen.push('/');
                    push_pool(&mut fen, &self.captured);
                }
            } else {
                fen.push('[');
                if self.droppable.iter().all(Vec::is_empty) {
                    fen.push('-');
                } else {
                    push_pool(&mut fen, &self.droppable);
                }
                fen.push(']');
            }
        }

        let en_passant = self
            .en_passant_target()
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());
        format!(
            "{} {} {} {} {} {}",
            fen,
            self.side_to_move.fen_char(),
            self.castling_token(),
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Castling field: `KQkq` letters, or rook files under Fischer rules; sorted.
    fn castling_token(&self) -> String {
        let (right, left) = if self.rules().is_fischer() {
            (
                file_char(self.castling_files.right_rook),
                file_char(self.castling_files.left_rook),
            )
        } else {
            ('k', 'q')
        };
        let mut letters = Vec::new();
        for color in Color::BOTH {
            for (side, letter) in [(CastleSide::King, right), (CastleSide::Queen, left)] {
                if self.castling.has(color, side) {
                    letters.push(if color == Color::White {
                        letter.to_ascii_uppercase()
                    } else {
                        letter
                    });
                }
            }
        }
        if letters.is_empty() {
            return "-".to_string();
        }
        letters.sort_unstable();
        letters.into_iter().collect()
    }
}

fn push_pool(fen: &mut String, pools: &[Vec<Piece>; 2]) {
    for color in Color::BOTH {
        for piece in &pools[color.index()] {
            fen.push(piece.kind_when_dropping().to_fen_char(color));
        }
    }
}

fn parse_row(position: &mut Position, census: &mut Census, rank: usize, row: &str) -> Result<(), FenError> {
    let mut file = 0;
    let mut last: Option<Square> = None;
    for c in row.chars() {
        if c == '~' {
            let sq = last.ok_or(FenError::StrayPromotionMarker { rank })?;
            if let Some(piece) = position.squares[sq.as_index()].as_mut() {
                piece.promoted = true;
            }
            continue;
        }
        if let Some(run) = c.to_digit(10) {
            file += run as usize;
            continue;
        }
        let kind = PieceKind::from_char(c)
            .filter(|kind| *kind != PieceKind::DropAny)
            .ok_or(FenError::InvalidPiece { char: c })?;
        if file >= 8 {
            return Err(FenError::BadRowLength {
                rank,
                files: file + 1,
            });
        }
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        match kind {
            PieceKind::King => census.kings[color.index()] += 1,
            PieceKind::Grasshopper => census.grasshoppers = true,
            PieceKind::Archbishop | PieceKind::Chancellor => census.capablanca_pieces = true,
            _ => {}
        }
        let sq = Square(rank, file);
        position.put(sq, Piece::new(kind, color));
        last = Some(sq);
        file += 1;
    }
    if file != 8 {
        return Err(FenError::BadRowLength { rank, files: file });
    }
    Ok(())
}

fn infer_variant(census: &Census, holdings: bool, file_letters: bool) -> Variant {
    if census.kings != [1, 1] {
        Variant::FreePlay
    } else if census.grasshoppers {
        Variant::Grasshopper
    } else if census.capablanca_pieces {
        Variant::MiniCapablanca
    } else if holdings {
        Variant::Crazyhouse
    } else if file_letters {
        Variant::Fischer
    } else {
        Variant::Standard
    }
}

/// Bracket holdings list each side's droppable pieces (uppercase: White may
/// drop them). The XFEN row lists captured pieces by their own color.
fn parse_holdings(position: &mut Position, holdings: &str, bracket: bool) -> Result<(), FenError> {
    let crazyhouse = position.variant == Variant::Crazyhouse;
    for c in holdings.chars() {
        if c == '-' {
            break;
        }
        let kind = PieceKind::from_char(c)
            .filter(|kind| !matches!(kind, PieceKind::DropAny | PieceKind::King))
            .ok_or(FenError::InvalidPiece { char: c })?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let opponent = color.opponent();
        if bracket {
            position.droppable[color.index()].push(Piece::new(kind, color));
            if crazyhouse {
                position.captured[opponent.index()].push(Piece::new(kind, opponent));
            }
        } else {
            if crazyhouse {
                position.captured[color.index()].push(Piece::new(kind, color));
            }
            position.droppable[opponent.index()].push(Piece::new(kind, opponent));
        }
    }
    Ok(())
}

fn parse_castling(position: &mut Position, token: &str, file_letters: bool) -> Result<(), FenError> {
    if file_letters {
        let mut king_file = None;
        let mut left = None;
        let mut right = None;
        for c in token.chars() {
            let Some(file) = file_from_char(c.to_ascii_lowercase()) else {
                continue;
            };
            let color = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            let king = position
                .king_square(color)
                .map_or(CastlingFiles::STANDARD.king, Square::file);
            king_file.get_or_insert(king);
            if file > king {
                right = Some(file);
            } else {
                left = Some(file);
            }
        }
        let king = king_file.unwrap_or(CastlingFiles::STANDARD.king);
        position.castling_files = CastlingFiles {
            king,
            left_rook: left.unwrap_or(king),
            right_rook: right.unwrap_or(king),
        };
        log::debug!("castling files {:?} from '{token}'", position.castling_files);
    }

    let king_file = position.castling_files.king;
    let mut rights = Vec::new();
    for c in token.chars() {
        let right = match c {
            '-' => continue,
            'K' => (Color::White, CastleSide::King),
            'Q' => (Color::White, CastleSide::Queen),
            'k' => (Color::Black, CastleSide::King),
            'q' => (Color::Black, CastleSide::Queen),
            'A'..='H' | 'a'..='h' => {
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let file = file_from_char(c.to_ascii_lowercase()).unwrap_or(0);
                let side = if file > king_file {
                    CastleSide::King
                } else {
                    CastleSide::Queen
                };
                (color, side)
            }
            _ => return Err(FenError::InvalidCastling { char: c }),
        };
        rights.push(right);
    }
    for (color, side) in rights {
        if position.castling_pieces_home(color, side) {
            position.castling.set(color, side);
        }
    }
    Ok(())
}

/// The double-stepped pawn named by an en-passant field, if a pawn of the
/// side to move can actually take it.
fn parse_en_passant(position: &Position, token: &str) -> Option<Square> {
    let mut chars = token.chars();
    let (Some(f), Some(r), None) = (chars.next(), chars.next(), chars.next()) else {
        return None;
    };
    let target = Square(rank_from_char(r)?, file_from_char(f)?);
    let us = position.side_to_move;
    let expected_rank = match us {
        Color::White => 5,
        Color::Black => 2,
    };
    if target.rank() != expected_rank {
        return None;
    }
    let dir = us.pawn_direction();
    let origin = target.offset(dir, 0)?;
    if !position.is_empty(target) || !position.is_empty(origin) {
        return None;
    }
    let pawn_sq = target.offset(-dir, 0)?;
    let pawn = position.piece_at(pawn_sq)?;
    if !pawn.is(PieceKind::Pawn) || pawn.color == us {
        return None;
    }
    let capturer = [-1, 1]
        .into_iter()
        .filter_map(|df| pawn_sq.offset(0, df))
        .any(|sq| {
            position
                .piece_at(sq)
                .is_some_and(|p| p.is(PieceKind::Pawn) && p.color == us)
        });
    capturer.then_some(pawn_sq)
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::try_from_fen(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fen_round_trip() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let position = Position::try_from_fen(fen).unwrap();
        assert_eq!(position.variant(), Variant::Standard);
        assert_eq!(position.to_fen(), fen);
    }

    #[test]
    fn test_variant_start_positions_round_trip() {
        for variant in Variant::ALL {
            let position = Position::for_variant(variant);
            let parsed = Position::try_from_fen_for(variant.start_fen(), Some(variant)).unwrap();
            assert_eq!(parsed, position, "{variant}");
            let reparsed = Position::try_from_fen_for(&position.to_fen(), Some(variant)).unwrap();
            assert_eq!(reparsed, position, "{variant}");
        }
        assert_eq!(
            Position::for_variant(Variant::Crazyhouse).to_fen(),
            Variant::Crazyhouse.start_fen()
        );
        assert!(Position::for_variant(Variant::Fischer).to_fen().contains(" AHah "));
        for variant in [Variant::Standard, Variant::Grasshopper, Variant::MiniCapablanca] {
            assert_eq!(Position::for_variant(variant).to_fen(), variant.start_fen());
        }
    }

    #[test]
    fn test_missing_fields_default() {
        let position = Position::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap();
        assert_eq!(position.to_fen(), STANDARD_START);
    }

    const STANDARD_START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_variant_inference() {
        let cases = [
            ("8/8/8/8/8/8/8/K7 w - - 0 1", Variant::FreePlay),
            ("k7/8/8/8/8/8/G7/K7 w - - 0 1", Variant::Grasshopper),
            ("k7/8/8/8/8/8/C7/K7 w - - 0 1", Variant::MiniCapablanca),
            ("k7/8/8/8/8/8/8/K7[Q] w - - 0 1", Variant::Crazyhouse),
            ("rk5r/8/8/8/8/8/8/RK5R w AHah - 0 1", Variant::Fischer),
            ("k7/8/8/8/8/8/8/K7 w - - 0 1", Variant::Standard),
        ];
        for (fen, variant) in cases {
            assert_eq!(Position::try_from_fen(fen).unwrap().variant(), variant, "{fen}");
        }
    }

    #[test]
    fn test_crazyhouse_holdings_encodings_agree() {
        let bracket = "r2q1r1k/ppp2pp1/2np3p/2b1p3/2B1P1b1/2NP1N2/PPP2PPP/R1BQ1RK1[NPNPQRNq] w - - 0 1";
        let xfen = "r2q1r1k/ppp2pp1/2np3p/2b1p3/2B1P1b1/2NP1N2/PPP2PPP/R1BQ1RK1/Qnpnpqrn w - - 0 1";
        let from_bracket = Position::try_from_fen(bracket).unwrap();
        let from_xfen = Position::try_from_fen(xfen).unwrap();
        assert_eq!(from_bracket.variant(), Variant::Crazyhouse);
        assert_eq!(from_xfen.variant(), Variant::Crazyhouse);
        assert_eq!(from_bracket.to_fen(), bracket);
        assert_eq!(from_xfen.to_fen(), bracket);
        assert_eq!(from_bracket.to_fen_with(HoldingsEncoding::Xfen), xfen);
        assert_eq!(from_bracket.droppable(Color::Black).len(), 1);
        assert_eq!(from_bracket.droppable(Color::White).len(), 7);
    }

    #[test]
    fn test_promoted_marker() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQ~KBNR[-] w KQkq - 0 1";
        let position = Position::try_from_fen(fen).unwrap();
        let queen = position.piece_at(Square(0, 3)).unwrap();
        assert!(queen.promoted);
        assert_eq!(queen.kind_when_dropping(), PieceKind::Pawn);
        assert_eq!(position.to_fen(), fen);
    }

    #[test]
    fn test_fischer_castling_letters() {
        let fen = "nbrqbkrn/pppppppp/8/8/8/8/PPPPPPPP/NBRQBKRN w CGcg - 0 1";
        let position = Position::try_from_fen(fen).unwrap();
        assert_eq!(position.variant(), Variant::Fischer);
        let files = position.castling_files();
        assert_eq!((files.left_rook, files.king, files.right_rook), (2, 5, 6));
        assert!(position.castling_rights().has(Color::Black, CastleSide::King));
        assert_eq!(position.to_fen(), fen);
    }

    #[test]
    fn test_castling_needs_pieces_at_home() {
        let position = Position::try_from_fen("r3k3/8/8/8/8/8/8/4K2R w KQkq - 0 1").unwrap();
        assert!(position.castling_rights().has(Color::White, CastleSide::King));
        assert!(!position.castling_rights().has(Color::White, CastleSide::Queen));
        assert!(!position.castling_rights().has(Color::Black, CastleSide::King));
        assert!(position.castling_rights().has(Color::Black, CastleSide::Queen));
        assert!(position.to_fen().contains(" Kq "));
    }

    #[test]
    fn test_en_passant_is_rederived() {
        let with_capturer = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1";
        assert_eq!(Position::from_fen(with_capturer).to_fen(), with_capturer);

        let without = Position::from_fen("4k3/8/8/3p4/8/8/8/4K3 w - d6 0 1");
        assert_eq!(without.en_passant_pawn(), None);
        assert!(without.to_fen().contains(" - 0 1"));

        let garbage = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - z9 0 1");
        assert_eq!(garbage.en_passant_pawn(), None);
    }

    #[test]
    fn test_move_number_clamped() {
        let position = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 12 0");
        assert_eq!(position.fullmove_number(), 1);
        assert_eq!(position.halfmove_clock(), 12);
    }

    #[test]
    fn test_fen_errors() {
        assert!(matches!(Position::try_from_fen("   "), Err(FenError::Empty)));
        assert!(matches!(
            Position::try_from_fen("8/8/8 w - - 0 1"),
            Err(FenError::TooFewRows { found: 3 })
        ));
        assert!(matches!(
            Position::try_from_fen("4k3/8/8/8/8/8/8/4K3/Pp/Nn w - - 0 1"),
            Err(FenError::TooManyRows { found: 10 })
        ));
        assert!(matches!(
            Position::try_from_fen("rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiece { char: 'x' })
        ));
        assert!(matches!(
            Position::try_from_fen("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::BadRowLength { rank: 6, files: 7 })
        ));
        assert!(matches!(
            Position::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"),
            Err(FenError::InvalidSideToMove { .. })
        ));
        assert!(matches!(
            Position::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkz - 0 1"),
            Err(FenError::InvalidCastling { char: 'z' })
        ));
        assert!(matches!(
            Position::try_from_fen("~7/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::StrayPromotionMarker { rank: 7 })
        ));
    }

    #[test]
    fn test_fen_errors_against_variant() {
        assert!(matches!(
            Position::try_from_fen_for("8/8/8/8/8/8/8/K7 w - - 0 1", Some(Variant::Standard)),
            Err(FenError::KingCount {
                color: Color::Black,
                found: 0
            })
        ));
        assert!(Position::try_from_fen_for("8/8/8/8/8/8/8/K7 w - - 0 1", Some(Variant::Suicide)).is_ok());
        assert!(matches!(
            Position::try_from_fen_for(STANDARD_START.replace("KQkq", "AHah").as_str(), Some(Variant::Crazyhouse)),
            Err(FenError::CastlingVariantMismatch { .. })
        ));
        assert!(matches!(
            Position::try_from_fen_for(
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR[Q] w KQkq - 0 1",
                Some(Variant::Standard)
            ),
            Err(FenError::UnexpectedHoldings { .. })
        ));
    }
}
