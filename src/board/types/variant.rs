//! Game variants and the rule sets they play under.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::{Color, PieceKind};

pub(crate) const STANDARD_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
const GRASSHOPPER_FEN: &str =
    "rnbqkbnr/gggggggg/pppppppp/8/8/PPPPPPPP/GGGGGGGG/RNBQKBNR w KQkq - 0 1";
const MINI_CAPABLANCA_FEN: &str = "rabqkbcr/pppppppp/8/8/8/8/PPPPPPPP/RABQKBCR w KQkq - 0 1";
const DROP_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR[-] w KQkq - 0 1";

const STANDARD_PROMOTIONS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
];
const SUICIDE_PROMOTIONS: [PieceKind; 5] = [
    PieceKind::King,
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
];
const GRASSHOPPER_PROMOTIONS: [PieceKind; 5] = [
    PieceKind::Grasshopper,
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
];
const MINI_CAPABLANCA_PROMOTIONS: [PieceKind; 6] = [
    PieceKind::Archbishop,
    PieceKind::Chancellor,
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
];
const SEVEN_BOOM_PARTIAL: [PieceKind; 4] = [
    PieceKind::Pawn,
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
];

/// The supported chess variants.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum Variant {
    #[default]
    Standard,
    /// Chess960: back-rank setup varies, castling by rook files.
    Fischer,
    /// Antichess: captures are compulsory, the king has no royal status.
    Suicide,
    Grasshopper,
    /// Standard board with archbishops and chancellors in place of knights.
    MiniCapablanca,
    /// No king-count restriction.
    FreePlay,
    Crazyhouse,
    /// Pawns may also promote (to a minor piece or rook) on reaching the 2nd/7th rank.
    SevenBoom,
    /// Crazyhouse on two boards; captured pieces go to the partner board.
    Bughouse,
}

/// Rule families shared by several variants.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rules {
    Regular,
    Fischer,
    Suicide,
    FreePlay,
    Crazyhouse,
}

impl Variant {
    pub const ALL: [Variant; 9] = [
        Variant::Standard,
        Variant::Fischer,
        Variant::Suicide,
        Variant::Grasshopper,
        Variant::MiniCapablanca,
        Variant::FreePlay,
        Variant::Crazyhouse,
        Variant::SevenBoom,
        Variant::Bughouse,
    ];

    #[must_use]
    pub const fn rules(self) -> Rules {
        match self {
            Variant::Fischer => Rules::Fischer,
            Variant::Suicide => Rules::Suicide,
            Variant::FreePlay => Rules::FreePlay,
            Variant::Crazyhouse | Variant::Bughouse => Rules::Crazyhouse,
            Variant::Standard
            | Variant::Grasshopper
            | Variant::MiniCapablanca
            | Variant::SevenBoom => Rules::Regular,
        }
    }

    /// Pieces can be dropped from a holding pool
    #[inline]
    #[must_use]
    pub const fn has_drops(self) -> bool {
        matches!(self, Variant::Crazyhouse | Variant::Bughouse)
    }

    /// Position notation of the variant's default starting position
    #[must_use]
    pub const fn start_fen(self) -> &'static str {
        match self {
            Variant::Grasshopper => GRASSHOPPER_FEN,
            Variant::MiniCapablanca => MINI_CAPABLANCA_FEN,
            Variant::Crazyhouse | Variant::Bughouse => DROP_FEN,
            _ => STANDARD_FEN,
        }
    }

    /// Name used in the `Variant` tag of a game record; `None` for standard chess
    #[must_use]
    pub const fn pgn_name(self) -> Option<&'static str> {
        match self {
            Variant::Standard => None,
            Variant::Fischer => Some("Fischerandom"),
            Variant::Suicide => Some("Suicide"),
            Variant::Grasshopper => Some("Grasshoper"),
            Variant::MiniCapablanca => Some("MiniCapa"),
            Variant::FreePlay => Some("Free"),
            Variant::Crazyhouse => Some("CrazyHouse"),
            Variant::Bughouse => Some("BugHouse"),
            Variant::SevenBoom => Some("SevenBoom"),
        }
    }

    /// Case-insensitive lookup of a `Variant` tag value
    #[must_use]
    pub fn from_pgn_name(name: &str) -> Option<Variant> {
        let name = name.trim();
        if let Some(variant) = Variant::ALL
            .into_iter()
            .find(|v| v.pgn_name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
        {
            return Some(variant);
        }
        match name.to_ascii_lowercase().as_str() {
            "standard" | "normal" | "regular" => Some(Variant::Standard),
            "chess960" | "fischerrandom" | "fischer" => Some(Variant::Fischer),
            "antichess" | "giveaway" => Some(Variant::Suicide),
            "grasshopper" => Some(Variant::Grasshopper),
            "freeplay" => Some(Variant::FreePlay),
            _ => None,
        }
    }

    /// Rank from which pawns of `color` may advance two squares
    #[must_use]
    pub(crate) const fn pawn_start_rank(self, color: Color) -> usize {
        match (self, color) {
            (Variant::Grasshopper, Color::White) => 2,
            (Variant::Grasshopper, Color::Black) => 5,
            _ => color.pawn_start_rank(),
        }
    }

    /// Kinds a pawn may become on reaching `rank` (0-based). Empty when the
    /// rank is not a promotion rank for this variant.
    #[must_use]
    pub(crate) fn promotion_kinds(self, rank: usize) -> &'static [PieceKind] {
        match rank {
            0 | 7 => match self {
                Variant::Suicide => &SUICIDE_PROMOTIONS,
                Variant::Grasshopper => &GRASSHOPPER_PROMOTIONS,
                Variant::MiniCapablanca => &MINI_CAPABLANCA_PROMOTIONS,
                _ => &STANDARD_PROMOTIONS,
            },
            1 | 6 if self == Variant::SevenBoom => &SEVEN_BOOM_PARTIAL,
            _ => &[],
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pgn_name().unwrap_or("Standard"))
    }
}

impl Rules {
    /// Each side must have exactly one king
    #[inline]
    #[must_use]
    pub const fn requires_single_king(self) -> bool {
        matches!(self, Rules::Regular | Rules::Fischer | Rules::Crazyhouse)
    }

    /// Kings are royal: checks exist and moves into check are illegal
    #[inline]
    #[must_use]
    pub const fn has_check(self) -> bool {
        !matches!(self, Rules::Suicide)
    }

    #[inline]
    #[must_use]
    pub const fn captures_compulsory(self) -> bool {
        matches!(self, Rules::Suicide)
    }

    #[inline]
    #[must_use]
    pub const fn allows_castling(self) -> bool {
        !matches!(self, Rules::Suicide)
    }

    /// Castling letters are rook files rather than K/Q
    #[inline]
    #[must_use]
    pub const fn is_fischer(self) -> bool {
        matches!(self, Rules::Fischer)
    }

    /// Whether a drop restarts the fifty-move count. Drops never do here,
    /// only captures and pawn moves.
    #[inline]
    #[must_use]
    pub const fn drop_resets_halfmove_clock(self) -> bool {
        false
    }

    /// Insufficient material never ends the game under these rules
    #[inline]
    #[must_use]
    pub const fn exempt_from_material_draw(self) -> bool {
        matches!(self, Rules::Suicide | Rules::FreePlay)
    }
}
