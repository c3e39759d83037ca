//! Legal move generation and the per-ply analysis of a position.
//!
//! `PositionAnalysis` is computed once per ply and never changes
//! afterwards. It holds the complete legal move list, the check, mate and
//! stalemate status, pins, material sufficiency and the position notation
//! of the analyzed position.
//!
//! # Example
//! ```
//! use chess_rules::board::Position;
//!
//! let analysis = Position::new().analyze();
//! assert_eq!(analysis.legal_moves().len(), 20);
//! assert!(!analysis.is_check());
//! ```

use once_cell::unsync::OnceCell;

use super::make_unmake::relocate;
use super::movegen::{self, first_piece, line_to, DIAGONAL, STRAIGHT};
use super::{
    Bitboard, CastleSide, Color, Mailbox, Move, MoveList, Piece, PieceKind, Position, Square,
    Variant,
};

/// A piece that may not leave the line between its king and an enemy slider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pin {
    pub pinned: Square,
    pub by: Square,
}

/// Mating-material flags in four slots: white, black, pool material
/// present, variant exempt from material draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct MaterialSufficiency(pub [bool; 4]);

impl MaterialSufficiency {
    pub const POOL: usize = 2;
    pub const EXEMPT: usize = 3;

    #[must_use]
    pub fn has_mating_material(self, color: Color) -> bool {
        self.0[color.index()]
    }

    /// No slot is set: neither side can mate, nothing can be dropped, and
    /// the variant does not ignore material draws.
    #[must_use]
    pub fn is_insufficient(self) -> bool {
        self.0.iter().all(|flag| !flag)
    }
}

/// Snapshot of everything derived from one position.
#[derive(Clone, Debug)]
pub struct PositionAnalysis {
    side_to_move: Color,
    check: bool,
    double_check: bool,
    checkmate: bool,
    stalemate: bool,
    halfmove_clock: u32,
    fen: String,
    legal_moves: MoveList,
    pins: Vec<Pin>,
    material: MaterialSufficiency,
    eco: OnceCell<Option<u16>>,
}

impl Position {
    /// Compute the legal moves and status of this position.
    #[must_use]
    pub fn analyze(&self) -> PositionAnalysis {
        PositionAnalysis::new(self)
    }

    /// Legal moves of the side to move
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        self.analyze().legal_moves
    }

    /// Count the leaf nodes of the legal move tree to `depth` plies.
    ///
    /// Bughouse drop placeholders are counted as leaves.
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for mv in &moves {
            if mv.extra == Some(PieceKind::DropAny) {
                nodes += 1;
                continue;
            }
            let info = self.apply(mv);
            nodes += self.perft(depth - 1);
            self.unapply(mv, info);
        }
        nodes
    }

    /// Run the king-safety filter on a single candidate, setting its check flag.
    pub(crate) fn vet_candidate(&self, mv: Move) -> Option<Move> {
        let mut generator = Generator::new(self);
        generator.push_if_legal(mv);
        generator.moves.first()
    }
}

impl PositionAnalysis {
    #[must_use]
    pub fn new(position: &Position) -> Self {
        let us = position.side_to_move;
        let rules = position.rules();

        let mut generator = Generator::new(position);
        let checkers = generator
            .king
            .map_or_else(Vec::new, |k| movegen::attackers(&position.squares, k, us.opponent()));
        let pins = generator
            .king
            .map_or_else(Vec::new, |k| find_pins(&position.squares, k, us));
        let check = !checkers.is_empty();

        generator.board_moves(&pins);
        if !check && rules.allows_castling() {
            generator.castling_moves();
        }
        if position.variant.has_drops() {
            generator.drop_moves();
        }

        let mut legal_moves = generator.moves;
        if rules.captures_compulsory() && legal_moves.iter().any(Move::is_capture) {
            legal_moves.retain(Move::is_capture);
        }

        let no_moves = legal_moves.is_empty();
        PositionAnalysis {
            side_to_move: us,
            check,
            double_check: checkers.len() >= 2,
            checkmate: check && no_moves,
            stalemate: !check && no_moves,
            halfmove_clock: position.halfmove_clock,
            fen: position.to_fen(),
            legal_moves,
            pins,
            material: material_sufficiency(position),
            eco: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[must_use]
    pub fn is_check(&self) -> bool {
        self.check
    }

    /// Two or more pieces give check at once
    #[must_use]
    pub fn is_double_check(&self) -> bool {
        self.double_check
    }

    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    /// No legal moves without being in check
    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        self.stalemate
    }

    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Position notation (bracket holdings) of the analyzed position
    #[must_use]
    pub fn fen(&self) -> &str {
        &self.fen
    }

    #[must_use]
    pub fn legal_moves(&self) -> &MoveList {
        &self.legal_moves
    }

    #[must_use]
    pub fn has_legal_moves(&self) -> bool {
        !self.legal_moves.is_empty()
    }

    #[must_use]
    pub fn is_move_valid(&self, mv: &Move) -> bool {
        self.legal_moves.contains(mv)
    }

    #[must_use]
    pub fn find(&self, from: Square, to: Square, extra: Option<PieceKind>) -> Option<Move> {
        self.legal_moves.find(from, to, extra)
    }

    /// Legal destinations of the piece on `from` (drops excluded)
    #[must_use]
    pub fn reachable_from(&self, from: Square) -> Bitboard {
        self.legal_moves
            .iter()
            .filter(|mv| !mv.is_drop() && mv.from == from)
            .map(|mv| mv.to)
            .collect()
    }

    #[must_use]
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    #[must_use]
    pub fn is_pinned(&self, sq: Square) -> bool {
        self.pins.iter().any(|pin| pin.pinned == sq)
    }

    #[must_use]
    pub fn material(&self) -> MaterialSufficiency {
        self.material
    }

    /// Opening classification, computed by `classify` from the position
    /// notation on first request and cached afterwards.
    pub fn eco_or_init(&self, classify: impl FnOnce(&str) -> Option<u16>) -> Option<u16> {
        *self.eco.get_or_init(|| classify(&self.fen))
    }

    /// The cached opening classification; `None` until `eco_or_init` ran.
    #[must_use]
    pub fn cached_eco(&self) -> Option<Option<u16>> {
        self.eco.get().copied()
    }
}

struct Generator<'a> {
    position: &'a Position,
    us: Color,
    them: Color,
    /// Our king when king safety applies
    king: Option<Square>,
    their_king: Option<Square>,
    moves: MoveList,
}

impl<'a> Generator<'a> {
    fn new(position: &'a Position) -> Self {
        let us = position.side_to_move;
        let them = us.opponent();
        let (king, their_king) = if position.rules().has_check() {
            (position.king_square(us), position.king_square(them))
        } else {
            (None, None)
        };
        Generator {
            position,
            us,
            them,
            king,
            their_king,
            moves: MoveList::new(),
        }
    }

    fn board_moves(&mut self, pins: &[Pin]) {
        let position = self.position;
        for (from, piece) in position.pieces(self.us) {
            let mut reach = movegen::reachability(position, from, piece);
            if let (Some(pin), Some(king)) = (pins.iter().find(|p| p.pinned == from), self.king) {
                reach &= line_to(king, pin.by);
            }
            let is_pawn = piece.is(PieceKind::Pawn);
            for to in reach.iter() {
                let captured = position.piece_at(to);
                let mv = if is_pawn && captured.is_none() && from.file() != to.file() {
                    match position.piece_at(Square(from.rank(), to.file())) {
                        Some(victim) => Move::en_passant(piece, from, to, victim),
                        None => continue,
                    }
                } else {
                    Move::normal(piece, from, to, captured)
                };
                let promotions = if is_pawn {
                    position.variant.promotion_kinds(to.rank())
                } else {
                    &[]
                };
                if promotions.is_empty() {
                    self.push_if_legal(mv);
                } else {
                    for &kind in promotions {
                        self.push_if_legal(mv.with_extra(kind));
                    }
                }
            }
        }
    }

    fn castling_moves(&mut self) {
        let Some(king) = self.king else {
            return;
        };
        let position = self.position;
        let files = position.castling_files;
        let rank = self.us.back_rank();
        let king_from = Square(rank, files.king);
        if king != king_from {
            return;
        }
        let Some(king_piece) = position.piece_at(king_from) else {
            return;
        };

        for side in CastleSide::BOTH {
            if !position.castling.has(self.us, side) {
                continue;
            }
            let rook_from = Square(rank, files.rook_file(side));
            let own_rook = position
                .piece_at(rook_from)
                .is_some_and(|p| p.is(PieceKind::Rook) && p.color == self.us);
            if !own_rook {
                continue;
            }

            let king_to = side.king_target_file();
            let rook_to = side.rook_target_file();
            let span = [king_from.file(), rook_from.file(), king_to, rook_to];
            let lo = span.iter().copied().min().unwrap_or(0);
            let hi = span.iter().copied().max().unwrap_or(7);
            let blocked = (lo..=hi)
                .map(|file| Square(rank, file))
                .any(|sq| sq != king_from && sq != rook_from && !position.is_empty(sq));
            if blocked {
                continue;
            }

            let (a, b) = if king_from.file() <= king_to {
                (king_from.file(), king_to)
            } else {
                (king_to, king_from.file())
            };
            let path_attacked = (a..=b)
                .any(|file| movegen::is_attacked(&position.squares, Square(rank, file), self.them));
            if path_attacked {
                continue;
            }

            let to = if position.rules().is_fischer() {
                rook_from
            } else {
                Square(rank, king_to)
            };
            self.push_if_legal(Move::castling(king_piece, king_from, to, side));
        }
    }

    fn drop_moves(&mut self) {
        let position = self.position;
        let empty: Vec<Square> = Square::all().filter(|sq| position.is_empty(*sq)).collect();

        if position.variant == Variant::Bughouse {
            let placeholder = Piece::new(PieceKind::DropAny, self.us);
            for &sq in &empty {
                self.push_if_legal(Move::drop(placeholder, sq));
            }
            return;
        }

        let mut kinds: Vec<PieceKind> = position.droppable(self.us).iter().map(|p| p.kind).collect();
        kinds.sort();
        kinds.dedup();
        for kind in kinds {
            for &sq in &empty {
                if kind == PieceKind::Pawn && (sq.rank() == 0 || sq.rank() == 7) {
                    continue;
                }
                self.push_if_legal(Move::drop(Piece::new(kind, self.us), sq));
            }
        }
    }

    /// Self-check filter; also sets the move's check flag.
    fn push_if_legal(&mut self, mut mv: Move) {
        let mut after = self.position.squares;
        relocate(&mut after, &mv, self.position.castling_files);

        if let Some(king) = self.king {
            let king_now = if mv.piece.is(PieceKind::King) && !mv.is_drop() {
                king_destination(&mv)
            } else {
                king
            };
            if movegen::is_attacked(&after, king_now, self.them) {
                return;
            }
        }
        if let Some(their_king) = self.their_king {
            let still_there = after[their_king.as_index()]
                .is_some_and(|p| p.is(PieceKind::King) && p.color == self.them);
            mv.check = still_there && movegen::is_attacked(&after, their_king, self.us);
        }
        self.moves.push(mv);
    }
}

fn king_destination(mv: &Move) -> Square {
    match mv.castle {
        Some(side) => Square(mv.from.rank(), side.king_target_file()),
        None => mv.to,
    }
}

fn find_pins(board: &Mailbox, king: Square, us: Color) -> Vec<Pin> {
    let lines: [(&[(isize, isize); 4], fn(PieceKind) -> bool); 2] = [
        (&STRAIGHT, PieceKind::slides_straight),
        (&DIAGONAL, PieceKind::slides_diagonally),
    ];
    let mut pins = Vec::new();
    for (directions, slides) in lines {
        for &(dr, df) in directions {
            let Some(first) = first_piece(board, king, dr, df) else {
                continue;
            };
            if !board[first.as_index()].is_some_and(|p| p.color == us) {
                continue;
            }
            let Some(second) = first_piece(board, first, dr, df) else {
                continue;
            };
            if board[second.as_index()].is_some_and(|p| p.color != us && slides(p.kind)) {
                pins.push(Pin {
                    pinned: first,
                    by: second,
                });
            }
        }
    }
    pins
}

fn material_sufficiency(position: &Position) -> MaterialSufficiency {
    let minors = Color::BOTH.map(|color| Minors::count(position.pieces(color)));
    let bishops_on_one_color = {
        let light = minors.iter().any(|m| m.light_bishops > 0);
        let dark = minors.iter().any(|m| m.dark_bishops > 0);
        minors.iter().all(|m| m.knights == 0 && !m.major) && !(light && dark)
    };

    let mut flags = [false; 4];
    for color in Color::BOTH {
        let own = minors[color.index()];
        let other = minors[color.opponent().index()];
        // a lone minor piece mates only with an enemy piece blocking the king
        flags[color.index()] = own.mates_alone()
            || (own.total() > 0 && other.total() > 0 && !bishops_on_one_color);
    }
    flags[MaterialSufficiency::POOL] = position.variant == Variant::Bughouse
        || position.droppable.iter().any(|pool| !pool.is_empty());
    flags[MaterialSufficiency::EXEMPT] = position.rules().exempt_from_material_draw();
    MaterialSufficiency(flags)
}

/// Non-king material of one side, with anything beyond minor pieces as `major`
#[derive(Clone, Copy, Default)]
struct Minors {
    knights: u32,
    light_bishops: u32,
    dark_bishops: u32,
    major: bool,
}

impl Minors {
    fn count(pieces: impl Iterator<Item = (Square, Piece)>) -> Self {
        let mut minors = Minors::default();
        for (sq, piece) in pieces {
            match piece.kind {
                PieceKind::King | PieceKind::DropAny => {}
                PieceKind::Knight => minors.knights += 1,
                PieceKind::Bishop if sq.is_light() => minors.light_bishops += 1,
                PieceKind::Bishop => minors.dark_bishops += 1,
                _ => minors.major = true,
            }
        }
        minors
    }

    fn total(self) -> u32 {
        self.knights + self.light_bishops + self.dark_bishops + u32::from(self.major)
    }

    fn mates_alone(self) -> bool {
        let bishops = self.light_bishops + self.dark_bishops;
        self.major
            || self.knights >= 2
            || (self.knights >= 1 && bishops >= 1)
            || (self.light_bishops > 0 && self.dark_bishops > 0)
    }
}
