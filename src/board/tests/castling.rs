//! Standard and Fischer castling.

use crate::board::{CastleSide, Color, MoveParseError, PieceKind, Position, Square, Variant};

fn play(position: &mut Position, moves: &[&str]) {
    for text in moves {
        let mv = position
            .parse_move(text)
            .unwrap_or_else(|e| panic!("{text}: {e}"));
        position.apply(&mv);
    }
}

#[test]
fn test_castle_both_sides() {
    let position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let analysis = position.analyze();
    let castles: Vec<_> = analysis
        .legal_moves()
        .iter()
        .filter_map(|mv| mv.castle_side())
        .collect();
    assert_eq!(castles.len(), 2);

    let mut short = position.clone();
    let mv = short.parse_move("O-O").unwrap();
    assert_eq!(mv.to(), Square(0, 6));
    short.apply(&mv);
    assert_eq!(short.piece_at(Square(0, 6)).map(|p| p.kind), Some(PieceKind::King));
    assert_eq!(short.piece_at(Square(0, 5)).map(|p| p.kind), Some(PieceKind::Rook));
    assert!(short.is_empty(Square(0, 7)));
    assert!(!short.castling_rights().any(Color::White));
    assert!(short.castling_rights().any(Color::Black));

    let mut long = position.clone();
    let mv = long.parse_move("0-0-0").unwrap();
    assert_eq!(mv.castle_side(), Some(CastleSide::Queen));
    let info = long.apply(&mv);
    assert_eq!(long.piece_at(Square(0, 2)).map(|p| p.kind), Some(PieceKind::King));
    assert_eq!(long.piece_at(Square(0, 3)).map(|p| p.kind), Some(PieceKind::Rook));
    long.unapply(&mv, info);
    assert_eq!(long, position);
}

#[test]
fn test_castling_through_attacked_square() {
    let position = Position::from_fen("r1b1k2r/ppp1Pppp/8/3q4/2pP4/2Qn1N2/PP2pPPP/R5KR b kq - 0 1");
    assert!(position
        .analyze()
        .legal_moves()
        .iter()
        .all(|mv| mv.castle_side().is_none()));
    assert!(matches!(
        position.parse_move("O-O"),
        Err(MoveParseError::NoMatchingMove { .. })
    ));
}

#[test]
fn test_no_castling_out_of_check() {
    let position = Position::from_fen("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1");
    let analysis = position.analyze();
    assert!(analysis.is_check());
    assert!(analysis.legal_moves().iter().all(|mv| mv.castle_side().is_none()));
}

#[test]
fn test_blocked_castling() {
    let position = Position::from_fen("r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq - 0 1");
    assert!(position
        .analyze()
        .legal_moves()
        .iter()
        .all(|mv| mv.castle_side().is_none()));
}

#[test]
fn test_rights_lost_by_rook_moves_and_captures() {
    let mut position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    play(&mut position, &["Rxa8+"]);
    let rights = position.castling_rights();
    assert!(!rights.has(Color::White, CastleSide::Queen));
    assert!(rights.has(Color::White, CastleSide::King));
    assert!(!rights.has(Color::Black, CastleSide::Queen));
    assert!(rights.has(Color::Black, CastleSide::King));

    play(&mut position, &["Kd7", "Kf1"]);
    assert!(!position.castling_rights().any(Color::White));
    assert!(!position.castling_rights().any(Color::Black));
    assert!(position.to_fen().contains(" - - "));
}

#[test]
fn test_fischer_castling_refused_when_attacked() {
    let fen = "nbrqbkrn/pppppppp/8/8/8/8/PPPPPPPP/NBRQBKRN w CGcg - 0 1";
    let mut position = Position::from_fen(fen);
    assert_eq!(position.variant(), Variant::Fischer);

    let mut quiet = position.clone();
    play(&mut quiet, &["c4", "d5", "a3"]);
    let castle = quiet.parse_move("O-O").unwrap();
    // the king takes the rook's square as its destination
    assert_eq!(castle.to(), Square(7, 6));
    quiet.apply(&castle);
    assert_eq!(quiet.piece_at(Square(7, 6)).map(|p| p.kind), Some(PieceKind::King));
    assert_eq!(quiet.piece_at(Square(7, 5)).map(|p| p.kind), Some(PieceKind::Rook));

    play(&mut position, &["c4", "d5", "Bxh7"]);
    assert!(position.parse_move("O-O").is_err());
}

#[test]
fn test_fischer_king_stays_put_when_castling_short() {
    let mut position = Position::from_fen("4k3/8/8/8/8/8/8/6KR w H - 0 1");
    assert_eq!(position.variant(), Variant::Fischer);

    let castle = position.parse_move("O-O").unwrap();
    assert_eq!(castle.from(), Square(0, 6));
    assert_eq!(castle.to(), Square(0, 7));
    position.apply(&castle);
    assert_eq!(position.piece_at(Square(0, 6)).map(|p| p.kind), Some(PieceKind::King));
    assert_eq!(position.piece_at(Square(0, 5)).map(|p| p.kind), Some(PieceKind::Rook));
    assert!(position.is_empty(Square(0, 7)));
    assert!(position.to_fen().contains(" b - - "));
}
