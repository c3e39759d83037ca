//! Crazyhouse and bughouse drops.

use crate::board::{Color, MoveParseError, Piece, PieceKind, Position, Square, Variant};

fn play(position: &mut Position, moves: &[&str]) {
    for text in moves {
        let mv = position
            .parse_move(text)
            .unwrap_or_else(|e| panic!("{text}: {e}"));
        position.apply(&mv);
    }
}

#[test]
fn test_crazyhouse_lists_concrete_drops() {
    let position = Position::from_fen("4k3/8/8/8/8/8/8/4K3[N] w - - 0 1");
    assert_eq!(position.variant(), Variant::Crazyhouse);
    let analysis = position.analyze();
    assert_eq!(analysis.legal_moves().len(), 5 + 62);
    let drops = analysis.legal_moves().iter().filter(|mv| mv.is_drop()).count();
    assert_eq!(drops, 62);
    assert!(analysis
        .legal_moves()
        .iter()
        .filter(|mv| mv.is_drop())
        .all(|mv| mv.additional_kind() == Some(PieceKind::Knight)));
}

#[test]
fn test_pawns_are_not_dropped_on_the_back_ranks() {
    let analysis = Position::from_fen("4k3/8/8/8/8/8/8/4K3[P] w - - 0 1").analyze();
    let drops: Vec<_> = analysis
        .legal_moves()
        .iter()
        .filter(|mv| mv.is_drop())
        .copied()
        .collect();
    assert_eq!(drops.len(), 48);
    assert!(drops.iter().all(|mv| mv.to().rank() != 0 && mv.to().rank() != 7));
}

#[test]
fn test_drops_can_block_a_check() {
    let analysis = Position::from_fen("4k3/8/8/8/8/8/8/r3K3[N] w - - 0 1").analyze();
    assert!(analysis.is_check());
    let blocks: Vec<Square> = analysis
        .legal_moves()
        .iter()
        .filter(|mv| mv.is_drop())
        .map(|mv| mv.to())
        .collect();
    assert_eq!(blocks, vec![Square(0, 1), Square(0, 2), Square(0, 3)]);
    assert_eq!(analysis.legal_moves().len(), 6);
}

#[test]
fn test_drop_and_take_back() {
    let mut position = Position::from_fen("4k3/8/8/8/8/8/8/4K3[Nn] w - - 0 1");
    let original = position.clone();
    let mv = position.parse_move("N@d6+").unwrap();
    assert!(mv.gives_check());
    let info = position.apply(&mv);
    assert!(position.droppable(Color::White).is_empty());
    assert_eq!(position.halfmove_clock(), 1);
    assert_eq!(position.to_fen(), "4k3/8/3N4/8/8/8/8/4K3[n] b - - 1 1");
    position.unapply(&mv, info);
    assert_eq!(position, original);
}

#[test]
fn test_promoted_piece_returns_as_a_pawn() {
    let mut position = Position::from_fen("4k3/P7/8/8/8/8/r7/4K3[-] w - - 0 1");
    play(&mut position, &["a8=Q+"]);
    assert!(position.piece_at(Square(7, 0)).is_some_and(|p| p.promoted));

    let before_capture = position.clone();
    let capture = position.parse_move("Rxa8").unwrap();
    position.apply(&capture);
    assert_eq!(position.droppable(Color::Black), &[Piece::new(PieceKind::Pawn, Color::Black)]);
    assert_eq!(
        position.captured(Color::White),
        &[Piece::new(PieceKind::Queen, Color::White).with_promoted(true)]
    );
    assert_eq!(position.to_fen(), "r3k3/8/8/8/8/8/8/4K3[p] w - - 0 2");

    play(&mut position, &["Kd1"]);
    assert!(position.parse_move("P@e4").is_ok());
    assert!(matches!(
        position.parse_move("Q@e4"),
        Err(MoveParseError::NoMatchingMove { .. })
    ));

    let mut undo = before_capture.clone();
    let info_again = undo.apply(&capture);
    undo.unapply(&capture, info_again);
    assert_eq!(undo, before_capture);
}

#[test]
fn test_bughouse_resolves_drops_against_the_pool() {
    let mut position =
        Position::try_from_fen_for("4k3/8/8/8/8/8/8/4K3[-] w - - 0 1", Some(Variant::Bughouse)).unwrap();
    let analysis = position.analyze();
    let placeholders = analysis
        .legal_moves()
        .iter()
        .filter(|mv| mv.additional_kind() == Some(PieceKind::DropAny))
        .count();
    assert_eq!(placeholders, 62);

    assert!(matches!(
        position.parse_move("N@d6"),
        Err(MoveParseError::NoMatchingMove { .. })
    ));

    position.add_droppable(Piece::new(PieceKind::Knight, Color::White));
    let mv = position.parse_move("N@d6").unwrap();
    assert!(mv.is_drop());
    assert_eq!(mv.additional_kind(), Some(PieceKind::Knight));
    assert!(mv.gives_check());
    assert_eq!(position.parse_move("d6d6n").unwrap(), mv);

    position.apply(&mv);
    assert_eq!(position.piece_at(Square(5, 3)), Some(Piece::new(PieceKind::Knight, Color::White)));
    assert!(position.droppable(Color::White).is_empty());

    position.add_droppable(Piece::new(PieceKind::Pawn, Color::Black));
    assert!(position.parse_move("P@a1").is_err());
    // a knight check cannot be blocked
    assert!(position.parse_move("P@a3").is_err());
    assert!(position.parse_move("Kd8").is_ok());
}
