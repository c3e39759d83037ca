//! Whole-game scenarios: repetition, notation of long lines, crazyhouse
//! pools and bughouse boards.

use chess_rules::board::{
    notation, Color, HoldingsEncoding, Notation, PieceKind, Position, Square, Variant,
};
use chess_rules::game::{EndCause, Game, GameArena, GameId, GameOptions, GameResult};

#[test]
fn test_two_moves_from_the_start() {
    let mut game = Game::new(Variant::Standard);
    game.play("e2e4").unwrap();
    game.play("e7e5").unwrap();
    assert_eq!(game.ply_count(), 2);
    assert_eq!(game.move_list(Notation::Algebraic), "e4 e5");
}

#[test]
fn test_repetition_counts_en_passant() {
    let mut game = Game::new(Variant::Standard);
    game.play_move_list("1.e4 a6 2.e5 f5 3.Nf3 Nc6 4.Ng1 Nb8 5.Nf3 Nc6 6.Ng1 Nb8")
        .unwrap();
    // the first occurrence had an en-passant capture available
    assert!(!game.is_over());

    game.play_move_list("Nc3 Nf6 Nb1 Ng8").unwrap();
    assert_eq!(game.ply_count(), 16);
    let outcome = game.outcome().unwrap();
    assert_eq!(outcome.cause, EndCause::ThreefoldRepetition);
    assert_eq!(outcome.result, GameResult::Draw);
    assert_eq!(outcome.result.winner(), None);
}

#[test]
fn test_repetition_can_be_turned_off() {
    let mut game = Game::new(Variant::Standard)
        .with_options(GameOptions::new().detect_repetition(false));
    game.play_move_list("Nf3 Nf6 Ng1 Ng8 Nf3 Nf6 Ng1 Ng8 Nf3 Nf6 Ng1 Ng8")
        .unwrap();
    assert!(!game.is_over());
}

#[test]
fn test_repeated_boards_with_different_material_do_not_draw() {
    let mut game = Game::from_fen("8/8/7p/p6p/p6p/K6p/p6p/rkr4Q w - - 0 1", None).unwrap();
    game.play_move_list(
        "1. Qe4+ Rc2 2. Qe1+ Rc1 3. Qd2 Rc2 4. Qd1+ Rc1 5. Qd3+ Rc2 6. Qe4 h1=Q 7.\
         Qxh1+ Rc1 8. Qe4+ Rc2 9. Qe1+ Rc1 10. Qd2 Rc2 11. Qd1+ Rc1 12. Qd3+ Rc2 13. Qe4 h2 \
         14. Qh1+ Rc1 15. Qe4+ Rc2 16. Qe1+ Rc1 17. Qd2 Rc2 18. Qd1+ Rc1 19. Qd3+ Rc2 20. Qe4 *",
    )
    .unwrap();
    assert_eq!(game.ply_count(), 39);
    assert!(!game.is_over());
}

#[test]
fn test_check_suffixes_in_a_long_line() {
    let mut game = Game::from_fen("1R1K4/k1n5/1p6/1P6/8/8/8/8 w - - 0 1", None).unwrap();
    game.play_move_list("1. Ra8+ Nxa8 2. Kc8 Nc7 3. Kxc7 Ka8 4. Kxb6 Kb8 5. Ka6 Ka8 6. b6 Kb8")
        .unwrap();
    assert_eq!(
        game.move_list(Notation::Algebraic),
        "Ra8+ Nxa8 Kc8 Nc7 Kxc7 Ka8 Kxb6 Kb8 Ka6 Ka8 b6 Kb8"
    );
    assert_eq!(game.move_list_from(Notation::Algebraic, 10), "b6 Kb8");
}

#[test]
fn test_fischer_castling_into_attack() {
    let mut game = Game::from_fen(
        "nbrqbkrn/pppppppp/8/8/8/8/PPPPPPPP/NBRQBKRN w CGcg - 0 1",
        Some(Variant::Fischer),
    )
    .unwrap();
    game.play_move_list("c4 d5 Bxh7").unwrap();
    assert!(game.play("0-0").is_err());
    assert!(game.play("O-O").is_err());
    assert_eq!(game.side_to_move(), Color::Black);
}

#[test]
fn test_no_castling_through_a_pawn_attack() {
    let mut game =
        Game::from_fen("r1b1k2r/ppp1Pppp/8/3q4/2pP4/2Qn1N2/PP2pPPP/R5KR b kq - 0 1", None).unwrap();
    assert_eq!(game.side_to_move(), Color::Black);
    assert!(game.play("0-0").is_err());
    assert_eq!(game.side_to_move(), Color::Black);
    assert_eq!(game.ply_count(), 0);
}

#[test]
fn test_crazyhouse_holdings_and_xfen_agree() {
    let expected = "rk1B4/pbp3pp/2p1R3/2Bp4/3P4/2PB1N2/P1PK1PPP/q4R2[NPNPQRNq] w - - 0 1";
    let bracket =
        Game::from_fen("rk1B4/pbp3pp/2p1R3/2Bp4/3P4/2PB1N2/P1PK1PPP/q4R2[NPNPQRNq] w", None).unwrap();
    assert_eq!(bracket.variant(), Variant::Crazyhouse);
    assert_eq!(bracket.fen(), expected);

    let xfen =
        Game::from_fen("rk1B4/pbp3pp/2p1R3/2Bp4/3P4/2PB1N2/P1PK1PPP/q4R2/Qnpnpqrn w", None).unwrap();
    assert_eq!(xfen.fen(), expected);

    let as_xfen = xfen.with_options(GameOptions::new().holdings_encoding(HoldingsEncoding::Xfen));
    assert!(as_xfen.fen().starts_with("rk1B4/pbp3pp/2p1R3/2Bp4/3P4/2PB1N2/P1PK1PPP/q4R2/"));
}

#[test]
fn test_crazyhouse_mate_cannot_be_blocked_on_the_back_rank() {
    let mut game = Game::new(Variant::Crazyhouse);
    game.play_move_list(
        "1. e4 b6 2. Nf3 Bb7 3. Nc3 e6 4. Bc4 Bb4 5. O-O Bxc3 6. bxc3 Bxe4 7. Ba3 Bxf3 \
         8. Qxf3 d5 9. Bxd5 exd5 10. Rfe1+ P@e7 11. B@b7 B@e4 12. Rxe4 dxe4 13. Qxe4 R@e6 \
         14. Qxe6 fxe6 15. R@c8 Qxc8 16. Bxc8 Nd7 17. Bxd7+ Kf8 18. Q@f3+ Nf6 19. Qxa8+ R@e8 \
         20. Bxe8 N@e2+ 21. Kh1 Nxe8 22. Qf3+ N@f4 23. N@d7+ Kf7 24. Ne5+ Kg8 25. P@f7+ Kf8 \
         26. fxe8=Q+ Kxe8 27. R@a8+ Q@b8 28. Rxb8+ B@c8",
    )
    .unwrap();
    assert!(!game.is_over());

    game.play_move_list("29. Rxc8+").unwrap();
    assert!(game.is_check());
    assert!(game.is_checkmate());
    assert_eq!(
        game.outcome().map(|o| (o.result, o.cause)),
        Some((GameResult::WhiteWins, EndCause::Checkmate))
    );
    assert!(game.move_list(Notation::Algebraic).ends_with("Rxc8#"));
}

#[test]
fn test_crazyhouse_drops_in_long_form() {
    let mut game = Game::from_fen(
        "rn1q3r/ppp1kPpp/3bP3/3n4/8/8/PPPP1PPP/RNB1KB1R[PNBRQQpnbrqq] w - - 0 11",
        None,
    )
    .unwrap();
    assert_eq!(game.variant(), Variant::Crazyhouse);
    game.play_move_list("g8g8q h8g8  f7g8q d8g8  b1c3  e4e4p g4g4n f3f3p").unwrap();
    assert_eq!(
        game.move_list(Notation::Algebraic),
        "Q@g8 Rxg8 fxg8=Q Qxg8 Nc3 P@e4 N@g4 P@f3"
    );
    assert_eq!(
        game.move_list(Notation::Numeric),
        "g8g8q h8g8 f7g8q d8g8 b1c3 e4e4p g4g4n f3f3p"
    );

    // the promoted queen went back to white's pool as a pawn
    let captured = game.history().get(3).and_then(|r| r.captured()).unwrap();
    assert!(captured.promoted);
    assert_eq!(game.takeback_all(), 8);
    assert_eq!(
        game.fen(),
        "rn1q3r/ppp1kPpp/3bP3/3n4/8/8/PPPP1PPP/RNB1KB1R[PNBRQQpnbrqq] w - - 0 11"
    );
}

#[test]
fn test_crazyhouse_king_cannot_step_into_check() {
    let mut game = Game::new(Variant::Crazyhouse);
    game.play_move_list(
        "e2e4  b8c6  d2d4  d7d5  e4e5  c8f5  f1b5  e7e6  b5c6  b7c6  b1c3  b4b4b c1d2  b4c3  \
         d2c3  f5c2  d1c2  b4b4n c3b4  f8b4  c3c3b e4e4b d3d3b e4d3  c2d3  e4e4b d3g3  b4c3  \
         b2c3  b2b2p a1d1  d2d2b e1d2  b2b1q d1b1  e4b1  g3g7  c2c2r d2d1  d8e7  c5c5b e7c5  \
         d4c5  h5h5b f3f3p h5f3  g2f3  c2c1  d1c1  d2d2p c1d2  g8f6  g7h8  e8e7  h8f6  e7d7  \
         e7e7q d7c8  a6a6b",
    )
    .unwrap();
    assert_eq!(game.ply_count(), 59);

    let moves = game.legal_moves();
    assert_eq!(moves.len(), 1);
    let only = moves.first().unwrap();
    assert_eq!(only.to_string(), "c8b8");
    let names = notation::move_names(game.position(), game.analysis(), &only, None);
    assert_eq!(names.get(Notation::Algebraic), "Kb8");
    assert!(game.move_list(Notation::Algebraic).ends_with("Q@e7+ Kc8 B@a6+"));
    assert!(game.is_check());
}

#[test]
fn test_captured_promoted_queen_drops_as_a_pawn() {
    let mut game = Game::from_fen(
        "rn1q3r/ppp1kPpp/3bP3/3n4/8/8/PPPP1PPP/RNB1KB1R[PNBRQQpnbrqq] w - - 0 11",
        None,
    )
    .unwrap();
    game.play_move_list("Q@g8 Rxg8 fxg8=Q Qxg8").unwrap();

    let pool = game.position().droppable(Color::Black);
    let count = |kind| pool.iter().filter(|p| p.is(kind)).count();
    assert_eq!(count(PieceKind::Pawn), 2);
    assert_eq!(count(PieceKind::Queen), 3);
    assert!(pool.iter().all(|p| !p.promoted));
}

#[test]
fn test_promoted_marker_in_a_setup_position() {
    let pgn = "[Site \"אתר השחמט הישראלי ichess\"]\n[Date \"2014.09.27\"]\n[Result \"*\"]\n\
               [Variant \"Crazyhouse\"]\n[SetUp \"1\"]\n\
               [FEN \"rnbq~kbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQ~KBNR w KQkq - 0 1\"]\n\n*";
    let game = Game::from_pgn(pgn).unwrap();
    assert_eq!(game.variant(), Variant::Crazyhouse);
    let queen = game.position().piece_at(Square(0, 3)).unwrap();
    assert!(queen.is(PieceKind::Queen) && queen.color == Color::White);
    assert!(queen.promoted);
    assert_eq!(game.tags().get("Site"), Some("אתר השחמט הישראלי ichess"));
}

fn pools_empty(arena: &GameArena, id: GameId) -> bool {
    let position: &Position = arena.game(id).unwrap().position();
    !position.has_captured_pieces()
        && position.droppable(Color::White).is_empty()
        && position.droppable(Color::Black).is_empty()
}

fn bughouse_pair() -> (GameArena, GameId, GameId) {
    let mut arena = GameArena::new();
    let first = arena.insert(Game::new(Variant::Bughouse));
    let second = arena.insert(Game::new(Variant::Bughouse));
    arena.pair(first, second).unwrap();
    (arena, first, second)
}

#[test]
fn test_bughouse_pieces_cross_boards() {
    let (mut arena, first, second) = bughouse_pair();
    assert!(pools_empty(&arena, first) && pools_empty(&arena, second));

    arena.play_move_list(first, "e4 d5 exd5 Qxd5").unwrap();
    arena.play_move_list(second, "e4 e5 P@d4 P@d5").unwrap();
    assert!(pools_empty(&arena, first) && pools_empty(&arena, second));

    arena.takeback_all(second);
    arena.takeback_all(first);
    assert!(pools_empty(&arena, first) && pools_empty(&arena, second));

    arena.play_move_list(second, "e4 d5 exd5 Qxd5").unwrap();
    arena.play_move_list(first, "e4 e5 P@d4 P@d5").unwrap();
    assert!(pools_empty(&arena, first) && pools_empty(&arena, second));

    arena.takeback_all(first);
    arena.takeback_all(second);
    assert!(pools_empty(&arena, first) && pools_empty(&arena, second));
    assert!(arena.ply_order().is_empty());
}

#[test]
fn test_bughouse_drop_of_a_piece_from_the_other_board() {
    let (mut arena, first, second) = bughouse_pair();
    arena.play_move_list(first, "e4 d5 exd5").unwrap();
    arena.play_move_list(second, "e4 P@d5 exd5").unwrap();
    arena.play_move_list(first, "P@e4").unwrap();
    assert!(pools_empty(&arena, first) && pools_empty(&arena, second));

    arena.takeback(first).unwrap();
    arena.takeback_all(second);
    arena.takeback_all(first);
    assert!(pools_empty(&arena, first) && pools_empty(&arena, second));
}

#[test]
fn test_bughouse_takeback_interleaved() {
    let (mut arena, first, second) = bughouse_pair();
    arena.play_move_list(first, "e4 d5 exd5 Qxd5").unwrap();
    arena.play_move_list(second, "d4 e5 dxe5").unwrap();
    while arena.takeback(first).is_ok() | arena.takeback(second).is_ok() {}
    assert!(pools_empty(&arena, first) && pools_empty(&arena, second));
}

#[test]
fn test_bughouse_record_round_trip() {
    let (mut arena, first, second) = bughouse_pair();
    arena.play(first, "e4").unwrap();
    arena.play(second, "d4").unwrap();
    arena.play(first, "d5").unwrap();
    arena.play(first, "exd5").unwrap();
    arena.play(second, "P@e5").unwrap();
    arena.play(second, "dxe5").unwrap();
    arena.play(first, "P@d4").unwrap();

    let text = arena.to_bpgn(first, Notation::Algebraic).unwrap();
    assert!(text.contains("1A. e4 1B. d4 1a. d5 2A. exd5 1b. P@e5 2B. dxe5 2a. P@d4 *"));

    let (read, [a, b]) = GameArena::from_bpgn(&text).unwrap();
    assert_eq!(read.game(a).unwrap().fen(), arena.game(first).unwrap().fen());
    assert_eq!(read.game(b).unwrap().fen(), arena.game(second).unwrap().fen());
    assert_eq!(read.ply_order().len(), 7);
}
