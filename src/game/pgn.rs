//! Game records in PGN, and BPGN for bughouse pairs.
//!
//! Reading strips control and formatting characters, takes the leading
//! `[Key "Value"]` tags, sets up the position (from the `FEN` tag when
//! present) and replays the movetext. Comments may be delimited by `{}`,
//! `()` or `[]` and nest; a comment belongs to the move before it. A
//! result token ends a game that is still running by resignation or
//! agreed draw.
//!
//! Writing emits the known tags in a fixed order, `SetUp`/`FEN` for a
//! non-default start, and numbered movetext in any [`Notation`].
//!
//! # Example
//! ```
//! use chess_rules::board::Notation;
//! use chess_rules::game::Game;
//!
//! let game = Game::from_pgn("[Event \"Casual\"]\n\n1. e4 {best by test} e5 2. Nf3 1-0").unwrap();
//! assert_eq!(game.comment(0), Some("best by test"));
//! let text = game.to_pgn(Notation::Algebraic);
//! assert!(text.starts_with("[Event \"Casual\"]\n[Result \"1-0\"]\n"));
//! assert!(text.contains("1. e4 "));
//! ```

use std::fmt::Write as _;

use once_cell::sync::Lazy;
use regex::Regex;

use super::tags::{variant_from_tag, Tags, TAG_ORDER};
use super::{Game, GameArena, GameError, GameId, GameResult, Outcome, PgnError};
use crate::board::{Color, Notation, Position, Variant};

const LRO: char = '\u{202D}';
const RLE: char = '\u{202B}';
const PDF: char = '\u{202C}';

static TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*\[\s*([^\s\]"]+)\s+"([^"]*)"\s*\]"#).expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static CONTROL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{C}").expect("valid regex"));
static MOVE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:([AaBb])\.*|\.+)").expect("valid regex"));
static BOARD_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)\d+[AaBb]\.").expect("valid regex"));
static NAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$(\d+)").expect("valid regex"));
static BRACE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").expect("valid regex"));

/// Symbol of a numeric annotation glyph.
#[must_use]
pub fn nag_symbol(nag: u8) -> Option<&'static str> {
    let symbol = match nag {
        1 => "!",
        2 => "?",
        3 => "!!",
        4 => "??",
        5 => "!?",
        6 => "?!",
        10..=12 => "=",
        13 => "\u{221E}",
        14 => "\u{2A72}",
        15 => "\u{2A71}",
        16 => "\u{00B1}",
        17 => "\u{2213}",
        18 => "+-",
        19 => "-+",
        _ => return None,
    };
    Some(symbol)
}

fn is_result_token(token: &str) -> bool {
    token == "*" || GameResult::from_pgn_token(token).is_some()
}

/// Move tokens of a plain move list: brace comments, move numbers,
/// glyphs and result tokens are dropped.
pub(crate) fn plain_move_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let (chunk, tail) = match BRACE_COMMENT.find(rest) {
            Some(comment) => (&rest[..comment.start()], &rest[comment.end()..]),
            None => (rest, ""),
        };
        for word in chunk.split_whitespace() {
            if is_result_token(word) || word.starts_with('$') {
                continue;
            }
            let word = strip_move_number(word).1;
            if !word.is_empty() {
                tokens.push(word);
            }
        }
        rest = tail;
    }
    tokens
}

/// Split a leading move number off `word`, returning the board letter of a
/// BPGN number with the rest of the word.
fn strip_move_number(word: &str) -> (Option<char>, &str) {
    match MOVE_NUMBER.captures(word) {
        Some(caps) => {
            let board = caps.get(1).and_then(|m| m.as_str().chars().next());
            let end = caps.get(0).map_or(0, |m| m.end());
            (board, &word[end..])
        }
        None => (None, word),
    }
}

fn normalize(text: &str) -> String {
    let spaced = WHITESPACE.replace_all(text, " ");
    CONTROL.replace_all(&spaced, "").into_owned()
}

/// Leading tags and the movetext after them.
fn split_header(text: &str) -> (Tags, &str) {
    let mut tags = Tags::new();
    let mut rest = text;
    while let Some(caps) = TAG.captures(rest) {
        tags.set(&caps[1], &caps[2]);
        let end = caps.get(0).map_or(rest.len(), |m| m.end());
        rest = &rest[end..];
    }
    (tags, rest.trim())
}

enum Token<'a> {
    Word(&'a str),
    Comment(String),
}

fn closing(open: char) -> char {
    match open {
        '{' => '}',
        '(' => ')',
        _ => ']',
    }
}

/// Split movetext into words and comments, matching comment brackets.
fn tokenize(movetext: &str) -> Result<Vec<Token<'_>>, PgnError> {
    let mut tokens = Vec::new();
    let mut stack: Vec<char> = Vec::new();
    let mut comment = String::new();
    let mut word_start = None;

    for (idx, c) in movetext.char_indices() {
        let is_open = matches!(c, '{' | '(' | '[');
        let is_close = matches!(c, '}' | ')' | ']');
        if stack.is_empty() {
            if is_open || is_close || c.is_whitespace() {
                if let Some(start) = word_start.take() {
                    tokens.push(Token::Word(&movetext[start..idx]));
                }
            } else if word_start.is_none() {
                word_start = Some(idx);
            }
            if is_close {
                return Err(PgnError::UnbalancedBracket {
                    expected: None,
                    found: Some(c),
                });
            }
            if is_open {
                stack.push(c);
            }
            continue;
        }

        if is_open {
            stack.push(c);
            comment.push(c);
        } else if is_close {
            let expected = stack.last().map(|&open| closing(open));
            if expected != Some(c) {
                return Err(PgnError::UnbalancedBracket {
                    expected,
                    found: Some(c),
                });
            }
            stack.pop();
            if stack.is_empty() {
                tokens.push(Token::Comment(comment.trim().to_string()));
                comment.clear();
            } else {
                comment.push(c);
            }
        } else {
            comment.push(c);
        }
    }

    if let Some(&open) = stack.last() {
        return Err(PgnError::UnbalancedBracket {
            expected: Some(closing(open)),
            found: None,
        });
    }
    if let Some(start) = word_start {
        tokens.push(Token::Word(&movetext[start..]));
    }
    Ok(tokens)
}

enum Annotation {
    Comment(String),
    Nag(u8),
}

/// The board (or pair of boards) a movetext is replayed on.
trait Boards {
    fn is_over(&self, board: usize) -> bool;
    fn ply_count(&self, board: usize) -> usize;
    fn play(&mut self, board: usize, token: &str) -> Result<(), GameError>;
    fn annotate(&mut self, board: usize, annotation: Annotation);
    /// Apply a result token to the first board
    fn conclude(&mut self, result: GameResult);
}

fn annotate_last(game: &mut Game, annotation: Annotation) {
    let Some(ply) = game.ply_count().checked_sub(1) else {
        log::debug!("dropping annotation before the first move");
        return;
    };
    match annotation {
        Annotation::Comment(text) => {
            let text = NAG
                .replace_all(&text, |caps: &regex::Captures<'_>| {
                    caps[1]
                        .parse()
                        .ok()
                        .and_then(nag_symbol)
                        .unwrap_or_default()
                        .to_string()
                })
                .into_owned();
            let joined = match game.comment(ply) {
                Some(existing) => format!("{existing} {text}"),
                None => text,
            };
            game.set_comment(ply, Some(joined));
        }
        Annotation::Nag(nag) => {
            game.set_nag(ply, nag);
        }
    }
}

impl Boards for Game {
    fn is_over(&self, _board: usize) -> bool {
        Game::is_over(self)
    }

    fn ply_count(&self, _board: usize) -> usize {
        Game::ply_count(self)
    }

    fn play(&mut self, _board: usize, token: &str) -> Result<(), GameError> {
        Game::play(self, token).map(|_| ())
    }

    fn annotate(&mut self, _board: usize, annotation: Annotation) {
        annotate_last(self, annotation);
    }

    fn conclude(&mut self, result: GameResult) {
        let ended = match result {
            GameResult::WhiteWins => self.resign(Color::Black),
            GameResult::BlackWins => self.resign(Color::White),
            GameResult::Draw => self.agree_draw(),
        };
        if let Err(err) = ended {
            log::debug!("result token after the end: {err}");
        }
    }
}

struct PairedBoards<'a> {
    arena: &'a mut GameArena,
    ids: [GameId; 2],
}

impl Boards for PairedBoards<'_> {
    fn is_over(&self, board: usize) -> bool {
        self.arena.get(self.ids[board]).map_or(true, Game::is_over)
    }

    fn ply_count(&self, board: usize) -> usize {
        self.arena.get(self.ids[board]).map_or(0, Game::ply_count)
    }

    fn play(&mut self, board: usize, token: &str) -> Result<(), GameError> {
        self.arena.play(self.ids[board], token).map(|_| ())
    }

    fn annotate(&mut self, board: usize, annotation: Annotation) {
        if let Some(game) = self.arena.game_slot(self.ids[board]) {
            annotate_last(game, annotation);
        }
    }

    fn conclude(&mut self, result: GameResult) {
        let id = self.ids[0];
        let ended = match result {
            GameResult::WhiteWins => self.arena.resign(id, Color::Black),
            GameResult::BlackWins => self.arena.resign(id, Color::White),
            GameResult::Draw => self.arena.agree_draw(id),
        };
        if let Err(err) = ended {
            log::debug!("result token after the end: {err}");
        }
    }
}

fn rejected(err: GameError, ply: usize, token: &str) -> PgnError {
    log::warn!("rejected move '{token}' at ply {ply}: {err}");
    match err {
        GameError::InvalidMove(err) if !err.is_illegal() => PgnError::InvalidMove(err),
        _ => PgnError::IllegalMove {
            ply,
            token: token.to_string(),
        },
    }
}

fn replay(boards: &mut impl Boards, movetext: &str) -> Result<(), PgnError> {
    let mut board = 0;
    let mut result = None;
    for token in tokenize(movetext)? {
        let word = match token {
            Token::Comment(text) => {
                boards.annotate(board, Annotation::Comment(text));
                continue;
            }
            Token::Word(word) => word,
        };
        if is_result_token(word) {
            result = GameResult::from_pgn_token(word);
            continue;
        }
        if let Some(nag) = word.strip_prefix('$') {
            if let Ok(nag) = nag.parse() {
                boards.annotate(board, Annotation::Nag(nag));
            }
            continue;
        }
        let (letter, word) = strip_move_number(word);
        if let Some(letter) = letter {
            board = usize::from(letter.eq_ignore_ascii_case(&'b'));
        }
        if !word.chars().any(char::is_alphanumeric) || boards.is_over(board) {
            continue;
        }
        let ply = boards.ply_count(board) + 1;
        boards.play(board, word).map_err(|err| rejected(err, ply, word))?;
    }
    if let Some(result) = result {
        boards.conclude(result);
    }
    Ok(())
}

fn start_game(tags: Tags, default_variant: Variant) -> Result<Game, PgnError> {
    let variant = tags.get("Variant").map(variant_from_tag);
    let mut game = match tags.get("FEN").filter(|fen| !fen.trim().is_empty()) {
        Some(fen) => Game::from_fen(fen, variant)?,
        None => Game::new(variant.unwrap_or(default_variant)),
    };
    *game.tags_mut() = tags;
    Ok(game)
}

/// A game record of one board, or two bughouse boards.
#[derive(Debug)]
pub enum GameRecord {
    Single(Game),
    Bughouse { arena: GameArena, boards: [GameId; 2] },
}

/// Read a game record, detecting the two-board BPGN form.
pub fn read(text: &str) -> Result<GameRecord, PgnError> {
    let text = normalize(text);
    let (tags, movetext) = split_header(&text);
    let bughouse = tags.get("Variant").map(variant_from_tag) == Some(Variant::Bughouse);
    if bughouse && BOARD_NUMBER.is_match(movetext) {
        let (arena, boards) = read_boards(tags, movetext)?;
        Ok(GameRecord::Bughouse { arena, boards })
    } else {
        let mut game = start_game(tags, Variant::Standard)?;
        replay(&mut game, movetext)?;
        Ok(GameRecord::Single(game))
    }
}

fn read_boards(tags: Tags, movetext: &str) -> Result<(GameArena, [GameId; 2]), PgnError> {
    let mut arena = GameArena::new();
    let first = arena.insert(start_game(tags, Variant::Bughouse)?);
    let second = arena.insert(Game::new(Variant::Bughouse));
    arena.pair(first, second).map_err(PgnError::Boards)?;
    let ids = [first, second];
    replay(&mut PairedBoards { arena: &mut arena, ids }, movetext)?;
    Ok((arena, ids))
}

/// Write the movetext prefix of a move: `12.` for white, `12...` for a
/// first move by black, nothing otherwise.
fn write_number(out: &mut String, number: u32, side: Color, first: bool) {
    match side {
        Color::White => {
            let _ = write!(out, "{number}. ");
        }
        Color::Black if first => {
            let _ = write!(out, "{number}... ");
        }
        Color::Black => {}
    }
}

fn write_comment(out: &mut String, comment: &str) {
    let text = comment.replace('{', "(").replace('}', ")");
    let _ = write!(out, "{LRO}{{ {RLE}{text}{PDF} }}{PDF} ");
}

fn write_record_tail(out: &mut String, game: &Game, ply: usize, notation: Notation) {
    if let Some(record) = game.history().get(ply) {
        out.push_str(record.name(notation));
        out.push(' ');
        if let Some(nag) = record.nag() {
            let _ = write!(out, "${nag} ");
        }
        if let Some(comment) = record.comment() {
            write_comment(out, comment);
        }
    }
}

fn result_token(game: &Game) -> &'static str {
    game.outcome().map_or("*", |outcome: Outcome| outcome.result.pgn_token())
}

fn write_tags(out: &mut String, game: &Game) {
    for key in TAG_ORDER {
        let value = match key {
            "Result" => Some(result_token(game)),
            "Variant" => game.variant().pgn_name(),
            _ => game.tags().get(key).filter(|value| !value.is_empty()),
        };
        if let Some(value) = value {
            let _ = writeln!(out, "[{key} \"{value}\"]");
        }
    }
    if game.start_fen() != Position::for_variant(game.variant()).to_fen() {
        let _ = writeln!(out, "[SetUp \"1\"]");
        let _ = writeln!(out, "[FEN \"{}\"]", game.start_fen());
    }
}

/// Write `game` as PGN with moves named in `notation`.
#[must_use]
pub fn write_pgn(game: &Game, notation: Notation) -> String {
    let mut out = String::new();
    write_tags(&mut out, game);
    out.push('\n');

    let (mut number, mut side) = game.start_move();
    for ply in 0..game.ply_count() {
        write_number(&mut out, number, side, ply == 0);
        write_record_tail(&mut out, game, ply, notation);
        if side == Color::Black {
            number += 1;
        }
        side = side.opponent();
    }
    out.push_str(result_token(game));
    out.push('\n');
    out
}

/// Write two paired bughouse boards as BPGN: tags of the first board, then
/// every move in playing order numbered `1A.`/`1a.` (first board) or
/// `1B.`/`1b.` (second board).
pub fn write_bpgn(arena: &GameArena, first: GameId, notation: Notation) -> Result<String, GameError> {
    let game_a = arena.game(first)?;
    let second = arena.partner(first).ok_or(GameError::UnknownGame { id: first.index() })?;
    let game_b = arena.game(second)?;

    let mut out = String::new();
    write_tags(&mut out, game_a);
    out.push('\n');

    let mut plies = [0usize; 2];
    let mut numbers = [game_a.start_move(), game_b.start_move()];
    for &id in arena.ply_order() {
        let board = usize::from(id == second);
        let game = if board == 0 { game_a } else { game_b };
        let (number, side) = numbers[board];
        let letter = match (board, side) {
            (0, Color::White) => 'A',
            (0, Color::Black) => 'a',
            (_, Color::White) => 'B',
            (_, Color::Black) => 'b',
        };
        let _ = write!(out, "{number}{letter}. ");
        write_record_tail(&mut out, game, plies[board], notation);
        plies[board] += 1;
        numbers[board] = match side {
            Color::White => (number, Color::Black),
            Color::Black => (number + 1, Color::White),
        };
    }
    out.push_str(result_token(game_a));
    out.push('\n');
    Ok(out)
}

impl Game {
    /// Read a single-board game record.
    ///
    /// A BPGN record is read as its first board; use [`GameArena::from_bpgn`]
    /// for both boards.
    pub fn from_pgn(text: &str) -> Result<Self, PgnError> {
        match read(text)? {
            GameRecord::Single(game) => Ok(game),
            GameRecord::Bughouse { mut arena, boards } => {
                arena.remove(boards[0]).ok_or(PgnError::Boards(GameError::UnknownGame {
                    id: boards[0].index(),
                }))
            }
        }
    }

    #[must_use]
    pub fn to_pgn(&self, notation: Notation) -> String {
        write_pgn(self, notation)
    }
}

impl GameArena {
    /// Read a BPGN record into a new arena holding the two paired boards.
    pub fn from_bpgn(text: &str) -> Result<(Self, [GameId; 2]), PgnError> {
        let text = normalize(text);
        let (tags, movetext) = split_header(&text);
        read_boards(tags, movetext)
    }

    pub fn to_bpgn(&self, first: GameId, notation: Notation) -> Result<String, GameError> {
        write_bpgn(self, first, notation)
    }
}
