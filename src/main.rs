use std::env;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use chess_rules::board::Notation;
use chess_rules::game::pgn::{self, GameRecord};
use chess_rules::game::Game;

const USAGE: &str = "usage: chess_rules [--notation <numeric|algebraic|algebraic-hebrew|figurine|figurine-hebrew>] [--moves <move list>] [file]
reads a position (FEN) or a game record (PGN) from the file, or stdin without one";

fn load(text: &str) -> Result<Game, String> {
    let text = text.trim();
    if let Ok(game) = Game::from_fen(text, None) {
        return Ok(game);
    }
    match pgn::read(text).map_err(|e| e.to_string())? {
        GameRecord::Single(game) => Ok(game),
        GameRecord::Bughouse { mut arena, boards } => arena
            .remove(boards[0])
            .ok_or_else(|| "bughouse record without a first board".to_string()),
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut notation = Notation::Algebraic;
    let mut moves = None;
    let mut path = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{USAGE}");
                return ExitCode::SUCCESS;
            }
            "-n" | "--notation" => match iter.next().and_then(|name| Notation::from_name(name)) {
                Some(n) => notation = n,
                None => {
                    eprintln!("{USAGE}");
                    return ExitCode::FAILURE;
                }
            },
            "-m" | "--moves" => moves = iter.next().cloned(),
            _ => path = Some(arg.clone()),
        }
    }

    let text = match &path {
        Some(path) => fs::read_to_string(path).map_err(|e| format!("{path}: {e}")),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map(|_| buf)
                .map_err(|e| e.to_string())
        }
    };

    let mut game = match text.and_then(|text| load(&text)) {
        Ok(game) => game,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(moves) = moves {
        if let Err(err) = game.play_move_list(&moves) {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    }

    let analysis = game.analysis();
    println!("fen: {}", game.fen());
    println!("variant: {}", game.variant());
    println!("side_to_move: {}", game.side_to_move());
    println!("check: {}", analysis.is_check());
    println!("checkmate: {}", analysis.is_checkmate());
    println!("stalemate: {}", analysis.is_stalemate());
    if let Some(outcome) = game.outcome() {
        println!("outcome: {outcome}");
    }
    if !game.move_list(notation).is_empty() {
        println!("moves: {}", game.move_list(notation));
    }
    println!("legal_moves: {}", analysis.legal_moves().len());
    let position = game.position();
    for mv in analysis.legal_moves().iter() {
        let names = chess_rules::board::notation::move_names(position, analysis, mv, None);
        println!("{}", names.get(notation));
    }
    ExitCode::SUCCESS
}
