//! Random Fischer (chess960) starting positions.

use rand::Rng;

use super::types::file_char;
use super::PieceKind;

/// A random chess960 starting position in FEN notation.
///
/// Bishops stand on opposite colors and the king between the rooks; the
/// castling field names the rook files.
///
/// # Example
/// ```
/// use chess_rules::board::{fischer, Position, Variant};
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(960);
/// let fen = fischer::random_start_fen(&mut rng);
/// let position = Position::try_from_fen(&fen).unwrap();
/// assert_eq!(position.variant(), Variant::Fischer);
/// ```
pub fn random_start_fen<R: Rng + ?Sized>(rng: &mut R) -> String {
    let rank = random_back_rank(rng);
    let white: String = rank.iter().map(|kind| kind.to_char().to_ascii_uppercase()).collect();
    let black: String = rank.iter().map(|kind| kind.to_char()).collect();

    let mut rook_files = rank
        .iter()
        .enumerate()
        .filter(|(_, kind)| **kind == PieceKind::Rook)
        .map(|(file, _)| file_char(file));
    let left = rook_files.next().unwrap_or('a');
    let right = rook_files.last().unwrap_or('h');
    let castling = format!(
        "{}{}{left}{right}",
        left.to_ascii_uppercase(),
        right.to_ascii_uppercase()
    );

    format!("{black}/pppppppp/8/8/8/8/PPPPPPPP/{white} w {castling} - 0 1")
}

/// Insert the pieces around a rook-king-rook skeleton so the king always
/// stays between the rooks.
fn random_back_rank<R: Rng + ?Sized>(rng: &mut R) -> Vec<PieceKind> {
    let mut rank = vec![PieceKind::Rook, PieceKind::King, PieceKind::Rook];
    rank.insert(rng.gen_range(0..4), PieceKind::Queen);
    rank.insert(rng.gen_range(0..5), PieceKind::Knight);
    rank.insert(rng.gen_range(0..6), PieceKind::Knight);

    // the left bishop lands on the parity of the right one before it shifts
    let right = rng.gen_range(0..7);
    rank.insert(right, PieceKind::Bishop);
    let slots = (right + 1) / 2;
    let pair = if slots > 0 { rng.gen_range(0..slots) } else { 0 };
    rank.insert(2 * pair + right % 2, PieceKind::Bishop);
    rank
}
