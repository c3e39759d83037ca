//! Bughouse boards paired through a side table.
//!
//! Games live in arena slots and refer to each other only by [`GameId`],
//! so either board can be removed without the other. Moves on a paired
//! bughouse board go through the arena, which hands every captured piece
//! to the partner board's pool (of the captured piece's color, demoted if
//! it was a promoted pawn) and takes it back again on takeback.

use std::collections::HashMap;
use std::fmt;

use super::{EndCause, Game, GameError, MoveRecord, Outcome};
use crate::board::{Color, Move, Piece, Variant};

/// Handle of a game stored in a [`GameArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameId(usize);

impl GameId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, Default)]
pub struct GameArena {
    slots: Vec<Option<Game>>,
    partners: HashMap<GameId, GameId>,
    /// Boards of the moves played on paired games, oldest first
    order: Vec<GameId>,
}

impl GameArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, game: Game) -> GameId {
        self.slots.push(Some(game));
        GameId(self.slots.len() - 1)
    }

    /// Take a game out of the arena. Its partner stays, unpaired.
    pub fn remove(&mut self, id: GameId) -> Option<Game> {
        let game = self.slots.get_mut(id.0)?.take()?;
        self.unpair(id);
        Some(game)
    }

    #[must_use]
    pub fn get(&self, id: GameId) -> Option<&Game> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn game(&self, id: GameId) -> Result<&Game, GameError> {
        self.get(id).ok_or(GameError::UnknownGame { id: id.0 })
    }

    fn game_mut(&mut self, id: GameId) -> Result<&mut Game, GameError> {
        self.game_slot(id).ok_or(GameError::UnknownGame { id: id.0 })
    }

    /// Direct access for annotations; moves must go through the arena.
    pub(crate) fn game_slot(&mut self, id: GameId) -> Option<&mut Game> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> impl Iterator<Item = GameId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(idx, _)| GameId(idx))
    }

    /// Pair two games as the boards of one bughouse match. Earlier
    /// pairings of either game are dropped.
    pub fn pair(&mut self, a: GameId, b: GameId) -> Result<(), GameError> {
        self.game(a)?;
        self.game(b)?;
        if a == b {
            return Err(GameError::UnknownGame { id: b.0 });
        }
        self.unpair(a);
        self.unpair(b);
        self.partners.insert(a, b);
        self.partners.insert(b, a);
        self.order.clear();
        Ok(())
    }

    pub fn unpair(&mut self, id: GameId) -> Option<GameId> {
        let partner = self.partners.remove(&id)?;
        self.partners.remove(&partner);
        self.order.retain(|&board| board != id && board != partner);
        Some(partner)
    }

    #[must_use]
    pub fn partner(&self, id: GameId) -> Option<GameId> {
        self.partners.get(&id).copied()
    }

    /// Boards of the moves played since pairing, in playing order
    #[must_use]
    pub fn ply_order(&self) -> &[GameId] {
        &self.order
    }

    /// Play a text move on one board.
    pub fn play(&mut self, id: GameId, text: &str) -> Result<Move, GameError> {
        let record = self.game_mut(id)?.play(text)?;
        let (mv, captured) = (record.mv(), record.captured());
        self.after_move(id, captured);
        Ok(mv)
    }

    pub fn apply_move(&mut self, id: GameId, mv: Move) -> Result<Move, GameError> {
        let record = self.game_mut(id)?.apply_move(mv)?;
        let (mv, captured) = (record.mv(), record.captured());
        self.after_move(id, captured);
        Ok(mv)
    }

    /// Play a move list on one board; see [`Game::play_move_list`].
    pub fn play_move_list(&mut self, id: GameId, text: &str) -> Result<usize, GameError> {
        let mut played = 0;
        for token in super::pgn::plain_move_tokens(text) {
            if self.game(id)?.is_over() {
                break;
            }
            self.play(id, token)?;
            played += 1;
        }
        Ok(played)
    }

    /// Take back the last move of one board, returning a piece it captured
    /// from the partner's pool.
    pub fn takeback(&mut self, id: GameId) -> Result<MoveRecord, GameError> {
        let record = self.game_mut(id)?.takeback()?;
        let Some(partner) = self.partner(id) else {
            return Ok(record);
        };
        if let Some(pos) = self.order.iter().rposition(|&board| board == id) {
            self.order.remove(pos);
        }
        if let (Some(victim), Some(game)) = (record.captured(), self.game_slot(partner)) {
            if game.variant() == Variant::Bughouse {
                let piece = transferred(victim);
                if !game.return_droppable(piece) {
                    log::warn!("{piece:?} handed to board {partner} is no longer in its pool");
                }
            }
        }
        if let Some(game) = self.game_slot(partner) {
            if game.outcome().is_some_and(|o| o.cause == EndCause::PartnerBoard) {
                game.set_outcome(None);
            }
        }
        Ok(record)
    }

    /// Take back every move of one board; returns how many were taken back.
    pub fn takeback_all(&mut self, id: GameId) -> usize {
        let mut count = 0;
        while self.takeback(id).is_ok() {
            count += 1;
        }
        count
    }

    pub fn resign(&mut self, id: GameId, color: Color) -> Result<Outcome, GameError> {
        let outcome = self.game_mut(id)?.resign(color)?;
        self.propagate_end(id);
        Ok(outcome)
    }

    pub fn agree_draw(&mut self, id: GameId) -> Result<Outcome, GameError> {
        let outcome = self.game_mut(id)?.agree_draw()?;
        self.propagate_end(id);
        Ok(outcome)
    }

    fn after_move(&mut self, id: GameId, captured: Option<Piece>) {
        let Some(partner) = self.partner(id) else {
            return;
        };
        self.order.push(id);
        if let (Some(victim), Some(game)) = (captured, self.game_slot(partner)) {
            if game.variant() == Variant::Bughouse {
                let piece = transferred(victim);
                log::debug!("{piece:?} goes to board {partner}");
                game.receive_droppable(piece);
            }
        }
        self.propagate_end(id);
    }

    /// End the partner board once this one has ended.
    fn propagate_end(&mut self, id: GameId) {
        let Some(outcome) = self.get(id).and_then(Game::outcome) else {
            return;
        };
        let Some(partner) = self.partner(id) else {
            return;
        };
        if let Some(game) = self.game_slot(partner) {
            if !game.is_over() {
                let mirrored = Outcome::new(outcome.result.mirrored(), EndCause::PartnerBoard);
                log::debug!("board {partner} ended with its partner: {mirrored}");
                game.set_outcome(Some(mirrored));
            }
        }
    }
}

/// Piece the partner receives for a captured `victim`.
fn transferred(victim: Piece) -> Piece {
    victim.as_drop_for(victim.color)
}
