//! Played moves, their names and the repetition count of every position.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::board::{Move, MoveNames, Notation, Piece, UnmakeInfo};

/// One played move with everything needed to show it or take it back.
#[derive(Clone, Debug)]
pub struct MoveRecord {
    mv: Move,
    captured: Option<Piece>,
    names: MoveNames,
    comment: Option<String>,
    nag: Option<u8>,
    played_at: DateTime<Utc>,
    elapsed: Duration,
    pub(crate) undo: UnmakeInfo,
}

impl MoveRecord {
    #[must_use]
    pub fn mv(&self) -> Move {
        self.mv
    }

    /// Piece removed from the board by the move
    #[must_use]
    pub fn captured(&self) -> Option<Piece> {
        self.captured
    }

    #[must_use]
    pub fn names(&self) -> &MoveNames {
        &self.names
    }

    #[must_use]
    pub fn name(&self, notation: Notation) -> &str {
        self.names.get(notation)
    }

    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Numeric annotation glyph attached to the move (`$1` is 1)
    #[must_use]
    pub fn nag(&self) -> Option<u8> {
        self.nag
    }

    #[must_use]
    pub fn played_at(&self) -> DateTime<Utc> {
        self.played_at
    }

    /// Time since the previous move, or since the game started for the first one
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Ordered record of a game's moves.
///
/// The move list of every script is kept as one growing string, with the
/// length before each move remembered so a takeback only truncates.
#[derive(Clone, Debug)]
pub struct MoveHistory {
    records: Vec<MoveRecord>,
    lists: [String; 5],
    marks: Vec<[usize; 5]>,
    started_at: DateTime<Utc>,
}

impl Default for MoveHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveHistory {
    #[must_use]
    pub fn new() -> Self {
        MoveHistory {
            records: Vec::new(),
            lists: Default::default(),
            marks: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub(crate) fn push(
        &mut self,
        mv: Move,
        captured: Option<Piece>,
        names: MoveNames,
        undo: UnmakeInfo,
    ) -> &MoveRecord {
        let played_at = Utc::now();
        let since = self.records.last().map_or(self.started_at, |r| r.played_at);
        let mut mark = [0; 5];
        for notation in Notation::ALL {
            let list = &mut self.lists[notation as usize];
            mark[notation as usize] = list.len();
            if !list.is_empty() {
                list.push(' ');
            }
            list.push_str(names.get(notation));
        }
        self.marks.push(mark);
        self.records.push(MoveRecord {
            mv,
            captured,
            names,
            comment: None,
            nag: None,
            played_at,
            elapsed: played_at.signed_duration_since(since),
            undo,
        });
        let last = self.records.len() - 1;
        &self.records[last]
    }

    pub(crate) fn pop(&mut self) -> Option<MoveRecord> {
        let record = self.records.pop()?;
        if let Some(mark) = self.marks.pop() {
            for (list, len) in self.lists.iter_mut().zip(mark) {
                list.truncate(len);
            }
        }
        Some(record)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record of the move at 0-based `ply`
    #[must_use]
    pub fn get(&self, ply: usize) -> Option<&MoveRecord> {
        self.records.get(ply)
    }

    #[must_use]
    pub fn last(&self) -> Option<&MoveRecord> {
        self.records.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MoveRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// All move names in `notation`, separated by single spaces
    #[must_use]
    pub fn move_list(&self, notation: Notation) -> &str {
        &self.lists[notation as usize]
    }

    /// Move names in `notation` from 0-based `ply` on
    #[must_use]
    pub fn move_list_from(&self, notation: Notation, ply: usize) -> &str {
        let list = self.move_list(notation);
        match self.marks.get(ply) {
            Some(mark) if ply > 0 => &list[mark[notation as usize] + 1..],
            Some(_) => list,
            None => "",
        }
    }

    pub(crate) fn set_comment(&mut self, ply: usize, comment: Option<String>) -> bool {
        match self.records.get_mut(ply) {
            Some(record) => {
                record.comment = comment;
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_nag(&mut self, ply: usize, nag: u8) -> bool {
        match self.records.get_mut(ply) {
            Some(record) => {
                record.nag = Some(nag);
                true
            }
            None => false,
        }
    }
}

impl<'a> IntoIterator for &'a MoveHistory {
    type Item = &'a MoveRecord;
    type IntoIter = std::slice::Iter<'a, MoveRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Occurrence count per position key.
#[derive(Clone, Debug, Default)]
pub(crate) struct RepetitionTable {
    counts: HashMap<String, u32>,
}

impl RepetitionTable {
    pub(crate) fn new() -> Self {
        RepetitionTable {
            counts: HashMap::new(),
        }
    }

    pub(crate) fn get(&self, key: &str) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub(crate) fn increment(&mut self, key: &str) -> u32 {
        let count = self.counts.entry(key.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub(crate) fn decrement(&mut self, key: &str) {
        if let Some(count) = self.counts.get_mut(key) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.counts.remove(key);
            }
        }
    }
}

/// Repetition key of a position: its notation without the two clock fields.
pub(crate) fn repetition_key(fen: &str) -> &str {
    let mut end = fen.len();
    for _ in 0..2 {
        match fen[..end].rfind(' ') {
            Some(space) => end = space,
            None => break,
        }
    }
    &fen[..end]
}
