//! Transposition table: a power-of-two-sized, direct-mapped cache of search
//! results keyed by Zobrist hash.

use crate::eval::{SCORE_MAX, SCORE_MIN};
use crate::types::Move;

/// Scores within this margin of `SCORE_MIN`/`SCORE_MAX` are mate scores and
/// need their ply distance normalized on store/probe.
const MATE_THRESHOLD: i32 = SCORE_MAX - 1_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Clone, Debug)]
struct Entry {
    key: u64,
    depth: u32,
    score: i32,
    bound: Bound,
    best_move: Option<Move>,
    age: u8,
}

pub(crate) struct TranspositionTable {
    slots: Vec<Option<Entry>>,
    mask: usize,
    age: u8,
}

/// What a probe found, already adjusted back to the querying node's ply.
pub(crate) enum ProbeResult {
    /// Depth and bound make the stored score immediately usable at this node.
    Usable(i32),
    /// The entry didn't satisfy depth/bound but still has a move worth trying first.
    MoveOnly(Move),
    Miss,
}

impl TranspositionTable {
    /// Size the table to roughly `size_mb` megabytes, rounded down to a
    /// power-of-two entry count.
    #[must_use]
    pub(crate) fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<Option<Entry>>();
        let mut num_entries = (size_mb * 1024 * 1024) / entry_size.max(1);
        num_entries = num_entries.next_power_of_two();
        if num_entries == 0 {
            num_entries = 1024;
        }
        TranspositionTable {
            slots: vec![None; num_entries],
            mask: num_entries - 1,
            age: 0,
        }
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    /// Advance the age counter; called once per `findBestMove` invocation so
    /// entries from earlier searches lose replacement priority.
    pub(crate) fn new_search(&mut self) {
        self.age = self.age.wrapping_add(1);
    }

    pub(crate) fn probe(&self, hash: u64, depth: u32, alpha: i32, beta: i32, ply: i32) -> ProbeResult {
        let Some(entry) = &self.slots[self.index(hash)] else {
            return ProbeResult::Miss;
        };
        if entry.key != hash {
            return ProbeResult::Miss;
        }
        if entry.depth < depth {
            return entry
                .best_move
                .map_or(ProbeResult::Miss, ProbeResult::MoveOnly);
        }

        let score = from_tt_score(entry.score, ply);
        let usable = match entry.bound {
            Bound::Exact => true,
            Bound::Lower => score >= beta,
            Bound::Upper => score <= alpha,
        };
        if usable {
            ProbeResult::Usable(score)
        } else {
            entry
                .best_move
                .map_or(ProbeResult::Miss, ProbeResult::MoveOnly)
        }
    }

    pub(crate) fn get_best_move(&self, hash: u64) -> Option<Move> {
        self.slots[self.index(hash)]
            .as_ref()
            .filter(|e| e.key == hash)
            .and_then(|e| e.best_move)
    }

    pub(crate) fn store(
        &mut self,
        hash: u64,
        depth: u32,
        score: i32,
        bound: Bound,
        best_move: Option<Move>,
        ply: i32,
    ) {
        let index = self.index(hash);
        let should_replace = match &self.slots[index] {
            None => true,
            Some(existing) => {
                existing.key != hash || depth >= existing.depth || existing.age != self.age
            }
        };
        if !should_replace {
            return;
        }
        self.slots[index] = Some(Entry {
            key: hash,
            depth,
            score: to_tt_score(score, ply),
            bound,
            best_move,
            age: self.age,
        });
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Normalize a node-relative mate score to a root-relative one before storing,
/// so the same mate reached at a different ply next time still compares correctly.
fn to_tt_score(score: i32, ply: i32) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply
    } else if score <= -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

/// The inverse of `to_tt_score`: re-express a stored root-relative mate score
/// in terms of the probing node's own ply.
fn from_tt_score(score: i32, ply: i32) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply
    } else if score <= -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Move, MoveFlags, Piece, Square};

    fn sample_move() -> Move {
        Move {
            from: Square::new(1, 4),
            to: Square::new(3, 4),
            piece: Piece::Pawn,
            captured_piece: None,
            promotion_piece: None,
            flags: MoveFlags::DOUBLE_PAWN_PUSH,
        }
    }

    #[test]
    fn store_then_probe_returns_exact_score() {
        let mut tt = TranspositionTable::new(1);
        tt.store(42, 5, 100, Bound::Exact, Some(sample_move()), 0);
        match tt.probe(42, 5, -1000, 1000, 0) {
            ProbeResult::Usable(score) => assert_eq!(score, 100),
            _ => panic!("expected a usable probe result"),
        }
    }

    #[test]
    fn probe_misses_on_hash_collision() {
        let mut tt = TranspositionTable::new(1);
        tt.store(42, 5, 100, Bound::Exact, None, 0);
        let other_key = 42 ^ (tt.mask as u64 + 1);
        assert!(matches!(
            tt.probe(other_key, 5, -1000, 1000, 0),
            ProbeResult::Miss
        ));
    }

    #[test]
    fn shallower_stored_depth_yields_move_only() {
        let mut tt = TranspositionTable::new(1);
        tt.store(7, 2, 50, Bound::Exact, Some(sample_move()), 0);
        match tt.probe(7, 6, -1000, 1000, 0) {
            ProbeResult::MoveOnly(mv) => assert_eq!(mv, sample_move()),
            _ => panic!("expected a move-only result for insufficient depth"),
        }
    }

    #[test]
    fn lower_bound_only_usable_past_beta() {
        let mut tt = TranspositionTable::new(1);
        tt.store(9, 4, 300, Bound::Lower, None, 0);
        assert!(matches!(tt.probe(9, 4, -1000, 200, 0), ProbeResult::Miss));
        assert!(matches!(
            tt.probe(9, 4, -1000, 300, 0),
            ProbeResult::Usable(300)
        ));
    }

    #[test]
    fn mate_score_adjusts_across_ply() {
        let mut tt = TranspositionTable::new(1);
        let mate_score = SCORE_MAX - 3;
        tt.store(11, 10, mate_score, Bound::Exact, None, 5);
        match tt.probe(11, 10, -SCORE_MAX, SCORE_MAX, 2) {
            ProbeResult::Usable(score) => assert_eq!(score, mate_score - 5 + 2),
            _ => panic!("expected a usable probe result"),
        }
    }

    #[test]
    fn new_search_lets_shallower_entries_replace_stale_ones() {
        let mut tt = TranspositionTable::new(1);
        tt.store(3, 10, 1, Bound::Exact, None, 0);
        tt.new_search();
        tt.store(3, 1, 2, Bound::Exact, None, 0);
        match tt.probe(3, 1, -1000, 1000, 0) {
            ProbeResult::Usable(score) => assert_eq!(score, 2),
            _ => panic!("expected the new-generation entry to win replacement"),
        }
    }
}
