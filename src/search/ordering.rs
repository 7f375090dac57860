//! Move ordering: transposition-table move first, then MVV-LVA captures,
//! then killer quiets, then everything else.

use crate::types::{Move, MoveList, Piece};

const MAX_KILLERS_PER_PLY: usize = 2;

pub(crate) type KillerSlots = [Option<Move>; MAX_KILLERS_PER_PLY];

fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 1,
        Piece::Knight | Piece::Bishop => 3,
        Piece::Rook => 5,
        Piece::Queen => 12,
        Piece::King => 10,
    }
}

/// Most-valuable-victim, least-valuable-attacker: higher is tried first.
fn mvv_lva(mv: &Move) -> i32 {
    match mv.captured_piece {
        Some(victim) => piece_value(victim) * 100 - piece_value(mv.piece),
        None => 0,
    }
}

fn is_killer(mv: &Move, killers: &KillerSlots) -> bool {
    killers.iter().any(|k| *k == Some(*mv))
}

/// Rank a pseudo-legal move list for search: the principal-variation move
/// (from the TT, if any) first, then captures/promotions by MVV-LVA, then
/// killer quiets remembered from sibling branches at this ply, then the rest.
#[must_use]
pub(crate) fn order(moves: &MoveList, pv_move: Option<Move>, killers: &KillerSlots) -> Vec<Move> {
    let mut scored: Vec<(i32, Move)> = moves
        .iter()
        .map(|mv| {
            let score = if Some(*mv) == pv_move {
                i32::MAX
            } else if mv.is_capture() || mv.is_promotion() {
                1_000_000 + mvv_lva(mv)
            } else if is_killer(mv, killers) {
                500_000
            } else {
                0
            };
            (score, *mv)
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, mv)| mv).collect()
}
