//! Static evaluation: material, piece-square tables, and terminal scoring.
//!
//! All magnitudes are expressed in a doubled decipawn unit (one pawn = 20)
//! so that the piece-square contribution — half the table value — stays
//! exact integer arithmetic instead of truncating a fraction every call.

use crate::position::Position;
use crate::types::{Color, Piece};

/// Worse than any real evaluation; a side-to-move checkmate bottoms out near
/// this, biased upward by `ply` so shorter losses score lower than longer ones.
pub const SCORE_MIN: i32 = -1_000_000;
/// Mirror of `SCORE_MIN` for the side delivering mate.
pub const SCORE_MAX: i32 = 1_000_000;

/// Material values in decipawns (`pawn = 10`), doubled to match the PST scale.
const MATERIAL: [i32; 6] = [
    10 * 2, // Pawn
    30 * 2, // Knight
    30 * 2, // Bishop
    50 * 2, // Rook
    120 * 2, // Queen: inflated above the classical 9 to deter shallow sacrifices
    100 * 2, // King: only ever relevant while mop-up material counting runs mid-search
];

type Table = [[i32; 8]; 8];

const PAWN_PST: Table = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [5, 8, 8, 12, 12, 8, 8, 5],
    [4, 6, 8, 16, 16, 8, 6, 4],
    [2, 4, 6, 14, 14, 6, 4, 2],
    [1, 2, 3, 10, 10, 3, 2, 1],
    [0, 0, 0, 2, 2, 0, 0, 0],
    [0, 0, 0, -4, -4, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

const KNIGHT_PST: Table = [
    [-10, -6, -4, -4, -4, -4, -6, -10],
    [-6, -2, 0, 2, 2, 0, -2, -6],
    [-4, 2, 6, 8, 8, 6, 2, -4],
    [-4, 4, 8, 10, 10, 8, 4, -4],
    [-4, 4, 8, 10, 10, 8, 4, -4],
    [-4, 2, 6, 8, 8, 6, 2, -4],
    [-6, -2, 0, 2, 2, 0, -2, -6],
    [-10, -6, -4, -4, -4, -4, -6, -10],
];

const BISHOP_PST: Table = [
    [-4, -2, -2, -2, -2, -2, -2, -4],
    [-2, 2, 0, 0, 0, 0, 2, -2],
    [-2, 2, 4, 6, 6, 4, 2, -2],
    [-2, 0, 6, 6, 6, 6, 0, -2],
    [-2, 0, 6, 6, 6, 6, 0, -2],
    [-2, 2, 4, 6, 6, 4, 2, -2],
    [-2, 2, 0, 0, 0, 0, 2, -2],
    [-4, -2, -2, -2, -2, -2, -2, -4],
];

const ROOK_PST: Table = [
    [0, 0, 2, 4, 4, 2, 0, 0],
    [4, 6, 6, 8, 8, 6, 6, 4],
    [-2, 0, 0, 0, 0, 0, 0, -2],
    [-2, 0, 0, 0, 0, 0, 0, -2],
    [-2, 0, 0, 0, 0, 0, 0, -2],
    [-2, 0, 0, 0, 0, 0, 0, -2],
    [-2, 0, 0, 0, 0, 0, 0, -2],
    [0, 0, 0, 2, 2, 0, 0, 0],
];

const QUEEN_PST: Table = [
    [-4, -2, -2, -1, -1, -2, -2, -4],
    [-2, 0, 0, 0, 0, 0, 0, -2],
    [-2, 0, 2, 2, 2, 2, 0, -2],
    [-1, 0, 2, 3, 3, 2, 0, -1],
    [0, 0, 2, 3, 3, 2, 0, -1],
    [-2, 2, 2, 2, 2, 2, 0, -2],
    [-2, 0, 2, 0, 0, 0, 0, -2],
    [-4, -2, -2, -1, -1, -2, -2, -4],
];

const KING_MIDDLEGAME_PST: Table = [
    [4, 6, 0, -4, -4, 0, 6, 4],
    [4, 4, -2, -6, -6, -2, 4, 4],
    [-4, -8, -8, -10, -10, -8, -8, -4],
    [-8, -10, -10, -12, -12, -10, -10, -8],
    [-8, -10, -10, -12, -12, -10, -10, -8],
    [-4, -8, -8, -10, -10, -8, -8, -4],
    [4, 4, -2, -6, -6, -2, 4, 4],
    [4, 6, 0, -4, -4, 0, 6, 4],
];

fn pst_for(piece: Piece) -> &'static Table {
    match piece {
        Piece::Pawn => &PAWN_PST,
        Piece::Knight => &KNIGHT_PST,
        Piece::Bishop => &BISHOP_PST,
        Piece::Rook => &ROOK_PST,
        Piece::Queen => &QUEEN_PST,
        Piece::King => &KING_MIDDLEGAME_PST,
    }
}

/// Score `pos` from `player_color`'s perspective: positive favors that color.
///
/// Checkmate and stalemate are detected from `pos`'s own cached flags, so
/// callers must have run `refresh_terminal_flags` (via `apply_move` or
/// `from_fen`) before evaluating.
#[must_use]
pub(crate) fn evaluate(pos: &Position, player_color: Color, ply: i32) -> i32 {
    if pos.is_checkmate() {
        return if pos.turn() == player_color {
            SCORE_MIN + ply
        } else {
            SCORE_MAX - ply
        };
    }
    if pos.is_stalemate() {
        return 0;
    }

    let mut score = 0i32;
    for idx in 0..64 {
        let sq = crate::types::Square::from_index(idx);
        let Some((color, piece)) = pos.piece_at(sq) else {
            continue;
        };
        let sign = if color == player_color { 1 } else { -1 };
        let material = MATERIAL[piece.index()];

        let table = pst_for(piece);
        let (rank, file) = (sq.rank(), sq.file());
        let table_rank = match color {
            Color::Black => rank,
            Color::White => 7 - rank,
        };
        let pst_value = table[table_rank][file];

        score += sign * (material + pst_value);
    }
    score
}
