//! Attack detection: "is square S attacked by color C in position P?"

use crate::types::{Color, Piece, Square};

use super::Position;

const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Is `sq` attacked by any piece of `attacker_color` in `pos`?
///
/// Ray-scans the four orthogonal and four diagonal directions from `sq` until
/// a blocker is found, tests the eight knight offsets, and tests pawn/king
/// attacks at distance one. O(1) for knight tests, O(ray length) for sliders;
/// no allocation.
#[must_use]
pub(crate) fn is_square_attacked(pos: &Position, sq: Square, attacker_color: Color) -> bool {
    for &(df, dr) in &ORTHOGONAL {
        if let Some((blocker, color, piece, adjacent)) = ray_hit(pos, sq, df, dr) {
            let _ = blocker;
            if color != attacker_color {
                continue;
            }
            match piece {
                Piece::Rook | Piece::Queen => return true,
                Piece::King if adjacent => return true,
                _ => {}
            }
        }
    }

    for &(df, dr) in &DIAGONAL {
        if let Some((_blocker, color, piece, adjacent)) = ray_hit(pos, sq, df, dr) {
            if color != attacker_color {
                continue;
            }
            match piece {
                Piece::Bishop | Piece::Queen => return true,
                Piece::King if adjacent => return true,
                Piece::Pawn if adjacent && pawn_attacks_from(attacker_color, dr) => return true,
                _ => {}
            }
        }
    }

    for &(df, dr) in &KNIGHT_OFFSETS {
        if let Some(target) = sq.step(df, dr) {
            if let Some((color, Piece::Knight)) = pos.piece_at(target) {
                if color == attacker_color {
                    return true;
                }
            }
        }
    }

    false
}

/// Walk one ray from `sq` in direction `(df, dr)` until a piece blocks it;
/// return its square, `(color, kind)`, and whether it was the immediately
/// adjacent square (distance one), or `None` if the ray runs off-board
/// without finding a blocker.
fn ray_hit(pos: &Position, sq: Square, df: i8, dr: i8) -> Option<(Square, Color, Piece, bool)> {
    let first = sq.step(df, dr)?;
    let mut cur = first;
    loop {
        if let Some((color, piece)) = pos.piece_at(cur) {
            return Some((cur, color, piece, cur == first));
        }
        cur = cur.step(df, dr)?;
    }
}

/// A pawn attacks diagonally forward for its own color. `dr` is the diagonal
/// step *from the attacked square back toward the attacker*, so the attacker
/// must be moving in the opposite vertical direction to threaten `sq`.
fn pawn_attacks_from(attacker_color: Color, dr: i8) -> bool {
    match attacker_color {
        Color::White => dr < 0,
        Color::Black => dr > 0,
    }
}

/// Is the given color's king currently attacked by the opponent?
#[must_use]
pub(crate) fn is_king_in_check(pos: &Position, color: Color) -> bool {
    match pos.king_square(color) {
        Some(king_sq) => is_square_attacked(pos, king_sq, color.opponent()),
        None => false,
    }
}
