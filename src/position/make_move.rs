//! The single mutator: `applyMove`, in a fixed field-update order.

use crate::types::{Color, Move, MoveFlags, Piece, Square};
use crate::zobrist::ZOBRIST;

use super::Position;

pub(crate) fn apply(pos: &mut Position, mv: &Move) {
    let color = pos.turn;
    let is_pawn_move = mv.piece == Piece::Pawn;
    let is_capture = mv.is_capture();

    // (1) remove the source piece.
    pos.remove(mv.from);

    // (2) remove a captured piece, if any. En passant's victim sits one
    // step behind the destination square, not on it.
    if is_capture {
        if mv.flags.contains(MoveFlags::EN_PASSANT) {
            let captured_sq = mv
                .to
                .down_by_color(color)
                .expect("en passant destination always has a square behind it");
            pos.remove(captured_sq);
        } else {
            pos.remove(mv.to);
        }
    }

    // (3) place the moved (or promoted) piece on the destination.
    let placed_piece = mv.promotion_piece.unwrap_or(mv.piece);
    pos.place(mv.to, color, placed_piece);

    // (4) castling also relocates the rook.
    if mv.flags.contains(MoveFlags::CASTLE_SHORT) || mv.flags.contains(MoveFlags::CASTLE_LONG) {
        let rank = mv.from.rank();
        let (rook_from, rook_to) = if mv.flags.contains(MoveFlags::CASTLE_SHORT) {
            (Square::new(rank, 7), Square::new(rank, 5))
        } else {
            (Square::new(rank, 0), Square::new(rank, 3))
        };
        pos.remove(rook_from);
        pos.place(rook_to, color, Piece::Rook);
    }

    // (5) en passant target: clear the old one, set a new one on a double push.
    if let Some(old_ep) = pos.en_passant.take() {
        pos.hash ^= ZOBRIST.en_passant_file[old_ep.file()];
    }
    if mv.flags.contains(MoveFlags::DOUBLE_PAWN_PUSH) {
        let behind = mv
            .to
            .down_by_color(color)
            .expect("a double push always has a square behind its destination");
        pos.en_passant = Some(behind);
        pos.hash ^= ZOBRIST.en_passant_file[behind.file()];
    }

    // (6) castling rights are cleared monotonically by touching home squares.
    clear_rights_touching(pos, mv.from);
    clear_rights_touching(pos, mv.to);

    // (7) flip side to move.
    pos.turn = color.opponent();
    pos.hash ^= ZOBRIST.side_to_move;

    // (8) full-move number increments after Black's move.
    if color == Color::Black {
        pos.fullmove_number += 1;
    }

    // (9) half-move clock resets on a pawn move or capture, else increments.
    if is_pawn_move || is_capture {
        pos.halfmove_clock = 0;
    } else {
        pos.halfmove_clock += 1;
    }
}

fn clear_rights_touching(pos: &mut Position, sq: Square) {
    let (color, kingside) = match (sq.rank(), sq.file()) {
        (0, 4) => (Color::White, None),
        (0, 0) => (Color::White, Some(false)),
        (0, 7) => (Color::White, Some(true)),
        (7, 4) => (Color::Black, None),
        (7, 0) => (Color::Black, Some(false)),
        (7, 7) => (Color::Black, Some(true)),
        _ => return,
    };
    match kingside {
        Some(side) => clear_one(pos, color, side),
        None => {
            clear_one(pos, color, true);
            clear_one(pos, color, false);
        }
    }
}

fn clear_one(pos: &mut Position, color: Color, kingside: bool) {
    if pos.castling.has(color, kingside) {
        pos.castling.clear(color, kingside);
        pos.hash ^= ZOBRIST.castling(color, kingside);
    }
}
