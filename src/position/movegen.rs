//! Pseudo-legal move generation and the legal-move filter.

use crate::types::{Color, Move, MoveFlags, MoveList, Piece, Square, PROMOTION_PIECES};

use super::attacks::is_square_attacked;
use super::Position;

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
const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];
const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Enumerate every move the side to move could attempt if king safety were
/// ignored: full piece movement rules, but no check for leaving one's own
/// king attacked.
#[must_use]
pub(crate) fn generate_pseudo_legal_moves(pos: &Position) -> MoveList {
    let color = pos.turn();
    let mut moves = MoveList::new();

    for idx in 0..64 {
        let sq = Square::from_index(idx);
        let Some((piece_color, piece)) = pos.piece_at(sq) else {
            continue;
        };
        if piece_color != color {
            continue;
        }
        match piece {
            Piece::Pawn => generate_pawn_moves(pos, sq, color, &mut moves),
            Piece::Knight => generate_stepper_moves(pos, sq, color, piece, &KNIGHT_OFFSETS, &mut moves),
            Piece::King => generate_stepper_moves(pos, sq, color, piece, &KING_OFFSETS, &mut moves),
            Piece::Bishop => generate_slider_moves(pos, sq, color, piece, &DIAGONAL, &mut moves),
            Piece::Rook => generate_slider_moves(pos, sq, color, piece, &ORTHOGONAL, &mut moves),
            Piece::Queen => {
                generate_slider_moves(pos, sq, color, piece, &DIAGONAL, &mut moves);
                generate_slider_moves(pos, sq, color, piece, &ORTHOGONAL, &mut moves);
            }
        }
    }

    generate_castling_moves(pos, color, &mut moves);
    moves
}

fn push_pawn_move(
    moves: &mut MoveList,
    from: Square,
    to: Square,
    captured: Option<Piece>,
    promote: bool,
    flags: MoveFlags,
) {
    if promote {
        for &promo in &PROMOTION_PIECES {
            moves.push(Move {
                from,
                to,
                piece: Piece::Pawn,
                captured_piece: captured,
                promotion_piece: Some(promo),
                flags: flags.union(MoveFlags::PROMOTION),
            });
        }
    } else {
        moves.push(Move {
            from,
            to,
            piece: Piece::Pawn,
            captured_piece: captured,
            promotion_piece: None,
            flags,
        });
    }
}

fn generate_pawn_moves(pos: &Position, from: Square, color: Color, moves: &mut MoveList) {
    let promotion_rank = match color {
        Color::White => 7,
        Color::Black => 0,
    };
    let start_rank = match color {
        Color::White => 1,
        Color::Black => 6,
    };

    if let Some(one) = from.up_by_color(color) {
        if pos.is_empty_at(one) {
            let promote = one.rank() == promotion_rank;
            push_pawn_move(moves, from, one, None, promote, MoveFlags::NONE);

            if from.rank() == start_rank {
                if let Some(two) = one.up_by_color(color) {
                    if pos.is_empty_at(two) {
                        moves.push(Move {
                            from,
                            to: two,
                            piece: Piece::Pawn,
                            captured_piece: None,
                            promotion_piece: None,
                            flags: MoveFlags::DOUBLE_PAWN_PUSH,
                        });
                    }
                }
            }
        }
    }

    for file_delta in [-1i8, 1] {
        let Some(forward) = from.up_by_color(color) else {
            continue;
        };
        let Some(target) = forward.step(file_delta, 0) else {
            continue;
        };
        if let Some((occ_color, occ_piece)) = pos.piece_at(target) {
            if occ_color != color {
                let promote = target.rank() == promotion_rank;
                push_pawn_move(moves, from, target, Some(occ_piece), promote, MoveFlags::CAPTURE);
            }
        } else if Some(target) == pos.en_passant() {
            moves.push(Move {
                from,
                to: target,
                piece: Piece::Pawn,
                captured_piece: Some(Piece::Pawn),
                promotion_piece: None,
                flags: MoveFlags::CAPTURE.union(MoveFlags::EN_PASSANT),
            });
        }
    }
}

fn generate_stepper_moves(
    pos: &Position,
    from: Square,
    color: Color,
    piece: Piece,
    offsets: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &(df, dr) in offsets {
        let Some(to) = from.step(df, dr) else {
            continue;
        };
        match pos.piece_at(to) {
            None => moves.push(Move {
                from,
                to,
                piece,
                captured_piece: None,
                promotion_piece: None,
                flags: MoveFlags::NONE,
            }),
            Some((occ_color, occ_piece)) if occ_color != color => moves.push(Move {
                from,
                to,
                piece,
                captured_piece: Some(occ_piece),
                promotion_piece: None,
                flags: MoveFlags::CAPTURE,
            }),
            Some(_) => {}
        }
    }
}

fn generate_slider_moves(
    pos: &Position,
    from: Square,
    color: Color,
    piece: Piece,
    directions: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &(df, dr) in directions {
        let mut cur = from;
        while let Some(to) = cur.step(df, dr) {
            match pos.piece_at(to) {
                None => {
                    moves.push(Move {
                        from,
                        to,
                        piece,
                        captured_piece: None,
                        promotion_piece: None,
                        flags: MoveFlags::NONE,
                    });
                    cur = to;
                }
                Some((occ_color, occ_piece)) => {
                    if occ_color != color {
                        moves.push(Move {
                            from,
                            to,
                            piece,
                            captured_piece: Some(occ_piece),
                            promotion_piece: None,
                            flags: MoveFlags::CAPTURE,
                        });
                    }
                    break;
                }
            }
        }
    }
}

fn generate_castling_moves(pos: &Position, color: Color, moves: &mut MoveList) {
    let rank = match color {
        Color::White => 0,
        Color::Black => 7,
    };
    let king_home = Square::new(rank, 4);
    if pos.piece_at(king_home) != Some((color, Piece::King)) {
        return;
    }
    let opponent = color.opponent();

    if pos.castling().has(color, true) {
        let rook_home = Square::new(rank, 7);
        let f = Square::new(rank, 5);
        let g = Square::new(rank, 6);
        if pos.piece_at(rook_home) == Some((color, Piece::Rook))
            && pos.is_empty_at(f)
            && pos.is_empty_at(g)
            && !is_square_attacked(pos, king_home, opponent)
            && !is_square_attacked(pos, f, opponent)
        {
            moves.push(Move {
                from: king_home,
                to: g,
                piece: Piece::King,
                captured_piece: None,
                promotion_piece: None,
                flags: MoveFlags::CASTLE_SHORT,
            });
        }
    }

    if pos.castling().has(color, false) {
        let rook_home = Square::new(rank, 0);
        let d = Square::new(rank, 3);
        let c = Square::new(rank, 2);
        let b = Square::new(rank, 1);
        if pos.piece_at(rook_home) == Some((color, Piece::Rook))
            && pos.is_empty_at(d)
            && pos.is_empty_at(c)
            && pos.is_empty_at(b)
            && !is_square_attacked(pos, king_home, opponent)
            && !is_square_attacked(pos, d, opponent)
        {
            moves.push(Move {
                from: king_home,
                to: c,
                piece: Piece::King,
                captured_piece: None,
                promotion_piece: None,
                flags: MoveFlags::CASTLE_LONG,
            });
        }
    }
}

/// The pseudo-legal set filtered to moves that do not leave the mover's king
/// attacked. Each candidate is played on a cloned position, discarded after
/// the attack test.
#[must_use]
pub(crate) fn generate_legal_moves(pos: &Position) -> MoveList {
    let color = pos.turn();
    let pseudo = generate_pseudo_legal_moves(pos);
    let mut legal = MoveList::new();
    for mv in &pseudo {
        let mut clone = pos.clone();
        clone.apply_move_raw(mv);
        if !is_square_attacked(
            &clone,
            clone
                .king_square(color)
                .expect("the mover's king cannot vanish from a legal move"),
            color.opponent(),
        ) {
            legal.push(*mv);
        }
    }
    legal
}
