//! Position-level behavior: construction, FEN round-trips, history, and the
//! end-to-end move scenarios a legal-move-generator consumer depends on.

use super::*;
use crate::types::{Color, Piece, Square};

#[test]
fn new_position_is_starting_position() {
    let pos = Position::new();
    assert_eq!(pos.turn(), Color::White);
    assert_eq!(pos.to_fen(), STARTING_FEN);
    assert!(!pos.is_check());
    assert!(!pos.is_finished());
}

#[test]
fn e2e4_updates_en_passant_and_turn() {
    let mut pos = Position::new();
    pos.apply_move_squares(Square::new(1, 4), Square::new(3, 4), None)
        .unwrap();
    assert_eq!(pos.turn(), Color::Black);
    assert_eq!(pos.en_passant(), Some(Square::new(2, 4)));
    assert_eq!(
        pos.to_fen(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
    );
}

#[test]
fn three_plies_clear_one_castling_right() {
    let mut pos = Position::new();
    pos.apply_move_squares(Square::new(1, 7), Square::new(3, 7), None)
        .unwrap(); // h2-h4
    pos.apply_move_squares(Square::new(6, 0), Square::new(4, 0), None)
        .unwrap(); // a7-a5
    pos.apply_move_squares(Square::new(0, 7), Square::new(1, 7), None)
        .unwrap(); // Rh1-h2, loses white kingside rights
    assert!(!pos.castling().has(Color::White, true));
    assert!(pos.castling().has(Color::White, false));
    assert!(pos.castling().has(Color::Black, true));
    assert!(pos.castling().has(Color::Black, false));
}

#[test]
fn fools_mate_is_checkmate() {
    let mut pos = Position::new();
    for (from, to) in [
        ((1, 5), (2, 5)), // f2-f3
        ((6, 4), (4, 4)), // e7-e5
        ((1, 6), (3, 6)), // g2-g4
        ((7, 3), (3, 7)), // Qd8-h4#
    ] {
        pos.apply_move_squares(Square::new(from.0, from.1), Square::new(to.0, to.1), None)
            .unwrap();
    }
    assert!(pos.is_check());
    assert!(pos.is_checkmate());
    assert!(pos.is_finished());
    assert!(pos.legal_moves(None).is_empty());
}

#[test]
fn stalemate_position_has_no_legal_moves_and_no_check() {
    // Classic king-and-queen stalemate: black king on a8 has no legal move.
    let pos = Position::from_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
    assert!(!pos.is_check());
    assert!(pos.is_stalemate());
    assert!(pos.is_finished());
    assert!(pos.legal_moves(None).is_empty());
}

#[test]
fn history_records_moves_in_order() {
    let mut pos = Position::new();
    pos.apply_move_squares(Square::new(1, 4), Square::new(3, 4), None)
        .unwrap();
    pos.apply_move_squares(Square::new(6, 4), Square::new(4, 4), None)
        .unwrap();
    let history = pos.history(false);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].from, Square::new(1, 4));
    assert_eq!(history[1].from, Square::new(6, 4));

    let reversed = pos.history(true);
    assert_eq!(reversed[0].from, Square::new(6, 4));
}

#[test]
fn set_piece_and_remove_piece_update_terminal_flags() {
    let mut pos = Position::from_fen("7k/8/8/8/8/8/8/K6R b - - 0 1").unwrap();
    assert!(pos.is_check());
    assert!(!pos.is_finished());

    // Adding a second rook on the g-file covers both escape squares: checkmate.
    pos.set_piece(Square::new(0, 6), Color::White, Piece::Rook);
    assert!(pos.is_check());
    assert!(pos.is_checkmate());

    pos.remove_piece(Square::new(0, 6));
    assert!(!pos.is_checkmate());
}

#[test]
fn apply_move_keeps_hash_path_independent() {
    // Reaching the same position via two different move orders yields the
    // same Zobrist hash: the hash depends on state, not history. Both
    // orderings use only knight moves, so neither leaves a pawn double-push
    // en-passant target behind to break the transposition.
    let mut via_a = Position::new();
    via_a
        .apply_move_squares(Square::new(0, 6), Square::new(2, 5), None)
        .unwrap(); // Nf3
    via_a
        .apply_move_squares(Square::new(7, 1), Square::new(5, 2), None)
        .unwrap(); // Nc6
    via_a
        .apply_move_squares(Square::new(0, 1), Square::new(2, 2), None)
        .unwrap(); // Nc3

    let mut via_b = Position::new();
    via_b
        .apply_move_squares(Square::new(0, 1), Square::new(2, 2), None)
        .unwrap(); // Nc3
    via_b
        .apply_move_squares(Square::new(7, 1), Square::new(5, 2), None)
        .unwrap(); // Nc6
    via_b
        .apply_move_squares(Square::new(0, 6), Square::new(2, 5), None)
        .unwrap(); // Nf3

    assert_eq!(via_a.hash(), via_b.hash());
    assert_eq!(via_a.to_fen(), via_b.to_fen());
}

#[test]
fn illegal_move_is_rejected() {
    let mut pos = Position::new();
    let err = pos.apply_move_squares(Square::new(1, 4), Square::new(4, 4), None);
    assert!(err.is_err());
}

#[test]
fn apply_move_after_game_finished_is_rejected() {
    let mut pos = Position::from_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
    assert!(pos.is_finished());
    let err = pos.apply_move_squares(Square::new(7, 0), Square::new(6, 0), None);
    assert!(err.is_err());
}

#[test]
fn promotion_choice_is_honored() {
    let mut pos = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let mv = pos
        .apply_move_squares(Square::new(6, 0), Square::new(7, 0), Some(Piece::Knight))
        .unwrap();
    assert_eq!(mv.promotion_piece, Some(Piece::Knight));
    assert_eq!(pos.piece_at(Square::new(7, 0)), Some((Color::White, Piece::Knight)));
}
