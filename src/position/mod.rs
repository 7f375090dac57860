//! The authoritative position representation: dual mailbox + bitboard model
//! with an incrementally maintained Zobrist hash.

mod attacks;
pub(crate) mod fen;
mod make_move;
mod movegen;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::types::{CastlingRights, Color, Move, MoveList, Piece, Square};
use crate::zobrist::ZOBRIST;

pub use fen::STARTING_FEN;

#[inline]
pub(crate) const fn bb_index(piece: Piece, color: Color) -> usize {
    piece.index() * 2 + color.index()
}

/// One entry of a position's move history, as exposed by `Position::history`.
#[derive(Clone, Debug)]
pub struct HistoryRecord {
    pub from: Square,
    pub to: Square,
    pub configuration: String,
}

/// The non-FEN half of the position factory: an explicit piece map plus
/// turn/rights/clocks, with the same defaults spelled out for FEN fields.
#[derive(Clone, Debug)]
pub struct StructuredConfig {
    pub pieces: HashMap<Square, (Color, Piece)>,
    pub turn: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub half_move: u32,
    pub full_move: u32,
}

impl Default for StructuredConfig {
    fn default() -> Self {
        StructuredConfig {
            pieces: HashMap::new(),
            turn: Color::White,
            castling: CastlingRights::none(),
            en_passant: None,
            half_move: 0,
            full_move: 1,
        }
    }
}

/// A legal chess position: mailbox, bitboards, rights, clocks, and cached
/// check/mate/stalemate flags, all mutated exclusively through `apply_move`.
#[derive(Clone, Debug)]
pub struct Position {
    mailbox: [Option<(Color, Piece)>; 64],
    bitboards: [u64; 12],
    white_pieces: u64,
    black_pieces: u64,
    all_pieces: u64,
    turn: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: u64,
    is_check: bool,
    is_checkmate: bool,
    is_stalemate: bool,
    history: Vec<HistoryRecord>,
}

impl Position {
    /// The standard chess starting position.
    #[must_use]
    pub fn new() -> Self {
        Self::from_fen(STARTING_FEN).expect("starting FEN is always valid")
    }

    fn empty() -> Self {
        Position {
            mailbox: [None; 64],
            bitboards: [0; 12],
            white_pieces: 0,
            black_pieces: 0,
            all_pieces: 0,
            turn: Color::White,
            castling: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            is_check: false,
            is_checkmate: false,
            is_stalemate: false,
            history: Vec::new(),
        }
    }

    /// Parse a position from FEN text (see `fen` module for validation rules).
    pub fn from_fen(fen: &str) -> EngineResult<Self> {
        let mut pos = fen::parse(fen)?;
        pos.refresh_terminal_flags();
        Ok(pos)
    }

    /// Build a position from a structured configuration (a piece map plus
    /// turn/rights/clocks), the non-FEN half of the position factory.
    pub fn from_structured(cfg: &StructuredConfig) -> EngineResult<Self> {
        let mut pos = Position::empty();
        for (&sq, &(color, piece)) in &cfg.pieces {
            pos.place(sq, color, piece);
        }

        pos.turn = cfg.turn;
        if pos.turn == Color::Black {
            pos.hash ^= ZOBRIST.side_to_move;
        }

        pos.castling = cfg.castling;
        for color in [Color::White, Color::Black] {
            for kingside in [true, false] {
                if pos.castling.has(color, kingside) {
                    pos.hash ^= ZOBRIST.castling(color, kingside);
                }
            }
        }

        if let Some(ep) = cfg.en_passant {
            pos.en_passant = Some(ep);
            pos.hash ^= ZOBRIST.en_passant_file[ep.file()];
        }

        pos.halfmove_clock = cfg.half_move;
        pos.fullmove_number = cfg.full_move.max(1);

        let white_kings = pos.bitboard(Piece::King, Color::White).count_ones();
        let black_kings = pos.bitboard(Piece::King, Color::Black).count_ones();
        if white_kings != 1 || black_kings != 1 {
            return Err(EngineError::InvalidOption {
                field: "pieces",
                reason: "a structured configuration needs exactly one king per side".to_string(),
            });
        }

        pos.refresh_terminal_flags();
        Ok(pos)
    }

    #[must_use]
    pub fn to_fen(&self) -> String {
        fen::serialize(self)
    }

    #[must_use]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[must_use]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[must_use]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[must_use]
    pub fn is_check(&self) -> bool {
        self.is_check
    }

    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.is_checkmate
    }

    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        self.is_stalemate
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.is_checkmate || self.is_stalemate
    }

    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.mailbox[sq.as_index()]
    }

    #[must_use]
    pub fn piece_count(&self) -> u32 {
        self.all_pieces.count_ones()
    }

    #[must_use]
    pub fn history(&self, reversed: bool) -> Vec<HistoryRecord> {
        if reversed {
            let mut h = self.history.clone();
            h.reverse();
            h
        } else {
            self.history.clone()
        }
    }

    #[must_use]
    pub(crate) fn is_empty_at(&self, sq: Square) -> bool {
        self.mailbox[sq.as_index()].is_none()
    }

    #[must_use]
    pub(crate) fn bitboard(&self, piece: Piece, color: Color) -> u64 {
        self.bitboards[bb_index(piece, color)]
    }

    #[must_use]
    pub(crate) fn occupancy(&self, color: Color) -> u64 {
        match color {
            Color::White => self.white_pieces,
            Color::Black => self.black_pieces,
        }
    }

    #[must_use]
    pub(crate) fn all_occupancy(&self) -> u64 {
        self.all_pieces
    }

    #[must_use]
    pub(crate) fn king_square(&self, color: Color) -> Option<Square> {
        let bb = self.bitboard(Piece::King, color);
        if bb == 0 {
            None
        } else {
            Some(Square::from_index(bb.trailing_zeros() as usize))
        }
    }

    pub(crate) fn place(&mut self, sq: Square, color: Color, piece: Piece) {
        debug_assert!(self.mailbox[sq.as_index()].is_none());
        self.mailbox[sq.as_index()] = Some((color, piece));
        let mask = 1u64 << sq.as_index();
        self.bitboards[bb_index(piece, color)] |= mask;
        match color {
            Color::White => self.white_pieces |= mask,
            Color::Black => self.black_pieces |= mask,
        }
        self.all_pieces |= mask;
        self.hash ^= ZOBRIST.piece(piece, color, sq);
    }

    pub(crate) fn remove(&mut self, sq: Square) -> Option<(Color, Piece)> {
        let occ = self.mailbox[sq.as_index()].take()?;
        let (color, piece) = occ;
        let mask = !(1u64 << sq.as_index());
        self.bitboards[bb_index(piece, color)] &= mask;
        match color {
            Color::White => self.white_pieces &= mask,
            Color::Black => self.black_pieces &= mask,
        }
        self.all_pieces &= mask;
        self.hash ^= ZOBRIST.piece(piece, color, sq);
        Some(occ)
    }

    /// Directly place a piece on `sq`, outside of move application. Used for
    /// position editing; not part of the legal-move game flow.
    pub fn set_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        if self.mailbox[sq.as_index()].is_some() {
            self.remove(sq);
        }
        self.place(sq, color, piece);
        self.refresh_terminal_flags();
        self.history.push(HistoryRecord {
            from: sq,
            to: sq,
            configuration: self.to_fen(),
        });
    }

    /// Directly remove whatever piece (if any) occupies `sq`.
    pub fn remove_piece(&mut self, sq: Square) {
        self.remove(sq);
        self.refresh_terminal_flags();
        self.history.push(HistoryRecord {
            from: sq,
            to: sq,
            configuration: self.to_fen(),
        });
    }

    /// The legal moves available to the side to move, optionally restricted
    /// to those starting on `from`.
    #[must_use]
    pub fn legal_moves(&self, from: Option<Square>) -> MoveList {
        let all = movegen::generate_legal_moves(self);
        match from {
            None => all,
            Some(sq) => {
                let mut out = MoveList::new();
                for mv in &all {
                    if mv.from == sq {
                        out.push(*mv);
                    }
                }
                out
            }
        }
    }

    #[must_use]
    pub(crate) fn pseudo_legal_moves(&self) -> MoveList {
        movegen::generate_pseudo_legal_moves(self)
    }

    /// Apply the move `(from, to)` for the side to move, auto-promoting to
    /// `promotion` (defaulting to queen) when the move is a promotion.
    pub fn apply_move_squares(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Piece>,
    ) -> EngineResult<Move> {
        if self.is_finished() {
            return Err(EngineError::GameFinished);
        }
        let legal = movegen::generate_legal_moves(self);
        let chosen = legal.iter().find(|mv| {
            mv.from == from
                && mv.to == to
                && (!mv.is_promotion() || mv.promotion_piece == promotion.or(Some(Piece::Queen)))
        });
        match chosen {
            Some(mv) => {
                let mv = *mv;
                self.apply_move(&mv);
                Ok(mv)
            }
            None => Err(EngineError::IllegalMove {
                from: from.to_string(),
                to: to.to_string(),
            }),
        }
    }

    /// Apply an already-chosen (legal or pseudo-legal) move and refresh the
    /// cached terminal flags. This is the public-facing path; the search and
    /// the legality filter use `apply_move_raw` on a cloned position instead,
    /// since they only need the resulting king-attacked test, not a full
    /// legal-move re-enumeration on every node.
    pub(crate) fn apply_move(&mut self, mv: &Move) {
        self.apply_move_raw(mv);
        self.refresh_terminal_flags();
        self.history.push(HistoryRecord {
            from: mv.from,
            to: mv.to,
            configuration: self.to_fen(),
        });
    }

    /// The single mutator, with no flag refresh and no history entry.
    /// Used for the make-move/test/unmake legality
    /// filter and for search, which discards the mutated clone afterward.
    pub(crate) fn apply_move_raw(&mut self, mv: &Move) {
        make_move::apply(self, mv);
    }

    /// Recompute `is_check`/`is_checkmate`/`is_stalemate` from the current
    /// mailbox/turn state. Called after every externally observable mutation,
    /// not on every internal search clone.
    pub(crate) fn refresh_terminal_flags(&mut self) {
        self.is_check = attacks::is_king_in_check(self, self.turn);
        let has_move = !movegen::generate_legal_moves(self).is_empty();
        self.is_checkmate = self.is_check && !has_move;
        self.is_stalemate = !self.is_check && !has_move;
    }

    #[must_use]
    pub(crate) fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        attacks::is_square_attacked(self, sq, by)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}
