//! Zobrist hashing: a process-constant table of keys seeded deterministically
//! so hashes (and the positions built from them) are stable across runs.

use std::sync::LazyLock;

use rand::prelude::*;

use crate::types::{Color, Piece, Square};

const ZOBRIST_SEED: u64 = 0x5EED_BEEF_CAFE_F00D;

pub(crate) struct ZobristKeys {
    /// `piece_keys[piece.index()][color.index()][square.as_index()]`
    piece_keys: [[[u64; 64]; 2]; 6],
    pub(crate) side_to_move: u64,
    /// `castling_keys[color.index()][kingside as usize]`
    castling_keys: [[u64; 2]; 2],
    pub(crate) en_passant_file: [u64; 8],
}

impl ZobristKeys {
    fn generate() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut piece_keys = [[[0u64; 64]; 2]; 6];
        for piece in &mut piece_keys {
            for color in piece.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let side_to_move = rng.gen();

        let mut castling_keys = [[0u64; 2]; 2];
        for color in &mut castling_keys {
            for key in color.iter_mut() {
                *key = rng.gen();
            }
        }

        let mut en_passant_file = [0u64; 8];
        for key in &mut en_passant_file {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            side_to_move,
            castling_keys,
            en_passant_file,
        }
    }

    #[inline]
    pub(crate) fn piece(&self, piece: Piece, color: Color, sq: Square) -> u64 {
        self.piece_keys[piece.index()][color.index()][sq.as_index()]
    }

    #[inline]
    pub(crate) fn castling(&self, color: Color, kingside: bool) -> u64 {
        self.castling_keys[color.index()][kingside as usize]
    }
}

pub(crate) static ZOBRIST: LazyLock<ZobristKeys> = LazyLock::new(ZobristKeys::generate);
