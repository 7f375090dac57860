//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use crate::error::FenError;
use crate::types::{CastlingRights, Color, Piece, Square};

use super::Position;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Parse all six whitespace-separated FEN fields into a `Position`.
pub(crate) fn parse(fen: &str) -> Result<Position, FenError> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() != 6 {
        return Err(FenError::WrongFieldCount { found: parts.len() });
    }

    let mut pos = Position::empty();

    let ranks: Vec<&str> = parts[0].split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount { found: ranks.len() });
    }
    for (rank_from_top, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - rank_from_top;
        let mut file = 0usize;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as usize;
            } else {
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let piece = Piece::from_char(c).ok_or(FenError::UnknownPiece { char: c })?;
                if file >= 8 {
                    return Err(FenError::RankFileCountMismatch { rank, files: file + 1 });
                }
                pos.place(Square::new(rank, file), color, piece);
                file += 1;
            }
        }
        if file != 8 {
            return Err(FenError::RankFileCountMismatch { rank, files: file });
        }
    }

    pos.turn = match parts[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => {
            return Err(FenError::UnknownActiveColor {
                found: other.to_string(),
            })
        }
    };
    if pos.turn == Color::Black {
        pos.hash ^= crate::zobrist::ZOBRIST.side_to_move;
    }

    if parts[2] != "-" {
        let mut seen = CastlingRights::none();
        for c in parts[2].chars() {
            let (color, kingside) = match c {
                'K' => (Color::White, true),
                'Q' => (Color::White, false),
                'k' => (Color::Black, true),
                'q' => (Color::Black, false),
                other => return Err(FenError::InvalidCastlingChar { char: other }),
            };
            if seen.has(color, kingside) {
                return Err(FenError::DuplicateCastlingChar { char: c });
            }
            seen.set(color, kingside);
        }
        pos.castling = seen;
    }
    for color in [Color::White, Color::Black] {
        for kingside in [true, false] {
            if pos.castling.has(color, kingside) {
                pos.hash ^= crate::zobrist::ZOBRIST.castling(color, kingside);
            }
        }
    }

    if parts[3] != "-" {
        let sq: Square = parts[3]
            .parse()
            .map_err(|_| FenError::InvalidEnPassantSquare {
                found: parts[3].to_string(),
            })?;
        let expected_rank = match pos.turn {
            Color::White => 5,
            Color::Black => 2,
        };
        if sq.rank() != expected_rank {
            return Err(FenError::InvalidEnPassantSquare {
                found: parts[3].to_string(),
            });
        }
        pos.hash ^= crate::zobrist::ZOBRIST.en_passant_file[sq.file()];
        pos.en_passant = Some(sq);
    }

    pos.halfmove_clock = parts[4]
        .parse::<u32>()
        .map_err(|_| FenError::InvalidHalfMoveClock {
            found: parts[4].to_string(),
        })?;

    let fullmove: u32 = parts[5]
        .parse()
        .map_err(|_| FenError::InvalidFullMoveNumber {
            found: parts[5].to_string(),
        })?;
    if fullmove < 1 {
        return Err(FenError::InvalidFullMoveNumber {
            found: parts[5].to_string(),
        });
    }
    pos.fullmove_number = fullmove;

    let white_kings = pos.bitboard(Piece::King, Color::White).count_ones();
    let black_kings = pos.bitboard(Piece::King, Color::Black).count_ones();
    if white_kings == 0 {
        return Err(FenError::MissingKing { color: Color::White });
    }
    if white_kings > 1 {
        return Err(FenError::MultipleKings { color: Color::White });
    }
    if black_kings == 0 {
        return Err(FenError::MissingKing { color: Color::Black });
    }
    if black_kings > 1 {
        return Err(FenError::MultipleKings { color: Color::Black });
    }

    Ok(pos)
}

/// Serialize a position back to FEN text. The inverse of `parse`: for any
/// FEN this codec emits, `parse(serialize(parse(fen))) == parse(fen)`.
#[must_use]
pub(crate) fn serialize(pos: &Position) -> String {
    let mut ranks = Vec::with_capacity(8);
    for rank in (0..8).rev() {
        let mut row = String::new();
        let mut empty = 0u32;
        for file in 0..8 {
            match pos.piece_at(Square::new(rank, file)) {
                Some((color, piece)) => {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char(color));
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            row.push_str(&empty.to_string());
        }
        ranks.push(row);
    }

    let active = if pos.turn() == Color::White { "w" } else { "b" };
    let castling = pos.castling().to_string();
    let ep = pos
        .en_passant()
        .map_or_else(|| "-".to_string(), |sq| sq.to_string().to_lowercase());

    format!(
        "{} {} {} {} {} {}",
        ranks.join("/"),
        active,
        castling,
        ep,
        pos.halfmove_clock(),
        pos.fullmove_number()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_roundtrips() {
        let pos = Position::from_fen(STARTING_FEN).unwrap();
        assert_eq!(pos.to_fen(), STARTING_FEN);
    }

    #[test]
    fn rejects_wrong_field_count() {
        let err = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -");
        assert!(matches!(
            err.unwrap_err(),
            crate::error::EngineError::InvalidFen(FenError::WrongFieldCount { found: 5 })
        ));
    }

    #[test]
    fn rejects_bad_rank_count() {
        let err = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1");
        assert!(matches!(
            err.unwrap_err(),
            crate::error::EngineError::InvalidFen(FenError::WrongRankCount { .. })
        ));
    }

    #[test]
    fn rejects_rank_file_mismatch() {
        let err = Position::from_fen("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(matches!(
            err.unwrap_err(),
            crate::error::EngineError::InvalidFen(FenError::RankFileCountMismatch { .. })
        ));
    }

    #[test]
    fn rejects_missing_king() {
        let err = Position::from_fen("rnbq1bnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert!(matches!(
            err.unwrap_err(),
            crate::error::EngineError::InvalidFen(FenError::MissingKing { .. })
        ));
    }

    #[test]
    fn rejects_en_passant_on_wrong_rank() {
        let err = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1");
        assert!(matches!(
            err.unwrap_err(),
            crate::error::EngineError::InvalidFen(FenError::InvalidEnPassantSquare { .. })
        ));
    }

    #[test]
    fn after_e4_round_trips() {
        let mut pos = Position::new();
        pos.apply_move_squares("e2".parse().unwrap(), "e4".parse().unwrap(), None)
            .unwrap();
        assert_eq!(
            pos.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }
}
