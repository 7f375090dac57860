//! A self-contained legal-move generator and bounded-search chess engine:
//! dual mailbox/bitboard position, FEN codec, negamax search with a
//! transposition table, and a stateful/stateless facade over both.

pub mod engine;
pub mod error;
pub mod eval;
pub mod position;
mod search;
mod tt;
pub mod types;
mod zobrist;

pub use engine::{
    ai, ai_move, apply_move, moves, status, AiOptions, AiResult, DepthOverride, Engine,
    ExportedPosition, PositionConfig,
};
pub use error::{EngineError, EngineResult, FenError, SquareError};
pub use position::{HistoryRecord, Position, StructuredConfig};
pub use search::{ScoredMove, SearchResult};
pub use types::{CastlingRights, Color, Move, MoveFlags, MoveList, Piece, Square};
