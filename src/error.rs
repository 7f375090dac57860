//! Error types for chess position and engine operations.

use std::fmt;

/// Failure to parse an algebraic square (e.g. `"e4"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::InvalidNotation { notation } => {
                write!(f, "invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

/// Failure to parse or validate a FEN string, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    WrongFieldCount { found: usize },
    WrongRankCount { found: usize },
    RankFileCountMismatch { rank: usize, files: usize },
    UnknownPiece { char: char },
    UnknownActiveColor { found: String },
    InvalidCastlingChar { char: char },
    DuplicateCastlingChar { char: char },
    InvalidEnPassantSquare { found: String },
    InvalidHalfMoveClock { found: String },
    InvalidFullMoveNumber { found: String },
    MissingKing { color: crate::types::Color },
    MultipleKings { color: crate::types::Color },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::WrongFieldCount { found } => {
                write!(f, "FEN must have exactly 6 fields, found {found}")
            }
            FenError::WrongRankCount { found } => {
                write!(f, "FEN piece placement must have 8 ranks, found {found}")
            }
            FenError::RankFileCountMismatch { rank, files } => {
                write!(f, "rank {rank} sums to {files} files, expected 8")
            }
            FenError::UnknownPiece { char } => {
                write!(f, "unknown piece character '{char}' in piece placement field")
            }
            FenError::UnknownActiveColor { found } => {
                write!(f, "unknown active color '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidCastlingChar { char } => {
                write!(f, "unknown castling character '{char}'")
            }
            FenError::DuplicateCastlingChar { char } => {
                write!(f, "duplicate castling character '{char}'")
            }
            FenError::InvalidEnPassantSquare { found } => {
                write!(f, "en passant square '{found}' is not on rank 3 or 6")
            }
            FenError::InvalidHalfMoveClock { found } => {
                write!(f, "half-move clock '{found}' is not a non-negative integer")
            }
            FenError::InvalidFullMoveNumber { found } => {
                write!(f, "full-move number '{found}' is not an integer >= 1")
            }
            FenError::MissingKing { color } => {
                write!(f, "position has no {color} king")
            }
            FenError::MultipleKings { color } => {
                write!(f, "position has more than one {color} king")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Top-level error surfaced by every fallible public entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    IllegalMove { from: String, to: String },
    InvalidFen(FenError),
    InvalidSquare(SquareError),
    InvalidPiece { found: char },
    InvalidLevel { value: u8, allowed: (u8, u8) },
    GameFinished,
    InvalidOption { field: &'static str, reason: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::IllegalMove { from, to } => {
                write!(f, "illegal move {from}-{to}")
            }
            EngineError::InvalidFen(e) => write!(f, "invalid FEN: {e}"),
            EngineError::InvalidSquare(e) => write!(f, "invalid square: {e}"),
            EngineError::InvalidPiece { found } => {
                write!(f, "invalid piece character '{found}'")
            }
            EngineError::InvalidLevel { value, allowed } => write!(
                f,
                "invalid level {value}, expected {}..={}",
                allowed.0, allowed.1
            ),
            EngineError::GameFinished => write!(f, "game is already finished"),
            EngineError::InvalidOption { field, reason } => {
                write!(f, "invalid option '{field}': {reason}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl From<FenError> for EngineError {
    fn from(e: FenError) -> Self {
        EngineError::InvalidFen(e)
    }
}

impl From<SquareError> for EngineError {
    fn from(e: SquareError) -> Self {
        EngineError::InvalidSquare(e)
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
