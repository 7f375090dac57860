//! The engine facade: the stateful API a caller actually drives, plus
//! stateless variants that take a configuration and hand back a result
//! without retaining anything.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::position::{HistoryRecord, Position, StructuredConfig};
use crate::search::{self, ScoredMove};
use crate::tt::TranspositionTable;
use crate::types::{Color, Move, Piece, Square};

const DEFAULT_TT_SIZE_MB: usize = 16;

/// Either half of the position factory: FEN text or an explicit piece map.
#[derive(Clone, Debug)]
pub enum PositionConfig {
    StartingPosition,
    Fen(String),
    Structured(StructuredConfig),
}

impl Default for PositionConfig {
    fn default() -> Self {
        PositionConfig::StartingPosition
    }
}

fn build_position(config: &PositionConfig) -> EngineResult<Position> {
    match config {
        PositionConfig::StartingPosition => Ok(Position::new()),
        PositionConfig::Fen(fen) => Position::from_fen(fen),
        PositionConfig::Structured(cfg) => Position::from_structured(cfg),
    }
}

/// An explicit depth schedule, overriding the `level` table.
#[derive(Clone, Copy, Debug)]
pub struct DepthOverride {
    pub base: u32,
    pub extended: u32,
    pub check: bool,
    pub quiescence: u32,
}

/// Options for `Engine::ai` / the stateless `ai` variant.
#[derive(Clone, Debug)]
pub struct AiOptions {
    pub level: u8,
    pub play: bool,
    pub analysis: bool,
    pub tt_size_mb: usize,
    pub randomness: f64,
    pub depth: Option<DepthOverride>,
}

impl Default for AiOptions {
    fn default() -> Self {
        AiOptions {
            level: 1,
            play: true,
            analysis: false,
            tt_size_mb: DEFAULT_TT_SIZE_MB,
            randomness: 0.0,
            depth: None,
        }
    }
}

fn validate_options(options: &AiOptions) -> EngineResult<()> {
    if let Some(depth) = &options.depth {
        if depth.base == 0 {
            return Err(EngineError::InvalidOption {
                field: "depth.base",
                reason: "must be greater than 0".to_string(),
            });
        }
        if depth.extended > 3 {
            return Err(EngineError::InvalidOption {
                field: "depth.extended",
                reason: "must be in 0..=3".to_string(),
            });
        }
    }
    if !options.randomness.is_finite() || options.randomness < 0.0 {
        return Err(EngineError::InvalidOption {
            field: "randomness",
            reason: "must be finite and >= 0".to_string(),
        });
    }
    Ok(())
}

/// The `baseDepth, extendedDepth, qMaxDepth, checkExtension` schedule for a
/// named difficulty level.
fn level_schedule(level: u8) -> EngineResult<(u32, u32, u32, bool)> {
    match level {
        1 => Ok((1, 1, 1, true)),
        2 => Ok((2, 1, 1, true)),
        3 => Ok((3, 2, 2, true)),
        4 => Ok((3, 3, 3, true)),
        5 => Ok((4, 3, 4, true)),
        other => Err(EngineError::InvalidLevel {
            value: other,
            allowed: (1, 5),
        }),
    }
}

/// Boost `base` toward `base + extended` when the position is simple enough
/// (thin material) or the root has few candidate moves to examine.
fn adaptive_depth(base: u32, extended: u32, piece_count: u32, root_branching: usize) -> u32 {
    let mut bonus = 0u32;
    if piece_count <= 10 {
        bonus = bonus.max(2);
    } else if piece_count <= 18 {
        bonus = bonus.max(1);
    }
    if root_branching <= 12 {
        bonus = bonus.max(1);
    }
    (base + bonus).min(base + extended)
}

/// The result of `Engine::ai` / the stateless `ai` variant.
#[derive(Clone, Debug)]
pub struct AiResult {
    pub mv: Option<Move>,
    pub board: Position,
    pub analysis: Option<Vec<ScoredMove>>,
    pub best_score: Option<i32>,
    pub depth: Option<u32>,
    pub nodes_searched: Option<u64>,
}

/// A position's JSON-exportable snapshot.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ExportedPosition {
    pub pieces: BTreeMap<String, char>,
    pub turn: Color,
    pub is_finished: bool,
    pub check: bool,
    pub check_mate: bool,
    pub stale_mate: bool,
    pub castling: String,
    pub en_passant: Option<String>,
    pub half_move: u32,
    pub full_move: u32,
    pub moves: BTreeMap<String, Vec<String>>,
}

fn legal_moves_by_square(pos: &Position, from: Option<Square>) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for mv in pos.legal_moves(from).iter() {
        grouped
            .entry(mv.from.to_string())
            .or_default()
            .push(mv.to.to_string());
    }
    for targets in grouped.values_mut() {
        targets.sort();
    }
    grouped
}

fn export_json(pos: &Position) -> ExportedPosition {
    let mut pieces = BTreeMap::new();
    for idx in 0..64 {
        let sq = Square::from_index(idx);
        if let Some((color, piece)) = pos.piece_at(sq) {
            pieces.insert(sq.to_string(), piece.to_fen_char(color));
        }
    }
    ExportedPosition {
        pieces,
        turn: pos.turn(),
        is_finished: pos.is_finished(),
        check: pos.is_check(),
        check_mate: pos.is_checkmate(),
        stale_mate: pos.is_stalemate(),
        castling: pos.castling().to_string(),
        en_passant: pos.en_passant().map(|sq| sq.to_string()),
        half_move: pos.halfmove_clock(),
        full_move: pos.fullmove_number(),
        moves: legal_moves_by_square(pos, None),
    }
}

fn run_ai(pos: &mut Position, tt: &mut TranspositionTable, options: &AiOptions) -> EngineResult<AiResult> {
    validate_options(options)?;
    if pos.is_finished() {
        return Err(EngineError::GameFinished);
    }

    let (mut base, extended, qmax, check_extension) = match &options.depth {
        Some(d) => (d.base, d.extended, d.quiescence, d.check),
        None => level_schedule(options.level)?,
    };
    let root_branching = pos.legal_moves(None).len();
    base = adaptive_depth(base, extended, pos.piece_count(), root_branching);

    #[cfg(feature = "logging")]
    log::debug!(
        "ai: level={} base_depth={base} q_max_depth={qmax} randomness={}",
        options.level,
        options.randomness
    );

    let result = search::find_best_move(
        pos,
        base,
        qmax,
        check_extension,
        options.randomness,
        tt,
        options.analysis,
    );

    #[cfg(feature = "logging")]
    log::info!(
        "ai: depth_reached={} nodes={} score={}",
        result.depth,
        result.nodes_searched,
        result.score
    );

    let board = if options.play {
        if let Some(mv) = result.best_move {
            pos.apply_move(&mv);
        }
        pos.clone()
    } else {
        pos.clone()
    };

    Ok(AiResult {
        mv: result.best_move,
        board,
        analysis: result.analysis,
        best_score: Some(result.score),
        depth: Some(result.depth),
        nodes_searched: Some(result.nodes_searched),
    })
}

/// A stateful chess game: the current position plus its transposition table.
pub struct Engine {
    position: Position,
    tt: TranspositionTable,
    tt_size_mb: usize,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Engine {
            position: Position::new(),
            tt: TranspositionTable::new(DEFAULT_TT_SIZE_MB),
            tt_size_mb: DEFAULT_TT_SIZE_MB,
        }
    }

    pub fn from_config(config: &PositionConfig) -> EngineResult<Self> {
        Ok(Engine {
            position: build_position(config)?,
            tt: TranspositionTable::new(DEFAULT_TT_SIZE_MB),
            tt_size_mb: DEFAULT_TT_SIZE_MB,
        })
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[must_use]
    pub fn moves(&self, from: Option<Square>) -> BTreeMap<String, Vec<String>> {
        legal_moves_by_square(&self.position, from)
    }

    #[must_use]
    pub fn export_json(&self) -> ExportedPosition {
        export_json(&self.position)
    }

    #[must_use]
    pub fn export_fen(&self) -> String {
        self.position.to_fen()
    }

    #[must_use]
    pub fn get_history(&self, reversed: bool) -> Vec<HistoryRecord> {
        self.position.history(reversed)
    }

    pub fn make_move(&mut self, from: Square, to: Square, promotion: Option<Piece>) -> EngineResult<Move> {
        if self.position.is_finished() {
            return Err(EngineError::GameFinished);
        }
        self.position.apply_move_squares(from, to, promotion)
    }

    pub fn set_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        self.position.set_piece(sq, color, piece);
    }

    pub fn remove_piece(&mut self, sq: Square) {
        self.position.remove_piece(sq);
    }

    pub fn ai(&mut self, options: &AiOptions) -> EngineResult<AiResult> {
        if self.tt_size_mb != options.tt_size_mb {
            self.tt = TranspositionTable::new(options.tt_size_mb);
            self.tt_size_mb = options.tt_size_mb;
        }
        run_ai(&mut self.position, &mut self.tt, options)
    }

    /// Legacy shorthand: equivalent to `ai({level, play: true}).mv`.
    pub fn ai_move(&mut self, level: u8) -> EngineResult<Move> {
        let options = AiOptions {
            level,
            play: true,
            ..AiOptions::default()
        };
        let result = self.ai(&options)?;
        result
            .mv
            .ok_or(EngineError::GameFinished)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Stateless: legal moves for `config`, optionally restricted to `from`.
pub fn moves(config: &PositionConfig, from: Option<Square>) -> EngineResult<BTreeMap<String, Vec<String>>> {
    let pos = build_position(config)?;
    Ok(legal_moves_by_square(&pos, from))
}

/// Stateless: the full exported snapshot for `config`.
pub fn status(config: &PositionConfig) -> EngineResult<ExportedPosition> {
    let pos = build_position(config)?;
    Ok(export_json(&pos))
}

/// Stateless: play one move against `config` and return the resulting position.
pub fn apply_move(
    config: &PositionConfig,
    from: Square,
    to: Square,
    promotion: Option<Piece>,
) -> EngineResult<Position> {
    let mut pos = build_position(config)?;
    if pos.is_finished() {
        return Err(EngineError::GameFinished);
    }
    pos.apply_move_squares(from, to, promotion)?;
    Ok(pos)
}

/// Stateless: run the AI against `config` without retaining any state.
pub fn ai(config: &PositionConfig, options: &AiOptions) -> EngineResult<AiResult> {
    let mut pos = build_position(config)?;
    let mut tt = TranspositionTable::new(options.tt_size_mb);
    run_ai(&mut pos, &mut tt, options)
}

/// Stateless shorthand: equivalent to `ai(config, {level, play: true}).mv`.
pub fn ai_move(config: &PositionConfig, level: u8) -> EngineResult<Move> {
    let options = AiOptions {
        level,
        play: true,
        ..AiOptions::default()
    };
    ai(config, &options)?.mv.ok_or(EngineError::GameFinished)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_fen_matches_starting_position() {
        let engine = Engine::new();
        assert_eq!(
            engine.export_fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    #[test]
    fn e2e4_updates_fen() {
        let mut engine = Engine::new();
        engine
            .make_move(Square::new(1, 4), Square::new(3, 4), None)
            .unwrap();
        assert_eq!(
            engine.export_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn three_plies_lose_white_castling_rights() {
        let mut engine = Engine::new();
        engine
            .make_move(Square::new(1, 4), Square::new(3, 4), None)
            .unwrap(); // e2-e4
        engine
            .make_move(Square::new(6, 2), Square::new(4, 2), None)
            .unwrap(); // c7-c5
        engine
            .make_move(Square::new(0, 4), Square::new(1, 4), None)
            .unwrap(); // e1-e2
        assert_eq!(
            engine.export_fen(),
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPPKPPP/RNBQ1BNR b kq - 1 2"
        );
    }

    #[test]
    fn mate_in_one_via_ai() {
        let config = PositionConfig::Fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1".to_string());
        let options = AiOptions {
            level: 2,
            ..AiOptions::default()
        };
        let result = ai(&config, &options).unwrap();
        assert!(result.board.is_checkmate());
        assert!(result.board.is_finished());
        let mv = result.mv.unwrap();
        assert_eq!(mv.from.to_string(), "A1");
        assert_eq!(mv.to.to_string(), "A8");
    }

    #[test]
    fn stalemate_status_reports_no_moves() {
        let config = PositionConfig::Fen("k7/8/1Q1K4/8/8/8/8/8 b - - 0 1".to_string());
        let snapshot = status(&config).unwrap();
        assert!(snapshot.is_finished);
        assert!(!snapshot.check);
        assert!(!snapshot.check_mate);
        assert!(snapshot.stale_mate);
        assert!(snapshot.moves.is_empty());
    }

    #[test]
    fn starting_position_moves_match_known_sets() {
        let engine = Engine::new();
        let all = engine.moves(None);
        assert_eq!(all.len(), 10); // 8 pawns + 2 knights can move
        let total: usize = all.values().map(Vec::len).sum();
        assert_eq!(total, 20);

        let e2 = engine.moves(Some(Square::new(1, 4)));
        assert_eq!(e2.get("E2").unwrap(), &vec!["E3".to_string(), "E4".to_string()]);

        let b1 = engine.moves(Some(Square::new(0, 1)));
        assert_eq!(b1.get("B1").unwrap(), &vec!["A3".to_string(), "C3".to_string()]);
    }

    #[test]
    fn castling_right_lost_after_king_walks_home() {
        let mut cfg = StructuredConfig {
            turn: Color::White,
            ..StructuredConfig::default()
        };
        cfg.pieces.insert(Square::new(0, 4), (Color::White, Piece::King));
        cfg.pieces.insert(Square::new(0, 7), (Color::White, Piece::Rook));
        cfg.pieces.insert(Square::new(7, 4), (Color::Black, Piece::King));
        cfg.castling.set(Color::White, true);

        let mut engine = Engine::from_config(&PositionConfig::Structured(cfg)).unwrap();
        let moves = engine.moves(Some(Square::new(0, 4)));
        assert!(moves.get("E1").unwrap().contains(&"G1".to_string()));

        engine.make_move(Square::new(0, 4), Square::new(0, 5), None).unwrap(); // E1-F1
        engine.make_move(Square::new(7, 4), Square::new(7, 3), None).unwrap(); // E8-D8
        engine.make_move(Square::new(0, 5), Square::new(0, 4), None).unwrap(); // F1-E1
        engine.make_move(Square::new(7, 3), Square::new(7, 4), None).unwrap(); // D8-E8

        assert!(!engine.position().castling().has(Color::White, true));
    }

    #[test]
    fn en_passant_available_and_consumes_the_pawn() {
        let mut engine = Engine::new();
        engine.make_move(Square::new(1, 2), Square::new(3, 2), None).unwrap(); // c2-c4
        engine.make_move(Square::new(6, 0), Square::new(4, 0), None).unwrap(); // a7-a5
        engine.make_move(Square::new(3, 2), Square::new(4, 2), None).unwrap(); // c4-c5
        engine.make_move(Square::new(6, 1), Square::new(4, 1), None).unwrap(); // b7-b5

        let moves = engine.moves(Some(Square::new(4, 2)));
        assert!(moves.get("C5").unwrap().contains(&"B6".to_string()));

        engine.make_move(Square::new(4, 2), Square::new(5, 1), None).unwrap(); // c5xb6 e.p.
        assert!(engine.position().piece_at(Square::new(4, 1)).is_none());
    }
}
