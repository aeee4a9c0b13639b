// Ficheiro: src/session.rs
// Descrição: Registo de uma partida (posição, rating, histórico, resultado).
//
// O motor não guarda estado: quem joga passa a sessão explicitamente.
// Não há dicionário global de partidas aqui; guardar várias sessões é
// problema de quem chama.

use crate::core::*;
use crate::engine::AdaptiveEngine;
use rand::Rng;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

/// Meios-lances sem captura nem lance de peão para empate automático (75 lances).
pub const SEVENTY_FIVE_MOVE_PLIES: u32 = 150;

/// Ocorrências da mesma posição para empate automático.
pub const FIVEFOLD_REPETITION: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoveRule,
    FivefoldRepetition,
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DrawReason::Stalemate => "stalemate",
            DrawReason::InsufficientMaterial => "insufficient material",
            DrawReason::SeventyFiveMoveRule => "75-move rule",
            DrawReason::FivefoldRepetition => "fivefold repetition",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw(DrawReason),
}

impl GameResult {
    pub fn winner(self) -> Option<Color> {
        match self {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            GameResult::Draw(_) => None,
        }
    }

    /// Notação PGN: "1-0", "0-1", "1/2-1/2".
    pub fn score(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw(_) => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::WhiteWins => write!(f, "1-0 (white wins)"),
            GameResult::BlackWins => write!(f, "0-1 (black wins)"),
            GameResult::Draw(reason) => write!(f, "1/2-1/2 ({})", reason),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameSession {
    position: Position,
    // Posição e relógios iniciais, para `reset`
    start: (Position, u32, u32),
    rating: Rating,
    human_color: Color,
    history: Vec<ChessMove>,
    halfmove_clock: u32,
    fullmove_number: u32,
    repetitions: HashMap<u64, u32>,
    result: Option<GameResult>,
}

impl GameSession {
    /// Nova partida a partir da posição inicial.
    pub fn new(rating: Rating, human_color: Color) -> Self {
        Self::with_position(Position::new(), 0, 1, rating, human_color)
    }

    /// Partida a partir de uma FEN. Os relógios (5º e 6º campos) são lidos se existirem.
    pub fn from_fen(fen: &str, rating: Rating, human_color: Color) -> Result<Self> {
        let position = Position::from_fen(fen)?;
        let mut fields = fen.split_whitespace().skip(4);
        let halfmove_clock = fields
            .next()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(0);
        let fullmove_number = fields
            .next()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(1)
            .max(1);
        Ok(Self::with_position(
            position,
            halfmove_clock,
            fullmove_number,
            rating,
            human_color,
        ))
    }

    fn with_position(
        position: Position,
        halfmove_clock: u32,
        fullmove_number: u32,
        rating: Rating,
        human_color: Color,
    ) -> Self {
        let mut session = GameSession {
            start: (position.clone(), halfmove_clock, fullmove_number),
            position,
            rating,
            human_color,
            history: Vec::new(),
            halfmove_clock,
            fullmove_number,
            repetitions: HashMap::new(),
            result: None,
        };
        session.repetitions.insert(session.position.hash(), 1);
        session.result = session.detect_result();
        session
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    /// Troca o rating (com clamp). Vale a partir do próximo lance do motor.
    pub fn set_rating(&mut self, rating: i32) -> Rating {
        self.rating = Rating::new(rating);
        info!(rating = %self.rating, "rating changed");
        self.rating
    }

    pub fn human_color(&self) -> Color {
        self.human_color
    }

    pub fn is_engine_turn(&self) -> bool {
        self.result.is_none() && self.position.side_to_move() != self.human_color
    }

    pub fn history(&self) -> &[ChessMove] {
        &self.history
    }

    /// Meios-lances jogados nesta sessão.
    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    /// FEN com os relógios da sessão.
    pub fn fen(&self) -> String {
        let board_fen = self.position.fen();
        let fields: Vec<&str> = board_fen.split_whitespace().take(4).collect();
        format!(
            "{} {} {}",
            fields.join(" "),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    pub fn legal_moves_uci(&self) -> Vec<String> {
        self.position
            .legal_moves()
            .into_iter()
            .map(|mv| mv.to_string())
            .collect()
    }

    /// Joga um lance em notação UCI (ex.: "e2e4", "e7e8q").
    pub fn play_uci(&mut self, uci: &str) -> Result<ChessMove> {
        if let Some(result) = self.result {
            return Err(EngineError::GameOver(result.to_string()));
        }
        let mv = self.position.find_uci(uci)?;
        self.record(mv);
        Ok(mv)
    }

    /// Joga um lance já construído, depois de confirmar que é legal.
    pub fn play_move(&mut self, mv: ChessMove) -> Result<()> {
        if let Some(result) = self.result {
            return Err(EngineError::GameOver(result.to_string()));
        }
        if !self.position.is_legal(mv) {
            return Err(EngineError::IllegalMove(mv.to_string()));
        }
        self.record(mv);
        Ok(())
    }

    /// Pede um lance ao motor para o rating da sessão e aplica-o.
    pub fn engine_reply<R: Rng + ?Sized>(
        &mut self,
        engine: &AdaptiveEngine,
        rng: &mut R,
    ) -> Result<MoveSelection> {
        if let Some(result) = self.result {
            return Err(EngineError::GameOver(result.to_string()));
        }

        let selection = engine.select_move(&mut self.position, self.rating, rng);
        if let MoveSelection::Move(mv) = selection {
            // Re-verificado antes de entrar na partida
            self.play_move(mv)?;
        }
        Ok(selection)
    }

    /// Volta para a posição com que a sessão começou.
    pub fn reset(&mut self) {
        let (position, halfmove_clock, fullmove_number) = self.start.clone();
        *self = Self::with_position(
            position,
            halfmove_clock,
            fullmove_number,
            self.rating,
            self.human_color,
        );
        debug!("session reset");
    }

    fn record(&mut self, mv: ChessMove) {
        let resets_clock = self.position.is_capture(mv)
            || matches!(self.position.piece_on(mv.get_source()), Some((Piece::Pawn, _)));
        let mover = self.position.side_to_move();

        self.position.advance(mv);
        self.history.push(mv);
        self.halfmove_clock = if resets_clock { 0 } else { self.halfmove_clock + 1 };
        if mover == Color::Black {
            self.fullmove_number += 1;
        }
        *self.repetitions.entry(self.position.hash()).or_insert(0) += 1;

        self.result = self.detect_result();
        if let Some(result) = self.result {
            info!(%result, moves = self.history.len(), "game over");
        }
    }

    fn detect_result(&self) -> Option<GameResult> {
        let pos = &self.position;
        if pos.is_checkmate() {
            return Some(match pos.side_to_move() {
                Color::White => GameResult::BlackWins,
                Color::Black => GameResult::WhiteWins,
            });
        }
        if pos.is_stalemate() {
            return Some(GameResult::Draw(DrawReason::Stalemate));
        }
        if pos.is_insufficient_material() {
            return Some(GameResult::Draw(DrawReason::InsufficientMaterial));
        }
        if self.halfmove_clock >= SEVENTY_FIVE_MOVE_PLIES {
            return Some(GameResult::Draw(DrawReason::SeventyFiveMoveRule));
        }
        let seen = self.repetitions.get(&pos.hash()).copied().unwrap_or(0);
        if seen >= FIVEFOLD_REPETITION {
            return Some(GameResult::Draw(DrawReason::FivefoldRepetition));
        }
        None
    }
}
