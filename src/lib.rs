// Motor Xadrez Adaptativo - escolhe lances com força ajustável por rating (400-3000)

pub mod arena;
pub mod core;
pub mod engine;
pub mod logging;
pub mod search;
pub mod session;

pub use crate::core::{
    Applied, ChessMove, Color, EngineError, MoveSelection, Piece, Position, Rating, Square, Tier,
};
pub use crate::engine::{AdaptiveEngine, EngineConfig, MoveStrategy, Plan, Strategy};
pub use crate::session::{DrawReason, GameResult, GameSession};
