use thiserror::Error;

/// Erros de entrada. Ausência de lances legais não é erro (ver `MoveSelection`).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("invalid move format '{0}'")]
    InvalidMove(String),

    #[error("illegal move '{0}' in the current position")]
    IllegalMove(String),

    #[error("game is already over ({0})")]
    GameOver(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
