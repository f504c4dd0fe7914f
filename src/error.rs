// Tipos de erro do motor e do driver de sessão

use crate::core::{Mark, Move};
use thiserror::Error;

/// Erros de entrada inválida para o modelo de tabuleiro.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("board must have exactly 9 cells, got {0}")]
    InvalidLength(usize),

    #[error("invalid cell character {0:?} at position {1}")]
    InvalidCell(char, usize),

    #[error("invalid mark {0:?} (expected X or O)")]
    InvalidMark(String),

    #[error("cell index {0} is out of range (0..9)")]
    OutOfRange(usize),

    #[error("cell {0} is already occupied")]
    Occupied(Move),
}

/// Erros do driver de jogo (pedidos que não podem ser aplicados ao estado atual).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("the game is already over")]
    GameOver,

    #[error("it is not {0}'s turn")]
    NotYourTurn(Mark),

    #[error("illegal move: {0}")]
    IllegalMove(#[from] EngineError),

    #[error("engine found no legal move")]
    NoMoveAvailable,
}

/// Erros da arena de auto-jogo.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error("unknown opponent {0:?} (expected random, first or engine)")]
    UnknownOpponent(String),

    #[error("an arena worker thread panicked")]
    WorkerPanicked,
}
