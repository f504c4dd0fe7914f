// Velha - motor de jogo da velha com jogo perfeito

pub mod arena;
pub mod core;
pub mod engine;
pub mod error;
pub mod search;
pub mod session;

pub use crate::core::*;
pub use engine::TranspositionTable;
pub use error::{ArenaError, EngineError, SessionError};
pub use search::{choose_move, select_move, Engine, PriorBias, SearchConfig, SearchResult};
pub use session::{GameSession, SessionConfig};
