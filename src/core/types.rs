// Ficheiro: src/core/types.rs
// Descrição: Módulo para as definições de tipos de dados fundamentais do jogo.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Número de casas do tabuleiro 3x3.
pub const BOARD_CELLS: usize = 9;

/// Pontuação de minimax (sempre do ponto de vista do maximizador).
pub type Score = i32;

/// Distância em plies a partir da raiz da busca.
pub type Depth = u8;

// Enum para representar a marca de um jogador. O X joga sempre primeiro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl std::ops::Not for Mark {
    type Output = Mark;

    fn not(self) -> Self::Output {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl Mark {
    pub fn to_char(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }

    pub fn from_char(ch: char) -> Option<Mark> {
        match ch {
            'X' | 'x' => Some(Mark::X),
            'O' | 'o' => Some(Mark::O),
            _ => None,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl std::str::FromStr for Mark {
    type Err = crate::error::EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Mark::from_char(ch).ok_or(crate::error::EngineError::InvalidMark(s.to_string())),
            _ => Err(crate::error::EngineError::InvalidMark(s.to_string())),
        }
    }
}

const CELL_NAMES: [&str; BOARD_CELLS] = [
    "Top Left", "Top Center", "Top Right",
    "Middle Left", "Center", "Middle Right",
    "Bottom Left", "Bottom Center", "Bottom Right",
];

// Struct para representar um lance: o índice (0..9) da casa a marcar,
// em ordem row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Move(u8);

impl Move {
    pub const CENTER: Move = Move(4);
    pub const CORNERS: [Move; 4] = [Move(0), Move(2), Move(6), Move(8)];

    /// Constrói um lance verificando o intervalo. Não verifica se a casa está livre.
    pub fn new(index: usize) -> Option<Move> {
        if index < BOARD_CELLS {
            Some(Move(index as u8))
        } else {
            None
        }
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Nome legível da casa ("Top Left", "Center", ...).
    pub fn name(self) -> &'static str {
        CELL_NAMES[self.index()]
    }

    pub fn is_corner(self) -> bool {
        matches!(self.0, 0 | 2 | 6 | 8)
    }

    pub fn is_center(self) -> bool {
        self.0 == 4
    }

    pub fn is_edge(self) -> bool {
        matches!(self.0, 1 | 3 | 5 | 7)
    }

    /// Todos os lances possíveis em ordem crescente.
    pub fn all() -> impl Iterator<Item = Move> {
        (0..BOARD_CELLS as u8).map(Move)
    }
}

impl TryFrom<u8> for Move {
    type Error = crate::error::EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Move::new(value as usize).ok_or(crate::error::EngineError::OutOfRange(value as usize))
    }
}

impl From<Move> for u8 {
    fn from(mv: Move) -> u8 {
        mv.0
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Estado de uma posição: vencedor, empate ou jogo em curso.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Winner(Mark),
    Draw,
    InProgress,
}

impl GameOutcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }

    pub fn winner(self) -> Option<Mark> {
        match self {
            GameOutcome::Winner(mark) => Some(mark),
            _ => None,
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Winner(mark) => write!(f, "{} wins", mark),
            GameOutcome::Draw => write!(f, "draw"),
            GameOutcome::InProgress => write!(f, "in progress"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_range_is_checked() {
        assert_eq!(Move::new(4), Some(Move::CENTER));
        assert_eq!(Move::new(9), None);
        assert!(Move::try_from(12u8).is_err());
    }

    #[test]
    fn cell_classification() {
        let corners: Vec<usize> = Move::all().filter(|m| m.is_corner()).map(Move::index).collect();
        let edges: Vec<usize> = Move::all().filter(|m| m.is_edge()).map(Move::index).collect();
        assert_eq!(corners, vec![0, 2, 6, 8]);
        assert_eq!(edges, vec![1, 3, 5, 7]);
        assert!(Move::CENTER.is_center());
        assert_eq!(Move::CENTER.name(), "Center");
    }

    #[test]
    fn mark_parsing_and_negation() {
        assert_eq!("o".parse::<Mark>().unwrap(), Mark::O);
        assert!("XO".parse::<Mark>().is_err());
        assert_eq!(!Mark::X, Mark::O);
    }

    #[test]
    fn move_serializes_as_index() {
        let json = serde_json::to_string(&Move::CENTER).unwrap();
        assert_eq!(json, "4");
        assert!(serde_json::from_str::<Move>("9").is_err());
    }
}
