// Ficheiro: src/core/board.rs
// Descrição: Módulo que contém a struct Board e os seus métodos principais.

use super::types::*;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Uma linha vencedora: três índices de casas.
pub type WinLine = [usize; 3];

/// As 8 linhas de três (linhas, colunas, diagonais).
pub const WIN_PATTERNS: [WinLine; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // linhas
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // colunas
    [0, 4, 8], [2, 4, 6],            // diagonais
];

const POW3: [u16; BOARD_CELLS] = [1, 3, 9, 27, 81, 243, 729, 2187, 6561];

/// Chave canónica de uma posição (conteúdo das casas + quem joga).
///
/// Codificação em base 3 das casas, multiplicada por 2, mais um bit para o
/// lado a jogar. É perfeita: posições diferentes nunca colidem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionKey(u16);

// A struct principal do tabuleiro. Copy: 9 bytes, passada por valor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Mark>; BOARD_CELLS],
}

impl Board {
    /// Cria um tabuleiro vazio.
    pub fn new() -> Self {
        Board { cells: [None; BOARD_CELLS] }
    }

    pub fn from_cells(cells: [Option<Mark>; BOARD_CELLS]) -> Self {
        Board { cells }
    }

    /// Constrói a partir de um slice, falhando se o comprimento não for 9.
    pub fn from_slice(cells: &[Option<Mark>]) -> Result<Self, EngineError> {
        let cells: [Option<Mark>; BOARD_CELLS] = cells
            .try_into()
            .map_err(|_| EngineError::InvalidLength(cells.len()))?;
        Ok(Board { cells })
    }

    pub fn cells(&self) -> &[Option<Mark>; BOARD_CELLS] {
        &self.cells
    }

    /// Conteúdo de uma casa; `None` se o índice estiver fora do tabuleiro.
    pub fn get(&self, index: usize) -> Option<Option<Mark>> {
        self.cells.get(index).copied()
    }

    #[inline(always)]
    pub fn is_empty_cell(&self, mv: Move) -> bool {
        self.cells[mv.index()].is_none()
    }

    /// Um lance é legal se o índice está em 0..9 e a casa está vazia.
    pub fn is_legal_move(&self, index: usize) -> bool {
        matches!(self.get(index), Some(None))
    }

    /// Casas vazias em ordem crescente. A ordem define o desempate da busca.
    pub fn legal_moves(&self) -> Vec<Move> {
        Move::all().filter(|&mv| self.is_empty_cell(mv)).collect()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|&&c| c == Some(mark)).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Quem joga a seguir, assumindo jogo legal com o X a começar.
    pub fn side_to_move(&self) -> Mark {
        if self.count(Mark::X) > self.count(Mark::O) {
            Mark::O
        } else {
            Mark::X
        }
    }

    /// Aplica um lance verificado. Usado pelos drivers, nunca pela busca.
    pub fn play(&mut self, index: usize, mark: Mark) -> Result<Move, EngineError> {
        let mv = Move::new(index).ok_or(EngineError::OutOfRange(index))?;
        if !self.is_empty_cell(mv) {
            return Err(EngineError::Occupied(mv));
        }
        self.make_move(mv, mark);
        Ok(mv)
    }

    /// Marca a casa sem verificações (caminho quente da busca).
    #[inline(always)]
    pub(crate) fn make_move(&mut self, mv: Move, mark: Mark) {
        debug_assert!(self.cells[mv.index()].is_none());
        self.cells[mv.index()] = Some(mark);
    }

    /// Desfaz `make_move`.
    #[inline(always)]
    pub(crate) fn unmake_move(&mut self, mv: Move) {
        debug_assert!(self.cells[mv.index()].is_some());
        self.cells[mv.index()] = None;
    }

    /// Primeira linha completa com a mesma marca, se existir.
    pub fn winning_line(&self) -> Option<(Mark, WinLine)> {
        WIN_PATTERNS.iter().find_map(|&line| {
            let [a, b, c] = line;
            match self.cells[a] {
                Some(mark) if self.cells[b] == Some(mark) && self.cells[c] == Some(mark) => Some((mark, line)),
                _ => None,
            }
        })
    }

    pub fn winner(&self) -> Option<Mark> {
        self.winning_line().map(|(mark, _)| mark)
    }

    /// Vencedor primeiro; empate só se não houver vencedor e o tabuleiro estiver cheio.
    pub fn outcome(&self) -> GameOutcome {
        if let Some(mark) = self.winner() {
            GameOutcome::Winner(mark)
        } else if self.is_full() {
            GameOutcome::Draw
        } else {
            GameOutcome::InProgress
        }
    }

    /// Chave da tabela de transposição para (tabuleiro, lado a jogar).
    #[inline(always)]
    pub fn key(&self, side_to_move: Mark) -> PositionKey {
        let mut code: u16 = 0;
        for (cell, pow) in self.cells.iter().zip(POW3.iter()) {
            let digit = match cell {
                None => 0,
                Some(Mark::X) => 1,
                Some(Mark::O) => 2,
            };
            code += digit * pow;
        }
        let side_bit = match side_to_move {
            Mark::X => 0,
            Mark::O => 1,
        };
        PositionKey(code * 2 + side_bit)
    }

    /// Representação em grelha 3x3, com os índices nas casas vazias.
    pub fn to_grid(&self) -> String {
        let mut out = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let idx = row * 3 + col;
                match self.cells[idx] {
                    Some(mark) => out.push(mark.to_char()),
                    None => out.push_str(&idx.to_string()),
                }
                if col < 2 {
                    out.push('|');
                }
            }
            if row < 2 {
                out.push_str("\n-+-+-\n");
            }
        }
        out
    }
}

// Forma compacta: "XX-OO----"
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            match cell {
                Some(mark) => write!(f, "{}", mark)?,
                None => write!(f, "-")?,
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = EngineError;

    /// Aceita 'X', 'O' e '-'/'.'/'_' para casas vazias. Espaços e '/' são ignorados.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = Vec::with_capacity(BOARD_CELLS);
        for ch in s.chars().filter(|c| !c.is_whitespace() && *c != '/' && *c != '|') {
            let cell = match ch {
                '-' | '.' | '_' => None,
                other => match Mark::from_char(other) {
                    Some(mark) => Some(mark),
                    None => return Err(EngineError::InvalidCell(other, cells.len())),
                },
            };
            cells.push(cell);
        }
        Board::from_slice(&cells)
    }
}

/// Estado do jogo após qualquer lance (humano ou motor).
pub fn game_outcome(board: &Board) -> GameOutcome {
    board.outcome()
}

/// Validação de lance para o driver, sem alterar nada.
pub fn is_legal_move(board: &Board, index: usize) -> bool {
    board.is_legal_move(index)
}
