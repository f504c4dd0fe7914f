// Atalho de abertura: no tabuleiro vazio não vale a pena fazer a busca completa.

use crate::core::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordem de preferência fixa para o primeiro lance: centro, depois cantos.
pub const OPENING_PREFERENCE: [Move; 5] = [
    Move::CENTER,
    Move::CORNERS[0],
    Move::CORNERS[1],
    Move::CORNERS[2],
    Move::CORNERS[3],
];

/// Pesos de preferência por lance de abertura, aprendidos de jogos anteriores.
///
/// Vazio por omissão; um `PriorBias` vazio equivale a não ter dados.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorBias {
    weights: BTreeMap<Move, u32>,
}

/// De onde veio o lance de abertura escolhido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpeningSource {
    Bias,
    Preference,
}

impl PriorBias {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: impl IntoIterator<Item = (Move, u32)>) -> Self {
        let mut bias = PriorBias::new();
        for (mv, weight) in weights {
            bias.add(mv, weight);
        }
        bias
    }

    pub fn add(&mut self, mv: Move, weight: u32) {
        if weight > 0 {
            *self.weights.entry(mv).or_insert(0) += weight;
        }
    }

    /// Regista mais uma abertura favorável.
    pub fn record(&mut self, mv: Move) {
        self.add(mv, 1);
    }

    pub fn weight(&self, mv: Move) -> u32 {
        self.weights.get(&mv).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Move, u32)> + '_ {
        self.weights.iter().map(|(&mv, &w)| (mv, w))
    }

    /// Lance com maior peso entre os legais; empate → menor índice.
    pub fn preferred(&self, board: &Board) -> Option<Move> {
        let mut best: Option<(Move, u32)> = None;
        for (mv, weight) in self.iter() {
            if !board.is_empty_cell(mv) {
                continue;
            }
            if best.map_or(true, |(_, w)| weight > w) {
                best = Some((mv, weight));
            }
        }
        best.map(|(mv, _)| mv)
    }
}

/// Escolhe o lance de abertura: o preferido do `bias`, senão a ordem fixa.
pub fn choose_opening(board: &Board, bias: &PriorBias) -> Option<(Move, OpeningSource)> {
    if let Some(mv) = bias.preferred(board) {
        return Some((mv, OpeningSource::Bias));
    }
    OPENING_PREFERENCE
        .iter()
        .copied()
        .find(|&mv| board.is_empty_cell(mv))
        .map(|mv| (mv, OpeningSource::Preference))
}
