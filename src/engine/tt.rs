use crate::core::{PositionKey, Score};
use fxhash::FxHashMap as HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Tipo de entrada na TT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TTFlag {
    Exact,      // Score exato
    LowerBound, // Score >= beta (fail-high)
    UpperBound, // Score <= alpha (fail-low)
}

impl TTFlag {
    /// Troca o sentido do limite ao mudar de perspetiva (negação do score).
    pub fn flip(self) -> TTFlag {
        match self {
            TTFlag::Exact => TTFlag::Exact,
            TTFlag::LowerBound => TTFlag::UpperBound,
            TTFlag::UpperBound => TTFlag::LowerBound,
        }
    }

    /// Classifica o resultado de um nó pela janela com que foi pesquisado.
    pub fn classify(score: Score, alpha: Score, beta: Score) -> TTFlag {
        if score <= alpha {
            TTFlag::UpperBound
        } else if score >= beta {
            TTFlag::LowerBound
        } else {
            TTFlag::Exact
        }
    }
}

/// Entry da TT. O score é guardado do ponto de vista de quem joga no nó e
/// relativo ao próprio nó (distância até ao fim), para não depender da raiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub score: Score,
    pub flag: TTFlag,
}

/// Ajusta score de vitória/derrota para armazenar na TT
pub fn score_to_tt(score: Score, ply: u8) -> Score {
    if score > 0 {
        score + ply as Score
    } else if score < 0 {
        score - ply as Score
    } else {
        score
    }
}

/// Ajusta score de vitória/derrota ao recuperar da TT
pub fn score_from_tt(score: Score, ply: u8) -> Score {
    if score > 0 {
        score - ply as Score
    } else if score < 0 {
        score + ply as Score
    } else {
        score
    }
}

impl TTEntry {
    /// Constrói a entrada a partir de um score minimax (perspetiva do maximizador).
    pub fn from_search(score: Score, ply: u8, maximizing: bool, flag: TTFlag) -> Self {
        let relative = score_to_tt(score, ply);
        if maximizing {
            TTEntry { score: relative, flag }
        } else {
            TTEntry { score: -relative, flag: flag.flip() }
        }
    }

    /// Inverso de `from_search`: devolve (score, flag) na perspetiva do maximizador.
    pub fn to_search(self, ply: u8, maximizing: bool) -> (Score, TTFlag) {
        let (score, flag) = if maximizing {
            (self.score, self.flag)
        } else {
            (-self.score, self.flag.flip())
        };
        (score_from_tt(score, ply), flag)
    }
}

/// Interface mínima que a busca precisa de uma cache de transposição.
pub trait ScoreCache {
    fn probe(&mut self, key: PositionKey) -> Option<TTEntry>;
    fn store(&mut self, key: PositionKey, entry: TTEntry);
}

/// Transposition Table para o tabuleiro 3x3 com FxHash.
///
/// Entradas exatas nunca são substituídas: para uma chave o valor da
/// posição é único. Limites podem ser promovidos a exato.
#[derive(Debug)]
pub struct TranspositionTable {
    table: HashMap<PositionKey, TTEntry>,
    hits: u64,
    misses: u64,
}

impl TranspositionTable {
    pub fn new() -> Self {
        // 3^9 * 2 chaves possíveis, mas só ~5.5k posições alcançáveis
        Self::with_capacity(8192)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        TranspositionTable {
            table: HashMap::with_capacity_and_hasher(capacity, Default::default()),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&self, key: PositionKey) -> Option<TTEntry> {
        self.table.get(&key).copied()
    }

    /// Limpa toda a TT (novo jogo)
    pub fn clear(&mut self) {
        debug!(entries = self.table.len(), hits = self.hits, misses = self.misses, "clearing transposition table");
        self.table.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 { 0.0 }
        else { self.hits as f64 / (self.hits + self.misses) as f64 }
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreCache for TranspositionTable {
    fn probe(&mut self, key: PositionKey) -> Option<TTEntry> {
        match self.table.get(&key) {
            Some(&entry) => {
                self.hits += 1;
                Some(entry)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    fn store(&mut self, key: PositionKey, entry: TTEntry) {
        match self.table.get(&key) {
            Some(existing) if existing.flag == TTFlag::Exact => {}
            _ => {
                self.table.insert(key, entry);
            }
        }
    }

}

/// TT partilhada entre threads da busca paralela na raiz.
pub struct SharedTranspositionTable {
    inner: Mutex<TranspositionTable>,
}

impl SharedTranspositionTable {
    pub fn new(table: TranspositionTable) -> Self {
        SharedTranspositionTable { inner: Mutex::new(table) }
    }

    /// Handle por thread; cada acesso bloqueia o mutex só durante a operação.
    pub fn handle(&self) -> SharedCacheHandle<'_> {
        SharedCacheHandle { inner: &self.inner }
    }

    pub fn into_inner(self) -> TranspositionTable {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct SharedCacheHandle<'a> {
    inner: &'a Mutex<TranspositionTable>,
}

impl ScoreCache for SharedCacheHandle<'_> {
    fn probe(&mut self, key: PositionKey) -> Option<TTEntry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).probe(key)
    }

    fn store(&mut self, key: PositionKey, entry: TTEntry) {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).store(key, entry)
    }
}
