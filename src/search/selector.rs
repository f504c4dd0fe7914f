use crate::core::*;
use crate::engine::{SharedTranspositionTable, TranspositionTable};
use super::alpha_beta::AlphaBetaSearcher;
use super::config::SearchConfig;
use super::evaluation::{terminal_score, INF};
use super::opening::{choose_opening, OpeningSource, PriorBias};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Score de um lance da raiz (diagnóstico).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveScore {
    #[serde(rename = "move")]
    pub mv: Move,
    pub score: Score,
}

/// Como o lance foi escolhido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// Posição terminal ou sem casas livres: nenhum lance.
    NoMove,
    /// Tabuleiro vazio: atalho de abertura, sem busca.
    Opening(OpeningSource),
    /// Busca completa em todos os lances da raiz.
    Search,
}

/// Resultado da escolha de lance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: Score,
    /// Todos os lances da raiz, por score decrescente.
    pub evaluated_moves: Vec<MoveScore>,
    pub depth: u8,
    /// Entradas residentes na TT após a busca (aproximação do trabalho feito).
    pub nodes_evaluated: usize,
    pub nodes_searched: u64,
    pub time_elapsed: Duration,
    pub selection: Selection,
}

impl SearchResult {
    fn no_move(score: Score, nodes_evaluated: usize, started: Instant) -> Self {
        SearchResult {
            best_move: None,
            score,
            evaluated_moves: Vec::new(),
            depth: 0,
            nodes_evaluated,
            nodes_searched: 0,
            time_elapsed: started.elapsed(),
            selection: Selection::NoMove,
        }
    }

    fn opening(mv: Move, source: OpeningSource, started: Instant) -> Self {
        SearchResult {
            best_move: Some(mv),
            score: 0,
            evaluated_moves: vec![MoveScore { mv, score: 0 }],
            depth: 0,
            nodes_evaluated: 1,
            nodes_searched: 1,
            time_elapsed: started.elapsed(),
            selection: Selection::Opening(source),
        }
    }
}

/// Escolhe o lance com a configuração padrão.
pub fn choose_move(board: &Board, maximizer: Mark, bias: &PriorBias, cache: &mut TranspositionTable) -> SearchResult {
    let config = SearchConfig { maximizer, ..SearchConfig::default() };
    select_move(board, &config, bias, cache)
}

/// Escolhe o melhor lance para `config.maximizer` em `board`.
///
/// O tabuleiro do chamador nunca é alterado: a busca trabalha numa cópia.
/// Com `parallel_root` os lances da raiz correm no pool rayon atual.
#[instrument(level = "debug", skip(config, bias, cache), fields(board = %board, maximizer = %config.maximizer))]
pub fn select_move(board: &Board, config: &SearchConfig, bias: &PriorBias, cache: &mut TranspositionTable) -> SearchResult {
    let started = Instant::now();
    let maximizer = config.maximizer;

    if let Some(score) = terminal_score(board, 0, maximizer) {
        debug!(outcome = %board.outcome(), "position already decided");
        return SearchResult::no_move(score, cache.len(), started);
    }

    let moves = board.legal_moves();
    if moves.is_empty() {
        return SearchResult::no_move(0, cache.len(), started);
    }

    // Primeiro lance do jogo: atalho de abertura
    if config.opening_shortcut && moves.len() == BOARD_CELLS {
        if let Some((mv, source)) = choose_opening(board, bias) {
            debug!(%mv, ?source, "opening move");
            return SearchResult::opening(mv, source, started);
        }
    }

    let (mut evaluated, nodes_searched) = if config.parallel_root && moves.len() > 1 {
        score_root_parallel(board, maximizer, &moves, cache)
    } else {
        score_root_sequential(board, maximizer, &moves, cache)
    };

    // Primeiro lance com score estritamente maior ganha (ordem crescente)
    let mut best_move = None;
    let mut best_score = -INF;
    for entry in &evaluated {
        if entry.score > best_score {
            best_score = entry.score;
            best_move = Some(entry.mv);
        }
    }

    // Só para apresentação; sort estável mantém a ordem crescente nos empates
    evaluated.sort_by(|a, b| b.score.cmp(&a.score));

    let result = SearchResult {
        best_move,
        score: best_score,
        evaluated_moves: evaluated,
        depth: moves.len() as u8,
        nodes_evaluated: cache.len(),
        nodes_searched,
        time_elapsed: started.elapsed(),
        selection: Selection::Search,
    };

    debug!(
        best_move = ?result.best_move,
        score = result.score,
        nodes = result.nodes_searched,
        tt_size = result.nodes_evaluated,
        hit_rate = cache.hit_rate(),
        elapsed_us = result.time_elapsed.as_micros() as u64,
        "search finished"
    );

    result
}

fn score_root_sequential(board: &Board, maximizer: Mark, moves: &[Move], cache: &mut TranspositionTable) -> (Vec<MoveScore>, u64) {
    let mut work = *board;
    let mut searcher = AlphaBetaSearcher::new(cache, maximizer);
    let mut evaluated = Vec::with_capacity(moves.len());

    for &mv in moves {
        work.make_move(mv, maximizer);
        let score = searcher.evaluate_root(&mut work, false);
        work.unmake_move(mv);
        evaluated.push(MoveScore { mv, score });
    }

    (evaluated, searcher.nodes_searched())
}

/// Cada worker tem a sua cópia do tabuleiro; a TT passa a ser partilhada
/// durante a busca e volta ao chamador no fim.
fn score_root_parallel(board: &Board, maximizer: Mark, moves: &[Move], cache: &mut TranspositionTable) -> (Vec<MoveScore>, u64) {
    let shared = SharedTranspositionTable::new(std::mem::take(cache));

    let results: Vec<(MoveScore, u64)> = moves
        .par_iter()
        .map(|&mv| {
            let mut local = *board;
            local.make_move(mv, maximizer);
            let mut handle = shared.handle();
            let mut searcher = AlphaBetaSearcher::new(&mut handle, maximizer);
            let score = searcher.evaluate_root(&mut local, false);
            (MoveScore { mv, score }, searcher.nodes_searched())
        })
        .collect();

    *cache = shared.into_inner();

    let nodes = results.iter().map(|(_, n)| n).sum::<u64>();
    (results.into_iter().map(|(entry, _)| entry).collect(), nodes)
}

/// Motor com configuração, TT e (opcionalmente) pool de threads próprios.
///
/// A TT vive enquanto o motor viver; o driver chama `reset_cache` a cada jogo novo.
pub struct Engine {
    config: SearchConfig,
    tt: TranspositionTable,
    pool: Option<rayon::ThreadPool>,
}

impl Engine {
    pub fn new(config: SearchConfig) -> Self {
        let pool = if config.parallel_root {
            match rayon::ThreadPoolBuilder::new().num_threads(config.threads.max(1)).build() {
                Ok(pool) => Some(pool),
                Err(err) => {
                    warn!(%err, "could not build search thread pool, using the global one");
                    None
                }
            }
        } else {
            None
        };

        Engine {
            tt: TranspositionTable::with_capacity(config.cache_capacity),
            config,
            pool,
        }
    }

    /// Muda a marca maximizadora. A TT é limpa porque os scores dependem dela.
    pub fn set_maximizer(&mut self, maximizer: Mark) {
        if self.config.maximizer != maximizer {
            self.config.maximizer = maximizer;
            self.tt.clear();
        }
    }

    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    pub fn cache_size(&self) -> usize {
        self.tt.len()
    }

    pub fn reset_cache(&mut self) {
        self.tt.clear();
    }

    pub fn choose_move(&mut self, board: &Board, bias: &PriorBias) -> SearchResult {
        let Engine { config, tt, pool } = self;
        match pool {
            Some(pool) => pool.install(|| select_move(board, config, bias, tt)),
            None => select_move(board, config, bias, tt),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}
