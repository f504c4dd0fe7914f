use crate::core::*;
use crate::engine::{ScoreCache, TTEntry, TTFlag};
use super::evaluation::{terminal_score, INF};

/// Minimax com poda alpha-beta e TT.
///
/// O maximizador é uma marca fixa; `maximizing` indica se é ele a jogar no nó.
/// O tabuleiro é alterado no lugar (make/unmake) e devolvido intacto.
pub struct AlphaBetaSearcher<'c, C: ScoreCache> {
    cache: &'c mut C,
    maximizer: Mark,
    nodes_searched: u64,
}

impl<'c, C: ScoreCache> AlphaBetaSearcher<'c, C> {
    pub fn new(cache: &'c mut C, maximizer: Mark) -> Self {
        AlphaBetaSearcher {
            cache,
            maximizer,
            nodes_searched: 0,
        }
    }

    /// Nós visitados (inclui os resolvidos pela TT).
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// Avalia `board` com janela completa. Atalho para a raiz de uma busca.
    pub fn evaluate_root(&mut self, board: &mut Board, maximizing: bool) -> Score {
        self.evaluate(board, 0, maximizing, -INF, INF)
    }

    pub fn evaluate(&mut self, board: &mut Board, ply: Depth, maximizing: bool, mut alpha: Score, mut beta: Score) -> Score {
        self.nodes_searched += 1;

        let mover = if maximizing { self.maximizer } else { !self.maximizer };
        let key = board.key(mover);

        // ========== TT PROBE ==========
        if let Some(entry) = self.cache.probe(key) {
            let (score, flag) = entry.to_search(ply, maximizing);
            match flag {
                TTFlag::Exact => return score,
                TTFlag::LowerBound if score >= beta => return score,
                TTFlag::UpperBound if score <= alpha => return score,
                _ => {}
            }
        }

        if let Some(score) = terminal_score(board, ply, self.maximizer) {
            self.cache.store(key, TTEntry::from_search(score, ply, maximizing, TTFlag::Exact));
            return score;
        }

        let original_alpha = alpha;
        let original_beta = beta;
        let mut best = if maximizing { -INF } else { INF };

        for mv in board.legal_moves() {
            board.make_move(mv, mover);
            let score = self.evaluate(board, ply + 1, !maximizing, alpha, beta);
            board.unmake_move(mv);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }

            if beta <= alpha {
                break; // cutoff
            }
        }

        // ========== TT STORE ==========
        let flag = TTFlag::classify(best, original_alpha, original_beta);
        self.cache.store(key, TTEntry::from_search(best, ply, maximizing, flag));

        best
    }
}
