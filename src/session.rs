// Ficheiro: src/session.rs
// Descrição: Driver de um jogo humano contra o motor. Dono da TT e dos dados de aprendizagem.

use crate::core::*;
use crate::error::SessionError;
use crate::search::{Engine, PriorBias, SearchConfig, SearchResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Configuração de uma sessão.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Marca do humano; o motor joga a outra.
    pub human: Mark,
    /// Atraso artificial (ms) antes de o motor jogar. Só apresentação.
    pub thinking_delay: Option<RangeInclusive<u64>>,
    pub search: SearchConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            human: Mark::X,
            thinking_delay: None,
            search: SearchConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    #[serde(rename = "move")]
    pub mv: Move,
    pub mark: Mark,
    /// Tempo de busca do motor; `None` para lances do humano.
    pub think_time: Option<Duration>,
}

/// Dados aprendidos entre jogos. Persistência fica a cargo de quem usa a sessão.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningData {
    pub opening_moves: PriorBias,
    /// Posições finais em que o motor perdeu. Deve ficar sempre vazio.
    pub losing_states: Vec<Board>,
}

pub struct GameSession {
    board: Board,
    human: Mark,
    to_move: Mark,
    outcome: GameOutcome,
    history: Vec<MoveRecord>,
    engine: Engine,
    learning: LearningData,
    thinking_delay: Option<RangeInclusive<u64>>,
    rng: StdRng,
    last_search: Option<SearchResult>,
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Self {
        let search = SearchConfig { maximizer: !config.human, ..config.search };
        GameSession {
            board: Board::new(),
            human: config.human,
            to_move: Mark::X,
            outcome: GameOutcome::InProgress,
            history: Vec::new(),
            engine: Engine::new(search),
            learning: LearningData::default(),
            thinking_delay: config.thinking_delay,
            rng: StdRng::from_entropy(),
            last_search: None,
        }
    }

    /// Começa um jogo novo. O X começa sempre; a TT é limpa.
    #[instrument(skip(self))]
    pub fn new_game(&mut self, human: Mark) {
        self.engine.reset_cache();
        self.engine.set_maximizer(!human);
        self.human = human;
        self.board = Board::new();
        self.to_move = Mark::X;
        self.outcome = GameOutcome::InProgress;
        self.history.clear();
        self.last_search = None;
        info!(%human, engine = %!human, "new game");
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn human_mark(&self) -> Mark {
        self.human
    }

    pub fn engine_mark(&self) -> Mark {
        !self.human
    }

    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn is_engine_turn(&self) -> bool {
        !self.is_over() && self.to_move == self.engine_mark()
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn learning(&self) -> &LearningData {
        &self.learning
    }

    /// Injeta dados de aprendizagem carregados de fora (p.ex. de um ficheiro).
    pub fn set_learning(&mut self, learning: LearningData) {
        self.learning = learning;
    }

    pub fn last_search(&self) -> Option<&SearchResult> {
        self.last_search.as_ref()
    }

    /// Primeira casa livre.
    pub fn hint(&self) -> Option<Move> {
        self.board.legal_moves().first().copied()
    }

    /// Lance do humano. Nada muda se o pedido for rejeitado.
    #[instrument(skip(self))]
    pub fn play_human(&mut self, index: usize) -> Result<GameOutcome, SessionError> {
        if self.is_over() {
            return Err(SessionError::GameOver);
        }
        if self.to_move != self.human {
            return Err(SessionError::NotYourTurn(self.human));
        }
        let mv = self.board.play(index, self.human).map_err(|err| {
            warn!(%err, "rejected human move");
            err
        })?;
        self.history.push(MoveRecord { mv, mark: self.human, think_time: None });
        Ok(self.after_move())
    }

    /// Lance do motor: atraso opcional, busca, aplicação.
    #[instrument(skip(self))]
    pub fn play_engine(&mut self) -> Result<SearchResult, SessionError> {
        if self.is_over() {
            return Err(SessionError::GameOver);
        }
        let engine_mark = self.engine_mark();
        if self.to_move != engine_mark {
            return Err(SessionError::NotYourTurn(engine_mark));
        }

        if let Some(range) = &self.thinking_delay {
            let millis = self.rng.gen_range(range.clone());
            std::thread::sleep(Duration::from_millis(millis));
        }

        let result = self.engine.choose_move(&self.board, &self.learning.opening_moves);
        let mv = result.best_move.ok_or(SessionError::NoMoveAvailable)?;
        self.board.play(mv.index(), engine_mark)?;
        self.history.push(MoveRecord { mv, mark: engine_mark, think_time: Some(result.time_elapsed) });
        info!(%mv, score = result.score, nodes = result.nodes_evaluated, "engine move");

        self.after_move();
        self.last_search = Some(result.clone());
        Ok(result)
    }

    fn after_move(&mut self) -> GameOutcome {
        self.to_move = !self.to_move;
        self.outcome = self.board.outcome();
        if self.outcome.is_terminal() {
            self.finish();
        }
        self.outcome
    }

    /// Fim de jogo: aprende a abertura do motor e regista derrotas.
    fn finish(&mut self) {
        info!(outcome = %self.outcome, moves = self.history.len(), board = %self.board, "game over");

        if self.outcome == GameOutcome::Winner(self.human) {
            warn!(board = %self.board, "engine lost a game");
            self.learning.losing_states.push(self.board);
            return;
        }

        // A resposta do motor a uma abertura do humano não entra no livro de aberturas
        if let Some(first) = self.history.first() {
            if first.mark == self.engine_mark() {
                self.learning.opening_moves.record(first.mv);
            }
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
