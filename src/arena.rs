// Arena de auto-jogo: verifica em massa que o motor nunca perde.

use crate::core::*;
use crate::error::ArenaError;
use crate::search::{Engine, PriorBias, SearchConfig};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Adversário do motor na arena.
pub trait Opponent: Send {
    fn name(&self) -> &'static str;

    fn pick(&mut self, board: &Board, mark: Mark) -> Option<Move>;

    fn new_game(&mut self) {}
}

/// Joga uma casa livre ao acaso.
pub struct RandomOpponent {
    rng: StdRng,
}

impl RandomOpponent {
    pub fn new(seed: u64) -> Self {
        RandomOpponent { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Opponent for RandomOpponent {
    fn name(&self) -> &'static str {
        "random"
    }

    fn pick(&mut self, board: &Board, _mark: Mark) -> Option<Move> {
        board.legal_moves().choose(&mut self.rng).copied()
    }
}

/// Joga sempre a primeira casa livre.
pub struct FirstAvailable;

impl Opponent for FirstAvailable {
    fn name(&self) -> &'static str {
        "first"
    }

    fn pick(&mut self, board: &Board, _mark: Mark) -> Option<Move> {
        board.legal_moves().first().copied()
    }
}

/// Outro motor perfeito (todos os jogos devem dar empate).
pub struct EngineOpponent {
    engine: Engine,
}

impl EngineOpponent {
    pub fn new() -> Self {
        EngineOpponent { engine: Engine::default() }
    }
}

impl Default for EngineOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Opponent for EngineOpponent {
    fn name(&self) -> &'static str {
        "engine"
    }

    fn pick(&mut self, board: &Board, mark: Mark) -> Option<Move> {
        self.engine.set_maximizer(mark);
        self.engine.choose_move(board, &PriorBias::default()).best_move
    }

    fn new_game(&mut self) {
        self.engine.reset_cache();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpponentKind {
    Random,
    First,
    Engine,
}

impl OpponentKind {
    pub fn build(self, seed: u64) -> Box<dyn Opponent> {
        match self {
            OpponentKind::Random => Box::new(RandomOpponent::new(seed)),
            OpponentKind::First => Box::new(FirstAvailable),
            OpponentKind::Engine => Box::new(EngineOpponent::new()),
        }
    }
}

impl FromStr for OpponentKind {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(OpponentKind::Random),
            "first" => Ok(OpponentKind::First),
            "engine" => Ok(OpponentKind::Engine),
            _ => Err(ArenaError::UnknownOpponent(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArenaConfig {
    pub games: usize,
    pub workers: usize,
    pub opponent: OpponentKind,
    pub seed: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            games: 100,
            workers: num_cpus::get().max(1),
            opponent: OpponentKind::Random,
            seed: 0x5eed,
        }
    }
}

/// Um jogo completo da arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub engine_mark: Mark,
    pub outcome: GameOutcome,
    pub moves: Vec<Move>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaReport {
    pub games: usize,
    pub engine_wins: usize,
    pub opponent_wins: usize,
    pub draws: usize,
    /// Sequências de lances dos jogos perdidos pelo motor.
    pub lost_games: Vec<Vec<Move>>,
}

impl ArenaReport {
    pub fn record(&mut self, game: GameRecord) {
        self.games += 1;
        match game.outcome {
            GameOutcome::Winner(mark) if mark == game.engine_mark => self.engine_wins += 1,
            GameOutcome::Winner(_) => {
                self.opponent_wins += 1;
                self.lost_games.push(game.moves);
            }
            _ => self.draws += 1,
        }
    }

    pub fn engine_unbeaten(&self) -> bool {
        self.opponent_wins == 0
    }
}

/// Joga um jogo do motor contra `opponent`. O X começa sempre.
pub fn play_game(engine: &mut Engine, opponent: &mut dyn Opponent, engine_mark: Mark) -> GameRecord {
    engine.reset_cache();
    engine.set_maximizer(engine_mark);
    opponent.new_game();

    let bias = PriorBias::default();
    let mut board = Board::new();
    let mut to_move = Mark::X;
    let mut moves = Vec::with_capacity(BOARD_CELLS);

    while !board.outcome().is_terminal() {
        let picked = if to_move == engine_mark {
            engine.choose_move(&board, &bias).best_move
        } else {
            opponent.pick(&board, to_move)
        };
        let Some(mv) = picked else { break };
        if let Err(err) = board.play(mv.index(), to_move) {
            warn!(%err, player = %to_move, "arena player returned an illegal move");
            break;
        }
        moves.push(mv);
        to_move = !to_move;
    }

    GameRecord { engine_mark, outcome: board.outcome(), moves }
}

/// Distribui os jogos por `workers` threads; o motor alterna entre X e O.
pub fn run_arena(config: &ArenaConfig) -> Result<ArenaReport, ArenaError> {
    let workers = config.workers.clamp(1, config.games.max(1));
    let (tx, rx) = crossbeam::channel::unbounded::<GameRecord>();

    info!(games = config.games, workers, opponent = ?config.opponent, "starting arena");

    let report = crossbeam::scope(|s| {
        for worker in 0..workers {
            let tx = tx.clone();
            s.spawn(move |_| {
                let mut engine = Engine::new(SearchConfig::default());
                let mut opponent = config.opponent.build(config.seed.wrapping_add(worker as u64));
                for game in (worker..config.games).step_by(workers) {
                    let engine_mark = if game % 2 == 0 { Mark::X } else { Mark::O };
                    let record = play_game(&mut engine, opponent.as_mut(), engine_mark);
                    debug!(worker, game, outcome = %record.outcome, "arena game finished");
                    if tx.send(record).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        let mut report = ArenaReport::default();
        for record in rx.iter() {
            report.record(record);
        }
        report
    })
    .map_err(|_| ArenaError::WorkerPanicked)?;

    info!(
        games = report.games,
        engine_wins = report.engine_wins,
        opponent_wins = report.opponent_wins,
        draws = report.draws,
        "arena finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_never_loses_to_random_play() {
        let config = ArenaConfig { games: 40, workers: 4, opponent: OpponentKind::Random, seed: 7 };
        let report = run_arena(&config).unwrap();
        assert_eq!(report.games, 40);
        assert!(report.engine_unbeaten(), "lost: {:?}", report.lost_games);
        assert_eq!(report.engine_wins + report.draws, 40);
    }

    #[test]
    fn engine_beats_first_available() {
        let mut engine = Engine::default();
        let record = play_game(&mut engine, &mut FirstAvailable, Mark::X);
        assert_eq!(record.outcome, GameOutcome::Winner(Mark::X));
        assert_eq!(record.moves[0], Move::CENTER);
    }

    #[test]
    fn engine_vs_engine_is_always_a_draw() {
        let config = ArenaConfig { games: 4, workers: 2, opponent: OpponentKind::Engine, seed: 0 };
        let report = run_arena(&config).unwrap();
        assert_eq!(report.draws, 4);
    }

    #[test]
    fn opponent_kind_parsing() {
        assert_eq!("Random".parse::<OpponentKind>().unwrap(), OpponentKind::Random);
        assert!("minimax".parse::<OpponentKind>().is_err());
    }
}
