// Velha - análise de posições e arena de auto-jogo

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use velha::arena::{run_arena, ArenaConfig, OpponentKind};
use velha::search::{Engine, PriorBias, SearchConfig, SearchResult};
use velha::{Board, Mark};

/// Motor de jogo da velha com jogo perfeito
#[derive(Parser, Debug)]
#[command(name = "velha")]
#[command(about = "Perfect-play tic-tac-toe engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Escolhe o melhor lance para uma posição
    Analyze {
        /// Tabuleiro em forma compacta, p.ex. "XX-OO----"
        #[arg(short, long)]
        board: String,

        /// Marca a maximizar (por omissão, quem joga a seguir)
        #[arg(short, long)]
        maximizer: Option<Mark>,

        /// Avalia os lances da raiz em paralelo
        #[arg(long)]
        parallel: bool,

        /// Threads da busca paralela
        #[arg(long)]
        threads: Option<usize>,

        /// Busca completa mesmo no tabuleiro vazio
        #[arg(long)]
        no_opening: bool,

        /// Saída em JSON
        #[arg(long)]
        json: bool,
    },

    /// Joga o motor contra um adversário, em várias threads
    Arena {
        #[arg(short, long, default_value = "100")]
        games: usize,

        #[arg(short, long)]
        workers: Option<usize>,

        /// random, first ou engine
        #[arg(short, long, default_value = "random")]
        opponent: OpponentKind,

        #[arg(long, default_value = "24301")]
        seed: u64,

        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze { board, maximizer, parallel, threads, no_opening, json } => {
            analyze(&board, maximizer, parallel, threads, no_opening, json)
        }
        Command::Arena { games, workers, opponent, seed, json } => arena(games, workers, opponent, seed, json),
    }
}

fn analyze(
    board: &str,
    maximizer: Option<Mark>,
    parallel: bool,
    threads: Option<usize>,
    no_opening: bool,
    json: bool,
) -> Result<()> {
    let board: Board = board.parse().with_context(|| format!("invalid board {:?}", board))?;
    let mut config = SearchConfig {
        maximizer: maximizer.unwrap_or_else(|| board.side_to_move()),
        opening_shortcut: !no_opening,
        parallel_root: parallel,
        ..SearchConfig::default()
    };
    if let Some(threads) = threads {
        config.threads = threads.max(1);
    }

    info!(board = %board, maximizer = %config.maximizer, "analyzing position");
    let mut engine = Engine::new(config);
    let result = engine.choose_move(&board, &PriorBias::default());

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_analysis(&board, &result, engine.tt().hit_rate());
    }
    Ok(())
}

fn print_analysis(board: &Board, result: &SearchResult, hit_rate: f64) {
    println!("{}\n", board.to_grid());
    println!("Estado: {}", board.outcome());
    match result.best_move {
        Some(mv) => println!("Melhor lance: {} ({})", mv, mv.name()),
        None => println!("Melhor lance: nenhum"),
    }
    println!("Score: {}", result.score);
    println!("Profundidade: {}", result.depth);
    println!("Nós na TT: {}", result.nodes_evaluated);
    println!("Nós visitados: {}", result.nodes_searched);
    println!("Acertos na TT: {:.1}%", hit_rate * 100.0);
    println!("Tempo: {:.2}ms", result.time_elapsed.as_secs_f64() * 1000.0);

    if !result.evaluated_moves.is_empty() {
        println!("\nLances avaliados:");
        for entry in &result.evaluated_moves {
            println!("   {} -> {}", entry.mv, entry.score);
        }
    }
}

fn arena(games: usize, workers: Option<usize>, opponent: OpponentKind, seed: u64, json: bool) -> Result<()> {
    let defaults = ArenaConfig::default();
    let config = ArenaConfig {
        games,
        workers: workers.unwrap_or(defaults.workers),
        opponent,
        seed,
    };
    let report = run_arena(&config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Jogos: {}", report.games);
        println!("Vitórias do motor: {}", report.engine_wins);
        println!("Empates: {}", report.draws);
        println!("Derrotas do motor: {}", report.opponent_wins);
        for moves in &report.lost_games {
            let line: Vec<String> = moves.iter().map(|mv| mv.to_string()).collect();
            println!("   perdido: {}", line.join(" "));
        }
    }

    if !report.engine_unbeaten() {
        bail!("engine lost {} game(s)", report.opponent_wins);
    }
    Ok(())
}
