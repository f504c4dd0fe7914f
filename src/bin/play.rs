// Interface de linha de comandos para jogar contra o motor Velha

use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;
use velha::session::{GameSession, SessionConfig};
use velha::{GameOutcome, Mark};

/// Joga contra o motor pela entrada padrão
#[derive(Parser, Debug)]
#[command(name = "velha_play")]
#[command(version)]
struct Args {
    /// Marca do humano (X começa sempre)
    #[arg(long, default_value = "X")]
    human: Mark,

    /// Atraso artificial do motor em ms, p.ex. 200..=800
    #[arg(long, value_parser = parse_delay)]
    delay: Option<(u64, u64)>,
}

fn parse_delay(s: &str) -> Result<(u64, u64), String> {
    let (lo, hi) = match s.split_once("..=").or_else(|| s.split_once("..")) {
        Some((lo, hi)) => (lo, hi),
        None => (s, s),
    };
    let lo: u64 = lo.trim().parse().map_err(|_| format!("invalid delay {:?}", s))?;
    let hi: u64 = hi.trim().parse().map_err(|_| format!("invalid delay {:?}", s))?;
    if lo > hi {
        return Err(format!("empty delay range {:?}", s));
    }
    Ok((lo, hi))
}

struct PlayLoop {
    session: GameSession,
}

impl PlayLoop {
    fn new(args: Args) -> Self {
        let config = SessionConfig {
            human: args.human,
            thinking_delay: args.delay.map(|(lo, hi)| lo..=hi),
            ..SessionConfig::default()
        };
        PlayLoop { session: GameSession::new(config) }
    }

    fn run(&mut self) -> Result<()> {
        self.print_board();
        self.engine_turn();

        let stdin = io::stdin();
        prompt()?;
        for line in stdin.lock().lines() {
            let input = line?;
            let parts: Vec<&str> = input.split_whitespace().collect();

            if parts.is_empty() {
                prompt()?;
                continue;
            }

            match parts[0] {
                "new" => self.handle_new_game(&parts),
                "move" | "m" => self.handle_move(&parts),
                "go" => self.engine_turn(),
                "board" => self.print_board(),
                "hint" => self.handle_hint(),
                "help" => print_help(),
                "quit" | "exit" => break,
                other => match other.parse::<usize>() {
                    Ok(index) => self.play(index),
                    Err(_) => println!("Comando desconhecido: {} (help para ajuda)", other),
                },
            }
            prompt()?;
        }
        Ok(())
    }

    fn handle_new_game(&mut self, parts: &[&str]) {
        let human = match parts.get(1) {
            Some(s) => match s.parse::<Mark>() {
                Ok(mark) => mark,
                Err(e) => {
                    println!("{}", e);
                    return;
                }
            },
            None => self.session.human_mark(),
        };
        self.session.new_game(human);
        println!("Novo jogo: humano {} / motor {}", human, !human);
        self.print_board();
        self.engine_turn();
    }

    fn handle_move(&mut self, parts: &[&str]) {
        match parts.get(1).map(|s| s.parse::<usize>()) {
            Some(Ok(index)) => self.play(index),
            _ => println!("Uso: move <0-8>"),
        }
    }

    fn play(&mut self, index: usize) {
        match self.session.play_human(index) {
            Ok(outcome) => {
                self.print_board();
                if outcome.is_terminal() {
                    self.announce(outcome);
                } else {
                    self.engine_turn();
                }
            }
            Err(e) => println!("Lance recusado: {}", e),
        }
    }

    fn engine_turn(&mut self) {
        if !self.session.is_engine_turn() {
            return;
        }
        match self.session.play_engine() {
            Ok(result) => {
                if let Some(mv) = result.best_move {
                    println!(
                        "Motor joga {} (score {}, {} nós, {:.2}ms)",
                        mv,
                        result.score,
                        result.nodes_evaluated,
                        result.time_elapsed.as_secs_f64() * 1000.0
                    );
                }
                self.print_board();
                if self.session.is_over() {
                    self.announce(self.session.outcome());
                }
            }
            Err(e) => println!("Erro do motor: {}", e),
        }
    }

    fn handle_hint(&self) {
        match self.session.hint() {
            Some(mv) => println!("Sugestão: {}", mv),
            None => println!("Sem casas livres"),
        }
    }

    fn announce(&self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Winner(mark) if mark == self.session.human_mark() => println!("Ganhaste!"),
            GameOutcome::Winner(_) => println!("O motor ganhou."),
            GameOutcome::Draw => println!("Empate."),
            GameOutcome::InProgress => {}
        }
        println!("(new [x|o] para jogar outra vez)");
    }

    fn print_board(&self) {
        println!("\n{}\n", self.session.board().to_grid());
    }
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

fn print_help() {
    println!("Comandos:");
    println!("  new [x|o]   novo jogo (opcionalmente muda a marca do humano)");
    println!("  move N      joga na casa N (0-8); basta escrever N");
    println!("  go          o motor joga, se for a vez dele");
    println!("  board       mostra o tabuleiro");
    println!("  hint        primeira casa livre");
    println!("  quit        sai");
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let mut play = PlayLoop::new(Args::parse());
    play.run()
}
