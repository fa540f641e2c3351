// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for playing, watching and batching matches
// ═══════════════════════════════════════════════════════════════════════

mod config;
mod human;

use clap::{Parser, Subcommand};
use config::{ConfigError, RunnerConfig};
use conquest_agents::{make_policy, AgentKind};
use conquest_engine::engine::{advance, decide_and_apply};
use conquest_engine::setup::create_match;
use conquest_engine::{map, render, EngineError, MatchEvent, MatchState, PlayerId, Policy};
use conquest_tournament::{batch_seeds, run_batch, run_match};
use human::HumanPolicy;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "conquest", about = "Two-player territory conquest")]
struct Cli {
    /// TOML file with [match] and [agents] tables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play as Player 1 against a computer opponent
    Play {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        /// Opponent: "random", "heuristic" or "passive"
        #[arg(short, long, default_value = "random")]
        opponent: AgentKind,
        /// Colored board
        #[arg(long)]
        color: bool,
    },
    /// Watch two computer players
    Watch {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value = "heuristic")]
        p1: AgentKind,
        #[arg(long, default_value = "random")]
        p2: AgentKind,
        /// Print the match result (with event log) as JSON
        #[arg(long)]
        json: bool,
        #[arg(long)]
        color: bool,
    },
    /// Run a batch of matches across seeds
    Batch {
        #[arg(short, long, default_value_t = 100)]
        games: u32,
        /// First seed; later matches step by 1000
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value = "heuristic")]
        p1: AgentKind,
        #[arg(long, default_value = "random")]
        p2: AgentKind,
        #[arg(long)]
        json: bool,
    },
    /// Print a generated map and whether it validates
    Map {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(long)]
        color: bool,
    },
}

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), RunError> {
    let config = match &cli.config {
        Some(path) => RunnerConfig::load(path)?,
        None => RunnerConfig::default(),
    };
    tracing::debug!(config = ?config, "configuration loaded");

    match cli.command {
        Commands::Play { seed, opponent, color } => cmd_play(&config, seed, opponent, color),
        Commands::Watch { seed, p1, p2, json, color } => cmd_watch(&config, seed, p1, p2, json, color),
        Commands::Batch { games, seed, p1, p2, json } => cmd_batch(&config, games, seed, p1, p2, json),
        Commands::Map { seed, color } => {
            cmd_map(seed, color);
            Ok(())
        }
    }
}

fn cmd_play(config: &RunnerConfig, seed: u64, opponent: AgentKind, color: bool) -> Result<(), RunError> {
    println!("=== Conquest ===\n");
    println!("You are Player 1. Opponent: {} (seed={})", opponent, seed);

    let mut human = HumanPolicy::stdio(color);
    let mut cpu = make_policy(opponent, &config.agents);
    let state = create_match(seed, config.match_config);
    print_board(&state, color);
    let state = narrate(state, &mut human, &mut *cpu, &mut io::stdout())?;
    print_final(&state, color);
    Ok(())
}

fn cmd_watch(config: &RunnerConfig, seed: u64, p1: AgentKind, p2: AgentKind, json: bool, color: bool) -> Result<(), RunError> {
    if json {
        let result = run_match(seed, &config.match_config, &config.agents, p1, p2)?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("=== {} vs {} (seed={}) ===", p1, p2, seed);
    let mut first = make_policy(p1, &config.agents);
    let mut second = make_policy(p2, &config.agents);
    let state = create_match(seed, config.match_config);
    print_board(&state, color);
    let state = narrate(state, &mut *first, &mut *second, &mut io::stdout())?;
    print_final(&state, color);
    Ok(())
}

/// Play decision by decision, writing each event as soon as it happens.
/// A turn header goes out before the first event or prompt of each turn.
fn narrate<W: Write>(
    mut state: MatchState,
    p1: &mut dyn Policy,
    p2: &mut dyn Policy,
    out: &mut W,
) -> Result<MatchState, RunError> {
    if let Some(defect) = &state.map_defect {
        writeln!(out, "warning: generated map is invalid ({}); playing anyway", defect)?;
    }
    let names = [p1.name().to_string(), p2.name().to_string()];
    let header = |state: &MatchState| {
        let name = match state.current {
            PlayerId::P1 => &names[0],
            PlayerId::P2 => &names[1],
        };
        format!("\n-- Turn {}: {} ({}) --", state.turn, state.current, name)
    };

    advance(&mut state);
    let mut shown = 0;
    let mut new_turn = true;
    loop {
        for event in &state.events[shown..] {
            let line = render::event_line(&state.board, event);
            match event {
                MatchEvent::Finished { .. } => writeln!(out, "{}", line)?,
                MatchEvent::TurnEnded { .. } => {
                    writeln!(out, "  {}", line)?;
                    new_turn = true;
                }
                _ => {
                    if new_turn {
                        writeln!(out, "{}", header(&state))?;
                        new_turn = false;
                    }
                    writeln!(out, "  {}", line)?;
                }
            }
        }
        shown = state.events.len();
        if state.is_over() {
            break;
        }
        if new_turn {
            writeln!(out, "{}", header(&state))?;
            new_turn = false;
        }
        out.flush()?;

        let policy: &mut dyn Policy = match state.current {
            PlayerId::P1 => &mut *p1,
            PlayerId::P2 => &mut *p2,
        };
        decide_and_apply(&mut state, policy)?;
    }
    Ok(state)
}

fn print_board(state: &MatchState, color: bool) {
    if color {
        print!("{}", render::ansi(&state.board, 3));
    } else {
        print!("{}", render::plain(&state.board, true, true, 4));
    }
}

fn print_final(state: &MatchState, color: bool) {
    println!();
    print_board(state, color);
    println!("\nResult: {} after {} turns", state.status, state.turn);
    for &p in &PlayerId::ALL {
        println!(
            "  {}: {} territories, {} armies",
            p,
            state.board.territory_count(p),
            state.board.army_count(p)
        );
    }
}

fn cmd_batch(config: &RunnerConfig, games: u32, seed: u64, p1: AgentKind, p2: AgentKind, json: bool) -> Result<(), RunError> {
    let report = run_batch(&batch_seeds(seed, games), &config.match_config, &config.agents, p1, p2);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let s = &report.summary;
    let pct = |n: usize| if s.games > 0 { n as f64 / s.games as f64 * 100.0 } else { 0.0 };
    println!("=== Batch: {} games, {} vs {} ===\n", s.games, p1, p2);
    println!("  P1 ({:9}): {:>4} wins ({:.1}%)", p1.to_string(), s.p1_wins, pct(s.p1_wins));
    println!("  P2 ({:9}): {:>4} wins ({:.1}%)", p2.to_string(), s.p2_wins, pct(s.p2_wins));
    println!("  Draws          : {:>4}      ({:.1}%)", s.draws, pct(s.draws));
    println!("  Errors         : {:>4}", s.errors);
    println!("  Average turns  : {:.1}", s.average_turns);
    for (seed, e) in &report.failures {
        eprintln!("  seed {}: {}", seed, e);
    }
    Ok(())
}

fn cmd_map(seed: u64, color: bool) {
    let board = map::generate(seed);
    if color {
        print!("{}", render::ansi(&board, 3));
    } else {
        print!("{}", render::plain(&board, false, false, 3));
    }
    println!();
    print!("{}", render::summary(&board));

    let edges: usize = board.territories().iter().map(|t| t.adjacent.len()).sum::<usize>() / 2;
    match map::validate(&board) {
        Ok(()) => println!("\nMap OK: {} territories, {} edges (seed={})", board.len(), edges, seed),
        Err(defect) => println!("\nMap INVALID (seed={}): {}", seed, defect),
    }
}
