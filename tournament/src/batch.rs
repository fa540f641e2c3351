// ═══════════════════════════════════════════════════════════════════════
// Batches — many independent matches across seeds, in parallel
// ═══════════════════════════════════════════════════════════════════════

use crate::runner::{run_match, MatchResult};
use conquest_agents::{AgentConfig, AgentKind};
use conquest_engine::{MatchConfig, MatchStatus};
use rayon::prelude::*;
use serde::Serialize;

/// Seed spacing between consecutive matches of a batch.
pub const SEED_STRIDE: u64 = 1000;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub games: usize,
    pub p1_wins: usize,
    pub p2_wins: usize,
    pub draws: usize,
    pub errors: usize,
    pub average_turns: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub p1: AgentKind,
    pub p2: AgentKind,
    pub summary: BatchSummary,
    pub results: Vec<MatchResult>,
    /// (seed, error message) for matches that did not finish cleanly.
    pub failures: Vec<(u64, String)>,
}

pub fn batch_seeds(base: u64, games: u32) -> Vec<u64> {
    (0..games as u64).map(|g| base.wrapping_add(g * SEED_STRIDE)).collect()
}

/// Run one match per seed. Results come back in seed order regardless
/// of which thread finished first; event logs are dropped to keep
/// reports small.
pub fn run_batch(
    seeds: &[u64],
    match_config: &MatchConfig,
    agent_config: &AgentConfig,
    p1: AgentKind,
    p2: AgentKind,
) -> BatchReport {
    let outcomes: Vec<_> = seeds
        .par_iter()
        .map(|&seed| {
            run_match(seed, match_config, agent_config, p1, p2)
                .map(|mut r| {
                    r.events.clear();
                    r
                })
                .map_err(|e| (seed, e.to_string()))
        })
        .collect();

    let mut results = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(r) => results.push(r),
            Err((seed, e)) => {
                tracing::warn!(seed, error = %e, "match failed");
                failures.push((seed, e));
            }
        }
    }

    let summary = summarize(&results, failures.len());
    tracing::info!(
        games = summary.games, p1_wins = summary.p1_wins, p2_wins = summary.p2_wins,
        draws = summary.draws, errors = summary.errors, "batch finished"
    );
    BatchReport { p1, p2, summary, results, failures }
}

pub fn summarize(results: &[MatchResult], errors: usize) -> BatchSummary {
    let mut summary = BatchSummary {
        games: results.len() + errors,
        errors,
        ..BatchSummary::default()
    };
    let mut total_turns = 0u64;
    for r in results {
        match r.status {
            MatchStatus::Player1Wins => summary.p1_wins += 1,
            MatchStatus::Player2Wins => summary.p2_wins += 1,
            MatchStatus::Draw => summary.draws += 1,
            MatchStatus::Ongoing => {}
        }
        total_turns += r.turns as u64;
    }
    if !results.is_empty() {
        summary.average_turns = total_turns as f64 / results.len() as f64;
    }
    summary
}
