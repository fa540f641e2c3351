// ═══════════════════════════════════════════════════════════════════════
// Match Runner — runs a complete headless match with two policies
// ═══════════════════════════════════════════════════════════════════════

use conquest_agents::{make_policy, AgentConfig, AgentKind};
use conquest_engine::engine::play_match;
use conquest_engine::setup::create_match;
use conquest_engine::types::*;
use conquest_engine::{EngineError, MatchConfig, Policy};
use serde::Serialize;

/// Result of a completed match.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub seed: u64,
    pub status: MatchStatus,
    pub turns: u32,
    pub stale_turns: u32,
    pub player_results: Vec<PlayerResult>,
    pub battles: usize,
    pub captures: usize,
    /// Values drawn from the match stream, for replay checks.
    pub rng_draws: u64,
    pub map_defect: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<MatchEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerResult {
    pub player: PlayerId,
    pub agent_name: String,
    pub territories: usize,
    pub armies: u32,
}

/// Run a complete match between two agent kinds on `seed`.
pub fn run_match(
    seed: u64,
    match_config: &MatchConfig,
    agent_config: &AgentConfig,
    p1: AgentKind,
    p2: AgentKind,
) -> Result<MatchResult, EngineError> {
    let mut p1 = make_policy(p1, agent_config);
    let mut p2 = make_policy(p2, agent_config);
    run_with_policies(seed, match_config, &mut *p1, &mut *p2)
}

/// Run a complete match with caller-supplied policies.
pub fn run_with_policies(
    seed: u64,
    match_config: &MatchConfig,
    p1: &mut dyn Policy,
    p2: &mut dyn Policy,
) -> Result<MatchResult, EngineError> {
    let mut state = create_match(seed, *match_config);
    play_match(&mut state, &mut *p1, &mut *p2)?;

    let names = [p1.name().to_string(), p2.name().to_string()];
    tracing::debug!(seed, status = %state.status, turns = state.turn, "match complete");
    Ok(build_result(state, names))
}

fn build_result(state: MatchState, names: [String; 2]) -> MatchResult {
    let player_results = PlayerId::ALL.iter()
        .zip(names)
        .map(|(&player, agent_name)| PlayerResult {
            player,
            agent_name,
            territories: state.board.territory_count(player),
            armies: state.board.army_count(player),
        })
        .collect();

    let mut battles = 0;
    let mut captures = 0;
    for event in &state.events {
        if let MatchEvent::Battle { captured, .. } = event {
            battles += 1;
            if *captured {
                captures += 1;
            }
        }
    }

    MatchResult {
        seed: state.seed(),
        status: state.status,
        turns: state.turn,
        stale_turns: state.stale_turns,
        player_results,
        battles,
        captures,
        rng_draws: state.rng.draws(),
        map_defect: state.map_defect.as_ref().map(ToString::to_string),
        events: state.events,
    }
}
