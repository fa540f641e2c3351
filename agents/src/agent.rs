// ═══════════════════════════════════════════════════════════════════════
// Agent configuration and factory
//
// Every automated player is a `conquest_engine::Policy`. The engine
// re-validates whatever a policy answers, so agents only need to be
// sensible, not trusted.
// ═══════════════════════════════════════════════════════════════════════

use crate::heuristic::HeuristicPolicy;
use crate::random::RandomPolicy;
use crate::scripted::ScriptedPolicy;
use conquest_engine::Policy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_CPU_MAX_ATTACKS: u32 = 6;
pub const DEFAULT_ATTACK_THRESHOLD: f64 = 0.40;
pub const DEFAULT_SIMULATION_TRIALS: u32 = 200;

/// Tuning knobs shared by the automated policies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// CPU won't attack more than this many times per turn.
    pub cpu_max_attacks: u32,
    /// Minimum estimated capture probability before the heuristic attacks.
    pub attack_threshold: f64,
    /// Monte-Carlo battles per candidate attack.
    pub simulation_trials: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            cpu_max_attacks: DEFAULT_CPU_MAX_ATTACKS,
            attack_threshold: DEFAULT_ATTACK_THRESHOLD,
            simulation_trials: DEFAULT_SIMULATION_TRIALS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Random,
    Heuristic,
    /// Never attacks or fortifies.
    Passive,
}

impl AgentKind {
    pub const ALL: [AgentKind; 3] = [AgentKind::Random, AgentKind::Heuristic, AgentKind::Passive];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Random => "random",
            AgentKind::Heuristic => "heuristic",
            AgentKind::Passive => "passive",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentKind::ALL.iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown agent '{}' (expected random, heuristic or passive)", s))
    }
}

/// Build a boxed policy of the given kind.
pub fn make_policy(kind: AgentKind, config: &AgentConfig) -> Box<dyn Policy + Send> {
    match kind {
        AgentKind::Random => Box::new(RandomPolicy::new(config.cpu_max_attacks)),
        AgentKind::Heuristic => Box::new(HeuristicPolicy::new(*config)),
        AgentKind::Passive => Box::new(ScriptedPolicy::passive()),
    }
}
