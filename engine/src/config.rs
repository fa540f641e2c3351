// ═══════════════════════════════════════════════════════════════════════
// Match configuration — termination caps and policy retry budget
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_TURNS: u32 = 500;
pub const DEFAULT_MAX_STALE_TURNS: u32 = 60;
pub const DEFAULT_MAX_REJECTIONS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Turn cap; starting turn `max_turns + 1` ends the match in a draw.
    pub max_turns: u32,
    /// Consecutive turns without a capture before the match is drawn.
    pub max_stale_turns: u32,
    /// Illegal answers tolerated per decision before the driver falls back
    /// to the safe default.
    pub max_rejections: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            max_turns: DEFAULT_MAX_TURNS,
            max_stale_turns: DEFAULT_MAX_STALE_TURNS,
            max_rejections: DEFAULT_MAX_REJECTIONS,
        }
    }
}
