// ═══════════════════════════════════════════════════════════════════════
// Reinforcement — base troops and the chain bonus
// ═══════════════════════════════════════════════════════════════════════

use crate::navigation;
use crate::types::*;

pub const MIN_REINFORCEMENTS: u32 = 3;
pub const TERRITORIES_PER_ARMY: usize = 3;
pub const CHAIN_BONUS_MIN_SIZE: usize = 5;
pub const CHAIN_BONUS_ARMIES: u32 = 5;

/// `max(3, owned / 3)`.
pub fn base_reinforcements(board: &Board, player: PlayerId) -> u32 {
    let owned = board.territory_count(player) / TERRITORIES_PER_ARMY;
    (owned as u32).max(MIN_REINFORCEMENTS)
}

/// Where the +5 chain bonus lands, if the player has a chain of 5 or more.
///
/// The largest qualifying chain wins (ties: the chain holding the lowest
/// index) and the bonus goes on its lowest-index territory.
pub fn chain_bonus_target(board: &Board, player: PlayerId) -> Option<TerrId> {
    let mut best: Option<Vec<TerrId>> = None;
    for chain in navigation::components(board, player) {
        if chain.len() < CHAIN_BONUS_MIN_SIZE {
            continue;
        }
        if best.as_ref().map_or(true, |b| chain.len() > b.len()) {
            best = Some(chain);
        }
    }
    best.and_then(|chain| chain.first().copied())
}
