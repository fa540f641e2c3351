// ═══════════════════════════════════════════════════════════════════════
// Match setup — generate the map and deal starting positions
// ═══════════════════════════════════════════════════════════════════════

use crate::config::MatchConfig;
use crate::map;
use crate::rng::MatchRng;
use crate::types::*;
use rand::seq::SliceRandom;

pub const STARTING_ARMIES: u32 = 1;

/// Create a fresh match: map, deal, and the stream positioned after both.
pub fn create_match(seed: u64, config: MatchConfig) -> MatchState {
    let mut rng = MatchRng::new(seed);
    let mut board = map::generate_with(&mut rng);

    let defect = map::validate(&board).err();
    if let Some(d) = &defect {
        tracing::warn!(seed, defect = %d, "generated map failed validation; running as-is");
    }

    deal_starting_positions(&mut board, &mut rng);

    let mut state = MatchState::new(board, rng, config);
    state.map_defect = defect;
    tracing::debug!(seed, draws = state.rng.draws(), "match created");
    state
}

/// Shuffle territories and split them: first half to P1, the rest to P2,
/// one army each.
pub fn deal_starting_positions(board: &mut Board, rng: &mut MatchRng) {
    let n = board.len();
    let mut order: Vec<TerrId> = (0..n).collect();
    order.shuffle(rng);

    for (k, &id) in order.iter().enumerate() {
        let t = board.territory_mut(id);
        t.owner = Some(if k < n / 2 { PlayerId::P1 } else { PlayerId::P2 });
        t.armies = STARTING_ARMIES;
    }
}
