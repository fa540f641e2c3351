// ═══════════════════════════════════════════════════════════════════════
// Random Policy — uniform choices among legal options.
// Serves as baseline and for testing engine stability.
// ═══════════════════════════════════════════════════════════════════════

use conquest_engine::navigation;
use conquest_engine::{Board, FortifyMove, MatchRng, PlayerId, Policy, TerrId};
use rand::seq::SliceRandom;
use rand::Rng;

pub struct RandomPolicy {
    max_attacks: u32,
}

impl RandomPolicy {
    pub fn new(max_attacks: u32) -> Self {
        RandomPolicy { max_attacks }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str { "Random" }

    fn choose_reinforcement(&mut self, _board: &Board, _player: PlayerId, owned: &[TerrId], _amount: u32, rng: &mut MatchRng) -> TerrId {
        // The engine never asks with an empty list
        owned.choose(rng).copied().unwrap_or_default()
    }

    fn choose_attack(&mut self, _board: &Board, _player: PlayerId, candidates: &[(TerrId, TerrId)], attacks_made: u32, rng: &mut MatchRng) -> Option<(TerrId, TerrId)> {
        if attacks_made >= self.max_attacks {
            return None;
        }
        candidates.choose(rng).copied()
    }

    fn choose_transfer_amount(&mut self, _board: &Board, _from: TerrId, _to: TerrId, min: u32, max: u32, rng: &mut MatchRng) -> u32 {
        if max <= min {
            return min;
        }
        rng.gen_range(min..=max)
    }

    fn choose_fortify(&mut self, board: &Board, player: PlayerId, _owned: &[TerrId], rng: &mut MatchRng) -> Option<FortifyMove> {
        let pairs = navigation::fortify_pairs(board, player);
        let &(from, to) = pairs.choose(rng)?;
        let max_move = board.armies(from).saturating_sub(1);
        if max_move == 0 {
            return None;
        }
        let amount = rng.gen_range(1..=max_move);
        Some(FortifyMove { from, to, amount })
    }
}
