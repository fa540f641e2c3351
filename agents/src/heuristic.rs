// ═══════════════════════════════════════════════════════════════════════
// Heuristic Policy — makes decisions using simple strategic heuristics.
// Significantly stronger than RandomPolicy.
//
//   Reinforce: the border territory under the heaviest threat
//   Attack:    best Monte-Carlo capture odds, if above the threshold
//   Transfer:  everything but the one army left behind
//   Fortify:   richest interior territory → most threatened border
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::AgentConfig;
use conquest_engine::{combat, navigation};
use conquest_engine::{Board, FortifyMove, MatchRng, PlayerId, Policy, TerrId};

pub struct HeuristicPolicy {
    config: AgentConfig,
}

impl HeuristicPolicy {
    pub fn new(config: AgentConfig) -> Self {
        HeuristicPolicy { config }
    }

    /// Fraction of simulated full battles (fought until capture or the
    /// attacker is down to one army) that end in a capture.
    pub fn capture_probability(&self, attackers: u32, defenders: u32, rng: &mut MatchRng) -> f64 {
        if attackers < 2 {
            return 0.0;
        }
        if defenders == 0 {
            return 1.0;
        }
        let trials = self.config.simulation_trials.max(1);
        let captures = (0..trials)
            .filter(|_| simulate_battle(attackers, defenders, rng))
            .count();
        captures as f64 / trials as f64
    }

    /// Enemy armies next to `id` minus the armies already there.
    fn threat(board: &Board, id: TerrId, player: PlayerId) -> i64 {
        let enemy: i64 = board.neighbors(id).iter()
            .filter(|&&n| board.owner(n) == Some(player.opponent()))
            .map(|&n| board.armies(n) as i64)
            .sum();
        enemy - board.armies(id) as i64
    }

    fn faces_enemy(board: &Board, id: TerrId, player: PlayerId) -> bool {
        board.neighbors(id).iter().any(|&n| board.owner(n) == Some(player.opponent()))
    }

    /// Most threatened of `ids`, lowest index on ties.
    fn most_threatened(board: &Board, ids: impl Iterator<Item = TerrId>, player: PlayerId) -> Option<TerrId> {
        let mut best: Option<(TerrId, i64)> = None;
        for id in ids {
            let t = Self::threat(board, id, player);
            if best.map_or(true, |(_, b)| t > b) {
                best = Some((id, t));
            }
        }
        best.map(|(id, _)| id)
    }
}

fn simulate_battle(mut attackers: u32, mut defenders: u32, rng: &mut MatchRng) -> bool {
    while attackers >= 2 && defenders > 0 {
        let round = combat::roll_round(
            combat::attacker_dice(attackers),
            combat::defender_dice(defenders),
            rng,
        );
        attackers -= round.losses.attacker;
        defenders -= round.losses.defender;
    }
    defenders == 0
}

impl Policy for HeuristicPolicy {
    fn name(&self) -> &str { "Heuristic" }

    fn choose_reinforcement(&mut self, board: &Board, player: PlayerId, owned: &[TerrId], _amount: u32, _rng: &mut MatchRng) -> TerrId {
        let borders = owned.iter().copied().filter(|&id| Self::faces_enemy(board, id, player));
        Self::most_threatened(board, borders, player)
            .or_else(|| owned.first().copied())
            .unwrap_or_default()
    }

    fn choose_attack(&mut self, board: &Board, player: PlayerId, candidates: &[(TerrId, TerrId)], attacks_made: u32, rng: &mut MatchRng) -> Option<(TerrId, TerrId)> {
        if attacks_made >= self.config.cpu_max_attacks || candidates.is_empty() {
            return None;
        }

        // Simulations run on a fork so the match stream advances by one draw
        let mut sim = rng.fork();
        let mut best: Option<((TerrId, TerrId), f64)> = None;
        for &(from, to) in candidates {
            let p = self.capture_probability(board.armies(from), board.armies(to), &mut sim);
            if best.map_or(true, |(_, b)| p > b) {
                best = Some(((from, to), p));
            }
        }

        let (attack, p) = best?;
        tracing::debug!(%player, from = attack.0, to = attack.1, p, "best attack estimate");
        (p >= self.config.attack_threshold).then_some(attack)
    }

    fn choose_transfer_amount(&mut self, _board: &Board, _from: TerrId, _to: TerrId, _min: u32, max: u32, _rng: &mut MatchRng) -> u32 {
        max
    }

    fn choose_fortify(&mut self, board: &Board, player: PlayerId, owned: &[TerrId], _rng: &mut MatchRng) -> Option<FortifyMove> {
        // Richest interior territory, lowest index on ties
        let mut source: Option<TerrId> = None;
        for &id in owned {
            if board.armies(id) < 2 || Self::faces_enemy(board, id, player) {
                continue;
            }
            if source.map_or(true, |s| board.armies(id) > board.armies(s)) {
                source = Some(id);
            }
        }
        let from = source?;

        let targets = owned.iter().copied().filter(|&id| {
            Self::faces_enemy(board, id, player)
                && navigation::reachable_through_owned(board, from, id, player)
        });
        let to = Self::most_threatened(board, targets, player)?;

        Some(FortifyMove { from, to, amount: board.armies(from) - 1 })
    }
}
