// ═══════════════════════════════════════════════════════════════════════
// Scripted Policy — replays queued answers, then plays passively.
//
// Used for deterministic replays and tests. With an empty script it is
// the passive policy: reinforce the first owned territory, never attack,
// never fortify, and move the minimum after a capture.
// ═══════════════════════════════════════════════════════════════════════

use conquest_engine::{Action, Board, FortifyMove, MatchRng, PlayerId, Policy, TerrId};
use std::collections::VecDeque;

pub struct ScriptedPolicy {
    name: String,
    script: VecDeque<Action>,
}

impl ScriptedPolicy {
    pub fn new(script: impl IntoIterator<Item = Action>) -> Self {
        ScriptedPolicy {
            name: "Scripted".to_string(),
            script: script.into_iter().collect(),
        }
    }

    pub fn passive() -> Self {
        ScriptedPolicy {
            name: "Passive".to_string(),
            script: VecDeque::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Pop the next scripted answer if it answers this kind of decision.
    fn next<T>(&mut self, pick: impl FnOnce(&Action) -> Option<T>) -> Option<T> {
        let value = pick(self.script.front()?)?;
        self.script.pop_front();
        Some(value)
    }
}

impl Policy for ScriptedPolicy {
    fn name(&self) -> &str { &self.name }

    fn choose_reinforcement(&mut self, _board: &Board, _player: PlayerId, owned: &[TerrId], _amount: u32, _rng: &mut MatchRng) -> TerrId {
        self.next(|a| match a {
            Action::Reinforce(t) => Some(*t),
            _ => None,
        })
        .or_else(|| owned.first().copied())
        .unwrap_or_default()
    }

    fn choose_attack(&mut self, _board: &Board, _player: PlayerId, _candidates: &[(TerrId, TerrId)], _attacks_made: u32, _rng: &mut MatchRng) -> Option<(TerrId, TerrId)> {
        self.next(|a| match a {
            Action::Attack(choice) => Some(*choice),
            _ => None,
        })
        .flatten()
    }

    fn choose_transfer_amount(&mut self, _board: &Board, _from: TerrId, _to: TerrId, min: u32, _max: u32, _rng: &mut MatchRng) -> u32 {
        self.next(|a| match a {
            Action::Transfer(n) => Some(*n),
            _ => None,
        })
        .unwrap_or(min)
    }

    fn choose_fortify(&mut self, _board: &Board, _player: PlayerId, _owned: &[TerrId], _rng: &mut MatchRng) -> Option<FortifyMove> {
        self.next(|a| match a {
            Action::Fortify(mv) => Some(*mv),
            _ => None,
        })
        .flatten()
    }
}
