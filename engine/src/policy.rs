// ═══════════════════════════════════════════════════════════════════════
// Policy — the decision interface the turn engine consumes
//
// A policy only sees the board, the decision's options and the match
// stream. Human, scripted and automated players all implement the same
// four decisions; the engine re-validates whatever comes back.
// ═══════════════════════════════════════════════════════════════════════

use crate::engine::Action;
use crate::rng::MatchRng;
use crate::types::*;

pub trait Policy {
    /// Human-readable name (e.g. "Random", "Heuristic").
    fn name(&self) -> &str;

    /// Pick the owned territory that receives the whole base reinforcement.
    fn choose_reinforcement(
        &mut self,
        board: &Board,
        player: PlayerId,
        owned: &[TerrId],
        amount: u32,
        rng: &mut MatchRng,
    ) -> TerrId;

    /// Pick one legal attack, or `None` to end the attack phase.
    fn choose_attack(
        &mut self,
        board: &Board,
        player: PlayerId,
        candidates: &[(TerrId, TerrId)],
        attacks_made: u32,
        rng: &mut MatchRng,
    ) -> Option<(TerrId, TerrId)>;

    /// How many armies follow a capture, within `min..=max`.
    fn choose_transfer_amount(
        &mut self,
        board: &Board,
        from: TerrId,
        to: TerrId,
        min: u32,
        max: u32,
        rng: &mut MatchRng,
    ) -> u32;

    /// Optional fortify move, or `None` to skip.
    fn choose_fortify(
        &mut self,
        board: &Board,
        player: PlayerId,
        owned: &[TerrId],
        rng: &mut MatchRng,
    ) -> Option<FortifyMove>;

    /// Universal entry point: dispatches on the pending decision.
    fn decide(&mut self, board: &Board, pending: &PendingDecision, rng: &mut MatchRng) -> Action {
        match pending {
            PendingDecision::Reinforce { player, amount, owned } => {
                Action::Reinforce(self.choose_reinforcement(board, *player, owned, *amount, rng))
            }
            PendingDecision::Attack { player, candidates, attacks_made } => {
                Action::Attack(self.choose_attack(board, *player, candidates, *attacks_made, rng))
            }
            PendingDecision::CaptureTransfer { from, to, max, .. } => {
                Action::Transfer(self.choose_transfer_amount(board, *from, *to, 1, *max, rng))
            }
            PendingDecision::Fortify { player, owned } => {
                Action::Fortify(self.choose_fortify(board, *player, owned, rng))
            }
        }
    }
}
