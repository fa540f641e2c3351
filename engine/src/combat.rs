// ═══════════════════════════════════════════════════════════════════════
// Combat — dice counts, one rolled round, battle application, transfers
// ═══════════════════════════════════════════════════════════════════════

use crate::error::IllegalMove;
use crate::navigation;
use crate::rng::MatchRng;
use crate::types::*;
use serde::{Deserialize, Serialize};

pub const MAX_ATTACKER_DICE: u32 = 3;
pub const MAX_DEFENDER_DICE: u32 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleLosses {
    pub attacker: u32,
    pub defender: u32,
}

/// What one round of dice did to the two territories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReport {
    pub attacker_rolls: Vec<u8>,
    pub defender_rolls: Vec<u8>,
    pub losses: BattleLosses,
    pub captured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleOutcome {
    /// Illegal attack or a side with no dice; the board is untouched.
    NotApplicable,
    Resolved(BattleReport),
}

impl BattleOutcome {
    pub fn captured(&self) -> bool {
        matches!(self, BattleOutcome::Resolved(r) if r.captured)
    }
}

// ── Dice counts ────────────────────────────────────────────────────────

/// Up to 3, always leaving one army behind.
pub fn attacker_dice(armies_at_source: u32) -> u32 {
    if armies_at_source <= 1 {
        return 0;
    }
    (armies_at_source - 1).min(MAX_ATTACKER_DICE)
}

/// Up to 2.
pub fn defender_dice(armies_at_target: u32) -> u32 {
    armies_at_target.min(MAX_DEFENDER_DICE)
}

// ── One round ──────────────────────────────────────────────────────────

/// Roll `count` dice from the stream, highest first.
pub fn roll_dice(count: u32, rng: &mut MatchRng) -> Vec<u8> {
    let mut rolls: Vec<u8> = (0..count).map(|_| rng.roll_die()).collect();
    rolls.sort_unstable_by(|a, b| b.cmp(a));
    rolls
}

/// Compare rolls rank by rank. Each pair costs the loser one army;
/// ties go to the defender.
pub fn compare_dice(attacker_rolls: &[u8], defender_rolls: &[u8]) -> BattleLosses {
    let mut attacker: Vec<u8> = attacker_rolls.to_vec();
    let mut defender: Vec<u8> = defender_rolls.to_vec();
    attacker.sort_unstable_by(|a, b| b.cmp(a));
    defender.sort_unstable_by(|a, b| b.cmp(a));

    let mut losses = BattleLosses::default();
    for (a, d) in attacker.iter().zip(defender.iter()) {
        if a > d {
            losses.defender += 1;
        } else {
            losses.attacker += 1;
        }
    }
    losses
}

/// Attacker dice are rolled before defender dice.
pub fn roll_round(attacker_count: u32, defender_count: u32, rng: &mut MatchRng) -> BattleReport {
    let attacker_rolls = roll_dice(attacker_count, rng);
    let defender_rolls = roll_dice(defender_count, rng);
    let losses = compare_dice(&attacker_rolls, &defender_rolls);
    BattleReport {
        attacker_rolls,
        defender_rolls,
        losses,
        captured: false,
    }
}

// ── Legality ───────────────────────────────────────────────────────────

pub fn check_attack(board: &Board, from: TerrId, to: TerrId, attacker: PlayerId) -> Result<(), IllegalMove> {
    for id in [from, to] {
        if !board.contains(id) {
            return Err(IllegalMove::UnknownTerritory(id));
        }
    }
    if from == to {
        return Err(IllegalMove::SameTerritory(from));
    }
    if !board.territory(from).is_owned_by(attacker) {
        return Err(IllegalMove::NotOwned { territory: from, player: attacker });
    }
    // Must be enemy-held: neither own nor neutral
    if board.owner(to) != Some(attacker.opponent()) {
        return Err(IllegalMove::NotEnemy(to));
    }
    if !navigation::are_adjacent(board, from, to) {
        return Err(IllegalMove::NotAdjacent(from, to));
    }
    if board.armies(from) < 2 {
        return Err(IllegalMove::TooFewArmies(from));
    }
    Ok(())
}

pub fn can_attack(board: &Board, from: TerrId, to: TerrId, attacker: PlayerId) -> bool {
    check_attack(board, from, to, attacker).is_ok()
}

/// Every legal (from, to) attack for `player`, sorted.
pub fn attack_candidates(board: &Board, player: PlayerId) -> Vec<(TerrId, TerrId)> {
    let mut pairs: Vec<(TerrId, TerrId)> = navigation::border_territories(board, player)
        .into_iter()
        .filter(|&from| board.armies(from) >= 2)
        .flat_map(|from| board.neighbors(from).iter().map(move |&to| (from, to)))
        .filter(|&(from, to)| can_attack(board, from, to, player))
        .collect();
    pairs.sort_unstable();
    pairs
}

// ── Applying results ───────────────────────────────────────────────────

/// Resolve one round between adjacent territories.
///
/// On capture the target changes hands with zero armies, and the caller
/// must follow up with [`transfer_armies`] before the turn goes on.
pub fn apply_battle(
    board: &mut Board,
    from: TerrId,
    to: TerrId,
    attacker: PlayerId,
    rng: &mut MatchRng,
) -> BattleOutcome {
    if check_attack(board, from, to, attacker).is_err() {
        return BattleOutcome::NotApplicable;
    }
    let a_dice = attacker_dice(board.armies(from));
    let d_dice = defender_dice(board.armies(to));
    if a_dice == 0 || d_dice == 0 {
        return BattleOutcome::NotApplicable;
    }

    let mut report = roll_round(a_dice, d_dice, rng);

    let source = board.territory_mut(from);
    source.armies = source.armies.saturating_sub(report.losses.attacker);

    let target = board.territory_mut(to);
    target.armies = target.armies.saturating_sub(report.losses.defender);
    if target.armies == 0 {
        target.owner = Some(attacker);
        report.captured = true;
    }

    tracing::debug!(
        from, to, %attacker,
        attacker_rolls = ?report.attacker_rolls,
        defender_rolls = ?report.defender_rolls,
        captured = report.captured,
        "battle resolved"
    );
    BattleOutcome::Resolved(report)
}

/// Move up to `amount` armies, clamped so the source keeps at least one.
/// Returns how many actually moved (0 means nothing happened).
pub fn transfer_armies(board: &mut Board, from: TerrId, to: TerrId, amount: u32) -> u32 {
    if !board.contains(from) || !board.contains(to) || from == to {
        return 0;
    }
    let available = board.armies(from).saturating_sub(1);
    let moved = amount.min(available);
    if moved == 0 {
        return 0;
    }
    board.territory_mut(from).armies -= moved;
    board.territory_mut(to).armies += moved;
    moved
}
