// ═══════════════════════════════════════════════════════════════════════
// Turn Engine — match state machine and policy-driven turn loop
//
// Architecture:
//   The state machine never does I/O. `advance()` runs automatic steps
//   until a player decision is needed (sets `state.pending`) or the match
//   ends; `apply_action()` validates an answer and applies it.
//   `play_turn()` / `play_match()` drive that loop with a Policy.
//
// Turn flow:
//   Reinforce → Attack (repeat, with capture transfers) → Fortify → EndOfTurn
//
// Random stream order per turn:
//   reinforcement choice; per attack: attack choice, attacker dice,
//   defender dice, transfer choice; fortify choice.
// ═══════════════════════════════════════════════════════════════════════

use crate::combat::{self, BattleOutcome};
use crate::error::{EngineError, IllegalMove};
use crate::navigation;
use crate::policy::Policy;
use crate::reinforcement;
use crate::types::*;

/// Answers to pending decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Territory receiving the base reinforcement
    Reinforce(TerrId),
    /// (from, to) to attack, or None to stop attacking
    Attack(Option<(TerrId, TerrId)>),
    /// Armies moved into a captured territory
    Transfer(u32),
    /// Fortify move, or None to skip
    Fortify(Option<FortifyMove>),
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Reinforce(_) => "reinforce",
            Action::Attack(_) => "attack",
            Action::Transfer(_) => "transfer",
            Action::Fortify(_) => "fortify",
        }
    }

    /// Always-legal answer used when a policy keeps proposing illegal moves.
    pub fn fallback(pending: &PendingDecision) -> Action {
        match pending {
            PendingDecision::Reinforce { owned, .. } => {
                Action::Reinforce(owned.first().copied().unwrap_or_default())
            }
            PendingDecision::Attack { .. } => Action::Attack(None),
            PendingDecision::CaptureTransfer { .. } => Action::Transfer(1),
            PendingDecision::Fortify { .. } => Action::Fortify(None),
        }
    }
}

// ── Victory ────────────────────────────────────────────────────────────

/// A player with no territories loses if the other still holds one.
pub fn match_status(board: &Board) -> MatchStatus {
    let p1 = board.territory_count(PlayerId::P1);
    let p2 = board.territory_count(PlayerId::P2);
    if p1 > 0 && p2 == 0 {
        MatchStatus::Player1Wins
    } else if p2 > 0 && p1 == 0 {
        MatchStatus::Player2Wins
    } else {
        MatchStatus::Ongoing
    }
}

fn finish(state: &mut MatchState, status: MatchStatus) {
    state.status = status;
    state.pending = None;
    state.events.push(MatchEvent::Finished { status, turn: state.turn });
    tracing::info!(seed = state.seed(), turn = state.turn, %status, "match finished");
}

/// Returns true if the match just ended.
fn check_victory(state: &mut MatchState) -> bool {
    let status = match_status(&state.board);
    if status.is_over() {
        finish(state, status);
        return true;
    }
    false
}

// ── State machine ──────────────────────────────────────────────────────

/// Advance the match. Processes automatic steps until a player decision
/// is needed (sets state.pending) or the match ends.
pub fn advance(state: &mut MatchState) {
    if state.pending.is_some() || state.is_over() {
        return;
    }

    loop {
        let player = state.current;
        match state.phase {
            Phase::Reinforce => {
                if state.turn >= state.config.max_turns {
                    tracing::debug!(turn = state.turn, "turn cap reached");
                    finish(state, MatchStatus::Draw);
                    return;
                }
                begin_turn(state);

                if let Some(target) = reinforcement::chain_bonus_target(&state.board, player) {
                    state.board.territory_mut(target).armies += reinforcement::CHAIN_BONUS_ARMIES;
                    state.events.push(MatchEvent::ChainBonus {
                        player,
                        territory: target,
                        armies: reinforcement::CHAIN_BONUS_ARMIES,
                    });
                }
                if check_victory(state) {
                    return;
                }

                let owned = navigation::owned_by(&state.board, player);
                if owned.is_empty() {
                    state.phase = Phase::EndOfTurn;
                    continue;
                }
                state.pending = Some(PendingDecision::Reinforce {
                    player,
                    amount: reinforcement::base_reinforcements(&state.board, player),
                    owned,
                });
                return;
            }

            Phase::Attack => {
                let candidates = combat::attack_candidates(&state.board, player);
                if candidates.is_empty() {
                    state.phase = Phase::Fortify;
                    continue;
                }
                state.pending = Some(PendingDecision::Attack {
                    player,
                    candidates,
                    attacks_made: state.attacks_this_turn,
                });
                return;
            }

            Phase::Fortify => {
                if state.fortified_this_turn || navigation::fortify_sources(&state.board, player).is_empty() {
                    state.phase = Phase::EndOfTurn;
                    continue;
                }
                state.pending = Some(PendingDecision::Fortify {
                    player,
                    owned: navigation::owned_by(&state.board, player),
                });
                return;
            }

            Phase::EndOfTurn => {
                if end_turn(state) {
                    return;
                }
            }
        }
    }
}

fn begin_turn(state: &mut MatchState) {
    state.turn += 1;
    state.captured_this_turn = false;
    state.attacks_this_turn = 0;
    state.fortified_this_turn = false;
    tracing::debug!(turn = state.turn, player = %state.current, "turn started");
}

/// Returns true if the match ended.
fn end_turn(state: &mut MatchState) -> bool {
    if check_victory(state) {
        return true;
    }

    if state.captured_this_turn {
        state.stale_turns = 0;
    } else {
        state.stale_turns += 1;
    }
    state.events.push(MatchEvent::TurnEnded {
        player: state.current,
        turn: state.turn,
        captured: state.captured_this_turn,
        stale_turns: state.stale_turns,
    });

    if state.stale_turns >= state.config.max_stale_turns {
        tracing::debug!(stale_turns = state.stale_turns, "no-capture cap reached");
        finish(state, MatchStatus::Draw);
        return true;
    }

    state.current = state.current.opponent();
    state.phase = Phase::Reinforce;
    false
}

/// Apply a player's answer to the pending decision.
///
/// An illegal answer leaves the state untouched and the same decision
/// pending; the caller may ask again.
pub fn apply_action(state: &mut MatchState, action: Action) -> Result<(), EngineError> {
    if state.is_over() {
        return Err(EngineError::MatchOver(state.status));
    }
    let pending = state.pending.take().ok_or(EngineError::NoPendingDecision)?;

    match resolve(state, &pending, action) {
        Ok(()) => {
            // After applying the action, push forward to the next decision
            if state.pending.is_none() {
                advance(state);
            }
            Ok(())
        }
        Err(e) => {
            state.pending = Some(pending);
            Err(e)
        }
    }
}

fn resolve(state: &mut MatchState, pending: &PendingDecision, action: Action) -> Result<(), EngineError> {
    match (pending, action) {
        (PendingDecision::Reinforce { player, amount, .. }, Action::Reinforce(target)) => {
            let player = *player;
            if !state.board.contains(target) {
                return Err(IllegalMove::UnknownTerritory(target).into());
            }
            if !state.board.territory(target).is_owned_by(player) {
                return Err(IllegalMove::NotOwned { territory: target, player }.into());
            }
            state.board.territory_mut(target).armies += amount;
            state.events.push(MatchEvent::Reinforced { player, territory: target, armies: *amount });
            state.phase = Phase::Attack;
            check_victory(state);
        }

        (PendingDecision::Attack { .. }, Action::Attack(None)) => {
            state.phase = Phase::Fortify;
        }

        (PendingDecision::Attack { player, .. }, Action::Attack(Some((from, to)))) => {
            let player = *player;
            combat::check_attack(&state.board, from, to, player)?;

            let report = match combat::apply_battle(&mut state.board, from, to, player, &mut state.rng) {
                BattleOutcome::Resolved(report) => report,
                BattleOutcome::NotApplicable => return Err(IllegalMove::NoDice(from, to).into()),
            };
            state.attacks_this_turn += 1;
            let captured = report.captured;
            state.events.push(MatchEvent::Battle {
                player,
                from,
                to,
                attacker_rolls: report.attacker_rolls,
                defender_rolls: report.defender_rolls,
                losses: report.losses,
                captured,
            });

            if captured {
                state.captured_this_turn = true;
                let max = state.board.armies(from).saturating_sub(1);
                if max >= 1 {
                    // The transfer must happen before anything else this turn
                    state.pending = Some(PendingDecision::CaptureTransfer { player, from, to, max });
                    return Ok(());
                }
                tracing::warn!(from, to, "capture with no army left to move in");
            }
            check_victory(state);
        }

        (PendingDecision::CaptureTransfer { player, from, to, max }, Action::Transfer(amount)) => {
            // Out-of-range amounts are clamped, never rejected
            let amount = amount.max(1).min(*max);
            let moved = combat::transfer_armies(&mut state.board, *from, *to, amount);
            state.events.push(MatchEvent::Transferred { player: *player, from: *from, to: *to, armies: moved });
            check_victory(state);
        }

        (PendingDecision::Fortify { .. }, Action::Fortify(None)) => {
            state.phase = Phase::EndOfTurn;
        }

        (PendingDecision::Fortify { player, .. }, Action::Fortify(Some(mv))) => {
            let player = *player;
            if state.fortified_this_turn {
                return Err(IllegalMove::AlreadyFortified(player).into());
            }
            navigation::check_fortify(&state.board, mv.from, mv.to, player)?;

            let max = state.board.armies(mv.from) - 1;
            let moved = combat::transfer_armies(&mut state.board, mv.from, mv.to, mv.amount.max(1).min(max));
            state.fortified_this_turn = true;
            state.events.push(MatchEvent::Fortified { player, from: mv.from, to: mv.to, armies: moved });
            state.phase = Phase::EndOfTurn;
            check_victory(state);
        }

        (pending, action) => {
            return Err(EngineError::UnexpectedAction {
                expected: pending.kind(),
                got: action.kind(),
            });
        }
    }
    Ok(())
}

// ── Driving with policies ──────────────────────────────────────────────

/// Ask `policy` for an answer to the pending decision and apply it,
/// re-asking on illegal answers up to the configured limit.
///
/// One decision per call, for callers that report events as they happen.
pub fn decide_and_apply(state: &mut MatchState, policy: &mut dyn Policy) -> Result<(), EngineError> {
    let pending = state.pending.clone().ok_or(EngineError::NoPendingDecision)?;

    for attempt in 0..state.config.max_rejections.max(1) {
        let action = policy.decide(&state.board, &pending, &mut state.rng);
        match apply_action(state, action) {
            Ok(()) => return Ok(()),
            Err(EngineError::IllegalMove(reason)) => {
                tracing::warn!(policy = policy.name(), attempt, %reason, "policy proposed an illegal move");
            }
            Err(e) => return Err(e),
        }
    }

    tracing::warn!(policy = policy.name(), decision = pending.kind(), "too many illegal answers, using fallback");
    apply_action(state, Action::fallback(&pending))
}

/// Play the current player's turn to completion with `policy`.
pub fn play_turn(state: &mut MatchState, policy: &mut dyn Policy) -> Result<MatchStatus, EngineError> {
    advance(state);
    if state.is_over() {
        return Ok(state.status);
    }
    let turn = state.turn;

    while state.turn == turn && !state.is_over() {
        if state.pending.is_none() {
            return Err(EngineError::Stalled { phase: state.phase, turn: state.turn });
        }
        decide_and_apply(state, policy)?;
    }
    Ok(state.status)
}

/// Play until the match ends, P1 and P2 alternating turns.
pub fn play_match(
    state: &mut MatchState,
    p1: &mut dyn Policy,
    p2: &mut dyn Policy,
) -> Result<MatchStatus, EngineError> {
    advance(state);
    while !state.is_over() {
        let policy: &mut dyn Policy = match state.current {
            PlayerId::P1 => &mut *p1,
            PlayerId::P2 => &mut *p2,
        };
        play_turn(state, policy)?;
    }
    Ok(state.status)
}
