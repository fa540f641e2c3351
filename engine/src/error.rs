// ═══════════════════════════════════════════════════════════════════════
// Errors — illegal moves, protocol misuse, generated-map defects
// ═══════════════════════════════════════════════════════════════════════

use crate::types::{MatchStatus, Phase, PlayerId, TerrId};
use thiserror::Error;

/// Why a proposed action failed its legality predicate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("territory {0} does not exist")]
    UnknownTerritory(TerrId),
    #[error("territory {territory} is not held by {player}")]
    NotOwned { territory: TerrId, player: PlayerId },
    #[error("territory {0} is not held by the opponent")]
    NotEnemy(TerrId),
    #[error("territories {0} and {1} are not adjacent")]
    NotAdjacent(TerrId, TerrId),
    #[error("territory {0} needs at least 2 armies")]
    TooFewArmies(TerrId),
    #[error("source and destination are the same territory ({0})")]
    SameTerritory(TerrId),
    #[error("no path of owned territories from {0} to {1}")]
    NoOwnedPath(TerrId, TerrId),
    #[error("attack from {0} to {1} has no dice to roll")]
    NoDice(TerrId, TerrId),
    #[error("{0} has already fortified this turn")]
    AlreadyFortified(PlayerId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("illegal move: {0}")]
    IllegalMove(#[from] IllegalMove),
    #[error("no decision is pending")]
    NoPendingDecision,
    #[error("expected a {expected} decision, got a {got} action")]
    UnexpectedAction {
        expected: &'static str,
        got: &'static str,
    },
    #[error("match is already over ({0})")]
    MatchOver(MatchStatus),
    #[error("engine stalled in {phase:?} phase on turn {turn}")]
    Stalled { phase: Phase, turn: u32 },
}

/// A generated map that breaks one of the board invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapDefect {
    #[error("expected {expected} territories, found {found}")]
    WrongCount { expected: usize, found: usize },
    #[error("territory {from} lists neighbor {to} which does not exist")]
    NeighborOutOfRange { from: TerrId, to: TerrId },
    #[error("territory {0} is adjacent to itself")]
    SelfLoop(TerrId),
    #[error("edge {from} -> {to} has no reverse edge")]
    Asymmetric { from: TerrId, to: TerrId },
    #[error("territory {to} is listed twice as a neighbor of {from}")]
    DuplicateEdge { from: TerrId, to: TerrId },
    #[error("code '{0}' is used by more than one territory")]
    DuplicateCode(char),
    #[error("coordinate ({row}, {col}) is used by more than one territory")]
    DuplicateCoord { row: i32, col: i32 },
    #[error("territory {territory} has {degree} neighbors (limit {limit})")]
    DegreeExceeded {
        territory: TerrId,
        degree: usize,
        limit: usize,
    },
    #[error("territory {0} is unreachable from territory 0")]
    Disconnected(TerrId),
}
