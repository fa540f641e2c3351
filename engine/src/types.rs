// ═══════════════════════════════════════════════════════════════════════
// Core types — players, territories, board, match state
// ═══════════════════════════════════════════════════════════════════════

use crate::combat::BattleLosses;
use crate::config::MatchConfig;
use crate::error::MapDefect;
use crate::rng::MatchRng;
use serde::{Deserialize, Serialize};

// ── Enums ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum PlayerId {
    P1,
    P2,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::P1, PlayerId::P2];

    pub fn opponent(self) -> PlayerId {
        match self {
            PlayerId::P1 => PlayerId::P2,
            PlayerId::P2 => PlayerId::P1,
        }
    }

    /// Marker used by the text renderer.
    pub fn marker(self) -> char {
        match self {
            PlayerId::P1 => '1',
            PlayerId::P2 => '2',
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerId::P1 => write!(f, "Player 1"),
            PlayerId::P2 => write!(f, "Player 2"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    Ongoing,
    Player1Wins,
    Player2Wins,
    Draw,
}

impl MatchStatus {
    pub fn is_over(self) -> bool {
        self != MatchStatus::Ongoing
    }

    pub fn winner(self) -> Option<PlayerId> {
        match self {
            MatchStatus::Player1Wins => Some(PlayerId::P1),
            MatchStatus::Player2Wins => Some(PlayerId::P2),
            _ => None,
        }
    }

    pub fn won_by(player: PlayerId) -> MatchStatus {
        match player {
            PlayerId::P1 => MatchStatus::Player1Wins,
            PlayerId::P2 => MatchStatus::Player2Wins,
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Ongoing => write!(f, "Ongoing"),
            MatchStatus::Player1Wins => write!(f, "Player 1 wins"),
            MatchStatus::Player2Wins => write!(f, "Player 2 wins"),
            MatchStatus::Draw => write!(f, "Draw"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Reinforce,
    Attack,
    Fortify,
    EndOfTurn,
}

// ── Territory ──────────────────────────────────────────────────────────
// Territories live in a flat arena and refer to each other by index only.

pub type TerrId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: i32,
    pub col: i32,
}

impl Pos {
    pub fn new(row: i32, col: i32) -> Self {
        Pos { row, col }
    }

    /// King-move distance.
    pub fn chebyshev(self, other: Pos) -> i32 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }

    pub fn euclidean(self, other: Pos) -> f64 {
        let dr = f64::from(self.row - other.row);
        let dc = f64::from(self.col - other.col);
        (dr * dr + dc * dc).sqrt()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Territory {
    pub code: char,
    pub name: String,
    pub pos: Pos,
    pub owner: Option<PlayerId>, // None = neutral
    pub armies: u32,
    pub adjacent: Vec<TerrId>,
}

impl Territory {
    pub fn new(code: char, pos: Pos) -> Self {
        Territory {
            code,
            name: code.to_string(),
            pos,
            owner: None,
            armies: 0,
            adjacent: Vec::new(),
        }
    }

    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }
}

// ── Board ──────────────────────────────────────────────────────────────

/// The match graph. Owns every territory; indices are stable and contiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    territories: Vec<Territory>,
}

impl Board {
    pub fn new(territories: Vec<Territory>) -> Self {
        Board { territories }
    }

    pub fn len(&self) -> usize {
        self.territories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }

    pub fn contains(&self, id: TerrId) -> bool {
        id < self.territories.len()
    }

    pub fn territories(&self) -> &[Territory] {
        &self.territories
    }

    pub fn territory(&self, id: TerrId) -> &Territory {
        &self.territories[id]
    }

    pub fn territory_mut(&mut self, id: TerrId) -> &mut Territory {
        &mut self.territories[id]
    }

    pub fn get(&self, id: TerrId) -> Option<&Territory> {
        self.territories.get(id)
    }

    pub fn neighbors(&self, id: TerrId) -> &[TerrId] {
        &self.territories[id].adjacent
    }

    pub fn owner(&self, id: TerrId) -> Option<PlayerId> {
        self.territories[id].owner
    }

    pub fn armies(&self, id: TerrId) -> u32 {
        self.territories[id].armies
    }

    /// Case-insensitive lookup by letter code.
    pub fn find_by_code(&self, code: char) -> Option<TerrId> {
        let code = code.to_ascii_uppercase();
        self.territories
            .iter()
            .position(|t| t.code.to_ascii_uppercase() == code)
    }

    pub fn territory_count(&self, player: PlayerId) -> usize {
        self.territories.iter().filter(|t| t.is_owned_by(player)).count()
    }

    pub fn army_count(&self, player: PlayerId) -> u32 {
        self.territories
            .iter()
            .filter(|t| t.is_owned_by(player))
            .map(|t| t.armies)
            .sum()
    }
}

// ── Match events ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    ChainBonus {
        player: PlayerId,
        territory: TerrId,
        armies: u32,
    },
    Reinforced {
        player: PlayerId,
        territory: TerrId,
        armies: u32,
    },
    Battle {
        player: PlayerId,
        from: TerrId,
        to: TerrId,
        attacker_rolls: Vec<u8>,
        defender_rolls: Vec<u8>,
        losses: BattleLosses,
        captured: bool,
    },
    Transferred {
        player: PlayerId,
        from: TerrId,
        to: TerrId,
        armies: u32,
    },
    Fortified {
        player: PlayerId,
        from: TerrId,
        to: TerrId,
        armies: u32,
    },
    TurnEnded {
        player: PlayerId,
        turn: u32,
        captured: bool,
        stale_turns: u32,
    },
    Finished {
        status: MatchStatus,
        turn: u32,
    },
}

// ── Pending decisions ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FortifyMove {
    pub from: TerrId,
    pub to: TerrId,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingDecision {
    /// Place the whole base reinforcement on one owned territory.
    Reinforce {
        player: PlayerId,
        amount: u32,
        owned: Vec<TerrId>,
    },
    /// Pick one of the legal attacks, or stop attacking.
    Attack {
        player: PlayerId,
        candidates: Vec<(TerrId, TerrId)>,
        attacks_made: u32,
    },
    /// Move armies into a freshly captured territory (1..=max).
    CaptureTransfer {
        player: PlayerId,
        from: TerrId,
        to: TerrId,
        max: u32,
    },
    /// Optional single fortify move.
    Fortify {
        player: PlayerId,
        owned: Vec<TerrId>,
    },
}

impl PendingDecision {
    pub fn player(&self) -> PlayerId {
        match self {
            PendingDecision::Reinforce { player, .. }
            | PendingDecision::Attack { player, .. }
            | PendingDecision::CaptureTransfer { player, .. }
            | PendingDecision::Fortify { player, .. } => *player,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PendingDecision::Reinforce { .. } => "reinforce",
            PendingDecision::Attack { .. } => "attack",
            PendingDecision::CaptureTransfer { .. } => "transfer",
            PendingDecision::Fortify { .. } => "fortify",
        }
    }
}

// ── Match State ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct MatchState {
    pub board: Board,
    pub config: MatchConfig,

    /// The single random stream for this match (map, deal, dice, policies).
    pub rng: MatchRng,

    pub current: PlayerId,
    /// Turns started so far, counting the current one.
    pub turn: u32,
    /// Consecutive completed turns without a capture.
    pub stale_turns: u32,
    pub status: MatchStatus,
    pub phase: Phase,

    // Per-turn bookkeeping
    pub captured_this_turn: bool,
    pub attacks_this_turn: u32,
    pub fortified_this_turn: bool,

    // Current pending decision the match is waiting on
    pub pending: Option<PendingDecision>,

    pub events: Vec<MatchEvent>,

    /// Set when the generated map failed validation; the match still runs.
    pub map_defect: Option<MapDefect>,
}

impl MatchState {
    /// Start a match on an already populated board.
    pub fn new(board: Board, rng: MatchRng, config: MatchConfig) -> Self {
        MatchState {
            board,
            config,
            rng,
            current: PlayerId::P1,
            turn: 0,
            stale_turns: 0,
            status: MatchStatus::Ongoing,
            phase: Phase::Reinforce,
            captured_this_turn: false,
            attacks_this_turn: 0,
            fortified_this_turn: false,
            pending: None,
            events: Vec::new(),
            map_defect: None,
        }
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }
}
