// ═══════════════════════════════════════════════════════════════════════
// Rendering — read-only text views of the board
// ═══════════════════════════════════════════════════════════════════════

use crate::types::*;
use std::fmt::Write;

const RESET: &str = "\x1b[0m";
const FG_WHITE: &str = "\x1b[97m";
const BG_EMPTY: &str = "\x1b[40m";
const BG_NEUTRAL: &str = "\x1b[100m";
const BG_P1: &str = "\x1b[44m";
const BG_P2: &str = "\x1b[41m";

fn extent(board: &Board) -> (usize, usize) {
    let rows = board.territories().iter().map(|t| t.pos.row.max(0)).max().unwrap_or(0);
    let cols = board.territories().iter().map(|t| t.pos.col.max(0)).max().unwrap_or(0);
    (rows as usize + 1, cols as usize + 1)
}

fn grid(board: &Board) -> Vec<Vec<Option<&Territory>>> {
    let (rows, cols) = extent(board);
    let mut cells = vec![vec![None; cols]; rows];
    for t in board.territories() {
        if t.pos.row >= 0 && t.pos.col >= 0 {
            cells[t.pos.row as usize][t.pos.col as usize] = Some(t);
        }
    }
    cells
}

/// Keep the last `width` characters of the army count.
fn army_label(armies: u32, width: usize) -> String {
    let s = armies.to_string();
    if s.len() > width {
        s[s.len() - width..].to_string()
    } else {
        s
    }
}

/// ASCII grid: code, optional owner marker, optional right-aligned armies.
/// Empty cells are dots.
pub fn plain(board: &Board, show_owner: bool, show_armies: bool, cell_width: usize) -> String {
    let cell_width = cell_width.max(1);
    let mut out = String::new();

    for row in grid(board) {
        for cell in row {
            let Some(t) = cell else {
                out.push_str(&".".repeat(cell_width));
                continue;
            };
            let mut text: Vec<char> = vec![' '; cell_width];
            text[0] = t.code;
            let mut pos = 1;
            if show_owner && pos < cell_width {
                text[pos] = t.owner.map_or(' ', PlayerId::marker);
                pos += 1;
            }
            if show_armies && pos < cell_width {
                let label = army_label(t.armies, cell_width - pos);
                let start = cell_width - label.len();
                for (i, ch) in label.chars().enumerate() {
                    text[start + i] = ch;
                }
            }
            out.extend(text);
        }
        out.push('\n');
    }
    out
}

/// Colored blocks, two rows per grid row: code on top, armies below.
/// P1 blue, P2 red, unowned grey.
pub fn ansi(board: &Board, cell_width: usize) -> String {
    let cell_width = cell_width.max(2);
    let mut out = String::new();

    let background = |cell: Option<&Territory>| match cell.map(|t| t.owner) {
        None => BG_EMPTY,
        Some(None) => BG_NEUTRAL,
        Some(Some(PlayerId::P1)) => BG_P1,
        Some(Some(PlayerId::P2)) => BG_P2,
    };

    for row in grid(board) {
        for &cell in &row {
            let code = cell.map_or(' ', |t| t.code);
            let _ = write!(out, "{}{FG_WHITE}{:<cell_width$}{RESET}", background(cell), code);
        }
        out.push('\n');
        for &cell in &row {
            let label = cell.map_or(String::new(), |t| army_label(t.armies, cell_width));
            let _ = write!(out, "{}{FG_WHITE}{:>cell_width$}{RESET}", background(cell), label);
        }
        out.push('\n');
    }
    out
}

/// One line per territory: code, owner, armies, neighbor codes.
pub fn summary(board: &Board) -> String {
    let mut out = String::new();
    for t in board.territories() {
        let owner = t.owner.map_or_else(|| "neutral".to_string(), |p| p.to_string());
        let neighbors: String = t.adjacent.iter().map(|&n| board.territory(n).code).collect();
        let _ = writeln!(out, "{} {:<9} {:>3}  [{}]", t.code, owner, t.armies, neighbors);
    }
    out
}

/// One human-readable line for a match event, territories by code.
pub fn event_line(board: &Board, event: &MatchEvent) -> String {
    let code = |id: TerrId| board.get(id).map_or('?', |t| t.code);
    match event {
        MatchEvent::ChainBonus { player, territory, armies } => {
            format!("{} chain bonus: +{} on {}", player, armies, code(*territory))
        }
        MatchEvent::Reinforced { player, territory, armies } => {
            format!("{} reinforces {} with {}", player, code(*territory), armies)
        }
        MatchEvent::Battle { player, from, to, attacker_rolls, defender_rolls, losses, captured } => {
            let mut line = format!(
                "{} attacks {} -> {}: {:?} vs {:?}, attacker -{}, defender -{}",
                player, code(*from), code(*to), attacker_rolls, defender_rolls,
                losses.attacker, losses.defender,
            );
            if *captured {
                line.push_str(", captured!");
            }
            line
        }
        MatchEvent::Transferred { player, to, armies, .. } => {
            format!("{} moves {} into {}", player, armies, code(*to))
        }
        MatchEvent::Fortified { player, from, to, armies } => {
            format!("{} fortifies {} -> {} with {}", player, code(*from), code(*to), armies)
        }
        MatchEvent::TurnEnded { player, turn, stale_turns, .. } => {
            format!("-- end of turn {} ({}), {} turn(s) without a capture", turn, player, stale_turns)
        }
        MatchEvent::Finished { status, turn } => {
            format!("Match over after {} turns: {}", turn, status)
        }
    }
}
