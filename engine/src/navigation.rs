// ═══════════════════════════════════════════════════════════════════════
// Navigation — adjacency, ownership chains, owned-path reachability
// ═══════════════════════════════════════════════════════════════════════

use crate::error::IllegalMove;
use crate::types::*;
use std::collections::VecDeque;

pub fn neighbors(board: &Board, id: TerrId) -> &[TerrId] {
    board.neighbors(id)
}

pub fn are_adjacent(board: &Board, a: TerrId, b: TerrId) -> bool {
    board.contains(a) && board.neighbors(a).contains(&b)
}

/// All territories held by `player`, in index order.
pub fn owned_by(board: &Board, player: PlayerId) -> Vec<TerrId> {
    board.territories().iter().enumerate()
        .filter(|(_, t)| t.is_owned_by(player))
        .map(|(i, _)| i)
        .collect()
}

/// Owned territories touching at least one territory the player does not hold.
pub fn border_territories(board: &Board, player: PlayerId) -> Vec<TerrId> {
    board.territories().iter().enumerate()
        .filter(|(_, t)| {
            t.is_owned_by(player)
                && t.adjacent.iter().any(|&n| !board.territory(n).is_owned_by(player))
        })
        .map(|(i, _)| i)
        .collect()
}

/// BFS over territories held by `player`, starting at `start`.
/// Returns the visited set in discovery order (empty if `start` is not held).
fn owned_component(board: &Board, start: TerrId, player: PlayerId, visited: &mut [bool]) -> Vec<TerrId> {
    let mut component = Vec::new();
    if !board.contains(start) || visited[start] || !board.territory(start).is_owned_by(player) {
        return component;
    }

    let mut queue: VecDeque<TerrId> = VecDeque::new();
    visited[start] = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        component.push(current);
        for &next in board.neighbors(current) {
            if visited[next] || !board.territory(next).is_owned_by(player) {
                continue;
            }
            visited[next] = true;
            queue.push_back(next);
        }
    }
    component
}

/// Size of the chain containing `start`; 0 when `start` is not held by `player`.
pub fn connected_component_size(board: &Board, start: TerrId, player: PlayerId) -> usize {
    let mut visited = vec![false; board.len()];
    owned_component(board, start, player, &mut visited).len()
}

/// Every chain of `player`, each sorted by index, ordered by lowest member.
pub fn components(board: &Board, player: PlayerId) -> Vec<Vec<TerrId>> {
    let mut visited = vec![false; board.len()];
    let mut chains = Vec::new();
    for id in 0..board.len() {
        let mut chain = owned_component(board, id, player, &mut visited);
        if chain.is_empty() {
            continue;
        }
        chain.sort_unstable();
        chains.push(chain);
    }
    chains
}

/// True if `to` can be reached from `from` stepping only on territories
/// held by `player`. A territory never reaches itself.
pub fn reachable_through_owned(board: &Board, from: TerrId, to: TerrId, player: PlayerId) -> bool {
    if !board.contains(from) || !board.contains(to) || from == to {
        return false;
    }
    if !board.territory(to).is_owned_by(player) {
        return false;
    }
    let mut visited = vec![false; board.len()];
    owned_component(board, from, player, &mut visited);
    visited[to]
}

/// Full fortify legality with the reason it fails.
pub fn check_fortify(board: &Board, from: TerrId, to: TerrId, player: PlayerId) -> Result<(), IllegalMove> {
    for id in [from, to] {
        if !board.contains(id) {
            return Err(IllegalMove::UnknownTerritory(id));
        }
        if !board.territory(id).is_owned_by(player) {
            return Err(IllegalMove::NotOwned { territory: id, player });
        }
    }
    if from == to {
        return Err(IllegalMove::SameTerritory(from));
    }
    if board.armies(from) < 2 {
        return Err(IllegalMove::TooFewArmies(from));
    }
    if !reachable_through_owned(board, from, to, player) {
        return Err(IllegalMove::NoOwnedPath(from, to));
    }
    Ok(())
}

pub fn can_fortify(board: &Board, from: TerrId, to: TerrId, player: PlayerId) -> bool {
    check_fortify(board, from, to, player).is_ok()
}

/// Owned territories that could start a fortify: at least 2 armies and
/// at least one owned neighbor.
pub fn fortify_sources(board: &Board, player: PlayerId) -> Vec<TerrId> {
    owned_by(board, player).into_iter()
        .filter(|&id| {
            board.armies(id) >= 2
                && board.neighbors(id).iter().any(|&n| board.territory(n).is_owned_by(player))
        })
        .collect()
}

/// Every legal (from, to) fortify pair, sorted.
pub fn fortify_pairs(board: &Board, player: PlayerId) -> Vec<(TerrId, TerrId)> {
    let mut pairs = Vec::new();
    let mut visited = vec![false; board.len()];
    for from in fortify_sources(board, player) {
        visited.iter_mut().for_each(|v| *v = false);
        for to in owned_component(board, from, player, &mut visited) {
            if to != from {
                pairs.push((from, to));
            }
        }
    }
    pairs.sort_unstable();
    pairs
}

/// First territory not reachable from 0 over any edge, if the graph is split.
pub fn first_unreachable(board: &Board) -> Option<TerrId> {
    if board.is_empty() {
        return None;
    }
    let mut visited = vec![false; board.len()];
    let mut queue: VecDeque<TerrId> = VecDeque::new();
    visited[0] = true;
    queue.push_back(0);
    while let Some(current) = queue.pop_front() {
        for &next in board.neighbors(current) {
            if board.contains(next) && !visited[next] {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }
    visited.iter().position(|v| !v)
}

pub fn is_connected(board: &Board) -> bool {
    first_unreachable(board).is_none()
}
