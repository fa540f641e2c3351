// ═══════════════════════════════════════════════════════════════════════
// Map generation — seeded layout, spanning tree, extra near edges
// Every match board comes out of here; validation lives alongside.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::MapDefect;
use crate::navigation;
use crate::rng::MatchRng;
use crate::types::{Board, Pos, TerrId, Territory};
use rand::Rng;
use std::collections::HashSet;

// ── Generator constants ────────────────────────────────────────────────

pub const GRID_ROWS: i32 = 15;
pub const GRID_COLS: i32 = 25;
pub const NUM_TERRITORIES: usize = 20;
/// Minimum Chebyshev spacing between two territories.
pub const MIN_SEPARATION: i32 = 2;
pub const PLACEMENT_ATTEMPTS: u32 = 10_000;
pub const EXTRA_EDGES: usize = 10;
/// Extra edges are never added to a node already at this degree.
pub const MAX_DEGREE: usize = 4;
/// Hard bound checked by validation. Spanning-tree edges ignore
/// `MAX_DEGREE`, and a Euclidean MST node never has more than six.
pub const DEGREE_LIMIT: usize = 6;

pub const CODES: [char; NUM_TERRITORIES] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J',
    'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T',
];

/// Generate the board for a seed. Same seed, same board.
pub fn generate(seed: u64) -> Board {
    let mut rng = MatchRng::new(seed);
    generate_with(&mut rng)
}

/// Like [`generate`], but surfaces a validation failure as an error.
pub fn generate_checked(seed: u64) -> Result<Board, MapDefect> {
    let board = generate(seed);
    validate(&board)?;
    Ok(board)
}

/// Generate from an existing stream, so later draws continue after it.
pub fn generate_with(rng: &mut MatchRng) -> Board {
    let points = place_points(rng);
    let mut edges = minimum_spanning_tree(&points);
    add_extra_edges(&points, &mut edges);
    build_board(&points, &edges)
}

/// Assemble a board from positions and undirected edges. Codes are
/// assigned in index order; owners and armies start empty.
pub fn build_board(points: &[Pos], edges: &[(TerrId, TerrId)]) -> Board {
    let mut territories: Vec<Territory> = points
        .iter()
        .enumerate()
        .map(|(i, &pos)| Territory::new(code_for(i), pos))
        .collect();

    for &(a, b) in edges {
        territories[a].adjacent.push(b);
        territories[b].adjacent.push(a);
    }
    Board::new(territories)
}

fn code_for(index: usize) -> char {
    match CODES.get(index) {
        Some(&c) => c,
        // Past 'T' fall back to lowercase so codes stay unique.
        None => (b'a' + (index - NUM_TERRITORIES) as u8) as char,
    }
}

// ── Step 1: placement ──────────────────────────────────────────────────

fn random_pos(rng: &mut MatchRng) -> Pos {
    let row = rng.gen_range(0..GRID_ROWS);
    let col = rng.gen_range(0..GRID_COLS);
    Pos::new(row, col)
}

fn place_points(rng: &mut MatchRng) -> Vec<Pos> {
    place_points_with(rng, NUM_TERRITORIES, MIN_SEPARATION, PLACEMENT_ATTEMPTS)
}

/// `count` must fit in the grid, or the distinct-cell fallback never ends.
fn place_points_with(rng: &mut MatchRng, count: usize, min_sep: i32, attempts: u32) -> Vec<Pos> {
    let mut points: Vec<Pos> = Vec::with_capacity(count);

    let mut tries = 0;
    while points.len() < count && tries < attempts {
        tries += 1;
        let p = random_pos(rng);
        if points.iter().all(|&q| p.chebyshev(q) >= min_sep) {
            points.push(p);
        }
    }

    // Spacing failed: start over, any distinct cell will do
    if points.len() < count {
        tracing::debug!(tries, "spacing placement failed, falling back to distinct cells");
        points.clear();
        while points.len() < count {
            let p = random_pos(rng);
            if !points.contains(&p) {
                points.push(p);
            }
        }
    }
    points
}

// ── Step 2: Prim MST ───────────────────────────────────────────────────

/// Prim's algorithm over the complete Euclidean graph.
/// Returns undirected edges with `a < b`.
fn minimum_spanning_tree(points: &[Pos]) -> Vec<(TerrId, TerrId)> {
    let n = points.len();
    if n == 0 {
        return Vec::new();
    }
    let mut best = vec![f64::INFINITY; n];
    let mut parent: Vec<Option<TerrId>> = vec![None; n];
    let mut used = vec![false; n];
    best[0] = 0.0;

    for _ in 0..n {
        let mut v: Option<TerrId> = None;
        for i in 0..n {
            if !used[i] && v.map_or(true, |cur| best[i] < best[cur]) {
                v = Some(i);
            }
        }
        let Some(v) = v else { break };
        used[v] = true;

        for u in 0..n {
            if used[u] {
                continue;
            }
            let d = points[v].euclidean(points[u]);
            if d < best[u] {
                best[u] = d;
                parent[u] = Some(v);
            }
        }
    }

    (1..n)
        .filter_map(|u| parent[u].map(|v| (u.min(v), u.max(v))))
        .collect()
}

// ── Step 3: near-neighbor extras ───────────────────────────────────────

fn add_extra_edges(points: &[Pos], edges: &mut Vec<(TerrId, TerrId)>) {
    let n = points.len();
    let mut present: HashSet<(TerrId, TerrId)> = edges.iter().copied().collect();
    let mut degree = vec![0usize; n];
    for &(a, b) in edges.iter() {
        degree[a] += 1;
        degree[b] += 1;
    }

    let mut candidates: Vec<(TerrId, TerrId, f64)> = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for a in 0..n {
        for b in (a + 1)..n {
            candidates.push((a, b, points[a].euclidean(points[b])));
        }
    }
    // Stable: equal distances keep index order
    candidates.sort_by(|x, y| x.2.total_cmp(&y.2));

    let mut added = 0;
    for (a, b, _) in candidates {
        if added >= EXTRA_EDGES {
            break;
        }
        if present.contains(&(a, b)) {
            continue;
        }
        if degree[a] >= MAX_DEGREE || degree[b] >= MAX_DEGREE {
            continue;
        }
        edges.push((a, b));
        present.insert((a, b));
        degree[a] += 1;
        degree[b] += 1;
        added += 1;
    }
}

// ── Validation ─────────────────────────────────────────────────────────

/// Check every board invariant; report the first defect found.
pub fn validate(board: &Board) -> Result<(), MapDefect> {
    if board.len() != NUM_TERRITORIES {
        return Err(MapDefect::WrongCount {
            expected: NUM_TERRITORIES,
            found: board.len(),
        });
    }
    validate_adjacency(board)?;
    validate_unique_codes_and_coords(board)?;

    for (id, t) in board.territories().iter().enumerate() {
        if t.adjacent.len() > DEGREE_LIMIT {
            return Err(MapDefect::DegreeExceeded {
                territory: id,
                degree: t.adjacent.len(),
                limit: DEGREE_LIMIT,
            });
        }
    }

    if let Some(unreached) = navigation::first_unreachable(board) {
        return Err(MapDefect::Disconnected(unreached));
    }
    Ok(())
}

/// For every a -> b there is b -> a, no self loops, no repeats.
pub fn validate_adjacency(board: &Board) -> Result<(), MapDefect> {
    for (a, t) in board.territories().iter().enumerate() {
        let mut seen: HashSet<TerrId> = HashSet::new();
        for &b in &t.adjacent {
            if !board.contains(b) {
                return Err(MapDefect::NeighborOutOfRange { from: a, to: b });
            }
            if a == b {
                return Err(MapDefect::SelfLoop(a));
            }
            if !seen.insert(b) {
                return Err(MapDefect::DuplicateEdge { from: a, to: b });
            }
            if !board.neighbors(b).contains(&a) {
                return Err(MapDefect::Asymmetric { from: a, to: b });
            }
        }
    }
    Ok(())
}

pub fn validate_unique_codes_and_coords(board: &Board) -> Result<(), MapDefect> {
    let mut codes: HashSet<char> = HashSet::new();
    let mut coords: HashSet<Pos> = HashSet::new();
    for t in board.territories() {
        if !codes.insert(t.code) {
            return Err(MapDefect::DuplicateCode(t.code));
        }
        if !coords.insert(t.pos) {
            return Err(MapDefect::DuplicateCoord {
                row: t.pos.row,
                col: t.pos.col,
            });
        }
    }
    Ok(())
}
