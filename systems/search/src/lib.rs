#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! A* search system that plans eight-way routes across an immutable [`Grid`].
//!
//! Every query owns a fresh [`SearchState`]. The state keeps the frontier
//! (`open`) and the finalized cells (`closed`) keyed by cell index, and parent
//! links are stored as indices into the closed set, so the node chain can be
//! walked back from the goal without any shared ownership. Grids are never
//! mutated, which lets independent searches run in parallel against the same
//! map.

mod path;

use std::collections::{BTreeSet, HashMap};

use gridstar_core::{heuristic, CellCoord, StepKind};
use gridstar_grid::Grid;
use log::{debug, trace};

pub use path::Path;

/// Cell record tracked by the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Node {
    cell: CellCoord,
    index: usize,
    g_cost: u32,
    h_cost: u32,
    f_cost: u32,
    parent: Option<usize>,
}

impl Node {
    fn new(cell: CellCoord, index: usize, g_cost: u32, h_cost: u32, parent: Option<usize>) -> Self {
        Self {
            cell,
            index,
            g_cost,
            h_cost,
            f_cost: g_cost + h_cost,
            parent,
        }
    }

    /// Grid cell represented by the node.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Row-major index of the cell.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Accumulated cost from the start along the best known route.
    #[must_use]
    pub const fn g_cost(&self) -> u32 {
        self.g_cost
    }

    /// Estimated remaining cost to the goal, fixed when the node is created.
    #[must_use]
    pub const fn h_cost(&self) -> u32 {
        self.h_cost
    }

    /// Selection priority, `g_cost + h_cost`.
    #[must_use]
    pub const fn f_cost(&self) -> u32 {
        self.f_cost
    }

    /// Index of the predecessor on the best known route, `None` for the start.
    #[must_use]
    pub const fn parent(&self) -> Option<usize> {
        self.parent
    }

    fn frontier_key(&self) -> FrontierKey {
        FrontierKey {
            f_cost: self.f_cost,
            h_cost: self.h_cost,
            index: self.index,
        }
    }
}

/// Frontier ordering: lowest `f`, then lowest `h`, then lowest index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierKey {
    f_cost: u32,
    h_cost: u32,
    index: usize,
}

/// Tuning applied to a single search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Upper bound on expansions before the search gives up, if any.
    pub max_expansions: Option<u32>,
}

/// Outcome of a finished search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    /// The goal was reached; a path is available.
    Found,
    /// The frontier ran dry before reaching the goal.
    Unreachable,
    /// The expansion budget ran out before the search finished.
    Interrupted,
}

/// Per-query search state, retained after termination to read the result.
#[derive(Clone, Debug)]
pub struct SearchState {
    start: CellCoord,
    goal: CellCoord,
    start_index: usize,
    goal_index: usize,
    open: HashMap<usize, Node>,
    frontier: BTreeSet<FrontierKey>,
    closed: HashMap<usize, Node>,
    current: Option<Node>,
    expansion_count: u32,
}

/// Finds a route from `start` to `goal` without an expansion budget.
///
/// Both endpoints must lie inside the grid on open cells; see
/// [`Grid::validate_endpoint`].
#[must_use]
pub fn find_path(grid: &Grid, start: CellCoord, goal: CellCoord) -> SearchState {
    find_path_with(grid, start, goal, SearchOptions::default())
}

/// Finds a route from `start` to `goal` honouring the provided options.
#[must_use]
pub fn find_path_with(
    grid: &Grid,
    start: CellCoord,
    goal: CellCoord,
    options: SearchOptions,
) -> SearchState {
    debug!("searching from {start} to {goal} on a {}x{} grid", grid.width(), grid.height());

    let mut state = SearchState::new(grid, start, goal);

    while let Some(current) = state.current {
        if current.index == state.goal_index {
            break;
        }

        if options
            .max_expansions
            .is_some_and(|limit| state.expansion_count >= limit)
        {
            break;
        }

        state.expand(grid, current);
        state.current = state.select_next();
        state.expansion_count += 1;

        trace!(
            "expanded {} (g={}, f={}); open={}, closed={}",
            current.cell,
            current.g_cost,
            current.f_cost,
            state.open.len(),
            state.closed.len()
        );
    }

    debug!(
        "search finished with {:?} after {} expansions",
        state.status(),
        state.expansion_count
    );

    state
}

impl SearchState {
    fn new(grid: &Grid, start: CellCoord, goal: CellCoord) -> Self {
        let start_index = grid.index(start);
        let origin = Node::new(start, start_index, 0, heuristic(start, goal), None);

        Self {
            start,
            goal,
            start_index,
            goal_index: grid.index(goal),
            open: HashMap::new(),
            frontier: BTreeSet::new(),
            closed: HashMap::new(),
            current: Some(origin),
            expansion_count: 0,
        }
    }

    /// Finalizes `current` and offers its neighbours to the frontier.
    ///
    /// Neighbours are visited left, right, then the row above and the row
    /// below. A diagonal is only offered when both the vertical and the
    /// horizontal cell it passes between are open.
    fn expand(&mut self, grid: &Grid, current: Node) {
        let _ = self.closed.insert(current.index, current);

        let column = current.cell.column();
        let row = current.cell.row();
        let passable = |cell: CellCoord| grid.contains(cell) && !grid.is_cell_blocked(cell);

        let left = column
            .checked_sub(1)
            .map(|column| CellCoord::new(column, row))
            .filter(|&cell| passable(cell));
        let right = column
            .checked_add(1)
            .map(|column| CellCoord::new(column, row))
            .filter(|&cell| passable(cell));

        for cell in left.into_iter().chain(right) {
            self.relax(grid, &current, cell, StepKind::Straight);
        }

        for next_row in [row.checked_sub(1), row.checked_add(1)].into_iter().flatten() {
            let vertical = CellCoord::new(column, next_row);
            if !passable(vertical) {
                continue;
            }
            self.relax(grid, &current, vertical, StepKind::Straight);

            let diagonals = [left, right]
                .into_iter()
                .flatten()
                .map(|side| CellCoord::new(side.column(), next_row))
                .filter(|&cell| passable(cell));
            for cell in diagonals {
                self.relax(grid, &current, cell, StepKind::Diagonal);
            }
        }
    }

    /// Joins `cell` to the frontier or lowers its cost through `current`.
    fn relax(&mut self, grid: &Grid, current: &Node, cell: CellCoord, step: StepKind) {
        let index = grid.index(cell);
        if self.closed.contains_key(&index) {
            return;
        }

        let g_cost = current.g_cost + step.cost();

        match self.open.get_mut(&index) {
            Some(node) => {
                if node.g_cost <= g_cost {
                    return;
                }

                let _ = self.frontier.remove(&node.frontier_key());
                node.g_cost = g_cost;
                node.f_cost = g_cost + node.h_cost;
                node.parent = Some(current.index);
                let _ = self.frontier.insert(node.frontier_key());
            }
            None => {
                let node = Node::new(
                    cell,
                    index,
                    g_cost,
                    heuristic(cell, self.goal),
                    Some(current.index),
                );
                let _ = self.frontier.insert(node.frontier_key());
                let _ = self.open.insert(index, node);
            }
        }
    }

    fn select_next(&mut self) -> Option<Node> {
        let key = self.frontier.pop_first()?;
        self.open.remove(&key.index)
    }

    /// How the search ended.
    #[must_use]
    pub fn status(&self) -> SearchStatus {
        match self.current {
            Some(node) if node.index == self.goal_index => SearchStatus::Found,
            Some(_) => SearchStatus::Interrupted,
            None => SearchStatus::Unreachable,
        }
    }

    /// Returns `true` when the goal was reached.
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.status() == SearchStatus::Found
    }

    /// Reconstructs the route from start to goal, if one was found.
    #[must_use]
    pub fn path(&self) -> Option<Path> {
        if !self.is_found() {
            return None;
        }

        let mut node = self.current?;
        let mut nodes = vec![node];
        while let Some(parent) = node.parent {
            node = *self.closed.get(&parent)?;
            nodes.push(node);
        }
        nodes.reverse();

        Some(Path::new(nodes))
    }

    /// Cell the search started from.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Cell the search tried to reach.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.goal
    }

    /// Row-major index of the start cell.
    #[must_use]
    pub const fn start_index(&self) -> usize {
        self.start_index
    }

    /// Row-major index of the goal cell.
    #[must_use]
    pub const fn goal_index(&self) -> usize {
        self.goal_index
    }

    /// Node that was about to be expanded when the search stopped.
    ///
    /// This is the goal node after a successful search and `None` when the
    /// goal proved unreachable.
    #[must_use]
    pub const fn current(&self) -> Option<&Node> {
        self.current.as_ref()
    }

    /// Number of nodes expanded, which equals the number of closed cells.
    #[must_use]
    pub const fn expansion_count(&self) -> u32 {
        self.expansion_count
    }

    /// Finalized node stored for the provided cell index.
    #[must_use]
    pub fn closed_node(&self, index: usize) -> Option<&Node> {
        self.closed.get(&index)
    }

    /// Iterates every finalized node in unspecified order.
    pub fn closed_nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.closed.values()
    }

    /// Number of finalized cells.
    #[must_use]
    pub fn closed_len(&self) -> usize {
        self.closed.len()
    }

    /// Frontier node stored for the provided cell index.
    #[must_use]
    pub fn open_node(&self, index: usize) -> Option<&Node> {
        self.open.get(&index)
    }

    /// Iterates every frontier node in unspecified order.
    pub fn open_nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.open.values()
    }

    /// Number of frontier cells.
    #[must_use]
    pub fn open_len(&self) -> usize {
        self.open.len()
    }
}

#[cfg(test)]
mod tests {
    use gridstar_core::BlockRect;

    use super::*;

    fn cells(path: &Path) -> Vec<(u32, u32)> {
        path.cells()
            .map(|cell| (cell.column(), cell.row()))
            .collect()
    }

    #[test]
    fn frontier_prefers_lower_heuristic_on_equal_priority() {
        let near = Node::new(CellCoord::new(5, 0), 5, 30, 10, None);
        let far = Node::new(CellCoord::new(0, 1), 1, 10, 30, None);

        assert_eq!(near.f_cost(), far.f_cost());
        assert!(near.frontier_key() < far.frontier_key());
    }

    #[test]
    fn frontier_falls_back_to_index_order() {
        let first = Node::new(CellCoord::new(1, 0), 1, 10, 30, None);
        let second = Node::new(CellCoord::new(0, 1), 3, 10, 30, None);

        assert!(first.frontier_key() < second.frontier_key());
    }

    #[test]
    fn open_diagonal_is_taken_directly() {
        let grid = Grid::open(3, 3).expect("valid grid");
        let state = find_path(&grid, CellCoord::new(0, 0), CellCoord::new(2, 2));
        let path = state.path().expect("open grid is traversable");

        assert_eq!(cells(&path), vec![(0, 0), (1, 1), (2, 2)]);
        assert_eq!(path.cost(), 28);
        assert_eq!(state.expansion_count(), 2);
    }

    #[test]
    fn relaxation_keeps_cheaper_existing_cost() {
        let grid = Grid::open(3, 3).expect("valid grid");
        let state = find_path(&grid, CellCoord::new(0, 0), CellCoord::new(2, 2));

        // (1,0) was reached straight from the start; the later offer through
        // the diagonal (1,1) costs 24 and must not replace it.
        let top = state
            .open_node(grid.index(CellCoord::new(1, 0)))
            .expect("cell stays on the frontier");
        assert_eq!(top.g_cost(), 10);
        assert_eq!(top.parent(), Some(grid.index(CellCoord::new(0, 0))));
    }

    #[test]
    fn relaxation_reparents_when_a_cheaper_route_appears() {
        let grid = Grid::open(3, 1).expect("valid grid");
        let mut state = SearchState::new(&grid, CellCoord::new(0, 0), CellCoord::new(2, 0));
        let target = CellCoord::new(1, 0);
        let expensive = Node::new(CellCoord::new(0, 0), 0, 30, 20, None);
        let cheap = Node::new(CellCoord::new(2, 0), 2, 0, 0, None);

        state.relax(&grid, &expensive, target, StepKind::Straight);
        state.relax(&grid, &cheap, target, StepKind::Straight);

        let node = state.open_node(1).expect("target joined the frontier");
        assert_eq!(node.g_cost(), 10);
        assert_eq!(node.h_cost(), 10);
        assert_eq!(node.f_cost(), 20);
        assert_eq!(node.parent(), Some(2));
        assert_eq!(state.frontier.len(), 1, "stale frontier entry left behind");
    }

    #[test]
    fn relaxation_ignores_closed_cells() {
        let grid = Grid::open(3, 1).expect("valid grid");
        let mut state = SearchState::new(&grid, CellCoord::new(0, 0), CellCoord::new(2, 0));
        let origin = Node::new(CellCoord::new(0, 0), 0, 0, 20, None);
        let _ = state.closed.insert(1, Node::new(CellCoord::new(1, 0), 1, 50, 10, None));

        state.relax(&grid, &origin, CellCoord::new(1, 0), StepKind::Straight);

        assert!(state.open_node(1).is_none());
        assert_eq!(state.closed_node(1).map(Node::g_cost), Some(50));
    }

    #[test]
    fn expansion_budget_interrupts_search() {
        let grid = Grid::open(3, 3).expect("valid grid");
        let options = SearchOptions {
            max_expansions: Some(1),
        };
        let state = find_path_with(&grid, CellCoord::new(0, 0), CellCoord::new(2, 2), options);

        assert_eq!(state.status(), SearchStatus::Interrupted);
        assert_eq!(state.expansion_count(), 1);
        assert!(state.path().is_none());
    }

    #[test]
    fn sufficient_budget_does_not_change_result() {
        let grid = Grid::open(3, 3).expect("valid grid");
        let options = SearchOptions {
            max_expansions: Some(2),
        };
        let bounded = find_path_with(&grid, CellCoord::new(0, 0), CellCoord::new(2, 2), options);
        let unbounded = find_path(&grid, CellCoord::new(0, 0), CellCoord::new(2, 2));

        assert_eq!(bounded.status(), SearchStatus::Found);
        assert_eq!(bounded.path(), unbounded.path());
    }

    #[test]
    fn open_and_closed_stay_disjoint_at_every_step() {
        let grid = Grid::new(6, 5, [BlockRect::new(2, 1, 3, 3)]).expect("valid grid");
        let start = CellCoord::new(0, 2);
        let goal = CellCoord::new(5, 2);
        let total = find_path(&grid, start, goal).expansion_count();

        for limit in 0..=total {
            let options = SearchOptions {
                max_expansions: Some(limit),
            };
            let state = find_path_with(&grid, start, goal, options);

            assert!(
                state.open_nodes().all(|node| state.closed_node(node.index()).is_none()),
                "open and closed overlap after {limit} expansions"
            );
            assert_eq!(state.closed_len(), state.expansion_count() as usize);
        }
    }
}
