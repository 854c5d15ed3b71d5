//! Route reconstructed from a finished search.

use std::collections::HashMap;

use gridstar_core::CellCoord;

use crate::Node;

/// Ordered chain of nodes from the start cell to the goal cell.
///
/// A path always holds at least one node; when start and goal coincide it is
/// just the start with zero cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    nodes: Vec<Node>,
    positions: HashMap<usize, usize>,
}

impl Path {
    pub(crate) fn new(nodes: Vec<Node>) -> Self {
        let positions = nodes
            .iter()
            .enumerate()
            .map(|(position, node)| (node.index(), position))
            .collect();

        Self { nodes, positions }
    }

    /// Nodes along the route, start first.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Cells along the route, start first.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.nodes.iter().map(Node::cell)
    }

    /// Number of cells on the route, including both endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` when the path holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total cost of the route, the goal node's accumulated cost.
    #[must_use]
    pub fn cost(&self) -> u32 {
        self.nodes.last().map_or(0, Node::g_cost)
    }

    /// Returns `true` when the route passes through the cell at `index`.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.positions.contains_key(&index)
    }

    /// Node on the route for the cell at `index`, if the route visits it.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.positions
            .get(&index)
            .and_then(|&position| self.nodes.get(position))
    }
}
