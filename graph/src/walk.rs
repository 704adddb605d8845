//! Breadth-first traversal over selected edge types.

use crate::store::Store;
use ontic_core::{Direction, EdgeTypeId, NodeId};
use std::collections::{HashSet, VecDeque};

/// One edge type/direction pair a walk may follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WalkStep {
    pub edge_type: EdgeTypeId,
    pub direction: Direction,
}

impl WalkStep {
    pub fn new(edge_type: EdgeTypeId, direction: Direction) -> Self {
        Self {
            edge_type,
            direction,
        }
    }
}

/// Where a walk currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkPosition {
    /// The node just reached.
    pub node: NodeId,
    /// Number of edges from the start node.
    pub depth: usize,
    /// The step that reached this node; None at the start node.
    pub via: Option<WalkStep>,
}

impl WalkPosition {
    /// Returns true for the start node.
    pub fn is_start(&self) -> bool {
        self.via.is_none()
    }

    /// Returns true if the last edge followed was `edge_type` in `direction`.
    pub fn arrived_via(&self, edge_type: EdgeTypeId, direction: Direction) -> bool {
        self.via
            .map_or(false, |s| s.edge_type == edge_type && s.direction == direction)
    }
}

impl Store {
    /// Breadth-first walk from `start` following `steps`.
    ///
    /// Each node is visited at most once. `expand` decides whether the walk
    /// continues past a position; `collect` decides whether the position's node
    /// is returned. Results are in visit order.
    pub fn walk<E, C>(
        &self,
        start: NodeId,
        steps: &[WalkStep],
        mut expand: E,
        mut collect: C,
    ) -> Vec<NodeId>
    where
        E: FnMut(&WalkPosition) -> bool,
        C: FnMut(&WalkPosition) -> bool,
    {
        let mut result = Vec::new();
        if !self.contains_node(start) {
            return result;
        }

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back(WalkPosition {
            node: start,
            depth: 0,
            via: None,
        });

        while let Some(pos) = queue.pop_front() {
            if collect(&pos) {
                result.push(pos.node);
            }
            if !expand(&pos) {
                continue;
            }
            for step in steps {
                for next in self.neighbors(pos.node, Some(step.edge_type), step.direction) {
                    if visited.insert(next) {
                        queue.push_back(WalkPosition {
                            node: next,
                            depth: pos.depth + 1,
                            via: Some(*step),
                        });
                    }
                }
            }
        }

        result
    }

    /// Walk `steps` to exhaustion (bounded by `max_depth`) and return every
    /// node reached except the start.
    pub fn reachable(&self, start: NodeId, steps: &[WalkStep], max_depth: usize) -> Vec<NodeId> {
        self.walk(
            start,
            steps,
            |pos| pos.depth < max_depth,
            |pos| !pos.is_start(),
        )
    }
}
