//! Adjacency index kept alongside each stored node.
//!
//! Edge lists preserve insertion order. The schema layer relies on this for
//! "declaration order" (direct supertypes, declared properties), so removal
//! reports the position it removed from and restoration puts the edge back
//! at exactly that position.

use ontic_core::{Direction, EdgeId};

/// Ordered outgoing and incoming edge lists for one node.
#[derive(Debug, Default, Clone)]
pub struct Adjacency {
    outgoing: Vec<EdgeId>,
    incoming: Vec<EdgeId>,
}

impl Adjacency {
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&self, direction: Direction) -> &Vec<EdgeId> {
        match direction {
            Direction::Incoming => &self.incoming,
            _ => &self.outgoing,
        }
    }

    fn list_mut(&mut self, direction: Direction) -> &mut Vec<EdgeId> {
        match direction {
            Direction::Incoming => &mut self.incoming,
            _ => &mut self.outgoing,
        }
    }

    /// Append an edge at the end of the list for `direction`.
    pub fn push(&mut self, direction: Direction, edge: EdgeId) {
        self.list_mut(direction).push(edge);
    }

    /// Remove an edge, returning the position it occupied.
    pub fn remove(&mut self, direction: Direction, edge: EdgeId) -> Option<usize> {
        let list = self.list_mut(direction);
        let pos = list.iter().position(|e| *e == edge)?;
        list.remove(pos);
        Some(pos)
    }

    /// Reinsert an edge at a previously reported position.
    pub fn restore(&mut self, direction: Direction, edge: EdgeId, pos: usize) {
        let list = self.list_mut(direction);
        let pos = pos.min(list.len());
        list.insert(pos, edge);
    }

    /// Edges in `direction`. `Both` yields outgoing first, then incoming.
    pub fn edges(&self, direction: Direction) -> impl Iterator<Item = EdgeId> + '_ {
        let (first, second): (&[EdgeId], &[EdgeId]) = match direction {
            Direction::Both => (&self.outgoing, &self.incoming),
            other => (self.list(other), &[]),
        };
        first.iter().chain(second.iter()).copied()
    }

    /// Total number of incident edges.
    pub fn degree(&self) -> usize {
        self.outgoing.len() + self.incoming.len()
    }
}
