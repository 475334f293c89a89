//! Node and position types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::geometry::distance;
use super::identity::NodeId;

/// Simple 2D point in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// A simulated device with a position and a communication range.
///
/// The neighbor set is derived data. It is only written by the
/// connectivity engine (or the snapshot loader) and is exposed read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    position: Point,
    range: f64,
    neighbors: BTreeSet<NodeId>,
}

impl Node {
    /// Create a node with no neighbors. Connectivity is established once
    /// the node is added to a `Network`.
    pub fn new(id: NodeId, position: Point, range: f64) -> Self {
        Node {
            id,
            position,
            range,
            neighbors: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Maximum distance at which this node can initiate or accept a link.
    pub fn range(&self) -> f64 {
        self.range
    }

    /// Ids of the nodes currently linked to this one.
    pub fn neighbors(&self) -> &BTreeSet<NodeId> {
        &self.neighbors
    }

    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_neighbor(&self, other: NodeId) -> bool {
        self.neighbors.contains(&other)
    }

    /// Euclidean distance to another node.
    pub fn distance_to(&self, other: &Node) -> f64 {
        distance(&self.position, &other.position)
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub(crate) fn set_range(&mut self, range: f64) {
        self.range = range;
    }

    pub(crate) fn neighbors_mut(&mut self) -> &mut BTreeSet<NodeId> {
        &mut self.neighbors
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Node({}, pos=({:.1}, {:.1}), range={:.1}, neighbors={})",
            self.id,
            self.position.x,
            self.position.y,
            self.range,
            self.neighbors.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_has_no_neighbors() {
        let node = Node::new(NodeId::from_raw(0x0200_0000_0000_0001), Point::new(1.0, 2.0), 10.0);
        assert_eq!(node.degree(), 0);
        assert_eq!(node.position(), Point::new(1.0, 2.0));
        assert_eq!(node.range(), 10.0);
    }

    #[test]
    fn display_is_compact() {
        let node = Node::new(NodeId::from_raw(0x0200_0000_0000_0001), Point::new(1.5, 2.0), 10.0);
        assert_eq!(node.to_string(), "Node(02-00-00-00-00-00-00-01, pos=(1.5, 2.0), range=10.0, neighbors=0)");
    }
}
