//! The network: nodes keyed by id plus their derived adjacency.
//!
//! All mutation goes through `Network` so the neighbor sets can never
//! drift from positions and ranges: adding, removing, moving or re-ranging
//! a node triggers a full connectivity recomputation before returning.

use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use super::connectivity::{ConnectivityEngine, ConnectivityRule};
use super::identity::NodeId;
use super::node::{Node, Point};
use super::snapshot::{NetworkSnapshot, NodeRecord};
use crate::error::{NetworkError, Result, Violation};

/// A set of nodes and the symmetric neighbor relation between them.
#[derive(Debug, Clone, Default)]
pub struct Network {
    nodes: BTreeMap<NodeId, Node>,
    engine: ConnectivityEngine,
}

/// Reject coordinates and ranges that would poison distance comparisons.
fn check_placement(position: &Point, range: f64) -> Result<()> {
    if !position.x.is_finite() || !position.y.is_finite() {
        return Err(NetworkError::InvalidParameter(format!(
            "position ({}, {}) must be finite",
            position.x, position.y
        )));
    }
    if !range.is_finite() {
        return Err(NetworkError::InvalidParameter(format!("communication range must be finite, got {}", range)));
    }
    Ok(())
}

impl Network {
    /// Create an empty network using the default connectivity rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty network with a specific connectivity rule.
    pub fn with_rule(rule: ConnectivityRule) -> Self {
        Network {
            nodes: BTreeMap::new(),
            engine: ConnectivityEngine::new(rule),
        }
    }

    /// Build a network from a batch of nodes, computing connectivity once.
    ///
    /// Any neighbor sets carried by the input nodes are discarded.
    ///
    /// # Parameters
    ///
    /// * `nodes` - The nodes to place
    /// * `rule` - Connectivity rule for this network
    ///
    /// # Returns
    ///
    /// The connected network, or `InvalidParameter` on duplicate ids or
    /// non-finite placements.
    pub fn from_nodes<I>(nodes: I, rule: ConnectivityRule) -> Result<Self>
    where
        I: IntoIterator<Item = Node>,
    {
        let mut network = Network::with_rule(rule);
        for node in nodes {
            network.insert_unconnected(node)?;
        }
        network.recompute_connectivity();
        Ok(network)
    }

    pub fn rule(&self) -> ConnectivityRule {
        self.engine.rule()
    }

    fn insert_unconnected(&mut self, node: Node) -> Result<()> {
        check_placement(&node.position(), node.range())?;
        if self.nodes.contains_key(&node.id()) {
            return Err(NetworkError::InvalidParameter(format!("duplicate node identifier {}", node.id())));
        }
        self.nodes.insert(node.id(), node);
        Ok(())
    }

    /// Rebuild every neighbor set from current positions and ranges.
    ///
    /// Returns the number of undirected edges.
    pub fn recompute_connectivity(&mut self) -> usize {
        self.engine.recompute(&mut self.nodes)
    }

    /// Add a node and recompute connectivity.
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        self.insert_unconnected(node)?;
        self.recompute_connectivity();
        Ok(())
    }

    /// Place a new node with a freshly generated identity.
    ///
    /// # Parameters
    ///
    /// * `position` - Where to place the node
    /// * `range` - Communication range of the node
    /// * `rng` - Source of randomness for the identity
    ///
    /// # Returns
    ///
    /// The identifier assigned to the new node.
    pub fn insert_node<R: Rng + ?Sized>(&mut self, position: Point, range: f64, rng: &mut R) -> Result<NodeId> {
        let id = NodeId::generate(rng, |candidate| self.nodes.contains_key(&candidate))?;
        self.add_node(Node::new(id, position, range))?;
        Ok(id)
    }

    /// Remove a node and recompute connectivity.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node> {
        let mut removed = self.nodes.remove(&id).ok_or(NetworkError::NotFound(id))?;
        removed.neighbors_mut().clear();
        self.recompute_connectivity();
        Ok(removed)
    }

    /// Move a node and recompute connectivity.
    pub fn move_node(&mut self, id: NodeId, position: Point) -> Result<()> {
        let node = self.nodes.get_mut(&id).ok_or(NetworkError::NotFound(id))?;
        check_placement(&position, node.range())?;
        node.set_position(position);
        self.recompute_connectivity();
        Ok(())
    }

    /// Change a node's communication range and recompute connectivity.
    pub fn set_range(&mut self, id: NodeId, range: f64) -> Result<()> {
        let node = self.nodes.get_mut(&id).ok_or(NetworkError::NotFound(id))?;
        check_placement(&node.position(), range)?;
        node.set_range(range);
        self.recompute_connectivity();
        Ok(())
    }

    pub fn get_node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(NetworkError::NotFound(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Read-only view of a node's neighbors.
    pub fn neighbors(&self, id: NodeId) -> Result<&BTreeSet<NodeId>> {
        self.get_node(id).map(Node::neighbors)
    }

    /// All nodes in identifier order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every undirected edge exactly once, as `(a, b)` with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes
            .values()
            .flat_map(|node| node.neighbors().iter().filter(move |&&other| node.id() < other).map(move |&other| (node.id(), other)))
    }

    /// Number of undirected edges.
    pub fn connection_count(&self) -> usize {
        self.nodes.values().map(Node::degree).sum::<usize>() / 2
    }

    /// Euclidean distance between two nodes of the network.
    pub fn edge_length(&self, a: NodeId, b: NodeId) -> Result<f64> {
        Ok(self.get_node(a)?.distance_to(self.get_node(b)?))
    }

    fn structural_violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        for node in self.nodes.values() {
            for &other in node.neighbors() {
                if other == node.id() {
                    violations.push(Violation::SelfLoop(other));
                    continue;
                }
                match self.nodes.get(&other) {
                    None => violations.push(Violation::Dangling { from: node.id(), to: other }),
                    Some(peer) if !peer.is_neighbor(node.id()) => violations.push(Violation::Asymmetric { from: node.id(), to: other }),
                    Some(_) => {}
                }
            }
        }
        violations
    }

    /// Check symmetry and reference integrity of the neighbor relation.
    ///
    /// Every problem found is reported, not just the first one.
    pub fn validate(&self) -> Result<()> {
        let violations = self.structural_violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(NetworkError::InvariantViolation(violations))
        }
    }

    /// Produce the serializable form of this network.
    pub fn to_snapshot(&self) -> NetworkSnapshot {
        let nodes = self
            .nodes
            .values()
            .map(|node| NodeRecord {
                eui64: node.id().to_string(),
                x: node.position().x,
                y: node.position().y,
                communication_range: node.range(),
                neighbors: node.neighbors().iter().map(NodeId::to_string).collect(),
            })
            .collect();

        NetworkSnapshot {
            nodes,
            total_nodes: self.len(),
            total_connections: self.connection_count(),
        }
    }

    /// Rebuild a network from an untrusted snapshot using the default rule.
    ///
    /// Neighbor lists are installed exactly as stored and then validated.
    /// A neighbor listed twice is reported, not merged. Nothing is silently
    /// repaired; callers who want connectivity derived
    /// from positions instead can call `recompute_connectivity` afterwards.
    ///
    /// # Parameters
    ///
    /// * `snapshot` - The decoded snapshot
    ///
    /// # Returns
    ///
    /// The network, `InvalidParameter` for malformed or duplicate ids, or
    /// `InvariantViolation` listing every broken invariant.
    pub fn from_snapshot(snapshot: &NetworkSnapshot) -> Result<Self> {
        Self::from_snapshot_with_rule(snapshot, ConnectivityRule::default())
    }

    /// Same as `from_snapshot`, with an explicit rule for later mutations.
    pub fn from_snapshot_with_rule(snapshot: &NetworkSnapshot, rule: ConnectivityRule) -> Result<Self> {
        let mut network = Network::with_rule(rule);

        for record in &snapshot.nodes {
            let id: NodeId = record.eui64.parse()?;
            network.insert_unconnected(Node::new(id, Point::new(record.x, record.y), record.communication_range))?;
        }

        let mut violations = Vec::new();
        for record in &snapshot.nodes {
            let id: NodeId = record.eui64.parse()?;
            let mut neighbors = BTreeSet::new();
            for entry in &record.neighbors {
                let neighbor: NodeId = entry.parse()?;
                if !neighbors.insert(neighbor) {
                    violations.push(Violation::DuplicateNeighbor { node: id, neighbor });
                }
            }
            if let Some(node) = network.nodes.get_mut(&id) {
                *node.neighbors_mut() = neighbors;
            }
        }

        violations.extend(network.structural_violations());
        if snapshot.total_nodes != network.len() {
            violations.push(Violation::NodeCountMismatch {
                declared: snapshot.total_nodes,
                actual: network.len(),
            });
        }
        if violations.is_empty() && snapshot.total_connections != network.connection_count() {
            violations.push(Violation::ConnectionCountMismatch {
                declared: snapshot.total_connections,
                actual: network.connection_count(),
            });
        }

        if !violations.is_empty() {
            log::warn!("Rejected network snapshot with {} invariant violations", violations.len());
            return Err(NetworkError::InvariantViolation(violations));
        }

        log::info!("Loaded network: {} nodes, {} connections", network.len(), network.connection_count());
        Ok(network)
    }

    /// Write the network to a JSON snapshot file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.to_snapshot().write_to_file(path)?;
        log::info!("Network saved to {}", path.display());
        Ok(())
    }

    /// Load and validate a network from a JSON snapshot file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let snapshot = NetworkSnapshot::read_from_file(path)?;
        Self::from_snapshot(&snapshot)
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Network({} nodes, {} connections)", self.len(), self.connection_count())
    }
}
