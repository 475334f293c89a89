//! Symmetric neighbor computation.
//!
//! The engine evaluates every unordered pair of nodes exactly once and
//! writes the outcome to both endpoints, so the resulting relation is
//! symmetric by construction. Each recomputation starts from empty
//! neighbor sets.
//!
//! The pair scan is quadratic in the node count. That is fine for the few
//! hundred nodes this crate targets; a spatial index could replace the
//! scan as long as `ConnectivityRule::links` stays the decision function.

use serde::Deserialize;
use std::collections::BTreeMap;

use super::geometry::within_range;
use super::identity::NodeId;
use super::node::Node;

/// Distance-threshold predicate deciding whether two nodes are linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectivityRule {
    /// Linked when `distance <= max(range_a, range_b)`: either party
    /// having enough range is sufficient.
    #[default]
    EitherInRange,
    /// Linked when `distance <= min(range_a, range_b)`: both parties must
    /// reach each other.
    MutualRange,
}

impl ConnectivityRule {
    /// Decide whether `a` and `b` are linked under this rule.
    ///
    /// The predicate is symmetric in its arguments. A node never links to
    /// itself.
    pub fn links(self, a: &Node, b: &Node) -> bool {
        if a.id() == b.id() {
            return false;
        }
        let threshold = match self {
            ConnectivityRule::EitherInRange => a.range().max(b.range()),
            ConnectivityRule::MutualRange => a.range().min(b.range()),
        };
        within_range(&a.position(), &b.position(), threshold)
    }
}

/// Computes the neighbor relation over a node collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectivityEngine {
    rule: ConnectivityRule,
}

impl ConnectivityEngine {
    pub fn new(rule: ConnectivityRule) -> Self {
        ConnectivityEngine { rule }
    }

    pub fn rule(&self) -> ConnectivityRule {
        self.rule
    }

    /// True if the two nodes satisfy the engine's rule.
    pub fn is_linked(&self, a: &Node, b: &Node) -> bool {
        self.rule.links(a, b)
    }

    /// Replace every node's neighbor set with the links implied by the rule.
    ///
    /// # Parameters
    ///
    /// * `nodes` - All nodes of the network, keyed by id
    ///
    /// # Returns
    ///
    /// The number of undirected edges created.
    pub fn recompute(&self, nodes: &mut BTreeMap<NodeId, Node>) -> usize {
        for node in nodes.values_mut() {
            node.neighbors_mut().clear();
        }

        let links = {
            let ordered: Vec<&Node> = nodes.values().collect();
            let mut links: Vec<(NodeId, NodeId)> = Vec::new();
            for (i, a) in ordered.iter().enumerate() {
                for b in &ordered[i + 1..] {
                    if self.rule.links(a, b) {
                        links.push((a.id(), b.id()));
                    }
                }
            }
            links
        };

        for &(a, b) in &links {
            if let Some(node) = nodes.get_mut(&a) {
                node.neighbors_mut().insert(b);
            }
            if let Some(node) = nodes.get_mut(&b) {
                node.neighbors_mut().insert(a);
            }
        }

        log::debug!("Connectivity recomputed: {} nodes, {} links ({:?})", nodes.len(), links.len(), self.rule);
        links.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::node::Point;

    fn node(raw: u64, x: f64, y: f64, range: f64) -> Node {
        Node::new(NodeId::from_raw(raw), Point::new(x, y), range)
    }

    fn map(nodes: Vec<Node>) -> BTreeMap<NodeId, Node> {
        nodes.into_iter().map(|n| (n.id(), n)).collect()
    }

    #[test]
    fn either_in_range_uses_the_larger_range() {
        let a = node(1, 0.0, 0.0, 10.0);
        let b = node(2, 30.0, 0.0, 40.0);
        assert!(ConnectivityRule::EitherInRange.links(&a, &b));
        assert!(ConnectivityRule::EitherInRange.links(&b, &a));
        assert!(!ConnectivityRule::MutualRange.links(&a, &b));
    }

    #[test]
    fn node_never_links_to_itself() {
        let a = node(1, 0.0, 0.0, 10.0);
        assert!(!ConnectivityRule::EitherInRange.links(&a, &a));
    }

    #[test]
    fn recompute_is_symmetric_and_counts_edges() {
        let mut nodes = map(vec![
            node(1, 0.0, 0.0, 60.0),
            node(2, 50.0, 0.0, 60.0),
            node(3, 100.0, 0.0, 60.0),
            node(4, 0.0, 100.0, 60.0),
        ]);
        let edges = ConnectivityEngine::default().recompute(&mut nodes);
        assert_eq!(edges, 2);

        for a in nodes.values() {
            for b in a.neighbors() {
                assert!(nodes[b].is_neighbor(a.id()));
            }
        }
        assert_eq!(nodes[&NodeId::from_raw(2)].degree(), 2);
        assert_eq!(nodes[&NodeId::from_raw(4)].degree(), 0);
    }

    #[test]
    fn recompute_replaces_stale_neighbors() {
        let mut nodes = map(vec![node(1, 0.0, 0.0, 10.0), node(2, 5.0, 0.0, 10.0)]);
        let engine = ConnectivityEngine::default();
        assert_eq!(engine.recompute(&mut nodes), 1);

        nodes.get_mut(&NodeId::from_raw(2)).unwrap().set_position(Point::new(500.0, 0.0));
        assert_eq!(engine.recompute(&mut nodes), 0);
        assert!(nodes.values().all(|n| n.neighbors().is_empty()));
    }

    #[test]
    fn non_positive_range_is_covered_by_the_peer() {
        let mut nodes = map(vec![node(1, 0.0, 0.0, 0.0), node(2, 5.0, 0.0, 10.0), node(3, 100.0, 0.0, -3.0)]);
        let edges = ConnectivityEngine::default().recompute(&mut nodes);
        assert_eq!(edges, 1);
        assert!(nodes[&NodeId::from_raw(1)].is_neighbor(NodeId::from_raw(2)));
        assert!(nodes[&NodeId::from_raw(3)].neighbors().is_empty());
    }
}
