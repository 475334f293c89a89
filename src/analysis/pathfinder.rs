//! Shortest-path search over the connectivity graph.
//!
//! Graph edges are exactly the network's neighbor relation. The default
//! objective minimizes the summed Euclidean length of the path; the
//! hop-count objective treats every edge as weight one. Whatever the
//! objective, a result always reports both the hop count and the true
//! Euclidean length of the returned path.
//!
//! The search is Dijkstra over a binary heap with lazy deletion. Heap
//! entries are ordered by cost, then by node id, so equal-cost paths are
//! resolved the same way on every run.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::error::Result;
use crate::topology::{Network, NodeId};

/// What a shortest path minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathObjective {
    /// Minimize the summed Euclidean edge length.
    #[default]
    Distance,
    /// Minimize the number of edges.
    HopCount,
}

/// Outcome of a point-to-point query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    pub source: NodeId,
    pub destination: NodeId,
    pub reachable: bool,
    /// Node ids from source to destination; empty when unreachable.
    pub path: Vec<NodeId>,
    /// Edges traversed; zero when unreachable.
    pub hop_count: usize,
    /// Summed Euclidean length of `path`; zero when unreachable.
    pub distance: f64,
}

impl PathResult {
    fn unreachable(source: NodeId, destination: NodeId) -> Self {
        PathResult {
            source,
            destination,
            reachable: false,
            path: Vec::new(),
            hop_count: 0,
            distance: 0.0,
        }
    }
}

/// Heap entry. `Ord` is reversed so `BinaryHeap` pops the cheapest entry.
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    cost: f64,
    node: NodeId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost).then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Costs and predecessors of every node reached from one source.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    source: NodeId,
    costs: HashMap<NodeId, f64>,
    previous: HashMap<NodeId, NodeId>,
}

impl ShortestPathTree {
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Objective cost of the best path to `node`, if it was reached.
    pub fn cost_to(&self, node: NodeId) -> Option<f64> {
        self.costs.get(&node).copied()
    }

    /// Predecessor of `node` on its best path.
    pub fn previous(&self, node: NodeId) -> Option<NodeId> {
        self.previous.get(&node).copied()
    }

    /// Number of nodes reached, the source included.
    pub fn reachable_count(&self) -> usize {
        self.costs.len()
    }

    /// Table rows for every node of `network`, in id order.
    pub fn entries(&self, network: &Network) -> Vec<PathEntry> {
        network
            .node_ids()
            .map(|id| PathEntry {
                eui64: id,
                distance: self.cost_to(id),
                previous: self.previous(id),
            })
            .collect()
    }

    /// Walk predecessors back from `destination`.
    ///
    /// # Returns
    ///
    /// The node sequence from the source to `destination`, or `None` if
    /// `destination` was not reached.
    pub fn path_to(&self, destination: NodeId) -> Option<Vec<NodeId>> {
        if !self.costs.contains_key(&destination) {
            return None;
        }
        let mut path = vec![destination];
        let mut current = destination;
        while let Some(&prev) = self.previous.get(&current) {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        Some(path)
    }
}

/// One row of a path table: the best cost to `eui64` and its predecessor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathEntry {
    pub eui64: NodeId,
    /// Objective cost from the source; `None` when unreachable.
    pub distance: Option<f64>,
    /// `None` for the source itself and for unreachable nodes.
    pub previous: Option<NodeId>,
}

/// Best paths from one source to every node of the network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourcePaths {
    pub source: NodeId,
    pub paths: Vec<PathEntry>,
}

/// Shortest-path queries against one network.
pub struct PathFinder<'a> {
    network: &'a Network,
    objective: PathObjective,
}

impl<'a> PathFinder<'a> {
    pub fn new(network: &'a Network) -> Self {
        PathFinder {
            network,
            objective: PathObjective::default(),
        }
    }

    pub fn with_objective(mut self, objective: PathObjective) -> Self {
        self.objective = objective;
        self
    }

    pub fn objective(&self) -> PathObjective {
        self.objective
    }

    fn edge_cost(&self, length: f64) -> f64 {
        match self.objective {
            PathObjective::Distance => length,
            PathObjective::HopCount => 1.0,
        }
    }

    /// Dijkstra from `source`, stopping early once `target` is settled.
    fn search(&self, source: NodeId, target: Option<NodeId>) -> Result<ShortestPathTree> {
        let source_node = self.network.get_node(source)?;

        let mut costs: HashMap<NodeId, f64> = HashMap::new();
        let mut previous: HashMap<NodeId, NodeId> = HashMap::new();
        let mut settled: HashSet<NodeId> = HashSet::new();
        let mut queue = BinaryHeap::new();

        costs.insert(source, 0.0);
        queue.push(QueueEntry { cost: 0.0, node: source });

        while let Some(QueueEntry { cost, node }) = queue.pop() {
            if !settled.insert(node) {
                continue;
            }
            if target == Some(node) {
                break;
            }

            let current = if node == source { source_node } else { self.network.get_node(node)? };
            for &neighbor_id in current.neighbors() {
                if settled.contains(&neighbor_id) {
                    continue;
                }
                let Ok(neighbor) = self.network.get_node(neighbor_id) else {
                    log::warn!("Skipping dangling neighbor {} of {}", neighbor_id, node);
                    continue;
                };
                let next_cost = cost + self.edge_cost(current.distance_to(neighbor));
                let improves = costs.get(&neighbor_id).is_none_or(|&known| next_cost < known);
                if improves {
                    costs.insert(neighbor_id, next_cost);
                    previous.insert(neighbor_id, node);
                    queue.push(QueueEntry {
                        cost: next_cost,
                        node: neighbor_id,
                    });
                }
            }
        }

        Ok(ShortestPathTree { source, costs, previous })
    }

    /// Best paths from `source` to every reachable node.
    pub fn shortest_path_tree(&self, source: NodeId) -> Result<ShortestPathTree> {
        self.search(source, None)
    }

    /// Run the search from every node, in id order.
    ///
    /// Progress is logged at info level every tenth of the sources.
    pub fn all_shortest_path_trees(&self) -> Result<Vec<ShortestPathTree>> {
        let total = self.network.len();
        let step = (total / 10).max(1);
        let mut trees = Vec::with_capacity(total);
        for (index, source) in self.network.node_ids().enumerate() {
            trees.push(self.shortest_path_tree(source)?);
            if (index + 1) % step == 0 {
                log::info!("Progress: {:.1}%", (index + 1) as f64 / total as f64 * 100.0);
            }
        }
        Ok(trees)
    }

    /// Costs and predecessors from every source to every node.
    pub fn path_table(&self) -> Result<Vec<SourcePaths>> {
        let table = self
            .all_shortest_path_trees()?
            .iter()
            .map(|tree| SourcePaths {
                source: tree.source(),
                paths: tree.entries(self.network),
            })
            .collect();
        Ok(table)
    }

    /// Find the best path between two nodes.
    ///
    /// # Parameters
    ///
    /// * `source` - Start node
    /// * `destination` - End node
    ///
    /// # Returns
    ///
    /// A `PathResult`; an unreachable destination is a normal result with
    /// `reachable == false`. Fails with `NotFound` if either id is unknown.
    pub fn find_path(&self, source: NodeId, destination: NodeId) -> Result<PathResult> {
        self.network.get_node(source)?;
        self.network.get_node(destination)?;

        if source == destination {
            return Ok(PathResult {
                source,
                destination,
                reachable: true,
                path: vec![source],
                hop_count: 0,
                distance: 0.0,
            });
        }

        let tree = self.search(source, Some(destination))?;
        let Some(path) = tree.path_to(destination) else {
            log::debug!("No path from {} to {}", source, destination);
            return Ok(PathResult::unreachable(source, destination));
        };

        let mut distance = 0.0;
        for pair in path.windows(2) {
            distance += self.network.edge_length(pair[0], pair[1])?;
        }

        log::debug!("Path from {} to {}: {} hops, distance {:.2}", source, destination, path.len() - 1, distance);
        Ok(PathResult {
            source,
            destination,
            reachable: true,
            hop_count: path.len() - 1,
            path,
            distance,
        })
    }
}

/// Find the minimum-distance path between two nodes of `network`.
pub fn find_path(network: &Network, source: NodeId, destination: NodeId) -> Result<PathResult> {
    PathFinder::new(network).find_path(source, destination)
}
