//! Aggregate statistics over a network.
//!
//! Everything here is a pure function of a `Network`: degree distribution,
//! density, isolation count and the bucketed connectivity histogram used
//! by the visualizer legend, plus range and position summaries.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::topology::Network;

/// Number of histogram buckets. Bucket `k < 8` counts nodes with exactly
/// `k` neighbors, the last bucket counts nodes with 8 or more.
pub const HISTOGRAM_BUCKETS: usize = 9;

/// Summary of the communication ranges in a network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeStatistics {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

/// Bounding box of all node positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Statistics computed from a network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub total_nodes: usize,
    /// Undirected edge count.
    pub total_connections: usize,
    /// Mean node degree.
    pub avg_connections: f64,
    /// Edges over `n(n-1)/2`; zero when fewer than two nodes exist.
    pub network_density: f64,
    /// Nodes with no neighbors.
    pub isolated_nodes: usize,
    pub max_connections: usize,
    pub min_connections: usize,
    pub histogram: [usize; HISTOGRAM_BUCKETS],
    /// Exact degree → node count.
    pub connectivity_distribution: BTreeMap<usize, usize>,
    /// `None` for an empty network.
    pub range: Option<RangeStatistics>,
    /// `None` for an empty network.
    pub bounds: Option<PositionBounds>,
}

/// Read-only statistics calculator bound to one network.
pub struct NetworkStatistics<'a> {
    network: &'a Network,
}

impl<'a> NetworkStatistics<'a> {
    pub fn new(network: &'a Network) -> Self {
        NetworkStatistics { network }
    }

    /// Density of an undirected graph with `nodes` vertices and `edges` edges.
    pub fn density(nodes: usize, edges: usize) -> f64 {
        if nodes < 2 {
            return 0.0;
        }
        let max_edges = nodes as f64 * (nodes as f64 - 1.0) / 2.0;
        edges as f64 / max_edges
    }

    /// Histogram bucket for a node degree.
    pub fn bucket(degree: usize) -> usize {
        degree.min(HISTOGRAM_BUCKETS - 1)
    }

    pub fn range_statistics(&self) -> Option<RangeStatistics> {
        if self.network.is_empty() {
            return None;
        }
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for node in self.network.nodes() {
            sum += node.range();
            min = min.min(node.range());
            max = max.max(node.range());
        }
        Some(RangeStatistics {
            avg: sum / self.network.len() as f64,
            min,
            max,
        })
    }

    pub fn position_bounds(&self) -> Option<PositionBounds> {
        let mut nodes = self.network.nodes();
        let first = nodes.next()?.position();
        let mut bounds = PositionBounds {
            x_min: first.x,
            x_max: first.x,
            y_min: first.y,
            y_max: first.y,
        };
        for node in nodes {
            let p = node.position();
            bounds.x_min = bounds.x_min.min(p.x);
            bounds.x_max = bounds.x_max.max(p.x);
            bounds.y_min = bounds.y_min.min(p.y);
            bounds.y_max = bounds.y_max.max(p.y);
        }
        Some(bounds)
    }

    /// Compute the full report.
    ///
    /// An empty network yields zero for every counter.
    pub fn report(&self) -> StatisticsReport {
        let total_nodes = self.network.len();
        let total_connections = self.network.connection_count();

        let mut histogram = [0usize; HISTOGRAM_BUCKETS];
        let mut distribution: BTreeMap<usize, usize> = BTreeMap::new();
        let mut degree_sum = 0usize;
        let mut isolated_nodes = 0usize;
        let mut max_connections = 0usize;
        let mut min_connections = usize::MAX;

        for node in self.network.nodes() {
            let degree = node.degree();
            degree_sum += degree;
            histogram[Self::bucket(degree)] += 1;
            *distribution.entry(degree).or_insert(0) += 1;
            if degree == 0 {
                isolated_nodes += 1;
            }
            max_connections = max_connections.max(degree);
            min_connections = min_connections.min(degree);
        }

        let avg_connections = if total_nodes > 0 { degree_sum as f64 / total_nodes as f64 } else { 0.0 };

        StatisticsReport {
            total_nodes,
            total_connections,
            avg_connections,
            network_density: Self::density(total_nodes, total_connections),
            isolated_nodes,
            max_connections,
            min_connections: if total_nodes > 0 { min_connections } else { 0 },
            histogram,
            connectivity_distribution: distribution,
            range: self.range_statistics(),
            bounds: self.position_bounds(),
        }
    }
}

/// Compute the statistics report of a network.
pub fn compute_statistics(network: &Network) -> StatisticsReport {
    NetworkStatistics::new(network).report()
}
