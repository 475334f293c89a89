//! Random network generation.
//!
//! Nodes are scattered uniformly over a `width × height` area and given a
//! range drawn uniformly from `[0.3 · max_range, max_range]`. A single
//! ChaCha8 stream drives positions, ranges and identities, so a seeded run
//! reproduces the exact same network, ids included.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Uniform};
use serde::Deserialize;
use std::collections::HashSet;

use super::connectivity::ConnectivityRule;
use super::identity::NodeId;
use super::network::Network;
use super::node::{Node, Point};
use crate::error::{NetworkError, Result};

/// Lower bound of a generated range, as a fraction of `max_range`.
pub const MIN_RANGE_FRACTION: f64 = 0.3;

/// Largest accepted map dimension or communication range.
pub const MAX_EXTENT: f64 = 1.0e12;

/// Progress is logged every this many nodes.
const PROGRESS_STEP: usize = 100;

/// Parameters of a generated network.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneratorParams {
    /// Number of nodes to place.
    pub node_count: usize,
    /// Width of the map in world units.
    pub width: f64,
    /// Height of the map in world units.
    pub height: f64,
    /// Upper bound of the per-node communication range.
    pub max_range: f64,
    /// Seed for a reproducible network; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        GeneratorParams {
            node_count: 100,
            width: 1000.0,
            height: 1000.0,
            max_range: 150.0,
            seed: None,
        }
    }
}

impl GeneratorParams {
    /// Check that every parameter is usable.
    ///
    /// # Returns
    ///
    /// `Ok(())` if validation passes, `InvalidParameter` describing the first
    /// offending value otherwise.
    pub fn validate(&self) -> Result<()> {
        if self.node_count == 0 {
            return Err(NetworkError::InvalidParameter("node count must be positive".to_string()));
        }
        for (name, value) in [("width", self.width), ("height", self.height), ("max_range", self.max_range)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(NetworkError::InvalidParameter(format!("{} must be a positive number, got {}", name, value)));
            }
            if value > MAX_EXTENT {
                return Err(NetworkError::InvalidParameter(format!("{} must not exceed {}, got {}", name, MAX_EXTENT, value)));
            }
        }
        Ok(())
    }
}

/// Builds random networks from a fixed set of parameters.
#[derive(Debug, Clone)]
pub struct NetworkGenerator {
    params: GeneratorParams,
    rule: ConnectivityRule,
}

impl NetworkGenerator {
    pub fn new(params: GeneratorParams) -> Self {
        NetworkGenerator {
            params,
            rule: ConnectivityRule::default(),
        }
    }

    /// Use a different connectivity rule for the generated network.
    pub fn with_rule(mut self, rule: ConnectivityRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn params(&self) -> &GeneratorParams {
        &self.params
    }

    /// Generate a network.
    ///
    /// Connectivity is computed once, after every node has been placed.
    ///
    /// # Returns
    ///
    /// The generated network, or `InvalidParameter` if the parameters are
    /// not usable.
    pub fn generate(&self) -> Result<Network> {
        let params = &self.params;
        params.validate()?;

        let mut rng = match params.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        log::info!(
            "Generating {} nodes on a {} x {} map, range up to {}",
            params.node_count,
            params.width,
            params.height,
            params.max_range
        );

        let x_dist = Uniform::new_inclusive(0.0, params.width);
        let y_dist = Uniform::new_inclusive(0.0, params.height);
        let range_dist = Uniform::new_inclusive(params.max_range * MIN_RANGE_FRACTION, params.max_range);

        let mut taken: HashSet<NodeId> = HashSet::with_capacity(params.node_count);
        let mut nodes = Vec::with_capacity(params.node_count);
        for i in 0..params.node_count {
            let position = Point::new(x_dist.sample(&mut rng), y_dist.sample(&mut rng));
            let range = range_dist.sample(&mut rng);
            let id = NodeId::generate(&mut rng, |candidate| taken.contains(&candidate))?;
            taken.insert(id);
            nodes.push(Node::new(id, position, range));

            if (i + 1) % PROGRESS_STEP == 0 || i + 1 == params.node_count {
                log::debug!("Generated {}/{} nodes", i + 1, params.node_count);
            }
        }

        let network = Network::from_nodes(nodes, self.rule)?;
        log::info!("Generated network: {} nodes, {} connections", network.len(), network.connection_count());
        Ok(network)
    }
}

/// Generate a network with the default connectivity rule.
///
/// # Parameters
///
/// * `node_count` - Number of nodes
/// * `width` - Width of the map
/// * `height` - Height of the map
/// * `max_range` - Upper bound of the communication range
/// * `seed` - Optional seed for a reproducible result
pub fn generate(node_count: usize, width: f64, height: f64, max_range: f64, seed: Option<u64>) -> Result<Network> {
    NetworkGenerator::new(GeneratorParams {
        node_count,
        width,
        height,
        max_range,
        seed,
    })
    .generate()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placements(network: &Network) -> Vec<(f64, f64, f64)> {
        let mut values: Vec<(f64, f64, f64)> = network.nodes().map(|n| (n.position().x, n.position().y, n.range())).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        values
    }

    #[test]
    fn rejects_invalid_parameters() {
        let cases = [
            (0, 100.0, 100.0, 50.0),
            (5, 0.0, 100.0, 50.0),
            (5, 100.0, -1.0, 50.0),
            (5, 100.0, 100.0, 0.0),
            (5, f64::NAN, 100.0, 50.0),
            (5, 100.0, 100.0, f64::INFINITY),
        ];
        for (n, w, h, r) in cases {
            assert!(matches!(generate(n, w, h, r, Some(1)), Err(NetworkError::InvalidParameter(_))), "{n} {w} {h} {r}");
        }
    }

    #[test]
    fn oversized_extents_are_rejected_instead_of_panicking() {
        let cases = [
            (f64::MAX, 100.0, 50.0),
            (100.0, f64::MAX, 50.0),
            (100.0, 100.0, f64::MAX),
            (MAX_EXTENT * 2.0, 100.0, 50.0),
        ];
        for (w, h, r) in cases {
            assert!(matches!(generate(3, w, h, r, Some(1)), Err(NetworkError::InvalidParameter(_))), "{w} {h} {r}");
        }

        let network = generate(3, MAX_EXTENT, MAX_EXTENT, MAX_EXTENT, Some(1)).unwrap();
        assert_eq!(network.len(), 3);
        for node in network.nodes() {
            assert!(node.position().x <= MAX_EXTENT && node.position().y <= MAX_EXTENT);
            assert!(node.range() <= MAX_EXTENT);
        }
    }

    #[test]
    fn places_nodes_inside_bounds_with_bounded_ranges() {
        let network = generate(200, 300.0, 120.0, 80.0, Some(11)).unwrap();
        assert_eq!(network.len(), 200);
        for node in network.nodes() {
            let p = node.position();
            assert!((0.0..=300.0).contains(&p.x));
            assert!((0.0..=120.0).contains(&p.y));
            assert!(node.range() >= 80.0 * MIN_RANGE_FRACTION && node.range() <= 80.0);
        }
    }

    #[test]
    fn ranges_are_heterogeneous() {
        let network = generate(20, 1000.0, 1000.0, 150.0, Some(3)).unwrap();
        let first = network.nodes().next().unwrap().range();
        assert!(network.nodes().any(|n| n.range() != first));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = generate(5, 100.0, 100.0, 50.0, Some(42)).unwrap();
        let b = generate(5, 100.0, 100.0, 50.0, Some(42)).unwrap();
        assert_eq!(placements(&a), placements(&b));
        assert_eq!(a.node_ids().collect::<Vec<_>>(), b.node_ids().collect::<Vec<_>>());
        assert_eq!(a.to_snapshot(), b.to_snapshot());
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate(5, 100.0, 100.0, 50.0, Some(1)).unwrap();
        let b = generate(5, 100.0, 100.0, 50.0, Some(2)).unwrap();
        assert_ne!(placements(&a), placements(&b));
    }

    #[test]
    fn generated_networks_follow_the_threshold_rule() {
        let network = generate(120, 500.0, 500.0, 120.0, Some(8)).unwrap();
        assert!(network.validate().is_ok());
        let nodes: Vec<&Node> = network.nodes().collect();
        for a in &nodes {
            for b in &nodes {
                if a.id() == b.id() {
                    continue;
                }
                let expected = a.distance_to(b) <= a.range().max(b.range());
                assert_eq!(a.is_neighbor(b.id()), expected);
                assert_eq!(a.is_neighbor(b.id()), b.is_neighbor(a.id()));
            }
        }
    }

    #[test]
    fn mutual_rule_yields_a_subgraph() {
        let params = GeneratorParams {
            node_count: 80,
            width: 400.0,
            height: 400.0,
            max_range: 100.0,
            seed: Some(21),
        };
        let either = NetworkGenerator::new(params.clone()).generate().unwrap();
        let mutual = NetworkGenerator::new(params).with_rule(ConnectivityRule::MutualRange).generate().unwrap();
        assert!(mutual.connection_count() <= either.connection_count());
        for (a, b) in mutual.edges() {
            assert!(either.neighbors(a).unwrap().contains(&b));
        }
    }
}
