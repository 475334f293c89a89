//! Topology engine for simulated IoT deployments.
//!
//! Nodes are placed on a 2D map, each with a communication range. Two
//! nodes are linked when their distance is within range (by default the
//! larger of the two ranges). On top of the resulting graph the crate
//! offers statistics and shortest-path queries, and a JSON snapshot
//! format for exchanging networks with other tools.
//!
//! All operations are synchronous. A `Network` is an ordinary owned value:
//! callers that share one between threads must provide their own locking.

pub mod analysis;
pub mod config;
pub mod error;
pub mod topology;

pub use analysis::{PathFinder, PathObjective, PathResult, StatisticsReport, compute_statistics, find_path};
pub use error::{NetworkError, Result, Violation};
pub use topology::{ConnectivityRule, GeneratorParams, Network, NetworkGenerator, NetworkSnapshot, Node, NodeId, Point, generate};
