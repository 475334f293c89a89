//! Network topology: node identity and placement, the connectivity rule,
//! random generation and the owning `Network` container.
//!
//! ## Module Organization
//!
//! - `identity`: EUI-64 style node identifiers
//! - `node`: Node and point types
//! - `geometry`: Distance helpers
//! - `connectivity`: Symmetric neighbor computation
//! - `generator`: Random (optionally seeded) network generation
//! - `network`: Node collection, mutation, validation
//! - `snapshot`: JSON exchange format

pub mod connectivity;
pub mod generator;
pub mod geometry;
pub mod identity;
pub mod network;
pub mod node;
pub mod snapshot;

pub use connectivity::{ConnectivityEngine, ConnectivityRule};
pub use generator::{GeneratorParams, NetworkGenerator, generate};
pub use identity::NodeId;
pub use network::Network;
pub use node::{Node, Point};
pub use snapshot::{NetworkSnapshot, NodeRecord};
