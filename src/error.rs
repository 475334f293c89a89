//! Error types shared by the topology and analysis modules.

use crate::topology::NodeId;

/// A single broken invariant found while validating a network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// `to` is listed as a neighbor of `from`, but `from` is missing from `to`'s list.
    Asymmetric { from: NodeId, to: NodeId },
    /// `from` lists `to` as a neighbor, but no such node exists.
    Dangling { from: NodeId, to: NodeId },
    /// A node lists itself as a neighbor.
    SelfLoop(NodeId),
    /// A neighbor list names the same node more than once.
    DuplicateNeighbor { node: NodeId, neighbor: NodeId },
    /// The snapshot's `total_nodes` does not match its node list.
    NodeCountMismatch { declared: usize, actual: usize },
    /// The snapshot's `total_connections` does not match its neighbor lists.
    ConnectionCountMismatch { declared: usize, actual: usize },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::Asymmetric { from, to } => write!(f, "{} lists {} but not the reverse", from, to),
            Violation::Dangling { from, to } => write!(f, "{} lists unknown neighbor {}", from, to),
            Violation::SelfLoop(id) => write!(f, "{} lists itself as a neighbor", id),
            Violation::DuplicateNeighbor { node, neighbor } => write!(f, "{} lists {} more than once", node, neighbor),
            Violation::NodeCountMismatch { declared, actual } => {
                write!(f, "total_nodes is {} but {} nodes are present", declared, actual)
            }
            Violation::ConnectionCountMismatch { declared, actual } => {
                write!(f, "total_connections is {} but neighbor lists describe {}", declared, actual)
            }
        }
    }
}

/// Error type for every fallible operation of the crate.
#[derive(Debug)]
pub enum NetworkError {
    /// Malformed input: non-positive generation parameters, bad ids, duplicate ids.
    InvalidParameter(String),
    /// A node id that is not part of the network.
    NotFound(NodeId),
    /// An externally supplied network breaks symmetry or references unknown nodes.
    InvariantViolation(Vec<Violation>),
    /// Reading or writing a snapshot file failed.
    Io(String),
    /// A snapshot could not be decoded.
    Parse(String),
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            NetworkError::NotFound(id) => write!(f, "Node {} not found", id),
            NetworkError::InvariantViolation(violations) => {
                write!(f, "Network invariant violated ({} problems)", violations.len())?;
                for violation in violations {
                    write!(f, "; {}", violation)?;
                }
                Ok(())
            }
            NetworkError::Io(msg) => write!(f, "I/O error: {}", msg),
            NetworkError::Parse(msg) => write!(f, "Failed to parse network: {}", msg),
        }
    }
}

impl std::error::Error for NetworkError {}

pub type Result<T> = std::result::Result<T, NetworkError>;
