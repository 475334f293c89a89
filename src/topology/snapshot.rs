//! Serializable network representation.
//!
//! The JSON layout is the exchange format shared with the web and file
//! layers:
//!
//! ```text
//! {
//!   "nodes": [
//!     { "eui64": "02-..", "x": 1.0, "y": 2.0,
//!       "communication_range": 120.0, "neighbors": ["02-..", ...] }
//!   ],
//!   "total_nodes": 1,
//!   "total_connections": 0
//! }
//! ```
//!
//! A snapshot is untrusted data. Converting it into a `Network` goes
//! through `Network::from_snapshot`, which validates the neighbor lists.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::NetworkError;

/// One node as stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub eui64: String,
    pub x: f64,
    pub y: f64,
    pub communication_range: f64,
    #[serde(default)]
    pub neighbors: Vec<String>,
}

/// Root structure of a saved network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub nodes: Vec<NodeRecord>,
    /// Redundant node count, checked on load.
    pub total_nodes: usize,
    /// Redundant undirected edge count, checked on load.
    pub total_connections: usize,
}

impl NetworkSnapshot {
    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, NetworkError> {
        serde_json::to_string_pretty(self).map_err(|e| NetworkError::Parse(e.to_string()))
    }

    /// Decode from JSON. No invariant checks happen here.
    pub fn from_json(data: &str) -> Result<Self, NetworkError> {
        serde_json::from_str::<NetworkSnapshot>(data)
            .context("Invalid JSON format")
            .map_err(|e| NetworkError::Parse(format!("{:#}", e)))
    }

    /// Read a snapshot file.
    ///
    /// # Parameters
    ///
    /// * `path` - Path to the network JSON file
    ///
    /// # Returns
    ///
    /// The decoded snapshot, `Io` if the file cannot be read or `Parse`
    /// if it is not a valid snapshot.
    pub fn read_from_file(path: &Path) -> Result<Self, NetworkError> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))
            .map_err(|e| NetworkError::Io(format!("{:#}", e)))?;
        Self::from_json(&data)
    }

    /// Write the snapshot as JSON, replacing any existing file.
    pub fn write_to_file(&self, path: &Path) -> Result<(), NetworkError> {
        let data = self.to_json()?;
        fs::write(path, data)
            .with_context(|| format!("Failed to write file: {}", path.display()))
            .map_err(|e| NetworkError::Io(format!("{:#}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "nodes": [
            { "eui64": "02-00-00-00-00-00-00-01", "x": 0.0, "y": 0.0,
              "communication_range": 60.0, "neighbors": ["02-00-00-00-00-00-00-02"] },
            { "eui64": "02-00-00-00-00-00-00-02", "x": 50.0, "y": 0.0,
              "communication_range": 60.0, "neighbors": ["02-00-00-00-00-00-00-01"] }
        ],
        "total_nodes": 2,
        "total_connections": 1
    }"#;

    #[test]
    fn parses_exchange_format() {
        let snapshot = NetworkSnapshot::from_json(SAMPLE).unwrap();
        assert_eq!(snapshot.total_nodes, 2);
        assert_eq!(snapshot.total_connections, 1);
        assert_eq!(snapshot.nodes[1].x, 50.0);
        assert_eq!(snapshot.nodes[0].neighbors, vec!["02-00-00-00-00-00-00-02".to_string()]);
    }

    #[test]
    fn missing_fields_are_parse_errors() {
        let err = NetworkSnapshot::from_json(r#"{ "nodes": [] }"#).unwrap_err();
        assert!(matches!(err, NetworkError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = NetworkSnapshot::read_from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, NetworkError::Io(_)));
    }

    #[test]
    fn file_round_trip_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network.json");
        let snapshot = NetworkSnapshot::from_json(SAMPLE).unwrap();
        snapshot.write_to_file(&path).unwrap();
        assert_eq!(NetworkSnapshot::read_from_file(&path).unwrap(), snapshot);
    }
}
