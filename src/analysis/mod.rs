//! Read-only consumers of a `Network`: aggregate statistics and
//! shortest-path queries.

pub mod pathfinder;
pub mod statistics;

pub use pathfinder::{PathEntry, PathFinder, PathObjective, PathResult, ShortestPathTree, SourcePaths, find_path};
pub use statistics::{NetworkStatistics, PositionBounds, RangeStatistics, StatisticsReport, compute_statistics};
