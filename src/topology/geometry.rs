//! Planar distance helpers.
//!
//! Range checks and reported lengths go through the same `distance`
//! function so a link decision always agrees with the length reported
//! for that link.

use super::node::Point;

/// Squared Euclidean distance between two points.
///
/// # Parameters
///
/// * `a` - First point
/// * `b` - Second point
///
/// # Returns
///
/// The squared distance (dx² + dy²).
pub fn distance2(a: &Point, b: &Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Euclidean distance between two points.
pub fn distance(a: &Point, b: &Point) -> f64 {
    distance2(a, b).sqrt()
}

/// True if `b` lies within `range` of `a` (boundary inclusive).
///
/// A zero range only covers coincident points; a negative or NaN range
/// covers nothing.
pub fn within_range(a: &Point, b: &Point, range: f64) -> bool {
    distance(a, b) <= range
}
