//! Village cluster detection
//!
//! Two villages closer than [`MERGE_DISTANCE`] blocks overlap physically and
//! may read as one oversized settlement. A cluster is summarised by the sum
//! of all house estimates for the seed and the mean position.

use crate::types::Position;

/// Villages closer than this (Euclidean, blocks) are treated as merging.
pub const MERGE_DISTANCE: i64 = 300;

/// True if any two distinct positions are closer than [`MERGE_DISTANCE`].
///
/// `_max_merge_distance` is accepted for the caller's configured house
/// spacing but does not affect the test; the overlap distance is fixed.
pub fn detect(positions: &[Position], _max_merge_distance: u32) -> bool {
    let limit = (MERGE_DISTANCE as i128) * (MERGE_DISTANCE as i128);
    positions.iter().enumerate().any(|(i, a)| {
        positions[i + 1..]
            .iter()
            .any(|b| a.distance_squared(b) < limit)
    })
}

/// Mean of the positions, truncated toward zero per axis.
pub fn centroid(positions: &[Position]) -> Option<Position> {
    if positions.is_empty() {
        return None;
    }
    let n = positions.len() as i128;
    let sum_x: i128 = positions.iter().map(|p| p.x as i128).sum();
    let sum_z: i128 = positions.iter().map(|p| p.z as i128).sum();
    Some(Position::new((sum_x / n) as i64, (sum_z / n) as i64))
}

/// Aggregate of every village of one seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClusterSummary {
    pub centroid: Position,
    pub occupant_count: u32,
}

/// Combine per-village estimates into a cluster summary.
/// `estimates` must be parallel to `positions`.
pub fn summarize(positions: &[Position], estimates: &[u32]) -> Option<ClusterSummary> {
    debug_assert_eq!(positions.len(), estimates.len());
    let centroid = centroid(positions)?;
    let occupant_count = estimates.iter().fold(0u32, |acc, &n| acc.saturating_add(n));
    Some(ClusterSummary {
        centroid,
        occupant_count,
    })
}
