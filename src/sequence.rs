//! Intra-cluster stop ordering.
//!
//! Greedy nearest-neighbor walk: a fast TSP heuristic, not an exact tour.

use crate::haversine::haversine_meters;
use crate::model::Stop;

/// Order stops by a nearest-neighbor walk starting at the first stop in
/// input order.
///
/// Ties on equal distance go to the first candidate in input order, so the
/// result is deterministic for a given input order. Empty and single-stop
/// inputs come back unchanged. Stops missing coordinates sort to the end;
/// callers normally only pass fully located clusters.
pub fn nearest_neighbor_order(stops: &[Stop]) -> Vec<Stop> {
    if stops.len() <= 1 {
        return stops.to_vec();
    }

    let mut remaining: Vec<&Stop> = stops.iter().collect();
    let mut ordered: Vec<Stop> = Vec::with_capacity(stops.len());
    ordered.push(remaining.remove(0).clone());

    while !remaining.is_empty() {
        let current = ordered
            .last()
            .and_then(|stop| stop.coordinates);

        let mut best_idx = 0;
        let mut best_dist = f64::MAX;
        for (i, candidate) in remaining.iter().enumerate() {
            let dist = match (current, candidate.coordinates) {
                (Some(from), Some(to)) => haversine_meters(from, to),
                _ => f64::MAX,
            };
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        ordered.push(remaining.remove(best_idx).clone());
    }

    ordered
}
