//! Geographic clustering of located stops.
//!
//! K-means-style iterative refinement over Haversine distance. Seeding is
//! deterministic (evenly spaced input indices, not random) so identical
//! input order always yields identical clusters. An approximation: cluster
//! sizes may be unbalanced and the result is not globally optimal.

use tracing::debug;

use crate::haversine::haversine_meters;
use crate::model::{Coordinates, Stop};

/// Iteration cap for centroid refinement.
const MAX_REFINE_ITERATIONS: usize = 20;

/// Partition located stops into at most `k` non-empty clusters.
///
/// Stops without coordinates are excluded entirely; the caller routes those
/// through the round-robin fallback. Zero located stops yields zero
/// clusters. When `k` is at least the located count, each stop becomes its
/// own singleton cluster and iterative refinement is skipped.
pub fn cluster_stops(stops: &[Stop], k: usize) -> Vec<Vec<Stop>> {
    let located: Vec<(&Stop, Coordinates)> = stops
        .iter()
        .filter_map(|stop| stop.coordinates.map(|coords| (stop, coords)))
        .collect();

    let n = located.len();
    if n == 0 {
        return Vec::new();
    }
    if k >= n {
        return located
            .into_iter()
            .map(|(stop, _)| vec![stop.clone()])
            .collect();
    }

    // Seed centroids at evenly spaced positions in input order.
    let stride = n / k;
    let mut centroids: Vec<Coordinates> =
        (0..k).map(|i| located[i * stride].1).collect();
    let mut assignment = vec![0usize; n];

    for iteration in 0..MAX_REFINE_ITERATIONS {
        let mut changed = false;

        for (i, (_, coords)) in located.iter().enumerate() {
            let nearest = nearest_centroid(*coords, &centroids);
            if assignment[i] != nearest {
                assignment[i] = nearest;
                changed = true;
            }
        }

        if !changed {
            debug!(iteration, "cluster membership stable, stopping early");
            break;
        }

        // Recompute each centroid as the mean of its members. A centroid
        // that lost all members keeps its position; it may re-acquire
        // members next iteration, or end empty and be dropped below.
        for (c, centroid) in centroids.iter_mut().enumerate() {
            let mut lat_sum = 0.0;
            let mut lng_sum = 0.0;
            let mut count = 0usize;
            for (i, (_, coords)) in located.iter().enumerate() {
                if assignment[i] == c {
                    lat_sum += coords.lat;
                    lng_sum += coords.lng;
                    count += 1;
                }
            }
            if count > 0 {
                *centroid = Coordinates::new(
                    lat_sum / count as f64,
                    lng_sum / count as f64,
                );
            }
        }
    }

    let mut clusters: Vec<Vec<Stop>> = vec![Vec::new(); k];
    for (i, (stop, _)) in located.iter().enumerate() {
        clusters[assignment[i]].push((*stop).clone());
    }
    clusters.retain(|cluster| !cluster.is_empty());
    clusters
}

/// Index of the nearest centroid; ties go to the first encountered.
fn nearest_centroid(coords: Coordinates, centroids: &[Coordinates]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::MAX;
    for (c, centroid) in centroids.iter().enumerate() {
        let dist = haversine_meters(coords, *centroid);
        if dist < best_dist {
            best_dist = dist;
            best = c;
        }
    }
    best
}
