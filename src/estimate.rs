//! Local distance/time estimation.
//!
//! Used whenever the external optimizer is unavailable or skipped. Distance
//! is a straight-line (Haversine) sum, so it understates road distance; the
//! time model compensates with a conservative average speed.

use crate::haversine::haversine_meters;
use crate::model::RouteStop;

/// Assumed average driving speed.
const AVERAGE_SPEED_KMH: f64 = 40.0;

/// Dwell time per delivery stop when distance is known.
const MINUTES_PER_DELIVERY: i64 = 5;

/// Flat per-delivery estimate when distance cannot be computed.
const FLAT_MINUTES_PER_DELIVERY: i64 = 15;

/// Round kilometers to one decimal.
pub fn round_km(km: f64) -> f64 {
    (km * 10.0).round() / 10.0
}

/// Total route distance in kilometers, one decimal.
///
/// Sums Haversine legs between consecutive stops. Returns `None` when any
/// consecutive pair lacks coordinates — "cannot estimate" is distinct from
/// zero distance. Fewer than two stops is `Some(0.0)`.
pub fn route_distance_km(stops: &[RouteStop]) -> Option<f64> {
    if stops.len() < 2 {
        return Some(0.0);
    }

    let mut meters = 0.0;
    for pair in stops.windows(2) {
        let from = pair[0].coordinates?;
        let to = pair[1].coordinates?;
        meters += haversine_meters(from, to);
    }

    Some(round_km(meters / 1000.0))
}

/// Estimated route time in minutes.
///
/// With a known distance: driving time at the assumed average speed plus
/// dwell per delivery. Without one: a flat per-delivery rate. Depot
/// bookends never count as deliveries.
pub fn estimate_minutes(distance_km: Option<f64>, delivery_count: usize) -> i64 {
    match distance_km {
        Some(km) => {
            (km / AVERAGE_SPEED_KMH * 60.0).round() as i64
                + MINUTES_PER_DELIVERY * delivery_count as i64
        }
        None => FLAT_MINUTES_PER_DELIVERY * delivery_count as i64,
    }
}
