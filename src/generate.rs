//! Route assembly: the per-driver generation pipeline.
//!
//! Partitions stops across drivers, orders each group, bookends it with
//! depot stops, attempts the external optimizer, and falls back to local
//! heuristic metrics when it is unavailable. The per-group loop is
//! sequential: each optimizer call is a network round-trip and concurrent
//! calls would trip provider rate limits.

use std::fmt;

use tracing::{debug, warn};

use crate::cluster::cluster_stops;
use crate::depot::Depot;
use crate::estimate::{estimate_minutes, route_distance_km};
use crate::maplink::maps_directions_link;
use crate::model::{DEPOT_LOCATION_ID, GeneratedRoute, RouteStatus, RouteStop, Stop};
use crate::sequence::nearest_neighbor_order;
use crate::traits::{OptimizeOutcome, RouteOptimizer, Waypoint};

/// Customer-name marker on the synthetic start-depot stop.
pub const DEPOT_START_PREFIX: &str = "Start:";

/// Customer-name marker on the synthetic end-depot stop.
pub const DEPOT_END_PREFIX: &str = "End:";

/// One generation run's input.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub stops: Vec<Stop>,
    pub driver_count: usize,
    pub day_of_week: Option<String>,
    pub date: Option<String>,
}

/// Input errors reported synchronously; generation does not proceed.
#[derive(Debug, PartialEq, Eq)]
pub enum GenerateError {
    /// No stops were supplied — "nothing to route" is a business-rule
    /// error for the caller, not an engine failure.
    NoEligibleStops,
    InvalidDriverCount(usize),
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::NoEligibleStops => write!(f, "no eligible stops to route"),
            GenerateError::InvalidDriverCount(count) => {
                write!(f, "invalid driver count: {}", count)
            }
        }
    }
}

impl std::error::Error for GenerateError {}

/// Generate one draft route per non-empty stop group.
///
/// All stops located: geographic clustering into at most `driver_count`
/// groups. Any stop unlocated: round-robin blocks of `ceil(n / driver_count)`
/// in input order. Either way, each group is sequenced and optimized
/// independently — a round-robin block whose stops all happen to have
/// coordinates still gets the optimizer attempt.
pub fn generate_routes<O: RouteOptimizer>(
    request: &GenerateRequest,
    depot: &Depot,
    optimizer: &O,
) -> Result<Vec<GeneratedRoute>, GenerateError> {
    if request.driver_count == 0 {
        return Err(GenerateError::InvalidDriverCount(0));
    }
    if request.stops.is_empty() {
        return Err(GenerateError::NoEligibleStops);
    }

    let all_located = request.stops.iter().all(|stop| stop.coordinates.is_some());
    let groups = if all_located {
        cluster_stops(&request.stops, request.driver_count)
    } else {
        debug!("stops missing coordinates, using round-robin partition");
        round_robin_blocks(&request.stops, request.driver_count)
    };

    // Sequential on purpose: one in-flight optimizer call at a time.
    let mut routes = Vec::with_capacity(groups.len());
    for group in &groups {
        routes.push(build_route(group, depot, optimizer, request));
    }

    Ok(routes)
}

/// Blocks of `ceil(n / k)` stops in original input order, at most `k`.
fn round_robin_blocks(stops: &[Stop], k: usize) -> Vec<Vec<Stop>> {
    let block_size = stops.len().div_ceil(k);
    stops.chunks(block_size).map(|block| block.to_vec()).collect()
}

/// Build one draft route from a non-empty stop group.
fn build_route<O: RouteOptimizer>(
    group: &[Stop],
    depot: &Depot,
    optimizer: &O,
    request: &GenerateRequest,
) -> GeneratedRoute {
    let fully_located = group.iter().all(|stop| stop.coordinates.is_some());

    // Initial heuristic order; unlocated groups keep input order.
    let ordered = if fully_located {
        nearest_neighbor_order(group)
    } else {
        group.to_vec()
    };

    let mut deliveries: Vec<RouteStop> = ordered
        .iter()
        .enumerate()
        .map(|(i, stop)| delivery_stop(stop, (i + 2) as u32))
        .collect();

    let mut optimized_metrics: Option<(f64, i64)> = None;

    // Depot-to-depot around a single stop is trivially ordered; skip the
    // provider and keep local metrics.
    if fully_located && deliveries.len() >= 2 {
        let waypoints = bookended_waypoints(depot, &deliveries);
        match optimizer.optimize(&waypoints) {
            OptimizeOutcome::Optimized(optimized) => {
                deliveries = reorder(deliveries, &optimized.waypoint_order);
                optimized_metrics =
                    Some((optimized.distance_km, optimized.duration_minutes));
            }
            OptimizeOutcome::Unavailable => {
                warn!("optimizer unavailable, keeping heuristic order and metrics");
            }
        }
    }

    let delivery_count = deliveries.len();
    let mut stops = Vec::with_capacity(delivery_count + 2);
    stops.push(depot_stop(depot, DEPOT_START_PREFIX, "depot-start"));
    stops.extend(deliveries);
    stops.push(depot_stop(depot, DEPOT_END_PREFIX, "depot-end"));
    renumber(&mut stops);

    let (total_distance_km, estimated_minutes) = match optimized_metrics {
        Some((distance_km, minutes)) => (Some(distance_km), minutes),
        None => {
            let distance_km = route_distance_km(&stops);
            (distance_km, estimate_minutes(distance_km, delivery_count))
        }
    };

    let map_link = maps_directions_link(&stops);
    let stop_count = stops.len();

    GeneratedRoute {
        day_of_week: request.day_of_week.clone(),
        date: request.date.clone(),
        stops,
        total_distance_km,
        estimated_minutes,
        stop_count,
        status: RouteStatus::Draft,
        driver_id: None,
        map_link,
    }
}

fn delivery_stop(stop: &Stop, sequence: u32) -> RouteStop {
    RouteStop {
        id: stop.id.clone(),
        location_id: stop.id.clone(),
        address: stop.address.clone(),
        customer_name: stop.customer_name.clone(),
        service_type: stop.service_type.clone(),
        notes: stop.notes.clone(),
        coordinates: stop.coordinates,
        sequence,
    }
}

fn depot_stop(depot: &Depot, prefix: &str, id: &str) -> RouteStop {
    RouteStop {
        id: id.to_string(),
        location_id: DEPOT_LOCATION_ID.to_string(),
        address: depot.address.clone(),
        customer_name: format!("{} {}", prefix, depot.name),
        service_type: None,
        notes: None,
        coordinates: Some(depot.coordinates),
        sequence: 0,
    }
}

/// Depot origin, delivery intermediates, depot destination.
fn bookended_waypoints(depot: &Depot, deliveries: &[RouteStop]) -> Vec<Waypoint> {
    let depot_waypoint = Waypoint {
        lat: depot.coordinates.lat,
        lng: depot.coordinates.lng,
    };

    let mut waypoints = Vec::with_capacity(deliveries.len() + 2);
    waypoints.push(depot_waypoint);
    for stop in deliveries {
        if let Some(coords) = stop.coordinates {
            waypoints.push(Waypoint {
                lat: coords.lat,
                lng: coords.lng,
            });
        }
    }
    waypoints.push(depot_waypoint);
    waypoints
}

/// Apply the optimizer's intermediate permutation; returns a new list.
fn reorder(deliveries: Vec<RouteStop>, order: &[usize]) -> Vec<RouteStop> {
    order
        .iter()
        .filter_map(|&i| deliveries.get(i).cloned())
        .collect()
}

/// Reassign contiguous 1-based sequence numbers in list order.
fn renumber(stops: &mut [RouteStop]) {
    for (i, stop) in stops.iter_mut().enumerate() {
        stop.sequence = (i + 1) as u32;
    }
}
