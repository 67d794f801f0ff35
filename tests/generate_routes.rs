use std::cell::RefCell;

use route_gen::depot::Depot;
use route_gen::estimate::route_distance_km;
use route_gen::generate::{
    DEPOT_END_PREFIX, DEPOT_START_PREFIX, GenerateError, GenerateRequest, generate_routes,
};
use route_gen::model::{Coordinates, GeneratedRoute, RouteStatus, Stop};
use route_gen::traits::{
    NoOptimizer, OptimizeOutcome, OptimizedRoute, RouteOptimizer, Waypoint,
};

fn stop(id: &str, coords: Option<(f64, f64)>) -> Stop {
    Stop {
        id: id.to_string(),
        address: format!("{} Fremont St", id),
        customer_name: format!("Customer {}", id),
        service_type: Some("delivery".to_string()),
        notes: None,
        coordinates: coords.map(|(lat, lng)| Coordinates::new(lat, lng)),
    }
}

fn depot() -> Depot {
    Depot {
        name: "Warehouse".to_string(),
        address: "1 Depot Rd".to_string(),
        coordinates: Coordinates::new(36.10, -115.10),
    }
}

fn request(stops: Vec<Stop>, driver_count: usize) -> GenerateRequest {
    GenerateRequest {
        stops,
        driver_count,
        day_of_week: Some("monday".to_string()),
        date: None,
    }
}

/// Optimizer double that records calls and replays a canned outcome.
struct MockOptimizer {
    outcome: OptimizeOutcome,
    calls: RefCell<Vec<Vec<Waypoint>>>,
}

impl MockOptimizer {
    fn returning(outcome: OptimizeOutcome) -> Self {
        Self {
            outcome,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl RouteOptimizer for MockOptimizer {
    fn optimize(&self, waypoints: &[Waypoint]) -> OptimizeOutcome {
        self.calls.borrow_mut().push(waypoints.to_vec());
        self.outcome.clone()
    }
}

fn assert_contiguous_sequence(route: &GeneratedRoute) {
    let sequences: Vec<u32> = route.stops.iter().map(|s| s.sequence).collect();
    let expected: Vec<u32> = (1..=route.stops.len() as u32).collect();
    assert_eq!(sequences, expected, "sequence must be 1..=count with no gaps");
}

fn assert_depot_bookends(route: &GeneratedRoute) {
    let first = route.stops.first().expect("route has stops");
    let last = route.stops.last().expect("route has stops");
    assert!(first.customer_name.starts_with(DEPOT_START_PREFIX));
    assert!(last.customer_name.starts_with(DEPOT_END_PREFIX));
    for delivery in &route.stops[1..route.stops.len() - 1] {
        assert!(!delivery.customer_name.starts_with(DEPOT_START_PREFIX));
        assert!(!delivery.customer_name.starts_with(DEPOT_END_PREFIX));
    }
}

#[test]
fn exact_split_across_two_drivers() {
    // Two tight pairs far apart: each driver gets one pair.
    let stops = vec![
        stop("a", Some((36.10, -115.10))),
        stop("b", Some((36.11, -115.11))),
        stop("c", Some((36.60, -115.60))),
        stop("d", Some((36.61, -115.61))),
    ];

    let routes = generate_routes(&request(stops, 2), &depot(), &NoOptimizer).unwrap();

    assert_eq!(routes.len(), 2);
    let total_deliveries: usize = routes.iter().map(|r| r.deliveries().count()).sum();
    assert_eq!(total_deliveries, 4);
    for route in &routes {
        assert_eq!(route.stop_count, route.deliveries().count() + 2);
        assert_eq!(route.status, RouteStatus::Draft);
        assert_eq!(route.driver_id, None);
        assert_contiguous_sequence(route);
        assert_depot_bookends(route);
    }
}

#[test]
fn no_coordinates_round_robin_with_flat_estimates() {
    let stops: Vec<Stop> = (0..5).map(|i| stop(&i.to_string(), None)).collect();

    let routes = generate_routes(&request(stops, 2), &depot(), &NoOptimizer).unwrap();

    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].deliveries().count(), 3);
    assert_eq!(routes[1].deliveries().count(), 2);
    for route in &routes {
        assert_eq!(route.total_distance_km, None);
        assert_eq!(
            route.estimated_minutes,
            15 * route.deliveries().count() as i64
        );
        assert_contiguous_sequence(route);
        assert_depot_bookends(route);
    }
}

#[test]
fn driver_count_exceeding_stops_yields_one_route_per_stop() {
    let stops = vec![
        stop("a", Some((36.10, -115.10))),
        stop("b", Some((36.20, -115.20))),
    ];

    let routes = generate_routes(&request(stops, 5), &depot(), &NoOptimizer).unwrap();

    assert_eq!(routes.len(), 2, "only non-empty clusters produce routes");
    for route in &routes {
        assert_eq!(route.deliveries().count(), 1);
        assert_eq!(route.stop_count, 3);
    }
}

#[test]
fn optimizer_result_replaces_heuristic_order_and_metrics() {
    // One cluster of two stops; the mock swaps the intermediates.
    let stops = vec![
        stop("near", Some((36.11, -115.11))),
        stop("far", Some((36.15, -115.15))),
    ];
    let optimizer = MockOptimizer::returning(OptimizeOutcome::Optimized(OptimizedRoute {
        waypoint_order: vec![1, 0],
        distance_km: 42.5,
        duration_minutes: 77,
    }));

    let routes = generate_routes(&request(stops, 1), &depot(), &optimizer).unwrap();

    assert_eq!(routes.len(), 1);
    let route = &routes[0];

    // Heuristic order from the depot would be near, far; the mock swapped it.
    let deliveries: Vec<(&str, u32)> = route
        .deliveries()
        .map(|s| (s.id.as_str(), s.sequence))
        .collect();
    assert_eq!(deliveries, vec![("far", 2), ("near", 3)]);

    assert_eq!(route.total_distance_km, Some(42.5));
    assert_eq!(route.estimated_minutes, 77);
    assert_contiguous_sequence(route);
    assert_depot_bookends(route);

    // The candidate list was depot-bookended.
    let calls = optimizer.calls.borrow();
    assert_eq!(calls.len(), 1);
    let waypoints = &calls[0];
    assert_eq!(waypoints.len(), 4);
    assert_eq!(waypoints[0], waypoints[3]);
}

#[test]
fn unavailable_optimizer_matches_local_estimator() {
    let stops = vec![
        stop("a", Some((36.12, -115.12))),
        stop("b", Some((36.18, -115.18))),
        stop("c", Some((36.14, -115.09))),
    ];
    let optimizer = MockOptimizer::returning(OptimizeOutcome::Unavailable);

    let routes = generate_routes(&request(stops, 1), &depot(), &optimizer).unwrap();

    assert_eq!(routes.len(), 1);
    let route = &routes[0];
    assert_eq!(
        route.total_distance_km,
        route_distance_km(&route.stops),
        "fallback metrics must equal the estimator on the final order"
    );
    assert!(route.total_distance_km.unwrap() > 0.0);
}

#[test]
fn single_stop_route_skips_optimizer() {
    let stops = vec![stop("only", Some((36.12, -115.12)))];
    let optimizer = MockOptimizer::returning(OptimizeOutcome::Optimized(OptimizedRoute {
        waypoint_order: vec![],
        distance_km: 999.0,
        duration_minutes: 999,
    }));

    let routes = generate_routes(&request(stops, 1), &depot(), &optimizer).unwrap();

    assert!(optimizer.calls.borrow().is_empty(), "no call for depot-stop-depot");
    let route = &routes[0];
    assert_eq!(route.stop_count, 3);
    assert!(route.total_distance_km.unwrap() > 0.0);
}

#[test]
fn mixed_coordinates_use_round_robin_but_still_report_null_distance() {
    let stops = vec![
        stop("a", Some((36.10, -115.10))),
        stop("b", None),
        stop("c", Some((36.30, -115.30))),
    ];

    let routes = generate_routes(&request(stops, 1), &depot(), &NoOptimizer).unwrap();

    assert_eq!(routes.len(), 1);
    let route = &routes[0];
    // Input order is preserved when the group is not fully located.
    let ids: Vec<&str> = route.deliveries().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(route.total_distance_km, None);
    assert_eq!(route.estimated_minutes, 45);
}

#[test]
fn map_link_joins_addresses_in_sequence_order() {
    let stops = vec![stop("a", Some((36.12, -115.12)))];
    let routes = generate_routes(&request(stops, 1), &depot(), &NoOptimizer).unwrap();

    assert_eq!(
        routes[0].map_link,
        "https://www.google.com/maps/dir/1%20Depot%20Rd/a%20Fremont%20St/1%20Depot%20Rd"
    );
}

#[test]
fn rejects_zero_drivers() {
    let stops = vec![stop("a", Some((36.1, -115.1)))];
    let err = generate_routes(&request(stops, 0), &depot(), &NoOptimizer).unwrap_err();
    assert_eq!(err, GenerateError::InvalidDriverCount(0));
}

#[test]
fn rejects_empty_stop_list() {
    let err = generate_routes(&request(Vec::new(), 3), &depot(), &NoOptimizer).unwrap_err();
    assert_eq!(err, GenerateError::NoEligibleStops);
}

#[test]
fn every_input_stop_appears_exactly_once_across_routes() {
    let stops: Vec<Stop> = (0..9)
        .map(|i| {
            stop(
                &format!("s{}", i),
                Some((36.0 + (i as f64) * 0.07, -115.0 - (i as f64) * 0.05)),
            )
        })
        .collect();

    let routes = generate_routes(&request(stops, 3), &depot(), &NoOptimizer).unwrap();

    let mut ids: Vec<String> = routes
        .iter()
        .flat_map(|r| r.deliveries().map(|s| s.id.clone()))
        .collect();
    ids.sort();
    let mut expected: Vec<String> = (0..9).map(|i| format!("s{}", i)).collect();
    expected.sort();
    assert_eq!(ids, expected);
}
