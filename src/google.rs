//! Google Routes API adapter.
//!
//! Sends a depot-bookended waypoint list to `computeRoutes` with
//! `optimizeWaypointOrder` and maps the response onto [`OptimizedRoute`].
//! Every failure path — missing key, network error, HTTP error status,
//! malformed body, zero routes — collapses to `OptimizeOutcome::Unavailable`
//! so route generation can always fall back to local heuristics.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::estimate::round_km;
use crate::traits::{OptimizeOutcome, OptimizedRoute, RouteOptimizer, Waypoint};

const FIELD_MASK: &str =
    "routes.distanceMeters,routes.duration,routes.optimizedIntermediateWaypointIndex";

#[derive(Debug, Clone)]
pub struct GoogleRoutesConfig {
    /// API key; `None` behaves exactly like a provider failure.
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GoogleRoutesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://routes.googleapis.com".to_string(),
            timeout_secs: 10,
        }
    }
}

impl GoogleRoutesConfig {
    /// Read the API key from `GOOGLE_MAPS_API_KEY`; an unset variable
    /// leaves the key absent and the optimizer permanently unavailable.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("GOOGLE_MAPS_API_KEY").ok(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct GoogleRoutesClient {
    config: GoogleRoutesConfig,
    client: reqwest::blocking::Client,
}

impl GoogleRoutesClient {
    pub fn new(config: GoogleRoutesConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl RouteOptimizer for GoogleRoutesClient {
    fn optimize(&self, waypoints: &[Waypoint]) -> OptimizeOutcome {
        let Some(api_key) = self.config.api_key.as_deref() else {
            debug!("no routing API key configured, optimizer unavailable");
            return OptimizeOutcome::Unavailable;
        };
        if waypoints.len() < 2 {
            return OptimizeOutcome::Unavailable;
        }

        let body = ComputeRoutesRequest::from_waypoints(waypoints);
        let url = format!("{}/directions/v2:computeRoutes", self.config.base_url);

        let response = self
            .client
            .post(url)
            .header("X-Goog-Api-Key", api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<ComputeRoutesResponse>());

        let routes = match response {
            Ok(body) => body.routes.unwrap_or_default(),
            Err(err) => {
                warn!(error = %err, "route optimization request failed");
                return OptimizeOutcome::Unavailable;
            }
        };

        match parse_route(routes.first(), waypoints.len() - 2) {
            Some(optimized) => OptimizeOutcome::Optimized(optimized),
            None => {
                warn!("route optimization response missing or malformed");
                OptimizeOutcome::Unavailable
            }
        }
    }
}

/// Map the provider's first route onto [`OptimizedRoute`]; `None` for any
/// malformed field, including a non-permutation waypoint index list.
fn parse_route(route: Option<&ApiRoute>, intermediates: usize) -> Option<OptimizedRoute> {
    let route = route?;

    let meters = route.distance_meters?;
    let duration = route.duration.as_deref()?;
    let seconds: f64 = duration.strip_suffix('s')?.parse().ok()?;

    let waypoint_order = match &route.optimized_intermediate_waypoint_index {
        Some(order) if is_permutation(order, intermediates) => order.clone(),
        // A route with no intermediates legitimately has no index list.
        None if intermediates == 0 => Vec::new(),
        _ => return None,
    };

    Some(OptimizedRoute {
        waypoint_order,
        distance_km: round_km(meters / 1000.0),
        duration_minutes: (seconds / 60.0).ceil() as i64,
    })
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &index in order {
        if index >= len || seen[index] {
            return false;
        }
        seen[index] = true;
    }
    true
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRoutesRequest {
    origin: WaypointSpec,
    destination: WaypointSpec,
    intermediates: Vec<WaypointSpec>,
    travel_mode: &'static str,
    optimize_waypoint_order: bool,
}

impl ComputeRoutesRequest {
    fn from_waypoints(waypoints: &[Waypoint]) -> Self {
        let last = waypoints.len() - 1;
        Self {
            origin: WaypointSpec::from(waypoints[0]),
            destination: WaypointSpec::from(waypoints[last]),
            intermediates: waypoints[1..last]
                .iter()
                .copied()
                .map(WaypointSpec::from)
                .collect(),
            travel_mode: "DRIVE",
            optimize_waypoint_order: true,
        }
    }
}

#[derive(Debug, Serialize)]
struct WaypointSpec {
    location: Location,
}

impl From<Waypoint> for WaypointSpec {
    fn from(waypoint: Waypoint) -> Self {
        Self {
            location: Location {
                lat_lng: LatLng {
                    latitude: waypoint.lat,
                    longitude: waypoint.lng,
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Location {
    lat_lng: LatLng,
}

#[derive(Debug, Serialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ComputeRoutesResponse {
    routes: Option<Vec<ApiRoute>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRoute {
    distance_meters: Option<f64>,
    duration: Option<String>,
    optimized_intermediate_waypoint_index: Option<Vec<usize>>,
}
