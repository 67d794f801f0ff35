//! Core data model for route generation.
//!
//! `Stop` is the immutable input unit; `RouteStop` and `GeneratedRoute` are
//! the output handed back to the caller for persistence. The engine itself
//! never stores anything.

use serde::{Deserialize, Serialize};

/// `location_id` carried by synthetic depot bookend stops.
pub const DEPOT_LOCATION_ID: &str = "depot";

/// Geographic coordinates in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A delivery stop as supplied by the caller.
///
/// Coordinates are optional: stops that were never geocoded still get
/// routed, via the round-robin fallback path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: String,
    pub address: String,
    pub customer_name: String,
    pub service_type: Option<String>,
    pub notes: Option<String>,
    pub coordinates: Option<Coordinates>,
}

/// One entry in a generated route's visiting order.
///
/// Depot bookends are synthetic `RouteStop`s whose customer name carries the
/// `Start:`/`End:` marker and whose `location_id` is `"depot"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub id: String,
    pub location_id: String,
    pub address: String,
    pub customer_name: String,
    pub service_type: Option<String>,
    pub notes: Option<String>,
    pub coordinates: Option<Coordinates>,
    /// 1-based position within the route; contiguous, no gaps.
    pub sequence: u32,
}

/// Route lifecycle status. The engine only ever emits `Draft`; the
/// surrounding system advances routes through assignment and publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Draft,
    Assigned,
    Published,
}

/// A complete generated route for one prospective driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRoute {
    pub day_of_week: Option<String>,
    pub date: Option<String>,
    /// Depot-first, depot-last, deliveries between.
    pub stops: Vec<RouteStop>,
    /// Kilometers rounded to one decimal; `None` means "cannot estimate"
    /// (missing coordinates), distinct from zero distance.
    pub total_distance_km: Option<f64>,
    pub estimated_minutes: i64,
    pub stop_count: usize,
    pub status: RouteStatus,
    /// Always `None` at creation; assignment happens outside the engine.
    pub driver_id: Option<String>,
    pub map_link: String,
}

impl GeneratedRoute {
    /// Delivery stops only (depot bookends excluded).
    pub fn deliveries(&self) -> impl Iterator<Item = &RouteStop> {
        self.stops.iter().filter(|s| s.location_id != DEPOT_LOCATION_ID)
    }
}
