//! The external optimizer seam.
//!
//! Route assembly takes the optimizer as a constructor-injected capability
//! so tests can substitute doubles and credential-less deployments can run
//! on the local heuristics alone.

/// A single waypoint sent to the optimizer. First and last entries of a
/// candidate list are the depot origin/destination; the rest are
/// intermediates subject to reordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
}

/// Authoritative result from the external provider.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedRoute {
    /// Permutation of the intermediate waypoints (origin/destination
    /// excluded): `waypoint_order[i]` is the original index of the stop to
    /// visit at position `i`.
    pub waypoint_order: Vec<usize>,
    /// Total route distance in kilometers, one decimal.
    pub distance_km: f64,
    /// Total route duration in minutes (ceiling of provider seconds).
    pub duration_minutes: i64,
}

/// Outcome of an optimization attempt.
///
/// There is deliberately no error variant: every provider failure collapses
/// to `Unavailable`, and the caller must take the local-heuristic branch.
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizeOutcome {
    Optimized(OptimizedRoute),
    Unavailable,
}

/// Reorders a depot-bookended waypoint list via an external provider.
pub trait RouteOptimizer {
    /// Attempt optimization. Never fails: any provider problem (missing
    /// credentials, network error, malformed response) is `Unavailable`.
    fn optimize(&self, waypoints: &[Waypoint]) -> OptimizeOutcome;
}

/// Optimizer for deployments without provider credentials: always
/// unavailable, so every route falls back to local heuristics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOptimizer;

impl RouteOptimizer for NoOptimizer {
    fn optimize(&self, _waypoints: &[Waypoint]) -> OptimizeOutcome {
        OptimizeOutcome::Unavailable
    }
}
