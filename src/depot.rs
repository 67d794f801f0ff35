//! Depot resolution.
//!
//! Every generated route starts and ends at one depot, resolved once per
//! generation run. Resolution never fails: a hardcoded fallback depot is
//! the last resort when configuration is missing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::Coordinates;

/// Address used when no configured depot candidate wins.
const FALLBACK_DEPOT_ADDRESS: &str = "4350 S Valley View Blvd, Las Vegas, NV 89103";

/// Coordinates of the fallback depot address.
const FALLBACK_DEPOT_COORDINATES: Coordinates = Coordinates {
    lat: 36.1123,
    lng: -115.1932,
};

const FALLBACK_DEPOT_NAME: &str = "Warehouse";

/// The resolved origin/destination of every generated route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depot {
    pub name: String,
    pub address: String,
    pub coordinates: Coordinates,
}

/// A configured location considered during depot resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepotCandidate {
    pub name: String,
    pub address: String,
    pub coordinates: Option<Coordinates>,
    /// Explicit "starting point" flag; takes precedence over name matching.
    pub is_starting_point: bool,
}

/// Pick the depot for a generation run.
///
/// Precedence: first candidate flagged as starting point, then the first
/// candidate named "warehouse" (case-insensitive), then the hardcoded
/// fallback. A winning candidate without coordinates borrows the fallback
/// coordinates so the depot is always locatable.
pub fn resolve_depot(candidates: &[DepotCandidate]) -> Depot {
    let chosen = candidates
        .iter()
        .find(|c| c.is_starting_point)
        .or_else(|| {
            candidates
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case("warehouse"))
        });

    match chosen {
        Some(candidate) => Depot {
            name: candidate.name.clone(),
            address: candidate.address.clone(),
            coordinates: candidate
                .coordinates
                .unwrap_or(FALLBACK_DEPOT_COORDINATES),
        },
        None => {
            debug!("no depot candidate matched, using fallback depot");
            fallback_depot()
        }
    }
}

/// The hardcoded last-resort depot.
pub fn fallback_depot() -> Depot {
    Depot {
        name: FALLBACK_DEPOT_NAME.to_string(),
        address: FALLBACK_DEPOT_ADDRESS.to_string(),
        coordinates: FALLBACK_DEPOT_COORDINATES,
    }
}
