//! Delivery route generation engine.
//!
//! Partitions delivery stops into per-driver clusters, orders each cluster
//! into a drivable sequence, and estimates distance/time with graceful
//! fallback when the external route optimizer is unavailable.

pub mod model;
pub mod traits;
pub mod haversine;
pub mod cluster;
pub mod sequence;
pub mod estimate;
pub mod depot;
pub mod google;
pub mod maplink;
pub mod generate;
