//! Haversine distance (fallback when the routing service is unavailable).
//!
//! Uses great-circle distance between two points.
//! Less accurate than road routing but always available.

use crate::error::Result;
use crate::point::Point;
use crate::traits::DistanceService;

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(from: Point, to: Point) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Straight-line distance service. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl DistanceService for Haversine {
    fn name(&self) -> &'static str {
        "haversine"
    }

    fn distance_km(&self, from: Point, to: Point) -> Result<f64> {
        Ok(haversine_km(from, to))
    }
}
