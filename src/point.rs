//! Geographic point type shared by the planner and its collaborators.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Decimal digits kept when building cache keys (~1.1 m at the equator).
pub const CACHE_KEY_DECIMALS: i32 = 5;

/// A latitude/longitude pair in signed degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Builds a point only when both coordinates are present and finite.
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        match (lat, lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some(Self { lat, lng }),
            _ => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Fixed-precision integer form of the point, used for cache keys.
    pub fn rounded(&self) -> (i64, i64) {
        let scale = 10f64.powi(CACHE_KEY_DECIMALS);
        (
            (self.lat * scale).round() as i64,
            (self.lng * scale).round() as i64,
        )
    }
}

impl From<(f64, f64)> for Point {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

impl std::str::FromStr for Point {
    type Err = crate::Error;

    /// Parses `"lat,lng"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| crate::Error::invalid_input(format!("expected 'lat,lng', got '{s}'")))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| crate::Error::invalid_input(format!("bad latitude '{lat}'")))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| crate::Error::invalid_input(format!("bad longitude '{lng}'")))?;
        Point::from_parts(Some(lat), Some(lng))
            .ok_or_else(|| crate::Error::invalid_input(format!("non-finite point '{s}'")))
    }
}
