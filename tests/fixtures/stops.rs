//! Test stop builder and distance services.

use std::cell::RefCell;

use rota_planner::error::{Error, Result};
use rota_planner::haversine::haversine_km;
use rota_planner::traits::{DistanceService, Stop};
use rota_planner::Point;

use super::natal_locations::Location;

/// Builder for test stops with sensible defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct TestStop {
    pub id: String,
    pub location: Option<Point>,
    pub locality: Option<String>,
    pub address: Option<String>,
}

impl TestStop {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            location: None,
            locality: None,
            address: None,
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.location = Some(Point::new(lat, lng));
        self
    }

    pub fn in_locality(mut self, locality: &str) -> Self {
        self.locality = Some(locality.to_string());
        self
    }

    pub fn from_location(location: &Location) -> Self {
        TestStop::new(location.name)
            .at(location.lat, location.lng)
            .in_locality(location.neighborhood)
    }
}

impl Stop for TestStop {
    fn location(&self) -> Option<Point> {
        self.location
    }

    fn locality(&self) -> Option<&str> {
        self.locality.as_deref()
    }

    fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}

pub fn ids(stops: &[TestStop]) -> Vec<&str> {
    stops.iter().map(|stop| stop.id.as_str()).collect()
}

/// Haversine answers, recording every query it receives.
#[derive(Debug, Default)]
pub struct CountingService {
    pub calls: RefCell<Vec<(Point, Point)>>,
}

impl CountingService {
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl DistanceService for CountingService {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn distance_km(&self, from: Point, to: Point) -> Result<f64> {
        self.calls.borrow_mut().push((from, to));
        Ok(haversine_km(from, to))
    }
}

/// A routing service that is always unreachable.
#[derive(Debug, Default)]
pub struct DownService {
    pub calls: RefCell<usize>,
}

impl DistanceService for DownService {
    fn name(&self) -> &'static str {
        "down"
    }

    fn distance_km(&self, _from: Point, _to: Point) -> Result<f64> {
        *self.calls.borrow_mut() += 1;
        Err(Error::malformed("service unavailable"))
    }
}

/// Deterministic pseudo-random generator for property-style tests.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    /// Uniform-ish value in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.next_u32() as f64 / (1u64 << 31) as f64
    }
}
