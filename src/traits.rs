//! Core domain traits for the route planner.
//!
//! These are intentionally minimal. Concrete apps implement them for their
//! own records and services; the planner only reads through them.

use std::sync::Arc;

use crate::error::Result;
use crate::point::Point;

/// A stop is a single place the seller intends to visit.
///
/// The planner never interprets the payload behind a stop; it only reorders
/// references to it.
pub trait Stop {
    /// Coordinates, when known.
    fn location(&self) -> Option<Point>;

    /// [`Stop::location`] with non-finite coordinates treated as absent.
    /// The planner only ever reads locations through this.
    fn finite_location(&self) -> Option<Point> {
        self.location().filter(Point::is_finite)
    }

    /// Free-text locality label (neighborhood) used for clustering.
    fn locality(&self) -> Option<&str>;

    /// Human-readable address, used when a stop has no coordinates.
    fn address(&self) -> Option<&str> {
        None
    }
}

impl<T: Stop + ?Sized> Stop for &T {
    fn location(&self) -> Option<Point> {
        (**self).location()
    }

    fn locality(&self) -> Option<&str> {
        (**self).locality()
    }

    fn address(&self) -> Option<&str> {
        (**self).address()
    }
}

/// Travel cost between two points, in kilometers.
///
/// Implementations may fail; the oracle decides how to degrade.
pub trait DistanceService {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn distance_km(&self, from: Point, to: Point) -> Result<f64>;
}

impl<T: DistanceService + ?Sized> DistanceService for &T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn distance_km(&self, from: Point, to: Point) -> Result<f64> {
        (**self).distance_km(from, to)
    }
}

/// Free-text address query handed to a geocoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressQuery {
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Resolves addresses into coordinates.
///
/// `Ok(None)` means the service answered but found nothing.
pub trait Geocoder {
    fn geocode(&mut self, query: &AddressQuery) -> Result<Option<Point>>;
}

/// Best-effort current device position.
pub trait LocationSource {
    fn current_location(&self) -> Result<Point>;
}

impl<T: LocationSource + ?Sized> LocationSource for Arc<T> {
    fn current_location(&self) -> Result<Point> {
        (**self).current_location()
    }
}

/// External whole-list ordering (e.g. a generative model). Allowed to fail.
///
/// Returns the same addresses in the suggested visiting order.
pub trait OrderSuggester {
    fn suggest_order(&self, addresses: &[String]) -> Result<Vec<String>>;
}
