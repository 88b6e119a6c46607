//! Nominatim (OpenStreetMap) geocoding collaborator.
//!
//! Sits upstream of the planner: it fills in coordinates on customer
//! records, and the planner only ever reads them. Nominatim's usage policy
//! allows one request per second and requires a `User-Agent`, so every
//! client owns a [`RateLimiter`].

use std::thread;
use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::customer::Customer;
use crate::error::{Error, Result};
use crate::point::Point;
use crate::traits::{AddressQuery, Geocoder, Stop};

/// Enforces a minimum spacing between requests. Owned by one client.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Duration,
    last: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// Time still to wait at `now` before the next request may go out.
    pub fn delay_at(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => self.min_interval.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Blocks until a request is allowed, then records it.
    pub fn acquire(&mut self) {
        let delay = self.delay_at(Instant::now());
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        self.last = Some(Instant::now());
    }
}

/// Latitude/longitude box used to reject obviously wrong matches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    pub const BRAZIL: Bounds = Bounds {
        min_lat: -34.0,
        max_lat: 6.0,
        min_lng: -75.0,
        max_lng: -34.0,
    };

    pub fn contains(&self, point: Point) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lng
            && point.lng <= self.max_lng
    }
}

pub fn within_brazil(point: Point) -> bool {
    Bounds::BRAZIL.contains(point)
}

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    pub user_agent: String,
    pub min_interval: Duration,
    pub default_city: String,
    pub default_state: String,
    pub country: String,
    /// Matches outside these bounds are discarded.
    pub bounds: Option<Bounds>,
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "RotaAgil/1.0".to_string(),
            min_interval: Duration::from_secs(1),
            default_city: "Natal".to_string(),
            default_state: "RN".to_string(),
            country: "Brasil".to_string(),
            bounds: Some(Bounds::BRAZIL),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
    limiter: RateLimiter,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        let limiter = RateLimiter::new(config.min_interval);

        Ok(Self {
            config,
            client,
            limiter,
        })
    }

    /// `"<address>, <city>, <state>, <country>"` with configured defaults.
    pub fn full_address(&self, query: &AddressQuery) -> String {
        format!(
            "{}, {}, {}, {}",
            query.address.trim(),
            query.city.as_deref().unwrap_or(&self.config.default_city),
            query.state.as_deref().unwrap_or(&self.config.default_state),
            self.config.country
        )
    }
}

impl Geocoder for NominatimClient {
    fn geocode(&mut self, query: &AddressQuery) -> Result<Option<Point>> {
        self.limiter.acquire();

        let full_address = self.full_address(query);
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .query(&[
                ("q", full_address.as_str()),
                ("format", "json"),
                ("limit", "1"),
                ("addressdetails", "1"),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, address = %query.address, "nominatim rejected query");
            return Ok(None);
        }

        let places: Vec<NominatimPlace> = response.json()?;
        let Some(place) = places.into_iter().next() else {
            tracing::warn!(address = %query.address, "no match");
            return Ok(None);
        };

        let point = place.point()?;
        if let Some(bounds) = self.config.bounds {
            if !bounds.contains(point) {
                tracing::warn!(address = %query.address, %point, "match outside expected region");
                return Ok(None);
            }
        }

        tracing::debug!(address = %query.address, %point, "geocoded");
        Ok(Some(point))
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimPlace {
    fn point(&self) -> Result<Point> {
        let lat = self.lat.parse::<f64>().ok();
        let lng = self.lon.parse::<f64>().ok();
        Point::from_parts(lat, lng)
            .ok_or_else(|| Error::malformed(format!("bad coordinates '{}', '{}'", self.lat, self.lon)))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeocodeReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Fills coordinates on every customer lacking them, one request at a time.
///
/// `on_progress` receives `(current, total, address)` before each lookup.
/// A failed lookup leaves the customer untouched and counts as failed.
pub fn geocode_missing<G, F>(customers: &mut [Customer], geocoder: &mut G, mut on_progress: F) -> GeocodeReport
where
    G: Geocoder + ?Sized,
    F: FnMut(usize, usize, &str),
{
    let missing: Vec<usize> = customers
        .iter()
        .enumerate()
        .filter(|(_, customer)| customer.location().is_none())
        .map(|(index, _)| index)
        .collect();

    let mut report = GeocodeReport {
        attempted: missing.len(),
        ..GeocodeReport::default()
    };

    for (step, index) in missing.into_iter().enumerate() {
        let customer = &mut customers[index];
        on_progress(step + 1, report.attempted, &customer.address);

        match geocoder.geocode(&customer.address_query()) {
            Ok(Some(point)) => {
                customer.set_location(point);
                report.succeeded += 1;
            }
            Ok(None) => report.failed += 1,
            Err(err) => {
                tracing::warn!(customer = %customer.name, error = %err, "geocoding failed");
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        attempted = report.attempted,
        succeeded = report.succeeded,
        failed = report.failed,
        "geocoding finished"
    );
    report
}
