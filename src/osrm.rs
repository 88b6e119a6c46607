//! OSRM HTTP adapter for point-to-point driving distance.
//!
//! OSRM has no "shortest distance" preference; it returns the distance of
//! its fastest route. Use it for self-hosted deployments where that is
//! acceptable.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::point::Point;
use crate::traits::DistanceService;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, from: Point, to: Point) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=false",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            from.lng,
            from.lat,
            to.lng,
            to.lat
        )
    }
}

impl DistanceService for OsrmClient {
    fn name(&self) -> &'static str {
        "osrm"
    }

    fn distance_km(&self, from: Point, to: Point) -> Result<f64> {
        let response = self.client.get(self.route_url(from, to)).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                service: "osrm",
                status,
            });
        }

        let body: OsrmRouteResponse = response.json()?;
        if body.code != "Ok" {
            return Err(Error::malformed(format!("osrm code {}", body.code)));
        }

        body.routes
            .first()
            .map(|route| route.distance / 1000.0)
            .filter(|km| km.is_finite() && *km >= 0.0)
            .ok_or_else(|| Error::malformed("osrm returned no usable route"))
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Meters.
    distance: f64,
}
