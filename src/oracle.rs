//! Distance oracle: network distance with a per-call cache and a
//! great-circle fallback.
//!
//! The oracle never surfaces an error. A failed or rejected service query
//! is answered with the haversine distance between the same points, and
//! that answer is not cached.

use std::collections::HashMap;

use crate::haversine::haversine_km;
use crate::point::Point;
use crate::traits::DistanceService;

/// Consecutive service failures after which the oracle stops calling the
/// service until the next [`DistanceOracle::reset`].
pub const DEFAULT_FAILURE_LIMIT: usize = 3;

type CacheKey = ((i64, i64), (i64, i64));

/// Counters for one optimization call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OracleStats {
    /// Successful service answers (each one populated the cache).
    pub service_queries: usize,
    pub cache_hits: usize,
    /// Answers computed by haversine because the service failed or was skipped.
    pub fallbacks: usize,
}

#[derive(Debug)]
pub struct DistanceOracle<S> {
    service: Option<S>,
    cache: HashMap<CacheKey, f64>,
    stats: OracleStats,
    consecutive_failures: usize,
    failure_limit: usize,
}

impl<S: DistanceService> DistanceOracle<S> {
    pub fn new(service: S) -> Self {
        Self {
            service: Some(service),
            cache: HashMap::new(),
            stats: OracleStats::default(),
            consecutive_failures: 0,
            failure_limit: DEFAULT_FAILURE_LIMIT,
        }
    }

    /// An oracle that only ever answers with haversine distance.
    pub fn straight_line() -> Self {
        Self {
            service: None,
            cache: HashMap::new(),
            stats: OracleStats::default(),
            consecutive_failures: 0,
            failure_limit: DEFAULT_FAILURE_LIMIT,
        }
    }

    /// Stop calling the service after `limit` consecutive failures.
    /// `0` disables the limit.
    pub fn with_failure_limit(mut self, limit: usize) -> Self {
        self.failure_limit = limit;
        self
    }

    /// Clears the cache and counters. Called at the start of every run.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.stats = OracleStats::default();
        self.consecutive_failures = 0;
    }

    /// Drops cached distances but keeps the counters of the finished run.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn stats(&self) -> OracleStats {
        self.stats
    }

    pub fn cached_pairs(&self) -> usize {
        self.cache.len()
    }

    /// Travel cost from `from` to `to` in kilometers.
    pub fn cost(&mut self, from: Point, to: Point) -> f64 {
        if !from.is_finite() || !to.is_finite() {
            tracing::warn!(%from, %to, "distance requested for non-finite point");
            return f64::INFINITY;
        }

        let key = (from.rounded(), to.rounded());
        if let Some(km) = self.cache.get(&key) {
            self.stats.cache_hits += 1;
            return *km;
        }

        let service_enabled =
            self.failure_limit == 0 || self.consecutive_failures < self.failure_limit;

        if let Some(service) = self.service.as_ref().filter(|_| service_enabled) {
            match service.distance_km(from, to) {
                Ok(km) if km.is_finite() && km >= 0.0 => {
                    tracing::debug!(service = service.name(), %from, %to, km, "distance cache miss");
                    self.consecutive_failures = 0;
                    self.stats.service_queries += 1;
                    self.cache.insert(key, km);
                    return km;
                }
                Ok(km) => {
                    tracing::warn!(service = service.name(), km, "rejected distance, using haversine");
                    self.consecutive_failures += 1;
                }
                Err(err) => {
                    tracing::warn!(service = service.name(), error = %err, "distance query failed, using haversine");
                    self.consecutive_failures += 1;
                }
            }
            if self.failure_limit != 0 && self.consecutive_failures == self.failure_limit {
                tracing::warn!(
                    service = service.name(),
                    failures = self.consecutive_failures,
                    "distance service disabled for the rest of this run"
                );
            }
        }

        self.stats.fallbacks += 1;
        haversine_km(from, to)
    }

    /// Sum of consecutive costs along `points`.
    pub fn path_km(&mut self, points: &[Point]) -> f64 {
        points.windows(2).map(|pair| self.cost(pair[0], pair[1])).sum()
    }
}
