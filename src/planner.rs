//! Route assembly: the single entry point callers use to order stops.
//!
//! Per call: reset the oracle, partition stops into locatable/unlocatable,
//! short-circuit when fewer than two can be located, order the locatable
//! stops cluster by cluster, then append the unlocatable ones in their
//! input order. The distance cache is emptied again before returning.
//! Nothing here returns an error; every collaborator failure has already
//! been degraded by the oracle.

use crate::cluster::{group_by_locality, sequence_clusters, Cluster, ClusterVisit, GENERAL_CLUSTER};
use crate::oracle::{DistanceOracle, OracleStats};
use crate::point::Point;
use crate::tour::tour_km;
use crate::traits::{DistanceService, Stop};
use crate::two_opt::DEFAULT_MAX_PASSES;

#[derive(Debug, Clone)]
pub struct RouteOptions {
    /// Cap on full 2-opt passes per cluster.
    pub max_two_opt_passes: usize,
    /// Group stops by neighborhood before ordering. When false, all
    /// locatable stops are ordered as one cluster.
    pub cluster_by_locality: bool,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            max_two_opt_passes: DEFAULT_MAX_PASSES,
            cluster_by_locality: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoutePlan<T> {
    /// Every input stop, locatable ones first in visiting order.
    pub order: Vec<T>,
    /// The origin actually used, if any stop could be located.
    pub origin: Option<Point>,
    pub locatable: usize,
    pub unlocatable: usize,
    pub clusters: Vec<ClusterVisit>,
    /// Length of the locatable part in output order, starting at the origin.
    pub total_km: f64,
    pub stats: OracleStats,
}

/// Orders `stops` for visiting, starting from `origin`.
///
/// When `origin` is `None`, the first locatable stop's coordinates are used.
pub fn optimize<T, S>(
    origin: Option<Point>,
    stops: Vec<T>,
    oracle: &mut DistanceOracle<S>,
    options: &RouteOptions,
) -> Vec<T>
where
    T: Stop,
    S: DistanceService,
{
    plan(origin, stops, oracle, options).order
}

/// Like [`optimize`], but also reports what was done.
pub fn plan<T, S>(
    origin: Option<Point>,
    stops: Vec<T>,
    oracle: &mut DistanceOracle<S>,
    options: &RouteOptions,
) -> RoutePlan<T>
where
    T: Stop,
    S: DistanceService,
{
    let (locatable, unlocatable): (Vec<T>, Vec<T>) =
        stops.into_iter().partition(|stop| stop.finite_location().is_some());
    let locatable_count = locatable.len();
    let unlocatable_count = unlocatable.len();

    let origin = origin
        .filter(Point::is_finite)
        .or_else(|| locatable.first().and_then(|stop| stop.finite_location()));

    oracle.reset();

    if locatable_count <= 1 {
        let total_km = match origin {
            Some(start) => tour_km(start, &locatable, oracle),
            None => 0.0,
        };
        let stats = oracle.stats();
        oracle.clear_cache();
        tracing::debug!(
            locatable = locatable_count,
            unlocatable = unlocatable_count,
            total_km,
            "nothing to reorder"
        );
        let mut order = locatable;
        order.extend(unlocatable);
        return RoutePlan {
            order,
            origin,
            locatable: locatable_count,
            unlocatable: unlocatable_count,
            clusters: Vec::new(),
            total_km,
            stats,
        };
    }

    // At least two locatable stops, so an origin exists.
    let start = origin.unwrap_or(Point::new(0.0, 0.0));

    let clusters = if options.cluster_by_locality {
        group_by_locality(locatable)
    } else {
        vec![Cluster {
            key: GENERAL_CLUSTER.to_string(),
            stops: locatable,
        }]
    };

    let (mut order, visits) = sequence_clusters(start, clusters, oracle, options.max_two_opt_passes);
    order.extend(unlocatable);

    let total_km: f64 = visits.iter().map(|visit| visit.refined_km).sum();
    let stats = oracle.stats();
    oracle.clear_cache();

    tracing::info!(
        locatable = locatable_count,
        unlocatable = unlocatable_count,
        clusters = visits.len(),
        service_queries = stats.service_queries,
        cache_hits = stats.cache_hits,
        fallbacks = stats.fallbacks,
        total_km,
        "route optimized"
    );

    RoutePlan {
        order,
        origin,
        locatable: locatable_count,
        unlocatable: unlocatable_count,
        clusters: visits,
        total_km,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haversine::Haversine;

    #[derive(Debug, Clone, PartialEq)]
    struct Pin(&'static str, Option<Point>);

    impl Stop for Pin {
        fn location(&self) -> Option<Point> {
            self.1
        }

        fn locality(&self) -> Option<&str> {
            None
        }
    }

    #[test]
    fn missing_origin_starts_at_first_locatable_stop() {
        let mut oracle = DistanceOracle::new(Haversine);
        let stops = vec![
            Pin("ghost", None),
            Pin("start", Some(Point::new(0.0, 5.0))),
            Pin("far", Some(Point::new(0.0, 0.0))),
            Pin("near", Some(Point::new(0.0, 4.0))),
        ];
        let plan = plan(None, stops, &mut oracle, &RouteOptions::default());
        let names: Vec<&str> = plan.order.iter().map(|p| p.0).collect();
        assert_eq!(names, vec!["start", "near", "far", "ghost"]);
        assert_eq!(plan.origin, Some(Point::new(0.0, 5.0)));
    }

    #[test]
    fn non_finite_origin_is_ignored() {
        let mut oracle = DistanceOracle::new(Haversine);
        let stops = vec![Pin("a", Some(Point::new(0.0, 1.0))), Pin("b", Some(Point::new(0.0, 2.0)))];
        let plan = plan(Some(Point::new(f64::NAN, 0.0)), stops, &mut oracle, &RouteOptions::default());
        assert_eq!(plan.origin, Some(Point::new(0.0, 1.0)));
        assert!(plan.total_km.is_finite());
    }

    #[test]
    fn single_stop_is_not_optimized() {
        let mut oracle = DistanceOracle::new(Haversine);
        let stops = vec![Pin("only", Some(Point::new(0.0, 1.0))), Pin("ghost", None)];
        let plan = plan(Some(Point::new(0.0, 0.0)), stops.clone(), &mut oracle, &RouteOptions::default());
        assert_eq!(plan.order, stops);
        assert!(plan.clusters.is_empty());

        let leg = crate::haversine::haversine_km(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
        assert!((plan.total_km - leg).abs() < 1e-6);
        assert_eq!(plan.stats.service_queries, 1);
    }

    #[test]
    fn no_locatable_stops_has_no_length() {
        let mut oracle = DistanceOracle::new(Haversine);
        let stops = vec![Pin("ghost", None), Pin("shade", None)];
        let plan = plan(Some(Point::new(0.0, 0.0)), stops.clone(), &mut oracle, &RouteOptions::default());
        assert_eq!(plan.order, stops);
        assert_eq!(plan.total_km, 0.0);
        assert_eq!(plan.stats, OracleStats::default());
    }

    #[test]
    fn non_finite_stop_is_unlocatable() {
        let mut oracle = DistanceOracle::new(Haversine);
        let stops = vec![
            Pin("nan", Some(Point::new(f64::NAN, 0.5))),
            Pin("far", Some(Point::new(0.0, 3.0))),
            Pin("near", Some(Point::new(0.0, 1.0))),
            Pin("inf", Some(Point::new(0.0, f64::INFINITY))),
            Pin("mid", Some(Point::new(0.0, 2.0))),
        ];
        let plan = plan(Some(Point::new(0.0, 0.0)), stops, &mut oracle, &RouteOptions::default());
        let names: Vec<&str> = plan.order.iter().map(|p| p.0).collect();
        assert_eq!(names, vec!["near", "mid", "far", "nan", "inf"]);
        assert_eq!(plan.locatable, 3);
        assert_eq!(plan.unlocatable, 2);
        assert!(plan.total_km.is_finite());
    }

    #[test]
    fn cache_is_discarded_when_the_call_returns() {
        let mut oracle = DistanceOracle::new(Haversine);
        let stops = vec![Pin("b", Some(Point::new(0.0, 2.0))), Pin("a", Some(Point::new(0.0, 1.0)))];
        let plan = plan(Some(Point::new(0.0, 0.0)), stops, &mut oracle, &RouteOptions::default());
        assert!(plan.stats.service_queries > 0);
        assert_eq!(oracle.cached_pairs(), 0);
    }

    #[test]
    fn reports_total_length() {
        let mut oracle = DistanceOracle::new(Haversine);
        let stops = vec![Pin("b", Some(Point::new(0.0, 2.0))), Pin("a", Some(Point::new(0.0, 1.0)))];
        let plan = plan(Some(Point::new(0.0, 0.0)), stops, &mut oracle, &RouteOptions::default());
        let expected = crate::haversine::haversine_km(Point::new(0.0, 0.0), Point::new(0.0, 2.0));
        assert!((plan.total_km - expected).abs() < 1e-6);
        assert_eq!(plan.clusters.len(), 1);
    }
}
