//! Locality clustering and nearest-cluster-first sequencing.
//!
//! Stops are bucketed by their normalized neighborhood label. Buckets are
//! visited greedily, closest representative (first member) first, and each
//! bucket is ordered on its own: nearest-neighbor draft, then 2-opt from the
//! position where the previous bucket ended.

use std::collections::HashMap;

use crate::oracle::DistanceOracle;
use crate::point::Point;
use crate::tour::nearest_neighbor;
use crate::traits::{DistanceService, Stop};
use crate::two_opt::refine;

/// Bucket for stops without a locality label.
pub const GENERAL_CLUSTER: &str = "GENERAL";

/// Uppercased, trimmed locality; blank or missing labels map to
/// [`GENERAL_CLUSTER`].
pub fn locality_key(label: Option<&str>) -> String {
    match label.map(str::trim) {
        Some(label) if !label.is_empty() => label.to_uppercase(),
        _ => GENERAL_CLUSTER.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cluster<T> {
    pub key: String,
    pub stops: Vec<T>,
}

impl<T: Stop> Cluster<T> {
    /// Coordinates of the first member, if it has any.
    pub fn representative(&self) -> Option<Point> {
        self.stops.first().and_then(|stop| stop.finite_location())
    }
}

/// Groups stops by locality key. Buckets keep first-appearance order and
/// members keep input order.
pub fn group_by_locality<T: Stop>(stops: Vec<T>) -> Vec<Cluster<T>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut clusters: Vec<Cluster<T>> = Vec::new();

    for stop in stops {
        let key = locality_key(stop.locality());
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            clusters.push(Cluster {
                key,
                stops: Vec::new(),
            });
            clusters.len() - 1
        });
        clusters[slot].stops.push(stop);
    }

    clusters
}

/// Per-cluster result of [`sequence_clusters`], in visiting order.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterVisit {
    pub key: String,
    pub stops: usize,
    pub draft_km: f64,
    pub refined_km: f64,
    /// False when the cluster had no usable representative and was
    /// appended unordered.
    pub optimized: bool,
}

/// Visits clusters nearest-first from `origin` and concatenates their
/// optimized sub-tours.
pub fn sequence_clusters<T, S>(
    origin: Point,
    clusters: Vec<Cluster<T>>,
    oracle: &mut DistanceOracle<S>,
    max_passes: usize,
) -> (Vec<T>, Vec<ClusterVisit>)
where
    T: Stop,
    S: DistanceService,
{
    let mut remaining: Vec<Option<Cluster<T>>> = clusters.into_iter().map(Some).collect();
    let mut ordered = Vec::new();
    let mut visits = Vec::new();
    let mut current = origin;

    loop {
        let mut best: Option<(usize, f64)> = None;
        for (index, cluster) in remaining.iter().enumerate() {
            let Some(representative) = cluster.as_ref().and_then(Cluster::representative) else {
                continue;
            };
            let cost = oracle.cost(current, representative);
            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((index, cost));
            }
        }

        let Some((index, _)) = best else {
            break;
        };
        let Some(cluster) = remaining[index].take() else {
            break;
        };

        tracing::debug!(cluster = %cluster.key, stops = cluster.stops.len(), "ordering cluster");
        let count = cluster.stops.len();
        let draft = nearest_neighbor(current, cluster.stops, oracle);
        let (tour, stats) = refine(current, draft, oracle, max_passes);

        if let Some(last) = tour.iter().rev().find_map(|stop| stop.finite_location()) {
            current = last;
        }

        visits.push(ClusterVisit {
            key: cluster.key,
            stops: count,
            draft_km: stats.draft_km,
            refined_km: stats.refined_km,
            optimized: true,
        });
        ordered.extend(tour);
    }

    for cluster in remaining.into_iter().flatten() {
        tracing::warn!(cluster = %cluster.key, "cluster has no locatable representative, appending as is");
        visits.push(ClusterVisit {
            key: cluster.key,
            stops: cluster.stops.len(),
            draft_km: 0.0,
            refined_km: 0.0,
            optimized: false,
        });
        ordered.extend(cluster.stops);
    }

    (ordered, visits)
}
