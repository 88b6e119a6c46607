//! Nearest-neighbor tour construction.

use crate::oracle::DistanceOracle;
use crate::point::Point;
use crate::traits::{DistanceService, Stop};

/// Greedily orders `stops` starting from `origin`: always visit the closest
/// stop not yet placed.
///
/// Ties go to the stop that came first in the input. Stops are expected to
/// be locatable; one that is not is never preferred by distance, and when
/// no stop can be compared the first remaining one is taken, so the loop
/// always terminates.
pub fn nearest_neighbor<T, S>(origin: Point, stops: Vec<T>, oracle: &mut DistanceOracle<S>) -> Vec<T>
where
    T: Stop,
    S: DistanceService,
{
    let mut pending = stops;
    let mut tour = Vec::with_capacity(pending.len());
    let mut current = origin;

    while !pending.is_empty() {
        let mut best: Option<(usize, f64)> = None;
        for (index, stop) in pending.iter().enumerate() {
            let Some(location) = stop.finite_location() else {
                continue;
            };
            let cost = oracle.cost(current, location);
            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((index, cost));
            }
        }

        let index = match best {
            Some((index, _)) => index,
            None => {
                tracing::warn!(remaining = pending.len(), "no comparable stop left, taking the next in order");
                0
            }
        };

        let next = pending.remove(index);
        if let Some(location) = next.finite_location() {
            current = location;
        }
        tour.push(next);
    }

    tour
}

/// Length of `start -> stops[0] -> ... -> stops[n-1]`, skipping stops
/// without coordinates.
pub fn tour_km<T, S>(start: Point, stops: &[T], oracle: &mut DistanceOracle<S>) -> f64
where
    T: Stop,
    S: DistanceService,
{
    let points: Vec<Point> = std::iter::once(start)
        .chain(stops.iter().filter_map(|stop| stop.finite_location()))
        .collect();
    oracle.path_km(&points)
}
