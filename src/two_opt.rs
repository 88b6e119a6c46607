//! 2-opt local search over a drafted tour.
//!
//! The tour is evaluated behind a fixed anchor (the traveler's position
//! before this segment), so the edge into the segment is reconsidered too.
//! Moves reverse `tour[i..=j]` for `1 <= i`, `j >= i + 2`, `j <= len - 2`
//! over the anchored sequence. The first strictly improving move is taken
//! and the scan restarts; the search stops after a pass with no improvement
//! or after `max_passes` passes.
//!
//! Each candidate is scored by recomputing the whole tour length, so one
//! pass is O(n³) oracle lookups (mostly cache hits). The pass cap bounds
//! the worst case.

use crate::oracle::DistanceOracle;
use crate::point::Point;
use crate::traits::{DistanceService, Stop};

pub const DEFAULT_MAX_PASSES: usize = 50;

/// Outcome counters of one refinement.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RefineStats {
    pub passes: usize,
    pub improvements: usize,
    pub draft_km: f64,
    pub refined_km: f64,
}

/// Improves `tour` (which starts right after `anchor`) and returns it
/// without the anchor.
pub fn refine<T, S>(
    anchor: Point,
    tour: Vec<T>,
    oracle: &mut DistanceOracle<S>,
    max_passes: usize,
) -> (Vec<T>, RefineStats)
where
    T: Stop,
    S: DistanceService,
{
    let points: Vec<Option<Point>> = std::iter::once(Some(anchor))
        .chain(tour.iter().map(|stop| stop.finite_location()))
        .collect();

    // Positions into `points`; index 0 is the anchor and never moves.
    let mut order: Vec<usize> = (0..points.len()).collect();
    let mut best_km = order_km(&order, &points, oracle);

    let mut stats = RefineStats {
        draft_km: best_km,
        refined_km: best_km,
        ..RefineStats::default()
    };

    let len = order.len();
    'passes: while stats.passes < max_passes {
        stats.passes += 1;

        for i in 1..len {
            for j in (i + 2)..len.saturating_sub(1) {
                let mut candidate = order.clone();
                candidate[i..=j].reverse();

                let candidate_km = order_km(&candidate, &points, oracle);
                if candidate_km < best_km {
                    order = candidate;
                    best_km = candidate_km;
                    stats.improvements += 1;
                    continue 'passes;
                }
            }
        }

        break;
    }

    stats.refined_km = best_km;
    tracing::debug!(
        stops = tour.len(),
        passes = stats.passes,
        improvements = stats.improvements,
        draft_km = stats.draft_km,
        refined_km = stats.refined_km,
        "2-opt finished"
    );

    let mut slots: Vec<Option<T>> = tour.into_iter().map(Some).collect();
    let refined = order
        .into_iter()
        .skip(1)
        .filter_map(|position| slots[position - 1].take())
        .collect();

    (refined, stats)
}

fn order_km<S: DistanceService>(
    order: &[usize],
    points: &[Option<Point>],
    oracle: &mut DistanceOracle<S>,
) -> f64 {
    let path: Vec<Point> = order.iter().filter_map(|&position| points[position]).collect();
    oracle.path_km(&path)
}
