//! Ordering of waypoint results.

use super::search::{Evaluation, OptimizedRoute};

/// Pick the evaluation with the shortest total duration.
///
/// Ties go to the earliest entry, so the caller's candidate order decides.
pub fn select_best(evaluations: Vec<Evaluation>) -> Option<Evaluation> {
    // min_by_key keeps the first of equal minima
    evaluations
        .into_iter()
        .min_by_key(|e| e.total_duration_secs)
}

/// Sort routes by total duration, shortest first.
///
/// The sort is stable: routes with equal durations keep their order.
pub fn rank_by_duration(mut routes: Vec<OptimizedRoute>) -> Vec<OptimizedRoute> {
    routes.sort_by_key(|r| r.total_duration_secs);
    routes
}
