//! Chronological performance trajectory.

use crate::models::{MockRecord, TrajectoryPoint};

/// Score/percentile series in chronological order (oldest first), for the
/// trajectory chart. Ties on date break by id ascending.
pub fn performance_trajectory(mocks: &[MockRecord]) -> Vec<TrajectoryPoint> {
    let mut sorted: Vec<&MockRecord> = mocks.iter().collect();
    sorted.sort_by(|a, b| a.date_taken.cmp(&b.date_taken).then_with(|| a.id.cmp(&b.id)));

    sorted
        .iter()
        .map(|m| TrajectoryPoint {
            date: m.date_taken.format("%Y-%m-%d").to_string(),
            overall_score: m.score_overall,
            percentile: m.percentile_overall,
        })
        .collect()
}
