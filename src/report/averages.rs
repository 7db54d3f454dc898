//! Sectional and overall averaging across analyzed mocks.

use std::collections::BTreeMap;

use crate::models::{MockRecord, SectionAverage, SectionKey};

use super::round2;

/// Mean sectional net score per canonical section, across the given
/// (already analyzed-filtered) mocks.
///
/// Every canonical key is present in the output. A mock missing a section
/// is excluded from that section's mean only; with no contributing mocks
/// the mean is 0, never NaN.
pub fn sectional_score_averages(mocks: &[&MockRecord]) -> BTreeMap<SectionKey, f64> {
    let mut averages = BTreeMap::new();
    for key in SectionKey::ALL {
        let scores: Vec<f64> = mocks
            .iter()
            .filter_map(|m| m.section(key))
            .map(|s| s.score)
            .collect();
        averages.insert(key, round2(mean(&scores)));
    }
    averages
}

/// Mean overall score across the given mocks; 0 when empty.
pub fn overall_average(mocks: &[&MockRecord]) -> f64 {
    let scores: Vec<f64> = mocks.iter().map(|m| m.score_overall).collect();
    round2(mean(&scores))
}

/// Per-section deep dive: mean score, accuracy, and time spent.
pub fn sectional_deep_dive(mocks: &[&MockRecord]) -> BTreeMap<SectionKey, SectionAverage> {
    let mut out = BTreeMap::new();
    for key in SectionKey::ALL {
        let sections: Vec<_> = mocks.iter().filter_map(|m| m.section(key)).collect();

        let scores: Vec<f64> = sections.iter().map(|s| s.score).collect();
        let accuracies: Vec<f64> = sections.iter().map(|s| s.accuracy()).collect();
        // Time is stored in seconds but reported in minutes.
        let minutes: Vec<f64> = sections
            .iter()
            .map(|s| s.time_taken_seconds as f64 / 60.0)
            .collect();

        out.insert(
            key,
            SectionAverage {
                average_score: round2(mean(&scores)),
                average_accuracy: round2(mean(&accuracies)),
                average_time_minutes: round2(mean(&minutes)),
            },
        );
    }
    out
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
