//! Report aggregation engine.
//!
//! Turns the mock collection into the bucketed, windowed, averaged views
//! the dashboard and report pages consume:
//!
//! - **brackets**: fixed-width score/percentile distribution buckets
//! - **window**: last-3/5/10 condensed summaries
//! - **averages**: analyzed-only sectional and overall means
//! - **trajectory**: chronological score series
//! - **weakness**: subject/topic/sub-topic mistake count tree
//!
//! The assembler is a pure, synchronous function over an in-memory
//! snapshot: no I/O, no shared state, safe to call repeatedly and
//! concurrently. Calling it twice on an unchanged collection produces
//! byte-identical output.

pub mod averages;
pub mod brackets;
pub mod trajectory;
pub mod weakness;
pub mod window;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{
    AttemptCounts, MarkTotals, MockLogEntry, MockRecord, PerformanceReport, ReportCard,
    ScoreDiscrepancy, SectionBreakdown,
};

use brackets::BracketScheme;

/// Knobs for report assembly. Field defaults match the source platform's
/// marking scheme (+2 per correct, -0.5 per incorrect, 200-mark paper).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Tolerance when comparing summed sectional marks to the stated
    /// overall score. Mismatches beyond it are advisories, never errors.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    #[serde(default = "default_marks_per_correct")]
    pub marks_per_correct: f64,

    #[serde(default = "default_penalty_per_incorrect")]
    pub penalty_per_incorrect: f64,

    /// Upper bound of the overall-score bracket scheme.
    #[serde(default = "default_score_bracket_max")]
    pub score_bracket_max: f64,
}

fn default_epsilon() -> f64 {
    0.5
}

fn default_marks_per_correct() -> f64 {
    2.0
}

fn default_penalty_per_incorrect() -> f64 {
    0.5
}

fn default_score_bracket_max() -> f64 {
    200.0
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
            marks_per_correct: default_marks_per_correct(),
            penalty_per_incorrect: default_penalty_per_incorrect(),
            score_bracket_max: default_score_bracket_max(),
        }
    }
}

/// Round to two decimals, the precision the report pages display.
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Assemble the full performance report from a snapshot of mocks.
///
/// Brackets, windows, the full log, and `total_mocks` cover every mock;
/// sectional and overall averages cover analyzed mocks only. Per-mock
/// score-vs-net mismatches beyond `epsilon` are collected as advisories
/// and logged at warn level.
pub fn assemble_report(mocks: &[MockRecord], opts: &ReportOptions) -> PerformanceReport {
    let ordered = window::recent_first(mocks);

    let mut full_mock_log = Vec::with_capacity(ordered.len());
    let mut discrepancies = Vec::new();

    for mock in &ordered {
        let entry = log_entry(mock, opts);

        let computed = mock.sectional_net_sum();
        let delta = computed - mock.score_overall;
        if delta.abs() > opts.epsilon {
            warn!(
                mock_id = %mock.id,
                stated = mock.score_overall,
                computed,
                "sectional net marks disagree with stated overall score"
            );
            discrepancies.push(ScoreDiscrepancy {
                mock_id: mock.id.clone(),
                stated: mock.score_overall,
                computed: round2(computed),
                delta: round2(delta),
            });
        }

        full_mock_log.push(entry);
    }

    let report_card = if ordered.is_empty() {
        ReportCard::default()
    } else {
        report_card(&ordered, &full_mock_log, opts)
    };

    debug!(
        mocks = ordered.len(),
        discrepancies = discrepancies.len(),
        "assembled performance report"
    );

    PerformanceReport {
        full_mock_log,
        report_card,
        discrepancies,
    }
}

fn log_entry(mock: &MockRecord, opts: &ReportOptions) -> MockLogEntry {
    let mut sections = BTreeMap::new();
    let mut totals = SectionBreakdown::default();

    for s in &mock.sections {
        let Some(key) = s.key() else {
            continue;
        };

        let positive = s.correct_count as f64 * opts.marks_per_correct;
        let negative = s.incorrect_count as f64 * opts.penalty_per_incorrect;
        let breakdown = SectionBreakdown {
            attempts: AttemptCounts {
                right: s.correct_count,
                wrong: s.incorrect_count,
                left: s.unattempted_count,
            },
            marks: MarkTotals {
                positive,
                negative,
                net: s.score,
            },
        };

        totals.attempts.right += breakdown.attempts.right;
        totals.attempts.wrong += breakdown.attempts.wrong;
        totals.attempts.left += breakdown.attempts.left;
        totals.marks.positive += positive;
        totals.marks.negative += negative;
        totals.marks.net += s.score;

        sections.insert(key, breakdown);
    }

    MockLogEntry {
        id: mock.id.clone(),
        date: mock.date_taken.format("%d-%b-%Y").to_string(),
        name: mock.name.clone(),
        total_score: mock.score_overall,
        percentile: mock.percentile_overall,
        sections,
        totals,
        is_analyzed: mock.is_analyzed,
    }
}

fn report_card(
    ordered: &[&MockRecord],
    full_mock_log: &[MockLogEntry],
    opts: &ReportOptions,
) -> ReportCard {
    let score_scheme = BracketScheme::score(opts.score_bracket_max);
    let percentile_scheme = BracketScheme::percentile();

    let mut score_brackets: BTreeMap<String, u32> =
        score_scheme.labels().into_iter().map(|l| (l, 0)).collect();
    let mut percentile_brackets: BTreeMap<String, u32> = percentile_scheme
        .labels()
        .into_iter()
        .map(|l| (l, 0))
        .collect();

    for mock in ordered {
        *score_brackets
            .entry(score_scheme.classify(mock.score_overall))
            .or_default() += 1;
        if let Some(p) = mock.percentile_overall {
            *percentile_brackets
                .entry(percentile_scheme.classify(p))
                .or_default() += 1;
        }
    }

    let analyzed: Vec<&MockRecord> = ordered
        .iter()
        .filter(|m| m.is_analyzed)
        .copied()
        .collect();

    ReportCard {
        score_brackets,
        percentile_brackets,
        last_3_mocks: window::last_n(full_mock_log, 3),
        last_5_mocks: window::last_n(full_mock_log, 5),
        last_10_mocks: window::last_n(full_mock_log, 10),
        sectional_averages: averages::sectional_score_averages(&analyzed),
        overall_avg_score: averages::overall_average(&analyzed),
        total_mocks: ordered.len() as u32,
    }
}
