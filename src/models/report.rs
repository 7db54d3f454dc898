//! Derived report models.
//!
//! These are the shapes the report and dashboard pages consume. They are
//! recomputed from the mock collection on every request and never stored,
//! so every container here is ordered: assembling the same input twice
//! must serialize byte-identically.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{MockId, SectionKey};

/// Right/wrong/left attempt counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttemptCounts {
    pub right: u32,
    pub wrong: u32,
    pub left: u32,
}

/// Positive/negative/net marks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkTotals {
    pub positive: f64,
    pub negative: f64,
    pub net: f64,
}

/// Attempt and mark breakdown for one section (or a whole mock).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionBreakdown {
    pub attempts: AttemptCounts,
    pub marks: MarkTotals,
}

/// One row of the detailed report table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockLogEntry {
    pub id: MockId,

    /// Display date, `%d-%b-%Y`
    pub date: String,

    pub name: String,
    pub total_score: f64,
    pub percentile: Option<f64>,

    /// Per-section breakdown, keyed by canonical section
    pub sections: BTreeMap<SectionKey, SectionBreakdown>,

    /// Sums across all canonical sections of this mock
    pub totals: SectionBreakdown,

    pub is_analyzed: bool,
}

/// Condensed per-mock summary used by the last-N trend tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowEntry {
    pub name: String,
    pub total: f64,
    pub maths: f64,
    pub reasoning: f64,
    pub english: f64,
    pub gk: f64,
    pub positive: f64,
    pub negative: f64,
}

/// The dashboard report card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportCard {
    /// Bracket label ("60-70") to count of mocks whose score falls in it
    pub score_brackets: BTreeMap<String, u32>,

    /// Same, over overall percentile; mocks without one are skipped
    pub percentile_brackets: BTreeMap<String, u32>,

    pub last_3_mocks: Vec<WindowEntry>,
    pub last_5_mocks: Vec<WindowEntry>,
    pub last_10_mocks: Vec<WindowEntry>,

    /// Mean sectional net score across analyzed mocks
    pub sectional_averages: BTreeMap<SectionKey, f64>,

    /// Mean overall score across analyzed mocks
    pub overall_avg_score: f64,

    /// Count of all mocks, analyzed or not
    pub total_mocks: u32,
}

/// Advisory raised when a mock's summed sectional marks disagree with its
/// stated overall score. Never fatal; the source data is hand-entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreDiscrepancy {
    pub mock_id: MockId,
    pub stated: f64,
    pub computed: f64,
    pub delta: f64,
}

/// Full output of the report assembler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub full_mock_log: Vec<MockLogEntry>,
    pub report_card: ReportCard,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discrepancies: Vec<ScoreDiscrepancy>,
}

/// Sectional deep-dive row: analyzed-mock means for one section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionAverage {
    pub average_score: f64,

    /// Mean per-mock accuracy, 0.0 to 1.0
    pub average_accuracy: f64,

    /// Mean time spent, in minutes
    pub average_time_minutes: f64,
}

/// Leaf of the weakness tree: mistake count for one sub-topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaknessLeaf {
    pub name: String,
    pub value: u32,
}

/// One topic under a subject, with its sub-topic counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaknessTopic {
    pub name: String,
    pub children: Vec<WeaknessLeaf>,
}

/// Top level of the weakness tree: one analyzed subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaknessSubject {
    pub name: String,
    pub children: Vec<WeaknessTopic>,
}

/// One point on the chronological performance trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// `%Y-%m-%d`
    pub date: String,

    pub overall_score: f64,
    pub percentile: Option<f64>,
}
