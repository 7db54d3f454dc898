//! Mock test attempt model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{EntityId, MockId, SectionKey};

/// Exam tier, derived from the paper's total marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "Tier 1")]
    Tier1,
    #[serde(rename = "Tier 2")]
    Tier2,
}

impl Tier {
    /// Derive the tier from a paper's total marks, if recognized.
    pub fn from_total_marks(total_marks: u32) -> Option<Self> {
        match total_marks {
            200 => Some(Tier::Tier1),
            390 => Some(Tier::Tier2),
            _ => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Tier1 => write!(f, "Tier 1"),
            Tier::Tier2 => write!(f, "Tier 2"),
        }
    }
}

/// Per-section result within a mock attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionResult {
    /// Section label as entered or imported (free text, recurs per mock)
    pub name: String,

    /// Net score for the section
    pub score: f64,

    /// Questions answered correctly
    pub correct_count: u32,

    /// Questions answered incorrectly
    pub incorrect_count: u32,

    /// Questions left unattempted
    pub unattempted_count: u32,

    /// Time spent on the section
    pub time_taken_seconds: u32,
}

impl SectionResult {
    pub fn new(name: String, score: f64) -> Self {
        Self {
            name,
            score,
            correct_count: 0,
            incorrect_count: 0,
            unattempted_count: 0,
            time_taken_seconds: 0,
        }
    }

    /// Builder method to set attempt counts.
    pub fn with_counts(mut self, correct: u32, incorrect: u32, unattempted: u32) -> Self {
        self.correct_count = correct;
        self.incorrect_count = incorrect;
        self.unattempted_count = unattempted;
        self
    }

    /// Builder method to set time spent.
    pub fn with_time_taken(mut self, seconds: u32) -> Self {
        self.time_taken_seconds = seconds;
        self
    }

    /// Canonical section key for this label, if it maps to one.
    pub fn key(&self) -> Option<SectionKey> {
        SectionKey::from_label(&self.name)
    }

    /// Accuracy as a fraction (0.0 to 1.0) over attempted questions.
    pub fn accuracy(&self) -> f64 {
        let attempted = self.correct_count + self.incorrect_count;
        if attempted == 0 {
            0.0
        } else {
            self.correct_count as f64 / attempted as f64
        }
    }
}

/// A single mock test attempt with overall and sectional scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockRecord {
    /// Unique identifier (derived from name + date + overall score)
    pub id: MockId,

    /// Free-text label for the attempt
    pub name: String,

    /// Maximum marks of the paper
    pub total_marks: u32,

    /// Overall net score
    pub score_overall: f64,

    /// Overall percentile, if the platform reported one
    pub percentile_overall: Option<f64>,

    /// Day the mock was taken
    pub date_taken: NaiveDate,

    /// Whether the report page has marked this attempt as analyzed
    pub is_analyzed: bool,

    /// Exam tier derived from total_marks
    pub tier: Option<Tier>,

    /// Sectional results, in paper order
    pub sections: Vec<SectionResult>,

    /// When this record was created
    pub created_at: DateTime<Utc>,
}

impl MockRecord {
    /// Create a new MockRecord with auto-generated ID.
    pub fn new(name: String, total_marks: u32, score_overall: f64, date_taken: NaiveDate) -> Self {
        let id = EntityId::generate(&[
            &name,
            &date_taken.to_string(),
            &format!("{score_overall}"),
        ]);

        Self {
            id,
            name,
            total_marks,
            score_overall,
            percentile_overall: None,
            date_taken,
            is_analyzed: false,
            tier: Tier::from_total_marks(total_marks),
            sections: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Builder method to set the overall percentile.
    pub fn with_percentile(mut self, percentile: f64) -> Self {
        self.percentile_overall = Some(percentile);
        self
    }

    /// Builder method to set sectional results.
    pub fn with_sections(mut self, sections: Vec<SectionResult>) -> Self {
        self.sections = sections;
        self
    }

    /// Builder method to set the analyzed flag.
    pub fn with_analyzed(mut self, analyzed: bool) -> Self {
        self.is_analyzed = analyzed;
        self
    }

    /// Find the sectional result for a canonical key, if present.
    pub fn section(&self, key: SectionKey) -> Option<&SectionResult> {
        self.sections.iter().find(|s| s.key() == Some(key))
    }

    /// Sum of sectional net scores over sections that map to a canonical key.
    pub fn sectional_net_sum(&self) -> f64 {
        self.sections
            .iter()
            .filter(|s| s.key().is_some())
            .map(|s| s.score)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mock() -> MockRecord {
        MockRecord::new(
            "SSC CGL Mock 14".to_string(),
            200,
            142.5,
            NaiveDate::from_ymd_opt(2025, 8, 2).unwrap(),
        )
        .with_percentile(91.3)
        .with_sections(vec![
            SectionResult::new("Quantitative Aptitude".to_string(), 38.0)
                .with_counts(21, 4, 0)
                .with_time_taken(900),
            SectionResult::new("General Intelligence & Reasoning".to_string(), 42.5)
                .with_counts(22, 2, 1)
                .with_time_taken(780),
        ])
    }

    #[test]
    fn test_mock_creation() {
        let mock = sample_mock();
        assert_eq!(mock.name, "SSC CGL Mock 14");
        assert!(!mock.id.as_str().is_empty());
        assert_eq!(mock.tier, Some(Tier::Tier1));
        assert!(!mock.is_analyzed);
    }

    #[test]
    fn test_mock_id_deterministic() {
        let a = MockRecord::new(
            "Mock".to_string(),
            200,
            100.0,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        let b = MockRecord::new(
            "Mock".to_string(),
            200,
            100.0,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        assert_eq!(a.id, b.id);

        let c = MockRecord::new(
            "Mock".to_string(),
            200,
            101.0,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_tier_from_total_marks() {
        assert_eq!(Tier::from_total_marks(200), Some(Tier::Tier1));
        assert_eq!(Tier::from_total_marks(390), Some(Tier::Tier2));
        assert_eq!(Tier::from_total_marks(100), None);
    }

    #[test]
    fn test_section_lookup_by_key() {
        let mock = sample_mock();
        let maths = mock.section(SectionKey::Maths).unwrap();
        assert_eq!(maths.score, 38.0);
        assert!(mock.section(SectionKey::English).is_none());
    }

    #[test]
    fn test_section_accuracy() {
        let section = SectionResult::new("Maths".to_string(), 38.0).with_counts(21, 4, 0);
        assert!((section.accuracy() - 0.84).abs() < 1e-9);

        let untouched = SectionResult::new("Maths".to_string(), 0.0);
        assert_eq!(untouched.accuracy(), 0.0);
    }

    #[test]
    fn test_sectional_net_sum_skips_unmapped() {
        let mock = MockRecord::new(
            "Mock".to_string(),
            200,
            50.0,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
        .with_sections(vec![
            SectionResult::new("Maths".to_string(), 30.0),
            SectionResult::new("Computer Knowledge".to_string(), 10.0),
            SectionResult::new("English".to_string(), 20.0),
        ]);

        assert_eq!(mock.sectional_net_sum(), 50.0);
    }

    #[test]
    fn test_mock_serialization() {
        let mock = sample_mock();
        let json = serde_json::to_string(&mock).unwrap();
        let deserialized: MockRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(mock.id, deserialized.id);
        assert_eq!(mock.percentile_overall, deserialized.percentile_overall);
        assert_eq!(mock.sections.len(), deserialized.sections.len());
    }

    #[test]
    fn test_tier_serde_rename() {
        let json = serde_json::to_string(&Tier::Tier1).unwrap();
        assert_eq!(json, "\"Tier 1\"");
    }
}
