//! Mock record normalization.
//!
//! Submissions arrive as loosely-typed JSON, whether hand-entered through a
//! form or imported from a test platform: numbers may be strings, blanks, or
//! missing entirely. Normalization shapes a raw submission into a canonical
//! [`MockRecord`] or rejects it naming the first invalid field.
//!
//! Coercion policy: non-mandatory numeric fields default to 0 when blank or
//! unparseable, and negative counts clamp to zero. `name` and
//! `score_overall` are mandatory and never defaulted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::{MockRecord, SectionResult};

/// A submitted mock failed validation. No partial record is created.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid value for field: {0}")]
    InvalidField(String),
}

/// Raw mock submission as received from a form or import.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMockSubmission {
    #[serde(default)]
    pub name: Option<Value>,

    #[serde(default)]
    pub total_marks: Option<Value>,

    #[serde(default)]
    pub score_overall: Option<Value>,

    #[serde(default)]
    pub percentile_overall: Option<Value>,

    /// `YYYY-MM-DD` or an RFC 3339 timestamp; today when omitted
    #[serde(default)]
    pub date_taken: Option<Value>,

    #[serde(default)]
    pub is_analyzed: Option<bool>,

    #[serde(default)]
    pub sections: Vec<RawSectionEntry>,
}

/// Raw per-section entry of a submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSectionEntry {
    #[serde(default)]
    pub name: Option<Value>,

    #[serde(default)]
    pub score: Option<Value>,

    #[serde(default)]
    pub correct_count: Option<Value>,

    #[serde(default)]
    pub incorrect_count: Option<Value>,

    #[serde(default)]
    pub unattempted_count: Option<Value>,

    #[serde(default)]
    pub time_taken_seconds: Option<Value>,
}

const DEFAULT_TOTAL_MARKS: u32 = 200;

/// Coerce a loose JSON value to f64: numbers pass through, numeric strings
/// parse, everything else is None.
fn coerce_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

/// Coerce to a non-negative count. Blank or unparseable defaults to 0,
/// negatives clamp to 0.
fn coerce_count(value: Option<&Value>) -> u32 {
    coerce_f64(value).map_or(0, |v| v.max(0.0) as u32)
}

fn coerce_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        _ => None,
    }
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Validate and shape a raw submission into a canonical [`MockRecord`].
///
/// Fails on the first invalid field; does not attempt partial acceptance.
pub fn normalize_mock(raw: &RawMockSubmission) -> Result<MockRecord, ValidationError> {
    let name = coerce_string(raw.name.as_ref())
        .ok_or_else(|| ValidationError::MissingField("name".to_string()))?;

    let score_overall = coerce_f64(raw.score_overall.as_ref())
        .ok_or_else(|| ValidationError::MissingField("score_overall".to_string()))?;

    let total_marks = match raw.total_marks.as_ref() {
        Some(v) => coerce_f64(Some(v)).map_or(DEFAULT_TOTAL_MARKS, |m| m.max(0.0) as u32),
        None => DEFAULT_TOTAL_MARKS,
    };

    let date_taken = match raw.date_taken.as_ref() {
        Some(v) => {
            parse_date(v).ok_or_else(|| ValidationError::InvalidField("date_taken".to_string()))?
        }
        None => Utc::now().date_naive(),
    };

    // Blank percentile stays None: "no percentile reported" is not the 0th
    // percentile.
    let percentile_overall = coerce_f64(raw.percentile_overall.as_ref());

    let mut sections = Vec::with_capacity(raw.sections.len());
    for (idx, entry) in raw.sections.iter().enumerate() {
        let section_name = coerce_string(entry.name.as_ref())
            .ok_or_else(|| ValidationError::MissingField(format!("sections[{idx}].name")))?;

        let section = SectionResult::new(section_name, coerce_f64(entry.score.as_ref()).unwrap_or(0.0))
            .with_counts(
                coerce_count(entry.correct_count.as_ref()),
                coerce_count(entry.incorrect_count.as_ref()),
                coerce_count(entry.unattempted_count.as_ref()),
            )
            .with_time_taken(coerce_count(entry.time_taken_seconds.as_ref()));
        sections.push(section);
    }

    let mut mock = MockRecord::new(name, total_marks, score_overall, date_taken)
        .with_sections(sections)
        .with_analyzed(raw.is_analyzed.unwrap_or(false));
    if let Some(p) = percentile_overall {
        mock = mock.with_percentile(p);
    }

    debug!(id = %mock.id, name = %mock.name, "normalized mock submission");
    Ok(mock)
}
