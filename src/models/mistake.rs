//! Logged mistake model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{EntityId, MistakeId, MockId};

/// How the question was missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    Incorrect,
    Unattempted,
}

impl QuestionType {
    /// Parse from the request-form spelling used by the uploader.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "incorrect" => Some(QuestionType::Incorrect),
            "unattempted" => Some(QuestionType::Unattempted),
            _ => None,
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Incorrect => write!(f, "Incorrect"),
            QuestionType::Unattempted => write!(f, "Unattempted"),
        }
    }
}

/// Subject/topic/sub-topic triple attached to a mistake during analysis.
/// Feeds the weakness breakdown tree.
#[derive(Debug, Clone, Default)]
pub struct MistakeClassification {
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub sub_topic: Option<String>,
}

/// A logged missed question, optionally with an explanation attached later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MistakeRecord {
    /// Unique identifier (derived from mock id + image path + section)
    pub id: MistakeId,

    /// Owning mock
    pub mock_id: MockId,

    /// Screenshot path relative to the upload directory
    pub image_path: String,

    /// Explanation text; None means "not yet analyzed"
    pub analysis_text: Option<String>,

    /// Granular topic fields filled in during analysis
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub sub_topic: Option<String>,

    /// Section label the question belonged to
    pub section_name: String,

    /// Incorrect or unattempted
    pub question_type: QuestionType,

    /// Free-text notes from the user
    pub notes: String,

    /// When this record was created
    pub created_at: DateTime<Utc>,
}

impl MistakeRecord {
    /// Create a new MistakeRecord with auto-generated ID.
    pub fn new(
        mock_id: MockId,
        image_path: String,
        section_name: String,
        question_type: QuestionType,
    ) -> Self {
        let id = EntityId::generate(&[mock_id.as_str(), &image_path, &section_name]);

        Self {
            id,
            mock_id,
            image_path,
            analysis_text: None,
            subject: None,
            topic: None,
            sub_topic: None,
            section_name,
            question_type,
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Builder method to set notes.
    pub fn with_notes(mut self, notes: String) -> Self {
        self.notes = notes;
        self
    }

    /// Whether an explanation has been attached.
    pub fn is_analyzed(&self) -> bool {
        self.analysis_text.is_some()
    }
}
