//! Mock and mistake persistence operations.
//!
//! `MockStore` owns the load-mutate-rewrite cycle over the JSONL files.
//! A mock and its sections are one record, so they are created and deleted
//! atomically; deleting a mock cascades to its mistakes.

use thiserror::Error;
use tracing::info;

use crate::batch::{run_batch, BatchReport};
use crate::models::{MistakeClassification, MistakeRecord, MockRecord, QuestionType};
use crate::normalize::{normalize_mock, RawMockSubmission, ValidationError};
use crate::storage::{EntityType, JsonlReader, JsonlWriter, StorageConfig, StorageError};

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("mock not found: {0}")]
    MockNotFound(String),

    #[error("mistake not found: {0}")]
    MistakeNotFound(String),

    #[error("mock already exists: {0}")]
    DuplicateMock(String),
}

/// Persistent collection of mocks and their mistakes.
pub struct MockStore {
    storage: StorageConfig,
}

impl MockStore {
    pub fn new(storage: StorageConfig) -> Self {
        Self { storage }
    }

    fn mock_reader(&self) -> JsonlReader<MockRecord> {
        JsonlReader::for_entity(&self.storage, EntityType::Mock)
    }

    fn mock_writer(&self) -> JsonlWriter<MockRecord> {
        JsonlWriter::for_entity(&self.storage, EntityType::Mock)
    }

    fn mistake_reader(&self) -> JsonlReader<MistakeRecord> {
        JsonlReader::for_entity(&self.storage, EntityType::Mistake)
    }

    fn mistake_writer(&self) -> JsonlWriter<MistakeRecord> {
        JsonlWriter::for_entity(&self.storage, EntityType::Mistake)
    }

    /// All mocks, most recent first (`date_taken` desc, id desc).
    pub fn list_mocks(&self) -> Result<Vec<MockRecord>, StoreError> {
        let mut mocks = self.mock_reader().read_all()?;
        mocks.sort_by(|a, b| {
            b.date_taken
                .cmp(&a.date_taken)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(mocks)
    }

    pub fn get_mock(&self, id: &str) -> Result<MockRecord, StoreError> {
        self.mock_reader()
            .read_all()?
            .into_iter()
            .find(|m| m.id.as_str() == id)
            .ok_or_else(|| StoreError::MockNotFound(id.to_string()))
    }

    /// Normalize and persist a submission. The mock and its sections are
    /// written as one record; nothing is stored if validation fails.
    pub fn create_mock(&self, raw: &RawMockSubmission) -> Result<MockRecord, StoreError> {
        let mock = normalize_mock(raw)?;

        let existing = self.mock_reader().read_all()?;
        if existing.iter().any(|m| m.id == mock.id) {
            return Err(StoreError::DuplicateMock(mock.id.to_string()));
        }

        self.mock_writer().append(&mock)?;
        info!(id = %mock.id, name = %mock.name, "created mock");
        Ok(mock)
    }

    fn update_mock<F>(&self, id: &str, apply: F) -> Result<MockRecord, StoreError>
    where
        F: FnOnce(&mut MockRecord),
    {
        let mut mocks = self.mock_reader().read_all()?;
        let mock = mocks
            .iter_mut()
            .find(|m| m.id.as_str() == id)
            .ok_or_else(|| StoreError::MockNotFound(id.to_string()))?;

        apply(mock);
        let updated = mock.clone();
        self.mock_writer().write_all(&mocks)?;
        Ok(updated)
    }

    /// Rename a mock. The id is immutable; only the label changes.
    pub fn rename_mock(&self, id: &str, name: &str) -> Result<MockRecord, StoreError> {
        self.update_mock(id, |m| m.name = name.to_string())
    }

    /// Flip the analysis flag. Unanalyzed and analyzed form a 2-state
    /// cycle; toggling back is always allowed.
    pub fn toggle_analysis_status(&self, id: &str) -> Result<MockRecord, StoreError> {
        let updated = self.update_mock(id, |m| m.is_analyzed = !m.is_analyzed)?;
        info!(id = %updated.id, is_analyzed = updated.is_analyzed, "toggled analysis status");
        Ok(updated)
    }

    /// Mark a mock analyzed (idempotent form used by bulk operations).
    pub fn mark_analyzed(&self, id: &str) -> Result<MockRecord, StoreError> {
        self.update_mock(id, |m| m.is_analyzed = true)
    }

    /// Delete a mock and cascade to every mistake referencing it.
    pub fn delete_mock(&self, id: &str) -> Result<(), StoreError> {
        let mut mocks = self.mock_reader().read_all()?;
        let before = mocks.len();
        mocks.retain(|m| m.id.as_str() != id);
        if mocks.len() == before {
            return Err(StoreError::MockNotFound(id.to_string()));
        }
        self.mock_writer().write_all(&mocks)?;

        let mistakes = self
            .mistake_reader()
            .read_where(|m| m.mock_id.as_str() != id)?;
        self.mistake_writer().write_all(&mistakes)?;

        info!(id, "deleted mock and cascaded to its mistakes");
        Ok(())
    }

    /// Delete several mocks, reporting per-item outcomes.
    pub fn delete_mocks(&self, ids: &[String]) -> BatchReport {
        run_batch(ids, |id| id.clone(), |id| self.delete_mock(id))
    }

    /// Mark several mocks analyzed, reporting per-item outcomes.
    pub fn mark_analyzed_many(&self, ids: &[String]) -> BatchReport {
        run_batch(ids, |id| id.clone(), |id| self.mark_analyzed(id).map(|_| ()))
    }

    /// Log a mistake against an existing mock.
    pub fn add_mistake(
        &self,
        mock_id: &str,
        image_path: &str,
        section_name: &str,
        question_type: QuestionType,
        notes: &str,
    ) -> Result<MistakeRecord, StoreError> {
        // Referencing a missing mock would leave a dangling record.
        let mock = self.get_mock(mock_id)?;

        let mistake = MistakeRecord::new(
            mock.id,
            image_path.to_string(),
            section_name.to_string(),
            question_type,
        )
        .with_notes(notes.to_string());

        self.mistake_writer().append(&mistake)?;
        info!(id = %mistake.id, mock_id, "logged mistake");
        Ok(mistake)
    }

    /// Mistakes for one mock, or all of them.
    pub fn list_mistakes(&self, mock_id: Option<&str>) -> Result<Vec<MistakeRecord>, StoreError> {
        let mistakes = match mock_id {
            Some(id) => self
                .mistake_reader()
                .read_where(|m| m.mock_id.as_str() == id)?,
            None => self.mistake_reader().read_all()?,
        };
        Ok(mistakes)
    }

    fn update_mistake<F>(&self, id: &str, apply: F) -> Result<MistakeRecord, StoreError>
    where
        F: FnOnce(&mut MistakeRecord),
    {
        let mut mistakes = self.mistake_reader().read_all()?;
        let mistake = mistakes
            .iter_mut()
            .find(|m| m.id.as_str() == id)
            .ok_or_else(|| StoreError::MistakeNotFound(id.to_string()))?;

        apply(mistake);
        let updated = mistake.clone();
        self.mistake_writer().write_all(&mistakes)?;
        Ok(updated)
    }

    /// Attach an explanation and classification to a mistake. The
    /// subject/topic/sub-topic triple feeds the weakness breakdown.
    pub fn record_analysis(
        &self,
        id: &str,
        analysis_text: &str,
        classification: &MistakeClassification,
    ) -> Result<MistakeRecord, StoreError> {
        self.update_mistake(id, |m| {
            m.analysis_text = Some(analysis_text.to_string());
            if let Some(s) = &classification.subject {
                m.subject = Some(s.clone());
            }
            if let Some(t) = &classification.topic {
                m.topic = Some(t.clone());
            }
            if let Some(st) = &classification.sub_topic {
                m.sub_topic = Some(st.clone());
            }
        })
    }

    /// Replace a mistake's notes.
    pub fn update_notes(&self, id: &str, notes: &str) -> Result<MistakeRecord, StoreError> {
        self.update_mistake(id, |m| m.notes = notes.to_string())
    }

    pub fn delete_mistake(&self, id: &str) -> Result<(), StoreError> {
        let mut mistakes = self.mistake_reader().read_all()?;
        let before = mistakes.len();
        mistakes.retain(|m| m.id.as_str() != id);
        if mistakes.len() == before {
            return Err(StoreError::MistakeNotFound(id.to_string()));
        }
        self.mistake_writer().write_all(&mistakes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> (tempfile::TempDir, MockStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = MockStore::new(StorageConfig::new(tmp.path().to_path_buf()));
        (tmp, store)
    }

    fn submission(name: &str, score: f64, date: &str) -> RawMockSubmission {
        serde_json::from_value(json!({
            "name": name,
            "score_overall": score,
            "date_taken": date,
            "sections": [
                { "name": "Maths", "score": score / 2.0, "correct_count": 10 },
                { "name": "English", "score": score / 2.0, "correct_count": 12 }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let (_tmp, store) = store();
        let mock = store
            .create_mock(&submission("Mock 1", 120.0, "2025-08-02"))
            .unwrap();

        let fetched = store.get_mock(mock.id.as_str()).unwrap();
        assert_eq!(fetched.name, "Mock 1");
        assert_eq!(fetched.sections.len(), 2);
    }

    #[test]
    fn test_duplicate_submission_rejected() {
        let (_tmp, store) = store();
        store
            .create_mock(&submission("Mock 1", 120.0, "2025-08-02"))
            .unwrap();
        let err = store
            .create_mock(&submission("Mock 1", 120.0, "2025-08-02"))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateMock(_)));
    }

    #[test]
    fn test_invalid_submission_stores_nothing() {
        let (_tmp, store) = store();
        let raw: RawMockSubmission = serde_json::from_value(json!({ "name": "No score" })).unwrap();
        assert!(store.create_mock(&raw).is_err());
        assert!(store.list_mocks().unwrap().is_empty());
    }

    #[test]
    fn test_list_most_recent_first() {
        let (_tmp, store) = store();
        store
            .create_mock(&submission("older", 100.0, "2025-07-01"))
            .unwrap();
        store
            .create_mock(&submission("newer", 110.0, "2025-08-09"))
            .unwrap();

        let mocks = store.list_mocks().unwrap();
        assert_eq!(mocks[0].name, "newer");
        assert_eq!(mocks[1].name, "older");
    }

    #[test]
    fn test_toggle_is_a_two_state_cycle() {
        let (_tmp, store) = store();
        let mock = store
            .create_mock(&submission("Mock 1", 120.0, "2025-08-02"))
            .unwrap();
        assert!(!mock.is_analyzed);

        let on = store.toggle_analysis_status(mock.id.as_str()).unwrap();
        assert!(on.is_analyzed);
        let off = store.toggle_analysis_status(mock.id.as_str()).unwrap();
        assert!(!off.is_analyzed);
    }

    #[test]
    fn test_rename_keeps_id() {
        let (_tmp, store) = store();
        let mock = store
            .create_mock(&submission("Mock 1", 120.0, "2025-08-02"))
            .unwrap();
        let renamed = store.rename_mock(mock.id.as_str(), "Mock 1 (redo)").unwrap();
        assert_eq!(renamed.id, mock.id);
        assert_eq!(renamed.name, "Mock 1 (redo)");
    }

    #[test]
    fn test_delete_cascades_to_mistakes() {
        let (_tmp, store) = store();
        let kept = store
            .create_mock(&submission("kept", 100.0, "2025-08-01"))
            .unwrap();
        let doomed = store
            .create_mock(&submission("doomed", 110.0, "2025-08-02"))
            .unwrap();

        store
            .add_mistake(kept.id.as_str(), "a.png", "Maths", QuestionType::Incorrect, "")
            .unwrap();
        store
            .add_mistake(doomed.id.as_str(), "b.png", "Maths", QuestionType::Incorrect, "")
            .unwrap();
        store
            .add_mistake(doomed.id.as_str(), "c.png", "English", QuestionType::Unattempted, "")
            .unwrap();

        store.delete_mock(doomed.id.as_str()).unwrap();

        let remaining = store.list_mistakes(None).unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(remaining.iter().all(|m| m.mock_id == kept.id));
        assert!(store.get_mock(doomed.id.as_str()).is_err());
    }

    #[test]
    fn test_mistake_against_missing_mock_rejected() {
        let (_tmp, store) = store();
        let err = store
            .add_mistake("no-such-id", "a.png", "Maths", QuestionType::Incorrect, "")
            .unwrap_err();
        assert!(matches!(err, StoreError::MockNotFound(_)));
    }

    #[test]
    fn test_bulk_delete_reports_per_item() {
        let (_tmp, store) = store();
        let a = store
            .create_mock(&submission("a", 100.0, "2025-08-01"))
            .unwrap();
        let b = store
            .create_mock(&submission("b", 110.0, "2025-08-02"))
            .unwrap();

        let ids = vec![
            a.id.to_string(),
            "missing".to_string(),
            b.id.to_string(),
        ];
        let report = store.delete_mocks(&ids);

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert!(store.list_mocks().unwrap().is_empty());
    }

    #[test]
    fn test_bulk_mark_analyzed() {
        let (_tmp, store) = store();
        let a = store
            .create_mock(&submission("a", 100.0, "2025-08-01"))
            .unwrap();
        let b = store
            .create_mock(&submission("b", 110.0, "2025-08-02"))
            .unwrap();

        let report = store.mark_analyzed_many(&[a.id.to_string(), b.id.to_string()]);
        assert!(report.all_succeeded());
        assert!(store.list_mocks().unwrap().iter().all(|m| m.is_analyzed));

        // Idempotent: marking again still succeeds.
        let again = store.mark_analyzed_many(&[a.id.to_string()]);
        assert!(again.all_succeeded());
    }

    #[test]
    fn test_record_analysis_and_notes() {
        let (_tmp, store) = store();
        let mock = store
            .create_mock(&submission("Mock 1", 120.0, "2025-08-02"))
            .unwrap();
        let mistake = store
            .add_mistake(
                mock.id.as_str(),
                "q17.png",
                "Maths",
                QuestionType::Incorrect,
                "misread the ratio",
            )
            .unwrap();
        assert!(!mistake.is_analyzed());

        let classification = MistakeClassification {
            subject: Some("Maths".to_string()),
            topic: Some("Ratio".to_string()),
            sub_topic: Some("Mixtures".to_string()),
        };
        let analyzed = store
            .record_analysis(mistake.id.as_str(), "Use ratios directly...", &classification)
            .unwrap();
        assert!(analyzed.is_analyzed());
        assert_eq!(analyzed.subject.as_deref(), Some("Maths"));
        assert_eq!(analyzed.topic.as_deref(), Some("Ratio"));
        assert_eq!(analyzed.sub_topic.as_deref(), Some("Mixtures"));

        let noted = store.update_notes(mistake.id.as_str(), "revised").unwrap();
        assert_eq!(noted.notes, "revised");
    }

    #[test]
    fn test_analyzed_mistakes_feed_weakness_tree() {
        let (_tmp, store) = store();
        let mock = store
            .create_mock(&submission("Mock 1", 120.0, "2025-08-02"))
            .unwrap();

        for image in ["q3.png", "q9.png"] {
            let mistake = store
                .add_mistake(mock.id.as_str(), image, "Maths", QuestionType::Incorrect, "")
                .unwrap();
            store
                .record_analysis(
                    mistake.id.as_str(),
                    "Revisit simplification order.",
                    &MistakeClassification {
                        subject: Some("Maths".to_string()),
                        topic: Some("Algebra".to_string()),
                        sub_topic: None,
                    },
                )
                .unwrap();
        }
        // Never analyzed, so it stays out of the tree.
        store
            .add_mistake(mock.id.as_str(), "q12.png", "English", QuestionType::Unattempted, "")
            .unwrap();

        let mistakes = store.list_mistakes(None).unwrap();
        let tree = crate::report::weakness::weakness_breakdown(&mistakes);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "Maths");
        assert_eq!(tree[0].children[0].name, "Algebra");
        assert_eq!(tree[0].children[0].children[0].name, "General");
        assert_eq!(tree[0].children[0].children[0].value, 2);
    }
}
