//! Core data structures.

pub mod ids;
pub mod mistake;
pub mod mock;
pub mod report;
pub mod section;

pub use ids::{EntityId, MistakeId, MockId};
pub use mistake::{MistakeClassification, MistakeRecord, QuestionType};
pub use mock::{MockRecord, SectionResult, Tier};
pub use report::{
    AttemptCounts, MarkTotals, MockLogEntry, PerformanceReport, ReportCard, ScoreDiscrepancy,
    SectionAverage, SectionBreakdown, TrajectoryPoint, WeaknessLeaf, WeaknessSubject,
    WeaknessTopic, WindowEntry,
};
pub use section::SectionKey;
