//! Rolling window selection.
//!
//! The dashboard shows short-term trends over the last 3, 5, and 10 mocks.

use crate::models::{MockLogEntry, MockRecord, SectionKey, WindowEntry};

/// Sort mocks most-recent-first: `date_taken` descending, ties broken by
/// `id` descending so the order is total and stable.
pub fn recent_first(mocks: &[MockRecord]) -> Vec<&MockRecord> {
    let mut sorted: Vec<&MockRecord> = mocks.iter().collect();
    sorted.sort_by(|a, b| {
        b.date_taken
            .cmp(&a.date_taken)
            .then_with(|| b.id.cmp(&a.id))
    });
    sorted
}

/// Condense the first `n` rows of an already-ordered mock log.
///
/// Returns `min(n, log.len())` entries; a short collection is not padded.
pub fn last_n(log: &[MockLogEntry], n: usize) -> Vec<WindowEntry> {
    log.iter().take(n).map(condense).collect()
}

fn section_net(entry: &MockLogEntry, key: SectionKey) -> f64 {
    entry
        .sections
        .get(&key)
        .map(|s| s.marks.net)
        .unwrap_or(0.0)
}

fn condense(entry: &MockLogEntry) -> WindowEntry {
    WindowEntry {
        name: entry.name.clone(),
        total: entry.total_score,
        maths: section_net(entry, SectionKey::Maths),
        reasoning: section_net(entry, SectionKey::Reasoning),
        english: section_net(entry, SectionKey::English),
        gk: section_net(entry, SectionKey::Gk),
        positive: entry.totals.marks.positive,
        negative: entry.totals.marks.negative,
    }
}
