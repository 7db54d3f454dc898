//! Hierarchical weakness breakdown over analyzed mistakes.
//!
//! Groups mistake counts by subject, then topic, then sub-topic, for the
//! weakness sunburst chart. Only mistakes with both a subject and a topic
//! contribute; a missing sub-topic files under "General".

use std::collections::BTreeMap;

use crate::models::{MistakeRecord, WeaknessLeaf, WeaknessSubject, WeaknessTopic};

/// Build the subject → topic → sub-topic mistake count tree.
///
/// Subjects and topics come out in alphabetical order; sub-topics within a
/// topic by count descending, ties by name.
pub fn weakness_breakdown(mistakes: &[MistakeRecord]) -> Vec<WeaknessSubject> {
    let mut counts: BTreeMap<&str, BTreeMap<&str, BTreeMap<&str, u32>>> = BTreeMap::new();

    for m in mistakes {
        let (Some(subject), Some(topic)) = (m.subject.as_deref(), m.topic.as_deref()) else {
            continue;
        };
        let sub_topic = m.sub_topic.as_deref().unwrap_or("General");

        *counts
            .entry(subject)
            .or_default()
            .entry(topic)
            .or_default()
            .entry(sub_topic)
            .or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(subject, topics)| WeaknessSubject {
            name: subject.to_string(),
            children: topics
                .into_iter()
                .map(|(topic, sub_topics)| {
                    let mut children: Vec<WeaknessLeaf> = sub_topics
                        .into_iter()
                        .map(|(name, value)| WeaknessLeaf {
                            name: name.to_string(),
                            value,
                        })
                        .collect();
                    children.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
                    WeaknessTopic {
                        name: topic.to_string(),
                        children,
                    }
                })
                .collect(),
        })
        .collect()
}
