//! Canonical exam section taxonomy.
//!
//! Section labels arrive as free text ("Quantitative Aptitude", "Maths I",
//! "General Awareness", ...). Report views key their output by a fixed
//! canonical section set instead of raw labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical exam sections, in fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    Maths,
    Reasoning,
    English,
    Gk,
}

impl SectionKey {
    /// All canonical sections in display order.
    pub const ALL: [SectionKey; 4] = [
        SectionKey::Maths,
        SectionKey::Reasoning,
        SectionKey::English,
        SectionKey::Gk,
    ];

    /// Map a free-text section label to its canonical key.
    ///
    /// Matching is case-insensitive substring matching: "math" or
    /// "quantitative" for maths, "general" for GK. Labels that match
    /// nothing return None and stay out of keyed report views.
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.to_lowercase();
        if lower.contains("math") || lower.contains("quantitative") {
            Some(SectionKey::Maths)
        } else if lower.contains("reasoning") {
            Some(SectionKey::Reasoning)
        } else if lower.contains("english") {
            Some(SectionKey::English)
        } else if lower.contains("general") || lower.contains("gk") {
            Some(SectionKey::Gk)
        } else {
            None
        }
    }

    /// Canonical key string, as used in serialized report maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::Maths => "maths",
            SectionKey::Reasoning => "reasoning",
            SectionKey::English => "english",
            SectionKey::Gk => "gk",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
