use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{LineId, SectionId};
use crate::study::StudyType;

/// Stable code naming a report section (e.g. `CLINICAL_DATA`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionCode(pub String);

impl SectionCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SectionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

/// A named subdivision of a report for a given study type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub study: StudyType,
    pub code: SectionCode,
    /// Editor shortcut code (`T1`, `H2`, ...). Its leading character yields a
    /// presentation-only macro-category.
    pub button_code: String,
    pub name: String,
    pub position: u32,
    pub active: bool,
}

impl Section {
    /// Presentation-only grouping derived from the button code's leading
    /// character. Has no effect on composition.
    pub fn macro_category(&self) -> Option<char> {
        self.button_code.chars().next()
    }
}

/// A reusable text fragment attached to a section.
///
/// Lines are never hard-deleted, only deactivated. `usage_count` is
/// monotonically non-decreasing and drives suggestion ranking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub section: SectionId,
    pub text: String,
    pub position: u32,
    pub usage_count: u64,
    pub last_used_at: Option<DateTime<Utc>>,
    pub active: bool,
}
