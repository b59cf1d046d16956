use serde::{Deserialize, Serialize};

/// Category of diagnostic study handled by the laboratory.
///
/// Each study type carries its own case-number prefix, its own canonical
/// report section order, and its own report headings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StudyType {
    TissueBiopsy,
    GeneralCytology,
    CervicalCytology,
}

impl StudyType {
    pub const ALL: [StudyType; 3] = [
        StudyType::TissueBiopsy,
        StudyType::GeneralCytology,
        StudyType::CervicalCytology,
    ];

    /// One-letter prefix used in assigned case numbers (`B-25-0001`).
    pub fn prefix(&self) -> char {
        match self {
            StudyType::TissueBiopsy => 'B',
            StudyType::GeneralCytology => 'C',
            StudyType::CervicalCytology => 'P',
        }
    }

    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'B' => Some(StudyType::TissueBiopsy),
            'C' => Some(StudyType::GeneralCytology),
            'P' => Some(StudyType::CervicalCytology),
            _ => None,
        }
    }

    /// Three-letter tag used in the reserved draft numbering scheme
    /// (`DRAFT-BIO-0001`). Distinct from the assigned prefix on purpose:
    /// draft numbers must never parse as assigned ones.
    pub fn draft_tag(&self) -> &'static str {
        match self {
            StudyType::TissueBiopsy => "BIO",
            StudyType::GeneralCytology => "CYT",
            StudyType::CervicalCytology => "CVC",
        }
    }

    pub fn from_draft_tag(tag: &str) -> Option<Self> {
        match tag {
            "BIO" => Some(StudyType::TissueBiopsy),
            "CYT" => Some(StudyType::GeneralCytology),
            "CVC" => Some(StudyType::CervicalCytology),
            _ => None,
        }
    }

    /// Canonical report section order for this study type.
    ///
    /// Sections selected on a case that do not appear here are appended after
    /// the canonical ones, in storage order.
    pub fn section_order(&self) -> &'static [&'static str] {
        match self {
            StudyType::CervicalCytology => &[
                "CLINICAL_DATA",
                "SMEAR",
                "CELL_MORPHOLOGY",
                "CELL_CONTEXT",
                "INFLAMMATORY_COMPONENT",
                "FLORA",
                "DIAGNOSIS",
            ],
            StudyType::TissueBiopsy => &[
                "MATERIAL_SUBMITTED",
                "MACROSCOPIC_DESCRIPTION",
                "MICROSCOPIC_DESCRIPTION",
                "DIAGNOSIS",
            ],
            StudyType::GeneralCytology => &[
                "MATERIAL_SUBMITTED",
                "MICROSCOPIC_DESCRIPTION",
                "DIAGNOSIS",
            ],
        }
    }

    /// Display heading for a section code on a composed report.
    pub fn section_heading(&self, code: &str) -> Option<&'static str> {
        let heading = match (self, code) {
            (StudyType::CervicalCytology, "CLINICAL_DATA") => "CLINICAL DATA",
            (StudyType::CervicalCytology, "SMEAR") => "SMEAR",
            (StudyType::CervicalCytology, "CELL_MORPHOLOGY") => "CYTOLOGIC DESCRIPTION",
            (StudyType::CervicalCytology, "CELL_CONTEXT") => "Alongside",
            (StudyType::CervicalCytology, "INFLAMMATORY_COMPONENT") => "INFLAMMATORY COMPONENT",
            (StudyType::CervicalCytology, "FLORA") => "Flora",
            (StudyType::CervicalCytology, "DIAGNOSIS") => "DIAGNOSIS",
            (StudyType::TissueBiopsy, "MATERIAL_SUBMITTED") => "MATERIAL SUBMITTED",
            (StudyType::TissueBiopsy, "MACROSCOPIC_DESCRIPTION") => "MACROSCOPIC DESCRIPTION",
            (StudyType::TissueBiopsy, "MICROSCOPIC_DESCRIPTION") => "MICROSCOPIC DESCRIPTION",
            (StudyType::TissueBiopsy, "DIAGNOSIS") => "DIAGNOSIS",
            (StudyType::GeneralCytology, "MATERIAL_SUBMITTED") => "MATERIAL SUBMITTED",
            (StudyType::GeneralCytology, "MICROSCOPIC_DESCRIPTION") => "MICROSCOPIC DESCRIPTION",
            (StudyType::GeneralCytology, "DIAGNOSIS") => "DIAGNOSIS",
            _ => return None,
        };
        Some(heading)
    }

    /// Default report title for this study type.
    pub fn report_title(&self) -> &'static str {
        match self {
            StudyType::TissueBiopsy => "ANATOMIC PATHOLOGY REPORT",
            StudyType::GeneralCytology => "CYTOLOGY REPORT",
            StudyType::CervicalCytology => "CERVICOVAGINAL CYTOLOGY REPORT",
        }
    }

    /// Default report subtitle for this study type.
    pub fn report_subtitle(&self) -> &'static str {
        match self {
            StudyType::TissueBiopsy => "Biopsy",
            StudyType::GeneralCytology => "Cytology",
            StudyType::CervicalCytology => "Pap Smear",
        }
    }
}

impl std::fmt::Display for StudyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StudyType::TissueBiopsy => "TISSUE_BIOPSY",
            StudyType::GeneralCytology => "GENERAL_CYTOLOGY",
            StudyType::CervicalCytology => "CERVICAL_CYTOLOGY",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for study in StudyType::ALL {
            assert!(seen.insert(study.prefix()));
            assert_eq!(StudyType::from_prefix(study.prefix()), Some(study));
        }
    }

    #[test]
    fn draft_tags_round_trip() {
        for study in StudyType::ALL {
            assert_eq!(StudyType::from_draft_tag(study.draft_tag()), Some(study));
        }
        assert_eq!(StudyType::from_draft_tag("XYZ"), None);
    }

    #[test]
    fn every_canonical_section_has_a_heading() {
        for study in StudyType::ALL {
            for code in study.section_order() {
                assert!(
                    study.section_heading(code).is_some(),
                    "missing heading for {study} / {code}"
                );
            }
        }
    }

    #[test]
    fn diagnosis_closes_every_study() {
        for study in StudyType::ALL {
            assert_eq!(*study.section_order().last().unwrap(), "DIAGNOSIS");
        }
    }
}
