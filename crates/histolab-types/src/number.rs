use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::study::StudyType;

/// Human-readable case identifier.
///
/// Assigned numbers render as `B-25-0001`: one-letter study prefix, two-digit
/// year, zero-padded sequence. Draft numbers use the reserved `DRAFT-BIO-0001`
/// scheme and never occupy the assigned sequence.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseNumber {
    Assigned {
        study: StudyType,
        year: u16,
        sequence: u32,
    },
    Draft {
        study: StudyType,
        sequence: u32,
    },
}

impl CaseNumber {
    pub fn assigned(study: StudyType, year: u16, sequence: u32) -> Self {
        CaseNumber::Assigned {
            study,
            year,
            sequence,
        }
    }

    pub fn draft(study: StudyType, sequence: u32) -> Self {
        CaseNumber::Draft { study, sequence }
    }

    pub fn study(&self) -> StudyType {
        match self {
            CaseNumber::Assigned { study, .. } | CaseNumber::Draft { study, .. } => *study,
        }
    }

    pub fn sequence(&self) -> u32 {
        match self {
            CaseNumber::Assigned { sequence, .. } | CaseNumber::Draft { sequence, .. } => *sequence,
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, CaseNumber::Draft { .. })
    }
}

impl std::fmt::Display for CaseNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseNumber::Assigned {
                study,
                year,
                sequence,
            } => write!(f, "{}-{:02}-{:04}", study.prefix(), year % 100, sequence),
            CaseNumber::Draft { study, sequence } => {
                write!(f, "DRAFT-{}-{:04}", study.draft_tag(), sequence)
            }
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaseNumberParseError {
    #[error("malformed case number: {0}")]
    Malformed(String),
    #[error("unknown study prefix: {0}")]
    UnknownPrefix(String),
    #[error("invalid year component: {0}")]
    InvalidYear(String),
    #[error("invalid sequence component: {0}")]
    InvalidSequence(String),
}

impl std::str::FromStr for CaseNumber {
    type Err = CaseNumberParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        match parts.as_slice() {
            ["DRAFT", tag, seq] => {
                let study = StudyType::from_draft_tag(tag)
                    .ok_or_else(|| CaseNumberParseError::UnknownPrefix((*tag).to_string()))?;
                let sequence: u32 = seq
                    .parse()
                    .map_err(|_| CaseNumberParseError::InvalidSequence((*seq).to_string()))?;
                Ok(CaseNumber::draft(study, sequence))
            }
            [prefix, year, seq] => {
                let mut chars = prefix.chars();
                let (Some(c), None) = (chars.next(), chars.next()) else {
                    return Err(CaseNumberParseError::UnknownPrefix((*prefix).to_string()));
                };
                let study = StudyType::from_prefix(c)
                    .ok_or_else(|| CaseNumberParseError::UnknownPrefix((*prefix).to_string()))?;
                if year.len() != 2 {
                    return Err(CaseNumberParseError::InvalidYear((*year).to_string()));
                }
                let yy: u16 = year
                    .parse()
                    .map_err(|_| CaseNumberParseError::InvalidYear((*year).to_string()))?;
                let sequence: u32 = seq
                    .parse()
                    .map_err(|_| CaseNumberParseError::InvalidSequence((*seq).to_string()))?;
                Ok(CaseNumber::assigned(study, 2000 + yy, sequence))
            }
            _ => Err(CaseNumberParseError::Malformed(s.to_string())),
        }
    }
}
