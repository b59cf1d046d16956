//! Case number issuance.
//!
//! Assigned numbers are unique and strictly increasing within a
//! `(study, year)` key. The allocator replaces a read-max-then-write pattern:
//! each issue is a per-key atomic increment, so two concurrent callers can
//! never receive the same number. Draft cases draw from a separate reserved
//! scheme and never consume the assigned sequence.

#![deny(unsafe_code)]

use chrono::{Datelike, Utc};
use dashmap::DashMap;
use histolab_types::{CaseNumber, StudyType};
use tracing::{debug, info};

/// Key of one assigned-number sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SequenceKey {
    pub study: StudyType,
    pub year: u16,
}

/// Issues unique, human-readable case numbers.
///
/// Counters live behind a concurrent map; the increment happens while holding
/// the map's per-entry guard, which serializes issuance per key.
pub struct CaseNumberAllocator {
    assigned: DashMap<SequenceKey, u32>,
    drafts: DashMap<StudyType, u32>,
}

impl CaseNumberAllocator {
    pub fn new() -> Self {
        Self {
            assigned: DashMap::new(),
            drafts: DashMap::new(),
        }
    }

    /// Issue the next assigned number for `(study, year)`.
    ///
    /// The first issue of a key yields sequence 1 (`...-0001`).
    pub fn issue(&self, study: StudyType, year: u16) -> CaseNumber {
        let mut entry = self.assigned.entry(SequenceKey { study, year }).or_insert(0);
        *entry += 1;
        let number = CaseNumber::assigned(study, year, *entry);
        drop(entry);

        info!(number = %number, study = %study, "issued case number");
        number
    }

    /// Issue for the current calendar year.
    pub fn issue_current_year(&self, study: StudyType) -> CaseNumber {
        self.issue(study, Utc::now().year() as u16)
    }

    /// Issue the next draft number for `study`.
    ///
    /// Draft numbers use the reserved `DRAFT-<TAG>-NNNN` scheme and do not
    /// advance any assigned sequence.
    pub fn issue_draft(&self, study: StudyType) -> CaseNumber {
        let mut entry = self.drafts.entry(study).or_insert(0);
        *entry += 1;
        let number = CaseNumber::draft(study, *entry);
        drop(entry);

        debug!(number = %number, "issued draft case number");
        number
    }

    /// Raise a sequence to at least an already-persisted number.
    ///
    /// Called when loading existing cases so that freshly issued numbers
    /// continue after the highest one on record. Draft numbers are ignored.
    pub fn observe(&self, number: &CaseNumber) {
        match number {
            CaseNumber::Assigned {
                study,
                year,
                sequence,
            } => {
                let mut entry = self
                    .assigned
                    .entry(SequenceKey {
                        study: *study,
                        year: *year,
                    })
                    .or_insert(0);
                if *entry < *sequence {
                    *entry = *sequence;
                }
            }
            CaseNumber::Draft { study, sequence } => {
                // Keep the draft scheme monotonic too, but never let it touch
                // the assigned counters.
                let mut entry = self.drafts.entry(*study).or_insert(0);
                if *entry < *sequence {
                    *entry = *sequence;
                }
            }
        }
    }

    /// Current high-water mark of a sequence, if any number was issued or
    /// observed for it.
    pub fn current(&self, study: StudyType, year: u16) -> Option<u32> {
        self.assigned
            .get(&SequenceKey { study, year })
            .map(|entry| *entry)
    }
}

impl Default for CaseNumberAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn sequential_issue_has_no_gaps() {
        let allocator = CaseNumberAllocator::new();
        for expected in 1..=5u32 {
            let number = allocator.issue(StudyType::TissueBiopsy, 2025);
            assert_eq!(number.sequence(), expected);
        }
        assert_eq!(
            allocator.issue(StudyType::TissueBiopsy, 2025).to_string(),
            "B-25-0006"
        );
    }

    #[test]
    fn sequences_are_independent_per_study_and_year() {
        let allocator = CaseNumberAllocator::new();
        allocator.issue(StudyType::TissueBiopsy, 2025);
        allocator.issue(StudyType::TissueBiopsy, 2025);
        assert_eq!(
            allocator.issue(StudyType::CervicalCytology, 2025).to_string(),
            "P-25-0001"
        );
        assert_eq!(
            allocator.issue(StudyType::TissueBiopsy, 2026).to_string(),
            "B-26-0001"
        );
    }

    #[test]
    fn drafts_never_advance_the_assigned_sequence() {
        let allocator = CaseNumberAllocator::new();
        for _ in 0..5 {
            allocator.issue_draft(StudyType::GeneralCytology);
        }
        assert_eq!(
            allocator.issue(StudyType::GeneralCytology, 2025).to_string(),
            "C-25-0001"
        );
    }

    #[test]
    fn observe_seeds_the_sequence() {
        let allocator = CaseNumberAllocator::new();
        allocator.observe(&CaseNumber::assigned(StudyType::TissueBiopsy, 2025, 41));
        allocator.observe(&CaseNumber::assigned(StudyType::TissueBiopsy, 2025, 17));
        assert_eq!(
            allocator.issue(StudyType::TissueBiopsy, 2025).to_string(),
            "B-25-0042"
        );
    }

    #[test]
    fn observe_ignores_drafts_for_assigned_counters() {
        let allocator = CaseNumberAllocator::new();
        allocator.observe(&CaseNumber::draft(StudyType::TissueBiopsy, 99));
        assert_eq!(allocator.current(StudyType::TissueBiopsy, 2025), None);
        assert_eq!(
            allocator.issue(StudyType::TissueBiopsy, 2025).sequence(),
            1
        );
    }

    #[test]
    fn concurrent_issue_never_duplicates() {
        let allocator = Arc::new(CaseNumberAllocator::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let allocator = Arc::clone(&allocator);
            handles.push(std::thread::spawn(move || {
                (0..250)
                    .map(|_| allocator.issue(StudyType::CervicalCytology, 2025))
                    .collect::<Vec<_>>()
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for number in handle.join().unwrap() {
                assert!(seen.insert(number.sequence()), "duplicate {number}");
            }
        }
        assert_eq!(seen.len(), 2000);
        assert_eq!(allocator.current(StudyType::CervicalCytology, 2025), Some(2000));
    }
}
