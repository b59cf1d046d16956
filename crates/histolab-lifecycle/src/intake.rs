use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use histolab_types::{
    AdmissionKind, Case, InsurerRef, InsurerSnapshot, PatientRef, ProviderRef, StudyType,
};

use crate::error::LifecycleError;

/// A request to admit a new study.
///
/// Patient, provider and insurer references are validated by the surrounding
/// system; the engine only requires that the mandatory ones are present.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntakeRequest {
    pub study: StudyType,
    pub patient_ref: PatientRef,
    pub provider_ref: Option<ProviderRef>,
    pub insurer_ref: Option<InsurerRef>,
    pub insurer_snapshot: Option<InsurerSnapshot>,
    pub clinical_notes: String,
    pub admission_kind: AdmissionKind,
    pub with_order: bool,
    pub intake_date: NaiveDate,
    /// Start the case in `Urgent` instead of `Pending`.
    pub urgent: bool,
    /// Create the case directly completed. Only honored when the acting role
    /// holds the completes-reports capability.
    pub complete_immediately: bool,
    /// Draft/test case: reserved numbering, excluded from counts.
    pub draft: bool,
}

impl IntakeRequest {
    pub fn new(study: StudyType, patient_ref: PatientRef, intake_date: NaiveDate) -> Self {
        Self {
            study,
            patient_ref,
            provider_ref: None,
            insurer_ref: None,
            insurer_snapshot: None,
            clinical_notes: String::new(),
            admission_kind: AdmissionKind::default(),
            with_order: false,
            intake_date,
            urgent: false,
            complete_immediately: false,
            draft: false,
        }
    }

    /// Reject the request before any side effect if mandatory data is absent.
    pub fn validate(&self) -> Result<(), LifecycleError> {
        if self.patient_ref.0.trim().is_empty() {
            return Err(LifecycleError::Validation(
                "a patient reference is required".into(),
            ));
        }
        Ok(())
    }
}

/// Result of admitting a study.
#[derive(Clone, Debug)]
pub struct IntakeOutcome {
    pub case: Case,
    /// Set when immediate completion was requested but the acting role lacks
    /// the capability; the case was saved in its normal initial state instead.
    pub completion_declined: bool,
}

/// Partial update of a case's editable content.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CaseUpdate {
    pub provider_ref: Option<Option<ProviderRef>>,
    pub insurer_ref: Option<Option<InsurerRef>>,
    pub insurer_snapshot: Option<Option<InsurerSnapshot>>,
    pub clinical_notes: Option<String>,
    pub admission_kind: Option<AdmissionKind>,
    pub with_order: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_patient_ref_is_rejected() {
        let request = IntakeRequest::new(
            StudyType::TissueBiopsy,
            PatientRef("  ".into()),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        );
        assert!(matches!(
            request.validate(),
            Err(LifecycleError::Validation(_))
        ));
    }

    #[test]
    fn minimal_request_is_valid() {
        let request = IntakeRequest::new(
            StudyType::CervicalCytology,
            PatientRef("patient-1".into()),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        );
        assert!(request.validate().is_ok());
    }
}
