use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::CaseId;
use crate::number::CaseNumber;
use crate::study::StudyType;

/// Reference to a patient record held outside this engine.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientRef(pub String);

/// Reference to a referring provider record held outside this engine.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderRef(pub String);

/// Reference to a health-insurer record held outside this engine.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InsurerRef(pub String);

/// Insurer identity captured at intake time.
///
/// The insurer master record can change later; the case keeps what was true
/// when the study was admitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsurerSnapshot {
    pub name: String,
    pub code: String,
    pub active: bool,
}

/// How the patient was admitted. Drives completion-notification rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdmissionKind {
    #[default]
    Ambulatory,
    Inpatient,
}

/// Processing status of a case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseStatus {
    Pending,
    Urgent,
    InProgress,
    Completed,
    Cancelled,
}

impl CaseStatus {
    /// Case content may only be edited in these states.
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            CaseStatus::Pending | CaseStatus::InProgress | CaseStatus::Urgent
        )
    }

    /// Terminal states admit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CaseStatus::Completed | CaseStatus::Cancelled)
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CaseStatus::Pending => "PENDING",
            CaseStatus::Urgent => "URGENT",
            CaseStatus::InProgress => "IN_PROGRESS",
            CaseStatus::Completed => "COMPLETED",
            CaseStatus::Cancelled => "CANCELLED",
        };
        f.write_str(name)
    }
}

/// A fragment selected into a specific case's report, attached to a section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    pub section: String,
    pub text: String,
    pub position: u32,
}

/// One tracked study from intake to completed report.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    pub number: CaseNumber,
    pub study: StudyType,
    pub status: CaseStatus,
    pub is_draft: bool,
    pub patient_ref: PatientRef,
    pub provider_ref: Option<ProviderRef>,
    pub insurer_ref: Option<InsurerRef>,
    pub insurer_snapshot: Option<InsurerSnapshot>,
    pub clinical_notes: String,
    pub admission_kind: AdmissionKind,
    /// Whether a written order accompanied the study (ambulatory cases are
    /// only notified on completion when one did).
    pub with_order: bool,
    pub intake_date: NaiveDate,
    pub completion_date: Option<NaiveDate>,
    pub completing_actor: Option<String>,
    pub report_lines: Vec<ReportLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Case {
    /// Days the study has been waiting, counted while still unresolved.
    pub fn days_pending(&self, today: NaiveDate) -> i64 {
        if matches!(self.status, CaseStatus::Pending | CaseStatus::InProgress) {
            (today - self.intake_date).num_days()
        } else {
            0
        }
    }
}
