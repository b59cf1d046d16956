use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::AuditEntryId;

/// Kind of record an audit entry points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    Case,
    Section,
    Line,
    Design,
}

/// Action recorded by the audit trail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    CaseCreated,
    CaseEdited,
    StatusChanged,
    SectionDefined,
    LineAdded,
    LineUsed,
    LineDeactivated,
    DesignCreated,
    DesignUpdated,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AuditAction::CaseCreated => "CASE_CREATED",
            AuditAction::CaseEdited => "CASE_EDITED",
            AuditAction::StatusChanged => "STATUS_CHANGED",
            AuditAction::SectionDefined => "SECTION_DEFINED",
            AuditAction::LineAdded => "LINE_ADDED",
            AuditAction::LineUsed => "LINE_USED",
            AuditAction::LineDeactivated => "LINE_DEACTIVATED",
            AuditAction::DesignCreated => "DESIGN_CREATED",
            AuditAction::DesignUpdated => "DESIGN_UPDATED",
        };
        f.write_str(name)
    }
}

/// One immutable audit record. Created on every lifecycle transition and other
/// sensitive action; never updated or deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    /// Role name of the acting user.
    pub actor: String,
    pub action: AuditAction,
    pub target_kind: TargetKind,
    pub target_id: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}
