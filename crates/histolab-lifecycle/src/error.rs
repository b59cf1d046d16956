use histolab_audit::AuditError;
use histolab_types::{CaseId, CaseStatus};
use thiserror::Error;

/// Errors from the case lifecycle engine.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("intake validation failed: {0}")]
    Validation(String),

    #[error("transition {from} -> {to} is not permitted")]
    InvalidTransition { from: CaseStatus, to: CaseStatus },

    #[error("case is not editable in status {0}")]
    NotEditable(CaseStatus),

    #[error("role {role} lacks permission {permission}")]
    PermissionDenied { role: String, permission: String },

    #[error("role {role} lacks the completes-reports capability")]
    CapabilityRequired { role: String },

    #[error("case not found: {0}")]
    CaseNotFound(CaseId),

    #[error("duplicate case number: {0}")]
    DuplicateNumber(String),

    #[error("audit error: {0}")]
    Audit(#[from] AuditError),

    #[error("lock error")]
    LockError,
}
