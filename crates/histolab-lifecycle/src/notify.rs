use serde::{Deserialize, Serialize};
use thiserror::Error;

use histolab_types::{CaseNumber, PatientRef, ProviderRef, StudyType};

/// Payload handed to the notification collaborator when a case completes.
///
/// Delivery (email/SMS) is entirely external; the engine only decides whether
/// a completion warrants a notice and emits this payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompletionNotice {
    pub case_number: CaseNumber,
    pub study: StudyType,
    pub provider_ref: Option<ProviderRef>,
    pub patient_ref: PatientRef,
    /// Whether the case carried report content at completion time.
    pub documentation_complete: bool,
}

#[derive(Debug, Error)]
#[error("notification dispatch failed: {0}")]
pub struct NotifyError(pub String);

/// Collaborator receiving completion notices.
pub trait CompletionNotifier: Send + Sync {
    fn notify(&self, notice: &CompletionNotice) -> Result<(), NotifyError>;
}

/// Discards every notice. Default wiring for deployments without a
/// notification channel, and for tests that do not observe dispatches.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotifier;

impl CompletionNotifier for NoopNotifier {
    fn notify(&self, _notice: &CompletionNotice) -> Result<(), NotifyError> {
        Ok(())
    }
}
