use std::sync::Arc;

use chrono::{Datelike, Utc};
use histolab_access::{evaluate, has_capability, permissions};
use histolab_audit::AuditTrail;
use histolab_numbering::CaseNumberAllocator;
use histolab_types::{
    AdmissionKind, AuditAction, Capability, Case, CaseId, CaseStatus, PermissionCode, ReportLine,
    Role, TargetKind,
};
use tracing::{debug, info, warn};

use crate::error::LifecycleError;
use crate::intake::{CaseUpdate, IntakeOutcome, IntakeRequest};
use crate::notify::{CompletionNotice, CompletionNotifier};
use crate::registry::CaseRegistry;

/// Case totals by status, excluding draft cases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaseCounts {
    pub total: usize,
    pub pending: usize,
    pub urgent: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
}

/// The lifecycle engine.
///
/// Owns the case registry; consumes the number allocator, the audit trail and
/// the completion-notification collaborator. All status changes go through
/// here - callers never mutate a [`Case`] directly.
pub struct LifecycleEngine {
    registry: CaseRegistry,
    allocator: Arc<CaseNumberAllocator>,
    audit: Arc<AuditTrail>,
    notifier: Arc<dyn CompletionNotifier>,
}

impl LifecycleEngine {
    pub fn new(
        allocator: Arc<CaseNumberAllocator>,
        audit: Arc<AuditTrail>,
        notifier: Arc<dyn CompletionNotifier>,
    ) -> Self {
        Self {
            registry: CaseRegistry::new(),
            allocator,
            audit,
            notifier,
        }
    }

    /// Admit a new study.
    ///
    /// Validates before any side effect, issues a case number, creates the
    /// case in its initial state and writes the creation audit entries. Draft
    /// cases draw a reserved number and open directly in progress. Immediate
    /// completion is honored only when the acting role holds the
    /// completes-reports capability; otherwise the case is saved in its normal
    /// initial state and the outcome reports the decline.
    pub fn register_case(
        &self,
        request: IntakeRequest,
        actor: &Role,
    ) -> Result<IntakeOutcome, LifecycleError> {
        self.require_permission(actor, permissions::CASES_CREATE)?;
        request.validate()?;

        let mut completion_declined = false;
        let mut complete_now = request.complete_immediately;
        if complete_now && !has_capability(actor, Capability::CompletesReports) {
            warn!(
                role = %actor.name,
                "immediate completion requested without the capability; saving unfinished"
            );
            complete_now = false;
            completion_declined = true;
        }

        let status = if request.draft {
            // Draft cases exist to drive the editor; they open in progress.
            CaseStatus::InProgress
        } else if complete_now {
            CaseStatus::Completed
        } else if request.urgent {
            CaseStatus::Urgent
        } else {
            CaseStatus::Pending
        };

        let number = if request.draft {
            self.allocator.issue_draft(request.study)
        } else {
            self.allocator
                .issue(request.study, request.intake_date.year() as u16)
        };

        let now = Utc::now();
        let case = Case {
            id: CaseId::new(),
            number,
            study: request.study,
            status,
            is_draft: request.draft,
            patient_ref: request.patient_ref,
            provider_ref: request.provider_ref,
            insurer_ref: request.insurer_ref,
            insurer_snapshot: request.insurer_snapshot,
            clinical_notes: request.clinical_notes,
            admission_kind: request.admission_kind,
            with_order: request.with_order,
            intake_date: request.intake_date,
            completion_date: (status == CaseStatus::Completed).then(|| now.date_naive()),
            completing_actor: (status == CaseStatus::Completed).then(|| actor.name.clone()),
            report_lines: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let case = self.registry.insert_with(case, |case| {
            let number = case.number.to_string();
            self.audit.record(
                actor.name.as_str(),
                AuditAction::CaseCreated,
                TargetKind::Case,
                number.as_str(),
                format!("Case {number} created"),
            )?;
            if case.status == CaseStatus::Completed {
                self.audit.record(
                    actor.name.as_str(),
                    AuditAction::StatusChanged,
                    TargetKind::Case,
                    number.as_str(),
                    format!("Case {number}: {} -> {}", CaseStatus::Pending, CaseStatus::Completed),
                )?;
            }
            Ok(())
        })?;

        info!(case = %case.number, status = %case.status, "case registered");

        if case.status == CaseStatus::Completed {
            self.dispatch_completion(&case);
        }

        Ok(IntakeOutcome {
            case,
            completion_declined,
        })
    }

    /// Adopt an already-numbered case from external persistence.
    ///
    /// Seeds the number allocator so freshly issued numbers continue after
    /// the adopted one. No audit entry is written - the case's history
    /// happened elsewhere.
    pub fn adopt(&self, case: Case) -> Result<Case, LifecycleError> {
        let case = self.registry.insert_with(case, |_| Ok(()))?;
        self.allocator.observe(&case.number);
        Ok(case)
    }

    /// Move a case into `Completed`.
    ///
    /// Requires the completes-reports capability; the permission bypass for
    /// superuser roles does not apply here. Stamps the completion date and
    /// actor, writes the audit entry atomically with the state change, then
    /// hands a notice to the notification collaborator - whose failure is
    /// logged and never rolls the completion back.
    pub fn complete(&self, id: CaseId, actor: &Role) -> Result<Case, LifecycleError> {
        let completed = self.registry.mutate(id, |case| {
            if !case.status.is_editable() {
                return Err(LifecycleError::InvalidTransition {
                    from: case.status,
                    to: CaseStatus::Completed,
                });
            }
            if !has_capability(actor, Capability::CompletesReports) {
                return Err(LifecycleError::CapabilityRequired {
                    role: actor.name.clone(),
                });
            }

            let number = case.number.to_string();
            self.audit.record(
                actor.name.as_str(),
                AuditAction::StatusChanged,
                TargetKind::Case,
                number.as_str(),
                format!("Case {number}: {} -> {}", case.status, CaseStatus::Completed),
            )?;

            let now = Utc::now();
            case.status = CaseStatus::Completed;
            case.completion_date = Some(now.date_naive());
            case.completing_actor = Some(actor.name.clone());
            case.updated_at = now;
            Ok(case.clone())
        })?;

        info!(case = %completed.number, actor = %actor.name, "case completed");
        self.dispatch_completion(&completed);
        Ok(completed)
    }

    /// Flag a pending or in-progress case as urgent.
    pub fn mark_urgent(&self, id: CaseId, actor: &Role) -> Result<Case, LifecycleError> {
        self.transition(
            id,
            actor,
            CaseStatus::Urgent,
            &[CaseStatus::Pending, CaseStatus::InProgress],
        )
    }

    /// Clear the urgency flag; the case resumes as in progress.
    pub fn resume(&self, id: CaseId, actor: &Role) -> Result<Case, LifecycleError> {
        self.transition(id, actor, CaseStatus::InProgress, &[CaseStatus::Urgent])
    }

    /// Cancel a case that is not yet resolved. Requires the edit permission;
    /// `Cancelled` is terminal.
    pub fn cancel(&self, id: CaseId, actor: &Role) -> Result<Case, LifecycleError> {
        self.require_permission(actor, permissions::CASES_EDIT)?;
        self.transition(
            id,
            actor,
            CaseStatus::Cancelled,
            &[CaseStatus::Pending, CaseStatus::InProgress, CaseStatus::Urgent],
        )
    }

    /// Update a case's editable content (provider, insurer, notes, admission
    /// data). Permitted only while the status allows editing.
    pub fn update_details(
        &self,
        id: CaseId,
        actor: &Role,
        update: CaseUpdate,
    ) -> Result<Case, LifecycleError> {
        self.require_permission(actor, permissions::CASES_EDIT)?;
        let updated = self.registry.mutate(id, |case| {
            if !case.status.is_editable() {
                return Err(LifecycleError::NotEditable(case.status));
            }

            let number = case.number.to_string();
            self.audit.record(
                actor.name.as_str(),
                AuditAction::CaseEdited,
                TargetKind::Case,
                number.as_str(),
                format!("Case {number} edited"),
            )?;

            if let Some(provider_ref) = update.provider_ref {
                case.provider_ref = provider_ref;
            }
            if let Some(insurer_ref) = update.insurer_ref {
                case.insurer_ref = insurer_ref;
            }
            if let Some(insurer_snapshot) = update.insurer_snapshot {
                case.insurer_snapshot = insurer_snapshot;
            }
            if let Some(clinical_notes) = update.clinical_notes {
                case.clinical_notes = clinical_notes;
            }
            if let Some(admission_kind) = update.admission_kind {
                case.admission_kind = admission_kind;
            }
            if let Some(with_order) = update.with_order {
                case.with_order = with_order;
            }
            case.updated_at = Utc::now();
            Ok(case.clone())
        })?;
        Ok(updated)
    }

    /// Replace the case's selected report lines. Same gating as other content
    /// edits.
    pub fn set_report_lines(
        &self,
        id: CaseId,
        actor: &Role,
        lines: Vec<ReportLine>,
    ) -> Result<Case, LifecycleError> {
        self.require_permission(actor, permissions::CASES_EDIT)?;
        self.registry.mutate(id, |case| {
            if !case.status.is_editable() {
                return Err(LifecycleError::NotEditable(case.status));
            }

            let number = case.number.to_string();
            self.audit.record(
                actor.name.as_str(),
                AuditAction::CaseEdited,
                TargetKind::Case,
                number.as_str(),
                format!("Case {number}: report lines replaced"),
            )?;

            case.report_lines = lines;
            case.updated_at = Utc::now();
            Ok(case.clone())
        })
    }

    pub fn get(&self, id: CaseId) -> Result<Option<Case>, LifecycleError> {
        self.registry.get(id)
    }

    pub fn find_by_number(&self, number: &str) -> Result<Option<Case>, LifecycleError> {
        self.registry.find_by_number(number)
    }

    pub fn list(&self) -> Result<Vec<Case>, LifecycleError> {
        self.registry.list()
    }

    /// Status totals over real cases; drafts are never counted.
    pub fn counts(&self) -> Result<CaseCounts, LifecycleError> {
        let mut counts = CaseCounts::default();
        for case in self.registry.list()? {
            if case.is_draft {
                continue;
            }
            counts.total += 1;
            match case.status {
                CaseStatus::Pending => counts.pending += 1,
                CaseStatus::Urgent => counts.urgent += 1,
                CaseStatus::InProgress => counts.in_progress += 1,
                CaseStatus::Completed => counts.completed += 1,
                CaseStatus::Cancelled => counts.cancelled += 1,
            }
        }
        Ok(counts)
    }

    fn transition(
        &self,
        id: CaseId,
        actor: &Role,
        to: CaseStatus,
        allowed_from: &[CaseStatus],
    ) -> Result<Case, LifecycleError> {
        self.registry.mutate(id, |case| {
            if !allowed_from.contains(&case.status) {
                return Err(LifecycleError::InvalidTransition {
                    from: case.status,
                    to,
                });
            }

            let number = case.number.to_string();
            self.audit.record(
                actor.name.as_str(),
                AuditAction::StatusChanged,
                TargetKind::Case,
                number.as_str(),
                format!("Case {number}: {} -> {}", case.status, to),
            )?;

            case.status = to;
            case.updated_at = Utc::now();
            Ok(case.clone())
        })
    }

    fn require_permission(&self, actor: &Role, permission: &str) -> Result<(), LifecycleError> {
        let code = PermissionCode::from(permission);
        if !evaluate(actor, &code) {
            return Err(LifecycleError::PermissionDenied {
                role: actor.name.clone(),
                permission: permission.to_string(),
            });
        }
        Ok(())
    }

    /// Hand a completion notice to the collaborator when the case qualifies.
    ///
    /// Inpatient cases always notify; ambulatory ones only when a written
    /// order accompanied the study. Dispatch failures are logged and never
    /// undo the completion.
    fn dispatch_completion(&self, case: &Case) {
        let should_notify = match case.admission_kind {
            AdmissionKind::Inpatient => true,
            AdmissionKind::Ambulatory => case.with_order,
        };
        if !should_notify {
            debug!(case = %case.number, "completion does not qualify for notification");
            return;
        }

        let notice = CompletionNotice {
            case_number: case.number.clone(),
            study: case.study,
            provider_ref: case.provider_ref.clone(),
            patient_ref: case.patient_ref.clone(),
            documentation_complete: !case.report_lines.is_empty(),
        };
        if let Err(err) = self.notifier.notify(&notice) {
            warn!(case = %case.number, error = %err, "completion notification failed; completion stands");
        }
    }
}
