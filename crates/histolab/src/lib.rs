//! Histolab - case tracking and report composition for a pathology lab.
//!
//! The engine receives intake requests for diagnostic studies, issues unique
//! case numbers, moves each case through a small set of processing states
//! until a report is signed out, and assembles that report from reusable,
//! categorized text fragments laid out by a configurable document design.
//!
//! [`LabEngine`] wires the components together; each also stands alone:
//!
//! - [`histolab_numbering`] - per-(study, year) case number sequences
//! - [`histolab_access`] - permission evaluation and role capabilities
//! - [`histolab_phrasebook`] - reusable report fragments by section
//! - [`histolab_lifecycle`] - the case registry and state machine
//! - [`histolab_compose`] - document designs and composition
//! - [`histolab_audit`] - the append-only audit trail

#![deny(unsafe_code)]

use std::sync::Arc;

use histolab_audit::AuditTrail;
use histolab_compose::{Composer, DesignRegistry};
use histolab_lifecycle::{CompletionNotifier, LifecycleEngine, NoopNotifier};
use histolab_numbering::CaseNumberAllocator;
use histolab_phrasebook::Phrasebook;
use histolab_types::LabIdentity;

pub use histolab_access as access;
pub use histolab_audit as audit;
pub use histolab_compose as compose;
pub use histolab_lifecycle as lifecycle;
pub use histolab_numbering as numbering;
pub use histolab_phrasebook as phrasebook;
pub use histolab_types as types;

pub use histolab_access::{classify_capabilities, evaluate, is_superuser, load_role};
pub use histolab_audit::AuditFilter;
pub use histolab_compose::{DesignConfig, RenderableDocument};
pub use histolab_lifecycle::{
    CaseUpdate, CompletionNotice, IntakeOutcome, IntakeRequest, LifecycleError,
};
pub use histolab_types::{
    Case, CaseNumber, CaseStatus, Line, Role, Section, StudyType,
};

/// The assembled engine: one allocator, one audit trail, one case registry,
/// one phrasebook, one design registry and one composer, wired so lifecycle
/// transitions and compositions observe the same shared state.
pub struct LabEngine {
    allocator: Arc<CaseNumberAllocator>,
    audit: Arc<AuditTrail>,
    lifecycle: LifecycleEngine,
    phrasebook: Phrasebook,
    designs: Arc<DesignRegistry>,
    composer: Composer,
}

impl LabEngine {
    /// Build an engine for `lab` with no notification channel.
    pub fn new(lab: LabIdentity) -> Self {
        Self::with_notifier(lab, Arc::new(NoopNotifier))
    }

    /// Build an engine for `lab` delivering completion notices to `notifier`.
    pub fn with_notifier(lab: LabIdentity, notifier: Arc<dyn CompletionNotifier>) -> Self {
        let allocator = Arc::new(CaseNumberAllocator::new());
        let audit = Arc::new(AuditTrail::new());
        let designs = Arc::new(DesignRegistry::new());

        Self {
            lifecycle: LifecycleEngine::new(
                Arc::clone(&allocator),
                Arc::clone(&audit),
                notifier,
            ),
            composer: Composer::new(lab, Arc::clone(&designs)),
            phrasebook: Phrasebook::new(),
            allocator,
            audit,
            designs,
        }
    }

    pub fn lifecycle(&self) -> &LifecycleEngine {
        &self.lifecycle
    }

    pub fn phrasebook(&self) -> &Phrasebook {
        &self.phrasebook
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn designs(&self) -> &Arc<DesignRegistry> {
        &self.designs
    }

    pub fn audit(&self) -> &Arc<AuditTrail> {
        &self.audit
    }

    pub fn allocator(&self) -> &Arc<CaseNumberAllocator> {
        &self.allocator
    }
}
