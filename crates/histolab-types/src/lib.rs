//! Core type definitions for the Histolab engine.
//!
//! This crate provides all shared domain types. No business logic - just types.
//! Every Histolab crate depends on this crate.

pub mod access;
pub mod audit;
pub mod case;
pub mod ids;
pub mod lab;
pub mod number;
pub mod phrase;
pub mod study;

// Re-export primary types at crate root for ergonomic use.
pub use access::{Capability, CapabilitySet, PermissionCode, Role};
pub use audit::{AuditAction, AuditEntry, TargetKind};
pub use case::{
    AdmissionKind, Case, CaseStatus, InsurerRef, InsurerSnapshot, PatientRef, ProviderRef,
    ReportLine,
};
pub use ids::{AuditEntryId, CaseId, DesignId, LineId, SectionId};
pub use lab::LabIdentity;
pub use number::{CaseNumber, CaseNumberParseError};
pub use phrase::{Line, Section, SectionCode};
pub use study::StudyType;
