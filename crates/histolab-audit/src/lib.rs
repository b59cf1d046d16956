//! Append-only audit trail.
//!
//! Every lifecycle transition and other sensitive action leaves an immutable
//! record here. The trail is append-only: no update or delete operations
//! exist, and entries are handed out by value. Compliance review tooling
//! consumes the query surface.

#![deny(unsafe_code)]

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use histolab_types::{AuditAction, AuditEntry, AuditEntryId, TargetKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("lock error")]
    LockError,
}

/// Filter for querying the trail.
#[derive(Clone, Debug, Default)]
pub struct AuditFilter {
    pub actor: Option<String>,
    pub action: Option<AuditAction>,
    pub target_kind: Option<TargetKind>,
    pub target_id: Option<String>,
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl AuditFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_action(mut self, action: AuditAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_target(mut self, kind: TargetKind, id: impl Into<String>) -> Self {
        self.target_kind = Some(kind);
        self.target_id = Some(id.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(ref actor) = self.actor {
            if entry.actor != *actor {
                return false;
            }
        }
        if let Some(action) = self.action {
            if entry.action != action {
                return false;
            }
        }
        if let Some(kind) = self.target_kind {
            if entry.target_kind != kind {
                return false;
            }
        }
        if let Some(ref id) = self.target_id {
            if entry.target_id != *id {
                return false;
            }
        }
        if let Some(after) = self.after {
            if entry.timestamp < after {
                return false;
            }
        }
        if let Some(before) = self.before {
            if entry.timestamp > before {
                return false;
            }
        }
        true
    }
}

/// The audit trail. Append-only - the only mutation is [`AuditTrail::record`].
pub struct AuditTrail {
    entries: RwLock<Vec<AuditEntry>>,
}

impl AuditTrail {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Append a new entry and return its id.
    pub fn record(
        &self,
        actor: impl Into<String>,
        action: AuditAction,
        target_kind: TargetKind,
        target_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<AuditEntryId, AuditError> {
        let entry = AuditEntry {
            id: AuditEntryId::new(),
            actor: actor.into(),
            action,
            target_kind,
            target_id: target_id.into(),
            description: description.into(),
            timestamp: Utc::now(),
        };
        let id = entry.id;

        let mut entries = self.entries.write().map_err(|_| AuditError::LockError)?;
        entries.push(entry);
        Ok(id)
    }

    /// Entries matching `filter`, newest first.
    pub fn query(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, AuditError> {
        let entries = self.entries.read().map_err(|_| AuditError::LockError)?;
        let mut results: Vec<_> = entries
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect();
        results.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if let Some(limit) = filter.limit {
            results.truncate(limit);
        }
        Ok(results)
    }

    /// Full history for one target, oldest first.
    pub fn history_for(
        &self,
        kind: TargetKind,
        target_id: &str,
    ) -> Result<Vec<AuditEntry>, AuditError> {
        let entries = self.entries.read().map_err(|_| AuditError::LockError)?;
        Ok(entries
            .iter()
            .filter(|entry| entry.target_kind == kind && entry.target_id == target_id)
            .cloned()
            .collect())
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new()
    }
}
