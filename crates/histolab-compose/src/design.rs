use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use histolab_types::{DesignId, StudyType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::config::DesignConfig;
use crate::error::ComposeError;
use crate::merge::merge_defaults;

/// A named, reusable layout configuration for one study type.
///
/// `config_json` stores only the overrides a user saved; everything absent
/// falls back to [`DesignConfig::default`]. Designs are updated in place -
/// no version history is kept.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocumentDesign {
    pub id: DesignId,
    pub name: String,
    pub study: StudyType,
    pub active: bool,
    pub is_default: bool,
    pub config_json: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentDesign {
    /// The effective configuration: stored overrides merged over the built-in
    /// defaults.
    ///
    /// A malformed stored blob must not fail the report - it degrades to the
    /// defaults with a warning.
    pub fn effective_config(&self) -> DesignConfig {
        if self.config_json.trim().is_empty() {
            return DesignConfig::default();
        }

        let overrides: Value = match serde_json::from_str(&self.config_json) {
            Ok(value @ Value::Object(_)) => value,
            Ok(_) => {
                warn!(design = %self.id, "stored design config is not an object; using defaults");
                return DesignConfig::default();
            }
            Err(err) => {
                warn!(design = %self.id, error = %err, "stored design config is malformed; using defaults");
                return DesignConfig::default();
            }
        };

        let defaults = serde_json::to_value(DesignConfig::default())
            .expect("built-in defaults always serialize");
        let merged = merge_defaults(&overrides, &defaults);
        match serde_json::from_value(merged) {
            Ok(config) => config,
            Err(err) => {
                warn!(design = %self.id, error = %err, "merged design config failed to load; using defaults");
                DesignConfig::default()
            }
        }
    }
}

/// Registry of document designs, at most one default per study type.
pub struct DesignRegistry {
    designs: RwLock<HashMap<DesignId, DocumentDesign>>,
}

impl DesignRegistry {
    pub fn new() -> Self {
        Self {
            designs: RwLock::new(HashMap::new()),
        }
    }

    /// Create a design from its stored override blob.
    pub fn create(
        &self,
        name: impl Into<String>,
        study: StudyType,
        config_json: impl Into<String>,
    ) -> Result<DocumentDesign, ComposeError> {
        let now = Utc::now();
        let design = DocumentDesign {
            id: DesignId::new(),
            name: name.into(),
            study,
            active: true,
            is_default: false,
            config_json: config_json.into(),
            created_at: now,
            updated_at: now,
        };

        let mut designs = self.designs.write().map_err(|_| ComposeError::LockError)?;
        designs.insert(design.id, design.clone());
        Ok(design)
    }

    pub fn get(&self, id: DesignId) -> Result<Option<DocumentDesign>, ComposeError> {
        let designs = self.designs.read().map_err(|_| ComposeError::LockError)?;
        Ok(designs.get(&id).cloned())
    }

    /// Replace a design's stored overrides in place.
    pub fn update_config(
        &self,
        id: DesignId,
        config_json: impl Into<String>,
    ) -> Result<DocumentDesign, ComposeError> {
        let mut designs = self.designs.write().map_err(|_| ComposeError::LockError)?;
        let design = designs.get_mut(&id).ok_or(ComposeError::DesignNotFound(id))?;
        design.config_json = config_json.into();
        design.updated_at = Utc::now();
        Ok(design.clone())
    }

    /// Flag a design as its study type's default.
    ///
    /// At most one default exists per study type; the previous one is cleared
    /// in the same critical section.
    pub fn set_default(&self, id: DesignId) -> Result<DocumentDesign, ComposeError> {
        let mut designs = self.designs.write().map_err(|_| ComposeError::LockError)?;
        let study = designs
            .get(&id)
            .ok_or(ComposeError::DesignNotFound(id))?
            .study;

        for design in designs.values_mut() {
            if design.study == study {
                design.is_default = design.id == id;
            }
        }
        Ok(designs.get(&id).cloned().expect("design checked above"))
    }

    /// The design flagged default for a study type, if any.
    pub fn default_for(&self, study: StudyType) -> Result<Option<DocumentDesign>, ComposeError> {
        let designs = self.designs.read().map_err(|_| ComposeError::LockError)?;
        Ok(designs
            .values()
            .find(|d| d.study == study && d.active && d.is_default)
            .cloned())
    }

    /// Active designs of a study type, default first, then by name.
    pub fn designs_for(&self, study: StudyType) -> Result<Vec<DocumentDesign>, ComposeError> {
        let designs = self.designs.read().map_err(|_| ComposeError::LockError)?;
        let mut result: Vec<_> = designs
            .values()
            .filter(|d| d.study == study && d.active)
            .cloned()
            .collect();
        result.sort_by(|a, b| {
            b.is_default
                .cmp(&a.is_default)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(result)
    }

    pub fn deactivate(&self, id: DesignId) -> Result<(), ComposeError> {
        let mut designs = self.designs.write().map_err(|_| ComposeError::LockError)?;
        let design = designs.get_mut(&id).ok_or(ComposeError::DesignNotFound(id))?;
        design.active = false;
        Ok(())
    }
}

impl Default for DesignRegistry {
    fn default() -> Self {
        Self::new()
    }
}
