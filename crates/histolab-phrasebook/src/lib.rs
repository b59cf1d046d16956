//! Reusable report fragments ("lines") grouped into named sections.
//!
//! Lines are pre-authored pieces of report text attached to a section of a
//! study type. Using a line bumps its popularity counters, which drive the
//! suggestion ordering in editors. Lines are never hard-deleted - only
//! deactivated - so historical reports keep resolving.

#![deny(unsafe_code)]

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use histolab_types::{Line, LineId, Section, SectionCode, SectionId, StudyType};
use thiserror::Error;
use tracing::debug;

/// Fragment repository errors.
#[derive(Debug, Error)]
pub enum PhrasebookError {
    #[error("section not found: {0}")]
    SectionNotFound(SectionId),

    #[error("line not found: {0}")]
    LineNotFound(LineId),

    #[error("line is inactive: {0}")]
    LineInactive(LineId),

    #[error("lock error")]
    LockError,
}

/// Repository of sections and their reusable lines.
pub struct Phrasebook {
    sections: RwLock<HashMap<SectionId, Section>>,
    lines: RwLock<HashMap<LineId, Line>>,
    section_lines: RwLock<HashMap<SectionId, Vec<LineId>>>,
}

impl Phrasebook {
    pub fn new() -> Self {
        Self {
            sections: RwLock::new(HashMap::new()),
            lines: RwLock::new(HashMap::new()),
            section_lines: RwLock::new(HashMap::new()),
        }
    }

    /// Define a section of a study type's report.
    pub fn define_section(
        &self,
        study: StudyType,
        code: SectionCode,
        button_code: impl Into<String>,
        name: impl Into<String>,
        position: u32,
    ) -> Result<Section, PhrasebookError> {
        let section = Section {
            id: SectionId::new(),
            study,
            code,
            button_code: button_code.into(),
            name: name.into(),
            position,
            active: true,
        };

        let mut sections = self.sections.write().map_err(|_| PhrasebookError::LockError)?;
        sections.insert(section.id, section.clone());
        Ok(section)
    }

    /// Active sections of a study type, in canonical position order.
    pub fn sections_for(&self, study: StudyType) -> Result<Vec<Section>, PhrasebookError> {
        let sections = self.sections.read().map_err(|_| PhrasebookError::LockError)?;
        let mut result: Vec<_> = sections
            .values()
            .filter(|s| s.study == study && s.active)
            .cloned()
            .collect();
        result.sort_by_key(|s| s.position);
        Ok(result)
    }

    pub fn section(&self, id: SectionId) -> Result<Option<Section>, PhrasebookError> {
        let sections = self.sections.read().map_err(|_| PhrasebookError::LockError)?;
        Ok(sections.get(&id).cloned())
    }

    /// Add a line to a section.
    ///
    /// Deduplicates on exact `(section, text)` match: adding a text that
    /// already exists as an active line of the section returns that line
    /// instead of creating a twin.
    pub fn add_line(
        &self,
        section_id: SectionId,
        text: impl Into<String>,
    ) -> Result<Line, PhrasebookError> {
        let text = text.into();

        {
            let sections = self.sections.read().map_err(|_| PhrasebookError::LockError)?;
            if !sections.contains_key(&section_id) {
                return Err(PhrasebookError::SectionNotFound(section_id));
            }
        }

        let mut lines = self.lines.write().map_err(|_| PhrasebookError::LockError)?;
        let mut section_lines = self
            .section_lines
            .write()
            .map_err(|_| PhrasebookError::LockError)?;

        let ids = section_lines.entry(section_id).or_default();
        if let Some(existing) = ids
            .iter()
            .filter_map(|id| lines.get(id))
            .find(|line| line.active && line.text == text)
        {
            debug!(line = %existing.id, "deduplicated line on exact text match");
            return Ok(existing.clone());
        }

        let line = Line {
            id: LineId::new(),
            section: section_id,
            text,
            position: ids.len() as u32,
            usage_count: 0,
            last_used_at: None,
            active: true,
        };
        ids.push(line.id);
        lines.insert(line.id, line.clone());
        Ok(line)
    }

    /// Record a use of a line and return its text for insertion into a case.
    ///
    /// Increments `usage_count` and stamps `last_used_at`. The counters only
    /// rank suggestions; they carry no stronger consistency guarantee.
    pub fn use_line(&self, line_id: LineId) -> Result<String, PhrasebookError> {
        let mut lines = self.lines.write().map_err(|_| PhrasebookError::LockError)?;
        let line = lines
            .get_mut(&line_id)
            .ok_or(PhrasebookError::LineNotFound(line_id))?;
        if !line.active {
            return Err(PhrasebookError::LineInactive(line_id));
        }
        line.usage_count += 1;
        line.last_used_at = Some(Utc::now());
        Ok(line.text.clone())
    }

    /// Active lines of a section, most used first, then by explicit position.
    pub fn list_lines(&self, section_id: SectionId) -> Result<Vec<Line>, PhrasebookError> {
        let lines = self.lines.read().map_err(|_| PhrasebookError::LockError)?;
        let section_lines = self
            .section_lines
            .read()
            .map_err(|_| PhrasebookError::LockError)?;

        let ids = match section_lines.get(&section_id) {
            Some(ids) => ids,
            None => return Ok(vec![]),
        };

        let mut result: Vec<_> = ids
            .iter()
            .filter_map(|id| lines.get(id))
            .filter(|line| line.active)
            .cloned()
            .collect();
        result.sort_by(|a, b| {
            b.usage_count
                .cmp(&a.usage_count)
                .then(a.position.cmp(&b.position))
        });
        Ok(result)
    }

    pub fn line(&self, id: LineId) -> Result<Option<Line>, PhrasebookError> {
        let lines = self.lines.read().map_err(|_| PhrasebookError::LockError)?;
        Ok(lines.get(&id).cloned())
    }

    /// Deactivate a line. Lines are never removed from the repository.
    pub fn deactivate_line(&self, line_id: LineId) -> Result<(), PhrasebookError> {
        let mut lines = self.lines.write().map_err(|_| PhrasebookError::LockError)?;
        let line = lines
            .get_mut(&line_id)
            .ok_or(PhrasebookError::LineNotFound(line_id))?;
        line.active = false;
        Ok(())
    }
}

impl Default for Phrasebook {
    fn default() -> Self {
        Self::new()
    }
}
