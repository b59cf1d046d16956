use std::collections::HashMap;
use std::sync::RwLock;

use histolab_types::{Case, CaseId};
use tracing::error;

use crate::error::LifecycleError;

struct Inner {
    cases: HashMap<CaseId, Case>,
    by_number: HashMap<String, CaseId>,
}

/// In-memory case store with a unique case-number index.
///
/// A single lock guards both maps, so a mutation and its index update are
/// always observed together. The closure-taking methods let the engine run
/// validation and the audit append inside the same critical section as the
/// state change - the "both or neither" discipline for transitions.
pub struct CaseRegistry {
    inner: RwLock<Inner>,
}

impl CaseRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                cases: HashMap::new(),
                by_number: HashMap::new(),
            }),
        }
    }

    /// Insert a new case after running `prepare` under the write lock.
    ///
    /// `prepare` typically writes the audit entries for the creation; if it
    /// fails, the case is not inserted. A duplicate number is a hard failure:
    /// correctly serialized issuance makes it structurally impossible, so
    /// observing one means a serialization defect that must surface.
    pub fn insert_with<F>(&self, case: Case, prepare: F) -> Result<Case, LifecycleError>
    where
        F: FnOnce(&Case) -> Result<(), LifecycleError>,
    {
        let mut inner = self.inner.write().map_err(|_| LifecycleError::LockError)?;

        let number = case.number.to_string();
        if inner.by_number.contains_key(&number) {
            error!(number = %number, "duplicate case number - issuance serialization defect");
            return Err(LifecycleError::DuplicateNumber(number));
        }

        prepare(&case)?;

        inner.by_number.insert(number, case.id);
        inner.cases.insert(case.id, case.clone());
        Ok(case)
    }

    /// Run a fallible mutation on one case under the write lock.
    ///
    /// The closure gets a scratch copy; the registry commits it only when the
    /// closure returns `Ok`, so a failed validation or audit append leaves the
    /// stored case untouched.
    pub fn mutate<F, T>(&self, id: CaseId, apply: F) -> Result<T, LifecycleError>
    where
        F: FnOnce(&mut Case) -> Result<T, LifecycleError>,
    {
        let mut inner = self.inner.write().map_err(|_| LifecycleError::LockError)?;

        let stored = inner
            .cases
            .get(&id)
            .ok_or(LifecycleError::CaseNotFound(id))?;

        let mut scratch = stored.clone();
        let value = apply(&mut scratch)?;
        inner.cases.insert(id, scratch);
        Ok(value)
    }

    pub fn get(&self, id: CaseId) -> Result<Option<Case>, LifecycleError> {
        let inner = self.inner.read().map_err(|_| LifecycleError::LockError)?;
        Ok(inner.cases.get(&id).cloned())
    }

    pub fn find_by_number(&self, number: &str) -> Result<Option<Case>, LifecycleError> {
        let inner = self.inner.read().map_err(|_| LifecycleError::LockError)?;
        Ok(inner
            .by_number
            .get(number)
            .and_then(|id| inner.cases.get(id))
            .cloned())
    }

    pub fn list(&self) -> Result<Vec<Case>, LifecycleError> {
        let inner = self.inner.read().map_err(|_| LifecycleError::LockError)?;
        Ok(inner.cases.values().cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.cases.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CaseRegistry {
    fn default() -> Self {
        Self::new()
    }
}
