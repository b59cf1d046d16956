use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A named permission grant (e.g. `cases_create`, `designs_manage`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PermissionCode(pub String);

impl PermissionCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }
}

impl std::fmt::Display for PermissionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PermissionCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

/// Coarse capability classification inferred from role identity.
///
/// Capabilities gate terminal lifecycle transitions and are distinct from
/// permission grants: superuser roles bypass permission checks but not
/// capability checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// May move a case into the `Completed` state (sign out reports).
    CompletesReports,
}

/// The capabilities attached to a role, resolved once when the role is loaded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.0.insert(capability);
        self
    }

    pub fn insert(&mut self, capability: Capability) {
        self.0.insert(capability);
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Named actor category with its permission grants and resolved capabilities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub permissions: BTreeSet<PermissionCode>,
    pub capabilities: CapabilitySet,
}

impl Role {
    /// Build a role with explicit permissions and capabilities. Most callers
    /// should go through `histolab_access::load_role`, which classifies
    /// capabilities from the role name.
    pub fn new(
        name: impl Into<String>,
        permissions: impl IntoIterator<Item = PermissionCode>,
        capabilities: CapabilitySet,
    ) -> Self {
        Self {
            name: name.into(),
            permissions: permissions.into_iter().collect(),
            capabilities,
        }
    }

    pub fn grants(&self, permission: &PermissionCode) -> bool {
        self.permissions.contains(permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_set_membership() {
        let set = CapabilitySet::empty().with(Capability::CompletesReports);
        assert!(set.contains(Capability::CompletesReports));
        assert!(!CapabilitySet::empty().contains(Capability::CompletesReports));
    }

    #[test]
    fn role_grants() {
        let role = Role::new(
            "Technician",
            [PermissionCode::from("cases_view")],
            CapabilitySet::empty(),
        );
        assert!(role.grants(&PermissionCode::from("cases_view")));
        assert!(!role.grants(&PermissionCode::from("cases_create")));
    }
}
