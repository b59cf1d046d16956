//! Permission evaluation.
//!
//! Every gated action in the system routes through [`evaluate`] - nothing
//! re-implements role-name checks at call sites. Two designated role names are
//! superusers and bypass the permission-set check by identity. Capabilities
//! (coarse classifications such as "completes reports") are resolved once per
//! role at load time and are deliberately NOT subject to the superuser bypass:
//! an administrator cannot sign out a report unless the role is a medical one.

#![deny(unsafe_code)]

use histolab_types::{Capability, CapabilitySet, PermissionCode, Role};
use tracing::debug;

/// The two role names exempt from permission-set checks, by identity.
pub const SUPERUSER_ROLES: [&str; 2] = ["Administrator", "Director"];

/// Permission codes used by the engine.
pub mod permissions {
    pub const CASES_VIEW: &str = "cases_view";
    pub const CASES_CREATE: &str = "cases_create";
    pub const CASES_EDIT: &str = "cases_edit";
    pub const PHRASEBOOK_MANAGE: &str = "phrasebook_manage";
    pub const DESIGNS_MANAGE: &str = "designs_manage";
}

/// Whether `name` is one of the designated superuser roles.
pub fn is_superuser(name: &str) -> bool {
    SUPERUSER_ROLES.contains(&name)
}

/// Resolve whether `role` may perform the action named by `permission`.
///
/// Returns `true` unconditionally for superuser roles, otherwise membership
/// in the role's permission set. Pure and read-only.
pub fn evaluate(role: &Role, permission: &PermissionCode) -> bool {
    if is_superuser(&role.name) {
        return true;
    }
    let granted = role.grants(permission);
    if !granted {
        debug!(role = %role.name, permission = %permission, "permission denied");
    }
    granted
}

/// Whether `role` holds a capability. No superuser bypass (see module docs).
pub fn has_capability(role: &Role, capability: Capability) -> bool {
    role.capabilities.contains(capability)
}

/// Classify the capabilities a role name implies.
///
/// This is the single place where role identity is turned into capabilities;
/// the result is attached to the [`Role`] when it is loaded and read from
/// there afterwards, never recomputed at call sites.
pub fn classify_capabilities(role_name: &str) -> CapabilitySet {
    let normalized = role_name.trim().to_lowercase();
    let mut capabilities = CapabilitySet::empty();
    if ["pathologist", "physician", "medic"]
        .iter()
        .any(|marker| normalized.contains(marker))
    {
        capabilities.insert(Capability::CompletesReports);
    }
    capabilities
}

/// Build a role from stored data, resolving its capabilities from its name.
pub fn load_role(
    name: impl Into<String>,
    permission_codes: impl IntoIterator<Item = PermissionCode>,
) -> Role {
    let name = name.into();
    let capabilities = classify_capabilities(&name);
    Role::new(name, permission_codes, capabilities)
}
