use serde::{Deserialize, Serialize};

/// Strong typed IDs used throughout the engine.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(pub uuid::Uuid);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionId(pub uuid::Uuid);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineId(pub uuid::Uuid);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DesignId(pub uuid::Uuid);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditEntryId(pub uuid::Uuid);

macro_rules! impl_uuid_id {
    ($name:ident, $prefix:literal) => {
        impl $name {
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

impl_uuid_id!(CaseId, "case");
impl_uuid_id!(SectionId, "sec");
impl_uuid_id!(LineId, "line");
impl_uuid_id!(DesignId, "design");
impl_uuid_id!(AuditEntryId, "audit");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_id_uniqueness() {
        let a = CaseId::new();
        let b = CaseId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn id_serialization_round_trip() {
        let id = LineId::new();
        let json = serde_json::to_string(&id).unwrap();
        let restored: LineId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }

    #[test]
    fn display_formats() {
        assert!(format!("{}", CaseId::new()).starts_with("case:"));
        assert!(format!("{}", SectionId::new()).starts_with("sec:"));
        assert!(format!("{}", LineId::new()).starts_with("line:"));
        assert!(format!("{}", DesignId::new()).starts_with("design:"));
        assert!(format!("{}", AuditEntryId::new()).starts_with("audit:"));
    }
}
