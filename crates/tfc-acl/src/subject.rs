//! # Access Subjects
//!
//! An access subject is the `(organization, role)` pair a rule is keyed on.
//! Its lookup key is canonical JSON, so two subjects map to the same rule
//! exactly when both fields are equal.

use serde::{Deserialize, Serialize};

use tfc_core::{CanonicalBytes, CanonicalizationError};

/// Role assumed for callers that present no business role.
pub const ANY_ROLE: &str = "any";

/// The `(organization, role)` pair an access rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AclSubject {
    /// MSP id of the organization.
    pub msp_id: String,
    /// Business role within the organization.
    pub role: String,
}

impl AclSubject {
    pub fn new(msp_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            msp_id: msp_id.into(),
            role: role.into(),
        }
    }

    /// Subject for a caller, resolving a missing or empty role to [`ANY_ROLE`].
    pub fn for_caller(msp_id: &str, role: Option<&str>) -> Self {
        Self::new(msp_id, role.filter(|r| !r.is_empty()).unwrap_or(ANY_ROLE))
    }

    /// The canonical lookup key: `{"mspId":"...","role":"..."}`.
    pub fn key(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        CanonicalBytes::new(self)
    }
}

impl std::fmt::Display for AclSubject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.msp_id, self.role)
    }
}
