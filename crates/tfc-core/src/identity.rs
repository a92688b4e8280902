//! # Caller Identity
//!
//! The membership service authenticates every invocation and hands the
//! contract the caller's organization (MSP id) plus the attributes embedded
//! in its enrollment certificate. `CallerIdentity` is that pair.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Certificate attribute that carries the application-level business role.
pub const BUSINESS_ROLE_ATTRIBUTE: &str = "BUSINESS_ROLE";

/// The authenticated invoker of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerIdentity {
    /// Organization identity of the caller.
    pub msp_id: String,
    /// Certificate attributes, by name.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl CallerIdentity {
    /// A caller with no certificate attributes.
    pub fn new(msp_id: impl Into<String>) -> Self {
        Self {
            msp_id: msp_id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// A caller presenting the given business role.
    pub fn with_role(msp_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self::new(msp_id).with_attribute(BUSINESS_ROLE_ATTRIBUTE, role)
    }

    /// Add a certificate attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Look up a certificate attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The business role attribute, if presented.
    pub fn business_role(&self) -> Option<&str> {
        self.attribute(BUSINESS_ROLE_ATTRIBUTE)
    }
}

impl std::fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.business_role() {
            Some(role) => write!(f, "{}/{}", self.msp_id, role),
            None => f.write_str(&self.msp_id),
        }
    }
}
