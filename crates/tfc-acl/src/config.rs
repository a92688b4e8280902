//! # Policy Configuration
//!
//! Serde form of an access policy, used to override a contract's built-in
//! table from deployment configuration:
//!
//! ```yaml
//! rules:
//!   - mspId: ExporterOrgMSP
//!     operations: [init]
//!   - mspId: ExporterOrgMSP
//!     role: exporter
//!     operations: [acceptTrade, getTrade]
//! ```
//!
//! An omitted `role` is the `any` role.

use serde::{Deserialize, Serialize};

use tfc_core::AccessError;

use crate::policy::AccessPolicy;
use crate::subject::{AclSubject, ANY_ROLE};

/// A complete policy table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// One grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConfig {
    pub msp_id: String,
    #[serde(default = "any_role")]
    pub role: String,
    pub operations: Vec<String>,
}

fn any_role() -> String {
    ANY_ROLE.to_string()
}

impl AccessPolicy {
    /// Build a policy from its configuration form.
    pub fn from_config(config: &PolicyConfig) -> Result<Self, AccessError> {
        config
            .rules
            .iter()
            .fold(AccessPolicy::builder(), |builder, rule| {
                builder.grant(
                    AclSubject::new(rule.msp_id.clone(), rule.role.clone()),
                    rule.operations.clone(),
                )
            })
            .build()
    }

    /// The configuration form of this policy, one rule per subject.
    pub fn to_config(&self) -> PolicyConfig {
        PolicyConfig {
            rules: self
                .rules()
                .map(|(subject, operations)| RuleConfig {
                    msp_id: subject.msp_id.clone(),
                    role: subject.role.clone(),
                    operations: operations.iter().cloned().collect(),
                })
                .collect(),
        }
    }
}
