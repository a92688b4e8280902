//! # Access Policy
//!
//! An immutable table from subject key to the set of operations the subject
//! may invoke. Policies are assembled once, through [`AccessPolicyBuilder`]
//! or from a [`PolicyConfig`](crate::PolicyConfig), and never change while a
//! contract holds them.

use std::collections::{BTreeMap, BTreeSet};

use tfc_core::{AccessError, CanonicalBytes, BUSINESS_ROLE_ATTRIBUTE};
use tfc_ledger::LedgerContext;

use crate::subject::AclSubject;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Rule {
    subject: AclSubject,
    operations: BTreeSet<String>,
}

/// Immutable `(organization, role) → operations` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    rules: BTreeMap<CanonicalBytes, Rule>,
}

impl AccessPolicy {
    /// Start an empty policy.
    pub fn builder() -> AccessPolicyBuilder {
        AccessPolicyBuilder::default()
    }

    /// Decide whether `operation` may be invoked by the given caller.
    ///
    /// # Errors
    ///
    /// - [`AccessError::UnrecognizedCaller`] when no rule exists for the
    ///   resolved subject.
    /// - [`AccessError::Forbidden`] when the rule does not list `operation`.
    pub fn check_access(
        &self,
        msp_id: &str,
        role: Option<&str>,
        operation: &str,
    ) -> Result<(), AccessError> {
        let subject = AclSubject::for_caller(msp_id, role);
        let key = subject.key()?;

        let Some(rule) = self.rules.get(&key) else {
            return Err(AccessError::UnrecognizedCaller {
                msp_id: subject.msp_id,
                role: subject.role,
            });
        };
        if !rule.operations.contains(operation) {
            return Err(AccessError::Forbidden {
                msp_id: subject.msp_id,
                role: subject.role,
                operation: operation.to_string(),
            });
        }
        tracing::trace!(subject = %subject, operation, "access granted");
        Ok(())
    }

    /// [`check_access()`](Self::check_access) for the invocation in `ctx`.
    pub fn check_caller(&self, ctx: &dyn LedgerContext) -> Result<(), AccessError> {
        self.check_access(
            ctx.caller_msp_id(),
            ctx.caller_attribute(BUSINESS_ROLE_ATTRIBUTE),
            ctx.function_name(),
        )
    }

    /// Rules in subject-key order.
    pub fn rules(&self) -> impl Iterator<Item = (&AclSubject, &BTreeSet<String>)> {
        self.rules.values().map(|r| (&r.subject, &r.operations))
    }

    /// The operations granted to a subject, if it is recognized.
    pub fn operations_for(&self, subject: &AclSubject) -> Option<&BTreeSet<String>> {
        let key = subject.key().ok()?;
        self.rules.get(&key).map(|r| &r.operations)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Collects rules for an [`AccessPolicy`].
///
/// Granting the same subject twice merges the operation sets.
#[derive(Debug, Default)]
pub struct AccessPolicyBuilder {
    grants: Vec<(AclSubject, Vec<String>)>,
}

impl AccessPolicyBuilder {
    /// Grant `operations` to the subject `(msp_id, role)`.
    pub fn allow(mut self, msp_id: &str, role: &str, operations: &[&str]) -> Self {
        self.grants.push((
            AclSubject::new(msp_id, role),
            operations.iter().map(|op| op.to_string()).collect(),
        ));
        self
    }

    /// Grant `operations` to the `any` role of each organization.
    pub fn allow_any_role(mut self, msp_ids: &[&str], operations: &[&str]) -> Self {
        for msp_id in msp_ids {
            self = self.allow(msp_id, crate::ANY_ROLE, operations);
        }
        self
    }

    pub(crate) fn grant(mut self, subject: AclSubject, operations: Vec<String>) -> Self {
        self.grants.push((subject, operations));
        self
    }

    /// Freeze the collected rules.
    pub fn build(self) -> Result<AccessPolicy, AccessError> {
        let mut rules = BTreeMap::new();
        for (subject, operations) in self.grants {
            let key = subject.key()?;
            rules
                .entry(key)
                .or_insert_with(|| Rule {
                    subject,
                    operations: BTreeSet::new(),
                })
                .operations
                .extend(operations);
        }
        Ok(AccessPolicy { rules })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfc_core::CallerIdentity;
    use tfc_ledger::MemoryLedger;

    fn sample() -> AccessPolicy {
        AccessPolicy::builder()
            .allow_any_role(&["ExporterOrgMSP", "ImporterOrgMSP"], &["init"])
            .allow("ExporterOrgMSP", "exporter", &["acceptTrade", "getTrade"])
            .allow("ImporterOrgMSP", "importer", &["requestTrade", "getTrade"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_grants_listed_operation() {
        let policy = sample();
        assert!(policy.check_access("ExporterOrgMSP", Some("exporter"), "acceptTrade").is_ok());
        assert!(policy.check_access("ImporterOrgMSP", None, "init").is_ok());
    }

    #[test]
    fn test_unrecognized_subject() {
        let err = sample()
            .check_access("CarrierOrgMSP", Some("carrier"), "getTrade")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "The participant belonging to MSP CarrierOrgMSP and role carrier is not recognized"
        );
    }

    #[test]
    fn test_missing_role_reports_any() {
        let err = sample()
            .check_access("RegulatorOrgMSP", None, "init")
            .unwrap_err();
        assert!(matches!(err, AccessError::UnrecognizedCaller { ref role, .. } if role == "any"));
    }

    #[test]
    fn test_forbidden_operation() {
        let err = sample()
            .check_access("ImporterOrgMSP", Some("importer"), "acceptTrade")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "The participant belonging to MSP ImporterOrgMSP and role importer cannot invoke transaction acceptTrade"
        );
    }

    #[test]
    fn test_role_rules_do_not_inherit_any() {
        let err = sample()
            .check_access("ExporterOrgMSP", Some("exporter"), "init")
            .unwrap_err();
        assert!(matches!(err, AccessError::Forbidden { .. }));
    }

    #[test]
    fn test_duplicate_grants_merge() {
        let policy = AccessPolicy::builder()
            .allow("A", "r", &["x"])
            .allow("A", "r", &["y"])
            .build()
            .unwrap();
        assert_eq!(policy.len(), 1);
        let ops = policy.operations_for(&AclSubject::new("A", "r")).unwrap();
        assert_eq!(ops.iter().map(String::as_str).collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn test_check_caller_reads_context() {
        let policy = sample();
        let mut ledger = MemoryLedger::new();
        let tx = ledger.begin(
            CallerIdentity::with_role("ImporterOrgMSP", "importer"),
            "requestTrade",
            vec![],
        );
        assert!(policy.check_caller(&tx).is_ok());
        drop(tx);

        let tx = ledger.begin(CallerIdentity::new("ImporterOrgMSP"), "requestTrade", vec![]);
        assert!(matches!(
            policy.check_caller(&tx),
            Err(AccessError::Forbidden { .. })
        ));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn msp() -> impl Strategy<Value = &'static str> {
            prop_oneof![Just("ExporterOrgMSP"), Just("ImporterOrgMSP"), Just("CarrierOrgMSP")]
        }

        fn role() -> impl Strategy<Value = Option<&'static str>> {
            prop_oneof![
                Just(None),
                Just(Some("")),
                Just(Some("any")),
                Just(Some("exporter")),
                Just(Some("importer")),
            ]
        }

        fn op() -> impl Strategy<Value = &'static str> {
            prop_oneof![Just("init"), Just("acceptTrade"), Just("requestTrade"), Just("getTrade")]
        }

        proptest! {
            #[test]
            fn decision_matches_table(m in msp(), r in role(), o in op()) {
                let policy = sample();
                let resolved = r.filter(|r| !r.is_empty()).unwrap_or("any");
                let granted: &[&str] = match (m, resolved) {
                    ("ExporterOrgMSP" | "ImporterOrgMSP", "any") => &["init"],
                    ("ExporterOrgMSP", "exporter") => &["acceptTrade", "getTrade"],
                    ("ImporterOrgMSP", "importer") => &["requestTrade", "getTrade"],
                    _ => {
                        let is_unrecognized = matches!(
                            policy.check_access(m, r, o),
                            Err(AccessError::UnrecognizedCaller { .. })
                        );
                        prop_assert!(is_unrecognized);
                        return Ok(());
                    }
                };
                let result = policy.check_access(m, r, o);
                if granted.contains(&o) {
                    prop_assert!(result.is_ok());
                } else {
                    let is_forbidden = matches!(result, Err(AccessError::Forbidden { .. }));
                    prop_assert!(is_forbidden);
                }
            }
        }
    }
}
