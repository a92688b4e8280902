//! Built-in access table of the trade contract.

use tfc_acl::AccessPolicy;
use tfc_core::AccessError;

use crate::contract::ops;

/// Organizations whose callers may run `init` without a business role.
pub const INIT_ORGANIZATIONS: &[&str] = &["ExporterOrgMSP", "ImporterOrgMSP", "RegulatorOrgMSP"];

const READ_OPERATIONS: &[&str] = &[ops::EXISTS, ops::GET_TRADE, ops::GET_TRADE_STATUS, ops::LIST_TRADE];

/// The default `TradeContract` policy.
///
/// | Subject | Operations |
/// |---|---|
/// | Exporter/Importer/Regulator orgs, `any` | `init` |
/// | `ExporterOrgMSP`, `exporter` | `acceptTrade` + reads |
/// | `ImporterOrgMSP`, `importer` | `requestTrade` + reads |
/// | `ExporterOrgMSP`, `exporter_banker` | reads |
/// | `ImporterOrgMSP`, `importer_banker` | reads |
/// | `RegulatorOrgMSP`, `regulator` | reads |
///
/// Reads are `exists`, `getTrade`, `getTradeStatus` and `listTrade`.
/// `getTradesByRange` and `getTradeHistory` are granted to nobody.
pub fn trade_contract_policy() -> Result<AccessPolicy, AccessError> {
    AccessPolicy::builder()
        .allow_any_role(INIT_ORGANIZATIONS, &[ops::INIT])
        .allow("ExporterOrgMSP", "exporter", &[ops::ACCEPT_TRADE])
        .allow("ExporterOrgMSP", "exporter", READ_OPERATIONS)
        .allow("ImporterOrgMSP", "importer", &[ops::REQUEST_TRADE])
        .allow("ImporterOrgMSP", "importer", READ_OPERATIONS)
        .allow("ExporterOrgMSP", "exporter_banker", READ_OPERATIONS)
        .allow("ImporterOrgMSP", "importer_banker", READ_OPERATIONS)
        .allow("RegulatorOrgMSP", "regulator", READ_OPERATIONS)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        let policy = trade_contract_policy().unwrap();
        assert_eq!(policy.len(), 8);
        assert!(policy.check_access("RegulatorOrgMSP", None, "init").is_ok());
        assert!(policy.check_access("RegulatorOrgMSP", Some("regulator"), "listTrade").is_ok());
        assert!(policy.check_access("ExporterOrgMSP", Some("exporter"), "acceptTrade").is_ok());
        assert!(policy.check_access("ImporterOrgMSP", Some("importer"), "requestTrade").is_ok());
    }

    #[test]
    fn test_bankers_are_read_only() {
        let policy = trade_contract_policy().unwrap();
        for (msp, role) in [("ExporterOrgMSP", "exporter_banker"), ("ImporterOrgMSP", "importer_banker")] {
            for op in READ_OPERATIONS {
                assert!(policy.check_access(msp, Some(role), op).is_ok());
            }
            assert!(policy.check_access(msp, Some(role), "acceptTrade").is_err());
            assert!(policy.check_access(msp, Some(role), "requestTrade").is_err());
        }
    }

    #[test]
    fn test_range_and_history_are_not_granted() {
        let policy = trade_contract_policy().unwrap();
        for (subject, ops) in policy.rules() {
            assert!(!ops.contains("getTradesByRange"), "{subject}");
            assert!(!ops.contains("getTradeHistory"), "{subject}");
        }
    }
}
