//! Built-in access table of the shipment contract.

use tfc_acl::AccessPolicy;
use tfc_core::AccessError;

use crate::contract::ops;

/// Organizations whose callers may run `init` without a business role.
pub const INIT_ORGANIZATIONS: &[&str] = &["ExporterOrgMSP", "ImporterOrgMSP", "CarrierOrgMSP"];

const READ_OPERATIONS: &[&str] = &[ops::GET_SHIPMENT_LOCATION, ops::GET_BILL_OF_LADING];

/// The default `ShipmentContract` policy.
///
/// Exporters prepare, carriers accept and move, everyone involved reads.
pub fn shipment_contract_policy() -> Result<AccessPolicy, AccessError> {
    AccessPolicy::builder()
        .allow_any_role(INIT_ORGANIZATIONS, &[ops::INIT])
        .allow("ExporterOrgMSP", "exporter", &[ops::PREPARE_SHIPMENT])
        .allow("ExporterOrgMSP", "exporter", READ_OPERATIONS)
        .allow("ImporterOrgMSP", "importer", READ_OPERATIONS)
        .allow(
            "CarrierOrgMSP",
            "carrier",
            &[ops::ACCEPT_SHIPMENT_AND_ISSUE_BL, ops::UPDATE_SHIPMENT_LOCATION],
        )
        .allow("CarrierOrgMSP", "carrier", READ_OPERATIONS)
        .allow("ExporterOrgMSP", "exporter_banker", READ_OPERATIONS)
        .allow("ImporterOrgMSP", "importer_banker", READ_OPERATIONS)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfc_acl::AclSubject;

    #[test]
    fn test_table() {
        let policy = shipment_contract_policy().unwrap();
        assert_eq!(policy.len(), 8);
        let carrier = policy
            .operations_for(&AclSubject::new("CarrierOrgMSP", "carrier"))
            .unwrap();
        assert_eq!(carrier.len(), 4);
        assert!(policy.check_access("CarrierOrgMSP", None, "init").is_ok());
        assert!(policy
            .check_access("ImporterOrgMSP", Some("importer"), "prepareShipment")
            .is_err());
        assert!(policy
            .check_access("RegulatorOrgMSP", Some("regulator"), "getBillOfLading")
            .is_err());
    }
}
