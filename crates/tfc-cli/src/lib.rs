//! # tfc — Trade Finance Chaincode CLI
//!
//! Runs the contracts in-process against a [`MemoryLedger`] persisted as a
//! JSON snapshot, one ledger per contract.
//!
//! ## Subcommands
//!
//! - `tfc invoke`: run one operation as a given organization and role.
//! - `tfc scenario`: replay a YAML file of steps and check their outcomes.
//! - `tfc policy`: print the effective access table of a contract.
//!
//! ```bash
//! tfc invoke trade requestTrade 1003 ExporterOrgMSP Pears 1000 --msp ImporterOrgMSP --role importer
//! tfc invoke trade getTradeStatus 1003 --msp ExporterOrgMSP --role exporter
//! tfc scenario demos/trade-and-shipment.yaml
//! tfc policy shipment --format json
//! ```
//!
//! [`MemoryLedger`]: tfc_ledger::MemoryLedger

pub mod config;
pub mod invoke;
pub mod policy;
pub mod registry;
pub mod scenario;
pub mod store;

use tfc_core::CallerIdentity;

/// Build the caller identity from command-line style parts.
///
/// `attributes` are `name=value` pairs; entries without `=` are ignored.
pub fn caller_identity(msp_id: &str, role: Option<&str>, attributes: &[String]) -> CallerIdentity {
    let mut caller = match role {
        Some(role) => CallerIdentity::with_role(msp_id, role),
        None => CallerIdentity::new(msp_id),
    };
    for attr in attributes {
        match attr.split_once('=') {
            Some((name, value)) => caller = caller.with_attribute(name, value),
            None => tracing::warn!(attribute = %attr, "ignoring attribute without '='"),
        }
    }
    caller
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_with_role_and_attributes() {
        let caller = caller_identity(
            "CarrierOrgMSP",
            Some("carrier"),
            &["region=EU".to_string(), "bogus".to_string()],
        );
        assert_eq!(caller.business_role(), Some("carrier"));
        assert_eq!(caller.attribute("region"), Some("EU"));
        assert_eq!(caller.attributes.len(), 2);
    }

    #[test]
    fn caller_without_role() {
        let caller = caller_identity("RegulatorOrgMSP", None, &[]);
        assert_eq!(caller.business_role(), None);
    }
}
