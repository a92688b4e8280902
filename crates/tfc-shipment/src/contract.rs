//! # ShipmentContract
//!
//! ```text
//! ShipmentLocation  [absent] --prepareShipment--> SOURCE --updateShipmentLocation--> DESTINATION
//! Shipment          [absent] --prepareShipment--> stored, immutable
//! BillOfLading      [absent] --acceptShipmentAndIssueBL (at SOURCE)--> stored
//! ```
//!
//! The exporter prepares a shipment, which writes its location and the
//! shipment record in one invocation. The carrier named on the shipment
//! accepts it while it is still at its source and issues the bill of lading.

use serde::de::DeserializeOwned;

use tfc_acl::AccessPolicy;
use tfc_core::{AccessError, Amount, ContractError, MissingRecord};
use tfc_ledger::{payload, Args, Contract, ContractInfo, LedgerContext};

use crate::policy::shipment_contract_policy;
use crate::records::{BillOfLading, Location, Shipment, ShipmentLocation};

/// Function names, as invoked by clients.
pub mod ops {
    pub const INIT: &str = "init";
    pub const PREPARE_SHIPMENT: &str = "prepareShipment";
    pub const ACCEPT_SHIPMENT_AND_ISSUE_BL: &str = "acceptShipmentAndIssueBL";
    pub const UPDATE_SHIPMENT_LOCATION: &str = "updateShipmentLocation";
    pub const GET_SHIPMENT_LOCATION: &str = "getShipmentLocation";
    pub const GET_BILL_OF_LADING: &str = "getBillOfLading";

    pub const ALL: &[&str] = &[
        INIT,
        PREPARE_SHIPMENT,
        ACCEPT_SHIPMENT_AND_ISSUE_BL,
        UPDATE_SHIPMENT_LOCATION,
        GET_SHIPMENT_LOCATION,
        GET_BILL_OF_LADING,
    ];
}

const SHIPMENT_PREFIX: &str = "Shipment";
const LOCATION_TAG: &str = "Location";
const BILL_OF_LADING_PREFIX: &str = "BillOfLading";

/// Parameters of `prepareShipment` beyond the trade id.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentRequest<'a> {
    pub carrier_msp: &'a str,
    pub description_of_goods: &'a str,
    pub amount: Amount,
    pub beneficiary: &'a str,
}

/// Parameters of `acceptShipmentAndIssueBL` beyond the trade id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillOfLadingRequest<'a> {
    pub bl_id: &'a str,
    pub expiration_date: &'a str,
    pub source_port: &'a str,
    pub destination_port: &'a str,
}

/// The goods shipment contract.
#[derive(Debug, Clone)]
pub struct ShipmentContract {
    policy: AccessPolicy,
}

impl ShipmentContract {
    pub const NAME: &'static str = "ShipmentContract";

    /// A contract gated by [`shipment_contract_policy()`].
    pub fn new() -> Result<Self, AccessError> {
        Ok(Self::with_policy(shipment_contract_policy()?))
    }

    /// A contract gated by a custom policy.
    pub fn with_policy(policy: AccessPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    // ─── Operations ──────────────────────────────────────────────────

    pub fn init(&self) {
        tracing::info!("Initializing the shipment contract");
    }

    /// Record a new shipment at `SOURCE`, with the caller as exporter.
    pub fn prepare_shipment(
        &self,
        ctx: &mut dyn LedgerContext,
        trade_id: &str,
        request: ShipmentRequest<'_>,
    ) -> Result<(), ContractError> {
        match self.get_shipment_location(ctx, trade_id) {
            Ok(current) => {
                return Err(match current.location {
                    Location::Source => ContractError::AlreadyPrepared(trade_id.to_string()),
                    Location::Destination => ContractError::PastPreparationStage(trade_id.to_string()),
                });
            }
            Err(ContractError::NotFound(MissingRecord::ShipmentLocation(_))) => {}
            Err(e) => return Err(e),
        }

        let location = ShipmentLocation {
            location: Location::Source,
        };
        let shipment = Shipment {
            carrier_msp: request.carrier_msp.to_string(),
            exporter_msp: ctx.caller_msp_id().to_string(),
            description_of_goods: request.description_of_goods.to_string(),
            amount: request.amount,
            beneficiary: request.beneficiary.to_string(),
        };
        let location_key = location_key(ctx, trade_id)?;
        ctx.put_state(&location_key, serde_json::to_vec(&location)?)?;
        let shipment_key = shipment_key(ctx, trade_id)?;
        ctx.put_state(&shipment_key, serde_json::to_vec(&shipment)?)?;

        tracing::info!(trade_id, carrier = request.carrier_msp, "shipment prepared");
        Ok(())
    }

    /// Accept a prepared shipment as its carrier and issue the bill of lading.
    ///
    /// Checks run in order: the location must exist, must still be
    /// `SOURCE`, the shipment record must exist, and the caller must be the
    /// carrier it names. A second acceptance at `SOURCE` reissues the bill.
    pub fn accept_shipment_and_issue_bl(
        &self,
        ctx: &mut dyn LedgerContext,
        trade_id: &str,
        request: BillOfLadingRequest<'_>,
    ) -> Result<(), ContractError> {
        let current = self.get_shipment_location(ctx, trade_id)?;
        if current.location != Location::Source {
            return Err(ContractError::PastPreparationStage(trade_id.to_string()));
        }

        let shipment = self.get_shipment(ctx, trade_id)?;
        if shipment.carrier_msp != ctx.caller_msp_id() {
            return Err(ContractError::WrongCarrier {
                carrier: shipment.carrier_msp,
                caller: ctx.caller_msp_id().to_string(),
            });
        }

        let bill = BillOfLading {
            id: request.bl_id.to_string(),
            expiration_date: request.expiration_date.to_string(),
            exporter_msp: shipment.exporter_msp,
            carrier_msp: shipment.carrier_msp,
            description_of_goods: shipment.description_of_goods,
            amount: shipment.amount,
            beneficiary: shipment.beneficiary,
            source_port: request.source_port.to_string(),
            destination_port: request.destination_port.to_string(),
        };
        let key = bill_of_lading_key(ctx, trade_id)?;
        ctx.put_state(&key, serde_json::to_vec(&bill)?)?;

        tracing::info!(trade_id, bl_id = request.bl_id, "bill of lading issued");
        Ok(())
    }

    /// Move a shipment to `location`, given as `SOURCE` or `DESTINATION`.
    pub fn update_shipment_location(
        &self,
        ctx: &mut dyn LedgerContext,
        trade_id: &str,
        location: &str,
    ) -> Result<(), ContractError> {
        let target: Location = location.parse()?;
        let mut current = self.get_shipment_location(ctx, trade_id)?;
        if current.location == target {
            return Err(ContractError::NoOpTransition {
                trade_id: trade_id.to_string(),
                location: target.to_string(),
            });
        }

        current.location = target;
        let key = location_key(ctx, trade_id)?;
        ctx.put_state(&key, serde_json::to_vec(&current)?)?;

        tracing::info!(trade_id, location = %target, "shipment location updated");
        Ok(())
    }

    pub fn get_shipment_location(
        &self,
        ctx: &dyn LedgerContext,
        trade_id: &str,
    ) -> Result<ShipmentLocation, ContractError> {
        let key = location_key(ctx, trade_id)?;
        load(ctx, &key)?
            .ok_or_else(|| ContractError::NotFound(MissingRecord::ShipmentLocation(trade_id.to_string())))
    }

    pub fn get_bill_of_lading(
        &self,
        ctx: &dyn LedgerContext,
        trade_id: &str,
    ) -> Result<BillOfLading, ContractError> {
        let key = bill_of_lading_key(ctx, trade_id)?;
        load(ctx, &key)?
            .ok_or_else(|| ContractError::NotFound(MissingRecord::BillOfLading(trade_id.to_string())))
    }

    fn get_shipment(&self, ctx: &dyn LedgerContext, trade_id: &str) -> Result<Shipment, ContractError> {
        let key = shipment_key(ctx, trade_id)?;
        load(ctx, &key)?.ok_or_else(|| ContractError::NotPrepared(trade_id.to_string()))
    }
}

impl Contract for ShipmentContract {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn info(&self) -> ContractInfo {
        ContractInfo {
            title: Self::NAME,
            description: "Goods Shipment SmartContract",
        }
    }

    fn operations(&self) -> &'static [&'static str] {
        ops::ALL
    }

    fn before_transaction(&self, ctx: &dyn LedgerContext) -> Result<(), ContractError> {
        Ok(self.policy.check_caller(ctx)?)
    }

    fn dispatch(
        &self,
        ctx: &mut dyn LedgerContext,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, ContractError> {
        match function {
            ops::INIT => {
                Args::exact(args, 0)?;
                self.init();
                Ok(payload::empty())
            }
            ops::PREPARE_SHIPMENT => {
                let a = Args::exact(args, 5)?;
                let request = ShipmentRequest {
                    carrier_msp: a.text(1),
                    description_of_goods: a.text(2),
                    amount: a.amount(3, "amount")?,
                    beneficiary: a.text(4),
                };
                self.prepare_shipment(ctx, a.text(0), request)?;
                Ok(payload::empty())
            }
            ops::ACCEPT_SHIPMENT_AND_ISSUE_BL => {
                let a = Args::exact(args, 5)?;
                let request = BillOfLadingRequest {
                    bl_id: a.text(1),
                    expiration_date: a.text(2),
                    source_port: a.text(3),
                    destination_port: a.text(4),
                };
                self.accept_shipment_and_issue_bl(ctx, a.text(0), request)?;
                Ok(payload::empty())
            }
            ops::UPDATE_SHIPMENT_LOCATION => {
                let a = Args::exact(args, 2)?;
                self.update_shipment_location(ctx, a.text(0), a.text(1))?;
                Ok(payload::empty())
            }
            ops::GET_SHIPMENT_LOCATION => {
                let a = Args::exact(args, 1)?;
                payload::json(&self.get_shipment_location(ctx, a.text(0))?)
            }
            ops::GET_BILL_OF_LADING => {
                let a = Args::exact(args, 1)?;
                payload::json(&self.get_bill_of_lading(ctx, a.text(0))?)
            }
            other => Err(ContractError::UnknownTransaction(other.to_string())),
        }
    }
}

// ─── Keys & Storage ──────────────────────────────────────────────────

fn location_key(ctx: &dyn LedgerContext, trade_id: &str) -> Result<String, ContractError> {
    Ok(ctx.create_composite_key(SHIPMENT_PREFIX, &[LOCATION_TAG, trade_id])?)
}

fn shipment_key(ctx: &dyn LedgerContext, trade_id: &str) -> Result<String, ContractError> {
    Ok(ctx.create_composite_key(SHIPMENT_PREFIX, &[trade_id])?)
}

fn bill_of_lading_key(ctx: &dyn LedgerContext, trade_id: &str) -> Result<String, ContractError> {
    Ok(ctx.create_composite_key(BILL_OF_LADING_PREFIX, &[trade_id])?)
}

/// Read and decode a record; absent and empty values are both `None`.
fn load<T: DeserializeOwned>(ctx: &dyn LedgerContext, key: &str) -> Result<Option<T>, ContractError> {
    match ctx.get_state(key)? {
        Some(bytes) if !bytes.is_empty() => Ok(Some(serde_json::from_slice(&bytes)?)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfc_core::{CallerIdentity, ErrorKind};
    use tfc_ledger::{composite_key, MemoryLedger};

    fn apples() -> ShipmentRequest<'static> {
        ShipmentRequest {
            carrier_msp: "CarrierOrg",
            description_of_goods: "Apples",
            amount: Amount::from(1000),
            beneficiary: "ImportersBank",
        }
    }

    fn bill() -> BillOfLadingRequest<'static> {
        BillOfLadingRequest {
            bl_id: "bl-1003",
            expiration_date: "2026-12-31",
            source_port: "Rotterdam",
            destination_port: "Mumbai",
        }
    }

    fn key(object_type: &str, attrs: &[&str]) -> String {
        composite_key(object_type, attrs).unwrap()
    }

    fn seed_prepared(ledger: &mut MemoryLedger, trade_id: &str, location: &str) {
        ledger.seed(
            key("Shipment", &["Location", trade_id]),
            format!(r#"{{"Location":"{location}"}}"#),
        );
        ledger.seed(
            key("Shipment", &[trade_id]),
            r#"{"carrierMSP":"CarrierOrg","exporterMSP":"ExporterOrg","descriptionOfGoods":"Apples","amount":1000,"beneficiary":"ImportersBank"}"#,
        );
    }

    #[test]
    fn test_prepare_writes_location_and_shipment() {
        let contract = ShipmentContract::new().unwrap();
        let mut ledger = MemoryLedger::new();
        let mut tx = ledger.begin(CallerIdentity::new("ExporterOrg"), "prepareShipment", vec![]);
        contract.prepare_shipment(&mut tx, "1003", apples()).unwrap();
        let writes: Vec<(String, String)> = tx
            .pending_writes()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        tx.commit();

        let location_key = key("Shipment", &["Location", "1003"]);
        let shipment_key = key("Shipment", &["1003"]);
        assert!(writes.contains(&(location_key.clone(), r#"{"Location":"SOURCE"}"#.to_string())));
        assert!(writes.contains(&(
            shipment_key.clone(),
            r#"{"carrierMSP":"CarrierOrg","exporterMSP":"ExporterOrg","descriptionOfGoods":"Apples","amount":1000,"beneficiary":"ImportersBank"}"#.to_string()
        )));
        assert_eq!(writes.len(), 2);
    }

    #[test]
    fn test_prepare_twice() {
        let contract = ShipmentContract::new().unwrap();
        let mut ledger = MemoryLedger::new();
        seed_prepared(&mut ledger, "1003", "SOURCE");
        seed_prepared(&mut ledger, "1004", "DESTINATION");
        let mut tx = ledger.begin(CallerIdentity::new("ExporterOrg"), "prepareShipment", vec![]);
        assert_eq!(
            contract.prepare_shipment(&mut tx, "1003", apples()).unwrap_err().to_string(),
            "Shipment for trade 1003 has already been prepared"
        );
        assert_eq!(
            contract.prepare_shipment(&mut tx, "1004", apples()).unwrap_err().to_string(),
            "Shipment for trade 1004 has passed the preparation stage"
        );
        assert_eq!(tx.pending_writes().count(), 0);
    }

    #[test]
    fn test_prepare_propagates_corrupt_location() {
        let contract = ShipmentContract::new().unwrap();
        let mut ledger = MemoryLedger::new();
        ledger.seed(key("Shipment", &["Location", "1003"]), "{not json");
        let mut tx = ledger.begin(CallerIdentity::new("ExporterOrg"), "prepareShipment", vec![]);
        let err = contract.prepare_shipment(&mut tx, "1003", apples()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
    }

    #[test]
    fn test_accept_precedence() {
        let contract = ShipmentContract::new().unwrap();
        let mut ledger = MemoryLedger::new();
        seed_prepared(&mut ledger, "moved", "DESTINATION");
        ledger.seed(key("Shipment", &["Location", "orphan"]), r#"{"Location":"SOURCE"}"#);
        seed_prepared(&mut ledger, "ready", "SOURCE");

        let mut tx = ledger.begin(CallerIdentity::new("OtherCarrier"), "acceptShipmentAndIssueBL", vec![]);
        let kind = |r: Result<(), ContractError>| r.unwrap_err().kind();
        assert_eq!(kind(contract.accept_shipment_and_issue_bl(&mut tx, "none", bill())), ErrorKind::NotFound);
        assert_eq!(
            kind(contract.accept_shipment_and_issue_bl(&mut tx, "moved", bill())),
            ErrorKind::PastPreparationStage
        );
        assert_eq!(kind(contract.accept_shipment_and_issue_bl(&mut tx, "orphan", bill())), ErrorKind::NotPrepared);
        assert_eq!(kind(contract.accept_shipment_and_issue_bl(&mut tx, "ready", bill())), ErrorKind::WrongCarrier);
    }

    #[test]
    fn test_accept_issues_bill() {
        let contract = ShipmentContract::new().unwrap();
        let mut ledger = MemoryLedger::new();
        seed_prepared(&mut ledger, "1003", "SOURCE");
        let mut tx = ledger.begin(CallerIdentity::new("CarrierOrg"), "acceptShipmentAndIssueBL", vec![]);
        contract.accept_shipment_and_issue_bl(&mut tx, "1003", bill()).unwrap();
        tx.commit();

        let tx = ledger.begin(CallerIdentity::new("ImporterOrg"), "getBillOfLading", vec![]);
        let bl = contract.get_bill_of_lading(&tx, "1003").unwrap();
        assert_eq!(bl.id, "bl-1003");
        assert_eq!(bl.exporter_msp, "ExporterOrg");
        assert_eq!(bl.carrier_msp, "CarrierOrg");
        assert_eq!(bl.amount, Amount::from(1000));
        assert_eq!(bl.destination_port, "Mumbai");
    }

    #[test]
    fn test_update_location() {
        let contract = ShipmentContract::new().unwrap();
        let mut ledger = MemoryLedger::new();
        seed_prepared(&mut ledger, "1003", "SOURCE");
        let mut tx = ledger.begin(CallerIdentity::new("CarrierOrg"), "updateShipmentLocation", vec![]);

        assert_eq!(
            contract.update_shipment_location(&mut tx, "9999", "in transit").unwrap_err().to_string(),
            "Invalid value of location - must be SOURCE or DESTINATION"
        );
        assert_eq!(
            contract.update_shipment_location(&mut tx, "9999", "DESTINATION").unwrap_err().to_string(),
            "Shipment location for trade 9999 has not been found"
        );
        assert_eq!(
            contract.update_shipment_location(&mut tx, "1003", "SOURCE").unwrap_err().to_string(),
            "Shipment location for trade 1003 is already in location SOURCE"
        );
        contract.update_shipment_location(&mut tx, "1003", "DESTINATION").unwrap();
        tx.commit();
        assert_eq!(
            ledger.get(&key("Shipment", &["Location", "1003"])),
            Some(r#"{"Location":"DESTINATION"}"#)
        );
    }

    #[test]
    fn test_empty_records_are_missing() {
        let contract = ShipmentContract::new().unwrap();
        let mut ledger = MemoryLedger::new();
        ledger.seed(key("BillOfLading", &["1003"]), "");
        let tx = ledger.begin(CallerIdentity::new("ImporterOrg"), "getBillOfLading", vec![]);
        assert_eq!(
            contract.get_bill_of_lading(&tx, "1003").unwrap_err().to_string(),
            "Bill of lading for trade 1003 has not been found"
        );
    }
}
