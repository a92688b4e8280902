//! # tfc-shipment — Goods Shipment
//!
//! [`ShipmentContract`] tracks a trade's goods from preparation by the
//! exporter, through acceptance by the carrier (which issues the
//! [`BillOfLading`]), to arrival at the destination.
//!
//! All records live under composite keys, so they never appear in plain
//! range scans of the same ledger.

pub mod contract;
pub mod policy;
pub mod records;

pub use contract::{ops, BillOfLadingRequest, ShipmentContract, ShipmentRequest};
pub use policy::shipment_contract_policy;
pub use records::{BillOfLading, Location, Shipment, ShipmentLocation};
