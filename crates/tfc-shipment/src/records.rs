//! # Shipment Records
//!
//! Three records per trade, each under its own composite key:
//!
//! | Record | Key |
//! |---|---|
//! | [`ShipmentLocation`] | `("Shipment", ["Location", tradeId])` |
//! | [`Shipment`] | `("Shipment", [tradeId])` |
//! | [`BillOfLading`] | `("BillOfLading", [tradeId])` |

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use tfc_core::{Amount, ContractError};

/// Where the goods are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Location {
    Source,
    Destination,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "SOURCE",
            Self::Destination => "DESTINATION",
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = ContractError;

    /// Exact, case-sensitive match on `SOURCE` or `DESTINATION`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SOURCE" => Ok(Self::Source),
            "DESTINATION" => Ok(Self::Destination),
            other => Err(ContractError::InvalidLocation(other.to_string())),
        }
    }
}

/// Stored as `{"Location":"SOURCE"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentLocation {
    #[serde(rename = "Location")]
    pub location: Location,
}

/// Goods handed from an exporter to a carrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    #[serde(rename = "carrierMSP")]
    pub carrier_msp: String,
    #[serde(rename = "exporterMSP")]
    pub exporter_msp: String,
    pub description_of_goods: String,
    pub amount: Amount,
    pub beneficiary: String,
}

/// The carrier's receipt for a shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillOfLading {
    pub id: String,
    pub expiration_date: String,
    #[serde(rename = "exporterMSP")]
    pub exporter_msp: String,
    #[serde(rename = "carrierMSP")]
    pub carrier_msp: String,
    pub description_of_goods: String,
    pub amount: Amount,
    pub beneficiary: String,
    pub source_port: String,
    pub destination_port: String,
}
