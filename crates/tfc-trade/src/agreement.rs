//! # Trade Agreement Records
//!
//! Stored and returned JSON uses the field names and order shown below;
//! records written by other channel clients use the same layout.
//!
//! ```json
//! {"tradeID":"1003","exporterMSP":"ExporterOrg","importerMSP":"ImporterOrg",
//!  "descriptionOfGoods":"Pears","amount":1000,"status":"REQUESTED"}
//! ```

use serde::{Deserialize, Serialize};

use tfc_core::Amount;

/// Lifecycle status of a trade agreement.
///
/// The only transition is `REQUESTED → ACCEPTED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    Requested,
    Accepted,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "REQUESTED",
            Self::Accepted => "ACCEPTED",
        }
    }
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trade agreement between an importer and an exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeAgreement {
    #[serde(rename = "tradeID")]
    pub trade_id: String,
    #[serde(rename = "exporterMSP")]
    pub exporter_msp: String,
    #[serde(rename = "importerMSP")]
    pub importer_msp: String,
    #[serde(rename = "descriptionOfGoods")]
    pub description_of_goods: String,
    pub amount: Amount,
    pub status: TradeStatus,
}

/// Response of `getTradeStatus`: `{"Status":"REQUESTED"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeAgreementStatus {
    #[serde(rename = "Status")]
    pub status: TradeStatus,
}

/// One historical revision of a trade agreement.
///
/// `trade_agreement` is `None` for a revision that deleted the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeAgreementHistory {
    pub tx_id: String,
    /// Commit time, RFC 3339 UTC with millisecond precision.
    pub timestamp: String,
    /// A JSON boolean. Earlier deployments of this contract wrote the
    /// string `"true"`/`"false"` here.
    pub is_delete: bool,
    pub trade_agreement: Option<TradeAgreement>,
}
