//! # TradeContract
//!
//! An importer requests a trade from an exporter; the exporter accepts it.
//! Agreements are keyed by trade id verbatim and never deleted.
//!
//! ## Operations
//!
//! | Function | Kind | Parameters |
//! |---|---|---|
//! | `init` | write | none |
//! | `exists` | read | `tradeId` |
//! | `requestTrade` | write | `tradeId, exporterMSP, descriptionOfGoods, amount` |
//! | `acceptTrade` | write | `tradeId` |
//! | `getTrade` | read | `tradeId` |
//! | `getTradeStatus` | read | `tradeId` |
//! | `listTrade` | read | none |
//! | `getTradesByRange` | read | `fromTradeId, toTradeId` |
//! | `getTradeHistory` | read | `tradeId` |

use std::collections::HashSet;

use serde::de::DeserializeOwned;

use tfc_acl::AccessPolicy;
use tfc_core::{AccessError, Amount, ContractError, MissingRecord};
use tfc_ledger::{payload, Args, Contract, ContractInfo, Cursor, KeyValue, LedgerContext};

use crate::agreement::{TradeAgreement, TradeAgreementHistory, TradeAgreementStatus, TradeStatus};
use crate::policy::trade_contract_policy;

/// Function names, as invoked by clients.
pub mod ops {
    pub const INIT: &str = "init";
    pub const EXISTS: &str = "exists";
    pub const REQUEST_TRADE: &str = "requestTrade";
    pub const ACCEPT_TRADE: &str = "acceptTrade";
    pub const GET_TRADE: &str = "getTrade";
    pub const GET_TRADE_STATUS: &str = "getTradeStatus";
    pub const LIST_TRADE: &str = "listTrade";
    pub const GET_TRADES_BY_RANGE: &str = "getTradesByRange";
    pub const GET_TRADE_HISTORY: &str = "getTradeHistory";

    pub const ALL: &[&str] = &[
        INIT,
        EXISTS,
        REQUEST_TRADE,
        ACCEPT_TRADE,
        GET_TRADE,
        GET_TRADE_STATUS,
        LIST_TRADE,
        GET_TRADES_BY_RANGE,
        GET_TRADE_HISTORY,
    ];
}

const EXPORTER_INDEX: [&str; 2] = ["_design/exporterIndexDoc", "exporterIndex"];
const IMPORTER_INDEX: [&str; 2] = ["_design/importerIndexDoc", "importerIndex"];

/// The trade agreement contract.
#[derive(Debug, Clone)]
pub struct TradeContract {
    policy: AccessPolicy,
}

impl TradeContract {
    pub const NAME: &'static str = "TradeContract";

    /// A contract gated by [`trade_contract_policy()`].
    pub fn new() -> Result<Self, AccessError> {
        Ok(Self::with_policy(trade_contract_policy()?))
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
        tracing::info!("Initializing the trade contract");
    }

    /// Whether a non-empty record is stored under `trade_id`.
    pub fn exists(&self, ctx: &dyn LedgerContext, trade_id: &str) -> Result<bool, ContractError> {
        Ok(ctx.get_state(trade_id)?.is_some_and(|v| !v.is_empty()))
    }

    /// Record a new agreement with the caller as importer.
    pub fn request_trade(
        &self,
        ctx: &mut dyn LedgerContext,
        trade_id: &str,
        exporter_msp: &str,
        description_of_goods: &str,
        amount: Amount,
    ) -> Result<(), ContractError> {
        if self.exists(ctx, trade_id)? {
            return Err(ContractError::AlreadyExists(trade_id.to_string()));
        }
        let trade = TradeAgreement {
            trade_id: trade_id.to_string(),
            exporter_msp: exporter_msp.to_string(),
            importer_msp: ctx.caller_msp_id().to_string(),
            description_of_goods: description_of_goods.to_string(),
            amount,
            status: TradeStatus::Requested,
        };
        ctx.put_state(trade_id, serde_json::to_vec(&trade)?)?;
        tracing::info!(trade_id, importer = %trade.importer_msp, exporter = exporter_msp, "trade requested");
        Ok(())
    }

    /// Move a requested agreement to `ACCEPTED`.
    ///
    /// Any caller the policy admits may accept; the exporter named on the
    /// agreement is not consulted.
    pub fn accept_trade(&self, ctx: &mut dyn LedgerContext, trade_id: &str) -> Result<(), ContractError> {
        let mut trade = self.get_trade(ctx, trade_id)?;
        if trade.status != TradeStatus::Requested {
            return Err(ContractError::InvalidState {
                trade_id: trade_id.to_string(),
                expected: TradeStatus::Requested.to_string(),
                actual: trade.status.to_string(),
            });
        }
        trade.status = TradeStatus::Accepted;
        ctx.put_state(trade_id, serde_json::to_vec(&trade)?)?;
        tracing::info!(trade_id, "trade accepted");
        Ok(())
    }

    pub fn get_trade(&self, ctx: &dyn LedgerContext, trade_id: &str) -> Result<TradeAgreement, ContractError> {
        match ctx.get_state(trade_id)? {
            Some(bytes) if !bytes.is_empty() => decode(&bytes),
            _ => Err(ContractError::NotFound(MissingRecord::Trade(trade_id.to_string()))),
        }
    }

    pub fn get_trade_status(
        &self,
        ctx: &dyn LedgerContext,
        trade_id: &str,
    ) -> Result<TradeAgreementStatus, ContractError> {
        let trade = self.get_trade(ctx, trade_id)?;
        Ok(TradeAgreementStatus { status: trade.status })
    }

    /// Agreements where the caller is exporter or importer.
    ///
    /// Exporter matches come first. A record matched by both queries is
    /// returned once, at its first position.
    pub fn list_trade(&self, ctx: &dyn LedgerContext) -> Result<Vec<TradeAgreement>, ContractError> {
        let caller = ctx.caller_msp_id();
        let as_exporter = drain(ctx.query_rich(&participant_query("exporterMSP", caller, EXPORTER_INDEX)?)?)?;
        let as_importer = drain(ctx.query_rich(&participant_query("importerMSP", caller, IMPORTER_INDEX)?)?)?;

        let mut seen = HashSet::new();
        let mut trades = Vec::with_capacity(as_exporter.len() + as_importer.len());
        for trade in as_exporter.into_iter().chain(as_importer) {
            if seen.insert(serde_json::to_string(&trade)?) {
                trades.push(trade);
            }
        }
        tracing::debug!(caller, count = trades.len(), "listed trades");
        Ok(trades)
    }

    /// Agreements with ids in `[from_trade_id, to_trade_id)`, in key order.
    pub fn get_trades_by_range(
        &self,
        ctx: &dyn LedgerContext,
        from_trade_id: &str,
        to_trade_id: &str,
    ) -> Result<Vec<TradeAgreement>, ContractError> {
        drain(ctx.query_range(from_trade_id, to_trade_id)?)
    }

    /// Every revision of an agreement, oldest first.
    pub fn get_trade_history(
        &self,
        ctx: &dyn LedgerContext,
        trade_id: &str,
    ) -> Result<Vec<TradeAgreementHistory>, ContractError> {
        let mut cursor = ctx.query_history(trade_id)?;
        let collected: Result<Vec<_>, ContractError> = cursor
            .by_ref()
            .map(|item| -> Result<TradeAgreementHistory, ContractError> {
                let m = item?;
                let trade_agreement = match m.value {
                    Some(v) if !m.is_delete && !v.is_empty() => Some(decode(&v)?),
                    _ => None,
                };
                Ok(TradeAgreementHistory {
                    tx_id: m.tx_id,
                    timestamp: m.timestamp.to_string(),
                    is_delete: m.is_delete,
                    trade_agreement,
                })
            })
            .collect();
        let closed = cursor.close();
        let history = collected?;
        closed?;
        Ok(history)
    }
}

impl Contract for TradeContract {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn info(&self) -> ContractInfo {
        ContractInfo {
            title: Self::NAME,
            description: "TradeAgreement SmartContract",
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
            ops::EXISTS => {
                let a = Args::exact(args, 1)?;
                payload::json(&self.exists(ctx, a.text(0))?)
            }
            ops::REQUEST_TRADE => {
                let a = Args::exact(args, 4)?;
                let amount = a.amount(3, "amount")?;
                self.request_trade(ctx, a.text(0), a.text(1), a.text(2), amount)?;
                Ok(payload::empty())
            }
            ops::ACCEPT_TRADE => {
                let a = Args::exact(args, 1)?;
                self.accept_trade(ctx, a.text(0))?;
                Ok(payload::empty())
            }
            ops::GET_TRADE => {
                let a = Args::exact(args, 1)?;
                payload::json(&self.get_trade(ctx, a.text(0))?)
            }
            ops::GET_TRADE_STATUS => {
                let a = Args::exact(args, 1)?;
                payload::json(&self.get_trade_status(ctx, a.text(0))?)
            }
            ops::LIST_TRADE => {
                Args::exact(args, 0)?;
                payload::json(&self.list_trade(ctx)?)
            }
            ops::GET_TRADES_BY_RANGE => {
                let a = Args::exact(args, 2)?;
                payload::json(&self.get_trades_by_range(ctx, a.text(0), a.text(1))?)
            }
            ops::GET_TRADE_HISTORY => {
                let a = Args::exact(args, 1)?;
                payload::json(&self.get_trade_history(ctx, a.text(0))?)
            }
            other => Err(ContractError::UnknownTransaction(other.to_string())),
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ContractError> {
    Ok(serde_json::from_slice(bytes)?)
}

fn participant_query(field: &str, msp_id: &str, index: [&str; 2]) -> Result<String, ContractError> {
    let mut selector = serde_json::Map::new();
    selector.insert(field.to_string(), msp_id.into());
    Ok(serde_json::to_string(&serde_json::json!({
        "selector": selector,
        "use_index": index,
    }))?)
}

/// Decode every record of a query, releasing the cursor on all paths.
fn drain(mut cursor: Cursor<'_, KeyValue>) -> Result<Vec<TradeAgreement>, ContractError> {
    let collected: Result<Vec<_>, ContractError> = cursor
        .by_ref()
        .map(|item| -> Result<TradeAgreement, ContractError> { decode(&item?.value) })
        .collect();
    let closed = cursor.close();
    let trades = collected?;
    closed?;
    Ok(trades)
}
