//! # tfc-trade — Trade Agreements
//!
//! [`TradeContract`] records trade agreements between an importer and an
//! exporter and moves them from `REQUESTED` to `ACCEPTED`. Every invocation
//! passes the contract's [`AccessPolicy`](tfc_acl::AccessPolicy) first; the
//! built-in table is [`trade_contract_policy()`].

pub mod agreement;
pub mod contract;
pub mod policy;

pub use agreement::{TradeAgreement, TradeAgreementHistory, TradeAgreementStatus, TradeStatus};
pub use contract::{ops, TradeContract};
pub use policy::trade_contract_policy;
