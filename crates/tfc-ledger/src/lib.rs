//! # tfc-ledger — The Ledger Capability
//!
//! Contracts never touch a state store directly. Each invocation receives a
//! [`LedgerContext`]: the caller's identity, the invoked function and its
//! parameters, and keyed access to the world state through point reads,
//! buffered writes, range scans, rich queries and per-key history.
//!
//! ## Modules
//!
//! - [`context`]: the `LedgerContext` trait and the records its queries yield.
//! - [`cursor`]: release-on-drop result cursors.
//! - [`key`]: composite key encoding.
//! - [`contract`]: the `Contract` trait that routes an invocation to a typed
//!   operation after the access-control pre-hook.
//! - [`memory`]: `MemoryLedger`, an in-process ledger with transactional
//!   commit, used by tests and the CLI.

pub mod context;
pub mod contract;
pub mod cursor;
pub mod key;
pub mod memory;

pub use context::{KeyModification, KeyValue, LedgerContext};
pub use contract::{payload, Args, Contract, ContractInfo};
pub use cursor::{Cursor, CursorSource, VecSource};
pub use key::{composite_key, is_composite_key, split_composite_key};
pub use memory::{MemoryLedger, Revision, Transaction};
