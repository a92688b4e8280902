//! # Ledger Context
//!
//! The capability a contract receives for one invocation: who is calling,
//! what they invoked, and read/write access to the world state.
//!
//! ## Consistency Model
//!
//! An invocation executes sequentially against a consistent snapshot.
//! Writes are buffered by the platform and applied only if the invocation
//! succeeds; reads observe committed state, not the invocation's own pending
//! writes. Conflicting concurrent invocations are serialized at commit by
//! read-set validation, so a check-then-act sequence (read a key, then write
//! it) needs no locking inside the contract.

use serde::{Deserialize, Serialize};

use tfc_core::{LedgerError, LedgerTimestamp};

use crate::cursor::Cursor;
use crate::key;

/// One entry of a range or rich query result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// The state key.
    pub key: String,
    /// The stored value.
    pub value: Vec<u8>,
}

/// One revision of a key, as reported by a history query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyModification {
    /// Transaction that produced the revision.
    pub tx_id: String,
    /// Commit timestamp of that transaction.
    pub timestamp: LedgerTimestamp,
    /// Whether the revision deleted the key.
    pub is_delete: bool,
    /// The value written, absent for deletions.
    pub value: Option<Vec<u8>>,
}

/// Per-invocation access to identity, invocation metadata and world state.
pub trait LedgerContext {
    /// Organization (MSP id) of the caller.
    fn caller_msp_id(&self) -> &str;

    /// A certificate attribute of the caller.
    fn caller_attribute(&self, name: &str) -> Option<&str>;

    /// Name of the invoked function.
    fn function_name(&self) -> &str;

    /// String parameters of the invocation.
    fn parameters(&self) -> &[String];

    /// Identifier of the enclosing transaction.
    fn tx_id(&self) -> &str;

    /// Read a committed value. `None` when the key has never been written
    /// or was deleted.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Buffer a write, applied when the invocation commits.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Build a key in the composite namespace.
    fn create_composite_key(
        &self,
        object_type: &str,
        attributes: &[&str],
    ) -> Result<String, LedgerError> {
        key::composite_key(object_type, attributes)
    }

    /// Run a rich (JSON selector) query over stored documents.
    fn query_rich(&self, query: &str) -> Result<Cursor<'_, KeyValue>, LedgerError>;

    /// Scan simple keys in `[start_key, end_key)`, in key order. An empty
    /// `end_key` leaves the range unbounded above.
    fn query_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Cursor<'_, KeyValue>, LedgerError>;

    /// Every committed revision of a key, oldest first.
    fn query_history(&self, key: &str) -> Result<Cursor<'_, KeyModification>, LedgerError>;
}
