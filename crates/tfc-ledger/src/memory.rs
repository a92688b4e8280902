//! # In-Memory Ledger
//!
//! A single-peer world state with per-key history, used by the test suites
//! and by the `tfc` CLI. It reproduces the parts of the platform the
//! contracts can observe:
//!
//! - **Atomic invocations.** [`MemoryLedger::begin()`] opens a
//!   [`Transaction`] that buffers writes. [`Transaction::commit()`] applies
//!   them together; dropping the transaction discards them.
//! - **Committed reads.** Reads inside a transaction see committed state
//!   only, never the transaction's own buffered writes.
//! - **History.** Every committed write appends a revision (tx id, commit
//!   timestamp, value) to the key's history.
//! - **Queries.** Range scans cover simple keys in key order; rich queries
//!   evaluate equality selectors over JSON documents.
//! - **Cursor accounting.** Open cursors are counted so callers can assert
//!   that every cursor was released.
//!
//! Values must be UTF-8, which keeps snapshots readable as plain JSON.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use tfc_core::{CallerIdentity, ContractError, LedgerError, LedgerTimestamp};

use crate::context::{KeyModification, KeyValue, LedgerContext};
use crate::contract::Contract;
use crate::cursor::{Cursor, CursorSource};
use crate::key::is_composite_key;

// ─── Stored Revisions ────────────────────────────────────────────────

/// One committed revision of a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    /// Transaction that committed the revision.
    pub tx_id: String,
    /// Commit timestamp.
    pub timestamp: LedgerTimestamp,
    /// Whether the revision deleted the key.
    pub is_delete: bool,
    /// The value written, absent for deletions.
    pub value: Option<String>,
}

impl From<&Revision> for KeyModification {
    fn from(r: &Revision) -> Self {
        Self {
            tx_id: r.tx_id.clone(),
            timestamp: r.timestamp,
            is_delete: r.is_delete,
            value: r.value.as_ref().map(|v| v.as_bytes().to_vec()),
        }
    }
}

// ─── Ledger ──────────────────────────────────────────────────────────

/// World state plus history, serializable as a JSON snapshot.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MemoryLedger {
    state: BTreeMap<String, String>,
    #[serde(default)]
    history: BTreeMap<String, Vec<Revision>>,
    /// Fixed commit time, for reproducible histories.
    #[serde(skip)]
    clock: Option<LedgerTimestamp>,
    #[serde(skip)]
    open_cursors: Arc<AtomicUsize>,
}

impl MemoryLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp every subsequent commit with `timestamp` instead of the
    /// wall clock.
    pub fn set_clock(&mut self, timestamp: LedgerTimestamp) {
        self.clock = Some(timestamp);
    }

    /// Number of cursors handed out and not yet released.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    /// The committed value of a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.state.get(key).map(String::as_str)
    }

    /// Every committed simple and composite key, in key order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.state.keys().map(String::as_str)
    }

    /// The committed history of a key, oldest first.
    pub fn history(&self, key: &str) -> &[Revision] {
        self.history.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Write a value outside any invocation, as a one-write transaction.
    pub fn seed(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let tx_id = Uuid::new_v4().to_string();
        let timestamp = self.commit_time();
        self.apply(&tx_id, timestamp, key.into(), Some(value.into()));
    }

    /// Delete a key outside any invocation, recording a delete revision.
    pub fn delete(&mut self, key: &str) {
        let tx_id = Uuid::new_v4().to_string();
        let timestamp = self.commit_time();
        self.apply(&tx_id, timestamp, key.to_string(), None);
    }

    /// Open a transaction for one invocation.
    pub fn begin(
        &mut self,
        caller: CallerIdentity,
        function: impl Into<String>,
        parameters: Vec<String>,
    ) -> Transaction<'_> {
        Transaction {
            tx_id: Uuid::new_v4().to_string(),
            caller,
            function: function.into(),
            parameters,
            writes: BTreeMap::new(),
            ledger: self,
        }
    }

    /// Run one invocation of `contract` and commit it if it succeeds.
    pub fn submit<C: Contract + ?Sized>(
        &mut self,
        contract: &C,
        caller: CallerIdentity,
        function: &str,
        parameters: &[&str],
    ) -> Result<Vec<u8>, ContractError> {
        let params = parameters.iter().map(|p| p.to_string()).collect();
        let mut tx = self.begin(caller, function, params);
        let payload = contract.execute(&mut tx)?;
        tx.commit();
        Ok(payload)
    }

    /// Load a snapshot previously produced by [`MemoryLedger::to_json()`].
    pub fn from_json(json: &str) -> Result<Self, LedgerError> {
        serde_json::from_str(json).map_err(|e| LedgerError::Store(e.to_string()))
    }

    /// Serialize the committed state and history.
    pub fn to_json(&self) -> Result<String, LedgerError> {
        serde_json::to_string_pretty(self).map_err(|e| LedgerError::Store(e.to_string()))
    }

    fn commit_time(&self) -> LedgerTimestamp {
        self.clock.unwrap_or_else(LedgerTimestamp::now)
    }

    fn apply(&mut self, tx_id: &str, timestamp: LedgerTimestamp, key: String, value: Option<String>) {
        let revision = Revision {
            tx_id: tx_id.to_string(),
            timestamp,
            is_delete: value.is_none(),
            value: value.clone(),
        };
        match value {
            Some(v) => {
                self.state.insert(key.clone(), v);
            }
            None => {
                self.state.remove(&key);
            }
        }
        self.history.entry(key).or_default().push(revision);
    }

    fn cursor<T: 'static>(&self, items: Vec<T>) -> Cursor<'static, T> {
        self.open_cursors.fetch_add(1, Ordering::SeqCst);
        Cursor::new(TrackedSource {
            items: items.into_iter(),
            open: Arc::clone(&self.open_cursors),
        })
    }
}

// ─── Transaction ─────────────────────────────────────────────────────

/// One invocation against a [`MemoryLedger`].
#[derive(Debug)]
pub struct Transaction<'a> {
    ledger: &'a mut MemoryLedger,
    tx_id: String,
    caller: CallerIdentity,
    function: String,
    parameters: Vec<String>,
    writes: BTreeMap<String, String>,
}

impl Transaction<'_> {
    /// Writes buffered so far, in key order.
    pub fn pending_writes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.writes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Apply the buffered writes atomically.
    pub fn commit(self) {
        let timestamp = self.ledger.commit_time();
        tracing::debug!(tx_id = %self.tx_id, writes = self.writes.len(), "committing transaction");
        for (key, value) in self.writes {
            self.ledger.apply(&self.tx_id, timestamp, key, Some(value));
        }
    }
}

impl LedgerContext for Transaction<'_> {
    fn caller_msp_id(&self) -> &str {
        &self.caller.msp_id
    }

    fn caller_attribute(&self, name: &str) -> Option<&str> {
        self.caller.attribute(name)
    }

    fn function_name(&self) -> &str {
        &self.function
    }

    fn parameters(&self) -> &[String] {
        &self.parameters
    }

    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::EmptyKey);
        }
        Ok(self.ledger.state.get(key).map(|v| v.as_bytes().to_vec()))
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::EmptyKey);
        }
        let value = String::from_utf8(value)
            .map_err(|_| LedgerError::Store(format!("value for key {key:?} is not UTF-8")))?;
        self.writes.insert(key.to_string(), value);
        Ok(())
    }

    fn query_rich(&self, query: &str) -> Result<Cursor<'_, KeyValue>, LedgerError> {
        let selector = Selector::parse(query)?;
        let items = self
            .ledger
            .state
            .iter()
            .filter(|(_, v)| selector.matches(v))
            .map(|(k, v)| KeyValue {
                key: k.clone(),
                value: v.as_bytes().to_vec(),
            })
            .collect();
        Ok(self.ledger.cursor(items))
    }

    fn query_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Cursor<'_, KeyValue>, LedgerError> {
        let items = self
            .ledger
            .state
            .range(start_key.to_string()..)
            .filter(|(k, _)| !is_composite_key(k))
            .take_while(|(k, _)| end_key.is_empty() || k.as_str() < end_key)
            .map(|(k, v)| KeyValue {
                key: k.clone(),
                value: v.as_bytes().to_vec(),
            })
            .collect();
        Ok(self.ledger.cursor(items))
    }

    fn query_history(&self, key: &str) -> Result<Cursor<'_, KeyModification>, LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::EmptyKey);
        }
        let items = self
            .ledger
            .history(key)
            .iter()
            .map(KeyModification::from)
            .collect();
        Ok(self.ledger.cursor(items))
    }
}

// ─── Cursor Source ───────────────────────────────────────────────────

struct TrackedSource<T> {
    items: std::vec::IntoIter<T>,
    open: Arc<AtomicUsize>,
}

impl<T> CursorSource<T> for TrackedSource<T> {
    fn advance(&mut self) -> Option<Result<T, LedgerError>> {
        self.items.next().map(Ok)
    }

    fn close(&mut self) -> Result<(), LedgerError> {
        self.open.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

// ─── Rich Query Selector ─────────────────────────────────────────────

/// An equality-only subset of the document-store selector language.
///
/// `{"selector": {"field": value, "other": {"$eq": value}}}` matches JSON
/// object documents whose top-level fields equal every listed value.
/// `use_index` and other top-level query fields are accepted and ignored.
#[derive(Debug)]
struct Selector {
    fields: Vec<(String, Value)>,
}

impl Selector {
    fn parse(query: &str) -> Result<Self, LedgerError> {
        let parsed: Value = serde_json::from_str(query)
            .map_err(|e| LedgerError::UnsupportedQuery(format!("query is not JSON: {e}")))?;
        let selector = parsed
            .get("selector")
            .and_then(Value::as_object)
            .ok_or_else(|| LedgerError::UnsupportedQuery("missing selector object".into()))?;

        let mut fields = Vec::with_capacity(selector.len());
        for (field, condition) in selector {
            let expected = match condition {
                Value::Object(ops) => match ops.get("$eq") {
                    Some(v) if ops.len() == 1 => v.clone(),
                    _ => {
                        return Err(LedgerError::UnsupportedQuery(format!(
                            "operator on field {field:?} is not supported"
                        )))
                    }
                },
                scalar => scalar.clone(),
            };
            fields.push((field.clone(), expected));
        }
        Ok(Self { fields })
    }

    fn matches(&self, document: &str) -> bool {
        let Ok(Value::Object(doc)) = serde_json::from_str::<Value>(document) else {
            return false;
        };
        self.fields
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }
}
