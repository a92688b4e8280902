//! # Ledger Store
//!
//! Each contract keeps its own world state, as chaincodes do on a channel.
//! The store maps contract name to ledger and persists the whole map as one
//! JSON snapshot.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use tfc_ledger::MemoryLedger;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LedgerStore {
    #[serde(default)]
    ledgers: BTreeMap<String, MemoryLedger>,
}

impl LedgerStore {
    /// Load a snapshot; a missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no ledger snapshot, starting empty");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ledger snapshot: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse ledger snapshot: {}", path.display()))
    }

    /// Write the snapshot, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("failed to serialize ledger")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write ledger snapshot: {}", path.display()))
    }

    /// The ledger of a contract, created empty on first use.
    pub fn ledger_mut(&mut self, contract: &str) -> &mut MemoryLedger {
        self.ledgers.entry(contract.to_string()).or_default()
    }

    pub fn ledger(&self, contract: &str) -> Option<&MemoryLedger> {
        self.ledgers.get(contract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LedgerStore::load(&dir.path().join("none.json")).unwrap();
        assert!(store.ledger("TradeContract").is_none());
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/ledger.json");
        let mut store = LedgerStore::default();
        store.ledger_mut("TradeContract").seed("1003", "{}");
        store.ledger_mut("ShipmentContract");
        store.save(&path).unwrap();

        let reloaded = LedgerStore::load(&path).unwrap();
        assert_eq!(reloaded.ledger("TradeContract").unwrap().get("1003"), Some("{}"));
        assert_eq!(reloaded.ledger("ShipmentContract").unwrap().keys().count(), 0);
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        std::fs::write(&path, "not json").unwrap();
        let err = LedgerStore::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse ledger snapshot"));
    }
}
