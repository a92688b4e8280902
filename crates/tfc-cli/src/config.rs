//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`:
//!
//! ```yaml
//! ledger: state/ledger.json
//! policies:
//!   TradeContract:
//!     rules:
//!       - mspId: ImporterOrgMSP
//!         role: importer
//!         operations: [requestTrade, getTrade, getTradesByRange]
//! ```
//!
//! A contract without an entry under `policies` keeps its built-in table.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use tfc_acl::PolicyConfig;

/// Snapshot file used when neither the config nor `--ledger` names one.
pub const DEFAULT_LEDGER_PATH: &str = "tfc-ledger.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Ledger snapshot file.
    #[serde(default)]
    pub ledger: Option<PathBuf>,
    /// Access policy overrides, by contract name.
    #[serde(default)]
    pub policies: BTreeMap<String, PolicyConfig>,
}

impl CliConfig {
    /// Read the config file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), overrides = config.policies.len(), "loaded config");
        Ok(config)
    }

    /// The snapshot path: `override_path`, else the configured one, else
    /// [`DEFAULT_LEDGER_PATH`].
    pub fn ledger_path(&self, override_path: Option<&Path>) -> PathBuf {
        override_path
            .map(Path::to_path_buf)
            .or_else(|| self.ledger.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LEDGER_PATH))
    }
}
