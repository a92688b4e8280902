//! # Scenario Subcommand
//!
//! Replays a YAML list of invocations and checks each outcome. Steps run in
//! order against one store, so later steps observe what earlier ones
//! committed.
//!
//! ```yaml
//! name: request and accept
//! steps:
//!   - contract: trade
//!     function: requestTrade
//!     args: ["1003", ExporterOrgMSP, Pears, 1000]
//!     msp: ImporterOrgMSP
//!     role: importer
//!   - contract: trade
//!     function: acceptTrade
//!     args: ["1003"]
//!     msp: ImporterOrgMSP
//!     role: importer
//!     expectError: cannot invoke transaction acceptTrade
//!   - contract: trade
//!     function: getTradeStatus
//!     args: ["1003"]
//!     msp: ExporterOrgMSP
//!     role: exporter
//!     expectPayload: '{"Status":"REQUESTED"}'
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::config::CliConfig;
use crate::invoke::{call, InvokeOutcome};
use crate::registry::Registry;
use crate::store::LedgerStore;

/// Arguments for `tfc scenario`.
#[derive(Args, Debug)]
pub struct ScenarioArgs {
    /// Scenario YAML file.
    pub file: PathBuf,

    /// Run against the configured ledger snapshot and save the result,
    /// instead of a fresh in-memory ledger.
    #[arg(long)]
    pub persist: bool,

    /// Ledger snapshot file, overriding the config. Implies nothing
    /// without `--persist`.
    #[arg(long)]
    pub ledger: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Step {
    pub contract: String,
    pub function: String,
    #[serde(default)]
    pub args: Vec<Param>,
    pub msp: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub attributes: Vec<String>,
    /// The step must be rejected with a message containing this text.
    #[serde(default)]
    pub expect_error: Option<String>,
    /// The step must succeed with exactly this payload.
    #[serde(default)]
    pub expect_payload: Option<String>,
}

/// A scalar parameter. YAML numbers and booleans are passed in their
/// plain text form, as a client would send them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Param {
    Text(String),
    Integer(i64),
    Number(f64),
    Flag(bool),
}

impl std::fmt::Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Flag(b) => write!(f, "{b}"),
        }
    }
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub index: usize,
    pub label: String,
    pub passed: bool,
    pub detail: String,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse scenario: {}", path.display()))
    }
}

/// Execute `tfc scenario`. Exit code 0 when every step passes, 1 otherwise.
pub fn run_scenario(args: &ScenarioArgs, config: &CliConfig) -> Result<u8> {
    let scenario = Scenario::load(&args.file)?;
    let registry = Registry::from_config(config)?;
    let path = config.ledger_path(args.ledger.as_deref());
    let mut store = if args.persist {
        LedgerStore::load(&path)?
    } else {
        LedgerStore::default()
    };

    if let Some(name) = &scenario.name {
        println!("scenario: {name}");
    }
    let reports = run_steps(&registry, &mut store, &scenario)?;
    let failed = reports.iter().filter(|r| !r.passed).count();
    for r in &reports {
        let mark = if r.passed { "ok" } else { "FAIL" };
        println!("{:>3} {mark:<4} {}: {}", r.index + 1, r.label, r.detail);
    }
    println!("{} steps, {} passed, {failed} failed", reports.len(), reports.len() - failed);

    if args.persist {
        store.save(&path)?;
    }
    Ok(if failed == 0 { 0 } else { 1 })
}

/// Run every step against `store` and report each outcome.
pub fn run_steps(registry: &Registry, store: &mut LedgerStore, scenario: &Scenario) -> Result<Vec<StepReport>> {
    let mut reports = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        let caller = crate::caller_identity(&step.msp, step.role.as_deref(), &step.attributes);
        let params: Vec<String> = step.args.iter().map(Param::to_string).collect();
        let params: Vec<&str> = params.iter().map(String::as_str).collect();
        let outcome = call(registry, store, &step.contract, caller, &step.function, &params)
            .with_context(|| format!("step {}", index + 1))?;

        let (passed, detail) = judge(step, &outcome);
        if !passed {
            tracing::warn!(step = index + 1, function = %step.function, %detail, "scenario step failed");
        }
        reports.push(StepReport {
            index,
            label: format!("{}.{}", step.contract, step.function),
            passed,
            detail,
        });
    }
    Ok(reports)
}

fn judge(step: &Step, outcome: &InvokeOutcome) -> (bool, String) {
    match (outcome, &step.expect_error) {
        (InvokeOutcome::Rejected(message), Some(expected)) => {
            (message.contains(expected.as_str()), format!("rejected: {message}"))
        }
        (InvokeOutcome::Rejected(message), None) => (false, format!("unexpected error: {message}")),
        (InvokeOutcome::Committed(_), Some(expected)) => {
            (false, format!("succeeded, expected error containing {expected:?}"))
        }
        (InvokeOutcome::Committed(payload), None) => match &step.expect_payload {
            Some(expected) if expected != payload => {
                (false, format!("payload {payload:?}, expected {expected:?}"))
            }
            _ if payload.is_empty() => (true, "committed".to_string()),
            _ => (true, payload.clone()),
        },
    }
}
