//! # Invoke Subcommand
//!
//! Runs one contract operation against the file-backed ledger. A successful
//! invocation is committed and the snapshot rewritten; a rejected one leaves
//! the snapshot untouched.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use tfc_core::CallerIdentity;

use crate::config::CliConfig;
use crate::registry::Registry;
use crate::store::LedgerStore;

/// Arguments for `tfc invoke`.
#[derive(Args, Debug)]
pub struct InvokeArgs {
    /// Contract name: trade, shipment, TradeContract or ShipmentContract.
    pub contract: String,

    /// Function to invoke, e.g. requestTrade.
    pub function: String,

    /// Positional string parameters of the function.
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// MSP id of the caller.
    #[arg(long)]
    pub msp: String,

    /// Business role of the caller (omit for the `any` role).
    #[arg(long)]
    pub role: Option<String>,

    /// Extra certificate attribute, as name=value. Repeatable.
    #[arg(long = "attr", value_name = "NAME=VALUE")]
    pub attributes: Vec<String>,

    /// Ledger snapshot file, overriding the config.
    #[arg(long)]
    pub ledger: Option<PathBuf>,
}

/// Outcome of one invocation.
#[derive(Debug, PartialEq, Eq)]
pub enum InvokeOutcome {
    /// Committed; the response payload as text.
    Committed(String),
    /// Rejected by the contract; nothing was written.
    Rejected(String),
}

/// Execute `tfc invoke`. Returns the process exit code.
pub fn run_invoke(args: &InvokeArgs, config: &CliConfig) -> Result<u8> {
    let registry = Registry::from_config(config)?;
    let path = config.ledger_path(args.ledger.as_deref());
    let mut store = LedgerStore::load(&path)?;

    match invoke(&registry, &mut store, args)? {
        InvokeOutcome::Committed(payload) => {
            store.save(&path)?;
            if !payload.is_empty() {
                println!("{payload}");
            }
            Ok(0)
        }
        InvokeOutcome::Rejected(message) => {
            eprintln!("Error: {message}");
            Ok(1)
        }
    }
}

/// Run the invocation against `store` without touching the filesystem.
pub fn invoke(registry: &Registry, store: &mut LedgerStore, args: &InvokeArgs) -> Result<InvokeOutcome> {
    let caller = crate::caller_identity(&args.msp, args.role.as_deref(), &args.attributes);
    let params: Vec<&str> = args.args.iter().map(String::as_str).collect();
    call(registry, store, &args.contract, caller, &args.function, &params)
}

/// Submit one call to the named contract's ledger in `store`.
///
/// Contract rejections are an [`InvokeOutcome`]; only an unknown contract
/// name is an error.
pub fn call(
    registry: &Registry,
    store: &mut LedgerStore,
    contract: &str,
    caller: CallerIdentity,
    function: &str,
    params: &[&str],
) -> Result<InvokeOutcome> {
    let contract = registry.get(contract)?;
    let ledger = store.ledger_mut(contract.name());
    match ledger.submit(contract, caller, function, params) {
        Ok(payload) => Ok(InvokeOutcome::Committed(String::from_utf8_lossy(&payload).into_owned())),
        Err(e) => Ok(InvokeOutcome::Rejected(e.to_string())),
    }
}
