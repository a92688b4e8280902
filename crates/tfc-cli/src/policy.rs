//! # Policy Subcommand
//!
//! Prints the access table a contract would enforce under the current
//! configuration, in the same format the config file accepts.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use crate::config::CliConfig;
use crate::registry::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Arguments for `tfc policy`.
#[derive(Args, Debug)]
pub struct PolicyArgs {
    /// Contract name: trade, shipment, TradeContract or ShipmentContract.
    pub contract: String,

    /// Output format.
    #[arg(long, value_enum, default_value = "yaml")]
    pub format: OutputFormat,
}

/// Execute `tfc policy`.
pub fn run_policy(args: &PolicyArgs, config: &CliConfig) -> Result<u8> {
    let registry = Registry::from_config(config)?;
    println!("{}", render_policy(&registry, &args.contract, args.format)?);
    Ok(0)
}

/// Render the effective policy of a contract.
pub fn render_policy(registry: &Registry, contract: &str, format: OutputFormat) -> Result<String> {
    let table = registry.policy(contract)?.to_config();
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(&table).context("failed to render policy as YAML"),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&table).context("failed to render policy as JSON")
        }
    }
}
