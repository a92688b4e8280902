//! # Contract Registry
//!
//! Resolves a contract by name (`TradeContract`, `trade`, `ShipmentContract`
//! or `shipment`) and applies the policy overrides from [`CliConfig`].

use anyhow::{bail, Context, Result};

use tfc_acl::AccessPolicy;
use tfc_ledger::Contract;
use tfc_shipment::ShipmentContract;
use tfc_trade::TradeContract;

use crate::config::CliConfig;

pub struct Registry {
    trade: TradeContract,
    shipment: ShipmentContract,
}

impl Registry {
    /// Both contracts with their built-in policies.
    pub fn new() -> Result<Self> {
        Self::from_config(&CliConfig::default())
    }

    /// Both contracts, with any policy overrides from `config`.
    pub fn from_config(config: &CliConfig) -> Result<Self> {
        for name in config.policies.keys() {
            if canonical_name(name).is_none() {
                bail!("policy override for unknown contract: {name}");
            }
        }
        let override_for = |name: &str| -> Result<Option<AccessPolicy>> {
            config
                .policies
                .iter()
                .find(|(key, _)| canonical_name(key) == Some(name))
                .map(|(_, policy)| {
                    AccessPolicy::from_config(policy)
                        .with_context(|| format!("invalid policy override for {name}"))
                })
                .transpose()
        };

        let trade = match override_for(TradeContract::NAME)? {
            Some(policy) => TradeContract::with_policy(policy),
            None => TradeContract::new()?,
        };
        let shipment = match override_for(ShipmentContract::NAME)? {
            Some(policy) => ShipmentContract::with_policy(policy),
            None => ShipmentContract::new()?,
        };
        Ok(Self { trade, shipment })
    }

    /// Look up a contract by name or short alias.
    pub fn get(&self, name: &str) -> Result<&dyn Contract> {
        match canonical_name(name) {
            Some(TradeContract::NAME) => Ok(&self.trade),
            Some(ShipmentContract::NAME) => Ok(&self.shipment),
            _ => bail!("unknown contract: {name} (expected trade or shipment)"),
        }
    }

    pub fn policy(&self, name: &str) -> Result<&AccessPolicy> {
        match canonical_name(name) {
            Some(TradeContract::NAME) => Ok(self.trade.policy()),
            Some(ShipmentContract::NAME) => Ok(self.shipment.policy()),
            _ => bail!("unknown contract: {name} (expected trade or shipment)"),
        }
    }
}

fn canonical_name(name: &str) -> Option<&'static str> {
    match name {
        "trade" | TradeContract::NAME => Some(TradeContract::NAME),
        "shipment" | ShipmentContract::NAME => Some(ShipmentContract::NAME),
        _ => None,
    }
}
