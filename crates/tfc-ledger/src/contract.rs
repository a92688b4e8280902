//! # Contract Dispatch
//!
//! The platform invokes a contract by function name with positional string
//! parameters. `Contract` is the seam between that envelope and the typed
//! operations: `execute()` resolves the function, runs the access-control
//! pre-hook, and hands the decoded parameters to `dispatch()`.
//!
//! Unknown functions are rejected before the pre-hook runs, matching the
//! platform's routing: there is no handler for the hook to guard.

use serde::Serialize;

use tfc_core::{Amount, ContractError};

use crate::context::LedgerContext;

/// Descriptive metadata published with a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContractInfo {
    /// Short title.
    pub title: &'static str,
    /// One-line description.
    pub description: &'static str,
}

/// A named set of transaction functions gated by a pre-hook.
pub trait Contract {
    /// Name the contract is registered under.
    fn name(&self) -> &'static str;

    /// Published metadata.
    fn info(&self) -> ContractInfo;

    /// Every function name `dispatch()` accepts.
    fn operations(&self) -> &'static [&'static str];

    /// Runs before every known function. An error aborts the invocation.
    fn before_transaction(&self, ctx: &dyn LedgerContext) -> Result<(), ContractError>;

    /// Run one function and produce its response payload.
    fn dispatch(
        &self,
        ctx: &mut dyn LedgerContext,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, ContractError>;

    /// Route the invocation described by `ctx`.
    fn execute(&self, ctx: &mut dyn LedgerContext) -> Result<Vec<u8>, ContractError> {
        let function = ctx.function_name().to_string();
        let args = ctx.parameters().to_vec();
        let span = tracing::info_span!(
            "transaction",
            contract = self.name(),
            function = %function,
            tx_id = %ctx.tx_id(),
        );
        let _guard = span.enter();

        if !self.operations().contains(&function.as_str()) {
            tracing::warn!("unknown transaction function");
            return Err(ContractError::UnknownTransaction(function));
        }

        if let Err(e) = self.before_transaction(&*ctx) {
            tracing::warn!(caller = %ctx.caller_msp_id(), error = %e, "transaction rejected");
            return Err(e);
        }

        let result = self.dispatch(ctx, &function, &args);
        match &result {
            Ok(payload) => tracing::debug!(bytes = payload.len(), "transaction succeeded"),
            Err(e) => tracing::info!(error = %e, "transaction failed"),
        }
        result
    }
}

/// Positional parameters of one invocation, checked for arity up front.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    values: &'a [String],
}

impl<'a> Args<'a> {
    /// Accept exactly `expected` parameters.
    pub fn exact(values: &'a [String], expected: usize) -> Result<Self, ContractError> {
        if values.len() != expected {
            return Err(ContractError::ArgumentCount {
                expected,
                supplied: values.len(),
            });
        }
        Ok(Self { values })
    }

    /// The parameter at `index` as text.
    pub fn text(&self, index: usize) -> &'a str {
        self.values.get(index).map(String::as_str).unwrap_or_default()
    }

    /// The parameter at `index` decoded as an amount.
    pub fn amount(&self, index: usize, name: &str) -> Result<Amount, ContractError> {
        self.text(index)
            .parse()
            .map_err(|e: tfc_core::ParseAmountError| ContractError::InvalidArgument {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Response payload builders.
pub mod payload {
    use serde::Serialize;

    use tfc_core::ContractError;

    /// The payload of a function that returns nothing.
    pub fn empty() -> Vec<u8> {
        Vec::new()
    }

    /// A JSON-encoded response.
    pub fn json(value: &impl Serialize) -> Result<Vec<u8>, ContractError> {
        Ok(serde_json::to_vec(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_arity() {
        let values = strings(&["1003", "ExporterOrgMSP"]);
        assert!(Args::exact(&values, 2).is_ok());
        let err = Args::exact(&values, 4).unwrap_err();
        assert_eq!(err.to_string(), "Expected 4 parameters, but 2 have been supplied");
    }

    #[test]
    fn test_amount_decoding() {
        let values = strings(&["1000", "lots"]);
        let args = Args::exact(&values, 2).unwrap();
        assert_eq!(args.amount(0, "amount").unwrap(), Amount::from(1000));
        let err = args.amount(1, "amount").unwrap_err();
        assert!(matches!(err, ContractError::InvalidArgument { ref name, .. } if name == "amount"));
    }

    #[test]
    fn test_payloads() {
        assert!(payload::empty().is_empty());
        assert_eq!(payload::json(&true).unwrap(), b"true");
    }
}
