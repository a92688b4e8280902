//! End-to-end trade lifecycle through contract dispatch, including the
//! access-control pre-hook and transactional commit.

use tfc_core::{CallerIdentity, ErrorKind};
use tfc_ledger::{Contract, MemoryLedger};
use tfc_trade::{TradeAgreement, TradeContract, TradeStatus};

fn importer() -> CallerIdentity {
    CallerIdentity::with_role("ImporterOrgMSP", "importer")
}

fn exporter() -> CallerIdentity {
    CallerIdentity::with_role("ExporterOrgMSP", "exporter")
}

fn regulator() -> CallerIdentity {
    CallerIdentity::with_role("RegulatorOrgMSP", "regulator")
}

fn request(ledger: &mut MemoryLedger, contract: &TradeContract, id: &str) {
    ledger
        .submit(contract, importer(), "requestTrade", &[id, "ExporterOrgMSP", "Pears", "1000"])
        .unwrap();
}

#[test]
fn request_then_accept() {
    let contract = TradeContract::new().unwrap();
    let mut ledger = MemoryLedger::new();

    request(&mut ledger, &contract, "1003");
    assert_eq!(
        ledger.get("1003").unwrap(),
        r#"{"tradeID":"1003","exporterMSP":"ExporterOrgMSP","importerMSP":"ImporterOrgMSP","descriptionOfGoods":"Pears","amount":1000,"status":"REQUESTED"}"#
    );

    ledger.submit(&contract, exporter(), "acceptTrade", &["1003"]).unwrap();
    assert_eq!(
        ledger.get("1003").unwrap(),
        r#"{"tradeID":"1003","exporterMSP":"ExporterOrgMSP","importerMSP":"ImporterOrgMSP","descriptionOfGoods":"Pears","amount":1000,"status":"ACCEPTED"}"#
    );
    let payload = ledger.submit(&contract, regulator(), "getTrade", &["1003"]).unwrap();
    let trade: TradeAgreement = serde_json::from_slice(&payload).unwrap();
    assert_eq!(trade.status, TradeStatus::Accepted);

    let err = ledger.submit(&contract, exporter(), "acceptTrade", &["1003"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn status_payload() {
    let contract = TradeContract::new().unwrap();
    let mut ledger = MemoryLedger::new();
    request(&mut ledger, &contract, "1003");
    let payload = ledger.submit(&contract, exporter(), "getTradeStatus", &["1003"]).unwrap();
    assert_eq!(payload, br#"{"Status":"REQUESTED"}"#);
}

#[test]
fn exists_payload() {
    let contract = TradeContract::new().unwrap();
    let mut ledger = MemoryLedger::new();
    request(&mut ledger, &contract, "1003");
    assert_eq!(ledger.submit(&contract, importer(), "exists", &["1003"]).unwrap(), b"true");
    assert_eq!(ledger.submit(&contract, importer(), "exists", &["9999"]).unwrap(), b"false");
}

#[test]
fn failed_invocation_leaves_no_trace() {
    let contract = TradeContract::new().unwrap();
    let mut ledger = MemoryLedger::new();
    request(&mut ledger, &contract, "1003");
    let err = ledger
        .submit(&contract, importer(), "requestTrade", &["1003", "ExporterOrgMSP", "Figs", "5"])
        .unwrap_err();
    assert_eq!(err.to_string(), "The trade 1003 already exists");
    assert_eq!(ledger.history("1003").len(), 1);
}

#[test]
fn importer_cannot_accept() {
    let contract = TradeContract::new().unwrap();
    let mut ledger = MemoryLedger::new();
    request(&mut ledger, &contract, "1003");
    let err = ledger.submit(&contract, importer(), "acceptTrade", &["1003"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The participant belonging to MSP ImporterOrgMSP and role importer cannot invoke transaction acceptTrade"
    );
    assert!(ledger.get("1003").unwrap().contains("REQUESTED"));
}

#[test]
fn unknown_role_is_unrecognized() {
    let contract = TradeContract::new().unwrap();
    let mut ledger = MemoryLedger::new();
    let caller = CallerIdentity::with_role("ImporterOrgMSP", "someweirdunknownrole");
    let err = ledger.submit(&contract, caller, "getTrade", &["1003"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnrecognizedCaller);
}

#[test]
fn init_requires_roleless_caller() {
    let contract = TradeContract::new().unwrap();
    let mut ledger = MemoryLedger::new();
    assert!(ledger
        .submit(&contract, CallerIdentity::new("RegulatorOrgMSP"), "init", &[])
        .unwrap()
        .is_empty());
    let err = ledger.submit(&contract, regulator(), "init", &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[test]
fn empty_role_is_treated_as_any() {
    let contract = TradeContract::new().unwrap();
    let mut ledger = MemoryLedger::new();
    let caller = CallerIdentity::with_role("RegulatorOrgMSP", "");
    assert!(ledger.submit(&contract, caller.clone(), "init", &[]).unwrap().is_empty());
    let err = ledger.submit(&contract, caller, "getTrade", &["1003"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The participant belonging to MSP RegulatorOrgMSP and role any cannot invoke transaction getTrade"
    );
}

#[test]
fn range_and_history_are_closed_to_default_roles() {
    let contract = TradeContract::new().unwrap();
    let mut ledger = MemoryLedger::new();
    request(&mut ledger, &contract, "1003");
    for caller in [importer(), exporter(), regulator()] {
        let err = ledger
            .submit(&contract, caller.clone(), "getTradesByRange", &["1000", "2000"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = ledger
            .submit(&contract, caller, "getTradeHistory", &["1003"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }
}

#[test]
fn unknown_function_skips_access_check() {
    let contract = TradeContract::new().unwrap();
    let mut ledger = MemoryLedger::new();
    let stranger = CallerIdentity::new("NobodyMSP");
    let err = ledger.submit(&contract, stranger, "deleteTrade", &["1003"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "You've asked to invoke a function that does not exist: deleteTrade"
    );
}

#[test]
fn wrong_arity_and_bad_amount() {
    let contract = TradeContract::new().unwrap();
    let mut ledger = MemoryLedger::new();
    let err = ledger
        .submit(&contract, importer(), "requestTrade", &["1003", "ExporterOrgMSP"])
        .unwrap_err();
    assert_eq!(err.to_string(), "Expected 4 parameters, but 2 have been supplied");

    let err = ledger
        .submit(&contract, importer(), "requestTrade", &["1003", "ExporterOrgMSP", "Pears", "many"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(ledger.get("1003").is_none());
}

#[test]
fn list_trade_by_participant() {
    let contract = TradeContract::new().unwrap();
    let mut ledger = MemoryLedger::new();
    request(&mut ledger, &contract, "1003");
    request(&mut ledger, &contract, "1004");

    let payload = ledger.submit(&contract, exporter(), "listTrade", &[]).unwrap();
    let trades: Vec<TradeAgreement> = serde_json::from_slice(&payload).unwrap();
    let ids: Vec<_> = trades.iter().map(|t| t.trade_id.as_str()).collect();
    assert_eq!(ids, vec!["1003", "1004"]);

    let payload = ledger.submit(&contract, regulator(), "listTrade", &[]).unwrap();
    assert_eq!(payload, b"[]");
    assert_eq!(ledger.open_cursors(), 0);
}

#[test]
fn dispatch_covers_every_operation() {
    let contract = TradeContract::new().unwrap();
    assert_eq!(contract.info().title, "TradeContract");
    assert_eq!(contract.operations().len(), 9);
}
