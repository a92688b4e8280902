//! # Error Types
//!
//! Defines the error types used by both contracts. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Every failure kind a contract can raise is a distinct variant of
//!   [`ContractError`]; callers match on variants (or on [`ErrorKind`]),
//!   never on message text.
//! - The `Display` output of each business-rule variant is the exact
//!   message that clients of the deployed chaincode observe. Integration
//!   suites match on substrings of these messages, so the wording
//!   (including the double space in the wrong-status message) is fixed.
//! - Ledger and serialization failures are wrapped, not flattened, so the
//!   underlying cause stays available through `source()`.

use std::fmt;

use thiserror::Error;

/// Top-level error type returned by every contract operation.
#[derive(Error, Debug)]
pub enum ContractError {
    /// The caller failed the access-control pre-hook.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// A trade with the requested identifier is already recorded.
    #[error("The trade {0} already exists")]
    AlreadyExists(String),

    /// The requested record is absent (or stored empty).
    #[error("{0}")]
    NotFound(MissingRecord),

    /// A trade is not in the state required by the transition.
    #[error("The trade {trade_id} is in the wrong status.  Expected {expected} got {actual}")]
    InvalidState {
        /// The trade being transitioned.
        trade_id: String,
        /// State required by the transition.
        expected: String,
        /// State found on the ledger.
        actual: String,
    },

    /// A shipment has already been prepared and still sits at its source.
    #[error("Shipment for trade {0} has already been prepared")]
    AlreadyPrepared(String),

    /// A shipment has left its source location.
    #[error("Shipment for trade {0} has passed the preparation stage")]
    PastPreparationStage(String),

    /// A shipment location exists but the shipment record does not.
    #[error("Shipment for trade {0} has not been prepared yet")]
    NotPrepared(String),

    /// The caller is not the carrier named on the shipment.
    #[error("The shipment can be accepted only by applicable carrier")]
    WrongCarrier {
        /// Carrier recorded on the shipment.
        carrier: String,
        /// Organization that attempted the acceptance.
        caller: String,
    },

    /// A location value outside `SOURCE` / `DESTINATION`.
    #[error("Invalid value of location - must be SOURCE or DESTINATION")]
    InvalidLocation(String),

    /// The requested location equals the current one.
    #[error("Shipment location for trade {trade_id} is already in location {location}")]
    NoOpTransition {
        /// The trade whose shipment was targeted.
        trade_id: String,
        /// The location already recorded.
        location: String,
    },

    /// The invoked function name is not part of the contract.
    #[error("You've asked to invoke a function that does not exist: {0}")]
    UnknownTransaction(String),

    /// The invocation supplied the wrong number of parameters.
    #[error("Expected {expected} parameters, but {supplied} have been supplied")]
    ArgumentCount {
        /// Parameters declared by the operation.
        expected: usize,
        /// Parameters present in the invocation.
        supplied: usize,
    },

    /// A parameter could not be decoded into the declared type.
    #[error("invalid value for parameter {name}: {reason}")]
    InvalidArgument {
        /// Parameter name as declared by the operation.
        name: String,
        /// Why decoding failed.
        reason: String,
    },

    /// The ledger capability failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// A stored record or response payload failed (de)serialization.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Discriminant of a [`ContractError`], for callers that only care which
/// rule rejected the invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnrecognizedCaller,
    Forbidden,
    AlreadyExists,
    NotFound,
    InvalidState,
    AlreadyPrepared,
    PastPreparationStage,
    NotPrepared,
    WrongCarrier,
    InvalidLocation,
    NoOpTransition,
    UnknownTransaction,
    InvalidArgument,
    Ledger,
    Serialization,
}

impl ContractError {
    /// The kind of rule (or infrastructure failure) behind this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Access(AccessError::UnrecognizedCaller { .. }) => ErrorKind::UnrecognizedCaller,
            Self::Access(AccessError::Forbidden { .. }) => ErrorKind::Forbidden,
            Self::Access(AccessError::SubjectEncoding(_)) => ErrorKind::Serialization,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::AlreadyPrepared(_) => ErrorKind::AlreadyPrepared,
            Self::PastPreparationStage(_) => ErrorKind::PastPreparationStage,
            Self::NotPrepared(_) => ErrorKind::NotPrepared,
            Self::WrongCarrier { .. } => ErrorKind::WrongCarrier,
            Self::InvalidLocation(_) => ErrorKind::InvalidLocation,
            Self::NoOpTransition { .. } => ErrorKind::NoOpTransition,
            Self::UnknownTransaction(_) => ErrorKind::UnknownTransaction,
            Self::ArgumentCount { .. } | Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::Ledger(_) => ErrorKind::Ledger,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }
}

/// Identifies which record a [`ContractError::NotFound`] refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingRecord {
    /// A trade agreement keyed by trade id.
    Trade(String),
    /// The shipment location of a trade.
    ShipmentLocation(String),
    /// The bill of lading of a trade.
    BillOfLading(String),
}

impl fmt::Display for MissingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trade(id) => write!(f, "The trade {id} does not exists"),
            Self::ShipmentLocation(id) => {
                write!(f, "Shipment location for trade {id} has not been found")
            }
            Self::BillOfLading(id) => write!(f, "Bill of lading for trade {id} has not been found"),
        }
    }
}

/// Rejection raised by the access-control pre-hook.
#[derive(Error, Debug)]
pub enum AccessError {
    /// No rule exists for the caller's (organization, role) pair.
    #[error("The participant belonging to MSP {msp_id} and role {role} is not recognized")]
    UnrecognizedCaller {
        /// Caller organization.
        msp_id: String,
        /// Resolved business role.
        role: String,
    },

    /// A rule exists but does not list the invoked operation.
    #[error("The participant belonging to MSP {msp_id} and role {role} cannot invoke transaction {operation}")]
    Forbidden {
        /// Caller organization.
        msp_id: String,
        /// Resolved business role.
        role: String,
        /// Operation the caller attempted.
        operation: String,
    },

    /// The subject key could not be encoded.
    #[error("access subject could not be encoded: {0}")]
    SubjectEncoding(#[from] CanonicalizationError),
}

/// Failure reported by the ledger capability.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Keys must be non-empty.
    #[error("key must not be empty")]
    EmptyKey,

    /// A composite key component contains a reserved code point.
    #[error("composite key component {0:?} contains U+0000 or U+10FFFF")]
    InvalidCompositeKey(String),

    /// The rich query selector is malformed or uses an unsupported operator.
    #[error("unsupported rich query: {0}")]
    UnsupportedQuery(String),

    /// A result cursor failed while advancing or closing.
    #[error("cursor failure: {0}")]
    Cursor(String),

    /// The backing state store failed.
    #[error("state store failure: {0}")]
    Store(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        let e = ContractError::NotFound(MissingRecord::Trade("1003".into()));
        assert_eq!(e.to_string(), "The trade 1003 does not exists");

        let e = ContractError::NotFound(MissingRecord::ShipmentLocation("7".into()));
        assert_eq!(e.to_string(), "Shipment location for trade 7 has not been found");

        let e = ContractError::NotFound(MissingRecord::BillOfLading("7".into()));
        assert_eq!(e.to_string(), "Bill of lading for trade 7 has not been found");
    }

    #[test]
    fn test_invalid_state_message_keeps_double_space() {
        let e = ContractError::InvalidState {
            trade_id: "1002".into(),
            expected: "REQUESTED".into(),
            actual: "ACCEPTED".into(),
        };
        assert_eq!(
            e.to_string(),
            "The trade 1002 is in the wrong status.  Expected REQUESTED got ACCEPTED"
        );
    }

    #[test]
    fn test_access_messages_are_transparent() {
        let e: ContractError = AccessError::Forbidden {
            msp_id: "ImporterOrgMSP".into(),
            role: "importer".into(),
            operation: "acceptTrade".into(),
        }
        .into();
        assert_eq!(
            e.to_string(),
            "The participant belonging to MSP ImporterOrgMSP and role importer cannot invoke transaction acceptTrade"
        );
        assert_eq!(e.kind(), ErrorKind::Forbidden);

        let e: ContractError = AccessError::UnrecognizedCaller {
            msp_id: "SomeMSP".into(),
            role: "any".into(),
        }
        .into();
        assert_eq!(
            e.to_string(),
            "The participant belonging to MSP SomeMSP and role any is not recognized"
        );
        assert_eq!(e.kind(), ErrorKind::UnrecognizedCaller);
    }

    #[test]
    fn test_shipment_messages() {
        assert_eq!(
            ContractError::AlreadyPrepared("1".into()).to_string(),
            "Shipment for trade 1 has already been prepared"
        );
        assert_eq!(
            ContractError::PastPreparationStage("1".into()).to_string(),
            "Shipment for trade 1 has passed the preparation stage"
        );
        assert_eq!(
            ContractError::NotPrepared("1".into()).to_string(),
            "Shipment for trade 1 has not been prepared yet"
        );
        assert_eq!(
            ContractError::WrongCarrier {
                carrier: "CarrierOrgMSP".into(),
                caller: "OtherMSP".into()
            }
            .to_string(),
            "The shipment can be accepted only by applicable carrier"
        );
        assert_eq!(
            ContractError::NoOpTransition {
                trade_id: "1".into(),
                location: "SOURCE".into()
            }
            .to_string(),
            "Shipment location for trade 1 is already in location SOURCE"
        );
    }

    #[test]
    fn test_argument_errors_share_kind() {
        let count = ContractError::ArgumentCount {
            expected: 4,
            supplied: 2,
        };
        assert_eq!(count.to_string(), "Expected 4 parameters, but 2 have been supplied");
        assert_eq!(count.kind(), ErrorKind::InvalidArgument);
    }
}
