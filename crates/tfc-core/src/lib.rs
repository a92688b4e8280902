//! # tfc-core — Foundational Types for the Trade Finance Chaincode
//!
//! Every other crate in the workspace depends on `tfc-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One error enum per concern, one variant per rule.** `ContractError`
//!    names every way an invocation can be rejected. Display output is the
//!    client-visible message and is kept byte-stable.
//!
//! 2. **`CanonicalBytes` newtype.** Byte sequences used as lookup keys flow
//!    through `CanonicalBytes::new()` (RFC 8785), so equal values always
//!    produce equal keys.
//!
//! 3. **`Amount` writes whole numbers as integers.** Stored records are
//!    byte-compatible with records written by other channel clients.
//!
//! 4. **Ledger timestamps keep their nanos.** `LedgerTimestamp` mirrors the
//!    ledger's `(seconds, nanos)` pair and only rounds when rendered.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tfc-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod amount;
pub mod canonical;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use amount::{Amount, ParseAmountError};
pub use canonical::CanonicalBytes;
pub use error::{
    AccessError, CanonicalizationError, ContractError, ErrorKind, LedgerError, MissingRecord,
};
pub use identity::{CallerIdentity, BUSINESS_ROLE_ATTRIBUTE};
pub use temporal::LedgerTimestamp;
