//! # tfc-acl — Attribute-Based Access Control
//!
//! Every contract invocation is gated on the caller's organization and the
//! business role carried in its certificate. A [`AccessPolicy`] maps each
//! recognized `(organization, role)` subject to the operations it may
//! invoke.
//!
//! ## Decision Procedure
//!
//! 1. A caller without a `BUSINESS_ROLE` attribute has role [`ANY_ROLE`].
//! 2. The subject key is the RFC 8785 encoding of
//!    `{"mspId": <organization>, "role": <role>}`.
//! 3. No rule for that key: the caller is not recognized.
//! 4. A rule that does not list the operation: the caller is forbidden.
//! 5. Otherwise the call proceeds.
//!
//! Rules match the exact pair. A caller presenting `exporter` is not granted
//! the operations of the `any` rule for its organization.

pub mod config;
pub mod policy;
pub mod subject;

pub use config::{PolicyConfig, RuleConfig};
pub use policy::{AccessPolicy, AccessPolicyBuilder};
pub use subject::{AclSubject, ANY_ROLE};
