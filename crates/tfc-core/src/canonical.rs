//! # Canonical Serialization (RFC 8785)
//!
//! `CanonicalBytes` is the construction path for every byte sequence that is
//! later compared for equality or used as a lookup key: access-control
//! subject keys in particular.
//!
//! ## Invariant
//!
//! The inner buffer is private and only [`CanonicalBytes::new()`] produces
//! it, via `serde_jcs` (RFC 8785): object keys sorted by code point, compact
//! separators, no insignificant whitespace. Two values that are equal as JSON
//! therefore always produce identical bytes, independent of struct field
//! declaration order or map iteration order, and independent of the process
//! that computed them.

use serde::Serialize;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// JCS output is always valid UTF-8, so the bytes can also be viewed as a
/// `&str` without a fallible conversion.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalBytes(String);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value cannot
    /// be represented as JSON (for example a map with non-string keys).
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let s = serde_jcs::to_string(obj)?;
        Ok(Self(s))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Access the canonical form as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the canonical text.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Display for CanonicalBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
