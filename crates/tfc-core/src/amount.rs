//! # Ledger Amounts
//!
//! Trade and shipment records carry their amount as a bare JSON number.
//! Records written by other clients of the same channel render whole amounts
//! without a fractional part (`1000`, never `1000.0`), and records read back
//! from the ledger may use either spelling. `Amount` accepts both and always
//! writes the short form, so a record that round-trips through a contract is
//! byte-identical to one written by any other client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A monetary amount as stored on the ledger.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Amount(f64);

impl Amount {
    /// Wrap a raw value.
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// The raw value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// The value as an integer, if it has no fractional part and fits.
    pub fn as_integer(&self) -> Option<i64> {
        let v = self.0;
        if v.is_finite() && v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER {
            Some(v as i64)
        } else {
            None
        }
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(value as f64)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_integer() {
            Some(i) => write!(f, "{i}"),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Error parsing an amount argument.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0:?} is not a finite number")]
pub struct ParseAmountError(String);

impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v: f64 = s
            .trim()
            .parse()
            .map_err(|_| ParseAmountError(s.to_string()))?;
        if !v.is_finite() {
            return Err(ParseAmountError(s.to_string()));
        }
        Ok(Self(v))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_integer() {
            Some(i) => serializer.serialize_i64(i),
            None => serializer.serialize_f64(self.0),
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Self)
    }
}
