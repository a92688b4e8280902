//! # Ledger Timestamps
//!
//! The ledger stamps every committed transaction with a protobuf-style
//! `(seconds, nanos)` pair. `LedgerTimestamp` keeps that pair intact and
//! renders it for history responses as RFC 3339 UTC with millisecond
//! precision and a `Z` suffix (`2026-01-15T12:00:00.250Z`).
//!
//! Millisecond precision matches what history consumers have always been
//! given; sub-millisecond digits are rounded half-up, never truncated, so a
//! timestamp of `999_600_000` nanos renders as the next whole second.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

const NANOS_PER_SEC: u32 = 1_000_000_000;
const NANOS_PER_MILLI: i64 = 1_000_000;

/// A transaction timestamp as reported by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LedgerTimestamp {
    /// Whole seconds since the Unix epoch.
    pub seconds: i64,
    /// Sub-second nanoseconds, `0..1_000_000_000`.
    pub nanos: u32,
}

impl LedgerTimestamp {
    /// Build from the raw pair, carrying overflowing nanos into seconds.
    pub fn new(seconds: i64, nanos: u32) -> Self {
        Self {
            seconds: seconds + i64::from(nanos / NANOS_PER_SEC),
            nanos: nanos % NANOS_PER_SEC,
        }
    }

    /// The current UTC time.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// From a `chrono::DateTime<Utc>`.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self::new(dt.timestamp(), dt.timestamp_subsec_nanos())
    }

    /// Milliseconds since the Unix epoch, rounding the nanos half-up.
    pub fn epoch_millis(&self) -> i64 {
        let nanos = i64::from(self.nanos);
        self.seconds * 1000 + (nanos + NANOS_PER_MILLI / 2) / NANOS_PER_MILLI
    }

    /// Render as RFC 3339 UTC with millisecond precision.
    ///
    /// Returns `None` if the instant is outside chrono's representable range.
    pub fn to_iso8601(&self) -> Option<String> {
        let millis = self.epoch_millis();
        let nanos = (millis.rem_euclid(1000) * NANOS_PER_MILLI) as u32;
        DateTime::<Utc>::from_timestamp(millis.div_euclid(1000), nanos)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl std::fmt::Display for LedgerTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_iso8601() {
            Some(s) => f.write_str(&s),
            None => write!(f, "{}s+{}ns", self.seconds, self.nanos),
        }
    }
}
