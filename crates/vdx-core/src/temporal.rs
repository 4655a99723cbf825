//! # Temporal Types — UTC-Only Timestamps and the Logical Clock
//!
//! Defines `Timestamp`, a UTC-only timestamp type truncated to seconds
//! precision, and the `Clock` trait that gives the dispute engine a single
//! authoritative time source for all commit/reveal/resolve timing gates.
//!
//! ## Security Invariant
//!
//! Timestamps must be UTC with Z suffix for deterministic canonicalization.
//! Local timezone offsets would produce different canonical byte sequences
//! for the same instant. Non-UTC inputs are **rejected at construction** —
//! there is no silent conversion that could introduce ambiguity.
//!
//! All deadline evaluation flows through one `Clock` implementation per
//! engine instance; tests drive a [`ManualClock`] so window transitions are
//! exercised deterministically rather than by sleeping.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`] — from an ISO8601 string, rejecting non-UTC offsets.
/// - [`Timestamp::from_epoch_secs()`] — from a Unix timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// The Unix epoch (1970-01-01T00:00:00Z).
    pub fn epoch() -> Self {
        Self(DateTime::UNIX_EPOCH)
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 / ISO8601 string.
    ///
    /// **Rejects non-UTC inputs.** Only timestamps with the `Z` suffix are
    /// accepted — even `+00:00`, which is semantically equivalent, is
    /// rejected so canonical byte representations stay deterministic.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid RFC 3339 or uses a non-Z
    /// timezone offset.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if !s.ends_with('Z') {
            return Err(CoreError::Validation(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| CoreError::Validation(format!("invalid RFC 3339 timestamp {s:?}: {e}")))?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    pub fn from_epoch_secs(secs: i64) -> Result<Self, CoreError> {
        let dt = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| CoreError::Validation(format!("invalid Unix timestamp: {secs}")))?;
        Ok(Self(dt))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Returns this timestamp advanced by `secs` seconds, saturating at the
    /// representable range boundary.
    pub fn plus_secs(&self, secs: u64) -> Self {
        let delta = chrono::Duration::seconds(secs.min(i64::MAX as u64) as i64);
        Self(self.0.checked_add_signed(delta).unwrap_or(self.0))
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

/// A source of the current time for deadline evaluation.
///
/// The dispute engine holds exactly one clock; every timing gate (commit
/// window, reveal window, evidence expiry, cooldown) reads it through the
/// engine's monotonic clamp. Implementations must be cheap to call.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> Timestamp;
}

/// Wall-clock implementation of [`Clock`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A manually driven clock for deterministic tests.
///
/// Cloning shares the underlying instant, so a test can hold a handle while
/// the engine owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    epoch_secs: Arc<AtomicI64>,
}

impl ManualClock {
    /// Create a manual clock starting at the given instant.
    pub fn new(start: Timestamp) -> Self {
        Self {
            epoch_secs: Arc::new(AtomicI64::new(start.epoch_secs())),
        }
    }

    /// Advance the clock by `secs` seconds.
    pub fn advance(&self, secs: u64) {
        self.epoch_secs
            .fetch_add(secs.min(i64::MAX as u64) as i64, Ordering::SeqCst);
    }

    /// Set the clock to a specific instant.
    pub fn set(&self, ts: Timestamp) {
        self.epoch_secs.store(ts.epoch_secs(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        let secs = self.epoch_secs.load(Ordering::SeqCst);
        Timestamp::from_epoch_secs(secs).unwrap_or_else(|_| Timestamp::epoch())
    }
}
