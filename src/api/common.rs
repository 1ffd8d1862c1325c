//! Shared wire-format helpers used by all four resource modules.
//!
//! Everything in this module is pure data shaping: inbound normalization
//! (blank strings become absent, three-state patch fields), outbound
//! formatting (ISO-8601 strings at the boundary), pagination clamping, and
//! the fail-soft stats policy.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer};

/// Maximum number of records fetched for a stats/overview aggregation.
pub const STATS_SAMPLE_CAP: usize = 1000;

// =========================================================
// Patch fields
// =========================================================

/// A partial-update field that distinguishes "not sent" from "sent as null".
///
/// `Absent` leaves the stored value untouched, `Null` clears it, and
/// `Value` replaces it. Deserializes from JSON with `#[serde(default)]`:
/// a missing key is `Absent`, an explicit `null` is `Null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// Apply this patch to an optional slot. `Absent` is a no-op.
    pub fn apply(self, slot: &mut Option<T>) {
        match self {
            Patch::Absent => {}
            Patch::Null => *slot = None,
            Patch::Value(value) => *slot = Some(value),
        }
    }
}

impl Patch<String> {
    /// Apply a text patch, normalizing blank values to absent.
    ///
    /// An explicit null and an explicit empty string both clear the field;
    /// this mirrors how the persistence layer treats `""` as null.
    pub fn apply_text(self, slot: &mut Option<String>) {
        match self {
            Patch::Absent => {}
            Patch::Null => *slot = None,
            Patch::Value(value) => *slot = blank_to_none(Some(value)),
        }
    }
}

// =========================================================
// Inbound normalization
// =========================================================

/// Normalize an optional text value: blank or whitespace-only becomes absent.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Strip-null patch semantics: a missing, null, or blank value all mean
/// "leave the stored field unchanged". Returns the value only when it is
/// meaningful to apply.
pub fn non_blank(value: Option<String>) -> Option<String> {
    blank_to_none(value)
}

/// Round a monetary amount to cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

// =========================================================
// Outbound formatting
// =========================================================

/// Format an optional date as an ISO-8601 string (`YYYY-MM-DD`).
pub fn iso_date(value: Option<NaiveDate>) -> Option<String> {
    value.map(|d| d.to_string())
}

/// Format an optional time as `HH:MM:SS`.
pub fn iso_time(value: Option<NaiveTime>) -> Option<String> {
    value.map(|t| t.format("%H:%M:%S").to_string())
}

/// Format a timestamp as an RFC 3339 / ISO-8601 string.
pub fn iso_datetime(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}

// =========================================================
// Pagination
// =========================================================

/// A validated page request. `limit` is always within the module's bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Page {
    /// Clamp raw query parameters into a valid page.
    pub fn clamped(limit: Option<u32>, offset: Option<u32>, default: usize, max: usize) -> Self {
        let limit = limit
            .map(|l| (l as usize).clamp(1, max))
            .unwrap_or(default);
        let offset = offset.map(|o| o as usize).unwrap_or(0);
        Self { limit, offset }
    }

    /// The bounded page used by stats/overview aggregations.
    pub fn stats_sample() -> Self {
        Self {
            limit: STATS_SAMPLE_CAP,
            offset: 0,
        }
    }
}

// =========================================================
// Fail-soft stats
// =========================================================

/// Outcome of a stats aggregation.
///
/// Dashboard endpoints never propagate backend failures; they return a
/// zero-valued default instead. The two cases stay distinguishable here so
/// the policy is explicit and testable, even though both serialize to an
/// HTTP 200 at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsOutcome<T> {
    /// Aggregated from live records.
    Computed(T),
    /// The backing store failed; this is the zero-valued default.
    Degraded(T),
}

impl<T> StatsOutcome<T> {
    pub fn is_degraded(&self) -> bool {
        matches!(self, StatsOutcome::Degraded(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            StatsOutcome::Computed(inner) | StatsOutcome::Degraded(inner) => inner,
        }
    }
}

/// Convert a store fetch into a stats outcome, logging the failure and
/// substituting the zero-valued default when the store is unreachable.
pub fn fail_soft<R, T, E>(result: Result<R, E>, compute: impl FnOnce(R) -> T) -> StatsOutcome<T>
where
    T: Default,
    E: std::fmt::Display,
{
    match result {
        Ok(rows) => StatsOutcome::Computed(compute(rows)),
        Err(e) => {
            tracing::warn!(error = %e, "stats aggregation degraded to defaults");
            StatsOutcome::Degraded(T::default())
        }
    }
}
