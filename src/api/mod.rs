//! Request/response types and pure data shaping for the four resource
//! modules.
//!
//! Each submodule defines the same surface: a stored record type, a create
//! request, a partial-update patch, a filter specification with its query
//! string form, a wire response, and the stats aggregation for the
//! overview endpoint. Shared helpers (ISO formatting, blank normalization,
//! patch fields, pagination, the fail-soft stats policy) live in
//! [`common`].

pub mod common;
pub mod directory;
pub mod equipment;
pub mod events;
pub mod payments;

pub use common::{fail_soft, Page, Patch, StatsOutcome, STATS_SAMPLE_CAP};
