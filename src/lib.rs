//! # Assembly API
//!
//! Administrative backend for a single-congregation church organization.
//!
//! This crate exposes a REST API (via Axum) over four independent resource
//! collections: a member directory, an equipment inventory register, an
//! events/notices board with RSVPs, and a payments/receipting ledger. Each
//! collection follows the same contract: list/filter/search, count, get by id,
//! create, partial update, delete, and an aggregate stats endpoint.
//!
//! ## Architecture
//!
//! The crate is organized into three layers:
//!
//! - [`api`]: request/response types, filter specifications, and the pure
//!   data-shaping helpers (inbound normalization, outbound formatting, stats
//!   aggregation)
//! - [`store`]: the repository pattern behind the persistence boundary. All
//!   querying, pagination, and sequence generation is delegated to a store
//!   implementation; the crate ships an in-memory backend suitable for tests
//!   and local development, with a hosted database reachable through the same
//!   traits
//! - [`http`]: Axum router, shared state, error mapping, and the per-resource
//!   request handlers
//!
//! ## Consistency model
//!
//! The service is stateless per request and performs no client-side locking or
//! transactions. Multi-step operations (existence check then update, RSVP
//! cascade before event delete) are not atomic; uniqueness of identifiers and
//! receipt numbers is the store's responsibility.

pub mod api;
pub mod config;
pub mod http;
pub mod store;
