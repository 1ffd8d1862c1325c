//! HTTP request handlers.
//!
//! One submodule per resource plus the root/health endpoints. Handlers stay
//! thin: decode the request, call the store, shape the response with the
//! types from [`crate::api`].

mod directory;
mod equipment;
mod events;
mod meta;
mod payments;

pub use directory::*;
pub use equipment::*;
pub use events::*;
pub use meta::*;
pub use payments::*;

use axum::Json;

use super::error::AppError;

/// Result alias for JSON handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;
