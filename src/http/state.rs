//! Application state for the HTTP server.

use std::sync::Arc;

use crate::store::{FullStore, ObjectStore};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Record store for all four resource modules
    pub store: Arc<dyn FullStore>,
    /// Bucket for uploaded event images
    pub images: Arc<dyn ObjectStore>,
}

impl AppState {
    /// Create a new application state with the given store and image bucket.
    pub fn new(store: Arc<dyn FullStore>, images: Arc<dyn ObjectStore>) -> Self {
        Self { store, images }
    }
}
