//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Body ceiling for the whole API. Generous enough that oversized image
/// uploads reach the handler's own size check instead of a generic 413.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let directory = Router::new()
        .route(
            "/",
            get(handlers::list_members).post(handlers::create_member),
        )
        .route("/count", get(handlers::count_members))
        .route("/stats/overview", get(handlers::member_stats_overview))
        .route(
            "/{id}",
            get(handlers::get_member)
                .patch(handlers::update_member)
                .delete(handlers::delete_member),
        );

    let equipment = Router::new()
        .route(
            "/",
            get(handlers::list_equipment).post(handlers::create_equipment),
        )
        .route("/count", get(handlers::count_equipment))
        .route("/stats/overview", get(handlers::equipment_stats_overview))
        .route(
            "/{id}",
            get(handlers::get_equipment)
                .patch(handlers::update_equipment)
                .delete(handlers::delete_equipment),
        );

    let events = Router::new()
        .route("/", get(handlers::list_events).post(handlers::create_event))
        .route("/count", get(handlers::count_events))
        .route("/stats/overview", get(handlers::event_stats_overview))
        .route("/upload-image", post(handlers::upload_image))
        .route("/rsvps", post(handlers::create_rsvp))
        .route("/rsvps/{id}", delete(handlers::delete_rsvp))
        .route("/{id}/rsvps", get(handlers::list_event_rsvps))
        .route(
            "/{id}",
            get(handlers::get_event)
                .patch(handlers::update_event)
                .delete(handlers::delete_event),
        );

    let payments = Router::new()
        .route(
            "/",
            get(handlers::list_payments).post(handlers::create_payment),
        )
        .route("/count", get(handlers::count_payments))
        .route("/stats/overview", get(handlers::payment_stats_overview))
        .route("/receipts/latest", get(handlers::latest_receipt))
        .route(
            "/{id}",
            get(handlers::get_payment)
                .patch(handlers::update_payment)
                .delete(handlers::delete_payment),
        );

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .nest("/directory", directory)
        .nest("/equipment", equipment)
        .nest("/events", events)
        .nest("/payments", payments)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
