//! Events/notices endpoints: CRUD, RSVPs, and image upload.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::api::events::{
    event_stats, unique_image_name, EventCreate, EventFilter, EventListQuery, EventPatch,
    EventResponse, EventStats, RsvpCreate, RsvpResponse, UploadImageResponse,
    ALLOWED_IMAGE_TYPES, MAX_IMAGE_BYTES,
};
use crate::api::{fail_soft, Page};
use crate::http::error::AppError;
use crate::http::state::AppState;

use super::HandlerResult;

/// `GET /events` — published events only, newest publication first. Each
/// entry carries its RSVP count.
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> HandlerResult<Vec<EventResponse>> {
    let events = state.store.list_events(&query.filter(), query.page()).await?;
    let mut responses = Vec::with_capacity(events.len());
    for event in &events {
        let rsvp_count = state.store.count_rsvps(event.id).await?;
        responses.push(EventResponse::from_record(event, rsvp_count));
    }
    Ok(Json(responses))
}

/// `GET /events/count` — published events matching the same filters.
pub async fn count_events(
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> HandlerResult<u64> {
    let total = state.store.count_events(&query.filter()).await?;
    Ok(Json(total))
}

/// `GET /events/{id}` — bumps the view counter, then returns the record.
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> HandlerResult<EventResponse> {
    if !state.store.increment_event_views(id).await? {
        return Err(AppError::NotFound(format!("Event {id} not found")));
    }
    let event = state
        .store
        .get_event(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {id} not found")))?;
    let rsvp_count = state.store.count_rsvps(id).await?;
    Ok(Json(EventResponse::from_record(&event, rsvp_count)))
}

/// `POST /events` — 201 with the stored representation; `published_at` and
/// the view counter are server-assigned.
pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<EventCreate>,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    let event = state.store.insert_event(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(EventResponse::from_record(&event, 0)),
    ))
}

/// `PATCH /events/{id}` — partial update with strip-null semantics.
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<EventPatch>,
) -> HandlerResult<EventResponse> {
    let event = state
        .store
        .update_event(id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {id} not found")))?;
    let rsvp_count = state.store.count_rsvps(id).await?;
    Ok(Json(EventResponse::from_record(&event, rsvp_count)))
}

/// `DELETE /events/{id}` — removes the event's RSVPs first, then the event.
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.get_event(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Event {id} not found")));
    }
    state.store.delete_event_rsvps(id).await?;
    if state.store.delete_event(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Event {id} not found")))
    }
}

/// `GET /events/stats/overview` — aggregates over all events, drafts
/// included.
pub async fn event_stats_overview(State(state): State<AppState>) -> HandlerResult<EventStats> {
    let events = state
        .store
        .list_events(&EventFilter::default(), Page::stats_sample())
        .await;
    let rsvps = state.store.count_all_rsvps().await;
    let fetched = match (events, rsvps) {
        (Ok(events), Ok(rsvps)) => Ok((events, rsvps)),
        (Err(e), _) | (_, Err(e)) => Err(e),
    };
    let outcome = fail_soft(fetched, |(events, rsvps)| {
        event_stats(&events, rsvps, Utc::now().date_naive())
    });
    Ok(Json(outcome.into_inner()))
}

/// `GET /events/{id}/rsvps` — chronological attendee list. An unknown or
/// deleted event id yields an empty list, not a 404.
pub async fn list_event_rsvps(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> HandlerResult<Vec<RsvpResponse>> {
    let rsvps = state.store.list_rsvps(id).await?;
    Ok(Json(rsvps.iter().map(RsvpResponse::from).collect()))
}

/// `POST /events/rsvps` — 404 when the referenced event does not exist;
/// nothing is persisted in that case.
pub async fn create_rsvp(
    State(state): State<AppState>,
    Json(payload): Json<RsvpCreate>,
) -> Result<(StatusCode, Json<RsvpResponse>), AppError> {
    if state.store.get_event(payload.event_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Event {} not found",
            payload.event_id
        )));
    }
    let rsvp = state.store.insert_rsvp(payload).await?;
    Ok((StatusCode::CREATED, Json(RsvpResponse::from(&rsvp))))
}

/// `DELETE /events/rsvps/{id}` — 204 or 404.
pub async fn delete_rsvp(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_rsvp(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("RSVP {id} not found")))
    }
}

/// `POST /events/upload-image` — single multipart file, validated against
/// the MIME allow-list and size ceiling, stored under a collision-resistant
/// name.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> HandlerResult<UploadImageResponse> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
        .ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;

    let content_type = field.content_type().unwrap_or_default().to_string();
    if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Invalid file type: {content_type}. Allowed: {}",
            ALLOWED_IMAGE_TYPES.join(", ")
        )));
    }

    let original_name = field.file_name().unwrap_or("upload").to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::BadRequest(
            "File too large. Maximum size is 10MB".to_string(),
        ));
    }

    let filename = unique_image_name(&original_name);
    let stored = state
        .images
        .put_image(&filename, &content_type, bytes.to_vec())
        .await?;

    Ok(Json(UploadImageResponse {
        url: stored.url,
        filename: stored.filename,
    }))
}
