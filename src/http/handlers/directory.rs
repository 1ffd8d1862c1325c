//! Member directory endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::api::directory::{
    member_stats, MemberCreate, MemberListQuery, MemberPatch, MemberResponse, MemberStats,
};
use crate::api::{fail_soft, Page};
use crate::http::error::AppError;
use crate::http::state::AppState;

use super::HandlerResult;

/// `GET /directory` — filtered, paginated listing ordered by full name.
pub async fn list_members(
    State(state): State<AppState>,
    Query(query): Query<MemberListQuery>,
) -> HandlerResult<Vec<MemberResponse>> {
    let members = state
        .store
        .list_members(&query.filter(), query.page())
        .await?;
    Ok(Json(members.iter().map(MemberResponse::from).collect()))
}

/// `GET /directory/count` — total matching the same filters as the listing.
pub async fn count_members(
    State(state): State<AppState>,
    Query(query): Query<MemberListQuery>,
) -> HandlerResult<u64> {
    let total = state.store.count_members(&query.filter()).await?;
    Ok(Json(total))
}

/// `GET /directory/{id}`
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> HandlerResult<MemberResponse> {
    let member = state
        .store
        .get_member(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member {id} not found")))?;
    Ok(Json(MemberResponse::from(&member)))
}

/// `POST /directory` — 201 with the stored representation.
pub async fn create_member(
    State(state): State<AppState>,
    Json(payload): Json<MemberCreate>,
) -> Result<(StatusCode, Json<MemberResponse>), AppError> {
    let member = state.store.insert_member(payload).await?;
    Ok((StatusCode::CREATED, Json(MemberResponse::from(&member))))
}

/// `PATCH /directory/{id}` — partial update; explicit nulls clear fields.
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<MemberPatch>,
) -> HandlerResult<MemberResponse> {
    let member = state
        .store
        .update_member(id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member {id} not found")))?;
    Ok(Json(MemberResponse::from(&member)))
}

/// `DELETE /directory/{id}` — 204 or 404.
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_member(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Member {id} not found")))
    }
}

/// `GET /directory/stats/overview` — fail-soft aggregates over a bounded
/// sample.
pub async fn member_stats_overview(
    State(state): State<AppState>,
) -> HandlerResult<MemberStats> {
    let fetched = state
        .store
        .list_members(&Default::default(), Page::stats_sample())
        .await;
    let outcome = fail_soft(fetched, |members| {
        member_stats(&members, Utc::now().date_naive())
    });
    Ok(Json(outcome.into_inner()))
}
